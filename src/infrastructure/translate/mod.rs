// SPDX-License-Identifier: MPL-2.0
//! Free-endpoint translation adapter implementing the [`Translator`] trait.
//!
//! Uses the public `translate_a/single` endpoint with `sl=auto&tl=en`.
//! The response is a nested array whose first element lists translated
//! segments; the head of each segment is joined into the final text.
//! Failures never reach the caller: the adapter logs and hands back the
//! original instruction.
//!
//! [`Translator`]: crate::application::port::Translator

use crate::application::port::Translator;
use futures_util::future::BoxFuture;
use std::fmt;

#[derive(Debug)]
enum TranslateError {
    Request(String),
    Status(u16),
    Shape,
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslateError::Request(msg) => write!(f, "request failed: {msg}"),
            TranslateError::Status(code) => write!(f, "endpoint returned status {code}"),
            TranslateError::Shape => write!(f, "response shape not recognized"),
        }
    }
}

/// Best-effort HTTP translator.
///
/// # Example
///
/// ```ignore
/// use lasso_patch::infrastructure::{build_http_client, HttpTranslator};
///
/// let http = build_http_client()?;
/// let translator = HttpTranslator::new(http, config.translate.endpoint.clone());
/// let english = translator.translate_to_english("xóa cây đèn").await;
/// ```
pub struct HttpTranslator {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpTranslator {
    #[must_use]
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    async fn fetch(&self, text: &str) -> Result<String, TranslateError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", "en"),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|err| TranslateError::Request(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslateError::Status(status.as_u16()));
        }

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|err| TranslateError::Request(err.to_string()))?;
        join_segments(&value).ok_or(TranslateError::Shape)
    }
}

/// Joins the head of every translated segment in
/// `[[["segment", "original", …], …], …]`.
fn join_segments(value: &serde_json::Value) -> Option<String> {
    let segments = value.get(0)?.as_array()?;
    let mut out = String::new();
    for segment in segments {
        if let Some(text) = segment.get(0).and_then(serde_json::Value::as_str) {
            out.push_str(text);
        }
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

impl Translator for HttpTranslator {
    fn translate_to_english<'a>(&'a self, text: &'a str) -> BoxFuture<'a, String> {
        Box::pin(async move {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return String::new();
            }
            match self.fetch(trimmed).await {
                Ok(translated) => translated,
                Err(err) => {
                    eprintln!("Translation failed: {err}; using original text");
                    text.to_string()
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn segments_join_in_order() {
        let value = json!([
            [
                ["Remove the ", "Xóa ", null],
                ["lamp", "cây đèn", null]
            ],
            null,
            "vi"
        ]);
        assert_eq!(join_segments(&value).as_deref(), Some("Remove the lamp"));
    }

    #[test]
    fn unrecognized_shapes_yield_none() {
        assert_eq!(join_segments(&json!({ "error": 400 })), None);
        assert_eq!(join_segments(&json!([])), None);
        assert_eq!(join_segments(&json!([[]])), None);
        assert_eq!(join_segments(&json!([[[42]]])), None);
    }

    #[tokio::test]
    async fn empty_input_short_circuits_without_a_request() {
        let translator = HttpTranslator::new(reqwest::Client::new(), "http://127.0.0.1:0");
        assert_eq!(translator.translate_to_english("   ").await, "");
    }

    #[tokio::test]
    async fn failures_fall_back_to_the_original_text() {
        // Port 0 is unroutable, so the request fails immediately.
        let translator = HttpTranslator::new(reqwest::Client::new(), "http://127.0.0.1:0");
        let out = translator.translate_to_english("xóa cây đèn").await;
        assert_eq!(out, "xóa cây đèn");
    }
}
