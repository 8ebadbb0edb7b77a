// SPDX-License-Identifier: MPL-2.0
//! Command-line driver for the edit pipeline.
//!
//! Loads an image and a lasso-selection file, runs one edit request
//! against the configured provider and writes the composited result to
//! disk. `--mask-only` stops after rasterization and writes the mask
//! instead, which needs no API key.

use lasso_patch::application::edit::{EditOptions, EditOrchestrator, EditStrategy};
use lasso_patch::application::port::{ImageProvider, Translator};
use lasso_patch::config::{self, defaults, Config};
use lasso_patch::domain::editing::{Strength, StrengthPreset};
use lasso_patch::domain::geometry::Point;
use lasso_patch::error::{Error, Result};
use lasso_patch::infrastructure::{build_http_client, HttpTranslator, RunwareClient};
use lasso_patch::media::{codec, load_image};
use lasso_patch::session::EditSession;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

const HELP: &str = "\
lasso_patch - repaint a lassoed image region with a generation model

USAGE:
  lasso_patch [OPTIONS] --selection <FILE> --prompt <TEXT> <IMAGE>
  lasso_patch [OPTIONS] --selection <FILE> --mask-only <IMAGE>

ARGS:
  <IMAGE>                  Input image (png, jpeg, webp, bmp)

OPTIONS:
  --selection <FILE>       Selection as JSON: an array of paths, each an
                           array of [x, y] points in image coordinates
  --prompt <TEXT>          Edit instruction, any language
  --output <FILE>          Output image path [default: edited.png]
  --mask-only              Write the rasterized mask instead of editing
  --config <FILE>          Settings file [default: platform config dir]
  --strategy <NAME>        direct-inpaint | remove-background-first |
                           generate-then-place
  --strength <VALUE>       Generation strength in [0, 1], or a preset:
                           subtle | balanced | strong
  --invert                 Edit everything outside the selection
  --no-translate           Skip instruction translation
  -h, --help               Print help
";

struct Flags {
    image: PathBuf,
    selection: PathBuf,
    prompt: Option<String>,
    output: PathBuf,
    mask_only: bool,
    config: Option<PathBuf>,
    strategy: Option<String>,
    strength: Option<String>,
    invert: bool,
    no_translate: bool,
}

fn parse_flags() -> std::result::Result<Flags, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let flags = Flags {
        selection: args.value_from_str("--selection")?,
        prompt: args.opt_value_from_str("--prompt")?,
        output: args
            .opt_value_from_str("--output")?
            .unwrap_or_else(|| PathBuf::from("edited.png")),
        mask_only: args.contains("--mask-only"),
        config: args.opt_value_from_str("--config")?,
        strategy: args.opt_value_from_str("--strategy")?,
        strength: args.opt_value_from_str("--strength")?,
        invert: args.contains("--invert"),
        no_translate: args.contains("--no-translate"),
        image: args.free_from_str()?,
    };
    Ok(flags)
}

/// Parses the selection file: an array of paths, each an array of
/// `[x, y]` pairs. Strokes too short to enclose an area are discarded,
/// matching interactive capture.
fn replay_selection(session: &mut EditSession, json: &str) -> Result<usize> {
    let paths: Vec<Vec<[f32; 2]>> = serde_json::from_str(json)?;
    let mut committed = 0;
    for path in paths {
        let mut points = path.iter().map(|&[x, y]| Point::new(x, y));
        if let Some(first) = points.next() {
            session.begin_stroke(first);
            for point in points {
                session.extend_stroke(point);
            }
            if session.end_stroke() {
                committed += 1;
            }
        }
    }
    Ok(committed)
}

/// Parses `--strength`: a preset name or a raw value in `[0, 1]`.
fn parse_strength(value: &str) -> Result<Strength> {
    if let Some(preset) = StrengthPreset::from_name(value) {
        return Ok(preset.strength());
    }
    value
        .parse::<f32>()
        .map(Strength::new)
        .map_err(|_| Error::Parse(format!("unknown strength '{value}'")))
}

fn build_options(config: &Config, flags: &Flags) -> Result<EditOptions> {
    let mut options = EditOptions::from_config(config);
    if let Some(name) = &flags.strategy {
        options.strategy = EditStrategy::from_name(name)
            .ok_or_else(|| Error::Parse(format!("unknown strategy '{name}'")))?;
    }
    if let Some(value) = &flags.strength {
        options.strength = parse_strength(value)?;
    }
    if flags.invert {
        options.invert_mask = true;
    }
    Ok(options)
}

async fn run(flags: Flags) -> Result<()> {
    let mut config = match &flags.config {
        Some(path) => config::load_from_path(path)?,
        None => config::load()?,
    };
    if config.provider.api_key.trim().is_empty() {
        if let Ok(key) = std::env::var(defaults::API_KEY_ENV_VAR) {
            config.provider.api_key = key;
        }
    }
    let options = build_options(&config, &flags)?;

    let mut session = EditSession::new();
    session.load_image(load_image(&flags.image, config.upload.max_dimension)?);
    let selection_json = std::fs::read_to_string(&flags.selection)?;
    let committed = replay_selection(&mut session, &selection_json)?;
    eprintln!(
        "Loaded {}x{} working image, {committed} selection path(s)",
        session.working_image().map_or(0, |image| image.width()),
        session.working_image().map_or(0, |image| image.height()),
    );

    let http = build_http_client().map_err(|err| Error::Io(err.to_string()))?;
    let provider = RunwareClient::new(http.clone(), config.provider.clone());
    eprintln!("Provider key: {}", provider.masked_key());

    let mut orchestrator =
        EditOrchestrator::new(Arc::new(provider) as Arc<dyn ImageProvider>, options);
    if config.translate.enabled && !flags.no_translate {
        let translator = HttpTranslator::new(http, config.translate.endpoint.clone());
        orchestrator = orchestrator.with_translator(Arc::new(translator) as Arc<dyn Translator>);
    }

    if flags.mask_only {
        let image = session
            .working_image()
            .cloned()
            .ok_or_else(|| Error::Image("no working image loaded".to_string()))?;
        let mask = orchestrator.preview_mask(session.selection(), &image)?;
        std::fs::write(&flags.output, codec::mask_png_bytes(&mask)?)?;
        eprintln!("Wrote mask to {}", flags.output.display());
        return Ok(());
    }

    let instruction = flags
        .prompt
        .as_deref()
        .ok_or_else(|| Error::Parse("--prompt is required unless --mask-only".to_string()))?;
    let outcome = orchestrator.run(&mut session, instruction).await?;

    codec::save_image(&outcome.image, &flags.output)?;
    eprintln!("Prompt: {}", outcome.prompt);
    eprintln!(
        "Edited in {:.1}s, wrote {}",
        outcome.elapsed.as_secs_f32(),
        flags.output.display()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let flags = match parse_flags() {
        Ok(flags) => flags,
        Err(err) => {
            eprintln!("Error: {err}");
            eprintln!("Run with --help for usage.");
            return ExitCode::from(2);
        }
    };

    match run(flags).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
