// SPDX-License-Identifier: MPL-2.0
//! Application layer - Use cases and orchestration.
//!
//! This module contains the application layer of the Clean Architecture:
//!
//! - [`port`]: Trait definitions (interfaces) for dependency inversion
//! - [`edit`]: The edit orchestrator and its request pipeline
//!
//! # Architecture
//!
//! The application layer sits between the domain layer (pure business logic)
//! and the infrastructure layer. It defines:
//!
//! - **Ports (Traits)**: Abstract interfaces that infrastructure implements
//! - **Orchestration**: The edit request state machine built on those ports
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - The binary wires adapters into the orchestrator at startup
//!
//! # Example
//!
//! ```ignore
//! use lasso_patch::application::edit::{EditOptions, EditOrchestrator};
//! use lasso_patch::application::port::ImageProvider;
//!
//! // Infrastructure implements the port trait
//! struct HttpProvider { /* ... */ }
//! impl ImageProvider for HttpProvider { /* ... */ }
//!
//! // The orchestrator only sees the trait
//! let orchestrator = EditOrchestrator::new(provider, EditOptions::default());
//! ```

pub mod edit;
pub mod port;
