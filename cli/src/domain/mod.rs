//! Domain layer — pure types and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::application`,
//! `tokio`, `std::fs`, or `std::process`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod step;

pub use config::{ProvisionConfig, validate_config};
pub use error::{ConfigError, ProvisionError, exit_code_for};
pub use step::{FailPolicy, Step, StepResult};
