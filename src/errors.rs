// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! Child-process failures never show up here: they are folded into
//! [`crate::exec::SpawnResult`] and never travel as errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InterpkitError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, InterpkitError>;
