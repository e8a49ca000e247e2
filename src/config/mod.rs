// src/config/mod.rs

//! Configuration loading and validation for interpkit.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate it and resolve defaults (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_or_default, parse_raw};
pub use model::{
    ConfigFile, LayoutSection, RawConfigFile, ResolverSection, RunnerSection,
};
