// src/resolve/mod.rs

//! Interpreter discovery.
//!
//! - [`candidates`] builds the ordered (location, name) search space.
//! - [`probe`] defines how a candidate is judged, with the script-based
//!   production probe.
//! - [`resolver`] walks the candidates and stops at the first match.

pub mod candidates;
pub mod probe;
pub mod resolver;

pub use candidates::{CandidateSearch, SearchInputs};
pub use probe::{CompatibilityProbe, ScriptProbe};
pub use resolver::InterpreterResolver;
