//! # stage_config
//!
//! Reader for the sectioned key/value documents that describe a staged scene.
//!
//! ```text
//! # comment
//! [main]
//! mode = static1
//!
//! [redtank]
//! type = tank
//! pos = "10 20 0"
//! ```
//!
//! Section names and keys are case-insensitive; values keep their case.
//! Sections and keys are kept in declaration order.

pub mod document;
pub mod error;
pub mod line;

pub use document::{Document, Section};
pub use error::DocumentError;
