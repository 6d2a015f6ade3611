//! Shared types for the gempath playground.
//!
//! This crate defines the script AST, the grid map model, source
//! references, and the error taxonomy used across every pipeline stage.

pub mod ast;
mod error;
pub mod map;
mod source;

pub use error::{ErrorCategory, ErrorCode, GempathError};
pub use source::{SourceFile, SourceRef};

/// Result type used throughout the gempath pipeline.
pub type Result<T> = std::result::Result<T, GempathError>;
