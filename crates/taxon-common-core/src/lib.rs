//! Taxon common core types and utilities.

pub mod error;

pub use error::{Error, ErrorCode, Result};
