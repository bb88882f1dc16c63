//! Validation framework for request payloads.

pub mod rules;

pub use validator::Validate;
