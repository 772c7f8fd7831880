//! Unit tests for configuration loading and precedence.
//!
//! Tests are organised into modules by functional area:
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence and environment parsing tests
//! - `discovery`: Configuration file discovery tests
//! - `field_resolution`: API key, instructions, and column resolution tests
//! - `validation`: Configuration consistency validation tests

mod discovery;
mod helpers;
