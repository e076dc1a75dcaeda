//! Stub text serialization
//!
//! This module turns recognized constructs back into text:
//! - [`expression`] renders default values, type annotations and parameters
//! - [`stub`] renders whole declarations, recursing into class bodies

pub mod expression;
pub mod stub;

pub use expression::{render_expression, render_parameter, render_type, ParameterStyle};
pub use stub::StubWriter;
