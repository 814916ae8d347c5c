//! Human-readable renderings of trees and errors.

pub mod error;
pub mod tree;
