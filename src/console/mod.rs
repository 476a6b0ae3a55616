//! Interactive console
//!
//! A line-oriented driver over the public board and search API.

pub mod session;

pub use session::{render, Console};
