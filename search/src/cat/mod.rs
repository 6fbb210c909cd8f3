//! The cat APIs, which respond with tables formatted for humans.

mod segments;
pub use segments::*;
