// Utility functions
pub mod drive;
pub mod error;
pub mod ids;
pub mod validation;

pub use error::*;
