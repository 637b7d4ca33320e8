//! Core math modules.

pub mod batch;
pub mod entropy;
pub mod hermite;
pub mod moments;
