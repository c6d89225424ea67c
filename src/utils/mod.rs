//! Utility functions for ttget

pub mod filename;

pub use filename::*;
