//! Download system for ttget

pub mod downloader;

pub use downloader::*;
