//! Binshim Library
//!
//! Self-installing launcher shim: ensures a native companion executable is
//! installed from a remote tar.gz release, then executes it with forwarded
//! arguments, inherited stdio and a propagated exit code.

pub mod commands;
pub mod core;
pub mod error;
pub mod utils;
