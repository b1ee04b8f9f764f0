//! Disco command-line front end
//!
//! Configuration, argument parsing and text rendering shared by the `disco`
//! binary.

pub mod args;
pub mod config;
pub mod error;
pub mod output;
