//! # msp-roadmap
//!
//! Command-line host for `roadmap-core`: argument parsing, threshold
//! configuration and text rendering. The binary in `main.rs` only sets up
//! logging and calls [`cli::execute`].

pub mod cli;
pub mod config;
pub mod display;
