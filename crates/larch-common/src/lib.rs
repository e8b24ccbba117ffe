//! Common utilities for the Larch parser.
//!
//! This crate provides shared infrastructure used by the parser components:
//! - **Warning System** - colored, de-duplicated terminal output for recoverable
//!   parse problems, optionally mirrored into a log file

pub mod warning;
