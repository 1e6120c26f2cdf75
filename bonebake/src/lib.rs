//! bonebake library
//!
//! Command definitions and output helpers behind the `bonebake` binary.

pub mod cli;
pub mod commands;
pub mod utils;
