//! # CLI Layer
//!
//! One client of the vista core, and the only place that knows about the
//! terminal: argument parsing, colors, stdout/stderr and exit codes.
//!
//! Every handler gets an `Outcome` from the API and hands it to a single
//! output path. With `--json` the outcome is printed as-is; otherwise the
//! data is rendered for humans and failures go to stderr in red. Either way
//! a failed outcome exits with status 1.

pub mod commands;
mod render;
mod setup;
