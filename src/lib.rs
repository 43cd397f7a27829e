//! # Scribe
//!
//! Command line harness around the scribe core: loads a commit request,
//! runs the batch and reports the outcome as a ready/not-ready result with a
//! severity and a human-readable reason.

pub mod cli;
pub mod report;
