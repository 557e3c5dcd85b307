//! Command line interface for Examine.

pub mod args;
pub mod commands;
pub mod output;
