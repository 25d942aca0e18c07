//! notecards CLI library.
//!
//! This crate provides the generator commands behind the `notecards` binary:
//! card building, deck and HTML writers, parallel image rendering and the
//! JSON run report.

pub mod card;
pub mod cli_args;
pub mod commands;
pub mod deck;
pub mod render;
pub mod report;
pub mod runner;
pub mod signal;
