//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `instance-forge` command-line tool. Each subcommand lives in its own file
//! to keep the logic separated and maintainable.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and
//!   options, derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic, calling into the `instance_forge` library for the core
//!   work.

pub mod completions;
pub mod generate;
