//! # Instance Forge Library
//!
//! This library provides the core functionality for generating isolated
//! per-tenant deployment instances of a compiled application from one build
//! artifact. It is designed to be used by the `instance-forge` command-line
//! tool but can also be driven directly by other applications.
//!
//! ## Quick Example
//!
//! ```no_run
//! use instance_forge::{config, generator};
//!
//! let cfg = config::from_file("instances-config.json").unwrap();
//! let report = generator::run(&cfg).unwrap();
//! println!(
//!     "generated {}/{} instances",
//!     report.succeeded_count(),
//!     report.total()
//! );
//! ```
//!
//! ## Core Concepts
//!
//! The library is built around a few key concepts:
//!
//! - **Configuration (`config`)**: the `instances-config.json` schema — one
//!   `GeneratorConfig` per run, holding the instance descriptors, exclusion
//!   patterns and always-copy list, plus pre-flight validation.
//! - **Exclusion Matching (`matcher`)**: decides whether a file or directory
//!   name matches an exclusion pattern (exact basename or path suffix,
//!   case-insensitive; deliberately no globbing).
//! - **Tree Replication (`replicate`)**: walks the build output and
//!   reproduces it under each instance directory, skipping excluded entries
//!   and choosing a text or binary copy strategy per file.
//! - **Settings Patching (`settings`)**: derives each instance's
//!   `appsettings.json` from the shared base template via fixed structural
//!   overrides plus colon-addressed free-form overrides.
//! - **Script Generation (`scripts`)**: per-instance startup scripts and the
//!   run-wide pm2 command artifacts.
//! - **Orchestration (`generator`)**: sequences the above per instance,
//!   collects per-instance outcomes, and produces the final `RunReport`.
//!
//! ## Execution Flow
//!
//! `generator::run` executes the following high-level steps:
//!
//! 1.  **Validation**: check paths, templates, and folder-name uniqueness
//!     before touching the filesystem.
//! 2.  **Replication**: copy the filtered build tree into each instance
//!     directory, then the unconditional extras.
//! 3.  **Settings**: re-read the base template, patch it for the instance,
//!     and write the result.
//! 4.  **Scripts**: write the instance startup scripts.
//! 5.  **Aggregate artifacts**: best-effort pm2 command files covering every
//!     instance.
//!
//! Instances are independent: a failure in one is recorded and the run moves
//! on to the next.

pub mod config;
pub mod error;
pub mod generator;
pub mod matcher;
pub mod output;
pub mod replicate;
pub mod scripts;
pub mod settings;

#[cfg(test)]
mod matcher_proptest;
