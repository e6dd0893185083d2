//! Annomig (Annotation Migrator) - a command-line tool for migrating dashboard
//! annotation queries to the current nested-target shape
//!
//! This library provides the core functionality for Annomig, including:
//! - Typed models for annotation query configuration
//! - Shape classification and migration of legacy annotation records
//! - Dashboard document walking (the `annotations.list` array)
//! - CLI command parsing and execution
//!
//! # Example
//!
//! ```no_run
//! use annomig::cli::run;
//!
//! fn main() {
//!     if let Err(e) = run() {
//!         eprintln!("Error: {}", e);
//!         std::process::exit(1);
//!     }
//! }
//! ```

pub mod models;
pub mod migrate;
pub mod cli;
