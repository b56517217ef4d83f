#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for promruval
//!
//! This library holds all the functionality of the promruval tool, which
//! validates Prometheus rule files against user-defined validation rules.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and orchestration
//! - [`config`]: Validation configuration file model
//! - [`rules`]: Assembly of the validation rules to run
//! - [`files`]: Expansion of path patterns into rule files
//! - [`rulefile`]: Prometheus rule file model
//! - [`validators`]: Individual checks and their factory
//! - [`validate`]: Execution of validation rules over rule files
//! - [`prometheus`]: Caching client for the Prometheus query API
//! - [`reports`]: Validation report model and renderers
//! - [`docs`]: Human readable documentation of the validation rules

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

#[cfg(any(debug_assertions, test))]
pub mod config;
#[cfg(not(any(debug_assertions, test)))]
mod config;

#[cfg(any(debug_assertions, test))]
pub mod docs;
#[cfg(not(any(debug_assertions, test)))]
mod docs;

#[cfg(any(debug_assertions, test))]
pub mod files;
#[cfg(not(any(debug_assertions, test)))]
mod files;

#[cfg(any(debug_assertions, test))]
pub mod prometheus;
#[cfg(not(any(debug_assertions, test)))]
mod prometheus;

#[cfg(any(debug_assertions, test))]
pub mod reports;
#[cfg(not(any(debug_assertions, test)))]
mod reports;

#[cfg(any(debug_assertions, test))]
pub mod rulefile;
#[cfg(not(any(debug_assertions, test)))]
mod rulefile;

#[cfg(any(debug_assertions, test))]
pub mod rules;
#[cfg(not(any(debug_assertions, test)))]
mod rules;

#[cfg(any(debug_assertions, test))]
pub mod validate;
#[cfg(not(any(debug_assertions, test)))]
mod validate;

#[cfg(any(debug_assertions, test))]
pub mod validators;
#[cfg(not(any(debug_assertions, test)))]
mod validators;

pub use crate::commands::{Host, run};
