#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for wheel-scout
//!
//! This library consolidates all functionality for the wheel-scout tool, which discovers
//! Python wheel and source archives published across a wheel index server, GitHub releases,
//! and the `PyPI` registry, and catalogs them into a single provenance-keyed result set.
//!
//! # Module Organization
//!
//! - [`artifacts`]: Filename grammar, artifact records, result sets, and the catalog envelope
//! - [`sources`]: HTTP fetching, link extraction, discovery probes, and result aggregation
//! - [`reports`]: CSV, statistics, and console output derived from a catalog
//! - [`commands`]: Command-line interface and orchestration

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[cfg(any(debug_assertions, test))]
pub mod artifacts;
#[cfg(not(any(debug_assertions, test)))]
mod artifacts;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

#[cfg(any(debug_assertions, test))]
pub mod reports;
#[cfg(not(any(debug_assertions, test)))]
mod reports;

#[cfg(any(debug_assertions, test))]
pub mod sources;
#[cfg(not(any(debug_assertions, test)))]
mod sources;

pub use crate::commands::{Host, run};
