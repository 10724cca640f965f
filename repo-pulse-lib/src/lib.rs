#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for repo-pulse
//!
//! This library consolidates all functionality for the repo-pulse tool, which reports
//! how active a hosted repository has been over a date window.
//!
//! # Module Organization
//!
//! - [`activity`]: Paginated fetching, window classification, and per-kind tallying
//! - [`commands`]: Command-line interface and orchestration
//! - [`reports`]: Console and JSON rendering of finished reports

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod activity;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

#[cfg(any(debug_assertions, test))]
pub mod reports;
#[cfg(not(any(debug_assertions, test)))]
mod reports;

pub use crate::commands::{Host, run};
