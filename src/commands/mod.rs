//! CLI command implementations for vartier.
//!
//! This module contains all the command implementations for the vartier CLI
//! tool. Each submodule implements a specific command.
//!
//! # Command Categories
//!
//! ## Reporting
//! - [`report`] - Per-sample variant tiering reports with cohort statistics
//! - [`enumerate`] - Cohort-wide distinct variant enumeration

// Blanket clippy pedantic allows for command implementations.
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::unused_self,
    clippy::unnecessary_wraps,
    clippy::needless_pass_by_value,
    clippy::too_many_lines,
    clippy::redundant_closure_for_method_calls,
    clippy::uninlined_format_args
)]

pub mod command;
pub mod common;
pub mod enumerate;
pub mod report;
