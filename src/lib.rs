//! UK Tax Calculation Engine
//!
//! This crate computes an individual's annual UK tax position (income tax,
//! National Insurance, student loan repayments, pension contributions and the
//! child benefit clawback) from gross earnings and a bundle of personal
//! circumstances, for every tax year in a versioned constants dataset and for
//! both the Scottish and rest-of-UK income tax regimes.

#![warn(missing_docs)]

pub mod analysis;
pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
