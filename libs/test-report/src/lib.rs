//! Test-result aggregation and reporting.
//!
//! A [`Ledger`] accumulates pass/fail/skip outcomes while a test group runs,
//! and independent ledgers are merged into one aggregate by the runner.
//! [`render`] turns a ledger into the colorized console report.

pub mod ledger;
pub mod render;

pub use ledger::{Ledger, Outcome, Record, Summary};
