//! perflogic - statistically backed performance formulas
//!
//! This library evaluates boolean formulas whose leaves compare measured
//! execution-time samples (`A <= B`, `A = 2 * B`, ...). Each comparison is
//! decided by three hypothesis tests, and verdicts are propagated through
//! AND / OR / IMPLIES with three-valued logic so that inconclusive data stays
//! visible instead of being forced to true or false.

pub mod cancel;
pub mod cli;
pub mod clip;
pub mod comparison;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod flatten;
pub mod formula;
pub mod json_output;
pub mod logic;
pub mod report;
pub mod result;
pub mod sample; // Sample stores, lazy providers and the run-scoped cache
pub mod sample_file;
pub mod sink;
pub mod statistics;
