//! Core domain types and logic.

pub mod price;
pub mod indicator;
pub mod crossing;
pub mod intersection;
pub mod batch;
pub mod signal;
pub mod signal_table;
pub mod portfolio;
pub mod simulator;
pub mod backtest;
pub mod config_validation;
pub mod error;
