//! macross: moving-average crossing signals for daily price histories.
//!
//! Hexagonal architecture: pure computation in [`domain`], collaborator
//! traits in [`ports`], file-backed implementations in [`adapters`], and the
//! command-line front end in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
