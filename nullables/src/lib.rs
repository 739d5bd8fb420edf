//! Nullable infrastructure for deterministic testing.
//!
//! The ledger is abstracted behind the `Provider` trait. This crate provides
//! an in-memory implementation that:
//! - Returns deterministic ids, heights and timestamps
//! - Can be controlled programmatically (mine blocks, inject failures)
//! - Never touches the network
//!
//! Usage: swap a real explorer client for [`NullProvider`] in tests.

pub mod provider;

pub use provider::NullProvider;
