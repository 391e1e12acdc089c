//! Shared test utilities for the tokens-sync workspace.
//!
//! This crate provides standardised fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only — never
//! published.
//!
//! # Modules
//!
//! - [`store`] — in-memory [`DataProvider`]/[`TokenWriter`] backed by one
//!   shared state, so writes from one run are visible to the next
//! - [`document`] — interchange-document builder
//!
//! [`DataProvider`]: tokens_sync::DataProvider
//! [`TokenWriter`]: tokens_sync::TokenWriter

pub mod document;
pub mod store;

pub use document::DocumentBuilder;
pub use store::{CollectingSink, MemoryProvider, MemoryStore, MemoryWriter};

/// Install a formatting subscriber honouring `RUST_LOG`.
///
/// Safe to call from every test; only the first call wins.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
