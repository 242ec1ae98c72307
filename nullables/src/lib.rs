//! Nullable infrastructure for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern from RsNano.
//! Every external collaborator (confidential engine, clock, wallet) sits behind a
//! trait. This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests and the demo.

pub mod clock;
pub mod engine;
pub mod signer;

pub use clock::NullClock;
pub use engine::NullEngine;
pub use signer::NullSigner;
