//! Fundamental types for the accord confidential governance ledger.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account and contract addresses, ciphertext handles, clear values, initiative
//! identifiers, key material, and timestamps.

pub mod address;
pub mod error;
pub mod handle;
pub mod id;
pub mod keys;
pub mod time;
pub mod value;

pub use address::Address;
pub use error::AccordError;
pub use handle::{BitWidth, CiphertextHandle, HandleRequest};
pub use id::InitiativeId;
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use time::{Clock, SystemClock, Timestamp, SECS_PER_DAY};
pub use value::ClearValue;
