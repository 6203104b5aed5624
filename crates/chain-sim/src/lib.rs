//! Bloom Chain Simulator
//!
//! An in-memory stand-in for the BloomNFT contract, driven by a
//! [`ManualClock`](bloom_clock::ManualClock) so auction deadlines can be
//! reached instantly.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────┐   AuctionReader
//!   │    SimulatedChain    │◄──────────────── read-models
//!   │ tokens │ auctions    │
//!   │ fees   │ receipts    │   AuctionWriter
//!   └──────────▲───────────┘◄──────────────── SimAccount (one per sender)
//!              │ now()
//!        ManualClock
//! ```
//!
//! Writes follow the contract's rules (ownership, deadlines, bid floors) and
//! fail with a [`SimError`] that surfaces to callers as
//! [`ContractError::Reverted`](bloom_ports::ContractError::Reverted).
//! Reads can be made to fail on purpose to exercise error paths.

pub mod chain;
pub mod demo;
pub mod error;
pub mod metadata;

// Re-export main types for convenience
pub use chain::{SimAccount, SimulatedChain};
pub use demo::{DemoAccounts, seed_demo};
pub use error::SimError;
pub use metadata::StaticMetadata;
