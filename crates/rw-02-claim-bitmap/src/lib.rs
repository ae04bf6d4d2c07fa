//! # RW-02 Claim Bitmap Tracker
//!
//! Tells which historical rewards periods an account has already claimed.
//!
//! **Subsystem ID:** 02
//! **Architecture:** Hexagonal (pure scan + service over storage ports)
//!
//! Claims are recorded on chain as a bitmap: one 256-bit storage word per
//! 256 periods, keyed by account and word index. The scan is read-only.
//!
//! ## Module Structure
//!
//! ```text
//! rw-02-claim-bitmap/
//! ├── domain/          # ClaimStatus, ClaimBitmapError
//! ├── algorithms/      # get_claim_status, is_claimed
//! └── application/     # ClaimStatusService
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod application;
pub mod domain;

// Re-exports
pub use algorithms::{get_claim_status, is_claimed};
pub use application::ClaimStatusService;
pub use domain::{ClaimBitmapError, ClaimStatus, PERIODS_PER_WORD};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
