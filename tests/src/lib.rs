//! # Merkle Rewards Test Suite
//!
//! Cross-subsystem flows that no single crate can exercise alone.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── publish_and_claim.rs   # generate → publish → download → resolve
//!     └── prehistory.rs          # periods served from the historical table
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p rw-tests
//! cargo bench -p rw-tests
//! ```

pub mod integration;
