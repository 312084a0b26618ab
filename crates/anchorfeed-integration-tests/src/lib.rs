//! Integration test crate for the anchored price feed.
//!
//! This crate has no library code — it only contains integration tests
//! that exercise end-to-end pricing flows across multiple workspace crates.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p anchorfeed-integration-tests
//! ```
