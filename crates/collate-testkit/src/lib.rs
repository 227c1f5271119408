//! # Collate Testkit
//!
//! Testing utilities for Collate.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Scenarios**: Scripted read/write sequences with expected outcomes,
//!   runnable against any [`Store`](collate_store::Store)
//! - **Generators**: Proptest strategies for keys, values, and tokens
//! - **Fixtures**: Ready-made stores (in-memory, on-disk in a temp dir) and
//!   a harness for racing concurrent writers
//!
//! ## Scenarios
//!
//! ```rust
//! use collate_store::MemoryStore;
//! use collate_testkit::scenario::{reference_scenario, run_scenario};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = MemoryStore::new();
//! run_scenario(&store, &reference_scenario()).await.unwrap();
//! # }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use collate_testkit::generators::WriteParams;
//!
//! proptest! {
//!     #[test]
//!     fn first_write_claims(params: WriteParams) {
//!         // ...
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use collate_testkit::fixtures::SqliteFixture;
//!
//! let fixture = SqliteFixture::new();
//! let fixture = fixture.reopen();
//! ```

pub mod fixtures;
pub mod generators;
pub mod scenario;

pub use fixtures::{contend, key, token, Claim, SqliteFixture};
pub use generators::WriteParams;
pub use scenario::{reference_scenario, run_scenario, Step, StepFailure};
