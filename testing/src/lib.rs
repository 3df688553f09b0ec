//! # Bookstore Testing
//!
//! Test support for the bookstore backend.
//!
//! This crate provides:
//! - [`InMemoryBookstore`]: one in-memory value implementing every store
//!   trait, with the same ordering, filtering and failure semantics as the
//!   `PostgreSQL` stores
//! - Deterministic clocks
//! - Fixture builders for books, categories and addresses
//! - proptest strategies for catalog data
//!
//! ## Example
//!
//! ```ignore
//! use bookstore_testing::{InMemoryBookstore, fixtures};
//! use bookstore_core::book::BookQuery;
//! use bookstore_core::Pagination;
//! use bookstore_core::store::BookStore;
//!
//! #[tokio::test]
//! async fn lists_seeded_books() {
//!     let store = InMemoryBookstore::new();
//!     store.insert_book(fixtures::book(1, "Dune", 1));
//!
//!     let page = store.list_books(&BookQuery::new(Pagination::default())).await.unwrap();
//!     assert_eq!(page.total, 1);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use chrono::{DateTime, Utc};

pub mod fixtures;
pub mod memory;
pub mod properties;

pub use memory::InMemoryBookstore;

/// Deterministic clocks.
pub mod mocks {
    use super::{DateTime, Utc};
    use bookstore_core::environment::Clock;
    use std::sync::{Mutex, PoisonError};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use bookstore_testing::mocks::FixedClock;
    /// use bookstore_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that moves forward one second on every reading.
    ///
    /// Gives successive writes distinct, increasing timestamps so that
    /// "newest first" orderings are observable in tests.
    #[derive(Debug)]
    pub struct SteppingClock {
        next: Mutex<DateTime<Utc>>,
    }

    impl SteppingClock {
        /// Start at the given time.
        #[must_use]
        pub const fn starting_at(time: DateTime<Utc>) -> Self {
            Self {
                next: Mutex::new(time),
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let mut next = self.next.lock().unwrap_or_else(PoisonError::into_inner);
            let now = *next;
            *next = now + chrono::Duration::seconds(1);
            now
        }
    }

    /// 2025-01-01 00:00:00 UTC, the epoch of every test clock.
    #[must_use]
    pub fn test_epoch() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_735_689_600, 0).unwrap_or_default()
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(test_epoch())
    }
}

/// Install a `tracing` subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs anything.
/// The filter comes from `RUST_LOG`, defaulting to `warn`.
pub fn init_test_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{FixedClock, SteppingClock, test_clock, test_epoch};
