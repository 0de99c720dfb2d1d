//! Shared test utilities for the BookSwap domain crates
//!
//! - `TestDatabase`: PostgreSQL container with the workspace migrations applied (feature: "postgres")
//! - `TestDataBuilder`: deterministic ids and names derived from the test name
//! - `assertions`: assertion helpers with readable failure messages
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! #[ignore = "requires a container runtime"]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_postgres_test");
//!
//!     let owner = builder.user_id();
//!     let title = builder.name("book", "dune");
//! }
//! ```

use uuid::Uuid;

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Seeded generator for ids and names so that failures are reproducible.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from a hash of the test name.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_swap_transfers_owner");
    /// assert_eq!(builder.user_id(), TestDataBuilder::from_test_name("test_swap_transfers_owner").user_id());
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// The primary user of a test; same as `nth_user_id(0)`.
    pub fn user_id(&self) -> Uuid {
        self.nth_user_id(0)
    }

    /// A distinct, never-nil user id per index.
    pub fn nth_user_id(&self, index: u64) -> Uuid {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&self.seed.to_le_bytes());
        bytes[8..].copy_from_slice(&(index + 1).to_le_bytes());
        Uuid::from_bytes(bytes)
    }

    /// `"test-{prefix}-{seed}-{suffix}"`
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }
}

pub mod assertions {
    use uuid::Uuid;

    /// Order-insensitive comparison of two id sets.
    pub fn assert_same_ids(actual: impl IntoIterator<Item = Uuid>, expected: &[Uuid], context: &str) {
        let mut actual: Vec<Uuid> = actual.into_iter().collect();
        let mut expected = expected.to_vec();
        actual.sort();
        expected.sort();
        assert_eq!(actual, expected, "{}: id sets differ", context);
    }
}
