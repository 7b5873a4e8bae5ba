use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use studytest_core::model::{Test, TestDraft, TestId};

use crate::error::ProviderError;

/// Supplies validated tests to the session layer.
#[async_trait]
pub trait TestProvider: Send + Sync {
    /// Fetch a test by ID.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::NotFound` if missing, or other provider errors.
    async fn load_test(&self, id: &TestId) -> Result<Test, ProviderError>;
}

/// Decode and validate a test from its JSON draft form.
///
/// # Errors
///
/// Returns `ProviderError::Decode` for malformed JSON and
/// `ProviderError::InvalidTest` for structural problems.
pub fn decode_test(json: &str) -> Result<Test, ProviderError> {
    let draft: TestDraft =
        serde_json::from_str(json).map_err(|e| ProviderError::Decode(e.to_string()))?;
    Ok(draft.validate()?)
}

/// Test provider backed by a map, for the CLI and tests.
#[derive(Clone, Default)]
pub struct InMemoryTestProvider {
    tests: Arc<Mutex<HashMap<TestId, Test>>>,
}

impl InMemoryTestProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a provider holding a single test.
    #[must_use]
    pub fn with_test(test: Test) -> Self {
        let mut tests = HashMap::new();
        tests.insert(test.id().clone(), test);
        Self {
            tests: Arc::new(Mutex::new(tests)),
        }
    }

    /// Store or replace a test.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unavailable` if the map lock is poisoned.
    pub fn insert(&self, test: Test) -> Result<(), ProviderError> {
        let mut guard = self
            .tests
            .lock()
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        guard.insert(test.id().clone(), test);
        Ok(())
    }

    /// Validate a draft and store the resulting test.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InvalidTest` if validation fails.
    pub fn insert_draft(&self, draft: TestDraft) -> Result<TestId, ProviderError> {
        let test = draft.validate()?;
        let id = test.id().clone();
        self.insert(test)?;
        Ok(id)
    }
}

#[async_trait]
impl TestProvider for InMemoryTestProvider {
    async fn load_test(&self, id: &TestId) -> Result<Test, ProviderError> {
        let guard = self
            .tests
            .lock()
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        guard
            .get(id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(id.clone()))
    }
}
