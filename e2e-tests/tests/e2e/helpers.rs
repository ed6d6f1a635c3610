use comment_guard::classifier::{EndpointDescriptor, HttpClassifier, RetryPolicy};
use comment_guard::detector::SpamDetector;
use comment_guard::patterns::PatternStore;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use super::stub_provider::StubProvider;

/// Promotional comment with a site name, a deposit offer and a contact handle
pub const CASINO_TEXT: &str = "สมัครคาสิโนฝาก100ถอนไม่อั้น @lineid99";

/// Store file seeded with one site-name pattern
pub const SEED_STORE: &str = r#"[
  {
    "pattern": "คาสิโน",
    "type": "gambling_site_name",
    "added_date": "2024-01-01 00:00:00"
  },
  {
    "pattern": "promo",
    "type": "gambling",
    "added_date": "2024-01-01 00:00:00"
  }
]"#;

/// Test environment: a seeded pattern store in a temporary directory
pub struct TestEnv {
    pub dir: TempDir,
    pub store_path: PathBuf,
    pub store: Arc<PatternStore>,
}

impl TestEnv {
    pub async fn seeded() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let store_path = dir.path().join("spam_patterns_db.json");
        std::fs::write(&store_path, SEED_STORE).expect("seed store");

        let store = Arc::new(PatternStore::load(store_path.clone()).await);
        Self {
            dir,
            store_path,
            store,
        }
    }

    /// Detector talking to `stub` as `provider`
    pub fn detector(&self, stub: &StubProvider, provider: &str) -> SpamDetector {
        self.detector_with(stub, provider, Duration::from_secs(5), RetryPolicy::default())
    }

    pub fn detector_with(
        &self,
        stub: &StubProvider,
        provider: &str,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> SpamDetector {
        let endpoint = EndpointDescriptor::new(provider, stub.base_url.clone()).with_api_key("sk-test");
        let classifier = Arc::new(HttpClassifier::new(timeout).with_retry(retry));
        SpamDetector::new(self.store.clone(), classifier, endpoint)
    }

    /// Store file as currently on disk
    pub fn stored_file(&self) -> String {
        std::fs::read_to_string(&self.store_path).expect("read store file")
    }
}
