use crate::search_field::domain::models::Candidate;
use crate::search_field::error::{LookupError, LookupResult};
use anyhow::{Context, Result};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// Source of candidates for a search field
///
/// `lookup` may be called again while an earlier call is still running; the
/// field discards stale answers itself, so providers need not serialize or
/// cancel their own calls.
pub trait LookupProvider: Send + Sync + 'static {
    fn lookup(&self, query: &str, limit: usize) -> BoxFuture<'static, LookupResult<Vec<Candidate>>>;
}

/// In-memory patient directory with optional simulated latency and outages
pub struct DirectoryLookup {
    records: Arc<Vec<Candidate>>,
    latency: Duration,
    fail_every: Option<u64>,
    calls: AtomicU64,
}

impl DirectoryLookup {
    pub fn new(records: Vec<Candidate>) -> Self {
        Self {
            records: Arc::new(records),
            latency: Duration::ZERO,
            fail_every: None,
            calls: AtomicU64::new(0),
        }
    }

    /// Load a JSON array of patient records
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read directory file {}", path.display()))?;
        let records: Vec<Candidate> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse directory file {}", path.display()))?;
        Ok(Self::new(records))
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make every n-th call fail, to exercise the silent-failure path
    pub fn with_fail_every(mut self, n: u64) -> Self {
        self.fail_every = (n > 0).then_some(n);
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

impl LookupProvider for DirectoryLookup {
    fn lookup(&self, query: &str, limit: usize) -> BoxFuture<'static, LookupResult<Vec<Candidate>>> {
        let call = self.calls.fetch_add(1, Ordering::Relaxed) + 1;
        let records = Arc::clone(&self.records);
        let needle = query.trim().to_lowercase();
        let latency = self.latency;
        let fail = self.fail_every.is_some_and(|n| call % n == 0);

        async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            if fail {
                return Err(LookupError::Unavailable(format!(
                    "simulated outage on call {call}"
                )));
            }
            let matches: Vec<Candidate> = records
                .iter()
                .filter(|candidate| candidate.matches(&needle))
                .take(limit)
                .cloned()
                .collect();
            debug!(call, query = %needle, found = matches.len(), "directory lookup finished");
            Ok(matches)
        }
        .boxed()
    }
}

/// Small built-in directory used when no file is given
pub fn sample_directory() -> Vec<Candidate> {
    use chrono::NaiveDate;

    let dob = |y, m, d| NaiveDate::from_ymd_opt(y, m, d);
    let mut records = vec![
        Candidate::new("1", "John", "Smith")
            .with_national_id("10000000146")
            .with_phone("555-0100"),
        Candidate::new("2", "Jane", "Smithson").with_national_id("10000000278"),
        Candidate::new("3", "Ayse", "Yilmaz")
            .with_national_id("10000000302")
            .with_phone("555-0133"),
        Candidate::new("4", "Mehmet", "Kaya").with_national_id("10000000414"),
        Candidate::new("5", "Alan", "Turing").with_national_id("10000000526"),
        Candidate::new("6", "Alice", "Aldridge")
            .with_national_id("10000000638")
            .with_phone("555-0166"),
        Candidate::new("7", "Elif", "Sahin").with_national_id("10000000740"),
        Candidate::new("8", "Can", "Demir").with_national_id("10000000852"),
    ];
    let births = [
        dob(1980, 4, 12),
        dob(1992, 11, 3),
        dob(1975, 1, 30),
        None,
        dob(1954, 6, 23),
        dob(2001, 9, 9),
        dob(1968, 2, 29),
        None,
    ];
    for (record, born) in records.iter_mut().zip(births) {
        record.date_of_birth = born;
    }
    records
}
