//! Process-wide cache of temporal distributions with single-flight fetches.

use crate::distribution::{DistributionSource, TemporalDistribution};
use crate::error::{Result, Tr55Error};
use crate::storm::StormDuration;
use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::OnceCell;

/// Default deadline for resolving an uncached distribution
const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(45);

/// Keyed store of temporal distributions, one entry per duration category.
///
/// The first load of a duration fetches from the source; concurrent first
/// loads coalesce onto a single fetch and all callers observe the same
/// cached value. A failed fetch leaves the entry empty, so a later request
/// may retry. Cached distributions are immutable and shared as `Arc`s.
pub struct DistributionStore<S> {
    source: S,
    fetch_timeout: Duration,
    cells: Mutex<HashMap<StormDuration, Arc<OnceCell<Arc<TemporalDistribution>>>>>,
}

impl<S: DistributionSource> DistributionStore<S> {
    pub fn new(source: S) -> DistributionStore<S> {
        DistributionStore::with_timeout(source, DEFAULT_FETCH_TIMEOUT)
    }

    pub fn with_timeout(source: S, fetch_timeout: Duration) -> DistributionStore<S> {
        DistributionStore {
            source,
            fetch_timeout,
            cells: Mutex::new(HashMap::new()),
        }
    }

    /// Resolves the distribution for `duration_hours`, fetching on first use.
    ///
    /// # Errors
    ///
    /// `UnsupportedDuration` when the hour count is not a supported category;
    /// `SourceUnavailable` when the fetch fails or exceeds the deadline;
    /// `InvalidDistribution` when the source returns malformed data.
    pub async fn load(&self, duration_hours: f64) -> Result<Arc<TemporalDistribution>> {
        let duration = StormDuration::from_hours(duration_hours)
            .ok_or(Tr55Error::UnsupportedDuration(duration_hours))?;

        // The map lock is never held across an await; the cell is cloned out
        // so waiters park on the cell itself.
        let cell = {
            let mut cells = self.cells.lock().unwrap();
            Arc::clone(cells.entry(duration).or_default())
        };

        let distribution = cell
            .get_or_try_init(|| async move {
                debug!(
                    "fetching temporal distribution for the {}-hour storm",
                    duration.hours()
                );
                match tokio::time::timeout(self.fetch_timeout, self.source.fetch(duration)).await {
                    Ok(result) => result.map(Arc::new),
                    Err(_) => Err(Tr55Error::SourceUnavailable(format!(
                        "fetch exceeded {:?} deadline",
                        self.fetch_timeout
                    ))),
                }
            })
            .await?;

        Ok(Arc::clone(distribution))
    }
}

#[cfg(test)]
mod tests {
    use super::DistributionStore;
    use crate::distribution::{DistributionSource, TemporalDistribution};
    use crate::error::{Result, Tr55Error};
    use crate::storm::StormDuration;
    use futures::future::join_all;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    const SMALL_TABLE: &str = "time_fraction,cumulative_fraction\n0.0,0.0\n0.5,0.4\n1.0,1.0\n";

    /// Source that counts fetches and can be made slow or initially failing
    struct CountingSource {
        calls: AtomicUsize,
        delay: Duration,
        failures_before_success: usize,
    }

    impl CountingSource {
        fn new(delay: Duration) -> CountingSource {
            CountingSource {
                calls: AtomicUsize::new(0),
                delay,
                failures_before_success: 0,
            }
        }

        fn failing_first(failures: usize) -> CountingSource {
            CountingSource {
                calls: AtomicUsize::new(0),
                delay: Duration::from_millis(1),
                failures_before_success: failures,
            }
        }
    }

    impl DistributionSource for CountingSource {
        async fn fetch(&self, duration: StormDuration) -> Result<TemporalDistribution> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if call < self.failures_before_success {
                return Err(Tr55Error::SourceUnavailable("simulated outage".into()));
            }
            TemporalDistribution::from_csv(duration, SMALL_TABLE)
        }
    }

    #[tokio::test]
    async fn concurrent_loads_coalesce_to_one_fetch() {
        let store = DistributionStore::new(CountingSource::new(Duration::from_millis(20)));
        let results = join_all((0..8).map(|_| store.load(6.0))).await;

        let loaded: Vec<Arc<TemporalDistribution>> =
            results.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(store.source.calls.load(Ordering::SeqCst), 1);
        for other in &loaded[1..] {
            assert!(Arc::ptr_eq(&loaded[0], other));
        }
    }

    #[tokio::test]
    async fn repeated_loads_hit_the_cache() {
        let store = DistributionStore::new(CountingSource::new(Duration::from_millis(1)));
        let first = store.load(24.0).await.unwrap();
        let second = store.load(24.0).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn durations_are_cached_independently() {
        let store = DistributionStore::new(CountingSource::new(Duration::from_millis(1)));
        store.load(6.0).await.unwrap();
        store.load(24.0).await.unwrap();
        assert_eq!(store.source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unsupported_duration_is_rejected_without_fetching() {
        let store = DistributionStore::new(CountingSource::new(Duration::from_millis(1)));
        let result = store.load(12.0).await;
        assert!(matches!(result, Err(Tr55Error::UnsupportedDuration(h)) if h == 12.0));
        assert_eq!(store.source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_fetch_is_not_cached() {
        let store = DistributionStore::new(CountingSource::failing_first(1));
        let first = store.load(6.0).await;
        assert!(matches!(first, Err(Tr55Error::SourceUnavailable(_))));

        let second = store.load(6.0).await;
        assert!(second.is_ok());
        assert_eq!(store.source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn slow_fetch_times_out_as_source_unavailable() {
        let store = DistributionStore::with_timeout(
            CountingSource::new(Duration::from_secs(30)),
            Duration::from_millis(10),
        );
        let result = store.load(6.0).await;
        assert!(matches!(result, Err(Tr55Error::SourceUnavailable(_))));
    }
}
