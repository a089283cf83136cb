//! Concurrent per-symbol retrieval with isolated failures.
//!
//! All fetches are started together on the calling task and awaited with
//! [`join_all`], which settles every future and never short-circuits. Each
//! outcome stays in the slot of its input position, so the partition into
//! successes and failures follows the request order whatever order the
//! responses arrive in.

use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::{
    models::{AggregationResult, Series, Symbol},
    providers::{ClientError, SeriesSource, TimeoutSnafu},
};

pub struct Aggregator<'a, S: ?Sized> {
    source: &'a S,
    fetch_timeout: Option<Duration>,
}

impl<'a, S: SeriesSource + ?Sized> Aggregator<'a, S> {
    /// An aggregator that waits for each fetch as long as it takes.
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            fetch_timeout: None,
        }
    }

    /// Fails any single fetch that has not settled after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    async fn fetch_one(&self, symbol: &Symbol, as_of: DateTime<Utc>) -> Result<Series, ClientError> {
        let fetch = self.source.fetch_series(symbol, as_of);
        match self.fetch_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, fetch).await {
                Ok(outcome) => outcome,
                Err(_) => TimeoutSnafu { timeout }.fail(),
            },
            None => fetch.await,
        }
    }

    /// Fetches every symbol and partitions the outcomes.
    ///
    /// An empty `symbols` returns an empty result without touching the source.
    pub async fn aggregate(&self, symbols: &[Symbol], as_of: DateTime<Utc>) -> AggregationResult {
        if symbols.is_empty() {
            debug!("no symbols to aggregate");
            return AggregationResult::default();
        }

        let outcomes = join_all(symbols.iter().map(|symbol| self.fetch_one(symbol, as_of))).await;

        let mut result = AggregationResult::default();
        for (symbol, outcome) in symbols.iter().zip(outcomes) {
            match outcome {
                Ok(series) => result.series.push(series),
                Err(error) => {
                    warn!(%symbol, kind = ?error.kind(), %error, "failed to fetch series");
                    result.failed.insert(symbol.clone());
                }
            }
        }

        // A symbol requested twice may have failed once and succeeded once; the
        // success wins so the two halves stay disjoint.
        if !result.failed.is_empty() {
            for series in &result.series {
                result.failed.remove(&series.symbol);
            }
        }

        info!(
            requested = symbols.len(),
            succeeded = result.series.len(),
            failed = result.failed.len(),
            "aggregated series"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::{HashMap, HashSet},
        sync::atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;
    use chrono::TimeZone;
    use proptest::prelude::*;

    use crate::{
        models::Point,
        providers::{FailureKind, ServerSnafu},
    };

    use super::*;

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 20, 16, 0, 0).unwrap()
    }

    fn symbols(names: &[&str]) -> Vec<Symbol> {
        names.iter().copied().map(Symbol::from).collect()
    }

    /// Answers after a per-symbol delay; symbols in `failing` get a server error.
    #[derive(Default)]
    struct ScriptedSource {
        delays_ms: HashMap<String, u64>,
        failing: HashSet<String>,
        hang: HashSet<String>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn failing(names: &[&str]) -> Self {
            Self {
                failing: names.iter().map(|s| s.to_string()).collect(),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl SeriesSource for ScriptedSource {
        async fn fetch_series(
            &self,
            symbol: &Symbol,
            as_of: DateTime<Utc>,
        ) -> Result<Series, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.hang.contains(symbol.as_str()) {
                std::future::pending::<()>().await;
            }
            if let Some(ms) = self.delays_ms.get(symbol.as_str()) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            if self.failing.contains(symbol.as_str()) {
                return ServerSnafu {
                    url: format!("http://backend/stocks/{symbol}"),
                    message: "upstream unavailable",
                }
                .fail();
            }
            Ok(Series::new(symbol.clone(), vec![Point::new(as_of, 42.0)]))
        }
    }

    fn succeeded(result: &AggregationResult) -> Vec<&str> {
        result.succeeded().map(Symbol::as_str).collect()
    }

    fn failed(result: &AggregationResult) -> Vec<&str> {
        result.failed.iter().map(Symbol::as_str).collect()
    }

    #[tokio::test]
    async fn all_succeed_in_input_order() {
        let source = ScriptedSource::default();
        let result = Aggregator::new(&source)
            .aggregate(&symbols(&["AAA", "BBB"]), as_of())
            .await;

        assert_eq!(succeeded(&result), ["AAA", "BBB"]);
        assert!(result.failed.is_empty());
    }

    #[tokio::test]
    async fn partial_failure_is_isolated() {
        let source = ScriptedSource::failing(&["BBB"]);
        let result = Aggregator::new(&source)
            .aggregate(&symbols(&["AAA", "BBB", "CCC"]), as_of())
            .await;

        assert_eq!(succeeded(&result), ["AAA", "CCC"]);
        assert_eq!(failed(&result), ["BBB"]);
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn empty_input_issues_no_request() {
        let source = ScriptedSource::default();
        let result = Aggregator::new(&source).aggregate(&[], as_of()).await;

        assert_eq!(result, AggregationResult::default());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn completion_order_does_not_change_result_order() {
        // First symbol answers last.
        let source = ScriptedSource {
            delays_ms: [("AAA", 60), ("BBB", 30), ("CCC", 0)]
                .into_iter()
                .map(|(s, ms)| (s.to_string(), ms))
                .collect(),
            ..ScriptedSource::default()
        };
        let result = Aggregator::new(&source)
            .aggregate(&symbols(&["AAA", "BBB", "CCC"]), as_of())
            .await;

        assert_eq!(succeeded(&result), ["AAA", "BBB", "CCC"]);
    }

    #[tokio::test]
    async fn fetches_run_concurrently() {
        let source = ScriptedSource {
            delays_ms: ["AAA", "BBB", "CCC", "DDD"]
                .into_iter()
                .map(|s| (s.to_string(), 100))
                .collect(),
            ..ScriptedSource::default()
        };

        let started = std::time::Instant::now();
        let result = Aggregator::new(&source)
            .aggregate(&symbols(&["AAA", "BBB", "CCC", "DDD"]), as_of())
            .await;

        assert_eq!(result.series.len(), 4);
        // Sequential would take 400ms.
        assert!(started.elapsed() < Duration::from_millis(350));
    }

    #[tokio::test]
    async fn hung_fetch_times_out_without_blocking_siblings() {
        let source = ScriptedSource {
            hang: ["BBB".to_string()].into_iter().collect(),
            ..ScriptedSource::default()
        };

        let result = Aggregator::new(&source)
            .with_timeout(Duration::from_millis(50))
            .aggregate(&symbols(&["AAA", "BBB", "CCC"]), as_of())
            .await;

        assert_eq!(succeeded(&result), ["AAA", "CCC"]);
        assert_eq!(failed(&result), ["BBB"]);
    }

    #[tokio::test]
    async fn timeout_error_is_a_network_failure() {
        let source = ScriptedSource {
            hang: ["AAA".to_string()].into_iter().collect(),
            ..ScriptedSource::default()
        };
        let aggregator = Aggregator::new(&source).with_timeout(Duration::from_millis(10));

        let err = aggregator.fetch_one(&"AAA".into(), as_of()).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Network);
    }

    #[tokio::test]
    async fn duplicates_produce_duplicate_series() {
        let source = ScriptedSource::default();
        let result = Aggregator::new(&source)
            .aggregate(&symbols(&["AAA", "AAA"]), as_of())
            .await;

        assert_eq!(succeeded(&result), ["AAA", "AAA"]);
    }

    /// Fails the first call for every symbol, succeeds afterwards.
    #[derive(Default)]
    struct FlakyOnce {
        seen: std::sync::Mutex<HashSet<String>>,
    }

    #[async_trait]
    impl SeriesSource for FlakyOnce {
        async fn fetch_series(
            &self,
            symbol: &Symbol,
            as_of: DateTime<Utc>,
        ) -> Result<Series, ClientError> {
            let first = self.seen.lock().unwrap().insert(symbol.to_string());
            if first {
                return ServerSnafu {
                    url: "http://backend",
                    message: "cold cache",
                }
                .fail();
            }
            Ok(Series::new(symbol.clone(), vec![Point::new(as_of, 1.0)]))
        }
    }

    #[tokio::test]
    async fn duplicate_that_fails_once_is_not_reported_failed() {
        let source = FlakyOnce::default();
        let result = Aggregator::new(&source)
            .aggregate(&symbols(&["AAA", "AAA"]), as_of())
            .await;

        assert_eq!(succeeded(&result), ["AAA"]);
        assert!(result.failed.is_empty());
    }

    proptest! {
        #[test]
        fn partition_covers_input_and_keeps_order(
            picks in proptest::collection::vec((0usize..8, any::<bool>()), 0..12)
        ) {
            // Each name has a fixed outcome so duplicates behave consistently.
            let names: Vec<String> = picks.iter().map(|(i, _)| format!("S{i}")).collect();
            let failing: HashSet<String> = picks
                .iter()
                .filter(|(_, fail)| *fail)
                .map(|(i, _)| format!("S{i}"))
                .collect();
            let input: Vec<Symbol> = names.iter().map(|n| Symbol::from(n.as_str())).collect();

            let source = ScriptedSource { failing: failing.clone(), ..ScriptedSource::default() };
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .unwrap();
            let result = runtime.block_on(Aggregator::new(&source).aggregate(&input, as_of()));

            let ok: HashSet<&Symbol> = result.succeeded().collect();
            let bad: HashSet<&Symbol> = result.failed.iter().collect();
            let all: HashSet<&Symbol> = input.iter().collect();

            prop_assert!(ok.is_disjoint(&bad));
            prop_assert_eq!(ok.union(&bad).copied().collect::<HashSet<_>>(), all);

            let expected: Vec<&Symbol> = input
                .iter()
                .filter(|s| !failing.contains(s.as_str()))
                .collect();
            prop_assert_eq!(result.succeeded().collect::<Vec<_>>(), expected);
        }
    }
}
