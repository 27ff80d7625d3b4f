//! Pipeline coordinator.
//!
//! Every ticker runs `Fetch -> Analyze -> Predict -> Done` in its own task.
//! Tasks share nothing mutable; the coordinator gathers their reports and
//! lays the outcomes out in input order.

use chrono::{DateTime, Utc};
use newsflow_core::error::PipelineError;
use newsflow_core::market::is_us_market_open;
use newsflow_core::traits::{PriceSeriesProvider, SentimentProvider};
use newsflow_core::types::{FetchWindow, SignalOutcome, SkippedTicker, TradingSignal};
use newsflow_impact::ImpactScorer;
use newsflow_indicators::IndicatorEngine;
use newsflow_signals::{AnalyzedTicker, SignalGenerator};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::retry::RetryPolicy;
use crate::stage::Stage;

/// Result of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct SignalBatch {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub window: FetchWindow,
    /// Whether the US regular session was open when the run started
    pub market_open: bool,
    /// One entry per finished ticker, in input order
    pub outcomes: Vec<SignalOutcome>,
    /// Tickers dropped at the run deadline, in input order
    pub cancelled: Vec<String>,
    pub timed_out: bool,
    /// Fetch attempts across all finished tickers
    pub fetch_attempts: u32,
}

impl SignalBatch {
    pub fn signals(&self) -> impl Iterator<Item = &TradingSignal> {
        self.outcomes.iter().filter_map(SignalOutcome::as_signal)
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_skipped()).count()
    }
}

/// Analysis stages shared read-only by every ticker task.
#[derive(Debug, Default)]
struct Analysis {
    engine: IndicatorEngine,
    scorer: ImpactScorer,
    generator: SignalGenerator,
}

/// What a ticker task hands back.
#[derive(Debug)]
struct TickerReport {
    index: usize,
    outcome: SignalOutcome,
    /// The provider answered for this ticker, with bars or a per-symbol error
    reached: bool,
    attempts: u32,
}

/// Everything one ticker task needs, owned.
struct TickerWorker {
    prices: Arc<dyn PriceSeriesProvider>,
    sentiment: Arc<dyn SentimentProvider>,
    analysis: Arc<Analysis>,
    retry: RetryPolicy,
}

impl TickerWorker {
    async fn process(self, index: usize, ticker: String, window: FetchWindow) -> TickerReport {
        let mut stage = Stage::Fetch;
        debug!(ticker = %ticker, %stage, "Stage start");

        let prices = &self.prices;
        let fetch = self
            .retry
            .run(&ticker, || prices.fetch(&ticker, &window));
        let lookup = self.sentiment.sentiment(&ticker);
        let ((fetched, attempts), sentiment) = tokio::join!(fetch, lookup);

        let series = match fetched {
            Ok(series) => series,
            Err(err) => {
                warn!(ticker = %ticker, attempts, error = %err, "Fetch failed, skipping ticker");
                return TickerReport {
                    index,
                    outcome: SignalOutcome::Skipped(SkippedTicker::new(
                        ticker,
                        format!("fetch failed after {} attempt(s): {}", attempts, err),
                    )),
                    reached: !err.is_provider_failure(),
                    attempts,
                };
            }
        };

        stage = stage.next();
        debug!(ticker = %ticker, %stage, bars = series.len(), "Stage start");

        let sentiment = match sentiment {
            Ok(Some(sentiment)) => Some(sentiment),
            Ok(None) => {
                warn!(ticker = %ticker, "No sentiment for ticker, scoring degraded");
                None
            }
            Err(err) => {
                warn!(ticker = %ticker, error = %err, "Sentiment unavailable, scoring degraded");
                None
            }
        };
        let company_name = sentiment.as_ref().and_then(|s| s.company_name.clone());
        let analysis = self.analysis.engine.compute(&series).map(|snapshot| {
            let record = self
                .analysis
                .scorer
                .score(&ticker, sentiment.as_ref(), &snapshot);
            AnalyzedTicker {
                snapshot,
                record,
                company_name,
            }
        });

        stage = stage.next();
        debug!(ticker = %ticker, %stage, "Stage start");
        let outcome = self.analysis.generator.resolve(&ticker, analysis);

        stage = stage.next();
        debug_assert!(stage.is_terminal());
        debug!(ticker = %ticker, %stage, skipped = outcome.is_skipped(), "Ticker finished");

        TickerReport {
            index,
            outcome,
            reached: true,
            attempts,
        }
    }
}

/// Runs the per-ticker pipelines for a batch of tickers.
pub struct PipelineCoordinator {
    prices: Arc<dyn PriceSeriesProvider>,
    sentiment: Arc<dyn SentimentProvider>,
    analysis: Arc<Analysis>,
    config: PipelineConfig,
}

impl PipelineCoordinator {
    /// Create a coordinator with default analysis stages.
    pub fn new(
        prices: Arc<dyn PriceSeriesProvider>,
        sentiment: Arc<dyn SentimentProvider>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            prices,
            sentiment,
            analysis: Arc::new(Analysis::default()),
            config,
        }
    }

    /// Replace the analysis stages.
    pub fn with_stages(
        mut self,
        engine: IndicatorEngine,
        scorer: ImpactScorer,
        generator: SignalGenerator,
    ) -> Self {
        self.analysis = Arc::new(Analysis {
            engine,
            scorer,
            generator,
        });
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run over the configured lookback ending now.
    pub async fn run(&self, tickers: &[String]) -> Result<SignalBatch, PipelineError> {
        let window = FetchWindow::lookback(
            Utc::now(),
            self.config.lookback_days,
            self.config.timeframe,
        );
        self.run_window(tickers, window).await
    }

    /// Run over an explicit window.
    ///
    /// Without a deadline the batch holds exactly one outcome per ticker.
    /// When the deadline fires, unfinished tickers are aborted and listed in
    /// `cancelled`; finished ones are kept.
    pub async fn run_window(
        &self,
        tickers: &[String],
        window: FetchWindow,
    ) -> Result<SignalBatch, PipelineError> {
        if tickers.is_empty() {
            return Err(PipelineError::NoTickers);
        }

        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let clock = Instant::now();
        let market_open = is_us_market_open(started_at);
        if !market_open {
            warn!(%run_id, "US market is closed; signals apply to the next session");
        }
        info!(
            %run_id,
            tickers = tickers.len(),
            prices = self.prices.name(),
            sentiment = self.sentiment.name(),
            "Starting pipeline run"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_fetches.max(1)));
        let mut tasks = JoinSet::new();
        for (index, ticker) in tickers.iter().enumerate() {
            let worker = TickerWorker {
                prices: Arc::clone(&self.prices),
                sentiment: Arc::clone(&self.sentiment),
                analysis: Arc::clone(&self.analysis),
                retry: self.config.retry.clone(),
            };
            let semaphore = Arc::clone(&semaphore);
            let ticker = ticker.clone();
            tasks.spawn(async move {
                // The semaphore is never closed, so a failed acquire cannot happen.
                let _permit = semaphore.acquire_owned().await.ok();
                worker.process(index, ticker, window).await
            });
        }

        let mut reports: Vec<Option<TickerReport>> = (0..tickers.len()).map(|_| None).collect();
        let collect = async {
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok(report) => {
                        let index = report.index;
                        reports[index] = Some(report);
                    }
                    Err(e) => error!(%run_id, error = %e, "Ticker task failed"),
                }
            }
        };
        let timed_out = match self.config.timeout() {
            Some(limit) => tokio::time::timeout(limit, collect).await.is_err(),
            None => {
                collect.await;
                false
            }
        };
        if timed_out {
            tasks.abort_all();
        }

        let elapsed_ms = clock.elapsed().as_millis() as u64;
        let completed = reports.iter().filter(|r| r.is_some()).count();
        if timed_out && completed == 0 {
            return Err(PipelineError::Timeout {
                elapsed_ms,
                completed,
                total: tickers.len(),
            });
        }

        let mut outcomes = Vec::with_capacity(completed);
        let mut cancelled = Vec::new();
        let mut reached = 0;
        let mut fetch_attempts = 0;
        for (ticker, report) in tickers.iter().zip(reports) {
            match report {
                Some(report) => {
                    if report.reached {
                        reached += 1;
                    }
                    fetch_attempts += report.attempts;
                    outcomes.push(report.outcome);
                }
                None if timed_out => {
                    warn!(%run_id, ticker = %ticker, "Ticker cancelled at run deadline");
                    cancelled.push(ticker.clone());
                }
                None => outcomes.push(SignalOutcome::Skipped(SkippedTicker::new(
                    ticker.as_str(),
                    "analysis task failed",
                ))),
            }
        }

        if !timed_out && reached == 0 {
            error!(%run_id, attempted = tickers.len(), "Price provider never answered");
            return Err(PipelineError::ProviderUnavailable {
                attempted: tickers.len(),
            });
        }

        let batch = SignalBatch {
            run_id,
            started_at,
            finished_at: Utc::now(),
            window,
            market_open,
            outcomes,
            cancelled,
            timed_out,
            fetch_attempts,
        };
        info!(
            %run_id,
            elapsed_ms,
            completed,
            signals = batch.signals().count(),
            skipped = batch.skipped_count(),
            cancelled = batch.cancelled.len(),
            "Pipeline run finished"
        );
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use newsflow_core::error::{FetchError, SentimentError};
    use newsflow_core::types::{Bar, Direction, ExternalSentiment, PriceSeries, Timeframe};
    use newsflow_data::{InMemoryPriceProvider, StaticSentimentProvider};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
    use std::time::Duration;

    const DAY_MS: i64 = 86_400_000;

    fn bars(len: usize) -> Vec<Bar> {
        (0..len)
            .map(|i| {
                let c = 100.0 + (i as f64 * 0.5).sin() * 4.0;
                Bar::new(i as i64 * DAY_MS, c, c + 1.0, c - 1.0, c, 1000.0)
            })
            .collect()
    }

    fn window() -> FetchWindow {
        FetchWindow::new(
            Utc.timestamp_millis_opt(0).unwrap(),
            Utc.timestamp_millis_opt(365 * DAY_MS).unwrap(),
            Timeframe::Daily,
        )
    }

    fn tickers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn config(timeout_secs: Option<u64>) -> PipelineConfig {
        PipelineConfig {
            max_concurrent_fetches: 16,
            timeout_secs,
            ..Default::default()
        }
    }

    fn no_sentiment() -> Arc<dyn SentimentProvider> {
        Arc::new(StaticSentimentProvider::new())
    }

    /// Delegates to an in-memory provider after a per-ticker delay.
    struct DelayedProvider {
        inner: InMemoryPriceProvider,
        delays: HashMap<String, Duration>,
    }

    #[async_trait]
    impl PriceSeriesProvider for DelayedProvider {
        async fn fetch(
            &self,
            ticker: &str,
            window: &FetchWindow,
        ) -> Result<PriceSeries, FetchError> {
            if let Some(delay) = self.delays.get(ticker) {
                tokio::time::sleep(*delay).await;
            }
            self.inner.fetch(ticker, window).await
        }

        fn name(&self) -> &str {
            "delayed"
        }
    }

    struct DownProvider {
        calls: AtomicU32,
    }

    #[async_trait]
    impl PriceSeriesProvider for DownProvider {
        async fn fetch(&self, _: &str, _: &FetchWindow) -> Result<PriceSeries, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(FetchError::Connection("connection refused".to_string()))
        }

        fn name(&self) -> &str {
            "down"
        }
    }

    /// Records the peak number of fetches running at once.
    struct GaugedProvider {
        inner: InMemoryPriceProvider,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl PriceSeriesProvider for GaugedProvider {
        async fn fetch(
            &self,
            ticker: &str,
            window: &FetchWindow,
        ) -> Result<PriceSeries, FetchError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(100)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.inner.fetch(ticker, window).await
        }

        fn name(&self) -> &str {
            "gauged"
        }
    }

    /// Panics while fetching one ticker.
    struct PanickingProvider {
        inner: InMemoryPriceProvider,
        poison: &'static str,
    }

    #[async_trait]
    impl PriceSeriesProvider for PanickingProvider {
        async fn fetch(
            &self,
            ticker: &str,
            window: &FetchWindow,
        ) -> Result<PriceSeries, FetchError> {
            if ticker == self.poison {
                panic!("decoder bug on {}", ticker);
            }
            self.inner.fetch(ticker, window).await
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    struct BrokenSentiment;

    #[async_trait]
    impl SentimentProvider for BrokenSentiment {
        async fn sentiment(&self, _: &str) -> Result<Option<ExternalSentiment>, SentimentError> {
            Err(SentimentError::Unavailable("collaborator offline".to_string()))
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_outcomes_follow_input_order() {
        let mut inner = InMemoryPriceProvider::new();
        let mut delays = HashMap::new();
        for (name, delay_ms) in [("AAA", 300), ("BBB", 10), ("CCC", 0)] {
            inner.insert(name, bars(60));
            delays.insert(name.to_string(), Duration::from_millis(delay_ms));
        }
        let prices = Arc::new(DelayedProvider { inner, delays });

        let coordinator = PipelineCoordinator::new(prices, no_sentiment(), config(None));
        let batch = coordinator
            .run_window(&tickers(&["AAA", "BBB", "CCC"]), window())
            .await
            .unwrap();

        let order: Vec<&str> = batch.outcomes.iter().map(|o| o.ticker()).collect();
        assert_eq!(order, vec!["AAA", "BBB", "CCC"]);
        assert!(!batch.timed_out);
        assert!(batch.cancelled.is_empty());
        assert_eq!(batch.fetch_attempts, 3);
    }

    #[tokio::test]
    async fn test_empty_series_skipped_others_signal() {
        let prices = Arc::new(
            InMemoryPriceProvider::new()
                .with_bars("GOOD", bars(60))
                .with_bars("EMPTY", Vec::new()),
        );
        let coordinator = PipelineCoordinator::new(prices, no_sentiment(), config(None));
        let batch = coordinator
            .run_window(&tickers(&["EMPTY", "GOOD"]), window())
            .await
            .unwrap();

        match &batch.outcomes[0] {
            SignalOutcome::Skipped(skipped) => {
                assert_eq!(skipped.ticker, "EMPTY");
                assert_eq!(skipped.reason, "price series is empty");
            }
            other => panic!("expected skipped, got {:?}", other),
        }
        assert!(batch.outcomes[1].as_signal().is_some());
        assert_eq!(batch.skipped_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_close_skipped() {
        let gappy = vec![
            Bar::without_close(0, 1.0, 1.0, 1.0, 10.0),
            Bar::without_close(DAY_MS, 1.0, 1.0, 1.0, 10.0),
        ];
        let prices = Arc::new(
            InMemoryPriceProvider::new()
                .with_bars("GAP", gappy)
                .with_bars("GOOD", bars(30)),
        );
        let coordinator = PipelineCoordinator::new(prices, no_sentiment(), config(None));
        let batch = coordinator
            .run_window(&tickers(&["GAP", "GOOD"]), window())
            .await
            .unwrap();

        assert!(batch.outcomes[0].is_skipped());
        assert!(!batch.outcomes[1].is_skipped());
    }

    #[tokio::test]
    async fn test_unknown_ticker_skipped_run_continues() {
        let prices = Arc::new(InMemoryPriceProvider::new().with_bars("GOOD", bars(60)));
        let coordinator = PipelineCoordinator::new(prices, no_sentiment(), config(None));
        let batch = coordinator
            .run_window(&tickers(&["GOOD", "MISSING"]), window())
            .await
            .unwrap();

        assert_eq!(batch.outcomes.len(), 2);
        match &batch.outcomes[1] {
            SignalOutcome::Skipped(skipped) => assert!(skipped.reason.contains("Symbol not found")),
            other => panic!("expected skipped, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_fetches_failing_is_provider_unavailable() {
        let prices = Arc::new(DownProvider {
            calls: AtomicU32::new(0),
        });
        let coordinator =
            PipelineCoordinator::new(prices.clone(), no_sentiment(), config(Some(60)));
        let result = coordinator
            .run_window(&tickers(&["AAA", "BBB"]), window())
            .await;

        assert!(matches!(
            result,
            Err(PipelineError::ProviderUnavailable { attempted: 2 })
        ));
        // Transient errors retried up to max_attempts per ticker
        assert_eq!(prices.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_only_unknown_symbols_still_yields_batch() {
        let coordinator = PipelineCoordinator::new(
            Arc::new(InMemoryPriceProvider::new()),
            no_sentiment(),
            config(None),
        );
        let batch = coordinator
            .run_window(&tickers(&["TYPO"]), window())
            .await
            .unwrap();

        assert_eq!(batch.outcomes.len(), 1);
        match &batch.outcomes[0] {
            SignalOutcome::Skipped(skipped) => {
                assert_eq!(skipped.ticker, "TYPO");
                assert!(skipped.reason.contains("Symbol not found"));
            }
            other => panic!("expected skipped, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_fetches_bounded() {
        let names: Vec<String> = (0..6).map(|i| format!("T{}", i)).collect();
        let mut inner = InMemoryPriceProvider::new();
        for name in &names {
            inner.insert(name.as_str(), bars(40));
        }
        let prices = Arc::new(GaugedProvider {
            inner,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let config = PipelineConfig {
            max_concurrent_fetches: 2,
            timeout_secs: None,
            ..Default::default()
        };

        let coordinator = PipelineCoordinator::new(prices.clone(), no_sentiment(), config);
        let batch = coordinator.run_window(&names, window()).await.unwrap();

        assert_eq!(batch.outcomes.len(), 6);
        assert_eq!(prices.peak.load(Ordering::SeqCst), 2);
        assert_eq!(prices.in_flight.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_panicked_task_becomes_skip() {
        let prices = Arc::new(PanickingProvider {
            inner: InMemoryPriceProvider::new().with_bars("GOOD", bars(60)),
            poison: "BOOM",
        });
        let coordinator = PipelineCoordinator::new(prices, no_sentiment(), config(None));
        let batch = coordinator
            .run_window(&tickers(&["BOOM", "GOOD"]), window())
            .await
            .unwrap();

        assert_eq!(batch.outcomes.len(), 2);
        match &batch.outcomes[0] {
            SignalOutcome::Skipped(skipped) => {
                assert_eq!(skipped.ticker, "BOOM");
                assert_eq!(skipped.reason, "analysis task failed");
            }
            other => panic!("expected skipped, got {:?}", other),
        }
        assert!(batch.outcomes[1].as_signal().is_some());
    }

    #[tokio::test]
    async fn test_sentiment_failure_degrades_confidence() {
        let prices = Arc::new(InMemoryPriceProvider::new().with_bars("AAA", bars(60)));
        let coordinator =
            PipelineCoordinator::new(prices, Arc::new(BrokenSentiment), config(None));
        let batch = coordinator
            .run_window(&tickers(&["AAA"]), window())
            .await
            .unwrap();

        let signal = batch.outcomes[0].as_signal().unwrap();
        assert_eq!(signal.confidence, 0.0);
        assert!(signal.rationale.contains("sentiment unavailable"));
    }

    #[tokio::test]
    async fn test_company_name_from_sentiment() {
        let prices = Arc::new(InMemoryPriceProvider::new().with_bars("AAPL", bars(60)));
        let sentiment = Arc::new(StaticSentimentProvider::new().with_sentiment(
            "AAPL",
            ExternalSentiment::new(0.5, "services growth").with_company_name("Apple Inc."),
        ));
        let coordinator = PipelineCoordinator::new(prices, sentiment, config(None));
        let batch = coordinator
            .run_window(&tickers(&["AAPL"]), window())
            .await
            .unwrap();

        let signal = batch.signals().next().unwrap();
        assert_eq!(signal.company_name, "Apple Inc.");
        assert!(signal.confidence > 0.0);
        assert!(matches!(
            signal.direction,
            Direction::Buy | Direction::Sell | Direction::Hold
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_keeps_completed_in_order() {
        let names: Vec<String> = (0..10).map(|i| format!("T{}", i)).collect();
        let mut inner = InMemoryPriceProvider::new();
        let mut delays = HashMap::new();
        for (i, name) in names.iter().enumerate() {
            inner.insert(name.as_str(), bars(40));
            let delay = if [0, 3, 7].contains(&i) {
                Duration::from_millis(10 * (10 - i as u64))
            } else {
                Duration::from_secs(3600)
            };
            delays.insert(name.clone(), delay);
        }
        let prices = Arc::new(DelayedProvider { inner, delays });

        let coordinator = PipelineCoordinator::new(prices, no_sentiment(), config(Some(5)));
        let batch = coordinator.run_window(&names, window()).await.unwrap();

        let finished: Vec<&str> = batch.outcomes.iter().map(|o| o.ticker()).collect();
        assert_eq!(finished, vec!["T0", "T3", "T7"]);
        assert!(batch.timed_out);
        assert_eq!(batch.cancelled.len(), 7);
        assert_eq!(batch.cancelled[0], "T1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_with_nothing_finished_is_timeout() {
        let mut inner = InMemoryPriceProvider::new();
        inner.insert("SLOW", bars(40));
        let delays = HashMap::from([("SLOW".to_string(), Duration::from_secs(3600))]);
        let prices = Arc::new(DelayedProvider { inner, delays });

        let coordinator = PipelineCoordinator::new(prices, no_sentiment(), config(Some(1)));
        let result = coordinator.run_window(&tickers(&["SLOW"]), window()).await;

        assert!(matches!(
            result,
            Err(PipelineError::Timeout {
                completed: 0,
                total: 1,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_no_tickers_rejected() {
        let coordinator = PipelineCoordinator::new(
            Arc::new(InMemoryPriceProvider::new()),
            no_sentiment(),
            config(None),
        );
        let result = coordinator.run_window(&[], window()).await;
        assert!(matches!(result, Err(PipelineError::NoTickers)));
    }
}
