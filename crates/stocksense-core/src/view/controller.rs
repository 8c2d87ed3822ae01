//! Fetch lifecycle and failure policy for the display state

use crate::catalog::TickerCatalog;
use crate::config::StalePolicy;
use crate::gateway::StockGateway;
use crate::model::Ticker;
use crate::projector;
use crate::view::state::ViewState;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::{debug, info};

/// Drives one ticker-selection lifecycle at a time.
///
/// States: Idle (nothing selected), Fetching (`loading == true`, prior
/// slots handled per [`StalePolicy`]) and Resolved (all three outcomes
/// applied atomically). Re-selecting while a fetch is in flight
/// supersedes it: outcomes are attributed to the request that produced
/// them via a monotonically increasing sequence number, and a bundle
/// from an older sequence is discarded regardless of arrival order.
/// There is no network cancellation; superseded requests complete and
/// their results are ignored.
pub struct ViewStateController<G> {
    gateway: Arc<G>,
    catalog: TickerCatalog,
    stale_policy: StalePolicy,
    sequence: AtomicU64,
    publisher: watch::Sender<ViewState>,
}

impl<G: StockGateway> ViewStateController<G> {
    pub fn new(gateway: Arc<G>, catalog: TickerCatalog, stale_policy: StalePolicy) -> Self {
        let (publisher, _) = watch::channel(ViewState::default());
        Self {
            gateway,
            catalog,
            stale_policy,
            sequence: AtomicU64::new(0),
            publisher,
        }
    }

    /// Watch the published snapshots; a new one arrives on every state
    /// transition (fetch dispatched, fetch settled).
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.publisher.subscribe()
    }

    /// The latest published snapshot
    pub fn current(&self) -> ViewState {
        self.publisher.borrow().clone()
    }

    /// Catalog suggestions for selection input
    pub fn suggest(&self, query: &str) -> Vec<&Ticker> {
        self.catalog.suggest(query)
    }

    /// Select a ticker and run one fetch cycle.
    ///
    /// The input is normalized (trimmed, uppercased) and resolved against
    /// the catalog; a free-typed symbol outside the catalog is still
    /// fetched, with the symbol standing in for the display name. Blank
    /// input is a no-op.
    ///
    /// Returns the snapshot after this request settled, or the current
    /// snapshot if the request was superseded by a newer selection.
    pub async fn select(&self, input: &str) -> ViewState {
        let symbol = input.trim().to_uppercase();
        if symbol.is_empty() {
            return self.current();
        }

        let ticker = self
            .catalog
            .resolve(&symbol)
            .cloned()
            .unwrap_or_else(|| Ticker::new(symbol.clone(), symbol.clone()));

        // The sequence number is taken inside the same modification that
        // publishes the Fetching state. The watch sender serializes
        // modifications, so the request with the highest sequence is always
        // the one whose ticker was published last, and its settle below is
        // the only one the guard lets through.
        let selected = ticker.clone();
        let mut sequence = 0;
        self.publisher.send_modify(|state| {
            sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
            state.selected_ticker = Some(selected);
            state.loading = true;
            if self.stale_policy == StalePolicy::ClearOnFetch {
                state.clear_sections();
            }
        });
        info!(symbol = %ticker.symbol, sequence, "dispatching fetch cycle");

        let bundle = self.gateway.fetch_all(&ticker).await;

        let predictions = bundle.predictions.into_success();
        let info = bundle.info.into_success();
        let series = bundle
            .series
            .into_success()
            .map(|raw| projector::project(&raw));

        // All three slots change together; a failed resource leaves its
        // slot empty and the reason stays in the logs. The sequence guard
        // sits inside the same modification, so a bundle from a superseded
        // request can never half-apply over a newer one.
        let applied = self.publisher.send_if_modified(move |state| {
            if self.sequence.load(Ordering::SeqCst) != sequence {
                return false;
            }
            state.loading = false;
            state.predictions = predictions;
            state.info = info;
            state.series = series;
            true
        });

        if applied {
            info!(symbol = %ticker.symbol, sequence, "fetch cycle settled");
        } else {
            debug!(
                symbol = %ticker.symbol,
                sequence,
                "discarding outcome of superseded request"
            );
        }

        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::gateway::MockStockGateway;
    use crate::model::{
        Direction, FetchBundle, FetchOutcome, FieldValue, InfoRecord, ModelVerdict, RawSeries,
    };
    use crate::present;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    fn aapl_bundle() -> FetchBundle {
        FetchBundle {
            predictions: FetchOutcome::Success((
                ModelVerdict::new(Direction::Up, Some(0.6)),
                ModelVerdict::new(Direction::Down, Some(0.55)),
            )),
            info: FetchOutcome::Success(InfoRecord::new(vec![(
                "sector".to_string(),
                FieldValue::Text("Technology".to_string()),
            )])),
            series: FetchOutcome::Success(RawSeries {
                labels: vec!["2024-01-01".to_string()],
                prices: vec![150.2],
            }),
        }
    }

    fn failure_bundle() -> FetchBundle {
        FetchBundle {
            predictions: FetchOutcome::Failure(FetchError::Network("down".to_string())),
            info: FetchOutcome::Failure(FetchError::Network("down".to_string())),
            series: FetchOutcome::Failure(FetchError::Network("down".to_string())),
        }
    }

    fn info_bundle(field: &str, value: &str) -> FetchBundle {
        FetchBundle {
            predictions: FetchOutcome::Failure(FetchError::Network("down".to_string())),
            info: FetchOutcome::Success(InfoRecord::new(vec![(
                field.to_string(),
                FieldValue::Text(value.to_string()),
            )])),
            series: FetchOutcome::Failure(FetchError::Network("down".to_string())),
        }
    }

    fn controller_with(
        gateway: MockStockGateway,
        stale_policy: StalePolicy,
    ) -> ViewStateController<MockStockGateway> {
        ViewStateController::new(Arc::new(gateway), TickerCatalog::builtin(), stale_policy)
    }

    /// Gateway that replays scripted bundles, each gated on a oneshot
    /// channel so tests control when a request settles.
    struct StallingGateway {
        scripted: Mutex<VecDeque<oneshot::Receiver<FetchBundle>>>,
    }

    impl StallingGateway {
        fn new(receivers: Vec<oneshot::Receiver<FetchBundle>>) -> Self {
            Self {
                scripted: Mutex::new(receivers.into()),
            }
        }
    }

    #[async_trait]
    impl StockGateway for StallingGateway {
        async fn fetch_all(&self, _ticker: &Ticker) -> FetchBundle {
            let receiver = self
                .scripted
                .lock()
                .expect("scripted queue lock")
                .pop_front()
                .expect("a scripted response for every fetch");
            receiver.await.expect("scripted sender kept alive")
        }
    }

    #[tokio::test]
    async fn test_end_to_end_aapl_selection() {
        let mut gateway = MockStockGateway::new();
        gateway.expect_fetch_all().returning(|_| aapl_bundle());

        let controller = controller_with(gateway, StalePolicy::RetainPrevious);
        let state = controller.select("aapl").await;

        let ticker = state.selected_ticker.expect("ticker selected");
        assert_eq!(ticker.symbol, "AAPL");
        assert_eq!(ticker.display_name, "Apple Inc.");
        assert!(!state.loading);

        let (svm, rfc) = state.predictions.expect("predictions populated");
        assert_eq!(svm.direction, Direction::Up);
        assert_eq!(svm.confidence, Some(0.6));
        assert_eq!(rfc.direction, Direction::Down);
        assert_eq!(rfc.confidence, Some(0.55));

        let info = state.info.expect("info populated");
        let rows = present::pair_info_fields(&info);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0 .0, "sector");
        assert_eq!(rows[0].0 .1, FieldValue::Text("Technology".to_string()));
        assert_eq!(rows[0].1, present::placeholder_field());

        let series = state.series.expect("series populated");
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].label, "2024-01-01");
        assert_eq!(series[0].price, 150.2);
    }

    #[tokio::test]
    async fn test_partial_failure_leaves_only_failed_slot_empty() {
        let mut gateway = MockStockGateway::new();
        gateway.expect_fetch_all().returning(|_| {
            let mut bundle = aapl_bundle();
            bundle.info = FetchOutcome::Failure(FetchError::Parse("bad payload".to_string()));
            bundle
        });

        let controller = controller_with(gateway, StalePolicy::RetainPrevious);
        let state = controller.select("AAPL").await;

        assert!(!state.loading);
        assert!(state.predictions.is_some());
        assert!(state.info.is_none(), "failed section renders as absent");
        assert!(state.series.is_some());
    }

    #[tokio::test]
    async fn test_two_failures_leave_only_the_surviving_slot() {
        let mut gateway = MockStockGateway::new();
        gateway
            .expect_fetch_all()
            .returning(|_| info_bundle("sector", "Technology"));

        let controller = controller_with(gateway, StalePolicy::RetainPrevious);
        let state = controller.select("AAPL").await;

        assert!(!state.loading);
        assert!(state.predictions.is_none());
        assert!(state.series.is_none());
        assert!(state.info.is_some());
    }

    #[tokio::test]
    async fn test_total_failure_is_not_fatal_and_allows_retry() {
        let mut gateway = MockStockGateway::new();
        gateway
            .expect_fetch_all()
            .times(1)
            .returning(|_| failure_bundle());
        gateway
            .expect_fetch_all()
            .times(1)
            .returning(|_| aapl_bundle());

        let controller = controller_with(gateway, StalePolicy::RetainPrevious);

        let state = controller.select("AAPL").await;
        assert!(!state.loading);
        assert!(!state.has_any_section());
        assert!(state.selected_ticker.is_some(), "selection survives total failure");

        // Reselecting retries the whole cycle.
        let state = controller.select("AAPL").await;
        assert!(state.has_any_section());
    }

    #[tokio::test]
    async fn test_blank_input_is_a_no_op() {
        let controller = controller_with(MockStockGateway::new(), StalePolicy::RetainPrevious);
        let state = controller.select("   ").await;
        assert!(state.is_idle());
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_fetched_with_synthesized_name() {
        let mut gateway = MockStockGateway::new();
        gateway.expect_fetch_all().returning(|_| failure_bundle());

        let controller = controller_with(gateway, StalePolicy::RetainPrevious);
        let state = controller.select("zzzz").await;

        let ticker = state.selected_ticker.expect("ticker selected");
        assert_eq!(ticker.symbol, "ZZZZ");
        assert_eq!(ticker.display_name, "ZZZZ");
    }

    #[tokio::test]
    async fn test_retain_previous_keeps_slots_while_fetching() {
        let (first_tx, first_rx) = oneshot::channel();
        let (second_tx, second_rx) = oneshot::channel();
        first_tx.send(aapl_bundle()).expect("receiver alive");

        let gateway = Arc::new(StallingGateway::new(vec![first_rx, second_rx]));
        let controller = Arc::new(ViewStateController::new(
            gateway,
            TickerCatalog::builtin(),
            StalePolicy::RetainPrevious,
        ));

        controller.select("AAPL").await;
        assert!(controller.current().info.is_some());

        let background = Arc::clone(&controller);
        let handle = tokio::spawn(async move { background.select("MSFT").await });
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;

        let mid_fetch = controller.current();
        assert!(mid_fetch.loading);
        assert_eq!(
            mid_fetch.selected_ticker.as_ref().map(|t| t.symbol.as_str()),
            Some("MSFT")
        );
        assert!(
            mid_fetch.info.is_some(),
            "previous sections stay visible until the new outcomes settle"
        );

        second_tx.send(failure_bundle()).expect("receiver alive");
        let settled = handle.await.expect("select task");
        assert!(!settled.loading);
        assert!(settled.info.is_none());
    }

    #[tokio::test]
    async fn test_clear_on_fetch_empties_slots_at_dispatch() {
        let (first_tx, first_rx) = oneshot::channel();
        let (second_tx, second_rx) = oneshot::channel();
        first_tx.send(aapl_bundle()).expect("receiver alive");

        let gateway = Arc::new(StallingGateway::new(vec![first_rx, second_rx]));
        let controller = Arc::new(ViewStateController::new(
            gateway,
            TickerCatalog::builtin(),
            StalePolicy::ClearOnFetch,
        ));

        controller.select("AAPL").await;
        assert!(controller.current().has_any_section());

        let background = Arc::clone(&controller);
        let handle = tokio::spawn(async move { background.select("MSFT").await });
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;

        let mid_fetch = controller.current();
        assert!(mid_fetch.loading);
        assert!(!mid_fetch.has_any_section());

        second_tx.send(aapl_bundle()).expect("receiver alive");
        handle.await.expect("select task");
    }

    #[tokio::test]
    async fn test_later_selection_wins_even_when_it_settles_first() {
        let (first_tx, first_rx) = oneshot::channel();
        let (second_tx, second_rx) = oneshot::channel();

        let gateway = Arc::new(StallingGateway::new(vec![first_rx, second_rx]));
        let controller = Arc::new(ViewStateController::new(
            gateway,
            TickerCatalog::builtin(),
            StalePolicy::RetainPrevious,
        ));

        let first_task = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.select("AAPL").await })
        };
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;

        let second_task = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.select("MSFT").await })
        };
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;

        // The newer request settles first...
        second_tx
            .send(info_bundle("sector", "Software"))
            .expect("receiver alive");
        second_task.await.expect("second select");

        // ...and the slower, superseded one settles afterwards.
        first_tx
            .send(info_bundle("sector", "Hardware"))
            .expect("receiver alive");
        first_task.await.expect("first select");

        let state = controller.current();
        assert!(!state.loading);
        assert_eq!(
            state.selected_ticker.as_ref().map(|t| t.symbol.as_str()),
            Some("MSFT")
        );
        let info = state.info.expect("info from the later selection");
        assert_eq!(
            info.fields()[0].1,
            FieldValue::Text("Software".to_string()),
            "stale outcome must not overwrite the newer result"
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_selections_never_mix_ticker_and_data() {
        let mut gateway = MockStockGateway::new();
        gateway
            .expect_fetch_all()
            .returning(|ticker| info_bundle("symbol", &ticker.symbol));

        let controller = Arc::new(controller_with(gateway, StalePolicy::RetainPrevious));

        // Two selections racing from parallel tasks: whichever sequence
        // wins, the published data must belong to the published ticker.
        for _ in 0..100 {
            let first = {
                let controller = Arc::clone(&controller);
                tokio::spawn(async move { controller.select("AAPL").await })
            };
            let second = {
                let controller = Arc::clone(&controller);
                tokio::spawn(async move { controller.select("MSFT").await })
            };
            first.await.expect("first select");
            second.await.expect("second select");

            let state = controller.current();
            assert!(!state.loading);
            let symbol = state
                .selected_ticker
                .as_ref()
                .expect("ticker selected")
                .symbol
                .clone();
            let info = state.info.expect("info populated");
            assert_eq!(
                info.fields()[0].1,
                FieldValue::Text(symbol),
                "published sections must belong to the published ticker"
            );
        }
    }

    #[tokio::test]
    async fn test_subscribers_observe_the_settled_snapshot() {
        let mut gateway = MockStockGateway::new();
        gateway.expect_fetch_all().returning(|_| aapl_bundle());

        let controller = controller_with(gateway, StalePolicy::RetainPrevious);
        let mut receiver = controller.subscribe();

        let settled = controller.select("AAPL").await;

        assert!(receiver.has_changed().expect("publisher alive"));
        let snapshot = receiver.borrow_and_update().clone();
        assert_eq!(snapshot, settled);
    }
}
