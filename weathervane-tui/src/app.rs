//! Retained render state and poll-result handling.
//!
//! `UiState` is the terminal's "DOM": the reconciler writes into it through
//! the `DashboardView` binding and the draw loop reads from it. `App` wraps
//! it with the poll generation guard and the freshness tick.

use chrono::{DateTime, Utc};
use tracing::warn;

use weathervane_client::freshness::{assess, FreshnessBadge};
use weathervane_client::reconcile::{apply_snapshot, DashboardView, Metrics};
use weathervane_client::view::{
    CapitalChart, ClosedRow, InsightsPanel, OpportunityRow, Panel, PositionRow, TopScoreRow,
};
use weathervane_client::{BotState, ClientError, Generations, StatusSnapshot};

const WAITING: &str = "waiting for first poll";

/// Everything the draw loop needs, fully owned, no terminal handles.
pub struct UiState {
    /// None until the first successful poll.
    pub status: Option<BotState>,
    pub metrics: Option<Metrics>,
    pub freshness: FreshnessBadge,
    pub insights: Option<InsightsPanel>,
    pub chart: CapitalChart,
    pub positions: Panel<PositionRow>,
    pub opportunities: Panel<OpportunityRow>,
    pub top_scores: Panel<TopScoreRow>,
    pub closed_trades: Panel<ClosedRow>,
    last_price_update: Option<DateTime<Utc>>,
    price_thread_alive: bool,
}

impl UiState {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            status: None,
            metrics: None,
            freshness: assess(None, true, now),
            insights: None,
            chart: CapitalChart::default(),
            positions: Panel::Placeholder(WAITING),
            opportunities: Panel::Placeholder(WAITING),
            top_scores: Panel::Placeholder(WAITING),
            closed_trades: Panel::Placeholder(WAITING),
            last_price_update: None,
            price_thread_alive: true,
        }
    }

    /// Recompute the freshness badge from the stored inputs. Called every
    /// second regardless of polling.
    pub fn tick_freshness(&mut self, now: DateTime<Utc>) {
        self.freshness = assess(self.last_price_update, self.price_thread_alive, now);
    }
}

impl DashboardView for UiState {
    fn set_status(&mut self, state: BotState) {
        self.status = Some(state);
    }

    fn set_metrics(&mut self, metrics: Metrics) {
        self.metrics = Some(metrics);
    }

    fn set_freshness_inputs(&mut self, last_update: Option<DateTime<Utc>>, thread_alive: bool) {
        self.last_price_update = last_update;
        self.price_thread_alive = thread_alive;
    }

    fn set_insights(&mut self, panel: Option<InsightsPanel>) {
        self.insights = panel;
    }

    fn set_capital_chart(&mut self, chart: CapitalChart) {
        self.chart = chart;
    }

    fn set_positions(&mut self, panel: Panel<PositionRow>) {
        self.positions = panel;
    }

    fn set_opportunities(&mut self, panel: Panel<OpportunityRow>) {
        self.opportunities = panel;
    }

    fn set_top_scores(&mut self, panel: Panel<TopScoreRow>) {
        self.top_scores = panel;
    }

    fn set_closed_trades(&mut self, panel: Panel<ClosedRow>) {
        self.closed_trades = panel;
    }
}

/// Application state: render state plus poll bookkeeping.
pub struct App {
    pub ui: UiState,
    generations: Generations,
}

impl App {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            ui: UiState::new(now),
            generations: Generations::new(),
        }
    }

    /// Reserve a generation id for a poll about to be dispatched.
    pub fn issue_generation(&mut self) -> u64 {
        self.generations.issue()
    }

    /// Handle one poll outcome.
    ///
    /// Failures keep the previously rendered state untouched; responses
    /// older than the newest applied one are discarded.
    pub fn on_poll(&mut self, generation: u64, result: Result<StatusSnapshot, ClientError>) {
        match result {
            Ok(snapshot) => {
                if self.generations.admit(generation) {
                    apply_snapshot(&snapshot, &mut self.ui);
                    self.ui.tick_freshness(Utc::now());
                }
            }
            Err(error) => {
                warn!(%error, generation, "poll failed; keeping previous state");
            }
        }
    }
}
