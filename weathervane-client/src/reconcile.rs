/// Snapshot reconciliation: one snapshot in, every bound view region
/// rewritten exactly once, in a fixed order.
use chrono::{DateTime, Utc};

use crate::format::{currency, signed_currency, signed_percent, PnlTone};
use crate::snapshot::{BotState, StatusSnapshot};
use crate::view::{
    self, CapitalChart, ClosedRow, InsightsPanel, OpportunityRow, Panel, PositionRow, TopScoreRow,
};

/// Scalar metric region, pre-formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub capital: String,
    pub available: String,
    pub initial: String,
    pub pnl: String,
    pub pnl_tone: PnlTone,
    pub roi: String,
    pub roi_tone: PnlTone,
    pub outcome_summary: String,
    pub top_score: u32,
    pub tracked_markets: u32,
    pub scan_count: u64,
    pub session_start: Option<DateTime<Utc>>,
}

/// View binding: one setter per widget region.
///
/// The terminal adapter retains what it receives and renders from that; the
/// tests use a recording implementation. Nothing here reads back prior view
/// state, so every region is a plain overwrite.
pub trait DashboardView {
    fn set_status(&mut self, state: BotState);
    fn set_metrics(&mut self, metrics: Metrics);
    /// Step 3 stores the freshness inputs only; the freshness monitor owns
    /// rendering them on its own tick.
    fn set_freshness_inputs(&mut self, last_update: Option<DateTime<Utc>>, thread_alive: bool);
    fn set_insights(&mut self, panel: Option<InsightsPanel>);
    fn set_capital_chart(&mut self, chart: CapitalChart);
    fn set_positions(&mut self, panel: Panel<PositionRow>);
    fn set_opportunities(&mut self, panel: Panel<OpportunityRow>);
    fn set_top_scores(&mut self, panel: Panel<TopScoreRow>);
    fn set_closed_trades(&mut self, panel: Panel<ClosedRow>);
}

/// Apply one snapshot to the view.
///
/// Fixed region order; each step independent and idempotent. Optional wire
/// fields were already defaulted at the model layer, so no step can fail
/// partway.
pub fn apply_snapshot(snapshot: &StatusSnapshot, target: &mut impl DashboardView) {
    // 1. Status badge
    target.set_status(snapshot.bot_status);

    // 2. Scalar metrics
    target.set_metrics(Metrics {
        capital: currency(snapshot.capital_total),
        available: currency(snapshot.capital_disponible),
        initial: currency(snapshot.capital_inicial),
        pnl: signed_currency(snapshot.pnl),
        pnl_tone: PnlTone::from_value(snapshot.pnl),
        roi: signed_percent(snapshot.roi),
        roi_tone: PnlTone::from_value(snapshot.roi),
        outcome_summary: view::outcome_summary(snapshot),
        top_score: snapshot.top_score,
        tracked_markets: snapshot.tracked_markets,
        scan_count: snapshot.scan_count,
        session_start: snapshot.session_start,
    });

    // 3. Freshness inputs (render delegated to the 1s tick)
    target.set_freshness_inputs(snapshot.last_price_update, snapshot.price_thread_alive);

    // 4. Insights
    target.set_insights(view::insights(snapshot.insights.as_ref()));

    // 5. Capital chart, fully replaced
    target.set_capital_chart(view::capital_chart(&snapshot.capital_history));

    // 6-9. Tables (top scores derive from the same list as step 7)
    target.set_positions(view::positions(&snapshot.open_positions));
    target.set_opportunities(view::opportunities(&snapshot.last_opportunities));
    target.set_top_scores(view::top_scores(&snapshot.last_opportunities));
    target.set_closed_trades(view::closed_trades(&snapshot.closed_positions));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Records every binding call as a (region, payload-debug) pair.
    #[derive(Default)]
    struct RecordingView {
        calls: Vec<(&'static str, String)>,
    }

    impl DashboardView for RecordingView {
        fn set_status(&mut self, state: BotState) {
            self.calls.push(("status", format!("{:?}", state)));
        }
        fn set_metrics(&mut self, metrics: Metrics) {
            self.calls.push(("metrics", format!("{:?}", metrics)));
        }
        fn set_freshness_inputs(
            &mut self,
            last_update: Option<DateTime<Utc>>,
            thread_alive: bool,
        ) {
            self.calls
                .push(("freshness", format!("{:?}/{}", last_update, thread_alive)));
        }
        fn set_insights(&mut self, panel: Option<InsightsPanel>) {
            self.calls.push(("insights", format!("{:?}", panel)));
        }
        fn set_capital_chart(&mut self, chart: CapitalChart) {
            self.calls.push(("chart", format!("{:?}", chart)));
        }
        fn set_positions(&mut self, panel: Panel<PositionRow>) {
            self.calls.push(("positions", format!("{:?}", panel)));
        }
        fn set_opportunities(&mut self, panel: Panel<OpportunityRow>) {
            self.calls.push(("opportunities", format!("{:?}", panel)));
        }
        fn set_top_scores(&mut self, panel: Panel<TopScoreRow>) {
            self.calls.push(("top_scores", format!("{:?}", panel)));
        }
        fn set_closed_trades(&mut self, panel: Panel<ClosedRow>) {
            self.calls.push(("closed", format!("{:?}", panel)));
        }
    }

    fn fixture() -> StatusSnapshot {
        serde_json::from_value(json!({
            "bot_status": "running",
            "capital_inicial": 100.0,
            "capital_total": 104.2,
            "capital_disponible": 61.0,
            "pnl": 4.2,
            "roi": 4.2,
            "won": 3,
            "lost": 1,
            "trail_stop": 1,
            "top_score": 85,
            "tracked_markets": 14,
            "scan_count": 102,
            "last_price_update": "2026-03-03T17:05:00+00:00",
            "capital_history": [
                {"time": "2026-03-03T16:00:00+00:00", "capital": 100.0}
            ],
            "last_opportunities": [{
                "question": "Highest temperature in London on March 3?",
                "no_price": 0.85,
                "score_total": 65,
                "clob_ok": true
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_regions_updated_once_in_fixed_order() {
        let snapshot = fixture();
        let mut view = RecordingView::default();
        apply_snapshot(&snapshot, &mut view);

        let regions: Vec<&str> = view.calls.iter().map(|(region, _)| *region).collect();
        assert_eq!(
            regions,
            vec![
                "status",
                "metrics",
                "freshness",
                "insights",
                "chart",
                "positions",
                "opportunities",
                "top_scores",
                "closed",
            ]
        );
    }

    #[test]
    fn test_apply_is_idempotent() {
        let snapshot = fixture();
        let mut view = RecordingView::default();
        apply_snapshot(&snapshot, &mut view);
        apply_snapshot(&snapshot, &mut view);

        let (first, second) = view.calls.split_at(view.calls.len() / 2);
        assert_eq!(first, second);
    }

    #[test]
    fn test_metrics_formatting() {
        let snapshot = fixture();
        let mut view = RecordingView::default();
        apply_snapshot(&snapshot, &mut view);

        let metrics = view
            .calls
            .iter()
            .find(|(region, _)| *region == "metrics")
            .map(|(_, payload)| payload.clone())
            .unwrap();
        assert!(metrics.contains("$104.20"));
        assert!(metrics.contains("+$4.20"));
        assert!(metrics.contains("+4.20%"));
        assert!(metrics.contains("3W / 1L / 1TS"));
    }

    #[test]
    fn test_insights_hidden_when_absent() {
        let snapshot = fixture();
        let mut view = RecordingView::default();
        apply_snapshot(&snapshot, &mut view);

        let insights = view
            .calls
            .iter()
            .find(|(region, _)| *region == "insights")
            .map(|(_, payload)| payload.clone())
            .unwrap();
        assert_eq!(insights, "None");
    }
}
