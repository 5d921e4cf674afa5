/// Derived-view builders: snapshot fragments in, render-ready row
/// descriptors out.
///
/// Builders are pure, never mutate their input, and sanitize all external
/// text centrally so the rendering adapter can emit cells verbatim.
use crate::format::{
    cents, currency, rate_tier, sanitize, signed_currency, trajectory, zone_tone, PnlTone,
    RateTier, ScoreBadge, Trajectory, ZoneTone,
};
use crate::snapshot::{
    CapitalPoint, ClosedTrade, Insights, Opportunity, Position, StatusSnapshot, TradeStatus, Zone,
};

/// Entry band and score gate mirroring the backend's entry rule. Display
/// constants only; the backend owns the real ones.
pub const ENTRY_NO_MIN: f64 = 0.78;
pub const ENTRY_NO_MAX: f64 = 0.93;
pub const MIN_ENTRY_SCORE: u32 = 60;

/// How many rows the derived top-scores view keeps.
pub const TOP_SCORES_LEN: usize = 10;

/// A table region: either rows to render or an explicit empty-state message.
#[derive(Debug, Clone, PartialEq)]
pub enum Panel<T> {
    Rows(Vec<T>),
    Placeholder(&'static str),
}

impl<T> Panel<T> {
    fn from_rows(rows: Vec<T>, placeholder: &'static str) -> Self {
        if rows.is_empty() {
            Panel::Placeholder(placeholder)
        } else {
            Panel::Rows(rows)
        }
    }
}

// ---------------------------------------------------------------------------
// Open positions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct PositionRow {
    pub question: String,
    pub city: String,
    /// True after the 50% partial exit; rendered as a marker on the row.
    pub partial: bool,
    pub badge: ScoreBadge,
    pub entry: String,
    pub current: String,
    pub trail: String,
    pub allocated: String,
    pub pnl: String,
    pub pnl_tone: PnlTone,
}

pub fn positions(list: &[Position]) -> Panel<PositionRow> {
    let rows = list
        .iter()
        .map(|pos| PositionRow {
            question: sanitize(&pos.question),
            city: sanitize(&pos.city),
            partial: pos.partial_done,
            badge: ScoreBadge::new(pos.score),
            entry: cents(pos.entry_no),
            current: cents(pos.current_no),
            trail: cents(pos.trail_stop),
            allocated: currency(pos.allocated),
            pnl: signed_currency(pos.pnl),
            pnl_tone: PnlTone::from_value(pos.pnl),
        })
        .collect();
    Panel::from_rows(rows, "no open positions")
}

// ---------------------------------------------------------------------------
// Opportunities
// ---------------------------------------------------------------------------

/// Row emphasis: eligible beats in-range beats plain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Eligible,
    InRange,
    Plain,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpportunityRow {
    pub question: String,
    pub price: String,
    pub volume: String,
    pub badge: ScoreBadge,
    pub zone: Zone,
    pub zone_tone: ZoneTone,
    pub trajectory: Trajectory,
    pub observations: u32,
    pub clob_ok: bool,
    pub emphasis: Emphasis,
}

pub fn opportunities(list: &[Opportunity]) -> Panel<OpportunityRow> {
    let rows = list
        .iter()
        .map(|opp| {
            let in_range = (ENTRY_NO_MIN..=ENTRY_NO_MAX).contains(&opp.no_price);
            let emphasis = if in_range && opp.score_total >= MIN_ENTRY_SCORE {
                Emphasis::Eligible
            } else if in_range {
                Emphasis::InRange
            } else {
                Emphasis::Plain
            };
            OpportunityRow {
                question: sanitize(&opp.question),
                price: cents(opp.no_price),
                volume: format!("${:.0}", opp.volume),
                badge: ScoreBadge::new(opp.score_total),
                zone: opp.score_zone,
                zone_tone: zone_tone(opp.score_zone),
                trajectory: trajectory(opp.score_traj),
                observations: opp.score_obs,
                clob_ok: opp.clob_ok,
                emphasis,
            }
        })
        .collect();
    Panel::from_rows(rows, "no opportunities in the last scan")
}

// ---------------------------------------------------------------------------
// Top scores (derived)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct TopScoreRow {
    pub question: String,
    pub badge: ScoreBadge,
    pub zone: Zone,
    pub zone_tone: ZoneTone,
    /// "+30" / "+20" / "+10" / "+0", the backend's price-zone points.
    pub zone_bonus: String,
    pub price: String,
    pub observations: u32,
}

/// Points the backend scorer awards per price zone. External constants,
/// shown for context next to each score; not re-derived here.
fn zone_bonus(zone: Zone) -> u32 {
    match zone {
        Zone::A => 30,
        Zone::B => 20,
        Zone::C => 10,
        Zone::None => 0,
    }
}

/// Derived ranking over the current cycle's opportunity list.
///
/// Known limitation, kept on purpose: this only ranks markets present in the
/// latest scan, so it is not a true historical top-10. The backend exposes no
/// ranking endpoint and the derivation rule here is the observable contract.
pub fn top_scores(list: &[Opportunity]) -> Panel<TopScoreRow> {
    let mut scored: Vec<&Opportunity> = list
        .iter()
        .filter(|opp| opp.clob_ok && opp.score_total > 0)
        .collect();
    // Stable sort: equal totals keep their scan order.
    scored.sort_by(|a, b| b.score_total.cmp(&a.score_total));
    scored.truncate(TOP_SCORES_LEN);

    let rows = scored
        .into_iter()
        .map(|opp| TopScoreRow {
            question: sanitize(&opp.question),
            badge: ScoreBadge::new(opp.score_total),
            zone: opp.score_zone,
            zone_tone: zone_tone(opp.score_zone),
            zone_bonus: format!("+{}", zone_bonus(opp.score_zone)),
            price: cents(opp.no_price),
            observations: opp.score_obs,
        })
        .collect();
    Panel::from_rows(rows, "no scored markets yet")
}

// ---------------------------------------------------------------------------
// Closed trades
// ---------------------------------------------------------------------------

/// Color category for a closed-trade status cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Win,
    Loss,
    Warn,
    Info,
    Muted,
}

pub fn status_tone(status: TradeStatus) -> StatusTone {
    match status {
        TradeStatus::Won => StatusTone::Win,
        TradeStatus::Lost | TradeStatus::HardStop => StatusTone::Loss,
        TradeStatus::TrailStop => StatusTone::Warn,
        TradeStatus::Partial => StatusTone::Info,
        TradeStatus::Liquidated | TradeStatus::Other => StatusTone::Muted,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClosedRow {
    pub question: String,
    pub badge: ScoreBadge,
    pub entry: String,
    pub allocated: String,
    pub pnl: String,
    pub pnl_tone: PnlTone,
    pub status: &'static str,
    pub status_tone: StatusTone,
    pub resolution: Option<String>,
    pub closed_at: String,
}

pub fn closed_trades(list: &[ClosedTrade]) -> Panel<ClosedRow> {
    let rows = list
        .iter()
        .map(|trade| ClosedRow {
            question: sanitize(&trade.question),
            badge: ScoreBadge::new(trade.score),
            entry: cents(trade.entry_no),
            allocated: currency(trade.allocated),
            pnl: signed_currency(trade.pnl),
            pnl_tone: PnlTone::from_value(trade.pnl),
            status: trade.status.as_str(),
            status_tone: status_tone(trade.status),
            resolution: trade.resolution.as_deref().map(sanitize),
            closed_at: crate::format::clock_time(trade.close_time),
        })
        .collect();
    Panel::from_rows(rows, "no closed trades yet")
}

// ---------------------------------------------------------------------------
// Insights
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownRow {
    pub label: String,
    pub trades: u32,
    /// Filled share of the win-rate bar, 0-100.
    pub fill_pct: u16,
    pub tier: RateTier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsightsPanel {
    /// e.g. "67%  (3 trades)"
    pub summary: String,
    pub by_city: Panel<BreakdownRow>,
    pub by_hour: Panel<BreakdownRow>,
}

const BREAKDOWN_PLACEHOLDER: &str = "not enough trades yet (min 2 per bucket)";

fn breakdown_row(label: String, win_rate: f64, trades: u32) -> BreakdownRow {
    BreakdownRow {
        label,
        trades,
        fill_pct: (win_rate * 100.0).round().clamp(0.0, 100.0) as u16,
        tier: rate_tier(win_rate),
    }
}

/// `None` in means the backend has no insights yet; the whole panel stays
/// hidden (distinct from rendering zeros).
pub fn insights(source: Option<&Insights>) -> Option<InsightsPanel> {
    let data = source?;
    let by_city = data
        .by_city
        .iter()
        .map(|s| breakdown_row(sanitize(&s.city), s.win_rate, s.trades))
        .collect();
    let by_hour = data
        .by_hour
        .iter()
        .map(|s| breakdown_row(format!("{:02} UTC", s.hour), s.win_rate, s.trades))
        .collect();

    Some(InsightsPanel {
        summary: format!(
            "{}%  ({} trades)",
            (data.overall_win_rate * 100.0).round() as i64,
            data.total_trades
        ),
        by_city: Panel::from_rows(by_city, BREAKDOWN_PLACEHOLDER),
        by_hour: Panel::from_rows(by_hour, BREAKDOWN_PLACEHOLDER),
    })
}

// ---------------------------------------------------------------------------
// Scalar panels
// ---------------------------------------------------------------------------

/// Win/loss summary: "3W / 1L", with optional counters appended only when
/// non-zero ("3W / 1L / 2TS / 1P").
pub fn outcome_summary(snapshot: &StatusSnapshot) -> String {
    let mut parts = vec![
        format!("{}W", snapshot.won),
        format!("{}L", snapshot.lost),
    ];
    for (count, tag) in [
        (snapshot.trail_stop, "TS"),
        (snapshot.hard_stop, "HS"),
        (snapshot.partial, "P"),
        (snapshot.liquidated, "LQ"),
    ] {
        if count > 0 {
            parts.push(format!("{}{}", count, tag));
        }
    }
    parts.join(" / ")
}

/// Capital chart series. Labels and values always have equal length; the
/// chart is rebuilt whole every poll, never patched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CapitalChart {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

pub fn capital_chart(history: &[CapitalPoint]) -> CapitalChart {
    let mut chart = CapitalChart {
        labels: Vec::with_capacity(history.len()),
        values: Vec::with_capacity(history.len()),
    };
    for point in history {
        chart.labels.push(crate::format::clock_time(Some(point.time)));
        chart.values.push(point.capital);
    }
    chart
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::ScoreTier;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn opportunity(question: &str, no_price: f64, score: u32, clob_ok: bool) -> Opportunity {
        serde_json::from_value(json!({
            "question": question,
            "no_price": no_price,
            "score_total": score,
            "clob_ok": clob_ok
        }))
        .unwrap()
    }

    #[test]
    fn test_empty_lists_yield_placeholders() {
        assert_eq!(
            positions(&[]),
            Panel::Placeholder("no open positions")
        );
        assert_eq!(
            opportunities(&[]),
            Panel::Placeholder("no opportunities in the last scan")
        );
        assert_eq!(top_scores(&[]), Panel::Placeholder("no scored markets yet"));
        assert_eq!(
            closed_trades(&[]),
            Panel::Placeholder("no closed trades yet")
        );
    }

    #[test]
    fn test_opportunity_emphasis() {
        struct TestCase {
            no_price: f64,
            score: u32,
            expected: Emphasis,
        }

        let tests = vec![
            // TC0: in band and above gate -> eligible
            TestCase {
                no_price: 0.85,
                score: 65,
                expected: Emphasis::Eligible,
            },
            // TC1: in band, below gate -> in-range only
            TestCase {
                no_price: 0.85,
                score: 40,
                expected: Emphasis::InRange,
            },
            // TC2: band edges are inclusive
            TestCase {
                no_price: 0.78,
                score: 60,
                expected: Emphasis::Eligible,
            },
            TestCase {
                no_price: 0.93,
                score: 60,
                expected: Emphasis::Eligible,
            },
            // TC4: outside band -> plain regardless of score
            TestCase {
                no_price: 0.95,
                score: 90,
                expected: Emphasis::Plain,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let panel = opportunities(&[opportunity("q", test.no_price, test.score, true)]);
            let Panel::Rows(rows) = panel else {
                panic!("TC{} produced a placeholder", index);
            };
            assert_eq!(rows[0].emphasis, test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_top_scores_derivation_rule() {
        let list = vec![
            opportunity("skipped: no clob", 0.85, 90, false),
            opportunity("skipped: unscored", 0.85, 0, true),
            opportunity("tie first", 0.86, 70, true),
            opportunity("highest", 0.84, 85, true),
            opportunity("tie second", 0.88, 70, true),
        ];
        let Panel::Rows(rows) = top_scores(&list) else {
            panic!("expected rows");
        };

        let questions: Vec<&str> = rows.iter().map(|r| r.question.as_str()).collect();
        // Descending by score; the 70/70 tie keeps scan order.
        assert_eq!(questions, vec!["highest", "tie first", "tie second"]);
    }

    #[test]
    fn test_top_scores_truncates_to_ten() {
        let list: Vec<Opportunity> = (0..15)
            .map(|i| opportunity(&format!("q{}", i), 0.85, 60 + i, true))
            .collect();
        let Panel::Rows(rows) = top_scores(&list) else {
            panic!("expected rows");
        };
        assert_eq!(rows.len(), TOP_SCORES_LEN);
        assert_eq!(rows[0].question, "q14");
    }

    #[test]
    fn test_top_scores_zone_bonus() {
        let mut a = opportunity("zone a", 0.86, 80, true);
        a.score_zone = Zone::A;
        let none = opportunity("no zone", 0.85, 65, true);

        let Panel::Rows(rows) = top_scores(&[a, none]) else {
            panic!("expected rows");
        };
        assert_eq!(rows[0].zone_bonus, "+30");
        assert_eq!(rows[1].zone_bonus, "+0");
    }

    #[test]
    fn test_eligible_scenario_appears_in_both_views() {
        // no_price=0.85, score=65, clob_ok -> eligible row in the
        // opportunities view and a "+0" bonus in top scores.
        let list = vec![opportunity("London high temp", 0.85, 65, true)];

        let Panel::Rows(opp_rows) = opportunities(&list) else {
            panic!("expected rows");
        };
        assert_eq!(opp_rows[0].emphasis, Emphasis::Eligible);

        let Panel::Rows(top_rows) = top_scores(&list) else {
            panic!("expected rows");
        };
        assert_eq!(top_rows[0].zone_bonus, "+0");
    }

    #[test]
    fn test_position_row_formatting() {
        let pos: Position = serde_json::from_value(json!({
            "question": "Highest temperature in Miami on March 3?",
            "city": "miami",
            "score": 75,
            "entry_no": 0.86,
            "current_no": 0.885,
            "trail_stop": 0.855,
            "allocated": 6.5,
            "pnl": -0.15,
            "partial_done": true
        }))
        .unwrap();

        let Panel::Rows(rows) = positions(&[pos]) else {
            panic!("expected rows");
        };
        let row = &rows[0];
        assert!(row.partial);
        assert_eq!(row.entry, "86.0¢");
        assert_eq!(row.current, "88.5¢");
        assert_eq!(row.trail, "85.5¢");
        assert_eq!(row.allocated, "$6.50");
        assert_eq!(row.pnl, "-$0.15");
        assert_eq!(row.pnl_tone, PnlTone::Negative);
        assert_eq!(row.badge.tier, ScoreTier::Mid);
    }

    #[test]
    fn test_closed_row_status_tones() {
        for (status, expected) in [
            (TradeStatus::Won, StatusTone::Win),
            (TradeStatus::Lost, StatusTone::Loss),
            (TradeStatus::HardStop, StatusTone::Loss),
            (TradeStatus::TrailStop, StatusTone::Warn),
            (TradeStatus::Partial, StatusTone::Info),
            (TradeStatus::Liquidated, StatusTone::Muted),
            (TradeStatus::Other, StatusTone::Muted),
        ] {
            assert_eq!(status_tone(status), expected, "{:?}", status);
        }
    }

    #[test]
    fn test_insights_absent_hides_panel() {
        assert!(insights(None).is_none());
    }

    #[test]
    fn test_insights_summary_and_empty_breakdowns() {
        let data: Insights = serde_json::from_value(json!({
            "overall_win_rate": 0.667,
            "total_trades": 3,
            "by_city": [],
            "by_hour": []
        }))
        .unwrap();

        let panel = insights(Some(&data)).expect("panel visible");
        assert_eq!(panel.summary, "67%  (3 trades)");
        assert_eq!(panel.by_city, Panel::Placeholder(BREAKDOWN_PLACEHOLDER));
        assert_eq!(panel.by_hour, Panel::Placeholder(BREAKDOWN_PLACEHOLDER));
    }

    #[test]
    fn test_insights_breakdown_rows() {
        let data: Insights = serde_json::from_value(json!({
            "overall_win_rate": 0.75,
            "total_trades": 8,
            "by_city": [{"city": "nyc", "win_rate": 1.0, "trades": 2}],
            "by_hour": [{"hour": 9, "win_rate": 0.5, "trades": 4}]
        }))
        .unwrap();

        let panel = insights(Some(&data)).expect("panel visible");
        let Panel::Rows(cities) = &panel.by_city else {
            panic!("expected city rows");
        };
        assert_eq!(cities[0].fill_pct, 100);
        assert_eq!(cities[0].tier, RateTier::Good);

        let Panel::Rows(hours) = &panel.by_hour else {
            panic!("expected hour rows");
        };
        assert_eq!(hours[0].label, "09 UTC");
        assert_eq!(hours[0].fill_pct, 50);
        assert_eq!(hours[0].tier, RateTier::Warn);
    }

    #[test]
    fn test_outcome_summary_skips_zero_counters() {
        let snap: StatusSnapshot = serde_json::from_value(json!({
            "bot_status": "running",
            "capital_total": 100.0,
            "capital_disponible": 100.0,
            "pnl": 0.0,
            "roi": 0.0,
            "won": 3,
            "lost": 1,
            "trail_stop": 2,
            "partial": 1
        }))
        .unwrap();
        assert_eq!(outcome_summary(&snap), "3W / 1L / 2TS / 1P");

        let bare: StatusSnapshot = serde_json::from_value(json!({
            "bot_status": "running",
            "capital_total": 100.0,
            "capital_disponible": 100.0,
            "pnl": 0.0,
            "roi": 0.0,
            "won": 0,
            "lost": 0
        }))
        .unwrap();
        assert_eq!(outcome_summary(&bare), "0W / 0L");
    }

    #[test]
    fn test_capital_chart_axes_match() {
        let history = vec![
            CapitalPoint {
                time: Utc.with_ymd_and_hms(2026, 3, 3, 16, 0, 0).unwrap(),
                capital: 100.0,
            },
            CapitalPoint {
                time: Utc.with_ymd_and_hms(2026, 3, 3, 17, 0, 0).unwrap(),
                capital: 97.5,
            },
        ];
        let chart = capital_chart(&history);
        assert_eq!(chart.labels.len(), chart.values.len());
        assert_eq!(chart.labels, vec!["16:00", "17:00"]);
        assert_eq!(chart.values, vec![100.0, 97.5]);
    }
}
