/// Weathervane Dashboard - Client Library
///
/// Headless core for the terminal dashboard over the Weathervane
/// temperature-market bot:
/// - Status snapshot model matching the bot's `/api/status` wire format
/// - Pure formatters and derived-view builders (row descriptors)
/// - Snapshot reconciler over an injected view-binding trait
/// - Price-feed freshness state machine (1s tick, decoupled from polling)
/// - HTTP client for status polls and start/stop control
///
/// Everything renderable is testable here without a terminal; the binary
/// crate only adds the event loop and the ratatui adapter.
pub mod client;
pub mod error;
pub mod format;
pub mod freshness;
pub mod reconcile;
pub mod snapshot;
pub mod view;

// Re-export commonly used types for convenience
pub use snapshot::{
    BotState, CapitalPoint, CityStat, ClosedTrade, HourStat, Insights, Opportunity, Position,
    StatusSnapshot, TradeStatus, Zone,
};

pub use client::{Generations, StatusClient, BASE_URL_ENV};
pub use error::ClientError;
pub use freshness::{assess, FreshnessBadge, FreshnessState};
pub use reconcile::{apply_snapshot, DashboardView, Metrics};
pub use view::{
    capital_chart, closed_trades, insights, opportunities, outcome_summary, positions, top_scores,
    CapitalChart, ClosedRow, Emphasis, InsightsPanel, OpportunityRow, Panel, PositionRow,
    StatusTone, TopScoreRow,
};
