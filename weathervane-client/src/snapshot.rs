/// Status snapshot model for the Weathervane bot's `/api/status` endpoint.
///
/// Wire field names follow the backend exactly (including the Spanish-named
/// capital fields). One snapshot fully supersedes the previous one for
/// rendering purposes; nothing here is merged across polls.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Whether the bot's scan loop is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum BotState {
    Running,
    Stopped,
}

impl From<String> for BotState {
    fn from(raw: String) -> Self {
        // The backend reports "running" while the scan thread is alive and
        // any other string ("stopped", "unknown") otherwise.
        if raw.eq_ignore_ascii_case("running") {
            BotState::Running
        } else {
            BotState::Stopped
        }
    }
}

impl BotState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BotState::Running => "RUNNING",
            BotState::Stopped => "STOPPED",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, BotState::Running)
    }
}

/// Price zone assigned to an opportunity by the backend scorer.
///
/// Wire values are "A" / "B" / "C" / "-" (no zone).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum Zone {
    A,
    B,
    C,
    #[default]
    None,
}

impl From<String> for Zone {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "A" => Zone::A,
            "B" => Zone::B,
            "C" => Zone::C,
            _ => Zone::None,
        }
    }
}

impl Zone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::A => "A",
            Zone::B => "B",
            Zone::C => "C",
            Zone::None => "-",
        }
    }
}

/// Exit category of a closed trade.
///
/// Any wire value outside the known set maps to `Other` rather than failing
/// the whole snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum TradeStatus {
    Won,
    Lost,
    Partial,
    TrailStop,
    HardStop,
    Liquidated,
    Other,
}

impl From<String> for TradeStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "WON" => TradeStatus::Won,
            "LOST" => TradeStatus::Lost,
            "PARTIAL" => TradeStatus::Partial,
            "TRAIL_STOP" => TradeStatus::TrailStop,
            "HARD_STOP" => TradeStatus::HardStop,
            "LIQUIDATED" => TradeStatus::Liquidated,
            _ => TradeStatus::Other,
        }
    }
}

impl TradeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeStatus::Won => "WON",
            TradeStatus::Lost => "LOST",
            TradeStatus::Partial => "PARTIAL",
            TradeStatus::TrailStop => "TRAIL_STOP",
            TradeStatus::HardStop => "HARD_STOP",
            TradeStatus::Liquidated => "LIQUIDATED",
            TradeStatus::Other => "?",
        }
    }
}

/// One open position, NO side.
///
/// Prices are probabilities in [0, 1]; multiply by 100 for cents. A `score`
/// of 0 means the position was opened unscored (sentinel, not absence).
#[derive(Debug, Clone, Deserialize)]
pub struct Position {
    pub question: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub score: u32,
    pub entry_no: f64,
    pub current_no: f64,
    pub trail_stop: f64,
    pub allocated: f64,
    pub pnl: f64,
    #[serde(default)]
    pub partial_done: bool,
    #[serde(default, deserialize_with = "lenient_time")]
    pub entry_time: Option<DateTime<Utc>>,
}

/// One scanned market candidate as reported by the backend's last cycle.
#[derive(Debug, Clone, Deserialize)]
pub struct Opportunity {
    pub question: String,
    /// NO price in [0, 1] (probability-complement of YES).
    pub no_price: f64,
    #[serde(default)]
    pub yes_price: f64,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub profit_cents: f64,
    /// Multi-signal score total, 0-100. 0 also covers "not yet scored".
    #[serde(default)]
    pub score_total: u32,
    #[serde(default)]
    pub score_zone: Zone,
    /// Discretized trajectory sub-score (30 stable / 20 gradual / 10 rapid).
    #[serde(default)]
    pub score_traj: u32,
    #[serde(default)]
    pub score_obs: u32,
    /// Whether the CLOB price check succeeded for this market this cycle.
    #[serde(default)]
    pub clob_ok: bool,
}

/// One closed (or partially closed) trade.
#[derive(Debug, Clone, Deserialize)]
pub struct ClosedTrade {
    pub question: String,
    #[serde(default)]
    pub score: u32,
    pub entry_no: f64,
    pub allocated: f64,
    pub pnl: f64,
    pub status: TradeStatus,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default, deserialize_with = "lenient_time")]
    pub entry_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_time")]
    pub close_time: Option<DateTime<Utc>>,
}

/// One point of the capital history series.
#[derive(Debug, Clone, Deserialize)]
pub struct CapitalPoint {
    pub time: DateTime<Utc>,
    pub capital: f64,
}

/// Win-rate aggregates, present only once the backend has enough closed
/// trades to compute them.
#[derive(Debug, Clone, Deserialize)]
pub struct Insights {
    pub overall_win_rate: f64,
    pub total_trades: u32,
    #[serde(default)]
    pub by_city: Vec<CityStat>,
    #[serde(default)]
    pub by_hour: Vec<HourStat>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CityStat {
    pub city: String,
    pub win_rate: f64,
    pub trades: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HourStat {
    pub hour: u32,
    pub win_rate: f64,
    pub trades: u32,
}

/// Full `/api/status` response.
///
/// Required fields mirror what the backend always emits; everything else
/// defaults to a neutral value (0, empty list, or None) so an older backend
/// cannot partially fail a render.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusSnapshot {
    pub bot_status: BotState,
    #[serde(default)]
    pub capital_inicial: f64,
    pub capital_total: f64,
    pub capital_disponible: f64,
    pub pnl: f64,
    pub roi: f64,
    pub won: u32,
    pub lost: u32,
    #[serde(default)]
    pub trail_stop: u32,
    #[serde(default)]
    pub hard_stop: u32,
    #[serde(default)]
    pub partial: u32,
    #[serde(default)]
    pub liquidated: u32,
    #[serde(default)]
    pub top_score: u32,
    #[serde(default)]
    pub tracked_markets: u32,
    #[serde(default)]
    pub scan_count: u64,
    #[serde(default, deserialize_with = "lenient_time")]
    pub last_price_update: Option<DateTime<Utc>>,
    /// Absent means the backend predates the watchdog field; assume alive.
    #[serde(default = "default_true")]
    pub price_thread_alive: bool,
    #[serde(default, deserialize_with = "lenient_time")]
    pub session_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub capital_history: Vec<CapitalPoint>,
    #[serde(default)]
    pub open_positions: Vec<Position>,
    #[serde(default)]
    pub last_opportunities: Vec<Opportunity>,
    #[serde(default)]
    pub closed_positions: Vec<ClosedTrade>,
    #[serde(default)]
    pub insights: Option<Insights>,
}

fn default_true() -> bool {
    true
}

/// Accept null, a missing field, an empty string, or an ISO-8601 string.
///
/// The backend emits `""` for a trade closed before the field existed and
/// `null` when no price update has happened yet; neither may fail the poll.
fn lenient_time<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<DateTime<Utc>>().ok()))
}
