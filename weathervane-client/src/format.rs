/// Display formatting helpers shared by all derived views.
///
/// Pure and total: every function returns a value for any well-typed input.
use chrono::{DateTime, Utc};

use crate::snapshot::Zone;

/// Plain currency amount, two decimals, no explicit sign handling.
pub fn currency(value: f64) -> String {
    format!("${:.2}", value)
}

/// Signed currency. Zero counts as positive and gets the "+" prefix.
pub fn signed_currency(value: f64) -> String {
    if value >= 0.0 {
        format!("+${:.2}", value)
    } else {
        format!("-${:.2}", -value)
    }
}

/// Signed percentage. Same zero-is-positive rule as [`signed_currency`].
pub fn signed_percent(value: f64) -> String {
    if value >= 0.0 {
        format!("+{:.2}%", value)
    } else {
        format!("{:.2}%", value)
    }
}

/// Probability price rendered in cents ("86.5¢").
pub fn cents(price: f64) -> String {
    format!("{:.1}¢", price * 100.0)
}

/// Display tone for a signed pnl-like value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PnlTone {
    Positive,
    Negative,
}

impl PnlTone {
    pub fn from_value(value: f64) -> Self {
        if value >= 0.0 {
            PnlTone::Positive
        } else {
            PnlTone::Negative
        }
    }
}

/// Strip characters that could corrupt the terminal.
///
/// Question texts come from an external market API; control bytes (including
/// ESC) must never reach a rendered cell. Centralized here so no view builder
/// can forget it.
pub fn sanitize(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_control()).collect()
}

/// 24-hour clock time, fixed locale; "-" when the timestamp is absent.
pub fn clock_time(time: Option<DateTime<Utc>>) -> String {
    match time {
        Some(t) => t.format("%H:%M").to_string(),
        None => "-".to_string(),
    }
}

/// Score tier for badge styling. A score of 0 is the unscored sentinel, not
/// a low score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    Unscored,
    High,
    Mid,
    Low,
}

/// Render-ready score badge: tier plus label text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBadge {
    pub tier: ScoreTier,
    pub label: String,
}

impl ScoreBadge {
    pub fn new(score: u32) -> Self {
        let tier = match score {
            0 => ScoreTier::Unscored,
            s if s >= 80 => ScoreTier::High,
            s if s >= 60 => ScoreTier::Mid,
            _ => ScoreTier::Low,
        };
        let label = match tier {
            ScoreTier::Unscored => "·".to_string(),
            _ => score.to_string(),
        };
        Self { tier, label }
    }
}

/// Emphasis level for a price zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneTone {
    Strong,
    Medium,
    Weak,
    Muted,
}

pub fn zone_tone(zone: Zone) -> ZoneTone {
    match zone {
        Zone::A => ZoneTone::Strong,
        Zone::B => ZoneTone::Medium,
        Zone::C => ZoneTone::Weak,
        Zone::None => ZoneTone::Muted,
    }
}

/// Trajectory glyph + label for the discretized trend code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trajectory {
    pub label: &'static str,
    pub glyph: &'static str,
    pub muted: bool,
}

/// Codes come from the backend scorer: 30 stable, 20 gradual rise,
/// 10 rapid rise, anything else falling or unknown.
pub fn trajectory(points: u32) -> Trajectory {
    match points {
        30 => Trajectory {
            label: "stable",
            glyph: "→",
            muted: false,
        },
        20 => Trajectory {
            label: "gradual",
            glyph: "↗",
            muted: false,
        },
        10 => Trajectory {
            label: "rapid",
            glyph: "⇈",
            muted: false,
        },
        _ => Trajectory {
            label: "down",
            glyph: "↘",
            muted: true,
        },
    }
}

/// Color tier for a win-rate bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateTier {
    Good,
    Warn,
    Bad,
}

pub fn rate_tier(rate: f64) -> RateTier {
    if rate >= 0.7 {
        RateTier::Good
    } else if rate >= 0.5 {
        RateTier::Warn
    } else {
        RateTier::Bad
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_currency() {
        assert_eq!(currency(104.2), "$104.20");
        assert_eq!(currency(0.0), "$0.00");
    }

    #[test]
    fn test_signed_currency() {
        assert_eq!(signed_currency(-12.5), "-$12.50");
        assert_eq!(signed_currency(0.0), "+$0.00");
        assert_eq!(signed_currency(3.456), "+$3.46");
    }

    #[test]
    fn test_signed_percent() {
        assert_eq!(signed_percent(4.2), "+4.20%");
        assert_eq!(signed_percent(0.0), "+0.00%");
        assert_eq!(signed_percent(-2.5), "-2.50%");
    }

    #[test]
    fn test_pnl_tone_zero_is_positive() {
        assert_eq!(PnlTone::from_value(0.0), PnlTone::Positive);
        assert_eq!(PnlTone::from_value(-0.01), PnlTone::Negative);
    }

    #[test]
    fn test_cents() {
        assert_eq!(cents(0.865), "86.5¢");
        assert_eq!(cents(1.0), "100.0¢");
    }

    #[test]
    fn test_sanitize_strips_control_bytes() {
        assert_eq!(sanitize("plain text"), "plain text");
        assert_eq!(sanitize("esc\x1b[31mred"), "esc[31mred");
        assert_eq!(sanitize("a\nb\tc"), "abc");
    }

    #[test]
    fn test_clock_time() {
        let t = Utc.with_ymd_and_hms(2026, 3, 3, 17, 5, 0).unwrap();
        assert_eq!(clock_time(Some(t)), "17:05");
        assert_eq!(clock_time(None), "-");
    }

    #[test]
    fn test_score_badge_tiers() {
        assert_eq!(ScoreBadge::new(0).tier, ScoreTier::Unscored);
        assert_eq!(ScoreBadge::new(0).label, "·");
        assert_eq!(ScoreBadge::new(80).tier, ScoreTier::High);
        assert_eq!(ScoreBadge::new(79).tier, ScoreTier::Mid);
        assert_eq!(ScoreBadge::new(60).tier, ScoreTier::Mid);
        assert_eq!(ScoreBadge::new(59).tier, ScoreTier::Low);
    }

    #[test]
    fn test_trajectory_codes() {
        assert_eq!(trajectory(30).label, "stable");
        assert_eq!(trajectory(20).label, "gradual");
        assert_eq!(trajectory(10).label, "rapid");
        let down = trajectory(0);
        assert_eq!(down.label, "down");
        assert!(down.muted);
    }

    #[test]
    fn test_rate_tier_boundaries() {
        assert_eq!(rate_tier(0.7), RateTier::Good);
        assert_eq!(rate_tier(0.69), RateTier::Warn);
        assert_eq!(rate_tier(0.5), RateTier::Warn);
        assert_eq!(rate_tier(0.49), RateTier::Bad);
    }
}
