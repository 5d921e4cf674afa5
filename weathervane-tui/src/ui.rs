//! Ratatui rendering adapter over the retained `UiState`.
//!
//! All classification (tones, tiers, emphasis) was decided by the view
//! builders; this module only maps those tags to layout, color, and cells.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Sparkline, Table},
    Frame,
};

use weathervane_client::format::{PnlTone, RateTier, ScoreBadge, ScoreTier, ZoneTone};
use weathervane_client::freshness::FreshnessState;
use weathervane_client::view::{
    BreakdownRow, ClosedRow, Emphasis, OpportunityRow, Panel, PositionRow, StatusTone, TopScoreRow,
};
use weathervane_client::BotState;

use crate::app::UiState;

const C_GOOD: Color = Color::Rgb(100, 220, 100);
const C_BAD: Color = Color::Rgb(220, 100, 100);
const C_WARN: Color = Color::Rgb(180, 180, 100);
const C_DIM: Color = Color::Rgb(120, 120, 120);
const C_BRIGHT: Color = Color::Rgb(220, 220, 220);
const C_ACCENT: Color = Color::Rgb(100, 180, 220);

fn pnl_color(tone: PnlTone) -> Color {
    match tone {
        PnlTone::Positive => C_GOOD,
        PnlTone::Negative => C_BAD,
    }
}

fn score_color(tier: ScoreTier) -> Color {
    match tier {
        ScoreTier::High => C_GOOD,
        ScoreTier::Mid => C_WARN,
        ScoreTier::Low => C_BAD,
        ScoreTier::Unscored => C_DIM,
    }
}

fn zone_color(tone: ZoneTone) -> Color {
    match tone {
        ZoneTone::Strong => C_GOOD,
        ZoneTone::Medium => C_ACCENT,
        ZoneTone::Weak => C_WARN,
        ZoneTone::Muted => C_DIM,
    }
}

fn status_color(tone: StatusTone) -> Color {
    match tone {
        StatusTone::Win => C_GOOD,
        StatusTone::Loss => C_BAD,
        StatusTone::Warn => C_WARN,
        StatusTone::Info => C_ACCENT,
        StatusTone::Muted => C_DIM,
    }
}

fn tier_color(tier: RateTier) -> Color {
    match tier {
        RateTier::Good => C_GOOD,
        RateTier::Warn => C_WARN,
        RateTier::Bad => C_BAD,
    }
}

fn freshness_color(state: FreshnessState) -> Color {
    match state {
        FreshnessState::Fresh => C_GOOD,
        FreshnessState::Aging => C_WARN,
        FreshnessState::Stale => C_BAD,
        FreshnessState::NoData => C_DIM,
    }
}

fn score_cell(badge: &ScoreBadge) -> Cell<'_> {
    Cell::from(badge.label.as_str()).style(Style::default().fg(score_color(badge.tier)))
}

pub fn render(f: &mut Frame, state: &UiState) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(9),
        ])
        .split(f.area());

    render_header(f, outer[0], state);
    render_metrics(f, outer[1], state);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(outer[2]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(body[0]);
    render_positions(f, left[0], state);
    render_opportunities(f, left[1], state);

    // Insights gets space only while the backend reports any; otherwise the
    // panel stays hidden and top scores take the room.
    let right = if state.insights.is_some() {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7),
                Constraint::Min(5),
                Constraint::Length(12),
            ])
            .split(body[1])
    } else {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Min(5)])
            .split(body[1])
    };
    render_capital_chart(f, right[0], state);
    render_top_scores(f, right[1], state);
    if state.insights.is_some() {
        render_insights(f, right[2], state);
    }

    render_closed_trades(f, outer[3], state);
}

// ---------------------------------------------------------------------------
// Header + metrics
// ---------------------------------------------------------------------------

fn render_header(f: &mut Frame, area: Rect, state: &UiState) {
    let status_span = match state.status {
        Some(BotState::Running) => Span::styled(
            "● RUNNING",
            Style::default().fg(C_GOOD).add_modifier(Modifier::BOLD),
        ),
        Some(BotState::Stopped) => Span::styled(
            "○ STOPPED",
            Style::default().fg(C_BAD).add_modifier(Modifier::BOLD),
        ),
        None => Span::styled("… connecting", Style::default().fg(C_DIM)),
    };

    let uptime = state
        .metrics
        .as_ref()
        .and_then(|m| m.session_start)
        .map(|start| {
            let secs = (chrono::Utc::now() - start).num_seconds().max(0);
            format!("up {}h{:02}m", secs / 3600, (secs % 3600) / 60)
        })
        .unwrap_or_else(|| "up —".to_string());

    let line = Line::from(vec![
        Span::styled(
            "WEATHERVANE  ",
            Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
        ),
        status_span,
        Span::raw("  │  "),
        Span::styled(
            state.freshness.label.as_str(),
            Style::default().fg(freshness_color(state.freshness.state)),
        ),
        Span::raw("  │  "),
        Span::styled(uptime, Style::default().fg(C_DIM)),
        Span::styled("   [s]tart [x]stop [q]uit", Style::default().fg(C_DIM)),
    ]);

    let header = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn render_metrics(f: &mut Frame, area: Rect, state: &UiState) {
    let line = match &state.metrics {
        Some(m) => Line::from(vec![
            Span::styled("Capital ", Style::default().fg(C_DIM)),
            Span::styled(
                m.capital.as_str(),
                Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Avail ", Style::default().fg(C_DIM)),
            Span::styled(m.available.as_str(), Style::default().fg(C_BRIGHT)),
            Span::styled("  Init ", Style::default().fg(C_DIM)),
            Span::styled(m.initial.as_str(), Style::default().fg(C_DIM)),
            Span::styled("  P&L ", Style::default().fg(C_DIM)),
            Span::styled(
                m.pnl.as_str(),
                Style::default()
                    .fg(pnl_color(m.pnl_tone))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  ROI ", Style::default().fg(C_DIM)),
            Span::styled(m.roi.as_str(), Style::default().fg(pnl_color(m.roi_tone))),
            Span::styled("  W/L ", Style::default().fg(C_DIM)),
            Span::styled(m.outcome_summary.as_str(), Style::default().fg(C_BRIGHT)),
            Span::styled("  Top ", Style::default().fg(C_DIM)),
            Span::styled(m.top_score.to_string(), Style::default().fg(C_ACCENT)),
            Span::styled("  Markets ", Style::default().fg(C_DIM)),
            Span::styled(m.tracked_markets.to_string(), Style::default().fg(C_BRIGHT)),
            Span::styled("  Scans ", Style::default().fg(C_DIM)),
            Span::styled(m.scan_count.to_string(), Style::default().fg(C_BRIGHT)),
        ]),
        None => Line::from(Span::styled(
            "waiting for first poll...",
            Style::default().fg(C_DIM),
        )),
    };

    f.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

// ---------------------------------------------------------------------------
// Capital chart
// ---------------------------------------------------------------------------

fn render_capital_chart(f: &mut Frame, area: Rect, state: &UiState) {
    let block = Block::default().title(" CAPITAL ").borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chart = &state.chart;
    if chart.values.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled("no history yet", Style::default().fg(C_DIM))),
            inner,
        );
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    // Re-baseline on the series minimum so cent-level moves stay visible.
    let min = chart.values.iter().copied().fold(f64::INFINITY, f64::min);
    let data: Vec<u64> = chart
        .values
        .iter()
        .map(|v| ((v - min) * 100.0) as u64 + 1)
        .collect();
    let sparkline = Sparkline::default()
        .data(&data)
        .style(Style::default().fg(C_ACCENT));
    f.render_widget(sparkline, rows[0]);

    let first = chart.labels.first().map(String::as_str).unwrap_or("-");
    let last = chart.labels.last().map(String::as_str).unwrap_or("-");
    let latest = chart.values.last().copied().unwrap_or(0.0);
    let footer = Line::from(vec![
        Span::styled(format!("{} → {}", first, last), Style::default().fg(C_DIM)),
        Span::styled(
            format!("  ${:.2}", latest),
            Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(Paragraph::new(footer), rows[1]);
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

fn render_placeholder(f: &mut Frame, area: Rect, title: &str, message: &str) {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(Span::styled(message.to_string(), Style::default().fg(C_DIM))),
        inner,
    );
}

fn table_header(titles: &[&'static str]) -> Row<'static> {
    Row::new(
        titles
            .iter()
            .map(|t| Cell::from(*t).style(Style::default().add_modifier(Modifier::BOLD))),
    )
    .style(Style::default().bg(Color::DarkGray))
    .height(1)
}

fn render_positions(f: &mut Frame, area: Rect, state: &UiState) {
    let rows = match &state.positions {
        Panel::Placeholder(message) => {
            return render_placeholder(f, area, " OPEN POSITIONS ", message);
        }
        Panel::Rows(rows) => rows,
    };

    let table_rows: Vec<Row> = rows
        .iter()
        .map(|row: &PositionRow| {
            let question = if row.partial {
                format!("{} ½", row.question)
            } else {
                row.question.clone()
            };
            Row::new(vec![
                Cell::from(question),
                Cell::from(row.city.as_str()).style(Style::default().fg(C_DIM)),
                score_cell(&row.badge),
                Cell::from(row.entry.as_str()),
                Cell::from(row.current.as_str()).style(Style::default().fg(C_BRIGHT)),
                Cell::from(row.trail.as_str()).style(Style::default().fg(C_WARN)),
                Cell::from(row.allocated.as_str()),
                Cell::from(row.pnl.as_str()).style(
                    Style::default()
                        .fg(pnl_color(row.pnl_tone))
                        .add_modifier(Modifier::BOLD),
                ),
            ])
        })
        .collect();

    let table = Table::new(
        table_rows,
        [
            Constraint::Min(18),
            Constraint::Length(8),
            Constraint::Length(5),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(8),
            Constraint::Length(8),
        ],
    )
    .header(table_header(&[
        "Question", "City", "Scr", "Entry", "Now", "Trail", "Alloc", "P&L",
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" OPEN POSITIONS ({}) ", rows.len())),
    );
    f.render_widget(table, area);
}

fn render_opportunities(f: &mut Frame, area: Rect, state: &UiState) {
    let rows = match &state.opportunities {
        Panel::Placeholder(message) => {
            return render_placeholder(f, area, " OPPORTUNITIES ", message);
        }
        Panel::Rows(rows) => rows,
    };

    let table_rows: Vec<Row> = rows
        .iter()
        .map(|row: &OpportunityRow| {
            let row_style = match row.emphasis {
                Emphasis::Eligible => Style::default().fg(C_GOOD).add_modifier(Modifier::BOLD),
                Emphasis::InRange => Style::default().fg(C_WARN),
                Emphasis::Plain => Style::default(),
            };
            let traj_style = if row.trajectory.muted {
                Style::default().fg(C_DIM)
            } else {
                Style::default().fg(C_ACCENT)
            };
            Row::new(vec![
                Cell::from(row.question.as_str()),
                Cell::from(row.price.as_str()),
                Cell::from(row.volume.as_str()),
                score_cell(&row.badge),
                Cell::from(row.zone.as_str())
                    .style(Style::default().fg(zone_color(row.zone_tone))),
                Cell::from(format!("{} {}", row.trajectory.glyph, row.trajectory.label))
                    .style(traj_style),
                Cell::from(row.observations.to_string()).style(Style::default().fg(C_DIM)),
                Cell::from(if row.clob_ok { "✓" } else { "✗" }).style(Style::default().fg(
                    if row.clob_ok { C_GOOD } else { C_DIM },
                )),
            ])
            .style(row_style)
        })
        .collect();

    let table = Table::new(
        table_rows,
        [
            Constraint::Min(18),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(5),
            Constraint::Length(4),
            Constraint::Length(10),
            Constraint::Length(4),
            Constraint::Length(4),
        ],
    )
    .header(table_header(&[
        "Question", "NO", "Vol", "Scr", "Zn", "Trend", "Obs", "CLOB",
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" OPPORTUNITIES ({}) ", rows.len())),
    );
    f.render_widget(table, area);
}

fn render_top_scores(f: &mut Frame, area: Rect, state: &UiState) {
    let rows = match &state.top_scores {
        Panel::Placeholder(message) => {
            return render_placeholder(f, area, " TOP SCORES ", message);
        }
        Panel::Rows(rows) => rows,
    };

    let table_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(rank, row): (usize, &TopScoreRow)| {
            Row::new(vec![
                Cell::from(format!("{}", rank + 1)).style(Style::default().fg(C_DIM)),
                Cell::from(row.question.as_str()),
                score_cell(&row.badge),
                Cell::from(row.zone.as_str())
                    .style(Style::default().fg(zone_color(row.zone_tone))),
                Cell::from(row.zone_bonus.as_str()).style(Style::default().fg(C_DIM)),
                Cell::from(row.price.as_str()),
            ])
        })
        .collect();

    let table = Table::new(
        table_rows,
        [
            Constraint::Length(2),
            Constraint::Min(14),
            Constraint::Length(5),
            Constraint::Length(4),
            Constraint::Length(5),
            Constraint::Length(7),
        ],
    )
    .header(table_header(&["#", "Question", "Scr", "Zn", "Bonus", "NO"]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" TOP SCORES (this scan) "),
    );
    f.render_widget(table, area);
}

fn render_closed_trades(f: &mut Frame, area: Rect, state: &UiState) {
    let rows = match &state.closed_trades {
        Panel::Placeholder(message) => {
            return render_placeholder(f, area, " CLOSED TRADES ", message);
        }
        Panel::Rows(rows) => rows,
    };

    let table_rows: Vec<Row> = rows
        .iter()
        .map(|row: &ClosedRow| {
            Row::new(vec![
                Cell::from(row.closed_at.as_str()).style(Style::default().fg(C_DIM)),
                Cell::from(row.question.as_str()),
                score_cell(&row.badge),
                Cell::from(row.entry.as_str()),
                Cell::from(row.allocated.as_str()),
                Cell::from(row.pnl.as_str()).style(
                    Style::default()
                        .fg(pnl_color(row.pnl_tone))
                        .add_modifier(Modifier::BOLD),
                ),
                Cell::from(row.status)
                    .style(Style::default().fg(status_color(row.status_tone))),
                Cell::from(row.resolution.as_deref().unwrap_or("").to_string())
                    .style(Style::default().fg(C_DIM)),
            ])
        })
        .collect();

    let table = Table::new(
        table_rows,
        [
            Constraint::Length(6),
            Constraint::Min(18),
            Constraint::Length(5),
            Constraint::Length(7),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(11),
            Constraint::Min(16),
        ],
    )
    .header(table_header(&[
        "Time", "Question", "Scr", "Entry", "Alloc", "P&L", "Status", "Resolution",
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" CLOSED TRADES ({}) ", rows.len())),
    );
    f.render_widget(table, area);
}

// ---------------------------------------------------------------------------
// Insights
// ---------------------------------------------------------------------------

fn breakdown_lines<'a>(
    title: &'static str,
    panel: &'a Panel<BreakdownRow>,
    bar_width: usize,
) -> Vec<Line<'a>> {
    let mut lines = vec![Line::from(Span::styled(
        title,
        Style::default().fg(C_DIM).add_modifier(Modifier::BOLD),
    ))];

    match panel {
        Panel::Placeholder(message) => {
            lines.push(Line::from(Span::styled(
                *message,
                Style::default().fg(C_DIM),
            )));
        }
        Panel::Rows(rows) => {
            for row in rows {
                let filled = (row.fill_pct as usize * bar_width) / 100;
                let bar = format!(
                    "{}{}",
                    "█".repeat(filled),
                    "░".repeat(bar_width - filled)
                );
                lines.push(Line::from(vec![
                    Span::styled(format!("{:<10}", row.label), Style::default().fg(C_BRIGHT)),
                    Span::styled(bar, Style::default().fg(tier_color(row.tier))),
                    Span::styled(
                        format!(" {:>3}% ({})", row.fill_pct, row.trades),
                        Style::default().fg(C_DIM),
                    ),
                ]));
            }
        }
    }
    lines
}

fn render_insights(f: &mut Frame, area: Rect, state: &UiState) {
    let Some(panel) = &state.insights else {
        return;
    };

    let block = Block::default().title(" INSIGHTS ").borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let bar_width = (inner.width as usize).saturating_sub(22).clamp(6, 12);

    let mut lines = vec![Line::from(vec![
        Span::styled("Win rate ", Style::default().fg(C_DIM)),
        Span::styled(
            panel.summary.as_str(),
            Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
        ),
    ])];
    lines.extend(breakdown_lines("By city", &panel.by_city, bar_width));
    lines.extend(breakdown_lines("By hour", &panel.by_hour, bar_width));

    f.render_widget(Paragraph::new(lines), inner);
}
