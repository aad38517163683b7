//! Report formatter.
//!
//! Renders journal state into titled text documents. Layout, fonts and
//! the actual PDF belong to the `ReportSink` collaborator; this module
//! only decides what is said and what the file is called.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;

use super::format::{
    format_currency, format_currency_with_sign, format_percent, long_date,
};
use super::records::{Goal, RecordId, RecordKind, Trade, Withdrawal};
use super::state::JournalState;
use super::stats::{
    OutcomeCounts, ProfitLoss, Window, WindowStats, total_withdrawn, trades_in_window,
    withdrawals_in_window,
};
use crate::error::{JournalError, ValidationError};

/// Product name printed in report footers unless configured otherwise.
pub const DEFAULT_SOFTWARE_NAME: &str = "Trading Journal";

const NO_RULES: &str = "No trading rules saved";

/// A heading with its body lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    pub heading: String,
    pub lines: Vec<String>,
}

impl ReportSection {
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            lines: Vec::new(),
        }
    }

    #[must_use]
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    /// `label: value` line.
    #[must_use]
    pub fn field(self, label: &str, value: impl fmt::Display) -> Self {
        self.line(format!("{label}: {value}"))
    }

    #[must_use]
    pub fn lines(mut self, lines: impl IntoIterator<Item = String>) -> Self {
        self.lines.extend(lines);
        self
    }

    /// `fallback` when `lines` is empty.
    #[must_use]
    pub fn lines_or(self, lines: Vec<String>, fallback: &str) -> Self {
        if lines.is_empty() {
            self.line(fallback)
        } else {
            self.lines(lines)
        }
    }
}

/// A finished report, ready for a `ReportSink`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    pub title: String,
    /// Download name, e.g. `today-stats-2026-10-17.pdf`.
    pub filename: String,
    pub generated_at: NaiveDateTime,
    pub footer: String,
    pub sections: Vec<ReportSection>,
}

impl ReportDocument {
    /// Filename without its extension.
    pub fn stem(&self) -> &str {
        self.filename
            .rsplit_once('.')
            .map_or(self.filename.as_str(), |(stem, _)| stem)
    }
}

impl fmt::Display for ReportDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "Generated: {}", self.generated_at.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(f, "{}", "-".repeat(self.title.len().max(40)))?;
        for section in &self.sections {
            writeln!(f)?;
            writeln!(f, "{}:", section.heading)?;
            for line in &section.lines {
                writeln!(f, "{line}")?;
            }
        }
        writeln!(f)?;
        write!(f, "{}", self.footer)
    }
}

/// Clock and branding shared by every report in one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportContext {
    pub today: NaiveDate,
    pub generated_at: NaiveDateTime,
    pub software: String,
}

impl ReportContext {
    pub fn now(software: impl Into<String>) -> Self {
        let generated_at = Utc::now().naive_utc();
        Self {
            today: generated_at.date(),
            generated_at,
            software: software.into(),
        }
    }
}

/// Which collections a selected-data export includes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSelection {
    pub trades: bool,
    pub withdrawals: bool,
    pub goals: bool,
    pub settings: bool,
}

impl ExportSelection {
    pub const fn is_empty(&self) -> bool {
        !(self.trades || self.withdrawals || self.goals || self.settings)
    }

    /// Selected part names in export order.
    pub fn parts(&self) -> Vec<&'static str> {
        [
            (self.trades, "trades"),
            (self.withdrawals, "withdrawals"),
            (self.goals, "goals"),
            (self.settings, "settings"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect()
    }
}

/// Builds report documents from a journal snapshot.
pub struct ReportFormatter<'a> {
    state: &'a JournalState,
    ctx: &'a ReportContext,
}

impl<'a> ReportFormatter<'a> {
    pub const fn new(state: &'a JournalState, ctx: &'a ReportContext) -> Self {
        Self { state, ctx }
    }

    // ── Period summaries ────────────────────────

    pub fn today(&self) -> ReportDocument {
        let today = self.ctx.today;
        let s = self.state;
        let stats = self.window(Window::Today);
        let trades = self.trades_in(Window::Today);
        let withdrawals = self.withdrawals_in(Window::Today);

        let trade_lines: Vec<String> = trades
            .iter()
            .map(|t| {
                format!(
                    "Trade {} ({}): {} | {} | P&L {} | Notes: {}",
                    t.trade_number,
                    t.time.format("%H:%M"),
                    t.pair,
                    t.strategy,
                    format_currency_with_sign(t.pnl),
                    t.notes
                )
            })
            .collect();
        let withdrawal_lines: Vec<String> = withdrawals
            .iter()
            .map(|w| {
                format!(
                    "Withdrawal ({}): {} | Amount {} | Notes: {}",
                    w.time.format("%H:%M"),
                    w.broker,
                    format_currency_with_sign(w.amount),
                    w.notes
                )
            })
            .collect();

        self.document(
            format!("Today's Trading Stats - {today}"),
            format!("today-stats-{today}.pdf"),
            vec![
                ReportSection::new("TODAY'S SUMMARY").field("Date", today),
                ReportSection::new("ACCOUNT STATUS")
                    .field("Current Balance", format_currency(s.account_balance()))
                    .field("Starting Balance", format_currency(s.starting_balance()))
                    .field("Today's Net P&L", format_currency_with_sign(stats.net))
                    .field(
                        "Today's Trades",
                        format!("{}/{}", stats.trade_count, s.daily_cap()),
                    ),
                ReportSection::new("TRADES TODAY")
                    .lines_or(trade_lines, "No trades recorded today."),
                ReportSection::new("WITHDRAWALS TODAY")
                    .lines_or(withdrawal_lines, "No withdrawals today."),
            ],
        )
    }

    pub fn weekly(&self) -> ReportDocument {
        let today = self.ctx.today;
        let s = self.state;
        let stats = self.window(Window::Weekly);

        let trade_lines: Vec<String> = self
            .trades_in(Window::Weekly)
            .iter()
            .map(|t| {
                format!(
                    "{} {} - Trade {}: {} | {} | P&L {} | {}",
                    t.date,
                    t.time.format("%H:%M"),
                    t.trade_number,
                    t.pair,
                    t.strategy,
                    format_currency_with_sign(t.pnl),
                    t.status_label()
                )
            })
            .collect();
        let withdrawal_lines: Vec<String> = self
            .withdrawals_in(Window::Weekly)
            .iter()
            .map(|w| {
                format!(
                    "{} {}: {} | Amount {} | Balance After {}",
                    w.date,
                    w.time.format("%H:%M"),
                    w.broker,
                    format_currency_with_sign(w.amount),
                    format_currency(w.balance_after)
                )
            })
            .collect();

        self.document(
            "Weekly Trading Performance Report".to_string(),
            format!("weekly-stats-{today}.pdf"),
            vec![
                ReportSection::new("WEEKLY REPORT (Last 7 Days)").field(
                    "Period",
                    format!("{} to {today}", Window::Weekly.start(today)),
                ),
                ReportSection::new("ACCOUNT PERFORMANCE")
                    .field("Current Balance", format_currency(s.account_balance()))
                    .field("Starting Balance", format_currency(s.starting_balance()))
                    .field("Weekly Net", format_currency_with_sign(stats.net))
                    .field("Total Trades", stats.trade_count)
                    .field("Total Withdrawals", stats.withdrawal_count),
                ReportSection::new("WEEKLY TRADES")
                    .lines_or(trade_lines, "No trades recorded this week."),
                ReportSection::new("WEEKLY WITHDRAWALS")
                    .lines_or(withdrawal_lines, "No withdrawals this week."),
            ],
        )
    }

    pub fn monthly(&self) -> ReportDocument {
        let today = self.ctx.today;
        let stats = self.window(Window::Monthly);

        self.document(
            "Monthly Trading Performance Report".to_string(),
            format!("monthly-stats-{today}.pdf"),
            vec![
                ReportSection::new("MONTHLY REPORT (Last 30 Days)").field(
                    "Period",
                    format!("{} to {today}", Window::Monthly.start(today)),
                ),
                self.growth_section("ACCOUNT PERFORMANCE")
                    .field("Monthly Net", format_currency_with_sign(stats.net))
                    .field("Total Trades", stats.trade_count)
                    .field("Total Withdrawals", stats.withdrawal_count),
            ],
        )
    }

    // ── Single records ──────────────────────────

    pub fn trade(&self, id: RecordId) -> Result<ReportDocument, JournalError> {
        let t = self
            .state
            .trade(id)
            .ok_or(JournalError::not_found(RecordKind::Trade, id))?;

        Ok(self.document(
            format!("Trade Details - {} - {}", t.pair, long_date(t.date)),
            format!("trade-{}-{}.pdf", t.id, t.date),
            vec![
                ReportSection::new("TRADE DETAILS")
                    .field("Date", long_date(t.date))
                    .field("Time", t.time.format("%H:%M"))
                    .field("Trade Number", t.trade_number)
                    .field("Currency Pair", &t.pair)
                    .field("Strategy", &t.strategy)
                    .field("P&L", format_currency_with_sign(t.pnl))
                    .field("Status", t.status_label())
                    .field("Notes", &t.notes),
                self.growth_section("ACCOUNT INFORMATION"),
            ],
        ))
    }

    pub fn withdrawal(&self, id: RecordId) -> Result<ReportDocument, JournalError> {
        let w = self
            .state
            .withdrawal(id)
            .ok_or(JournalError::not_found(RecordKind::Withdrawal, id))?;

        Ok(self.document(
            format!("Withdrawal Receipt - {}", long_date(w.date)),
            format!("withdrawal-{}-{}.pdf", w.id, w.date),
            vec![
                ReportSection::new("WITHDRAWAL DETAILS")
                    .field("Date", long_date(w.date))
                    .field("Time", w.time.format("%H:%M"))
                    .field("Transaction ID", format!("WD-{}", w.id))
                    .field("Broker", &w.broker)
                    .field("Amount", format_currency_with_sign(w.amount)),
                ReportSection::new("ACCOUNT INFORMATION")
                    .field("Balance Before", format_currency(w.balance_before))
                    .field("Balance After", format_currency(w.balance_after)),
                ReportSection::new("NOTES").line(w.notes.clone()),
                ReportSection::new("TRANSACTION SUMMARY")
                    .field("Status", "PROCESSED")
                    .field("Type", "WITHDRAWAL"),
            ],
        ))
    }

    // ── Whole-journal exports ───────────────────

    pub fn journal(&self) -> ReportDocument {
        let s = self.state;
        let trade_lines = s.trades().iter().map(compact_trade_line).collect();
        let withdrawal_lines = s.withdrawals().iter().map(compact_withdrawal_line).collect();

        self.document(
            "Complete Trading Journal".to_string(),
            format!("trading-journal-{}.pdf", self.ctx.today),
            vec![
                self.growth_section("ACCOUNT SUMMARY")
                    .field("Total Trades", s.trades().len())
                    .field("Total Withdrawals", s.withdrawals().len()),
                self.performance_section("PERFORMANCE METRICS"),
                ReportSection::new(format!("ALL TRADES ({} Total)", s.trades().len()))
                    .lines_or(trade_lines, "No trades recorded."),
                ReportSection::new(format!("ALL WITHDRAWALS ({} Total)", s.withdrawals().len()))
                    .lines_or(withdrawal_lines, "No withdrawals recorded."),
            ],
        )
    }

    pub fn analytics(&self) -> ReportDocument {
        let s = self.state;
        let outcomes = OutcomeCounts::tally(s.trades());
        let pl = ProfitLoss::of(s.trades());

        self.document(
            "Trading Analytics Report".to_string(),
            format!("analytics-report-{}.pdf", self.ctx.today),
            vec![
                ReportSection::new("PERFORMANCE OVERVIEW")
                    .field("Total Trades", outcomes.total())
                    .field("Winning Trades", outcomes.winning)
                    .field("Losing Trades", outcomes.losing)
                    .field("Break-even Trades", outcomes.break_even)
                    .field("Win Rate", format_percent(outcomes.win_rate()))
                    .field("Win/Loss Ratio", outcomes.ratio_label()),
                ReportSection::new("PROFIT ANALYSIS")
                    .field("Total Profit", format_currency(pl.total_profit))
                    .field("Total Loss", format_currency(pl.total_loss))
                    .field("Net Profit", format_currency_with_sign(pl.net())),
                ReportSection::new("WITHDRAWAL ANALYSIS")
                    .field("Total Withdrawals", s.withdrawals().len())
                    .field("Total Withdrawn", format_currency(total_withdrawn(s.withdrawals()))),
                self.growth_section("ACCOUNT GROWTH"),
            ],
        )
    }

    pub fn all_data(&self) -> ReportDocument {
        let s = self.state;
        let records = s.trades().len() + s.withdrawals().len() + s.goals().len();

        let mut sections = vec![
            self.growth_section("ACCOUNT INFORMATION"),
            self.performance_section("PERFORMANCE SUMMARY"),
        ];
        sections.extend(self.record_sections());
        sections.push(
            ReportSection::new("EXPORT DETAILS")
                .field("Generated", self.generated_label())
                .field("Total Records", records)
                .field("Software", &self.ctx.software),
        );

        self.document(
            "Complete Trading Data Backup".to_string(),
            format!("complete-trading-data-{}.pdf", self.ctx.today),
            sections,
        )
    }

    /// Export only the selected collections.
    pub fn selected(&self, selection: ExportSelection) -> Result<ReportDocument, ValidationError> {
        if selection.is_empty() {
            return Err(ValidationError::NothingSelected);
        }

        let s = self.state;
        let [trades, withdrawals, goals] = self.record_sections();
        let mut sections = Vec::new();
        if selection.trades {
            sections.push(self.performance_section(format!(
                "TRADES DATA ({} Total)",
                s.trades().len()
            )));
            sections.push(trades);
        }
        if selection.withdrawals {
            sections.push(withdrawals);
        }
        if selection.goals {
            sections.push(goals);
        }
        if selection.settings {
            sections.push(self.settings_section());
        }
        sections.push(
            ReportSection::new("EXPORT DETAILS")
                .field("Generated", self.generated_label())
                .field("Software", &self.ctx.software),
        );

        let parts: String = selection.parts().iter().map(|p| format!("{p}-")).collect();
        Ok(self.document(
            "Selected Data Export".to_string(),
            format!("selected-data-{parts}{}.pdf", self.ctx.today),
            sections,
        ))
    }

    /// The saved rules, one line each. Lines indented with `-` become
    /// bullets.
    pub fn trading_rules(&self) -> ReportDocument {
        let rules = self
            .state
            .settings()
            .trading_rules
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or(NO_RULES);

        let lines = rules.lines().map(|line| {
            let trimmed = line.trim_start();
            if line.starts_with(' ') && trimmed.starts_with('-') {
                format!("  • {}", trimmed.trim_start_matches('-').trim())
            } else {
                line.trim_end().to_string()
            }
        });

        let mut doc = self.document(
            "TRADING RULES".to_string(),
            format!("trading-rules-{}.pdf", self.ctx.today),
            vec![ReportSection::new("Personal Trading Rules & Guidelines").lines(lines)],
        );
        doc.footer = format!(
            "{} - Trading Rules\nGenerated by: {}",
            self.ctx.software,
            self.state.settings().user.display_name()
        );
        doc
    }

    pub fn dashboard(&self) -> ReportDocument {
        let s = self.state;
        let today = self.window(Window::Today);
        let weekly = self.window(Window::Weekly);
        let monthly = self.window(Window::Monthly);
        let summary = s.summary(self.ctx.today);

        self.document(
            "Professional Trading Dashboard Report".to_string(),
            format!("dashboard-report-{}.pdf", self.ctx.today),
            vec![
                ReportSection::new("DASHBOARD SNAPSHOT")
                    .field("Report Date", long_date(self.ctx.today))
                    .field("Account Name", s.settings().user.display_name()),
                self.growth_section("ACCOUNT OVERVIEW"),
                ReportSection::new("DAILY PERFORMANCE")
                    .field("Today's Net P&L", format_currency_with_sign(today.net))
                    .field(
                        "Today's Trades",
                        format!("{}/{}", today.trade_count, s.daily_cap()),
                    )
                    .field("Today's Withdrawals", today.withdrawal_count)
                    .field("Daily Progress", format!("{}%", summary.cap_progress.round())),
                window_section("WEEKLY PERFORMANCE", "Weekly", &weekly, 7),
                window_section("MONTHLY PERFORMANCE", "Monthly", &monthly, 30),
                ReportSection::new("WIN RATE")
                    .field("Win Rate", format_percent(summary.win_rate()))
                    .field("Win/Loss Ratio", summary.outcomes.ratio_label()),
            ],
        )
    }

    // ── Shared sections ─────────────────────────

    fn document(
        &self,
        title: String,
        filename: String,
        sections: Vec<ReportSection>,
    ) -> ReportDocument {
        ReportDocument {
            title,
            filename,
            generated_at: self.ctx.generated_at,
            footer: self.ctx.software.clone(),
            sections,
        }
    }

    fn window(&self, window: Window) -> WindowStats {
        WindowStats::compute(
            self.state.trades(),
            self.state.withdrawals(),
            window,
            self.ctx.today,
        )
    }

    fn trades_in(&self, window: Window) -> Vec<&'a Trade> {
        trades_in_window(self.state.trades(), window, self.ctx.today)
    }

    fn withdrawals_in(&self, window: Window) -> Vec<&'a Withdrawal> {
        withdrawals_in_window(self.state.withdrawals(), window, self.ctx.today)
    }

    fn generated_label(&self) -> String {
        self.ctx.generated_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Current/starting balance and growth.
    fn growth_section(&self, heading: impl Into<String>) -> ReportSection {
        let s = self.state;
        let growth = s.growth();
        ReportSection::new(heading)
            .field("Current Balance", format_currency(s.account_balance()))
            .field("Starting Balance", format_currency(s.starting_balance()))
            .field("Total Growth", format_currency_with_sign(growth.absolute))
            .field("Growth %", format_percent(growth.percentage))
    }

    /// Outcome counts and P&L totals over all trades.
    fn performance_section(&self, heading: impl Into<String>) -> ReportSection {
        let trades = self.state.trades();
        let withdrawals = self.state.withdrawals();
        let outcomes = OutcomeCounts::tally(trades);
        let pl = ProfitLoss::of(trades);
        ReportSection::new(heading)
            .field("Total Trades", outcomes.total())
            .field("Winning Trades", outcomes.winning)
            .field("Losing Trades", outcomes.losing)
            .field("Win Rate", format_percent(outcomes.win_rate()))
            .field("Total Profit", format_currency(pl.total_profit))
            .field("Total Loss", format_currency(pl.total_loss))
            .field("Net Profit from Trades", format_currency_with_sign(pl.net()))
            .field("Total Withdrawals", withdrawals.len())
            .field("Total Withdrawn", format_currency(total_withdrawn(withdrawals)))
    }

    /// Full listings of trades, withdrawals and goals.
    fn record_sections(&self) -> [ReportSection; 3] {
        let s = self.state;
        [
            ReportSection::new(format!("ALL TRADES ({} Total)", s.trades().len()))
                .lines_or(s.trades().iter().map(detailed_trade_line).collect(), "No trades recorded."),
            ReportSection::new(format!("ALL WITHDRAWALS ({} Total)", s.withdrawals().len()))
                .field(
                    "Total Withdrawn",
                    format_currency(total_withdrawn(s.withdrawals())),
                )
                .lines(s.withdrawals().iter().map(detailed_withdrawal_line)),
            ReportSection::new(format!("TRADING GOALS ({} Total)", s.goals().len()))
                .lines_or(s.goals().iter().map(goal_line).collect(), "No goals recorded."),
        ]
    }

    fn settings_section(&self) -> ReportSection {
        let settings = self.state.settings();
        let user = &settings.user;
        let created = user
            .created_at
            .as_deref()
            .and_then(|ts| ts.split('T').next())
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map_or_else(|| "Unknown".to_string(), long_date);

        ReportSection::new("SETTINGS DATA")
            .field("Username", non_empty_or(&user.name, "Not set"))
            .field("Email", non_empty_or(&user.email, "Not set"))
            .field("Account Created", created)
            .field("Theme", settings.theme)
            .line("Trading Rules:")
            .line(
                settings
                    .trading_rules
                    .clone()
                    .unwrap_or_else(|| NO_RULES.to_string()),
            )
    }
}

fn window_section(heading: &str, label: &str, stats: &WindowStats, days: u32) -> ReportSection {
    let avg = if stats.trade_count > 0 {
        stats.net / Decimal::from(days)
    } else {
        Decimal::ZERO
    };
    ReportSection::new(heading)
        .field(&format!("{label} Net P&L"), format_currency_with_sign(stats.net))
        .field(&format!("{label} Trades"), stats.trade_count)
        .field(&format!("{label} Withdrawals"), stats.withdrawal_count)
        .field("Avg Daily Net", format_currency_with_sign(avg))
}

fn compact_trade_line(t: &Trade) -> String {
    format!(
        "{} {} | Trade {} | {} | {} | P&L: {} | Notes: {}",
        t.date,
        t.time.format("%H:%M"),
        t.trade_number,
        t.pair,
        t.strategy,
        format_currency_with_sign(t.pnl),
        t.notes
    )
}

fn compact_withdrawal_line(w: &Withdrawal) -> String {
    format!(
        "{} {} | {} | Amount: {} | Notes: {}",
        w.date,
        w.time.format("%H:%M"),
        w.broker,
        format_currency_with_sign(w.amount),
        w.notes
    )
}

fn detailed_trade_line(t: &Trade) -> String {
    format!(
        "{} {} | Trade {} | Pair: {} | Strategy: {} | P&L: {} | Notes: {}",
        long_date(t.date),
        t.time.format("%H:%M"),
        t.trade_number,
        t.pair,
        t.strategy,
        format_currency_with_sign(t.pnl),
        t.notes
    )
}

fn detailed_withdrawal_line(w: &Withdrawal) -> String {
    format!(
        "{} {} | Broker: {} | Amount: {} | Before: {} | After: {} | Notes: {}",
        long_date(w.date),
        w.time.format("%H:%M"),
        w.broker,
        format_currency_with_sign(w.amount),
        format_currency(w.balance_before),
        format_currency(w.balance_after),
        w.notes
    )
}

fn goal_line(g: &Goal) -> String {
    format!("{}: {}", long_date(g.date), g.content)
}

fn non_empty_or<'s>(value: &'s str, fallback: &'s str) -> &'s str {
    if value.trim().is_empty() { fallback } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::records::{TradeDraft, WithdrawalDraft};
    use chrono::NaiveTime;
    use rust_decimal_macros::dec;

    fn ctx() -> ReportContext {
        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        ReportContext {
            today,
            generated_at: today.and_hms_opt(8, 30, 0).unwrap(),
            software: "Trading Journal".to_string(),
        }
    }

    fn state() -> JournalState {
        let today = ctx().today;
        let mut state = JournalState::default();
        for (n, pnl) in [(1, dec!(100)), (2, dec!(-50)), (3, dec!(0)), (4, dec!(75))] {
            state
                .add_trade(TradeDraft {
                    date: today,
                    time: NaiveTime::from_hms_opt(9, n.into(), 0).unwrap(),
                    trade_number: n,
                    pair: "EUR/USD".to_string(),
                    strategy: "Breakout".to_string(),
                    pnl,
                    notes: None,
                })
                .unwrap();
        }
        state
            .add_withdrawal(WithdrawalDraft {
                date: today,
                time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
                broker: "Oanda".to_string(),
                amount: dec!(125),
                notes: Some("Rent".to_string()),
            })
            .unwrap();
        state
    }

    #[test]
    fn test_today_report() {
        let state = state();
        let ctx = ctx();
        let doc = ReportFormatter::new(&state, &ctx).today();
        assert_eq!(doc.filename, "today-stats-2026-10-17.pdf");
        assert_eq!(doc.stem(), "today-stats-2026-10-17");
        let text = doc.to_string();
        assert!(text.contains("Today's Trades: 4/4"));
        assert!(text.contains("Today's Net P&L: +$0.00"));
        assert!(text.contains("Current Balance: $10,000.00"));
        assert!(text.contains("Oanda | Amount -$125.00"));
    }

    #[test]
    fn test_weekly_report_lists_only_last_seven_days() {
        let mut state = state();
        let ctx = ctx();
        for (ago, pair) in [(3, "GBP/USD"), (20, "USD/JPY")] {
            state
                .add_trade(TradeDraft {
                    date: ctx.today - chrono::Days::new(ago),
                    time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                    trade_number: 1,
                    pair: pair.to_string(),
                    strategy: "Range".to_string(),
                    pnl: dec!(40),
                    notes: None,
                })
                .unwrap();
        }

        let text = ReportFormatter::new(&state, &ctx).weekly().to_string();
        assert!(text.contains("GBP/USD"));
        assert!(!text.contains("USD/JPY"));
        assert!(text.contains("Total Trades: 5"));
        assert!(text.contains("Oanda | Amount -$125.00"));
    }

    #[test]
    fn test_empty_today_report_uses_fallbacks() {
        let state = JournalState::default();
        let ctx = ctx();
        let text = ReportFormatter::new(&state, &ctx).today().to_string();
        assert!(text.contains("No trades recorded today."));
        assert!(text.contains("No withdrawals today."));
    }

    #[test]
    fn test_analytics_win_rate_excludes_break_even() {
        let state = state();
        let ctx = ctx();
        let text = ReportFormatter::new(&state, &ctx).analytics().to_string();
        assert!(text.contains("Win Rate: 66.7%"));
        assert!(text.contains("Win/Loss Ratio: 2:1"));
        assert!(text.contains("Total Loss: $50.00"));
    }

    #[test]
    fn test_trade_and_withdrawal_documents() {
        let state = state();
        let ctx = ctx();
        let formatter = ReportFormatter::new(&state, &ctx);
        let trade = &state.trades()[0];
        let doc = formatter.trade(trade.id).unwrap();
        assert_eq!(doc.filename, format!("trade-{}-2026-10-17.pdf", trade.id));
        assert!(doc.title.contains("Oct 17, 2026"));

        let w = &state.withdrawals()[0];
        let receipt = formatter.withdrawal(w.id).unwrap().to_string();
        assert!(receipt.contains(&format!("Transaction ID: WD-{}", w.id)));
        assert!(receipt.contains("Balance Before: $10,125.00"));
        assert!(receipt.contains("Balance After: $10,000.00"));

        assert!(formatter.trade(RecordId(1)).is_err());
    }

    #[test]
    fn test_selected_export() {
        let state = state();
        let ctx = ctx();
        let formatter = ReportFormatter::new(&state, &ctx);
        assert_eq!(
            formatter.selected(ExportSelection::default()),
            Err(ValidationError::NothingSelected)
        );

        let doc = formatter
            .selected(ExportSelection {
                trades: true,
                goals: true,
                ..ExportSelection::default()
            })
            .unwrap();
        assert_eq!(doc.filename, "selected-data-trades-goals-2026-10-17.pdf");
        assert!(doc.sections.iter().any(|s| s.heading.starts_with("TRADING GOALS")));
        assert!(!doc.sections.iter().any(|s| s.heading.starts_with("ALL WITHDRAWALS")));
    }

    #[test]
    fn test_trading_rules_bullets() {
        let mut state = JournalState::default();
        state.settings_mut().trading_rules =
            Some("Entries:\n  - Wait for the close\nNever average down".to_string());
        let ctx = ctx();
        let doc = ReportFormatter::new(&state, &ctx).trading_rules();
        assert_eq!(doc.filename, "trading-rules-2026-10-17.pdf");
        assert_eq!(
            doc.sections[0].lines,
            vec!["Entries:", "  • Wait for the close", "Never average down"]
        );
        assert!(doc.footer.contains("Generated by: Trader"));

        let empty = ReportFormatter::new(&JournalState::default(), &ctx).trading_rules();
        assert_eq!(empty.sections[0].lines, vec![NO_RULES]);
    }

    #[test]
    fn test_whole_journal_filenames() {
        let state = state();
        let ctx = ctx();
        let f = ReportFormatter::new(&state, &ctx);
        assert_eq!(f.weekly().filename, "weekly-stats-2026-10-17.pdf");
        assert_eq!(f.monthly().filename, "monthly-stats-2026-10-17.pdf");
        assert_eq!(f.journal().filename, "trading-journal-2026-10-17.pdf");
        assert_eq!(f.all_data().filename, "complete-trading-data-2026-10-17.pdf");
        assert_eq!(f.dashboard().filename, "dashboard-report-2026-10-17.pdf");
        assert!(f.all_data().to_string().contains("Total Records: 5"));
    }
}
