//! Domain layer - Journal records and the rules derived from them.
//!
//! Pure logic: no I/O, no clock reads except id issuance and
//! `ReportContext::now`. Everything here is testable in isolation.

pub mod activity;
pub mod balance;
pub mod calendar;
pub mod format;
pub mod records;
pub mod report;
pub mod series;
pub mod settings;
pub mod state;
pub mod stats;

// Re-export core types for convenience
pub use activity::{ActivityItem, DEFAULT_RECENT_LIMIT, recent_activity};
pub use balance::{DEFAULT_STARTING_BALANCE, Growth, Polarity, recompute_balance};
pub use calendar::{CalendarMonth, DayActivity, DaySummary, MonthGrid};
pub use records::{
    DEFAULT_MAX_TRADES_PER_DAY, Goal, IdGenerator, RecordId, RecordKind, Trade, TradeDraft,
    TradeOutcome, TradePatch, Withdrawal, WithdrawalDraft,
};
pub use report::{ExportSelection, ReportContext, ReportDocument, ReportFormatter, ReportSection};
pub use series::{EquitySeries, Period, SeriesPoint, build_series};
pub use settings::{Settings, Theme, UserProfile};
pub use state::JournalState;
pub use stats::{OutcomeCounts, ProfitLoss, StatsSummary, Window, WindowStats};
