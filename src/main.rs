//! Trading Journal — Entry Point
//!
//! Command-line front end over the journal library. Each invocation
//! loads the journal, runs one command to completion and exits.
//!
//! Wiring sequence:
//! 1. Parse CLI arguments
//! 2. Load config.toml (or defaults) + validate
//! 3. Init tracing (JSON structured logging on stderr)
//! 4. Open the FileStore and load the journal
//! 5. Dispatch the command (mutations write through immediately)

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveTime, Timelike, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use tracing::info;

use trading_journal::adapters::{ConsoleNotifier, FileStore, TextFileSink};
use trading_journal::config::{AppConfig, loader::load_config};
use trading_journal::domain::balance::Polarity;
use trading_journal::domain::calendar::CalendarMonth;
use trading_journal::domain::format::{
  format_currency, format_currency_with_sign, format_percent, format_percent_with_sign, long_date,
};
use trading_journal::domain::records::{RecordId, TradeDraft, TradePatch, WithdrawalDraft};
use trading_journal::domain::report::{ExportSelection, ReportContext};
use trading_journal::domain::series::Period;
use trading_journal::domain::settings::Theme;
use trading_journal::domain::stats::{StatsSummary, Window};
use trading_journal::error::JournalError;
use trading_journal::ports::{Level, Notifier};
use trading_journal::usecases::{Exporter, Journal, ReportRequest};

#[derive(Parser)]
#[command(name = "trading-journal")]
#[command(about = "Personal trading journal: trades, withdrawals, balance growth and reports")]
#[command(version)]
struct Cli {
  /// Path to config.toml
  #[arg(long, global = true, default_value = "config.toml")]
  config: PathBuf,

  /// Skip confirmation prompts for destructive commands
  #[arg(short, long, global = true)]
  yes: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Record, edit, delete and list trades
  #[command(subcommand)]
  Trade(TradeCommand),

  /// Record, delete and list withdrawals
  #[command(subcommand)]
  Withdraw(WithdrawCommand),

  /// Manage trading goals
  #[command(subcommand)]
  Goal(GoalCommand),

  /// Show the balance or change the starting balance
  #[command(subcommand)]
  Balance(BalanceCommand),

  /// Dashboard statistics
  Stats,

  /// Equity curve data points
  Chart {
    /// 7d, 1m or 12m
    #[arg(short, long, default_value = "7d")]
    period: Period,
  },

  /// Month calendar with daily net P&L
  Calendar {
    /// Month to show (YYYY-MM), defaults to the current month
    #[arg(short, long)]
    month: Option<String>,

    /// Months to move from the selected month (negative goes back)
    #[arg(short, long, default_value_t = 0, allow_hyphen_values = true)]
    offset: i32,
  },

  /// Everything recorded on one day
  Day {
    /// Date (YYYY-MM-DD)
    date: NaiveDate,
  },

  /// Most recent trades and withdrawals
  Activity {
    /// Number of rows (defaults to display.recent_activity_limit)
    #[arg(short, long)]
    limit: Option<usize>,
  },

  /// Export a report
  Report(ReportArgs),

  /// Show or edit trading rules
  #[command(subcommand)]
  Rules(RulesCommand),

  /// Show or switch the theme
  Theme {
    /// light or dark
    theme: Option<Theme>,
  },

  /// Show or rename the current user
  User {
    /// New display name
    #[arg(long)]
    name: Option<String>,

    /// New email
    #[arg(long)]
    email: Option<String>,
  },

  /// Delete ALL trades, withdrawals and goals and reset the balance
  Clear,
}

#[derive(Subcommand)]
enum TradeCommand {
  /// Record a new trade
  Add {
    /// Trade date (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    date: Option<NaiveDate>,

    /// Time of day (HH:MM), defaults to now
    #[arg(short, long, value_parser = parse_hhmm)]
    time: Option<NaiveTime>,

    /// Trade number within the day
    #[arg(short, long)]
    number: u8,

    /// Currency pair, e.g. EUR/USD
    #[arg(short, long)]
    pair: String,

    /// Strategy label
    #[arg(short, long)]
    strategy: String,

    /// Profit or loss (negative for a loss)
    #[arg(long, allow_hyphen_values = true)]
    pnl: Decimal,

    /// Free-text notes
    #[arg(long)]
    notes: Option<String>,
  },

  /// Edit fields of an existing trade
  Edit {
    id: RecordId,

    #[arg(short, long, value_parser = parse_hhmm)]
    time: Option<NaiveTime>,

    #[arg(short, long)]
    number: Option<u8>,

    #[arg(short, long)]
    pair: Option<String>,

    #[arg(short, long)]
    strategy: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pnl: Option<Decimal>,

    #[arg(long)]
    notes: Option<String>,
  },

  /// Delete a trade
  Delete { id: RecordId },

  /// List trades, newest first
  List {
    /// today, weekly, monthly or all
    #[arg(short, long, value_enum, default_value_t = ListWindow::All)]
    window: ListWindow,
  },
}

#[derive(Subcommand)]
enum WithdrawCommand {
  /// Record a withdrawal
  Add {
    /// Amount to withdraw (positive)
    #[arg(short, long)]
    amount: Decimal,

    /// Broker name
    #[arg(short, long)]
    broker: String,

    #[arg(short, long)]
    date: Option<NaiveDate>,

    #[arg(short, long, value_parser = parse_hhmm)]
    time: Option<NaiveTime>,

    #[arg(long)]
    notes: Option<String>,
  },

  /// Delete a withdrawal
  Delete { id: RecordId },

  /// List withdrawals, newest first
  List,
}

#[derive(Subcommand)]
enum GoalCommand {
  /// Write a new goal
  Add { content: String },
  /// Replace a goal's text
  Edit { id: RecordId, content: String },
  /// Delete a goal
  Delete { id: RecordId },
  /// List goals
  List,
}

#[derive(Subcommand)]
enum BalanceCommand {
  /// Current balance and growth
  Show,
  /// Set a new starting balance
  SetStarting { amount: Decimal },
}

#[derive(Subcommand)]
enum RulesCommand {
  /// Print the saved rules
  Show,
  /// Replace the saved rules (read from stdin when TEXT is omitted)
  Set { text: Option<String> },
  /// Remove the saved rules
  Clear,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ListWindow {
  Today,
  Weekly,
  Monthly,
  All,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportKind {
  Today,
  Weekly,
  Monthly,
  Trade,
  Withdrawal,
  Journal,
  Analytics,
  AllData,
  Selected,
  Rules,
  Dashboard,
}

#[derive(Args)]
struct ReportArgs {
  kind: ReportKind,

  /// Record id for trade and withdrawal reports
  #[arg(long)]
  id: Option<RecordId>,

  /// Include trades in a selected-data export
  #[arg(long)]
  trades: bool,

  /// Include withdrawals in a selected-data export
  #[arg(long)]
  withdrawals: bool,

  /// Include goals in a selected-data export
  #[arg(long)]
  goals: bool,

  /// Include settings in a selected-data export
  #[arg(long)]
  settings: bool,
}

impl ReportArgs {
  fn request(&self) -> Result<ReportRequest> {
    let id = || self.id.context("--id is required for this report");
    Ok(match self.kind {
      ReportKind::Today => ReportRequest::Today,
      ReportKind::Weekly => ReportRequest::Weekly,
      ReportKind::Monthly => ReportRequest::Monthly,
      ReportKind::Trade => ReportRequest::Trade(id()?),
      ReportKind::Withdrawal => ReportRequest::Withdrawal(id()?),
      ReportKind::Journal => ReportRequest::Journal,
      ReportKind::Analytics => ReportRequest::Analytics,
      ReportKind::AllData => ReportRequest::AllData,
      ReportKind::Selected => ReportRequest::Selected(ExportSelection {
        trades: self.trades,
        withdrawals: self.withdrawals,
        goals: self.goals,
        settings: self.settings,
      }),
      ReportKind::Rules => ReportRequest::TradingRules,
      ReportKind::Dashboard => ReportRequest::Dashboard,
    })
  }
}

fn main() -> Result<ExitCode> {
  let cli = Cli::parse();

  // ── 1. Load configuration from config.toml ──────────────
  let config = load_config(&cli.config).context("Failed to load configuration")?;

  // ── 2. Initialize structured JSON logging ───────────────
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.journal.log_level)),
    )
    .with_writer(std::io::stderr)
    .json()
    .init();

  info!(
    name = %config.journal.name,
    version = env!("CARGO_PKG_VERSION"),
    data_dir = %config.storage.data_dir,
    "Starting trading journal"
  );

  // ── 3. Open storage and load the journal ────────────────
  let store = FileStore::open(Path::new(&config.storage.data_dir), &config.storage.file_name)
    .context("Failed to open journal storage")?;
  let mut journal = Journal::open(store, config.journal_options());
  let mut notifier = ConsoleNotifier::new();

  // ── 4. Dispatch ─────────────────────────────────────────
  // Rejected input is shown as a toast; anything else is a real failure.
  match run(cli.command, cli.yes, &config, &mut journal, &mut notifier) {
    Err(e) => match e.downcast_ref::<JournalError>() {
      Some(rejection) if notifier.rejected(rejection) => Ok(ExitCode::FAILURE),
      _ => Err(e),
    },
    done => done,
  }
}

fn run(
  command: Command,
  yes: bool,
  config: &AppConfig,
  journal: &mut Journal<FileStore>,
  notifier: &mut ConsoleNotifier,
) -> Result<ExitCode> {
  let today = today();

  match command {
    Command::Trade(cmd) => run_trade(cmd, yes, journal, notifier, today)?,
    Command::Withdraw(cmd) => run_withdraw(cmd, yes, journal, notifier, today)?,
    Command::Goal(cmd) => run_goal(cmd, yes, journal, notifier, today)?,

    Command::Balance(BalanceCommand::Show) => print_balance(journal),
    Command::Balance(BalanceCommand::SetStarting { amount }) => {
      journal.set_starting_balance(amount)?;
      notifier.success(&format!(
        "Starting balance updated to {}",
        format_currency(amount)
      ));
      print_balance(journal);
    }

    Command::Stats => print_stats(&journal.state().summary(today)),

    Command::Chart { period } => {
      let series = journal.state().series(period, today);
      println!("Equity curve ({})", series.period);
      for point in &series.points {
        println!("  {:<18} {}", point.label, format_currency(point.balance));
      }
    }

    Command::Calendar { month, offset } => {
      let base = match month {
        Some(raw) => parse_month(&raw)?,
        None => CalendarMonth::containing(today),
      };
      print_calendar(journal, base.shift(offset));
    }

    Command::Day { date } => match journal.state().day_activity(date) {
      Some(activity) => {
        println!("{} (net {})", long_date(date), format_currency_with_sign(activity.net));
        for t in &activity.trades {
          println!(
            "  Trade {} {} {} {} {} {}",
            t.trade_number,
            t.time.format("%H:%M"),
            t.pair,
            t.strategy,
            format_currency_with_sign(t.pnl),
            t.notes
          );
        }
        for w in &activity.withdrawals {
          println!(
            "  Withdrawal {} {} {} {}",
            w.time.format("%H:%M"),
            w.broker,
            format_currency_with_sign(w.amount),
            w.notes
          );
        }
      }
      None => notifier.notify(Level::Info, "No activity on this date"),
    },

    Command::Activity { limit } => {
      let limit = limit.unwrap_or(config.display.recent_activity_limit);
      for item in journal.state().recent_activity(limit) {
        println!(
          "{} {} {:<10} {:<28} {:>14} {}",
          item.date(),
          item.time().format("%H:%M"),
          item.kind_label(),
          item.description(),
          format_currency_with_sign(item.amount()),
          item.status_label()
        );
      }
    }

    Command::Report(args) => {
      let request = args.request()?;
      let ctx = ReportContext::now(config.reports.software_name.clone());
      let sink = TextFileSink::new(&config.reports.export_dir);
      let mut exporter = Exporter::new(sink, ConsoleNotifier::new());
      // The exporter toasts its own failures.
      match exporter.export(request, journal.state(), &ctx) {
        Ok(_) => {}
        Err(e) if e.is_rejection() => return Ok(ExitCode::FAILURE),
        Err(e) => return Err(e.into()),
      }
    }

    Command::Rules(RulesCommand::Show) => match &journal.state().settings().trading_rules {
      Some(rules) => println!("{rules}"),
      None => println!("No trading rules saved"),
    },
    Command::Rules(RulesCommand::Set { text }) => {
      let text = match text {
        Some(text) => text,
        None => read_stdin().context("Failed to read trading rules from stdin")?,
      };
      if text.trim().is_empty() {
        notifier.error("Please enter your trading rules");
        return Ok(ExitCode::FAILURE);
      }
      journal.set_trading_rules(&text)?;
      notifier.success("Trading rules saved");
    }
    Command::Rules(RulesCommand::Clear) => {
      journal.set_trading_rules("")?;
      notifier.success("Trading rules cleared");
    }

    Command::Theme { theme: None } => println!("{}", journal.state().settings().theme),
    Command::Theme { theme: Some(theme) } => {
      journal.set_theme(theme)?;
      notifier.success(&format!("Switched to {theme} theme"));
    }

    Command::User { name, email } => {
      if let Some(name) = name {
        journal.set_user_name(&name)?;
        notifier.success("Username updated successfully!");
      }
      if let Some(email) = email {
        let mut user = journal.state().settings().user.clone();
        user.email = email.trim().to_string();
        journal.set_user(user)?;
      }
      let user = &journal.state().settings().user;
      println!("{} <{}>", user.display_name(), user.display_email());
    }

    Command::Clear => {
      if confirm(
        "WARNING: This will delete ALL your trading data, goals, withdrawals, and reset your account. This action cannot be undone. Are you sure?",
        yes,
      )? {
        journal.clear_all()?;
        notifier.success("All data cleared successfully!");
      }
    }
  }

  Ok(ExitCode::SUCCESS)
}

fn run_trade(
  cmd: TradeCommand,
  yes: bool,
  journal: &mut Journal<FileStore>,
  notifier: &mut ConsoleNotifier,
  today: NaiveDate,
) -> Result<()> {
  match cmd {
    TradeCommand::Add {
      date,
      time,
      number,
      pair,
      strategy,
      pnl,
      notes,
    } => {
      let trade = journal.add_trade(TradeDraft {
        date: date.unwrap_or(today),
        time: time.unwrap_or_else(now_time),
        trade_number: number,
        pair,
        strategy,
        pnl,
        notes,
      })?;
      notifier.success(&format!("Trade saved successfully! (id {})", trade.id));
      print_balance(journal);
    }
    TradeCommand::Edit {
      id,
      time,
      number,
      pair,
      strategy,
      pnl,
      notes,
    } => {
      let patch = TradePatch {
        time,
        trade_number: number,
        pair,
        strategy,
        pnl,
        notes,
      };
      if patch.is_empty() {
        notifier.notify(Level::Warning, "Nothing to update");
        return Ok(());
      }
      journal.update_trade(id, patch)?;
      notifier.success("Trade updated successfully!");
    }
    TradeCommand::Delete { id } => {
      if confirm(&format!("Delete trade {id}?"), yes)? {
        journal.delete_trade(id)?;
        notifier.success("Trade deleted successfully!");
        print_balance(journal);
      }
    }
    TradeCommand::List { window } => {
      let window = match window {
        ListWindow::Today => Some(Window::Today),
        ListWindow::Weekly => Some(Window::Weekly),
        ListWindow::Monthly => Some(Window::Monthly),
        ListWindow::All => None,
      };
      let trades = journal
        .state()
        .trades()
        .iter()
        .filter(|t| window.is_none_or(|w| w.contains(t.date, today)));
      for t in trades {
        println!(
          "{:>14} {} {} #{} {:<10} {:<14} {:>12} {:<4} {}",
          t.id,
          t.date,
          t.time.format("%H:%M"),
          t.trade_number,
          t.pair,
          t.strategy,
          format_currency_with_sign(t.pnl),
          t.status_label(),
          t.notes
        );
      }
    }
  }
  Ok(())
}

fn run_withdraw(
  cmd: WithdrawCommand,
  yes: bool,
  journal: &mut Journal<FileStore>,
  notifier: &mut ConsoleNotifier,
  today: NaiveDate,
) -> Result<()> {
  match cmd {
    WithdrawCommand::Add {
      amount,
      broker,
      date,
      time,
      notes,
    } => {
      let w = journal.add_withdrawal(WithdrawalDraft {
        date: date.unwrap_or(today),
        time: time.unwrap_or_else(now_time),
        broker,
        amount,
        notes,
      })?;
      notifier.success(&format!(
        "Withdrawal of {} processed. New balance: {}",
        format_currency(w.withdrawn()),
        format_currency(w.balance_after)
      ));
    }
    WithdrawCommand::Delete { id } => {
      if confirm(&format!("Delete withdrawal {id}?"), yes)? {
        journal.delete_withdrawal(id)?;
        notifier.success("Withdrawal deleted successfully!");
        print_balance(journal);
      }
    }
    WithdrawCommand::List => {
      for w in journal.state().withdrawals() {
        println!(
          "{:>14} {} {} {:<14} {:>12} {:>12} -> {:>12} {}",
          w.id,
          w.date,
          w.time.format("%H:%M"),
          w.broker,
          format_currency_with_sign(w.amount),
          format_currency(w.balance_before),
          format_currency(w.balance_after),
          w.notes
        );
      }
    }
  }
  Ok(())
}

fn run_goal(
  cmd: GoalCommand,
  yes: bool,
  journal: &mut Journal<FileStore>,
  notifier: &mut ConsoleNotifier,
  today: NaiveDate,
) -> Result<()> {
  match cmd {
    GoalCommand::Add { content } => {
      journal.add_goal(&content, today)?;
      notifier.success("Goal saved successfully!");
    }
    GoalCommand::Edit { id, content } => {
      journal.update_goal(id, &content)?;
      notifier.success("Goal saved successfully!");
    }
    GoalCommand::Delete { id } => {
      if confirm(&format!("Delete goal {id}?"), yes)? {
        journal.delete_goal(id)?;
        notifier.success("Goal deleted successfully!");
      }
    }
    GoalCommand::List => {
      for g in journal.state().goals() {
        println!("{:>14} {} {}", g.id, long_date(g.date), g.content);
      }
    }
  }
  Ok(())
}

// ── Output helpers ──────────────────────────────────────

fn print_balance(journal: &Journal<FileStore>) {
  let state = journal.state();
  let growth = state.growth();
  println!(
    "Balance {} | Starting {} | Growth {} ({}) [{}]",
    format_currency(state.account_balance()),
    format_currency(state.starting_balance()),
    format_currency_with_sign(growth.absolute),
    format_percent_with_sign(growth.percentage),
    growth.polarity().class()
  );
}

fn print_stats(summary: &StatsSummary) {
  println!("Balance:          {}", format_currency(summary.balance));
  println!("Starting balance: {}", format_currency(summary.starting_balance));
  println!(
    "Growth:           {} ({})",
    format_currency_with_sign(summary.growth.absolute),
    format_percent_with_sign(summary.growth.percentage)
  );
  for window in [&summary.today, &summary.weekly, &summary.monthly] {
    println!(
      "{:<8} net {:>12} | {} trades | {} withdrawals",
      window.window.label(),
      format_currency_with_sign(window.net),
      window.trade_count,
      window.withdrawal_count
    );
  }
  println!(
    "Today's trades:   {}/{} ({})",
    summary.today.trade_count,
    summary.daily_cap,
    format_percent(summary.cap_progress)
  );
  println!(
    "Win rate:         {} ({} W:L, {} break-even)",
    format_percent(summary.win_rate()),
    summary.outcomes.ratio_label(),
    summary.outcomes.break_even
  );
  println!(
    "Profit / loss:    {} / {}",
    format_currency(summary.profit_loss.total_profit),
    format_currency(summary.profit_loss.total_loss)
  );
  println!("Total withdrawn:  {}", format_currency(summary.total_withdrawn));
}

fn print_calendar(journal: &Journal<FileStore>, month: CalendarMonth) {
  let grid = journal.state().month_grid(month);
  println!("{:^35}", month.title());
  println!(" Sun  Mon  Tue  Wed  Thu  Fri  Sat");
  let mut cells: Vec<String> = (0..grid.leading_blanks).map(|_| "    ".to_string()).collect();
  for day in &grid.days {
    let marker = match day.polarity() {
      Some(Polarity::Profit) => '+',
      Some(Polarity::Loss) => '-',
      None => ' ',
    };
    cells.push(format!("{:>3}{marker}", day.date.format("%-d")));
  }
  for week in cells.chunks(7) {
    println!(" {}", week.join(" "));
  }
  println!();
  for day in grid.active_days() {
    println!(
      "  {} {} ({} trades, {} withdrawals)",
      long_date(day.date),
      format_currency_with_sign(day.net),
      day.trade_count,
      day.withdrawal_count
    );
  }
  println!("Month net: {}", format_currency_with_sign(grid.month_net()));
}

// ── Input helpers ───────────────────────────────────────

fn today() -> NaiveDate {
  Utc::now().date_naive()
}

/// Local wall-clock time truncated to minutes.
fn now_time() -> NaiveTime {
  let now = Local::now().time();
  now.with_second(0)
    .and_then(|t| t.with_nanosecond(0))
    .unwrap_or(now)
}

fn parse_hhmm(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
  NaiveTime::parse_from_str(raw.trim(), "%H:%M")
}

fn parse_month(raw: &str) -> Result<CalendarMonth> {
  let (year, month) = raw
    .split_once('-')
    .with_context(|| format!("Expected YYYY-MM, got {raw}"))?;
  let year: i32 = year.parse().with_context(|| format!("Invalid year in {raw}"))?;
  let month: u32 = month.parse().with_context(|| format!("Invalid month in {raw}"))?;
  CalendarMonth::new(year, month).with_context(|| format!("Invalid month {raw}"))
}

/// Ask on stdin unless `yes` was passed. Anything but y/yes declines.
fn confirm(prompt: &str, yes: bool) -> Result<bool> {
  if yes {
    return Ok(true);
  }
  print!("{prompt} [y/N] ");
  std::io::stdout().flush().context("Failed to flush stdout")?;

  let mut answer = String::new();
  std::io::stdin()
    .lock()
    .read_line(&mut answer)
    .context("Failed to read confirmation")?;
  let accepted = matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes");
  if !accepted {
    info!("Cancelled by user");
  }
  Ok(accepted)
}

fn read_stdin() -> Result<String> {
  let mut text = String::new();
  for line in std::io::stdin().lock().lines() {
    text.push_str(&line?);
    text.push('\n');
  }
  Ok(text.trim_end().to_string())
}
