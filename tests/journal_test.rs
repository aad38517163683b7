//! Integration Tests - Journal Use Case over Store Adapters
//!
//! Exercises the write-through journal against the in-memory store,
//! the file store and a mockall store that fails on demand.

use chrono::{NaiveDate, NaiveTime};
use mockall::mock;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use trading_journal::adapters::{ConsoleNotifier, FileStore, MemoryStore};
use trading_journal::domain::records::{RecordId, TradeDraft, TradePatch, WithdrawalDraft};
use trading_journal::domain::settings::Theme;
use trading_journal::error::{JournalError, StorageError, ValidationError};
use trading_journal::ports::Notifier;
use trading_journal::ports::storage::{KeyValueStore, keys};
use trading_journal::usecases::{Journal, JournalOptions};

// ---- Mock Definitions ----

mock! {
    pub Store {}

    impl KeyValueStore for Store {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
        fn remove(&mut self, key: &str) -> Result<(), StorageError>;
    }
}

// ---- Helpers ----

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
}

fn draft(date: NaiveDate, number: u8, pnl: Decimal) -> TradeDraft {
    TradeDraft {
        date,
        time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        trade_number: number,
        pair: "EUR/USD".to_string(),
        strategy: "Breakout".to_string(),
        pnl,
        notes: None,
    }
}

fn withdrawal(date: NaiveDate, amount: Decimal) -> WithdrawalDraft {
    WithdrawalDraft {
        date,
        time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        broker: "IC Markets".to_string(),
        amount,
        notes: Some("Monthly payout".to_string()),
    }
}

fn memory_journal() -> Journal<MemoryStore> {
    Journal::open(MemoryStore::new(), JournalOptions::default())
}

// ---- Record keeping ----

#[test]
fn test_fifth_trade_on_same_day_is_rejected() {
    let mut journal = memory_journal();
    for n in 1..=4 {
        journal.add_trade(draft(day(17), n, dec!(25))).unwrap();
    }

    let err = journal.add_trade(draft(day(17), 4, dec!(25))).unwrap_err();
    assert!(matches!(
        err,
        JournalError::Validation(ValidationError::DailyCapReached { cap: 4, .. })
    ));
    assert_eq!(journal.state().trades().len(), 4);
    assert_eq!(journal.state().account_balance(), dec!(10100));

    // Another day is unaffected by the cap.
    journal.add_trade(draft(day(18), 1, dec!(-10))).unwrap();
    assert_eq!(journal.state().account_balance(), dec!(10090));
}

#[test]
fn test_configured_cap_is_applied() {
    let options = JournalOptions {
        max_trades_per_day: 2,
        ..JournalOptions::default()
    };
    let mut journal = Journal::open(MemoryStore::new(), options);
    journal.add_trade(draft(day(17), 1, dec!(5))).unwrap();
    journal.add_trade(draft(day(17), 2, dec!(5))).unwrap();
    assert!(journal.add_trade(draft(day(17), 2, dec!(5))).is_err());
}

#[test]
fn test_withdrawal_over_balance_leaves_store_untouched() {
    let mut journal = memory_journal();
    journal.add_trade(draft(day(17), 1, dec!(100))).unwrap();
    let stored_before = journal.store().get(keys::WITHDRAWALS).unwrap();

    let err = journal
        .add_withdrawal(withdrawal(day(17), dec!(20000)))
        .unwrap_err();
    assert!(err.is_rejection());
    assert!(journal.state().withdrawals().is_empty());
    assert_eq!(journal.state().account_balance(), dec!(10100));
    assert_eq!(journal.store().get(keys::WITHDRAWALS).unwrap(), stored_before);
}

#[test]
fn test_rejection_is_toasted_after_passing_through_anyhow() {
    let mut journal = memory_journal();
    let mut notifier = ConsoleNotifier::new();
    for n in 1..=4 {
        journal.add_trade(draft(day(17), n, dec!(10))).unwrap();
    }

    let err: anyhow::Error = journal
        .add_trade(draft(day(17), 4, dec!(10)))
        .unwrap_err()
        .into();
    let rejection = err.downcast_ref::<JournalError>().unwrap();
    assert_eq!(rejection.toast(), "Maximum 4 trades per day reached!");
    assert!(notifier.rejected(rejection));
    assert_eq!(notifier.sent(), 1);

    let failure = JournalError::from(StorageError::Write {
        key: keys::TRADES.to_string(),
        reason: "disk full".to_string(),
    });
    assert!(!notifier.rejected(&failure));
    assert_eq!(notifier.sent(), 1);
}

#[test]
fn test_withdrawal_snapshots_balance_and_reduces_it() {
    let mut journal = memory_journal();
    journal.add_trade(draft(day(16), 1, dec!(250))).unwrap();

    let w = journal.add_withdrawal(withdrawal(day(17), dec!(1250))).unwrap();
    assert_eq!(w.amount, dec!(-1250));
    assert_eq!(w.balance_before, dec!(10250));
    assert_eq!(w.balance_after, dec!(9000));
    assert_eq!(journal.state().account_balance(), dec!(9000));
    assert_eq!(
        journal.store().get(keys::ACCOUNT_BALANCE).unwrap().as_deref(),
        Some("9000")
    );
}

#[test]
fn test_delete_trade_restores_balance() {
    let mut journal = memory_journal();
    let keep = journal.add_trade(draft(day(17), 1, dec!(40))).unwrap();
    let gone = journal.add_trade(draft(day(17), 2, dec!(-90))).unwrap();
    assert_eq!(journal.state().account_balance(), dec!(9950));

    journal.delete_trade(gone.id).unwrap();
    assert_eq!(journal.state().account_balance(), dec!(10040));
    assert_eq!(journal.state().trades()[0].id, keep.id);

    let err = journal.delete_trade(gone.id).unwrap_err();
    assert!(matches!(err, JournalError::NotFound { .. }));
}

#[test]
fn test_update_trade_recomputes_balance() {
    let mut journal = memory_journal();
    let t = journal.add_trade(draft(day(17), 1, dec!(40))).unwrap();

    let updated = journal
        .update_trade(
            t.id,
            TradePatch {
                pnl: Some(dec!(-15.5)),
                notes: Some("Moved stop too early".to_string()),
                ..TradePatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.pnl, dec!(-15.5));
    assert_eq!(updated.date, day(17));
    assert_eq!(journal.state().account_balance(), dec!(9984.5));
}

#[test]
fn test_goals_round_trip_through_store() {
    let mut journal = memory_journal();
    let goal = journal.add_goal("  Hit 5% this month  ", day(1)).unwrap();
    assert_eq!(goal.content, "Hit 5% this month");
    journal.update_goal(goal.id, "Hit 6% this month").unwrap();
    assert!(journal.add_goal("   ", day(2)).is_err());

    let reopened = Journal::open(journal.into_store(), JournalOptions::default());
    assert_eq!(reopened.state().goals().len(), 1);
    assert_eq!(reopened.state().goals()[0].content, "Hit 6% this month");
}

#[test]
fn test_starting_balance_change_shifts_account_balance() {
    let mut journal = memory_journal();
    journal.add_trade(draft(day(17), 1, dec!(500))).unwrap();
    journal.set_starting_balance(dec!(2000)).unwrap();
    assert_eq!(journal.state().account_balance(), dec!(2500));
    assert!(journal.set_starting_balance(Decimal::ZERO).is_err());
    assert_eq!(journal.state().starting_balance(), dec!(2000));
}

#[test]
fn test_clear_all_resets_records_but_keeps_settings() {
    let mut journal = memory_journal();
    journal.set_theme(Theme::Dark).unwrap();
    journal.set_trading_rules("1. Never risk more than 1%").unwrap();
    journal.set_starting_balance(dec!(5000)).unwrap();
    journal.add_trade(draft(day(17), 1, dec!(80))).unwrap();
    journal.add_goal("Journal every trade", day(17)).unwrap();

    journal.clear_all().unwrap();
    assert!(journal.state().trades().is_empty());
    assert!(journal.state().goals().is_empty());
    assert_eq!(journal.state().account_balance(), dec!(10000));
    assert_eq!(journal.store().get(keys::STARTING_BALANCE).unwrap(), None);

    let reopened = Journal::open(journal.into_store(), JournalOptions::default());
    assert_eq!(reopened.state().starting_balance(), dec!(10000));
    assert_eq!(reopened.state().settings().theme, Theme::Dark);
    assert_eq!(
        reopened.state().settings().trading_rules.as_deref(),
        Some("1. Never risk more than 1%")
    );
}

#[test]
fn test_blank_username_rejected() {
    let mut journal = memory_journal();
    assert!(journal.set_user_name("   ").is_err());
    journal.set_user_name("Alex").unwrap();
    assert_eq!(journal.state().settings().user.display_name(), "Alex");
}

// ---- Loading ----

#[test]
fn test_reload_restores_equal_state() {
    let mut journal = memory_journal();
    journal.set_starting_balance(dec!(7500)).unwrap();
    journal.add_trade(draft(day(15), 1, dec!(120.25))).unwrap();
    journal.add_trade(draft(day(16), 1, dec!(-45))).unwrap();
    journal.add_withdrawal(withdrawal(day(17), dec!(500))).unwrap();
    journal.add_goal("Stay patient", day(17)).unwrap();
    let before = journal.state().clone();

    let reopened = Journal::open(journal.into_store(), JournalOptions::default());
    let after = reopened.state();
    assert_eq!(after.trades(), before.trades());
    assert_eq!(after.withdrawals(), before.withdrawals());
    assert_eq!(after.goals(), before.goals());
    assert_eq!(after.starting_balance(), dec!(7500));
    assert_eq!(after.account_balance(), before.account_balance());
}

#[test]
fn test_reloaded_ids_keep_increasing() {
    let store = MemoryStore::with_entries([(
        keys::TRADES,
        r#"[{"id":9999999999999,"date":"2026-10-17","time":"09:30:00","tradeNumber":1,"pair":"EUR/USD","strategy":"Trend","pnl":"50","notes":"No notes provided"}]"#,
    )]);
    let mut journal = Journal::open(store, JournalOptions::default());
    let t = journal.add_trade(draft(day(17), 2, dec!(5))).unwrap();
    assert!(t.id > RecordId(9_999_999_999_999));
}

#[test]
fn test_malformed_collection_falls_back_to_empty() {
    let store = MemoryStore::with_entries([
        (keys::TRADES, "not json"),
        (keys::STARTING_BALANCE, "\"2500\""),
        (keys::THEME, "purple"),
    ]);
    let journal = Journal::open(store, JournalOptions::default());
    assert!(journal.state().trades().is_empty());
    assert_eq!(journal.state().starting_balance(), dec!(2500));
    assert_eq!(journal.state().account_balance(), dec!(2500));
    assert_eq!(journal.state().settings().theme, Theme::Light);
}

#[test]
fn test_unreadable_store_opens_with_defaults() {
    let mut store = MockStore::new();
    store.expect_get().returning(|key| {
        Err(StorageError::Read {
            key: key.to_string(),
            reason: "permission denied".to_string(),
        })
    });

    let journal = Journal::open(store, JournalOptions::default());
    assert!(journal.state().trades().is_empty());
    assert_eq!(journal.state().account_balance(), dec!(10000));
}

// ---- Storage failures ----

#[test]
fn test_failed_write_keeps_mutation_and_reports_storage_error() {
    let mut store = MockStore::new();
    store.expect_get().returning(|_| Ok(None));
    store
        .expect_set()
        .withf(|key, _| key == keys::TRADES)
        .times(1)
        .returning(|key, _| {
            Err(StorageError::Write {
                key: key.to_string(),
                reason: "disk full".to_string(),
            })
        });

    let mut journal = Journal::open(store, JournalOptions::default());
    let err = journal.add_trade(draft(day(17), 1, dec!(60))).unwrap_err();

    assert!(matches!(err, JournalError::Storage(StorageError::Write { .. })));
    assert!(!err.is_rejection());
    assert_eq!(journal.state().trades().len(), 1);
    assert_eq!(journal.state().account_balance(), dec!(10060));
}

#[test]
fn test_rejected_input_never_reaches_store() {
    let mut store = MockStore::new();
    store.expect_get().returning(|_| Ok(None));
    store.expect_set().times(0);

    let mut journal = Journal::open(store, JournalOptions::default());
    assert!(journal.add_trade(draft(day(17), 0, dec!(10))).is_err());
    assert!(
        journal
            .add_withdrawal(withdrawal(day(17), dec!(-5)))
            .is_err()
    );
}

// ---- File store ----

#[test]
fn test_file_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = FileStore::open(dir.path(), "journal.json").unwrap();
        let mut journal = Journal::open(store, JournalOptions::default());
        journal.add_trade(draft(day(17), 1, dec!(310))).unwrap();
        journal.add_withdrawal(withdrawal(day(17), dec!(10))).unwrap();
        journal.set_theme(Theme::Dark).unwrap();
    }

    let store = FileStore::open(dir.path(), "journal.json").unwrap();
    let journal = Journal::open(store, JournalOptions::default());
    assert_eq!(journal.state().trades().len(), 1);
    assert_eq!(journal.state().withdrawals().len(), 1);
    assert_eq!(journal.state().account_balance(), dec!(10300));
    assert_eq!(journal.state().settings().theme, Theme::Dark);

    let raw = std::fs::read_to_string(dir.path().join("journal.json")).unwrap();
    assert!(raw.contains("accountBalance"));
}

#[test]
fn test_file_store_refuses_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.json");
    std::fs::write(&path, "{ broken").unwrap();

    assert!(FileStore::open(dir.path(), "journal.json").is_err());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ broken");
}
