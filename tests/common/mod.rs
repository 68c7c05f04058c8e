#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use claimright::{
    config::Config,
    services::{FixedClock, MemoryLedger},
    AccrualEngine,
};
use claimright_storage_json::JsonClaimStore;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Directory that outlives the test, for engines reopened mid-test.
pub fn temp_root() -> std::path::PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let root = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    root
}

pub struct TestEnv {
    pub engine: AccrualEngine,
    pub ledger: Arc<MemoryLedger>,
    pub clock: Arc<FixedClock>,
}

/// In-memory engine pinned to `today`.
pub fn memory_env(today: NaiveDate) -> TestEnv {
    let ledger = Arc::new(MemoryLedger::new());
    let clock = Arc::new(FixedClock::on(today));
    let engine = AccrualEngine::new(
        claimright::services::MemoryClaimStore::new(),
        ledger.clone(),
        "USD",
    )
    .with_clock(clock.clone());
    TestEnv {
        engine,
        ledger,
        clock,
    }
}

/// Engine backed by JSON files under `root`, pinned to `clock`.
pub fn json_engine(
    root: &std::path::Path,
    ledger: Arc<MemoryLedger>,
    clock: Arc<FixedClock>,
) -> AccrualEngine<JsonClaimStore> {
    let config = Config {
        storage_root: Some(root.to_path_buf()),
        backup_retention: 3,
        ..Config::default()
    };
    AccrualEngine::from_config(&config, ledger)
        .expect("open engine")
        .with_clock(clock)
}
