//! Shared fixtures and test doubles for cryptodash-core integration tests
//!
//! Each integration test binary uses a different subset of these helpers.

#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::missing_panics_doc,
    clippy::significant_drop_tightening
)]

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use chrono::Utc;
use cryptodash_core::{
    view::View, DataSource, Dimensions, Error, Launcher, RawGlobal, RawRecord, Result, Row, RowSet,
    Screen,
};
use tokio::sync::Notify;

// ═══════════════════════════════════════════════════════════════════════════
// FIXTURES
// ═══════════════════════════════════════════════════════════════════════════

pub fn row(rank: u32, name: &str, price: f64, change_24h: f64) -> Row {
    Row {
        id: name.to_lowercase().replace(' ', "-"),
        rank,
        name: name.to_string(),
        symbol: name.chars().take(3).collect::<String>().to_uppercase(),
        price,
        market_cap: price * 1_000.0,
        volume_24h: 0.0,
        change_1h: 0.0,
        change_24h,
        change_7d: 0.0,
        total_supply: 0.0,
        available_supply: 0.0,
        last_updated: 1_514_764_800,
    }
}

pub fn row_set(generation: u64, rows: Vec<Row>) -> RowSet {
    RowSet::new(rows, generation, Utc::now())
}

/// The two-coin scenario: Alpha (rank 1, $10, -2%) and Beta (rank 2, $5, +3%).
pub fn alpha_beta() -> RowSet {
    row_set(
        1,
        vec![row(1, "Alpha", 10.0, -2.0), row(2, "Beta", 5.0, 3.0)],
    )
}

pub fn raw(rank: u32, name: &str, price: f64) -> RawRecord {
    RawRecord {
        id: Some(name.to_lowercase()),
        name: Some(name.to_string()),
        symbol: Some(name.chars().take(3).collect::<String>().to_uppercase()),
        rank: Some(rank.to_string()),
        price_usd: Some(price.to_string()),
        last_updated: Some("1514764800".to_string()),
        ..RawRecord::default()
    }
}

pub fn global_totals() -> RawGlobal {
    RawGlobal {
        total_market_cap_usd: Some(213_823_016_580.0),
        total_24h_volume_usd: Some(11_017_294_706.0),
        bitcoin_percentage_of_market_cap: Some(52.61),
        active_currencies: Some(876),
        active_assets: Some(651),
        active_markets: Some(12_349),
    }
}

pub fn names(rows: &RowSet) -> Vec<String> {
    rows.iter().map(|r| r.name.clone()).collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// DATA SOURCE
// ═══════════════════════════════════════════════════════════════════════════

/// Data source with scripted records and global totals, switchable failure,
/// an optional gate that holds each ranked fetch until released, and call
/// counters.
#[derive(Default)]
pub struct MockSource {
    records: Mutex<Vec<RawRecord>>,
    global: Mutex<RawGlobal>,
    failing: AtomicBool,
    gated: AtomicBool,
    gate: Notify,
    calls: AtomicUsize,
    global_calls: AtomicUsize,
}

impl MockSource {
    pub fn with_records(records: Vec<RawRecord>) -> Arc<Self> {
        let source = Self::default();
        *source.records.lock().unwrap() = records;
        *source.global.lock().unwrap() = global_totals();
        Arc::new(source)
    }

    pub fn set_global(&self, global: RawGlobal) {
        *self.global.lock().unwrap() = global;
    }

    pub fn global_calls(&self) -> usize {
        self.global_calls.load(Ordering::SeqCst)
    }

    pub fn set_records(&self, records: Vec<RawRecord>) {
        *self.records.lock().unwrap() = records;
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Hold every fetch until [`MockSource::release`] is called.
    pub fn hold(&self) {
        self.gated.store(true, Ordering::SeqCst);
    }

    pub fn release(&self) {
        self.gated.store(false, Ordering::SeqCst);
        self.gate.notify_waiters();
        self.gate.notify_one();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataSource for MockSource {
    async fn fetch_ranked(&self, limit: u32) -> Result<Vec<RawRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.gated.load(Ordering::SeqCst) {
            self.gate.notified().await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::transport("connection refused"));
        }
        let records = self.records.lock().unwrap();
        Ok(records.iter().take(limit as usize).cloned().collect())
    }

    async fn fetch_global(&self) -> Result<RawGlobal> {
        self.global_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::transport("connection refused"));
        }
        Ok(self.global.lock().unwrap().clone())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// SCREEN
// ═══════════════════════════════════════════════════════════════════════════

/// Screen that records every frame and reports adjustable dimensions.
#[derive(Clone)]
pub struct RecordingScreen {
    frames: Arc<Mutex<Vec<View>>>,
    dims: Arc<Mutex<Dimensions>>,
}

impl RecordingScreen {
    pub fn new(rows: u16, cols: u16) -> Self {
        Self {
            frames: Arc::new(Mutex::new(Vec::new())),
            dims: Arc::new(Mutex::new(Dimensions::new(rows, cols))),
        }
    }

    pub fn set_size(&self, rows: u16, cols: u16) {
        *self.dims.lock().unwrap() = Dimensions::new(rows, cols);
    }

    pub fn frame_count(&self) -> usize {
        self.frames.lock().unwrap().len()
    }

    pub fn last_frame(&self) -> Option<View> {
        self.frames.lock().unwrap().last().cloned()
    }
}

impl Screen for RecordingScreen {
    fn size(&mut self) -> Result<Dimensions> {
        Ok(*self.dims.lock().unwrap())
    }

    fn draw(&mut self, view: &View) -> Result<()> {
        self.frames.lock().unwrap().push(view.clone());
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// LAUNCHER
// ═══════════════════════════════════════════════════════════════════════════

/// Launcher that records targets and can be told to fail.
#[derive(Clone, Default)]
pub struct RecordingLauncher {
    opened: Arc<Mutex<Vec<String>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingLauncher {
    pub fn failing() -> Self {
        let launcher = Self::default();
        launcher.failing.store(true, Ordering::SeqCst);
        launcher
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

impl Launcher for RecordingLauncher {
    fn open(&mut self, target: &str) -> Result<()> {
        self.opened.lock().unwrap().push(target.to_string());
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::launch(target, "no handler available"));
        }
        Ok(())
    }
}
