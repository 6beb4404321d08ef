//! Refresh scheduler
//!
//! Fetches ranked records through a [`DataSource`], validates them into a
//! [`RowSet`] and hands the result to the engine as a message. While the
//! market summary is enabled, each fetch also pulls the global totals. The
//! scheduler never touches dashboard state itself.
//!
//! At most one fetch runs at a time. A tick or a manual refresh that arrives
//! while a fetch is in flight is skipped, not queued. A failed fetch is
//! reported to the engine, which keeps the previous rows; the next tick simply
//! tries again.

use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::Utc;
use tokio::{
    sync::broadcast,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
    engine::{EngineHandle, EngineMessage},
    market::{MarketSummary, RawGlobal},
    row::{RawRecord, RowSet},
    shutdown::ShutdownSignal,
    Result,
};

/// Source of ranked market records.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch up to `limit` records, best rank first.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Transport`] when the source is unreachable or
    /// its response cannot be decoded.
    async fn fetch_ranked(&self, limit: u32) -> Result<Vec<RawRecord>>;

    /// Fetch market-wide totals.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Transport`] when the source is unreachable or
    /// its response cannot be decoded.
    async fn fetch_global(&self) -> Result<RawGlobal>;
}

/// Whether a trigger started a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    Started,
    /// A fetch was already in flight.
    Skipped,
}

/// Clears the in-flight flag when the fetch that set it ends, however it ends.
struct InFlight(Arc<AtomicBool>);

impl InFlight {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(Arc::clone(flag)))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Periodic and on-demand fetching with an at-most-one-in-flight guard.
#[derive(Clone)]
pub struct RefreshScheduler {
    source: Arc<dyn DataSource>,
    limit: u32,
    in_flight: Arc<AtomicBool>,
    generation: Arc<AtomicU64>,
    market: Arc<AtomicBool>,
    engine: EngineHandle,
}

impl RefreshScheduler {
    pub fn new(source: Arc<dyn DataSource>, limit: u32, engine: EngineHandle) -> Self {
        Self {
            source,
            limit,
            in_flight: Arc::new(AtomicBool::new(false)),
            generation: Arc::new(AtomicU64::new(0)),
            market: Arc::new(AtomicBool::new(false)),
            engine,
        }
    }

    /// Whether a fetch is currently running.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Include the market summary in later fetches, or stop doing so.
    pub fn set_market(&self, enabled: bool) {
        self.market.store(enabled, Ordering::Release);
    }

    pub fn market_enabled(&self) -> bool {
        self.market.load(Ordering::Acquire)
    }

    /// Fetch the market summary directly, for the startup load.
    ///
    /// # Errors
    ///
    /// Returns the transport error from the source, or a validation error
    /// when the totals are unusable.
    pub async fn market_now(&self) -> Result<MarketSummary> {
        self.fetch_market().await
    }

    /// Fetch and return the result directly, for the startup load.
    ///
    /// # Errors
    ///
    /// Returns the transport error from the source, or
    /// [`crate::Error::Transport`] if another fetch is already in flight.
    pub async fn refresh_now(&self) -> Result<RowSet> {
        let _guard = InFlight::acquire(&self.in_flight)
            .ok_or_else(|| crate::Error::transport("refresh already in progress"))?;
        self.fetch().await
    }

    /// Start a background fetch unless one is already in flight.
    ///
    /// The result is delivered to the engine as
    /// [`EngineMessage::Refreshed`], followed by [`EngineMessage::Market`]
    /// when the market summary is enabled.
    pub fn trigger(&self) -> TriggerOutcome {
        let Some(guard) = InFlight::acquire(&self.in_flight) else {
            debug!("Refresh skipped, previous fetch still in flight");
            return TriggerOutcome::Skipped;
        };

        let scheduler = self.clone();
        tokio::spawn(async move {
            let result = scheduler.fetch().await;
            if scheduler
                .engine
                .send(EngineMessage::Refreshed(result))
                .await
                .is_err()
            {
                debug!("Engine gone, dropping refresh result");
            } else if scheduler.market_enabled() {
                let market = scheduler.fetch_market().await;
                if scheduler
                    .engine
                    .send(EngineMessage::Market(market))
                    .await
                    .is_err()
                {
                    debug!("Engine gone, dropping market summary");
                }
            }
            drop(guard);
        });
        TriggerOutcome::Started
    }

    /// Trigger a refresh every `period` until shutdown is signalled.
    ///
    /// The first tick fires one full period from now; the startup load
    /// covers time zero.
    pub fn spawn_periodic(
        &self,
        period: Duration,
        mut shutdown: broadcast::Receiver<ShutdownSignal>,
    ) -> JoinHandle<()> {
        let scheduler = self.clone();
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = shutdown.recv() => {
                        debug!("Refresh ticker stopping");
                        break;
                    }
                    _ = ticker.tick() => {
                        scheduler.trigger();
                    }
                }
            }
        })
    }

    async fn fetch(&self) -> Result<RowSet> {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;

        match self.source.fetch_ranked(self.limit).await {
            Ok(records) => {
                let (rows, dropped) = RowSet::from_raw(&records, generation, Utc::now());
                info!(
                    generation,
                    rows = rows.len(),
                    dropped,
                    "Refresh completed"
                );
                Ok(rows)
            }
            Err(e) => {
                warn!(generation, error = %e, "Refresh failed, keeping previous rows");
                Err(e)
            }
        }
    }

    async fn fetch_market(&self) -> Result<MarketSummary> {
        let summary = self
            .source
            .fetch_global()
            .await
            .and_then(|raw| MarketSummary::try_from_raw(&raw, Utc::now()));
        match summary {
            Ok(summary) => {
                debug!(
                    total_market_cap = summary.total_market_cap,
                    "Market summary fetched"
                );
                Ok(summary)
            }
            Err(e) => {
                warn!(error = %e, "Market summary fetch failed");
                Err(e)
            }
        }
    }
}
