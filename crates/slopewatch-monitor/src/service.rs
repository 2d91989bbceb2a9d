//! The monitoring service: intake, latest-reading and risk queries

use crate::clock::SystemClock;
use crate::config::{ConfigError, MonitorConfig};
use crate::validator::{normalize_observation, IntakeValidator};
use crate::MonitorError;
use slopewatch_domain::{
    mitigation_actions, BlobStore, Clock, Reading, ReadingId, RiskLevel, RiskThresholds,
};
use slopewatch_store::{AnyBlobStore, ReadingStore, StoreError};
use std::sync::{Mutex, MutexGuard};

/// Overview of the current risk: the latest reading, its level and what to do
#[derive(Debug, Clone, PartialEq)]
pub struct RiskSummary {
    /// Most recent reading
    pub reading: Reading,
    /// Its classification
    pub level: RiskLevel,
    /// Actions to offer; empty when risk is Low
    pub mitigation_actions: &'static [&'static str],
}

/// Entry point for the UI layer
///
/// All store access goes through one mutex, so a single service shared
/// between threads never interleaves two read-modify-write cycles.
/// Independent processes are handled by the store's compare-and-swap.
pub struct MonitoringService<B, C = SystemClock> {
    store: Mutex<ReadingStore<B>>,
    validator: IntakeValidator,
    thresholds: RiskThresholds,
    clock: C,
}

impl<B: BlobStore> MonitoringService<B, SystemClock> {
    /// Create a service on the wall clock with default limits and thresholds
    pub fn new(store: ReadingStore<B>) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl MonitoringService<AnyBlobStore, SystemClock> {
    /// Build a service from configuration, opening the configured backend
    pub fn from_config(config: &MonitorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let store = config.storage.open_store()?;
        Ok(Self::new(store)
            .with_thresholds(config.risk_thresholds())
            .with_validator(IntakeValidator::new(config.intake)))
    }
}

impl<B: BlobStore, C: Clock> MonitoringService<B, C> {
    /// Create a service with an explicit clock
    pub fn with_clock(store: ReadingStore<B>, clock: C) -> Self {
        Self {
            store: Mutex::new(store),
            validator: IntakeValidator::default(),
            thresholds: RiskThresholds::default(),
            clock,
        }
    }

    /// Replace the threshold table
    pub fn with_thresholds(mut self, thresholds: RiskThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Replace the intake validator
    pub fn with_validator(mut self, validator: IntakeValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Threshold table in use
    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    fn store(&self) -> Result<MutexGuard<'_, ReadingStore<B>>, StoreError> {
        self.store
            .lock()
            .map_err(|_| StoreError::Backend("reading store lock poisoned".to_string()))
    }

    /// Validate and record a new reading
    ///
    /// The id and timestamp are assigned here. The timestamp never precedes
    /// the newest reading already in the log, so log order stays
    /// chronological even if the wall clock steps back. Returns the stored
    /// reading.
    pub fn record_reading(
        &self,
        moisture: f64,
        angle: f64,
        observation: Option<String>,
    ) -> Result<Reading, MonitorError> {
        if let Err(e) = self.validator.validate(moisture, angle) {
            tracing::warn!(moisture, angle, error = %e, "Rejected reading");
            return Err(e.into());
        }

        let mut store = self.store()?;
        let newest = store.load_all()?.last().map(|r| r.timestamp);

        let now = self.clock.now();
        let timestamp = match newest {
            Some(newest) if newest > now => {
                tracing::warn!(%now, %newest, "Clock is behind the newest reading; clamping");
                newest
            }
            _ => now,
        };

        let reading = Reading::new(
            ReadingId::new(),
            timestamp,
            moisture,
            angle,
            normalize_observation(observation),
        );
        store.append(reading.clone())?;

        tracing::info!(
            id = %reading.id,
            moisture,
            angle,
            risk = %self.thresholds.classify(moisture, angle),
            "Recorded reading"
        );
        Ok(reading)
    }

    /// Most recently recorded reading
    pub fn latest_reading(&self) -> Result<Option<Reading>, MonitorError> {
        let store = self.store()?;
        Ok(store.load_all()?.pop())
    }

    /// Risk level of the latest reading; `None` when nothing is recorded
    ///
    /// Only the latest reading drives risk, not any aggregate of history.
    pub fn current_risk(&self) -> Result<Option<RiskLevel>, MonitorError> {
        Ok(self
            .latest_reading()?
            .map(|r| self.classify(&r)))
    }

    /// Full log in insertion order
    pub fn history(&self) -> Result<Vec<Reading>, MonitorError> {
        let store = self.store()?;
        Ok(store.load_all()?)
    }

    /// Full log with each reading's recomputed risk level
    pub fn history_with_risk(&self) -> Result<Vec<(Reading, RiskLevel)>, MonitorError> {
        Ok(self
            .history()?
            .into_iter()
            .map(|r| {
                let level = self.classify(&r);
                (r, level)
            })
            .collect())
    }

    /// Latest reading, its level and the mitigation actions to offer
    pub fn risk_summary(&self) -> Result<Option<RiskSummary>, MonitorError> {
        Ok(self.latest_reading()?.map(|reading| {
            let level = self.classify(&reading);
            RiskSummary {
                reading,
                level,
                mitigation_actions: mitigation_actions(level),
            }
        }))
    }

    /// Delete every reading
    ///
    /// Runs under the same lock as appends, so it never interleaves with one.
    pub fn clear_history(&self) -> Result<(), MonitorError> {
        let mut store = self.store()?;
        store.clear()?;
        Ok(())
    }

    /// Classify a reading with this service's threshold table
    pub fn classify(&self, reading: &Reading) -> RiskLevel {
        self.thresholds
            .classify(reading.soil_moisture, reading.slope_angle)
    }
}
