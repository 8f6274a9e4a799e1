//! Step counting service.
//!
//! Each sensor callback is one read-modify-write against the store: read
//! the stored count, compute the new one, persist it together with the
//! lifetime total.

use crate::sensor::motion::{AccelSample, MotionDetector, StepBaseline};
use crate::store::kv_store::{KeyValueStore, StoreResult};
use crate::store::record_store::RecordStore;
use log::{debug, info};

/// In-memory detector state carried between sensor callbacks.
///
/// Hosts that open a fresh store per call keep this alive themselves and
/// hand it back through `StepService::with_state`.
#[derive(Debug, Clone, Default)]
pub struct StepSensorState {
    baseline: StepBaseline,
    motion: MotionDetector,
}

pub struct StepService<S: KeyValueStore> {
    store: RecordStore<S>,
    state: StepSensorState,
}

impl<S: KeyValueStore> StepService<S> {
    pub fn new(kv: S) -> Self {
        Self::with_state(kv, StepSensorState::default())
    }

    pub fn with_state(kv: S, state: StepSensorState) -> Self {
        Self {
            store: RecordStore::new(kv),
            state,
        }
    }

    /// Returns the detector state for the next callback.
    pub fn into_state(self) -> StepSensorState {
        self.state
    }

    pub fn steps_today(&self) -> StoreResult<i64> {
        self.store.step_count()
    }

    pub fn lifetime_steps(&self) -> StoreResult<i64> {
        self.store.lifetime_steps()
    }

    pub fn is_enabled(&self) -> StoreResult<bool> {
        self.store.step_counter_enabled()
    }

    pub fn set_enabled(&self, enabled: bool) -> StoreResult<()> {
        self.store.set_step_counter_enabled(enabled)?;
        info!(
            "event=step_counter_toggle module=service status=ok enabled={}",
            enabled
        );
        Ok(())
    }

    /// Handles a cumulative hardware step-counter reading.
    pub fn record_hardware_total(&mut self, hardware_total: i64) -> StoreResult<i64> {
        let stored = self.store.step_count()?;
        self.state.baseline.resume(hardware_total, stored);
        let today = self.state.baseline.steps_since_baseline(hardware_total);
        self.commit(stored, today)
    }

    /// Handles an accelerometer sample; movement counts as one step.
    pub fn record_motion(&mut self, sample: AccelSample) -> StoreResult<i64> {
        let stored = self.store.step_count()?;
        if !self.state.motion.observe(sample) {
            return Ok(stored);
        }
        self.commit(stored, stored.saturating_add(1))
    }

    /// Zeroes today's count; the lifetime total is kept.
    pub fn reset_steps(&mut self) -> StoreResult<()> {
        self.state.baseline.reset();
        self.store.set_step_count(0)?;
        info!("event=step_reset module=service status=ok");
        Ok(())
    }

    fn commit(&self, stored: i64, updated: i64) -> StoreResult<i64> {
        if updated == stored {
            return Ok(stored);
        }
        let increment = (updated - stored).max(0);
        let lifetime = self.store.lifetime_steps()?.saturating_add(increment);
        self.store.save_step_totals(updated, lifetime)?;
        debug!(
            "event=step_update module=service status=ok steps_today={} increment={}",
            updated, increment
        );
        Ok(updated)
    }
}
