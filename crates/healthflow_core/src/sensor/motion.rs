//! Accelerometer and step-counter detectors.
//!
//! # Invariants
//! - Samples closer than `MIN_SAMPLE_GAP_MS` to the previous accepted sample
//!   are ignored.
//! - The first accepted sample only primes the detector.
//! - A shake fires at most once per `SHAKE_COOLDOWN_MS`.

/// Speed above which a sample counts as movement.
pub const MOTION_SPEED_THRESHOLD: f64 = 800.0;
pub const MIN_SAMPLE_GAP_MS: i64 = 100;
pub const SHAKE_COOLDOWN_MS: i64 = 1_500;

/// One raw 3-axis acceleration reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Epoch milliseconds when the reading was taken.
    pub at_ms: i64,
}

/// Detects sudden movement from consecutive acceleration samples.
#[derive(Debug, Clone, Default)]
pub struct MotionDetector {
    last: Option<AccelSample>,
}

impl MotionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one sample; returns `true` when it registers as movement.
    pub fn observe(&mut self, sample: AccelSample) -> bool {
        let Some(previous) = self.last else {
            self.last = Some(sample);
            return false;
        };

        let elapsed_ms = sample.at_ms - previous.at_ms;
        if elapsed_ms <= MIN_SAMPLE_GAP_MS {
            return false;
        }
        self.last = Some(sample);

        let dx = f64::from(sample.x - previous.x);
        let dy = f64::from(sample.y - previous.y);
        let dz = f64::from(sample.z - previous.z);
        let speed = (dx * dx + dy * dy + dz * dz).sqrt() / elapsed_ms as f64 * 10_000.0;
        speed > MOTION_SPEED_THRESHOLD
    }
}

/// Shake gesture detector: movement plus a cooldown between triggers.
#[derive(Debug, Clone, Default)]
pub struct ShakeDetector {
    motion: MotionDetector,
    last_shake_ms: Option<i64>,
}

impl ShakeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one sample; returns `true` when a shake gesture fires.
    pub fn observe(&mut self, sample: AccelSample) -> bool {
        if !self.motion.observe(sample) {
            return false;
        }
        let cooled_down = self
            .last_shake_ms
            .map_or(true, |last| sample.at_ms - last > SHAKE_COOLDOWN_MS);
        if cooled_down {
            self.last_shake_ms = Some(sample.at_ms);
        }
        cooled_down
    }
}

/// Converts a cumulative hardware step total into steps since baseline.
///
/// The first non-zero reading becomes the baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepBaseline {
    baseline: Option<i64>,
}

impl StepBaseline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps_since_baseline(&mut self, hardware_total: i64) -> i64 {
        let baseline = match self.baseline {
            Some(baseline) => baseline,
            None if hardware_total > 0 => {
                self.baseline = Some(hardware_total);
                hardware_total
            }
            None => return 0,
        };
        (hardware_total - baseline).max(0)
    }

    /// Primes the baseline so `hardware_total` maps to `counted_today`.
    ///
    /// No-op once a baseline exists. Used after a restart so stored steps
    /// keep counting instead of dropping to zero.
    pub fn resume(&mut self, hardware_total: i64, counted_today: i64) {
        if self.baseline.is_none() && hardware_total > 0 {
            self.baseline = Some(hardware_total - counted_today.clamp(0, hardware_total));
        }
    }

    pub fn is_primed(&self) -> bool {
        self.baseline.is_some()
    }

    /// Forgets the baseline so the next reading starts counting from zero.
    pub fn reset(&mut self) {
        self.baseline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{AccelSample, MotionDetector, ShakeDetector, StepBaseline};

    fn sample(x: f32, at_ms: i64) -> AccelSample {
        AccelSample {
            x,
            y: 0.0,
            z: 9.8,
            at_ms,
        }
    }

    #[test]
    fn first_sample_only_primes_the_detector() {
        let mut detector = MotionDetector::new();
        assert!(!detector.observe(sample(50.0, 1_000)));
    }

    #[test]
    fn large_jump_registers_and_small_drift_does_not() {
        let mut detector = MotionDetector::new();
        detector.observe(sample(0.0, 1_000));
        // 2.0 / 200ms * 10000 = 100 -> below threshold.
        assert!(!detector.observe(sample(2.0, 1_200)));
        // 20.0 / 200ms * 10000 = 1000 -> movement.
        assert!(detector.observe(sample(22.0, 1_400)));
    }

    #[test]
    fn samples_inside_the_gap_are_ignored() {
        let mut detector = MotionDetector::new();
        detector.observe(sample(0.0, 1_000));
        assert!(!detector.observe(sample(100.0, 1_050)));
        // Compared against the 1_000 sample, not the ignored one.
        assert!(detector.observe(sample(30.0, 1_200)));
    }

    #[test]
    fn shake_respects_cooldown() {
        let mut shake = ShakeDetector::new();
        shake.observe(sample(0.0, 0));
        assert!(shake.observe(sample(30.0, 200)));
        assert!(!shake.observe(sample(0.0, 400)));
        assert!(!shake.observe(sample(30.0, 1_600)));
        assert!(shake.observe(sample(0.0, 1_800)));
    }

    #[test]
    fn step_baseline_counts_from_first_reading() {
        let mut baseline = StepBaseline::new();
        assert_eq!(baseline.steps_since_baseline(0), 0);
        assert_eq!(baseline.steps_since_baseline(10_000), 0);
        assert_eq!(baseline.steps_since_baseline(10_250), 250);

        baseline.reset();
        assert_eq!(baseline.steps_since_baseline(10_300), 0);
        assert_eq!(baseline.steps_since_baseline(10_310), 10);
    }

    #[test]
    fn resumed_baseline_continues_stored_count() {
        let mut baseline = StepBaseline::new();
        baseline.resume(50_000, 1_200);
        assert!(baseline.is_primed());
        assert_eq!(baseline.steps_since_baseline(50_000), 1_200);
        assert_eq!(baseline.steps_since_baseline(50_030), 1_230);

        // Already primed: later resumes are ignored.
        baseline.resume(90_000, 0);
        assert_eq!(baseline.steps_since_baseline(50_040), 1_240);
    }
}
