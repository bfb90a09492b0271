//! Reel stop timing and result presentation delays
//!
//! The animation itself lives in the front-end; this module only decides
//! when each reel stops and how long the UI waits around a spin.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Timing profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimingProfile {
    /// Cabinet timing
    #[default]
    Normal,
    /// Everything at double speed
    Turbo,
    /// No waiting at all (headless play, tests)
    Instant,
    /// Scaled from another profile
    Custom,
}

/// Durations in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    pub profile: TimingProfile,

    /// Spin time of the first reel before it starts decelerating
    pub spin_base_ms: f64,
    /// Extra spin time per reel index
    pub spin_increment_ms: f64,
    /// Extra start delay per reel index
    pub start_delay_ms: f64,
    /// Sequential stop delay per reel index
    pub stop_interval_ms: f64,
    /// Deceleration into the final position
    pub deceleration_ms: f64,
    /// Upper bound of the random spin time added per reel
    pub spin_jitter_ms: f64,
    /// Upper bound of the random start delay added per reel
    pub delay_jitter_ms: f64,

    /// Pause after the last reel stops before the result is declared
    pub result_reveal_delay_ms: f64,
    /// How long a win/loss banner stays up
    pub result_display_ms: f64,
    /// How long the "insufficient funds" notice stays up
    pub funds_notice_ms: f64,
    /// Force-stop for a spin that never resolves
    pub spin_watchdog_ms: f64,
    /// Lever animation before it springs back
    pub lever_reset_ms: f64,
}

impl TimingConfig {
    /// Cabinet timing
    pub fn normal() -> Self {
        Self {
            profile: TimingProfile::Normal,
            spin_base_ms: 900.0,
            spin_increment_ms: 600.0,
            start_delay_ms: 150.0,
            stop_interval_ms: 1000.0,
            deceleration_ms: 1400.0,
            spin_jitter_ms: 200.0,
            delay_jitter_ms: 30.0,
            result_reveal_delay_ms: 800.0,
            result_display_ms: 3000.0,
            funds_notice_ms: 2000.0,
            spin_watchdog_ms: 10000.0,
            lever_reset_ms: 500.0,
        }
    }

    /// Turbo mode
    pub fn turbo() -> Self {
        Self {
            profile: TimingProfile::Turbo,
            ..Self::normal().scaled(0.5)
        }
    }

    /// No delays
    pub fn instant() -> Self {
        Self {
            profile: TimingProfile::Instant,
            ..Self::normal().scaled(0.0)
        }
    }

    /// Get config for profile
    pub fn from_profile(profile: TimingProfile) -> Self {
        match profile {
            TimingProfile::Normal => Self::normal(),
            TimingProfile::Turbo => Self::turbo(),
            TimingProfile::Instant => Self::instant(),
            TimingProfile::Custom => Self::normal(),
        }
    }

    /// Scale timing by factor (< 1.0 = faster)
    pub fn scaled(&self, factor: f64) -> Self {
        let factor = factor.max(0.0);
        Self {
            profile: TimingProfile::Custom,
            spin_base_ms: self.spin_base_ms * factor,
            spin_increment_ms: self.spin_increment_ms * factor,
            start_delay_ms: self.start_delay_ms * factor,
            stop_interval_ms: self.stop_interval_ms * factor,
            deceleration_ms: self.deceleration_ms * factor,
            spin_jitter_ms: self.spin_jitter_ms * factor,
            delay_jitter_ms: self.delay_jitter_ms * factor,
            result_reveal_delay_ms: self.result_reveal_delay_ms * factor,
            result_display_ms: self.result_display_ms * factor,
            funds_notice_ms: self.funds_notice_ms * factor,
            spin_watchdog_ms: self.spin_watchdog_ms * factor,
            lever_reset_ms: self.lever_reset_ms * factor,
        }
    }

    /// Stop time of reel 0 without jitter
    pub fn base_stop_ms(&self) -> f64 {
        self.spin_base_ms + self.deceleration_ms
    }

    /// Fixed delay added per reel index
    pub fn per_reel_delay_ms(&self) -> f64 {
        self.spin_increment_ms + self.start_delay_ms + self.stop_interval_ms
    }

    /// Largest jitter a single reel can receive
    pub fn max_jitter_ms(&self) -> f64 {
        self.spin_jitter_ms + self.delay_jitter_ms
    }

    /// When reel `reel_index` comes to rest, measured from spin start
    pub fn reel_stop_ms(&self, reel_index: usize, jitter_ms: f64) -> f64 {
        self.base_stop_ms()
            + reel_index as f64 * self.per_reel_delay_ms()
            + jitter_ms.clamp(0.0, self.max_jitter_ms())
    }

    /// Calculate total spin duration (all reels stopped, no jitter)
    pub fn total_spin_duration(&self, reel_count: usize) -> f64 {
        self.reel_stop_ms(reel_count.saturating_sub(1), 0.0)
    }

    /// Every duration is a finite, non-negative number
    pub fn is_finite(&self) -> bool {
        [
            self.spin_base_ms,
            self.spin_increment_ms,
            self.start_delay_ms,
            self.stop_interval_ms,
            self.deceleration_ms,
            self.spin_jitter_ms,
            self.delay_jitter_ms,
            self.result_reveal_delay_ms,
            self.result_display_ms,
            self.funds_notice_ms,
            self.spin_watchdog_ms,
            self.lever_reset_ms,
        ]
        .iter()
        .all(|ms| ms.is_finite() && *ms >= 0.0)
    }

    /// Draw a stop schedule for one spin
    ///
    /// Jitter is skipped when its bound is not a finite positive number.
    pub fn schedule<R: Rng>(&self, reel_count: usize, rng: &mut R) -> ReelSchedule {
        let max_jitter = self.max_jitter_ms();
        let stops: Vec<f64> = (0..reel_count)
            .map(|reel| {
                let jitter = if max_jitter.is_finite() && max_jitter > 0.0 {
                    rng.random_range(0.0..max_jitter)
                } else {
                    0.0
                };
                self.reel_stop_ms(reel, jitter)
            })
            .collect();

        let last_stop = stops.iter().copied().fold(0.0, f64::max);
        ReelSchedule {
            stops,
            resolve_at_ms: last_stop + self.result_reveal_delay_ms,
            watchdog_ms: self.spin_watchdog_ms,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::normal()
    }
}

/// When each reel stops and when the result should be declared
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReelSchedule {
    /// Stop time per reel, ms from spin start
    pub stops: Vec<f64>,
    /// When to resolve the spin, ms from spin start
    pub resolve_at_ms: f64,
    /// Force-stop deadline, ms from spin start
    pub watchdog_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_timing_profiles() {
        let normal = TimingConfig::normal();
        let turbo = TimingConfig::turbo();
        let instant = TimingConfig::instant();

        assert_eq!(turbo.profile, TimingProfile::Turbo);
        assert!(turbo.base_stop_ms() < normal.base_stop_ms());
        assert_eq!(instant.total_spin_duration(3), 0.0);
        assert_eq!(TimingConfig::from_profile(TimingProfile::Custom), normal);
    }

    #[test]
    fn test_reel_stop_sequence() {
        let config = TimingConfig::normal();
        assert_eq!(config.reel_stop_ms(0, 0.0), 2300.0);
        assert_eq!(config.reel_stop_ms(1, 0.0), 4050.0);
        assert_eq!(config.reel_stop_ms(2, 0.0), 5800.0);
        // Jitter is bounded
        assert_eq!(config.reel_stop_ms(0, 10_000.0), 2530.0);
    }

    #[test]
    fn test_schedule_is_ordered() {
        let config = TimingConfig::normal();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let schedule = config.schedule(3, &mut rng);
            assert_eq!(schedule.stops.len(), 3);
            assert!(schedule.stops.windows(2).all(|w| w[0] < w[1]));
            assert!(schedule.resolve_at_ms > schedule.stops[2]);
            assert!(schedule.resolve_at_ms < schedule.watchdog_ms);
        }
    }

    #[test]
    fn test_unbounded_jitter_is_skipped() {
        let config = TimingConfig::normal().scaled(1e307);
        assert!(!config.is_finite());
        assert!(TimingConfig::turbo().is_finite());

        let mut rng = StdRng::seed_from_u64(5);
        let schedule = config.schedule(3, &mut rng);
        assert_eq!(schedule.stops.len(), 3);
    }

    #[test]
    fn test_instant_schedule() {
        let mut rng = StdRng::seed_from_u64(1);
        let schedule = TimingConfig::instant().schedule(3, &mut rng);
        assert_eq!(schedule.stops, vec![0.0, 0.0, 0.0]);
        assert_eq!(schedule.resolve_at_ms, 0.0);
    }
}
