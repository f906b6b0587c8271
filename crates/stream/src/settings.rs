//! Runtime settings for a streaming session.

use std::time::Duration;

use pulsecast_config::RendererConfig;
use pulsecast_core::FALLBACK_TEXT;

/// Bounded retry policy for the final write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts including the first. Always at least 1.
    pub max_attempts: u32,
    /// Pause between consecutive attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    pub tick_interval: Duration,
    pub pacing_delay: Duration,
    /// `None` means every pulse is paced.
    pub pacing_budget: Option<Duration>,
    pub retry: RetryPolicy,
    pub fallback_text: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(300),
            pacing_delay: Duration::from_millis(300),
            pacing_budget: None,
            retry: RetryPolicy::default(),
            fallback_text: FALLBACK_TEXT.to_string(),
        }
    }
}

impl From<&RendererConfig> for RenderSettings {
    fn from(config: &RendererConfig) -> Self {
        Self {
            tick_interval: Duration::from_millis(config.tick_interval_ms.max(1)),
            pacing_delay: Duration::from_millis(config.pacing_delay_ms),
            pacing_budget: match config.pacing_budget_ms {
                0 => None,
                ms => Some(Duration::from_millis(ms)),
            },
            retry: RetryPolicy {
                max_attempts: config.final_write_attempts.max(1),
                delay: Duration::from_millis(config.final_write_retry_delay_ms),
            },
            fallback_text: config.fallback_text.clone(),
        }
    }
}

/// Per-session allowance of pacing time.
///
/// Each pulse holds the screen for the pacing delay until the budget runs
/// out; later pulses still render but no longer pause.
#[derive(Debug, Clone)]
pub struct PacingBudget {
    remaining: Option<Duration>,
}

impl PacingBudget {
    pub fn new(budget: Option<Duration>) -> Self {
        Self { remaining: budget }
    }

    /// The pause to take for one pulse, or `None` to skip it.
    pub fn take(&mut self, delay: Duration) -> Option<Duration> {
        if delay.is_zero() {
            return None;
        }
        match self.remaining.as_mut() {
            None => Some(delay),
            Some(rem) if *rem >= delay => {
                *rem -= delay;
                Some(delay)
            }
            Some(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_from_default_config() {
        let settings = RenderSettings::from(&RendererConfig::default());
        assert_eq!(settings, RenderSettings::default());
    }

    #[test]
    fn default_budget_is_unbounded() {
        assert_eq!(RendererConfig::default().pacing_budget_ms, 0);
        assert_eq!(RenderSettings::default().pacing_budget, None);
    }

    #[test]
    fn zero_budget_means_unbounded() {
        let config = RendererConfig {
            pacing_budget_ms: 0,
            ..RendererConfig::default()
        };
        assert_eq!(RenderSettings::from(&config).pacing_budget, None);
    }

    #[test]
    fn budget_runs_out() {
        let delay = Duration::from_millis(300);
        let mut budget = PacingBudget::new(Some(Duration::from_millis(700)));
        assert_eq!(budget.take(delay), Some(delay));
        assert_eq!(budget.take(delay), Some(delay));
        assert_eq!(budget.take(delay), None);
    }

    #[test]
    fn unbounded_budget_always_paces() {
        let delay = Duration::from_millis(300);
        let mut budget = PacingBudget::new(None);
        for _ in 0..100 {
            assert_eq!(budget.take(delay), Some(delay));
        }
        assert_eq!(budget.take(Duration::ZERO), None);
    }
}
