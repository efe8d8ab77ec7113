//! Tunable constants for the UI core.
//!
//! Compiled defaults match the shipped behavior; each knob can be
//! overridden from the environment for experiments, with clamps so a bad
//! value cannot wedge the UI.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct UiConfig {
    /// Retention cap on the conversation collection.
    pub max_conversations: usize,
    /// A streamed reply of any length finishes in roughly this many ticks.
    pub typing_tick_target: usize,
    /// Minimum spacing between accepted submits (input-widget guidance).
    pub submit_throttle: Duration,
    /// Pause before the synthesized reply appears.
    pub reply_delay: Duration,
    /// Display frame length for the interval pacer (~60 fps).
    pub frame_interval: Duration,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            max_conversations: 50,
            typing_tick_target: 80,
            submit_throttle: Duration::from_millis(120),
            reply_delay: Duration::from_millis(120),
            frame_interval: Duration::from_millis(16),
        }
    }
}

impl UiConfig {
    /// Load configuration, letting the environment override individual
    /// knobs:
    /// - `CHATUI_MAX_CONVERSATIONS`
    /// - `CHATUI_TYPING_TICK_TARGET`
    /// - `CHATUI_SUBMIT_THROTTLE_MS`
    /// - `CHATUI_REPLY_DELAY_MS`
    /// - `CHATUI_FRAME_INTERVAL_MS`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_conversations: env_usize(
                "CHATUI_MAX_CONVERSATIONS",
                defaults.max_conversations,
            )
            .clamp(1, 10_000),
            typing_tick_target: env_usize(
                "CHATUI_TYPING_TICK_TARGET",
                defaults.typing_tick_target,
            )
            .clamp(1, 10_000),
            submit_throttle: Duration::from_millis(
                env_u64(
                    "CHATUI_SUBMIT_THROTTLE_MS",
                    defaults.submit_throttle.as_millis() as u64,
                )
                .clamp(0, 10_000),
            ),
            reply_delay: Duration::from_millis(
                env_u64(
                    "CHATUI_REPLY_DELAY_MS",
                    defaults.reply_delay.as_millis() as u64,
                )
                .clamp(0, 60_000),
            ),
            frame_interval: Duration::from_millis(
                env_u64(
                    "CHATUI_FRAME_INTERVAL_MS",
                    defaults.frame_interval.as_millis() as u64,
                )
                .clamp(1, 1_000),
            ),
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}
