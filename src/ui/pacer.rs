//! Display-frame pacing, abstracted so render and stream ticks can be
//! driven by a timer in production and by hand in tests.

use std::time::Duration;

use tokio::sync::{Semaphore, watch};

/// Source of "next display frame" ticks.
pub enum FramePacer {
    /// Fixed-interval frames, gated on a visibility flag. A timer keeps
    /// firing in a hidden tab, so unlike frame-callback pacing the
    /// suspend-while-hidden behavior must be explicit: while hidden,
    /// `next_frame` parks until visibility returns.
    Interval {
        frame: Duration,
        visible: watch::Sender<bool>,
    },
    /// Frames fire only when `tick` is called. Test driver.
    Manual { ticks: Semaphore },
}

impl FramePacer {
    pub fn interval(frame: Duration) -> Self {
        let (visible, _) = watch::channel(true);
        Self::Interval { frame, visible }
    }

    pub fn manual() -> Self {
        Self::Manual {
            ticks: Semaphore::new(0),
        }
    }

    /// Hidden-tab hook. Frames stop while hidden and resume, picking up
    /// exactly where they left off, when visibility returns. No-op for
    /// manual pacing.
    pub fn set_visible(&self, is_visible: bool) {
        if let Self::Interval { visible, .. } = self {
            visible.send_replace(is_visible);
        }
    }

    /// Release `n` frames to waiting tasks. No-op for interval pacing.
    pub fn tick(&self, n: usize) {
        if let Self::Manual { ticks } = self {
            ticks.add_permits(n);
        }
    }

    /// Complete at the next display frame.
    pub async fn next_frame(&self) {
        match self {
            Self::Interval { frame, visible } => {
                let mut rx = visible.subscribe();
                while !*rx.borrow() {
                    if rx.changed().await.is_err() {
                        return;
                    }
                }
                tokio::time::sleep(*frame).await;
            }
            Self::Manual { ticks } => {
                if let Ok(permit) = ticks.acquire().await {
                    permit.forget();
                }
            }
        }
    }
}
