//! Fixed-interval spacing of outbound calls.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Enforces a minimum gap between successive calls.
///
/// Callers queue on the mutex, so concurrent callers are released one
/// `spacing` apart. A zero spacing never waits.
#[derive(Debug)]
pub struct Pacer {
    spacing: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl Pacer {
    pub fn new(spacing: Duration) -> Self {
        Self {
            spacing,
            next_slot: Mutex::new(None),
        }
    }

    /// Wait until the next call may be issued.
    pub async fn wait(&self) {
        if self.spacing.is_zero() {
            return;
        }

        let mut next_slot = self.next_slot.lock().await;
        if let Some(slot) = *next_slot {
            if slot > Instant::now() {
                debug!("Pacing: waiting {:?}", slot - Instant::now());
                tokio::time::sleep_until(slot).await;
            }
        }
        *next_slot = Some(Instant::now() + self.spacing);
    }
}
