use {
    std::time::{Duration, Instant},
    tracing::info,
};

const REPORT_INTERVAL: Duration = Duration::from_secs(10);

/// Periodic rate logging for long per-item loops.
pub struct Progress {
    message: String,
    total: usize,
    started_at: Instant,
    reported_at: Instant,
    processed: usize,
}

impl Progress {
    pub fn new(message: impl Into<String>, total: usize) -> Self {
        let now = Instant::now();
        Self {
            message: message.into(),
            total,
            started_at: now,
            reported_at: now,
            processed: 0,
        }
    }

    /// Counts one processed item and logs if the report interval has passed.
    pub fn update(&mut self) -> bool {
        self.processed += 1;

        let now = Instant::now();
        if now - self.reported_at >= REPORT_INTERVAL {
            self.reported_at = now;
            info!("{}: {}/{} ({:.2}/second)", self.message, self.processed, self.total, self.rate(now));
            true
        } else {
            false
        }
    }

    pub fn finish(&self) {
        let now = Instant::now();
        info!(
            "{}: done, {} in {:.2}s ({:.2}/second)",
            self.message,
            self.processed,
            (now - self.started_at).as_secs_f32(),
            self.rate(now)
        );
    }

    fn rate(&self, now: Instant) -> f32 {
        let elapsed = (now - self.started_at).as_secs_f32();
        if elapsed > 0.0 {
            self.processed as f32 / elapsed
        } else {
            0.0
        }
    }
}
