use chrono::Utc;

/// Wall-clock source for message timestamps that never runs backwards.
///
/// If the system clock is stepped back between two sends, the second send
/// reuses the previous timestamp instead of going back in time.
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last_micros: Option<i64>,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time in microseconds since the Unix epoch, clamped to be no
    /// earlier than the previous reading.
    pub fn now_micros(&mut self) -> i64 {
        self.observe(Utc::now().timestamp_micros())
    }

    pub(crate) fn observe(&mut self, wall_micros: i64) -> i64 {
        let micros = match self.last_micros {
            Some(last) if last > wall_micros => last,
            _ => wall_micros,
        };
        self.last_micros = Some(micros);
        micros
    }
}
