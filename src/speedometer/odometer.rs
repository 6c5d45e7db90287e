use super::Measurement;

/// Running totals of the current ride.
#[derive(Debug, Default, PartialEq, Clone, Copy)]
pub struct Odometer {
    total_distance: f64,
    started_at: Option<i64>,
    last_at: Option<i64>,
}

impl Odometer {
    pub fn mark(&mut self, timestamp: i64) {
        self.started_at.get_or_insert(timestamp);
        self.last_at = Some(timestamp);
    }

    /// Expects the measurement as it was stored, so that distances under the dead-zone don't
    /// accumulate while standing still.
    pub fn add(&mut self, measurement: &Measurement) {
        self.total_distance += measurement.distance;
    }

    /// Meters.
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    pub fn elapsed_millis(&self) -> i64 {
        match (self.started_at, self.last_at) {
            (Some(start), Some(last)) => (last - start).max(0),
            _ => 0,
        }
    }
}
