use std::collections::VecDeque;

mod controller;
mod odometer;

pub use controller::{Controller, Tracking};
pub use odometer::Odometer;

/// Number of measurements to keep when going slow.
pub const SLOW_CAPACITY: usize = 3;

/// Number of measurements to keep when going at medium speed.
pub const MEDIUM_CAPACITY: usize = 4;

/// Number of measurements to keep when going fast.
pub const FAST_CAPACITY: usize = 5;

/// Below this speed (10 km/h), only `SLOW_CAPACITY` measurements are kept.
pub const SPEED_MEDIUM_THRESHOLD: f64 = 10.0 / 3.6;

/// Below this speed (20 km/h), only `MEDIUM_CAPACITY` measurements are kept.
pub const SPEED_FAST_THRESHOLD: f64 = 20.0 / 3.6;

/// Speeds below this value (m/s) are considered GPS noise while standing still.
pub const SPEED_MIN_THRESHOLD: f64 = 0.3;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct PositionSample {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl PositionSample {
    pub fn new(latitude: f64, longitude: f64, timestamp: i64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: None,
            timestamp,
        }
    }
}

/// Distance travelled between two consecutive samples, and how long it took.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Measurement {
    pub distance: f64,
    pub duration_millis: i64,
}

impl Measurement {
    pub fn new(distance: f64, duration_millis: i64) -> Self {
        Self {
            distance: distance.max(0.0),
            duration_millis,
        }
    }

    pub fn between(from: &PositionSample, to: &PositionSample) -> Self {
        Self::new(distance(from, to), to.timestamp - from.timestamp)
    }

    /// Speed in m/s, or 0 when the samples are not strictly ordered in time.
    pub fn speed(&self) -> f64 {
        if self.duration_millis <= 0 {
            return 0.0;
        }
        self.distance / (self.duration_millis as f64 / 1000.0)
    }
}

/// Haversine great-circle distance in meters, altitude is ignored.
pub fn distance(from: &PositionSample, to: &PositionSample) -> f64 {
    let dlat = (to.latitude - from.latitude).to_radians();
    let dlon = (to.longitude - from.longitude).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    (EARTH_RADIUS_M * c).max(0.0)
}

/// Keeps a log of distance/duration measurements. The size of the log depends on the last
/// measured speed: the faster we go, the more measurements are averaged.
#[derive(Debug)]
pub struct Speedometer {
    min_speed: f64,
    last_sample: Option<PositionSample>,
    history: VecDeque<Measurement>,
    capacity: usize,
    last_measurement: Option<Measurement>,
}

impl Default for Speedometer {
    fn default() -> Self {
        Self::new(SPEED_MIN_THRESHOLD)
    }
}

impl Speedometer {
    pub fn new(min_speed: f64) -> Self {
        Self {
            min_speed,
            last_sample: None,
            history: VecDeque::with_capacity(FAST_CAPACITY),
            capacity: SLOW_CAPACITY,
            last_measurement: None,
        }
    }

    pub fn on_sample(&mut self, sample: PositionSample) {
        if let Some(last_sample) = self.last_sample.replace(sample) {
            self.record(Measurement::between(&last_sample, &sample));
        }
    }

    fn record(&mut self, mut measurement: Measurement) {
        if measurement.duration_millis <= 0 {
            log::warn!(
                "Non-positive duration between samples ({} ms), speed is treated as 0",
                measurement.duration_millis
            );
        }

        let raw_speed = measurement.speed();

        if self.history.len() >= self.capacity {
            // Make room for the new value
            self.history.pop_back();

            if self.history.len() >= self.capacity {
                // Capacity shrunk since the last insertion
                self.history.pop_back();
            }
        }

        if raw_speed < self.min_speed {
            log::trace!("Speed under threshold ({raw_speed:.2} m/s), rounding to 0");
            measurement.distance = 0.0;
        }

        log::trace!("Adding speed: {:.2} km/h", raw_speed * 3.6);
        self.history.push_front(measurement);

        // Applies starting with the next sample
        self.capacity = capacity_for(raw_speed);
        log::trace!("Keeping {} measurements", self.capacity);

        self.last_measurement = Some(measurement);
    }

    /// Average speed in m/s over the retained measurements, excluding the fastest one when
    /// there are at least three of them.
    pub fn current_speed(&self) -> f64 {
        if self.history.is_empty() {
            return 0.0;
        }

        let (sum, max, count) = self.history.iter().map(Measurement::speed).fold(
            (0.0, 0.0_f64, 0_usize),
            |(sum, max, count), speed| (sum + speed, max.max(speed), count + 1),
        );

        let (sum, count) = if count >= 3 {
            (sum - max, count - 1)
        } else {
            (sum, count)
        };

        let average = sum / count as f64;
        log::trace!("Average speed: {average:.2} m/s over {count} measurements");

        if average < self.min_speed {
            0.0
        } else {
            average
        }
    }

    pub fn last_measurement(&self) -> Option<Measurement> {
        self.last_measurement
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Retained measurements, most recent first.
    pub fn history(&self) -> impl Iterator<Item = &Measurement> {
        self.history.iter()
    }
}

fn capacity_for(speed: f64) -> usize {
    if speed < SPEED_MEDIUM_THRESHOLD {
        SLOW_CAPACITY
    } else if speed < SPEED_FAST_THRESHOLD {
        MEDIUM_CAPACITY
    } else {
        FAST_CAPACITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One degree of longitude at the equator
    const METERS_PER_DEGREE: f64 = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;

    fn east(meters: f64, timestamp: i64) -> PositionSample {
        PositionSample::new(0.0, meters / METERS_PER_DEGREE, timestamp)
    }

    fn speeds(speedometer: &Speedometer) -> Vec<f64> {
        speedometer.history().map(Measurement::speed).collect()
    }

    fn with_history(speeds: &[f64]) -> Speedometer {
        let mut speedometer = Speedometer::default();
        // Most recent first, 1s per measurement
        speedometer.history = speeds
            .iter()
            .map(|&speed| Measurement::new(speed, 1000))
            .collect();
        speedometer.capacity = FAST_CAPACITY;
        speedometer
    }

    fn assert_close(expected: f64, actual: f64) {
        assert!(
            (expected - actual).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_distance_known_pair() {
        // Paris to London, roughly 343.5 km
        let paris = PositionSample::new(48.8566, 2.3522, 0);
        let london = PositionSample::new(51.5074, -0.1278, 0);

        let d = distance(&paris, &london);

        assert!((d - 343_500.0).abs() < 1_000.0, "got {d}");
        assert_close(d, distance(&london, &paris));
    }

    #[test]
    fn test_distance_same_point() {
        let p = PositionSample::new(45.0, 7.0, 0);
        assert_eq!(0.0, distance(&p, &p));
    }

    #[test]
    fn test_measurement_speed() {
        assert_close(2.5, Measurement::new(5.0, 2000).speed());
        assert_eq!(0.0, Measurement::new(5.0, 0).speed());
        assert_eq!(0.0, Measurement::new(5.0, -1000).speed());
        assert_eq!(0.0, Measurement::new(-3.0, 1000).distance);
    }

    #[test]
    fn test_empty_speedometer_reads_zero() {
        let speedometer = Speedometer::default();

        assert_eq!(0.0, speedometer.current_speed());
        assert_eq!(None, speedometer.last_measurement());
        assert_eq!(SLOW_CAPACITY, speedometer.capacity());
    }

    #[test]
    fn test_first_sample_only_primes() {
        let mut speedometer = Speedometer::default();

        speedometer.on_sample(east(0.0, 0));

        assert_eq!(0.0, speedometer.current_speed());
        assert_eq!(0, speedometer.history().count());
        assert_eq!(None, speedometer.last_measurement());
        assert_eq!(Some(east(0.0, 0)), speedometer.last_sample);
    }

    #[test]
    fn test_second_sample_produces_measurement() {
        let mut speedometer = Speedometer::default();

        speedometer.on_sample(east(0.0, 0));
        speedometer.on_sample(east(10.0, 2000));

        let measurement = speedometer.last_measurement().unwrap();
        assert_close(10.0, measurement.distance);
        assert_eq!(2000, measurement.duration_millis);
        assert_close(5.0, speedometer.current_speed());
        assert_eq!(Some(east(10.0, 2000)), speedometer.last_sample);
    }

    #[test]
    fn test_dead_zone_zeroes_stored_distance() {
        let mut speedometer = Speedometer::default();

        // 0.2 m/s, below the threshold but not zero
        speedometer.on_sample(east(0.0, 0));
        speedometer.on_sample(east(0.2, 1000));

        let stored = *speedometer.history().next().unwrap();
        assert_eq!(0.0, stored.distance);
        assert_eq!(1000, stored.duration_millis);
        assert_eq!(Some(stored), speedometer.last_measurement());
        assert_eq!(0.0, speedometer.current_speed());
    }

    #[test]
    fn test_capacity_follows_raw_speed() {
        let test_cases = vec![
            (1.0, SLOW_CAPACITY),
            (2.7, SLOW_CAPACITY),
            (2.8, MEDIUM_CAPACITY),
            (5.5, MEDIUM_CAPACITY),
            (5.6, FAST_CAPACITY),
            (100.0, FAST_CAPACITY),
        ];

        for (speed, expected_capacity) in test_cases {
            let mut speedometer = Speedometer::default();
            speedometer.on_sample(east(0.0, 0));
            speedometer.on_sample(east(speed, 1000));
            assert_eq!(expected_capacity, speedometer.capacity(), "speed {speed}");
        }
    }

    #[test]
    fn test_capacity_uses_raw_speed_even_when_zeroed() {
        let mut speedometer = Speedometer::new(10.0);

        // 6 m/s is fast, but under this speedometer's dead-zone
        speedometer.on_sample(east(0.0, 0));
        speedometer.on_sample(east(6.0, 1000));

        assert_eq!(0.0, speedometer.history().next().unwrap().distance);
        assert_eq!(FAST_CAPACITY, speedometer.capacity());
    }

    #[test]
    fn test_capacity_change_applies_to_next_insertion() {
        let mut speedometer = Speedometer::default();
        speedometer.on_sample(east(0.0, 0));

        // Five fast measurements fill the window
        for i in 1..=5 {
            speedometer.on_sample(east(100.0 * i as f64, 1000 * i));
        }
        assert_eq!(5, speedometer.history().count());
        assert_eq!(FAST_CAPACITY, speedometer.capacity());

        // A slow one is inserted with the fast capacity still in effect...
        speedometer.on_sample(east(502.0, 6000));
        assert_eq!(5, speedometer.history().count());
        assert_eq!(SLOW_CAPACITY, speedometer.capacity());

        // ... and only the next insertion shrinks the window, two at a time
        speedometer.on_sample(east(504.0, 7000));
        assert_eq!(4, speedometer.history().count());
        speedometer.on_sample(east(506.0, 8000));
        assert_eq!(3, speedometer.history().count());
        speedometer.on_sample(east(508.0, 9000));
        assert_eq!(3, speedometer.history().count());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut speedometer = Speedometer::default();
        let steps = [0.0, 30.0, 1.0, 8.0, 0.1, 50.0, 4.0, 4.0, 0.0, 12.0, 2.0, 90.0, 3.0];

        let mut position = 0.0;
        for (i, step) in steps.iter().enumerate() {
            position += step;
            speedometer.on_sample(east(position, 1000 * i as i64));
            assert!(speedometer.history().count() <= FAST_CAPACITY, "step {i}");
        }

        // Once the regime is stable the window settles within the current capacity
        for i in 0..3 {
            position += 1.0;
            speedometer.on_sample(east(position, 1000 * (steps.len() + i) as i64));
        }
        assert_eq!(SLOW_CAPACITY, speedometer.capacity());
        assert!(speedometer.history().count() <= speedometer.capacity());
    }

    #[test]
    fn test_outlier_is_dropped() {
        let speedometer = with_history(&[2.0, 8.0, 3.0]);

        assert_close(2.5, speedometer.current_speed());
    }

    #[test]
    fn test_no_outlier_rejection_below_three_measurements() {
        let speedometer = with_history(&[2.0, 8.0]);

        assert_close(5.0, speedometer.current_speed());
    }

    #[test]
    fn test_only_one_maximum_is_dropped() {
        let speedometer = with_history(&[8.0, 2.0, 8.0, 8.0]);

        assert_close(6.0, speedometer.current_speed());
    }

    #[test]
    fn test_average_under_threshold_is_zero() {
        let speedometer = with_history(&[0.1, 0.2, 5.0]);

        assert_eq!(0.0, speedometer.current_speed());
    }

    #[test]
    fn test_non_positive_duration_does_not_corrupt_stream() {
        let mut speedometer = Speedometer::default();

        speedometer.on_sample(east(0.0, 1000));
        speedometer.on_sample(east(10.0, 1000));
        speedometer.on_sample(east(20.0, 500));
        speedometer.on_sample(east(30.0, 1500));

        let retained = speeds(&speedometer);
        assert_eq!(3, retained.len());
        assert_close(10.0, retained[0]);
        assert_eq!(0.0, retained[1]);
        assert_eq!(0.0, retained[2]);
        assert!(speedometer.current_speed().is_finite());
        assert_eq!(FAST_CAPACITY, speedometer.capacity());
    }

    #[test]
    fn test_current_speed_is_pure() {
        let mut speedometer = Speedometer::default();
        speedometer.on_sample(east(0.0, 0));
        speedometer.on_sample(east(4.0, 1000));
        speedometer.on_sample(east(9.0, 2000));

        let history_before = speeds(&speedometer);
        let first = speedometer.current_speed();
        for _ in 0..10 {
            assert_eq!(first, speedometer.current_speed());
        }
        assert_eq!(history_before, speeds(&speedometer));
        assert_eq!(MEDIUM_CAPACITY, speedometer.capacity());
    }

    #[test]
    fn test_fast_then_slow_ride() {
        let mut speedometer = Speedometer::default();

        speedometer.on_sample(east(0.0, 0));
        speedometer.on_sample(east(100.0, 1000));
        assert_eq!(FAST_CAPACITY, speedometer.capacity());

        // Four more samples, 2 m apart each second
        for i in 1..=4 {
            speedometer.on_sample(east(100.0 + 2.0 * i as f64, 1000 + 1000 * i));
        }

        // Window evolution: [100] -> [2,100] (cap 5) -> [2,2,100] (cap 3)
        // -> [2,2,2] (cap 3, evicts 100) -> [2,2,2]
        let retained = speeds(&speedometer);
        assert_eq!(3, retained.len());
        for speed in &retained {
            assert_close(2.0, *speed);
        }

        // (6 - 2) / 2
        assert_close(2.0, speedometer.current_speed());
        assert_eq!(SLOW_CAPACITY, speedometer.capacity());
    }

    #[test]
    fn test_fast_window_drops_spike() {
        let mut speedometer = Speedometer::default();

        speedometer.on_sample(east(0.0, 0));
        speedometer.on_sample(east(100.0, 1000));
        speedometer.on_sample(east(106.0, 2000));
        speedometer.on_sample(east(112.0, 3000));

        // [6, 6, 100], the spike is discarded from the average
        assert_close(6.0, speedometer.current_speed());
    }
}
