use super::{Odometer, PositionSample, Speedometer};
use smol::channel::Receiver;
use smol::lock::Mutex;
use std::sync::Arc;

/// Everything known about the ongoing ride, shared between the writer feeding samples and
/// readers asking for the current speed.
#[derive(Debug, Default)]
pub struct Tracking {
    pub speedometer: Speedometer,
    pub odometer: Odometer,
}

impl Tracking {
    pub fn new(min_speed: f64) -> Self {
        Self {
            speedometer: Speedometer::new(min_speed),
            odometer: Odometer::default(),
        }
    }

    pub fn on_sample(&mut self, sample: PositionSample) {
        let primed = self.speedometer.last_sample.is_some();
        self.speedometer.on_sample(sample);

        if primed {
            if let Some(measurement) = self.speedometer.last_measurement() {
                self.odometer.add(&measurement);
            }
        }
        self.odometer.mark(sample.timestamp);
    }
}

pub struct Controller {
    sample_rx: Receiver<PositionSample>,
    tracking: Arc<Mutex<Tracking>>,
}

impl Controller {
    pub fn new(sample_rx: Receiver<PositionSample>, tracking: Arc<Mutex<Tracking>>) -> Self {
        Self {
            sample_rx,
            tracking,
        }
    }

    pub async fn run(&mut self) {
        // Every sample must be processed in order, never coalesce them
        while let Ok(sample) = self.sample_rx.recv().await {
            self.step(sample).await;
        }

        log::info!("Location source is exhausted, no more samples will be processed");
    }

    async fn step(&mut self, sample: PositionSample) {
        log::trace!("Sample: {:?}", sample);

        let mut tracking = self.tracking.lock().await;
        tracking.on_sample(sample);

        if let Some(measurement) = tracking.speedometer.last_measurement() {
            log::debug!(
                "Last measurement: {:.1} m in {} ms, window: {}/{}",
                measurement.distance,
                measurement.duration_millis,
                tracking.speedometer.history().count(),
                tracking.speedometer.capacity()
            );
        }
    }
}
