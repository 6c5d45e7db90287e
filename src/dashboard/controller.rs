use super::{Dashboard, Reading};
use crate::config::Units;
use crate::speedometer::Tracking;
use smol::lock::Mutex;
use smol::Timer;
use std::sync::Arc;
use std::time::Duration;

pub struct Controller {
    dashboard: Box<dyn Dashboard + Send>,
    tracking: Arc<Mutex<Tracking>>,
    units: Units,
    refresh: Duration,
}

impl Controller {
    pub fn new(
        dashboard: Box<dyn Dashboard + Send>,
        tracking: Arc<Mutex<Tracking>>,
        units: Units,
        refresh: Duration,
    ) -> Self {
        Self {
            dashboard,
            tracking,
            units,
            refresh,
        }
    }

    pub async fn run(&mut self) {
        loop {
            self.step().await;
            Timer::after(self.refresh).await;
        }
    }

    async fn step(&mut self) {
        let reading = Reading::new(&*self.tracking.lock().await, self.units);

        if let Err(err) = self.dashboard.show(&reading) {
            log::error!("Unable to show reading '{}': {:?}", reading, err);
        }
    }
}
