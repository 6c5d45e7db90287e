use crate::config::Units;
use crate::speedometer::Tracking;
use crate::ErrorBox;
#[cfg(test)]
use mockall::automock;
use serde::Serialize;
use std::fmt;

mod console;
mod controller;
mod file;

pub use console::Console;
pub use controller::Controller;
pub use file::File;

const MPS_TO_KMH: f64 = 3.6;
const MPS_TO_MPH: f64 = 2.236_936;
const METERS_PER_KM: f64 = 1000.0;
const METERS_PER_MILE: f64 = 1609.344;

#[cfg_attr(test, automock)]
pub trait Dashboard {
    fn show(&self, reading: &Reading) -> Result<(), ErrorBox>;
}

/// What a companion display shows about the ongoing ride, in the user's units.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Reading {
    pub speed: f64,
    pub speed_unit: &'static str,
    pub distance: f64,
    pub distance_unit: &'static str,
    pub elapsed_secs: i64,
}

impl Reading {
    pub fn new(tracking: &Tracking, units: Units) -> Self {
        let speed = tracking.speedometer.current_speed();
        let distance = tracking.odometer.total_distance();
        let elapsed_secs = tracking.odometer.elapsed_millis() / 1000;

        match units {
            Units::Metric => Self {
                speed: speed * MPS_TO_KMH,
                speed_unit: "km/h",
                distance: distance / METERS_PER_KM,
                distance_unit: "km",
                elapsed_secs,
            },
            Units::Imperial => Self {
                speed: speed * MPS_TO_MPH,
                speed_unit: "mph",
                distance: distance / METERS_PER_MILE,
                distance_unit: "mi",
                elapsed_secs,
            },
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1} {}, {:.2} {} in {:02}:{:02}:{:02}",
            self.speed,
            self.speed_unit,
            self.distance,
            self.distance_unit,
            self.elapsed_secs / 3600,
            self.elapsed_secs % 3600 / 60,
            self.elapsed_secs % 60
        )
    }
}
