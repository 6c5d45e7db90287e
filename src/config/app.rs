use std::path::PathBuf;
use std::time::Duration;

pub use super::file::Units;
pub use crate::location::Pacing;

#[derive(Debug, Clone)]
pub enum Location {
    Replay {
        path: String,
        pacing: Pacing,
    },
    Cmd {
        command: String,
        interval: Duration,
    },
    None,
}

#[derive(Debug, Clone)]
pub enum Output {
    Console,
    File { path: PathBuf },
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub units: Units,
    pub refresh: Duration,
    pub output: Output,
}

#[derive(Debug)]
pub struct Config {
    /// Dead-zone of the speedometer, in m/s.
    pub min_speed: f64,
    pub location: Location,
    pub dashboard: Dashboard,
}
