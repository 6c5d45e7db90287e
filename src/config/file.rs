use serde::Deserialize;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Replay {
        path: String,
        #[serde(default)]
        realtime: bool,
        speedup: Option<f64>,
        interval_ms: Option<u64>,
    },
    Cmd {
        command: String,
        interval_ms: Option<u64>,
    },
    None,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct Speedometer {
    pub min_speed: Option<f64>,
}

#[derive(Deserialize, Debug, Default, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum Output {
    #[default]
    Console,
    File {
        path: String,
    },
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct Dashboard {
    pub units: Units,
    pub refresh_ms: Option<u64>,
    pub output: Output,
}

#[derive(Deserialize, Debug)]
pub struct Config {
    #[serde(default)]
    pub speedometer: Speedometer,
    pub location: Location,
    #[serde(default)]
    pub dashboard: Dashboard,
}
