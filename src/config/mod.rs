use anyhow::{ensure, Context};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub mod app;
pub mod file;

pub use app::{Location, Output, Pacing, Units};

const DEFAULT_SPEEDUP: f64 = 1.0;
const DEFAULT_REPLAY_INTERVAL_MS: u64 = 1000;
const DEFAULT_CMD_INTERVAL_MS: u64 = 1000;
const DEFAULT_REFRESH_MS: u64 = 1000;

pub fn load() -> anyhow::Result<app::Config> {
    let config_path = xdg::BaseDirectories::with_prefix("speedo")?
        .find_config_file("config.toml");

    let file_config = match config_path {
        Some(path) => {
            log::debug!("Reading config from '{}'", path.display());
            fs::read_to_string(&path)
                .with_context(|| format!("Unable to read '{}'", path.display()))?
        }
        None => include_str!("../../config.toml").to_string(),
    };

    parse(&file_config)
}

fn parse(file_config: &str) -> anyhow::Result<app::Config> {
    let cfg: file::Config = toml::from_str(file_config).context("Invalid config file")?;

    let min_speed = cfg
        .speedometer
        .min_speed
        .unwrap_or(crate::speedometer::SPEED_MIN_THRESHOLD);
    ensure!(
        min_speed.is_finite() && min_speed >= 0.0,
        "speedometer.min_speed must be a non-negative number of m/s, got {min_speed}"
    );

    let location = match cfg.location {
        file::Location::Replay {
            path,
            realtime,
            speedup,
            interval_ms,
        } => {
            let pacing = if realtime {
                let speedup = speedup.unwrap_or(DEFAULT_SPEEDUP);
                ensure!(
                    speedup.is_finite() && speedup > 0.0,
                    "location.replay.speedup must be positive, got {speedup}"
                );
                Pacing::Realtime { speedup }
            } else {
                Pacing::Fixed(Duration::from_millis(
                    interval_ms.unwrap_or(DEFAULT_REPLAY_INTERVAL_MS),
                ))
            };
            app::Location::Replay { path, pacing }
        }
        file::Location::Cmd {
            command,
            interval_ms,
        } => app::Location::Cmd {
            command,
            interval: Duration::from_millis(interval_ms.unwrap_or(DEFAULT_CMD_INTERVAL_MS)),
        },
        file::Location::None => app::Location::None,
    };

    let refresh_ms = cfg.dashboard.refresh_ms.unwrap_or(DEFAULT_REFRESH_MS);
    ensure!(refresh_ms > 0, "dashboard.refresh_ms must be positive");

    Ok(app::Config {
        min_speed,
        location,
        dashboard: app::Dashboard {
            units: cfg.dashboard.units,
            refresh: Duration::from_millis(refresh_ms),
            output: match cfg.dashboard.output {
                file::Output::Console => app::Output::Console,
                file::Output::File { path } => app::Output::File {
                    path: PathBuf::from(path),
                },
            },
        },
    })
}
