use crate::speedometer::PositionSample;
use crate::ErrorBox;
use itertools::Itertools;

mod cmd;
mod controller;
mod replay;

pub use cmd::Cmd;
pub use controller::Controller;
pub use replay::{Pacing, Replay};

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Update {
    Sample(PositionSample),
    /// The source will never produce samples again.
    Finished,
}

pub enum Location {
    Replay(Replay),
    Cmd(Cmd),
    None,

    #[cfg(test)]
    Mock(Vec<Result<Update, ErrorBox>>),
}

impl Location {
    pub async fn next(&mut self) -> Result<Update, ErrorBox> {
        match self {
            Location::Replay(l) => Ok(l.next().await),
            Location::Cmd(l) => l.next().await,
            Location::None => smol::future::pending().await,

            #[cfg(test)]
            Location::Mock(updates) if updates.is_empty() => Ok(Update::Finished),
            #[cfg(test)]
            Location::Mock(updates) => updates.remove(0),
        }
    }
}

/// Parses `timestamp,latitude,longitude[,altitude]`, where timestamp is either milliseconds
/// since the Unix epoch, an RFC 3339 date-time or `now`. A bare `latitude,longitude` fix is
/// stamped with the wall clock.
pub fn parse_sample(line: &str) -> Result<PositionSample, ErrorBox> {
    let fields = line.trim().split(',').map(str::trim).collect_vec();

    let (timestamp, latitude, longitude, altitude) = match fields[..] {
        [lat, lon] => ("now", lat, lon, None),
        [t, lat, lon] => (t, lat, lon, None),
        [t, lat, lon, alt] => (t, lat, lon, Some(alt)),
        _ => Err(format!(
            "Expected 'timestamp,latitude,longitude[,altitude]', got {:?}",
            line.trim()
        ))?,
    };

    let latitude: f64 = latitude.parse()?;
    let longitude: f64 = longitude.parse()?;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        Err(format!("Coordinates out of range: {latitude}, {longitude}"))?;
    }

    Ok(PositionSample {
        altitude: altitude
            .filter(|alt| !alt.is_empty())
            .map(str::parse)
            .transpose()?,
        ..PositionSample::new(latitude, longitude, parse_timestamp(timestamp)?)
    })
}

fn parse_timestamp(value: &str) -> Result<i64, ErrorBox> {
    if value == "now" {
        return Ok(chrono::Utc::now().timestamp_millis());
    }

    match value.parse::<i64>() {
        Ok(millis) => Ok(millis),
        Err(_) => Ok(chrono::DateTime::parse_from_rfc3339(value)?.timestamp_millis()),
    }
}
