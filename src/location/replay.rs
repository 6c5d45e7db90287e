use super::Update;
use crate::speedometer::PositionSample;
use crate::ErrorBox;
use smol::Timer;
use std::collections::VecDeque;
use std::time::Duration;

/// How fast a recorded track is played back.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Pacing {
    /// Follow the recorded timestamps, `speedup` times faster.
    Realtime { speedup: f64 },
    /// Ignore the timestamps and wait the same time between all samples.
    Fixed(Duration),
}

/// Plays back a recorded track, one sample per line.
pub struct Replay {
    samples: VecDeque<PositionSample>,
    pacing: Pacing,
    last_timestamp: Option<i64>,
}

impl Replay {
    pub async fn new(path: &str, pacing: Pacing) -> Result<Self, ErrorBox> {
        let content = smol::fs::read_to_string(path)
            .await
            .map_err(|e| ErrorBox::from(format!("Can't read track '{path}': {e}")))?;

        let replay = Self::parse(&content, pacing);
        log::info!("Loaded {} samples from '{}'", replay.samples.len(), path);
        Ok(replay)
    }

    fn parse(content: &str, pacing: Pacing) -> Self {
        let samples = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
            .filter_map(|(i, line)| match super::parse_sample(line) {
                Ok(sample) => Some(sample),
                Err(err) => {
                    log::warn!("Skipping line {} of the track: {}", i + 1, err);
                    None
                }
            })
            .collect();

        Self {
            samples,
            pacing,
            last_timestamp: None,
        }
    }

    pub async fn next(&mut self) -> Update {
        let Some(sample) = self.samples.pop_front() else {
            return Update::Finished;
        };

        if let Some(last) = self.last_timestamp {
            Timer::after(self.delay(last, sample.timestamp)).await;
        }

        self.last_timestamp = Some(sample.timestamp);
        Update::Sample(sample)
    }

    fn delay(&self, from: i64, to: i64) -> Duration {
        match self.pacing {
            Pacing::Realtime { speedup } => {
                let millis = (to - from).max(0) as f64 / speedup;
                Duration::from_secs_f64(millis / 1000.0)
            }
            Pacing::Fixed(interval) => interval,
        }
    }
}
