use super::Update;
use crate::ErrorBox;
use smol::process::{Command, Output};
use smol::Timer;
use std::time::Duration;

/// Asks an external command for the current position, e.g. a `gpspipe` wrapper.
pub struct Cmd {
    command: String,
    interval: Duration,
    started: bool,
}

impl Cmd {
    pub fn new(command: String, interval: Duration) -> Self {
        Self {
            command,
            interval,
            started: false,
        }
    }

    pub async fn next(&mut self) -> Result<Update, ErrorBox> {
        if self.started {
            Timer::after(self.interval).await;
        }
        self.started = true;

        let sample = super::parse_sample(&self.output().await?)?;
        log::trace!("Location (cmd): {:?}", sample);
        Ok(Update::Sample(sample))
    }

    async fn output(&self) -> Result<String, ErrorBox> {
        let Output { status, stdout, .. } = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .output()
            .await?;

        if !status.success() {
            let cmd = &self.command;
            log::warn!("Command {cmd:?} failed: {status}");
            Err(format!("Command {cmd:?} failed: {status}"))?;
        }

        Ok(String::from_utf8(stdout)?)
    }
}
