use super::Reading;
use crate::ErrorBox;
use std::fs::OpenOptions;
use std::path::PathBuf;

/// Keeps a YAML snapshot of the latest reading, for a companion display to poll.
pub struct File {
    path: PathBuf,
}

impl File {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl super::Dashboard for File {
    fn show(&self, reading: &Reading) -> Result<(), ErrorBox> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|e| format!("Can't open '{}': {e}", self.path.display()))?;

        Ok(serde_yaml::to_writer(file, reading)?)
    }
}
