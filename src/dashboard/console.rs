use super::Reading;
use crate::ErrorBox;

#[derive(Default)]
pub struct Console {}

impl super::Dashboard for Console {
    fn show(&self, reading: &Reading) -> Result<(), ErrorBox> {
        log::info!("{}", reading);
        Ok(())
    }
}
