use super::{Location, Update};
use crate::speedometer::PositionSample;
use smol::channel::Sender;

pub struct Controller {
    location: Location,
    sample_tx: Sender<PositionSample>,
}

impl Controller {
    pub fn new(location: Location, sample_tx: Sender<PositionSample>) -> Self {
        Self {
            location,
            sample_tx,
        }
    }

    pub async fn run(&mut self) {
        while self.step().await {}

        // Dropping the controller closes the channel, letting the speedometer know
        log::info!("Location source has no more samples");
    }

    async fn step(&mut self) -> bool {
        match self.location.next().await {
            Ok(Update::Sample(sample)) => {
                self.sample_tx
                    .send(sample)
                    .await
                    .expect("Unable to send new location sample, channel is dead");
                true
            }
            Ok(Update::Finished) => false,
            Err(err) => {
                log::error!("Unable to get location sample: {:?}", err);
                true
            }
        }
    }
}
