use macro_rules_attribute::apply;
use smol::channel;
use smol::lock::Mutex;
use smol_macros::{main, Executor};
use speedometer::Tracking;
use std::error::Error;
use std::sync::Arc;

mod config;
mod dashboard;
mod location;
mod speedometer;

pub type ErrorBox = Box<dyn Error + Send + Sync>;

const SAMPLE_CHANNEL_CAPACITY: usize = 128;

#[apply(main!)]
async fn main(ex: &Executor<'_>) {
    let panic_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        panic_hook(panic_info);
        std::process::exit(1);
    }));

    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    log::info!("speedo {}", env!("SPEEDO_VERSION"));

    let config = match config::load() {
        Ok(config) => config,
        Err(err) => panic!("Unable to load config: {:#}", err),
    };

    log::debug!("Using {:#?}", config);

    let location = match init_location(&config.location).await {
        Ok(location) => location,
        Err(err) => panic!("Unable to initialize location source: {}", err),
    };

    let (sample_tx, sample_rx) = channel::bounded(SAMPLE_CHANNEL_CAPACITY);
    let tracking = Arc::new(Mutex::new(Tracking::new(config.min_speed)));

    ex.spawn(async move {
        location::Controller::new(location, sample_tx).run().await;
    })
    .detach();

    let units = config.dashboard.units;
    let dashboard = init_dashboard(&config.dashboard.output);
    ex.spawn({
        let tracking = tracking.clone();
        let refresh = config.dashboard.refresh;
        async move {
            dashboard::Controller::new(dashboard, tracking, units, refresh)
                .run()
                .await;
        }
    })
    .detach();

    speedometer::Controller::new(sample_rx, tracking.clone())
        .run()
        .await;

    let tracking = tracking.lock().await;
    log::info!(
        "Ride finished: {}",
        dashboard::Reading::new(&tracking, units)
    );
}

async fn init_location(cfg: &config::Location) -> Result<location::Location, ErrorBox> {
    Ok(match cfg.clone() {
        config::Location::Replay { path, pacing } => {
            location::Location::Replay(location::Replay::new(&path, pacing).await?)
        }
        config::Location::Cmd { command, interval } => {
            location::Location::Cmd(location::Cmd::new(command, interval))
        }
        config::Location::None => {
            log::warn!("No location source configured, speed will stay at 0");
            location::Location::None
        }
    })
}

fn init_dashboard(output: &config::Output) -> Box<dyn dashboard::Dashboard + Send> {
    match output {
        config::Output::Console => Box::<dashboard::Console>::default(),
        config::Output::File { path } => Box::new(dashboard::File::new(path.clone())),
    }
}
