//! Free command - reclaim the port without launching anything.

use devsolo_core::{platform_reclaimer, DevConfig, DevEvent, Result, LOG_PREFIX};

use super::{printer, reject};

pub async fn run(config: Result<DevConfig>) -> i32 {
    let config = match config {
        Ok(config) => config,
        Err(e) => return reject(&e),
    };

    let events = printer();
    events(&DevEvent::TargetPort { port: config.port });

    let reclaimer = platform_reclaimer()
        .with_policy(config.probe_policy)
        .with_events(events.clone());

    if reclaimer.reclaim(config.port, config.max_attempts).await {
        println!("{} Port {} is free.", LOG_PREFIX, config.port);
        0
    } else {
        events(&DevEvent::PortBusy { port: config.port });
        1
    }
}
