//! Default command - free the port, then run the dev server on it.

use devsolo_core::{platform_supervisor, DevConfig, Result};

use super::printer;

pub async fn run(config: Result<DevConfig>) -> i32 {
    platform_supervisor()
        .with_events(printer())
        .run(config)
        .await
}
