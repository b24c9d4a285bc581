//! Status command - show who listens on the port.

use anyhow::Result;
use devsolo_core::domain::format_pids;
use devsolo_core::{platform_reclaimer, DevConfig, Probe};

use super::reject;

pub async fn run(config: devsolo_core::Result<DevConfig>, json: bool) -> Result<i32> {
    let config = match config {
        Ok(config) => config,
        Err(e) => return Ok(reject(&e)),
    };

    let probe = platform_reclaimer().probe(config.port).await;

    if json {
        let body = match &probe {
            Probe::Listeners(pids) if pids.is_empty() => {
                serde_json::json!({ "port": config.port, "state": "free", "pids": [] })
            }
            Probe::Listeners(pids) => {
                serde_json::json!({ "port": config.port, "state": "busy", "pids": pids })
            }
            Probe::Unknown(reason) => {
                serde_json::json!({ "port": config.port, "state": "unknown", "error": reason })
            }
        };
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(0);
    }

    match &probe {
        Probe::Listeners(pids) if pids.is_empty() => {
            println!("Port {}: free", config.port);
        }
        Probe::Listeners(pids) => {
            println!("Port {}: busy ({})", config.port, format_pids(pids));
        }
        Probe::Unknown(reason) => {
            println!("Port {}: unknown ({})", config.port, reason);
        }
    }

    Ok(0)
}
