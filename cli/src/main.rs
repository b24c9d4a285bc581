//! dev-solo CLI - Run exactly one dev server on a fixed port
//!
//! With no subcommand, frees `DEV_PORT` (default 4977) and launches the dev
//! server on it in strict-port mode. Subcommands expose the individual steps.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use devsolo_core::config::DEFAULT_MAX_ATTEMPTS;
use devsolo_core::{DevConfig, ProbePolicy, ServerCommand};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the tracing filter.
const LOG_ENV: &str = "DEV_SOLO_LOG";

#[derive(Parser)]
#[command(name = "dev-solo")]
#[command(author, version, about = "Run exactly one dev server on a fixed port")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Treat a failed listener query as a busy port instead of a free one
    #[arg(long, global = true)]
    fail_closed: bool,

    /// Reclaim attempts before giving up
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    attempts: u32,

    /// Dev server program (default: npx astro dev)
    #[arg(long)]
    server_cmd: Option<String>,

    /// Leading argument for --server-cmd, repeatable
    #[arg(long = "server-arg", allow_hyphen_values = true, requires = "server_cmd")]
    server_args: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Free the port without launching a server
    Free,

    /// Show the processes listening on the port
    #[command(alias = "ls")]
    Status {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Render the blog RSS feed from a JSON list of entries
    Feed {
        /// JSON file with `[{"id": ..., "data": {...}}]` entries; dates may be
        /// `2022-07-08`, RFC 3339, RFC 2822 or `Jul 08 2022`
        #[arg(short, long)]
        entries: PathBuf,

        /// Site origin
        #[arg(long)]
        site: Option<String>,

        /// Base path the site is served under
        #[arg(long)]
        base: Option<String>,

        /// Channel title
        #[arg(long)]
        title: Option<String>,

        /// Channel description
        #[arg(long)]
        description: Option<String>,

        /// Write the feed here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    /// Environment config with command-line overrides applied.
    fn config(&self) -> devsolo_core::Result<DevConfig> {
        self.apply(DevConfig::from_env())
    }

    fn apply(&self, base: devsolo_core::Result<DevConfig>) -> devsolo_core::Result<DevConfig> {
        let policy = if self.fail_closed {
            ProbePolicy::FailClosed
        } else {
            ProbePolicy::FailOpen
        };

        let server = match &self.server_cmd {
            Some(program) => ServerCommand::new(program.clone(), self.server_args.clone()),
            None => ServerCommand::default(),
        };

        base.map(|config| {
            config
                .with_probe_policy(policy)
                .with_max_attempts(self.attempts)
                .with_server(server)
        })
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let code = match &cli.command {
        None => commands::serve::run(cli.config()).await,
        Some(Commands::Free) => commands::free::run(cli.config()).await,
        Some(Commands::Status { json }) => commands::status::run(cli.config(), *json).await?,
        Some(Commands::Feed {
            entries,
            site,
            base,
            title,
            description,
            output,
        }) => {
            let overrides = commands::feed::SiteOverrides {
                site: site.clone(),
                base: base.clone(),
                title: title.clone(),
                description: description.clone(),
            };
            commands::feed::run(entries, overrides, output.as_deref()).await?
        }
    };

    std::process::exit(code)
}
