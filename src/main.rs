use std::time::Duration;

use clap::{Parser, Subcommand};
use grid_sched::grid::types::GridSchedulerConfig;
use grid_sched::scheduler::Scheduler;
use grid_sched::Error;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the scheduler
    Run(RunArgs),
    /// Show version information
    Version,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Scheduler name pods must request in spec.schedulerName
    #[arg(long, env = "SCHEDULER_NAME", default_value = "grid-scheduler")]
    scheduler_name: String,

    /// Grid telemetry endpoint returning a JSON array of location records
    #[arg(
        long,
        env = "TELEMETRY_URL",
        default_value = "https://p9-scheduler-plugins.vercel.app/data"
    )]
    telemetry_url: String,

    /// Post-bind notification endpoint
    #[arg(
        long,
        env = "NOTIFY_URL",
        default_value = "https://p9-scheduler-plugins.vercel.app/log"
    )]
    notify_url: String,

    /// Disable the post-bind notification
    #[arg(long, env = "DISABLE_NOTIFY")]
    disable_notify: bool,

    /// Favor nodes whose name suffix does not match the pod's
    #[arg(long, env = "REVERSE")]
    reverse: bool,

    /// Telemetry fetch timeout in seconds
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = 10)]
    fetch_timeout_secs: u64,

    /// Pause between scheduling cycles in seconds
    #[arg(long, env = "CYCLE_INTERVAL_SECS", default_value_t = 5)]
    cycle_interval_secs: u64,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();

    match args.command {
        Commands::Version => {
            println!("Grid-Sched v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Run(run_args) => run_scheduler(run_args).await,
    }
}

async fn run_scheduler(args: RunArgs) -> Result<(), Error> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer().with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    let client = kube::Client::try_default().await.map_err(Error::KubeError)?;

    let notify_url = if args.disable_notify {
        None
    } else {
        Some(args.notify_url)
    };

    let config = GridSchedulerConfig {
        telemetry_url: args.telemetry_url,
        notify_url,
        reverse: args.reverse,
        fetch_timeout: Duration::from_secs(args.fetch_timeout_secs),
        cycle_interval: Duration::from_secs(args.cycle_interval_secs),
    };

    info!(
        "Starting grid-aware scheduler {} (reverse: {})",
        args.scheduler_name, config.reverse
    );

    let scheduler = Scheduler::new(client, args.scheduler_name, config)?;
    if let Err(e) = scheduler.run().await {
        error!("Scheduler exited: {}", e);
    }

    Ok(())
}
