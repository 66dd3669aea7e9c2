use std::process::ExitCode;

use clap::Parser;
use serde_json::json;
use time::OffsetDateTime;
use tokio::signal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use belancer_admin::{
    ApiClient, AuthContext, Collection, Error, MountGuard, StatsConfig, StatsView, Transaction,
    config::{DEFAULT_API_BASE, DEFAULT_PAGE_SIZE},
    pagination::fetch_all,
    review::{ReviewRecord, tally},
    timezone::DEFAULT_TIMEZONE,
};

/// Print Belancer dashboard statistics as JSON.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Base URL of the admin API.
    #[arg(long, env = "BELANCER_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Admin bearer token (JWT).
    #[arg(long, env = "BELANCER_TOKEN", hide_env_values = true)]
    token: String,

    /// Items to request per page.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u64,

    /// Canonical timezone that days, months and years are counted in.
    #[arg(long, default_value = DEFAULT_TIMEZONE)]
    timezone: String,

    /// Also tally withdrawal requests by review status.
    #[arg(long)]
    withdrawals: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    let args = Args::parse();
    let config = StatsConfig {
        api_base: args.api_base,
        page_size: args.page_size,
        timezone: args.timezone,
    };

    match run(&config, &args.token, args.withdrawals).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::error!("{error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &StatsConfig, token: &str, withdrawals: bool) -> Result<String, Error> {
    let timezone = config.timezone()?;

    let auth = AuthContext::new();
    auth.login(token)?;
    if !auth.is_admin() {
        tracing::warn!("The token does not grant the admin role, requests may be refused.");
    }

    let client = ApiClient::new(&config.api_base, auth)?;
    let guard = MountGuard::new();
    tokio::spawn(unmount_on_shutdown(guard.clone()));

    let mut view = StatsView::new(timezone, guard);
    let transactions = client.collection::<Transaction>(Collection::Transactions);
    view.refresh(&transactions, config.page_size, OffsetDateTime::now_utc())
        .await;

    if view.loading() {
        return Err(Error::Cancelled);
    }
    if let Some(error) = view.error() {
        return Err(error.clone());
    }

    let mut output = json!({ "transactions": view.stats() });

    if withdrawals {
        let source = client.collection::<ReviewRecord>(Collection::Withdrawals);
        let records = fetch_all(&source, config.page_size).await?;
        output["withdrawals"] = serde_json::to_value(tally(&records))?;
    }

    Ok(serde_json::to_string_pretty(&output)?)
}

/// Waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then marks the stats view as unmounted so in-flight results are dropped.
async fn unmount_on_shutdown(guard: MountGuard) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
        },
    }

    guard.unmount();
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_writer(std::io::stderr),
        )
        .init();
}
