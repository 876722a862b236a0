use inventory_core::{run_demo_flow, ClientConfig, FlowOutcome, RecordService, UreqTransport};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "unusable configuration");
            return;
        }
    };
    info!(
        base_url = %config.base_url,
        database = %config.database,
        collection = %config.collection,
        "starting inventory demo flow"
    );

    let service = match RecordService::new(config, UreqTransport::new()) {
        Ok(service) => service,
        Err(err) => {
            error!(error = %err, "unusable configuration");
            return;
        }
    };
    if let FlowOutcome::Aborted { step, .. } = run_demo_flow(&service) {
        warn!(%step, "demo flow did not finish");
    }
}
