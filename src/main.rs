use pingback::config::Config;
use pingback::{server, telemetry};
use tracing::instrument::WithSubscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::load()?;
    let dispatch = telemetry::dispatch(&cfg.logging);

    async {
        tokio::select! {
            res = server::run(&cfg.server, dispatch.clone()) => {
                if let Err(e) = &res {
                    tracing::error!(error = ?e, "server stopped");
                }
                res
            }

            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received");
                Ok(())
            }
        }
    }
    .with_subscriber(dispatch.clone())
    .await
}
