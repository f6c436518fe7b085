use std::sync::Arc;

use clap::Parser;

use crate::config::HarnessConfig;
use crate::console::Console;
use crate::runner::RoleTestRunner;

#[derive(Parser, Debug)]
#[command(name = "smoke")]
#[command(about = "Multi-role smoke test for the school management API")]
#[command(version)]
pub struct Cli {
    #[arg(long, help = "Backend base URL (overrides SMOKE_BASE_URL)")]
    pub base_url: Option<String>,

    #[arg(long, help = "Per-request timeout in milliseconds (overrides SMOKE_TIMEOUT_MS)")]
    pub timeout_ms: Option<u64>,
}

impl Cli {
    /// Command-line flags win over the environment
    pub fn apply(&self, mut config: HarnessConfig) -> HarnessConfig {
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        config
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.apply(HarnessConfig::from_env());
    tracing::debug!(
        "Running sweep against {} ({} roles, {} endpoints)",
        config.base_url,
        config.credentials.len(),
        config.endpoints.len()
    );

    let runner = RoleTestRunner::new(config, Arc::new(Console::stdout()))?;
    runner.run().await;

    Ok(())
}
