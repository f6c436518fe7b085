pub mod token;

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use serde_json::json;

use crate::config::HarnessConfig;
use crate::console::Console;
use crate::error::LoginFailure;
use crate::executor::{EndpointRequest, RequestExecutor};
use crate::types::{CredentialSet, SessionToken};
use token::{authenticate, TokenSource};

/// Drives the whole sweep: health check, then login and endpoint checks per role
pub struct RoleTestRunner {
    config: HarnessConfig,
    executor: RequestExecutor,
    console: Arc<Console>,
    token_sources: Vec<TokenSource>,
}

impl RoleTestRunner {
    pub fn new(config: HarnessConfig, console: Arc<Console>) -> anyhow::Result<Self> {
        let executor = RequestExecutor::new(&config, console.clone())?;
        Ok(Self {
            config,
            executor,
            console,
            token_sources: TokenSource::DEFAULT_ORDER.to_vec(),
        })
    }

    pub fn with_token_sources(mut self, sources: Vec<TokenSource>) -> Self {
        self.token_sources = sources;
        self
    }

    pub async fn run(&self) {
        self.console.rule();
        self.console.line(format!("[*] {}", self.config.title));
        self.console.line(format!("[*] Target: {}", self.executor.base_url()));
        self.console.rule();
        self.console.blank();

        // Informational only; a dead backend still gets every login attempted
        self.executor
            .execute(EndpointRequest::get("System Health Check", &self.config.health_path))
            .await;
        self.console.blank();
        self.console.rule();

        for credentials in &self.config.credentials {
            // Token is dropped at the end of each iteration
            if let Ok(token) = self.login(credentials).await {
                self.console.blank();
                self.console
                    .line(format!("  Checking frontend data tables for {}:", credentials.role));
                self.sweep(&token).await;
                self.console.rule();
            }
        }

        self.console.blank();
        self.console.line("   FRONTEND DATA TEST COMPLETED");
        self.console.rule();
    }

    /// Log in one credential set. The failure has already been reported when `Err` comes back.
    pub async fn login(&self, credentials: &CredentialSet) -> Result<SessionToken, LoginFailure> {
        self.console.blank();
        self.console.line(format!("--- Testing Role: {} ---", credentials.role));
        self.console
            .line(format!("  Attempting Login for {}...", credentials.email));

        let payload = json!({
            "email": credentials.email,
            "password": credentials.password,
        });
        let outcome = self
            .executor
            .execute(EndpointRequest::post_json("Login", &self.config.login_path, payload))
            .await;

        match authenticate(outcome.as_ref(), &self.token_sources) {
            Ok(token) => {
                tracing::debug!("Login accepted for role '{}'", credentials.role);
                self.console
                    .line("  Login Successful! Proceeding to test frontend data endpoints...");
                Ok(token)
            }
            Err(failure) => {
                tracing::debug!("Skipping role '{}': {}", credentials.role, failure);
                self.console.line(format!(
                    "  {}. Cannot test protected routes for this role.",
                    failure
                ));
                self.console.blank();
                Err(failure)
            }
        }
    }

    /// Check every configured endpoint with the given token, in table order
    pub async fn sweep(&self, token: &SessionToken) {
        for endpoint in &self.config.endpoints {
            let request = EndpointRequest::get(&endpoint.name, &endpoint.path)
                .with_header(AUTHORIZATION.as_str(), token.bearer());
            self.executor.execute(request).await;
        }
    }
}
