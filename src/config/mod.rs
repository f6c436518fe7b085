use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::types::{CredentialSet, EndpointDescriptor};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TITLE: &str = "BASUDEBPUR MANAGEMENT SYSTEM - MULTI-ROLE DATA TEST";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Everything a sweep needs, resolved once before the run starts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    pub title: String,
    pub base_url: String,
    pub timeout_ms: u64,
    pub health_path: String,
    pub login_path: String,
    pub credentials: Vec<CredentialSet>,
    pub endpoints: Vec<EndpointDescriptor>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            health_path: "/health".to_string(),
            login_path: "/api/auth/login".to_string(),
            credentials: default_credentials(),
            endpoints: default_endpoints(),
        }
    }
}

impl HarnessConfig {
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    fn with_env_overrides(self) -> Self {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Apply `SMOKE_*` overrides from any key lookup. Unparsable values keep the current setting.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SMOKE_BASE_URL") {
            if !v.trim().is_empty() {
                self.base_url = v.trim().to_string();
            }
        }
        if let Some(v) = lookup("SMOKE_TIMEOUT_MS") {
            self.timeout_ms = v.trim().parse().unwrap_or(self.timeout_ms);
        }
        if let Some(v) = lookup("SMOKE_TITLE") {
            if !v.trim().is_empty() {
                self.title = v;
            }
        }

        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_credentials(mut self, credentials: Vec<CredentialSet>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_endpoints(mut self, endpoints: Vec<EndpointDescriptor>) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_credentials() -> Vec<CredentialSet> {
    vec![
        CredentialSet::new("Headmaster / Admin", "headmaster@basudevpur.edu.bd", "headmaster123"),
        CredentialSet::new("Teacher", "teacher@basudevpur.edu.bd", "password123"),
        CredentialSet::new("Student", "student@basudevpur.edu.bd", "password123"),
    ]
}

fn default_endpoints() -> Vec<EndpointDescriptor> {
    [
        ("Students List", "/api/students"),
        ("Teachers List", "/api/teachers"),
        ("Classes List", "/api/classes"),
        ("Attendance Info", "/api/attendance"),
        ("Exams Info", "/api/exams"),
        ("Notices", "/api/notices"),
        ("Grievances", "/api/grievances"),
        ("Resources/Materials", "/api/resources"),
        ("Feedback", "/api/feedback"),
        ("Library Books", "/api/library"),
        ("Assignments", "/api/assignments"),
        ("Routines", "/api/routines"),
    ]
    .into_iter()
    .map(|(name, path)| EndpointDescriptor::new(name, path))
    .collect()
}
