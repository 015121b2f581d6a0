//! Provisioning plan schema and validation.
//!
//! Defaults reproduce the course platform setup. A YAML file may override
//! any section; omitted keys keep their defaults and unknown keys are ignored.
//! Pure functions only: no I/O, no async, no filesystem access.

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Config schema ────────────────────────────────────────────────────────────

/// The full, ordered provisioning plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionConfig {
    /// OS package manager settings.
    pub system: SystemConfig,
    /// Source repository to clone.
    pub repository: RepositoryConfig,
    /// Isolated runtime environment.
    pub runtime: RuntimeConfig,
    /// Optional scripts run with elevated privileges, relative to the root.
    pub setup_scripts: Vec<String>,
    /// Application discovery and launch.
    pub app: AppConfig,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            system: SystemConfig::default(),
            repository: RepositoryConfig::default(),
            runtime: RuntimeConfig::default(),
            setup_scripts: vec![
                "course_platform/update_settings.sh".to_string(),
                "course_platform/nginx_setup.sh".to_string(),
            ],
            app: AppConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Privilege-escalation program; empty runs commands directly.
    pub privilege: String,
    pub package_manager: String,
    /// Installed in one call, in this order.
    pub packages: Vec<String>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            privilege: "sudo".to_string(),
            package_manager: "apt".to_string(),
            packages: [
                "nginx",
                "pkg-config",
                "libmysqlclient-dev",
                "default-libmysqlclient-dev",
                "build-essential",
                "python3.12-venv",
                "python3-pip",
                "git",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Version-control client.
    pub vcs: String,
    pub url: String,
    /// Clone target; its existence skips the clone.
    pub dir: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            vcs: "git".to_string(),
            url: "https://github.com/shvpn/course_platform.git".to_string(),
            dir: "course_platform".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Interpreter used to create the environment (`<interpreter> -m venv <env_dir>`).
    pub interpreter: String,
    pub env_dir: String,
    /// Installed one at a time, in this order.
    pub libraries: Vec<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_string(),
            env_dir: "venv".to_string(),
            libraries: ["Django", "mysqlclient", "pillow"]
                .map(String::from)
                .to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Checked in order; the first existing directory wins.
    pub candidates: Vec<String>,
    /// File marking a runnable application root.
    pub entry_point: String,
    pub bind: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            candidates: vec!["Test-cloud".to_string(), "course_platform".to_string()],
            entry_point: "manage.py".to_string(),
            bind: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl AppConfig {
    /// Listen address passed to the server, e.g. `0.0.0.0:8000`.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    /// URL announced to the operator once the server starts.
    #[must_use]
    pub fn local_url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a plan before any command runs.
///
/// # Errors
///
/// Returns a `ConfigError` naming the first offending field.
pub fn validate_config(config: &ProvisionConfig) -> Result<(), ConfigError> {
    let required = [
        ("system.package_manager", &config.system.package_manager),
        ("repository.vcs", &config.repository.vcs),
        ("repository.url", &config.repository.url),
        ("repository.dir", &config.repository.dir),
        ("runtime.interpreter", &config.runtime.interpreter),
        ("runtime.env_dir", &config.runtime.env_dir),
        ("app.entry_point", &config.app.entry_point),
        ("app.bind", &config.app.bind),
    ];
    if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
        return Err(ConfigError::EmptyField { field: *field });
    }
    if config.app.candidates.iter().all(|c| c.trim().is_empty()) {
        return Err(ConfigError::NoCandidates);
    }
    if config.app.port == 0 {
        return Err(ConfigError::InvalidPort);
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
