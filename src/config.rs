//! Configuration loaded from `bootseq.toml`.
//!
//! Values absent from the file fall back to defaults. The environment
//! variables `BOOTSEQ_PASSWORD` and `BOOTSEQ_TOKEN` take precedence over
//! the file, and CLI flags take precedence over both.

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

use crate::cli::Cli;
use crate::error::Error;
use crate::redfish::Credentials;

/// Top-level configuration from `bootseq.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct BootseqConfig {
    /// Controller host name or IP address.
    #[serde(default)]
    pub host: String,

    /// Controller user name.
    #[serde(default = "default_username")]
    pub username: String,

    /// Controller password.
    #[serde(default)]
    pub password: String,

    /// Session token; replaces basic auth when non-empty.
    #[serde(default)]
    pub token: String,

    /// Skip TLS certificate verification. Off unless the operator opts in.
    #[serde(default)]
    pub insecure: bool,

    /// Probes per reachability check.
    #[serde(default = "default_probe_count")]
    pub probe_count: u32,
}

fn default_username() -> String {
    "root".to_string()
}

fn default_probe_count() -> u32 {
    5
}

impl Default for BootseqConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            username: default_username(),
            password: String::new(),
            token: String::new(),
            insecure: false,
            probe_count: default_probe_count(),
        }
    }
}

/// Fully resolved connection parameters for one run.
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    pub host: String,
    pub credentials: Credentials,
    pub insecure: bool,
    pub probe_count: u32,
}

impl BootseqConfig {
    /// Load `bootseq.toml` from the current directory, falling back to
    /// defaults if the file does not exist, then apply the environment.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(Path::new("bootseq.toml"))?;
        config.apply_env_overrides(
            std::env::var("BOOTSEQ_PASSWORD").ok(),
            std::env::var("BOOTSEQ_TOKEN").ok(),
        );
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(toml::from_str::<BootseqConfig>(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    fn apply_env_overrides(&mut self, password: Option<String>, token: Option<String>) {
        if let Some(password) = password
            && !password.is_empty()
        {
            self.password = password;
        }
        if let Some(token) = token
            && !token.is_empty()
        {
            self.token = token;
        }
    }

    /// Merge the CLI flags over this configuration and produce the
    /// connection settings. A missing host is a configuration error.
    pub fn resolve(mut self, cli: &Cli) -> Result<ConnectionSettings, Error> {
        if let Some(host) = &cli.host {
            self.host = host.clone();
        }
        if let Some(username) = &cli.username {
            self.username = username.clone();
        }
        if let Some(password) = &cli.password {
            self.password = password.clone();
        }
        if let Some(token) = &cli.token {
            self.token = token.clone();
        }
        if cli.insecure {
            self.insecure = true;
        }
        if self.host.is_empty() {
            return Err(Error::Config(
                "no controller host configured; pass --host or set host in bootseq.toml".into(),
            ));
        }
        let token = (!self.token.is_empty()).then(|| self.token.clone());
        Ok(ConnectionSettings {
            host: self.host,
            credentials: Credentials {
                username: self.username,
                password: self.password,
                token,
            },
            insecure: self.insecure,
            probe_count: self.probe_count,
        })
    }
}
