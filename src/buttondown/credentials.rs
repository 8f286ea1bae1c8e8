//! Resolve the Buttondown API key from an explicit value, the
//! environment, or the 1Password CLI, in that order.

use std::env;
use std::fmt;

use tokio::process::Command;

use super::error::{Error, Result};

pub const API_KEY_ENV_VAR: &str = "BUTTONDOWN_API_KEY";
pub const DEFAULT_SECRET_COMMAND: &str = "op";
pub const DEFAULT_SECRET_REFERENCE: &str = "op://Development/Buttondown API/notesPlain";

/// A Buttondown API token. `Debug` never prints the key.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Clone)]
pub struct CredentialResolver {
    env_var: String,
    secret_reference: String,
    program: String,
    args: Vec<String>,
}

impl CredentialResolver {
    /// Look up secrets with `<program> read <secret_reference>`.
    pub fn new(program: &str, secret_reference: &str) -> Self {
        Self {
            env_var: API_KEY_ENV_VAR.to_string(),
            secret_reference: secret_reference.to_string(),
            program: program.to_string(),
            args: vec![String::from("read"), secret_reference.to_string()],
        }
    }

    pub fn with_env_var(mut self, env_var: &str) -> Self {
        self.env_var = env_var.to_string();
        self
    }

    /// Replace the whole secrets invocation. The secret reference is
    /// still reported in `MissingCredential`.
    pub fn with_secret_command(mut self, program: &str, args: &[&str]) -> Self {
        self.program = program.to_string();
        self.args = args.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn secret_reference(&self) -> &str {
        &self.secret_reference
    }

    /// Try the explicit key, then the environment, then the secrets command.
    pub async fn resolve(&self, explicit: Option<&str>) -> Result<ApiKey> {
        if let Some(key) = explicit {
            return Ok(ApiKey::new(key));
        }

        if let Some(key) = self.read_env() {
            tracing::debug!("Using API key from {}", self.env_var);
            return Ok(ApiKey::new(key));
        }

        if let Some(key) = self.read_secrets_manager().await {
            tracing::debug!("Using API key from {}", self.secret_reference);
            return Ok(ApiKey::new(key));
        }

        Err(Error::MissingCredential {
            env_var: self.env_var.clone(),
            secret_reference: self.secret_reference.clone(),
        })
    }

    fn read_env(&self) -> Option<String> {
        env::var(&self.env_var).ok().filter(|v| !v.is_empty())
    }

    async fn read_secrets_manager(&self) -> Option<String> {
        let output = match Command::new(&self.program)
            .args(&self.args)
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!("Failed to run {}: {}", self.program, e);
                return None;
            }
        };

        if !output.status.success() {
            tracing::warn!(
                "Failed to read from {}: {} ({})",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return None;
        }

        let secret = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if secret.is_empty() { None } else { Some(secret) }
    }
}

impl Default for CredentialResolver {
    fn default() -> Self {
        Self::new(DEFAULT_SECRET_COMMAND, DEFAULT_SECRET_REFERENCE)
    }
}
