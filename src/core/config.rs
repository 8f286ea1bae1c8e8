use std::env;

use crate::buttondown::CredentialResolver;
use crate::buttondown::DEFAULT_BASE_URL;
use crate::buttondown::credentials::{DEFAULT_SECRET_COMMAND, DEFAULT_SECRET_REFERENCE};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub secret_command: String,
    pub secret_reference: String,
}

impl AppConfig {
    pub fn credential_resolver(&self) -> CredentialResolver {
        CredentialResolver::new(&self.secret_command, &self.secret_reference)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let api_base_url =
            env::var("BUTTONDOWN_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let secret_command = env::var("BUTTONDOWN_SECRET_COMMAND")
            .unwrap_or_else(|_| DEFAULT_SECRET_COMMAND.to_string());
        let secret_reference = env::var("BUTTONDOWN_SECRET_REFERENCE")
            .unwrap_or_else(|_| DEFAULT_SECRET_REFERENCE.to_string());

        Self {
            api_base_url,
            secret_command,
            secret_reference,
        }
    }
}
