//! Test utilities for integration tests
#![allow(dead_code)]

use std::fs;

use buttondown::buttondown::{ApiKey, ButtondownClient};

pub const TEST_API_KEY: &str = "test-key";

/// Creates a client pointed at a mock server.
pub fn test_client(server: &mockito::ServerGuard) -> ButtondownClient {
    ButtondownClient::with_base_url(ApiKey::new(TEST_API_KEY), &server.url())
}

/// Reads a canned API response from `tests/data`.
pub fn fixture(name: &str) -> String {
    fs::read_to_string(format!("./tests/data/{}", name))
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", name, e))
}
