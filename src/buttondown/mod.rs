pub mod client;
pub mod credentials;
pub mod error;
pub mod models;

pub use client::{ButtondownClient, DEFAULT_BASE_URL};
pub use credentials::{ApiKey, CredentialResolver};
pub use error::{Error, Result};
pub use models::{
    Analytics, CreateEmailRequest, Email, EmailStatus, Interval, Page, Subscriber, Tag,
    TimeseriesAnalytics, UpdateEmailRequest,
};
