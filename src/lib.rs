//! Accounts Client
//!
//! Typed client for the organisation accounts API. Maps Create, Fetch and
//! Delete onto HTTP requests with JSON envelopes and classifies every outcome
//! as a typed account or a [`ClientError`].

pub mod cancel;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;

pub use cancel::{CallContext, CancelHandle};
pub use client::{AccountClient, HttpAccountClient, ACCOUNTS_PATH};
pub use config::{ClientConfig, ConfigLoader};
pub use error::ClientError;
pub use model::{
    AccountAttributes, AccountClassification, AccountData, AccountEnvelope, AccountStatus,
    AccountType,
};
