//! Account Data Model
//!
//! Wire shapes for the organisation accounts resource. Optional scalars are
//! left out of the body entirely when unset; `attributes` is the exception and
//! is always written, as `null` when absent.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Resource discriminator. Only one value exists on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    #[default]
    #[serde(rename = "accounts")]
    Accounts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountClassification {
    Business,
    Personal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Closed,
    Confirmed,
    Pending,
}

/// An account resource as sent to and returned by the remote system.
///
/// Decoding accepts JSON objects only; the field-level defaults would
/// otherwise let a short array pass as an empty account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct AccountData {
    #[serde(default, skip_serializing_if = "Uuid::is_nil")]
    pub id: Uuid,

    #[serde(default, skip_serializing_if = "Uuid::is_nil")]
    pub organisation_id: Uuid,

    #[serde(rename = "type", default)]
    pub account_type: AccountType,

    #[serde(default)]
    pub attributes: Option<AccountAttributes>,

    /// Optimistic-concurrency token, known once the remote system has the account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

impl Serialize for AccountData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        AccountData::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for AccountData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        AccountData::deserialize(serde_json::Value::Object(fields))
            .map_err(serde::de::Error::custom)
    }
}

impl AccountData {
    pub fn new(id: Uuid, organisation_id: Uuid, attributes: Option<AccountAttributes>) -> Self {
        Self {
            id,
            organisation_id,
            account_type: AccountType::Accounts,
            attributes,
            version: None,
        }
    }

    pub fn with_version(mut self, version: i64) -> Self {
        self.version = Some(version);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_classification: Option<AccountClassification>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_matching_opt_out: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_names: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_id_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_currency: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bic: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joint_account: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_identification: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AccountStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub switched: Option<bool>,
}

/// `{"data": ...}` wrapper used for account request and response bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountEnvelope<T = AccountData> {
    pub data: T,
}

/// Parse an account from a JSON document holding either a bare account or an envelope.
pub fn parse_account_document(raw: &str) -> Result<AccountData, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let value = match value {
        serde_json::Value::Object(mut map) => match map.remove("data") {
            Some(data) => data,
            None => serde_json::Value::Object(map),
        },
        other => other,
    };
    serde_json::from_value(value)
}
