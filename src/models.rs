// ABOUTME: Core data models for the remote HR user record and its cached database row
// ABOUTME: Handles the wire format of the HR API including numeric or string identifiers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// User record as returned by the HR API
///
/// Wire shape: `{"id": "...", "firstName": "...", "lastName": "..."}`.
/// Extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteUser {
    /// Identifier of the user in the HR system
    #[serde(rename = "id", deserialize_with = "deserialize_external_id")]
    pub external_id: String,
    /// Given name
    #[serde(rename = "firstName")]
    pub first_name: String,
    /// Family name
    #[serde(rename = "lastName")]
    pub last_name: String,
}

/// Cached copy of a remote user, one row per external ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct UserRecord {
    /// Local surrogate key
    pub id: i64,
    /// Identifier of the user in the HR system (unique)
    pub external_id: String,
    /// Given name at last fetch
    pub first_name: String,
    /// Family name at last fetch
    pub last_name: String,
    /// When the row was first inserted
    pub created_at: DateTime<Utc>,
    /// When the record was last fetched from the HR API
    pub fetched_at: DateTime<Utc>,
}

/// Accept the external ID as either a JSON string or a JSON number
fn deserialize_external_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) if !s.trim().is_empty() => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected non-empty string or number for id, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_user_accepts_string_id_and_ignores_extra_fields() {
        let user: RemoteUser = serde_json::from_str(
            r#"{"id":"emp-42","firstName":"Ada","lastName":"Lovelace","email":"ada@example.com"}"#,
        )
        .unwrap();
        assert_eq!(user.external_id, "emp-42");
        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.last_name, "Lovelace");
    }

    #[test]
    fn test_remote_user_accepts_numeric_id() {
        let user: RemoteUser =
            serde_json::from_str(r#"{"id":1017,"firstName":"Grace","lastName":"Hopper"}"#).unwrap();
        assert_eq!(user.external_id, "1017");
    }

    #[test]
    fn test_remote_user_rejects_missing_or_blank_id() {
        assert!(serde_json::from_str::<RemoteUser>(r#"{"firstName":"A","lastName":"B"}"#).is_err());
        assert!(
            serde_json::from_str::<RemoteUser>(r#"{"id":" ","firstName":"A","lastName":"B"}"#)
                .is_err()
        );
        assert!(
            serde_json::from_str::<RemoteUser>(r#"{"id":null,"firstName":"A","lastName":"B"}"#)
                .is_err()
        );
    }
}
