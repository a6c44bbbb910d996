use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile_number: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_admin: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Both full name and mobile number set to something other than whitespace.
    pub fn is_profile_complete(&self) -> bool {
        is_filled(self.full_name.as_deref()) && is_filled(self.mobile_number.as_deref())
    }

    /// Best label for display: full name, then email, then mobile number.
    pub fn display_name(&self) -> String {
        self.full_name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or(self.email.as_deref())
            .or(self.mobile_number.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| format!("user #{}", self.id))
    }
}

fn is_filled(value: Option<&str>) -> bool {
    value.map(|v| !v.trim().is_empty()).unwrap_or(false)
}

/// Body of `PUT /users/me`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
}

#[cfg(test)]
pub(crate) fn sample_user(full_name: Option<&str>, mobile_number: Option<&str>) -> User {
    let now = Utc::now();
    User {
        id: 7,
        email: Some("a@b.com".to_string()),
        mobile_number: mobile_number.map(str::to_string),
        full_name: full_name.map(str::to_string),
        is_active: true,
        is_admin: false,
        created_at: now,
        updated_at: now,
    }
}
