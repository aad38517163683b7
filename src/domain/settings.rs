//! User-facing settings persisted next to the journal records.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Dashboard colour theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ValidationError::Unparseable {
                field: "theme",
                value: other.to_string(),
            }),
        }
    }
}

/// The signed-in trader, as stored under `currentUser`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// ISO timestamp of account creation, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl UserProfile {
    /// Name to show, falling back to `Trader`.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "Trader"
        } else {
            &self.name
        }
    }

    pub fn display_email(&self) -> &str {
        if self.email.trim().is_empty() {
            "trader@example.com"
        } else {
            &self.email
        }
    }
}

/// Settings bundle kept by the journal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub theme: Theme,
    pub trading_rules: Option<String>,
    pub user: UserProfile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_round_trip() {
        assert_eq!("Dark".parse::<Theme>(), Ok(Theme::Dark));
        assert_eq!(Theme::Light.to_string(), "light");
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        assert!("blue".parse::<Theme>().is_err());
    }

    #[test]
    fn test_user_profile_tolerates_missing_fields() {
        let user: UserProfile = serde_json::from_str(r#"{"name":"Tae"}"#).unwrap();
        assert_eq!(user.display_name(), "Tae");
        assert_eq!(user.display_email(), "trader@example.com");
        assert_eq!(UserProfile::default().display_name(), "Trader");
    }
}
