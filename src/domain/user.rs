//! User, session and preference records.

use serde::{Deserialize, Serialize};

/// A registered account as stored under the `"users"` key.
///
/// `password_hash` is an Argon2 PHC string; plaintext passwords never
/// reach storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl UserRecord {
    /// Case-insensitive email comparison used for lookups and uniqueness.
    pub fn has_email(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.to_lowercase()
    }

    /// The password-free view persisted as `"currentUser"`.
    pub fn to_safe(&self) -> SafeUser {
        SafeUser {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Logged-in user snapshot. A copy taken at login, not a live view of
/// the credential store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Selectable colour themes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ThemeName {
    Light,
    Dark,
    #[default]
    System,
    NeonNight,
    OceanBreeze,
}

impl ThemeName {
    pub const ALL: [Self; 5] = [
        Self::Light,
        Self::Dark,
        Self::System,
        Self::NeonNight,
        Self::OceanBreeze,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
            Self::NeonNight => "neonNight",
            Self::OceanBreeze => "oceanBreeze",
        }
    }
}

impl std::fmt::Display for ThemeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ThemeName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|theme| theme.as_str() == s)
            .ok_or_else(|| format!("unknown theme: {s}"))
    }
}
