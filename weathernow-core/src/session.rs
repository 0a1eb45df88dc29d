//! Signed-in user context.

use serde::{Deserialize, Serialize};

/// Profile details captured at sign-up. Empty strings mean "not provided".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub email: String,
}

/// The signed-in user.
///
/// Established once per invocation and passed by reference to whatever needs
/// the user id. The identity provider that mints ids lives outside this
/// crate; here a session is just data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque id favorites are stored under.
    pub user_id: String,
    pub profile: Option<UserProfile>,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            profile: None,
        }
    }

    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Home city to fall back on for searches, when the profile has one.
    pub fn default_city(&self) -> Option<&str> {
        self.profile
            .as_ref()
            .map(|p| p.city.as_str())
            .filter(|city| !city.is_empty())
    }
}
