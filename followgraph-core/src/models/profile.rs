//! Account profile payloads.

use serde::{Deserialize, Serialize};

use super::identity::Identity;

/// Entry of a following/followers list page.
#[derive(Debug, Clone, Deserialize)]
pub struct ListedUser {
    /// Account handle.
    pub login: String,
}

impl ListedUser {
    /// Converts the list entry into an identity.
    pub fn into_identity(self) -> Identity {
        Identity::new(self.login)
    }
}

/// Profile returned by `GET /users/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Account handle.
    pub login: String,

    /// Numeric account id.
    #[serde(default)]
    pub id: u64,

    /// Display name.
    #[serde(default)]
    pub name: Option<String>,

    /// Profile bio.
    #[serde(default)]
    pub bio: Option<String>,

    /// Public repository count.
    #[serde(default)]
    pub public_repos: u32,

    /// Follower count as reported by the profile.
    #[serde(default)]
    pub followers: u32,

    /// Following count as reported by the profile.
    #[serde(default)]
    pub following: u32,

    /// Profile page URL.
    #[serde(default)]
    pub html_url: Option<String>,
}

impl UserProfile {
    /// Returns the display name, falling back to the login.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.login)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_profile() {
        let json = r#"{
            "login": "octocat",
            "id": 583231,
            "name": "The Octocat",
            "bio": null,
            "public_repos": 8,
            "followers": 9000,
            "following": 9,
            "html_url": "https://github.com/octocat",
            "site_admin": false
        }"#;

        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.login, "octocat");
        assert_eq!(profile.public_repos, 8);
        assert_eq!(profile.bio, None);
        assert_eq!(profile.display_name(), "The Octocat");
    }

    #[test]
    fn test_display_name_falls_back_to_login() {
        let profile: UserProfile = serde_json::from_str(r#"{"login": "ghost", "name": ""}"#).unwrap();
        assert_eq!(profile.display_name(), "ghost");
    }

    #[test]
    fn test_listed_user_keeps_login_verbatim() {
        let user: ListedUser = serde_json::from_str(r#"{"login": " Mona ", "id": 1}"#).unwrap();
        assert_eq!(user.into_identity().as_str(), " Mona ");
    }
}
