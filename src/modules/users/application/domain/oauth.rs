use std::fmt;

/// Identity providers accepted for social login, named as they appear in the
/// `/api/users/oauth/{backend_name}/` routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OAuthBackend {
    Google,
    GitHub,
}

impl OAuthBackend {
    pub const ALL: [OAuthBackend; 2] = [OAuthBackend::Google, OAuthBackend::GitHub];

    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthBackend::Google => "google-oauth2",
            OAuthBackend::GitHub => "github",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.as_str() == name)
    }
}

impl fmt::Display for OAuthBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a provider tells us about the person who just signed in.
#[derive(Debug, Clone, PartialEq)]
pub struct OAuthProfile {
    /// Stable provider-side id
    pub uid: String,
    /// Verified address, lowercased
    pub email: String,
    /// Provider login name, when it has one
    pub username_hint: Option<String>,
    pub first_name: String,
    pub last_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_names_match_route_segments() {
        assert_eq!(OAuthBackend::from_name("google-oauth2"), Some(OAuthBackend::Google));
        assert_eq!(OAuthBackend::from_name("github"), Some(OAuthBackend::GitHub));
        assert_eq!(OAuthBackend::from_name("google"), None);
        assert_eq!(OAuthBackend::from_name("GitHub"), None);
    }
}
