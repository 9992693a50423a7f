use std::collections::HashMap;

use crate::modules::users::application::domain::OAuthBackend;
use crate::shared::config::{self, ConfigError};

/// Fixed provider endpoints and the scopes needed for a verified email.
#[derive(Debug, Clone, Copy)]
pub struct ProviderEndpoints {
    pub authorize: &'static str,
    pub token: &'static str,
    pub profile: &'static str,
    /// GitHub only exposes private addresses on a second endpoint
    pub emails: Option<&'static str>,
    pub scopes: &'static [&'static str],
}

impl ProviderEndpoints {
    pub fn for_backend(backend: OAuthBackend) -> Self {
        match backend {
            OAuthBackend::Google => Self {
                authorize: "https://accounts.google.com/o/oauth2/v2/auth",
                token: "https://oauth2.googleapis.com/token",
                profile: "https://openidconnect.googleapis.com/v1/userinfo",
                emails: None,
                scopes: &["openid", "email", "profile"],
            },
            OAuthBackend::GitHub => Self {
                authorize: "https://github.com/login/oauth/authorize",
                token: "https://github.com/login/oauth/access_token",
                profile: "https://api.github.com/user",
                emails: Some("https://api.github.com/user/emails"),
                scopes: &["read:user", "user:email"],
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderCredentials {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// Public origin the provider redirects back to, without a trailing slash
    public_base_url: String,
    providers: HashMap<OAuthBackend, ProviderCredentials>,
}

/// Prefix of the `{PREFIX}_CLIENT_ID` / `{PREFIX}_CLIENT_SECRET` variables.
fn env_prefix(backend: OAuthBackend) -> &'static str {
    match backend {
        OAuthBackend::Google => "GOOGLE_OAUTH2",
        OAuthBackend::GitHub => "GITHUB",
    }
}

impl OAuthConfig {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            providers: HashMap::new(),
        }
    }

    pub fn with_provider(
        mut self,
        backend: OAuthBackend,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.providers.insert(
            backend,
            ProviderCredentials {
                client_id: client_id.into(),
                client_secret: client_secret.into(),
            },
        );
        self
    }

    pub fn credentials(&self, backend: OAuthBackend) -> Option<&ProviderCredentials> {
        self.providers.get(&backend)
    }

    pub fn redirect_uri(&self, backend: OAuthBackend) -> String {
        format!(
            "{}/api/users/oauth/{}/callback/",
            self.public_base_url, backend
        )
    }

    /// A provider is enabled when both of its variables are set. Setting only
    /// one of them is a configuration error.
    pub fn from_env(public_base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let mut oauth_config = Self::new(public_base_url);

        for backend in OAuthBackend::ALL {
            let id_key = format!("{}_CLIENT_ID", env_prefix(backend));
            let secret_key = format!("{}_CLIENT_SECRET", env_prefix(backend));

            match (config::optional(&id_key), config::optional(&secret_key)) {
                (Some(id), Some(secret)) => {
                    oauth_config = oauth_config.with_provider(backend, id, secret);
                }
                (None, None) => {
                    tracing::info!(backend = %backend, "OAuth backend disabled");
                }
                (Some(_), None) => return Err(ConfigError::Missing(secret_key)),
                (None, Some(_)) => return Err(ConfigError::Missing(id_key)),
            }
        }

        Ok(oauth_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_uri_points_at_callback_route() {
        let config = OAuthConfig::new("https://accounts.example.com/");
        assert_eq!(
            config.redirect_uri(OAuthBackend::Google),
            "https://accounts.example.com/api/users/oauth/google-oauth2/callback/"
        );
        assert_eq!(
            config.redirect_uri(OAuthBackend::GitHub),
            "https://accounts.example.com/api/users/oauth/github/callback/"
        );
    }

    #[test]
    fn providers_are_opt_in() {
        let config =
            OAuthConfig::new("http://localhost:8080").with_provider(OAuthBackend::GitHub, "id", "secret");

        assert!(config.credentials(OAuthBackend::Google).is_none());
        assert_eq!(
            config.credentials(OAuthBackend::GitHub).unwrap().client_id,
            "id"
        );
    }

    #[test]
    fn half_configured_provider_is_rejected() {
        std::env::set_var("GITHUB_CLIENT_ID", "only-the-id");
        std::env::remove_var("GITHUB_CLIENT_SECRET");
        let result = OAuthConfig::from_env("http://localhost:8080");
        std::env::remove_var("GITHUB_CLIENT_ID");

        match result {
            Err(ConfigError::Missing(key)) => assert_eq!(key, "GITHUB_CLIENT_SECRET"),
            other => panic!("expected Missing error, got {:?}", other.map(|_| ())),
        }
    }
}
