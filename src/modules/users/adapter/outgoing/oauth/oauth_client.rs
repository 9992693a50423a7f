use async_trait::async_trait;
use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    RedirectUrl, RequestTokenError, Scope, TokenResponse, TokenUrl,
};
use reqwest::header::ACCEPT;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

use super::oauth_config::{OAuthConfig, ProviderCredentials, ProviderEndpoints};
use crate::modules::users::application::domain::{OAuthBackend, OAuthProfile};
use crate::modules::users::application::ports::outgoing::{
    AuthorizationRequest, OAuthProvider, OAuthProviderError,
};
use crate::shared::config::ConfigError;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

type ConfiguredClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Authorization-code flow against Google and GitHub using the `oauth2` crate.
pub struct OAuth2Provider {
    clients: HashMap<OAuthBackend, ConfiguredClient>,
    http: reqwest::Client,
}

impl OAuth2Provider {
    pub fn new(config: &OAuthConfig) -> Result<Self, ConfigError> {
        // Token and profile requests never follow redirects
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| ConfigError::Invalid {
                key: "OAUTH_HTTP_CLIENT".to_string(),
                reason: e.to_string(),
            })?;

        let mut clients = HashMap::new();
        for backend in OAuthBackend::ALL {
            if let Some(credentials) = config.credentials(backend) {
                let client = build_client(backend, credentials, &config.redirect_uri(backend))?;
                clients.insert(backend, client);
            }
        }

        Ok(Self { clients, http })
    }

    fn client(&self, backend: OAuthBackend) -> Result<&ConfiguredClient, OAuthProviderError> {
        self.clients
            .get(&backend)
            .ok_or(OAuthProviderError::NotConfigured(backend))
    }

    async fn get_json(&self, url: &str, access_token: &str) -> Result<Value, OAuthProviderError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| OAuthProviderError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OAuthProviderError::RequestFailed(format!(
                "{} answered {}",
                url, status
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| OAuthProviderError::RequestFailed(e.to_string()))?;
        serde_json::from_slice(&body)
            .map_err(|e| OAuthProviderError::RequestFailed(format!("Invalid JSON from {}: {}", url, e)))
    }
}

fn build_client(
    backend: OAuthBackend,
    credentials: &ProviderCredentials,
    redirect_uri: &str,
) -> Result<ConfiguredClient, ConfigError> {
    let endpoints = ProviderEndpoints::for_backend(backend);
    let invalid = |what: &str, reason: String| ConfigError::Invalid {
        key: format!("{} {}", backend, what),
        reason,
    };

    Ok(BasicClient::new(ClientId::new(credentials.client_id.clone()))
        .set_client_secret(ClientSecret::new(credentials.client_secret.clone()))
        .set_auth_uri(
            AuthUrl::new(endpoints.authorize.to_string())
                .map_err(|e| invalid("authorize url", e.to_string()))?,
        )
        .set_token_uri(
            TokenUrl::new(endpoints.token.to_string())
                .map_err(|e| invalid("token url", e.to_string()))?,
        )
        .set_redirect_uri(
            RedirectUrl::new(redirect_uri.to_string())
                .map_err(|e| invalid("redirect url", e.to_string()))?,
        ))
}

fn text(value: &Value, field: &str) -> Option<String> {
    value
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Google's OpenID `userinfo`; only verified addresses are accepted.
fn google_profile(user: &Value) -> Result<OAuthProfile, OAuthProviderError> {
    let uid = text(user, "sub").ok_or_else(|| {
        OAuthProviderError::RequestFailed("Google profile has no subject".to_string())
    })?;

    let verified = user
        .get("email_verified")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let email = text(user, "email")
        .filter(|_| verified)
        .ok_or(OAuthProviderError::MissingEmail)?;

    Ok(OAuthProfile {
        uid,
        email: email.to_lowercase(),
        username_hint: None,
        first_name: text(user, "given_name").unwrap_or_default(),
        last_name: text(user, "family_name").unwrap_or_default(),
    })
}

/// GitHub's `/user` plus `/user/emails`. The primary verified address wins.
fn github_profile(user: &Value, emails: &Value) -> Result<OAuthProfile, OAuthProviderError> {
    let uid = match user.get("id") {
        Some(Value::Number(id)) => id.to_string(),
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        _ => {
            return Err(OAuthProviderError::RequestFailed(
                "GitHub profile has no id".to_string(),
            ))
        }
    };

    let verified: Vec<&Value> = emails
        .as_array()
        .map(|list| {
            list.iter()
                .filter(|e| e.get("verified").and_then(Value::as_bool) == Some(true))
                .collect()
        })
        .unwrap_or_default();
    let email = verified
        .iter()
        .find(|e| e.get("primary").and_then(Value::as_bool) == Some(true))
        .or_else(|| verified.first())
        .and_then(|e| text(e, "email"))
        .ok_or(OAuthProviderError::MissingEmail)?;

    let name = text(user, "name").unwrap_or_default();
    let (first_name, last_name) = match name.split_once(char::is_whitespace) {
        Some((first, rest)) => (first.to_string(), rest.trim().to_string()),
        None => (name, String::new()),
    };

    Ok(OAuthProfile {
        uid,
        email: email.to_lowercase(),
        username_hint: text(user, "login"),
        first_name,
        last_name,
    })
}

#[async_trait]
impl OAuthProvider for OAuth2Provider {
    fn is_configured(&self, backend: OAuthBackend) -> bool {
        self.clients.contains_key(&backend)
    }

    fn authorization_request(
        &self,
        backend: OAuthBackend,
    ) -> Result<AuthorizationRequest, OAuthProviderError> {
        let client = self.client(backend)?;

        let mut request = client.authorize_url(CsrfToken::new_random);
        for scope in ProviderEndpoints::for_backend(backend).scopes {
            request = request.add_scope(Scope::new(scope.to_string()));
        }
        let (url, state) = request.url();

        Ok(AuthorizationRequest {
            url: url.to_string(),
            state: state.secret().clone(),
        })
    }

    async fn fetch_profile(
        &self,
        backend: OAuthBackend,
        code: &str,
    ) -> Result<OAuthProfile, OAuthProviderError> {
        let client = self.client(backend)?;

        let token = client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&self.http)
            .await
            .map_err(|e| match e {
                RequestTokenError::ServerResponse(response) => {
                    OAuthProviderError::CodeRejected(response.to_string())
                }
                other => OAuthProviderError::RequestFailed(other.to_string()),
            })?;
        let access_token = token.access_token().secret();

        let endpoints = ProviderEndpoints::for_backend(backend);
        let user = self.get_json(endpoints.profile, access_token).await?;

        match (backend, endpoints.emails) {
            (OAuthBackend::GitHub, Some(emails_url)) => {
                let emails = self.get_json(emails_url, access_token).await?;
                github_profile(&user, &emails)
            }
            _ => google_profile(&user),
        }
    }
}
