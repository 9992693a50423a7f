use std::fmt;
use uuid::Uuid;

/// What a signed token authorizes. Every purpose has its own secret, lifetime
/// and cache slot, so a token minted for one purpose never passes as another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenPurpose {
    Access,
    Refresh,
    Activation,
    Deactivation,
    Deletion,
    Reactivation,
    ResetPassword,
    ChangeEmail,
    ChangeUsername,
}

impl TokenPurpose {
    pub const ALL: [TokenPurpose; 9] = [
        TokenPurpose::Access,
        TokenPurpose::Refresh,
        TokenPurpose::Activation,
        TokenPurpose::Deactivation,
        TokenPurpose::Deletion,
        TokenPurpose::Reactivation,
        TokenPurpose::ResetPassword,
        TokenPurpose::ChangeEmail,
        TokenPurpose::ChangeUsername,
    ];

    /// Login session tokens, revoked together whenever credentials or status change.
    pub const SESSION: [TokenPurpose; 2] = [TokenPurpose::Access, TokenPurpose::Refresh];

    /// Value of the `token_type` claim and metrics label.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenPurpose::Access => "access",
            TokenPurpose::Refresh => "refresh",
            TokenPurpose::Activation => "activation",
            TokenPurpose::Deactivation => "deactivation",
            TokenPurpose::Deletion => "deletion",
            TokenPurpose::Reactivation => "reactivation",
            TokenPurpose::ResetPassword => "reset_password",
            TokenPurpose::ChangeEmail => "change_email",
            TokenPurpose::ChangeUsername => "change_username",
        }
    }

    /// Prefix of the `{PREFIX}_TOKEN_SECRET` / `{PREFIX}_TOKEN_EXPIRY` variables.
    pub fn env_prefix(&self) -> &'static str {
        match self {
            TokenPurpose::Access => "ACCESS",
            TokenPurpose::Refresh => "REFRESH",
            TokenPurpose::Activation => "ACTIVATION",
            TokenPurpose::Deactivation => "DEACTIVATION",
            TokenPurpose::Deletion => "DELETION",
            TokenPurpose::Reactivation => "REACTIVATION",
            TokenPurpose::ResetPassword => "RESET_PASSWORD",
            TokenPurpose::ChangeEmail => "CHANGE_EMAIL",
            TokenPurpose::ChangeUsername => "CHANGE_USERNAME",
        }
    }

    /// Lifetime in seconds when no override is configured.
    pub fn default_expiry_secs(&self) -> i64 {
        match self {
            TokenPurpose::Access => 3600,
            TokenPurpose::Refresh => 21600,
            _ => 1800,
        }
    }

    /// Human name used in error messages, e.g. "Invalid Password Reset Token".
    pub fn label(&self) -> &'static str {
        match self {
            TokenPurpose::Access => "Access",
            TokenPurpose::Refresh => "Refresh",
            TokenPurpose::Activation => "Activation",
            TokenPurpose::Deactivation => "Deactivation",
            TokenPurpose::Deletion => "Deletion",
            TokenPurpose::Reactivation => "Reactivation",
            TokenPurpose::ResetPassword => "Password Reset",
            TokenPurpose::ChangeEmail => "Email Change",
            TokenPurpose::ChangeUsername => "Username Change",
        }
    }

    /// Cache key holding the single outstanding token of this purpose.
    pub fn cache_key(&self, user_id: Uuid) -> String {
        format!("{}_token_{}", self.as_str(), user_id)
    }

    pub fn from_claim(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == value)
    }
}

impl fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
