/*
 * Responsibility
 * - Per-request authorization context (who is asking, for which bot, in which scope)
 * - Scope parsing and the normalized cache key (AuthID) for a (bot, scanner) pair
 */
use std::fmt;

/// Isolation level of the requested storage namespace.
///
/// Unknown scope strings are carried through untouched; key derivation is
/// where they get rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Scope {
    #[default]
    Scanner,
    Bot,
    Owner,
    Other(String),
}

impl Scope {
    /// Parse an optional path parameter. Absent or empty means `scanner`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") => Self::Scanner,
            Some("scanner") => Self::Scanner,
            Some("bot") => Self::Bot,
            Some("owner") => Self::Owner,
            Some(other) => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Scanner => "scanner",
            Self::Bot => "bot",
            Self::Owner => "owner",
            Self::Other(s) => s,
        }
    }

    pub fn requires_owner(&self) -> bool {
        matches!(self, Self::Owner)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authorization state of a single request.
///
/// - `bot_id` / `scanner` come from the verified token and are never rewritten.
/// - `owner` stays `None` until the authorizer resolves it (owner scope only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationContext {
    pub bot_id: String,
    pub scanner: String,
    pub owner: Option<String>,
    pub scope: Scope,
    pub path_key: String,
}

impl AuthorizationContext {
    pub fn new(
        bot_id: impl Into<String>,
        scanner: impl Into<String>,
        scope: Scope,
        path_key: impl Into<String>,
    ) -> Self {
        Self {
            bot_id: bot_id.into(),
            scanner: scanner.into(),
            owner: None,
            scope,
            path_key: path_key.into(),
        }
    }

    pub fn auth_id(&self) -> String {
        auth_id(&self.bot_id, &self.scanner)
    }
}

/// `lowercase(bot_id) + "|" + lowercase(scanner)`.
///
/// Identities arrive checksum-cased, so the cache key must not depend on casing.
pub fn auth_id(bot_id: &str, scanner: &str) -> String {
    format!(
        "{}|{}",
        bot_id.to_ascii_lowercase(),
        scanner.to_ascii_lowercase()
    )
}
