//! Normalized member identities in `name@domain` form.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Maximum length of the name part after normalization.
const MAX_NAME_LEN: usize = 128;
/// Maximum length of the domain part after normalization.
const MAX_DOMAIN_LEN: usize = 255;

static NAME_RE: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"^[a-z0-9_]([a-z0-9_.-]*[a-z0-9_])?$").unwrap());

static DOMAIN_RE: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?(\.[a-z0-9]([a-z0-9-]*[a-z0-9])?)*(:[0-9]{1,5})?$")
        .unwrap()
});

/// A validated, normalized `name@domain` handle.
///
/// Both parts are lowercased on construction, so two identities that
/// differ only in case compare equal. All engine operations take
/// identities by this type; raw strings are validated exactly once at
/// the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Parses and normalizes a raw `name@domain` handle.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] when the handle is missing the
    /// `@` separator, either part is empty, a part exceeds its length
    /// limit, or a part contains characters outside the allowed set.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let trimmed = raw.trim();
        let Some((name, domain)) = trimmed.split_once('@') else {
            return Err(AppError::InvalidInput(format!(
                "handle '{trimmed}' is missing the '@' separator"
            )));
        };
        Self::from_parts(name, domain)
    }

    /// Builds an identity from its two parts, normalizing each.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] when either part fails
    /// validation.
    pub fn from_parts(name: &str, domain: &str) -> AppResult<Self> {
        let name = name.to_lowercase();
        let domain = domain.to_lowercase();

        if name.is_empty() || name.len() > MAX_NAME_LEN {
            return Err(AppError::InvalidInput(format!(
                "handle name part must be 1-{MAX_NAME_LEN} characters"
            )));
        }
        if domain.is_empty() || domain.len() > MAX_DOMAIN_LEN {
            return Err(AppError::InvalidInput(format!(
                "handle domain part must be 1-{MAX_DOMAIN_LEN} characters"
            )));
        }
        if !NAME_RE.is_match(&name) {
            return Err(AppError::InvalidInput(format!(
                "handle name part '{name}' contains invalid characters"
            )));
        }
        if !DOMAIN_RE.is_match(&domain) {
            return Err(AppError::InvalidInput(format!(
                "handle domain part '{domain}' is not a valid hostname"
            )));
        }
        if domain
            .split_once(':')
            .is_some_and(|(_, port)| port.parse::<u16>().is_err())
        {
            return Err(AppError::InvalidInput(format!(
                "handle domain part '{domain}' has an out-of-range port"
            )));
        }

        Ok(Self(format!("{name}@{domain}")))
    }

    /// The name part of the handle.
    #[must_use]
    pub fn name(&self) -> &str {
        // Construction guarantees exactly one '@' separator.
        self.0.split('@').next().unwrap_or(&self.0)
    }

    /// The domain part of the handle.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split('@').nth(1).unwrap_or(&self.0)
    }

    /// The full normalized `name@domain` form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this identity lives on the given local domain.
    #[must_use]
    pub fn is_local(&self, local_domain: &str) -> bool {
        self.domain() == local_domain.to_lowercase()
    }

    /// Consumes the identity, returning the normalized handle string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Identity {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.0
    }
}

impl std::str::FromStr for Identity {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
