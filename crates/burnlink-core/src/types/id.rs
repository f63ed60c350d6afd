//! Identifier types.
//!
//! [`LinkId`] is the capability token embedded in shareable URLs. Other
//! identifiers are newtype wrappers around [`uuid::Uuid`].

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to define a newtype ID wrapper around `Uuid`.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Return the inner UUID value.
            pub fn into_uuid(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a watermark placement within a link.
    WatermarkId
);

define_id!(
    /// Unique identifier for a domain event.
    EventId
);

/// Smallest number of random bytes a link token may carry.
pub const MIN_TOKEN_BYTES: usize = 20;

/// Default number of random bytes in a link token.
pub const DEFAULT_TOKEN_BYTES: usize = 32;

/// Longest token accepted when parsing untrusted input.
const MAX_TOKEN_LEN: usize = 128;

/// Error returned when a string is not a well-formed link token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkIdError {
    /// The token was empty.
    #[error("link id is empty")]
    Empty,
    /// The token was longer than any generated token can be.
    #[error("link id is too long")]
    TooLong,
    /// The token contained a character outside the URL-safe alphabet.
    #[error("link id contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Opaque link token: the sole lookup key and the sole access credential.
///
/// Generated from the operating system CSPRNG and encoded as URL-safe
/// base64 without padding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkId(String);

impl LinkId {
    /// Generate a fresh token from `bytes` random bytes (at least [`MIN_TOKEN_BYTES`]).
    pub fn generate(bytes: usize) -> Self {
        let mut buf = vec![0u8; bytes.max(MIN_TOKEN_BYTES)];
        OsRng.fill_bytes(&mut buf);
        Self(URL_SAFE_NO_PAD.encode(buf))
    }

    /// Borrow the token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix of the token, safe to write to logs.
    pub fn fingerprint(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LinkId {
    type Err = LinkIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(LinkIdError::Empty);
        }
        if s.len() > MAX_TOKEN_LEN {
            return Err(LinkIdError::TooLong);
        }
        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(LinkIdError::InvalidCharacter(c));
        }
        Ok(Self(s.to_string()))
    }
}

impl AsRef<str> for LinkId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
