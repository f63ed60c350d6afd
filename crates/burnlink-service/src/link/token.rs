//! Link token generation.

use burnlink_core::types::id::{LinkId, MIN_TOKEN_BYTES};

/// Generates link tokens from the operating system CSPRNG.
#[derive(Debug, Clone)]
pub struct LinkService {
    token_bytes: usize,
}

impl LinkService {
    /// Creates a link service producing tokens of `token_bytes` random
    /// bytes, raised to the minimum when smaller.
    pub fn new(token_bytes: usize) -> Self {
        Self {
            token_bytes: token_bytes.max(MIN_TOKEN_BYTES),
        }
    }

    /// Random bytes per token.
    pub fn token_bytes(&self) -> usize {
        self.token_bytes
    }

    /// Generates a fresh unguessable token.
    pub fn generate_token(&self) -> LinkId {
        LinkId::generate(self.token_bytes)
    }
}

impl Default for LinkService {
    fn default() -> Self {
        Self::new(burnlink_core::types::id::DEFAULT_TOKEN_BYTES)
    }
}
