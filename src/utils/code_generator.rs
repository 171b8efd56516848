//! Short code generation with bounded collision retry.
//!
//! Codes are drawn uniformly at random so they cannot be guessed or
//! enumerated. Uniqueness is not assumed: every candidate is claimed through
//! an atomic set-if-absent, and a collision simply draws again.

use std::future::Future;

use rand::Rng;
use serde_json::json;
use tracing::debug;

use crate::error::AppError;

/// `[A-Za-z0-9]`.
pub const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Default code length (62^5 ≈ 9.2×10^8 codes).
pub const DEFAULT_CODE_LENGTH: usize = 5;

/// Default number of draws before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// Paths served by the router that must never be handed out as codes.
const RESERVED_CODES: &[&str] = &["add", "api", "health", "static"];

/// Draws random short codes and resolves collisions.
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    length: usize,
    max_attempts: usize,
    alphabet: Vec<u8>,
}

impl CodeGenerator {
    /// Creates a generator over [`ALPHANUMERIC`].
    pub fn new(length: usize, max_attempts: usize) -> Self {
        Self {
            length: length.max(1),
            max_attempts: max_attempts.max(1),
            alphabet: ALPHANUMERIC.to_vec(),
        }
    }

    /// Replaces the alphabet codes are drawn from.
    ///
    /// An empty alphabet is ignored.
    pub fn with_alphabet(mut self, alphabet: &[u8]) -> Self {
        if !alphabet.is_empty() {
            self.alphabet = alphabet.to_vec();
        }
        self
    }

    /// Draws one candidate code.
    pub fn generate(&self) -> String {
        let mut rng = rand::rng();
        (0..self.length)
            .map(|_| self.alphabet[rng.random_range(0..self.alphabet.len())] as char)
            .collect()
    }

    /// Returns true if `code` has the configured length and alphabet.
    pub fn is_valid_code(&self, code: &str) -> bool {
        code.len() == self.length && code.bytes().all(|b| self.alphabet.contains(&b))
    }

    /// Draws codes until `claim` accepts one.
    ///
    /// `claim` must atomically reserve the code and return `Ok(true)` if it
    /// won, `Ok(false)` if the code was already taken. Errors from `claim`
    /// abort immediately.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CodeGenerationExhausted`] after `max_attempts`
    /// collisions.
    pub async fn generate_unique<F, Fut>(&self, mut claim: F) -> Result<String, AppError>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<bool, AppError>>,
    {
        for attempt in 1..=self.max_attempts {
            let code = self.generate();

            if RESERVED_CODES.contains(&code.as_str()) {
                continue;
            }

            if claim(code.clone()).await? {
                return Ok(code);
            }

            debug!(attempt, code = %code, "Short code collision");
        }

        Err(AppError::code_generation_exhausted(
            "Failed to generate a unique short code, please try again",
            json!({
                "attempts": self.max_attempts,
                "length": self.length,
            }),
        ))
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH, DEFAULT_MAX_ATTEMPTS)
    }
}
