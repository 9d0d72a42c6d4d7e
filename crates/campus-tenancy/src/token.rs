//! Signed token encode/decode
//!
//! This module provides HS256 token operations using the jsonwebtoken
//! crate. Token issuance for login flows lives with the caller; this
//! service only mints and decodes the tenant-enriched claims.

use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use thiserror::Error;

use crate::claims::TenantClaims;

/// Token error types.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token is invalid (malformed, bad signature, etc.)
    #[error("Invalid token: {0}")]
    Invalid(String),

    /// Token encoding failed
    #[error("Token encoding failed: {0}")]
    Encoding(String),
}

/// Result type for token operations.
pub type TokenResult<T> = Result<T, TokenError>;

/// HS256 token service over tenant-enriched claims.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

impl TokenService {
    /// Create a token service from a shared secret.
    ///
    /// # Arguments
    ///
    /// * `secret` - The secret key for HMAC signing
    pub fn with_secret(secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Mint a token from claims.
    ///
    /// # Arguments
    ///
    /// * `claims` - Tenant claims to encode
    ///
    /// # Returns
    ///
    /// Encoded token string
    pub fn mint(&self, claims: &TenantClaims) -> TokenResult<String> {
        let header = Header::new(Algorithm::HS256);
        encode(&header, claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Validate and decode a token, checking signature and expiry.
    ///
    /// # Arguments
    ///
    /// * `token` - The token string
    ///
    /// # Returns
    ///
    /// Decoded claims if valid
    pub fn decode(&self, token: &str) -> TokenResult<TenantClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;
        self.decode_with(token, &validation)
    }

    /// Decode a token checking the signature but not expiry.
    ///
    /// Tenant resolution accepts the tenant claim from an expired token:
    /// the token still fails authentication elsewhere, but its tenant
    /// claim is trusted because the signature is intact. A missing `exp`
    /// claim still fails decoding.
    ///
    /// # Arguments
    ///
    /// * `token` - The token string
    ///
    /// # Returns
    ///
    /// Decoded claims if the signature verifies
    pub fn decode_without_expiry(&self, token: &str) -> TokenResult<TenantClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;
        validation.validate_exp = false;
        self.decode_with(token, &validation)
    }

    fn decode_with(&self, token: &str, validation: &Validation) -> TokenResult<TenantClaims> {
        let token_data: TokenData<TenantClaims> = decode(token, &self.decoding_key, validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidToken => {
                    TokenError::Invalid("Malformed token".to_string())
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    TokenError::Invalid("Invalid signature".to_string())
                }
                _ => TokenError::Invalid(e.to_string()),
            })?;

        Ok(token_data.claims)
    }
}
