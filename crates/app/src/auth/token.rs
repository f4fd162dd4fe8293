//! Bearer token wire format.
//!
//! Tokens read `sf_v1_<token uuid, simple>.<64 hex secret chars>`. The database only
//! keeps a SHA-256 verifier that binds the secret to the token id, version and owner.

use std::{
    fmt::{self, Write as _},
    str::FromStr,
};

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::domain::customers::models::CustomerUuid;

/// Leading segment of every storefront token.
pub const API_TOKEN_PREFIX: &str = "sf";

/// Random bytes behind each token.
pub const API_TOKEN_SECRET_BYTES: usize = 32;

#[derive(Debug, Error)]
pub enum ApiTokenError {
    #[error("api token format is invalid")]
    InvalidFormat,

    #[error("api token uses an unsupported version")]
    UnsupportedVersion,

    #[error("api token secret encoding is invalid")]
    InvalidSecretEncoding,
}

/// Token layout revision, stored as a smallint next to the verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiTokenVersion {
    V1,
}

impl ApiTokenVersion {
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        match self {
            Self::V1 => 1,
        }
    }
}

impl fmt::Display for ApiTokenVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => f.write_str("v1"),
        }
    }
}

impl FromStr for ApiTokenVersion {
    type Err = ApiTokenError;

    fn from_str(segment: &str) -> Result<Self, Self::Err> {
        match segment {
            "v1" => Ok(Self::V1),
            _ => Err(ApiTokenError::UnsupportedVersion),
        }
    }
}

impl TryFrom<i16> for ApiTokenVersion {
    type Error = ApiTokenError;

    fn try_from(stored: i16) -> Result<Self, Self::Error> {
        match stored {
            1 => Ok(Self::V1),
            _ => Err(ApiTokenError::UnsupportedVersion),
        }
    }
}

impl From<ApiTokenVersion> for i16 {
    fn from(version: ApiTokenVersion) -> Self {
        version.as_i16()
    }
}

/// Raw secret bytes, wiped on drop and never printed.
#[derive(Clone)]
pub struct ApiTokenSecret([u8; API_TOKEN_SECRET_BYTES]);

impl ApiTokenSecret {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; API_TOKEN_SECRET_BYTES]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; API_TOKEN_SECRET_BYTES] {
        &self.0
    }

    fn to_hex(&self) -> String {
        self.0
            .iter()
            .fold(String::with_capacity(API_TOKEN_SECRET_BYTES * 2), |mut hex, byte| {
                let _infallible = write!(hex, "{byte:02x}");
                hex
            })
    }

    fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != API_TOKEN_SECRET_BYTES * 2 {
            return None;
        }

        let mut bytes = [0_u8; API_TOKEN_SECRET_BYTES];

        for (byte, pair) in bytes.iter_mut().zip(hex.as_bytes().chunks_exact(2)) {
            let &[hi, lo] = pair else {
                return None;
            };

            let hi = char::from(hi).to_digit(16)?;
            let lo = char::from(lo).to_digit(16)?;

            *byte = u8::try_from((hi << 4) | lo).ok()?;
        }

        Some(Self(bytes))
    }
}

impl fmt::Debug for ApiTokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiTokenSecret(<redacted>)")
    }
}

impl Drop for ApiTokenSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// A presented token split into its parts.
#[derive(Debug, Clone)]
pub struct ParsedApiToken {
    pub token_uuid: Uuid,
    pub version: ApiTokenVersion,
    pub secret: ApiTokenSecret,
}

#[must_use]
pub fn generate_api_token_secret() -> ApiTokenSecret {
    let mut bytes = [0_u8; API_TOKEN_SECRET_BYTES];

    OsRng.fill_bytes(&mut bytes);

    ApiTokenSecret(bytes)
}

#[must_use]
pub fn format_api_token(
    token_uuid: Uuid,
    version: ApiTokenVersion,
    secret: &ApiTokenSecret,
) -> String {
    format!(
        "{API_TOKEN_PREFIX}_{version}_{}.{}",
        token_uuid.simple(),
        secret.to_hex()
    )
}

pub fn parse_api_token(token: &str) -> Result<ParsedApiToken, ApiTokenError> {
    let (id, secret) = token.split_once('.').ok_or(ApiTokenError::InvalidFormat)?;

    let Some((API_TOKEN_PREFIX, rest)) = id.split_once('_') else {
        return Err(ApiTokenError::InvalidFormat);
    };

    let (version, token_uuid) = rest.split_once('_').ok_or(ApiTokenError::InvalidFormat)?;

    Ok(ParsedApiToken {
        version: version.parse()?,
        token_uuid: Uuid::try_parse(token_uuid).map_err(|_error| ApiTokenError::InvalidFormat)?,
        secret: ApiTokenSecret::from_hex(secret).ok_or(ApiTokenError::InvalidSecretEncoding)?,
    })
}

/// Bytes hashed into the stored verifier.
///
/// `{token uuid}:{version number}:{customer uuid}:{secret hex}`, uuids in simple form.
#[must_use]
pub fn build_verifier_input(
    token_uuid: &Uuid,
    version: ApiTokenVersion,
    customer_uuid: &CustomerUuid,
    secret: &ApiTokenSecret,
) -> Vec<u8> {
    format!(
        "{}:{}:{}:{}",
        token_uuid.simple(),
        version.as_i16(),
        customer_uuid.into_uuid().simple(),
        secret.to_hex(),
    )
    .into_bytes()
}

/// Lowercase hex SHA-256, the `api_tokens.token_hash` column.
#[must_use]
pub fn hash_verifier(input: &[u8]) -> String {
    format!("{:x}", Sha256::digest(input))
}

/// Constant-time comparison of a recomputed verifier against the stored hash.
#[must_use]
pub fn verify_verifier(input: &[u8], token_hash: &str) -> bool {
    let computed = hash_verifier(input);

    computed.len() == token_hash.len()
        && computed
            .bytes()
            .zip(token_hash.bytes())
            .fold(0_u8, |diff, (ours, theirs)| diff | (ours ^ theirs))
            == 0
}
