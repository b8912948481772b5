use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::{error::Error as StdError, fmt};

// Errors returned by scanner-token verification.
#[derive(Debug)]
pub enum TokenError {
    Jwt(jsonwebtoken::errors::Error),
    EmptyClaim(&'static str),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jwt(e) => write!(f, "jwt verification failed: {}", e),
            Self::EmptyClaim(name) => write!(f, "empty '{}' claim", name),
        }
    }
}

impl StdError for TokenError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Jwt(e) => Some(e),
            _ => None,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        Self::Jwt(e)
    }
}

/// Scanner token (JWT) claims.
///
/// NOTE:
/// - `sub` is the scanner address that signed up for the token.
/// - `exp` is required, but checked by `Validation` rather than read here.
/// - `bot-id` is optional here; the identity extractor decides what a missing one means.
#[derive(Debug, Clone, Deserialize)]
pub struct ScannerTokenClaims {
    pub sub: String,

    #[serde(default, rename = "bot-id")]
    pub bot_id: Option<String>,
}

/// Verified token as seen by the rest of the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedScannerToken {
    pub scanner: String,
    pub bot_id: Option<String>,
}

/// Verifies a bearer token and returns the scanner identity it asserts.
///
/// Injected through `AppState` so tests can swap in a fake.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<VerifiedScannerToken, TokenError>;
}

/// EdDSA (Ed25519) scanner-token verifier.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct JwtScannerVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtScannerVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("JwtScannerVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtScannerVerifier {
    pub fn new(
        public_key_pem: &str,
        issuer: Option<&str>,
        audience: Option<&str>,
        leeway_seconds: u64,
    ) -> Result<Self, String> {
        let decoding_key = DecodingKey::from_ed_pem(public_key_pem.as_bytes())
            .map_err(|e| format!("invalid ed25519 public key pem: {}", e))?;

        let mut validation = Validation::new(Algorithm::EdDSA);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        match audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        validation.leeway = leeway_seconds;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    // Verify and decode a scanner JWT.
    pub fn decode(&self, token: &str) -> Result<ScannerTokenClaims, TokenError> {
        let data = jsonwebtoken::decode::<ScannerTokenClaims>(
            token,
            &self.decoding_key,
            &self.validation,
        )?;

        Ok(data.claims)
    }
}

impl TokenVerifier for JwtScannerVerifier {
    fn verify(&self, token: &str) -> Result<VerifiedScannerToken, TokenError> {
        let claims = self.decode(token)?;

        if claims.sub.trim().is_empty() {
            return Err(TokenError::EmptyClaim("sub"));
        }

        Ok(VerifiedScannerToken {
            scanner: claims.sub,
            bot_id: claims.bot_id,
        })
    }
}
