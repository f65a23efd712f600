// SPDX-License-Identifier: MIT
// Copyright 2026 EventsHub contributors

//! Identity assertion verification.
//!
//! Assertions are signed JWTs issued by the external identity provider.
//! Production mode validates RS256 signatures against the provider's
//! published JWKS (fetched and cached with a TTL); on an unknown `kid` the
//! cache is force-refreshed and the lookup retried exactly once. A
//! shared-secret HS256 mode exists for deterministic tests.

use crate::error::AppError;
use axum::http::HeaderValue;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::{Mutex, RwLock};

const JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);
const JWKS_CACHE_TTL: Duration = Duration::from_secs(300);
const CLOCK_SKEW_SECS: u64 = 60;

/// Verified identity extracted from a valid assertion. Ephemeral; consumed
/// once per request and never persisted.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub subject_id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub picture_url: Option<String>,
}

/// Identity verification error categories.
#[derive(Debug, Clone)]
pub enum IdentityError {
    /// The Authorization header is absent or not of the form `Bearer <token>`.
    Missing,
    /// The credential failed verification.
    Invalid(String),
    /// The credential is past its expiry.
    Expired,
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Missing => AppError::AuthMissing,
            IdentityError::Invalid(msg) => AppError::AuthInvalid(msg),
            IdentityError::Expired => AppError::AuthExpired,
        }
    }
}

#[derive(Clone)]
enum VerifierMode {
    Provider,
    SharedSecret { secret: String },
}

#[derive(Clone)]
struct JwksCacheEntry {
    keys_by_kid: HashMap<String, Arc<DecodingKey>>,
    expires_at: Instant,
}

/// Verifier for externally-issued identity assertions.
pub struct IdentityVerifier {
    http_client: reqwest::Client,
    issuer: String,
    audience: String,
    mode: VerifierMode,
    jwks_cache: RwLock<Option<JwksCacheEntry>>,
    refresh_lock: Mutex<()>,
}

impl IdentityVerifier {
    /// Create a production verifier for the configured provider project.
    pub fn new(project_id: &str) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()?;

        tracing::info!(project = project_id, "Initialized identity verifier");

        Ok(Self {
            http_client,
            issuer: format!("https://securetoken.google.com/{project_id}"),
            audience: project_id.to_string(),
            mode: VerifierMode::Provider,
            jwks_cache: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        })
    }

    /// Create a verifier that accepts HS256 assertions signed with a shared
    /// secret. Intended for deterministic local/integration tests.
    pub fn new_with_shared_secret(project_id: &str, secret: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            issuer: format!("https://securetoken.google.com/{project_id}"),
            audience: project_id.to_string(),
            mode: VerifierMode::SharedSecret {
                secret: secret.into(),
            },
            jwks_cache: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Verify a bearer credential and extract the asserted identity.
    pub async fn verify(&self, token: &str) -> Result<VerifiedIdentity, IdentityError> {
        let header = decode_header(token)
            .map_err(|e| IdentityError::Invalid(format!("invalid JWT header: {e}")))?;

        let (algorithm, decoding_key) = match &self.mode {
            VerifierMode::SharedSecret { secret } => {
                if header.alg != Algorithm::HS256 {
                    return Err(IdentityError::Invalid(format!(
                        "unexpected JWT alg: {:?}",
                        header.alg
                    )));
                }
                (
                    Algorithm::HS256,
                    Arc::new(DecodingKey::from_secret(secret.as_bytes())),
                )
            }
            VerifierMode::Provider => {
                if header.alg != Algorithm::RS256 {
                    return Err(IdentityError::Invalid(format!(
                        "unexpected JWT alg: {:?}",
                        header.alg
                    )));
                }
                let kid = header
                    .kid
                    .ok_or_else(|| IdentityError::Invalid("missing JWT kid".to_string()))?;
                (Algorithm::RS256, self.decoding_key_for_kid(&kid).await?)
            }
        };

        let mut validation = Validation::new(algorithm);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_audience(&[self.audience.as_str()]);
        validation.leeway = CLOCK_SKEW_SECS;

        let token_data = decode::<AssertionClaims>(token, decoding_key.as_ref(), &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => IdentityError::Expired,
                _ => IdentityError::Invalid(format!("JWT validation failed: {e}")),
            })?;

        let claims = token_data.claims;

        tracing::debug!(
            subject = %claims.sub,
            email = claims.email.as_deref().unwrap_or("<missing>"),
            exp = claims.exp,
            "Identity assertion verified"
        );

        validate_iat(claims.iat)?;

        Ok(VerifiedIdentity {
            subject_id: claims.sub,
            email: claims.email.filter(|e| !e.is_empty()),
            display_name: claims.name.filter(|n| !n.is_empty()),
            picture_url: claims.picture.filter(|p| !p.is_empty()),
        })
    }

    async fn decoding_key_for_kid(&self, kid: &str) -> Result<Arc<DecodingKey>, IdentityError> {
        if let Some(key) = self.lookup_cached_key(kid).await {
            return Ok(key);
        }

        // One forced refresh before giving up, in case the provider rotated
        // its signing keys inside our cache TTL.
        for force_refresh in [false, true] {
            self.refresh_jwks(force_refresh).await?;
            if let Some(key) = self.lookup_cached_key(kid).await {
                return Ok(key);
            }
        }

        Err(IdentityError::Invalid(format!(
            "JWT kid not found in JWKS after refresh: {kid}"
        )))
    }

    async fn lookup_cached_key(&self, kid: &str) -> Option<Arc<DecodingKey>> {
        let cache = self.jwks_cache.read().await;
        let now = Instant::now();
        cache
            .as_ref()
            .filter(|entry| entry.expires_at > now)
            .and_then(|entry| entry.keys_by_kid.get(kid))
            .cloned()
    }

    async fn refresh_jwks(&self, force_refresh: bool) -> Result<(), IdentityError> {
        let _guard = self.refresh_lock.lock().await;

        if !force_refresh {
            let cache = self.jwks_cache.read().await;
            if cache
                .as_ref()
                .is_some_and(|entry| entry.expires_at > Instant::now())
            {
                return Ok(());
            }
        }

        tracing::debug!(jwks_url = JWKS_URL, "Refreshing identity provider JWKS cache");

        let response = self
            .http_client
            .get(JWKS_URL)
            .send()
            .await
            .map_err(|e| IdentityError::Invalid(format!("JWKS request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(IdentityError::Invalid(format!(
                "JWKS request returned status {}",
                response.status()
            )));
        }

        let jwks: Jwks = response
            .json()
            .await
            .map_err(|e| IdentityError::Invalid(format!("invalid JWKS JSON: {e}")))?;

        let mut keys_by_kid: HashMap<String, Arc<DecodingKey>> = HashMap::new();

        for jwk in jwks.keys {
            if jwk.kty != "RSA" || jwk.kid.trim().is_empty() {
                continue;
            }

            if let Some(alg) = &jwk.alg {
                if alg != "RS256" {
                    continue;
                }
            }

            match DecodingKey::from_rsa_components(&jwk.n, &jwk.e) {
                Ok(key) => {
                    keys_by_kid.insert(jwk.kid, Arc::new(key));
                }
                Err(e) => {
                    tracing::warn!(error = %e, kid = %jwk.kid, "Skipping invalid RSA JWKS key");
                }
            }
        }

        if keys_by_kid.is_empty() {
            return Err(IdentityError::Invalid(
                "JWKS response did not include any usable RSA keys".to_string(),
            ));
        }

        *self.jwks_cache.write().await = Some(JwksCacheEntry {
            keys_by_kid,
            expires_at: Instant::now() + JWKS_CACHE_TTL,
        });

        Ok(())
    }
}

/// Claims carried by an identity assertion.
#[derive(Debug, Deserialize)]
struct AssertionClaims {
    sub: String,
    exp: usize,
    iat: Option<usize>,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

/// Extract the token from a strict `Bearer <token>` Authorization header.
///
/// Any other shape is rejected before verification is attempted.
pub fn extract_bearer_token(auth_header: Option<&HeaderValue>) -> Result<&str, IdentityError> {
    let value = auth_header
        .ok_or(IdentityError::Missing)?
        .to_str()
        .map_err(|_| IdentityError::Missing)?;

    let token = value.strip_prefix("Bearer ").ok_or(IdentityError::Missing)?;

    if token.trim().is_empty() {
        return Err(IdentityError::Missing);
    }

    Ok(token)
}

fn validate_iat(iat: Option<usize>) -> Result<(), IdentityError> {
    let now = now_unix_secs();

    let Some(iat) = iat else {
        return Err(IdentityError::Invalid("missing iat claim".to_string()));
    };

    if iat as u64 > now + CLOCK_SKEW_SECS {
        return Err(IdentityError::Invalid("iat claim is in the future".to_string()));
    }

    Ok(())
}

fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[derive(Debug, Deserialize)]
struct Jwks {
    keys: Vec<Jwk>,
}

#[derive(Debug, Deserialize)]
struct Jwk {
    kid: String,
    kty: String,
    alg: Option<String>,
    n: String,
    e: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    const TEST_SECRET: &str = "test-shared-secret";
    const TEST_PROJECT: &str = "test-project";

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        iss: String,
        aud: String,
        exp: usize,
        iat: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        email: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    }

    fn mint(exp_offset: i64, iat_offset: i64, aud: &str) -> String {
        let now = now_unix_secs() as i64;
        let claims = TestClaims {
            sub: "uid-1".to_string(),
            iss: format!("https://securetoken.google.com/{TEST_PROJECT}"),
            aud: aud.to_string(),
            exp: (now + exp_offset) as usize,
            iat: (now + iat_offset) as usize,
            email: Some("casey@eventshub.edu".to_string()),
            name: Some("Casey".to_string()),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn verifier() -> IdentityVerifier {
        IdentityVerifier::new_with_shared_secret(TEST_PROJECT, TEST_SECRET)
    }

    #[tokio::test]
    async fn valid_token_round_trips_identity() {
        let identity = verifier().verify(&mint(3600, 0, TEST_PROJECT)).await.unwrap();
        assert_eq!(identity.subject_id, "uid-1");
        assert_eq!(identity.email.as_deref(), Some("casey@eventshub.edu"));
        assert_eq!(identity.display_name.as_deref(), Some("Casey"));
    }

    #[tokio::test]
    async fn expired_token_is_distinguished() {
        let err = verifier().verify(&mint(-3600, -7200, TEST_PROJECT)).await.unwrap_err();
        assert!(matches!(err, IdentityError::Expired));
    }

    #[tokio::test]
    async fn wrong_audience_is_invalid() {
        let err = verifier().verify(&mint(3600, 0, "other-project")).await.unwrap_err();
        assert!(matches!(err, IdentityError::Invalid(_)));
    }

    #[tokio::test]
    async fn future_iat_is_invalid() {
        let err = verifier().verify(&mint(3600, 600, TEST_PROJECT)).await.unwrap_err();
        assert!(matches!(err, IdentityError::Invalid(_)));
    }

    #[tokio::test]
    async fn garbage_token_is_invalid() {
        let err = verifier().verify("not-a-jwt").await.unwrap_err();
        assert!(matches!(err, IdentityError::Invalid(_)));
    }

    #[test]
    fn extract_bearer_token_rejects_malformed_headers() {
        assert!(matches!(
            extract_bearer_token(None),
            Err(IdentityError::Missing)
        ));

        let basic = HeaderValue::from_static("Basic abc");
        assert!(matches!(
            extract_bearer_token(Some(&basic)),
            Err(IdentityError::Missing)
        ));

        let empty = HeaderValue::from_static("Bearer ");
        assert!(matches!(
            extract_bearer_token(Some(&empty)),
            Err(IdentityError::Missing)
        ));

        let lowercase_scheme = HeaderValue::from_static("bearer abc");
        assert!(matches!(
            extract_bearer_token(Some(&lowercase_scheme)),
            Err(IdentityError::Missing)
        ));
    }

    #[test]
    fn extract_bearer_token_accepts_strict_form() {
        let good = HeaderValue::from_static("Bearer abc.def.ghi");
        assert_eq!(extract_bearer_token(Some(&good)).unwrap(), "abc.def.ghi");
    }
}
