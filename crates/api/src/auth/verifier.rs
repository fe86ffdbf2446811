//! External credential verification: the identity-provider bridge.
//!
//! Login presents a third-party ID token; the verifier checks it and
//! extracts a stable subject identifier plus profile claims. The trait
//! is the seam: production uses [`GoogleIdentityVerifier`], tests
//! inject [`StaticVerifier`]. Every failure collapses into
//! [`VerifierError::InvalidCredential`] at the HTTP boundary.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;

/// Identity extracted from a verified credential.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    /// Stable subject identifier at the identity provider. Immutable.
    pub subject_id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Credential-verification failures.
#[derive(Debug, thiserror::Error)]
pub enum VerifierError {
    /// The credential is malformed, expired, or not signed by the
    /// provider. One variant for every cause; details go to logs.
    #[error("Invalid credential")]
    InvalidCredential,

    /// The provider's public keys could not be fetched.
    #[error("Credential verifier unavailable: {0}")]
    Unavailable(String),
}

/// Verifies an externally-issued identity credential.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, raw_credential: &str) -> Result<VerifiedIdentity, VerifierError>;
}

// ---------------------------------------------------------------------------
// Google / Firebase verifier
// ---------------------------------------------------------------------------

/// Endpoint serving the x509 certificates that sign Firebase ID tokens.
const GOOGLE_CERTS_URL: &str =
    "https://www.googleapis.com/robot/v1/metadata/x509/securetoken@system.gserviceaccount.com";

/// Fallback certificate cache lifetime when the response carries no
/// usable `Cache-Control: max-age`.
const DEFAULT_CERT_TTL: Duration = Duration::from_secs(300);

/// The subset of ID-token claims this system consumes.
#[derive(Debug, Deserialize)]
struct ProviderClaims {
    sub: String,
    email: Option<String>,
    name: Option<String>,
}

#[derive(Default)]
struct CertCache {
    /// PEM certificate per key id.
    keys: HashMap<String, String>,
    expires_at: Option<Instant>,
}

impl CertCache {
    fn is_fresh(&self) -> bool {
        self.expires_at.is_some_and(|deadline| Instant::now() < deadline)
    }
}

/// Verifies RS256 ID tokens issued by Google Identity / Firebase Auth
/// for the configured project.
///
/// Certificates are fetched lazily and cached until the provider's
/// `max-age` elapses, so steady-state verification makes no network
/// calls.
pub struct GoogleIdentityVerifier {
    project_id: String,
    http: reqwest::Client,
    certs: RwLock<CertCache>,
}

impl GoogleIdentityVerifier {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            http: reqwest::Client::new(),
            certs: RwLock::new(CertCache::default()),
        }
    }

    /// Fetch the current signing certificates, honoring `max-age`.
    async fn refresh_certs(&self) -> Result<(), VerifierError> {
        let response = self
            .http
            .get(GOOGLE_CERTS_URL)
            .send()
            .await
            .map_err(|e| VerifierError::Unavailable(e.to_string()))?;

        let ttl = response
            .headers()
            .get(reqwest::header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_max_age)
            .unwrap_or(DEFAULT_CERT_TTL);

        let keys: HashMap<String, String> = response
            .json()
            .await
            .map_err(|e| VerifierError::Unavailable(e.to_string()))?;

        let mut cache = self.certs.write().await;
        cache.keys = keys;
        cache.expires_at = Some(Instant::now() + ttl);
        Ok(())
    }

    /// The PEM certificate for a key id, refreshing the cache if stale.
    async fn cert_for_kid(&self, kid: &str) -> Result<Option<String>, VerifierError> {
        {
            let cache = self.certs.read().await;
            if cache.is_fresh() {
                return Ok(cache.keys.get(kid).cloned());
            }
        }
        self.refresh_certs().await?;
        let cache = self.certs.read().await;
        Ok(cache.keys.get(kid).cloned())
    }
}

#[async_trait]
impl CredentialVerifier for GoogleIdentityVerifier {
    async fn verify(&self, raw_credential: &str) -> Result<VerifiedIdentity, VerifierError> {
        let header = decode_header(raw_credential).map_err(|e| {
            tracing::debug!(error = %e, "Credential header failed to parse");
            VerifierError::InvalidCredential
        })?;
        let kid = header.kid.ok_or(VerifierError::InvalidCredential)?;

        let pem = self
            .cert_for_kid(&kid)
            .await?
            .ok_or(VerifierError::InvalidCredential)?;
        let key = DecodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|e| VerifierError::Unavailable(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[format!(
            "https://securetoken.google.com/{}",
            self.project_id
        )]);

        let data = decode::<ProviderClaims>(raw_credential, &key, &validation).map_err(|e| {
            tracing::debug!(error = %e, "Credential failed verification");
            VerifierError::InvalidCredential
        })?;

        Ok(VerifiedIdentity {
            subject_id: data.claims.sub,
            email: data.claims.email,
            display_name: data.claims.name,
        })
    }
}

/// Parse `max-age` out of a `Cache-Control` header value.
fn parse_max_age(value: &str) -> Option<Duration> {
    value
        .split(',')
        .map(str::trim)
        .find_map(|directive| directive.strip_prefix("max-age="))
        .and_then(|secs| secs.parse::<u64>().ok())
        .map(Duration::from_secs)
}

// ---------------------------------------------------------------------------
// Static verifier (tests, local development)
// ---------------------------------------------------------------------------

/// A verifier backed by a fixed credential -> identity map.
///
/// Used by integration tests and local development to exercise the full
/// login flow without the external provider.
#[derive(Debug, Default)]
pub struct StaticVerifier {
    identities: HashMap<String, VerifiedIdentity>,
}

impl StaticVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a credential string resolving to the given identity.
    pub fn with_identity(mut self, credential: &str, identity: VerifiedIdentity) -> Self {
        self.identities.insert(credential.to_string(), identity);
        self
    }
}

#[async_trait]
impl CredentialVerifier for StaticVerifier {
    async fn verify(&self, raw_credential: &str) -> Result<VerifiedIdentity, VerifierError> {
        self.identities
            .get(raw_credential)
            .cloned()
            .ok_or(VerifierError::InvalidCredential)
    }
}
