// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access token verification against the Auth0 tenant's JWKS.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};

use super::{AuthError, Claims, JwksManager};
use crate::config::AuthSettings;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Verifies signature, issuer, audience and expiry of access tokens.
pub struct TokenVerifier {
    jwks: JwksManager,
    issuer: String,
    audience: String,
    algorithms: Vec<Algorithm>,
}

impl TokenVerifier {
    pub fn new(settings: &AuthSettings) -> Result<Self, AuthError> {
        let jwks = JwksManager::new(&settings.jwks_url, settings.jwks_timeout)?
            .with_cache_ttl(settings.jwks_cache_ttl);
        Ok(Self::with_jwks(settings, jwks))
    }

    /// Build a verifier around an existing key manager.
    pub fn with_jwks(settings: &AuthSettings, jwks: JwksManager) -> Self {
        Self {
            jwks,
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
            algorithms: settings.algorithms.clone(),
        }
    }

    pub fn jwks(&self) -> &JwksManager {
        &self.jwks
    }

    /// Verify `token` and return its claims.
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::MalformedToken)?;

        if !self.algorithms.contains(&header.alg) {
            return Err(AuthError::UnsupportedAlgorithm);
        }

        let kid = header.kid.as_deref().ok_or(AuthError::MissingKeyId)?;
        let decoding_key = self.jwks.decoding_key(kid).await?;

        // Pin to the header algorithm: jsonwebtoken rejects a validation whose
        // algorithm list mixes key families.
        let mut validation = Validation::new(header.alg);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);

        let token_data =
            decode::<Claims>(token, &decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
                ErrorKind::InvalidAudience => AuthError::InvalidAudience,
                ErrorKind::ImmatureSignature => AuthError::TokenNotYetValid,
                ErrorKind::InvalidAlgorithm => AuthError::UnsupportedAlgorithm,
                _ => AuthError::MalformedToken,
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{self, now};
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use serde_json::json;

    #[tokio::test]
    async fn valid_token_yields_claims() {
        let verifier = test_support::verifier().await;
        let token = test_support::token(&["view:actors", "view:movies"]);

        let claims = verifier.verify(&token).await.unwrap();
        assert_eq!(claims.sub.as_deref(), Some("auth0|casting-assistant"));
        assert!(claims.has_permission("view:movies"));
    }

    #[tokio::test]
    async fn expired_token_is_reported_as_expired() {
        let verifier = test_support::verifier().await;
        let mut claims = test_support::claims(&["view:actors"]);
        claims["exp"] = json!(now() - 3600);
        let token = test_support::sign(&claims, Some(test_support::KID));

        let err = verifier.verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[tokio::test]
    async fn token_within_leeway_is_accepted() {
        let verifier = test_support::verifier().await;
        let mut claims = test_support::claims(&["view:actors"]);
        claims["exp"] = json!(now() - 10);
        let token = test_support::sign(&claims, Some(test_support::KID));

        assert!(verifier.verify(&token).await.is_ok());
    }

    #[tokio::test]
    async fn wrong_audience_and_issuer_are_distinguished() {
        let verifier = test_support::verifier().await;

        let mut claims = test_support::claims(&[]);
        claims["aud"] = json!("someone-else");
        let token = test_support::sign(&claims, Some(test_support::KID));
        assert!(matches!(
            verifier.verify(&token).await,
            Err(AuthError::InvalidAudience)
        ));

        let mut claims = test_support::claims(&[]);
        claims["iss"] = json!("https://evil.example.com/");
        let token = test_support::sign(&claims, Some(test_support::KID));
        assert!(matches!(
            verifier.verify(&token).await,
            Err(AuthError::InvalidIssuer)
        ));
    }

    #[tokio::test]
    async fn audience_array_containing_api_is_accepted() {
        let verifier = test_support::verifier().await;
        let mut claims = test_support::claims(&["view:actors"]);
        claims["aud"] = json!([test_support::AUDIENCE, "https://casting.test.auth0.com/userinfo"]);
        let token = test_support::sign(&claims, Some(test_support::KID));

        assert!(verifier.verify(&token).await.is_ok());
    }

    #[tokio::test]
    async fn tampered_payload_fails_signature() {
        let verifier = test_support::verifier().await;
        let token = test_support::token(&["view:actors"]);

        let mut parts: Vec<String> = token.split('.').map(str::to_owned).collect();
        let mut claims = test_support::claims(&["view:actors", "delete:actors"]);
        claims["sub"] = json!("auth0|casting-assistant");
        parts[1] = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
        let forged = parts.join(".");

        assert!(matches!(
            verifier.verify(&forged).await,
            Err(AuthError::InvalidSignature)
        ));
    }

    #[tokio::test]
    async fn header_problems_are_caught_before_key_lookup() {
        let verifier = test_support::verifier().await;

        assert!(matches!(
            verifier.verify("not-a-jwt").await,
            Err(AuthError::MalformedToken)
        ));

        let no_kid = test_support::sign(&test_support::claims(&[]), None);
        assert!(matches!(
            verifier.verify(&no_kid).await,
            Err(AuthError::MissingKeyId)
        ));

        let unknown_kid = test_support::sign(&test_support::claims(&[]), Some("other-key"));
        assert!(matches!(
            verifier.verify(&unknown_kid).await,
            Err(AuthError::NoMatchingKey)
        ));
    }

    #[tokio::test]
    async fn algorithms_outside_configuration_are_rejected() {
        let verifier = test_support::verifier().await;
        let mut header = jsonwebtoken::Header::new(Algorithm::HS256);
        header.kid = Some(test_support::KID.to_string());
        let token = jsonwebtoken::encode(
            &header,
            &test_support::claims(&["view:actors"]),
            &jsonwebtoken::EncodingKey::from_secret(b"guessable"),
        )
        .unwrap();

        assert!(matches!(
            verifier.verify(&token).await,
            Err(AuthError::UnsupportedAlgorithm)
        ));
    }

    #[tokio::test]
    async fn missing_exp_is_malformed() {
        let verifier = test_support::verifier().await;
        let mut claims = test_support::claims(&["view:actors"]);
        claims.as_object_mut().unwrap().remove("exp");
        let token = test_support::sign(&claims, Some(test_support::KID));

        assert!(matches!(
            verifier.verify(&token).await,
            Err(AuthError::MalformedToken)
        ));
    }
}
