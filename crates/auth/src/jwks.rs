//! Remote key-set fetch, startup only
//!
//! When a JWKS URL is configured the verification key is fetched once at
//! process start. The request hot path never performs I/O; key rotation
//! is handled by restarting the service.

use std::time::Duration;

use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet};
use jsonwebtoken::DecodingKey;

use crate::config::KeyError;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetch the key set and select the ES256 verification key.
///
/// With an expected `kid` the matching key is required; otherwise the
/// first elliptic-curve key wins.
pub(crate) async fn fetch_decoding_key(
    jwks_url: &str,
    expected_kid: Option<&str>,
) -> Result<DecodingKey, KeyError> {
    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| KeyError::JwksFetch(e.to_string()))?;

    let response = client
        .get(jwks_url)
        .send()
        .await
        .map_err(|e| KeyError::JwksFetch(e.to_string()))?;

    if !response.status().is_success() {
        return Err(KeyError::JwksFetch(format!(
            "HTTP {} from key-set endpoint",
            response.status()
        )));
    }

    let jwks: JwkSet = response
        .json()
        .await
        .map_err(|e| KeyError::JwksFetch(e.to_string()))?;

    let jwk = match expected_kid {
        Some(kid) => jwks
            .keys
            .iter()
            .find(|k| k.common.key_id.as_deref() == Some(kid))
            .ok_or(KeyError::NoMatchingKey)?,
        None => jwks
            .keys
            .iter()
            .find(|k| matches!(k.algorithm, AlgorithmParameters::EllipticCurve(_)))
            .ok_or(KeyError::NoMatchingKey)?,
    };

    jwk_to_decoding_key(jwk)
}

/// Convert a JWK to a DecodingKey. Only elliptic-curve keys are usable;
/// ES256 is the mandated scheme for bearer tokens.
fn jwk_to_decoding_key(jwk: &Jwk) -> Result<DecodingKey, KeyError> {
    match &jwk.algorithm {
        AlgorithmParameters::EllipticCurve(ec) => {
            DecodingKey::from_ec_components(&ec.x, &ec.y).map_err(KeyError::InvalidPem)
        }
        _ => Err(KeyError::NoMatchingKey),
    }
}
