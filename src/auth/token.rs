use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::{decode, decode_header, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};

use crate::errors::TokenError;

/// Named fields decoded from a verified token.
pub type Claims = Map<String, Value>;

const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Decoder for tokens minted by the identity API with the shared HMAC secret.
///
/// Expiry is not enforced: tokens are accepted for as long as the
/// signature holds.
#[derive(Clone)]
pub struct TokenCodec {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &SecretString) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = HMAC_ALGORITHMS.to_vec();
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_aud = false;

        Self {
            decoding_key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            validation,
        }
    }

    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        // The header is inspected on its own so a foreign algorithm is refused
        // before any signature work happens.
        let header = decode_header(token).map_err(|_| classify_unreadable_header(token))?;
        if !HMAC_ALGORITHMS.contains(&header.alg) {
            return Err(TokenError::UnexpectedAlgorithm);
        }

        let data = decode::<Value>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::InvalidAlgorithm => TokenError::UnexpectedAlgorithm,
                // header already parsed, so these come from the claims segment
                ErrorKind::Json(_) | ErrorKind::Utf8(_) => TokenError::ClaimsExtractionFailed,
                _ => TokenError::MalformedToken,
            }
        })?;

        match data.claims {
            Value::Object(claims) => Ok(claims),
            _ => Err(TokenError::ClaimsExtractionFailed),
        }
    }
}

/// `decode_header` fails on algorithm names jsonwebtoken has no variant for
/// (`none` among them). Those still count as a foreign algorithm.
fn classify_unreadable_header(token: &str) -> TokenError {
    let alg = token
        .split('.')
        .next()
        .and_then(|segment| URL_SAFE_NO_PAD.decode(segment.trim_end_matches('=')).ok())
        .and_then(|raw| serde_json::from_slice::<Value>(&raw).ok())
        .and_then(|header| header.get("alg").and_then(Value::as_str).map(str::to_owned));

    match alg {
        Some(alg) if !matches!(alg.as_str(), "HS256" | "HS384" | "HS512") => {
            TokenError::UnexpectedAlgorithm
        }
        _ => TokenError::MalformedToken,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "shared_secret_with_identity_api";

    fn codec() -> TokenCodec {
        TokenCodec::new(&SecretString::from(SECRET.to_string()))
    }

    fn sign(claims: &impl serde::Serialize, alg: Algorithm, secret: &str) -> String {
        encode(
            &Header::new(alg),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_decode_round_trip() {
        let original = json!({ "user_id": "u-1", "role": "admin", "iat": 1700000000 });
        let token = sign(&original, Algorithm::HS256, SECRET);

        let claims = codec().decode(&token).unwrap();
        assert_eq!(Value::Object(claims), original);
    }

    #[test]
    fn test_decode_accepts_other_hmac_widths() {
        let original = json!({ "user_id": "u-2", "role": "super_user" });
        let token = sign(&original, Algorithm::HS512, SECRET);

        let claims = codec().decode(&token).unwrap();
        assert_eq!(claims["role"], "super_user");
    }

    #[test]
    fn test_decode_does_not_enforce_expiry() {
        let expired = json!({ "user_id": "u-1", "exp": 1 });
        let token = sign(&expired, Algorithm::HS256, SECRET);

        assert!(codec().decode(&token).is_ok());
    }

    #[test]
    fn test_decode_rejects_other_secret() {
        let token = sign(&json!({ "user_id": "u-1" }), Algorithm::HS256, "another_secret");

        assert_eq!(codec().decode(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_decode_rejects_asymmetric_algorithm_before_signature() {
        // {"alg":"RS256","typ":"JWT"} . {"user_id":"u-1","role":"admin"} . junk
        let token = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.eyJ1c2VyX2lkIjoidS0xIiwicm9sZSI6ImFkbWluIn0.c2ln";

        assert_eq!(codec().decode(token), Err(TokenError::UnexpectedAlgorithm));
    }

    #[test]
    fn test_decode_rejects_unsigned_none_algorithm() {
        // {"alg":"none","typ":"JWT"} . {"user_id":"u-1","role":"admin"} . (empty)
        let token = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.eyJ1c2VyX2lkIjoidS0xIiwicm9sZSI6ImFkbWluIn0.";

        assert_eq!(codec().decode(token), Err(TokenError::UnexpectedAlgorithm));
    }

    #[test]
    fn test_decode_rejects_unknown_algorithm_name() {
        // {"alg":"XS999"}
        let token = "eyJhbGciOiJYUzk5OSJ9.eyJ1c2VyX2lkIjoidS0xIn0.c2ln";

        assert_eq!(codec().decode(token), Err(TokenError::UnexpectedAlgorithm));
    }

    #[test]
    fn test_decode_rejects_malformed_tokens() {
        assert_eq!(codec().decode("not-a-token"), Err(TokenError::MalformedToken));
        assert_eq!(codec().decode(""), Err(TokenError::MalformedToken));
        // header without an alg
        assert_eq!(
            codec().decode("eyJ0eXAiOiJKV1QifQ.eyJ1c2VyX2lkIjoidS0xIiwicm9sZSI6ImFkbWluIn0.c2ln"),
            Err(TokenError::MalformedToken)
        );
    }

    #[test]
    fn test_decode_rejects_non_mapping_claims() {
        let token = sign(&"just-a-string", Algorithm::HS256, SECRET);

        assert_eq!(
            codec().decode(&token),
            Err(TokenError::ClaimsExtractionFailed)
        );
    }
}
