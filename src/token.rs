// 🔏 Token Issuer - signed registration assertions
// Compact JWS (HS256) with a fixed claim set and a 1 hour TTL

use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Issuer name embedded in every token
pub const ISSUER: &str = "cpf-auth";

/// Token validity window: 1 hour
pub const TOKEN_TTL_SECS: i64 = 3600;

const KEY_LEN: usize = 32;

// ============================================================================
// CLAIMS
// ============================================================================

/// Claim set asserted by an issued token.
///
/// The schema is fixed: subject (the CPF), issuer, the registration flag and
/// the expiry timestamp. Nothing else is embedded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the validated CPF
    pub sub: String,

    /// Issuing service name
    pub iss: String,

    /// Whether a matching customer record exists
    pub registered: bool,

    /// Expiration, unix seconds
    pub exp: i64,
}

// ============================================================================
// SIGNING KEY
// ============================================================================

/// Symmetric signing key, immutable for the lifetime of the process.
#[derive(Clone)]
pub struct SigningKey {
    bytes: [u8; KEY_LEN],
}

impl SigningKey {
    /// Generate a fresh key from OS entropy (once, at process start)
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; KEY_LEN];
        getrandom::fill(&mut bytes)
            .map_err(|e| anyhow!("Failed to gather entropy for signing key: {}", e))?;
        Ok(SigningKey { bytes })
    }

    /// Load an externally supplied key (64 hex characters)
    pub fn from_hex(encoded: &str) -> Result<Self> {
        let decoded = hex::decode(encoded.trim()).context("Signing key is not valid hex")?;
        let bytes: [u8; KEY_LEN] = decoded
            .try_into()
            .map_err(|_| anyhow!("Signing key must be exactly {} bytes", KEY_LEN))?;
        Ok(SigningKey { bytes })
    }

    fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material
        write!(f, "SigningKey([{} bytes])", KEY_LEN)
    }
}

// ============================================================================
// TOKEN ISSUER
// ============================================================================

/// Issues signed registration tokens.
///
/// The issuer never inspects or validates the CPF; the pipeline guarantees
/// only validated identifiers reach this stage.
pub struct TokenIssuer {
    key: SigningKey,
}

impl TokenIssuer {
    pub fn new(key: SigningKey) -> Self {
        TokenIssuer { key }
    }

    /// Issue a token asserting `cpf` and its registration status, expiring
    /// exactly one hour from now
    pub fn issue(&self, cpf: &str, registered: bool) -> Result<String> {
        let claims = Claims {
            sub: cpf.to_string(),
            iss: ISSUER.to_string(),
            registered,
            exp: Utc::now().timestamp() + TOKEN_TTL_SECS,
        };
        self.issue_claims(&claims)
    }

    /// Sign a prepared claim set into the compact header.payload.signature form
    fn issue_claims(&self, claims: &Claims) -> Result<String> {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD
            .encode(serde_json::to_vec(claims).context("Failed to serialize token claims")?);

        let signing_input = format!("{}.{}", header, payload);

        let mut mac = HmacSha256::new_from_slice(self.key.as_bytes())
            .context("Signing key rejected by HMAC")?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{}.{}", signing_input, signature))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> SigningKey {
        SigningKey::from_hex(&"ab".repeat(32)).unwrap()
    }

    /// Decode the payload segment back into claims (issuance-only crate, so
    /// tests decode by hand)
    fn decode_claims(token: &str) -> Claims {
        let payload = token.split('.').nth(1).unwrap();
        let bytes = URL_SAFE_NO_PAD.decode(payload).unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_token_has_three_segments() {
        let issuer = TokenIssuer::new(test_key());
        let token = issuer.issue("52998224725", true).unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_header_declares_hs256() {
        let issuer = TokenIssuer::new(test_key());
        let token = issuer.issue("52998224725", true).unwrap();

        let header = token.split('.').next().unwrap();
        let decoded: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(header).unwrap()).unwrap();
        assert_eq!(decoded["alg"], "HS256");
        assert_eq!(decoded["typ"], "JWT");
    }

    #[test]
    fn test_claims_content() {
        let issuer = TokenIssuer::new(test_key());
        let before = Utc::now().timestamp();
        let token = issuer.issue("52998224725", true).unwrap();
        let after = Utc::now().timestamp();

        let claims = decode_claims(&token);
        assert_eq!(claims.sub, "52998224725");
        assert_eq!(claims.iss, ISSUER);
        assert!(claims.registered);
        // exp is exactly issuance + TTL; bound it by the clock readings
        assert!(claims.exp >= before + TOKEN_TTL_SECS);
        assert!(claims.exp <= after + TOKEN_TTL_SECS);
    }

    #[test]
    fn test_unregistered_flag_propagates() {
        let issuer = TokenIssuer::new(test_key());
        let token = issuer.issue("52998224725", false).unwrap();
        assert!(!decode_claims(&token).registered);
    }

    #[test]
    fn test_signature_is_deterministic_for_same_claims() {
        let issuer = TokenIssuer::new(test_key());
        let claims = Claims {
            sub: "52998224725".to_string(),
            iss: ISSUER.to_string(),
            registered: true,
            exp: 1_700_000_000,
        };

        let a = issuer.issue_claims(&claims).unwrap();
        let b = issuer.issue_claims(&claims).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_keys_produce_different_signatures() {
        let claims = Claims {
            sub: "52998224725".to_string(),
            iss: ISSUER.to_string(),
            registered: true,
            exp: 1_700_000_000,
        };

        let a = TokenIssuer::new(test_key()).issue_claims(&claims).unwrap();
        let b = TokenIssuer::new(SigningKey::from_hex(&"cd".repeat(32)).unwrap())
            .issue_claims(&claims)
            .unwrap();

        let sig = |t: &str| t.rsplit('.').next().unwrap().to_string();
        assert_ne!(sig(&a), sig(&b));
    }

    #[test]
    fn test_key_from_hex_rejects_bad_input() {
        assert!(SigningKey::from_hex("not hex").is_err());
        assert!(SigningKey::from_hex("abcd").is_err());
        assert!(SigningKey::from_hex(&"ab".repeat(33)).is_err());
    }

    #[test]
    fn test_key_debug_hides_material() {
        let rendered = format!("{:?}", test_key());
        assert!(!rendered.contains("ab"));
    }
}
