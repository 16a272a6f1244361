//! Signed-URL authorization.
//!
//! A URL is authorized by a party holding the shared signing key. The
//! signature is a lowercase hex HMAC-SHA256 over the canonical message: every
//! query parameter except `signature`, sorted by name, with empty values left
//! out, each rendered as `name=value\n`.
//!
//! The `valid-to` parameter bounds the authorization in time. It is part of the
//! signed message, so it cannot be extended without the key.
//!
//! ```rust
//! use webtts::signing::{QueryParams, SignatureVerifier};
//!
//! let verifier = SignatureVerifier::new("s3cr3t").unwrap();
//! let params = QueryParams::from_pairs([("text", "hello"), ("valid-to", "2030-01-01T00:00:00Z")]);
//! let signature = verifier.sign(&params);
//! assert!(verifier.verify(&params, &signature).is_ok());
//! ```

mod params;

pub use params::QueryParams;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{Error, Result};

/// Query parameter carrying the signature. Never part of the signed message.
pub const SIGNATURE_PARAM: &str = "signature";

/// Query parameter carrying the RFC 3339 expiry of the URL.
pub const VALID_TO_PARAM: &str = "valid-to";

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies request parameters with the shared key.
#[derive(Clone)]
pub struct SignatureVerifier {
    mac: HmacSha256,
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("key", &"<redacted>")
            .finish()
    }
}

impl SignatureVerifier {
    /// Create a verifier for `key`. An empty key is a setup error.
    pub fn new(key: impl AsRef<[u8]>) -> Result<Self> {
        let key = key.as_ref();
        if key.is_empty() {
            return Err(Error::setup("signature key must not be empty"));
        }
        let mac = HmacSha256::new_from_slice(key)
            .map_err(|e| Error::setup(format!("invalid signature key: {}", e)))?;
        Ok(Self { mac })
    }

    /// Build the canonical message for `params`.
    pub fn canonical_message(params: &QueryParams) -> String {
        let mut message = String::new();
        for (name, value) in params.iter() {
            if name == SIGNATURE_PARAM || value.is_empty() {
                continue;
            }
            message.push_str(name);
            message.push('=');
            message.push_str(value);
            message.push('\n');
        }
        message
    }

    /// Lowercase hex signature for `params`.
    pub fn sign(&self, params: &QueryParams) -> String {
        let digest = self.digest(params).finalize().into_bytes();
        digest.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Check `claimed` against the signature of `params` in constant time.
    pub fn verify(&self, params: &QueryParams, claimed: &str) -> Result<()> {
        let claimed = decode_lower_hex(claimed).ok_or(Error::SignatureMismatch)?;
        self.digest(params)
            .verify_slice(&claimed)
            .map_err(|_| Error::SignatureMismatch)
    }

    /// Encode `params` as a query string with its `signature` appended.
    ///
    /// Any `signature` already present in `params` is replaced.
    pub fn signed_query(&self, params: &QueryParams) -> String {
        let signature = self.sign(params);
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (name, value) in params.iter().filter(|(name, _)| *name != SIGNATURE_PARAM) {
            serializer.append_pair(name, value);
        }
        serializer.append_pair(SIGNATURE_PARAM, &signature);
        serializer.finish()
    }

    fn digest(&self, params: &QueryParams) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(Self::canonical_message(params).as_bytes());
        mac
    }
}

/// Parse `valid_to` and require it to lie strictly after `now`.
///
/// A missing or unparsable value fails the same way as a past one.
pub fn check_expiry(valid_to: Option<&str>, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let expiry = valid_to
        .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
        .map(|t| t.with_timezone(&Utc))
        .ok_or(Error::Expired)?;
    if expiry <= now {
        return Err(Error::Expired);
    }
    Ok(expiry)
}

fn decode_lower_hex(s: &str) -> Option<Vec<u8>> {
    fn nibble(c: u8) -> Option<u8> {
        match c {
            b'0'..=b'9' => Some(c - b'0'),
            b'a'..=b'f' => Some(c - b'a' + 10),
            _ => None,
        }
    }

    if s.len() % 2 != 0 {
        return None;
    }
    s.as_bytes()
        .chunks_exact(2)
        .map(|pair| Some(nibble(pair[0])? << 4 | nibble(pair[1])?))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn verifier() -> SignatureVerifier {
        SignatureVerifier::new("s3cr3t").unwrap()
    }

    #[test]
    fn test_canonical_message_format() {
        let params = QueryParams::from_pairs([
            ("valid-to", "2030-01-01T00:00:00Z"),
            ("text", "hello"),
            ("lang", "en-US"),
            ("voice", ""),
            ("signature", "deadbeef"),
        ]);
        assert_eq!(
            SignatureVerifier::canonical_message(&params),
            "lang=en-US\ntext=hello\nvalid-to=2030-01-01T00:00:00Z\n"
        );
    }

    #[test]
    fn test_known_signatures() {
        let v = verifier();
        assert_eq!(
            v.sign(&QueryParams::from_pairs([("a", "1"), ("b", "")])),
            "9156d0354328596ad99ca62d1726f7df084b868ea5c3593e5dc0ac38a3bde4aa"
        );
        let params = QueryParams::from_pairs([
            ("text", "hello"),
            ("lang", "en-US"),
            ("valid-to", "2030-01-01T00:00:00Z"),
        ]);
        assert_eq!(
            v.sign(&params),
            "eb7be5ff647cb35cbe25b1bf4a1518e15a39f5ad8fb0a4cd9fee5bb47d92e6b5"
        );
    }

    #[test]
    fn test_empty_key_rejected() {
        let err = SignatureVerifier::new("").unwrap_err();
        assert!(matches!(err, Error::Setup { .. }));
    }

    #[test]
    fn test_uppercase_or_odd_hex_is_mismatch() {
        let params = QueryParams::from_pairs([("text", "hello")]);
        let sig = verifier().sign(&params);
        assert!(matches!(
            verifier().verify(&params, &sig.to_uppercase()),
            Err(Error::SignatureMismatch)
        ));
        assert!(matches!(
            verifier().verify(&params, &sig[1..]),
            Err(Error::SignatureMismatch)
        ));
        assert!(matches!(verifier().verify(&params, ""), Err(Error::SignatureMismatch)));
    }

    #[test]
    fn test_signed_query_round_trip() {
        let v = verifier();
        let params = QueryParams::from_pairs([
            ("text", "hello world & more"),
            ("valid-to", "2030-01-01T00:00:00+02:00"),
        ]);
        let query = v.signed_query(&params);
        let parsed = QueryParams::parse(&query);
        let signature = parsed.get(SIGNATURE_PARAM).unwrap();
        assert!(v.verify(&parsed, signature).is_ok());
        assert_eq!(parsed.get("text"), Some("hello world & more"));
    }

    #[test]
    fn test_expiry_boundaries() {
        let now = DateTime::parse_from_rfc3339("2026-10-18T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert!(matches!(
            check_expiry(Some("2026-10-18T12:00:00Z"), now),
            Err(Error::Expired)
        ));
        assert!(matches!(
            check_expiry(Some("2026-10-18T11:59:59Z"), now),
            Err(Error::Expired)
        ));
        let later = check_expiry(Some("2026-10-18T14:00:01+02:00"), now).unwrap();
        assert_eq!(later, now + Duration::seconds(1));
    }

    #[test]
    fn test_expiry_parse_failures_are_expired() {
        let now = Utc::now();
        for raw in [None, Some(""), Some("tomorrow"), Some("2030-01-01"), Some("1893456000")] {
            assert!(matches!(check_expiry(raw, now), Err(Error::Expired)), "{:?}", raw);
        }
    }
}
