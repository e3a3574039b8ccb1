use actix_web::http::header::HeaderMap;
use hmac::{Hmac, Mac};
use log::warn;
use sha2::Sha256;

pub const COMMUNITY_HEADER: &str = "X-Hugard-Community-Id";

type HmacSha256 = Hmac<Sha256>;

/// Checks a base64-encoded HMAC-SHA256 `signature` of `data`, in constant time. Signatures that are not valid base64
/// never match.
pub fn verify_hmac(secret: &str, data: &[u8], signature: &str) -> bool {
    let Ok(expected) = base64::decode(signature.trim()) else {
        return false;
    };
    match <HmacSha256 as Mac>::new_from_slice(secret.as_bytes()) {
        Ok(mut mac) => {
            mac.update(data);
            mac.verify_slice(&expected).is_ok()
        },
        Err(_) => false,
    }
}

/// Base64-encoded HMAC-SHA256 of `data` using `secret` as the key, i.e. what the gateway sends.
#[cfg(test)]
pub fn calculate_hmac(secret: &str, data: &[u8]) -> String {
    // HMAC accepts keys of any length, so this never fails
    <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
        .map(|mut mac| {
            mac.update(data);
            base64::encode(mac.finalize().into_bytes())
        })
        .unwrap_or_default()
}

/// Only plain identifiers may be used to build file paths and URLs from invoice references.
pub fn is_safe_reference(invoice_ref: &str) -> bool {
    !invoice_ref.is_empty()
        && invoice_ref.len() <= 64
        && invoice_ref.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// True if the request was sent on behalf of the configured community.
pub fn is_from_community(headers: &HeaderMap, community_id: &str) -> bool {
    match headers.get(COMMUNITY_HEADER).and_then(|v| v.to_str().ok()) {
        Some(id) if id == community_id => true,
        Some(id) => {
            warn!("💻️ Command received for community {id}, which is not served here. Denying access.");
            false
        },
        None => {
            warn!("💻️ Command received without a community id. Denying access.");
            false
        },
    }
}

#[cfg(test)]
mod test {
    use actix_web::http::header::{HeaderName, HeaderValue};

    use super::*;

    #[test]
    fn community_header() {
        let mut headers = HeaderMap::new();
        assert!(!is_from_community(&headers, "1234"));
        headers.insert(HeaderName::from_static("x-hugard-community-id"), HeaderValue::from_static("999"));
        assert!(!is_from_community(&headers, "1234"));
        headers.insert(HeaderName::from_static("x-hugard-community-id"), HeaderValue::from_static("1234"));
        assert!(is_from_community(&headers, "1234"));
    }

    #[test]
    fn hmac_matches_known_value() {
        // RFC 4231, test case 2
        let hmac = calculate_hmac("Jefe", b"what do ya want for nothing?");
        assert_eq!(hmac, "W9zBRr9gdU5qBCQmCJV1x1oAPwidJzmDnexYuWTsOEM=");
        assert!(verify_hmac("Jefe", b"what do ya want for nothing?", &hmac));
        assert!(!verify_hmac("Jefe", b"what do ya want for nothing!", &hmac));
        assert!(!verify_hmac("Jeff", b"what do ya want for nothing?", &hmac));
        assert!(!verify_hmac("Jefe", b"what do ya want for nothing?", "not base64!"));
    }

    #[test]
    fn safe_references() {
        assert!(is_safe_reference("8ZQ4XK2M"));
        assert!(is_safe_reference("a1b2-c3_d4"));
        assert!(!is_safe_reference("../secrets"));
        assert!(!is_safe_reference(""));
        assert!(!is_safe_reference("abc.svg"));
    }
}
