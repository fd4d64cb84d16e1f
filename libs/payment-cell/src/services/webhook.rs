use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

use crate::models::PaymentError;

type HmacSha256 = Hmac<Sha256>;

struct SignatureHeader {
    timestamp: i64,
    signatures: Vec<Vec<u8>>,
}

/// `t=<unix>,v1=<hex>[,v1=<hex>...]`; other schemes are ignored.
fn parse_header(header: &str) -> Option<SignatureHeader> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for item in header.split(',') {
        let (key, value) = item.trim().split_once('=')?;
        match key {
            "t" => timestamp = value.parse::<i64>().ok(),
            "v1" => signatures.extend(hex::decode(value).ok()),
            _ => {}
        }
    }

    Some(SignatureHeader {
        timestamp: timestamp?,
        signatures,
    })
}

/// Checks a `Stripe-Signature` header against the raw request body.
/// An empty secret never verifies.
pub fn verify_signature(
    payload: &[u8],
    header: Option<&str>,
    secret: &str,
    tolerance_secs: i64,
    now: i64,
) -> Result<(), PaymentError> {
    if secret.is_empty() {
        debug!("Webhook secret is not set");
        return Err(PaymentError::InvalidSignature);
    }

    let parsed = header.and_then(parse_header).ok_or(PaymentError::InvalidSignature)?;
    if (now - parsed.timestamp).abs() > tolerance_secs {
        debug!("Webhook timestamp {} outside tolerance", parsed.timestamp);
        return Err(PaymentError::InvalidSignature);
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| PaymentError::InvalidSignature)?;
    mac.update(parsed.timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);

    let verified = parsed
        .signatures
        .iter()
        .any(|signature| mac.clone().verify_slice(signature).is_ok());

    if verified {
        Ok(())
    } else {
        Err(PaymentError::InvalidSignature)
    }
}
