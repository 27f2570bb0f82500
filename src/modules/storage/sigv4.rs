//! Minimal AWS Signature v4 signer.
//!
//! rust-s3 has no bucket-policy call, so the policy request that opens the
//! public prefix for anonymous reads is signed by hand.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::core::error::{AppError, Result};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SIGNED_HEADERS: &str = "host;x-amz-content-sha256;x-amz-date";

pub(super) struct SigV4Signer {
    access_key: String,
    secret_key: String,
    region: String,
    service: &'static str,
}

/// A request to be signed. Query must already be in canonical form.
pub(super) struct CanonicalRequest<'a> {
    pub method: &'a str,
    pub host: &'a str,
    pub uri: &'a str,
    pub query: &'a str,
    pub payload: &'a [u8],
}

/// Header values to send with the signed request
#[derive(Debug)]
pub(super) struct SignedHeaders {
    pub amz_date: String,
    pub payload_hash: String,
    pub authorization: String,
}

impl SigV4Signer {
    pub fn s3(access_key: &str, secret_key: &str, region: &str) -> Self {
        Self {
            access_key: access_key.to_string(),
            secret_key: secret_key.to_string(),
            region: region.to_string(),
            service: "s3",
        }
    }

    pub fn sign(
        &self,
        request: &CanonicalRequest<'_>,
        now: DateTime<Utc>,
    ) -> Result<SignedHeaders> {
        let date_stamp = now.format("%Y%m%d").to_string();
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let payload_hash = hex::encode(Sha256::digest(request.payload));

        let canonical_headers = format!(
            "host:{}\nx-amz-content-sha256:{}\nx-amz-date:{}\n",
            request.host, payload_hash, amz_date
        );
        let canonical_request = format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            request.method,
            request.uri,
            request.query,
            canonical_headers,
            SIGNED_HEADERS,
            payload_hash
        );

        let scope = format!(
            "{}/{}/{}/aws4_request",
            date_stamp, self.region, self.service
        );
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            amz_date,
            scope,
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let signing_key = self.signing_key(&date_stamp)?;
        let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes())?);

        Ok(SignedHeaders {
            amz_date,
            payload_hash,
            authorization: format!(
                "{} Credential={}/{}, SignedHeaders={}, Signature={}",
                ALGORITHM, self.access_key, scope, SIGNED_HEADERS, signature
            ),
        })
    }

    fn signing_key(&self, date_stamp: &str) -> Result<Vec<u8>> {
        let k_date = hmac_sha256(
            format!("AWS4{}", self.secret_key).as_bytes(),
            date_stamp.as_bytes(),
        )?;
        let k_region = hmac_sha256(&k_date, self.region.as_bytes())?;
        let k_service = hmac_sha256(&k_region, self.service.as_bytes())?;
        hmac_sha256(&k_service, b"aws4_request")
    }
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| AppError::Internal(format!("HMAC key error: {}", e)))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}
