// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! HHMAC request signing.

use async_trait::async_trait;
use http::header::AUTHORIZATION;
use http::HeaderValue;
use http::Method;
use log::debug;
use pushsign_core::hash::{base64_hmac_sha256, hex_sha256};
use pushsign_core::time::format_iso8601;
use pushsign_core::{Context, Error, Result, SignRequest, SigningRequest};

use crate::constants::*;
use crate::credential::Credential;

/// RequestSigner that implements HHMAC signing.
///
/// The date is read from the context clock once per request and used in both
/// the string to sign and the `Authorization` header.
#[derive(Debug, Default)]
pub struct RequestSigner {}

impl RequestSigner {
    /// Create a new signer.
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        ctx: &Context,
        req: &mut SigningRequest,
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let cred = credential.ok_or_else(|| Error::signing("missing credential for push api"))?;

        let date = format_iso8601(ctx.now());
        let signature = sign(
            cred,
            &req.method,
            &req.url,
            &date,
            req.content_type()?,
            req.body.as_deref(),
        )?;

        let mut value = HeaderValue::from_str(&authorization(cred.key_id(), &signature, &date))?;
        value.set_sensitive(true);
        req.headers.insert(AUTHORIZATION, value);

        Ok(())
    }
}

/// Construct the canonical string to sign.
///
/// ## Format
///
/// ```text
/// VERB + URL + DATE [+ CONTENT-TYPE + BODY]
/// ```
///
/// No separators are inserted. Content type and body are only appended for
/// writes: a `GET` never covers them, even if they are supplied.
pub fn string_to_sign(
    method: &Method,
    url: &str,
    date: &str,
    content_type: Option<&str>,
    body: Option<&[u8]>,
) -> Vec<u8> {
    let is_write = *method != Method::GET;
    let content_type = content_type.filter(|_| is_write).unwrap_or_default();
    let body = body.filter(|_| is_write).unwrap_or_default();

    let mut s = Vec::with_capacity(
        method.as_str().len() + url.len() + date.len() + content_type.len() + body.len(),
    );
    s.extend_from_slice(method.as_str().as_bytes());
    s.extend_from_slice(url.as_bytes());
    s.extend_from_slice(date.as_bytes());
    s.extend_from_slice(content_type.as_bytes());
    s.extend_from_slice(body);

    debug!(
        "string to sign: {method}{url}{date}{content_type} + {} body bytes (sha256 {})",
        body.len(),
        hex_sha256(body)
    );
    s
}

/// Compute the base64 encoded HMAC-SHA256 signature of a request.
///
/// Fails with [`pushsign_core::ErrorKind::Signing`] if the secret is not valid base64.
pub fn sign(
    cred: &Credential,
    method: &Method,
    url: &str,
    date: &str,
    content_type: Option<&str>,
    body: Option<&[u8]>,
) -> Result<String> {
    let key = cred.secret_key()?;
    let content = string_to_sign(method, url, date, content_type, body);

    Ok(base64_hmac_sha256(&key, &content))
}

/// Build the `Authorization` header value: `HHMAC; key=<k>; signature=<s>; date=<t>`.
pub fn authorization(key_id: &str, signature: &str, date: &str) -> String {
    format!("{HHMAC}; key={key_id}; signature={signature}; date={date}")
}

/// Build the full `Authorization` header line.
pub fn sign_header(key_id: &str, signature: &str, date: &str) -> String {
    format!("Authorization: {}", authorization(key_id, signature, date))
}
