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

use crate::Result;
use bytes::Bytes;
use http::header::CONTENT_LENGTH;
use http::header::CONTENT_TYPE;
use http::HeaderMap;
use http::HeaderValue;
use http::Method;
use http::Uri;
use std::str::FromStr;

/// Request extension asking the [`crate::HttpSend`] implementation to route
/// the request through its local inspection proxy instead of the real host.
///
/// Signatures are identical with or without it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugProxy;

/// Signing context for request.
///
/// The url is kept exactly as the caller wrote it: it is part of the string
/// to sign, and parsing it into a `Uri` could normalize it (for example by
/// appending a trailing `/`).
#[derive(Debug, Clone)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// Target url, verbatim.
    pub url: String,
    /// HTTP headers.
    pub headers: HeaderMap,
    /// Request body, `None` for reads.
    pub body: Option<Bytes>,
}

impl SigningRequest {
    /// Create a new signing request without body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Attach a body together with its content type.
    pub fn with_body(mut self, content_type: &str, body: impl Into<Bytes>) -> Result<Self> {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_str(content_type)?);
        self.body = Some(body.into());
        Ok(self)
    }

    /// Get the content type of the body if set.
    pub fn content_type(&self) -> Result<Option<&str>> {
        match self.headers.get(CONTENT_TYPE) {
            Some(v) => Ok(Some(v.to_str().map_err(|e| {
                crate::Error::request_invalid("content type is not valid ascii").with_source(e)
            })?)),
            None => Ok(None),
        }
    }

    /// Convert the signed request into an `http::Request` ready for dispatch.
    ///
    /// `Content-Length` is set from the body so the transport never needs to
    /// re-frame it.
    pub fn into_http_request(self) -> Result<http::Request<Bytes>> {
        let uri = Uri::from_str(&self.url)?;
        let body = self.body.unwrap_or_default();
        let length = body.len();

        let mut req = http::Request::builder()
            .method(self.method)
            .uri(uri)
            .body(body)?;
        *req.headers_mut() = self.headers;
        if length > 0 {
            req.headers_mut()
                .insert(CONTENT_LENGTH, HeaderValue::from(length));
        }

        Ok(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::AUTHORIZATION;

    #[test]
    fn test_into_http_request_get() -> Result<()> {
        let mut req = SigningRequest::new(Method::GET, "https://api.example.com/a");
        req.headers
            .insert(AUTHORIZATION, HeaderValue::from_static("HHMAC; key=k"));

        let req = req.into_http_request()?;
        assert_eq!(req.method(), Method::GET);
        assert_eq!(req.uri().to_string(), "https://api.example.com/a");
        assert_eq!(req.headers()[AUTHORIZATION], "HHMAC; key=k");
        assert!(req.headers().get(CONTENT_LENGTH).is_none());
        assert!(req.body().is_empty());
        Ok(())
    }

    #[test]
    fn test_into_http_request_with_body() -> Result<()> {
        let req = SigningRequest::new(Method::POST, "https://api.example.com/a")
            .with_body("multipart/form-data; boundary=xyz", "hello")?;
        assert_eq!(
            req.content_type()?,
            Some("multipart/form-data; boundary=xyz")
        );

        let req = req.into_http_request()?;
        assert_eq!(req.headers()[CONTENT_TYPE], "multipart/form-data; boundary=xyz");
        assert_eq!(req.headers()[CONTENT_LENGTH], "5");
        assert_eq!(req.body().as_ref(), b"hello");
        Ok(())
    }

    #[test]
    fn test_into_http_request_invalid_url() {
        let req = SigningRequest::new(Method::GET, "not a url");
        let err = req.into_http_request().unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::RequestInvalid);
    }

    #[test]
    fn test_url_kept_verbatim() {
        let req = SigningRequest::new(Method::GET, "https://api.example.com");
        assert_eq!(req.url, "https://api.example.com");
        assert_eq!(req.content_type().unwrap(), None);
    }
}
