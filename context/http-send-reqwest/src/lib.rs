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

//! Reqwest-based transport for pushsign.
//!
//! `ReqwestHttpSend` implements `HttpSend` from `pushsign_core`. Requests
//! carrying the [`DebugProxy`] extension are sent through a second client
//! configured with a local inspection proxy, [`DEFAULT_DEBUG_PROXY`] unless
//! overridden.
//!
//! ## Example
//!
//! ```no_run
//! use pushsign_core::Context;
//! use pushsign_http_send_reqwest::ReqwestHttpSend;
//!
//! # fn example() -> pushsign_core::Result<()> {
//! let http = ReqwestHttpSend::default().with_debug_proxy("http://127.0.0.1:9090")?;
//! let ctx = Context::new().with_http_send(http);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::BodyExt;
use log::debug;
use pushsign_core::{DebugProxy, Error, HttpSend, Result};
use reqwest::{Client, Proxy, Request};

/// Default address of the local inspection proxy used in debug mode.
pub const DEFAULT_DEBUG_PROXY: &str = "http://127.0.0.1:8888";

/// Reqwest-based implementation of the `HttpSend` trait.
#[derive(Debug, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
    debug_client: Client,
}

impl Default for ReqwestHttpSend {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    ///
    /// Debug requests go through [`DEFAULT_DEBUG_PROXY`].
    ///
    /// # Panics
    ///
    /// Like `reqwest::Client::new`, panics if the debug client cannot be built.
    pub fn new(client: Client) -> Self {
        // SAFETY: DEFAULT_DEBUG_PROXY is a valid proxy url.
        let debug_client = build_debug_client(DEFAULT_DEBUG_PROXY)
            .expect("default debug proxy client must build");

        Self {
            client,
            debug_client,
        }
    }

    /// Route requests marked with [`DebugProxy`] through the given proxy instead.
    pub fn with_debug_proxy(mut self, proxy: &str) -> Result<Self> {
        self.debug_client = build_debug_client(proxy)?;
        Ok(self)
    }

    fn client_for(&self, req: &http::Request<Bytes>) -> &Client {
        if req.extensions().get::<DebugProxy>().is_none() {
            return &self.client;
        }

        debug!("routing {} through debug proxy", req.uri());
        &self.debug_client
    }
}

fn build_debug_client(proxy: &str) -> Result<Client> {
    let proxy = Proxy::all(proxy).map_err(|e| {
        Error::config_invalid(format!("invalid debug proxy {proxy}")).with_source(e)
    })?;

    Client::builder()
        .proxy(proxy)
        .build()
        .map_err(|e| Error::config_invalid("failed to build debug proxy client").with_source(e))
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let client = self.client_for(&req);
        let req = Request::try_from(req)
            .map_err(|e| Error::request_invalid("failed to convert request").with_source(e))?;

        let resp: http::Response<_> = client
            .execute(req)
            .await
            .map_err(|e| Error::transport("failed to send request").with_source(e))?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| Error::transport("failed to read response body").with_source(e))?;
        Ok(http::Response::from_parts(parts, bs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pushsign_core::ErrorKind;

    fn request(debug: bool) -> http::Request<Bytes> {
        let mut req = http::Request::new(Bytes::new());
        *req.uri_mut() = "https://api.example.com/a".parse().unwrap();
        if debug {
            req.extensions_mut().insert(DebugProxy);
        }
        req
    }

    #[test]
    fn test_default_routes_debug_through_proxy() {
        let http = ReqwestHttpSend::default();

        assert!(std::ptr::eq(http.client_for(&request(false)), &http.client));
        assert!(std::ptr::eq(
            http.client_for(&request(true)),
            &http.debug_client
        ));
    }

    #[test]
    fn test_with_debug_proxy() {
        let http = ReqwestHttpSend::default()
            .with_debug_proxy("http://127.0.0.1:9090")
            .unwrap();
        assert!(std::ptr::eq(
            http.client_for(&request(true)),
            &http.debug_client
        ));

        let err = ReqwestHttpSend::default()
            .with_debug_proxy("not a url")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }
}
