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

use std::sync::Arc;

use http::Method;
use log::debug;
use pushsign_core::{Context, DebugProxy, ProvideCredential, Result, Signer, SigningRequest};
use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::constants::*;
use crate::credential::Credential;
use crate::multipart::{GenerateBoundary, MultipartBuilder, RandomBoundary};
use crate::provide_credential::ConfigCredentialProvider;
use crate::response::ApiResponse;
use crate::sign_request::RequestSigner;

/// Client for the push api.
///
/// Every call builds a fresh body and signature. The only state kept between
/// calls is the credential, the boundary generator and the debug flag, so a
/// client can be cloned and shared across tasks freely.
#[derive(Clone, Debug)]
pub struct Client {
    signer: Signer<Credential>,
    boundary: Arc<dyn GenerateBoundary>,
    debug: bool,
}

impl Client {
    /// Create a new client loading its credential from `loader`.
    pub fn new(ctx: Context, loader: impl ProvideCredential<Credential = Credential>) -> Self {
        Self {
            signer: Signer::new(ctx, loader, RequestSigner::new()),
            boundary: Arc::new(RandomBoundary),
            debug: false,
        }
    }

    /// Create a new client from config, filling missing values from env.
    pub fn from_config(ctx: Context, config: Config) -> Self {
        let config = config.from_env(&ctx);
        let debug = config.debug;

        Self::new(ctx, ConfigCredentialProvider::new(Arc::new(config))).with_debug(debug)
    }

    /// Route requests through the transport's inspection proxy.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Replace the boundary generator used for `post` bodies.
    pub fn with_boundary_generator(mut self, generator: impl GenerateBoundary) -> Self {
        self.boundary = Arc::new(generator);
        self
    }

    /// Whether debug routing is enabled.
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Publish `document` with optional attachments.
    ///
    /// The body is a multipart form: the JSON document first, then one part
    /// per attachment in the given order. Attachments are read before
    /// anything is signed or sent.
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        url: &str,
        document: &T,
        attachments: &[&str],
    ) -> Result<Value> {
        let ctx = self.signer.context();

        let mut builder = MultipartBuilder::from_generator(self.boundary.as_ref())?;
        debug!("building multipart body with boundary {}", builder.boundary());
        builder.add_json_part(DOCUMENT_FIELD_NAME, DOCUMENT_FILE_NAME, document)?;
        for path in attachments {
            builder.add_file_part(ctx, path).await?;
        }
        let body = builder.close();

        let req = SigningRequest::new(Method::POST, url)
            .with_body(&body.content_type(), body.into_content())?;
        self.dispatch(req).await
    }

    /// Fetch `url`.
    pub async fn get(&self, url: &str) -> Result<Value> {
        self.dispatch(SigningRequest::new(Method::GET, url)).await
    }

    async fn dispatch(&self, mut req: SigningRequest) -> Result<Value> {
        self.signer.sign(&mut req).await?;

        let mut req = req.into_http_request()?;
        if self.debug {
            req.extensions_mut().insert(DebugProxy);
        }

        debug!(
            "sending {} {} (debug: {})",
            req.method(),
            req.uri(),
            self.debug
        );
        let resp = self.signer.context().http_send(req).await?;
        debug!("received response with status {}", resp.status());

        ApiResponse::decode(resp.status(), resp.body())?.into_result()
    }
}
