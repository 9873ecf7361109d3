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

//! Signed client for the push publishing api.
//!
//! ## Example
//!
//! ```no_run
//! use pushsign_core::{Context, OsEnv, Result};
//! use pushsign_file_read_tokio::TokioFileRead;
//! use pushsign_http_send_reqwest::ReqwestHttpSend;
//! use pushsign_push_api::{Client, Config};
//! use serde_json::json;
//!
//! # async fn example() -> Result<()> {
//! let ctx = Context::new()
//!     .with_file_read(TokioFileRead)
//!     .with_http_send(ReqwestHttpSend::default())
//!     .with_env(OsEnv);
//!
//! // Reads PUSH_API_KEY_ID, PUSH_API_SECRET and PUSH_API_DEBUG.
//! let client = Client::from_config(ctx, Config::default());
//!
//! let article = json!({"title": "Hello", "components": []});
//! let created = client
//!     .post(
//!         "https://api.example.com/channels/abc/articles",
//!         &article,
//!         &["~/images/cover.jpg"],
//!     )
//!     .await?;
//! println!("{created}");
//! # Ok(())
//! # }
//! ```

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::*;

mod multipart;
pub use multipart::{
    GenerateBoundary, MultipartBody, MultipartBuilder, Part, RandomBoundary, StaticBoundary,
};

mod sign_request;
pub use sign_request::{authorization, sign, sign_header, string_to_sign, RequestSigner};

mod response;
pub use response::{ApiError, ApiErrors, ApiResponse};

mod client;
pub use client::Client;

mod constants;
pub use constants::{
    DOCUMENT_FIELD_NAME, DOCUMENT_FILE_NAME, PUSH_API_DEBUG, PUSH_API_KEY_ID, PUSH_API_SECRET,
};
