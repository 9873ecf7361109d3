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

use std::fmt::{self, Display, Formatter};

use http::StatusCode;
use pushsign_core::{Error, Result};
use serde::Deserialize;
use serde_json::Value;

/// A single error entry reported by the api.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    /// Machine readable error code.
    pub code: String,
    /// Optional human readable message.
    #[serde(default)]
    pub message: Option<String>,
}

/// Ordered error entries of a failed call.
///
/// Attached as the source of [`pushsign_core::ErrorKind::RequestFailed`] errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiErrors(pub Vec<ApiError>);

impl ApiErrors {
    /// Error codes in the order the api reported them.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|e| e.code.as_str())
    }
}

impl Display for ApiErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for code in self.codes() {
            writeln!(f, "{code}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiErrors {}

/// Decoded api response.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// The call succeeded, payload is returned untouched.
    Success(Value),
    /// The api reported one or more errors.
    Failure(ApiErrors),
}

#[derive(Deserialize)]
struct ErrorList {
    errors: Vec<ApiError>,
}

impl ApiResponse {
    /// Decode a response body.
    ///
    /// The status code is only used for error messages: a body carrying a
    /// non-empty `errors` list is a failure whatever the status says, anything
    /// else is a success. An empty body decodes to `null`.
    pub fn decode(status: StatusCode, body: &[u8]) -> Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(ApiResponse::Success(Value::Null));
        }

        let value: Value = serde_json::from_slice(body).map_err(|e| {
            Error::unexpected(format!("response body is not valid json (status {status})"))
                .with_source(e)
        })?;

        let has_errors = match value.get("errors") {
            Some(Value::Array(errors)) => !errors.is_empty(),
            Some(Value::Null) | None => false,
            Some(_) => {
                return Err(Error::unexpected(format!(
                    "response field errors is not a list (status {status})"
                )))
            }
        };
        if !has_errors {
            return Ok(ApiResponse::Success(value));
        }

        let list: ErrorList = serde_json::from_value(value).map_err(|e| {
            Error::unexpected(format!("response errors are malformed (status {status})"))
                .with_source(e)
        })?;
        Ok(ApiResponse::Failure(ApiErrors(list.errors)))
    }

    /// Turn the response into the payload, or a `RequestFailed` error.
    pub fn into_result(self) -> Result<Value> {
        match self {
            ApiResponse::Success(value) => Ok(value),
            ApiResponse::Failure(errors) => {
                Err(Error::request_failed(errors.to_string()).with_source(errors))
            }
        }
    }
}
