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

//! Tokio-based file reading implementation for pushsign.
//!
//! This crate provides `TokioFileRead`, an async file reader that implements
//! the `FileRead` trait from `pushsign_core` using Tokio's file system operations.
//!
//! Attachments are read entirely into memory before the request is signed,
//! since the signature covers every body byte.
//!
//! ## Example
//!
//! ```no_run
//! use pushsign_core::{Context, OsEnv};
//! use pushsign_file_read_tokio::TokioFileRead;
//!
//! #[tokio::main]
//! async fn main() {
//!     let ctx = Context::new()
//!         .with_file_read(TokioFileRead)
//!         .with_env(OsEnv);
//!
//!     match ctx.file_read("/path/to/image.jpg").await {
//!         Ok(content) => println!("Read {} bytes", content.len()),
//!         Err(e) => eprintln!("Failed to read file: {}", e),
//!     }
//! }
//! ```

use async_trait::async_trait;
use pushsign_core::{Error, FileRead, Result};
use std::io::ErrorKind;

/// Tokio-based implementation of the `FileRead` trait.
///
/// Every failure is reported with [`pushsign_core::ErrorKind::FileRead`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileRead;

#[async_trait]
impl FileRead for TokioFileRead {
    async fn file_read(&self, path: &str) -> Result<Vec<u8>> {
        tokio::fs::read(path).await.map_err(|e| {
            let message = match e.kind() {
                ErrorKind::NotFound => format!("file {path} does not exist"),
                ErrorKind::PermissionDenied => format!("permission denied reading file {path}"),
                _ => format!("failed to read file {path}"),
            };
            Error::file_read(message).with_source(e)
        })
    }
}
