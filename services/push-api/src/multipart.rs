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

//! Deterministic `multipart/form-data` bodies.
//!
//! The signature covers every body byte, so the framing here is exact:
//!
//! ```text
//! --<boundary>\r\n
//! Content-Type: <type>\r\n
//! Content-Disposition: form-data; name="<name>"; filename="<filename>"; size=<len>\r\n
//! \r\n
//! <payload>\r\n
//! ...
//! --<boundary>--\r\n
//! ```

use std::fmt::{Debug, Formatter};
use std::path::Path;

use bytes::{BufMut, Bytes, BytesMut};
use log::debug;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Serialize;

use pushsign_core::{Context, Error, ErrorKind, Result};

use crate::constants::*;

const CRLF: &[u8] = b"\r\n";

/// GenerateBoundary produces the boundary of a new multipart body.
pub trait GenerateBoundary: Debug + Send + Sync + 'static {
    /// Generate a boundary token.
    fn generate_boundary(&self) -> String;
}

/// RandomBoundary generates a fresh alphanumeric boundary every time.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomBoundary;

impl GenerateBoundary for RandomBoundary {
    fn generate_boundary(&self) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(BOUNDARY_LENGTH)
            .map(char::from)
            .collect()
    }
}

/// StaticBoundary always returns the same boundary.
///
/// Useful for tests that assert exact bodies and signatures.
#[derive(Debug, Clone)]
pub struct StaticBoundary(String);

impl StaticBoundary {
    /// Create a new StaticBoundary.
    pub fn new(boundary: impl Into<String>) -> Self {
        Self(boundary.into())
    }
}

impl GenerateBoundary for StaticBoundary {
    fn generate_boundary(&self) -> String {
        self.0.clone()
    }
}

/// Part is one named section of a multipart body.
#[derive(Clone, PartialEq, Eq)]
pub struct Part {
    name: String,
    filename: String,
    content_type: String,
    payload: Bytes,
}

impl Debug for Part {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Part")
            .field("name", &self.name)
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("size", &self.payload.len())
            .finish()
    }
}

impl Part {
    /// Create a new part.
    pub fn new(
        name: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        payload: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            filename: filename.into(),
            content_type: content_type.into(),
            payload: payload.into(),
        }
    }

    /// Create a JSON part by serializing `document`.
    pub fn json<T: Serialize + ?Sized>(name: &str, filename: &str, document: &T) -> Result<Self> {
        let payload = serde_json::to_vec(document).map_err(|e| {
            Error::request_invalid("failed to serialize json document").with_source(e)
        })?;

        Ok(Self::new(name, filename, APPLICATION_JSON, payload))
    }

    /// Create a part from the file at `path`.
    ///
    /// The file's base name is used as both field name and filename, and the
    /// content type is guessed from its extension.
    pub async fn from_file(ctx: &Context, path: &str) -> Result<Self> {
        let expanded = ctx.expand_home_dir(path).ok_or_else(|| {
            Error::file_read(format!("cannot expand home dir in {path}: home dir not found"))
        })?;
        let filename = Path::new(&expanded)
            .file_name()
            .map(|v| v.to_string_lossy().to_string())
            .ok_or_else(|| Error::file_read(format!("{path} does not name a file")))?;

        let payload = ctx.file_read(&expanded).await.map_err(|e| {
            if e.kind() == ErrorKind::FileRead {
                e
            } else {
                Error::file_read(format!("failed to read file {path}")).with_source(e)
            }
        })?;
        let content_type = mime_guess::from_path(&expanded)
            .first_or_octet_stream()
            .to_string();

        Ok(Self::new(filename.clone(), filename, content_type, payload))
    }

    /// Field name of this part.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Filename of this part.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Content type of this part.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Raw payload of this part.
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Render this part, including its leading delimiter and trailing CRLF.
    pub fn render(&self, boundary: &str) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.payload.len() + 160);
        self.render_into(boundary, &mut buf);
        buf.freeze()
    }

    fn render_into(&self, boundary: &str, buf: &mut BytesMut) {
        buf.put_slice(b"--");
        buf.put_slice(boundary.as_bytes());
        buf.put_slice(CRLF);

        buf.put_slice(b"Content-Type: ");
        buf.put_slice(self.content_type.as_bytes());
        buf.put_slice(CRLF);

        buf.put_slice(b"Content-Disposition: form-data; name=\"");
        buf.put_slice(escape_quoted(&self.name).as_bytes());
        buf.put_slice(b"\"; filename=\"");
        buf.put_slice(escape_quoted(&self.filename).as_bytes());
        buf.put_slice(b"\"; size=");
        buf.put_slice(self.payload.len().to_string().as_bytes());
        buf.put_slice(CRLF);

        buf.put_slice(CRLF);
        buf.put_slice(&self.payload);
        buf.put_slice(CRLF);
    }
}

/// Escape a quoted header parameter. Line breaks are percent-encoded so a
/// name can never end the header line.
fn escape_quoted(v: &str) -> String {
    v.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Check a boundary against RFC 2046: 1 to 70 characters from the allowed
/// set, not ending with a space.
fn validate_boundary(boundary: &str) -> Result<()> {
    let valid = !boundary.is_empty()
        && boundary.len() <= 70
        && !boundary.ends_with(' ')
        && boundary
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"'()+_,-./:=? ".contains(&b));

    if valid {
        Ok(())
    } else {
        Err(Error::request_invalid(format!(
            "invalid multipart boundary {boundary:?}"
        )))
    }
}

/// MultipartBuilder accumulates parts in order and renders them on close.
///
/// The boundary is fixed at construction. [`MultipartBuilder::close`]
/// consumes the builder, so no part can be added after the terminator.
#[derive(Debug, Clone)]
pub struct MultipartBuilder {
    boundary: String,
    parts: Vec<Part>,
}

impl Default for MultipartBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartBuilder {
    /// Create a builder with a random boundary.
    pub fn new() -> Self {
        Self {
            boundary: RandomBoundary.generate_boundary(),
            parts: Vec::new(),
        }
    }

    /// Create a builder with the given boundary.
    pub fn with_boundary(boundary: impl Into<String>) -> Result<Self> {
        let boundary = boundary.into();
        validate_boundary(&boundary)?;

        Ok(Self {
            boundary,
            parts: Vec::new(),
        })
    }

    /// Create a builder whose boundary comes from `generator`.
    pub fn from_generator(generator: &dyn GenerateBoundary) -> Result<Self> {
        Self::with_boundary(generator.generate_boundary())
    }

    /// The boundary of this body.
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// The `Content-Type` header value for this body.
    pub fn content_type(&self) -> String {
        content_type(&self.boundary)
    }

    /// Parts added so far, in order.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Append a part and return its rendered bytes.
    ///
    /// Fails if the payload contains the boundary delimiter.
    pub fn add_part(&mut self, part: Part) -> Result<Bytes> {
        let delimiter = format!("--{}", self.boundary);
        if contains(part.payload(), delimiter.as_bytes()) {
            return Err(Error::request_invalid(format!(
                "payload of part {} contains the multipart boundary",
                part.name()
            )));
        }

        let rendered = part.render(&self.boundary);
        self.parts.push(part);
        Ok(rendered)
    }

    /// Append a JSON part holding the serialized `document`.
    pub fn add_json_part<T: Serialize + ?Sized>(
        &mut self,
        name: &str,
        filename: &str,
        document: &T,
    ) -> Result<Bytes> {
        self.add_part(Part::json(name, filename, document)?)
    }

    /// Read the file at `path` and append it as a part.
    ///
    /// Fails with [`ErrorKind::FileRead`] if the file cannot be read.
    pub async fn add_file_part(&mut self, ctx: &Context, path: &str) -> Result<Bytes> {
        let part = Part::from_file(ctx, path).await?;
        debug!(
            "loaded attachment {} as {} ({} bytes)",
            path,
            part.content_type(),
            part.payload().len()
        );
        self.add_part(part)
    }

    /// Render every part followed by the terminator.
    pub fn close(self) -> MultipartBody {
        let size = self
            .parts
            .iter()
            .map(|p| p.payload().len() + 160)
            .sum::<usize>();
        let mut buf = BytesMut::with_capacity(size + self.boundary.len() + 6);
        for part in &self.parts {
            part.render_into(&self.boundary, &mut buf);
        }
        buf.put_slice(&terminator(&self.boundary));

        MultipartBody {
            boundary: self.boundary,
            parts: self.parts,
            content: buf.freeze(),
        }
    }
}

/// MultipartBody is a closed, immutable multipart body.
#[derive(Clone, PartialEq, Eq)]
pub struct MultipartBody {
    boundary: String,
    parts: Vec<Part>,
    content: Bytes,
}

impl Debug for MultipartBody {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultipartBody")
            .field("boundary", &self.boundary)
            .field("parts", &self.parts)
            .field("size", &self.content.len())
            .finish()
    }
}

impl MultipartBody {
    /// The boundary of this body.
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// The `Content-Type` header value for this body.
    pub fn content_type(&self) -> String {
        content_type(&self.boundary)
    }

    /// Parts of this body, in order.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// The terminating delimiter: `--<boundary>--\r\n`.
    pub fn trailer(&self) -> Bytes {
        terminator(&self.boundary)
    }

    /// The full rendered body.
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Consume the body into its rendered bytes.
    pub fn into_content(self) -> Bytes {
        self.content
    }
}

/// Boundaries made only of token characters are written bare, others are
/// quoted as RFC 2045 requires.
fn content_type(boundary: &str) -> String {
    let is_token = boundary
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b"'+_-.".contains(&b));

    if is_token {
        format!("{MULTIPART_FORM_DATA}; boundary={boundary}")
    } else {
        format!("{MULTIPART_FORM_DATA}; boundary=\"{boundary}\"")
    }
}

fn terminator(boundary: &str) -> Bytes {
    Bytes::from(format!("--{boundary}--\r\n"))
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use pushsign_core::StaticEnv;
    use pushsign_file_read_tokio::TokioFileRead;
    use serde_json::json;
    use std::io::Write;
    use std::path::PathBuf;

    fn count(haystack: &[u8], needle: &[u8]) -> usize {
        haystack.windows(needle.len()).filter(|w| *w == needle).count()
    }

    #[test]
    fn test_json_part_bytes() -> Result<()> {
        let mut builder = MultipartBuilder::with_boundary("xyz")?;
        let rendered = builder.add_json_part("my_article", "article.json", &json!({"a": 1}))?;

        assert_eq!(
            String::from_utf8_lossy(&rendered),
            "--xyz\r\n\
             Content-Type: application/json\r\n\
             Content-Disposition: form-data; name=\"my_article\"; filename=\"article.json\"; size=7\r\n\
             \r\n\
             {\"a\":1}\r\n"
        );
        Ok(())
    }

    #[test]
    fn test_close_renders_all_parts() -> Result<()> {
        let mut builder = MultipartBuilder::with_boundary("xyz")?;
        let first = builder.add_json_part("my_article", "article.json", &json!({"a": 1}))?;
        let second = builder.add_part(Part::new("a.txt", "a.txt", "text/plain", "hello"))?;

        let body = builder.close();
        let mut expected = Vec::new();
        expected.extend_from_slice(&first);
        expected.extend_from_slice(&second);
        expected.extend_from_slice(b"--xyz--\r\n");

        assert_eq!(body.content().as_ref(), expected.as_slice());
        assert_eq!(body.trailer().as_ref(), b"--xyz--\r\n");
        assert_eq!(body.content_type(), "multipart/form-data; boundary=xyz");
        assert_eq!(body.parts().len(), 2);
        Ok(())
    }

    #[test]
    fn test_body_framing() -> Result<()> {
        let mut builder = MultipartBuilder::new();
        let boundary = builder.boundary().to_string();
        builder.add_json_part("my_article", "article.json", &json!({"title": "hi"}))?;
        builder.add_part(Part::new(
            "b.bin",
            "b.bin",
            "application/octet-stream",
            vec![0u8, 1, 2, 255],
        ))?;
        builder.add_part(Part::new("c.txt", "c.txt", "text/plain", ""))?;

        let body = builder.close();
        let content = body.content();
        let opener = format!("--{boundary}\r\n");
        let terminator = format!("--{boundary}--");

        assert!(content.starts_with(opener.as_bytes()));
        assert!(content.ends_with(format!("{terminator}\r\n").as_bytes()));
        assert_eq!(count(content, terminator.as_bytes()), 1);
        assert_eq!(count(content, opener.as_bytes()), 3);

        // every payload sits between its blank line and the next delimiter
        for part in body.parts() {
            let mut needle = b"\r\n\r\n".to_vec();
            needle.extend_from_slice(part.payload());
            needle.extend_from_slice(format!("\r\n--{boundary}").as_bytes());
            assert_eq!(count(content, &needle), 1, "payload of {}", part.name());
        }
        Ok(())
    }

    #[test]
    fn test_empty_body() -> Result<()> {
        let body = MultipartBuilder::with_boundary("xyz")?.close();
        assert_eq!(body.content().as_ref(), b"--xyz--\r\n");
        Ok(())
    }

    #[test]
    fn test_random_boundary() {
        let a = MultipartBuilder::new();
        let b = MultipartBuilder::new();

        assert_eq!(a.boundary().len(), BOUNDARY_LENGTH);
        assert!(a.boundary().bytes().all(|b| b.is_ascii_alphanumeric()));
        assert_ne!(a.boundary(), b.boundary());
        assert_eq!(a.boundary(), a.boundary());
    }

    #[test]
    fn test_invalid_boundary() {
        let long = "x".repeat(71);
        for boundary in ["", "ends with space ", "semi;colon", long.as_str()] {
            let err = MultipartBuilder::with_boundary(boundary).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::RequestInvalid, "{boundary:?}");
        }
    }

    #[test]
    fn test_from_generator() -> Result<()> {
        let builder = MultipartBuilder::from_generator(&StaticBoundary::new("fixed-boundary"))?;
        assert_eq!(builder.boundary(), "fixed-boundary");
        Ok(())
    }

    #[test]
    fn test_payload_with_boundary_rejected() -> Result<()> {
        let mut builder = MultipartBuilder::with_boundary("xyz")?;
        let err = builder
            .add_part(Part::new("a.txt", "a.txt", "text/plain", "before\r\n--xyz--\r\n"))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
        assert!(builder.parts().is_empty());
        Ok(())
    }

    #[test]
    fn test_filename_is_escaped() {
        let part = Part::new("a\"b", "c\\d", "text/plain", "x");
        let rendered = part.render("xyz");
        let rendered = String::from_utf8_lossy(&rendered);

        assert!(rendered.contains("name=\"a\\\"b\"; filename=\"c\\\\d\""));
    }

    #[test]
    fn test_line_breaks_in_names_are_encoded() {
        let part = Part::new("x\ny", "a\r\nb.txt", "text/plain", "x");
        let rendered = part.render("xyz");
        let rendered = String::from_utf8_lossy(&rendered);

        let header = rendered.lines().nth(2).unwrap();
        assert_eq!(
            header,
            "Content-Disposition: form-data; name=\"x%0Ay\"; filename=\"a%0D%0Ab.txt\"; size=1"
        );
        assert_eq!(rendered.matches('\n').count(), 5);
        assert_eq!(rendered.matches("\r\n").count(), 5);
    }

    #[test]
    fn test_content_type_quotes_non_token_boundary() -> Result<()> {
        let plain = MultipartBuilder::with_boundary("abc-123_x.y")?;
        assert_eq!(
            plain.content_type(),
            "multipart/form-data; boundary=abc-123_x.y"
        );

        let quoted = MultipartBuilder::with_boundary("a b:c")?;
        assert_eq!(
            quoted.content_type(),
            "multipart/form-data; boundary=\"a b:c\""
        );
        assert_eq!(quoted.close().trailer().as_ref(), b"--a b:c--\r\n");
        Ok(())
    }

    #[tokio::test]
    async fn test_add_file_part() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("cover.png");
        std::fs::File::create(&path)?.write_all(b"\x89PNG fake")?;

        let ctx = Context::new().with_file_read(TokioFileRead);
        let mut builder = MultipartBuilder::with_boundary("xyz")?;
        let rendered = builder
            .add_file_part(&ctx, path.to_str().unwrap())
            .await?;

        let part = &builder.parts()[0];
        assert_eq!(part.name(), "cover.png");
        assert_eq!(part.filename(), "cover.png");
        assert_eq!(part.content_type(), "image/png");
        assert_eq!(part.payload().as_ref(), b"\x89PNG fake");
        assert!(rendered.ends_with(b"\r\n\r\n\x89PNG fake\r\n"));
        Ok(())
    }

    #[tokio::test]
    async fn test_add_file_part_unknown_extension() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("bundle.unknownext");
        std::fs::write(&path, b"data")?;

        let ctx = Context::new().with_file_read(TokioFileRead);
        let mut builder = MultipartBuilder::new();
        builder.add_file_part(&ctx, path.to_str().unwrap()).await?;

        assert_eq!(builder.parts()[0].content_type(), "application/octet-stream");
        Ok(())
    }

    #[tokio::test]
    async fn test_add_file_part_expands_home() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("notes.txt"), b"hi")?;

        let ctx = Context::new()
            .with_file_read(TokioFileRead)
            .with_env(StaticEnv {
                home_dir: Some(PathBuf::from(dir.path())),
                envs: Default::default(),
            });
        let mut builder = MultipartBuilder::new();
        builder.add_file_part(&ctx, "~/notes.txt").await?;

        assert_eq!(builder.parts()[0].payload().as_ref(), b"hi");
        assert_eq!(builder.parts()[0].content_type(), "text/plain");
        Ok(())
    }

    #[tokio::test]
    async fn test_add_file_part_missing() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("missing.jpg");

        let ctx = Context::new().with_file_read(TokioFileRead);
        let mut builder = MultipartBuilder::new();
        let err = builder
            .add_file_part(&ctx, path.to_str().unwrap())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::FileRead);
        assert!(builder.parts().is_empty());
        Ok(())
    }
}
