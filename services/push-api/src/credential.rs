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

use pushsign_core::hash::base64_decode;
use pushsign_core::utils::Redact;
use pushsign_core::{Result, SigningCredential};
use std::fmt::{Debug, Formatter};

/// Credential for push api: an opaque key id plus a base64 encoded secret.
///
/// Credentials are immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    key_id: String,
    secret: String,
}

impl Credential {
    /// Create a new credential.
    pub fn new(key_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            secret: secret.into(),
        }
    }

    /// The key identifier sent in the `Authorization` header.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// The base64 encoded secret.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Decode the secret into the raw HMAC key.
    ///
    /// Fails with [`pushsign_core::ErrorKind::Signing`] if the secret is not valid base64.
    pub fn secret_key(&self) -> Result<Vec<u8>> {
        base64_decode(&self.secret)
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("key_id", &Redact::from(&self.key_id))
            .field("secret", &Redact::from(&self.secret))
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.key_id.is_empty() && !self.secret.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pushsign_core::ErrorKind;

    #[test]
    fn test_credential_debug_is_redacted() {
        let cred = Credential::new("2b4e6f3a-key-identifier", "c2VjcmV0LXNlY3JldC1zZWNyZXQ=");
        let s = format!("{cred:?}");

        assert!(!s.contains("c2VjcmV0LXNlY3JldC1zZWNyZXQ="));
        assert!(!s.contains("2b4e6f3a-key-identifier"));
        assert!(s.contains("c2V***XQ="));
    }

    #[test]
    fn test_credential_is_valid() {
        assert!(Credential::new("key", "c2VjcmV0").is_valid());
        assert!(!Credential::new("", "c2VjcmV0").is_valid());
        assert!(!Credential::new("key", "").is_valid());
    }

    #[test]
    fn test_secret_key() {
        let cred = Credential::new("key", "c2VjcmV0");
        assert_eq!(cred.secret_key().unwrap(), b"secret");

        let cred = Credential::new("key", "%%%");
        assert_eq!(cred.secret_key().unwrap_err().kind(), ErrorKind::Signing);
    }
}
