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

use std::fmt::{Debug, Formatter};

use pushsign_core::utils::Redact;
use pushsign_core::Context;

use crate::constants::*;

/// Config carries all the configuration for push api clients.
#[derive(Clone, Default)]
pub struct Config {
    /// `key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`PUSH_API_KEY_ID`]
    pub key_id: Option<String>,
    /// `secret` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`PUSH_API_SECRET`]
    pub secret: Option<String>,
    /// `debug` routes requests through the transport's inspection proxy.
    ///
    /// Enabled if this field is `true` or env value [`PUSH_API_DEBUG`] is one of
    /// `1`, `true`, `on` or `yes`.
    pub debug: bool,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("key_id", &Redact::from(&self.key_id))
            .field("secret", &Redact::from(&self.secret))
            .field("debug", &self.debug)
            .finish()
    }
}

impl Config {
    /// Load config from env.
    ///
    /// Values already set take precedence over the environment.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if self.key_id.is_none() {
            self.key_id = ctx.env_var(PUSH_API_KEY_ID);
        }
        if self.secret.is_none() {
            self.secret = ctx.env_var(PUSH_API_SECRET);
        }
        if !self.debug {
            self.debug = ctx
                .env_var(PUSH_API_DEBUG)
                .map(|v| is_truthy(&v))
                .unwrap_or_default();
        }

        self
    }
}

fn is_truthy(v: &str) -> bool {
    matches!(
        v.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pushsign_core::StaticEnv;
    use std::collections::HashMap;

    fn ctx_with(envs: &[(&str, &str)]) -> Context {
        Context::new().with_env(StaticEnv {
            home_dir: None,
            envs: envs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        })
    }

    #[test]
    fn test_config_from_env() {
        let ctx = ctx_with(&[
            (PUSH_API_KEY_ID, "key"),
            (PUSH_API_SECRET, "c2VjcmV0"),
            (PUSH_API_DEBUG, "On"),
        ]);

        let config = Config::default().from_env(&ctx);
        assert_eq!(config.key_id.as_deref(), Some("key"));
        assert_eq!(config.secret.as_deref(), Some("c2VjcmV0"));
        assert!(config.debug);
    }

    #[test]
    fn test_config_fields_take_precedence() {
        let ctx = ctx_with(&[(PUSH_API_KEY_ID, "from-env"), (PUSH_API_DEBUG, "0")]);

        let config = Config {
            key_id: Some("from-field".to_string()),
            ..Default::default()
        }
        .from_env(&ctx);
        assert_eq!(config.key_id.as_deref(), Some("from-field"));
        assert!(config.secret.is_none());
        assert!(!config.debug);
    }

    #[test]
    fn test_is_truthy() {
        for v in ["1", "true", "TRUE", " on ", "yes"] {
            assert!(is_truthy(v), "{v} should be truthy");
        }
        for v in ["0", "false", "off", "", "debug"] {
            assert!(!is_truthy(v), "{v} should not be truthy");
        }
    }
}
