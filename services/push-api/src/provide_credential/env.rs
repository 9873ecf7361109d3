use async_trait::async_trait;
use pushsign_core::{Context, ProvideCredential, Result};

use crate::constants::*;
use crate::credential::Credential;

/// EnvCredentialProvider loads credential from [`PUSH_API_KEY_ID`] and [`PUSH_API_SECRET`].
///
/// Returns nothing unless both are set and non-empty.
#[derive(Clone, Debug, Default)]
pub struct EnvCredentialProvider {}

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let key_id = ctx.env_var(PUSH_API_KEY_ID).filter(|v| !v.is_empty());
        let secret = ctx.env_var(PUSH_API_SECRET).filter(|v| !v.is_empty());

        match (key_id, secret) {
            (Some(key_id), Some(secret)) => Ok(Some(Credential::new(key_id, secret))),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pushsign_core::StaticEnv;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_env_credential_provider() {
        let ctx = Context::new().with_env(StaticEnv {
            home_dir: None,
            envs: HashMap::from([
                (PUSH_API_KEY_ID.to_string(), "key".to_string()),
                (PUSH_API_SECRET.to_string(), "c2VjcmV0".to_string()),
            ]),
        });

        let cred = EnvCredentialProvider::new()
            .provide_credential(&ctx)
            .await
            .unwrap()
            .expect("credential must be loaded");
        assert_eq!(cred.key_id(), "key");
        assert_eq!(cred.secret(), "c2VjcmV0");
    }

    #[tokio::test]
    async fn test_env_credential_provider_partial() {
        let ctx = Context::new().with_env(StaticEnv {
            home_dir: None,
            envs: HashMap::from([
                (PUSH_API_KEY_ID.to_string(), "key".to_string()),
                (PUSH_API_SECRET.to_string(), "".to_string()),
            ]),
        });

        let cred = EnvCredentialProvider::new()
            .provide_credential(&ctx)
            .await
            .unwrap();
        assert!(cred.is_none());
    }
}
