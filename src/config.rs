use std::{fmt, path::PathBuf};

use serde::Serialize;

pub const DEFAULT_FEEDBACK_FILE: &str = "data/feedback-submissions.json";

/// Which database credential the service connects with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialTier {
    /// Elevated credential that bypasses row-level policies.
    Service,
    /// Restricted public credential.
    Anonymous,
}

impl CredentialTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialTier::Service => "service",
            CredentialTier::Anonymous => "anonymous",
        }
    }
}

impl fmt::Display for CredentialTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub credential: Option<String>,
    pub tier: CredentialTier,
    pub max_connections: u32,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("tier", &self.tier)
            .field("max_connections", &self.max_connections)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum StoreBackend {
    Postgres(DatabaseConfig),
    File(PathBuf),
    Memory,
    Unconfigured,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreBackend,
    pub fallback_file: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = var("DATABASE_URL");
        let feedback_file = var("FEEDBACK_FILE");

        let kind = var("FEEDBACK_STORE").unwrap_or_else(|| {
            if database_url.is_some() {
                "postgres".into()
            } else if feedback_file.is_some() {
                "file".into()
            } else {
                "unconfigured".into()
            }
        });

        let store = match kind.to_ascii_lowercase().as_str() {
            "postgres" => {
                let url = database_url.ok_or_else(|| {
                    anyhow::anyhow!("FEEDBACK_STORE=postgres requires DATABASE_URL")
                })?;
                let (credential, tier) = match (var("DATABASE_SERVICE_KEY"), var("DATABASE_ANON_KEY")) {
                    (Some(key), _) => (Some(key), CredentialTier::Service),
                    (None, Some(key)) => (Some(key), CredentialTier::Anonymous),
                    (None, None) => (None, CredentialTier::Service),
                };
                let max_connections = var("DATABASE_MAX_CONNECTIONS")
                    .and_then(|v| v.parse::<u32>().ok())
                    .unwrap_or(10);
                StoreBackend::Postgres(DatabaseConfig {
                    url,
                    credential,
                    tier,
                    max_connections,
                })
            }
            "file" => StoreBackend::File(
                feedback_file.unwrap_or_else(|| DEFAULT_FEEDBACK_FILE.into()).into(),
            ),
            "memory" => StoreBackend::Memory,
            "unconfigured" | "none" => StoreBackend::Unconfigured,
            other => anyhow::bail!("unknown FEEDBACK_STORE value: {other}"),
        };

        let fallback_file = var("FEEDBACK_FALLBACK_FILE")
            .unwrap_or_else(|| DEFAULT_FEEDBACK_FILE.into())
            .into();

        Ok(Self {
            store,
            fallback_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn nothing_set_is_unconfigured() {
        let cfg = config(&[]).unwrap();
        assert!(matches!(cfg.store, StoreBackend::Unconfigured));
        assert_eq!(cfg.fallback_file, PathBuf::from(DEFAULT_FEEDBACK_FILE));
    }

    #[test]
    fn database_url_selects_postgres_with_service_tier() {
        let cfg = config(&[
            ("DATABASE_URL", "postgres://app@db/feedback"),
            ("DATABASE_SERVICE_KEY", "svc"),
            ("DATABASE_ANON_KEY", "anon"),
        ])
        .unwrap();
        match cfg.store {
            StoreBackend::Postgres(db) => {
                assert_eq!(db.tier, CredentialTier::Service);
                assert_eq!(db.credential.as_deref(), Some("svc"));
                assert_eq!(db.max_connections, 10);
            }
            other => panic!("unexpected backend {other:?}"),
        }
    }

    #[test]
    fn anon_key_alone_selects_anonymous_tier() {
        let cfg = config(&[
            ("DATABASE_URL", "postgres://app@db/feedback"),
            ("DATABASE_ANON_KEY", "anon"),
        ])
        .unwrap();
        let StoreBackend::Postgres(db) = cfg.store else {
            panic!("expected postgres");
        };
        assert_eq!(db.tier, CredentialTier::Anonymous);
    }

    #[test]
    fn postgres_without_url_is_an_error() {
        let err = config(&[("FEEDBACK_STORE", "postgres")]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn unknown_backend_is_an_error() {
        assert!(config(&[("FEEDBACK_STORE", "mongo")]).is_err());
    }

    #[test]
    fn file_backend_uses_given_path() {
        let cfg = config(&[("FEEDBACK_FILE", "/tmp/fb.json")]).unwrap();
        let StoreBackend::File(path) = cfg.store else {
            panic!("expected file");
        };
        assert_eq!(path, PathBuf::from("/tmp/fb.json"));
    }

    #[test]
    fn debug_output_redacts_credentials() {
        let cfg = config(&[
            ("DATABASE_URL", "postgres://app:secret@db/feedback"),
            ("DATABASE_SERVICE_KEY", "top-secret"),
        ])
        .unwrap();
        let printed = format!("{cfg:?}");
        assert!(!printed.contains("top-secret"));
        assert!(!printed.contains("secret@db"));
    }
}
