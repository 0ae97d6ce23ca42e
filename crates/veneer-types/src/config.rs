//! Shell configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! built-in story setup. Only the sections a caller wants to change need to
//! be present:
//!
//! ```toml
//! user = "alex"
//!
//! [login]
//! hint_after = 2
//!
//! [[login.credentials]]
//! username = "alex"
//! password = "nightjar"
//! level = "user"
//! reveal = "journal"
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, VeneerError};

/// Access level granted by a successful login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    User,
    Admin,
    Root,
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::Root => "root",
        };
        f.write_str(s)
    }
}

/// Top-level shell configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Name reported by `whoami` and used by `login` without arguments.
    pub user: String,
    pub hostname: String,
    pub login: LoginConfig,
    pub megacorp: MegacorpConfig,
    pub portal: PortalConfig,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            user: "alex".to_string(),
            hostname: "veneer".to_string(),
            login: LoginConfig::default(),
            megacorp: MegacorpConfig::default(),
            portal: PortalConfig::default(),
        }
    }
}

/// `login` behaviour and the recognised credentials.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoginConfig {
    /// Failed attempts after which the hint is shown. Attempts are never
    /// limited; this only changes the message.
    pub hint_after: u32,
    pub hint: String,
    pub credentials: Vec<Credential>,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            hint_after: 3,
            hint: "hint: the bird on the sticky note under the keyboard".to_string(),
            credentials: vec![
                Credential {
                    username: "alex".to_string(),
                    password: "nightjar".to_string(),
                    level: AccessLevel::User,
                    reveal: Some("journal".to_string()),
                },
                Credential {
                    username: "admin".to_string(),
                    password: "letmein".to_string(),
                    level: AccessLevel::Admin,
                    reveal: Some("admin".to_string()),
                },
            ],
        }
    }
}

/// One recognised username/password pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Credential {
    pub username: String,
    pub password: String,
    #[serde(default = "default_level")]
    pub level: AccessLevel,
    /// Name of a seed subtree mounted at `~` after a successful login.
    #[serde(default)]
    pub reveal: Option<String>,
}

fn default_level() -> AccessLevel {
    AccessLevel::User
}

/// Secrets for the `megacorp-connect` dialog.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MegacorpConfig {
    pub employee_id: String,
    pub access_code: String,
}

impl Default for MegacorpConfig {
    fn default() -> Self {
        Self {
            employee_id: "MC-4471".to_string(),
            access_code: "orchid".to_string(),
        }
    }
}

/// Secrets for the portal program.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub username: String,
    pub password: String,
    pub token: String,
    /// Value stored in the `portal.access` flag after connecting.
    pub access: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            username: "alex.m".to_string(),
            password: "s3cur3".to_string(),
            token: "884213".to_string(),
            access: "staff".to_string(),
        }
    }
}

impl ShellConfig {
    /// Parse a configuration from TOML text and validate it.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file from the host filesystem.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded shell config from {}", path.display());
        Ok(config)
    }

    /// Reject configurations the shell cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.user.trim().is_empty() {
            return Err(VeneerError::Config("user must not be empty".to_string()));
        }
        if self.user.contains(char::is_whitespace) {
            return Err(VeneerError::Config(format!(
                "user must be a single word: {:?}",
                self.user
            )));
        }
        let mut seen = HashSet::new();
        for cred in &self.login.credentials {
            if !seen.insert(cred.username.as_str()) {
                return Err(VeneerError::Config(format!(
                    "duplicate credential for {}",
                    cred.username
                )));
            }
        }
        Ok(())
    }

    /// Find the credential entry for `username`.
    pub fn credential(&self, username: &str) -> Option<&Credential> {
        self.login
            .credentials
            .iter()
            .find(|c| c.username == username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = ShellConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.user, "alex");
        assert_eq!(config.login.hint_after, 3);
        assert!(config.credential("alex").is_some());
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = ShellConfig::from_toml_str("").unwrap();
        assert_eq!(config.user, "alex");
        assert_eq!(config.megacorp.employee_id, "MC-4471");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = ShellConfig::from_toml_str(
            r#"
            user = "sam"

            [login]
            hint_after = 1

            [[login.credentials]]
            username = "sam"
            password = "pw"
            level = "root"
            "#,
        )
        .unwrap();
        assert_eq!(config.user, "sam");
        assert_eq!(config.login.hint_after, 1);
        // Hint text keeps its default even though [login] was given.
        assert!(config.login.hint.starts_with("hint:"));
        let cred = config.credential("sam").unwrap();
        assert_eq!(cred.level, AccessLevel::Root);
        assert_eq!(cred.reveal, None);
        assert!(config.credential("alex").is_none());
        assert_eq!(config.portal.token, "884213");
    }

    #[test]
    fn level_defaults_to_user() {
        let config = ShellConfig::from_toml_str(
            r#"
            [[login.credentials]]
            username = "guest"
            password = "guest"
            "#,
        )
        .unwrap();
        assert_eq!(config.credential("guest").unwrap().level, AccessLevel::User);
    }

    #[test]
    fn duplicate_credentials_rejected() {
        let err = ShellConfig::from_toml_str(
            r#"
            [[login.credentials]]
            username = "a"
            password = "1"

            [[login.credentials]]
            username = "a"
            password = "2"
            "#,
        )
        .unwrap_err();
        assert!(format!("{err}").contains("duplicate credential"));
    }

    #[test]
    fn blank_user_rejected() {
        let err = ShellConfig::from_toml_str("user = \"  \"").unwrap_err();
        assert!(matches!(err, VeneerError::Config(_)));
    }

    #[test]
    fn unknown_level_is_parse_error() {
        let err = ShellConfig::from_toml_str(
            r#"
            [[login.credentials]]
            username = "a"
            password = "1"
            level = "wizard"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, VeneerError::TomlParse(_)));
    }

    #[test]
    fn load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "hostname = \"deck\"").unwrap();
        let config = ShellConfig::load(file.path()).unwrap();
        assert_eq!(config.hostname, "deck");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ShellConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, VeneerError::Io(_)));
    }

    #[test]
    fn access_level_display() {
        assert_eq!(AccessLevel::Admin.to_string(), "admin");
        assert!(AccessLevel::Root > AccessLevel::User);
    }
}
