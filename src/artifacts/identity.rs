//! Author identity
//!
//! Resolution order: `GIT_AUTHOR_NAME`/`GIT_AUTHOR_EMAIL` environment
//! variables (with optional `GIT_AUTHOR_DATE`), then the `[user]` section of
//! `$XDG_CONFIG_HOME/git/config` (default `~/.config/git/config`), then
//! `~/.gitconfig`. The config files are collaborator inputs and are only
//! ever read.

use anyhow::Context;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: chrono::DateTime<chrono::FixedOffset>,
}

impl Author {
    pub fn new(name: String, email: String) -> Self {
        Author {
            name,
            email,
            timestamp: chrono::Local::now().fixed_offset(),
        }
    }

    pub fn new_with_timestamp(
        name: String,
        email: String,
        timestamp: chrono::DateTime<chrono::FixedOffset>,
    ) -> Self {
        Author {
            name,
            email,
            timestamp,
        }
    }

    /// Commit/tag header form: `name <email> <unix-seconds> <±HHMM>`
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }

    /// Resolve the author from the environment, then the git config files
    pub fn load() -> anyhow::Result<Self> {
        let timestamp = std::env::var("GIT_AUTHOR_DATE").ok().and_then(|raw| {
            chrono::DateTime::parse_from_rfc2822(&raw)
                .or_else(|_| chrono::DateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S %z"))
                .ok()
        });

        let identity = match (
            std::env::var("GIT_AUTHOR_NAME"),
            std::env::var("GIT_AUTHOR_EMAIL"),
        ) {
            (Ok(name), Ok(email)) => Some((name, email)),
            _ => Self::identity_from_config()?,
        };

        let (name, email) =
            identity.context("no author identity: set GIT_AUTHOR_NAME and GIT_AUTHOR_EMAIL, or configure [user] in your git config")?;

        Ok(match timestamp {
            Some(timestamp) => Author::new_with_timestamp(name, email, timestamp),
            None => Author::new(name, email),
        })
    }

    fn identity_from_config() -> anyhow::Result<Option<(String, String)>> {
        for path in Self::config_paths() {
            if !path.is_file() {
                continue;
            }

            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;

            if let Some(identity) = Self::scan_user_section(&content) {
                return Ok(Some(identity));
            }
        }

        Ok(None)
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        let xdg_config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| std::env::var("HOME").map(|home| PathBuf::from(home).join(".config")).ok());
        if let Some(base) = xdg_config_home {
            paths.push(base.join("git").join("config"));
        }
        if let Ok(home) = std::env::var("HOME") {
            paths.push(PathBuf::from(home).join(".gitconfig"));
        }

        paths
    }

    /// Lenient scan for `name` and `email` inside a `[user]` section
    fn scan_user_section(content: &str) -> Option<(String, String)> {
        let mut in_user = false;
        let mut name = None;
        let mut email = None;

        for line in content.lines() {
            let line = line.trim();
            if line.starts_with('[') {
                in_user = line == "[user]";
                continue;
            }
            if !in_user {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                match key.trim() {
                    "name" => name = Some(value.trim().to_string()),
                    "email" => email = Some(value.trim().to_string()),
                    _ => {}
                }
            }
        }

        match (name, email) {
            (Some(name), Some(email)) if !name.is_empty() && !email.is_empty() => {
                Some((name, email))
            }
            _ => None,
        }
    }
}
