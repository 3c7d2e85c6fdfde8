use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Credential file name in the data directory
const CREDENTIAL_FILE: &str = "credential.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCredential {
    token: String,
    saved_at: DateTime<Utc>,
}

/// Durable storage for the opaque bearer credential.
///
/// Reads never fail the caller: a missing, unreadable, or corrupt file
/// reads as "no credential" and the condition is logged. Writes and
/// clears report their errors so the session can decide what to do.
pub struct TokenStore {
    data_dir: PathBuf,
}

impl TokenStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Read the stored credential, if any
    pub fn get(&self) -> Option<String> {
        self.load().map(|c| c.token)
    }

    /// When the credential was last written, for display purposes
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        self.load().map(|c| c.saved_at)
    }

    /// Persist a new credential, replacing any previous one
    pub fn set(&self, token: &str) -> Result<()> {
        let path = self.credential_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create credential directory")?;
        }
        let credential = StoredCredential {
            token: token.to_string(),
            saved_at: Utc::now(),
        };
        let contents = serde_json::to_string_pretty(&credential)?;
        std::fs::write(&path, contents)
            .context("Failed to write credential file")?;
        Ok(())
    }

    /// Remove the stored credential. Clearing an absent credential is Ok.
    pub fn clear(&self) -> Result<()> {
        let path = self.credential_path();
        if path.exists() {
            std::fs::remove_file(&path)
                .context("Failed to remove credential file")?;
        }
        Ok(())
    }

    fn load(&self) -> Option<StoredCredential> {
        let path = self.credential_path();
        if !path.exists() {
            return None;
        }
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Failed to read credential file");
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(credential) => Some(credential),
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Failed to parse credential file");
                None
            }
        }
    }

    fn credential_path(&self) -> PathBuf {
        self.data_dir.join(CREDENTIAL_FILE)
    }
}
