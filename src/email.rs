//! The email captured before a session starts.
//!
//! Only the last used address is kept, so the entry screen can prefill it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use thiserror::Error;
use tracing::warn;

const EMAIL_FILE_NAME: &str = "email";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailError {
    #[error("Please enter your email address")]
    Empty,
    #[error("\"{0}\" is not a valid email address")]
    Invalid(String),
}

/// Check that `input` looks like an email address and return it trimmed.
pub fn validate_email(input: &str) -> Result<String, EmailError> {
    let email = input.trim();
    if email.is_empty() {
        return Err(EmailError::Empty);
    }

    let invalid = || EmailError::Invalid(email.to_string());
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;

    let domain_ok = domain.contains('.') && domain.split('.').all(|label| !label.is_empty());
    if local.is_empty()
        || domain.contains('@')
        || !domain_ok
        || email.contains(char::is_whitespace)
    {
        return Err(invalid());
    }

    Ok(email.to_string())
}

/// File-backed storage for the last used email.
#[derive(Debug, Clone)]
pub struct EmailStore {
    path: PathBuf,
}

impl EmailStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the per-user data directory.
    pub fn default_location() -> Option<Self> {
        ProjectDirs::from("", "", "trivia-quiz")
            .map(|dirs| Self::new(dirs.data_dir().join(EMAIL_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored email, if any. Unreadable files count as empty.
    pub fn load(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let email = content.trim();
                (!email.is_empty()).then(|| email.to_string())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read stored email");
                None
            }
        }
    }

    pub fn save(&self, email: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, email)
    }
}
