//! Unique index checks shared by the backends.

use crate::domain::{ShortUrl, User};
use crate::error::{StorageError, StorageResult};

/// Reject a username that is already registered.
pub fn check_username(existing: &[User], username: &str) -> StorageResult<()> {
    if existing.iter().any(|u| u.username == username) {
        return Err(StorageError::Duplicate {
            field: "username",
            value: username.to_string(),
        });
    }
    Ok(())
}

/// Reject a URL record whose `short` or `original` is already stored.
pub fn check_url(existing: &[ShortUrl], url: &ShortUrl) -> StorageResult<()> {
    if existing.iter().any(|u| u.short == url.short) {
        return Err(StorageError::Duplicate {
            field: "short",
            value: url.short.to_string(),
        });
    }
    if existing.iter().any(|u| u.original == url.original) {
        return Err(StorageError::Duplicate {
            field: "original",
            value: url.original.clone(),
        });
    }
    Ok(())
}
