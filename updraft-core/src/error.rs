// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Release Cache Error Types
//!
//! Unified error type for configuration, upstream access and manifest handling.

use thiserror::Error;

/// Result type for release cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors surfaced by the release cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Missing or inconsistent configuration. Never retried.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Network failure or non-success status from the upstream host.
    #[error("upstream error while {step}: {message}")]
    Upstream {
        /// The operation that failed (e.g. "listing releases").
        step: &'static str,
        /// Underlying failure description.
        message: String,
    },

    /// No release passed the draft/prerelease filter.
    #[error("no release found for {account}/{repository}")]
    NoReleaseFound {
        /// Upstream account.
        account: String,
        /// Upstream repository.
        repository: String,
    },

    /// Manifest contains no package references.
    #[error("manifest format error: {0}")]
    ManifestFormat(String),
}

impl CacheError {
    /// Builds an upstream error for the given step.
    pub fn upstream(step: &'static str, message: impl Into<String>) -> Self {
        CacheError::Upstream {
            step,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for CacheError {
    fn from(err: reqwest::Error) -> Self {
        CacheError::upstream("contacting upstream", err.to_string())
    }
}
