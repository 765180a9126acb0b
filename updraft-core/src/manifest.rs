// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Manifest Rewriter
//!
//! Squirrel-style `RELEASES` manifests list update packages by bare
//! filename. Clients resolve those names against the URL they fetched the
//! manifest from, which is our server, not the asset host. Rewriting turns
//! every package reference into an absolute asset-host URL.
//!
//! # Match semantics
//!
//! - The text is split on ASCII whitespace into words.
//! - A word ending in `.nupkg` (ASCII case-insensitive) is a package reference.
//! - A reference containing `://` is already absolute and kept as is.
//! - Every other reference replaces the final path segment of the base URL.
//!
//! Whitespace and non-reference words are copied byte-for-byte.

use crate::error::{CacheError, CacheResult};

/// Asset name of the update manifest inside a release.
pub const MANIFEST_FILE_NAME: &str = "RELEASES";

const PACKAGE_EXTENSION: &str = ".nupkg";

/// Returns the distinct package references in `text`, in order of first appearance.
pub fn package_references(text: &str) -> Vec<&str> {
    let mut refs: Vec<&str> = Vec::new();
    for word in text.split_ascii_whitespace() {
        if is_package_reference(word) && !refs.contains(&word) {
            refs.push(word);
        }
    }
    refs
}

/// Rewrites every relative package reference in `text` against `asset_base_url`.
///
/// `asset_base_url` is the download URL of the manifest itself; its final
/// path segment is swapped for each package name.
pub fn rewrite_manifest(text: &str, asset_base_url: &str) -> CacheResult<String> {
    if package_references(text).is_empty() {
        return Err(CacheError::ManifestFormat(format!(
            "{} contains no {} references",
            MANIFEST_FILE_NAME, PACKAGE_EXTENSION
        )));
    }

    let prefix = url_directory(asset_base_url);
    let mut out = String::with_capacity(text.len() * 2);
    let mut rest = text;

    while !rest.is_empty() {
        let ws_len = rest
            .find(|c: char| !c.is_ascii_whitespace())
            .unwrap_or(rest.len());
        out.push_str(&rest[..ws_len]);
        rest = &rest[ws_len..];

        let word_len = rest
            .find(|c: char| c.is_ascii_whitespace())
            .unwrap_or(rest.len());
        let word = &rest[..word_len];
        if is_package_reference(word) && !is_absolute(word) {
            out.push_str(prefix);
            out.push_str(word);
        } else {
            out.push_str(word);
        }
        rest = &rest[word_len..];
    }

    Ok(out)
}

fn is_package_reference(word: &str) -> bool {
    word.len() >= PACKAGE_EXTENSION.len()
        && word.is_char_boundary(word.len() - PACKAGE_EXTENSION.len())
        && word[word.len() - PACKAGE_EXTENSION.len()..].eq_ignore_ascii_case(PACKAGE_EXTENSION)
}

fn is_absolute(word: &str) -> bool {
    word.contains("://")
}

/// Everything up to and including the last `/`.
fn url_directory(url: &str) -> &str {
    match url.rfind('/') {
        Some(idx) => &url[..=idx],
        None => "",
    }
}
