// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Platform Classifier
//!
//! Maps release asset filenames to the platform they target. Assets that
//! do not classify are skipped by the fetcher.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Substrings that mark a Windows installer as 32-bit.
const WINDOWS_32_MARKERS: &[&str] = &["ia32", "i386", "i686", "x86_32", "32bit", "32-bit"];

/// Target platform of a release asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// 64-bit Windows installer (`.exe`).
    #[serde(rename = "windows_64")]
    Windows64,
    /// 32-bit Windows installer (`.exe` with a 32-bit marker).
    #[serde(rename = "windows_32")]
    Windows32,
    /// macOS disk image (`.dmg`).
    Macos,
    /// Generic Linux (`.AppImage`).
    Linux,
    /// Debian package (`.deb`).
    LinuxDeb,
    /// RPM package (`.rpm`).
    LinuxRpm,
    /// Snap package (`.snap`).
    LinuxSnap,
}

impl Platform {
    /// Every platform, in canonical order.
    pub const ALL: [Platform; 7] = [
        Platform::Windows64,
        Platform::Windows32,
        Platform::Macos,
        Platform::Linux,
        Platform::LinuxDeb,
        Platform::LinuxRpm,
        Platform::LinuxSnap,
    ];

    /// Canonical tag for this platform.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows64 => "windows_64",
            Platform::Windows32 => "windows_32",
            Platform::Macos => "macos",
            Platform::Linux => "linux",
            Platform::LinuxDeb => "linux_deb",
            Platform::LinuxRpm => "linux_rpm",
            Platform::LinuxSnap => "linux_snap",
        }
    }

    /// Returns true for the Windows installers.
    pub fn is_windows(&self) -> bool {
        matches!(self, Platform::Windows64 | Platform::Windows32)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a platform name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPlatform(pub String);

impl fmt::Display for UnknownPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown platform: {}", self.0)
    }
}

impl std::error::Error for UnknownPlatform {}

impl FromStr for Platform {
    type Err = UnknownPlatform;

    /// Parses a canonical tag or one of the aliases update clients send.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let platform = match s.to_ascii_lowercase().as_str() {
            "windows_64" | "win64" | "win32" | "windows" | "win" | "exe" => Platform::Windows64,
            "windows_32" | "win32_ia32" | "ia32" => Platform::Windows32,
            "macos" | "darwin" | "mac" | "osx" | "dmg" => Platform::Macos,
            "linux" | "appimage" => Platform::Linux,
            "linux_deb" | "deb" | "debian" => Platform::LinuxDeb,
            "linux_rpm" | "rpm" | "fedora" => Platform::LinuxRpm,
            "linux_snap" | "snap" => Platform::LinuxSnap,
            _ => return Err(UnknownPlatform(s.to_string())),
        };
        Ok(platform)
    }
}

/// Classifies an asset filename. First matching rule wins.
pub fn classify(file_name: &str) -> Option<Platform> {
    let lower = file_name.to_ascii_lowercase();

    if lower.ends_with(".exe") {
        let is_32_bit = WINDOWS_32_MARKERS.iter().any(|m| lower.contains(m));
        return Some(if is_32_bit {
            Platform::Windows32
        } else {
            Platform::Windows64
        });
    }

    if lower.ends_with(".dmg") {
        return Some(Platform::Macos);
    }

    linux_package(&lower)
}

fn linux_package(lower: &str) -> Option<Platform> {
    if lower.ends_with(".deb") {
        Some(Platform::LinuxDeb)
    } else if lower.ends_with(".rpm") {
        Some(Platform::LinuxRpm)
    } else if lower.ends_with(".snap") {
        Some(Platform::LinuxSnap)
    } else if lower.ends_with(".appimage") {
        Some(Platform::Linux)
    } else {
        None
    }
}
