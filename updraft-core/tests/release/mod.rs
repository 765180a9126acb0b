// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for the release cache
//!
//! Feature: release-cache.feature

mod config_tests;
mod fetcher_tests;
