// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::utils::{get_setting, set_setting};

const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(anyhow!("Unknown theme '{}' (use light|dark)", other)),
        }
    }
}

/// Display preferences, read once at startup and handed to whatever renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    pub theme: Theme,
}

impl Preferences {
    pub fn load(conn: &Connection) -> Result<Self> {
        let theme = match get_setting(conn, THEME_KEY)? {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("ignoring stored theme: {e}");
                Theme::default()
            }),
            None => Theme::default(),
        };
        Ok(Self { theme })
    }

    pub fn save(&self, conn: &Connection) -> Result<()> {
        set_setting(conn, THEME_KEY, self.theme.as_str())
    }
}
