// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{anyhow, Result};
use rusqlite::Connection;

use crate::utils::{clear_setting, get_setting, set_setting};

const CURRENT_USER_KEY: &str = "current_user";

/// The signed-in user. Every record read or written is scoped to `owner_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub owner_id: String,
}

pub fn login(conn: &Connection, name: &str) -> Result<Session> {
    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("User name cannot be empty"));
    }
    set_setting(conn, CURRENT_USER_KEY, name)?;
    Ok(Session {
        owner_id: name.to_string(),
    })
}

pub fn logout(conn: &Connection) -> Result<()> {
    clear_setting(conn, CURRENT_USER_KEY)
}

pub fn current(conn: &Connection) -> Result<Option<Session>> {
    Ok(get_setting(conn, CURRENT_USER_KEY)?.map(|owner_id| Session { owner_id }))
}

/// The session to act as: an explicit `--user` wins over the stored login.
pub fn require(conn: &Connection, explicit: Option<&str>) -> Result<Session> {
    if let Some(name) = explicit.map(str::trim).filter(|s| !s.is_empty()) {
        return Ok(Session {
            owner_id: name.to_string(),
        });
    }
    current(conn)?.ok_or_else(|| anyhow!("Not signed in; run `spendwise user login <name>` first"))
}
