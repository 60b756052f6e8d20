// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::prefs::{Preferences, Theme};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, prefs: &mut Preferences, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => println!("{}", prefs.theme),
        Some(("toggle", _)) => {
            prefs.theme = prefs.theme.toggle();
            prefs.save(conn)?;
            println!("Theme set to {}", prefs.theme);
        }
        Some(("set", sub)) => {
            let raw = sub.get_one::<String>("theme").context("theme missing")?;
            prefs.theme = raw.parse::<Theme>()?;
            prefs.save(conn)?;
            println!("Theme set to {}", prefs.theme);
        }
        _ => {}
    }
    Ok(())
}
