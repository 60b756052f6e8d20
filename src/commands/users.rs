// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::session;
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("login", sub)) => {
            let name = sub.get_one::<String>("name").context("name missing")?;
            let s = session::login(conn, name)?;
            println!("Signed in as {}", s.owner_id);
        }
        Some(("logout", _)) => {
            session::logout(conn)?;
            println!("Signed out");
        }
        Some(("whoami", _)) => match session::current(conn)? {
            Some(s) => println!("{}", s.owner_id),
            None => println!("Not signed in"),
        },
        _ => {}
    }
    Ok(())
}
