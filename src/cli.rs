// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn query_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("search")
            .long("search")
            .short('s')
            .help("Case-insensitive match on name or description"),
    )
    .arg(
        Arg::new("type")
            .long("type")
            .default_value("all")
            .value_parser(["all", "income", "expense"]),
    )
    .arg(
        Arg::new("sort")
            .long("sort")
            .default_value("date")
            .value_parser(["category", "date", "amount"]),
    )
    .arg(
        Arg::new("dir")
            .long("dir")
            .default_value("desc")
            .value_parser(["asc", "desc"]),
    )
    .arg(
        Arg::new("page")
            .long("page")
            .default_value("1")
            .value_parser(value_parser!(usize)),
    )
}

fn tx_fields(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("name")
            .long("name")
            .help("Income label; expenses are named after their category"),
    )
        .arg(Arg::new("description").long("description"))
        .arg(Arg::new("amount").long("amount"))
        .arg(Arg::new("category").long("category"))
        .arg(Arg::new("date").long("date").help("YYYY-MM-DD"))
}

pub fn build_cli() -> Command {
    Command::new("spendwise")
        .about("Track income and expenses, set category budgets, and see where the money goes")
        .version(clap::crate_version!())
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("SPENDWISE_DB")
                .help("Path to the database file"),
        )
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .help("Act as this user instead of the signed-in one"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("user")
                .about("Sign in, sign out, show the current user")
                .subcommand(Command::new("login").arg(Arg::new("name").required(true)))
                .subcommand(Command::new("logout"))
                .subcommand(Command::new("whoami")),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and browse transactions")
                .subcommand(tx_fields(
                    Command::new("add").arg(
                        Arg::new("type")
                            .long("type")
                            .default_value("expense")
                            .value_parser(["income", "expense"]),
                    ),
                ))
                .subcommand(tx_fields(
                    Command::new("edit")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
                ))
                .subcommand(json_flags(query_args(Command::new("list"))))
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
                )
                .subcommand(Command::new("undo").about("Restore the last deleted transaction")),
        )
        .subcommand(
            Command::new("budget")
                .about("Monthly limits per category")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("limit").long("limit").required(true)),
                )
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("report")
                .about("Totals and chart data")
                .subcommand(json_flags(Command::new("summary")))
                .subcommand(json_flags(Command::new("categories")))
                .subcommand(json_flags(Command::new("daily")))
                .subcommand(json_flags(query_args(Command::new("dashboard")))),
        )
        .subcommand(
            Command::new("import").subcommand(
                Command::new("transactions").arg(Arg::new("path").long("path").required(true)),
            ),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("transactions")
                    .arg(Arg::new("format").long("format").default_value("csv"))
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(
            Command::new("theme")
                .subcommand(Command::new("show"))
                .subcommand(Command::new("toggle"))
                .subcommand(
                    Command::new("set").arg(
                        Arg::new("theme")
                            .required(true)
                            .value_parser(["light", "dark"]),
                    ),
                ),
        )
        .subcommand(Command::new("doctor").about("Report records that do not parse"))
}
