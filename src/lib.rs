// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod db;
pub mod error;
pub mod models;
pub mod query;
pub mod engine;
pub mod store;
pub mod subscription;
pub mod dashboard;
pub mod undo;
pub mod prefs;
pub mod session;
pub mod logging;
pub mod utils;
pub mod commands;
