#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Support code for the `quake_map` binary.
//!
//! Subcommands and their chart requests live in [`commands`], TOML settings
//! in [`config`], the `quake_map summary` overview in [`summary`], and the
//! JSON envelope around rendered charts in [`output`].

pub mod commands;
pub mod config;
pub mod output;
pub mod summary;
