mod audio;
mod bootstrap;
mod config;
mod loop_runner;
mod render;
mod script;

pub(crate) use bootstrap::{build_app, parse_cli_args, USAGE};
pub(crate) use loop_runner::run;
