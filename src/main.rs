use backtrace::Backtrace;
use clap::{value_parser, Command};
use std::path::PathBuf;
use std::sync::Arc;

mod common;
mod error;
mod export;
mod stability;
mod summarize;
mod tsdb;
mod viewer;

use tsdb::{sample, SamplingDirective, Series, Tsdb};

fn main() {
    // custom panic hook to terminate whole process after unwinding
    std::panic::set_hook(Box::new(|s| {
        eprintln!("{s}");
        eprintln!("{:?}", Backtrace::new());
        std::process::exit(101);
    }));

    // parse command line options
    let matches = Command::new(env!("CARGO_BIN_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_about("Frequency stability analysis for clock and oscillator time-series recordings.")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(viewer::command())
        .subcommand(export::command())
        .subcommand(summarize::command())
        .get_matches();

    match matches.subcommand() {
        Some(("view", args)) => match viewer::Config::try_from(args.clone()) {
            Ok(config) => viewer::run(config),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
        Some(("export", args)) => match export::Config::try_from(args.clone()) {
            Ok(config) => export::run(config),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
        Some(("summarize", args)) => match summarize::Config::try_from(args.clone()) {
            Ok(config) => summarize::run(config),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
        _ => unreachable!(),
    }
}
