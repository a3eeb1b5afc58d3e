use super::*;
use chrono::{DateTime, Utc};
use clap::ArgMatches;

use crate::common::units::{Scale, SECONDS};
use crate::stability::{compute, Estimator};
use crate::tsdb::{describe, DEFAULT_PTILE_RANGE};

pub fn command() -> Command {
    Command::new("summarize")
        .about("Print a plain-text stability report for a recording")
        .arg(
            clap::Arg::new("INPUT")
                .help("Parquet recording to analyze")
                .value_parser(value_parser!(PathBuf))
                .action(clap::ArgAction::Set)
                .required(true)
                .index(1),
        )
        .arg(
            clap::Arg::new("VERBOSE")
                .long("verbose")
                .short('v')
                .help("Increase the verbosity")
                .action(clap::ArgAction::Count),
        )
}

pub struct Config {
    input: PathBuf,
    verbose: u8,
}

impl TryFrom<ArgMatches> for Config {
    type Error = String;

    fn try_from(args: ArgMatches) -> Result<Self, Self::Error> {
        Ok(Config {
            input: args.get_one::<PathBuf>("INPUT").unwrap().to_path_buf(),
            verbose: *args.get_one::<u8>("VERBOSE").unwrap_or(&0),
        })
    }
}

/// Prints a report for a recording: per series, the trimmed descriptive
/// statistics and an Allan deviation table for both estimators.
pub fn run(config: Config) {
    common::init_logging(config.verbose);

    let data = Tsdb::load(&config.input)
        .map_err(|e| {
            eprintln!("failed to load data from parquet: {e}");
            std::process::exit(1);
        })
        .unwrap();

    if data.is_empty() {
        eprintln!("recording contains no series: {}", config.input.display());
        std::process::exit(1);
    }

    println!("recording: {}", data.filename());

    if !data.source().is_empty() {
        println!("source: {} {}", data.source(), data.version());
    }

    if let Some((start, end)) = data.span() {
        let length = std::time::Duration::from_secs((end - start) / SECONDS);

        println!(
            "span: {} to {} ({})",
            timestamp(start),
            timestamp(end),
            humantime::format_duration(length)
        );
    }

    let period = match data.interval() {
        Ok(period) => {
            println!("sampling period: {period} s");
            period
        }
        Err(_) => {
            println!("sampling period: unknown, assuming 1 s");
            1.0
        }
    };

    for name in data.names() {
        let Some(series) = data.get(name) else {
            continue;
        };

        println!();

        match describe(series, DEFAULT_PTILE_RANGE) {
            Ok(stats) => {
                let scale = Scale::time(stats.spread());
                let m = scale.multiplier();
                let unit = scale.suffix();

                println!("{name}: {} samples, {} finite", series.len(), stats.count);
                println!(
                    "  min {:.3} {unit} | p{:.0} {:.3} {unit} | median {:.3} {unit} | p{:.0} {:.3} {unit} | max {:.3} {unit}",
                    stats.min * m,
                    DEFAULT_PTILE_RANGE.0,
                    stats.lower * m,
                    stats.median * m,
                    DEFAULT_PTILE_RANGE.1,
                    stats.upper * m,
                    stats.max * m,
                );
            }
            Err(e) => {
                println!("{name}: {} samples", series.len());
                println!("  statistics unavailable: {e}");
            }
        }

        let values = series.values();
        let standard = compute(&values, Estimator::Standard);
        let overlapping = compute(&values, Estimator::Overlapping);

        if standard.is_empty() {
            println!("  too few samples for stability analysis");
            continue;
        }

        let windows = standard.taus();
        let (taus, deviation) = standard.deviation_points(period);
        let (_, smoothed) = overlapping.deviation_points(period);

        println!("  stability over {} averaging windows:", standard.len());
        println!(
            "  {:>10}  {:>12}  {:>14}  {:>14}  {:>14}",
            "samples", "tau (s)", "avar", "adev", "overlapping"
        );

        for i in 0..windows.len() {
            println!(
                "  {:>10}  {:>12.3}  {:>14.6e}  {:>14.6e}  {:>14.6e}",
                windows[i],
                taus[i],
                standard.variances()[i],
                deviation[i],
                smoothed[i]
            );
        }
    }
}

fn timestamp(ns: u64) -> String {
    let seconds = (ns / SECONDS) as i64;
    let nanos = (ns % SECONDS) as u32;

    DateTime::<Utc>::from_timestamp(seconds, nanos)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
        .unwrap_or_else(|| ns.to_string())
}
