use super::*;
use clap::ArgMatches;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::info;

pub fn command() -> Command {
    Command::new("export")
        .about("Render the dashboard sections for a recording to a JSON file")
        .arg(
            clap::Arg::new("INPUT")
                .help("Parquet recording to analyze")
                .value_parser(value_parser!(PathBuf))
                .action(clap::ArgAction::Set)
                .required(true)
                .index(1),
        )
        .arg(
            clap::Arg::new("OUTPUT")
                .help("Destination path for the rendered document")
                .value_parser(value_parser!(PathBuf))
                .action(clap::ArgAction::Set)
                .required(true)
                .index(2),
        )
        .arg(
            clap::Arg::new("VERBOSE")
                .long("verbose")
                .short('v')
                .help("Increase the verbosity")
                .action(clap::ArgAction::Count),
        )
        .arg(
            clap::Arg::new("SAMPLING")
                .long("sampling")
                .help("Series reduction: an integer stride or a time period, 0 disables")
                .action(clap::ArgAction::Set),
        )
}

pub struct Config {
    input: PathBuf,
    output: PathBuf,
    verbose: u8,
    sampling: Option<SamplingDirective>,
}

impl TryFrom<ArgMatches> for Config {
    type Error = String;

    fn try_from(args: ArgMatches) -> Result<Self, Self::Error> {
        let sampling = args
            .get_one::<String>("SAMPLING")
            .map(|v| v.parse::<SamplingDirective>())
            .transpose()
            .map_err(|e| e.to_string())?;

        Ok(Config {
            input: args.get_one::<PathBuf>("INPUT").unwrap().to_path_buf(),
            output: args.get_one::<PathBuf>("OUTPUT").unwrap().to_path_buf(),
            verbose: *args.get_one::<u8>("VERBOSE").unwrap_or(&0),
            sampling,
        })
    }
}

/// Writes the same section documents the viewer serves, as one JSON file
/// keyed by section route. Destinations with a vector-image extension get
/// the same series reduction an interactive session would.
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

    let vector_output = common::is_vector_format(&config.output);

    let document: BTreeMap<String, _> =
        viewer::dashboard::build(&data, config.sampling.as_ref(), vector_output, false)
            .into_iter()
            .map(|(key, view)| (key.trim_end_matches(".json").to_string(), view))
            .collect();

    let file = match File::create(&config.output) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("failed to create {}: {e}", config.output.display());
            std::process::exit(1);
        }
    };

    let mut writer = BufWriter::new(file);

    if let Err(e) = serde_json::to_writer_pretty(&mut writer, &document) {
        eprintln!("failed to write {}: {e}", config.output.display());
        std::process::exit(1);
    }

    if let Err(e) = writer.flush() {
        eprintln!("failed to write {}: {e}", config.output.display());
        std::process::exit(1);
    }

    info!(
        "wrote {} sections to: {}",
        document.len(),
        config.output.display()
    );
}
