use super::*;
use axum::extract::State;
use axum::handler::Handler;
use axum::response::Html;
use clap::ArgMatches;
use http::header::CONTENT_TYPE;
use http::StatusCode;
use http::Uri;
use include_dir::{include_dir, Dir};
use serde::Serialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use tracing::{info, warn};

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::decompression::RequestDecompressionLayer;

pub mod dashboard;
pub mod plot;

use plot::*;

static ASSETS: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/src/viewer/assets");

pub fn command() -> Command {
    Command::new("view")
        .about("Serve an interactive dashboard for a recording")
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
        .arg(
            clap::Arg::new("LISTEN")
                .help("Dashboard listen address")
                .action(clap::ArgAction::Set)
                .value_parser(value_parser!(SocketAddr))
                .default_value("127.0.0.1:4242")
                .index(2),
        )
        .arg(
            clap::Arg::new("SAMPLING")
                .long("sampling")
                .help("Series reduction: an integer stride or a time period, 0 disables")
                .action(clap::ArgAction::Set),
        )
        .arg(
            clap::Arg::new("NO_OPEN")
                .long("no-open")
                .help("Do not open the dashboard in a browser")
                .action(clap::ArgAction::SetTrue),
        )
}

pub struct Config {
    input: PathBuf,
    verbose: u8,
    listen: SocketAddr,
    sampling: Option<SamplingDirective>,
    open: bool,
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
            verbose: *args.get_one::<u8>("VERBOSE").unwrap_or(&0),
            listen: *args.get_one::<SocketAddr>("LISTEN").unwrap(),
            sampling,
            open: !args.get_flag("NO_OPEN"),
        })
    }
}

/// Runs the viewer: loads the recording, renders every dashboard section
/// to JSON in memory, and serves the embedded single-page frontend.
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

    // render every section up front; an interactive session always
    // reduces the plotted series
    let mut sections = HashMap::new();

    for (key, view) in dashboard::build(&data, config.sampling.as_ref(), false, true) {
        sections.insert(key, serde_json::to_string(&view).unwrap());
    }

    let state = AppState { sections };

    // initialize async runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(1)
        .thread_name("syntonic")
        .build()
        .expect("failed to launch async runtime");

    ctrlc::set_handler(move || {
        std::process::exit(2);
    })
    .expect("failed to set ctrl-c handler");

    info!("serving on: http://{}", config.listen);

    if config.open {
        let url = format!("http://{}", config.listen);

        rt.spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(500)).await;

            if open::that(&url).is_err() {
                warn!("failed to open browser to: {url}");
            }
        });
    }

    let listen = config.listen;
    rt.block_on(async move { serve(listen, state).await });
}

async fn serve(listen: SocketAddr, state: AppState) {
    let app = app(state);

    let listener = TcpListener::bind(listen).await.expect("failed to listen");

    axum::serve(listener, app)
        .await
        .expect("failed to run http server");
}

struct AppState {
    sections: HashMap<String, String>,
}

fn app(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/", get(index))
        .route("/about", get(about))
        .route("/lib/{*path}", get(asset))
        .nest_service("/data", data.with_state(state))
        .fallback(index)
        .layer(
            ServiceBuilder::new()
                .layer(RequestDecompressionLayer::new())
                .layer(CompressionLayer::new()),
        )
}

async fn index() -> Html<&'static str> {
    Html(
        ASSETS
            .get_file("index.html")
            .and_then(|file| file.contents_utf8())
            .unwrap_or_default(),
    )
}

async fn asset(uri: Uri) -> (StatusCode, [(http::HeaderName, &'static str); 1], &'static [u8]) {
    // asset paths inside the embedded dir match the request path
    let path = uri.path().trim_start_matches('/');

    match ASSETS.get_file(path) {
        Some(file) => {
            let content_type = match path.rsplit('.').next() {
                Some("js") => "application/javascript",
                Some("css") => "text/css",
                _ => "application/octet-stream",
            };

            (StatusCode::OK, [(CONTENT_TYPE, content_type)], file.contents())
        }
        None => (StatusCode::NOT_FOUND, [(CONTENT_TYPE, "text/plain")], b""),
    }
}

// Basic /about page handler
async fn about() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("Syntonic {version} Viewer\nFor information, see: https://github.com/iopsystems/syntonic\n")
}

async fn data(State(state): State<Arc<AppState>>, uri: Uri) -> (StatusCode, String) {
    let path = uri.path();
    let parts: Vec<&str> = path.split('/').collect();

    (
        StatusCode::OK,
        state
            .sections
            .get(parts[1])
            .map(|v| v.to_string())
            .unwrap_or("{ }".to_string()),
    )
}
