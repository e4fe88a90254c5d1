//! One-shot image scoring binary.
//!
//! Sends one image to the scoring endpoint, decodes the detections against
//! a label map, and optionally writes an annotated copy of the image.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use boxscore_client::{Parameters, ScoringClient, ScoringConfig};
use boxscore_models::LabelMap;
use boxscore_render::{annotate, save_annotated, LabelFont, RenderOptions};

#[derive(Parser)]
#[command(
    name = "boxscore",
    about = "Score an image against a remote object-detection service"
)]
struct Args {
    /// Local path or http(s) URL of the image to score
    #[arg(long)]
    image: String,

    /// Scoring endpoint URL (default: BOXSCORE_ENDPOINT)
    #[arg(long)]
    endpoint: Option<String>,

    /// Bearer token for the endpoint (default: BOXSCORE_AUTH_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// JSON file mapping class ids to label names, e.g. {"3": "orange"}
    #[arg(long)]
    label_map: PathBuf,

    /// Drop detections scoring at or below this threshold
    #[arg(long)]
    min_score: Option<f64>,

    /// Write an annotated copy of the image here
    #[arg(long)]
    out: Option<PathBuf>,

    /// TTF/OTF font for label text on the annotated image
    #[arg(long)]
    font: Option<PathBuf>,

    /// Resize the annotated image, e.g. 640x480
    #[arg(long, value_name = "WxH", value_parser = parse_size)]
    render_size: Option<(u32, u32)>,

    /// Extra request parameter as key=value (value parsed as JSON when possible)
    #[arg(long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got {s:?}"))?;
    let w = w.parse().map_err(|_| format!("invalid width {w:?}"))?;
    let h = h.parse().map_err(|_| format!("invalid height {h:?}"))?;
    Ok((w, h))
}

fn parse_parameters(pairs: &[String]) -> Result<Parameters, String> {
    let mut parameters = Parameters::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got {pair:?}"))?;
        let value = serde_json::from_str(value)
            .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
        parameters.insert(key.to_string(), value);
    }
    Ok(parameters)
}

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("boxscore=info".parse().expect("static directive"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ScoringConfig::from_env();
    if let Some(endpoint) = &args.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(token) = &args.token {
        config.auth_token = Some(token.clone());
    }
    let client = ScoringClient::new(config)?;

    let labels = LabelMap::from_json_str(&std::fs::read_to_string(&args.label_map)?)?;
    let parameters = parse_parameters(&args.params)?;

    let is_url = args.image.starts_with("http://") || args.image.starts_with("https://");

    // For URLs the bytes are fetched once and reused for rendering
    let image_bytes = if is_url {
        Some(client.fetch_image_bytes(&args.image).await?)
    } else {
        None
    };

    let raw = match &image_bytes {
        Some(bytes) => client.score_bytes(bytes, parameters).await?,
        None => client.score_file(&args.image, parameters).await?,
    };

    let mut set = raw.decode(&labels, &args.image)?;
    if let Some(threshold) = args.min_score {
        set = set.filter_by_score(threshold);
    }

    info!(
        image = %args.image,
        detections = set.len(),
        "Scoring complete"
    );
    for detection in &set {
        info!(
            label = %detection.label,
            score = detection.score,
            top = detection.bounds.top,
            left = detection.bounds.left,
            bottom = detection.bounds.bottom,
            right = detection.bounds.right,
            "Detection"
        );
    }

    if let Some(out) = &args.out {
        let options = RenderOptions {
            font: args.font.as_deref().map(LabelFont::from_file).transpose()?,
            target_size: args.render_size,
            ..Default::default()
        };
        let image = match &image_bytes {
            Some(bytes) => image::load_from_memory(bytes)?,
            None => image::open(&args.image)?,
        };
        let annotated = annotate(&image, &set, &options)?;
        save_annotated(&annotated, out)?;
        info!(path = %out.display(), "Wrote annotated image");
    }

    Ok(())
}
