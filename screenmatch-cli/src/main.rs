use clap::Parser;
use screenmatch::io::load_gray_image;
use screenmatch::{
    CcoeffNormed, Match, MatchConfig, OwnedImage, Pattern, Poller, ScreenMatchError,
    ScreenMatchResult, Template, WaitConfig,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "ScreenMatch CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
enum Mode {
    #[default]
    Best,
    All,
    Wait,
    WaitVanish,
    WaitAny,
    WaitCount,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Config {
    image_path: String,
    pattern_paths: Vec<String>,
    threshold: Option<f32>,
    mode: Mode,
    count: usize,
    timeout_ms: Option<u64>,
    idle_delay_ms: u64,
    suppression_ratio: f32,
    parallel: bool,
    output_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let cfg = MatchConfig::default();
        Self {
            image_path: String::new(),
            pattern_paths: Vec::new(),
            threshold: None,
            mode: Mode::Best,
            count: 1,
            timeout_ms: None,
            idle_delay_ms: 0,
            suppression_ratio: cfg.suppression_ratio,
            parallel: cfg.parallel,
            output_path: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct MatchRecord {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    similarity: f32,
    pattern: String,
}

impl MatchRecord {
    fn new(found: Match, pattern: &Pattern) -> Self {
        Self {
            x: found.rect.x,
            y: found.rect.y,
            width: found.rect.width,
            height: found.rect.height,
            similarity: found.similarity,
            pattern: pattern.name().unwrap_or_default().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    matches: Vec<MatchRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vanished: Option<bool>,
    elapsed_ms: u64,
}

fn load_patterns(config: &Config) -> Result<Vec<Pattern>, Box<dyn std::error::Error>> {
    let matcher = Arc::new(CcoeffNormed::with_config(MatchConfig {
        suppression_ratio: config.suppression_ratio,
        parallel: config.parallel,
    })?);
    let mut patterns = Vec::with_capacity(config.pattern_paths.len());
    for path in &config.pattern_paths {
        let template = Template::from(load_gray_image(path)?);
        let mut pattern = Pattern::new(template)
            .with_matcher(matcher.clone())
            .with_name(path.as_str());
        if let Some(threshold) = config.threshold {
            pattern = pattern.with_threshold(threshold)?;
        }
        patterns.push(pattern);
    }
    Ok(patterns)
}

fn run(config: &Config, patterns: &[Pattern]) -> ScreenMatchResult<Output> {
    let started = Instant::now();
    let image_path = config.image_path.clone();
    let source = move || -> ScreenMatchResult<OwnedImage> {
        load_gray_image(&image_path).map_err(|err| ScreenMatchError::Capture {
            reason: err.to_string(),
        })
    };
    let wait = WaitConfig {
        timeout: config.timeout_ms.map(Duration::from_millis),
        idle_delay: Duration::from_millis(config.idle_delay_ms),
    };
    let mut poller = Poller::new(source).with_config(wait);
    let first = &patterns[0];

    let mut vanished = None;
    let matches = match config.mode {
        Mode::Best => poller
            .find_once(first)?
            .map(|found| MatchRecord::new(found, first))
            .into_iter()
            .collect(),
        Mode::All => poller
            .find_all_once(first)?
            .into_iter()
            .map(|found| MatchRecord::new(found, first))
            .collect(),
        Mode::Wait => poller
            .wait_for_match(first, None)?
            .map(|found| MatchRecord::new(found, first))
            .into_iter()
            .collect(),
        Mode::WaitVanish => {
            vanished = Some(poller.wait_for_vanish(first, None)?);
            Vec::new()
        }
        Mode::WaitAny => poller
            .wait_for_any(patterns, None)?
            .map(|any| MatchRecord::new(any.matched, &patterns[any.index]))
            .into_iter()
            .collect(),
        Mode::WaitCount => poller
            .wait_for_count(first, config.count, None)?
            .into_iter()
            .map(|found| MatchRecord::new(found, first))
            .collect(),
    };

    Ok(Output {
        matches,
        vanished,
        elapsed_ms: started.elapsed().as_millis() as u64,
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("screenmatch=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.image_path.is_empty() || config.pattern_paths.is_empty() {
        return Err("image_path and pattern_paths must be set in the config".into());
    }

    let patterns = load_patterns(&config)?;
    tracing::info!(
        mode = ?config.mode,
        patterns = patterns.len(),
        "starting search"
    );
    let output = run(&config, &patterns)?;
    let json = serde_json::to_string_pretty(&output)?;

    match &config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
