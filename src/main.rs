use clap::Parser;
use foa_extract::errors::{ConfigError, ExportError, VocabularyError};
use foa_extract::{ExtractError, Extractor, ExtractorConfig, FetchError, Fetcher, Vocabulary, export_all};
use std::process::ExitCode;

mod args;
use args::{Args, convert_format};

/// Anything that ends a run early, grouped by exit status
#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Vocabulary(#[from] VocabularyError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl RunError {
    fn exit_code(&self) -> u8 {
        match self {
            RunError::Config(_) | RunError::Vocabulary(_) | RunError::Extract(_) => 1,
            RunError::Fetch(_) => 2,
            RunError::Export(_) => 3,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command-line arguments
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ::log::error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(args: &Args) -> Result<(), RunError> {
    let config = load_config(args)?;

    let vocabulary = match &config.vocabulary_path {
        Some(path) => Vocabulary::from_file(path)?,
        None => Vocabulary::builtin()?,
    };

    ::log::info!("URL: {}", args.url);
    ::log::info!("Output directory: {}", args.out_dir.display());
    ::log::info!("Format: {:?}", args.format);
    ::log::info!(
        "Statistical tagging: {}",
        if config.statistical_enabled { "enabled" } else { "disabled" }
    );
    ::log::debug!("Vocabulary {} with {} topics", vocabulary.version(), vocabulary.len());

    let fetcher = Fetcher::new(config.fetch.clone())?;
    if fetcher.config().render {
        ::log::info!("Rendering through WebDriver at {}", fetcher.config().webdriver_url);
    }
    let page = fetcher.fetch(&args.url).await?;

    let start_time = std::time::Instant::now();
    let extractor = Extractor::with_config(vocabulary, &config);
    let record = extractor.extract(&page)?;
    ::log::info!(
        "Extracted {} ({} tags) in {:.2} seconds",
        record.foa_id,
        record.tags.len(),
        start_time.elapsed().as_secs_f64()
    );

    let written = export_all(&record, &args.out_dir, &convert_format(args.format))?;
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}

/// Configuration file first, then environment, then command-line flags
fn load_config(args: &Args) -> Result<ExtractorConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => ExtractorConfig::from_file(path)?,
        None => ExtractorConfig::default(),
    };

    if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
        config.fetch.webdriver_url = webdriver_url;
    }
    if let Some(webdriver_url) = &args.webdriver_url {
        config.fetch.webdriver_url = webdriver_url.clone();
    }
    if let Some(path) = &args.vocabulary {
        config.vocabulary_path = Some(path.clone());
    }
    if args.no_nlp {
        config.statistical_enabled = false;
    }
    if args.no_render {
        config.fetch.render = false;
    }
    Ok(config)
}
