use clap::{Parser, ValueEnum};
use foa_extract::ExportFormat;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "foa-extract")]
#[command(about = "Extracts and tags funding opportunity announcements from Grants.gov and NSF pages")]
#[command(version)]
pub struct Args {
    /// Funding opportunity page to extract
    #[arg(long)]
    pub url: String,

    /// Directory the exported files are written to
    #[arg(long, default_value = "./out")]
    pub out_dir: PathBuf,

    /// Export format
    #[arg(long, value_enum, default_value_t = FormatArg::All)]
    pub format: FormatArg,

    /// Disable the statistical (TF-IDF) tagger
    #[arg(long)]
    pub no_nlp: bool,

    /// Skip WebDriver rendering and use the static markup only
    #[arg(long)]
    pub no_render: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// JSON run configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// JSON vocabulary definition replacing the built-in topics
    #[arg(long)]
    pub vocabulary: Option<PathBuf>,

    /// WebDriver server URL (overrides WEBDRIVER_URL and the config file)
    #[arg(long)]
    pub webdriver_url: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Json,
    Csv,
    All,
}

/// Convert from CLI argument format to the export formats it selects
pub fn convert_format(arg: FormatArg) -> Vec<ExportFormat> {
    match arg {
        FormatArg::Json => vec![ExportFormat::Json],
        FormatArg::Csv => vec![ExportFormat::Csv],
        FormatArg::All => ExportFormat::ALL.to_vec(),
    }
}
