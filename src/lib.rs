// Re-export modules
pub mod adapters;
pub mod config;
pub mod errors;
pub mod export;
pub mod fetch;
pub mod normalize;
pub mod pipeline;
pub mod results;
pub mod router;
pub mod tagging;

// Re-export commonly used types for convenience
pub use config::ExtractorConfig;
pub use errors::{ExtractError, FetchError};
pub use export::{ExportFormat, export_all};
pub use fetch::Fetcher;
pub use pipeline::Extractor;
pub use results::{FoaRecord, RawPage};
pub use router::{SourceFamily, route};
pub use tagging::Vocabulary;
