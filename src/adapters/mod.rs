pub mod grants;
pub mod nsf;

mod markup;

#[cfg(test)]
mod tests;

use crate::errors::ExtractError;
use crate::results::{Field, FieldExtractionResult, RawPage};
use crate::router::SourceFamily;

/// Fields of which at least one must be present for a page to be usable
pub const CRITICAL_FIELDS: [Field; 3] = [Field::FoaId, Field::Title, Field::Description];

impl SourceFamily {
    /// Extracts the raw field map of a page with this family's adapter
    pub fn extract(&self, page: &RawPage) -> Result<FieldExtractionResult, ExtractError> {
        let result = match self {
            SourceFamily::GrantsGov => grants::extract(page),
            SourceFamily::Nsf => nsf::extract(page),
        };

        ::log::debug!(
            "{} adapter found {} of {} fields in {}",
            self,
            result.found_count(),
            Field::ALL.len(),
            page.url
        );

        if CRITICAL_FIELDS.iter().all(|f| !result.is_found(*f)) {
            return Err(ExtractError::InsufficientContent { family: *self });
        }
        Ok(result)
    }
}
