pub mod domain;
mod normalizer;
mod parser;

pub use domain::{Availability, ConstraintViolation, NormalizedUnit, UnitField, UnitRecord};
pub use normalizer::normalize;
pub use parser::{parse_fragment, RawUnitFields};

use tracing::debug;

/// Why a listing fragment could not become a [`UnitRecord`]. Either case
/// means the run must stop.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    #[error("listing fragment does not match the unit grammar: {fragment:?}")]
    GrammarMismatch { fragment: String },
    #[error("invalid {field} in listing fragment {fragment:?}: {reason}")]
    ValidationFailure {
        field: UnitField,
        reason: String,
        fragment: String,
    },
}

impl ExtractionError {
    pub fn fragment(&self) -> &str {
        match self {
            Self::GrammarMismatch { fragment } | Self::ValidationFailure { fragment, .. } => {
                fragment
            }
        }
    }

    fn validation(violation: ConstraintViolation, fragment: &str) -> Self {
        Self::ValidationFailure {
            field: violation.field,
            reason: violation.reason,
            fragment: fragment.trim().to_string(),
        }
    }
}

/// Turns listing sentences into validated unit records.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitExtractor;

impl UnitExtractor {
    pub fn extract(&self, fragment: &str) -> Result<UnitRecord, ExtractionError> {
        debug!(fragment, "extracting unit");

        let fields = parse_fragment(fragment)?;
        let unit = normalize(&fields).map_err(|err| ExtractionError::validation(err, fragment))?;
        UnitRecord::try_new(unit).map_err(|err| ExtractionError::validation(err, fragment))
    }

    pub fn extract_all<'a, I>(&self, fragments: I) -> Result<Vec<UnitRecord>, ExtractionError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        fragments
            .into_iter()
            .map(|fragment| self.extract(fragment))
            .collect()
    }
}
