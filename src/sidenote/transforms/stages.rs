//! Individual transformation stages
//!
//! Each stage implements the `Runnable` trait.
//!
//! - [`FormReading`]: source text to located forms, with the line index kept alongside
//! - [`Arrangement`]: located forms to sections

use crate::sidenote::arranging::{arrange, Section};
use crate::sidenote::config::SidenoteConfig;
use crate::sidenote::docstrings::SourceIndex;
use crate::sidenote::forms::{collect_forms, LocatedForm};
use crate::sidenote::lines::SourceLines;
use crate::sidenote::transforms::{Runnable, TransformError};
use tracing::debug;

/// The forms of one source text and the lines they were read from
#[derive(Debug, Clone, PartialEq)]
pub struct FormBatch {
    pub lines: SourceLines,
    pub forms: Vec<LocatedForm>,
}

/// Form reading stage
///
/// # Input
/// - `String` - source text
///
/// # Output
/// - [`FormBatch`] - every top-level form with its line span
///
/// The comment handler is installed for the duration of the read only; it is back to
/// its previous value by the time the stage returns, also on error.
pub struct FormReading;

impl FormReading {
    pub fn new() -> Self {
        FormReading
    }
}

impl Default for FormReading {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<String, FormBatch> for FormReading {
    fn run(&self, input: String) -> Result<FormBatch, TransformError> {
        Runnable::<&str, FormBatch>::run(self, input.as_str())
    }
}

// Also implement for &str for convenience
impl Runnable<&str, FormBatch> for FormReading {
    fn run(&self, input: &str) -> Result<FormBatch, TransformError> {
        let lines = SourceLines::index(input);
        let forms = collect_forms(input)?;
        debug!(lines = lines.len(), forms = forms.len(), "read forms");
        Ok(FormBatch { lines, forms })
    }
}

/// Arrangement stage
///
/// # Input
/// - [`FormBatch`]
///
/// # Output
/// - `Vec<Section>` - comment and code sections in source order
///
/// Docstrings are resolved against a [`SourceIndex`] seeded with the batch's own
/// definitions, so a file documents itself without any source roots configured.
#[derive(Debug, Clone, Default)]
pub struct Arrangement {
    config: SidenoteConfig,
}

impl Arrangement {
    pub fn new(config: SidenoteConfig) -> Self {
        Arrangement { config }
    }
}

impl Runnable<FormBatch, Vec<Section>> for Arrangement {
    fn run(&self, input: FormBatch) -> Result<Vec<Section>, TransformError> {
        let FormBatch { lines, forms } = input;
        let mut index = SourceIndex::from_config(&self.config.lookup);
        index.index_forms(forms.iter().filter_map(LocatedForm::datum));
        Ok(arrange(forms, &lines, &mut index, &self.config.arrange))
    }
}
