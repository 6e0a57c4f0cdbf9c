//! Standard transform definitions
//!
//! Pre-built pipelines for the common paths, defined as statics with
//! `once_cell::sync::Lazy`. They use the default configuration; build a pipeline with
//! [`sections_with`] for anything else.

use crate::sidenote::arranging::Section;
use crate::sidenote::config::SidenoteConfig;
use crate::sidenote::transforms::stages::{Arrangement, FormBatch, FormReading};
use crate::sidenote::transforms::Transform;
use once_cell::sync::Lazy;

/// Type alias for the form reading transform
pub type FormsTransform = Transform<String, FormBatch>;

/// Type alias for the full pipeline
pub type SectionsTransform = Transform<String, Vec<Section>>;

/// Form reading transform: String → FormBatch
///
/// Reads every top-level form, comments included, with its line span.
pub static READ_FORMS: Lazy<FormsTransform> =
    Lazy::new(|| Transform::from_fn(Ok).then(FormReading::new()));

/// String to sections transform: String → Vec<Section>
///
/// 1. Form reading
/// 2. Docstring indexing of the file's own definitions
/// 3. Section arrangement
pub static STRING_TO_SECTIONS: Lazy<SectionsTransform> =
    Lazy::new(|| sections_with(SidenoteConfig::default()));

/// Build the full pipeline for a specific configuration
pub fn sections_with(config: SidenoteConfig) -> SectionsTransform {
    Transform::from_fn(Ok)
        .then_transform(&READ_FORMS)
        .then(Arrangement::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_forms() {
        let batch = READ_FORMS.run(";; a\n(x)\n".to_string()).unwrap();
        assert_eq!(batch.forms.len(), 2);
    }

    #[test]
    fn test_string_to_sections() {
        let sections = STRING_TO_SECTIONS
            .run(";; hello\n(defn f [] 1)\n".to_string())
            .unwrap();
        assert_eq!(
            sections,
            vec![Section::comment("hello"), Section::code("(defn f [] 1)", "")]
        );
    }
}
