//! Edit-eligibility classifier.
//!
//! # Responsibility
//! - Decide whether a field's pre-render text may be wrapped in an editable
//!   container.
//! - Report which directive family blocked a field.
//!
//! # Invariants
//! - Classification is a pure, total function over arbitrary strings.
//! - Detectors are independent; a field is editable only when none match.

pub mod detectors;

pub use detectors::{
    ClozeDetector, DirectiveDetector, DirectiveFamily, MediaDetector, TypesetDetector,
};

static DEFAULT_DETECTORS: [&dyn DirectiveDetector; 3] =
    [&MediaDetector, &ClozeDetector, &TypesetDetector];

/// Classification result for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Editable,
    /// First directive family that matched.
    Blocked(DirectiveFamily),
}

impl Eligibility {
    pub fn is_editable(self) -> bool {
        matches!(self, Self::Editable)
    }
}

/// Ordered set of detectors composed with logical OR.
pub struct Classifier {
    detectors: Vec<Box<dyn DirectiveDetector>>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(vec![
            Box::new(MediaDetector),
            Box::new(ClozeDetector),
            Box::new(TypesetDetector),
        ])
    }
}

impl Classifier {
    pub fn new(detectors: Vec<Box<dyn DirectiveDetector>>) -> Self {
        Self { detectors }
    }

    /// Appends one more directive family.
    pub fn with_detector(mut self, detector: Box<dyn DirectiveDetector>) -> Self {
        self.detectors.push(detector);
        self
    }

    pub fn classify(&self, text: &str) -> Eligibility {
        first_match(self.detectors.iter().map(|detector| detector.as_ref()), text)
    }
}

/// Classifies `text` with the built-in detectors.
pub fn classify(text: &str) -> Eligibility {
    first_match(DEFAULT_DETECTORS.iter().copied(), text)
}

/// Returns whether `text` is safe to expose through an editable container.
pub fn is_editable(text: &str) -> bool {
    classify(text).is_editable()
}

fn first_match<'a>(
    detectors: impl Iterator<Item = &'a (dyn DirectiveDetector + 'static)>,
    text: &str,
) -> Eligibility {
    for detector in detectors {
        if detector.detect(text) {
            return Eligibility::Blocked(detector.family());
        }
    }
    Eligibility::Editable
}
