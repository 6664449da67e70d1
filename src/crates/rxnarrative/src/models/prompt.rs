//! Prompt model

use crate::models::Section;
use serde::{Deserialize, Serialize};

/// A fully rendered instruction for one section.
///
/// Built deterministically from one snapshot plus the section's fixed
/// instruction header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    /// Section this prompt belongs to
    pub section: Section,

    /// Text sent to the completion model
    pub text: String,
}

impl Prompt {
    pub fn new(section: Section, text: impl Into<String>) -> Self {
        Self {
            section,
            text: text.into(),
        }
    }
}
