//! Human-readable rendering of decoded entries.
//!
//! Two layouts are supported. [`OutputFormat::Normal`] puts every phrase on an
//! unindented heading line followed by one indented bullet per translation:
//!
//! ```text
//! Haus:
//!     - house
//!     - home
//! ```
//!
//! [`OutputFormat::Compact`] puts each phrase and all of its translations on a
//! single line, with a blank line between phrases:
//!
//! ```text
//! - Haus: house / home
//!
//! - das Haus: the house
//! ```
//!
//! The full-text query treats every line that does not start with whitespace
//! as a heading, in either layout.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::storage::entry::EntryGroup;
use crate::DictError;

const BULLET_INDENT: &str = "    - ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Normal,
    Compact,
}

impl FromStr for OutputFormat {
    type Err = DictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Ok(OutputFormat::Normal),
            "compact" => Ok(OutputFormat::Compact),
            _ => Err(DictError::invalid_parameter(format!("Unknown output format: {}", s))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Normal => write!(f, "normal"),
            OutputFormat::Compact => write!(f, "compact"),
        }
    }
}

/// Renders phrase groups in the requested layout. The result ends with a newline.
pub fn render_groups(groups: &[EntryGroup], format: OutputFormat) -> String {
    let mut text = String::new();
    match format {
        OutputFormat::Normal => {
            for group in groups {
                text.push_str(&group.phrase);
                text.push_str(":\n");
                for translation in &group.translations {
                    text.push_str(BULLET_INDENT);
                    text.push_str(translation);
                    text.push('\n');
                }
            }
        }
        OutputFormat::Compact => {
            for (n, group) in groups.iter().enumerate() {
                if n > 0 {
                    text.push('\n');
                }
                text.push_str("- ");
                text.push_str(&group.phrase);
                text.push_str(": ");
                text.push_str(&group.translations.join(" / "));
                text.push('\n');
            }
        }
    }
    text
}
