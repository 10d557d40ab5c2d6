//! Public types and constants for the layout engine.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Marker inserted where truncation removed characters.
pub const ELLIPSIS: &str = "…";

/// Policy for shortening text that does not fit on a single line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TruncateMode {
    /// Keep the text as is; overflow is left to clipping.
    #[default]
    None,
    /// Remove characters from the beginning: "…ame.txt".
    Head,
    /// Remove characters from the end: "file…".
    Tail,
}

/// Policy for paragraphs wider than a multi-line view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineLayout {
    /// One line per paragraph, overflow clipped at the view edge.
    #[default]
    Clip,
    /// One line per paragraph, tail-truncated to the view width.
    Truncate,
    /// Greedy word wrap; a word wider than the view gets a line of its own.
    Wrap,
}

/// One laid-out line: its text and its rectangle relative to the view's text origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub rect: Rect,
    pub text: String,
}
