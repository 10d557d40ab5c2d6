//! Text layout engine: single-line truncation and multi-line recalculation.
//!
//! - [`compute_truncated_text`]: shorten a string with an ellipsis so it fits a width budget
//! - [`recalculate_lines`]: split text into paragraphs and lay each out as clipped,
//!   truncated or greedily word-wrapped lines
//! - [`max_line_width`]: widest measured line, for callers that size views to content
//!
//! Every function takes the measurement function as a parameter and keeps no
//! state between calls, so identical inputs always give identical output.

pub mod lines;
pub mod truncate;
pub mod types;

pub use lines::{max_line_width, paragraphs, recalculate_lines};
pub use truncate::compute_truncated_text;
pub use types::{ELLIPSIS, Line, LineLayout, TruncateMode};
