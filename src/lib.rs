//! labelfit
//!
//! Text layout for fixed-size text views: single-line truncation with an
//! ellipsis, multi-line clip/truncate/wrap layout, and label controls that
//! cache the result and recompute it only when their inputs change.
//!
//! ### Features
//! - Head or tail truncation against any measurement function
//! - Greedy word wrap that never splits a word and keeps blank lines
//! - `TextLabel` / `MultiLineTextLabel` with change notifications, auto-height and size-to-fit
//! - Heuristic font metrics for headless use, plotters/ab_glyph metrics for real fonts
//! - Render a label to SVG or PNG
//!
//! ### Example
//! ```
//! use std::rc::Rc;
//! use labelfit::{EstimatedFont, FontSpec, LineLayout, MultiLineTextLabel, Rect};
//!
//! let font = Rc::new(EstimatedFont::new(FontSpec::new("sans-serif", 10.0)));
//! let mut label = MultiLineTextLabel::new(Rect::new(0.0, 0.0, 60.0, 0.0), "one two three", font);
//! label.set_line_layout(LineLayout::Wrap);
//! label.set_auto_height(true);
//! let lines = label.lines_checked()?;
//! assert_eq!(lines.len(), 2);
//! assert_eq!(label.view_size().height, 20.0);
//! # Ok::<(), labelfit::LabelError>(())
//! ```

pub mod config;
pub mod error;
pub mod font;
pub mod geometry;
pub mod label;
pub mod layout;
pub mod multiline;
pub mod render;
pub mod style;

pub use config::LabelConfig;
pub use error::LabelError;
pub use font::{Canvas, EstimatedFont, Font, MeasureCache};
pub use geometry::{Point, Rect};
pub use label::{DisplayPolicy, LabelMessage, LayoutState, SubscriptionId, TextLabel, View};
pub use layout::{ELLIPSIS, Line, LineLayout, TruncateMode};
pub use multiline::MultiLineTextLabel;
pub use style::{FontSpec, FontWeight, HAlign, LabelStyle, Rgb};
