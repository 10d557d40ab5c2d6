//! Font metrics and drawing capabilities consumed by the layout engine.
//!
//! The engine only ever talks to [`Font`] (measurement and vertical metrics)
//! and [`Canvas`] (draw commands with a clip rectangle). Concrete backends
//! live elsewhere: [`EstimatedFont`] below, and the plotters backend in
//! [`crate::render`].

use ahash::AHashMap;
use std::cell::RefCell;

use crate::error::Result;
use crate::geometry::{Point, Rect};
use crate::style::{FontSpec, Rgb};

/// Font Metrics Provider: vertical metrics plus string measurement and drawing.
///
/// All values are in the same coordinate space as view geometry.
pub trait Font {
    fn descriptor(&self) -> &FontSpec;
    fn ascent(&self) -> f64;
    fn descent(&self) -> f64;
    fn leading(&self) -> f64;
    fn cap_height(&self) -> f64;

    /// Advance width of `text` on a single line.
    fn measure(&self, text: &str) -> Result<f64>;

    /// Vertical advance between consecutive lines.
    fn line_height(&self) -> f64 {
        self.ascent() + self.descent() + self.leading()
    }

    /// Draw `text` with its baseline starting at `origin`.
    fn draw(&self, canvas: &mut dyn Canvas, text: &str, origin: Point, antialias: bool) -> Result<()> {
        canvas.draw_string(self.descriptor(), self.ascent(), text, origin, antialias)
    }
}

/// Drawing Context: receives draw commands, honoring the current clip rectangle.
pub trait Canvas {
    /// `None` removes clipping.
    fn set_clip(&mut self, rect: Option<Rect>);
    fn set_font_color(&mut self, color: Rgb);
    fn fill_rect(&mut self, rect: Rect, color: Rgb) -> Result<()>;
    /// `origin` is the left end of the baseline; `ascent` is the distance from
    /// the baseline up to the top of the line, as reported by the font.
    fn draw_string(
        &mut self,
        font: &FontSpec,
        ascent: f64,
        text: &str,
        origin: Point,
        antialias: bool,
    ) -> Result<()>;
}

/// Heuristic provider: every character advances by a fixed amount.
///
/// Needs no font files, which makes it handy for headless layout and tests.
/// The default advance is `0.6 * size`, the usual average for sans-serif faces.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatedFont {
    spec: FontSpec,
    char_advance: f64,
    space_advance: f64,
}

impl EstimatedFont {
    pub fn new(spec: FontSpec) -> Self {
        let advance = spec.size * 0.60;
        Self {
            spec,
            char_advance: advance,
            space_advance: advance,
        }
    }

    /// Override the advance of non-whitespace and whitespace characters.
    pub fn with_advances(mut self, char_advance: f64, space_advance: f64) -> Self {
        self.char_advance = char_advance;
        self.space_advance = space_advance;
        self
    }
}

impl Font for EstimatedFont {
    fn descriptor(&self) -> &FontSpec {
        &self.spec
    }

    fn ascent(&self) -> f64 {
        self.spec.size * 0.8
    }

    fn descent(&self) -> f64 {
        self.spec.size - self.ascent()
    }

    fn leading(&self) -> f64 {
        0.0
    }

    fn cap_height(&self) -> f64 {
        self.spec.size * 0.7
    }

    fn measure(&self, text: &str) -> Result<f64> {
        Ok(text
            .chars()
            .map(|c| {
                if c.is_whitespace() {
                    self.space_advance
                } else {
                    self.char_advance
                }
            })
            .sum())
    }
}

/// Memoizes successful measurements of one provider.
///
/// Meant to live for a single recomputation, so a font change can never
/// observe stale widths. Failures are not cached.
pub struct MeasureCache<'a> {
    font: &'a dyn Font,
    memo: RefCell<AHashMap<String, f64>>,
}

impl<'a> MeasureCache<'a> {
    pub fn new(font: &'a dyn Font) -> Self {
        Self {
            font,
            memo: RefCell::new(AHashMap::new()),
        }
    }

    pub fn measure(&self, text: &str) -> Result<f64> {
        if text.is_empty() {
            return Ok(0.0);
        }
        if let Some(w) = self.memo.borrow().get(text) {
            return Ok(*w);
        }
        let w = self.font.measure(text)?;
        self.memo.borrow_mut().insert(text.to_owned(), w);
        Ok(w)
    }

    pub fn font(&self) -> &'a dyn Font {
        self.font
    }
}
