//! Plotters backend: font measurement through `ab_glyph`, drawing onto any
//! plotters `DrawingArea`, and rendering a label straight to SVG or PNG.
//!
//! `ab_glyph` doesn't discover OS fonts, so a family has to be registered with
//! [`register_font_file`] before [`PlottersFont`] can measure with it.
//! Unregistered families surface as `MeasurementUnavailable`.

use anyhow::{Context, Result as AnyResult, anyhow, bail};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::path::Path;

use crate::error::{LabelError, Result};
use crate::font::{Canvas, Font};
use crate::geometry::{Point, Rect};
use crate::label::View;
use crate::style::{FontSpec, FontWeight, Rgb};

/// Vertical metrics as fractions of the font size. Plotters only reports
/// advance boxes, so these follow the proportions of common sans-serif faces.
/// Descent is whatever the ascent leaves of the size.
const ASCENT_RATIO: f64 = 0.8;
const CAP_HEIGHT_RATIO: f64 = 0.7;

fn font_style(weight: FontWeight) -> FontStyle {
    match weight {
        FontWeight::Normal => FontStyle::Normal,
        FontWeight::Bold | FontWeight::BoldItalic => FontStyle::Bold,
        FontWeight::Italic => FontStyle::Italic,
    }
}

fn font_desc(spec: &FontSpec) -> FontDesc<'_> {
    FontDesc::new(
        FontFamily::from(spec.family.as_str()),
        spec.size,
        font_style(spec.weight),
    )
}

fn rgb_color(c: Rgb) -> RGBColor {
    RGBColor(c.r, c.g, c.b)
}

/// Register a TrueType/OpenType file under `family` for the given weight.
///
/// The font bytes are kept for the lifetime of the process, as plotters requires.
pub fn register_font_file<P: AsRef<Path>>(family: &str, weight: FontWeight, path: P) -> AnyResult<()> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    plotters::style::register_font(family, font_style(weight), bytes)
        .map_err(|_| anyhow!("invalid font {}", path.display()))?;
    log::debug!("registered {} as {family:?} ({weight:?})", path.display());
    Ok(())
}

/// Font provider measuring with plotters' `ab_glyph` text path.
#[derive(Debug, Clone, PartialEq)]
pub struct PlottersFont {
    spec: FontSpec,
}

impl PlottersFont {
    pub fn new(spec: FontSpec) -> Self {
        Self { spec }
    }
}

impl Font for PlottersFont {
    fn descriptor(&self) -> &FontSpec {
        &self.spec
    }

    fn ascent(&self) -> f64 {
        self.spec.size * ASCENT_RATIO
    }

    fn descent(&self) -> f64 {
        self.spec.size - self.ascent()
    }

    fn leading(&self) -> f64 {
        0.0
    }

    fn cap_height(&self) -> f64 {
        self.spec.size * CAP_HEIGHT_RATIO
    }

    fn measure(&self, text: &str) -> Result<f64> {
        if text.is_empty() {
            return Ok(0.0);
        }
        font_desc(&self.spec)
            .box_size(text)
            .map(|(w, _)| f64::from(w))
            .map_err(|e| LabelError::MeasurementUnavailable(format!("{:?}", e)))
    }
}

/// [`Canvas`] over a plotters drawing area.
///
/// Plotters has no clip stack: a string whose baseline origin falls outside
/// the clip rectangle is dropped, anything else is drawn whole. Text is
/// anchored at its top, so the caller's ascent turns the baseline into a top edge.
pub struct PlottersCanvas<'a, DB: DrawingBackend> {
    area: &'a DrawingArea<DB, Shift>,
    color: RGBColor,
    clip: Option<Rect>,
}

impl<'a, DB: DrawingBackend> PlottersCanvas<'a, DB> {
    pub fn new(area: &'a DrawingArea<DB, Shift>) -> Self {
        Self {
            area,
            color: BLACK,
            clip: None,
        }
    }
}

impl<DB: DrawingBackend> Canvas for PlottersCanvas<'_, DB> {
    fn set_clip(&mut self, rect: Option<Rect>) {
        self.clip = rect;
    }

    fn set_font_color(&mut self, color: Rgb) {
        self.color = rgb_color(color);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) -> Result<()> {
        let rect = match self.clip {
            Some(clip) => {
                let x0 = rect.left().max(clip.left());
                let y0 = rect.top().max(clip.top());
                let x1 = rect.right().min(clip.right());
                let y1 = rect.bottom().min(clip.bottom());
                if x1 <= x0 || y1 <= y0 {
                    return Ok(());
                }
                Rect::new(x0, y0, x1 - x0, y1 - y0)
            }
            None => rect,
        };
        let corners = [
            (rect.left().round() as i32, rect.top().round() as i32),
            (rect.right().round() as i32, rect.bottom().round() as i32),
        ];
        self.area
            .draw(&Rectangle::new(corners, rgb_color(color).filled()))
            .map_err(|e| LabelError::Draw(format!("{:?}", e)))
    }

    fn draw_string(
        &mut self,
        font: &FontSpec,
        ascent: f64,
        text: &str,
        origin: Point,
        _antialias: bool,
    ) -> Result<()> {
        if let Some(clip) = self.clip
            && !clip.contains(origin)
        {
            return Ok(());
        }
        let top = origin.y - ascent;
        let style = TextStyle::from(font_desc(font))
            .color(&self.color)
            .pos(Pos::new(HPos::Left, VPos::Top));
        self.area
            .draw(&Text::new(
                text,
                (origin.x.round() as i32, top.round() as i32),
                style,
            ))
            .map_err(|e| LabelError::Draw(format!("{:?}", e)))
    }
}

/// Draw `label` onto a fresh white drawing area.
pub fn draw_label<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    label: &mut dyn View,
) -> AnyResult<()> {
    area.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    let mut canvas = PlottersCanvas::new(area);
    label.draw(&mut canvas)?;
    Ok(())
}

/// Render `label` to an `.svg` or `.png` file of `width` x `height` pixels.
pub fn render_to_file<P: AsRef<Path>>(
    label: &mut dyn View,
    out_path: P,
    width: u32,
    height: u32,
) -> AnyResult<()> {
    let path = out_path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "svg" => {
            let root = SVGBackend::new(path, (width, height)).into_drawing_area();
            draw_label(&root, label)?;
            root.present().map_err(|e| anyhow!("{:?}", e))?;
        }
        "png" => {
            let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
            draw_label(&root, label)?;
            root.present().map_err(|e| anyhow!("{:?}", e))?;
        }
        other => bail!("unsupported output extension {other:?}, expected .svg or .png"),
    }
    log::debug!("rendered label to {}", path.display());
    Ok(())
}
