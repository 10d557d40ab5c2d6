//! Multi-line text label with clip / truncate / wrap line layouts and auto-height.
//!
//! Unlike [`crate::label::TextLabel`], setters only mark the label `Dirty`;
//! lines are rebuilt lazily by `ensure_layout`, which `draw`, `lines_checked`,
//! `max_line_width` and `size_to_fit` call first.

use log::{debug, warn};
use std::rc::Rc;

use crate::error::Result;
use crate::font::{Canvas, Font, MeasureCache};
use crate::geometry::{Point, Rect};
use crate::label::{LabelCore, LabelMessage, LayoutState, SubscriptionId, View};
use crate::layout::{Line, LineLayout, max_line_width, recalculate_lines};
use crate::style::LabelStyle;

pub struct MultiLineTextLabel {
    core: LabelCore,
    lines: Vec<Line>,
}

impl MultiLineTextLabel {
    pub fn new(view: Rect, text: impl Into<String>, font: Rc<dyn Font>) -> Self {
        Self {
            core: LabelCore::new(view, text.into(), font),
            lines: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.core.text
    }

    /// Replace the text; returns false when it is unchanged.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        self.core.replace_text(text.into())
    }

    pub fn set_text_utf8(&mut self, bytes: &[u8]) -> Result<bool> {
        let text = std::str::from_utf8(bytes)?;
        Ok(self.set_text(text))
    }

    pub fn line_layout(&self) -> LineLayout {
        self.core.policy.line_layout
    }

    pub fn set_line_layout(&mut self, layout: LineLayout) {
        if layout != self.core.policy.line_layout {
            self.core.policy.line_layout = layout;
            self.core.mark_dirty();
        }
    }

    pub fn auto_height(&self) -> bool {
        self.core.policy.auto_height
    }

    /// Let the view height follow the line count.
    ///
    /// Takes effect immediately when lines are current, otherwise after the
    /// next recalculation. Turning it off keeps the current height.
    pub fn set_auto_height(&mut self, state: bool) {
        if state == self.core.policy.auto_height {
            return;
        }
        self.core.policy.auto_height = state;
        if state && self.core.state == LayoutState::Clean {
            self.apply_auto_height();
        }
    }

    pub fn style(&self) -> &LabelStyle {
        &self.core.style
    }

    pub fn set_style(&mut self, style: LabelStyle) {
        self.core.replace_style(style);
    }

    pub fn font(&self) -> &Rc<dyn Font> {
        &self.core.font
    }

    pub fn set_font(&mut self, font: Rc<dyn Font>) {
        self.core.replace_font(font);
    }

    pub fn view_size(&self) -> Rect {
        self.core.view
    }

    pub fn set_view_size(&mut self, rect: Rect) {
        self.core.replace_view(rect);
    }

    pub fn state(&self) -> LayoutState {
        self.core.state
    }

    /// Last computed lines, possibly stale when the label is `Dirty`.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Lines after bringing them up to date.
    pub fn lines_checked(&mut self) -> Result<&[Line]> {
        self.ensure_layout()?;
        Ok(&self.lines)
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&LabelMessage) + 'static) -> SubscriptionId {
        self.core.subscribe(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.core.unsubscribe(id)
    }

    /// Rebuild the lines if any input changed since the last run.
    ///
    /// On measurement failure the previous lines are kept and the label stays `Dirty`.
    pub fn ensure_layout(&mut self) -> Result<()> {
        if self.core.state == LayoutState::Clean {
            return Ok(());
        }
        let font = Rc::clone(&self.core.font);
        let cache = MeasureCache::new(&*font);
        let inset = self.core.style.text_inset;
        let max_width = self.core.view.width - 2.0 * inset.x;
        let lines = recalculate_lines(
            &self.core.text,
            max_width,
            self.core.policy.line_layout,
            font.line_height(),
            inset.y,
            |s| cache.measure(s),
        )
        .inspect_err(|e| warn!("line layout deferred: {e}"))?;

        self.core.state = LayoutState::Clean;
        debug!(
            "{:?} layout: {} lines within {max_width}",
            self.core.policy.line_layout,
            lines.len()
        );
        if lines != self.lines {
            self.lines = lines;
            let count = self.lines.len();
            self.core.notify(LabelMessage::LinesChanged { count });
        }
        if self.core.policy.auto_height {
            self.apply_auto_height();
        }
        Ok(())
    }

    /// Height needed for `count` lines including the vertical inset.
    fn content_height(&self, count: usize) -> f64 {
        self.core.font.line_height() * count as f64 + 2.0 * self.core.style.text_inset.y
    }

    /// Force the view height to the content, keeping origin and width.
    fn apply_auto_height(&mut self) {
        let mut rect = self.core.view;
        rect.height = self.content_height(self.lines.len());
        self.core.replace_view(rect);
    }

    /// Widest current line as measured by the font.
    pub fn max_line_width(&mut self) -> Result<f64> {
        self.ensure_layout()?;
        let font = Rc::clone(&self.core.font);
        let cache = MeasureCache::new(&*font);
        max_line_width(&self.lines, |s| cache.measure(s))
    }

    /// Resize the view so every paragraph fits on one line, unwrapped.
    ///
    /// Keeps the top-left corner. Returns whether the view changed.
    pub fn size_to_fit(&mut self) -> Result<bool> {
        let font = Rc::clone(&self.core.font);
        let cache = MeasureCache::new(&*font);
        let measure = |s: &str| cache.measure(s);
        let inset = self.core.style.text_inset;
        let unconstrained = recalculate_lines(
            &self.core.text,
            f64::INFINITY,
            LineLayout::Wrap,
            font.line_height(),
            inset.y,
            measure,
        )?;
        let width = max_line_width(&unconstrained, measure)? + 2.0 * inset.x;
        let height = self.content_height(unconstrained.len());
        let old = self.core.view;
        let rect = Rect::new(old.x, old.y, width, height);
        if rect == old {
            return Ok(false);
        }
        self.core.replace_view(rect);
        Ok(true)
    }

    /// Paint background and every visible line, clipped to the view.
    ///
    /// Nothing is drawn when the lines cannot be brought up to date.
    pub fn draw(&mut self, canvas: &mut dyn Canvas) -> Result<()> {
        self.ensure_layout()?;
        self.core.paint_background(canvas)?;

        canvas.set_clip(Some(self.core.view));
        canvas.set_font_color(self.core.style.font_color);
        let drawn = self.draw_lines(canvas);
        canvas.set_clip(None);
        drawn
    }

    fn draw_lines(&self, canvas: &mut dyn Canvas) -> Result<()> {
        let font = Rc::clone(&self.core.font);
        let cache = MeasureCache::new(&*font);
        let view = self.core.view;
        let area = self.core.text_rect();
        let style = &self.core.style;
        for line in &self.lines {
            let rect = line.rect.offset(area.x, view.y);
            // lines scrolled out of the view are culled
            if line.text.is_empty() || !rect.intersects(&view) {
                continue;
            }
            let width = cache.measure(line.text.trim_end())?;
            let origin = Point::new(
                style.align.start_x(area.x, area.width, width),
                rect.top() + font.ascent(),
            );
            font.draw(canvas, &line.text, origin, style.antialias)?;
        }
        Ok(())
    }
}

impl Clone for MultiLineTextLabel {
    fn clone(&self) -> Self {
        Self {
            core: self.core.fork(),
            lines: Vec::new(),
        }
    }
}

impl View for MultiLineTextLabel {
    fn view_size(&self) -> Rect {
        self.core.view
    }

    fn draw(&mut self, canvas: &mut dyn Canvas) -> Result<()> {
        MultiLineTextLabel::draw(self, canvas)
    }
}
