//! Single-line text label and the state shared by all label kinds.
//!
//! A label owns its display text, a [`DisplayPolicy`] and a paint
//! [`LabelStyle`]; geometry is a plain view rectangle. Derived state
//! (truncated text, laid-out lines) is guarded by a [`LayoutState`] flag and
//! rebuilt through one entry point, `ensure_layout`, before it is read.
//!
//! Copying a label (via `Clone`) copies text, style and policy but none of the
//! derived state or subscriptions; the copy starts `Dirty`.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

use crate::error::Result;
use crate::font::{Canvas, Font, MeasureCache};
use crate::geometry::{Point, Rect};
use crate::layout::{LineLayout, TruncateMode, compute_truncated_text};
use crate::style::{HAlign, LabelStyle};

/// Whether a label's derived state matches its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutState {
    Clean,
    Dirty,
}

/// How a label treats text that does not fit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayPolicy {
    /// Used by the single-line label.
    pub truncate_mode: TruncateMode,
    /// Used by the multi-line label.
    pub line_layout: LineLayout,
    /// Multi-line only: view height follows the line count.
    pub auto_height: bool,
}

/// Sent to subscribers when a label's derived output changes.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelMessage {
    TruncatedTextChanged { text: String },
    LinesChanged { count: usize },
    ViewSizeChanged { rect: Rect },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&LabelMessage)>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener)>,
}

impl Listeners {
    fn add(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(i, _)| *i != id);
        self.entries.len() != before
    }

    fn emit(&mut self, msg: &LabelMessage) {
        for (_, listener) in self.entries.iter_mut() {
            listener(msg);
        }
    }
}

/// State common to the single- and multi-line labels.
pub(crate) struct LabelCore {
    pub(crate) view: Rect,
    pub(crate) text: String,
    pub(crate) style: LabelStyle,
    pub(crate) policy: DisplayPolicy,
    pub(crate) font: Rc<dyn Font>,
    pub(crate) state: LayoutState,
    listeners: Listeners,
}

impl LabelCore {
    pub(crate) fn new(view: Rect, text: String, font: Rc<dyn Font>) -> Self {
        Self {
            view,
            text,
            style: LabelStyle::default(),
            policy: DisplayPolicy::default(),
            font,
            state: LayoutState::Dirty,
            listeners: Listeners::default(),
        }
    }

    /// Copy of the inputs only: no listeners, derived state to be rebuilt.
    pub(crate) fn fork(&self) -> Self {
        Self {
            view: self.view,
            text: self.text.clone(),
            style: self.style.clone(),
            policy: self.policy,
            font: Rc::clone(&self.font),
            state: LayoutState::Dirty,
            listeners: Listeners::default(),
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.state = LayoutState::Dirty;
    }

    pub(crate) fn notify(&mut self, msg: LabelMessage) {
        self.listeners.emit(&msg);
    }

    pub(crate) fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        self.listeners.add(listener)
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(id)
    }

    /// Replace the text; returns false when the content is identical.
    pub(crate) fn replace_text(&mut self, text: String) -> bool {
        if text == self.text {
            return false;
        }
        self.text = text;
        self.mark_dirty();
        true
    }

    pub(crate) fn replace_style(&mut self, style: LabelStyle) -> bool {
        if style == self.style {
            return false;
        }
        self.style = style;
        self.mark_dirty();
        true
    }

    pub(crate) fn replace_font(&mut self, font: Rc<dyn Font>) -> bool {
        if Rc::ptr_eq(&font, &self.font) {
            return false;
        }
        self.font = font;
        self.mark_dirty();
        true
    }

    /// Move/resize the view. Only a width change invalidates derived state.
    pub(crate) fn replace_view(&mut self, rect: Rect) -> bool {
        if rect == self.view {
            return false;
        }
        if rect.width != self.view.width {
            self.mark_dirty();
        }
        self.view = rect;
        self.notify(LabelMessage::ViewSizeChanged { rect });
        true
    }

    /// View rectangle minus the text inset.
    pub(crate) fn text_rect(&self) -> Rect {
        self.view.inset(self.style.text_inset)
    }

    pub(crate) fn paint_background(&self, canvas: &mut dyn Canvas) -> Result<()> {
        match self.style.back_color {
            Some(color) => canvas.fill_rect(self.view, color),
            None => Ok(()),
        }
    }
}

/// A label as seen by a host: a rectangle it paints into.
pub trait View {
    fn view_size(&self) -> Rect;
    fn draw(&mut self, canvas: &mut dyn Canvas) -> Result<()>;
}

/// Baseline that vertically centers a single line of text in `area`.
pub(crate) fn centered_baseline(area: Rect, font: &dyn Font) -> f64 {
    let cap = font.cap_height();
    if cap > 0.0 {
        area.center().y + cap / 2.0
    } else {
        area.center().y + (font.ascent() - font.descent()) / 2.0
    }
}

/// Single-line label: shows its text truncated to the view width.
///
/// Truncation is recomputed eagerly by every setter that can change it, so
/// [`TextLabel::truncated_text`] is current whenever the label is `Clean`.
pub struct TextLabel {
    core: LabelCore,
    truncated: String,
}

impl TextLabel {
    /// New label; derived state is computed on first use.
    pub fn new(view: Rect, text: impl Into<String>, font: Rc<dyn Font>) -> Self {
        Self {
            core: LabelCore::new(view, text.into(), font),
            truncated: String::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.core.text
    }

    /// Replace the text. Returns `Ok(false)` (and stays `Clean`) when it is unchanged.
    pub fn set_text(&mut self, text: impl Into<String>) -> Result<bool> {
        if !self.core.replace_text(text.into()) {
            return Ok(false);
        }
        self.ensure_layout()?;
        Ok(true)
    }

    /// Replace the text from raw bytes, rejecting invalid UTF-8.
    pub fn set_text_utf8(&mut self, bytes: &[u8]) -> Result<bool> {
        let text = std::str::from_utf8(bytes)?;
        self.set_text(text)
    }

    pub fn truncate_mode(&self) -> TruncateMode {
        self.core.policy.truncate_mode
    }

    pub fn set_truncate_mode(&mut self, mode: TruncateMode) -> Result<()> {
        if mode == self.core.policy.truncate_mode {
            return Ok(());
        }
        self.core.policy.truncate_mode = mode;
        self.core.mark_dirty();
        self.ensure_layout()
    }

    /// Last computed truncated text; stale (or empty) while the label is `Dirty`.
    pub fn truncated_text(&self) -> &str {
        &self.truncated
    }

    /// Truncated text after bringing it up to date.
    pub fn truncated_text_checked(&mut self) -> Result<&str> {
        self.ensure_layout()?;
        Ok(&self.truncated)
    }

    pub fn style(&self) -> &LabelStyle {
        &self.core.style
    }

    pub fn set_style(&mut self, style: LabelStyle) -> Result<()> {
        if self.core.replace_style(style) {
            self.ensure_layout()?;
        }
        Ok(())
    }

    pub fn font(&self) -> &Rc<dyn Font> {
        &self.core.font
    }

    pub fn set_font(&mut self, font: Rc<dyn Font>) -> Result<()> {
        if self.core.replace_font(font) {
            self.ensure_layout()?;
        }
        Ok(())
    }

    pub fn view_size(&self) -> Rect {
        self.core.view
    }

    pub fn set_view_size(&mut self, rect: Rect) -> Result<()> {
        if self.core.replace_view(rect) {
            self.ensure_layout()?;
        }
        Ok(())
    }

    pub fn state(&self) -> LayoutState {
        self.core.state
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&LabelMessage) + 'static) -> SubscriptionId {
        self.core.subscribe(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.core.unsubscribe(id)
    }

    /// Recompute the truncated text if inputs changed since the last run.
    ///
    /// On measurement failure the previous truncated text is kept and the
    /// label stays `Dirty`.
    pub fn ensure_layout(&mut self) -> Result<()> {
        if self.core.state == LayoutState::Clean {
            return Ok(());
        }
        let font = Rc::clone(&self.core.font);
        let cache = MeasureCache::new(&*font);
        let available = self.core.text_rect().width;
        let truncated = compute_truncated_text(
            &self.core.text,
            available,
            self.core.policy.truncate_mode,
            |s| cache.measure(s),
        )
        .inspect_err(|e| warn!("truncation deferred: {e}"))?;

        self.core.state = LayoutState::Clean;
        debug!(
            "truncated {} chars to {} within {available}",
            self.core.text.chars().count(),
            truncated.chars().count()
        );
        if truncated != self.truncated {
            self.truncated = truncated;
            let text = self.truncated.clone();
            self.core.notify(LabelMessage::TruncatedTextChanged { text });
        }
        Ok(())
    }

    /// Resize the view to the full, untruncated text plus insets.
    ///
    /// The horizontal anchor follows the alignment (left edge, center or right
    /// edge stays put); the top edge never moves. Returns whether the view changed.
    pub fn size_to_fit(&mut self) -> Result<bool> {
        let font = Rc::clone(&self.core.font);
        let inset = self.core.style.text_inset;
        let width = font.measure(&self.core.text)? + 2.0 * inset.x;
        let height = font.line_height() + 2.0 * inset.y;
        let old = self.core.view;
        let x = match self.core.style.align {
            HAlign::Left => old.x,
            HAlign::Center => old.center().x - width / 2.0,
            HAlign::Right => old.right() - width,
        };
        let rect = Rect::new(x, old.y, width, height);
        if rect == old {
            return Ok(false);
        }
        self.set_view_size(rect)?;
        Ok(true)
    }

    /// Paint background and truncated text, clipped to the view.
    pub fn draw(&mut self, canvas: &mut dyn Canvas) -> Result<()> {
        self.ensure_layout()?;
        self.core.paint_background(canvas)?;
        if self.truncated.is_empty() {
            return Ok(());
        }
        let font = Rc::clone(&self.core.font);
        let area = self.core.text_rect();
        let width = font.measure(&self.truncated)?;
        let origin = Point::new(
            self.core.style.align.start_x(area.x, area.width, width),
            centered_baseline(area, &*font),
        );

        canvas.set_clip(Some(self.core.view));
        canvas.set_font_color(self.core.style.font_color);
        let drawn = font.draw(canvas, &self.truncated, origin, self.core.style.antialias);
        canvas.set_clip(None);
        drawn
    }
}

impl Clone for TextLabel {
    fn clone(&self) -> Self {
        Self {
            core: self.core.fork(),
            truncated: String::new(),
        }
    }
}

impl View for TextLabel {
    fn view_size(&self) -> Rect {
        self.core.view
    }

    fn draw(&mut self, canvas: &mut dyn Canvas) -> Result<()> {
        TextLabel::draw(self, canvas)
    }
}
