use labelfit::{
    Canvas, EstimatedFont, Font, FontSpec, HAlign, LabelError, LabelMessage, LabelStyle,
    LayoutState, LineLayout, MultiLineTextLabel, Point, Rect, Rgb,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Words at 10 units per char, whitespace 1 unit, line height 16.
fn font16() -> EstimatedFont {
    EstimatedFont::new(FontSpec::new("sans-serif", 16.0)).with_advances(10.0, 1.0)
}

fn wrapped(view: Rect, text: &str) -> MultiLineTextLabel {
    let mut label = MultiLineTextLabel::new(view, text, Rc::new(font16()));
    label.set_line_layout(LineLayout::Wrap);
    label
}

fn texts(label: &MultiLineTextLabel) -> Vec<String> {
    label.lines().iter().map(|l| l.text.clone()).collect()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

struct FlakyFont {
    inner: EstimatedFont,
    offline: Cell<bool>,
}

impl Font for FlakyFont {
    fn descriptor(&self) -> &FontSpec {
        self.inner.descriptor()
    }
    fn ascent(&self) -> f64 {
        self.inner.ascent()
    }
    fn descent(&self) -> f64 {
        self.inner.descent()
    }
    fn leading(&self) -> f64 {
        self.inner.leading()
    }
    fn cap_height(&self) -> f64 {
        self.inner.cap_height()
    }
    fn measure(&self, text: &str) -> labelfit::error::Result<f64> {
        if self.offline.get() {
            return Err(LabelError::MeasurementUnavailable("backend offline".into()));
        }
        self.inner.measure(text)
    }
}

#[derive(Default)]
struct Recorder {
    clip: Option<Rect>,
    strings: Vec<(String, Point, Option<Rect>)>,
}

impl Canvas for Recorder {
    fn set_clip(&mut self, rect: Option<Rect>) {
        self.clip = rect;
    }
    fn set_font_color(&mut self, _color: Rgb) {}
    fn fill_rect(&mut self, _rect: Rect, _color: Rgb) -> labelfit::error::Result<()> {
        Ok(())
    }
    fn draw_string(
        &mut self,
        _font: &FontSpec,
        _ascent: f64,
        text: &str,
        origin: Point,
        _antialias: bool,
    ) -> labelfit::error::Result<()> {
        self.strings.push((text.to_string(), origin, self.clip));
        Ok(())
    }
}

#[test]
fn auto_height_follows_wrapped_line_count() {
    let mut label = wrapped(Rect::new(3.0, 7.0, 85.0, 10.0), "AAAA BBBB CCCC DDDD EEEE");
    label.set_auto_height(true);
    label.ensure_layout().unwrap();
    assert_eq!(texts(&label), ["AAAA BBBB", "CCCC DDDD", "EEEE"]);
    assert_eq!(label.view_size(), Rect::new(3.0, 7.0, 85.0, 48.0));

    // Turning auto-height off freezes the current height.
    label.set_auto_height(false);
    label.set_text("AAAA");
    label.ensure_layout().unwrap();
    assert_eq!(label.view_size().height, 48.0);
}

#[test]
fn enabling_auto_height_on_clean_label_applies_at_once() {
    let mut label = wrapped(Rect::new(0.0, 0.0, 85.0, 100.0), "AAAA BBBB CCCC");
    label.ensure_layout().unwrap();
    assert_eq!(label.view_size().height, 100.0);
    label.set_auto_height(true);
    assert_eq!(label.view_size().height, 32.0);
}

#[test]
fn setters_defer_work_until_lines_are_read() {
    let mut label = wrapped(Rect::new(0.0, 0.0, 85.0, 48.0), "AAAA BBBB CCCC");
    label.ensure_layout().unwrap();
    assert!(!label.set_text("AAAA BBBB CCCC"));
    assert_eq!(label.state(), LayoutState::Clean);

    assert!(label.set_text("DDDD"));
    assert_eq!(label.state(), LayoutState::Dirty);
    assert_eq!(texts(&label), ["AAAA BBBB", "CCCC"]);

    let lines = label.lines_checked().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(label.state(), LayoutState::Clean);
}

#[test]
fn lines_changed_only_fires_on_real_changes() {
    let mut label = wrapped(Rect::new(0.0, 0.0, 85.0, 48.0), "AAAA BBBB CCCC");
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    label.subscribe(move |msg| {
        if let LabelMessage::LinesChanged { count } = msg {
            sink.borrow_mut().push(*count);
        }
    });

    label.ensure_layout().unwrap();
    // Wider, but the break stays in the same place.
    label.set_view_size(Rect::new(0.0, 0.0, 90.0, 48.0));
    label.ensure_layout().unwrap();
    label.set_line_layout(LineLayout::Clip);
    label.ensure_layout().unwrap();

    assert_eq!(*seen.borrow(), [2, 1]);
}

#[test]
fn clip_and_truncate_keep_one_line_per_paragraph() {
    let mut label = MultiLineTextLabel::new(
        Rect::new(0.0, 0.0, 85.0, 48.0),
        "first paragraph here\nsecond",
        Rc::new(font16()),
    );
    assert_eq!(label.line_layout(), LineLayout::Clip);
    let lines = label.lines_checked().unwrap().to_vec();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].text, "first paragraph here");
    assert!(lines.iter().all(|l| l.rect.width == 85.0));
    assert_eq!(lines[1].rect.y, 16.0);

    label.set_line_layout(LineLayout::Truncate);
    label.ensure_layout().unwrap();
    assert_eq!(texts(&label), ["first pa…", "second"]);
    assert_eq!(label.lines()[1].rect.width, 60.0);
}

#[test]
fn inset_offsets_lines_and_narrows_the_width() {
    let mut label = wrapped(Rect::new(0.0, 0.0, 95.0, 60.0), "AAAA BBBB CCCC");
    label.set_style(LabelStyle {
        text_inset: Point::new(5.0, 4.0),
        ..LabelStyle::default()
    });
    label.set_auto_height(true);
    label.ensure_layout().unwrap();
    assert_eq!(texts(&label), ["AAAA BBBB", "CCCC"]);
    assert_eq!(label.lines()[0].rect.y, 4.0);
    assert_eq!(label.view_size().height, 40.0);
}

#[test]
fn max_line_width_is_the_widest_line() {
    let mut label = wrapped(Rect::new(0.0, 0.0, 85.0, 48.0), "AAAA BBBB CCCC");
    assert_eq!(label.max_line_width().unwrap(), 81.0);
}

#[test]
fn size_to_fit_uses_unwrapped_paragraphs() {
    let mut label = wrapped(Rect::new(4.0, 2.0, 50.0, 10.0), "AAAA BBBB CCCC\nDD");
    assert!(label.size_to_fit().unwrap());
    assert_eq!(label.view_size(), Rect::new(4.0, 2.0, 122.0, 32.0));
    label.ensure_layout().unwrap();
    assert_eq!(texts(&label), ["AAAA BBBB CCCC", "DD"]);
    assert!(!label.size_to_fit().unwrap());
}

#[test]
fn empty_text_has_no_lines_and_zero_auto_height() {
    let mut label = wrapped(Rect::new(0.0, 0.0, 85.0, 30.0), "");
    label.set_auto_height(true);
    label.ensure_layout().unwrap();
    assert!(label.lines().is_empty());
    assert_eq!(label.view_size().height, 0.0);
}

#[test]
fn draw_places_lines_and_culls_the_overflow() {
    let mut label = wrapped(Rect::new(10.0, 20.0, 85.0, 20.0), "AAAA BBBB CCCC DDDD EEEE");
    label.set_style(LabelStyle {
        align: HAlign::Left,
        ..LabelStyle::default()
    });
    let mut canvas = Recorder::default();
    label.draw(&mut canvas).unwrap();

    let view = Rect::new(10.0, 20.0, 85.0, 20.0);
    let drawn: Vec<&str> = canvas.strings.iter().map(|(t, _, _)| t.as_str()).collect();
    // third line starts below the view
    assert_eq!(drawn, ["AAAA BBBB", "CCCC DDDD"]);
    let (_, first, clip) = &canvas.strings[0];
    assert_eq!(first.x, 10.0);
    assert!(approx(first.y, 20.0 + 12.8));
    assert_eq!(*clip, Some(view));
    let (_, second, _) = &canvas.strings[1];
    assert!(approx(second.y, 20.0 + 16.0 + 12.8));
    assert_eq!(canvas.clip, None);
}

#[test]
fn right_alignment_uses_measured_line_width() {
    let mut label = wrapped(Rect::new(0.0, 0.0, 85.0, 48.0), "AAAA BBBB CCCC");
    label.set_style(LabelStyle {
        align: HAlign::Right,
        ..LabelStyle::default()
    });
    let mut canvas = Recorder::default();
    label.draw(&mut canvas).unwrap();
    assert_eq!(canvas.strings[0].1.x, 4.0);
    assert_eq!(canvas.strings[1].1.x, 45.0);
}

#[test]
fn measurement_failure_keeps_previous_lines_and_skips_drawing() {
    let font = Rc::new(FlakyFont {
        inner: font16(),
        offline: Cell::new(false),
    });
    let shared: Rc<dyn Font> = font.clone();
    let mut label = MultiLineTextLabel::new(Rect::new(0.0, 0.0, 85.0, 48.0), "AAAA BBBB CCCC", shared);
    label.set_line_layout(LineLayout::Wrap);
    label.ensure_layout().unwrap();

    font.offline.set(true);
    label.set_text("DDDD EEEE FFFF GGGG");
    let mut canvas = Recorder::default();
    let err = label.draw(&mut canvas).unwrap_err();
    assert!(matches!(err, LabelError::MeasurementUnavailable(_)));
    assert!(canvas.strings.is_empty());
    assert_eq!(texts(&label), ["AAAA BBBB", "CCCC"]);
    assert_eq!(label.state(), LayoutState::Dirty);

    font.offline.set(false);
    label.draw(&mut canvas).unwrap();
    assert_eq!(texts(&label), ["DDDD EEEE", "FFFF GGGG"]);
    assert_eq!(canvas.strings.len(), 2);
}

#[test]
fn copies_recompute_independently() {
    let mut label = wrapped(Rect::new(0.0, 0.0, 85.0, 48.0), "AAAA BBBB CCCC");
    label.set_auto_height(true);
    label.ensure_layout().unwrap();

    let mut copy = label.clone();
    assert_eq!(copy.state(), LayoutState::Dirty);
    assert!(copy.lines().is_empty());
    assert!(copy.auto_height());
    assert_eq!(copy.line_layout(), LineLayout::Wrap);
    assert_eq!(copy.lines_checked().unwrap(), label.lines());

    copy.set_text("AAAA");
    copy.ensure_layout().unwrap();
    assert_eq!(label.lines().len(), 2);
    assert_eq!(copy.view_size().height, 16.0);
}
