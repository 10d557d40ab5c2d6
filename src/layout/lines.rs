//! Multi-line recalculation: paragraph split, then clip / truncate / greedy wrap.

use crate::error::Result;
use crate::geometry::Rect;

use super::truncate::compute_truncated_text;
use super::types::{Line, LineLayout, TruncateMode};

/// Split on explicit line breaks (`\n`, `\r\n`). A trailing break yields a final empty paragraph.
pub fn paragraphs(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(|p| p.strip_suffix('\r').unwrap_or(p))
}

/// Byte spans `(start, end)` of the whitespace-delimited words in `s`.
fn word_spans(s: &str) -> impl Iterator<Item = (usize, usize)> + '_ {
    let mut chars = s.char_indices().peekable();
    std::iter::from_fn(move || {
        while chars.next_if(|&(_, c)| c.is_whitespace()).is_some() {}
        let &(start, _) = chars.peek()?;
        let mut end = start;
        while let Some((i, c)) = chars.next_if(|&(_, c)| !c.is_whitespace()) {
            end = i + c.len_utf8();
        }
        Some((start, end))
    })
}

/// Greedy word wrap of one paragraph into slices of it.
///
/// The whitespace run at each break is the only text not carried by a line.
/// Leading whitespace stays on the first line and trailing whitespace on the last.
/// A word that alone exceeds `max_width` is kept whole on its own line.
fn wrap_paragraph<'t, M>(paragraph: &'t str, max_width: f64, measure: &M) -> Result<Vec<&'t str>>
where
    M: Fn(&str) -> Result<f64>,
{
    let mut out = Vec::new();
    let mut line_start = 0;
    let mut line_end: Option<usize> = None;
    for (start, end) in word_spans(paragraph) {
        match line_end {
            // first word of a line is always accepted
            None => line_end = Some(end),
            Some(prev_end) => {
                if measure(&paragraph[line_start..end])? <= max_width {
                    line_end = Some(end);
                } else {
                    out.push(&paragraph[line_start..prev_end]);
                    line_start = start;
                    line_end = Some(end);
                }
            }
        }
    }
    // Last line keeps the trailing whitespace; a blank paragraph is one (blank) line.
    out.push(&paragraph[line_start..]);
    Ok(out)
}

fn push_line(lines: &mut Vec<Line>, text: String, width: f64, line_height: f64, start_y: f64) {
    let y = start_y + lines.len() as f64 * line_height;
    lines.push(Line {
        rect: Rect::new(0.0, y, width.max(0.0), line_height),
        text,
    });
}

/// Lay out `text` into lines no wider than `max_width` according to `layout`.
///
/// Line `i` gets the rectangle `x = 0, y = start_y + i * line_height`, height
/// `line_height`. Its width is `max_width` for [`LineLayout::Clip`] and the
/// measured width capped at `max_width` otherwise. Trailing whitespace is
/// excluded from that measurement.
///
/// Empty text yields no lines. Any measurement error aborts the whole
/// recalculation so callers can keep their previous lines.
pub fn recalculate_lines<M>(
    text: &str,
    max_width: f64,
    layout: LineLayout,
    line_height: f64,
    start_y: f64,
    measure: M,
) -> Result<Vec<Line>>
where
    M: Fn(&str) -> Result<f64>,
{
    let mut lines = Vec::new();
    if text.is_empty() {
        return Ok(lines);
    }
    for paragraph in paragraphs(text) {
        match layout {
            LineLayout::Clip => {
                push_line(&mut lines, paragraph.to_owned(), max_width, line_height, start_y);
            }
            LineLayout::Truncate => {
                let truncated =
                    compute_truncated_text(paragraph, max_width, TruncateMode::Tail, &measure)?;
                let width = measure(truncated.trim_end())?.min(max_width);
                push_line(&mut lines, truncated, width, line_height, start_y);
            }
            LineLayout::Wrap => {
                for piece in wrap_paragraph(paragraph, max_width, &measure)? {
                    let width = measure(piece.trim_end())?.min(max_width);
                    push_line(&mut lines, piece.to_owned(), width, line_height, start_y);
                }
            }
        }
    }
    Ok(lines)
}

/// Widest measured line (trailing whitespace excluded); 0 for no lines.
pub fn max_line_width<M>(lines: &[Line], measure: M) -> Result<f64>
where
    M: Fn(&str) -> Result<f64>,
{
    lines
        .iter()
        .try_fold(0.0_f64, |acc, line| Ok(acc.max(measure(line.text.trim_end())?)))
}
