//! Single-line truncation with an ellipsis marker.

use crate::error::Result;

use super::types::{ELLIPSIS, TruncateMode};

/// Shorten `text` so that it fits `available_width` under `measure`.
///
/// - `TruncateMode::None`, or text that already fits: returned unchanged.
/// - `available_width <= 0`: empty string.
/// - Otherwise the longest prefix (`Tail`) or suffix (`Head`) of whole chars is kept
///   such that it fits together with [`ELLIPSIS`]. When not even the marker fits,
///   the marker alone is returned.
///
/// Measurement is assumed to grow with the number of kept chars, which lets the
/// search run in `O(log n)` measurements.
pub fn compute_truncated_text<M>(
    text: &str,
    available_width: f64,
    mode: TruncateMode,
    measure: M,
) -> Result<String>
where
    M: Fn(&str) -> Result<f64>,
{
    let keep_prefix = match mode {
        TruncateMode::None => return Ok(text.to_owned()),
        TruncateMode::Tail => true,
        TruncateMode::Head => false,
    };
    if measure(text)? <= available_width {
        return Ok(text.to_owned());
    }
    if available_width <= 0.0 {
        return Ok(String::new());
    }

    // Byte offset of every char boundary, including the end.
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let n_chars = bounds.len() - 1;

    let candidate = |kept: usize| -> String {
        if keep_prefix {
            format!("{}{ELLIPSIS}", &text[..bounds[kept]])
        } else {
            format!("{ELLIPSIS}{}", &text[bounds[n_chars - kept]..])
        }
    };

    // Largest `kept` whose candidate fits; 0 doubles as the degenerate marker-only answer.
    let (mut lo, mut hi) = (0usize, n_chars.saturating_sub(1));
    while lo < hi {
        let mid = (lo + hi).div_ceil(2);
        if measure(&candidate(mid))? <= available_width {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    Ok(candidate(lo))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LabelError;

    // Every char (the ellipsis included) is 10 units wide.
    fn mono(s: &str) -> Result<f64> {
        Ok(s.chars().count() as f64 * 10.0)
    }

    #[test]
    fn fitting_text_is_untouched_in_every_mode() {
        for mode in [TruncateMode::None, TruncateMode::Head, TruncateMode::Tail] {
            assert_eq!(compute_truncated_text("Hello", 50.0, mode, mono).unwrap(), "Hello");
        }
    }

    #[test]
    fn none_mode_ignores_width() {
        assert_eq!(
            compute_truncated_text("Hello World", 10.0, TruncateMode::None, mono).unwrap(),
            "Hello World"
        );
    }

    #[test]
    fn tail_keeps_prefix_and_head_keeps_suffix() {
        let tail = compute_truncated_text("Hello World", 55.0, TruncateMode::Tail, mono).unwrap();
        assert_eq!(tail, "Hell…");
        let head = compute_truncated_text("Hello World", 55.0, TruncateMode::Head, mono).unwrap();
        assert_eq!(head, "…orld");
    }

    #[test]
    fn degenerate_budgets() {
        assert_eq!(compute_truncated_text("Hello", 5.0, TruncateMode::Tail, mono).unwrap(), ELLIPSIS);
        assert_eq!(compute_truncated_text("Hello", 0.0, TruncateMode::Tail, mono).unwrap(), "");
        assert_eq!(compute_truncated_text("Hello", -3.0, TruncateMode::Head, mono).unwrap(), "");
        assert_eq!(compute_truncated_text("", 0.0, TruncateMode::Tail, mono).unwrap(), "");
    }

    #[test]
    fn result_always_fits_once_the_marker_fits() {
        let text = "Grüße aus Köln, schöne Stadt";
        for w in 10..=300 {
            let w = w as f64;
            for mode in [TruncateMode::Head, TruncateMode::Tail] {
                let out = compute_truncated_text(text, w, mode, mono).unwrap();
                assert!(mono(&out).unwrap() <= w, "{out:?} exceeds {w}");
                let kept = out.trim_start_matches(ELLIPSIS).trim_end_matches(ELLIPSIS);
                match mode {
                    TruncateMode::Tail => assert!(text.starts_with(kept)),
                    _ => assert!(text.ends_with(kept)),
                }
            }
        }
    }

    #[test]
    fn removal_is_minimal() {
        let out = compute_truncated_text("abcdefghij", 61.0, TruncateMode::Tail, mono).unwrap();
        // 5 kept chars + marker = 60 fits, 6 + marker = 70 does not.
        assert_eq!(out, "abcde…");
    }

    #[test]
    fn measurement_errors_propagate() {
        let failing = |_: &str| -> Result<f64> { Err(LabelError::MeasurementUnavailable("no font".into())) };
        let err = compute_truncated_text("abc", 10.0, TruncateMode::Tail, failing).unwrap_err();
        assert!(matches!(err, LabelError::MeasurementUnavailable(_)));
    }
}
