//! Snapshot helpers for frame-based view tests.

use crate::render::RenderFrame;

/// Assert a stable text snapshot for a render frame.
///
/// Trailing spaces on each row and a trailing newline in `expected` are
/// ignored.
pub fn assert_render_frame_snapshot(label: &str, frame: &RenderFrame, expected: &str) {
    let normalize = |text: &str| {
        text.trim_end_matches('\n')
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n")
    };
    let expected = normalize(expected);
    let got = normalize(&frame.snapshot());
    assert_eq!(
        got, expected,
        "render frame snapshot mismatch ({label})\n--- expected\n{expected}\n--- got\n{got}",
    );
}

/// Whether any row of `frame` contains `needle`.
#[must_use]
pub fn frame_contains(frame: &RenderFrame, needle: &str) -> bool {
    frame.snapshot().lines().any(|row| row.contains(needle))
}
