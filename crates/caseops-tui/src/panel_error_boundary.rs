//! Guard panel rendering so one failing panel does not take down the dashboard.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use caseops_tui_adapter::render::{FrameSize, RenderFrame, TextRole};
use caseops_tui_adapter::style::ThemeSpec;
use caseops_tui_adapter::widgets::BorderStyle;

/// Render a panel inside a panic boundary.
///
/// If the renderer panics, a fallback frame of the same size is returned
/// instead and the other panels keep working.
#[must_use]
pub fn render_panel_with_boundary<F>(
    panel_name: &str,
    size: FrameSize,
    theme: ThemeSpec,
    render: F,
) -> RenderFrame
where
    F: FnOnce() -> RenderFrame,
{
    match catch_unwind(AssertUnwindSafe(render)) {
        Ok(frame) => frame,
        Err(payload) => {
            let detail = panic_payload_message(payload);
            tracing::error!(panel = panel_name, cause = %detail, "panel renderer panicked");
            render_panel_error_fallback(panel_name, size, theme, &detail)
        }
    }
}

fn render_panel_error_fallback(
    panel_name: &str,
    size: FrameSize,
    theme: ThemeSpec,
    detail: &str,
) -> RenderFrame {
    let mut frame = RenderFrame::new(size, theme);
    if size.width == 0 || size.height == 0 {
        return frame;
    }

    if size.width < 4 || size.height < 4 {
        frame.draw_text(
            0,
            0,
            &trim_to_width("panel render failed", size.width),
            TextRole::Danger,
        );
        return frame;
    }

    let title = trim_to_width(
        &format!("{panel_name} unavailable"),
        size.width.saturating_sub(2),
    );
    let inner = frame.draw_panel(frame.area(), &title, BorderStyle::Rounded, TextRole::Danger);
    if inner.width == 0 || inner.height == 0 {
        return frame;
    }

    let cause = format!("cause: {detail}");
    let lines = [
        ("Panel renderer panicked.", TextRole::Danger),
        ("Other tabs keep working; switch away and back to retry.", TextRole::Muted),
        (cause.as_str(), TextRole::Muted),
    ];
    for (row, (line, role)) in lines.into_iter().enumerate() {
        frame.draw_text_in_rect(inner, 0, row, line, role);
    }
    frame
}

fn panic_payload_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(message) => normalize_message(*message),
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(message) => normalize_message((*message).to_owned()),
            Err(_) => "unknown panic payload".to_owned(),
        },
    }
}

fn normalize_message(message: String) -> String {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        "unknown panic payload".to_owned()
    } else {
        trimmed.to_owned()
    }
}

fn trim_to_width(value: &str, width: usize) -> String {
    value.chars().take(width).collect()
}

#[cfg(test)]
mod tests {
    use super::render_panel_with_boundary;
    use caseops_tui_adapter::render::{FrameSize, RenderFrame, TextRole};
    use caseops_tui_adapter::style::ThemeSpec;

    #[test]
    fn returns_rendered_panel_when_no_panic() {
        let size = FrameSize {
            width: 48,
            height: 8,
        };
        let frame = render_panel_with_boundary("Email", size, ThemeSpec::default(), || {
            let mut frame = RenderFrame::new(size, ThemeSpec::default());
            frame.draw_text(0, 0, "ok", TextRole::Primary);
            frame
        });
        assert!(frame.snapshot().contains("ok"));
    }

    #[test]
    fn renders_fallback_when_panel_panics() {
        let frame = render_panel_with_boundary(
            "MRT & GIACT",
            FrameSize {
                width: 70,
                height: 10,
            },
            ThemeSpec::default(),
            || panic!("bad counters"),
        );
        let snapshot = frame.snapshot();
        assert!(snapshot.contains("MRT & GIACT unavailable"), "{snapshot}");
        assert!(snapshot.contains("Panel renderer panicked."), "{snapshot}");
        assert!(snapshot.contains("cause: bad counters"), "{snapshot}");
    }

    #[test]
    fn tiny_panels_fallback_without_border() {
        let frame = render_panel_with_boundary(
            "Letters",
            FrameSize {
                width: 3,
                height: 2,
            },
            ThemeSpec::default(),
            || panic!("x"),
        );
        assert!(frame.snapshot().starts_with("pan"), "{}", frame.snapshot());
    }
}
