//! caseops-tui-adapter: render, theme and input boundary for the dashboard.
//!
//! Panel views draw into a [`render::RenderFrame`] cell grid and consume
//! [`input::InputEvent`]s. Only the interactive runtime knows about the real
//! terminal, which keeps every view testable as a plain-text snapshot.

/// Stable crate label used by bootstrap smoke tests.
pub fn crate_label() -> &'static str {
    "caseops-tui-adapter"
}

/// Style and theme primitives.
pub mod style {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum ThemeKind {
        Dark,
        Light,
        HighContrast,
    }

    impl ThemeKind {
        /// Parse a config value; unknown names yield `None`.
        #[must_use]
        pub fn parse(value: &str) -> Option<Self> {
            match value.trim().to_ascii_lowercase().as_str() {
                "dark" => Some(Self::Dark),
                "light" => Some(Self::Light),
                "high-contrast" | "high_contrast" | "contrast" => Some(Self::HighContrast),
                _ => None,
            }
        }
    }

    /// Stable style tokens exposed to view code.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum StyleToken {
        Background,
        Surface,
        Foreground,
        Muted,
        Accent,
        Success,
        Danger,
        Warning,
        Info,
        Focus,
    }

    /// Terminal 256-color indexes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Palette {
        pub background: u8,
        pub surface: u8,
        pub foreground: u8,
        pub muted: u8,
        pub accent: u8,
        pub success: u8,
        pub danger: u8,
        pub warning: u8,
        pub info: u8,
        pub focus: u8,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TypographySpec {
        pub accent_bold: bool,
        pub danger_bold: bool,
        pub muted_dim: bool,
        pub focus_underline: bool,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ThemeSpec {
        pub kind: ThemeKind,
        pub palette: Palette,
        pub typography: TypographySpec,
    }

    impl Default for ThemeSpec {
        fn default() -> Self {
            Self::for_kind(ThemeKind::Dark)
        }
    }

    impl ThemeSpec {
        #[must_use]
        pub fn color(self, token: StyleToken) -> u8 {
            let p = self.palette;
            match token {
                StyleToken::Background => p.background,
                StyleToken::Surface => p.surface,
                StyleToken::Foreground => p.foreground,
                StyleToken::Muted => p.muted,
                StyleToken::Accent => p.accent,
                StyleToken::Success => p.success,
                StyleToken::Danger => p.danger,
                StyleToken::Warning => p.warning,
                StyleToken::Info => p.info,
                StyleToken::Focus => p.focus,
            }
        }

        #[must_use]
        pub fn for_kind(kind: ThemeKind) -> Self {
            let palette = match kind {
                ThemeKind::Dark => Palette {
                    background: 16,
                    surface: 236,
                    foreground: 252,
                    muted: 244,
                    accent: 39,
                    success: 42,
                    danger: 203,
                    warning: 214,
                    info: 110,
                    focus: 81,
                },
                ThemeKind::Light => Palette {
                    background: 255,
                    surface: 253,
                    foreground: 235,
                    muted: 243,
                    accent: 26,
                    success: 28,
                    danger: 160,
                    warning: 130,
                    info: 31,
                    focus: 19,
                },
                ThemeKind::HighContrast => Palette {
                    background: 16,
                    surface: 232,
                    foreground: 231,
                    muted: 250,
                    accent: 51,
                    success: 118,
                    danger: 196,
                    warning: 226,
                    info: 159,
                    focus: 229,
                },
            };
            let typography = TypographySpec {
                accent_bold: true,
                danger_bold: true,
                muted_dim: kind == ThemeKind::Dark,
                focus_underline: true,
            };
            Self {
                kind,
                palette,
                typography,
            }
        }
    }
}

/// Frame primitives.
pub mod render {
    use super::style::{StyleToken, ThemeSpec};
    use super::widgets::BorderStyle;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum TermColor {
        Ansi256(u8),
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FrameSize {
        pub width: usize,
        pub height: usize,
    }

    /// A rectangular region within a frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Rect {
        pub x: usize,
        pub y: usize,
        pub width: usize,
        pub height: usize,
    }

    impl Rect {
        /// Inner region after removing a one-cell border.
        #[must_use]
        pub fn inner(self) -> Self {
            if self.width < 2 || self.height < 2 {
                return Self {
                    width: 0,
                    height: 0,
                    ..self
                };
            }
            Self {
                x: self.x + 1,
                y: self.y + 1,
                width: self.width - 2,
                height: self.height - 2,
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CellStyle {
        pub fg: TermColor,
        pub bg: TermColor,
        pub bold: bool,
        pub dim: bool,
        pub underline: bool,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FrameCell {
        pub glyph: char,
        pub style: CellStyle,
    }

    /// Semantic role for rendered text.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum TextRole {
        Primary,
        Muted,
        Accent,
        Success,
        Danger,
        Warning,
        Info,
        Focus,
    }

    struct BorderChars {
        top_left: char,
        top_right: char,
        bottom_left: char,
        bottom_right: char,
        horizontal: char,
        vertical: char,
    }

    fn border_chars(style: BorderStyle) -> BorderChars {
        match style {
            BorderStyle::Rounded => BorderChars {
                top_left: '╭',
                top_right: '╮',
                bottom_left: '╰',
                bottom_right: '╯',
                horizontal: '─',
                vertical: '│',
            },
            BorderStyle::Plain => BorderChars {
                top_left: '┌',
                top_right: '┐',
                bottom_left: '└',
                bottom_right: '┘',
                horizontal: '─',
                vertical: '│',
            },
        }
    }

    /// Cell grid that panel views draw into.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RenderFrame {
        size: FrameSize,
        cells: Vec<FrameCell>,
        theme: ThemeSpec,
    }

    impl RenderFrame {
        #[must_use]
        pub fn new(size: FrameSize, theme: ThemeSpec) -> Self {
            let blank = FrameCell {
                glyph: ' ',
                style: CellStyle {
                    fg: TermColor::Ansi256(theme.color(StyleToken::Foreground)),
                    bg: TermColor::Ansi256(theme.color(StyleToken::Background)),
                    bold: false,
                    dim: false,
                    underline: false,
                },
            };
            Self {
                size,
                cells: vec![blank; size.width.saturating_mul(size.height)],
                theme,
            }
        }

        #[must_use]
        pub fn size(&self) -> FrameSize {
            self.size
        }

        /// Whole frame as a rect.
        #[must_use]
        pub fn area(&self) -> Rect {
            Rect {
                x: 0,
                y: 0,
                width: self.size.width,
                height: self.size.height,
            }
        }

        #[must_use]
        pub fn cell(&self, x: usize, y: usize) -> Option<FrameCell> {
            if x >= self.size.width || y >= self.size.height {
                return None;
            }
            Some(self.cells[y * self.size.width + x])
        }

        /// Write a single cell, clipped to frame bounds.
        pub fn set_cell(&mut self, x: usize, y: usize, cell: FrameCell) {
            if x >= self.size.width || y >= self.size.height {
                return;
            }
            self.cells[y * self.size.width + x] = cell;
        }

        fn role_style(&self, role: TextRole) -> CellStyle {
            let typography = self.theme.typography;
            let (bold, dim, underline) = match role {
                TextRole::Primary | TextRole::Info | TextRole::Success => (false, false, false),
                TextRole::Muted => (false, typography.muted_dim, false),
                TextRole::Accent => (typography.accent_bold, false, false),
                TextRole::Danger | TextRole::Warning => (typography.danger_bold, false, false),
                TextRole::Focus => (true, false, typography.focus_underline),
            };
            CellStyle {
                fg: self.color_for_role(role),
                bg: TermColor::Ansi256(self.theme.color(StyleToken::Background)),
                bold,
                dim,
                underline,
            }
        }

        /// Draw text on a single row, clipped to frame width.
        pub fn draw_text(&mut self, x: usize, y: usize, text: &str, role: TextRole) {
            let max = self.size.width.saturating_sub(x);
            self.draw_clipped(x, y, text, max, role);
        }

        /// Draw text at an offset inside `rect`, clipped to the rect.
        pub fn draw_text_in_rect(
            &mut self,
            rect: Rect,
            x_offset: usize,
            y_offset: usize,
            text: &str,
            role: TextRole,
        ) {
            if y_offset >= rect.height || x_offset >= rect.width {
                return;
            }
            self.draw_clipped(
                rect.x + x_offset,
                rect.y + y_offset,
                text,
                rect.width - x_offset,
                role,
            );
        }

        fn draw_clipped(&mut self, x: usize, y: usize, text: &str, max: usize, role: TextRole) {
            if y >= self.size.height {
                return;
            }
            let style = self.role_style(role);
            for (offset, glyph) in text.chars().take(max).enumerate() {
                self.set_cell(x + offset, y, FrameCell { glyph, style });
            }
        }

        /// Draw a bordered, titled box and return its content area.
        pub fn draw_panel(&mut self, rect: Rect, title: &str, border: BorderStyle, role: TextRole) -> Rect {
            if rect.width < 2 || rect.height < 2 {
                return rect.inner();
            }
            let chars = border_chars(border);
            let style = self.role_style(role);
            let plain = self.role_style(TextRole::Primary);
            let right = rect.x + rect.width - 1;
            let bottom = rect.y + rect.height - 1;

            for row in rect.y..=bottom {
                for col in rect.x..=right {
                    let glyph = match (col == rect.x, col == right, row == rect.y, row == bottom) {
                        (true, _, true, _) => chars.top_left,
                        (_, true, true, _) => chars.top_right,
                        (true, _, _, true) => chars.bottom_left,
                        (_, true, _, true) => chars.bottom_right,
                        (_, _, true, _) | (_, _, _, true) => chars.horizontal,
                        (true, _, _, _) | (_, true, _, _) => chars.vertical,
                        _ => ' ',
                    };
                    let cell_style = if glyph == ' ' { plain } else { style };
                    self.set_cell(col, row, FrameCell { glyph, style: cell_style });
                }
            }

            if !title.is_empty() {
                let max = rect.width.saturating_sub(4);
                let label: String = title.chars().take(max).collect();
                self.draw_clipped(rect.x + 1, rect.y, &format!(" {label} "), rect.width - 2, role);
            }
            rect.inner()
        }

        /// Copy every cell of `source` into this frame at (`x`, `y`), clipped.
        pub fn blit(&mut self, source: &RenderFrame, x: usize, y: usize) {
            let size = source.size();
            for row in 0..size.height {
                for col in 0..size.width {
                    if let Some(cell) = source.cell(col, row) {
                        self.set_cell(x + col, y + row, cell);
                    }
                }
            }
        }

        #[must_use]
        pub fn row_text(&self, y: usize) -> String {
            if y >= self.size.height {
                return String::new();
            }
            let start = y * self.size.width;
            self.cells[start..start + self.size.width]
                .iter()
                .map(|cell| cell.glyph)
                .collect()
        }

        /// Text-only snapshot for regression tests.
        #[must_use]
        pub fn snapshot(&self) -> String {
            (0..self.size.height)
                .map(|row| self.row_text(row))
                .collect::<Vec<_>>()
                .join("\n")
        }

        #[must_use]
        pub fn color_for_role(&self, role: TextRole) -> TermColor {
            TermColor::Ansi256(self.theme.color(match role {
                TextRole::Primary => StyleToken::Foreground,
                TextRole::Muted => StyleToken::Muted,
                TextRole::Accent => StyleToken::Accent,
                TextRole::Success => StyleToken::Success,
                TextRole::Danger => StyleToken::Danger,
                TextRole::Warning => StyleToken::Warning,
                TextRole::Info => StyleToken::Info,
                TextRole::Focus => StyleToken::Focus,
            }))
        }
    }
}

/// Widget primitives and table layouts for the result views.
pub mod widgets {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum BorderStyle {
        Plain,
        Rounded,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TableColumnSpec {
        pub title: &'static str,
        pub width: usize,
    }

    const fn col(title: &'static str, width: usize) -> TableColumnSpec {
        TableColumnSpec { title, width }
    }

    /// Left-align `value` in `width` cells, truncating with `…`.
    #[must_use]
    pub fn fit(value: &str, width: usize) -> String {
        let count = value.chars().count();
        let text: String = if count > width {
            let keep = width.saturating_sub(1);
            let mut truncated: String = value.chars().take(keep).collect();
            if width > 0 {
                truncated.push('…');
            }
            truncated
        } else {
            value.to_string()
        };
        let pad = width.saturating_sub(text.chars().count());
        format!("{text}{}", " ".repeat(pad))
    }

    /// One table row, columns separated by a single space.
    #[must_use]
    pub fn format_row(columns: &[TableColumnSpec], values: &[&str]) -> String {
        columns
            .iter()
            .enumerate()
            .map(|(i, column)| fit(values.get(i).copied().unwrap_or(""), column.width))
            .collect::<Vec<_>>()
            .join(" ")
            .trim_end()
            .to_string()
    }

    #[must_use]
    pub fn format_header(columns: &[TableColumnSpec]) -> String {
        let titles: Vec<&str> = columns.iter().map(|c| c.title).collect();
        format_row(columns, &titles)
    }

    /// Data-entry detail table.
    #[must_use]
    pub fn case_detail_columns() -> [TableColumnSpec; 7] {
        [
            col("Case Ref", 12),
            col("Case ID", 10),
            col("Document", 17),
            col("Status", 10),
            col("Action", 13),
            col("Manual Review", 14),
            col("Message", 14),
        ]
    }

    /// Daily-report detail table.
    #[must_use]
    pub fn daily_report_columns() -> [TableColumnSpec; 7] {
        [
            col("Document", 18),
            col("Case ID", 10),
            col("Client", 8),
            col("OnBase Status", 14),
            col("Category", 10),
            col("Status", 10),
            col("Message", 20),
        ]
    }

    /// Letter-generation rows.
    #[must_use]
    pub fn letter_columns() -> [TableColumnSpec; 6] {
        [
            col("Document", 20),
            col("Correlation ID", 16),
            col("Carrier", 10),
            col("Contract", 12),
            col("Delivery", 10),
            col("XML File", 24),
        ]
    }

    /// Bulk status-move document outcomes.
    #[must_use]
    pub fn document_outcome_columns() -> [TableColumnSpec; 3] {
        [col("Document", 20), col("OSC Type", 10), col("Reason", 40)]
    }
}

pub mod snapshot;

/// Input/event abstraction.
pub mod input {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Key {
        Char(char),
        Enter,
        Escape,
        Tab,
        BackTab,
        Backspace,
        Up,
        Down,
        Left,
        Right,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers {
        pub shift: bool,
        pub ctrl: bool,
        pub alt: bool,
    }

    impl Modifiers {
        #[must_use]
        pub const fn none() -> Self {
            Self {
                shift: false,
                ctrl: false,
                alt: false,
            }
        }

        #[must_use]
        pub const fn ctrl() -> Self {
            Self {
                shift: false,
                ctrl: true,
                alt: false,
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct KeyEvent {
        pub key: Key,
        pub modifiers: Modifiers,
    }

    impl KeyEvent {
        #[must_use]
        pub const fn plain(key: Key) -> Self {
            Self {
                key,
                modifiers: Modifiers::none(),
            }
        }

        #[must_use]
        pub const fn ctrl(ch: char) -> Self {
            Self {
                key: Key::Char(ch),
                modifiers: Modifiers::ctrl(),
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ResizeEvent {
        pub width: usize,
        pub height: usize,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum InputEvent {
        Key(KeyEvent),
        Resize(ResizeEvent),
        Tick,
    }
}
