//! Tab host: owns every panel slot, routes keys and renders the active panel.

use std::path::{Path, PathBuf};

use tracing::debug;

use caseops_client::backend::OperationsBackend;
use caseops_client::controller::{
    Completion, DownloadCompletion, OperationController, PendingDownload, PendingRequest,
};
use caseops_core::bulk::{reset_patch, select_action_patch, BulkAction};
use caseops_core::error::ValidationError;
use caseops_core::panel::PanelKind;
use caseops_core::state::{BulkDraft, FileDraft, PanelPatch, SelectedFile, StateStore};
use caseops_tui_adapter::input::{InputEvent, Key, KeyEvent};
use caseops_tui_adapter::render::{FrameSize, Rect, RenderFrame, TextRole};
use caseops_tui_adapter::style::ThemeSpec;
use caseops_tui_adapter::widgets::BorderStyle;

use crate::panel_error_boundary::render_panel_with_boundary;
use crate::views::{panel_lines, ViewContext};

const SPINNER_FRAMES: [char; 4] = ['|', '/', '-', '\\'];

/// Controller type shared by the host and the runtime.
pub type Controller = OperationController<dyn OperationsBackend>;

// ---------------------------------------------------------------------------
// InputMode / Command
// ---------------------------------------------------------------------------

/// Which interaction mode is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing the filter query.
    Search,
    /// Editing the bulk panel's document numbers.
    DocumentText,
    /// Typing the path of the daily report CSV.
    FilePath,
}

/// Work the runtime must perform after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    None,
    Quit,
    Dispatch(PendingRequest),
    Download(PendingDownload),
}

impl Command {
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

// ---------------------------------------------------------------------------
// TabHost
// ---------------------------------------------------------------------------

pub struct TabHost {
    controller: Controller,
    store: StateStore,
    active: PanelKind,
    query: String,
    mode: InputMode,
    path_input: String,
    scroll: usize,
    tick: usize,
    size: FrameSize,
    theme: ThemeSpec,
    health: Option<Result<String, String>>,
    quitting: bool,
}

impl TabHost {
    #[must_use]
    pub fn new(controller: Controller, theme: ThemeSpec) -> Self {
        Self {
            controller,
            store: StateStore::new(),
            active: PanelKind::DataEntry,
            query: String::new(),
            mode: InputMode::Normal,
            path_input: String::new(),
            scroll: 0,
            tick: 0,
            size: FrameSize {
                width: 100,
                height: 30,
            },
            theme,
            health: None,
            quitting: false,
        }
    }

    #[must_use]
    pub fn store(&self) -> &StateStore {
        &self.store
    }

    #[must_use]
    pub fn active(&self) -> PanelKind {
        self.active
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    #[must_use]
    pub fn quitting(&self) -> bool {
        self.quitting
    }

    /// Whether any panel or the Excel export has a request in flight.
    #[must_use]
    pub fn any_loading(&self) -> bool {
        PanelKind::ORDER
            .iter()
            .any(|panel| self.store.is_loading(*panel))
            || self.store.letter_download.state().loading
    }

    pub fn set_health(&mut self, health: Result<String, String>) {
        self.health = Some(health);
    }

    /// Activate `panel`. Slots are untouched; the query and scroll reset.
    pub fn set_tab(&mut self, panel: PanelKind) {
        if panel == self.active {
            return;
        }
        self.active = panel;
        self.query.clear();
        self.scroll = 0;
        self.mode = InputMode::Normal;
    }

    pub fn apply_completion(&mut self, completion: Completion) {
        debug!(
            panel = completion.panel.as_str(),
            ok = completion.outcome.is_ok(),
            "completion received"
        );
        Controller::apply(&mut self.store, completion);
    }

    pub fn apply_download_completion(&mut self, completion: DownloadCompletion) {
        Controller::apply_download(&mut self.store, completion);
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    pub fn update(&mut self, event: InputEvent) -> Command {
        match event {
            InputEvent::Resize(resize) => {
                self.size = FrameSize {
                    width: resize.width,
                    height: resize.height,
                };
                Command::None
            }
            InputEvent::Tick => {
                self.tick = self.tick.wrapping_add(1);
                Command::None
            }
            InputEvent::Key(key) => {
                if key.modifiers.ctrl && key.key == Key::Char('c') {
                    self.quitting = true;
                    return Command::Quit;
                }
                match self.mode {
                    InputMode::Normal => self.update_normal_mode(key),
                    InputMode::Search => self.update_search_mode(key),
                    InputMode::DocumentText => self.update_document_mode(key),
                    InputMode::FilePath => self.update_file_path_mode(key),
                }
            }
        }
    }

    fn update_normal_mode(&mut self, key: KeyEvent) -> Command {
        match key.key {
            Key::Char('q') => {
                self.quitting = true;
                Command::Quit
            }
            Key::Char(ch @ '1'..='6') => {
                if let Some(panel) = PanelKind::from_digit(ch) {
                    self.set_tab(panel);
                }
                Command::None
            }
            Key::Tab if key.modifiers.shift => {
                self.set_tab(self.active.cycle(-1));
                Command::None
            }
            Key::Tab => {
                self.set_tab(self.active.cycle(1));
                Command::None
            }
            Key::BackTab => {
                self.set_tab(self.active.cycle(-1));
                Command::None
            }
            Key::Char('/') => {
                self.mode = InputMode::Search;
                Command::None
            }
            Key::Escape => {
                self.query.clear();
                self.scroll = 0;
                Command::None
            }
            Key::Up => {
                self.scroll = self.scroll.saturating_sub(1);
                Command::None
            }
            Key::Down => {
                self.scroll = self.scroll.saturating_add(1);
                Command::None
            }
            Key::Enter | Key::Char('r') => self.trigger(),
            _ => self.update_panel_keys(key),
        }
    }

    /// Keys that only mean something on one panel.
    fn update_panel_keys(&mut self, key: KeyEvent) -> Command {
        match (self.active, key.key) {
            (PanelKind::Letter, Key::Char('d')) => self.download(),
            (PanelKind::DailyReport, Key::Char('f')) if !self.store.daily_report.state().loading => {
                self.path_input = self
                    .store
                    .daily_report
                    .state()
                    .draft
                    .selected
                    .as_ref()
                    .map(|file| file.path.display().to_string())
                    .unwrap_or_default();
                self.mode = InputMode::FilePath;
                Command::None
            }
            (PanelKind::MoveCaseStatus, Key::Right | Key::Char('a')) => {
                self.cycle_action(1);
                Command::None
            }
            (PanelKind::MoveCaseStatus, Key::Left) => {
                self.cycle_action(-1);
                Command::None
            }
            (PanelKind::MoveCaseStatus, Key::Char('e')) => {
                let state = self.store.move_case_status.state();
                if state.draft.action.is_some() && !state.loading {
                    self.mode = InputMode::DocumentText;
                }
                Command::None
            }
            (PanelKind::MoveCaseStatus, Key::Char('x')) => {
                if !self.store.move_case_status.state().loading {
                    self.store.move_case_status.merge(reset_patch());
                }
                Command::None
            }
            _ => Command::None,
        }
    }

    fn update_search_mode(&mut self, key: KeyEvent) -> Command {
        match key.key {
            Key::Enter => self.mode = InputMode::Normal,
            Key::Escape => {
                self.query.clear();
                self.mode = InputMode::Normal;
            }
            Key::Backspace => {
                self.query.pop();
            }
            Key::Char(ch) => self.query.push(ch),
            _ => return Command::None,
        }
        self.scroll = 0;
        Command::None
    }

    fn update_document_mode(&mut self, key: KeyEvent) -> Command {
        let edit = key.key;
        match edit {
            Key::Escape => {
                self.mode = InputMode::Normal;
                return Command::None;
            }
            Key::Enter | Key::Backspace | Key::Char(_) => {}
            _ => return Command::None,
        }
        self.store.move_case_status.merge_with(|state| {
            let mut document_text = state.draft.document_text.clone();
            match edit {
                Key::Enter => document_text.push('\n'),
                Key::Backspace => {
                    document_text.pop();
                }
                Key::Char(ch) => document_text.push(ch),
                _ => {}
            }
            PanelPatch::new().draft(BulkDraft {
                action: state.draft.action,
                document_text,
            })
        });
        Command::None
    }

    fn update_file_path_mode(&mut self, key: KeyEvent) -> Command {
        match key.key {
            Key::Escape => self.mode = InputMode::Normal,
            Key::Enter => {
                self.mode = InputMode::Normal;
                let input = std::mem::take(&mut self.path_input);
                let path = input.trim();
                if !path.is_empty() {
                    self.select_file(Path::new(path));
                }
            }
            Key::Backspace => {
                self.path_input.pop();
            }
            Key::Char(ch) => self.path_input.push(ch),
            _ => {}
        }
        Command::None
    }

    // -----------------------------------------------------------------------
    // Panel actions
    // -----------------------------------------------------------------------

    fn trigger(&mut self) -> Command {
        let panel = self.active;
        if panel == PanelKind::Letter && self.store.letter_download.state().loading {
            return Command::None;
        }
        match self.controller.prepare(&mut self.store, panel) {
            Ok(request) => {
                self.query.clear();
                self.scroll = 0;
                Command::Dispatch(request)
            }
            Err(err) => {
                debug!(panel = panel.as_str(), error = %err, "trigger refused");
                Command::None
            }
        }
    }

    fn download(&mut self) -> Command {
        if self.store.is_loading(PanelKind::Letter) {
            return Command::None;
        }
        match self.controller.begin_download(&mut self.store) {
            Ok(pending) => Command::Download(pending),
            Err(err) => {
                debug!(error = %err, "download refused");
                Command::None
            }
        }
    }

    fn cycle_action(&mut self, delta: i32) {
        let slot = &mut self.store.move_case_status;
        if slot.state().loading {
            return;
        }
        let action = BulkAction::cycle(slot.state().draft.action, delta);
        slot.merge_with(|state| select_action_patch(state, action));
    }

    /// Pick the CSV for the daily report upload.
    ///
    /// A non-CSV name is rejected and clears any earlier selection; a valid
    /// one clears a stale validation error.
    pub fn select_file(&mut self, path: &Path) {
        let slot = &mut self.store.daily_report;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let size_bytes = match std::fs::metadata(path) {
            Ok(meta) if meta.is_file() => meta.len(),
            Ok(_) => {
                slot.merge(PanelPatch::rejected(format!("{} is not a file", path.display())));
                return;
            }
            Err(err) => {
                slot.merge(PanelPatch::rejected(format!("Cannot open {}: {err}", path.display())));
                return;
            }
        };
        let file = SelectedFile {
            path: PathBuf::from(path),
            name,
            size_bytes,
        };
        if file.is_csv() {
            slot.merge(
                PanelPatch::new()
                    .draft(FileDraft {
                        selected: Some(file),
                    })
                    .error(None),
            );
        } else {
            let err = ValidationError::NotCsv { name: file.name };
            slot.merge(PanelPatch::rejected(err.to_string()).draft(FileDraft::default()));
        }
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    fn spinner(&self) -> char {
        SPINNER_FRAMES[self.tick % SPINNER_FRAMES.len()]
    }

    #[must_use]
    pub fn render(&self) -> RenderFrame {
        let mut frame = RenderFrame::new(self.size, self.theme);
        let FrameSize { width, height } = self.size;
        if width == 0 || height == 0 || self.quitting {
            return frame;
        }

        frame.draw_text(0, 0, "Case Operations Dashboard", TextRole::Accent);
        if let Some((text, role)) = self.health_text() {
            let x = width.saturating_sub(text.chars().count());
            frame.draw_text(x, 0, &text, role);
        }
        self.render_tab_bar(&mut frame, 1);

        let body = Rect {
            x: 0,
            y: 2,
            width,
            height: height.saturating_sub(3),
        };
        let body_size = FrameSize {
            width: body.width,
            height: body.height,
        };
        let panel = render_panel_with_boundary(self.active.label(), body_size, self.theme, || {
            self.render_panel(body_size)
        });
        frame.blit(&panel, body.x, body.y);

        if height > 2 {
            let (footer, role) = self.footer_text();
            frame.draw_text(0, height - 1, &footer, role);
        }
        frame
    }

    fn health_text(&self) -> Option<(String, TextRole)> {
        match self.health.as_ref()? {
            Ok(status) => Some((format!("● {status}"), TextRole::Success)),
            Err(err) => Some((format!("● {err}"), TextRole::Danger)),
        }
    }

    fn render_tab_bar(&self, frame: &mut RenderFrame, y: usize) {
        let mut x = 0;
        for (idx, panel) in PanelKind::ORDER.iter().enumerate() {
            let marker = if self.store.is_loading(*panel)
                || (*panel == PanelKind::Letter && self.store.letter_download.state().loading)
            {
                format!(" {}", self.spinner())
            } else {
                String::new()
            };
            let label = format!(" {} {}{marker} ", idx + 1, panel.short_label());
            let role = if *panel == self.active {
                TextRole::Focus
            } else {
                TextRole::Muted
            };
            frame.draw_text(x, y, &label, role);
            x += label.chars().count() + 1;
        }
    }

    fn render_panel(&self, size: FrameSize) -> RenderFrame {
        let mut frame = RenderFrame::new(size, self.theme);
        let inner = frame.draw_panel(
            frame.area(),
            self.active.label(),
            BorderStyle::Rounded,
            TextRole::Accent,
        );
        let ctx = ViewContext {
            query: &self.query,
            spinner: self.spinner(),
            editing_documents: self.mode == InputMode::DocumentText,
            file_path_input: (self.mode == InputMode::FilePath).then_some(self.path_input.as_str()),
        };
        let lines = panel_lines(&self.store, self.active, &ctx);
        let max_scroll = lines.len().saturating_sub(inner.height);
        let skip = self.scroll.min(max_scroll);
        for (row, line) in lines.iter().skip(skip).take(inner.height).enumerate() {
            frame.draw_text_in_rect(inner, 1, row, &line.text, line.role);
        }
        frame
    }

    fn footer_text(&self) -> (String, TextRole) {
        match self.mode {
            InputMode::Search => (
                format!("Search: {}_   [Enter] keep  [Esc] clear", self.query),
                TextRole::Focus,
            ),
            InputMode::DocumentText => (
                "Editing document numbers   [Enter] new line  [Esc] done".to_owned(),
                TextRole::Focus,
            ),
            InputMode::FilePath => (
                "Type the CSV path   [Enter] select  [Esc] cancel".to_owned(),
                TextRole::Focus,
            ),
            InputMode::Normal if !self.query.trim().is_empty() => (
                format!(
                    "Filter: \"{}\"   [/] edit  [Esc] clear  [↑/↓] scroll  [q] quit",
                    self.query.trim()
                ),
                TextRole::Muted,
            ),
            InputMode::Normal => (
                "[1-6/Tab] tabs  [Enter] run  [/] search  [↑/↓] scroll  [q] quit".to_owned(),
                TextRole::Muted,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Command, Controller, InputMode, TabHost};
    use caseops_client::backend::OperationsBackend;
    use caseops_client::controller::{Completion, PendingRequest};
    use caseops_client::mock::MockBackend;
    use caseops_core::bulk::BulkAction;
    use caseops_core::model::{MrtResult, OperationResult};
    use caseops_core::panel::PanelKind;
    use caseops_tui_adapter::input::{InputEvent, Key, KeyEvent, Modifiers};
    use caseops_tui_adapter::style::ThemeSpec;
    use std::sync::Arc;

    fn host() -> TabHost {
        let backend: Arc<dyn OperationsBackend> = Arc::new(MockBackend::new());
        TabHost::new(Controller::new(backend, std::env::temp_dir()), ThemeSpec::default())
    }

    fn key(host: &mut TabHost, key: Key) -> Command {
        host.update(InputEvent::Key(KeyEvent::plain(key)))
    }

    fn type_text(host: &mut TabHost, text: &str) {
        for ch in text.chars() {
            let _ = key(host, Key::Char(ch));
        }
    }

    #[test]
    fn digits_and_tab_switch_panels() {
        let mut host = host();
        let _ = key(&mut host, Key::Char('4'));
        assert_eq!(host.active(), PanelKind::Letter);
        let _ = key(&mut host, Key::Tab);
        assert_eq!(host.active(), PanelKind::Email);
        let _ = host.update(InputEvent::Key(KeyEvent {
            key: Key::Tab,
            modifiers: Modifiers {
                shift: true,
                ..Modifiers::none()
            },
        }));
        assert_eq!(host.active(), PanelKind::Letter);
        let _ = key(&mut host, Key::Char('1'));
        let _ = key(&mut host, Key::BackTab);
        assert_eq!(host.active(), PanelKind::MoveCaseStatus);
    }

    #[test]
    fn switching_tabs_resets_query_but_not_slots() {
        let mut host = host();
        let _ = key(&mut host, Key::Char('3'));
        host.store.mrt.merge(caseops_core::state::PanelPatch::success(MrtResult {
            total_cases_processed: 9,
            ..Default::default()
        }));
        let _ = key(&mut host, Key::Char('/'));
        type_text(&mut host, "abc");
        let _ = key(&mut host, Key::Enter);
        assert_eq!(host.query(), "abc");
        let revision = host.store().revision(PanelKind::Mrt);

        let _ = key(&mut host, Key::Char('5'));
        assert_eq!(host.query(), "");
        let _ = key(&mut host, Key::Char('3'));
        assert_eq!(host.store().revision(PanelKind::Mrt), revision);
        assert_eq!(
            host.store().mrt.state().result.as_ref().map(|r| r.total_cases_processed),
            Some(9)
        );
    }

    #[test]
    fn enter_dispatches_and_second_enter_is_refused() {
        let mut host = host();
        assert_eq!(
            key(&mut host, Key::Enter),
            Command::Dispatch(PendingRequest::Process(PanelKind::DataEntry))
        );
        assert!(host.store().is_loading(PanelKind::DataEntry));
        assert!(key(&mut host, Key::Char('r')).is_none());
    }

    #[test]
    fn completion_lands_in_its_own_panel_after_switch() {
        let mut host = host();
        let _ = key(&mut host, Key::Char('5'));
        let _ = key(&mut host, Key::Enter);
        let _ = key(&mut host, Key::Char('1'));
        host.apply_completion(Completion {
            panel: PanelKind::Email,
            outcome: Err("request failed with status code 502".into()),
        });
        assert_eq!(host.active(), PanelKind::DataEntry);
        assert_eq!(
            host.store().error(PanelKind::Email),
            Some("request failed with status code 502")
        );
        assert!(!host.store().is_loading(PanelKind::Email));
        assert_eq!(host.store().error(PanelKind::DataEntry), None);
    }

    #[test]
    fn bulk_keys_select_edit_and_reset() {
        let mut host = host();
        let _ = key(&mut host, Key::Char('6'));
        assert!(key(&mut host, Key::Enter).is_none());
        assert_eq!(
            host.store().error(PanelKind::MoveCaseStatus),
            Some("Please select an action first")
        );

        let _ = key(&mut host, Key::Right);
        assert_eq!(
            host.store().move_case_status.state().draft.action,
            Some(BulkAction::CloseFollowUp)
        );
        assert_eq!(host.store().error(PanelKind::MoveCaseStatus), None);

        let _ = key(&mut host, Key::Char('e'));
        assert_eq!(host.mode(), InputMode::DocumentText);
        type_text(&mut host, "D-1");
        let _ = key(&mut host, Key::Enter);
        type_text(&mut host, "D-22");
        let _ = key(&mut host, Key::Backspace);
        let _ = key(&mut host, Key::Escape);
        assert_eq!(
            host.store().move_case_status.state().draft.document_text,
            "D-1\nD-2"
        );

        let _ = key(&mut host, Key::Right);
        assert_eq!(
            host.store().move_case_status.state().draft.document_text,
            "D-1\nD-2"
        );
        assert_eq!(
            key(&mut host, Key::Enter),
            Command::Dispatch(PendingRequest::Bulk {
                action: BulkAction::MoveToReturning,
                document_numbers: vec!["D-1".into(), "D-2".into()],
            })
        );
        host.apply_completion(Completion {
            panel: PanelKind::MoveCaseStatus,
            outcome: Ok(OperationResult::CaseStatus(Default::default())),
        });

        let _ = key(&mut host, Key::Char('x'));
        let state = host.store().move_case_status.state();
        assert!(state.draft.action.is_none());
        assert!(state.draft.document_text.is_empty());
        assert!(state.result.is_none());
    }

    #[test]
    fn file_prompt_rejects_non_csv() {
        let dir = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(err) => panic!("tempdir: {err}"),
        };
        let xlsx = dir.path().join("report.xlsx");
        if let Err(err) = std::fs::write(&xlsx, b"x") {
            panic!("write: {err}");
        }
        let mut host = host();
        let _ = key(&mut host, Key::Char('2'));
        let _ = key(&mut host, Key::Char('f'));
        assert_eq!(host.mode(), InputMode::FilePath);
        type_text(&mut host, &xlsx.display().to_string());
        let _ = key(&mut host, Key::Enter);
        assert_eq!(host.mode(), InputMode::Normal);
        assert_eq!(
            host.store().error(PanelKind::DailyReport),
            Some("Please select a CSV file")
        );
        assert!(host.store().daily_report.state().draft.selected.is_none());
    }

    #[test]
    fn file_prompt_selects_csv_with_size() {
        let dir = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(err) => panic!("tempdir: {err}"),
        };
        let csv = dir.path().join("daily.csv");
        if let Err(err) = std::fs::write(&csv, vec![b'a'; 2048]) {
            panic!("write: {err}");
        }
        let mut host = host();
        let _ = key(&mut host, Key::Char('2'));
        host.select_file(&csv);
        let selected = host.store().daily_report.state().draft.selected.clone();
        match selected {
            Some(file) => {
                assert_eq!(file.name, "daily.csv");
                assert_eq!(file.size_label(), "2.00 KB");
            }
            None => panic!("csv was not selected"),
        }
        assert_eq!(host.store().error(PanelKind::DailyReport), None);
    }

    #[test]
    fn ctrl_c_quits_from_any_mode() {
        let mut host = host();
        let _ = key(&mut host, Key::Char('/'));
        assert_eq!(host.update(InputEvent::Key(KeyEvent::ctrl('c'))), Command::Quit);
        assert!(host.quitting());
    }
}
