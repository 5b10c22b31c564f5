use crate::config::{layout_to_string, Layout, Settings};
use crate::search::SearchHit;
use crate::services::archive::SaveTask;
use crate::services::loader::{LoadKind, LoadOutcome, LoadTask};
use crate::workspace::Workspace;

use super::compare_view::CompareState;
use super::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Compare,
    FileList,
    History,
    SearchResults,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogType {
    LoadOriginal,
    LoadTranslated,
    Search,
    Replace,
}

#[derive(Debug, Clone)]
pub struct Dialog {
    pub dialog_type: DialogType,
    pub input: String,
    pub cursor_pos: usize, // char index into input
    pub message: String,
}

impl Dialog {
    pub fn new(dialog_type: DialogType, input: String, message: &str) -> Self {
        let cursor_pos = input.chars().count();
        Self {
            dialog_type,
            input,
            cursor_pos,
            message: message.to_string(),
        }
    }
}

/// Cursor + scroll state shared by the list screens.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListState {
    pub selected: usize,
    pub scroll: usize,
}

pub struct App {
    pub workspace: Workspace,
    pub compare: CompareState,
    pub file_list: ListState,
    pub history_view: ListState,
    pub search_view: ListState,
    pub current_screen: Screen,
    pub dialog: Option<Dialog>,
    pub message: Option<String>,
    pub message_timer: u8,
    pub settings: Settings,
    pub theme: Theme,
    load_tasks: Vec<LoadTask>,
    save_tasks: Vec<SaveTask>,
}

impl App {
    pub fn with_settings(settings: Settings) -> Self {
        let theme = Theme::load(&settings.theme);
        Self {
            workspace: Workspace::new(),
            compare: CompareState::new(),
            file_list: ListState::default(),
            history_view: ListState::default(),
            search_view: ListState::default(),
            current_screen: Screen::Compare,
            dialog: None,
            message: None,
            message_timer: 0,
            settings,
            theme,
            load_tasks: Vec::new(),
            save_tasks: Vec::new(),
        }
    }

    pub fn show_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_timer = 30;
    }

    /// One scheduler tick: age the message toast and drain finished
    /// background work.
    pub fn tick(&mut self) {
        if self.message.is_some() {
            self.message_timer = self.message_timer.saturating_sub(1);
            if self.message_timer == 0 {
                self.message = None;
            }
        }
        self.poll_loads();
        self.poll_saves();
    }

    fn poll_loads(&mut self) {
        let mut finished: Vec<LoadOutcome> = Vec::new();
        self.load_tasks.retain(|task| match task.poll() {
            Some(outcome) => {
                finished.push(outcome);
                false
            }
            None => true,
        });
        for outcome in finished {
            self.apply_load(outcome);
        }
    }

    fn apply_load(&mut self, outcome: LoadOutcome) {
        // No files selected: silent no-op.
        if outcome.files.is_empty() {
            return;
        }
        let count = outcome.files.len();
        match outcome.kind {
            LoadKind::Original => {
                self.workspace.upload_original(outcome.files);
                self.show_message(&format!("{} original files loaded", count));
            }
            LoadKind::Translated => {
                self.workspace.upload_translated(outcome.files);
                self.show_message(&format!("{} translated files loaded", count));
            }
        }
        self.refresh_compare();
    }

    fn poll_saves(&mut self) {
        let mut finished: Vec<Result<std::path::PathBuf, String>> = Vec::new();
        self.save_tasks.retain(|task| match task.poll() {
            Some(result) => {
                finished.push(result);
                false
            }
            None => true,
        });
        for result in finished {
            match result {
                Ok(path) => self.show_message(&format!("Saved {}", path.display())),
                Err(e) => self.show_message(&format!("Save failed: {}", e)),
            }
        }
    }

    pub fn spawn_load(&mut self, kind: LoadKind, path: std::path::PathBuf) {
        self.load_tasks.push(LoadTask::spawn(kind, path));
    }

    /// Rebuild the compare view from the active pair.
    pub fn refresh_compare(&mut self) {
        let original = self.workspace.active_original_content().to_string();
        let translated = self.workspace.active_translated_content().to_string();
        self.compare.refresh(&original, &translated);
    }

    /// Route one full-text change event from the translated pane through
    /// the coordinator and rebuild the view.
    pub fn edit_translated(&mut self, content: String) {
        self.workspace.edit_active_translated(content);
        self.refresh_compare();
    }

    pub fn undo(&mut self) {
        self.workspace.undo_active();
        self.refresh_compare();
    }

    pub fn redo(&mut self) {
        self.workspace.redo_active();
        self.refresh_compare();
    }

    pub fn select_version(&mut self, stamp: u64) {
        self.workspace.select_version(stamp);
        self.refresh_compare();
    }

    pub fn set_active_index(&mut self, index: usize) {
        self.workspace.set_active_index(index);
        self.compare.editing = false;
        self.refresh_compare();
    }

    /// Activate a search hit: delegate to the coordinator, then hand the
    /// recorded reveal target to the compare view.
    pub fn jump_to_hit(&mut self, hit: &SearchHit) {
        self.workspace.jump_to_result(hit);
        self.refresh_compare();
        if let Some((line, side)) = self.workspace.take_pending_reveal() {
            self.compare.reveal(line, side, self.settings.sync_scroll);
        }
        self.current_screen = Screen::Compare;
    }

    pub fn toggle_theme(&mut self) {
        let next = if self.theme.name == "dark" {
            "light"
        } else {
            "dark"
        };
        self.settings.theme = next.to_string();
        self.theme = Theme::load(next);
        self.save_settings();
    }

    pub fn toggle_layout(&mut self) {
        let next = match self.settings.layout() {
            Layout::Horizontal => Layout::Vertical,
            Layout::Vertical => Layout::Horizontal,
        };
        self.settings.layout = layout_to_string(next);
        self.save_settings();
    }

    pub fn toggle_sync_scroll(&mut self) {
        self.settings.sync_scroll = !self.settings.sync_scroll;
        let state = if self.settings.sync_scroll { "on" } else { "off" };
        self.show_message(&format!("Sync scroll {}", state));
        self.save_settings();
    }

    pub fn save_settings(&mut self) {
        if let Err(e) = self.settings.save() {
            self.show_message(&format!("Cannot save settings: {}", e));
        }
    }

    /// Save the active translated file as a plain text download.
    pub fn save_current(&mut self) {
        let Some(file) = self.workspace.active_translated_file() else {
            return;
        };
        self.save_tasks.push(SaveTask::spawn_save_current(
            self.settings.output_dir(),
            file.clone(),
        ));
    }

    /// Package every translated file into translated_scripts.zip.
    pub fn save_all(&mut self) {
        if self.workspace.translated.is_empty() {
            return;
        }
        self.save_tasks.push(SaveTask::spawn_save_all(
            self.settings.output_dir(),
            self.workspace.translated_scripts(),
        ));
    }

    pub fn show_load_dialog(&mut self, kind: LoadKind) {
        let (dialog_type, prefill, label) = match kind {
            LoadKind::Original => (
                DialogType::LoadOriginal,
                self.settings.original_dir.clone().unwrap_or_default(),
                "Load original scripts from path:",
            ),
            LoadKind::Translated => (
                DialogType::LoadTranslated,
                self.settings.translated_dir.clone().unwrap_or_default(),
                "Load translated scripts from path:",
            ),
        };
        self.dialog = Some(Dialog::new(dialog_type, prefill, label));
    }

    pub fn show_search_dialog(&mut self) {
        self.dialog = Some(Dialog::new(
            DialogType::Search,
            self.workspace.search_query.clone(),
            "Search text:",
        ));
    }

    pub fn show_replace_dialog(&mut self) {
        self.dialog = Some(Dialog::new(
            DialogType::Replace,
            self.workspace.replacement.clone(),
            "Replace matches in the active translated file with:",
        ));
    }

    pub fn open_history(&mut self) {
        if let Some(timeline) = self.workspace.active_timeline() {
            self.history_view.selected = timeline.current_index;
            self.history_view.scroll = 0;
        }
        self.current_screen = Screen::History;
    }
}
