use crate::history::Timeline;
use crate::search::{self, SearchHit, SearchScope, SearchSide};

/// One uploaded script file. Collections are replaced wholesale on upload,
/// never merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFile {
    pub name: String,
    pub content: String,
}

impl ScriptFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// A translated file bundled with its edit history. Pairing the two in one
/// entry means a translated file cannot exist without a timeline, and the
/// two can never drift out of step.
#[derive(Debug, Clone)]
pub struct TranslatedEntry {
    pub file: ScriptFile,
    pub timeline: Timeline,
}

impl TranslatedEntry {
    fn new(file: ScriptFile) -> Self {
        let timeline = Timeline::initial(file.name.clone(), file.content.clone());
        Self { file, timeline }
    }
}

/// The state aggregate binding uploaded collections, the active file index,
/// and search state. Every content mutation is routed through the history
/// store; all operations degrade to no-ops on out-of-bounds indices.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub original_files: Vec<ScriptFile>,
    pub translated: Vec<TranslatedEntry>,
    pub active_index: usize,
    pub search_query: String,
    pub replacement: String,
    pub search_scope: SearchScope,
    pub search_side: SearchSide,
    pub search_results: Vec<SearchHit>,
    pending_reveal: Option<(usize, SearchSide)>,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            original_files: Vec::new(),
            translated: Vec::new(),
            active_index: 0,
            search_query: String::new(),
            replacement: String::new(),
            search_scope: SearchScope::CurrentFile,
            search_side: SearchSide::Original,
            search_results: Vec::new(),
            pending_reveal: None,
        }
    }

    /// Replace the original collection. Translated entries and their
    /// histories are untouched.
    pub fn upload_original(&mut self, files: Vec<ScriptFile>) {
        self.original_files = files;
    }

    /// Replace the translated collection, seeding a fresh timeline per
    /// file. All prior edit history is discarded; re-upload is a hard
    /// reset.
    pub fn upload_translated(&mut self, files: Vec<ScriptFile>) {
        self.translated = files.into_iter().map(TranslatedEntry::new).collect();
    }

    pub fn file_count(&self) -> usize {
        self.original_files.len().max(self.translated.len())
    }

    pub fn set_active_index(&mut self, index: usize) {
        self.active_index = index;
    }

    pub fn original_file(&self, index: usize) -> Option<&ScriptFile> {
        self.original_files.get(index)
    }

    pub fn translated_file(&self, index: usize) -> Option<&ScriptFile> {
        self.translated.get(index).map(|e| &e.file)
    }

    pub fn active_original_content(&self) -> &str {
        self.original_file(self.active_index)
            .map(|f| f.content.as_str())
            .unwrap_or("")
    }

    pub fn active_translated_content(&self) -> &str {
        self.translated_file(self.active_index)
            .map(|f| f.content.as_str())
            .unwrap_or("")
    }

    pub fn active_translated_file(&self) -> Option<&ScriptFile> {
        self.translated_file(self.active_index)
    }

    pub fn active_timeline(&self) -> Option<&Timeline> {
        self.translated.get(self.active_index).map(|e| &e.timeline)
    }

    /// A snapshot of every translated file, for the save-all collaborator.
    pub fn translated_scripts(&self) -> Vec<ScriptFile> {
        self.translated.iter().map(|e| e.file.clone()).collect()
    }

    /// Write new content into the active translated file and append a
    /// version to its timeline.
    pub fn edit_active_translated(&mut self, new_content: String) {
        let Some(entry) = self.translated.get_mut(self.active_index) else {
            return;
        };
        entry.file.content = new_content.clone();
        entry.timeline = entry.timeline.append_edit(new_content);
    }

    pub fn can_undo(&self) -> bool {
        self.active_timeline().map(Timeline::can_undo).unwrap_or(false)
    }

    pub fn can_redo(&self) -> bool {
        self.active_timeline().map(Timeline::can_redo).unwrap_or(false)
    }

    pub fn undo_active(&mut self) {
        self.move_cursor_with(Timeline::undo);
    }

    pub fn redo_active(&mut self) {
        self.move_cursor_with(Timeline::redo);
    }

    /// Jump the active timeline's cursor to the version with `stamp`, then
    /// sync the displayed content. The sequence itself is untouched.
    pub fn select_version(&mut self, stamp: u64) {
        self.move_cursor_with(|t| t.select_version(stamp));
    }

    /// Two-step write shared by undo/redo/select: move the timeline cursor,
    /// then copy the now-current version's content back into the file
    /// record, in that order.
    fn move_cursor_with(&mut self, op: impl Fn(&Timeline) -> Timeline) {
        let Some(entry) = self.translated.get_mut(self.active_index) else {
            return;
        };
        entry.timeline = op(&entry.timeline);
        if let Some(version) = entry.timeline.current_version() {
            entry.file.content = version.content.clone();
        }
    }

    /// Run the current query against the configured side and scope,
    /// replacing the previous result list.
    pub fn run_search(&mut self) {
        let files: Vec<&ScriptFile> = match self.search_side {
            SearchSide::Original => self.original_files.iter().collect(),
            SearchSide::Translated => self.translated.iter().map(|e| &e.file).collect(),
        };
        self.search_results = search::search(
            &files,
            &self.search_query,
            self.search_scope,
            self.active_index,
            self.search_side,
        );
    }

    /// Replace every occurrence of the query in the active translated file.
    /// One replace-all is one edit event: the result goes through
    /// edit_active_translated and lands as a single new version. No-op when
    /// query or replacement is empty.
    pub fn run_replace(&mut self) {
        if self.search_query.is_empty() || self.replacement.is_empty() {
            return;
        }
        let Some(file) = self.active_translated_file() else {
            return;
        };
        let replaced = search::replace_all(&file.content, &self.search_query, &self.replacement);
        self.edit_active_translated(replaced);
    }

    /// Activate a search hit: switch the active file if the hit lives in a
    /// different one, and record the line the compare view should reveal.
    /// A stale hit pointing past the current collection is dropped.
    pub fn jump_to_result(&mut self, hit: &SearchHit) {
        let count = match hit.side {
            SearchSide::Original => self.original_files.len(),
            SearchSide::Translated => self.translated.len(),
        };
        if hit.file_index >= count {
            return;
        }
        if hit.file_index != self.active_index {
            self.active_index = hit.file_index;
        }
        self.pending_reveal = Some((hit.line_number, hit.side));
    }

    /// Consume the reveal request recorded by jump_to_result.
    pub fn take_pending_reveal(&mut self) -> Option<(usize, SearchSide)> {
        self.pending_reveal.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload_pair(ws: &mut Workspace, original: &str, translated: &str) {
        ws.upload_original(vec![ScriptFile::new("a.txt", original)]);
        ws.upload_translated(vec![ScriptFile::new("a.txt", translated)]);
    }

    #[test]
    fn test_upload_seeds_one_initial_version_per_file() {
        let mut ws = Workspace::new();
        ws.upload_translated(vec![
            ScriptFile::new("a.txt", "one"),
            ScriptFile::new("b.txt", "two"),
        ]);
        assert_eq!(ws.translated.len(), 2);
        for entry in &ws.translated {
            assert_eq!(entry.timeline.versions.len(), 1);
            assert_eq!(entry.timeline.current_index, 0);
            assert_eq!(entry.timeline.file_name, entry.file.name);
            assert_eq!(
                entry.timeline.current_version().unwrap().content,
                entry.file.content
            );
        }
    }

    #[test]
    fn test_reupload_discards_history() {
        let mut ws = Workspace::new();
        ws.upload_translated(vec![ScriptFile::new("a.txt", "one")]);
        ws.edit_active_translated("two".to_string());
        assert_eq!(ws.translated[0].timeline.versions.len(), 2);

        ws.upload_translated(vec![ScriptFile::new("a.txt", "fresh")]);
        assert_eq!(ws.translated[0].timeline.versions.len(), 1);
        assert_eq!(ws.active_translated_content(), "fresh");
    }

    #[test]
    fn test_edit_updates_file_and_timeline_together() {
        let mut ws = Workspace::new();
        upload_pair(&mut ws, "orig", "line1\nline2");
        ws.edit_active_translated("line1\nchanged".to_string());

        assert_eq!(ws.active_translated_content(), "line1\nchanged");
        let timeline = ws.active_timeline().unwrap();
        assert_eq!(timeline.versions.len(), 2);
        assert_eq!(timeline.current_index, 1);
        assert!(ws.can_undo());
        assert!(!ws.can_redo());
    }

    #[test]
    fn test_edit_out_of_bounds_is_noop() {
        let mut ws = Workspace::new();
        ws.active_index = 3;
        ws.edit_active_translated("anything".to_string());
        assert!(ws.translated.is_empty());
    }

    #[test]
    fn test_end_to_end_edit_undo_branch() {
        let mut ws = Workspace::new();
        ws.upload_translated(vec![ScriptFile::new("a.txt", "line1\nline2")]);
        let timeline = ws.active_timeline().unwrap();
        assert_eq!(timeline.versions.len(), 1);
        assert_eq!(timeline.current_index, 0);

        ws.edit_active_translated("line1\nchanged".to_string());
        assert_eq!(ws.active_timeline().unwrap().versions.len(), 2);
        assert_eq!(ws.active_timeline().unwrap().current_index, 1);
        assert!(ws.can_undo());
        assert!(!ws.can_redo());

        ws.undo_active();
        assert_eq!(ws.active_translated_content(), "line1\nline2");
        assert_eq!(ws.active_timeline().unwrap().current_index, 0);
        assert!(ws.can_redo());

        ws.edit_active_translated("line1\nnew".to_string());
        let timeline = ws.active_timeline().unwrap();
        assert_eq!(timeline.versions.len(), 2);
        assert_eq!(timeline.current_index, 1);
        assert!(!ws.can_redo());
        assert_eq!(ws.active_translated_content(), "line1\nnew");
    }

    #[test]
    fn test_undo_redo_sync_displayed_content() {
        let mut ws = Workspace::new();
        ws.upload_translated(vec![ScriptFile::new("a.txt", "v0")]);
        ws.edit_active_translated("v1".to_string());
        ws.undo_active();
        assert_eq!(ws.active_translated_content(), "v0");
        ws.redo_active();
        assert_eq!(ws.active_translated_content(), "v1");
    }

    #[test]
    fn test_select_version_syncs_content_without_truncation() {
        let mut ws = Workspace::new();
        ws.upload_translated(vec![ScriptFile::new("a.txt", "v0")]);
        ws.edit_active_translated("v1".to_string());
        ws.edit_active_translated("v2".to_string());

        let first_stamp = ws.active_timeline().unwrap().versions[0].stamp;
        ws.select_version(first_stamp);
        assert_eq!(ws.active_translated_content(), "v0");
        assert_eq!(ws.active_timeline().unwrap().versions.len(), 3);
        assert!(ws.can_redo());
    }

    #[test]
    fn test_replace_is_one_edit_event() {
        let mut ws = Workspace::new();
        ws.upload_translated(vec![ScriptFile::new("a.txt", "foo bar foo")]);
        ws.search_query = "foo".to_string();
        ws.replacement = "baz".to_string();
        ws.run_replace();

        assert_eq!(ws.active_translated_content(), "baz bar baz");
        assert_eq!(ws.active_timeline().unwrap().versions.len(), 2);
    }

    #[test]
    fn test_replace_with_empty_query_or_replacement_is_noop() {
        let mut ws = Workspace::new();
        ws.upload_translated(vec![ScriptFile::new("a.txt", "foo")]);
        ws.replacement = "bar".to_string();
        ws.run_replace();
        assert_eq!(ws.active_translated_content(), "foo");

        ws.search_query = "foo".to_string();
        ws.replacement = String::new();
        ws.run_replace();
        assert_eq!(ws.active_translated_content(), "foo");
        assert_eq!(ws.active_timeline().unwrap().versions.len(), 1);
    }

    #[test]
    fn test_run_search_scans_selected_side() {
        let mut ws = Workspace::new();
        ws.upload_original(vec![ScriptFile::new("a.txt", "needle in original")]);
        ws.upload_translated(vec![ScriptFile::new("a.txt", "nothing here")]);
        ws.search_query = "needle".to_string();
        ws.search_scope = SearchScope::AllFiles;

        ws.search_side = SearchSide::Original;
        ws.run_search();
        assert_eq!(ws.search_results.len(), 1);

        ws.search_side = SearchSide::Translated;
        ws.run_search();
        assert!(ws.search_results.is_empty());
    }

    #[test]
    fn test_jump_to_result_switches_file_and_records_reveal() {
        let mut ws = Workspace::new();
        ws.upload_translated(vec![
            ScriptFile::new("a.txt", "x"),
            ScriptFile::new("b.txt", "needle"),
        ]);
        let hit = SearchHit {
            file_index: 1,
            file_name: "b.txt".to_string(),
            line_number: 1,
            text: "needle".to_string(),
            side: SearchSide::Translated,
        };
        ws.jump_to_result(&hit);
        assert_eq!(ws.active_index, 1);
        assert_eq!(ws.take_pending_reveal(), Some((1, SearchSide::Translated)));
        assert_eq!(ws.take_pending_reveal(), None);
    }

    #[test]
    fn test_jump_to_stale_result_is_noop() {
        let mut ws = Workspace::new();
        ws.upload_translated(vec![ScriptFile::new("a.txt", "x")]);
        let hit = SearchHit {
            file_index: 7,
            file_name: "gone.txt".to_string(),
            line_number: 1,
            text: "x".to_string(),
            side: SearchSide::Translated,
        };
        ws.jump_to_result(&hit);
        assert_eq!(ws.active_index, 0);
        assert_eq!(ws.take_pending_reveal(), None);
    }

    #[test]
    fn test_accessors_degrade_to_empty_out_of_bounds() {
        let mut ws = Workspace::new();
        ws.active_index = 9;
        assert_eq!(ws.active_original_content(), "");
        assert_eq!(ws.active_translated_content(), "");
        assert!(ws.active_timeline().is_none());
    }
}
