use chrono::Utc;

pub const INITIAL_DESCRIPTION: &str = "Initial version";
pub const EDIT_DESCRIPTION: &str = "Update translation";

/// One immutable content snapshot. `stamp` is the creation-ordered key,
/// unique within a timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub stamp: u64,
    pub content: String,
    pub description: String,
}

/// Per-file linear edit history: an append-only, truncatable sequence of
/// versions with a cursor. All operations return a new timeline; the input
/// is never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    pub file_name: String,
    pub versions: Vec<Version>,
    pub current_index: usize,
}

fn now_millis() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

impl Timeline {
    /// Timeline with no versions yet; the cursor parks at 0 until the
    /// first append.
    pub fn empty(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            versions: Vec::new(),
            current_index: 0,
        }
    }

    /// Timeline seeded with a single "Initial version" snapshot.
    pub fn initial(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        let mut timeline = Self::empty(file_name);
        timeline.versions.push(Version {
            stamp: now_millis(),
            content: content.into(),
            description: INITIAL_DESCRIPTION.to_string(),
        });
        timeline
    }

    /// Next stamp: wall-clock milliseconds, bumped past the newest existing
    /// stamp so two appends within one millisecond stay distinct.
    fn next_stamp(&self) -> u64 {
        let now = now_millis();
        match self.versions.last() {
            Some(last) => now.max(last.stamp + 1),
            None => now,
        }
    }

    /// Discard everything after the cursor, append a new version, and move
    /// the cursor onto it. Editing after an undo permanently drops the redo
    /// branch.
    pub fn append(&self, content: impl Into<String>, description: impl Into<String>) -> Self {
        let stamp = self.next_stamp();
        let mut versions = self.versions.clone();
        versions.truncate(self.current_index + 1);
        versions.push(Version {
            stamp,
            content: content.into(),
            description: description.into(),
        });
        Self {
            file_name: self.file_name.clone(),
            current_index: versions.len() - 1,
            versions,
        }
    }

    pub fn append_edit(&self, content: impl Into<String>) -> Self {
        self.append(content, EDIT_DESCRIPTION)
    }

    pub fn can_undo(&self) -> bool {
        self.current_index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current_index + 1 < self.versions.len()
    }

    pub fn undo(&self) -> Self {
        if !self.can_undo() {
            return self.clone();
        }
        let mut timeline = self.clone();
        timeline.current_index -= 1;
        timeline
    }

    pub fn redo(&self) -> Self {
        if !self.can_redo() {
            return self.clone();
        }
        let mut timeline = self.clone();
        timeline.current_index += 1;
        timeline
    }

    pub fn current_version(&self) -> Option<&Version> {
        self.versions.get(self.current_index)
    }

    /// Move the cursor to the version with the given stamp. Unlike append,
    /// this keeps the whole sequence intact; unknown stamps are a no-op.
    pub fn select_version(&self, stamp: u64) -> Self {
        match self.versions.iter().position(|v| v.stamp == stamp) {
            Some(index) => {
                let mut timeline = self.clone();
                timeline.current_index = index;
                timeline
            }
            None => self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeline_with_edits(edits: &[&str]) -> Timeline {
        let mut t = Timeline::initial("a.txt", "base");
        for edit in edits {
            t = t.append_edit(*edit);
        }
        t
    }

    #[test]
    fn test_initial_state() {
        let t = Timeline::initial("a.txt", "hello");
        assert_eq!(t.versions.len(), 1);
        assert_eq!(t.current_index, 0);
        assert!(!t.can_undo());
        assert!(!t.can_redo());
        let v = t.current_version().unwrap();
        assert_eq!(v.content, "hello");
        assert_eq!(v.description, INITIAL_DESCRIPTION);
    }

    #[test]
    fn test_current_version_matches_cursor() {
        let t = timeline_with_edits(&["one", "two"]);
        assert_eq!(
            t.current_version().unwrap(),
            &t.versions[t.current_index]
        );
    }

    #[test]
    fn test_append_moves_cursor_to_end() {
        let t = timeline_with_edits(&["one", "two"]);
        assert_eq!(t.versions.len(), 3);
        assert_eq!(t.current_index, 2);
        assert_eq!(t.current_version().unwrap().content, "two");
        assert_eq!(t.current_version().unwrap().description, EDIT_DESCRIPTION);
    }

    #[test]
    fn test_stamps_strictly_increase() {
        let t = timeline_with_edits(&["one", "two", "three"]);
        for pair in t.versions.windows(2) {
            assert!(pair[0].stamp < pair[1].stamp);
        }
    }

    #[test]
    fn test_undo_redo_roundtrip() {
        let t = timeline_with_edits(&["one"]);
        let back = t.undo();
        assert_eq!(back.current_index, 0);
        assert_eq!(back.current_version().unwrap().content, "base");
        assert!(back.can_redo());
        let forward = back.redo();
        assert_eq!(forward.current_index, t.current_index);
        assert_eq!(forward.current_version().unwrap().content, "one");
    }

    #[test]
    fn test_undo_at_start_is_noop() {
        let t = Timeline::initial("a.txt", "base");
        let after = t.undo();
        assert_eq!(after, t);
    }

    #[test]
    fn test_redo_at_end_is_noop() {
        let t = timeline_with_edits(&["one"]);
        let after = t.redo();
        assert_eq!(after, t);
    }

    #[test]
    fn test_append_after_undo_truncates_redo_branch() {
        let t = timeline_with_edits(&["one", "two"]);
        let undone = t.undo();
        let old_cursor = undone.current_index;
        let branched = undone.append_edit("three");
        assert_eq!(branched.versions.len(), old_cursor + 2);
        assert_eq!(branched.current_index, branched.versions.len() - 1);
        assert!(!branched.can_redo());
        assert_eq!(branched.current_version().unwrap().content, "three");
        // The discarded future no longer exists anywhere in the sequence.
        assert!(branched.versions.iter().all(|v| v.content != "two"));
    }

    #[test]
    fn test_select_version_keeps_length() {
        let t = timeline_with_edits(&["one", "two"]);
        let target = t.versions[1].stamp;
        let selected = t.select_version(target);
        assert_eq!(selected.versions.len(), t.versions.len());
        assert_eq!(selected.current_index, 1);
        assert!(selected.can_redo());
    }

    #[test]
    fn test_select_unknown_stamp_is_noop() {
        let t = timeline_with_edits(&["one"]);
        let selected = t.select_version(u64::MAX);
        assert_eq!(selected, t);
    }

    #[test]
    fn test_append_on_empty_timeline() {
        let t = Timeline::empty("a.txt").append_edit("first");
        assert_eq!(t.versions.len(), 1);
        assert_eq!(t.current_index, 0);
        assert_eq!(t.current_version().unwrap().content, "first");
    }

    #[test]
    fn test_operations_do_not_mutate_input() {
        let t = timeline_with_edits(&["one"]);
        let snapshot = t.clone();
        let _ = t.append_edit("two");
        let _ = t.undo();
        let _ = t.select_version(t.versions[0].stamp);
        assert_eq!(t, snapshot);
    }
}
