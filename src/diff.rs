use similar::{Algorithm, ChangeTag, TextDiff};

/// Added/removed/unchanged run totals between two texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
    pub unchanged: usize,
}

/// Line-granularity diff totals. Common runs count once, not once per side.
pub fn line_stats(original: &str, translated: &str) -> DiffStats {
    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_lines(original, translated);

    let mut stats = DiffStats::default();
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => stats.added += 1,
            ChangeTag::Delete => stats.removed += 1,
            ChangeTag::Equal => stats.unchanged += 1,
        }
    }
    stats
}

/// Character-granularity diff totals.
pub fn char_stats(original: &str, translated: &str) -> DiffStats {
    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_chars(original, translated);

    let mut stats = DiffStats::default();
    for change in diff.iter_all_changes() {
        let len = change.value().chars().count();
        match change.tag() {
            ChangeTag::Insert => stats.added += len,
            ChangeTag::Delete => stats.removed += len,
            ChangeTag::Equal => stats.unchanged += len,
        }
    }
    stats
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Same,
    Changed,
    OriginalOnly,
    TranslatedOnly,
}

/// One aligned row of the side-by-side view. Line numbers are 1-based and
/// refer to each side's own text; a side is None where it has no line.
#[derive(Debug, Clone)]
pub struct DiffRow {
    pub original_no: Option<usize>,
    pub original: Option<String>,
    pub translated_no: Option<usize>,
    pub translated: Option<String>,
    pub kind: RowKind,
}

/// Build aligned side-by-side rows plus the starting row index of every
/// contiguous change block. Within a block, removed lines pair up with
/// inserted lines as Changed rows; the longer side's remainder becomes
/// one-sided rows.
pub fn build_rows(original: &str, translated: &str) -> (Vec<DiffRow>, Vec<usize>) {
    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_lines(original, translated);

    let mut rows: Vec<DiffRow> = Vec::new();
    let mut change_positions: Vec<usize> = Vec::new();
    let mut removed: Vec<String> = Vec::new();
    let mut added: Vec<String> = Vec::new();
    let mut original_no = 1usize;
    let mut translated_no = 1usize;

    for change in diff.iter_all_changes() {
        let text = strip_line_ending(change.value());
        match change.tag() {
            ChangeTag::Delete => removed.push(text),
            ChangeTag::Insert => added.push(text),
            ChangeTag::Equal => {
                flush_block(
                    &mut rows,
                    &mut change_positions,
                    &mut removed,
                    &mut added,
                    &mut original_no,
                    &mut translated_no,
                );
                rows.push(DiffRow {
                    original_no: Some(original_no),
                    original: Some(text.clone()),
                    translated_no: Some(translated_no),
                    translated: Some(text),
                    kind: RowKind::Same,
                });
                original_no += 1;
                translated_no += 1;
            }
        }
    }
    flush_block(
        &mut rows,
        &mut change_positions,
        &mut removed,
        &mut added,
        &mut original_no,
        &mut translated_no,
    );

    (rows, change_positions)
}

fn strip_line_ending(value: &str) -> String {
    value
        .trim_end_matches('\n')
        .trim_end_matches('\r')
        .to_string()
}

fn flush_block(
    rows: &mut Vec<DiffRow>,
    change_positions: &mut Vec<usize>,
    removed: &mut Vec<String>,
    added: &mut Vec<String>,
    original_no: &mut usize,
    translated_no: &mut usize,
) {
    if removed.is_empty() && added.is_empty() {
        return;
    }
    change_positions.push(rows.len());

    let paired = removed.len().min(added.len());
    for i in 0..paired {
        rows.push(DiffRow {
            original_no: Some(*original_no),
            original: Some(removed[i].clone()),
            translated_no: Some(*translated_no),
            translated: Some(added[i].clone()),
            kind: RowKind::Changed,
        });
        *original_no += 1;
        *translated_no += 1;
    }
    for line in removed.drain(..).skip(paired) {
        rows.push(DiffRow {
            original_no: Some(*original_no),
            original: Some(line),
            translated_no: None,
            translated: None,
            kind: RowKind::OriginalOnly,
        });
        *original_no += 1;
    }
    for line in added.drain(..).skip(paired) {
        rows.push(DiffRow {
            original_no: None,
            original: None,
            translated_no: Some(*translated_no),
            translated: Some(line),
            kind: RowKind::TranslatedOnly,
        });
        *translated_no += 1;
    }
}

/// Character-level highlight segments for one side of a Changed row:
/// (text, highlighted) runs where highlighted marks characters absent from
/// the other side.
pub fn inline_segments(this: &str, other: &str) -> Vec<(String, bool)> {
    let diff = TextDiff::from_chars(other, this);
    let mut segments: Vec<(String, bool)> = Vec::new();
    for change in diff.iter_all_changes() {
        let highlighted = match change.tag() {
            ChangeTag::Insert => true,
            ChangeTag::Equal => false,
            ChangeTag::Delete => continue,
        };
        match segments.last_mut() {
            Some((buf, flag)) if *flag == highlighted => buf.push_str(change.value()),
            _ => segments.push((change.value().to_string(), highlighted)),
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_stats_identical() {
        let text = "a\nb\nc";
        let stats = line_stats(text, text);
        assert_eq!(
            stats,
            DiffStats {
                added: 0,
                removed: 0,
                unchanged: 3
            }
        );
    }

    #[test]
    fn test_line_stats_empty_inputs() {
        assert_eq!(line_stats("", ""), DiffStats::default());
    }

    #[test]
    fn test_line_stats_accounts_for_all_runs() {
        let stats = line_stats("a\nb\nc\n", "a\nx\nc\nd\n");
        // One removed (b), two added (x, d), two unchanged (a, c).
        assert_eq!(stats.removed, 1);
        assert_eq!(stats.added, 2);
        assert_eq!(stats.unchanged, 2);
        assert_eq!(stats.added + stats.removed + stats.unchanged, 5);
    }

    #[test]
    fn test_char_stats_identical() {
        let stats = char_stats("abc", "abc");
        assert_eq!(stats.unchanged, 3);
        assert_eq!(stats.added, 0);
        assert_eq!(stats.removed, 0);
    }

    #[test]
    fn test_char_stats_empty() {
        assert_eq!(char_stats("", ""), DiffStats::default());
    }

    #[test]
    fn test_build_rows_same() {
        let (rows, changes) = build_rows("line1\nline2", "line1\nline2");
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.kind == RowKind::Same));
        assert!(changes.is_empty());
    }

    #[test]
    fn test_build_rows_changed_pairing() {
        let (rows, changes) = build_rows("a\nb\nc", "a\nx\nc");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].kind, RowKind::Changed);
        assert_eq!(rows[1].original.as_deref(), Some("b"));
        assert_eq!(rows[1].translated.as_deref(), Some("x"));
        assert_eq!(changes, vec![1]);
    }

    #[test]
    fn test_build_rows_one_sided() {
        let (rows, _) = build_rows("a\nb", "a");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].kind, RowKind::OriginalOnly);
        assert_eq!(rows[1].translated, None);

        let (rows, _) = build_rows("a", "a\nb");
        assert_eq!(rows[1].kind, RowKind::TranslatedOnly);
        assert_eq!(rows[1].original, None);
    }

    #[test]
    fn test_build_rows_line_numbers() {
        let (rows, _) = build_rows("a\nb\nc", "a\nc");
        // Row for removed "b" carries original numbering only.
        let removed_row = rows
            .iter()
            .find(|r| r.kind == RowKind::OriginalOnly)
            .unwrap();
        assert_eq!(removed_row.original_no, Some(2));
        // Trailing "c" keeps independent per-side numbers.
        let last = rows.last().unwrap();
        assert_eq!(last.original_no, Some(3));
        assert_eq!(last.translated_no, Some(2));
    }

    #[test]
    fn test_build_rows_empty_sides() {
        let (rows, changes) = build_rows("", "");
        assert!(rows.is_empty());
        assert!(changes.is_empty());

        let (rows, changes) = build_rows("", "a\nb");
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.kind == RowKind::TranslatedOnly));
        assert_eq!(changes, vec![0]);
    }

    #[test]
    fn test_change_positions_mark_block_starts() {
        let (_, changes) = build_rows("a\nb\nc\nd\ne", "a\nX\nc\nd\nY");
        assert_eq!(changes, vec![1, 4]);
    }

    #[test]
    fn test_inline_segments() {
        let segments = inline_segments("hello world", "hello there");
        let joined: String = segments.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(joined, "hello world");
        assert!(segments.iter().any(|(_, hl)| *hl));
        assert!(segments.iter().any(|(_, hl)| !*hl));
    }

    #[test]
    fn test_inline_segments_identical() {
        let segments = inline_segments("same", "same");
        assert_eq!(segments, vec![(String::from("same"), false)]);
    }
}
