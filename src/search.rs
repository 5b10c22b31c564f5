use crate::workspace::ScriptFile;

/// Which text collection a search scans (and a hit reveals on).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchSide {
    Original,
    Translated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    CurrentFile,
    AllFiles,
}

/// One matching line. `line_number` is 1-based; `text` is the whole line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub file_index: usize,
    pub file_name: String,
    pub line_number: usize,
    pub text: String,
    pub side: SearchSide,
}

/// Case-insensitive substring scan over one or all files, one hit per
/// matching line in file-then-line order. An empty query returns an empty
/// list without scanning anything. In CurrentFile scope the hit's
/// file_index is pinned to the caller's index since only that file is
/// scanned.
pub fn search(
    files: &[&ScriptFile],
    query: &str,
    scope: SearchScope,
    current_index: usize,
    side: SearchSide,
) -> Vec<SearchHit> {
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    let mut hits = Vec::new();

    match scope {
        SearchScope::AllFiles => {
            for (index, &file) in files.iter().enumerate() {
                scan_file(file, index, &needle, side, &mut hits);
            }
        }
        SearchScope::CurrentFile => {
            if let Some(&file) = files.get(current_index) {
                scan_file(file, current_index, &needle, side, &mut hits);
            }
        }
    }
    hits
}

fn scan_file(
    file: &ScriptFile,
    file_index: usize,
    needle: &str,
    side: SearchSide,
    hits: &mut Vec<SearchHit>,
) {
    for (i, line) in file.content.split('\n').enumerate() {
        if line.to_lowercase().contains(needle) {
            hits.push(SearchHit {
                file_index,
                file_name: file.name.clone(),
                line_number: i + 1,
                text: line.to_string(),
                side,
            });
        }
    }
}

/// Literal global substring replacement. Not a pattern language: replacing
/// "." touches only actual periods.
pub fn replace_all(content: &str, query: &str, replacement: &str) -> String {
    content.replace(query, replacement)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(specs: &[(&str, &str)]) -> Vec<ScriptFile> {
        specs
            .iter()
            .map(|(name, content)| ScriptFile {
                name: name.to_string(),
                content: content.to_string(),
            })
            .collect()
    }

    fn refs(files: &[ScriptFile]) -> Vec<&ScriptFile> {
        files.iter().collect()
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let fs = files(&[("a.txt", "hello")]);
        let hits = search(&refs(&fs), "", SearchScope::AllFiles, 0, SearchSide::Original);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let fs = files(&[("a.txt", "hello world\nother")]);
        let hits = search(
            &refs(&fs),
            "HELLO",
            SearchScope::AllFiles,
            0,
            SearchSide::Original,
        );
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "hello world");
        assert_eq!(hits[0].line_number, 1);
    }

    #[test]
    fn test_one_hit_per_line_not_per_occurrence() {
        let fs = files(&[("a.txt", "aa aa aa\nbb")]);
        let hits = search(&refs(&fs), "aa", SearchScope::AllFiles, 0, SearchSide::Original);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_all_files_scan_order() {
        let fs = files(&[("a.txt", "key here"), ("b.txt", "no\nkey again")]);
        let hits = search(
            &refs(&fs),
            "key",
            SearchScope::AllFiles,
            0,
            SearchSide::Translated,
        );
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].file_index, 0);
        assert_eq!(hits[1].file_index, 1);
        assert_eq!(hits[1].line_number, 2);
        assert_eq!(hits[1].file_name, "b.txt");
    }

    #[test]
    fn test_current_file_scope_pins_index() {
        let fs = files(&[("a.txt", "key"), ("b.txt", "key")]);
        let hits = search(
            &refs(&fs),
            "key",
            SearchScope::CurrentFile,
            1,
            SearchSide::Original,
        );
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].file_index, 1);
        assert_eq!(hits[0].file_name, "b.txt");
    }

    #[test]
    fn test_current_file_scope_out_of_bounds() {
        let fs = files(&[("a.txt", "key")]);
        let hits = search(
            &refs(&fs),
            "key",
            SearchScope::CurrentFile,
            5,
            SearchSide::Original,
        );
        assert!(hits.is_empty());
    }

    #[test]
    fn test_replace_all_is_literal() {
        assert_eq!(replace_all("a.b.c", ".", "-"), "a-b-c");
        // "." is not "any character".
        assert_eq!(replace_all("abc", ".", "-"), "abc");
    }

    #[test]
    fn test_replace_all_every_occurrence() {
        assert_eq!(replace_all("x y x y", "x", "z"), "z y z y");
    }
}
