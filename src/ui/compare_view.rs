use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::config::Layout as PaneLayout;
use crate::diff::{self, DiffRow, DiffStats, RowKind};
use crate::search::SearchSide;
use crate::services::loader::LoadKind;
use crate::ui::app::{App, Screen};
use crate::ui::theme::Theme;

// ═══════════════════════════════════════════════════════════════════════════════
// View state
// ═══════════════════════════════════════════════════════════════════════════════

/// State of the side-by-side render surface: aligned diff rows, one scroll
/// offset per pane, change navigation, and the translated-pane edit cursor.
pub struct CompareState {
    pub rows: Vec<DiffRow>,
    pub change_positions: Vec<usize>,
    pub current_change: usize,
    pub original_scroll: usize,
    pub translated_scroll: usize,
    pub focus: SearchSide,
    pub visible_height: usize,
    pub editing: bool,
    pub cursor_line: usize, // 0-based line into the translated content
    pub cursor_col: usize,  // char offset within that line
    pub line_stats: DiffStats,
    pub char_stats: DiffStats,
}

impl Default for CompareState {
    fn default() -> Self {
        Self::new()
    }
}

/// Follow the driving pane, but ignore deltas of a single row so the two
/// panes don't ping-pong while one of them is being dragged.
pub fn sync_follow(driver: usize, follower: usize) -> usize {
    if driver.abs_diff(follower) > 1 {
        driver
    } else {
        follower
    }
}

impl CompareState {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            change_positions: Vec::new(),
            current_change: 0,
            original_scroll: 0,
            translated_scroll: 0,
            focus: SearchSide::Translated,
            visible_height: 0,
            editing: false,
            cursor_line: 0,
            cursor_col: 0,
            line_stats: DiffStats::default(),
            char_stats: DiffStats::default(),
        }
    }

    /// Rebuild rows and stats from the active pair and clamp every cursor
    /// that might now point past the end.
    pub fn refresh(&mut self, original: &str, translated: &str) {
        let (rows, change_positions) = diff::build_rows(original, translated);
        self.line_stats = diff::line_stats(original, translated);
        self.char_stats = diff::char_stats(original, translated);
        self.rows = rows;
        self.change_positions = change_positions;

        if self.current_change >= self.change_positions.len() {
            self.current_change = self.change_positions.len().saturating_sub(1);
        }
        let max = self.max_scroll();
        self.original_scroll = self.original_scroll.min(max);
        self.translated_scroll = self.translated_scroll.min(max);

        let lines: Vec<&str> = translated.split('\n').collect();
        self.cursor_line = self.cursor_line.min(lines.len().saturating_sub(1));
        let line_len = lines
            .get(self.cursor_line)
            .map(|l| l.chars().count())
            .unwrap_or(0);
        self.cursor_col = self.cursor_col.min(line_len);
    }

    pub fn max_scroll(&self) -> usize {
        self.rows.len().saturating_sub(self.visible_height.max(1))
    }

    pub fn focused_scroll(&self) -> usize {
        match self.focus {
            SearchSide::Original => self.original_scroll,
            SearchSide::Translated => self.translated_scroll,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            SearchSide::Original => SearchSide::Translated,
            SearchSide::Translated => SearchSide::Original,
        };
    }

    /// Scroll the focused pane to `target`; the other pane follows when
    /// sync is enabled, subject to the one-row tolerance.
    pub fn scroll_focused_to(&mut self, target: usize, sync: bool) {
        let target = target.min(self.max_scroll());
        match self.focus {
            SearchSide::Original => {
                self.original_scroll = target;
                if sync {
                    self.translated_scroll =
                        sync_follow(self.original_scroll, self.translated_scroll);
                }
            }
            SearchSide::Translated => {
                self.translated_scroll = target;
                if sync {
                    self.original_scroll =
                        sync_follow(self.translated_scroll, self.original_scroll);
                }
            }
        }
    }

    pub fn scroll_by(&mut self, delta: isize, sync: bool) {
        let current = self.focused_scroll();
        let target = if delta < 0 {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            current.saturating_add(delta as usize)
        };
        self.scroll_focused_to(target, sync);
    }

    pub fn next_change(&mut self) {
        if self.change_positions.is_empty() {
            return;
        }
        if self.current_change + 1 < self.change_positions.len() {
            self.current_change += 1;
        }
        self.scroll_to_current_change();
    }

    pub fn prev_change(&mut self) {
        if self.change_positions.is_empty() {
            return;
        }
        if self.current_change > 0 {
            self.current_change -= 1;
        }
        self.scroll_to_current_change();
    }

    fn scroll_to_current_change(&mut self) {
        let target = self.change_positions[self.current_change];
        let scroll = target
            .saturating_sub(self.visible_height / 4)
            .min(self.max_scroll());
        // Change navigation realigns both panes regardless of sync mode.
        self.original_scroll = scroll;
        self.translated_scroll = scroll;
    }

    /// Bring line `line` (1-based, in `side`'s own numbering) into view and
    /// focus that pane. Used for search-result activation.
    pub fn reveal(&mut self, line: usize, side: SearchSide, sync: bool) {
        let Some(row_index) = self.row_index_for_line(line, side) else {
            return;
        };
        self.focus = side;
        let scroll = row_index
            .saturating_sub(self.visible_height.max(1) / 4)
            .min(self.max_scroll());
        match side {
            SearchSide::Original => self.original_scroll = scroll,
            SearchSide::Translated => {
                self.translated_scroll = scroll;
                self.cursor_line = line.saturating_sub(1);
                self.cursor_col = 0;
            }
        }
        if sync {
            self.original_scroll = scroll;
            self.translated_scroll = scroll;
        }
    }

    /// Map a 1-based file line number to its aligned row index.
    pub fn row_index_for_line(&self, line: usize, side: SearchSide) -> Option<usize> {
        self.rows.iter().position(|row| match side {
            SearchSide::Original => row.original_no == Some(line),
            SearchSide::Translated => row.translated_no == Some(line),
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Input handling
// ═══════════════════════════════════════════════════════════════════════════════

/// Returns true when the application should quit.
pub fn handle_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> bool {
    if app.compare.editing {
        handle_edit_input(app, code, modifiers);
        return false;
    }

    let sync = app.settings.sync_scroll;
    let page = app.compare.visible_height.max(1) as isize;
    match code {
        KeyCode::Char('q') | KeyCode::F(10) => return true,
        KeyCode::Tab => app.compare.toggle_focus(),
        KeyCode::Up => app.compare.scroll_by(-1, sync),
        KeyCode::Down => app.compare.scroll_by(1, sync),
        KeyCode::PageUp => app.compare.scroll_by(-page, sync),
        KeyCode::PageDown => app.compare.scroll_by(page, sync),
        KeyCode::Home => app.compare.scroll_focused_to(0, sync),
        KeyCode::End => {
            let max = app.compare.max_scroll();
            app.compare.scroll_focused_to(max, sync);
        }
        KeyCode::Char('n') => app.compare.next_change(),
        KeyCode::Char('p') | KeyCode::Char('N') | KeyCode::Char('P') => app.compare.prev_change(),
        KeyCode::Enter | KeyCode::Char('e') | KeyCode::F(4) => enter_edit_mode(app),
        KeyCode::Char('u') => app.undo(),
        KeyCode::Char('y') => app.redo(),
        KeyCode::Char('o') | KeyCode::F(2) => app.show_load_dialog(LoadKind::Original),
        KeyCode::Char('t') | KeyCode::F(3) => app.show_load_dialog(LoadKind::Translated),
        KeyCode::Char('/') | KeyCode::Char('f') | KeyCode::F(5) => app.show_search_dialog(),
        KeyCode::Char('r') | KeyCode::F(6) => app.show_replace_dialog(),
        KeyCode::Char('l') => app.current_screen = Screen::FileList,
        KeyCode::Char('h') => app.open_history(),
        KeyCode::Char('s') => app.current_screen = Screen::SearchResults,
        KeyCode::F(7) => app.save_current(),
        KeyCode::F(8) => app.save_all(),
        KeyCode::F(9) => app.toggle_layout(),
        KeyCode::Char('d') => app.toggle_theme(),
        KeyCode::Char('x') => app.toggle_sync_scroll(),
        KeyCode::Char('?') | KeyCode::F(1) => app.current_screen = Screen::Help,
        _ => {}
    }
    false
}

fn enter_edit_mode(app: &mut App) {
    if app.workspace.active_translated_file().is_none() {
        app.show_message("No translated file to edit");
        return;
    }
    app.compare.editing = true;
    app.compare.focus = SearchSide::Translated;
    ensure_cursor_visible(app);
}

fn handle_edit_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    match code {
        KeyCode::Esc => app.compare.editing = false,
        KeyCode::Char('z') if ctrl => app.undo(),
        KeyCode::Char('y') if ctrl => app.redo(),
        KeyCode::Char(c) if !ctrl => insert_char(app, c),
        KeyCode::Tab => insert_char(app, '\t'),
        KeyCode::Enter => insert_newline(app),
        KeyCode::Backspace => backspace(app),
        KeyCode::Delete => delete_forward(app),
        KeyCode::Up => move_cursor_vertical(app, -1),
        KeyCode::Down => move_cursor_vertical(app, 1),
        KeyCode::PageUp => move_cursor_vertical(app, -(app.compare.visible_height.max(1) as isize)),
        KeyCode::PageDown => move_cursor_vertical(app, app.compare.visible_height.max(1) as isize),
        KeyCode::Left => move_cursor_left(app),
        KeyCode::Right => move_cursor_right(app),
        KeyCode::Home => {
            app.compare.cursor_col = 0;
        }
        KeyCode::End => {
            let lines = current_lines(app);
            app.compare.cursor_col = line_char_len(&lines, app.compare.cursor_line);
        }
        _ => {}
    }
}

/// Multi-line paste into the translated pane: one edit event, one version.
pub fn handle_paste(app: &mut App, text: &str) {
    if !app.compare.editing {
        return;
    }
    let mut lines = current_lines(app);
    let state = &mut app.compare;
    let line = state.cursor_line.min(lines.len().saturating_sub(1));
    let byte = byte_index(&lines[line], state.cursor_col);
    let tail = lines[line].split_off(byte);

    let normalized = text.replace('\r', "");
    let mut segments = normalized.split('\n').map(str::to_string);
    if let Some(first) = segments.next() {
        lines[line].push_str(&first);
    }
    let mut insert_at = line;
    for segment in segments {
        insert_at += 1;
        lines.insert(insert_at, segment);
    }
    state.cursor_line = insert_at;
    state.cursor_col = lines[insert_at].chars().count();
    lines[insert_at].push_str(&tail);

    apply_lines(app, lines);
    ensure_cursor_visible(app);
}

fn current_lines(app: &App) -> Vec<String> {
    app.workspace
        .active_translated_content()
        .split('\n')
        .map(str::to_string)
        .collect()
}

fn line_char_len(lines: &[String], index: usize) -> usize {
    lines.get(index).map(|l| l.chars().count()).unwrap_or(0)
}

fn byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn apply_lines(app: &mut App, lines: Vec<String>) {
    app.edit_translated(lines.join("\n"));
}

fn insert_char(app: &mut App, c: char) {
    let mut lines = current_lines(app);
    let line = app.compare.cursor_line.min(lines.len().saturating_sub(1));
    let byte = byte_index(&lines[line], app.compare.cursor_col);
    lines[line].insert(byte, c);
    app.compare.cursor_col += 1;
    apply_lines(app, lines);
    ensure_cursor_visible(app);
}

fn insert_newline(app: &mut App) {
    let mut lines = current_lines(app);
    let line = app.compare.cursor_line.min(lines.len().saturating_sub(1));
    let byte = byte_index(&lines[line], app.compare.cursor_col);
    let tail = lines[line].split_off(byte);
    lines.insert(line + 1, tail);
    app.compare.cursor_line = line + 1;
    app.compare.cursor_col = 0;
    apply_lines(app, lines);
    ensure_cursor_visible(app);
}

fn backspace(app: &mut App) {
    let mut lines = current_lines(app);
    let line = app.compare.cursor_line.min(lines.len().saturating_sub(1));
    if app.compare.cursor_col > 0 {
        let byte = byte_index(&lines[line], app.compare.cursor_col - 1);
        lines[line].remove(byte);
        app.compare.cursor_col -= 1;
    } else if line > 0 {
        let removed = lines.remove(line);
        let prev_len = lines[line - 1].chars().count();
        lines[line - 1].push_str(&removed);
        app.compare.cursor_line = line - 1;
        app.compare.cursor_col = prev_len;
    } else {
        return;
    }
    apply_lines(app, lines);
    ensure_cursor_visible(app);
}

fn delete_forward(app: &mut App) {
    let mut lines = current_lines(app);
    let line = app.compare.cursor_line.min(lines.len().saturating_sub(1));
    let len = lines[line].chars().count();
    if app.compare.cursor_col < len {
        let byte = byte_index(&lines[line], app.compare.cursor_col);
        lines[line].remove(byte);
    } else if line + 1 < lines.len() {
        let next = lines.remove(line + 1);
        lines[line].push_str(&next);
    } else {
        return;
    }
    apply_lines(app, lines);
}

fn move_cursor_vertical(app: &mut App, delta: isize) {
    let lines = current_lines(app);
    let state = &mut app.compare;
    let last = lines.len().saturating_sub(1);
    let line = if delta < 0 {
        state.cursor_line.saturating_sub(delta.unsigned_abs())
    } else {
        (state.cursor_line + delta as usize).min(last)
    };
    state.cursor_line = line;
    state.cursor_col = state.cursor_col.min(line_char_len(&lines, line));
    ensure_cursor_visible(app);
}

fn move_cursor_left(app: &mut App) {
    let lines = current_lines(app);
    let state = &mut app.compare;
    if state.cursor_col > 0 {
        state.cursor_col -= 1;
    } else if state.cursor_line > 0 {
        state.cursor_line -= 1;
        state.cursor_col = line_char_len(&lines, state.cursor_line);
    }
    ensure_cursor_visible(app);
}

fn move_cursor_right(app: &mut App) {
    let lines = current_lines(app);
    let state = &mut app.compare;
    if state.cursor_col < line_char_len(&lines, state.cursor_line) {
        state.cursor_col += 1;
    } else if state.cursor_line + 1 < lines.len() {
        state.cursor_line += 1;
        state.cursor_col = 0;
    }
    ensure_cursor_visible(app);
}

/// Keep the edit cursor's row inside the translated pane; the original
/// pane follows under sync scroll.
fn ensure_cursor_visible(app: &mut App) {
    let sync = app.settings.sync_scroll;
    let state = &mut app.compare;
    let Some(row) = state.row_index_for_line(state.cursor_line + 1, SearchSide::Translated)
    else {
        return;
    };
    let visible = state.visible_height.max(1);
    if row < state.translated_scroll {
        state.translated_scroll = row;
    } else if row >= state.translated_scroll + visible {
        state.translated_scroll = row + 1 - visible;
    }
    if sync {
        state.original_scroll = sync_follow(state.translated_scroll, state.original_scroll);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Drawing
// ═══════════════════════════════════════════════════════════════════════════════

pub fn draw(frame: &mut Frame, app: &mut App, area: Rect, theme: &Theme) {
    if area.height < 4 {
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(3),    // Content
            Constraint::Length(1), // StatusBar
            Constraint::Length(1), // FunctionBar
        ])
        .split(area);

    let header_area = layout[0];
    let content_area = layout[1];
    let status_area = layout[2];
    let function_area = layout[3];

    draw_header(frame, app, header_area, theme);

    // Split the content into the two panes per the layout setting.
    let pane_layout = match app.settings.layout() {
        PaneLayout::Horizontal => Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(content_area),
        PaneLayout::Vertical => Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(content_area),
    };
    let original_area = pane_layout[0];
    let translated_area = pane_layout[1];

    // The first pane gives up one cell to the divider.
    let divider = match app.settings.layout() {
        PaneLayout::Horizontal => Borders::RIGHT,
        PaneLayout::Vertical => Borders::BOTTOM,
    };
    let original_block = Block::default()
        .borders(divider)
        .border_style(Style::default().fg(theme.compare.border));
    let original_inner = original_block.inner(original_area);
    frame.render_widget(original_block, original_area);

    app.compare.visible_height = original_inner
        .height
        .min(translated_area.height)
        .max(1) as usize;
    let max = app.compare.max_scroll();
    app.compare.original_scroll = app.compare.original_scroll.min(max);
    app.compare.translated_scroll = app.compare.translated_scroll.min(max);

    let query = app.workspace.search_query.clone();
    render_pane(
        frame,
        app,
        original_inner,
        SearchSide::Original,
        &query,
        theme,
    );
    render_pane(
        frame,
        app,
        translated_area,
        SearchSide::Translated,
        &query,
        theme,
    );

    // One scrollbar per pane, only when scrollable.
    let total = app.compare.rows.len();
    let visible = app.compare.visible_height;
    if total > visible {
        for (pane_area, scroll) in [
            (original_area, app.compare.original_scroll),
            (translated_area, app.compare.translated_scroll),
        ] {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
            let mut scrollbar_state =
                ScrollbarState::new(total.saturating_sub(visible)).position(scroll);
            frame.render_stateful_widget(scrollbar, pane_area, &mut scrollbar_state);
        }
    }

    draw_status_bar(frame, app, status_area, theme);
    draw_function_bar(frame, app, function_area, theme);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let colors = &theme.compare;
    let text = match app.workspace.active_translated_file() {
        Some(file) => format!(
            "[ROMDIFF] {}  ({}/{})",
            file.name,
            app.workspace.active_index + 1,
            app.workspace.file_count().max(1)
        ),
        None => "[ROMDIFF] no files loaded - press o / t to load scripts".to_string(),
    };
    let line = Line::from(Span::styled(
        text,
        Style::default().fg(colors.header_text).bg(colors.bg),
    ));
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(colors.bg)),
        area,
    );
}

fn render_pane(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    side: SearchSide,
    query: &str,
    theme: &Theme,
) {
    let state = &app.compare;
    let width = area.width as usize;
    let height = area.height as usize;
    let scroll = match side {
        SearchSide::Original => state.original_scroll,
        SearchSide::Translated => state.translated_scroll,
    };

    let max_line = state
        .rows
        .iter()
        .filter_map(|r| match side {
            SearchSide::Original => r.original_no,
            SearchSide::Translated => r.translated_no,
        })
        .max()
        .unwrap_or(1)
        .max(1);
    let digits = ((max_line as f64).log10().floor() as usize) + 1;
    let gutter_width = 1 + digits + 1; // marker + digits + separator

    let current_change_row = state.change_positions.get(state.current_change).copied();

    let end = (scroll + height).min(state.rows.len());
    let mut display: Vec<Line> = Vec::with_capacity(height);
    for (i, row) in state.rows[scroll..end].iter().enumerate() {
        let is_current_change = current_change_row == Some(scroll + i);
        display.push(render_row(
            app,
            row,
            side,
            gutter_width,
            digits,
            width,
            query,
            theme,
            is_current_change,
        ));
    }
    for _ in display.len()..height {
        display.push(Line::from(Span::styled(
            " ".repeat(width),
            Style::default().bg(theme.compare.bg),
        )));
    }

    frame.render_widget(Paragraph::new(display), area);
}

#[allow(clippy::too_many_arguments)]
fn render_row(
    app: &App,
    row: &DiffRow,
    side: SearchSide,
    gutter_width: usize,
    digits: usize,
    width: usize,
    query: &str,
    theme: &Theme,
    is_current_change: bool,
) -> Line<'static> {
    let colors = &theme.compare;
    let (number, content) = match side {
        SearchSide::Original => (row.original_no, row.original.as_deref()),
        SearchSide::Translated => (row.translated_no, row.translated.as_deref()),
    };

    // Per-kind colors for this side of the row.
    let (base_style, gutter_bg) = match (row.kind, content) {
        (_, None) => (
            Style::default().bg(colors.empty_bg),
            colors.empty_bg,
        ),
        (RowKind::Same, _) => (
            Style::default().fg(colors.same_text).bg(colors.bg),
            colors.bg,
        ),
        (RowKind::Changed, _) => (
            Style::default().fg(colors.changed_text).bg(colors.changed_bg),
            colors.changed_bg,
        ),
        (RowKind::OriginalOnly, _) => (
            Style::default()
                .fg(colors.original_only_text)
                .bg(colors.original_only_bg),
            colors.original_only_bg,
        ),
        (RowKind::TranslatedOnly, _) => (
            Style::default()
                .fg(colors.translated_only_text)
                .bg(colors.translated_only_bg),
            colors.translated_only_bg,
        ),
    };

    let marker = if is_current_change { "\u{25B6}" } else { " " };
    let gutter = match number {
        Some(n) => format!("{}{:>width$}\u{2502}", marker, n, width = digits),
        None => format!("{}{:>width$}\u{2502}", marker, "", width = digits),
    };
    let gutter_span = Span::styled(
        gutter,
        Style::default().fg(colors.line_number).bg(gutter_bg),
    );

    let content_width = width.saturating_sub(gutter_width);
    let mut spans = vec![gutter_span];

    let Some(text) = content else {
        spans.push(Span::styled(
            " ".repeat(content_width),
            Style::default().bg(colors.empty_bg),
        ));
        return Line::from(spans);
    };

    let cursor = cursor_col_for_row(app, row, side);
    let pieces: Vec<(String, Style)> = if let Some(col) = cursor {
        cursor_pieces(text, col, base_style, colors.cursor_fg, colors.cursor_bg)
    } else if row.kind == RowKind::Changed {
        let other = match side {
            SearchSide::Original => row.translated.as_deref().unwrap_or(""),
            SearchSide::Translated => row.original.as_deref().unwrap_or(""),
        };
        let inline = Style::default()
            .fg(colors.inline_change_text)
            .bg(colors.inline_change_bg);
        diff::inline_segments(text, other)
            .into_iter()
            .map(|(s, highlighted)| (s, if highlighted { inline } else { base_style }))
            .collect()
    } else if !query.is_empty() {
        let matched = Style::default()
            .fg(colors.search_match_text)
            .bg(colors.search_match_bg);
        search_pieces(text, query, base_style, matched)
    } else {
        vec![(text.to_string(), base_style)]
    };

    spans.extend(clip_spans(pieces, content_width, base_style));
    Line::from(spans)
}

/// The edit cursor's column, when this row is the cursor row of an active
/// edit session on the translated pane.
fn cursor_col_for_row(app: &App, row: &DiffRow, side: SearchSide) -> Option<usize> {
    if !app.compare.editing || side != SearchSide::Translated {
        return None;
    }
    if row.translated_no == Some(app.compare.cursor_line + 1) {
        Some(app.compare.cursor_col)
    } else {
        None
    }
}

fn cursor_pieces(
    text: &str,
    col: usize,
    base: Style,
    cursor_fg: ratatui::style::Color,
    cursor_bg: ratatui::style::Color,
) -> Vec<(String, Style)> {
    let cursor_style = Style::default().fg(cursor_fg).bg(cursor_bg);
    let chars: Vec<char> = text.chars().collect();
    let before: String = chars.iter().take(col).collect();
    let at: String = chars.get(col).map(|c| c.to_string()).unwrap_or_else(|| " ".to_string());
    let after: String = chars.iter().skip(col + 1).collect();

    let mut pieces = Vec::new();
    if !before.is_empty() {
        pieces.push((before, base));
    }
    pieces.push((at, cursor_style));
    if !after.is_empty() {
        pieces.push((after, base));
    }
    pieces
}

/// Split a line into (text, style) runs with case-insensitive query matches
/// styled as hits. Char-wise lowercase comparison keeps offsets aligned.
fn search_pieces(line: &str, query: &str, base: Style, matched: Style) -> Vec<(String, Style)> {
    let line_chars: Vec<char> = line.chars().collect();
    let lower: Vec<char> = line_chars
        .iter()
        .map(|c| c.to_lowercase().next().unwrap_or(*c))
        .collect();
    let needle: Vec<char> = query
        .chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect();
    if needle.is_empty() || needle.len() > lower.len() {
        return vec![(line.to_string(), base)];
    }

    let mut pieces = Vec::new();
    let mut plain_start = 0usize;
    let mut i = 0usize;
    while i + needle.len() <= lower.len() {
        if lower[i..i + needle.len()] == needle[..] {
            if plain_start < i {
                pieces.push((line_chars[plain_start..i].iter().collect(), base));
            }
            pieces.push((line_chars[i..i + needle.len()].iter().collect(), matched));
            i += needle.len();
            plain_start = i;
        } else {
            i += 1;
        }
    }
    if plain_start < line_chars.len() {
        pieces.push((line_chars[plain_start..].iter().collect(), base));
    }
    if pieces.is_empty() {
        pieces.push((String::new(), base));
    }
    pieces
}

/// Clip styled runs to a display width (tabs expand to 4-column stops,
/// fullwidth chars take two columns) and pad the remainder.
fn clip_spans(pieces: Vec<(String, Style)>, width: usize, pad_style: Style) -> Vec<Span<'static>> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut col = 0usize;
    let mut full = false;

    for (text, style) in pieces {
        if full {
            break;
        }
        let mut buf = String::new();
        for ch in text.chars() {
            let w = if ch == '\t' {
                4 - (col % 4)
            } else {
                ch.width().unwrap_or(0)
            };
            if col + w > width {
                full = true;
                break;
            }
            if ch == '\t' {
                for _ in 0..w {
                    buf.push(' ');
                }
            } else {
                buf.push(ch);
            }
            col += w;
        }
        if !buf.is_empty() {
            spans.push(Span::styled(buf, style));
        }
    }

    if col < width {
        spans.push(Span::styled(" ".repeat(width - col), pad_style));
    }
    spans
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let colors = &theme.compare;
    let base = Style::default()
        .fg(colors.status_bar_text)
        .bg(colors.status_bar_bg);
    let added = Style::default()
        .fg(colors.stats_added)
        .bg(colors.status_bar_bg);
    let removed = Style::default()
        .fg(colors.stats_removed)
        .bg(colors.status_bar_bg);

    let version_info = match app.workspace.active_timeline() {
        Some(t) if !t.versions.is_empty() => {
            format!(" v{}/{}", t.current_index + 1, t.versions.len())
        }
        _ => String::from(" v-/-"),
    };
    let changes = app.compare.change_positions.len();
    let current = if changes > 0 {
        app.compare.current_change + 1
    } else {
        0
    };

    let mut spans = vec![
        Span::styled(version_info, base),
        Span::styled(
            format!(" | Changes {}/{}", current, changes),
            base,
        ),
        Span::styled(" | Lines ", base),
        Span::styled(format!("+{}", app.compare.line_stats.added), added),
        Span::styled(format!(" -{}", app.compare.line_stats.removed), removed),
        Span::styled(format!(" ={}", app.compare.line_stats.unchanged), base),
        Span::styled(" | Chars ", base),
        Span::styled(format!("+{}", app.compare.char_stats.added), added),
        Span::styled(format!(" -{}", app.compare.char_stats.removed), removed),
        Span::styled(format!(" ={}", app.compare.char_stats.unchanged), base),
    ];
    if app.compare.editing {
        spans.push(Span::styled(" | EDIT", base));
    }
    if app.settings.sync_scroll {
        spans.push(Span::styled(" | SYNC", base));
    }
    let focus = match app.compare.focus {
        SearchSide::Original => " | [original]",
        SearchSide::Translated => " | [translated]",
    };
    spans.push(Span::styled(focus, base));

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(colors.status_bar_bg)),
        area,
    );
}

fn draw_function_bar(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let colors = &theme.compare;
    let key_style = Style::default().fg(colors.footer_key).bg(colors.bg);
    let text_style = Style::default().fg(colors.footer_text).bg(colors.bg);

    let entries: &[(&str, &str)] = if app.compare.editing {
        &[
            ("Esc", ":done "),
            ("\u{2191}\u{2193}\u{2190}\u{2192}", ":move "),
            ("Enter", ":newline "),
            ("Ctrl+Z/Y", ":undo/redo "),
        ]
    } else {
        &[
            ("\u{2191}\u{2193}", ":scroll "),
            ("Tab", ":pane "),
            ("Enter", ":edit "),
            ("n/p", ":change "),
            ("/", ":search "),
            ("r", ":replace "),
            ("l", ":files "),
            ("h", ":history "),
            ("u/y", ":undo/redo "),
            ("F7/F8", ":save "),
            ("?", ":help "),
            ("q", ":quit"),
        ]
    };

    let mut spans = vec![Span::styled(" ", text_style)];
    for (key, label) in entries {
        spans.push(Span::styled(*key, key_style));
        spans.push(Span::styled(*label, text_style));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(colors.bg)),
        area,
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::workspace::ScriptFile;

    fn app_with_pair(original: &str, translated: &str) -> App {
        let mut app = App::with_settings(Settings::default());
        app.workspace
            .upload_original(vec![ScriptFile::new("a.txt", original)]);
        app.workspace
            .upload_translated(vec![ScriptFile::new("a.txt", translated)]);
        app.refresh_compare();
        app.compare.visible_height = 10;
        app
    }

    #[test]
    fn test_sync_follow_tolerance() {
        // Deltas of one row are ignored; larger deltas snap the follower.
        assert_eq!(sync_follow(5, 5), 5);
        assert_eq!(sync_follow(5, 4), 4);
        assert_eq!(sync_follow(5, 6), 6);
        assert_eq!(sync_follow(5, 3), 5);
        assert_eq!(sync_follow(0, 9), 0);
    }

    #[test]
    fn test_refresh_clamps_cursor() {
        let mut state = CompareState::new();
        state.cursor_line = 99;
        state.cursor_col = 99;
        state.refresh("a", "one\ntwo");
        assert_eq!(state.cursor_line, 1);
        assert_eq!(state.cursor_col, 3);
    }

    #[test]
    fn test_reveal_focuses_side_and_scrolls() {
        let original: String = (1..=50).map(|i| format!("line{}\n", i)).collect();
        let mut state = CompareState::new();
        state.visible_height = 10;
        state.refresh(&original, &original);

        state.reveal(40, SearchSide::Original, false);
        assert_eq!(state.focus, SearchSide::Original);
        // Row 39 lands in view with a quarter-page of context above.
        assert!(state.original_scroll <= 39);
        assert!(39 < state.original_scroll + state.visible_height);
    }

    #[test]
    fn test_reveal_translated_places_cursor() {
        let text: String = (1..=20).map(|i| format!("line{}\n", i)).collect();
        let mut state = CompareState::new();
        state.visible_height = 5;
        state.refresh(&text, &text);

        state.reveal(12, SearchSide::Translated, true);
        assert_eq!(state.cursor_line, 11);
        assert_eq!(state.cursor_col, 0);
        // Sync reveals align both panes.
        assert_eq!(state.original_scroll, state.translated_scroll);
    }

    #[test]
    fn test_row_index_for_line_skips_other_side() {
        let mut state = CompareState::new();
        state.refresh("a\nb\nc", "a\nc");
        // Original line 3 ("c") sits below the removed-row gap.
        assert_eq!(state.row_index_for_line(3, SearchSide::Original), Some(2));
        // Translated line 2 is the same aligned row.
        assert_eq!(state.row_index_for_line(2, SearchSide::Translated), Some(2));
        assert_eq!(state.row_index_for_line(9, SearchSide::Original), None);
    }

    #[test]
    fn test_change_navigation_clamps_at_ends() {
        let mut state = CompareState::new();
        state.visible_height = 4;
        state.refresh("a\nb\nc\nd\ne", "a\nX\nc\nd\nY");
        assert_eq!(state.change_positions.len(), 2);

        state.next_change();
        assert_eq!(state.current_change, 1);
        state.next_change();
        assert_eq!(state.current_change, 1);
        state.prev_change();
        state.prev_change();
        assert_eq!(state.current_change, 0);
    }

    #[test]
    fn test_insert_char_routes_through_coordinator() {
        let mut app = app_with_pair("hello", "hello");
        app.compare.editing = true;
        app.compare.cursor_line = 0;
        app.compare.cursor_col = 5;
        insert_char(&mut app, '!');
        assert_eq!(app.workspace.active_translated_content(), "hello!");
        // One keystroke, one new version.
        assert_eq!(app.workspace.active_timeline().unwrap().versions.len(), 2);
        assert_eq!(app.compare.cursor_col, 6);
    }

    #[test]
    fn test_newline_and_backspace_join() {
        let mut app = app_with_pair("ab", "ab");
        app.compare.editing = true;
        app.compare.cursor_line = 0;
        app.compare.cursor_col = 1;
        insert_newline(&mut app);
        assert_eq!(app.workspace.active_translated_content(), "a\nb");
        assert_eq!(app.compare.cursor_line, 1);
        assert_eq!(app.compare.cursor_col, 0);

        backspace(&mut app);
        assert_eq!(app.workspace.active_translated_content(), "ab");
        assert_eq!(app.compare.cursor_line, 0);
        assert_eq!(app.compare.cursor_col, 1);
    }

    #[test]
    fn test_delete_forward_joins_next_line() {
        let mut app = app_with_pair("a\nb", "a\nb");
        app.compare.editing = true;
        app.compare.cursor_line = 0;
        app.compare.cursor_col = 1;
        delete_forward(&mut app);
        assert_eq!(app.workspace.active_translated_content(), "ab");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut app = app_with_pair("x", "\u{d55c}\u{ae00}");
        app.compare.editing = true;
        app.compare.cursor_line = 0;
        app.compare.cursor_col = 1;
        insert_char(&mut app, '-');
        assert_eq!(app.workspace.active_translated_content(), "\u{d55c}-\u{ae00}");
        backspace(&mut app);
        assert_eq!(app.workspace.active_translated_content(), "\u{d55c}\u{ae00}");
    }

    #[test]
    fn test_paste_multiline_is_single_edit() {
        let mut app = app_with_pair("seed", "seed");
        app.compare.editing = true;
        app.compare.cursor_line = 0;
        app.compare.cursor_col = 4;
        handle_paste(&mut app, "\nsecond\nthird");
        assert_eq!(app.workspace.active_translated_content(), "seed\nsecond\nthird");
        assert_eq!(app.workspace.active_timeline().unwrap().versions.len(), 2);
        assert_eq!(app.compare.cursor_line, 2);
        assert_eq!(app.compare.cursor_col, 5);
    }

    #[test]
    fn test_byte_index_multibyte() {
        assert_eq!(byte_index("abc", 1), 1);
        assert_eq!(byte_index("\u{d55c}\u{ae00}", 1), 3);
        assert_eq!(byte_index("ab", 9), 2);
    }

    #[test]
    fn test_search_pieces_marks_matches() {
        let base = Style::default();
        let matched = Style::default().bg(ratatui::style::Color::Blue);
        let pieces = search_pieces("Hello hello", "HELLO", base, matched);
        let hit_count = pieces.iter().filter(|(_, s)| *s == matched).count();
        assert_eq!(hit_count, 2);
        let joined: String = pieces.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(joined, "Hello hello");
    }
}
