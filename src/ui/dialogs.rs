use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::search::{SearchScope, SearchSide};
use crate::services::loader::LoadKind;
use crate::ui::app::{App, Dialog, DialogType, Screen};
use crate::ui::theme::Theme;

fn dialog_title(dialog_type: DialogType) -> &'static str {
    match dialog_type {
        DialogType::LoadOriginal => " Load Original ",
        DialogType::LoadTranslated => " Load Translated ",
        DialogType::Search => " Search ",
        DialogType::Replace => " Replace ",
    }
}

pub fn draw(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let Some(dialog) = &app.dialog else {
        return;
    };
    let colors = &theme.dialog;

    let width = area.width.saturating_sub(4).min(64).max(20);
    let height = 7u16;
    let rect = Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height.min(area.height),
    );
    frame.render_widget(Clear, rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border))
        .title(Span::styled(
            dialog_title(dialog.dialog_type),
            Style::default().fg(colors.title),
        ))
        .style(Style::default().bg(colors.bg));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let inner_width = inner.width as usize;
    let mut lines: Vec<Line> = Vec::new();
    for wrapped in textwrap::wrap(&dialog.message, inner_width.max(1)) {
        lines.push(Line::from(Span::styled(
            wrapped.into_owned(),
            Style::default().fg(colors.text).bg(colors.bg),
        )));
    }

    // Input row with a block cursor.
    let chars: Vec<char> = dialog.input.chars().collect();
    let cursor = dialog.cursor_pos.min(chars.len());
    let before: String = chars.iter().take(cursor).collect();
    let at: String = chars
        .get(cursor)
        .map(|c| c.to_string())
        .unwrap_or_else(|| " ".to_string());
    let after: String = chars.iter().skip(cursor + 1).collect();
    let input_style = Style::default().fg(colors.input_fg).bg(colors.input_bg);
    let cursor_style = Style::default().fg(colors.input_bg).bg(colors.input_fg);
    let used = before.chars().count() + at.chars().count() + after.chars().count();
    lines.push(Line::from(vec![
        Span::styled(before, input_style),
        Span::styled(at, cursor_style),
        Span::styled(after, input_style),
        Span::styled(
            " ".repeat(inner_width.saturating_sub(used)),
            input_style,
        ),
    ]));

    if dialog.dialog_type == DialogType::Search {
        let scope = match app.workspace.search_scope {
            SearchScope::AllFiles => "all files",
            SearchScope::CurrentFile => "current file",
        };
        let side = match app.workspace.search_side {
            SearchSide::Original => "original",
            SearchSide::Translated => "translated",
        };
        lines.push(Line::from(Span::styled(
            format!("Ctrl+F scope: {}   Ctrl+T side: {}", scope, side),
            Style::default().fg(colors.text).bg(colors.bg),
        )));
    }
    lines.push(Line::from(Span::styled(
        "Enter: confirm   Esc: cancel",
        Style::default().fg(colors.text).bg(colors.bg),
    )));

    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(colors.bg)),
        inner,
    );
}

pub fn handle_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let Some(dialog) = app.dialog.as_mut() else {
        return;
    };

    match code {
        KeyCode::Esc => {
            app.dialog = None;
        }
        KeyCode::Enter => {
            let dialog = dialog.clone();
            app.dialog = None;
            confirm(app, dialog);
        }
        KeyCode::Char('f') if ctrl && dialog.dialog_type == DialogType::Search => {
            app.workspace.search_scope = match app.workspace.search_scope {
                SearchScope::AllFiles => SearchScope::CurrentFile,
                SearchScope::CurrentFile => SearchScope::AllFiles,
            };
        }
        KeyCode::Char('t') if ctrl && dialog.dialog_type == DialogType::Search => {
            app.workspace.search_side = match app.workspace.search_side {
                SearchSide::Original => SearchSide::Translated,
                SearchSide::Translated => SearchSide::Original,
            };
        }
        KeyCode::Char(c) if !ctrl => {
            let byte = byte_at(&dialog.input, dialog.cursor_pos);
            dialog.input.insert(byte, c);
            dialog.cursor_pos += 1;
        }
        KeyCode::Backspace => {
            if dialog.cursor_pos > 0 {
                let byte = byte_at(&dialog.input, dialog.cursor_pos - 1);
                dialog.input.remove(byte);
                dialog.cursor_pos -= 1;
            }
        }
        KeyCode::Delete => {
            if dialog.cursor_pos < dialog.input.chars().count() {
                let byte = byte_at(&dialog.input, dialog.cursor_pos);
                dialog.input.remove(byte);
            }
        }
        KeyCode::Left => dialog.cursor_pos = dialog.cursor_pos.saturating_sub(1),
        KeyCode::Right => {
            if dialog.cursor_pos < dialog.input.chars().count() {
                dialog.cursor_pos += 1;
            }
        }
        KeyCode::Home => dialog.cursor_pos = 0,
        KeyCode::End => dialog.cursor_pos = dialog.input.chars().count(),
        _ => {}
    }
}

pub fn handle_paste(app: &mut App, text: &str) {
    let Some(dialog) = app.dialog.as_mut() else {
        return;
    };
    let clean: String = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
    let byte = byte_at(&dialog.input, dialog.cursor_pos);
    dialog.input.insert_str(byte, &clean);
    dialog.cursor_pos += clean.chars().count();
}

fn byte_at(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn confirm(app: &mut App, dialog: Dialog) {
    match dialog.dialog_type {
        DialogType::LoadOriginal => {
            let path = dialog.input.trim().to_string();
            if path.is_empty() {
                return;
            }
            app.settings.original_dir = Some(path.clone());
            app.save_settings();
            app.spawn_load(LoadKind::Original, path.into());
        }
        DialogType::LoadTranslated => {
            let path = dialog.input.trim().to_string();
            if path.is_empty() {
                return;
            }
            app.settings.translated_dir = Some(path.clone());
            app.save_settings();
            app.spawn_load(LoadKind::Translated, path.into());
        }
        DialogType::Search => {
            app.workspace.search_query = dialog.input;
            app.workspace.run_search();
            if app.workspace.search_query.is_empty() {
                return;
            }
            if app.workspace.search_results.is_empty() {
                app.show_message("No matches found");
            } else {
                app.search_view.selected = 0;
                app.search_view.scroll = 0;
                app.current_screen = Screen::SearchResults;
            }
        }
        DialogType::Replace => {
            app.workspace.replacement = dialog.input;
            if app.workspace.search_query.is_empty() {
                app.show_message("Search for something first");
                return;
            }
            app.workspace.run_replace();
            app.refresh_compare();
        }
    }
}
