use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ui::app::{App, Screen};
use crate::ui::theme::Theme;
use crate::utils::format::{format_size, truncate_or_pad};

pub fn draw(frame: &mut Frame, app: &mut App, area: Rect, theme: &Theme) {
    if area.height < 3 {
        return;
    }
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    let colors = &theme.list;
    let bg = theme.palette.bg;
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "[FILES] original / translated pairs",
            Style::default().fg(colors.title).bg(bg),
        )))
        .style(Style::default().bg(bg)),
        layout[0],
    );

    let count = app.workspace.file_count();
    let height = layout[1].height as usize;
    let width = layout[1].width as usize;

    // Keep the selection on screen.
    if app.file_list.selected >= count {
        app.file_list.selected = count.saturating_sub(1);
    }
    if app.file_list.selected < app.file_list.scroll {
        app.file_list.scroll = app.file_list.selected;
    } else if height > 0 && app.file_list.selected >= app.file_list.scroll + height {
        app.file_list.scroll = app.file_list.selected + 1 - height;
    }

    let mut lines: Vec<Line> = Vec::with_capacity(height);
    let half = width.saturating_sub(8) / 2;
    for index in app.file_list.scroll..(app.file_list.scroll + height).min(count) {
        let original = app.workspace.original_file(index);
        let translated = app.workspace.translated_file(index);
        let describe = |file: Option<&crate::workspace::ScriptFile>| match file {
            Some(f) => format!("{} ({})", f.name, format_size(f.content.len() as u64)),
            None => String::from("-"),
        };
        let marker = if index == app.workspace.active_index {
            "\u{25B6}"
        } else {
            " "
        };
        let text = format!(
            "{} {:>3}  {}  {}",
            marker,
            index + 1,
            truncate_or_pad(&describe(original), half),
            truncate_or_pad(&describe(translated), half),
        );
        let style = if index == app.file_list.selected {
            Style::default().fg(colors.selected_fg).bg(colors.selected_bg)
        } else if index == app.workspace.active_index {
            Style::default().fg(colors.marker).bg(bg)
        } else {
            Style::default().fg(colors.text).bg(bg)
        };
        lines.push(Line::from(Span::styled(truncate_or_pad(&text, width), style)));
    }
    if count == 0 {
        lines.push(Line::from(Span::styled(
            " no files loaded - press o / t on the compare screen",
            Style::default().fg(colors.dim).bg(bg),
        )));
    }
    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(bg)),
        layout[1],
    );

    let footer = Line::from(vec![
        Span::styled(" \u{2191}\u{2193}", Style::default().fg(colors.title).bg(bg)),
        Span::styled(":select ", Style::default().fg(colors.dim).bg(bg)),
        Span::styled("Enter", Style::default().fg(colors.title).bg(bg)),
        Span::styled(":open ", Style::default().fg(colors.dim).bg(bg)),
        Span::styled("Esc", Style::default().fg(colors.title).bg(bg)),
        Span::styled(":back", Style::default().fg(colors.dim).bg(bg)),
    ]);
    frame.render_widget(
        Paragraph::new(footer).style(Style::default().bg(bg)),
        layout[2],
    );
}

pub fn handle_input(app: &mut App, code: KeyCode, _modifiers: KeyModifiers) {
    let count = app.workspace.file_count();
    match code {
        KeyCode::Up => app.file_list.selected = app.file_list.selected.saturating_sub(1),
        KeyCode::Down => {
            if app.file_list.selected + 1 < count {
                app.file_list.selected += 1;
            }
        }
        KeyCode::Home => app.file_list.selected = 0,
        KeyCode::End => app.file_list.selected = count.saturating_sub(1),
        KeyCode::Enter => {
            if count > 0 {
                app.set_active_index(app.file_list.selected);
                app.current_screen = Screen::Compare;
            }
        }
        KeyCode::Esc => app.current_screen = Screen::Compare,
        _ => {}
    }
}
