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
use crate::utils::format::{format_relative_time, truncate_or_pad};

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

    let title = match app.workspace.active_timeline() {
        Some(t) => format!("[HISTORY] {}", t.file_name),
        None => String::from("[HISTORY] no translated file selected"),
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            title,
            Style::default().fg(colors.title).bg(bg),
        )))
        .style(Style::default().bg(bg)),
        layout[0],
    );

    let height = layout[1].height as usize;
    let width = layout[1].width as usize;
    let mut lines: Vec<Line> = Vec::with_capacity(height);

    if let Some(timeline) = app.workspace.active_timeline() {
        let count = timeline.versions.len();
        if app.history_view.selected >= count {
            app.history_view.selected = count.saturating_sub(1);
        }
        if app.history_view.selected < app.history_view.scroll {
            app.history_view.scroll = app.history_view.selected;
        } else if height > 0 && app.history_view.selected >= app.history_view.scroll + height {
            app.history_view.scroll = app.history_view.selected + 1 - height;
        }

        for index in
            app.history_view.scroll..(app.history_view.scroll + height).min(count)
        {
            let version = &timeline.versions[index];
            let marker = if index == timeline.current_index {
                "\u{25CF}"
            } else {
                " "
            };
            let text = format!(
                "{} {:>3}  {:<24} {:>12}  {} chars",
                marker,
                index + 1,
                version.description,
                format_relative_time(version.stamp),
                version.content.chars().count(),
            );
            let style = if index == app.history_view.selected {
                Style::default().fg(colors.selected_fg).bg(colors.selected_bg)
            } else if index == timeline.current_index {
                Style::default().fg(colors.marker).bg(bg)
            } else {
                Style::default().fg(colors.text).bg(bg)
            };
            lines.push(Line::from(Span::styled(truncate_or_pad(&text, width), style)));
        }
    } else {
        lines.push(Line::from(Span::styled(
            " load translated files to start tracking versions",
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
        Span::styled(":restore ", Style::default().fg(colors.dim).bg(bg)),
        Span::styled("u/y", Style::default().fg(colors.title).bg(bg)),
        Span::styled(":undo/redo ", Style::default().fg(colors.dim).bg(bg)),
        Span::styled("Esc", Style::default().fg(colors.title).bg(bg)),
        Span::styled(":back", Style::default().fg(colors.dim).bg(bg)),
    ]);
    frame.render_widget(
        Paragraph::new(footer).style(Style::default().bg(bg)),
        layout[2],
    );
}

pub fn handle_input(app: &mut App, code: KeyCode, _modifiers: KeyModifiers) {
    let count = app
        .workspace
        .active_timeline()
        .map(|t| t.versions.len())
        .unwrap_or(0);
    match code {
        KeyCode::Up => app.history_view.selected = app.history_view.selected.saturating_sub(1),
        KeyCode::Down => {
            if app.history_view.selected + 1 < count {
                app.history_view.selected += 1;
            }
        }
        KeyCode::Home => app.history_view.selected = 0,
        KeyCode::End => app.history_view.selected = count.saturating_sub(1),
        KeyCode::Enter => {
            let stamp = app
                .workspace
                .active_timeline()
                .and_then(|t| t.versions.get(app.history_view.selected))
                .map(|v| v.stamp);
            if let Some(stamp) = stamp {
                app.select_version(stamp);
            }
        }
        KeyCode::Char('u') => {
            app.undo();
            sync_selection(app);
        }
        KeyCode::Char('y') => {
            app.redo();
            sync_selection(app);
        }
        KeyCode::Esc => app.current_screen = Screen::Compare,
        _ => {}
    }
}

fn sync_selection(app: &mut App) {
    if let Some(timeline) = app.workspace.active_timeline() {
        app.history_view.selected = timeline.current_index;
    }
}
