use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::search::{SearchScope, SearchSide};
use crate::ui::app::{App, Screen};
use crate::ui::theme::Theme;
use crate::utils::format::truncate_or_pad;

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

    let scope = match app.workspace.search_scope {
        SearchScope::AllFiles => "all files",
        SearchScope::CurrentFile => "current file",
    };
    let side = match app.workspace.search_side {
        SearchSide::Original => "original",
        SearchSide::Translated => "translated",
    };
    let title = format!(
        "[RESULTS] \"{}\" in {} ({}) - {} hit(s)",
        app.workspace.search_query,
        scope,
        side,
        app.workspace.search_results.len(),
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            title,
            Style::default().fg(colors.title).bg(bg),
        )))
        .style(Style::default().bg(bg)),
        layout[0],
    );

    let count = app.workspace.search_results.len();
    let height = layout[1].height as usize;
    let width = layout[1].width as usize;

    if app.search_view.selected >= count {
        app.search_view.selected = count.saturating_sub(1);
    }
    if app.search_view.selected < app.search_view.scroll {
        app.search_view.scroll = app.search_view.selected;
    } else if height > 0 && app.search_view.selected >= app.search_view.scroll + height {
        app.search_view.scroll = app.search_view.selected + 1 - height;
    }

    let mut lines: Vec<Line> = Vec::with_capacity(height);
    for index in app.search_view.scroll..(app.search_view.scroll + height).min(count) {
        let hit = &app.workspace.search_results[index];
        let text = format!(
            " {}:{}: {}",
            hit.file_name,
            hit.line_number,
            hit.text.trim_end(),
        );
        let style = if index == app.search_view.selected {
            Style::default().fg(colors.selected_fg).bg(colors.selected_bg)
        } else {
            Style::default().fg(colors.text).bg(bg)
        };
        lines.push(Line::from(Span::styled(truncate_or_pad(&text, width), style)));
    }
    if count == 0 {
        lines.push(Line::from(Span::styled(
            " no results - press / on the compare screen to search",
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
        Span::styled(":jump ", Style::default().fg(colors.dim).bg(bg)),
        Span::styled("Esc", Style::default().fg(colors.title).bg(bg)),
        Span::styled(":back", Style::default().fg(colors.dim).bg(bg)),
    ]);
    frame.render_widget(
        Paragraph::new(footer).style(Style::default().bg(bg)),
        layout[2],
    );
}

pub fn handle_input(app: &mut App, code: KeyCode, _modifiers: KeyModifiers) {
    let count = app.workspace.search_results.len();
    match code {
        KeyCode::Up => app.search_view.selected = app.search_view.selected.saturating_sub(1),
        KeyCode::Down => {
            if app.search_view.selected + 1 < count {
                app.search_view.selected += 1;
            }
        }
        KeyCode::Home => app.search_view.selected = 0,
        KeyCode::End => app.search_view.selected = count.saturating_sub(1),
        KeyCode::Enter => {
            let hit = app
                .workspace
                .search_results
                .get(app.search_view.selected)
                .cloned();
            if let Some(hit) = hit {
                app.jump_to_hit(&hit);
            }
        }
        KeyCode::Esc => app.current_screen = Screen::Compare,
        _ => {}
    }
}
