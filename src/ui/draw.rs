use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use super::{
    app::{App, Screen},
    compare_view, dialogs, file_list, help, history_view, search_view,
};

pub fn draw(frame: &mut Frame, app: &mut App) {
    // Clone theme to avoid borrow conflict with mutable app
    let theme = app.theme;
    let area = frame.area();

    // Check if terminal is too large for ratatui buffer
    if (area.width as u32 * area.height as u32) > 65534 {
        let msg = Paragraph::new("Terminal too large. Please resize smaller.")
            .style(
                Style::default()
                    .fg(theme.message.text)
                    .add_modifier(Modifier::BOLD),
            );
        let safe_rect = Rect::new(0, 0, area.width.min(80), 1);
        frame.render_widget(msg, safe_rect);
        return;
    }

    // Fill entire screen with background color first
    let background = Block::default().style(Style::default().bg(theme.palette.bg));
    frame.render_widget(background, area);

    match app.current_screen {
        Screen::Compare => compare_view::draw(frame, app, area, &theme),
        Screen::FileList => file_list::draw(frame, app, area, &theme),
        Screen::History => history_view::draw(frame, app, area, &theme),
        Screen::SearchResults => search_view::draw(frame, app, area, &theme),
        Screen::Help => help::draw(frame, app, area, &theme),
    }

    if app.dialog.is_some() {
        dialogs::draw(frame, app, area, &theme);
    }

    if let Some(message) = &app.message {
        draw_toast(frame, message, area, &theme);
    }
}

/// One-line notification toast over the bottom row.
fn draw_toast(frame: &mut Frame, message: &str, area: Rect, theme: &super::theme::Theme) {
    if area.height < 2 {
        return;
    }
    let width = (message.chars().count() as u16 + 2).min(area.width);
    let rect = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + area.height - 2,
        width,
        1,
    );
    let line = Line::from(Span::styled(
        format!(" {} ", message),
        Style::default().fg(theme.message.text).bg(theme.message.bg),
    ));
    frame.render_widget(Paragraph::new(line), rect);
}
