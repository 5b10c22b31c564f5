use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ui::app::App;
use crate::ui::theme::Theme;

const KEYS: &[(&str, &str)] = &[
    ("o / F2", "load original scripts from a path"),
    ("t / F3", "load translated scripts from a path"),
    ("l", "file list (pick the active pair)"),
    ("Tab", "switch focused pane"),
    ("Up/Down PgUp/PgDn Home/End", "scroll the focused pane"),
    ("n / p", "next / previous change block"),
    ("Enter / e / F4", "edit the translated pane (Esc to finish)"),
    ("u / y", "undo / redo (Ctrl+Z / Ctrl+Y while editing)"),
    ("h", "version history of the active file"),
    ("/ or f / F5", "search (Ctrl+F scope, Ctrl+T side in the dialog)"),
    ("r / F6", "replace all in the active translated file"),
    ("s", "search results"),
    ("F7", "save the active translated file"),
    ("F8", "save all translated files as translated_scripts.zip"),
    ("F9", "toggle horizontal / vertical layout"),
    ("x", "toggle synchronized scrolling"),
    ("d", "toggle light / dark theme"),
    ("q / F10", "quit"),
];

pub fn draw(frame: &mut Frame, _app: &App, area: Rect, theme: &Theme) {
    let colors = &theme.list;
    let bg = theme.palette.bg;

    let mut lines = vec![
        Line::from(Span::styled(
            "[HELP] romdiff keys",
            Style::default().fg(colors.title).bg(bg),
        )),
        Line::from(Span::raw("")),
    ];
    for (key, description) in KEYS {
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {:<28}", key),
                Style::default().fg(colors.title).bg(bg),
            ),
            Span::styled(*description, Style::default().fg(colors.text).bg(bg)),
        ]));
    }
    lines.push(Line::from(Span::raw("")));
    lines.push(Line::from(Span::styled(
        " press any key to return",
        Style::default().fg(colors.dim).bg(bg),
    )));

    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(bg)),
        area,
    );
}

/// Returns true when the help screen should close.
pub fn handle_input(_app: &mut App, _code: KeyCode) -> bool {
    true
}
