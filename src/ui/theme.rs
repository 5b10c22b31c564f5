use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
    pub dim: Color,
}

/// Colors for the side-by-side compare view.
#[derive(Debug, Clone, Copy)]
pub struct CompareColors {
    pub bg: Color,
    pub border: Color,
    pub header_text: Color,
    pub same_text: Color,
    pub changed_text: Color,
    pub changed_bg: Color,
    pub original_only_text: Color,
    pub original_only_bg: Color,
    pub translated_only_text: Color,
    pub translated_only_bg: Color,
    pub empty_bg: Color,
    pub line_number: Color,
    pub inline_change_text: Color,
    pub inline_change_bg: Color,
    pub search_match_text: Color,
    pub search_match_bg: Color,
    pub cursor_fg: Color,
    pub cursor_bg: Color,
    pub status_bar_text: Color,
    pub status_bar_bg: Color,
    pub stats_added: Color,
    pub stats_removed: Color,
    pub footer_key: Color,
    pub footer_text: Color,
}

/// Colors for list screens (files, versions, search results).
#[derive(Debug, Clone, Copy)]
pub struct ListColors {
    pub title: Color,
    pub text: Color,
    pub dim: Color,
    pub selected_fg: Color,
    pub selected_bg: Color,
    pub marker: Color,
}

#[derive(Debug, Clone, Copy)]
pub struct DialogColors {
    pub bg: Color,
    pub border: Color,
    pub title: Color,
    pub text: Color,
    pub input_fg: Color,
    pub input_bg: Color,
}

#[derive(Debug, Clone, Copy)]
pub struct MessageColors {
    pub text: Color,
    pub bg: Color,
}

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub name: &'static str,
    pub palette: Palette,
    pub compare: CompareColors,
    pub list: ListColors,
    pub dialog: DialogColors,
    pub message: MessageColors,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    pub fn load(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "dark" => Self::dark(),
            _ => Self::light(),
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light",
            palette: Palette {
                bg: Color::Rgb(250, 250, 248),
                fg: Color::Rgb(40, 40, 40),
                accent: Color::Rgb(0, 95, 175),
                dim: Color::Rgb(130, 130, 130),
            },
            compare: CompareColors {
                bg: Color::Rgb(250, 250, 248),
                border: Color::Rgb(180, 180, 180),
                header_text: Color::Rgb(0, 95, 175),
                same_text: Color::Rgb(40, 40, 40),
                changed_text: Color::Rgb(80, 60, 0),
                changed_bg: Color::Rgb(255, 243, 205),
                original_only_text: Color::Rgb(120, 30, 30),
                original_only_bg: Color::Rgb(255, 225, 225),
                translated_only_text: Color::Rgb(20, 90, 30),
                translated_only_bg: Color::Rgb(218, 245, 220),
                empty_bg: Color::Rgb(238, 238, 235),
                line_number: Color::Rgb(150, 150, 150),
                inline_change_text: Color::Rgb(60, 30, 0),
                inline_change_bg: Color::Rgb(255, 210, 130),
                search_match_text: Color::Rgb(40, 40, 40),
                search_match_bg: Color::Rgb(180, 220, 255),
                cursor_fg: Color::Rgb(250, 250, 248),
                cursor_bg: Color::Rgb(0, 95, 175),
                status_bar_text: Color::Rgb(40, 40, 40),
                status_bar_bg: Color::Rgb(220, 220, 215),
                stats_added: Color::Rgb(20, 120, 40),
                stats_removed: Color::Rgb(170, 40, 40),
                footer_key: Color::Rgb(0, 95, 175),
                footer_text: Color::Rgb(110, 110, 110),
            },
            list: ListColors {
                title: Color::Rgb(0, 95, 175),
                text: Color::Rgb(40, 40, 40),
                dim: Color::Rgb(130, 130, 130),
                selected_fg: Color::Rgb(250, 250, 248),
                selected_bg: Color::Rgb(0, 95, 175),
                marker: Color::Rgb(200, 120, 0),
            },
            dialog: DialogColors {
                bg: Color::Rgb(240, 240, 236),
                border: Color::Rgb(0, 95, 175),
                title: Color::Rgb(0, 95, 175),
                text: Color::Rgb(40, 40, 40),
                input_fg: Color::Rgb(40, 40, 40),
                input_bg: Color::Rgb(255, 255, 255),
            },
            message: MessageColors {
                text: Color::Rgb(250, 250, 248),
                bg: Color::Rgb(0, 95, 175),
            },
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark",
            palette: Palette {
                bg: Color::Rgb(28, 30, 34),
                fg: Color::Rgb(215, 218, 222),
                accent: Color::Rgb(95, 170, 255),
                dim: Color::Rgb(120, 125, 132),
            },
            compare: CompareColors {
                bg: Color::Rgb(28, 30, 34),
                border: Color::Rgb(70, 74, 80),
                header_text: Color::Rgb(95, 170, 255),
                same_text: Color::Rgb(215, 218, 222),
                changed_text: Color::Rgb(235, 215, 160),
                changed_bg: Color::Rgb(62, 56, 34),
                original_only_text: Color::Rgb(240, 160, 160),
                original_only_bg: Color::Rgb(70, 38, 38),
                translated_only_text: Color::Rgb(160, 225, 170),
                translated_only_bg: Color::Rgb(34, 58, 38),
                empty_bg: Color::Rgb(38, 40, 45),
                line_number: Color::Rgb(105, 110, 118),
                inline_change_text: Color::Rgb(255, 235, 180),
                inline_change_bg: Color::Rgb(105, 85, 30),
                search_match_text: Color::Rgb(20, 22, 26),
                search_match_bg: Color::Rgb(110, 170, 230),
                cursor_fg: Color::Rgb(28, 30, 34),
                cursor_bg: Color::Rgb(95, 170, 255),
                status_bar_text: Color::Rgb(215, 218, 222),
                status_bar_bg: Color::Rgb(45, 48, 54),
                stats_added: Color::Rgb(130, 210, 140),
                stats_removed: Color::Rgb(235, 130, 130),
                footer_key: Color::Rgb(95, 170, 255),
                footer_text: Color::Rgb(130, 135, 142),
            },
            list: ListColors {
                title: Color::Rgb(95, 170, 255),
                text: Color::Rgb(215, 218, 222),
                dim: Color::Rgb(120, 125, 132),
                selected_fg: Color::Rgb(20, 22, 26),
                selected_bg: Color::Rgb(95, 170, 255),
                marker: Color::Rgb(255, 190, 90),
            },
            dialog: DialogColors {
                bg: Color::Rgb(38, 40, 46),
                border: Color::Rgb(95, 170, 255),
                title: Color::Rgb(95, 170, 255),
                text: Color::Rgb(215, 218, 222),
                input_fg: Color::Rgb(215, 218, 222),
                input_bg: Color::Rgb(52, 55, 62),
            },
            message: MessageColors {
                text: Color::Rgb(20, 22, 26),
                bg: Color::Rgb(95, 170, 255),
            },
        }
    }
}
