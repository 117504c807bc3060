use ratatui::style::{Color, Modifier, Style};

/// Colors used across the board.
pub struct BoardColors;

impl BoardColors {
    pub const HEADER: Color = Color::White;
    pub const DIMMED: Color = Color::DarkGray;
    pub const BORDER: Color = Color::Gray;
    pub const HOVER: Color = Color::Cyan;
    pub const SELECTED: Color = Color::Blue;
    pub const MONEY: Color = Color::Green;
    pub const ERROR: Color = Color::Red;
    pub const INFO: Color = Color::Yellow;
}

/// Pre-built styles.
pub struct Theme;

impl Theme {
    pub fn header() -> Style {
        Style::default()
            .fg(BoardColors::HEADER)
            .add_modifier(Modifier::BOLD)
    }

    pub fn dimmed() -> Style {
        Style::default().fg(BoardColors::DIMMED)
    }

    pub fn border() -> Style {
        Style::default().fg(BoardColors::BORDER)
    }

    pub fn hover_border() -> Style {
        Style::default()
            .fg(BoardColors::HOVER)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected_card() -> Style {
        Style::default()
            .bg(BoardColors::SELECTED)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    /// The card being dragged, shown in its origin column.
    pub fn dragged_card() -> Style {
        Style::default()
            .fg(BoardColors::HOVER)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn money() -> Style {
        Style::default().fg(BoardColors::MONEY)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(BoardColors::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    pub fn info() -> Style {
        Style::default().fg(BoardColors::INFO)
    }
}
