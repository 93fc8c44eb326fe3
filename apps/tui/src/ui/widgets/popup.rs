use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

pub fn render_help_popup(f: &mut Frame<'_>) {
    let area = centered_rect(60, 70, f.area());
    f.render_widget(Clear, area);

    let key = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let text = Style::default().fg(Color::White);

    let binding = |keys: &'static str, action: &'static str| {
        TextLine::from(vec![
            Span::styled(format!("  {keys:<12}"), key),
            Span::styled(action, text),
        ])
    };

    let lines = vec![
        TextLine::from(""),
        binding("/", "Edit the search term (Esc/Enter to leave)"),
        binding("Tab / ←→", "Switch between sheets"),
        binding("[ / ]", "Move the sort cursor across columns"),
        binding("Enter / s", "Sort by the cursor column, toggling direction"),
        binding("f", "Cycle the category filter"),
        binding("c", "Clear the category filter"),
        binding("↑↓ PgUp/PgDn", "Move the row selection"),
        binding("Home / End", "Jump to the first / last row"),
        binding("r", "Refresh data from the endpoint"),
        binding("F1", "Toggle this help"),
        binding("q / Esc", "Quit"),
    ];

    let popup = Paragraph::new(lines).block(
        Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(popup, area);
}
