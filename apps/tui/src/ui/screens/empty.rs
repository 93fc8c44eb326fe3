use crate::app::App;
use crate::ui::widgets::popup::centered_rect;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use throbber_widgets_tui::Throbber;

/// Shown exclusively when the load succeeded but carried no sheets.
pub fn render_empty_view(app: &App, f: &mut Frame<'_>) {
    let area = centered_rect(60, 40, f.area());

    let block = Block::default()
        .title(" No Data ")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(2), Constraint::Length(1)])
        .split(inner);

    if app.store.is_loading() {
        let throbber = Throbber::default()
            .label("Loading...")
            .style(Style::default().fg(Color::Cyan));
        f.render_widget(throbber, chunks[0]);
    } else {
        let body = Paragraph::new("The endpoint returned no sheets to display.")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center);
        f.render_widget(body, chunks[0]);
    }

    let key = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let hint = Paragraph::new(TextLine::from(vec![
        Span::styled("r", key),
        Span::raw(": Refresh   "),
        Span::styled("q", key),
        Span::raw(": Quit"),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(hint, chunks[1]);
}
