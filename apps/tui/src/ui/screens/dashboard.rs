use crate::app::App;
use crate::domain::NoticeKind;
use crate::event::record_count_text;
use crate::ui::widgets::cards::render_summary_cards;
use crate::ui::widgets::charts::render_category_panel;
use crate::ui::widgets::tables::render_data_table;
use chrono::Local;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};
use ratatui::Frame;
use throbber_widgets_tui::Throbber;

pub fn render_dashboard(app: &App, f: &mut Frame<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Title bar
            Constraint::Length(1),  // Sheet tabs
            Constraint::Length(5),  // Summary cards
            Constraint::Min(10),    // Table and chart
            Constraint::Length(3),  // Status line
            Constraint::Length(1),  // Shortcuts hint
        ])
        .split(f.area().inner(Margin::new(2, 1)));

    render_title_bar(app, f, chunks[0]);
    render_sheet_tabs(app, f, chunks[1]);
    render_summary_cards(app, f, chunks[2]);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(chunks[3]);

    render_data_table(app, f, content[0]);
    render_category_panel(app, f, content[1]);

    render_status_line(app, f, chunks[4]);
    render_shortcuts(f, chunks[5]);
}

fn render_title_bar(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(inner);

    let title = Paragraph::new(TextLine::from(vec![
        Span::styled(
            "Sheet ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "Dashboard",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
    ]))
    .alignment(Alignment::Left);
    f.render_widget(title, halves[0]);

    if app.store.is_loading() {
        let throbber = Throbber::default()
            .label("Refreshing...")
            .style(Style::default().fg(Color::Cyan));
        f.render_widget(throbber, halves[1]);
        return;
    }

    let updated = app.store.last_updated().map_or_else(
        || "never updated".to_string(),
        |stamp| {
            format!(
                "updated {}",
                stamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
            )
        },
    );
    let summary = Paragraph::new(TextLine::from(vec![
        Span::styled(
            record_count_text(app.store.visible_count()),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("  {updated}"),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .alignment(Alignment::Right);
    f.render_widget(summary, halves[1]);
}

fn render_sheet_tabs(app: &App, f: &mut Frame<'_>, area: Rect) {
    let titles = app
        .store
        .sheet_names()
        .iter()
        .map(|name| TextLine::from(name.clone()))
        .collect::<Vec<_>>();

    let selected = app
        .store
        .active_name()
        .and_then(|active| {
            app.store
                .sheet_names()
                .iter()
                .position(|name| name == active)
        })
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Rgb(0, 0, 238))
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::raw("|"));

    f.render_widget(tabs, area);
}

fn render_status_line(app: &App, f: &mut Frame<'_>, area: Rect) {
    let (message, color) = status_content(app);

    let status = Paragraph::new(TextLine::from(Span::styled(
        message,
        Style::default().fg(color),
    )))
    .block(
        Block::default()
            .title(" Status ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );

    f.render_widget(status, area);
}

fn status_content(app: &App) -> (String, Color) {
    if let Some(notice) = &app.notice {
        return (notice.message.clone(), notice_color(notice.kind));
    }
    if let Some(error) = app.store.active_sheet().and_then(|sheet| sheet.error.clone()) {
        return (error, notice_color(NoticeKind::Warning));
    }
    ("Ready".to_string(), Color::Gray)
}

const fn notice_color(kind: NoticeKind) -> Color {
    match kind {
        NoticeKind::Info => Color::Cyan,
        NoticeKind::Success => Color::Green,
        NoticeKind::Warning => Color::Yellow,
        NoticeKind::Error => Color::Red,
    }
}

fn render_shortcuts(f: &mut Frame<'_>, area: Rect) {
    let key = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let hints = TextLine::from(vec![
        Span::styled("/", key),
        Span::raw(": Search   "),
        Span::styled("Tab", key),
        Span::raw(": Sheets   "),
        Span::styled("[ ]", key),
        Span::raw(": Column   "),
        Span::styled("Enter", key),
        Span::raw(": Sort   "),
        Span::styled("f", key),
        Span::raw(": Filter   "),
        Span::styled("r", key),
        Span::raw(": Refresh   "),
        Span::styled("F1", key),
        Span::raw(": Help   "),
        Span::styled("q", key),
        Span::raw(": Quit"),
    ]);

    let paragraph = Paragraph::new(hints).alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}
