use crate::app::App;
use crate::event::record_count_text;
use crate::ui::widgets::palette::category_color;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

pub const fn scroll_offset(
    total_rows: usize,
    max_visible_rows: usize,
    selected_index: usize,
) -> usize {
    if total_rows <= max_visible_rows {
        return 0;
    }

    if selected_index >= max_visible_rows {
        return selected_index.saturating_sub(max_visible_rows) + 1;
    }

    selected_index
}

/// The sortable data table for the active sheet: windowed rows, sort
/// indicator and cursor in the header, category cells tinted by the palette.
pub fn render_data_table(app: &App, f: &mut Frame<'_>, area: Rect) {
    let Some(sheet) = app.store.active_sheet() else {
        return;
    };

    let title = table_title(app);

    if sheet.headers.is_empty() {
        let message = sheet
            .error
            .clone()
            .unwrap_or_else(|| "No data available".to_string());
        let paragraph = Paragraph::new(message)
            .alignment(ratatui::layout::Alignment::Center)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            );
        f.render_widget(paragraph, area);
        return;
    }

    let header_cells = sheet.headers.iter().enumerate().map(|(index, header)| {
        let mut text = header.clone();
        if app.view.sort_column.as_deref() == Some(header.as_str()) {
            text.push(' ');
            text.push_str(app.view.sort_direction.indicator());
        }
        let mut style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        if index == app.view.sort_cursor {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        Cell::from(text).style(style)
    });
    let header = Row::new(header_cells);

    let records = sheet.visible_records();
    let category_index = sheet.header_index(app.store.category_column());

    let total_rows = records.len();
    // Borders, header row, and the status strip below eat into the height.
    let max_visible_rows = area.height.saturating_sub(4) as usize;
    let offset = scroll_offset(total_rows, max_visible_rows, app.view.selected_row);

    let rows: Vec<Row<'_>> = if records.is_empty() {
        vec![Row::new(vec![Cell::from("No matching records found")
            .style(Style::default().fg(Color::Gray))])]
    } else {
        records
            .iter()
            .skip(offset)
            .take(max_visible_rows)
            .enumerate()
            .map(|(visible_index, record)| {
                let is_selected = visible_index + offset == app.view.selected_row;
                let row_style = if is_selected {
                    Style::default()
                        .bg(Color::Rgb(0, 0, 238))
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };

                let cells = record.values().iter().enumerate().map(|(column, value)| {
                    let text = value.to_string();
                    if !is_selected && Some(column) == category_index && !value.is_falsy() {
                        let position = sheet
                            .category_counts
                            .iter()
                            .position(|(category, _)| *category == text)
                            .unwrap_or(0);
                        Cell::from(text.clone())
                            .style(Style::default().fg(category_color(&text, position)))
                    } else {
                        Cell::from(text)
                    }
                });
                Row::new(cells.collect::<Vec<_>>()).style(row_style)
            })
            .collect()
    };

    let widths = vec![Constraint::Ratio(1, sheet.headers.len() as u32); sheet.headers.len()];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Gray)),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}

fn table_title(app: &App) -> String {
    let count = record_count_text(app.store.visible_count());
    if app.view.searching {
        format!(" {count} | search: {}▌ ", app.view.search)
    } else if app.view.search.is_empty() {
        format!(" {count} ")
    } else {
        format!(" {count} | search: {} ", app.view.search)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_offset_keeps_selection_visible() {
        assert_eq!(scroll_offset(3, 10, 2), 0);
        assert_eq!(scroll_offset(20, 10, 4), 4);
        assert_eq!(scroll_offset(20, 10, 15), 6);
    }
}
