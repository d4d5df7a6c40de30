use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use crate::metadata::SearchHit;

use super::widgets::titled_block;

pub fn render_search_view(
    frame: &mut Frame,
    area: Rect,
    query: &str,
    results: &[SearchHit],
    list_state: &mut ListState,
    is_loading: bool,
    searched: bool,
    accent: Color,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    render_query_input(frame, chunks[0], query, is_loading, accent);
    render_results(frame, chunks[1], results, list_state, is_loading, searched, accent);
}

fn render_query_input(frame: &mut Frame, area: Rect, query: &str, is_loading: bool, accent: Color) {
    let title = if is_loading {
        "Search OMDb (searching...)"
    } else {
        "Search OMDb"
    };

    let input = Paragraph::new(query)
        .block(titled_block(title, accent))
        .style(Style::default().fg(Color::White));

    frame.render_widget(input, area);

    frame.set_cursor_position((area.x + query.len() as u16 + 1, area.y + 1));
}

fn render_results(
    frame: &mut Frame,
    area: Rect,
    results: &[SearchHit],
    list_state: &mut ListState,
    is_loading: bool,
    searched: bool,
    accent: Color,
) {
    if results.is_empty() {
        let hint = if is_loading {
            "Searching..."
        } else if searched {
            "No results found."
        } else {
            "Type a title and press Enter to search."
        };

        let empty = Paragraph::new(hint)
            .block(titled_block("Results", accent))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = results
        .iter()
        .map(|hit| {
            let type_color = if hit.media_type == "series" {
                Color::Magenta
            } else {
                Color::Cyan
            };

            let line = Line::from(vec![
                Span::styled(
                    format!("{:<7}", hit.media_type),
                    Style::default().fg(type_color),
                ),
                Span::raw(" │ "),
                Span::styled(
                    format!("{:<4}", hit.year),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(" │ "),
                Span::styled(hit.title.clone(), Style::default().fg(Color::White)),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(titled_block("Results — Enter adds to watchlist", accent))
        .highlight_style(
            Style::default()
                .bg(accent)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, list_state);
}
