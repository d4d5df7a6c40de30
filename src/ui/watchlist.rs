use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use crate::watchlist::Entry;

use super::widgets::{format_average, titled_block};

fn entry_list_item(entry: &Entry) -> ListItem<'static> {
    let type_tag = if entry.is_series() { "TV" } else { "MV" };
    let type_color = if entry.is_series() {
        Color::Magenta
    } else {
        Color::Cyan
    };

    let mut spans = vec![
        Span::styled(format!("[{}] ", type_tag), Style::default().fg(type_color)),
        Span::styled(
            entry.title.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
    ];

    if !entry.year.is_empty() {
        spans.push(Span::styled(
            format!(" ({})", entry.year),
            Style::default().fg(Color::DarkGray),
        ));
    }

    spans.push(Span::raw("  IMDb: "));
    spans.push(Span::styled(
        entry.imdb_rating.clone(),
        Style::default().fg(Color::Yellow),
    ));

    spans.push(Span::raw("  You: "));
    spans.push(Span::styled(
        format_average(entry.user_average()),
        Style::default().fg(Color::Green),
    ));

    if let Some(total) = entry.total_episodes {
        spans.push(Span::styled(
            format!("  {}/{} eps rated", entry.episode_ratings.len(), total),
            Style::default().fg(Color::DarkGray),
        ));
    }

    ListItem::new(Line::from(spans))
}

pub fn render_watchlist_view(
    frame: &mut Frame,
    area: Rect,
    entries: &[Entry],
    list_state: &mut ListState,
    accent: Color,
) {
    if entries.is_empty() {
        let empty = Paragraph::new("Your watchlist is empty. Press / to search and add titles.")
            .block(titled_block("Watchlist", accent))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = entries.iter().map(entry_list_item).collect();

    let title = format!("Watchlist ({})", entries.len());
    let list = List::new(items)
        .block(titled_block(&title, accent))
        .highlight_style(
            Style::default()
                .bg(accent)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, list_state);
}
