use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Create a styled block with a title
pub fn titled_block(title: &str, accent: Color) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title(format!(" {} ", title))
        .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
}

/// Create a help bar at the bottom
pub fn help_bar<'a>(hints: &'a [(&'a str, &'a str)]) -> Paragraph<'a> {
    let spans: Vec<Span> = hints
        .iter()
        .enumerate()
        .flat_map(|(i, (key, action))| {
            let mut v = vec![
                Span::styled(*key, Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" "),
                Span::styled(*action, Style::default().fg(Color::DarkGray)),
            ];
            if i < hints.len() - 1 {
                v.push(Span::raw("  "));
            }
            v
        })
        .collect();

    Paragraph::new(Line::from(spans))
}

/// One decimal, or the em-dash sentinel when there is nothing to show.
pub fn format_average(average: Option<f64>) -> String {
    match average {
        Some(value) => format!("{:.1}", value),
        None => "—".to_string(),
    }
}

/// Parse accent color from config string
pub fn parse_accent_color(color: &str) -> Color {
    match color.to_lowercase().as_str() {
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "gray" | "grey" => Color::Gray,
        _ => Color::Cyan, // default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_render_to_one_decimal() {
        assert_eq!(format_average(Some(7.0)), "7.0");
        assert_eq!(format_average(Some(8.25)), "8.2");
        assert_eq!(format_average(None), "—");
    }
}
