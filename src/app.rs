use std::collections::BTreeMap;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, ListState, Paragraph},
};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::config::Config;
use crate::error::Result;
use crate::metadata::{MetadataProvider, OmdbClient, SearchHit, TitleDetails};
use crate::ui::{render_search_view, render_watchlist_view, widgets};
use crate::watchlist::{Entry, Watchlist};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View {
    Watchlist,
    Search,
    Detail,
    ConfirmRemove,
}

/// Which field of the detail dialog owns keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailFocus {
    #[default]
    Overall,
    SeriesFlag,
    EpisodeCount,
    Row(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeRow {
    pub number: u32,
    pub input: String,
}

/// Editing state for one open detail dialog. Everything here is scratch
/// space until Save commits it through the store; the one exception is the
/// episode count, which "create inputs" writes onto the entry immediately.
#[derive(Debug, Default)]
pub struct DetailDialogState {
    pub entry_idx: usize,
    pub overall_input: String,
    pub is_series: bool,
    pub count_input: String,
    pub rows: Vec<EpisodeRow>,
    pub focus: DetailFocus,
    pub notice: Option<String>,
}

impl DetailDialogState {
    pub fn open(entry_idx: usize, entry: &Entry) -> Self {
        let rows = match entry.total_episodes {
            Some(count) if count > 0 => Self::seeded_rows(entry, count),
            _ => Vec::new(),
        };

        Self {
            entry_idx,
            overall_input: entry
                .user_overall
                .map(|v| v.to_string())
                .unwrap_or_default(),
            is_series: entry.is_series() || entry.total_episodes.is_some(),
            count_input: entry
                .total_episodes
                .map(|n| n.to_string())
                .unwrap_or_default(),
            rows,
            focus: DetailFocus::Overall,
            notice: None,
        }
    }

    fn seeded_rows(entry: &Entry, count: u32) -> Vec<EpisodeRow> {
        (1..=count)
            .map(|number| EpisodeRow {
                number,
                input: entry
                    .episode_ratings
                    .get(&number)
                    .map(|r| r.to_string())
                    .unwrap_or_default(),
            })
            .collect()
    }

    pub fn set_series(&mut self, yes: bool) {
        self.is_series = yes;
        if !yes {
            // The count control is hidden and any built rows are discarded;
            // ratings already saved on the entry are not touched here.
            self.rows.clear();
        }
    }

    /// The "create inputs" action. Writes the parsed count onto the entry
    /// right away and rebuilds the rows from its stored ratings; a bad count
    /// leaves everything as it was.
    pub fn create_rows(&mut self, entry: &mut Entry) {
        let count = match self.count_input.trim().parse::<u32>() {
            Ok(count) if count >= 1 => count,
            _ => {
                self.notice = Some("Enter a valid number of episodes".to_string());
                return;
            }
        };

        self.notice = None;
        entry.total_episodes = Some(count);
        self.rows = Self::seeded_rows(entry, count);
        self.focus = DetailFocus::Row(0);
    }

    pub fn parsed_overall(&self) -> Option<f64> {
        parse_rating(&self.overall_input)
    }

    /// The full episode map to commit: one entry per row whose text parses
    /// as a rating. Empty and unparseable rows are simply omitted.
    pub fn collected_ratings(&self) -> BTreeMap<u32, f64> {
        self.rows
            .iter()
            .filter_map(|row| parse_rating(&row.input).map(|v| (row.number, v)))
            .collect()
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            DetailFocus::Overall => DetailFocus::SeriesFlag,
            DetailFocus::SeriesFlag if self.is_series => DetailFocus::EpisodeCount,
            DetailFocus::SeriesFlag => DetailFocus::Overall,
            DetailFocus::EpisodeCount if !self.rows.is_empty() => DetailFocus::Row(0),
            DetailFocus::EpisodeCount => DetailFocus::Overall,
            DetailFocus::Row(i) if i + 1 < self.rows.len() => DetailFocus::Row(i + 1),
            DetailFocus::Row(_) => DetailFocus::Overall,
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            DetailFocus::Overall if !self.rows.is_empty() => {
                DetailFocus::Row(self.rows.len() - 1)
            }
            DetailFocus::Overall if self.is_series => DetailFocus::EpisodeCount,
            DetailFocus::Overall => DetailFocus::SeriesFlag,
            DetailFocus::SeriesFlag => DetailFocus::Overall,
            DetailFocus::EpisodeCount => DetailFocus::SeriesFlag,
            DetailFocus::Row(0) => DetailFocus::EpisodeCount,
            DetailFocus::Row(i) => DetailFocus::Row(i - 1),
        };
    }

    fn focused_input(&mut self) -> Option<&mut String> {
        match self.focus {
            DetailFocus::Overall => Some(&mut self.overall_input),
            DetailFocus::EpisodeCount => Some(&mut self.count_input),
            DetailFocus::Row(i) => self.rows.get_mut(i).map(|row| &mut row.input),
            DetailFocus::SeriesFlag => None,
        }
    }
}

/// Ratings are decimals in [0, 10]; anything else is treated as not entered.
fn parse_rating(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let value: f64 = raw.parse().ok()?;
    (value.is_finite() && (0.0..=10.0).contains(&value)).then_some(value)
}

#[derive(Debug, Default)]
pub struct ConfirmRemoveState {
    pub index: usize,
    pub title: String,
}

pub enum AppMessage {
    SearchResults(Vec<SearchHit>),
    DetailsFetched(Option<Box<TitleDetails>>),
}

pub struct App {
    pub config: Config,
    pub watchlist: Watchlist,
    pub running: bool,
    pub view: View,
    pub accent: Color,
    pub status: Option<String>,

    pub watchlist_state: ListState,

    pub search_query: String,
    pub search_results: Vec<SearchHit>,
    pub search_state: ListState,
    pub search_loading: bool,
    pub search_performed: bool,

    pub detail: DetailDialogState,
    pub confirm_remove: ConfirmRemoveState,

    pub msg_tx: mpsc::UnboundedSender<AppMessage>,
    pub msg_rx: mpsc::UnboundedReceiver<AppMessage>,

    pub provider: Option<Arc<dyn MetadataProvider + Send + Sync>>,
}

impl App {
    pub fn new(config: Config, watchlist: Watchlist) -> Self {
        let accent = widgets::parse_accent_color(&config.ui.accent_color);

        let mut watchlist_state = ListState::default();
        if !watchlist.is_empty() {
            watchlist_state.select(Some(0));
        }

        let (msg_tx, msg_rx) = mpsc::unbounded_channel();

        let provider: Option<Arc<dyn MetadataProvider + Send + Sync>> =
            if !config.api.omdb_api_key.is_empty() {
                Some(Arc::new(OmdbClient::new(config.api.omdb_api_key.clone())))
            } else {
                None
            };

        Self {
            config,
            watchlist,
            running: true,
            view: View::Watchlist,
            accent,
            status: None,

            watchlist_state,

            search_query: String::new(),
            search_results: Vec::new(),
            search_state: ListState::default(),
            search_loading: false,
            search_performed: false,

            detail: DetailDialogState::default(),
            confirm_remove: ConfirmRemoveState::default(),

            msg_tx,
            msg_rx,

            provider,
        }
    }

    pub async fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_events()?;
            self.process_messages();
        }
        Ok(())
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    fn persist(&mut self) {
        if let Err(e) = self.watchlist.save() {
            error!(error = %e, "Failed to save watchlist");
            self.set_status("Failed to save watchlist (see log)");
        }
    }

    fn process_messages(&mut self) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            match msg {
                AppMessage::SearchResults(results) => {
                    self.search_loading = false;
                    self.search_performed = true;
                    self.search_results = results;
                    self.search_state.select(if self.search_results.is_empty() {
                        None
                    } else {
                        Some(0)
                    });
                }
                AppMessage::DetailsFetched(None) => {
                    self.set_status("Unable to fetch details.");
                }
                AppMessage::DetailsFetched(Some(details)) => {
                    let title = details
                        .title
                        .clone()
                        .unwrap_or_else(|| "Unknown".to_string());

                    if self.watchlist.add_if_absent(*details) {
                        self.persist();
                        info!(title = %title, "Added to watchlist");
                        self.set_status(format!("{title} added to watchlist"));
                        if self.watchlist_state.selected().is_none() {
                            self.watchlist_state.select(Some(0));
                        }
                    } else {
                        self.set_status("Already in watchlist");
                    }
                }
            }
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(frame.area());

        let main_area = chunks[0];
        let bar_area = chunks[1];

        match self.view {
            View::Watchlist => {
                render_watchlist_view(
                    frame,
                    main_area,
                    &self.watchlist.entries,
                    &mut self.watchlist_state,
                    self.accent,
                );
                self.render_bar(
                    frame,
                    bar_area,
                    &[
                        ("/", "search"),
                        ("Enter", "view/rate"),
                        ("x", "remove"),
                        ("q", "quit"),
                    ],
                );
            }
            View::Search => {
                render_search_view(
                    frame,
                    main_area,
                    &self.search_query,
                    &self.search_results,
                    &mut self.search_state,
                    self.search_loading,
                    self.search_performed,
                    self.accent,
                );
                self.render_bar(
                    frame,
                    bar_area,
                    &[("Enter", "search/add"), ("↑/↓", "select"), ("Esc", "back")],
                );
            }
            View::Detail => {
                render_watchlist_view(
                    frame,
                    main_area,
                    &self.watchlist.entries,
                    &mut self.watchlist_state,
                    self.accent,
                );
                self.render_detail_dialog(frame);

                let hints: &[(&str, &str)] = match self.detail.focus {
                    DetailFocus::EpisodeCount => &[
                        ("Enter", "create inputs"),
                        ("Tab", "next field"),
                        ("Esc", "discard"),
                    ],
                    DetailFocus::SeriesFlag => &[
                        ("y/n", "series?"),
                        ("Enter", "save"),
                        ("Tab", "next field"),
                        ("Esc", "discard"),
                    ],
                    _ => &[("Enter", "save"), ("Tab", "next field"), ("Esc", "discard")],
                };
                self.render_bar(frame, bar_area, hints);
            }
            View::ConfirmRemove => {
                render_watchlist_view(
                    frame,
                    main_area,
                    &self.watchlist.entries,
                    &mut self.watchlist_state,
                    self.accent,
                );
                self.render_confirm_remove(frame);
                self.render_bar(frame, bar_area, &[("Enter", "remove"), ("Esc", "cancel")]);
            }
        }
    }

    fn render_bar(&self, frame: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
        if let Some(status) = &self.status {
            frame.render_widget(
                Paragraph::new(format!(" {status}")).style(Style::default().fg(Color::Yellow)),
                area,
            );
        } else {
            frame.render_widget(widgets::help_bar(hints), area);
        }
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    return Ok(());
                }
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    self.running = false;
                    return Ok(());
                }

                // Any keypress dismisses the previous status message.
                self.status = None;

                match self.view {
                    View::Watchlist => self.handle_watchlist_input(key.code),
                    View::Search => self.handle_search_input(key),
                    View::Detail => self.handle_detail_input(key),
                    View::ConfirmRemove => self.handle_confirm_remove_input(key.code),
                }
            }
        }
        Ok(())
    }

    fn handle_watchlist_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => {
                self.running = false;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection_down();
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection_up();
            }
            KeyCode::Enter => {
                self.open_detail();
            }
            KeyCode::Char('x') => {
                self.open_confirm_remove();
            }
            KeyCode::Char('/') => {
                self.view = View::Search;
                self.search_query.clear();
                self.search_results.clear();
                self.search_performed = false;
                self.search_state.select(None);
            }
            _ => {}
        }
    }

    fn handle_search_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.view = View::Watchlist;
            }
            KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.move_selection_down();
            }
            KeyCode::Up => {
                self.move_selection_up();
            }
            KeyCode::Backspace => {
                self.search_query.pop();
            }
            KeyCode::Enter => {
                if self.search_results.is_empty() {
                    self.perform_search();
                } else {
                    self.add_selected_result();
                }
            }
            KeyCode::Char(c) => {
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                {
                    self.search_query.push(c);
                }
            }
            _ => {}
        }
    }

    fn handle_detail_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                // Unsaved edits are dropped with the dialog state.
                self.view = View::Watchlist;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.detail.focus_next();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.detail.focus_prev();
            }
            KeyCode::Enter => {
                if self.detail.focus == DetailFocus::EpisodeCount {
                    self.create_episode_inputs();
                } else {
                    self.save_detail();
                }
            }
            KeyCode::Backspace => {
                if let Some(input) = self.detail.focused_input() {
                    input.pop();
                }
            }
            KeyCode::Char(c) => match self.detail.focus {
                DetailFocus::SeriesFlag => match c {
                    'y' => self.detail.set_series(true),
                    'n' => self.detail.set_series(false),
                    ' ' => {
                        let flipped = !self.detail.is_series;
                        self.detail.set_series(flipped);
                    }
                    _ => {}
                },
                DetailFocus::EpisodeCount => {
                    if c.is_ascii_digit() {
                        self.detail.count_input.push(c);
                    }
                }
                DetailFocus::Overall | DetailFocus::Row(_) => {
                    if c.is_ascii_digit() || c == '.' {
                        if let Some(input) = self.detail.focused_input() {
                            input.push(c);
                        }
                    }
                }
            },
            _ => {}
        }
    }

    fn handle_confirm_remove_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.view = View::Watchlist;
            }
            KeyCode::Enter => {
                let index = self.confirm_remove.index;
                if self.watchlist.remove_at(index) {
                    self.persist();
                    info!(title = %self.confirm_remove.title, "Removed from watchlist");
                    self.watchlist_state.select(None);
                }
                self.view = View::Watchlist;
            }
            _ => {}
        }
    }

    fn move_selection_down(&mut self) {
        let (state, len) = match self.view {
            View::Search => (&mut self.search_state, self.search_results.len()),
            _ => (&mut self.watchlist_state, self.watchlist.len()),
        };
        if len == 0 {
            return;
        }
        let next = match state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(i) => i,
            None => 0,
        };
        state.select(Some(next));
    }

    fn move_selection_up(&mut self) {
        let (state, len) = match self.view {
            View::Search => (&mut self.search_state, self.search_results.len()),
            _ => (&mut self.watchlist_state, self.watchlist.len()),
        };
        if len == 0 {
            return;
        }
        let next = state.selected().map(|i| i.saturating_sub(1)).unwrap_or(0);
        state.select(Some(next));
    }

    fn perform_search(&mut self) {
        if self.search_loading {
            return;
        }
        if self.search_query.trim().is_empty() {
            self.set_status("Type something to search");
            return;
        }
        let Some(provider) = self.provider.clone() else {
            self.set_status("OMDb API key not configured (set api.omdb_api_key in config.toml)");
            return;
        };

        self.search_loading = true;
        self.search_performed = false;
        self.search_results.clear();
        self.search_state.select(None);

        let query = self.search_query.clone();
        let tx = self.msg_tx.clone();

        tokio::spawn(async move {
            let hits = provider.search(&query).await;
            let _ = tx.send(AppMessage::SearchResults(hits));
        });
    }

    fn add_selected_result(&mut self) {
        let Some(idx) = self.search_state.selected() else {
            return;
        };
        let Some(hit) = self.search_results.get(idx) else {
            return;
        };
        let Some(provider) = self.provider.clone() else {
            self.set_status("OMDb API key not configured (set api.omdb_api_key in config.toml)");
            return;
        };

        let imdb_id = hit.imdb_id.clone();
        let tx = self.msg_tx.clone();

        info!(imdb_id = %imdb_id, title = %hit.title, "Fetching details to add");

        tokio::spawn(async move {
            let details = provider.details(&imdb_id).await;
            let _ = tx.send(AppMessage::DetailsFetched(details.map(Box::new)));
        });
    }

    fn open_detail(&mut self) {
        let Some(idx) = self.watchlist_state.selected() else {
            return;
        };
        let Some(entry) = self.watchlist.get(idx) else {
            return;
        };
        self.detail = DetailDialogState::open(idx, entry);
        self.view = View::Detail;
    }

    fn create_episode_inputs(&mut self) {
        let idx = self.detail.entry_idx;
        let Some(entry) = self.watchlist.get_mut(idx) else {
            return;
        };
        self.detail.create_rows(entry);
    }

    fn save_detail(&mut self) {
        let overall = self.detail.parsed_overall();
        let episodes = self.detail.collected_ratings();

        if self.watchlist.update_ratings(self.detail.entry_idx, overall, episodes) {
            self.persist();
        }
        self.view = View::Watchlist;
    }

    fn open_confirm_remove(&mut self) {
        if let Some(idx) = self.watchlist_state.selected() {
            if let Some(entry) = self.watchlist.get(idx) {
                self.confirm_remove = ConfirmRemoveState {
                    index: idx,
                    title: entry.title.clone(),
                };
                self.view = View::ConfirmRemove;
            }
        }
    }

    fn render_confirm_remove(&self, frame: &mut Frame) {
        let area = frame.area();
        let dialog_area = Rect {
            x: area.width.saturating_sub(50) / 2,
            y: area.height.saturating_sub(5) / 2,
            width: 50.min(area.width),
            height: 5.min(area.height),
        };

        frame.render_widget(Clear, dialog_area);

        let block = widgets::titled_block("Remove", self.accent);
        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let text = vec![
            Line::from(format!("Remove \"{}\" from your watchlist?", self.confirm_remove.title)),
            Line::from(Span::styled(
                "Enter to confirm, Esc to cancel",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        frame.render_widget(Paragraph::new(text), inner);
    }

    fn render_detail_dialog(&self, frame: &mut Frame) {
        let Some(entry) = self.watchlist.get(self.detail.entry_idx) else {
            return;
        };

        let area = frame.area();
        let width = 64.min(area.width.saturating_sub(2));
        // Header lines + rows + borders, capped by the screen.
        let wanted = (10 + self.detail.rows.len()).min(u16::MAX as usize) as u16;
        let height = area.height.saturating_sub(2).min(wanted);
        let dialog_area = Rect {
            x: area.width.saturating_sub(width) / 2,
            y: area.height.saturating_sub(height) / 2,
            width,
            height,
        };

        frame.render_widget(Clear, dialog_area);

        let block = widgets::titled_block(&entry.title, self.accent);
        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let focused = |field: DetailFocus| self.detail.focus == field;
        let input_style = |active: bool| {
            if active {
                Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            }
        };
        let marker = |active: bool| Span::raw(if active { "▶ " } else { "  " });

        let mut lines: Vec<Line> = vec![
            Line::from(vec![
                Span::styled("Year: ", Style::default().fg(Color::DarkGray)),
                Span::raw(entry.year.clone()),
                Span::styled("   IMDb: ", Style::default().fg(Color::DarkGray)),
                Span::styled(entry.imdb_rating.clone(), Style::default().fg(Color::Yellow)),
                Span::styled("   Your avg: ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    widgets::format_average(entry.user_average()),
                    Style::default().fg(Color::Green),
                ),
            ]),
            Line::from(Span::styled(
                entry.poster_url.clone(),
                Style::default().fg(Color::DarkGray),
            )),
            Line::raw(""),
            Line::from(vec![
                marker(focused(DetailFocus::Overall)),
                Span::raw("Overall rating (0-10): "),
                Span::styled(
                    format!("[{}]", self.detail.overall_input),
                    input_style(focused(DetailFocus::Overall)),
                ),
            ]),
            Line::from(vec![
                marker(focused(DetailFocus::SeriesFlag)),
                Span::raw("Series: "),
                Span::styled(
                    if self.detail.is_series { "[Yes]" } else { "[No]" },
                    input_style(focused(DetailFocus::SeriesFlag)),
                ),
            ]),
        ];

        if self.detail.is_series {
            lines.push(Line::from(vec![
                marker(focused(DetailFocus::EpisodeCount)),
                Span::raw("Number of episodes: "),
                Span::styled(
                    format!("[{}]", self.detail.count_input),
                    input_style(focused(DetailFocus::EpisodeCount)),
                ),
                Span::styled(
                    "  (Enter creates inputs)",
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
        }

        if let Some(notice) = &self.detail.notice {
            lines.push(Line::from(Span::styled(
                notice.clone(),
                Style::default().fg(Color::Red),
            )));
        }

        if !self.detail.rows.is_empty() {
            lines.push(Line::raw(""));

            // Keep the focused row inside the space left under the header.
            let header_len = lines.len();
            let visible = (inner.height as usize).saturating_sub(header_len).max(1);
            let focused_row = match self.detail.focus {
                DetailFocus::Row(i) => i,
                _ => 0,
            };
            let start = focused_row.saturating_sub(visible.saturating_sub(1));

            for (i, row) in self.detail.rows.iter().enumerate().skip(start).take(visible) {
                let active = focused(DetailFocus::Row(i));
                lines.push(Line::from(vec![
                    marker(active),
                    Span::styled(
                        format!("Episode {:02}: ", row.number),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(format!("[{}]", row.input), input_style(active)),
                ]));
            }
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

pub fn init_terminal() -> io::Result<DefaultTerminal> {
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
    Ok(ratatui::init())
}

pub fn restore_terminal() -> io::Result<()> {
    ratatui::restore();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(media_type: &str) -> Entry {
        Entry::from_details(TitleDetails {
            title: Some("Heat".to_string()),
            year: Some("1995".to_string()),
            media_type: Some(media_type.to_string()),
            poster: None,
            imdb_id: "tt0113277".to_string(),
            imdb_rating: Some("8.3".to_string()),
        })
    }

    #[test]
    fn opens_as_movie_by_default() {
        let dialog = DetailDialogState::open(0, &entry("movie"));
        assert!(!dialog.is_series);
        assert!(dialog.rows.is_empty());
        assert_eq!(dialog.count_input, "");
        assert_eq!(dialog.focus, DetailFocus::Overall);
    }

    #[test]
    fn opens_as_series_when_the_type_says_so() {
        let dialog = DetailDialogState::open(0, &entry("series"));
        assert!(dialog.is_series);
        assert!(dialog.rows.is_empty());
    }

    #[test]
    fn opens_as_series_when_a_count_was_stored() {
        let mut e = entry("movie");
        e.total_episodes = Some(3);
        e.episode_ratings.insert(2, 7.5);

        let dialog = DetailDialogState::open(0, &e);
        assert!(dialog.is_series);
        assert_eq!(dialog.count_input, "3");
        assert_eq!(dialog.rows.len(), 3);
        assert_eq!(dialog.rows[1].input, "7.5");
        assert_eq!(dialog.rows[0].input, "");
    }

    #[test]
    fn seeds_the_overall_input_from_the_entry() {
        let mut e = entry("movie");
        e.user_overall = Some(9.5);
        let dialog = DetailDialogState::open(0, &e);
        assert_eq!(dialog.overall_input, "9.5");
    }

    #[test]
    fn toggling_series_off_discards_rows() {
        let mut e = entry("series");
        e.total_episodes = Some(2);
        let mut dialog = DetailDialogState::open(0, &e);
        assert_eq!(dialog.rows.len(), 2);

        dialog.set_series(false);
        assert!(dialog.rows.is_empty());
        assert!(!dialog.is_series);
    }

    #[test]
    fn rejects_a_bad_episode_count_without_touching_the_entry() {
        let mut e = entry("series");
        let mut dialog = DetailDialogState::open(0, &e);

        for bad in ["", "0", "abc", "-3"] {
            dialog.count_input = bad.to_string();
            dialog.create_rows(&mut e);
            assert!(dialog.notice.is_some(), "count {bad:?} should be rejected");
            assert_eq!(e.total_episodes, None);
            assert!(dialog.rows.is_empty());
        }
    }

    #[test]
    fn a_valid_count_writes_through_before_any_save() {
        let mut e = entry("series");
        e.episode_ratings.insert(1, 8.0);
        e.episode_ratings.insert(5, 6.0);

        let mut dialog = DetailDialogState::open(0, &e);
        dialog.count_input = "3".to_string();
        dialog.create_rows(&mut e);

        assert_eq!(dialog.notice, None);
        assert_eq!(e.total_episodes, Some(3));
        assert_eq!(dialog.rows.len(), 3);
        // Stored ratings inside the new count are preserved in the rows.
        assert_eq!(dialog.rows[0].input, "8");
        assert_eq!(dialog.rows[1].input, "");
        assert_eq!(dialog.rows[2].input, "");
        assert_eq!(dialog.focus, DetailFocus::Row(0));
    }

    #[test]
    fn collected_ratings_skip_blank_and_unparseable_rows() {
        fn row(number: u32, input: &str) -> EpisodeRow {
            EpisodeRow {
                number,
                input: input.to_string(),
            }
        }

        let dialog = DetailDialogState {
            rows: vec![row(1, "9"), row(2, ""), row(3, ".."), row(4, "7.5"), row(5, "42")],
            ..Default::default()
        };

        let ratings = dialog.collected_ratings();
        assert_eq!(ratings, BTreeMap::from([(1, 9.0), (4, 7.5)]));
    }

    #[test]
    fn rating_parse_enforces_the_range() {
        assert_eq!(parse_rating("7.5"), Some(7.5));
        assert_eq!(parse_rating(" 10 "), Some(10.0));
        assert_eq!(parse_rating("0"), Some(0.0));
        assert_eq!(parse_rating(""), None);
        assert_eq!(parse_rating("11"), None);
        assert_eq!(parse_rating("-1"), None);
        assert_eq!(parse_rating("nine"), None);
    }

    #[test]
    fn focus_cycles_through_visible_fields_only() {
        // Movie: overall <-> series flag.
        let mut dialog = DetailDialogState::open(0, &entry("movie"));
        dialog.focus_next();
        assert_eq!(dialog.focus, DetailFocus::SeriesFlag);
        dialog.focus_next();
        assert_eq!(dialog.focus, DetailFocus::Overall);

        // Series with rows: overall -> flag -> count -> rows -> overall.
        let mut e = entry("series");
        e.total_episodes = Some(2);
        let mut dialog = DetailDialogState::open(0, &e);
        dialog.focus_next();
        dialog.focus_next();
        assert_eq!(dialog.focus, DetailFocus::EpisodeCount);
        dialog.focus_next();
        assert_eq!(dialog.focus, DetailFocus::Row(0));
        dialog.focus_next();
        assert_eq!(dialog.focus, DetailFocus::Row(1));
        dialog.focus_next();
        assert_eq!(dialog.focus, DetailFocus::Overall);
        dialog.focus_prev();
        assert_eq!(dialog.focus, DetailFocus::Row(1));
    }
}
