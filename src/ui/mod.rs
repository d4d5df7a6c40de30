pub mod search;
pub mod watchlist;
pub mod widgets;

pub use search::render_search_view;
pub use watchlist::render_watchlist_view;
