//! Reusable components

mod filter_panel;
mod nav;
mod records_table;
mod site_map;
mod site_popup;
mod summary_cards;
mod trend_chart;

pub use filter_panel::FilterPanel;
pub use nav::Nav;
pub use records_table::RecordsTable;
pub use site_map::SiteMap;
pub use site_popup::SitePopup;
pub use summary_cards::{StatCard, SummaryCards};
pub use trend_chart::TrendChart;
