//! Dashboard pages

mod collector;
mod dashboard;
mod home;

pub use collector::Collector;
pub use dashboard::Dashboard;
pub use home::Home;
