//! GUI module - User interface components

mod app;
mod nav;
mod nav_panel;
mod view_panel;

pub use app::InsightsApp;
pub use nav::{HomeView, Nav};
pub use nav_panel::{NavAction, NavPanel};
pub use view_panel::{ViewContent, ViewPanel};
