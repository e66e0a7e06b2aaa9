//! GUI module - User interface components

mod app;
mod control_panel;
mod views;

pub use app::FacultyScopeApp;
pub use control_panel::{ControlPanel, ControlPanelAction, View};
