//! User interface components
//!
//! This module provides terminal-based UI components, including:
//! - Step position and transport indicators
//! - Real-time state inspection
//! - The front panel page editor
//!
//! The status display is built using the indicatif library for progress bars
//! and spinners; the front panel uses dialoguer prompts.

mod inspector;
mod panel;
mod progress;

pub use inspector::{run_state_inspector, status_line};
pub use panel::{page_label, run_front_panel, visible_pages};
pub use progress::{create_step_progress, create_transport_spinner};
