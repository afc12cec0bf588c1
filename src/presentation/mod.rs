//! Presentation layer: terminal rendering and the line-driven editor
//!
//! Owns view-only state (expanded/collapsed flags) and talks to the
//! application layer exclusively through `CostDocument`.

pub mod command;
pub mod session;
pub mod view;

pub use command::{Command, CommandError};
pub use session::{Flow, LineReader, Session};
pub use view::{render, render_breakdown, render_summary, Controls, NodeRow, ViewState};
