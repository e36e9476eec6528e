//! Process-wide state shared across commands.

mod state;

pub use state::{init, is_shutdown, register_server};
