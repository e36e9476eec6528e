//! Command-line interface module.

mod args;
pub mod authors;
pub mod doctor;
pub mod render;
pub mod serve;

pub use args::{Cli, Commands, RenderArgs};
