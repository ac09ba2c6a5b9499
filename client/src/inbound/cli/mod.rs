//! Command-line presentation: argument parsing and text rendering.

mod args;
mod render;

pub use args::{AwardsCommand, CliArgs, CliCommand};
pub use render::{render_action, render_awards, render_goal, render_reward, render_tab_label};
