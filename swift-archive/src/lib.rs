pub mod cli;
pub mod load_config;
pub mod swift;

pub use cli::{run, Cli};
