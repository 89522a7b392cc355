//! Tool management for the project's package manager

pub mod tool;

pub use tool::{bun_tool, ToolConfig, ToolManager};
