pub mod buttondown;
pub mod cli;
pub mod core;
pub mod mcp;
