//! End-to-end tag lifecycle through the public facade

#[path = "../common/mod.rs"]
mod common;

mod discovery;
mod read_path;
mod write_path;
