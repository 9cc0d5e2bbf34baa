#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod config;
pub mod debounce;
pub mod error;
pub mod nexus;
pub mod runner;
pub mod tabs;
pub mod widgets;
pub mod yaml_doc;

pub use app::SasDesk;
