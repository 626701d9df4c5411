pub mod app;
pub mod camera;
pub mod config;
pub mod constants;
pub mod controls;
pub mod engine;
pub mod entities;
pub mod error;
pub mod host;
pub mod inventory;
pub mod miniapp;
pub mod player;
pub mod rendering;
pub mod shop;
pub mod storage;
pub mod terminal_io;
#[cfg(test)]
pub(crate) mod test_support;
pub mod types;
pub mod ui;
