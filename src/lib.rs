pub mod app;
pub mod components;
pub mod config;
pub mod game;
pub mod menu_types;
pub mod records;
pub mod sound;
pub mod systems;
pub mod ui;

#[cfg(test)]
mod tests;
