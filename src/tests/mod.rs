#![warn(clippy::all, clippy::pedantic)]

mod components_tests;
mod config_loader_tests;
mod records_tests;
