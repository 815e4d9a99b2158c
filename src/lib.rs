//! A GNOME start page: clock, greeting, weather, search and quick links.
//!
//! The core (links, settings, storage, view model) has no GTK dependency.
//! The desktop shell lives behind the `gui` feature.

pub mod config;
pub mod confirm;
pub mod icon_cache;
pub mod links;
pub mod page;
pub mod settings;
pub mod storage;
pub mod style;
pub mod view;
pub mod widgets;

#[cfg(feature = "gui")]
pub mod application;
#[cfg(feature = "gui")]
pub mod confirm_dialog;
#[cfg(feature = "gui")]
pub mod fetch;
#[cfg(feature = "gui")]
pub mod window;
