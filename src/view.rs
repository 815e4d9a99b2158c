//! View model derived from the settings and link collection.
//!
//! The view is rebuilt from scratch after every mutation and shells redraw
//! both link lists from it wholesale.

use crate::links::LinkCollection;
use crate::settings::{SearchError, Settings, Theme};

/// A link in the public grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridTile {
    pub name: String,
    pub href: String,
    pub icon_url: String,
}

/// A link in the management list, keyed by its position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManageRow {
    pub position: usize,
    pub name: String,
    pub icon_url: String,
}

/// Values driving the page chrome
#[derive(Debug, Clone, PartialEq)]
pub struct Appearance {
    pub theme: Theme,
    pub search_engine: String,
    pub search_placeholder: String,
    pub background_url: String,
    pub blur: f64,
    pub opacity: f64,
}

/// Full snapshot handed to the shell after each change.
///
/// `generation` identifies the link order the positions refer to. Reorder
/// and delete requests must hand it back to the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub generation: u64,
    pub appearance: Appearance,
    pub grid: Vec<GridTile>,
    pub manage_list: Vec<ManageRow>,
}

impl PageView {
    pub fn build(
        settings: &Settings,
        links: &LinkCollection,
        favicon_service: &str,
        generation: u64,
    ) -> Result<Self, SearchError> {
        let appearance = Appearance {
            theme: settings.theme,
            search_engine: settings.search_engine.clone(),
            search_placeholder: settings.search_placeholder()?,
            background_url: settings.background_url.clone(),
            blur: settings.blur,
            opacity: settings.opacity,
        };

        let mut grid = Vec::with_capacity(links.len());
        let mut manage_list = Vec::with_capacity(links.len());
        for (position, link) in links.iter().enumerate() {
            let icon_url = link.icon_url(favicon_service);
            grid.push(GridTile {
                name: link.name.clone(),
                href: link.url.clone(),
                icon_url: icon_url.clone(),
            });
            manage_list.push(ManageRow {
                position,
                name: link.name.clone(),
                icon_url,
            });
        }

        Ok(Self {
            generation,
            appearance,
            grid,
            manage_list,
        })
    }
}
