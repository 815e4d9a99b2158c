//! The start page controller: single owner of settings, links and storage.

use crate::links::LinkCollection;
use crate::settings::{SearchError, SettingChange, Settings};
use crate::storage::Persistence;
use crate::view::PageView;
use url::Url;

/// Error type for link actions issued from a rendered view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkActionError {
    /// The view the positions came from has been superseded
    StaleView { view: u64, current: u64 },
    OutOfRange { position: usize, len: usize },
}

impl std::fmt::Display for LinkActionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkActionError::StaleView { view, current } => {
                write!(f, "Stale view generation {} (current {})", view, current)
            }
            LinkActionError::OutOfRange { position, len } => {
                write!(f, "Position {} out of range ({} links)", position, len)
            }
        }
    }
}

impl std::error::Error for LinkActionError {}

/// A delete waiting for the user's confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    generation: u64,
    position: usize,
    name: String,
}

impl PendingDelete {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text shown by the confirmation prompt
    pub fn message(&self) -> String {
        format!("Delete \"{}\"?", self.name)
    }
}

type RenderHandler = Box<dyn Fn(&PageView)>;

pub struct StartPage {
    settings: Settings,
    links: LinkCollection,
    persistence: Persistence,
    favicon_service: String,
    generation: u64,
    render_handler: Option<RenderHandler>,
}

impl std::fmt::Debug for StartPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StartPage")
            .field("settings", &self.settings)
            .field("links", &self.links.len())
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl StartPage {
    /// Build the page state from storage (defaults where records are missing)
    pub fn load(persistence: Persistence, favicon_service: &str) -> Self {
        let settings = persistence.load_settings();
        let links = persistence.load_links();
        log::info!(
            "Loaded {} links, theme '{}', search engine '{}'",
            links.len(),
            settings.theme.as_str(),
            settings.search_engine
        );

        Self {
            settings,
            links,
            persistence,
            favicon_service: favicon_service.to_string(),
            generation: 0,
            render_handler: None,
        }
    }

    /// Register the callback receiving a fresh view after every change
    pub fn connect_render<F>(&mut self, handler: F)
    where
        F: Fn(&PageView) + 'static,
    {
        self.render_handler = Some(Box::new(handler));
    }

    /// Build the current view. Fails if the stored engine id is unknown.
    pub fn view(&self) -> Result<PageView, SearchError> {
        PageView::build(
            &self.settings,
            &self.links,
            &self.favicon_service,
            self.generation,
        )
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn links(&self) -> &LinkCollection {
        &self.links
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn persistence(&self) -> &Persistence {
        &self.persistence
    }

    /// Add a link from form input. Returns `false` if the input was rejected.
    pub fn add_link(&mut self, name: &str, url: &str, icon: Option<&str>) -> bool {
        if !self.links.append(name, url, icon) {
            log::debug!("Ignoring link with empty name or url");
            return false;
        }

        log::info!("Added link '{}'", name.trim());
        self.links_changed();
        true
    }

    /// Validate a delete request against the view it came from
    pub fn prepare_delete(
        &self,
        generation: u64,
        position: usize,
    ) -> Result<PendingDelete, LinkActionError> {
        self.check_position(generation, position)?;
        let name = self
            .links
            .get(position)
            .map(|link| link.name.clone())
            .unwrap_or_default();

        Ok(PendingDelete {
            generation,
            position,
            name,
        })
    }

    /// Carry out a confirmed delete
    pub fn confirm_delete(&mut self, pending: PendingDelete) -> Result<(), LinkActionError> {
        self.check_position(pending.generation, pending.position)?;
        let removed = self.links.delete_at(pending.position);
        log::info!("Deleted link '{}'", removed.name);
        self.links_changed();
        Ok(())
    }

    /// Apply a drag reorder reported against the view `generation`
    pub fn move_link(
        &mut self,
        generation: u64,
        from: usize,
        to: usize,
    ) -> Result<(), LinkActionError> {
        self.check_position(generation, from)?;
        self.check_position(generation, to)?;
        if from == to {
            return Ok(());
        }

        self.links.move_to(from, to);
        log::debug!("Moved link {} -> {}", from, to);
        self.links_changed();
        Ok(())
    }

    /// Apply a settings change and persist the whole record
    pub fn update_setting(&mut self, change: SettingChange) -> Result<(), SearchError> {
        self.apply_setting(change)?;
        if let Err(e) = self.persistence.save_settings(&self.settings) {
            log::warn!("Failed to save settings: {}", e);
        }
        self.sync();
        Ok(())
    }

    /// Apply a settings change to the view only (slider drags)
    pub fn preview_setting(&mut self, change: SettingChange) -> Result<(), SearchError> {
        self.apply_setting(change)?;
        self.sync();
        Ok(())
    }

    /// Navigation target for a search, `None` for a blank query
    pub fn search_url(&self, query: &str) -> Result<Option<Url>, SearchError> {
        self.settings.search_url(query)
    }

    fn apply_setting(&mut self, change: SettingChange) -> Result<(), SearchError> {
        if let SettingChange::SearchEngine(id) = &change {
            if crate::config::search_engine(id).is_none() {
                return Err(SearchError::UnknownEngine(id.clone()));
            }
        }
        self.settings.apply(change);
        Ok(())
    }

    fn check_position(&self, generation: u64, position: usize) -> Result<(), LinkActionError> {
        if generation != self.generation {
            return Err(LinkActionError::StaleView {
                view: generation,
                current: self.generation,
            });
        }
        if position >= self.links.len() {
            return Err(LinkActionError::OutOfRange {
                position,
                len: self.links.len(),
            });
        }
        Ok(())
    }

    fn links_changed(&mut self) {
        self.generation += 1;
        if let Err(e) = self.persistence.save_links(&self.links) {
            log::warn!("Failed to save links: {}", e);
        }
        self.sync();
    }

    fn sync(&self) {
        let Some(handler) = &self.render_handler else {
            return;
        };

        match self.view() {
            Ok(view) => handler(&view),
            Err(e) => log::error!("Cannot render start page: {}", e),
        }
    }
}
