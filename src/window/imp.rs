use super::layout::{self, Widgets};
use crate::config::{self, WeatherLocation};
use crate::confirm::ConfirmationGate;
use crate::confirm_dialog::DialogPrompt;
use crate::fetch;
use crate::icon_cache::{IconCache, IconLookup};
use crate::page::StartPage;
use crate::settings::{SearchError, SettingChange, Theme};
use crate::style;
use crate::view::{Appearance, PageView};
use crate::widgets::{self, WeatherStatus};
use gtk4::prelude::*;
use gtk4::subclass::prelude::*;
use libadwaita::prelude::*;
use libadwaita::subclass::prelude::*;
use std::cell::{Cell, OnceCell, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// Delay before a slider value is written to storage
const SLIDER_COMMIT_DELAY: Duration = Duration::from_millis(400);

#[derive(Default)]
pub struct StartPageWindow {
    pub widgets: OnceCell<Widgets>,
    pub page: OnceCell<Rc<RefCell<StartPage>>>,
    pub gate: OnceCell<Rc<ConfirmationGate<DialogPrompt>>>,
    pub style_provider: OnceCell<gtk4::CssProvider>,

    // Link icons by URL, with images waiting on running downloads
    pub icon_cache: Rc<RefCell<IconCache<gdk4::Texture, glib::WeakRef<gtk4::Image>>>>,
    pub background_url: RefCell<String>,

    // Set while render() pushes values into the controls
    pub syncing_controls: Cell<bool>,

    // Pending slider commit (Rc for sharing in closures)
    pub slider_commit: Rc<RefCell<Option<glib::SourceId>>>,

    pub entrance_animations: RefCell<Vec<libadwaita::TimedAnimation>>,
}

#[glib::object_subclass]
impl ObjectSubclass for StartPageWindow {
    const NAME: &'static str = "StartPageWindow";
    type Type = super::StartPageWindow;
    type ParentType = libadwaita::ApplicationWindow;
}

impl ObjectImpl for StartPageWindow {
    fn constructed(&self) {
        self.parent_constructed();

        let obj = self.obj();
        obj.set_title(Some(config::APP_NAME));
        obj.set_default_size(1100, 760);

        let widgets = Widgets::build();
        obj.set_content(Some(&widgets.root));

        widgets
            .settings_button
            .bind_property("active", &widgets.settings_revealer, "reveal-child")
            .sync_create()
            .build();

        let provider = gtk4::CssProvider::new();
        gtk4::style_context_add_provider_for_display(
            &obj.display(),
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );

        let _ = self.style_provider.set(provider);
        let _ = self.widgets.set(widgets);
    }
}

impl StartPageWindow {
    fn widgets(&self) -> &Widgets {
        self.widgets
            .get()
            .expect("widgets are built in constructed()")
    }

    /// Wire the window to the page state and show the first render
    pub fn attach(&self, page: Rc<RefCell<StartPage>>, weather: Option<WeatherLocation>) {
        let obj = self.obj();

        // Confirmation gate answered through the alert dialog
        let gate = Rc::new(ConfirmationGate::new(DialogPrompt::new(&*obj)));
        let gate_weak = Rc::downgrade(&gate);
        gate.prompt().connect_answer(move |confirmed| {
            if let Some(gate) = gate_weak.upgrade() {
                gate.resolve(confirmed);
            }
        });
        let _ = self.gate.set(gate);

        // Full redraw after every change
        let obj_weak = obj.downgrade();
        page.borrow_mut().connect_render(move |view| {
            if let Some(obj) = obj_weak.upgrade() {
                obj.imp().render(view);
            }
        });

        let initial = page.borrow().view();
        if self.page.set(page).is_err() {
            log::warn!("Window already attached to a start page");
            return;
        }

        match initial {
            Ok(view) => self.render(&view),
            Err(e) => {
                self.fatal(&e);
                return;
            }
        }

        self.connect_signals();
        self.start_clock();
        self.load_weather(weather);
        self.animate_entrance();
    }

    fn connect_signals(&self) {
        let obj = self.obj();
        let w = self.widgets();

        // Search
        let obj_weak = obj.downgrade();
        w.search_entry.connect_activate(move |entry| {
            if let Some(obj) = obj_weak.upgrade() {
                obj.imp().search(&entry.text());
            }
        });

        // Theme
        for (button, theme) in [(&w.dark_button, Theme::Dark), (&w.light_button, Theme::Light)] {
            let obj_weak = obj.downgrade();
            button.connect_toggled(move |button| {
                if !button.is_active() {
                    return;
                }
                if let Some(obj) = obj_weak.upgrade() {
                    obj.imp().update_setting(SettingChange::Theme(theme));
                }
            });
        }

        // Search engine
        let obj_weak = obj.downgrade();
        w.engine_dropdown.connect_selected_notify(move |dropdown| {
            let Some(engine) = config::SEARCH_ENGINES.get(dropdown.selected() as usize) else {
                return;
            };
            if let Some(obj) = obj_weak.upgrade() {
                obj.imp()
                    .update_setting(SettingChange::SearchEngine(engine.id.to_string()));
            }
        });

        // Background image, committed on Enter and when focus leaves the entry
        let obj_weak = obj.downgrade();
        w.background_entry.connect_activate(move |entry| {
            if let Some(obj) = obj_weak.upgrade() {
                obj.imp().commit_background_url(entry.text().to_string());
            }
        });
        let focus_controller = gtk4::EventControllerFocus::new();
        let obj_weak = obj.downgrade();
        let entry_weak = w.background_entry.downgrade();
        focus_controller.connect_leave(move |_| {
            if let (Some(obj), Some(entry)) = (obj_weak.upgrade(), entry_weak.upgrade()) {
                obj.imp().commit_background_url(entry.text().to_string());
            }
        });
        w.background_entry.add_controller(focus_controller);

        // Blur and opacity preview live and are committed once the slider rests
        let obj_weak = obj.downgrade();
        w.blur_scale.connect_value_changed(move |scale| {
            if let Some(obj) = obj_weak.upgrade() {
                obj.imp().preview_slider(SettingChange::Blur(scale.value()));
            }
        });
        let obj_weak = obj.downgrade();
        w.opacity_scale.connect_value_changed(move |scale| {
            if let Some(obj) = obj_weak.upgrade() {
                obj.imp().preview_slider(SettingChange::Opacity(scale.value()));
            }
        });

        // Add link form
        let obj_weak = obj.downgrade();
        w.add_link_button.connect_clicked(move |_| {
            if let Some(obj) = obj_weak.upgrade() {
                obj.imp().add_link_from_form();
            }
        });
        for entry in [&w.link_name_entry, &w.link_url_entry, &w.link_icon_entry] {
            let obj_weak = obj.downgrade();
            entry.connect_activate(move |_| {
                if let Some(obj) = obj_weak.upgrade() {
                    obj.imp().add_link_from_form();
                }
            });
        }
    }

    /// Run `f` against the page unless a render is pushing values into controls
    fn with_page_mut<F>(&self, f: F)
    where
        F: FnOnce(&mut StartPage),
    {
        if self.syncing_controls.get() {
            return;
        }
        let Some(page) = self.page.get() else {
            return;
        };
        match page.try_borrow_mut() {
            Ok(mut page) => f(&mut page),
            Err(_) => log::warn!("Start page busy, dropping event"),
        }
    }

    fn update_setting(&self, change: SettingChange) {
        let mut result = Ok(());
        self.with_page_mut(|page| result = page.update_setting(change));
        if let Err(e) = result {
            self.fatal(&e);
        }
    }

    /// Save the background URL unless it is already the stored one
    fn commit_background_url(&self, url: String) {
        let change = SettingChange::BackgroundUrl(url);
        let mut result = Ok(());
        self.with_page_mut(|page| {
            if !page.settings().is_current(&change) {
                result = page.update_setting(change);
            }
        });
        if let Err(e) = result {
            self.fatal(&e);
        }
    }

    fn preview_slider(&self, change: SettingChange) {
        if self.syncing_controls.get() {
            return;
        }

        let mut result = Ok(());
        self.with_page_mut(|page| result = page.preview_setting(change.clone()));
        if let Err(e) = result {
            self.fatal(&e);
            return;
        }

        // Debounce the write
        if let Some(source_id) = self.slider_commit.borrow_mut().take() {
            source_id.remove();
        }
        let obj_weak = self.obj().downgrade();
        let pending = self.slider_commit.clone();
        let source_id = glib::timeout_add_local_once(SLIDER_COMMIT_DELAY, move || {
            pending.borrow_mut().take();
            if let Some(obj) = obj_weak.upgrade() {
                obj.imp().update_setting(change);
            }
        });
        *self.slider_commit.borrow_mut() = Some(source_id);
    }

    fn add_link_from_form(&self) {
        let w = self.widgets();
        let name = w.link_name_entry.text();
        let url = w.link_url_entry.text();
        let icon = w.link_icon_entry.text();

        let mut added = false;
        self.with_page_mut(|page| added = page.add_link(&name, &url, Some(icon.as_str())));

        // Rejected input stays in the form
        if added {
            w.link_name_entry.set_text("");
            w.link_url_entry.set_text("");
            w.link_icon_entry.set_text("");
            w.link_name_entry.grab_focus();
        }
    }

    fn request_delete(&self, generation: u64, position: usize) {
        let (Some(page), Some(gate)) = (self.page.get(), self.gate.get()) else {
            return;
        };

        let pending = match page.borrow().prepare_delete(generation, position) {
            Ok(pending) => pending,
            Err(e) => {
                log::warn!("Ignoring delete request: {}", e);
                return;
            }
        };

        let message = pending.message();
        let page = page.clone();
        let result = gate.request(&message, move |confirmed| {
            if !confirmed {
                log::debug!("Delete of '{}' cancelled", pending.name());
                return;
            }
            if let Err(e) = page.borrow_mut().confirm_delete(pending) {
                log::warn!("Delete not applied: {}", e);
            }
        });

        if let Err(e) = result {
            log::warn!("{}", e);
        }
    }

    fn move_link(&self, generation: u64, from: usize, to: usize) {
        self.with_page_mut(|page| {
            if let Err(e) = page.move_link(generation, from, to) {
                log::warn!("Ignoring reorder: {}", e);
            }
        });
    }

    fn search(&self, query: &str) {
        let Some(page) = self.page.get() else {
            return;
        };

        let result = page.borrow().search_url(query);
        match result {
            Ok(Some(url)) => self.open_uri(url.as_str()),
            Ok(None) => {}
            Err(e) => self.fatal(&e),
        }
    }

    fn open_uri(&self, uri: &str) {
        let launcher = gtk4::UriLauncher::new(uri);
        let uri = uri.to_string();
        launcher.launch(Some(&*self.obj()), gio::Cancellable::NONE, move |result| {
            if let Err(e) = result {
                log::warn!("Failed to open {}: {}", uri, e);
            }
        });
    }

    /// Settings that reference an unknown search engine are corrupt; give up
    fn fatal(&self, error: &SearchError) {
        log::error!("Start page settings are inconsistent: {}", error);
        if let Some(app) = self.obj().application() {
            app.quit();
        }
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    fn render(&self, view: &PageView) {
        self.syncing_controls.set(true);
        self.apply_appearance(&view.appearance);
        self.render_grid(view);
        self.render_manage_list(view);
        self.syncing_controls.set(false);
    }

    fn apply_appearance(&self, appearance: &Appearance) {
        let w = self.widgets();

        libadwaita::StyleManager::default().set_color_scheme(match appearance.theme {
            Theme::Dark => libadwaita::ColorScheme::ForceDark,
            Theme::Light => libadwaita::ColorScheme::ForceLight,
        });
        w.dark_button.set_active(appearance.theme == Theme::Dark);
        w.light_button.set_active(appearance.theme == Theme::Light);

        if let Some(provider) = self.style_provider.get() {
            provider.load_from_string(&style::page_css(appearance));
        }

        w.search_entry
            .set_placeholder_text(Some(&appearance.search_placeholder));
        if let Some(index) = config::SEARCH_ENGINES
            .iter()
            .position(|engine| engine.id == appearance.search_engine)
        {
            w.engine_dropdown.set_selected(index as u32);
        }

        if w.background_entry.text() != appearance.background_url {
            w.background_entry.set_text(&appearance.background_url);
        }
        if w.blur_scale.value() != appearance.blur {
            w.blur_scale.set_value(appearance.blur);
        }
        if w.opacity_scale.value() != appearance.opacity {
            w.opacity_scale.set_value(appearance.opacity);
        }

        if *self.background_url.borrow() != appearance.background_url {
            self.load_background(&appearance.background_url);
        }
    }

    fn load_background(&self, url: &str) {
        *self.background_url.borrow_mut() = url.to_string();
        let picture = self.widgets().background.clone();

        if url.is_empty() {
            picture.set_paintable(None::<&gdk4::Paintable>);
            return;
        }

        let obj_weak = self.obj().downgrade();
        let requested = url.to_string();
        fetch::fetch_texture(url, move |texture| {
            let Some(obj) = obj_weak.upgrade() else {
                return;
            };
            // A newer background may have been chosen meanwhile
            if *obj.imp().background_url.borrow() == requested {
                picture.set_paintable(texture.as_ref());
            }
        });
    }

    fn render_grid(&self, view: &PageView) {
        let grid = &self.widgets().links_grid;
        grid.remove_all();

        for tile in &view.grid {
            let (button, image) = layout::grid_tile(tile);
            let obj_weak = self.obj().downgrade();
            let href = tile.href.clone();
            button.connect_clicked(move |_| {
                if let Some(obj) = obj_weak.upgrade() {
                    obj.imp().open_uri(&href);
                }
            });
            self.load_icon(&image, &tile.icon_url);
            grid.append(&button);
        }
    }

    fn render_manage_list(&self, view: &PageView) {
        let list = &self.widgets().manage_list;
        list.remove_all();

        for row in &view.manage_list {
            let (list_row, image, delete_button) = layout::manage_row(row);
            let generation = view.generation;
            let position = row.position;

            let obj_weak = self.obj().downgrade();
            delete_button.connect_clicked(move |_| {
                if let Some(obj) = obj_weak.upgrade() {
                    obj.imp().request_delete(generation, position);
                }
            });

            // Drag handlers belong to this redraw's rows only
            self.attach_reorder(&list_row, generation, position);
            self.load_icon(&image, &row.icon_url);
            list.append(&list_row);
        }
    }

    fn attach_reorder(&self, row: &gtk4::ListBoxRow, generation: u64, position: usize) {
        let drag_source = gtk4::DragSource::new();
        drag_source.set_actions(gdk4::DragAction::MOVE);
        let content = gdk4::ContentProvider::for_value(&(position as u32).to_value());
        drag_source.set_content(Some(&content));
        row.add_controller(drag_source);

        let drop_target = gtk4::DropTarget::new(u32::static_type(), gdk4::DragAction::MOVE);

        let row_weak = row.downgrade();
        drop_target.connect_enter(move |_, _, _| {
            if let Some(row) = row_weak.upgrade() {
                row.add_css_class("drop-target");
            }
            gdk4::DragAction::MOVE
        });

        let row_weak = row.downgrade();
        drop_target.connect_leave(move |_| {
            if let Some(row) = row_weak.upgrade() {
                row.remove_css_class("drop-target");
            }
        });

        let obj_weak = self.obj().downgrade();
        drop_target.connect_drop(move |_, value, _, _| {
            let Ok(from) = value.get::<u32>() else {
                return false;
            };
            let obj_weak = obj_weak.clone();
            // The redraw replaces this row; leave the drop handler first
            glib::idle_add_local_once(move || {
                if let Some(obj) = obj_weak.upgrade() {
                    obj.imp().move_link(generation, from as usize, position);
                }
            });
            true
        });
        row.add_controller(drop_target);
    }

    fn load_icon(&self, image: &gtk4::Image, url: &str) {
        let lookup = self.icon_cache.borrow_mut().lookup(url, image.downgrade());
        match lookup {
            IconLookup::Ready(texture) => image.set_paintable(Some(&texture)),
            IconLookup::Queued | IconLookup::Failed => {}
            IconLookup::Fetch => {
                let cache = self.icon_cache.clone();
                let url_owned = url.to_string();
                fetch::fetch_texture(url, move |texture| {
                    let waiters = cache.borrow_mut().finish(&url_owned, texture.clone());
                    let Some(texture) = texture else {
                        return;
                    };
                    // Rows replaced by later redraws are gone
                    for image in waiters.iter().filter_map(|weak| weak.upgrade()) {
                        image.set_paintable(Some(&texture));
                    }
                });
            }
        }
    }

    // ------------------------------------------------------------------
    // Widgets
    // ------------------------------------------------------------------

    fn start_clock(&self) {
        self.update_clock();

        let obj_weak = self.obj().downgrade();
        glib::timeout_add_seconds_local(config::CLOCK_INTERVAL_SECS, move || {
            match obj_weak.upgrade() {
                Some(obj) => {
                    obj.imp().update_clock();
                    glib::ControlFlow::Continue
                }
                None => glib::ControlFlow::Break,
            }
        });
    }

    fn update_clock(&self) {
        let now = match glib::DateTime::now_local() {
            Ok(now) => now,
            Err(e) => {
                log::warn!("Could not read local time: {}", e);
                return;
            }
        };

        let hour = now.hour().max(0) as u32;
        let minute = now.minute().max(0) as u32;
        let w = self.widgets();
        w.clock_label.set_text(&widgets::clock_text(hour, minute));
        w.greeting_label.set_text(widgets::greeting(hour));
    }

    fn load_weather(&self, location: Option<WeatherLocation>) {
        self.show_weather(&WeatherStatus::Loading);

        let obj_weak = self.obj().downgrade();
        fetch::fetch_weather(location, move |status| {
            if let Some(obj) = obj_weak.upgrade() {
                obj.imp().show_weather(&status);
            }
        });
    }

    fn show_weather(&self, status: &WeatherStatus) {
        let w = self.widgets();
        w.weather_temp.set_text(&status.temperature_text());
        w.weather_desc.set_text(status.description_text());
    }

    fn animate_entrance(&self) {
        let mut animations = self.entrance_animations.borrow_mut();
        for (index, card) in self.widgets().cards.iter().enumerate() {
            card.set_opacity(0.0);

            let target = libadwaita::PropertyAnimationTarget::new(card, "opacity");
            let animation = libadwaita::TimedAnimation::new(card, 0.0, 1.0, 1000, target);
            animation.set_easing(libadwaita::Easing::EaseOutCubic);

            let delay = Duration::from_millis(150 * index as u64);
            let to_play = animation.clone();
            glib::timeout_add_local_once(delay, move || to_play.play());
            animations.push(animation);
        }
    }
}

impl WidgetImpl for StartPageWindow {}
impl WindowImpl for StartPageWindow {
    fn close_request(&self) -> glib::Propagation {
        // An open confirmation counts as declined
        if let Some(gate) = self.gate.get() {
            gate.dismiss();
        }

        // Write slider values still waiting on the debounce
        let pending = self.slider_commit.borrow_mut().take();
        if let Some(source_id) = pending {
            source_id.remove();
            let w = self.widgets();
            self.update_setting(SettingChange::Blur(w.blur_scale.value()));
            self.update_setting(SettingChange::Opacity(w.opacity_scale.value()));
        }

        self.parent_close_request()
    }
}
impl ApplicationWindowImpl for StartPageWindow {}
impl AdwApplicationWindowImpl for StartPageWindow {}
