use crate::config::{self, AppConfig};
use crate::page::StartPage;
use crate::storage::Persistence;
use crate::window::StartPageWindow;
use gtk4::prelude::*;
use gtk4::subclass::prelude::*;
use gtk4::{gio, glib};
use libadwaita::subclass::prelude::*;
use std::cell::{OnceCell, RefCell};
use std::rc::Rc;

mod imp {
    use super::*;

    #[derive(Default)]
    pub struct StartPageApplication {
        pub config: OnceCell<AppConfig>,
        pub page: OnceCell<Rc<RefCell<StartPage>>>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for StartPageApplication {
        const NAME: &'static str = "StartPageApplication";
        type Type = super::StartPageApplication;
        type ParentType = libadwaita::Application;
    }

    impl ObjectImpl for StartPageApplication {}

    impl ApplicationImpl for StartPageApplication {
        fn activate(&self) {
            let app = self.obj();

            // Single window; activating again just raises it
            if let Some(window) = app.active_window() {
                window.present();
                return;
            }

            let (Some(page), Some(config)) = (self.page.get(), self.config.get()) else {
                log::error!("Activated before startup finished");
                return;
            };

            let window = StartPageWindow::new(&app, page.clone(), config);
            window.present();
        }

        fn startup(&self) {
            self.parent_startup();

            let app = self.obj();

            let config = AppConfig::load_or_default();
            let data_dir = config::data_dir();
            let persistence = Persistence::for_config(&config, data_dir.as_deref());

            let page = StartPage::load(persistence, &config.favicon_service);
            log::info!("Start page loaded with {} links", page.links().len());

            if self.page.set(Rc::new(RefCell::new(page))).is_err() {
                log::warn!("Start page already initialized");
            }
            if self.config.set(config).is_err() {
                log::warn!("Config already initialized");
            }

            app.setup_actions();
            app.setup_accels();
        }
    }

    impl GtkApplicationImpl for StartPageApplication {}
    impl AdwApplicationImpl for StartPageApplication {}
}

glib::wrapper! {
    pub struct StartPageApplication(ObjectSubclass<imp::StartPageApplication>)
        @extends libadwaita::Application, gtk4::Application, gio::Application,
        @implements gio::ActionGroup, gio::ActionMap;
}

impl StartPageApplication {
    pub fn new() -> Self {
        glib::Object::builder()
            .property("application-id", config::APP_ID)
            .property("flags", gio::ApplicationFlags::default())
            .build()
    }

    fn setup_actions(&self) {
        let quit_action = gio::SimpleAction::new("quit", None);
        quit_action.connect_activate(glib::clone!(
            #[weak(rename_to = app)]
            self,
            move |_, _| {
                app.quit();
            }
        ));
        self.add_action(&quit_action);
    }

    fn setup_accels(&self) {
        self.set_accels_for_action("app.quit", &["<Control>q"]);
        self.set_accels_for_action("window.close", &["<Control>w"]);
    }
}

impl Default for StartPageApplication {
    fn default() -> Self {
        Self::new()
    }
}
