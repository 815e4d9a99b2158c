mod imp;
mod layout;

use crate::application::StartPageApplication;
use crate::config::AppConfig;
use crate::page::StartPage;
use glib::subclass::prelude::*;
use gtk4::glib;
use std::cell::RefCell;
use std::rc::Rc;

glib::wrapper! {
    pub struct StartPageWindow(ObjectSubclass<imp::StartPageWindow>)
        @extends libadwaita::ApplicationWindow, gtk4::ApplicationWindow, gtk4::Window, gtk4::Widget,
        @implements gtk4::Accessible, gtk4::Buildable, gtk4::ConstraintTarget, gtk4::Native, gtk4::Root, gtk4::ShortcutManager, gio::ActionGroup, gio::ActionMap;
}

impl StartPageWindow {
    /// Create a window showing `page`. The page is shared with the application.
    pub fn new(app: &StartPageApplication, page: Rc<RefCell<StartPage>>, config: &AppConfig) -> Self {
        let window: Self = glib::Object::builder()
            .property("application", app)
            .build();
        window.imp().attach(page, config.weather);
        window
    }
}

use gtk4::gio;
