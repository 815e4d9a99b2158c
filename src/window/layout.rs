//! Widget tree of the start page window.

use crate::config;
use crate::view::{GridTile, ManageRow};
use gtk4::prelude::*;

/// Handles to every widget the window updates or listens to
pub struct Widgets {
    pub root: libadwaita::ToolbarView,
    pub background: gtk4::Picture,
    pub clock_label: gtk4::Label,
    pub greeting_label: gtk4::Label,
    pub weather_temp: gtk4::Label,
    pub weather_desc: gtk4::Label,
    pub search_entry: gtk4::SearchEntry,
    pub links_grid: gtk4::FlowBox,
    /// Cards faded in on startup, in order
    pub cards: Vec<gtk4::Widget>,

    pub settings_button: gtk4::ToggleButton,
    pub settings_revealer: gtk4::Revealer,
    pub dark_button: gtk4::ToggleButton,
    pub light_button: gtk4::ToggleButton,
    pub engine_dropdown: gtk4::DropDown,
    pub background_entry: gtk4::Entry,
    pub blur_scale: gtk4::Scale,
    pub opacity_scale: gtk4::Scale,
    pub link_name_entry: gtk4::Entry,
    pub link_url_entry: gtk4::Entry,
    pub link_icon_entry: gtk4::Entry,
    pub add_link_button: gtk4::Button,
    pub manage_list: gtk4::ListBox,
}

fn card(orientation: gtk4::Orientation, spacing: i32) -> gtk4::Box {
    let card = gtk4::Box::new(orientation, spacing);
    card.add_css_class("glass-card");
    card
}

fn section_label(text: &str) -> gtk4::Label {
    let label = gtk4::Label::new(Some(text));
    label.set_halign(gtk4::Align::Start);
    label.add_css_class("heading");
    label.set_margin_top(12);
    label
}

fn entry(placeholder: &str) -> gtk4::Entry {
    let entry = gtk4::Entry::new();
    entry.set_placeholder_text(Some(placeholder));
    entry
}

impl Widgets {
    pub fn build() -> Self {
        // Header card: clock, greeting, weather
        let clock_label = gtk4::Label::new(Some("--:--"));
        clock_label.add_css_class("startpage-clock");

        let greeting_label = gtk4::Label::new(None);
        greeting_label.add_css_class("startpage-greeting");

        let weather_temp = gtk4::Label::new(None);
        weather_temp.add_css_class("startpage-weather-temp");
        let weather_desc = gtk4::Label::new(None);
        weather_desc.add_css_class("dim-label");
        let weather_box = gtk4::Box::new(gtk4::Orientation::Horizontal, 8);
        weather_box.set_halign(gtk4::Align::Center);
        weather_box.append(&weather_temp);
        weather_box.append(&weather_desc);

        let header_card = card(gtk4::Orientation::Vertical, 6);
        header_card.append(&clock_label);
        header_card.append(&greeting_label);
        header_card.append(&weather_box);

        // Search card
        let search_entry = gtk4::SearchEntry::new();
        search_entry.set_hexpand(true);
        let search_card = card(gtk4::Orientation::Horizontal, 0);
        search_card.append(&search_entry);

        // Links card
        let links_grid = gtk4::FlowBox::new();
        links_grid.set_selection_mode(gtk4::SelectionMode::None);
        links_grid.set_homogeneous(true);
        links_grid.set_max_children_per_line(6);
        links_grid.set_column_spacing(12);
        links_grid.set_row_spacing(12);
        let links_card = card(gtk4::Orientation::Vertical, 0);
        links_card.append(&links_grid);

        let column = gtk4::Box::new(gtk4::Orientation::Vertical, 24);
        column.set_width_request(560);
        column.set_halign(gtk4::Align::Center);
        column.set_valign(gtk4::Align::Center);
        column.set_margin_top(48);
        column.set_margin_bottom(48);
        column.append(&header_card);
        column.append(&search_card);
        column.append(&links_card);

        let content_scroll = gtk4::ScrolledWindow::new();
        content_scroll.set_hscrollbar_policy(gtk4::PolicyType::Never);
        content_scroll.set_child(Some(&column));

        // Background image under everything
        let background = gtk4::Picture::new();
        background.set_content_fit(gtk4::ContentFit::Cover);
        background.set_can_shrink(true);
        background.add_css_class("startpage-background");

        // Settings panel
        let dark_button = gtk4::ToggleButton::with_label("Dark");
        let light_button = gtk4::ToggleButton::with_label("Light");
        light_button.set_group(Some(&dark_button));
        let theme_box = gtk4::Box::new(gtk4::Orientation::Horizontal, 0);
        theme_box.add_css_class("linked");
        theme_box.append(&dark_button);
        theme_box.append(&light_button);

        let engine_names: Vec<&str> = config::SEARCH_ENGINES
            .iter()
            .map(|engine| engine.name)
            .collect();
        let engine_dropdown = gtk4::DropDown::from_strings(&engine_names);

        let background_entry = entry("Background image URL");

        let blur_scale =
            gtk4::Scale::with_range(gtk4::Orientation::Horizontal, 0.0, config::MAX_BLUR, 1.0);
        blur_scale.set_draw_value(true);
        let opacity_scale =
            gtk4::Scale::with_range(gtk4::Orientation::Horizontal, 0.0, 1.0, 0.05);
        opacity_scale.set_draw_value(true);
        opacity_scale.set_digits(2);

        let link_name_entry = entry("Name");
        let link_url_entry = entry("URL");
        let link_icon_entry = entry("Icon URL (optional)");
        let add_link_button = gtk4::Button::with_label("Add Link");
        add_link_button.add_css_class("suggested-action");

        let manage_list = gtk4::ListBox::new();
        manage_list.set_selection_mode(gtk4::SelectionMode::None);
        manage_list.add_css_class("boxed-list");

        let panel = gtk4::Box::new(gtk4::Orientation::Vertical, 8);
        panel.add_css_class("settings-panel");
        panel.append(&section_label("Theme"));
        panel.append(&theme_box);
        panel.append(&section_label("Search Engine"));
        panel.append(&engine_dropdown);
        panel.append(&section_label("Background"));
        panel.append(&background_entry);
        panel.append(&section_label("Blur"));
        panel.append(&blur_scale);
        panel.append(&section_label("Card Opacity"));
        panel.append(&opacity_scale);
        panel.append(&section_label("Add Link"));
        panel.append(&link_name_entry);
        panel.append(&link_url_entry);
        panel.append(&link_icon_entry);
        panel.append(&add_link_button);
        panel.append(&section_label("Manage Links"));
        panel.append(&manage_list);

        let panel_scroll = gtk4::ScrolledWindow::new();
        panel_scroll.set_hscrollbar_policy(gtk4::PolicyType::Never);
        panel_scroll.set_width_request(360);
        panel_scroll.set_child(Some(&panel));

        let settings_revealer = gtk4::Revealer::new();
        settings_revealer.set_transition_type(gtk4::RevealerTransitionType::SlideLeft);
        settings_revealer.set_transition_duration(600);
        settings_revealer.set_halign(gtk4::Align::End);
        settings_revealer.set_child(Some(&panel_scroll));

        let overlay = gtk4::Overlay::new();
        overlay.set_child(Some(&background));
        overlay.add_overlay(&content_scroll);
        overlay.add_overlay(&settings_revealer);

        let settings_button = gtk4::ToggleButton::new();
        settings_button.set_icon_name("emblem-system-symbolic");
        settings_button.set_tooltip_text(Some("Settings"));

        let header = libadwaita::HeaderBar::new();
        header.pack_end(&settings_button);

        let root = libadwaita::ToolbarView::new();
        root.add_top_bar(&header);
        root.set_content(Some(&overlay));

        Self {
            root,
            background,
            clock_label,
            greeting_label,
            weather_temp,
            weather_desc,
            search_entry,
            links_grid,
            cards: vec![
                header_card.upcast(),
                search_card.upcast(),
                links_card.upcast(),
            ],
            settings_button,
            settings_revealer,
            dark_button,
            light_button,
            engine_dropdown,
            background_entry,
            blur_scale,
            opacity_scale,
            link_name_entry,
            link_url_entry,
            link_icon_entry,
            add_link_button,
            manage_list,
        }
    }
}

/// Grid tile for a link. Returns the button and the image awaiting its icon.
pub fn grid_tile(tile: &GridTile) -> (gtk4::Button, gtk4::Image) {
    let image = gtk4::Image::from_icon_name("web-browser-symbolic");
    image.set_pixel_size(32);

    let label = gtk4::Label::new(Some(&tile.name));
    label.set_ellipsize(gtk4::pango::EllipsizeMode::End);
    label.set_max_width_chars(12);

    let content = gtk4::Box::new(gtk4::Orientation::Vertical, 6);
    content.append(&image);
    content.append(&label);

    let button = gtk4::Button::new();
    button.add_css_class("flat");
    button.add_css_class("link-tile");
    button.set_child(Some(&content));
    button.set_tooltip_text(Some(&tile.href));

    (button, image)
}

/// Management row for a link: drag handle, icon, name and delete button
pub fn manage_row(row: &ManageRow) -> (gtk4::ListBoxRow, gtk4::Image, gtk4::Button) {
    let handle = gtk4::Image::from_icon_name("list-drag-handle-symbolic");
    handle.add_css_class("dim-label");

    let image = gtk4::Image::from_icon_name("web-browser-symbolic");
    image.set_pixel_size(20);

    let label = gtk4::Label::new(Some(&row.name));
    label.set_hexpand(true);
    label.set_halign(gtk4::Align::Start);
    label.set_ellipsize(gtk4::pango::EllipsizeMode::End);

    let delete_button = gtk4::Button::from_icon_name("window-close-symbolic");
    delete_button.add_css_class("flat");
    delete_button.add_css_class("circular");
    delete_button.set_tooltip_text(Some("Delete Link"));

    let content = gtk4::Box::new(gtk4::Orientation::Horizontal, 8);
    content.set_margin_start(8);
    content.set_margin_end(8);
    content.set_margin_top(6);
    content.set_margin_bottom(6);
    content.append(&handle);
    content.append(&image);
    content.append(&label);
    content.append(&delete_button);

    let list_row = gtk4::ListBoxRow::new();
    list_row.add_css_class("manage-link-row");
    list_row.set_activatable(false);
    list_row.set_child(Some(&content));

    (list_row, image, delete_button)
}
