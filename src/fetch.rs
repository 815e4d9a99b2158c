//! HTTP fetches for the weather widget, favicons and the background image.

use crate::config::{self, WeatherLocation};
use crate::widgets::weather::{self, WeatherReport, WeatherStatus};
use soup::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Error type for HTTP fetches
#[derive(Debug)]
pub enum FetchError {
    Request(glib::Error),
    Status(soup::Status),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Request(e) => write!(f, "Request failed: {}", e),
            FetchError::Status(status) => write!(f, "Server returned status {:?}", status),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<glib::Error> for FetchError {
    fn from(e: glib::Error) -> Self {
        FetchError::Request(e)
    }
}

/// GET `url` and hand the body to `callback` on the main loop.
pub fn fetch_bytes<F>(url: &str, callback: F)
where
    F: FnOnce(Result<glib::Bytes, FetchError>) + 'static,
{
    let message = match soup::Message::new("GET", url) {
        Ok(message) => message,
        Err(e) => {
            callback(Err(e.into()));
            return;
        }
    };

    let callback = Rc::new(RefCell::new(Some(callback)));

    let session = soup::Session::new();
    session.set_user_agent(config::USER_AGENT);

    let message_for_status = message.clone();
    session.send_and_read_async(
        &message,
        soup::glib::Priority::DEFAULT,
        soup::gio::Cancellable::NONE,
        move |result| {
            let result = match result {
                Ok(bytes) => match message_for_status.status() {
                    soup::Status::Ok => Ok(bytes),
                    status => Err(FetchError::Status(status)),
                },
                Err(e) => Err(FetchError::Request(e)),
            };

            if let Some(cb) = callback.borrow_mut().take() {
                cb(result);
            }
        },
    );
}

/// Fetch an image and decode it into a texture
pub fn fetch_texture<F>(url: &str, callback: F)
where
    F: FnOnce(Option<gdk4::Texture>) + 'static,
{
    let url_owned = url.to_string();
    fetch_bytes(url, move |result| {
        let texture = result
            .map_err(|e| e.to_string())
            .and_then(|bytes| gdk4::Texture::from_bytes(&bytes).map_err(|e| e.to_string()));

        match texture {
            Ok(texture) => callback(Some(texture)),
            Err(e) => {
                log::debug!("Could not load image {}: {}", url_owned, e);
                callback(None);
            }
        }
    });
}

/// Fetch the current weather once. No location means no request.
pub fn fetch_weather<F>(location: Option<WeatherLocation>, callback: F)
where
    F: FnOnce(WeatherStatus) + 'static,
{
    let Some(location) = location else {
        log::info!("No weather location configured");
        callback(WeatherStatus::LocationDenied);
        return;
    };

    fetch_bytes(&weather::forecast_url(&location), move |result| {
        let report = result
            .map_err(|e| e.to_string())
            .and_then(|bytes| WeatherReport::from_json(&bytes).map_err(|e| e.to_string()));

        match report {
            Ok(report) => callback(WeatherStatus::Ready(report)),
            Err(e) => {
                log::error!("Failed to fetch weather: {}", e);
                callback(WeatherStatus::Unavailable);
            }
        }
    });
}
