//! Clock, greeting and weather texts shown above the search bar.

pub mod clock;
pub mod weather;

pub use clock::{clock_text, greeting};
pub use weather::{WeatherReport, WeatherStatus};
