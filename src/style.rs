//! GTK stylesheet for the start page.

use crate::view::Appearance;

/// Static part of the stylesheet
pub const BASE_CSS: &str = "
.startpage-clock {
    font-size: 64px;
    font-weight: 300;
}

.startpage-greeting {
    font-size: 22px;
}

.startpage-weather-temp {
    font-size: 18px;
    font-weight: bold;
}

.glass-card {
    border-radius: 18px;
    padding: 18px;
}

.link-tile {
    padding: 10px;
    border-radius: 12px;
}

.link-tile label {
    font-size: 12px;
}

.settings-panel {
    background-color: @window_bg_color;
    padding: 18px;
    box-shadow: -2px 0 12px alpha(black, 0.3);
}

.manage-link-row.drop-target {
    background-color: alpha(@accent_bg_color, 0.25);
}
";

/// Rules that follow the blur and opacity settings.
///
/// Stored values are not range checked, so they are clamped here.
pub fn appearance_css(appearance: &Appearance) -> String {
    let blur = if appearance.blur.is_finite() {
        appearance.blur.max(0.0)
    } else {
        0.0
    };
    let opacity = if appearance.opacity.is_finite() {
        appearance.opacity.clamp(0.0, 1.0)
    } else {
        0.0
    };

    format!(
        ".startpage-background {{ filter: blur({:.1}px); }}\n\
         .glass-card {{ background-color: alpha(@window_fg_color, {:.2}); }}\n",
        blur, opacity
    )
}

/// The complete stylesheet for an appearance
pub fn page_css(appearance: &Appearance) -> String {
    format!("{}\n{}", BASE_CSS, appearance_css(appearance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Theme;

    fn appearance(blur: f64, opacity: f64) -> Appearance {
        Appearance {
            theme: Theme::Dark,
            search_engine: "google".into(),
            search_placeholder: "Search with Google".into(),
            background_url: String::new(),
            blur,
            opacity,
        }
    }

    #[test]
    fn test_appearance_css() {
        let css = appearance_css(&appearance(10.0, 0.1));
        assert!(css.contains("filter: blur(10.0px)"));
        assert!(css.contains("alpha(@window_fg_color, 0.10)"));
    }

    #[test]
    fn test_out_of_range_values_clamped() {
        let css = appearance_css(&appearance(-4.0, 1.7));
        assert!(css.contains("blur(0.0px)"));
        assert!(css.contains("alpha(@window_fg_color, 1.00)"));

        let css = appearance_css(&appearance(f64::NAN, f64::INFINITY));
        assert!(css.contains("blur(0.0px)"));
        assert!(css.contains("alpha(@window_fg_color, 0.00)"));
    }

    #[test]
    fn test_page_css_includes_base() {
        let css = page_css(&appearance(2.0, 0.5));
        assert!(css.starts_with(BASE_CSS));
        assert!(css.contains(".startpage-background"));
    }
}
