use crate::dom::Point;
use crate::error::GalleryError;
use crate::logging::{LogLevel, DEFAULT_LOG_LEVEL};
use crate::positioning::CENTER_OF_SCREEN;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_POPUP_ID: &str = "hover-gallery-popup";
pub const DEFAULT_IMAGE_WILDCARD: &str = "%IMAGEPATH%";
pub const DEFAULT_FADE_MILLIS: u64 = 200;
pub const DEFAULT_RELATIVE_OFFSET: Point = Point::new(30.0, 40.0);

const FADE_MILLIS_BOUNDS: (u64, u64) = (0, 5_000);

/// Caller-supplied options. Every key is optional and unknown keys are
/// dropped during deserialization, so nothing outside this list can reach
/// gallery state.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryOptions {
    pub popup_class: Option<String>,
    pub popup_id: Option<String>,
    pub image_wildcard: Option<String>,
    pub popup_template: Option<String>,
    pub position_popup: Option<String>,
    pub initial_index: Option<i64>,
    pub disable_create_popup: Option<bool>,
    pub disable_close_popup: Option<bool>,
    pub relative_offset: Option<Point>,
    pub fade_millis: Option<u64>,
    pub log_level: Option<LogLevel>,
}

impl GalleryOptions {
    pub fn from_json(raw: &str) -> Result<Self, GalleryError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Resolved gallery configuration, fixed once the gallery is built.
#[derive(Clone, Debug, PartialEq)]
pub struct GalleryConfig {
    pub popup_class: Option<String>,
    pub popup_id: String,
    pub image_wildcard: String,
    pub popup_template: String,
    pub positioning: String,
    pub initial_index: Option<usize>,
    pub skip_popup_creation: bool,
    pub skip_popup_close: bool,
    pub relative_offset: Point,
    pub fade: Duration,
    pub log_level: LogLevel,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self::from_options(GalleryOptions::default())
    }
}

impl GalleryConfig {
    pub fn from_options(options: GalleryOptions) -> Self {
        let image_wildcard = options
            .image_wildcard
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_IMAGE_WILDCARD.to_string());
        let popup_template = options
            .popup_template
            .unwrap_or_else(|| default_popup_template(&image_wildcard));
        let fade_millis = options
            .fade_millis
            .filter(|value| (FADE_MILLIS_BOUNDS.0..=FADE_MILLIS_BOUNDS.1).contains(value))
            .unwrap_or(DEFAULT_FADE_MILLIS);

        Self {
            popup_class: options.popup_class,
            popup_id: options
                .popup_id
                .unwrap_or_else(|| DEFAULT_POPUP_ID.to_string()),
            image_wildcard,
            popup_template,
            positioning: options
                .position_popup
                .unwrap_or_else(|| CENTER_OF_SCREEN.to_string()),
            initial_index: options
                .initial_index
                .and_then(|index| usize::try_from(index).ok()),
            skip_popup_creation: options.disable_create_popup.unwrap_or(false),
            skip_popup_close: options.disable_close_popup.unwrap_or(false),
            relative_offset: options.relative_offset.unwrap_or(DEFAULT_RELATIVE_OFFSET),
            fade: Duration::from_millis(fade_millis),
            log_level: options.log_level.unwrap_or(DEFAULT_LOG_LEVEL),
        }
    }

    /// Popup markup for `image_path`. Only the first wildcard is replaced.
    pub fn render_popup(&self, image_path: &str) -> String {
        self.popup_template.replacen(&self.image_wildcard, image_path, 1)
    }
}

fn default_popup_template(wildcard: &str) -> String {
    format!("<img src=\"{wildcard}\" alt=\"hover-gallery-image\">")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = GalleryConfig::default();

        assert_eq!(config.popup_id, DEFAULT_POPUP_ID);
        assert_eq!(config.popup_class, None);
        assert_eq!(config.image_wildcard, "%IMAGEPATH%");
        assert_eq!(
            config.popup_template,
            "<img src=\"%IMAGEPATH%\" alt=\"hover-gallery-image\">"
        );
        assert_eq!(config.positioning, "center-of-screen");
        assert_eq!(config.initial_index, None);
        assert!(!config.skip_popup_creation);
        assert!(!config.skip_popup_close);
        assert_eq!(config.fade, Duration::from_millis(200));
        assert_eq!(config.relative_offset, Point::new(30.0, 40.0));
    }

    #[test]
    fn known_keys_override_defaults() {
        let options = GalleryOptions::from_json(
            r#"{
                "popupClass": "preview",
                "popupId": "thumbs-popup",
                "positionPopup": "static",
                "initialIndex": 2,
                "disableClosePopup": true,
                "relativeOffset": { "top": 5, "left": 6 },
                "logLevel": "debug"
            }"#,
        )
        .expect("options parse");
        let config = GalleryConfig::from_options(options);

        assert_eq!(config.popup_class.as_deref(), Some("preview"));
        assert_eq!(config.popup_id, "thumbs-popup");
        assert_eq!(config.positioning, "static");
        assert_eq!(config.initial_index, Some(2));
        assert!(config.skip_popup_close);
        assert!(!config.skip_popup_creation);
        assert_eq!(config.relative_offset, Point::new(5.0, 6.0));
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let options = GalleryOptions::from_json(
            r#"{
                "__proto__": { "polluted": true },
                "currentThumbnail": 3,
                "imageCache": ["x.jpg"],
                "popupId": "kept"
            }"#,
        )
        .expect("unknown keys do not fail parsing");

        assert_eq!(
            options,
            GalleryOptions {
                popup_id: Some("kept".to_string()),
                ..GalleryOptions::default()
            }
        );
    }

    #[test]
    fn default_template_follows_custom_wildcard() {
        let config = GalleryConfig::from_options(GalleryOptions {
            image_wildcard: Some("{src}".to_string()),
            ..GalleryOptions::default()
        });

        assert_eq!(
            config.render_popup("images/a.jpg"),
            "<img src=\"images/a.jpg\" alt=\"hover-gallery-image\">"
        );
    }

    #[test]
    fn render_replaces_first_wildcard_only() {
        let config = GalleryConfig::from_options(GalleryOptions {
            popup_template: Some("<a href=\"%IMAGEPATH%\">%IMAGEPATH%</a>".to_string()),
            ..GalleryOptions::default()
        });

        assert_eq!(config.render_popup("b.jpg"), "<a href=\"b.jpg\">%IMAGEPATH%</a>");
    }

    #[test]
    fn out_of_range_fade_falls_back_to_default() {
        let config = GalleryConfig::from_options(GalleryOptions {
            fade_millis: Some(60_000),
            ..GalleryOptions::default()
        });

        assert_eq!(config.fade, Duration::from_millis(DEFAULT_FADE_MILLIS));
    }

    #[test]
    fn negative_initial_index_is_dropped() {
        let options = GalleryOptions::from_json(r#"{ "initialIndex": -1 }"#).expect("options parse");

        assert_eq!(GalleryConfig::from_options(options).initial_index, None);
    }

    #[test]
    fn malformed_json_is_reported() {
        let result = GalleryOptions::from_json("{ popupId: ");
        assert!(matches!(result, Err(GalleryError::InvalidOptions(_))));
    }
}
