//! Hover-activated image previews for a set of thumbnails.
//!
//! A [`HoverGallery`] watches pointer movement, finds the thumbnail under the
//! pointer and shows a single floating popup with that thumbnail's full-size
//! image. The page itself is reached through the [`Environment`] trait so the
//! same gallery runs against the browser DOM (`web`, wasm32 only) or an
//! in-memory page (`headless`, native only).

pub mod cache;
pub mod config;
pub mod dom;
pub mod error;
pub mod gallery;
pub mod hit_test;
pub mod logging;
pub mod popup;
pub mod positioning;

#[cfg(not(target_arch = "wasm32"))]
pub mod headless;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{GalleryConfig, GalleryOptions};
pub use dom::{Environment, ImageHandle, Point, PointerEvent, Size};
pub use error::GalleryError;
pub use gallery::{GalleryBuilder, HoverGallery};
pub use positioning::{PositionStrategy, StrategyRegistry};
