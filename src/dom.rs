use serde::Deserialize;
use std::time::Duration;

/// A top/left pair in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Point {
    pub top: f64,
    pub left: f64,
}

impl Point {
    pub const fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }

    pub fn offset_by(self, other: Point) -> Self {
        Self {
            top: self.top + other.top,
            left: self.left + other.left,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Pointer position in page coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub page_x: f64,
    pub page_y: f64,
}

impl PointerEvent {
    pub const fn at(page_x: f64, page_y: f64) -> Self {
        Self { page_x, page_y }
    }
}

pub type PointerHandler = Box<dyn FnMut(&PointerEvent)>;

/// Inline style every new popup starts with. Placement writes `top`/`left`,
/// which only take effect on a positioned element.
pub const POPUP_INITIAL_STYLE: [(&str, &str); 2] = [("position", "absolute"), ("visibility", "hidden")];

/// A started image pre-fetch.
pub trait ImageHandle {
    /// The fully resolved URL being fetched.
    fn src(&self) -> String;
}

/// The page a gallery lives in.
///
/// Methods take `&self`: a DOM is shared, interior-mutable state and every
/// implementation is a cheap handle onto it.
pub trait Environment {
    type Element: Clone + PartialEq;
    /// Keeps a pointer-move listener registered until dropped.
    type Subscription;
    type Image: ImageHandle;

    fn select_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Appends a hidden popup element to the page body.
    fn create_popup(
        &self,
        id: &str,
        class: Option<&str>,
    ) -> Result<Self::Element, crate::GalleryError>;

    fn remove(&self, element: &Self::Element);

    /// Offset relative to the document. `None` for detached or unknown
    /// elements.
    fn offset(&self, element: &Self::Element) -> Option<Point>;

    /// Offset relative to the element's offset parent.
    fn position(&self, element: &Self::Element) -> Option<Point>;

    fn size(&self, element: &Self::Element) -> Size;

    fn viewport(&self) -> Size;

    fn set_content(&self, element: &Self::Element, html: &str);

    fn move_to(&self, element: &Self::Element, at: Point);

    /// Makes the element visible, fading opacity in over `fade`.
    fn show(&self, element: &Self::Element, fade: Duration);

    fn hide(&self, element: &Self::Element);

    /// `href` of the first anchor inside `element`.
    fn anchor_href(&self, element: &Self::Element) -> Option<String>;

    fn subscribe_pointer_move(&self, namespace: &str, handler: PointerHandler)
        -> Self::Subscription;

    /// Starts fetching `path` in the background. Completion is never
    /// reported back. `None` means no fetch could be started; the gallery
    /// still caches the path.
    fn preload_image(&self, path: &str) -> Option<Self::Image>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_popups_are_positioned_and_hidden() {
        assert!(POPUP_INITIAL_STYLE.contains(&("position", "absolute")));
        assert!(POPUP_INITIAL_STYLE.contains(&("visibility", "hidden")));
    }

    #[test]
    fn offset_by_adds_both_axes() {
        assert_eq!(Point::new(10.0, 20.0).offset_by(Point::new(30.0, 40.0)), Point::new(40.0, 60.0));
    }
}
