//! Browser DOM environment.

use crate::dom::{Environment, ImageHandle, Point, PointerEvent, PointerHandler, Size, POPUP_INITIAL_STYLE};
use crate::error::GalleryError;
use std::time::Duration;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{window, CssStyleDeclaration, Document, Element, HtmlElement, HtmlImageElement, MouseEvent, Window};

const POINTER_MOVE_EVENT: &str = "mousemove";

#[derive(Clone)]
pub struct WebEnvironment {
    window: Window,
    document: Document,
}

impl WebEnvironment {
    pub fn from_window() -> Option<Self> {
        let window = window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    pub fn query_all(&self, selector: &str) -> Vec<Element> {
        let Ok(nodes) = self.document.query_selector_all(selector) else {
            return Vec::new();
        };

        (0..nodes.length())
            .filter_map(|index| nodes.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }
}

fn js_error(context: &str, value: JsValue) -> GalleryError {
    let detail = value.as_string().unwrap_or_else(|| format!("{value:?}"));
    GalleryError::Environment(format!("{context}: {detail}"))
}

fn style_of(element: &Element) -> Option<CssStyleDeclaration> {
    element.dyn_ref::<HtmlElement>().map(HtmlElement::style)
}

fn set_style(element: &Element, property: &str, value: &str) {
    if let Some(style) = style_of(element) {
        let _ = style.set_property(property, value);
    }
}

/// Removes its `mousemove` listener when dropped.
pub struct PointerSubscription {
    document: Document,
    callback: Closure<dyn FnMut(MouseEvent)>,
}

impl Drop for PointerSubscription {
    fn drop(&mut self) {
        let _ = self.document.remove_event_listener_with_callback(
            POINTER_MOVE_EVENT,
            self.callback.as_ref().unchecked_ref(),
        );
    }
}

impl ImageHandle for HtmlImageElement {
    fn src(&self) -> String {
        HtmlImageElement::src(self)
    }
}

impl Environment for WebEnvironment {
    type Element = Element;
    type Subscription = PointerSubscription;
    type Image = HtmlImageElement;

    fn select_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn create_popup(&self, id: &str, class: Option<&str>) -> Result<Element, GalleryError> {
        let body = self
            .document
            .body()
            .ok_or_else(|| GalleryError::Environment("document has no body".to_string()))?;
        let popup = self
            .document
            .create_element("div")
            .map_err(|err| js_error("create popup", err))?;

        popup.set_id(id);
        if let Some(class) = class {
            popup.set_class_name(class);
        }
        for (property, value) in POPUP_INITIAL_STYLE {
            set_style(&popup, property, value);
        }
        body.append_child(&popup)
            .map_err(|err| js_error("append popup", err))?;

        Ok(popup)
    }

    fn remove(&self, element: &Element) {
        element.remove();
    }

    fn offset(&self, element: &Element) -> Option<Point> {
        if !element.is_connected() {
            return None;
        }

        let rect = element.get_bounding_client_rect();
        let scroll_y = self.window.scroll_y().unwrap_or(0.0);
        let scroll_x = self.window.scroll_x().unwrap_or(0.0);
        Some(Point::new(rect.top() + scroll_y, rect.left() + scroll_x))
    }

    fn position(&self, element: &Element) -> Option<Point> {
        element
            .dyn_ref::<HtmlElement>()
            .map(|html| Point::new(f64::from(html.offset_top()), f64::from(html.offset_left())))
    }

    fn size(&self, element: &Element) -> Size {
        let rect = element.get_bounding_client_rect();
        Size::new(rect.width(), rect.height())
    }

    fn viewport(&self) -> Size {
        let width = self
            .window
            .inner_width()
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or(1280.0);
        let height = self
            .window
            .inner_height()
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or(720.0);

        Size::new(width, height)
    }

    fn set_content(&self, element: &Element, html: &str) {
        element.set_inner_html(html);
    }

    fn move_to(&self, element: &Element, at: Point) {
        set_style(element, "top", &format!("{:.2}px", at.top));
        set_style(element, "left", &format!("{:.2}px", at.left));
    }

    fn show(&self, element: &Element, fade: Duration) {
        let Some(html) = element.dyn_ref::<HtmlElement>() else {
            return;
        };
        let style = html.style();

        if fade.is_zero() {
            let _ = style.set_property("transition", "none");
            let _ = style.set_property("opacity", "1");
            let _ = style.set_property("visibility", "visible");
            return;
        }

        let _ = style.set_property("transition", "none");
        let _ = style.set_property("opacity", "0");
        let _ = style.set_property("visibility", "visible");
        // Reading layout flushes the transparent frame so the transition
        // below has a starting point.
        let _ = html.offset_height();
        let _ = style.set_property("transition", &format!("opacity {}ms", fade.as_millis()));
        let _ = style.set_property("opacity", "1");
    }

    fn hide(&self, element: &Element) {
        set_style(element, "visibility", "hidden");
    }

    fn anchor_href(&self, element: &Element) -> Option<String> {
        element
            .query_selector("a")
            .ok()
            .flatten()?
            .get_attribute("href")
    }

    // The browser keys listeners by callback identity, so the namespace is
    // not needed to remove this one.
    fn subscribe_pointer_move(&self, _namespace: &str, mut handler: PointerHandler) -> PointerSubscription {
        let callback = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            handler(&PointerEvent::at(
                f64::from(event.page_x()),
                f64::from(event.page_y()),
            ));
        });

        let _ = self
            .document
            .add_event_listener_with_callback(POINTER_MOVE_EVENT, callback.as_ref().unchecked_ref());

        PointerSubscription {
            document: self.document.clone(),
            callback,
        }
    }

    fn preload_image(&self, path: &str) -> Option<HtmlImageElement> {
        let image = HtmlImageElement::new().ok()?;
        image.set_src(path);
        Some(image)
    }
}
