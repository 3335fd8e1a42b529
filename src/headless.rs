//! In-memory page used by the native demo and the test suite.

use crate::dom::{Environment, ImageHandle, Point, PointerEvent, PointerHandler, Size};
use crate::error::GalleryError;
use scraper::{Html, Selector};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost/";
pub const DEFAULT_VIEWPORT: Size = Size::new(1280.0, 720.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

#[derive(Clone, Debug)]
struct Node {
    dom_id: Option<String>,
    class: Option<String>,
    markup: String,
    offset: Point,
    size: Size,
    visibility: Visibility,
    opacity: f64,
    fade: Option<Duration>,
    attached: bool,
}

impl Node {
    fn new(markup: &str, offset: Point, size: Size) -> Self {
        Self {
            dom_id: None,
            class: None,
            markup: markup.to_string(),
            offset,
            size,
            visibility: Visibility::Visible,
            opacity: 1.0,
            fade: None,
            attached: true,
        }
    }
}

struct Listener {
    key: u64,
    namespace: String,
    handler: Rc<RefCell<PointerHandler>>,
}

struct PageState {
    nodes: Vec<Node>,
    viewport: Size,
    base_url: Url,
    listeners: Vec<Listener>,
    next_listener_key: u64,
    fetched: Vec<String>,
}

/// Shared handle onto an in-memory page. Clones see the same page.
#[derive(Clone)]
pub struct HeadlessPage {
    state: Rc<RefCell<PageState>>,
}

impl Default for HeadlessPage {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessPage {
    pub fn new() -> Self {
        let base_url = Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid");
        Self::with_base_url(base_url)
    }

    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            state: Rc::new(RefCell::new(PageState {
                nodes: Vec::new(),
                viewport: DEFAULT_VIEWPORT,
                base_url,
                listeners: Vec::new(),
                next_listener_key: 1,
                fetched: Vec::new(),
            })),
        }
    }

    pub fn set_viewport(&self, viewport: Size) {
        self.state.borrow_mut().viewport = viewport;
    }

    /// Adds a thumbnail described by an HTML fragment at a page offset.
    pub fn append_thumbnail(&self, markup: &str, offset: Point, size: Size) -> NodeId {
        let mut state = self.state.borrow_mut();
        state.nodes.push(Node::new(markup, offset, size));
        NodeId(state.nodes.len() - 1)
    }

    pub fn set_size(&self, node: NodeId, size: Size) {
        if let Some(node) = self.state.borrow_mut().nodes.get_mut(node.0) {
            node.size = size;
        }
    }

    pub fn markup(&self, node: NodeId) -> Option<String> {
        self.with_node(node, |node| node.markup.clone())
    }

    pub fn visibility(&self, node: NodeId) -> Option<Visibility> {
        self.with_node(node, |node| node.visibility)
    }

    pub fn opacity(&self, node: NodeId) -> Option<f64> {
        self.with_node(node, |node| node.opacity)
    }

    pub fn fade(&self, node: NodeId) -> Option<Duration> {
        self.with_node(node, |node| node.fade).flatten()
    }

    pub fn class(&self, node: NodeId) -> Option<String> {
        self.with_node(node, |node| node.class.clone()).flatten()
    }

    pub fn placement(&self, node: NodeId) -> Option<Point> {
        self.with_node(node, |node| node.offset)
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        self.with_node(node, |node| node.attached).unwrap_or(false)
    }

    pub fn listener_count(&self, namespace: &str) -> usize {
        self.state
            .borrow()
            .listeners
            .iter()
            .filter(|listener| listener.namespace == namespace)
            .count()
    }

    pub fn fetched_urls(&self) -> Vec<String> {
        self.state.borrow().fetched.clone()
    }

    /// Delivers `event` to every listener in registration order.
    pub fn dispatch_pointer_move(&self, event: PointerEvent) {
        let handlers: Vec<_> = self
            .state
            .borrow()
            .listeners
            .iter()
            .map(|listener| Rc::clone(&listener.handler))
            .collect();

        for handler in handlers {
            if let Ok(mut handler) = handler.try_borrow_mut() {
                (*handler)(&event);
            }
        }
    }

    fn with_node<T>(&self, node: NodeId, read: impl FnOnce(&Node) -> T) -> Option<T> {
        self.state
            .borrow()
            .nodes
            .get(node.0)
            .filter(|node| node.attached)
            .map(read)
    }

    fn update_node(&self, node: NodeId, write: impl FnOnce(&mut Node)) {
        if let Some(node) = self
            .state
            .borrow_mut()
            .nodes
            .get_mut(node.0)
            .filter(|node| node.attached)
        {
            write(node);
        }
    }
}

/// Removes its listener from the page when dropped.
pub struct HeadlessSubscription {
    key: u64,
    state: Weak<RefCell<PageState>>,
}

impl Drop for HeadlessSubscription {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            if let Ok(mut state) = state.try_borrow_mut() {
                state.listeners.retain(|listener| listener.key != self.key);
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PreloadedImage {
    src: Url,
}

impl ImageHandle for PreloadedImage {
    fn src(&self) -> String {
        self.src.to_string()
    }
}

impl Environment for HeadlessPage {
    type Element = NodeId;
    type Subscription = HeadlessSubscription;
    type Image = PreloadedImage;

    fn select_by_id(&self, id: &str) -> Option<NodeId> {
        self.state
            .borrow()
            .nodes
            .iter()
            .position(|node| node.attached && node.dom_id.as_deref() == Some(id))
            .map(NodeId)
    }

    fn create_popup(&self, id: &str, class: Option<&str>) -> Result<NodeId, GalleryError> {
        let mut node = Node::new("", Point::default(), Size::default());
        node.dom_id = Some(id.to_string());
        node.class = class.map(ToString::to_string);
        node.visibility = Visibility::Hidden;

        let mut state = self.state.borrow_mut();
        state.nodes.push(node);
        Ok(NodeId(state.nodes.len() - 1))
    }

    fn remove(&self, element: &NodeId) {
        self.update_node(*element, |node| node.attached = false);
    }

    fn offset(&self, element: &NodeId) -> Option<Point> {
        self.with_node(*element, |node| node.offset)
    }

    fn position(&self, element: &NodeId) -> Option<Point> {
        // Every node is a direct child of the body.
        self.offset(element)
    }

    fn size(&self, element: &NodeId) -> Size {
        self.with_node(*element, |node| node.size).unwrap_or_default()
    }

    fn viewport(&self) -> Size {
        self.state.borrow().viewport
    }

    fn set_content(&self, element: &NodeId, html: &str) {
        self.update_node(*element, |node| node.markup = html.to_string());
    }

    fn move_to(&self, element: &NodeId, at: Point) {
        self.update_node(*element, |node| node.offset = at);
    }

    fn show(&self, element: &NodeId, fade: Duration) {
        // Fades complete instantly; the requested duration is kept for
        // inspection.
        self.update_node(*element, |node| {
            node.visibility = Visibility::Visible;
            node.opacity = 1.0;
            node.fade = Some(fade);
        });
    }

    fn hide(&self, element: &NodeId) {
        self.update_node(*element, |node| node.visibility = Visibility::Hidden);
    }

    fn anchor_href(&self, element: &NodeId) -> Option<String> {
        let markup = self.markup(*element)?;
        let fragment = Html::parse_fragment(&markup);
        let selector = Selector::parse("a").ok()?;

        fragment
            .select(&selector)
            .next()?
            .value()
            .attr("href")
            .map(ToString::to_string)
    }

    fn subscribe_pointer_move(&self, namespace: &str, handler: PointerHandler) -> HeadlessSubscription {
        let mut state = self.state.borrow_mut();
        let key = state.next_listener_key;
        state.next_listener_key += 1;
        state.listeners.push(Listener {
            key,
            namespace: namespace.to_string(),
            handler: Rc::new(RefCell::new(handler)),
        });

        HeadlessSubscription {
            key,
            state: Rc::downgrade(&self.state),
        }
    }

    fn preload_image(&self, path: &str) -> Option<PreloadedImage> {
        let mut state = self.state.borrow_mut();
        let src = state.base_url.join(path).ok()?;
        state.fetched.push(src.to_string());
        Some(PreloadedImage { src })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn anchor_href_reads_first_link() {
        let page = HeadlessPage::new();
        let thumb = page.append_thumbnail(
            r#"<a href="images/one.jpg"><img src="thumbs/one.jpg"></a><a href="images/two.jpg"></a>"#,
            Point::default(),
            Size::new(80.0, 60.0),
        );

        assert_eq!(page.anchor_href(&thumb).as_deref(), Some("images/one.jpg"));
    }

    #[test]
    fn anchor_href_is_none_without_link() {
        let page = HeadlessPage::new();
        let thumb = page.append_thumbnail("<span>sgogurmos</span>", Point::default(), Size::default());

        assert_eq!(page.anchor_href(&thumb), None);
    }

    #[test]
    fn removed_nodes_are_not_selectable() {
        let page = HeadlessPage::new();
        let popup = page.create_popup("popup", Some("preview")).expect("popup created");
        assert_eq!(page.select_by_id("popup"), Some(popup));
        assert_eq!(page.visibility(popup), Some(Visibility::Hidden));
        assert_eq!(page.class(popup).as_deref(), Some("preview"));

        page.remove(&popup);
        assert_eq!(page.select_by_id("popup"), None);
        assert!(!page.is_attached(popup));
        assert_eq!(page.offset(&popup), None);
    }

    #[test]
    fn dropped_subscription_stops_delivery() {
        let page = HeadlessPage::new();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let subscription = page.subscribe_pointer_move(
            "gallery",
            Box::new(move |_: &PointerEvent| counter.set(counter.get() + 1)),
        );

        page.dispatch_pointer_move(PointerEvent::at(1.0, 1.0));
        assert_eq!(page.listener_count("gallery"), 1);

        drop(subscription);
        page.dispatch_pointer_move(PointerEvent::at(1.0, 1.0));
        assert_eq!(calls.get(), 1);
        assert_eq!(page.listener_count("gallery"), 0);
    }

    #[test]
    fn preload_resolves_against_base_url() {
        let base = Url::parse("https://example.com/gallery/").expect("valid URL");
        let page = HeadlessPage::with_base_url(base);

        let image = page.preload_image("images/a.jpg").expect("path resolves");
        assert_eq!(image.src(), "https://example.com/gallery/images/a.jpg");
        assert_eq!(page.fetched_urls(), vec![image.src()]);
    }
}
