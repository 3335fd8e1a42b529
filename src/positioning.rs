use crate::dom::{Environment, Point};
use crate::error::GalleryError;
use std::collections::HashMap;
use std::rc::Rc;

pub const CENTER_OF_SCREEN: &str = "center-of-screen";
pub const RELATIVE_TO_THUMBNAIL: &str = "relative-to-thumbnail";
pub const THUMBNAIL_CENTER: &str = "thumbnail-center";
pub const STATIC: &str = "static";

/// Decides where an opened popup goes. Returning `None` leaves it where it
/// is.
pub trait PositionStrategy<E: Environment> {
    fn place(&self, env: &E, popup: &E::Element, thumbnail: &E::Element) -> Option<Point>;
}

impl<E, F> PositionStrategy<E> for F
where
    E: Environment,
    F: Fn(&E, &E::Element, &E::Element) -> Option<Point>,
{
    fn place(&self, env: &E, popup: &E::Element, thumbnail: &E::Element) -> Option<Point> {
        self(env, popup, thumbnail)
    }
}

pub struct ScreenCenter;

impl<E: Environment> PositionStrategy<E> for ScreenCenter {
    fn place(&self, env: &E, popup: &E::Element, _thumbnail: &E::Element) -> Option<Point> {
        let viewport = env.viewport();
        let size = env.size(popup);

        Some(Point::new(
            (viewport.height - size.height) / 2.0,
            (viewport.width - size.width) / 2.0,
        ))
    }
}

/// Thumbnail position plus a fixed offset.
pub struct RelativeToThumbnail {
    pub offset: Point,
}

impl<E: Environment> PositionStrategy<E> for RelativeToThumbnail {
    fn place(&self, env: &E, _popup: &E::Element, thumbnail: &E::Element) -> Option<Point> {
        env.position(thumbnail).map(|position| position.offset_by(self.offset))
    }
}

/// Thumbnail position plus half its rendered size.
pub struct ThumbnailCenter;

impl<E: Environment> PositionStrategy<E> for ThumbnailCenter {
    fn place(&self, env: &E, _popup: &E::Element, thumbnail: &E::Element) -> Option<Point> {
        let size = env.size(thumbnail);
        env.position(thumbnail)
            .map(|position| position.offset_by(Point::new(size.height / 2.0, size.width / 2.0)))
    }
}

pub struct Static;

impl<E: Environment> PositionStrategy<E> for Static {
    fn place(&self, _env: &E, _popup: &E::Element, _thumbnail: &E::Element) -> Option<Point> {
        None
    }
}

/// Named positioning strategies. Open for registration.
pub struct StrategyRegistry<E: Environment> {
    strategies: HashMap<String, Rc<dyn PositionStrategy<E>>>,
}

impl<E: Environment + 'static> StrategyRegistry<E> {
    pub fn empty() -> Self {
        Self {
            strategies: HashMap::new(),
        }
    }

    pub fn with_builtins(relative_offset: Point) -> Self {
        let mut registry = Self::empty();
        registry.register(CENTER_OF_SCREEN, ScreenCenter);
        registry.register(RELATIVE_TO_THUMBNAIL, RelativeToThumbnail { offset: relative_offset });
        registry.register(THUMBNAIL_CENTER, ThumbnailCenter);
        registry.register(STATIC, Static);
        registry
    }

    /// Adds or replaces the strategy under `name`.
    pub fn register(&mut self, name: impl Into<String>, strategy: impl PositionStrategy<E> + 'static) {
        self.strategies.insert(name.into(), Rc::new(strategy));
    }

    /// Moves every strategy of `other` into this registry, replacing
    /// same-named entries.
    pub fn extend(&mut self, other: StrategyRegistry<E>) {
        self.strategies.extend(other.strategies);
    }

    pub fn resolve(&self, name: &str) -> Result<Rc<dyn PositionStrategy<E>>, GalleryError> {
        self.strategies
            .get(name)
            .cloned()
            .ok_or_else(|| GalleryError::UnknownStrategy(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.strategies.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
