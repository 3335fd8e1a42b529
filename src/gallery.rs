use crate::cache::ImageCache;
use crate::config::{GalleryConfig, GalleryOptions};
use crate::dom::{Environment, PointerEvent, PointerHandler};
use crate::error::GalleryError;
use crate::hit_test::{self, Bounds};
use crate::logging::Logger;
use crate::popup::PopupController;
use crate::positioning::{PositionStrategy, StrategyRegistry};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

/// Maps a thumbnail to the image path it previews.
pub type ImageRule<E> = Box<dyn Fn(&E, &<E as Environment>::Element) -> Option<String>>;

/// Extra condition on top of geometric containment.
pub type ContainmentRule = Box<dyn Fn(&PointerEvent) -> bool>;

/// Default image rule: the `href` of the first anchor in the thumbnail.
pub fn anchor_image<E: Environment>(env: &E, thumbnail: &E::Element) -> Option<String> {
    env.anchor_href(thumbnail)
}

pub struct GalleryBuilder<E: Environment> {
    env: E,
    thumbnails: Vec<E::Element>,
    options: GalleryOptions,
    image_rule: Option<ImageRule<E>>,
    containment_rule: Option<ContainmentRule>,
    strategies: StrategyRegistry<E>,
}

impl<E: Environment + 'static> GalleryBuilder<E> {
    pub fn image_rule(
        mut self,
        rule: impl Fn(&E, &E::Element) -> Option<String> + 'static,
    ) -> Self {
        self.image_rule = Some(Box::new(rule));
        self
    }

    pub fn containment_rule(mut self, rule: impl Fn(&PointerEvent) -> bool + 'static) -> Self {
        self.containment_rule = Some(Box::new(rule));
        self
    }

    /// Registers an extra positioning strategy selectable by `name`.
    pub fn strategy(mut self, name: impl Into<String>, strategy: impl PositionStrategy<E> + 'static) -> Self {
        self.strategies.register(name, strategy);
        self
    }

    /// Creates the popup, pre-fetches images, starts listening for pointer
    /// moves and opens the initial thumbnail if there is one.
    pub fn build(self) -> Result<Rc<RefCell<HoverGallery<E>>>, GalleryError> {
        let config = GalleryConfig::from_options(self.options);
        let mut registry = StrategyRegistry::with_builtins(config.relative_offset);
        registry.extend(self.strategies);
        let strategy = registry.resolve(&config.positioning)?;
        let log = Logger::new(config.log_level, config.popup_id.clone());

        let mut gallery = HoverGallery {
            env: self.env,
            popup: PopupController::new(&config),
            config,
            thumbnails: self.thumbnails,
            registry,
            strategy,
            image_rule: self.image_rule.unwrap_or_else(|| Box::new(anchor_image::<E>)),
            containment_rule: self.containment_rule.unwrap_or_else(|| Box::new(|_: &PointerEvent| true)),
            image_cache: ImageCache::default(),
            subscription: None,
            log,
        };

        gallery.create_popup()?;
        gallery.load_image_cache();

        let gallery = Rc::new(RefCell::new(gallery));
        let weak = Rc::downgrade(&gallery);
        let handler: PointerHandler = Box::new(move |event: &PointerEvent| {
            if let Some(gallery) = weak.upgrade() {
                if let Ok(mut gallery) = gallery.try_borrow_mut() {
                    gallery.on_pointer_move(event);
                }
            }
        });

        {
            let mut inner = gallery.borrow_mut();
            let subscription = inner
                .env
                .subscribe_pointer_move(&inner.config.popup_id, handler);
            inner.subscription = Some(subscription);

            inner.log.info(
                "gallery.created",
                json!({
                    "thumbnails": inner.thumbnails.len(),
                    "positioning": inner.config.positioning,
                }),
            );

            if let Some(thumbnail) = inner.initial_thumbnail() {
                inner.open_popup(&thumbnail);
            }
        }

        Ok(gallery)
    }
}

/// Hover preview over a fixed set of thumbnails.
pub struct HoverGallery<E: Environment> {
    env: E,
    config: GalleryConfig,
    thumbnails: Vec<E::Element>,
    popup: PopupController<E>,
    registry: StrategyRegistry<E>,
    strategy: Rc<dyn PositionStrategy<E>>,
    image_rule: ImageRule<E>,
    containment_rule: ContainmentRule,
    image_cache: ImageCache<E::Image>,
    subscription: Option<E::Subscription>,
    log: Logger,
}

impl<E: Environment + 'static> HoverGallery<E> {
    /// Builds a gallery with the default image and containment rules.
    pub fn new(
        env: E,
        thumbnails: Vec<E::Element>,
        options: GalleryOptions,
    ) -> Result<Rc<RefCell<Self>>, GalleryError> {
        Self::builder(env, thumbnails, options).build()
    }

    pub fn builder(env: E, thumbnails: Vec<E::Element>, options: GalleryOptions) -> GalleryBuilder<E> {
        GalleryBuilder {
            env,
            thumbnails,
            options,
            image_rule: None,
            containment_rule: None,
            strategies: StrategyRegistry::empty(),
        }
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn thumbnails(&self) -> &[E::Element] {
        &self.thumbnails
    }

    pub fn current_thumbnail(&self) -> Option<&E::Element> {
        self.popup.current()
    }

    pub fn image_cache(&self) -> &ImageCache<E::Image> {
        &self.image_cache
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Switches the active positioning strategy.
    pub fn set_positioning(&mut self, name: &str) -> Result<(), GalleryError> {
        self.strategy = self.registry.resolve(name)?;
        self.config.positioning = name.to_string();
        Ok(())
    }

    pub fn create_popup(&mut self) -> Result<(), GalleryError> {
        if self.popup.create(&self.env)? {
            self.log.info("popup.created", json!({ "id": self.popup.id() }));
        }
        Ok(())
    }

    /// Shows the popup for `thumbnail`. Does nothing at all when no image
    /// path can be resolved for it.
    pub fn open_popup(&mut self, thumbnail: &E::Element) {
        let Some(path) = self.image_from_thumbnail(thumbnail) else {
            self.log.debug("popup.open_skipped", json!({ "reason": "no image path" }));
            return;
        };

        let content = self.config.render_popup(&path);
        self.popup
            .open(&self.env, thumbnail, &content, self.strategy.as_ref());
        self.log.debug(
            "popup.opened",
            json!({
                "path": path,
                "index": self.thumbnails.iter().position(|candidate| candidate == thumbnail),
            }),
        );
    }

    pub fn close_popup(&mut self) {
        if self.popup.close(&self.env) {
            self.log.debug("popup.closed", json!({}));
        }
    }

    pub fn select_popup(&self) -> Option<E::Element> {
        self.popup.select(&self.env)
    }

    pub fn element_coords(&self, thumbnail: &E::Element) -> Option<Bounds> {
        hit_test::element_bounds(&self.env, thumbnail)
    }

    pub fn is_position_in_element(&self, y: f64, x: f64, thumbnail: &E::Element) -> bool {
        hit_test::is_position_in_element(&self.env, y, x, thumbnail)
    }

    pub fn thumbnail_by_coords(&self, y: f64, x: f64) -> Option<E::Element> {
        hit_test::element_at(&self.env, &self.thumbnails, y, x).cloned()
    }

    pub fn image_from_thumbnail(&self, thumbnail: &E::Element) -> Option<String> {
        (self.image_rule)(&self.env, thumbnail)
    }

    pub fn is_over_thumbnail(&self, event: &PointerEvent) -> bool {
        (self.containment_rule)(event)
    }

    pub fn on_pointer_move(&mut self, event: &PointerEvent) {
        let hovered = self
            .thumbnail_by_coords(event.page_y, event.page_x)
            .filter(|_| self.is_over_thumbnail(event));

        match hovered {
            Some(thumbnail) if self.popup.current() == Some(&thumbnail) => {}
            Some(thumbnail) => self.open_popup(&thumbnail),
            None => self.close_popup(),
        }
    }

    /// Starts a background fetch for every thumbnail image, replacing any
    /// earlier cache.
    pub fn load_image_cache(&mut self) {
        self.image_cache.clear();

        for (index, thumbnail) in self.thumbnails.iter().enumerate() {
            let Some(path) = (self.image_rule)(&self.env, thumbnail) else {
                continue;
            };
            let handle = self.env.preload_image(&path);
            self.image_cache.insert(index, path, handle);
        }

        self.log.info("cache.loaded", json!({ "images": self.image_cache.len() }));
    }

    /// Removes the popup, stops listening for pointer moves and forgets the
    /// thumbnails.
    pub fn destroy(&mut self) {
        self.popup.remove(&self.env);
        self.subscription.take();
        self.thumbnails.clear();
        self.image_cache.clear();
        self.log.info("gallery.destroyed", json!({}));
    }

    fn initial_thumbnail(&self) -> Option<E::Element> {
        self.config
            .initial_index
            .and_then(|index| self.thumbnails.get(index))
            .cloned()
    }
}
