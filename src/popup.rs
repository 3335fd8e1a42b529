use crate::config::GalleryConfig;
use crate::dom::Environment;
use crate::error::GalleryError;
use crate::positioning::PositionStrategy;
use std::time::Duration;

/// Owns the one popup element of a gallery and which thumbnail it shows.
pub struct PopupController<E: Environment> {
    id: String,
    class: Option<String>,
    skip_create: bool,
    skip_close: bool,
    fade: Duration,
    current: Option<E::Element>,
}

impl<E: Environment> PopupController<E> {
    pub fn new(config: &GalleryConfig) -> Self {
        Self {
            id: config.popup_id.clone(),
            class: config.popup_class.clone(),
            skip_create: config.skip_popup_creation,
            skip_close: config.skip_popup_close,
            fade: config.fade,
            current: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn current(&self) -> Option<&E::Element> {
        self.current.as_ref()
    }

    pub fn select(&self, env: &E) -> Option<E::Element> {
        env.select_by_id(&self.id)
    }

    /// Returns whether an element was created.
    pub fn create(&self, env: &E) -> Result<bool, GalleryError> {
        if self.skip_create {
            return Ok(false);
        }

        if self.select(env).is_some() {
            return Err(GalleryError::DuplicatePopup(self.id.clone()));
        }

        env.create_popup(&self.id, self.class.as_deref())?;
        Ok(true)
    }

    /// Shows `content` for `thumbnail`. The current thumbnail is recorded
    /// even when the popup element is missing from the page.
    pub fn open(
        &mut self,
        env: &E,
        thumbnail: &E::Element,
        content: &str,
        strategy: &dyn PositionStrategy<E>,
    ) {
        self.current = Some(thumbnail.clone());

        let Some(popup) = self.select(env) else {
            return;
        };

        env.set_content(&popup, content);
        if let Some(at) = strategy.place(env, &popup, thumbnail) {
            env.move_to(&popup, at);
        }
        env.show(&popup, self.fade);
    }

    /// Returns whether a thumbnail was showing before the call.
    pub fn close(&mut self, env: &E) -> bool {
        if self.skip_close {
            return false;
        }

        let was_open = self.current.take().is_some();
        if let Some(popup) = self.select(env) {
            env.set_content(&popup, "");
            env.hide(&popup);
        }
        was_open
    }

    pub fn remove(&mut self, env: &E) {
        self.current = None;
        if let Some(popup) = self.select(env) {
            env.remove(&popup);
        }
    }
}
