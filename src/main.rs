#[cfg(target_arch = "wasm32")]
mod frontend;

#[cfg(not(target_arch = "wasm32"))]
mod replay {
    use hover_gallery::headless::HeadlessPage;
    use hover_gallery::{GalleryError, GalleryOptions, HoverGallery, Point, PointerEvent, Size};

    const OPTIONS_ENV: &str = "HOVER_GALLERY_OPTIONS";
    const THUMBNAILS: [&str; 3] = ["images/barbarian.jpg", "images/knight.jpg", "images/wizard.jpg"];
    const POINTER_PATH: [(f64, f64); 6] = [
        (200.0, 200.0),
        (20.0, 20.0),
        (30.0, 25.0),
        (130.0, 40.0),
        (230.0, 10.0),
        (600.0, 400.0),
    ];

    fn parse_env_non_empty_string(name: &str) -> Option<String> {
        std::env::var(name)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn options_from_env() -> Result<GalleryOptions, GalleryError> {
        match parse_env_non_empty_string(OPTIONS_ENV) {
            Some(raw) => GalleryOptions::from_json(&raw),
            None => Ok(GalleryOptions::default()),
        }
    }

    /// Builds a three-thumbnail page and replays a fixed pointer path over it.
    pub fn run() -> Result<(), GalleryError> {
        let page = HeadlessPage::new();
        let thumbnails = THUMBNAILS
            .iter()
            .enumerate()
            .map(|(index, image)| {
                page.append_thumbnail(
                    &format!(r#"<a href="{image}"><img src="thumbs/{index}.jpg"></a>"#),
                    Point::new(0.0, index as f64 * 100.0),
                    Size::new(80.0, 60.0),
                )
            })
            .collect();

        let gallery = HoverGallery::new(page.clone(), thumbnails, options_from_env()?)?;
        for (page_x, page_y) in POINTER_PATH {
            page.dispatch_pointer_move(PointerEvent::at(page_x, page_y));
        }
        gallery.borrow_mut().destroy();

        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = replay::run() {
        eprintln!("hover gallery replay failed: {err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    frontend::run();
}
