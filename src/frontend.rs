use hover_gallery::web::WebEnvironment;
use hover_gallery::{GalleryOptions, HoverGallery};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::window;
use yew::prelude::*;

const MOUNT_ID: &str = "app";
const GALLERY_OPTIONS_ATTRIBUTE: &str = "data-gallery-options";
const THUMBNAIL_SELECTOR: &str = ".hover-thumb";

struct GalleryItem {
    thumb: &'static str,
    full: &'static str,
    caption: &'static str,
}

const GALLERY_ITEMS: &[GalleryItem] = &[
    GalleryItem {
        thumb: "/thumbs/barbarian.jpg",
        full: "/images/barbarian.jpg",
        caption: "Barbarian",
    },
    GalleryItem {
        thumb: "/thumbs/knight.jpg",
        full: "/images/knight.jpg",
        caption: "Knight",
    },
    GalleryItem {
        thumb: "/thumbs/wizard.jpg",
        full: "/images/wizard.jpg",
        caption: "Wizard",
    },
];

type MountedGallery = Rc<RefCell<HoverGallery<WebEnvironment>>>;

fn mount_options() -> GalleryOptions {
    let raw = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(MOUNT_ID))
        .and_then(|mount| mount.get_attribute(GALLERY_OPTIONS_ATTRIBUTE));

    let Some(raw) = raw.filter(|value| !value.trim().is_empty()) else {
        return GalleryOptions::default();
    };

    GalleryOptions::from_json(&raw).unwrap_or_else(|err| {
        web_sys::console::warn_1(&format!("ignoring gallery options: {err}").into());
        GalleryOptions::default()
    })
}

fn mount_gallery() -> Option<MountedGallery> {
    let env = WebEnvironment::from_window()?;
    let thumbnails = env.query_all(THUMBNAIL_SELECTOR);

    match HoverGallery::new(env, thumbnails, mount_options()) {
        Ok(gallery) => Some(gallery),
        Err(err) => {
            web_sys::console::error_1(&format!("hover gallery failed to start: {err}").into());
            None
        }
    }
}

#[derive(Properties, PartialEq)]
struct ThumbnailProps {
    thumb: AttrValue,
    full: AttrValue,
    caption: AttrValue,
}

#[function_component(Thumbnail)]
fn thumbnail(props: &ThumbnailProps) -> Html {
    html! {
        <li class="hover-thumb">
            <a href={props.full.clone()} target="_blank" rel="noopener noreferrer">
                <img src={props.thumb.clone()} alt={props.caption.clone()} loading="lazy" />
            </a>
            <span class="muted">{props.caption.clone()}</span>
        </li>
    }
}

#[function_component(App)]
fn app() -> Html {
    use_effect_with((), move |_| {
        let gallery = mount_gallery();
        move || {
            if let Some(gallery) = gallery {
                gallery.borrow_mut().destroy();
            }
        }
    });

    html! {
        <div class="page-shell">
            <main id="content">
                <section aria-labelledby="gallery-heading" class="section-block">
                    <h2 id="gallery-heading">{"Gallery"}</h2>
                    <ul class="hover-gallery">
                        { for GALLERY_ITEMS.iter().map(|item| html! {
                            <Thumbnail
                                thumb={AttrValue::from(item.thumb)}
                                full={AttrValue::from(item.full)}
                                caption={AttrValue::from(item.caption)}
                            />
                        }) }
                    </ul>
                </section>
            </main>
        </div>
    }
}

pub fn run() {
    yew::Renderer::<App>::with_root(
        window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(MOUNT_ID))
            .expect("missing #app mount point"),
    )
    .render();
}
