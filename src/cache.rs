use crate::dom::ImageHandle;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
pub struct CachedImage<I> {
    pub path: String,
    /// `None` when the environment could not start a fetch for `path`.
    pub handle: Option<I>,
}

impl<I: ImageHandle> CachedImage<I> {
    /// Resolved URL, or the raw path when no fetch was started.
    pub fn url(&self) -> String {
        self.handle
            .as_ref()
            .map_or_else(|| self.path.clone(), ImageHandle::src)
    }
}

/// Pre-fetched images keyed by thumbnail index. Thumbnails without an image
/// path have no entry, so `len` counts resolvable paths, not thumbnails.
#[derive(Clone, Debug)]
pub struct ImageCache<I> {
    entries: BTreeMap<usize, CachedImage<I>>,
}

impl<I> Default for ImageCache<I> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<I: ImageHandle> ImageCache<I> {
    pub fn insert(&mut self, index: usize, path: String, handle: Option<I>) {
        self.entries.insert(index, CachedImage { path, handle });
    }

    pub fn get(&self, index: usize) -> Option<&CachedImage<I>> {
        self.entries.get(&index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &CachedImage<I>)> {
        self.entries.iter().map(|(index, entry)| (*index, entry))
    }

    /// Resolved URLs in thumbnail order.
    pub fn urls(&self) -> Vec<String> {
        self.entries.values().map(CachedImage::url).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Environment;
    use crate::headless::HeadlessPage;

    #[test]
    fn sparse_indices_are_kept_aligned() {
        let page = HeadlessPage::new();
        let mut cache = ImageCache::default();
        for (index, path) in [(0, "a.jpg"), (2, "c.jpg")] {
            cache.insert(index, path.to_string(), page.preload_image(path));
        }

        assert_eq!(cache.len(), 2);
        assert!(cache.get(1).is_none());
        assert_eq!(cache.get(2).map(|entry| entry.path.as_str()), Some("c.jpg"));
        assert_eq!(
            cache.urls(),
            vec!["http://localhost/a.jpg".to_string(), "http://localhost/c.jpg".to_string()]
        );
        assert_eq!(cache.iter().map(|(index, _)| index).collect::<Vec<_>>(), vec![0, 2]);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn entry_without_fetch_reports_raw_path() {
        let mut cache = ImageCache::<crate::headless::PreloadedImage>::default();
        cache.insert(0, "http://[::1".to_string(), None);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.urls(), vec!["http://[::1".to_string()]);
    }
}
