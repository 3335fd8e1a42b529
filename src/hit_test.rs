use crate::dom::Environment;

/// Absolute bounding box of a rendered element, in page coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl Bounds {
    /// Inclusive on every edge. `y` is checked against top/bottom and `x`
    /// against left/right.
    pub fn contains(&self, y: f64, x: f64) -> bool {
        let fits_x = x >= self.left && x <= self.right;
        let fits_y = y >= self.top && y <= self.bottom;
        fits_x && fits_y
    }
}

pub fn element_bounds<E: Environment>(env: &E, element: &E::Element) -> Option<Bounds> {
    let offset = env.offset(element)?;
    let size = env.size(element);

    Some(Bounds {
        top: offset.top,
        left: offset.left,
        bottom: offset.top + size.height,
        right: offset.left + size.width,
    })
}

pub fn is_position_in_element<E: Environment>(env: &E, y: f64, x: f64, element: &E::Element) -> bool {
    element_bounds(env, element).is_some_and(|bounds| bounds.contains(y, x))
}

/// First element, in slice order, whose box contains `(y, x)`.
pub fn element_at<'a, E: Environment>(
    env: &E,
    elements: &'a [E::Element],
    y: f64,
    x: f64,
) -> Option<&'a E::Element> {
    elements
        .iter()
        .find(|element| is_position_in_element(env, y, x, element))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Point, Size};
    use crate::headless::HeadlessPage;

    fn page_with_row() -> (HeadlessPage, Vec<crate::headless::NodeId>) {
        let page = HeadlessPage::new();
        let thumbs = (0..3)
            .map(|index| {
                page.append_thumbnail(
                    &format!(r#"<a href="images/{index}.jpg"></a>"#),
                    Point::new(0.0, f64::from(index) * 100.0),
                    Size::new(80.0, 60.0),
                )
            })
            .collect();
        (page, thumbs)
    }

    #[test]
    fn bounds_come_from_offset_and_size() {
        let page = HeadlessPage::new();
        let thumb = page.append_thumbnail("", Point::new(10.0, 20.0), Size::new(80.0, 60.0));

        assert_eq!(
            element_bounds(&page, &thumb),
            Some(Bounds {
                top: 10.0,
                left: 20.0,
                bottom: 70.0,
                right: 100.0,
            })
        );
    }

    #[test]
    fn edges_are_inclusive() {
        let bounds = Bounds {
            top: 0.0,
            left: 0.0,
            bottom: 60.0,
            right: 80.0,
        };

        assert!(bounds.contains(0.0, 0.0));
        assert!(bounds.contains(60.0, 80.0));
        assert!(!bounds.contains(60.5, 80.0));
        assert!(!bounds.contains(60.0, 80.5));
    }

    #[test]
    fn lookup_finds_containing_thumbnail() {
        let (page, thumbs) = page_with_row();

        assert_eq!(element_at(&page, &thumbs, 25.0, 30.0), Some(&thumbs[0]));
        assert_eq!(element_at(&page, &thumbs, 25.0, 130.0), Some(&thumbs[1]));
        assert_eq!(element_at(&page, &thumbs, 200.0, 200.0), None);
    }

    #[test]
    fn y_is_never_compared_against_horizontal_edges() {
        let page = HeadlessPage::new();
        let wide = page.append_thumbnail("", Point::default(), Size::new(80.0, 30.0));

        assert!(is_position_in_element(&page, 20.0, 60.0, &wide));
        assert!(!is_position_in_element(&page, 60.0, 20.0, &wide));
    }

    #[test]
    fn overlapping_boxes_resolve_to_first_in_order() {
        let page = HeadlessPage::new();
        let first = page.append_thumbnail("", Point::default(), Size::new(100.0, 100.0));
        let second = page.append_thumbnail("", Point::new(50.0, 50.0), Size::new(100.0, 100.0));
        let thumbs = [first, second];

        assert_eq!(element_at(&page, &thumbs, 75.0, 75.0), Some(&first));
    }

    #[test]
    fn empty_set_never_matches() {
        let page = HeadlessPage::new();

        assert_eq!(element_at(&page, &[], 0.0, 0.0), None);
    }

    #[test]
    fn detached_thumbnail_has_no_bounds() {
        let page = HeadlessPage::new();
        let thumb = page.append_thumbnail("", Point::default(), Size::new(10.0, 10.0));
        page.remove(&thumb);

        assert_eq!(element_bounds(&page, &thumb), None);
    }
}
