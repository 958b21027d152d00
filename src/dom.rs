//! Browser DOM backend
//!
//! Positions and transforms are written the way Leaflet writes them, as a
//! `translate3d` (plus `scale`) CSS transform, so the overlay composites on
//! the GPU together with the host's panes.

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use crate::{
    core::{constants::CONTAINER_CLASS, geo::Point, viewport::CanvasTransform},
    traits::DomElement,
    MapError, Result,
};

fn translate3d(point: Point) -> String {
    format!("translate3d({}px,{}px,0)", point.x, point.y)
}

fn set_style(element: &HtmlElement, property: &str, value: &str) {
    if let Err(e) = element.style().set_property(property, value) {
        log::warn!("failed to set {property}: {e:?}");
    }
}

impl DomElement for HtmlElement {
    fn set_position(&self, point: Point) {
        set_style(self, "transform", &translate3d(point));
    }

    fn set_size(&self, size: Point) {
        set_style(self, "width", &format!("{}px", size.x));
        set_style(self, "height", &format!("{}px", size.y));
    }

    fn set_transform(&self, transform: CanvasTransform) {
        let value = format!(
            "{} scale({})",
            translate3d(transform.translate),
            transform.scale
        );
        set_style(self, "transform", &value);
    }

    fn add_class(&self, class_name: &str) {
        if let Err(e) = self.class_list().add_1(class_name) {
            log::warn!("failed to add class {class_name}: {e:?}");
        }
    }
}

/// Creates the `div` the GL surface renders into
pub fn create_container(document: &Document) -> Result<HtmlElement> {
    let element = document
        .create_element("div")
        .map_err(|e| MapError::Surface(format!("failed to create container: {e:?}")))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| MapError::Surface("container is not an HTML element".into()))?;

    element.set_class_name(CONTAINER_CLASS);
    Ok(element)
}
