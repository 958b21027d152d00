//! Overlay container placement
//!
//! The element the GL surface renders into lives in one of the host's panes
//! and is moved and sized in layer-point space on every synchronization pass.

use crate::{
    core::{
        constants::{CONTAINER_CLASS, DEFAULT_PANE},
        geo::Point,
    },
    traits::{DomElement, HostView},
};

/// Owns the element hosting the GL surface and keeps it placed in the
/// host's layer space. Independent of the renderer's own canvas sizing.
#[derive(Debug, Clone)]
pub struct OverlayContainer<E: DomElement> {
    element: Option<E>,
    /// Pane the element is currently inserted into
    pane: Option<String>,
    size: Option<Point>,
    position: Option<Point>,
}

impl<E: DomElement> Default for OverlayContainer<E> {
    fn default() -> Self {
        Self {
            element: None,
            pane: None,
            size: None,
            position: None,
        }
    }
}

impl<E: DomElement> OverlayContainer<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(&self) -> Option<&E> {
        self.element.as_ref()
    }

    pub fn is_attached(&self) -> bool {
        self.pane.is_some()
    }

    pub fn pane(&self) -> Option<&str> {
        self.pane.as_deref()
    }

    /// Last size written to the element
    pub fn size(&self) -> Option<Point> {
        self.size
    }

    /// Last layer position written to the element
    pub fn position(&self) -> Option<Point> {
        self.position
    }

    /// The requested pane if the host has it, the default pane otherwise
    pub fn resolve_pane<H: HostView + ?Sized>(host: &H, requested: &str) -> String {
        if host.has_pane(requested) {
            requested.to_string()
        } else {
            log::warn!("pane {requested:?} does not exist, using {DEFAULT_PANE:?}");
            DEFAULT_PANE.to_string()
        }
    }

    /// Inserts the element into the host, creating it on first use.
    /// Does nothing when already attached.
    pub fn attach<H: HostView<Element = E>>(&mut self, host: &mut H, requested_pane: &str) -> bool {
        if self.is_attached() {
            log::debug!("overlay container already attached");
            return false;
        }

        let pane = Self::resolve_pane(&*host, requested_pane);
        let element = self
            .element
            .get_or_insert_with(|| host.create_element(CONTAINER_CLASS));
        host.append_to_pane(&pane, element);
        self.pane = Some(pane);
        true
    }

    /// Takes the element out of its pane. The GL surface must already be gone.
    pub fn detach<H: HostView<Element = E>>(&mut self, host: &mut H) {
        if let (Some(pane), Some(element)) = (self.pane.take(), self.element.as_ref()) {
            host.remove_from_pane(&pane, element);
        }
    }

    pub fn set_position(&mut self, top_left: Point) {
        if let Some(element) = &self.element {
            element.set_position(top_left);
            self.position = Some(top_left);
        }
    }

    pub fn set_size(&mut self, size: Point) {
        if let Some(element) = &self.element {
            element.set_size(size);
            self.size = Some(size);
        }
    }
}
