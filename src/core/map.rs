//! An in-memory host map
//!
//! Holds a [`Viewport`], the standard Leaflet panes and the layer's event
//! subscriptions. View changes queue the same event sequences a Leaflet map
//! fires; the application drains them and forwards them to the layer.

use std::collections::VecDeque;

use crate::{
    core::{
        geo::{LatLng, LatLngBounds, Point},
        viewport::Viewport,
    },
    input::events::{HostEvent, HostEventKind},
    prelude::{HashMap, HashSet},
    rendering::headless::HeadlessElement,
    traits::{DomElement, HostProjection, HostView},
};

/// Panes every Leaflet map creates
pub const PANES: [&str; 7] = [
    "mapPane",
    "tilePane",
    "overlayPane",
    "shadowPane",
    "markerPane",
    "tooltipPane",
    "popupPane",
];

#[derive(Debug, Clone)]
pub struct HeadlessMap {
    viewport: Viewport,
    zoom_animation: bool,
    panes: HashMap<String, Vec<u64>>,
    subscriptions: HashSet<HostEventKind>,
    events: VecDeque<HostEvent>,
    /// Target of a running CSS zoom
    zoom_target: Option<(LatLng, f64)>,
    next_element_id: u64,
}

impl HeadlessMap {
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            viewport: Viewport::new(center, zoom, size),
            zoom_animation: true,
            panes: PANES
                .iter()
                .map(|name| (name.to_string(), Vec::new()))
                .collect(),
            subscriptions: HashSet::default(),
            events: VecDeque::new(),
            zoom_target: None,
            next_element_id: 1,
        }
    }

    /// Turns CSS zoom animation on or off (on by default)
    pub fn with_zoom_animation(mut self, enabled: bool) -> Self {
        self.zoom_animation = enabled;
        self
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Ids of the elements inside a pane, in insertion order
    pub fn pane_children(&self, pane: &str) -> Vec<u64> {
        self.panes.get(pane).cloned().unwrap_or_default()
    }

    pub fn add_pane(&mut self, name: impl Into<String>) {
        self.panes.entry(name.into()).or_default();
    }

    pub fn is_subscribed(&self, kind: HostEventKind) -> bool {
        self.subscriptions.contains(&kind)
    }

    /// Queued events, oldest first
    pub fn drain_events(&mut self) -> Vec<HostEvent> {
        self.events.drain(..).collect()
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Drag the map by a pixel offset
    pub fn pan_by(&mut self, offset: Point) {
        self.viewport.pan_by(offset);
        self.emit(HostEvent::Move);
    }

    /// Zoom around the current center without animation, as a pinch or wheel
    /// gesture ends up doing
    pub fn set_zoom(&mut self, zoom: f64) {
        let center = self.viewport.center();
        HostView::set_view(self, center, zoom);
    }

    /// Starts an animated (CSS-transitioned) zoom towards `center`/`zoom`.
    /// Without zoom animation this is a plain [`HostView::set_view`].
    pub fn animate_zoom(&mut self, center: LatLng, zoom: f64) {
        if !self.zoom_animation {
            HostView::set_view(self, center, zoom);
            return;
        }

        self.zoom_target = Some((center, zoom));
        self.emit(HostEvent::ZoomStart);
        self.emit(HostEvent::ZoomAnim { center, zoom });
    }

    /// Completes a zoom started with [`HeadlessMap::animate_zoom`]: the view
    /// lands on the target and the CSS transition reports its end
    pub fn end_zoom_animation(&mut self) -> bool {
        let Some((center, zoom)) = self.zoom_target.take() else {
            return false;
        };

        self.viewport.set_view(center, zoom);
        self.emit(HostEvent::Zoom);
        self.emit(HostEvent::Move);
        self.emit(HostEvent::ZoomEnd);
        self.emit(HostEvent::TransitionEnd);
        true
    }

    /// Changes the container size, keeping the center in place
    pub fn resize(&mut self, size: Point) {
        if size == self.viewport.size() {
            return;
        }

        self.viewport.set_size(size);
        self.emit(HostEvent::Move);
        self.emit(HostEvent::Resize);
    }

    fn emit(&mut self, event: HostEvent) {
        if self.subscriptions.contains(&event.kind()) {
            self.events.push_back(event);
        }
    }
}

impl HostProjection for HeadlessMap {
    fn center(&self) -> LatLng {
        self.viewport.center()
    }

    fn zoom(&self) -> f64 {
        self.viewport.zoom()
    }

    fn size(&self) -> Point {
        self.viewport.size()
    }

    fn map_pane_pos(&self) -> Point {
        self.viewport.map_pane_pos()
    }

    fn container_point_to_layer_point(&self, point: Point) -> Point {
        self.viewport.container_point_to_layer_point(point)
    }

    fn lat_lng_to_container_point(&self, lat_lng: LatLng) -> Point {
        HostProjection::lat_lng_to_container_point(&self.viewport, lat_lng)
    }

    fn container_point_to_lat_lng(&self, point: Point) -> LatLng {
        HostProjection::container_point_to_lat_lng(&self.viewport, point)
    }

    fn project(&self, lat_lng: LatLng, zoom: f64) -> Point {
        self.viewport.project(&lat_lng, zoom)
    }

    fn zoom_scale(&self, to_zoom: f64, from_zoom: f64) -> f64 {
        HostProjection::zoom_scale(&self.viewport, to_zoom, from_zoom)
    }

    fn bounds(&self) -> LatLngBounds {
        self.viewport.bounds()
    }
}

impl HostView for HeadlessMap {
    type Element = HeadlessElement;

    fn zoom_animation(&self) -> bool {
        self.zoom_animation
    }

    fn has_pane(&self, name: &str) -> bool {
        self.panes.contains_key(name)
    }

    fn create_element(&mut self, class_name: &str) -> HeadlessElement {
        let element = HeadlessElement::new(self.next_element_id);
        self.next_element_id += 1;
        element.add_class(class_name);
        element
    }

    fn append_to_pane(&mut self, pane: &str, element: &HeadlessElement) {
        if let Some(children) = self.panes.get_mut(pane) {
            children.push(element.id());
        }
    }

    fn remove_from_pane(&mut self, pane: &str, element: &HeadlessElement) {
        if let Some(children) = self.panes.get_mut(pane) {
            children.retain(|id| *id != element.id());
        }
    }

    fn on(&mut self, kinds: &[HostEventKind]) {
        self.subscriptions.extend(kinds.iter().copied());
    }

    fn off(&mut self, kinds: &[HostEventKind]) {
        for kind in kinds {
            self.subscriptions.remove(kind);
        }
    }

    /// Jumps to a view, firing `ZoomStart, Zoom, Move, ZoomEnd` when the zoom
    /// changes and a lone `Move` otherwise
    fn set_view(&mut self, center: LatLng, zoom: f64) {
        let zoom_changed = zoom != self.viewport.zoom();
        self.viewport.set_view(center, zoom);

        if zoom_changed {
            self.emit(HostEvent::ZoomStart);
            self.emit(HostEvent::Zoom);
        }
        self.emit(HostEvent::Move);
        if zoom_changed {
            self.emit(HostEvent::ZoomEnd);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subscribed() -> HeadlessMap {
        let mut map = HeadlessMap::new(LatLng::new(0.0, 0.0), 3.0, Point::new(800.0, 600.0));
        map.on(&[
            HostEventKind::Move,
            HostEventKind::Zoom,
            HostEventKind::ZoomStart,
            HostEventKind::ZoomEnd,
            HostEventKind::ZoomAnim,
            HostEventKind::Resize,
            HostEventKind::TransitionEnd,
        ]);
        map
    }

    #[test]
    fn test_unsubscribed_events_are_not_queued() {
        let mut map = HeadlessMap::new(LatLng::new(0.0, 0.0), 3.0, Point::new(800.0, 600.0));
        map.pan_by(Point::new(10.0, 0.0));
        assert!(!map.has_pending_events());

        map.on(&[HostEventKind::Move]);
        map.pan_by(Point::new(10.0, 0.0));
        assert_eq!(map.drain_events(), vec![HostEvent::Move]);

        map.off(&[HostEventKind::Move]);
        assert!(!map.is_subscribed(HostEventKind::Move));
    }

    #[test]
    fn test_set_view_sequences() {
        let mut map = subscribed();

        map.set_view(LatLng::new(1.0, 1.0), 3.0);
        assert_eq!(map.drain_events(), vec![HostEvent::Move]);

        map.set_zoom(4.0);
        assert_eq!(
            map.drain_events(),
            vec![
                HostEvent::ZoomStart,
                HostEvent::Zoom,
                HostEvent::Move,
                HostEvent::ZoomEnd
            ]
        );
        assert_eq!(map.zoom(), 4.0);
    }

    #[test]
    fn test_animated_zoom_sequence() {
        let mut map = subscribed();
        let target = LatLng::new(2.0, 3.0);

        map.animate_zoom(target, 5.0);
        assert_eq!(
            map.drain_events(),
            vec![
                HostEvent::ZoomStart,
                HostEvent::ZoomAnim {
                    center: target,
                    zoom: 5.0
                }
            ]
        );
        assert_eq!(map.zoom(), 3.0);

        assert!(map.end_zoom_animation());
        assert_eq!(map.drain_events().last(), Some(&HostEvent::TransitionEnd));
        assert_eq!(map.zoom(), 5.0);
        assert!(!map.end_zoom_animation());
    }

    #[test]
    fn test_resize_sequence() {
        let mut map = subscribed();
        map.resize(Point::new(800.0, 600.0));
        assert!(!map.has_pending_events());

        map.resize(Point::new(1000.0, 600.0));
        assert_eq!(map.drain_events(), vec![HostEvent::Move, HostEvent::Resize]);
        assert_eq!(map.size(), Point::new(1000.0, 600.0));
    }

    #[test]
    fn test_panes() {
        let mut map = subscribed();
        assert!(map.has_pane("tilePane"));
        assert!(!map.has_pane("glPane"));

        map.add_pane("glPane");
        let element = map.create_element("x");
        map.append_to_pane("glPane", &element);
        assert_eq!(map.pane_children("glPane"), vec![element.id()]);

        map.remove_from_pane("glPane", &element);
        assert!(map.pane_children("glPane").is_empty());
    }
}
