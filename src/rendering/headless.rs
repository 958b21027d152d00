//! In-memory stand-ins for the DOM and the GL renderer
//!
//! Every handle is a cheap clone over shared state, the way DOM node and
//! renderer references behave in a browser, so a test can keep one clone and
//! watch what the layer does with the other.

use std::{cell::RefCell, rc::Rc};

use futures::channel::oneshot;
use serde_json::Value;

use crate::{
    core::{
        geo::{LngLat, Point},
        viewport::CanvasTransform,
    },
    input::events::SurfaceEventKind,
    layers::surface::SurfaceOptions,
    prelude::HashSet,
    sync::mapper::SurfaceCamera,
    traits::{DomElement, GlSurface, GlSurfaceFactory, RenderPrimitive},
    MapError, Result,
};

#[derive(Debug, Default)]
struct ElementState {
    classes: Vec<String>,
    position: Option<Point>,
    size: Option<Point>,
    transforms: Vec<CanvasTransform>,
}

/// Recording element
#[derive(Debug, Clone)]
pub struct HeadlessElement {
    id: u64,
    tag: &'static str,
    state: Rc<RefCell<ElementState>>,
}

impl HeadlessElement {
    pub fn new(id: u64) -> Self {
        Self::with_tag(id, "div")
    }

    /// A canvas element
    pub fn canvas(id: u64) -> Self {
        Self::with_tag(id, "canvas")
    }

    fn with_tag(id: u64, tag: &'static str) -> Self {
        Self {
            id,
            tag,
            state: Rc::default(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn has_class(&self, class_name: &str) -> bool {
        self.state.borrow().classes.iter().any(|c| c == class_name)
    }

    pub fn classes(&self) -> Vec<String> {
        self.state.borrow().classes.clone()
    }

    pub fn position(&self) -> Option<Point> {
        self.state.borrow().position
    }

    pub fn size(&self) -> Option<Point> {
        self.state.borrow().size
    }

    /// Transform currently applied, identity when none was ever set
    pub fn transform(&self) -> CanvasTransform {
        self.state
            .borrow()
            .transforms
            .last()
            .copied()
            .unwrap_or_default()
    }

    /// Every transform applied so far, oldest first
    pub fn transforms(&self) -> Vec<CanvasTransform> {
        self.state.borrow().transforms.clone()
    }

    /// Whether both handles refer to the same element
    pub fn same_as(&self, other: &HeadlessElement) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl DomElement for HeadlessElement {
    fn set_position(&self, point: Point) {
        self.state.borrow_mut().position = Some(point);
    }

    fn set_size(&self, size: Point) {
        self.state.borrow_mut().size = Some(size);
    }

    fn set_transform(&self, transform: CanvasTransform) {
        self.state.borrow_mut().transforms.push(transform);
    }

    fn add_class(&self, class_name: &str) {
        let mut state = self.state.borrow_mut();
        if !state.classes.iter().any(|c| c == class_name) {
            state.classes.push(class_name.to_string());
        }
    }
}

#[derive(Debug)]
struct SurfaceState {
    container: HeadlessElement,
    canvas: HeadlessElement,
    camera: SurfaceCamera,
    transform_size: Point,
    primitives: HashSet<RenderPrimitive>,
    invocations: Vec<RenderPrimitive>,
    jumps: Vec<SurfaceCamera>,
    camera_writes: usize,
    latitude_clamped: bool,
    elevation_frozen: bool,
    listeners: Vec<(SurfaceEventKind, oneshot::Sender<()>)>,
    removed: bool,
}

/// Recording GL surface. Supports the public `resize`/`update` primitives
/// unless told otherwise. `jump_to` settles immediately and fires `MoveEnd`.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    state: Rc<RefCell<SurfaceState>>,
}

impl HeadlessSurface {
    pub fn new(container: HeadlessElement) -> Self {
        let canvas = HeadlessElement::canvas(container.id());
        let transform_size = container.size().unwrap_or_default();

        Self {
            state: Rc::new(RefCell::new(SurfaceState {
                container,
                canvas,
                camera: SurfaceCamera::new(LngLat::new(0.0, 0.0), 0.0),
                transform_size,
                primitives: [RenderPrimitive::Resize, RenderPrimitive::Update]
                    .into_iter()
                    .collect(),
                invocations: Vec::new(),
                jumps: Vec::new(),
                camera_writes: 0,
                latitude_clamped: true,
                elevation_frozen: false,
                listeners: Vec::new(),
                removed: false,
            })),
        }
    }

    /// Replaces the set of primitives the surface exposes
    pub fn with_primitives(self, primitives: &[RenderPrimitive]) -> Self {
        self.state.borrow_mut().primitives = primitives.iter().copied().collect();
        self
    }

    /// Camera the surface currently shows
    pub fn camera(&self) -> SurfaceCamera {
        self.state.borrow().camera
    }

    /// Moves the camera the way the renderer would on its own (geolocation,
    /// user interaction) without notifying anyone
    pub fn place_camera(&self, camera: SurfaceCamera) {
        self.state.borrow_mut().camera = camera;
    }

    pub fn container(&self) -> HeadlessElement {
        self.state.borrow().container.clone()
    }

    pub fn invocations(&self) -> Vec<RenderPrimitive> {
        self.state.borrow().invocations.clone()
    }

    pub fn jumps(&self) -> Vec<SurfaceCamera> {
        self.state.borrow().jumps.clone()
    }

    /// Number of direct camera writes
    pub fn camera_writes(&self) -> usize {
        self.state.borrow().camera_writes
    }

    pub fn is_latitude_clamped(&self) -> bool {
        self.state.borrow().latitude_clamped
    }

    pub fn is_elevation_frozen(&self) -> bool {
        self.state.borrow().elevation_frozen
    }

    pub fn is_removed(&self) -> bool {
        self.state.borrow().removed
    }

    /// Listeners of `kind` whose receiver is still alive
    pub fn listener_count(&self, kind: SurfaceEventKind) -> usize {
        self.state
            .borrow()
            .listeners
            .iter()
            .filter(|(k, sender)| *k == kind && !sender.is_canceled())
            .count()
    }

    /// Emits `kind`, consuming every listener registered for it.
    /// Returns how many listeners were still there to receive it.
    pub fn fire(&self, kind: SurfaceEventKind) -> usize {
        let listeners = {
            let mut state = self.state.borrow_mut();
            let (fired, kept) = std::mem::take(&mut state.listeners)
                .into_iter()
                .partition::<Vec<_>, _>(|(k, _)| *k == kind);
            state.listeners = kept;
            fired
        };

        listeners
            .into_iter()
            .filter(|(_, sender)| !sender.is_canceled())
            .filter_map(|(_, sender)| sender.send(()).ok())
            .count()
    }
}

impl GlSurface for HeadlessSurface {
    type Canvas = HeadlessElement;

    fn canvas(&self) -> HeadlessElement {
        self.state.borrow().canvas.clone()
    }

    fn center(&self) -> LngLat {
        self.state.borrow().camera.center
    }

    fn zoom(&self) -> f64 {
        self.state.borrow().camera.zoom
    }

    fn set_camera(&mut self, camera: SurfaceCamera) {
        let mut state = self.state.borrow_mut();
        state.camera = camera;
        state.camera_writes += 1;
    }

    fn jump_to(&mut self, camera: SurfaceCamera) {
        {
            let mut state = self.state.borrow_mut();
            state.camera = camera;
            state.jumps.push(camera);
        }
        self.fire(SurfaceEventKind::MoveEnd);
    }

    fn transform_size(&self) -> Point {
        self.state.borrow().transform_size
    }

    fn supports(&self, primitive: RenderPrimitive) -> bool {
        self.state.borrow().primitives.contains(&primitive)
    }

    fn invoke(&mut self, primitive: RenderPrimitive) {
        let mut state = self.state.borrow_mut();
        if matches!(
            primitive,
            RenderPrimitive::Resize | RenderPrimitive::InternalResize
        ) {
            if let Some(size) = state.container.size() {
                state.transform_size = size;
            }
        }
        state.invocations.push(primitive);
    }

    fn unclamp_latitude(&mut self) {
        self.state.borrow_mut().latitude_clamped = false;
    }

    fn freeze_elevation(&mut self, frozen: bool) {
        self.state.borrow_mut().elevation_frozen = frozen;
    }

    fn once(&mut self, kind: SurfaceEventKind) -> oneshot::Receiver<()> {
        let (sender, receiver) = oneshot::channel();
        self.state.borrow_mut().listeners.push((kind, sender));
        receiver
    }

    fn remove(&mut self) {
        let mut state = self.state.borrow_mut();
        state.removed = true;
        state.listeners.clear();
    }
}

#[derive(Debug, Default)]
struct FactoryState {
    primitives: Option<Vec<RenderPrimitive>>,
    failure: Option<String>,
    surfaces: Vec<HeadlessSurface>,
    options: Vec<Value>,
}

/// Builds [`HeadlessSurface`]s and remembers them together with the options
/// they were built from. Clones share that record.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurfaceFactory {
    state: Rc<RefCell<FactoryState>>,
}

impl HeadlessSurfaceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surfaces built from now on expose only these primitives
    pub fn with_primitives(self, primitives: &[RenderPrimitive]) -> Self {
        self.state.borrow_mut().primitives = Some(primitives.to_vec());
        self
    }

    /// Surface construction fails with the given message
    pub fn failing(self, message: impl Into<String>) -> Self {
        self.state.borrow_mut().failure = Some(message.into());
        self
    }

    pub fn surfaces(&self) -> Vec<HeadlessSurface> {
        self.state.borrow().surfaces.clone()
    }

    pub fn last_surface(&self) -> Option<HeadlessSurface> {
        self.state.borrow().surfaces.last().cloned()
    }

    /// Options of the most recent construction, as JSON
    pub fn last_options(&self) -> Option<Value> {
        self.state.borrow().options.last().cloned()
    }
}

impl GlSurfaceFactory<HeadlessElement> for HeadlessSurfaceFactory {
    type Surface = HeadlessSurface;

    fn create(&mut self, options: SurfaceOptions<'_, HeadlessElement>) -> Result<HeadlessSurface> {
        let mut state = self.state.borrow_mut();
        state.options.push(options.to_json());
        if let Some(message) = &state.failure {
            return Err(MapError::Surface(message.clone()));
        }

        let mut surface = HeadlessSurface::new(options.container.clone());
        if let Some(primitives) = &state.primitives {
            surface = surface.with_primitives(primitives);
        }
        if let (Some(center), Some(zoom)) = (options.center, options.zoom) {
            surface.place_camera(SurfaceCamera::new(center, zoom));
        }

        state.surfaces.push(surface.clone());
        Ok(surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_records_state() {
        let element = HeadlessElement::new(3);
        let alias = element.clone();

        element.add_class("a");
        element.add_class("a");
        element.set_position(Point::new(1.0, 2.0));
        element.set_transform(CanvasTransform::scale(2.0));

        assert_eq!(alias.classes(), vec!["a".to_string()]);
        assert_eq!(alias.position(), Some(Point::new(1.0, 2.0)));
        assert_eq!(alias.transform().scale, 2.0);
        assert!(alias.same_as(&element));
        assert!(!alias.same_as(&HeadlessElement::new(3)));
    }

    #[test]
    fn test_resize_adopts_container_size() {
        let container = HeadlessElement::new(1);
        container.set_size(Point::new(100.0, 50.0));
        let mut surface = HeadlessSurface::new(container.clone());
        assert_eq!(surface.transform_size(), Point::new(100.0, 50.0));

        container.set_size(Point::new(120.0, 60.0));
        surface.invoke(RenderPrimitive::Update);
        assert_eq!(surface.transform_size(), Point::new(100.0, 50.0));

        surface.invoke(RenderPrimitive::Resize);
        assert_eq!(surface.transform_size(), Point::new(120.0, 60.0));
    }

    #[test]
    fn test_once_fires_at_most_once() {
        let mut surface = HeadlessSurface::new(HeadlessElement::new(1));
        let mut receiver = surface.once(SurfaceEventKind::Load);

        assert_eq!(surface.fire(SurfaceEventKind::MoveEnd), 0);
        assert_eq!(surface.fire(SurfaceEventKind::Load), 1);
        assert_eq!(surface.fire(SurfaceEventKind::Load), 0);
        assert_eq!(receiver.try_recv(), Ok(Some(())));
    }

    #[test]
    fn test_dropped_receiver_is_not_notified() {
        let mut surface = HeadlessSurface::new(HeadlessElement::new(1));
        let receiver = surface.once(SurfaceEventKind::MoveEnd);
        assert_eq!(surface.listener_count(SurfaceEventKind::MoveEnd), 1);

        drop(receiver);
        assert_eq!(surface.listener_count(SurfaceEventKind::MoveEnd), 0);
        assert_eq!(surface.fire(SurfaceEventKind::MoveEnd), 0);
    }

    #[test]
    fn test_signal_can_be_awaited() {
        let mut surface = HeadlessSurface::new(HeadlessElement::new(1));
        let receiver = surface.once(SurfaceEventKind::MoveEnd);

        surface.jump_to(SurfaceCamera::new(LngLat::new(5.0, 6.0), 2.0));
        assert_eq!(futures::executor::block_on(receiver), Ok(()));
        assert_eq!(surface.center(), LngLat::new(5.0, 6.0));
    }

    #[test]
    fn test_factory_failure() {
        let container = HeadlessElement::new(1);
        let extra = serde_json::Map::new();
        let mut factory = HeadlessSurfaceFactory::new().failing("no webgl");

        let result = factory.create(SurfaceOptions {
            container: &container,
            center: None,
            zoom: None,
            geolocate: false,
            style: "style.json".into(),
            api_key: None,
            attribution_control: false,
            interactive: false,
            extra: &extra,
        });

        assert!(matches!(result, Err(MapError::Surface(_))));
        assert!(factory.last_options().is_some());
        assert!(factory.surfaces().is_empty());
    }
}
