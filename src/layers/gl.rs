//! The GL layer: a host-map layer that renders a GL map surface underneath
//! the host's own layers and keeps it in step with the host view
//!
//! The layer does no scheduling of its own. The application forwards every
//! host event to [`GlLayer::handle_event`] and calls [`GlLayer::tick`] once
//! per animation frame; both take the current time so pan throttling and the
//! deferred transition reset stay deterministic.

use futures::channel::oneshot;
use instant::Instant;

use crate::{
    core::{
        config::GlLayerOptions,
        constants::{CANVAS_CLASSES, INTERACTIVE_CLASS},
        geo::{LatLngBounds, Point},
        style::resolve_style,
    },
    input::events::{HostEvent, HostEventKind, SurfaceEventKind},
    layers::{
        container::OverlayContainer,
        surface::{CanvasOf, SurfaceHandle, SurfaceOptions},
    },
    sync::{
        mapper::{
            host_to_surface, surface_size, surface_to_host, transition_reset_transform,
            visible_bounds, zoom_anim_transform, zoom_end_transform, SurfaceCamera, SyncGeometry,
        },
        phase::{AnimationPhase, PhaseController, SyncAction},
        throttle::ThrottleGate,
    },
    traits::{Configurable, DomElement, GlSurface, GlSurfaceFactory, HostView},
    MapError, Result,
};

/// Counters of the work the layer has pushed onto the surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Completed synchronization passes
    pub passes: u64,
    /// Passes that had to reallocate the drawing buffer
    pub resizes: u64,
    /// Passes that only re-rendered
    pub redraws: u64,
    /// Canvas resets after a zoom transition or resize
    pub resets: u64,
}

pub struct GlLayer<E: DomElement, F: GlSurfaceFactory<E>> {
    options: GlLayerOptions,
    factory: F,
    container: OverlayContainer<E>,
    surface: Option<SurfaceHandle<F::Surface>>,
    throttle: ThrottleGate<()>,
    phase: PhaseController,
    /// Host layer point under container point (0, 0) as of the last pass
    recorded_offset: Point,
    /// Canvas reset waiting for the next frame
    reset_scheduled: bool,
    move_end: Option<oneshot::Receiver<()>>,
    load: Option<oneshot::Receiver<()>>,
    stats: SyncStats,
}

/// Builds a layer whose attribution combines the basemap credits with the
/// caller's own attribution string
pub fn gl_layer<E, F>(mut options: GlLayerOptions, factory: F) -> Result<GlLayer<E, F>>
where
    E: DomElement,
    F: GlSurfaceFactory<E>,
{
    options.attribution = Some(options.attribution_html());
    GlLayer::new(options, factory)
}

impl<E, F> GlLayer<E, F>
where
    E: DomElement,
    F: GlSurfaceFactory<E>,
{
    pub fn new(options: GlLayerOptions, factory: F) -> Result<Self> {
        options.validate()?;

        Ok(Self {
            throttle: ThrottleGate::new(options.update_interval()),
            options,
            factory,
            container: OverlayContainer::new(),
            surface: None,
            phase: PhaseController::new(),
            recorded_offset: Point::default(),
            reset_scheduled: false,
            move_end: None,
            load: None,
            stats: SyncStats::default(),
        })
    }

    /// Host events the layer listens to. The transition-end signal only
    /// exists on hosts that animate zooms.
    pub fn events(zoom_animation: bool) -> Vec<HostEventKind> {
        let mut kinds = vec![
            HostEventKind::Move,
            HostEventKind::ZoomAnim,
            HostEventKind::Zoom,
            HostEventKind::ZoomStart,
            HostEventKind::ZoomEnd,
            HostEventKind::Resize,
        ];
        if zoom_animation {
            kinds.push(HostEventKind::TransitionEnd);
        }
        kinds
    }

    /// Inserts the overlay container into the host and builds the GL surface
    /// inside it
    pub fn on_add<H: HostView<Element = E>>(&mut self, host: &mut H) -> Result<()> {
        if self.is_attached() {
            return Err(MapError::AlreadyAttached);
        }

        self.container.attach(host, &self.options.pane);
        let geometry = SyncGeometry::compute(&*host, self.options.padding);
        self.container.set_position(geometry.top_left);
        self.container.set_size(geometry.size);

        let surface = match self.build_surface(geometry.camera) {
            Ok(surface) => surface,
            Err(e) => {
                self.container.detach(host);
                return Err(e);
            }
        };
        self.surface = Some(surface);
        self.recorded_offset = geometry.origin_offset;

        host.on(&Self::events(host.zoom_animation()));
        log::info!(
            "GL layer attached to {:?} at zoom {} ({}x{} px)",
            self.container.pane().unwrap_or_default(),
            host.zoom(),
            geometry.size.x,
            geometry.size.y
        );
        Ok(())
    }

    fn build_surface(&mut self, camera: SurfaceCamera) -> Result<SurfaceHandle<F::Surface>> {
        let element = self.container.element().ok_or(MapError::NotAttached)?;
        let resolved = resolve_style(&self.options.style, self.options.api_key.as_deref());
        let geolocate = self.options.geolocate;

        let surface = self.factory.create(SurfaceOptions {
            container: element,
            center: (!geolocate).then_some(camera.center),
            zoom: (!geolocate).then_some(camera.zoom),
            geolocate,
            style: resolved.style,
            api_key: resolved.api_key,
            attribution_control: false,
            interactive: self.options.interactive,
            extra: &self.options.extra,
        })?;
        let mut handle = SurfaceHandle::wrap(surface)?;

        let surface = handle.surface_mut();
        surface.freeze_elevation(true);
        surface.unclamp_latitude();
        if geolocate {
            self.load = Some(surface.once(SurfaceEventKind::Load));
        } else {
            handle.set_camera(camera);
        }

        let canvas = handle.canvas();
        for class_name in CANVAS_CLASSES {
            canvas.add_class(class_name);
        }
        if self.options.interactive {
            canvas.add_class(INTERACTIVE_CLASS);
        }
        if let Some(class_name) = &self.options.class_name {
            canvas.add_class(class_name);
        }

        Ok(handle)
    }

    /// Unsubscribes, drops every pending callback and tears down the surface
    /// and its container
    pub fn on_remove<H: HostView<Element = E>>(&mut self, host: &mut H) -> Result<()> {
        let surface = self.surface.take().ok_or(MapError::NotAttached)?;

        host.off(&Self::events(host.zoom_animation()));
        self.throttle.cancel();
        self.reset_scheduled = false;
        self.move_end = None;
        self.load = None;
        self.phase.reset();

        surface.remove();
        self.container.detach(host);
        log::info!("GL layer detached");
        Ok(())
    }

    /// Reacts to one host event
    pub fn handle_event<H: HostView<Element = E>>(
        &mut self,
        host: &mut H,
        event: &HostEvent,
        now: Instant,
    ) -> Result<()> {
        if !self.is_attached() {
            return Err(MapError::NotAttached);
        }

        match self.phase.on_host_event(event) {
            SyncAction::Ignore => {}
            SyncAction::RecordOffset => self.record_offset(&*host),
            SyncAction::ThrottledUpdate => {
                if self.throttle.call((), now).is_some() {
                    self.update(&*host)?;
                }
            }
            SyncAction::TrackZoom => {
                let camera = host_to_surface(host.center(), host.zoom());
                self.handle_mut()?.jump_to(camera);
            }
            SyncAction::AnimateZoom { center, zoom } => {
                let transform = zoom_anim_transform(
                    &*host,
                    center,
                    zoom,
                    self.options.padding,
                    self.recorded_offset,
                );
                self.handle_mut()?.canvas().set_transform(transform);
            }
            SyncAction::FinishZoom => self.finish_zoom(&*host)?,
            SyncAction::ScheduleReset => self.reset_scheduled = true,
        }
        Ok(())
    }

    /// Frame callback: flushes a due throttled pass, runs a scheduled canvas
    /// reset and consumes one-shot surface signals, in that order
    pub fn tick<H: HostView<Element = E>>(&mut self, host: &mut H, now: Instant) -> Result<()> {
        if !self.is_attached() {
            return Ok(());
        }

        if self.throttle.poll(now).is_some() {
            self.update(&*host)?;
        }

        if std::mem::take(&mut self.reset_scheduled) {
            self.reset_after_transition(&*host)?;
        }

        if take_signal(&mut self.move_end) {
            if self.phase.on_surface_settled() == SyncAction::FinishZoom {
                self.finish_zoom(&*host)?;
            }
        }

        if take_signal(&mut self.load) {
            self.adopt_surface_view(host)?;
        }

        Ok(())
    }

    /// Runs a full synchronization pass right away, bypassing the throttle
    pub fn sync_now<H: HostView<Element = E>>(&mut self, host: &H) -> Result<()> {
        self.update(host)
    }

    fn record_offset<H: HostView<Element = E>>(&mut self, host: &H) {
        self.recorded_offset = host.container_point_to_layer_point(Point::default());
    }

    fn update<H: HostView<Element = E>>(&mut self, host: &H) -> Result<()> {
        self.record_offset(host);
        if self.phase.suppresses_pan() {
            return Ok(());
        }

        let surface = self.surface.as_mut().ok_or(MapError::NotAttached)?;
        let geometry = SyncGeometry::compute(host, self.options.padding);

        self.container.set_position(geometry.top_left);
        self.container.set_size(geometry.size);
        surface.set_camera(geometry.camera);

        let resized = surface.transform_size() != geometry.size;
        if resized {
            surface.resize();
            self.stats.resizes += 1;
        } else {
            surface.update();
            self.stats.redraws += 1;
        }
        self.stats.passes += 1;

        log::debug!(
            "sync pass: zoom {} at {:?}, top-left {:?}{}",
            geometry.camera.zoom,
            geometry.camera.center,
            geometry.top_left,
            if resized { ", resized" } else { "" }
        );
        Ok(())
    }

    fn finish_zoom<H: HostView<Element = E>>(&mut self, host: &H) -> Result<()> {
        let transform = zoom_end_transform(host);
        self.handle_mut()?.canvas().set_transform(transform);
        self.phase.finish_zoom();
        self.update(host)
    }

    fn reset_after_transition<H: HostView<Element = E>>(&mut self, host: &H) -> Result<()> {
        let transform = transition_reset_transform(host);
        let camera = host_to_surface(host.center(), host.zoom());

        let handle = self.surface.as_mut().ok_or(MapError::NotAttached)?;
        handle.canvas().set_transform(transform);
        self.move_end = Some(handle.surface_mut().once(SurfaceEventKind::MoveEnd));
        handle.jump_to(camera);

        self.phase.begin_transition();
        self.stats.resets += 1;
        Ok(())
    }

    /// One-time reverse sync after a geolocating surface finished loading
    fn adopt_surface_view<H: HostView<Element = E>>(&mut self, host: &mut H) -> Result<()> {
        let surface = self.surface()?;
        let (center, zoom) = surface_to_host(SurfaceCamera::new(surface.center(), surface.zoom()));

        log::info!("surface located the view at {center:?}, zoom {zoom}");
        host.set_view(center, zoom);
        Ok(())
    }

    fn handle_mut(&mut self) -> Result<&mut SurfaceHandle<F::Surface>> {
        self.surface.as_mut().ok_or(MapError::NotAttached)
    }

    /// The GL surface instance
    pub fn surface(&self) -> Result<&F::Surface> {
        self.surface
            .as_ref()
            .map(SurfaceHandle::surface)
            .ok_or(MapError::NotAttached)
    }

    pub fn surface_mut(&mut self) -> Result<&mut F::Surface> {
        Ok(self.handle_mut()?.surface_mut())
    }

    /// Canvas the surface draws into
    pub fn canvas(&self) -> Result<&CanvasOf<F::Surface>> {
        self.surface
            .as_ref()
            .map(SurfaceHandle::canvas)
            .ok_or(MapError::NotAttached)
    }

    /// The overlay container element, once it has been created
    pub fn container(&self) -> Option<&E> {
        self.container.element()
    }

    /// Overlay size for the host's current viewport
    pub fn size<H: HostView + ?Sized>(&self, host: &H) -> Point {
        surface_size(host.size(), self.options.padding)
    }

    /// Geographical extent covered by the padded overlay
    pub fn bounds<H: HostView + ?Sized>(&self, host: &H) -> LatLngBounds {
        visible_bounds(host, self.options.padding)
    }

    /// Pane the container lives in, or would be placed in
    pub fn pane_name<H: HostView + ?Sized>(&self, host: &H) -> String {
        match self.container.pane() {
            Some(pane) => pane.to_string(),
            None => OverlayContainer::<E>::resolve_pane(host, &self.options.pane),
        }
    }

    pub fn attribution(&self) -> Option<&str> {
        self.options.attribution.as_deref()
    }

    pub fn phase(&self) -> AnimationPhase {
        self.phase.phase()
    }

    pub fn options(&self) -> &GlLayerOptions {
        &self.options
    }

    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    pub fn recorded_offset(&self) -> Point {
        self.recorded_offset
    }

    pub fn stats(&self) -> SyncStats {
        self.stats
    }

    /// Whether a canvas reset is waiting for the next frame
    pub fn has_scheduled_reset(&self) -> bool {
        self.reset_scheduled
    }

    /// Whether a throttled pass is parked
    pub fn has_pending_update(&self) -> bool {
        self.throttle.has_pending()
    }
}

/// Consumes a fired one-shot signal. A signal whose sender went away is
/// forgotten without firing.
fn take_signal(signal: &mut Option<oneshot::Receiver<()>>) -> bool {
    let Some(receiver) = signal.as_mut() else {
        return false;
    };

    match receiver.try_recv() {
        Ok(Some(())) => {
            *signal = None;
            true
        }
        Ok(None) => false,
        Err(oneshot::Canceled) => {
            *signal = None;
            false
        }
    }
}

impl<E, F> Configurable for GlLayer<E, F>
where
    E: DomElement,
    F: GlSurfaceFactory<E>,
{
    type Config = GlLayerOptions;

    fn config(&self) -> &GlLayerOptions {
        &self.options
    }

    /// Padding and interval apply from the next pass; pane, style and class
    /// changes only take effect when the layer is added again
    fn set_config(&mut self, config: GlLayerOptions) -> Result<()> {
        Self::validate_config(&config)?;
        self.throttle.set_interval(config.update_interval());
        self.options = config;
        Ok(())
    }

    fn validate_config(config: &GlLayerOptions) -> Result<()> {
        config.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{geo::LatLng, map::HeadlessMap},
        rendering::headless::{HeadlessElement, HeadlessSurfaceFactory},
        traits::RenderPrimitive,
    };
    use instant::Duration;

    type Layer = GlLayer<HeadlessElement, HeadlessSurfaceFactory>;

    fn host() -> HeadlessMap {
        HeadlessMap::new(LatLng::new(10.0, 20.0), 5.0, Point::new(800.0, 600.0))
    }

    fn layer(options: GlLayerOptions) -> (Layer, HeadlessSurfaceFactory) {
        let factory = HeadlessSurfaceFactory::new();
        let layer = GlLayer::new(options, factory.clone()).unwrap();
        (layer, factory)
    }

    #[test]
    fn test_subscriptions_follow_zoom_animation() {
        assert_eq!(Layer::events(false).len(), 6);
        assert!(Layer::events(true).contains(&HostEventKind::TransitionEnd));
        assert!(!Layer::events(false).contains(&HostEventKind::TransitionEnd));
    }

    #[test]
    fn test_invalid_options_rejected() {
        let options = GlLayerOptions::new("style.json").with_padding(-1.0);
        let result = GlLayer::<HeadlessElement, _>::new(options, HeadlessSurfaceFactory::new());
        assert!(matches!(result, Err(MapError::InvalidConfig(_))));
    }

    #[test]
    fn test_on_add_builds_surface() {
        let mut host = host();
        let (mut layer, factory) = layer(GlLayerOptions::new("style.json").with_class_name("base"));

        layer.on_add(&mut host).unwrap();
        assert!(layer.is_attached());

        let surface = factory.last_surface().unwrap();
        assert!(surface.is_elevation_frozen());
        assert!(!surface.is_latitude_clamped());
        assert_eq!(surface.camera(), SurfaceCamera::new(LatLng::new(10.0, 20.0).into(), 4.0));

        let canvas = layer.canvas().unwrap();
        assert!(canvas.has_class("leaflet-image-layer"));
        assert!(canvas.has_class("leaflet-zoom-animated"));
        assert!(canvas.has_class("base"));
        assert!(!canvas.has_class(INTERACTIVE_CLASS));

        let options = factory.last_options().unwrap();
        assert_eq!(options["attributionControl"], serde_json::json!(false));
        assert_eq!(options["zoom"], serde_json::json!(4.0));
    }

    #[test]
    fn test_double_add_rejected() {
        let mut host = host();
        let (mut layer, factory) = layer(GlLayerOptions::new("style.json"));

        layer.on_add(&mut host).unwrap();
        assert!(matches!(
            layer.on_add(&mut host),
            Err(MapError::AlreadyAttached)
        ));
        assert_eq!(factory.surfaces().len(), 1);
    }

    #[test]
    fn test_missing_primitive_fails_add_and_cleans_up() {
        let mut host = host();
        let factory = HeadlessSurfaceFactory::new().with_primitives(&[RenderPrimitive::Update]);
        let mut layer: Layer = GlLayer::new(GlLayerOptions::new("style.json"), factory.clone()).unwrap();

        let err = layer.on_add(&mut host).unwrap_err();
        assert!(matches!(err, MapError::MissingPrimitive { .. }));
        assert!(!layer.is_attached());
        assert!(host.pane_children("tilePane").is_empty());
        assert!(factory.last_surface().unwrap().is_removed());
    }

    #[test]
    fn test_detached_layer_rejects_events() {
        let mut host = host();
        let (mut layer, _) = layer(GlLayerOptions::new("style.json"));

        let result = layer.handle_event(&mut host, &HostEvent::Move, Instant::now());
        assert!(matches!(result, Err(MapError::NotAttached)));
        assert!(layer.tick(&mut host, Instant::now()).is_ok());
        assert!(matches!(layer.surface(), Err(MapError::NotAttached)));
    }

    #[test]
    fn test_set_config_changes_interval() {
        let (mut layer, _) = layer(GlLayerOptions::new("style.json"));

        layer
            .update_config(|options| options.update_interval_ms = 100)
            .unwrap();
        assert_eq!(layer.throttle.interval(), Duration::from_millis(100));

        let result = layer.update_config(|options| options.update_interval_ms = 0);
        assert!(result.is_err());
        assert_eq!(layer.options().update_interval_ms, 100);
    }

    #[test]
    fn test_gl_layer_builds_attribution() {
        let layer: Layer = gl_layer(
            GlLayerOptions::new("style.json").with_attribution("Mine"),
            HeadlessSurfaceFactory::new(),
        )
        .unwrap();

        let attribution = layer.attribution().unwrap();
        assert!(attribution.contains("&copy; MapTiler"));
        assert!(attribution.ends_with(" Mine"));
    }
}
