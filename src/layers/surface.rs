//! GL surface construction options and the wrapper the engine drives
//! the surface through

use serde_json::{json, Map, Value};

use crate::{
    core::geo::{LngLat, Point},
    sync::mapper::SurfaceCamera,
    traits::{DomElement, GlSurface, RenderPrimitive},
    MapError, Result,
};

/// Canvas element type of a surface
pub type CanvasOf<S> = <S as GlSurface>::Canvas;

/// Everything a [`crate::traits::GlSurfaceFactory`] needs to build a surface
#[derive(Debug, Clone)]
pub struct SurfaceOptions<'a, E: DomElement> {
    /// Element the surface renders into
    pub container: &'a E,
    /// Initial center; `None` lets the surface pick (geolocation)
    pub center: Option<LngLat>,
    /// Initial zoom in surface numbering; `None` together with `center`
    pub zoom: Option<f64>,
    /// Ask the surface to locate the user and start there
    pub geolocate: bool,
    pub style: String,
    pub api_key: Option<String>,
    /// Always `false`: the host shows the combined attribution
    pub attribution_control: bool,
    pub interactive: bool,
    /// Options forwarded untouched
    pub extra: &'a Map<String, Value>,
}

impl<E: DomElement> SurfaceOptions<'_, E> {
    /// JSON form of the options (without the container), in the surface's
    /// own option names
    pub fn to_json(&self) -> Value {
        let mut options = self.extra.clone();
        options.insert("style".into(), json!(self.style));
        if let Some(api_key) = &self.api_key {
            options.insert("apiKey".into(), json!(api_key));
        }
        if let Some(center) = self.center {
            options.insert("center".into(), json!(center.to_array()));
        }
        if let Some(zoom) = self.zoom {
            options.insert("zoom".into(), json!(zoom));
        }
        if self.geolocate {
            options.insert("geolocate".into(), json!(true));
        }
        options.insert("attributionControl".into(), json!(self.attribution_control));
        options.insert("interactive".into(), json!(self.interactive));
        Value::Object(options)
    }
}

/// A GL surface together with the render primitives it was found to expose.
/// The probing happens once, when the surface is wrapped.
pub struct SurfaceHandle<S: GlSurface> {
    surface: S,
    canvas: S::Canvas,
    resize: RenderPrimitive,
    update: RenderPrimitive,
}

impl<S: GlSurface> SurfaceHandle<S> {
    /// Wraps a freshly built surface. The underscored entry points are
    /// probed first, the public ones are the fallback. A surface with neither
    /// is removed again and rejected.
    pub fn wrap(mut surface: S) -> Result<Self> {
        let resize = Self::probe(
            &surface,
            RenderPrimitive::InternalResize,
            RenderPrimitive::Resize,
        );
        let update = Self::probe(
            &surface,
            RenderPrimitive::InternalUpdate,
            RenderPrimitive::Update,
        );

        let (resize, update) = match (resize, update) {
            (Ok(resize), Ok(update)) => (resize, update),
            (Err(e), _) | (_, Err(e)) => {
                surface.remove();
                return Err(e);
            }
        };

        let canvas = surface.canvas();
        Ok(Self {
            surface,
            canvas,
            resize,
            update,
        })
    }

    fn probe(
        surface: &S,
        internal: RenderPrimitive,
        public: RenderPrimitive,
    ) -> Result<RenderPrimitive> {
        if surface.supports(internal) {
            Ok(internal)
        } else if surface.supports(public) {
            Ok(public)
        } else {
            Err(MapError::MissingPrimitive {
                internal: internal.name(),
                public: public.name(),
            })
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Canvas captured when the surface was wrapped
    pub fn canvas(&self) -> &S::Canvas {
        &self.canvas
    }

    pub fn resize_primitive(&self) -> RenderPrimitive {
        self.resize
    }

    pub fn update_primitive(&self) -> RenderPrimitive {
        self.update
    }

    pub fn transform_size(&self) -> Point {
        self.surface.transform_size()
    }

    /// Full resize: reallocates the drawing buffer
    pub fn resize(&mut self) {
        self.surface.invoke(self.resize);
    }

    /// Re-render at the current size
    pub fn update(&mut self) {
        self.surface.invoke(self.update);
    }

    pub fn set_camera(&mut self, camera: SurfaceCamera) {
        self.surface.set_camera(camera);
    }

    pub fn jump_to(&mut self, camera: SurfaceCamera) {
        self.surface.jump_to(camera);
    }

    /// Disposes the surface
    pub fn remove(mut self) {
        self.surface.remove();
    }
}
