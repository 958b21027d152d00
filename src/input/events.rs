use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};

/// Lifecycle events the host map emits towards its layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HostEvent {
    /// The view moved (fires continuously while panning)
    Move,
    /// Zoom level changed; fires every frame of a pinch or wheel gesture
    Zoom,
    /// A zoom is about to begin
    ZoomStart,
    /// A zoom finished
    ZoomEnd,
    /// An animated zoom towards `center`/`zoom` is about to run as a CSS transition
    ZoomAnim { center: LatLng, zoom: f64 },
    /// Viewport size changed
    Resize,
    /// The CSS transition of an animated zoom completed
    TransitionEnd,
}

impl HostEvent {
    pub fn kind(&self) -> HostEventKind {
        match self {
            HostEvent::Move => HostEventKind::Move,
            HostEvent::Zoom => HostEventKind::Zoom,
            HostEvent::ZoomStart => HostEventKind::ZoomStart,
            HostEvent::ZoomEnd => HostEventKind::ZoomEnd,
            HostEvent::ZoomAnim { .. } => HostEventKind::ZoomAnim,
            HostEvent::Resize => HostEventKind::Resize,
            HostEvent::TransitionEnd => HostEventKind::TransitionEnd,
        }
    }
}

/// Payload-free discriminant of [`HostEvent`], used for subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostEventKind {
    Move,
    Zoom,
    ZoomStart,
    ZoomEnd,
    ZoomAnim,
    Resize,
    TransitionEnd,
}

impl HostEventKind {
    /// Host-side event name
    pub fn name(self) -> &'static str {
        match self {
            HostEventKind::Move => "move",
            HostEventKind::Zoom => "zoom",
            HostEventKind::ZoomStart => "zoomstart",
            HostEventKind::ZoomEnd => "zoomend",
            HostEventKind::ZoomAnim => "zoomanim",
            HostEventKind::Resize => "resize",
            HostEventKind::TransitionEnd => "transitionend",
        }
    }
}

impl std::fmt::Display for HostEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One-shot signals the GL surface emits back to the layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceEventKind {
    /// Style and first frame finished loading
    Load,
    /// A camera movement settled
    MoveEnd,
}

impl std::fmt::Display for SurfaceEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurfaceEventKind::Load => write!(f, "load"),
            SurfaceEventKind::MoveEnd => write!(f, "moveend"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind() {
        let anim = HostEvent::ZoomAnim {
            center: LatLng::new(1.0, 2.0),
            zoom: 3.0,
        };
        assert_eq!(anim.kind(), HostEventKind::ZoomAnim);
        assert_eq!(HostEvent::TransitionEnd.kind().to_string(), "transitionend");
    }

    #[test]
    fn test_event_serde() {
        let json = serde_json::to_string(&HostEvent::ZoomStart).unwrap();
        let back: HostEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, HostEvent::ZoomStart);
    }
}
