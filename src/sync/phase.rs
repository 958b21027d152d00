//! Animation phase state machine
//!
//! Decides which synchronization routine a host event calls for. Pinch and
//! wheel zooms are tracked frame by frame on the GL surface; CSS-transitioned
//! zooms are followed with a cheap canvas transform and resynchronized once,
//! after the transition.
//!
//! ```text
//! Idle --ZoomStart--> ZoomingDiscrete --ZoomEnd--> Idle
//! Idle --TransitionEnd/Resize, next frame--> ZoomingTransition --surface moveend--> Idle
//! ```

use serde::{Deserialize, Serialize};

use crate::{core::geo::LatLng, input::events::HostEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AnimationPhase {
    #[default]
    Idle,
    /// Pinch or wheel zoom in progress; the surface follows every frame
    ZoomingDiscrete,
    /// The canvas was reset after a CSS zoom; waiting for the surface to settle
    ZoomingTransition,
}

impl std::fmt::Display for AnimationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnimationPhase::Idle => write!(f, "idle"),
            AnimationPhase::ZoomingDiscrete => write!(f, "zooming (discrete)"),
            AnimationPhase::ZoomingTransition => write!(f, "zooming (transition)"),
        }
    }
}

/// Routine the engine runs in response to a host event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyncAction {
    /// Nothing to apply
    Ignore,
    /// Remember the host layer offset but leave the overlay alone
    RecordOffset,
    /// Full pass, rate limited
    ThrottledUpdate,
    /// Move the surface camera to the host's live center/zoom right away
    TrackZoom,
    /// Counter-transform the canvas towards the animation target
    AnimateZoom { center: LatLng, zoom: f64 },
    /// Scale correction, back to idle, then a full pass
    FinishZoom,
    /// Reset canvas and camera on the next animation frame
    ScheduleReset,
}

#[derive(Debug, Clone, Default)]
pub struct PhaseController {
    phase: AnimationPhase,
}

impl PhaseController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    /// Pan updates are held back while a zoom gesture runs
    pub fn suppresses_pan(&self) -> bool {
        self.phase == AnimationPhase::ZoomingDiscrete
    }

    pub fn on_host_event(&mut self, event: &HostEvent) -> SyncAction {
        match event {
            HostEvent::Move if self.suppresses_pan() => SyncAction::RecordOffset,
            HostEvent::Move => SyncAction::ThrottledUpdate,
            HostEvent::ZoomStart => {
                self.enter(AnimationPhase::ZoomingDiscrete);
                SyncAction::Ignore
            }
            HostEvent::Zoom if self.phase == AnimationPhase::ZoomingDiscrete => {
                SyncAction::TrackZoom
            }
            HostEvent::Zoom => SyncAction::Ignore,
            HostEvent::ZoomAnim { center, zoom } => SyncAction::AnimateZoom {
                center: *center,
                zoom: *zoom,
            },
            HostEvent::ZoomEnd => SyncAction::FinishZoom,
            HostEvent::TransitionEnd | HostEvent::Resize => SyncAction::ScheduleReset,
        }
    }

    /// The scheduled reset ran; the surface is jumping to the new view
    pub fn begin_transition(&mut self) {
        self.enter(AnimationPhase::ZoomingTransition);
    }

    /// The surface reported that its camera settled. Only meaningful while
    /// waiting out a transition; a gesture started since owns the zoom end.
    pub fn on_surface_settled(&mut self) -> SyncAction {
        match self.phase {
            AnimationPhase::ZoomingTransition => SyncAction::FinishZoom,
            _ => SyncAction::Ignore,
        }
    }

    /// Zoom correction applied; back to idle
    pub fn finish_zoom(&mut self) {
        self.enter(AnimationPhase::Idle);
    }

    /// Forget any in-flight animation
    pub fn reset(&mut self) {
        self.phase = AnimationPhase::Idle;
    }

    fn enter(&mut self, phase: AnimationPhase) {
        if self.phase != phase {
            log::debug!("animation phase: {} -> {}", self.phase, phase);
            self.phase = phase;
        }
    }
}
