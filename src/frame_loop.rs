//! Visibility-gated frame loop.
//!
//! The host owns the clock: a browser's `requestAnimationFrame`, a native
//! window's redraw request, or a test harness. [`FrameHost`] is the one
//! operation the loop needs from it: "call me back before the next repaint".
//!
//! [`AnimationLoop`] is a trampoline. Each callback runs one field step and
//! asks for the next callback, unless the field's region has scrolled out of
//! view, in which case it lets the chain end. Becoming visible again starts
//! a new chain only if none is pending, so a burst of visibility signals can
//! never produce two concurrent loops.
//!
//! ```ignore
//! // host callback body
//! frame_loop.tick(&mut field);
//!
//! // intersection observer
//! frame_loop.set_visible(entry.is_intersecting(), &mut field);
//! ```

use crate::field::ParticleField;
use crate::surface::Surface;

/// Something that can schedule a callback for the next display frame.
pub trait FrameHost {
    /// Identifier of a scheduled callback.
    type Handle;

    /// Schedule the frame callback. `None` if the host refused.
    fn request_frame(&mut self) -> Option<Self::Handle>;
}

/// Drives a [`ParticleField`] from host frame callbacks while it is visible.
pub struct AnimationLoop<H: FrameHost> {
    host: H,
    visible: bool,
    pending: Option<H::Handle>,
}

impl<H: FrameHost> AnimationLoop<H> {
    /// Create an idle loop. Fields start out visible.
    pub fn new(host: H) -> Self {
        Self {
            host,
            visible: true,
            pending: None,
        }
    }

    /// Start the loop if it is idle and the field is visible.
    ///
    /// Runs the first step immediately, like a direct call to the frame
    /// callback. Does nothing while a callback is already pending.
    pub fn start<S: Surface>(&mut self, field: &mut ParticleField<S>) {
        if self.pending.is_none() && self.visible && !field.is_inert() {
            self.tick(field);
        }
    }

    /// The frame callback body. Returns whether a step ran.
    pub fn tick<S: Surface>(&mut self, field: &mut ParticleField<S>) -> bool {
        if !self.visible || field.is_inert() {
            self.pending = None;
            return false;
        }
        field.step();
        self.pending = self.host.request_frame();
        if self.pending.is_none() {
            log::warn!("frame host refused to schedule; animation loop is idle");
        }
        true
    }

    /// Record a visibility change, restarting the loop on entering view.
    pub fn set_visible<S: Surface>(&mut self, visible: bool, field: &mut ParticleField<S>) {
        if self.visible != visible {
            log::debug!("particle field visibility -> {}", visible);
        }
        self.visible = visible;
        if visible {
            self.start(field);
        }
    }

    /// Forget the pending callback, returning its handle so the host can
    /// cancel it.
    pub fn cancel(&mut self) -> Option<H::Handle> {
        self.pending.take()
    }

    /// Whether the field is currently considered in view.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether a frame callback is scheduled.
    #[inline]
    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    /// The host this loop schedules through.
    #[inline]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host.
    #[inline]
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

/// A host that hands out increasing ids and counts requests.
///
/// Handy for headless runs and tests: call [`AnimationLoop::tick`] to play
/// the role of the display refresh.
#[derive(Debug, Default, Clone)]
pub struct ManualHost {
    next_id: u64,
    requests: u64,
}

impl ManualHost {
    /// Create a new host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total frames requested so far.
    pub fn requests(&self) -> u64 {
        self.requests
    }
}

impl FrameHost for ManualHost {
    type Handle = u64;

    fn request_frame(&mut self) -> Option<u64> {
        self.requests += 1;
        self.next_id += 1;
        Some(self.next_id)
    }
}
