use crate::showcase::Showcase;
use folio_physics::PhysicsBackend;
use folio_scene::{OverlayRenderer, Renderer};
use std::time::Instant;

/// Lifecycle of the frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// No frame has run yet, or the loop was stopped.
    Idle,
    Running,
}

/// Wall-clock delta between frames. The first tick reports zero.
#[derive(Debug, Default, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous tick.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let elapsed = self
            .last
            .map(|last| now.saturating_duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last = Some(now);
        elapsed
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Clamp an elapsed time to `[0, max_step]`. Non-finite input yields zero.
pub fn clamp_step(elapsed: f32, max_step: f32) -> f32 {
    if elapsed.is_finite() && elapsed > 0.0 {
        elapsed.min(max_step)
    } else {
        0.0
    }
}

/// What one frame did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Zero-based frame number.
    pub frame: u64,
    /// Wall-clock seconds since the previous frame, unclamped.
    pub elapsed: f32,
    /// Seconds the physics world was advanced.
    pub step: f32,
    pub camera_moved: bool,
    pub refreshed_textures: usize,
    /// Registry index of the highlighted exhibit.
    pub hovered: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct FrameOutput<S, O> {
    pub report: FrameReport,
    pub scene: S,
    pub overlay: O,
}

/// Drives a [`Showcase`] one frame at a time.
#[derive(Debug)]
pub struct SimulationLoop {
    state: LoopState,
    clock: FrameClock,
    frames: u64,
}

impl Default for SimulationLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Idle,
            clock: FrameClock::new(),
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Frames run so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn stop(&mut self) {
        if self.state == LoopState::Running {
            tracing::info!(frames = self.frames, "simulation loop stopped");
        }
        self.state = LoopState::Idle;
        self.clock.reset();
    }

    /// Run one frame timed by the wall clock.
    pub fn tick<P, R, O>(
        &mut self,
        showcase: &mut Showcase<P>,
        now: Instant,
        renderer: &mut R,
        overlay: &mut O,
    ) -> FrameOutput<R::Output, O::Output>
    where
        P: PhysicsBackend,
        R: Renderer,
        O: OverlayRenderer,
    {
        if self.state == LoopState::Idle {
            self.clock.reset();
        }
        let elapsed = self.clock.tick(now);
        self.advance(showcase, elapsed, renderer, overlay)
    }

    /// Run one frame with an explicit elapsed time.
    ///
    /// Order: camera, video refresh, hover, clamped physics step, exhibit
    /// sync, floor sync, scene render, label overlay. The first frame after
    /// start always steps by zero.
    pub fn advance<P, R, O>(
        &mut self,
        showcase: &mut Showcase<P>,
        elapsed: f32,
        renderer: &mut R,
        overlay: &mut O,
    ) -> FrameOutput<R::Output, O::Output>
    where
        P: PhysicsBackend,
        R: Renderer,
        O: OverlayRenderer,
    {
        let elapsed = match self.state {
            LoopState::Idle => {
                tracing::info!("simulation loop running");
                self.state = LoopState::Running;
                0.0
            }
            LoopState::Running => elapsed,
        };

        let camera_moved = showcase.update_camera();
        let refreshed_textures = showcase.refresh_textures();
        let hovered = showcase.hover();
        let step = clamp_step(elapsed, showcase.max_step());
        showcase.step_physics(step);
        showcase.sync();

        let scene = renderer.render(showcase.scene(), showcase.camera());
        let labels = showcase.projected_labels();
        let overlay = overlay.render_labels(&labels, showcase.viewport());

        let report = FrameReport {
            frame: self.frames,
            elapsed,
            step,
            camera_moved,
            refreshed_textures,
            hovered,
        };
        tracing::trace!(?report, "frame");
        self.frames += 1;

        FrameOutput {
            report,
            scene,
            overlay,
        }
    }
}
