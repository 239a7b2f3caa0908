//! Show lifecycle
//!
//! `Idle` until started, then `Running` with exactly one frame scheduled at
//! a time. Each frame reschedules itself first, then steps the simulation
//! and paints. Stopping cancels the pending frame and empties the pools.

use glam::Vec2;

use crate::renderer::{Surface, paint_frame};
use crate::settings::{SettingsError, ShowSettings};
use crate::sim::{LaunchOutcome, SimState, TickSummary, Viewport, tick};

/// Host-issued id of a scheduled frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// The host's frame clock (`requestAnimationFrame` in the browser)
pub trait FrameScheduler {
    /// Ask for one callback on the next frame. `None` if the host refused.
    fn request_frame(&mut self) -> Option<FrameHandle>;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
}

/// Lifecycle errors
#[derive(Debug, Clone, PartialEq)]
pub enum ShowError {
    /// `start` while already running would double the frame loop
    AlreadyRunning,
    InvalidViewport { width: f32, height: f32 },
    /// The host could not schedule a frame
    FrameUnavailable,
    Settings(SettingsError),
}

impl std::fmt::Display for ShowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyRunning => write!(f, "show is already running"),
            Self::InvalidViewport { width, height } => {
                write!(f, "canvas has no drawable area ({width}x{height})")
            }
            Self::FrameUnavailable => write!(f, "host refused to schedule a frame"),
            Self::Settings(e) => write!(f, "invalid settings: {e}"),
        }
    }
}

impl std::error::Error for ShowError {}

impl From<SettingsError> for ShowError {
    fn from(e: SettingsError) -> Self {
        Self::Settings(e)
    }
}

/// The firework show: simulation state plus its frame loop
#[derive(Debug)]
pub struct Show {
    state: SimState,
    phase: Phase,
    pending_frame: Option<FrameHandle>,
}

impl Show {
    pub fn new(settings: ShowSettings, seed: u64) -> Result<Self, ShowError> {
        settings.validate()?;
        Ok(Self {
            state: SimState::new(settings, Viewport::new(0.0, 0.0), seed),
            phase: Phase::Idle,
            pending_frame: None,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn settings(&self) -> &ShowSettings {
        &self.state.settings
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending_frame
    }

    /// Reset both pools and begin ticking on `viewport`
    pub fn start(
        &mut self,
        viewport: Viewport,
        scheduler: &mut impl FrameScheduler,
    ) -> Result<(), ShowError> {
        if self.is_running() {
            return Err(ShowError::AlreadyRunning);
        }
        if !viewport.is_drawable() {
            return Err(ShowError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let handle = scheduler.request_frame().ok_or(ShowError::FrameUnavailable)?;
        self.state.viewport = viewport;
        self.state.reset();
        self.pending_frame = Some(handle);
        self.phase = Phase::Running;

        log::info!(
            "Show started ({}, {}x{}, seed {})",
            self.state.settings.variant.as_str(),
            viewport.width,
            viewport.height,
            self.state.rng.seed()
        );
        Ok(())
    }

    /// Stop ticking, cancel the pending frame and clear both pools.
    /// Returns false if the show was already idle.
    pub fn stop(&mut self, scheduler: &mut impl FrameScheduler) -> bool {
        if !self.is_running() {
            return false;
        }
        self.phase = Phase::Idle;
        if let Some(handle) = self.pending_frame.take() {
            scheduler.cancel_frame(handle);
        }
        let frames = self.state.time_ticks;
        self.state.reset();
        log::info!("Show stopped after {} frames", frames);
        true
    }

    /// New canvas size while running (window resize)
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport.is_drawable() {
            self.state.viewport = viewport;
        } else {
            log::warn!("Ignoring resize to {}x{}", viewport.width, viewport.height);
        }
    }

    /// Pointer/tap at `pos` (canvas space). `now_ms` feeds the cooldown.
    pub fn launch(&mut self, pos: Vec2, now_ms: f64) -> LaunchOutcome {
        if !self.is_running() {
            return LaunchOutcome::Idle;
        }
        let outcome = self.state.request_launch(pos, now_ms);
        if !outcome.is_launched() {
            log::warn!("Launch at ({:.0}, {:.0}) rejected: {:?}", pos.x, pos.y, outcome);
        }
        outcome
    }

    /// Frame callback. A frame arriving after `stop` is a no-op.
    pub fn on_frame(
        &mut self,
        scheduler: &mut impl FrameScheduler,
        surface: &mut impl Surface,
    ) -> Result<Option<TickSummary>, ShowError> {
        if !self.is_running() {
            return Ok(None);
        }

        // Keep exactly one frame in flight
        self.pending_frame = scheduler.request_frame();
        if self.pending_frame.is_none() {
            self.phase = Phase::Idle;
            return Err(ShowError::FrameUnavailable);
        }

        let summary = tick(&mut self.state);
        paint_frame(&self.state, surface);
        Ok(Some(summary))
    }
}

/// Scheduler driven by hand: tests and the native runner
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: Option<FrameHandle>,
    pub requested: u64,
    pub cancelled: Vec<FrameHandle>,
    /// Refuse every request (simulates a host without a frame clock)
    pub refuse: bool,
}

impl ManualScheduler {
    /// Take the frame due now, if one is scheduled
    pub fn take_pending(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        if self.refuse {
            return None;
        }
        self.next_id += 1;
        self.requested += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
        self.cancelled.push(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RecordingSurface;

    const VIEW: Viewport = Viewport {
        width: 400.0,
        height: 600.0,
    };

    /// Fire whatever frame is due; false when nothing was scheduled
    fn pump(show: &mut Show, scheduler: &mut ManualScheduler, surface: &mut RecordingSurface) -> bool {
        if scheduler.take_pending().is_none() {
            return false;
        }
        show.on_frame(scheduler, surface).unwrap();
        true
    }

    #[test]
    fn test_start_schedules_one_frame() {
        let mut show = Show::new(ShowSettings::timed(), 1).unwrap();
        let mut scheduler = ManualScheduler::default();
        assert_eq!(show.phase(), Phase::Idle);

        show.start(VIEW, &mut scheduler).unwrap();
        assert_eq!(show.phase(), Phase::Running);
        assert_eq!(scheduler.requested, 1);
        assert_eq!(show.pending_frame(), Some(FrameHandle(1)));
    }

    #[test]
    fn test_double_start_rejected() {
        let mut show = Show::new(ShowSettings::timed(), 1).unwrap();
        let mut scheduler = ManualScheduler::default();
        show.start(VIEW, &mut scheduler).unwrap();
        assert_eq!(show.start(VIEW, &mut scheduler), Err(ShowError::AlreadyRunning));
        assert_eq!(scheduler.requested, 1);
    }

    #[test]
    fn test_start_requires_drawable_canvas() {
        let mut show = Show::new(ShowSettings::timed(), 1).unwrap();
        let mut scheduler = ManualScheduler::default();
        let err = show.start(Viewport::new(0.0, 0.0), &mut scheduler).unwrap_err();
        assert!(matches!(err, ShowError::InvalidViewport { .. }));
        assert_eq!(show.phase(), Phase::Idle);
        assert_eq!(scheduler.requested, 0);
    }

    #[test]
    fn test_start_without_frame_clock() {
        let mut show = Show::new(ShowSettings::timed(), 1).unwrap();
        let mut scheduler = ManualScheduler {
            refuse: true,
            ..Default::default()
        };
        assert_eq!(show.start(VIEW, &mut scheduler), Err(ShowError::FrameUnavailable));
        assert!(!show.is_running());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut settings = ShowSettings::capped();
        settings.particles_per_explosion = 0;
        assert!(matches!(Show::new(settings, 1), Err(ShowError::Settings(_))));
    }

    #[test]
    fn test_each_frame_reschedules() {
        let mut show = Show::new(ShowSettings::timed(), 1).unwrap();
        let mut scheduler = ManualScheduler::default();
        let mut surface = RecordingSurface::default();
        show.start(VIEW, &mut scheduler).unwrap();
        for _ in 0..10 {
            assert!(pump(&mut show, &mut scheduler, &mut surface));
        }
        assert_eq!(scheduler.requested, 11);
        assert_eq!(show.state().time_ticks, 10);
    }

    #[test]
    fn test_stop_cancels_and_clears() {
        let mut show = Show::new(ShowSettings::timed(), 1).unwrap();
        let mut scheduler = ManualScheduler::default();
        let mut surface = RecordingSurface::default();
        show.start(VIEW, &mut scheduler).unwrap();
        show.launch(Vec2::new(200.0, 100.0), 0.0);
        for _ in 0..120 {
            pump(&mut show, &mut scheduler, &mut surface);
        }
        assert!(!show.state().particles.is_empty() || !show.state().fireworks.is_empty());

        let pending = show.pending_frame().unwrap();
        assert!(show.stop(&mut scheduler));
        assert_eq!(scheduler.cancelled, vec![pending]);
        assert!(!scheduler.has_pending());
        assert!(show.state().fireworks.is_empty());
        assert!(show.state().particles.is_empty());

        // No more frames run, pools stay empty
        for _ in 0..100 {
            assert!(!pump(&mut show, &mut scheduler, &mut surface));
        }
        assert!(show.state().particles.is_empty());
        assert!(!show.stop(&mut scheduler));
    }

    #[test]
    fn test_stray_frame_after_stop_is_noop() {
        let mut show = Show::new(ShowSettings::timed(), 1).unwrap();
        let mut scheduler = ManualScheduler::default();
        let mut surface = RecordingSurface::default();
        show.start(VIEW, &mut scheduler).unwrap();
        show.stop(&mut scheduler);

        let ops_before = surface.total_ops;
        let result = show.on_frame(&mut scheduler, &mut surface).unwrap();
        assert_eq!(result, None);
        assert_eq!(surface.total_ops, ops_before);
        assert_eq!(scheduler.requested, 1);
    }

    #[test]
    fn test_launch_while_idle() {
        let mut show = Show::new(ShowSettings::capped(), 1).unwrap();
        assert_eq!(show.launch(Vec2::new(1.0, 1.0), 0.0), LaunchOutcome::Idle);
        assert!(show.state().fireworks.is_empty());
    }

    #[test]
    fn test_restart_after_stop() {
        let mut show = Show::new(ShowSettings::capped(), 1).unwrap();
        let mut scheduler = ManualScheduler::default();
        show.start(VIEW, &mut scheduler).unwrap();
        show.launch(Vec2::new(1.0, 1.0), 0.0);
        show.stop(&mut scheduler);
        show.start(Viewport::new(800.0, 600.0), &mut scheduler).unwrap();
        assert!(show.state().fireworks.is_empty());
        // Cooldown history cleared with the pools
        assert!(show.launch(Vec2::new(1.0, 1.0), 10.0).is_launched());
        assert_eq!(show.state().fireworks[0].origin, Vec2::new(400.0, 600.0));
    }

    #[test]
    fn test_restart_during_fade_keeps_running() {
        let mut show = Show::new(ShowSettings::timed(), 1).unwrap();
        let mut scheduler = ManualScheduler::default();
        let mut surface = RecordingSurface::default();
        show.start(VIEW, &mut scheduler).unwrap();
        assert!(show.stop(&mut scheduler));
        show.start(VIEW, &mut scheduler).unwrap();

        // Teardown of the earlier stop must see a live show and skip it
        assert!(show.is_running());
        assert!(show.pending_frame().is_some());
        assert!(pump(&mut show, &mut scheduler, &mut surface));
    }

    #[test]
    fn test_unbounded_jitter_rejected_before_start() {
        let mut settings = ShowSettings::timed();
        settings.particle.hue_jitter = 3e38;
        assert!(matches!(
            Show::new(settings, 1),
            Err(ShowError::Settings(SettingsError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn test_resize_moves_launch_origin() {
        let mut show = Show::new(ShowSettings::timed(), 1).unwrap();
        let mut scheduler = ManualScheduler::default();
        show.start(VIEW, &mut scheduler).unwrap();
        show.resize(Viewport::new(1000.0, 500.0));
        show.resize(Viewport::new(0.0, 500.0));
        show.launch(Vec2::new(10.0, 10.0), 0.0);
        assert_eq!(show.state().fireworks[0].origin, Vec2::new(500.0, 500.0));
    }

    #[test]
    fn test_end_to_end_pointer_burst() {
        for settings in [ShowSettings::timed(), ShowSettings::capped()] {
            let batch = settings.particles_per_explosion;
            let mut show = Show::new(settings, 2024).unwrap();
            let mut scheduler = ManualScheduler::default();
            let mut surface = RecordingSurface::default();

            show.start(VIEW, &mut scheduler).unwrap();
            assert!(show.launch(Vec2::new(200.0, 100.0), 0.0).is_launched());

            let mut frames = 0;
            loop {
                assert!(pump(&mut show, &mut scheduler, &mut surface));
                frames += 1;
                assert!(frames < 500, "firework never arrived");
                if show.state().fireworks.is_empty() {
                    break;
                }
            }
            assert_eq!(show.state().particles.len(), batch);
            assert!(show.state().fireworks.is_empty());

            // The burst is painted as text on the next frame
            surface.take_ops();
            pump(&mut show, &mut scheduler, &mut surface);
            assert_eq!(surface.text_count(), batch);
        }
    }
}
