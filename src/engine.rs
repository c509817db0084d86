use std::cell::RefCell;
use std::rc::Rc;

use crate::config::EngineConfig;
use crate::connector::state::Simulation;
use crate::connector::stepper::{FrameStepper, TickOutcome};
use crate::foundation::core::Viewport;
use crate::foundation::error::NeonResult;
use crate::host::clock::FrameClock;
use crate::host::events::{EventKind, HostEvent, HostEvents, Subscription};
use crate::layout::resolver::{LayoutResolver, LayoutSource};
use crate::surface::visual::VisualSurface;

/// Counters describing the current state of an engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct EngineStats {
    pub paths: usize,
    pub markers: usize,
    pub live_packets: usize,
    pub sparks: usize,
    pub ticks: u64,
    pub commits: u64,
    pub layout_refreshes: u64,
}

/// Connector, packet and spark animation for one page.
///
/// Host callbacks only flip flags through [`ConnectorEngine::handle_event`]; every mutation of
/// animation state happens inside [`ConnectorEngine::frame`].
#[derive(Debug)]
pub struct ConnectorEngine {
    config: EngineConfig,
    sim: Simulation,
    stepper: FrameStepper,
    resolver: LayoutResolver,
    init_requested: bool,
    initialized: bool,
    canvas_resize: Option<Viewport>,
    reduced_motion: bool,
    static_committed: bool,
    /// Events that arrived while the engine was borrowed, replayed at the next frame.
    deferred: Rc<RefCell<Vec<HostEvent>>>,
}

impl ConnectorEngine {
    pub fn new(config: EngineConfig) -> NeonResult<Self> {
        config.validate()?;
        Ok(Self {
            sim: Simulation::new(&config),
            stepper: FrameStepper::new(&config.stepper),
            resolver: LayoutResolver::new(),
            config,
            init_requested: false,
            initialized: false,
            canvas_resize: None,
            reduced_motion: false,
            static_committed: false,
            deferred: Rc::default(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_hidden(&self) -> bool {
        self.stepper.is_hidden()
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Hold the scene still: paths are still built and drawn once, nothing moves or spawns.
    pub fn set_reduced_motion(&mut self, on: bool) {
        if self.reduced_motion != on {
            self.static_committed = false;
        }
        self.reduced_motion = on;
    }

    /// Ask for a layout refresh at the start of the next frame.
    pub fn queue_layout_update(&mut self) {
        self.resolver.queue_update();
    }

    pub fn handle_event(&mut self, event: &HostEvent) {
        match *event {
            HostEvent::Load => self.init_requested = true,
            HostEvent::Resize(viewport) => {
                self.canvas_resize = Some(viewport);
                self.resolver.queue_update();
            }
            HostEvent::OrientationChange | HostEvent::Scroll { .. } => {
                self.resolver.queue_update();
            }
            HostEvent::VisibilityChange { hidden } => self.stepper.set_hidden(hidden),
            HostEvent::PageHide => self.stepper.set_hidden(true),
        }
    }

    /// Subscribe `engine` to every host event it reacts to. Dropping the returned guards
    /// detaches it again.
    ///
    /// An event emitted while the engine is borrowed (from inside a frame, say) is queued and
    /// applied in order at the start of the next frame.
    pub fn attach(engine: &Rc<RefCell<ConnectorEngine>>, events: &HostEvents) -> Vec<Subscription> {
        const KINDS: [EventKind; 6] = [
            EventKind::Load,
            EventKind::Resize,
            EventKind::OrientationChange,
            EventKind::Scroll,
            EventKind::VisibilityChange,
            EventKind::PageHide,
        ];
        let deferred = Rc::clone(&engine.borrow().deferred);
        KINDS
            .into_iter()
            .map(|kind| {
                let weak = Rc::downgrade(engine);
                let deferred = Rc::clone(&deferred);
                events.subscribe(kind, move |event| {
                    let Some(engine) = weak.upgrade() else {
                        return;
                    };
                    match engine.try_borrow_mut() {
                        Ok(mut engine) => engine.handle_event(event),
                        Err(_) => {
                            tracing::trace!(?kind, "engine busy, event deferred");
                            deferred.borrow_mut().push(*event);
                        }
                    };
                })
            })
            .collect()
    }

    /// Build every path whose anchors resolve, seed markers, packets and sparks, and size the
    /// spark canvas. Anchor pairs that cannot be resolved now are skipped for the session.
    #[tracing::instrument(skip_all)]
    pub fn init(&mut self, layout: &dyn LayoutSource, surface: &mut dyn VisualSurface) {
        if self.initialized {
            tracing::debug!("already initialized");
            return;
        }
        let viewport = layout.viewport();
        self.sim.set_viewport(viewport);
        surface.set_viewport(viewport);

        let mut skipped = 0usize;
        for pair in self.config.anchor_pairs() {
            match self.resolver.resolve(&pair, layout) {
                Some(endpoints) => {
                    self.sim.add_path(pair, endpoints, &self.config, surface);
                }
                None => {
                    tracing::trace!(a = %pair.a, b = %pair.b, "anchor pair skipped");
                    skipped += 1;
                }
            }
        }
        let spawned = self.sim.seed_packets(
            self.config.packets.initial_spawn_probability,
            &self.config,
            surface,
        );
        self.sim.seed_sparks(&self.config);
        surface.resize_canvas(viewport);
        self.canvas_resize = None;

        self.initialized = true;
        self.init_requested = false;
        tracing::debug!(
            paths = self.sim.paths().len(),
            skipped,
            packets = spawned,
            "connector engine initialized"
        );
    }

    #[tracing::instrument(skip_all)]
    fn refresh_layout(&mut self, layout: &dyn LayoutSource, surface: &mut dyn VisualSurface) {
        let viewport = layout.viewport();
        self.sim.set_viewport(viewport);
        surface.set_viewport(viewport);
        let rebuilt = self
            .sim
            .refresh_paths(&self.resolver, layout, &self.config, surface);
        tracing::trace!(rebuilt, total = self.sim.paths().len(), "layout refreshed");
    }

    /// Run one animation frame at host time `now_ms`.
    pub fn frame(
        &mut self,
        now_ms: f64,
        layout: &dyn LayoutSource,
        surface: &mut dyn VisualSurface,
    ) -> TickOutcome {
        let deferred = std::mem::take(&mut *self.deferred.borrow_mut());
        for event in &deferred {
            self.handle_event(event);
        }

        if !self.initialized {
            if !self.init_requested {
                return TickOutcome::Idle;
            }
            self.init(layout, surface);
        }

        if let Some(viewport) = self.canvas_resize.take() {
            surface.resize_canvas(viewport);
        }
        let refreshed = self.resolver.take_pending();
        if refreshed {
            self.refresh_layout(layout, surface);
        }

        if self.reduced_motion {
            self.stepper.skip(now_ms);
            if self.stepper.is_hidden() {
                return TickOutcome::Hidden;
            }
            if !self.static_committed || refreshed {
                self.sim.step(0.0, true, &self.config, surface);
                self.static_committed = true;
            }
            return TickOutcome::Frozen;
        }

        let outcome = self.stepper.begin(now_ms);
        if let TickOutcome::Advanced { dt, commit } = outcome {
            self.sim.step(dt, commit, &self.config, surface);
        }
        outcome
    }

    pub fn tick(
        &mut self,
        clock: &dyn FrameClock,
        layout: &dyn LayoutSource,
        surface: &mut dyn VisualSurface,
    ) -> TickOutcome {
        self.frame(clock.now_ms(), layout, surface)
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            paths: self.sim.paths().len(),
            markers: self.sim.pool().live_markers(),
            live_packets: self.sim.pool().live_packets(),
            sparks: self.sim.field().len(),
            ticks: self.stepper.ticks(),
            commits: self.stepper.commits(),
            layout_refreshes: self.resolver.refreshes(),
        }
    }
}
