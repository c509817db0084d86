use crate::config::EngineConfig;
use crate::connector::path::ConnectorPath;
use crate::connector::pool::EntityPool;
use crate::foundation::core::{Point, Viewport};
use crate::foundation::rng::Rng64;
use crate::layout::resolver::{AnchorPair, LayoutResolver, LayoutSource};
use crate::particles::field::ParticleField;
use crate::surface::visual::{PathVariant, VisualSurface};

/// All mutable animation state: paths, the entities riding them, sparks and the RNG.
///
/// Path `i` and lane `i` of the pool always belong together.
#[derive(Clone, Debug)]
pub struct Simulation {
    paths: Vec<ConnectorPath>,
    pool: EntityPool,
    field: ParticleField,
    rng: Rng64,
    viewport: Viewport,
}

impl Simulation {
    pub fn new(cfg: &EngineConfig) -> Self {
        Self {
            paths: Vec::new(),
            pool: EntityPool::new(cfg.packets.cap),
            field: ParticleField::new(),
            rng: Rng64::new(cfg.seed),
            viewport: Viewport::default(),
        }
    }

    pub fn paths(&self) -> &[ConnectorPath] {
        &self.paths
    }

    pub fn pool(&self) -> &EntityPool {
        &self.pool
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Register a connector for `pair`, build its geometry and seed its markers.
    pub fn add_path(
        &mut self,
        pair: AnchorPair,
        endpoints: (Point, Point),
        cfg: &EngineConfig,
        surface: &mut dyn VisualSurface,
    ) -> usize {
        let variant = PathVariant::for_index(pair.index);
        let handle = surface.register_path(variant, cfg.path.opacity);
        let path = ConnectorPath::new(pair, handle, endpoints, &cfg.path);
        surface.set_path_curve(handle, path.geometry().curve());

        let lane = self.pool.add_lane();
        self.pool
            .seed_markers(lane, variant, &cfg.markers, &mut self.rng, surface);
        self.paths.push(path);
        lane
    }

    /// Give every path one chance at an extra packet with `probability`.
    pub fn seed_packets(
        &mut self,
        probability: f64,
        cfg: &EngineConfig,
        surface: &mut dyn VisualSurface,
    ) -> usize {
        let mut spawned = 0;
        for lane in 0..self.paths.len() {
            if self
                .pool
                .try_spawn(lane, probability, &cfg.packets, &mut self.rng, surface)
            {
                spawned += 1;
            }
        }
        spawned
    }

    pub fn seed_sparks(&mut self, cfg: &EngineConfig) {
        if cfg.sparks.enabled {
            self.field.seed(self.viewport, &cfg.sparks, &mut self.rng);
        }
    }

    /// Re-resolve every path's endpoints. Paths whose anchors are unavailable keep their current
    /// geometry. Returns how many paths were rebuilt.
    pub fn refresh_paths(
        &mut self,
        resolver: &LayoutResolver,
        layout: &dyn LayoutSource,
        cfg: &EngineConfig,
        surface: &mut dyn VisualSurface,
    ) -> usize {
        let mut rebuilt = 0;
        for path in &mut self.paths {
            let Some(endpoints) = resolver.resolve(path.pair(), layout) else {
                tracing::trace!(a = %path.pair().a, b = %path.pair().b, "anchor unavailable, keeping path");
                continue;
            };
            if path.refresh(endpoints, &cfg.path) {
                surface.set_path_curve(path.handle(), path.geometry().curve());
            }
            rebuilt += 1;
        }
        rebuilt
    }

    /// Advance every entity by `dt` seconds and, when `commit` is set, push their visuals.
    ///
    /// With `dt <= 0` nothing advances and no packet spawns; visuals are still committed.
    pub fn step(
        &mut self,
        dt: f64,
        commit: bool,
        cfg: &EngineConfig,
        surface: &mut dyn VisualSurface,
    ) {
        let advancing = dt > 0.0;
        for (i, path) in self.paths.iter().enumerate() {
            let geometry = path.geometry();
            if let Some(lane) = self.pool.lanes_mut().get_mut(i) {
                for m in &mut lane.markers {
                    m.advance(dt);
                    if commit {
                        m.commit(geometry.point_at(m.t), cfg.markers.snap_px, surface);
                    }
                }
                for p in &mut lane.packets {
                    if advancing {
                        p.advance(dt, cfg.packets.hue_rate_deg_per_sec);
                        p.record(geometry.point_at(p.t));
                    }
                    if commit {
                        p.commit(geometry.point_at(p.t), &cfg.packets, surface);
                    }
                }
            }
            if advancing {
                self.pool.try_spawn(
                    i,
                    cfg.packets.spawn_probability_per_tick,
                    &cfg.packets,
                    &mut self.rng,
                    surface,
                );
            }
        }

        if cfg.sparks.enabled {
            if advancing {
                self.field
                    .step(dt, self.viewport, &cfg.sparks, &mut self.rng);
            }
            self.field.render(&cfg.sparks, surface);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/connector/state.rs"]
mod tests;
