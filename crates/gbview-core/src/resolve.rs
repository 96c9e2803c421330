//! Edge-loop to polygon reconstruction.
//!
//! One vertex per loop entry: the directed start point of each co-surface.
//! Entries whose surface or point does not resolve are skipped. Nothing is
//! deduplicated, closed, or re-wound.

use crate::geom::Vec2;
use crate::model::{CoSurface, Level, Space, Surface};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Fewest resolved vertices that still count as geometry.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// A loop entry that contributed no vertex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoopGap {
    MissingSurface {
        co_surface_id: String,
        surface_id: String,
    },
    MissingPoint {
        co_surface_id: String,
        surface_id: String,
        point_key: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedLoop {
    pub vertices: Vec<Vec2>,
    pub gaps: Vec<LoopGap>,
}

impl ResolvedLoop {
    pub fn has_geometry(&self) -> bool {
        self.vertices.len() >= MIN_POLYGON_VERTICES
    }
}

/// Surface lookup for a level. Linear by default; [`LevelIndex`] hashes.
pub trait SurfaceLookup {
    fn level(&self) -> &Level;
    fn find_surface(&self, id: &str) -> Option<&Surface>;
}

impl SurfaceLookup for Level {
    fn level(&self) -> &Level {
        self
    }

    fn find_surface(&self, id: &str) -> Option<&Surface> {
        self.surface(id)
    }
}

/// Hashed surface table for resolving many loops of one level.
pub struct LevelIndex<'a> {
    level: &'a Level,
    surfaces: HashMap<&'a str, &'a Surface>,
}

impl<'a> LevelIndex<'a> {
    pub fn new(level: &'a Level) -> Self {
        let mut surfaces = HashMap::with_capacity(level.surfaces.len());
        for s in &level.surfaces {
            // First occurrence wins, same as a linear scan.
            surfaces.entry(s.id.as_str()).or_insert(s);
        }
        Self { level, surfaces }
    }
}

impl SurfaceLookup for LevelIndex<'_> {
    fn level(&self) -> &Level {
        self.level
    }

    fn find_surface(&self, id: &str) -> Option<&Surface> {
        self.surfaces.get(id).copied()
    }
}

pub fn resolve_loop(entries: &[CoSurface], level: &impl SurfaceLookup) -> Vec<Vec2> {
    resolve_loop_detailed(entries, level).vertices
}

pub fn resolve_space(space: &Space, level: &impl SurfaceLookup) -> Vec<Vec2> {
    resolve_loop(&space.outer_loop, level)
}

pub fn resolve_loop_detailed(entries: &[CoSurface], level: &impl SurfaceLookup) -> ResolvedLoop {
    let mut out = ResolvedLoop {
        vertices: Vec::with_capacity(entries.len()),
        gaps: Vec::new(),
    };

    for co in entries {
        let Some(surface) = level.find_surface(&co.surface_id) else {
            debug!(co_surface = %co.id, surface = %co.surface_id, "skipping unresolved surface");
            out.gaps.push(LoopGap::MissingSurface {
                co_surface_id: co.id.clone(),
                surface_id: co.surface_id.clone(),
            });
            continue;
        };

        let key = co.start_key(surface);
        let Some(pos) = level.level().point(key) else {
            debug!(co_surface = %co.id, point = %key, "skipping unresolved point");
            out.gaps.push(LoopGap::MissingPoint {
                co_surface_id: co.id.clone(),
                surface_id: surface.id.clone(),
                point_key: key.to_string(),
            });
            continue;
        };

        out.vertices.push(pos);
    }

    out
}
