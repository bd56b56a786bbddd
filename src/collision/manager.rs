//! Per-frame broad phase, narrow phase and dispatch

use crate::collision::{CollisionEvent, CollisionInfo, CollisionReport, TriggerEvent, TriggerPhase};
use crate::core::config::{BroadPhase, SimulationConfig};
use crate::core::geometry::{collision_normal, Shape};
use crate::entity::Entity;
use crate::spatial::sparse_hash::SparseHashGrid;

/// Frame snapshot of one collidable body
#[derive(Debug, Clone, Copy)]
struct Body {
    shape: Shape,
    is_trigger: bool,
}

pub struct CollisionManager {
    broad_phase: BroadPhase,
    grid: SparseHashGrid,
}

impl CollisionManager {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            broad_phase: config.broad_phase,
            grid: SparseHashGrid::new(config.grid_cell_size),
        }
    }

    pub fn broad_phase(&self) -> BroadPhase {
        self.broad_phase
    }

    /// Test every relevant pair and dispatch collisions and trigger events
    ///
    /// Each unordered pair is resolved at most once per call. Trigger frames
    /// are closed after all pairs are done.
    pub fn resolve(&mut self, bodies: &mut [&mut Entity]) -> CollisionReport {
        let snapshot: Vec<Option<Body>> = bodies
            .iter()
            .map(|entity| {
                if !entity.is_active() {
                    return None;
                }
                let collider = entity.collision()?;
                if !collider.is_active() {
                    return None;
                }
                Some(Body {
                    shape: collider.area_shape(&entity.core),
                    is_trigger: collider.is_trigger(),
                })
            })
            .collect();

        let pairs = self.candidate_pairs(&snapshot);
        let mut report = CollisionReport::default();

        for (i, j) in pairs {
            let (Some(body_a), Some(body_b)) = (snapshot[i], snapshot[j]) else {
                continue;
            };
            let (a, b) = pair_mut(bodies, i, j);
            // Either side may have been switched off by an earlier pair
            if !a.is_active() || !b.is_active() {
                continue;
            }
            let (Some(collider_a), Some(collider_b)) = (a.collision(), b.collision()) else {
                continue;
            };
            if !collider_a.is_active() || !collider_b.is_active() {
                continue;
            }
            if !collider_a.can_collide_with(collider_b) {
                continue;
            }
            let (layer_a, layer_b) = (collider_a.layer(), collider_b.layer());
            report.pairs_tested += 1;
            if !body_a.shape.intersects(&body_b.shape) {
                continue;
            }

            if body_a.is_trigger || body_b.is_trigger {
                if body_a.is_trigger {
                    if let Some(phase) = a.try_trigger(b) {
                        report.triggers.push(TriggerEvent {
                            zone: a.id(),
                            other: b.id(),
                            phase,
                        });
                    }
                }
                if body_b.is_trigger {
                    if let Some(phase) = b.try_trigger(a) {
                        report.triggers.push(TriggerEvent {
                            zone: b.id(),
                            other: a.id(),
                            phase,
                        });
                    }
                }
                continue;
            }

            let normal = collision_normal(&body_a.shape, &body_b.shape);
            // Both payloads are taken before either side reacts
            let from_a = a.hit_payload_for(b.id());
            let from_b = b.hit_payload_for(a.id());

            a.on_collision(&CollisionInfo {
                other: b.id(),
                normal,
                other_layer: layer_b,
                incoming: from_b,
            });
            b.on_collision(&CollisionInfo {
                other: a.id(),
                normal: -normal,
                other_layer: layer_a,
                incoming: from_a,
            });
            report.collisions.push(CollisionEvent {
                a: a.id(),
                b: b.id(),
                normal: normal.to_array(),
            });
        }

        for entity in bodies.iter_mut() {
            if !entity.collision().is_some_and(|c| c.is_trigger()) {
                continue;
            }
            let zone = entity.id();
            for other in entity.finish_trigger_frame() {
                report.triggers.push(TriggerEvent {
                    zone,
                    other,
                    phase: TriggerPhase::Exit,
                });
            }
        }

        report
    }

    fn candidate_pairs(&mut self, snapshot: &[Option<Body>]) -> Vec<(usize, usize)> {
        match self.broad_phase {
            BroadPhase::Naive => {
                let live: Vec<usize> = snapshot
                    .iter()
                    .enumerate()
                    .filter_map(|(i, b)| b.map(|_| i))
                    .collect();
                let mut pairs = Vec::new();
                for (n, &i) in live.iter().enumerate() {
                    for &j in &live[n + 1..] {
                        pairs.push((i, j));
                    }
                }
                pairs
            }
            BroadPhase::Grid => {
                let bounds: Vec<(usize, _)> = snapshot
                    .iter()
                    .enumerate()
                    .filter_map(|(i, b)| b.map(|body| (i, body.shape.bounding_rect())))
                    .collect();
                self.grid.rebuild(bounds.iter().map(|(i, r)| (*i, r)));
                self.grid.candidate_pairs()
            }
        }
    }
}

/// Borrow two distinct bodies at once; requires `i < j`
fn pair_mut<'a>(bodies: &'a mut [&mut Entity], i: usize, j: usize) -> (&'a mut Entity, &'a mut Entity) {
    debug_assert!(i < j);
    let (low, high) = bodies.split_at_mut(j);
    (&mut *low[i], &mut *high[0])
}
