//! Platform streaming: pooled spawn-ahead and retrieve-behind
//!
//! Platforms live in one arena sorted by id. Pooled platforms are allocated
//! up front per (tier, kind) and only ever toggle between a pool queue and the
//! world. Consumables (one-time, swapper) and hand-placed ledges are created
//! fresh and are never queued.

use std::collections::{BTreeMap, VecDeque};

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::feet_cross_platform;
use super::events::{EventHub, Mailbox, Signal, SignalKind};
use super::polygon::ColorLayer;
use super::timer::Cadence;
use crate::consts::{STARTING_TIER, TRAMPOLINE_MULTIPLIER};
use crate::tuning::Tuning;

/// Platform behaviour on landing
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum PlatformKind {
    #[default]
    Default,
    /// Breaks after one bounce
    OneTime,
    /// Bounces higher
    Trampoline,
    /// Breaks and swaps the controls after a countdown
    Swapper,
}

impl PlatformKind {
    pub fn bounce_multiplier(self) -> f32 {
        match self {
            PlatformKind::Trampoline => TRAMPOLINE_MULTIPLIER,
            _ => 1.0,
        }
    }

    /// Destroyed on first landing
    pub fn is_consumable(self) -> bool {
        matches!(self, PlatformKind::OneTime | PlatformKind::Swapper)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlatformId(pub u32);

/// Where a platform came from, and so where it goes when retrieved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformOrigin {
    /// Owned by a pool queue while inactive
    Pooled,
    /// Created on demand, dropped when consumed or left behind
    Fresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: PlatformId,
    /// Color tier (palette index)
    pub tier: u32,
    pub kind: PlatformKind,
    /// Center of the top surface
    pub pos: Vec2,
    pub active: bool,
    pub origin: PlatformOrigin,
}

impl Platform {
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    fn pool_key(&self) -> PoolKey {
        PoolKey {
            tier: self.tier,
            kind: self.kind,
        }
    }
}

/// Pool queue identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolKey {
    pub tier: u32,
    pub kind: PlatformKind,
}

/// A landing found by the collision query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformContact {
    pub id: PlatformId,
    pub kind: PlatformKind,
    pub top: f32,
}

/// Streaming parameters copied out of the tuning
#[derive(Debug, Clone)]
struct StreamParams {
    pool_size: u32,
    pool_tiers: u32,
    spawn_ahead_distance: f32,
    retrieve_distance: f32,
    spacing: f32,
    chunk_size: u32,
    lateral_extent: f32,
    platform_half_width: f32,
    one_time_chance: f32,
    trampoline_chance: f32,
    swapper_chance: f32,
}

impl StreamParams {
    fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            pool_size: tuning.pool_size,
            pool_tiers: tuning.pool_tiers(),
            spawn_ahead_distance: tuning.spawn_ahead_distance,
            retrieve_distance: tuning.retrieve_distance,
            spacing: tuning.spacing,
            chunk_size: tuning.chunk_size,
            lateral_extent: tuning.lateral_extent,
            platform_half_width: tuning.platform_half_width,
            one_time_chance: tuning.one_time_chance,
            trampoline_chance: tuning.trampoline_chance,
            swapper_chance: tuning.swapper_chance,
        }
    }
}

/// Owns every platform and its activation state
#[derive(Debug)]
pub struct PlatformManager {
    params: StreamParams,
    /// Collision layer per tier
    layers: Vec<ColorLayer>,
    /// All platforms, sorted by id
    platforms: Vec<Platform>,
    pools: BTreeMap<PoolKey, VecDeque<PlatformId>>,
    /// Pooled platforms ever allocated per key (grows on exhaustion)
    allocated: BTreeMap<PoolKey, u32>,
    tier: u32,
    last_spawn_height: f32,
    retrieve: Cadence,
    game_ended: bool,
    rng: Pcg32,
    mailbox: Mailbox,
    next_id: u32,
}

impl PlatformManager {
    /// Pre-allocate every pool and subscribe to level-up/game-end
    pub fn new(tuning: &Tuning, hub: &EventHub, rng: Pcg32) -> Self {
        let params = StreamParams::from_tuning(tuning);
        let layers = (0..params.pool_tiers as usize)
            .map(|tier| tuning.palette.layer(tier))
            .collect();

        let mut manager = Self {
            layers,
            platforms: Vec::new(),
            pools: BTreeMap::new(),
            allocated: BTreeMap::new(),
            tier: STARTING_TIER,
            last_spawn_height: 0.0,
            retrieve: Cadence::new(tuning.retrieve_interval),
            game_ended: false,
            rng,
            mailbox: Mailbox::subscribe(hub, &[SignalKind::PlayerLeveledUp, SignalKind::GameEnded]),
            next_id: 1,
            params,
        };

        let mut pooled_kinds = vec![PlatformKind::Default];
        if manager.params.trampoline_chance > 0.0 {
            pooled_kinds.push(PlatformKind::Trampoline);
        }
        for tier in 0..manager.params.pool_tiers {
            for &kind in &pooled_kinds {
                let key = PoolKey { tier, kind };
                for _ in 0..manager.params.pool_size {
                    let id = manager.allocate_pooled(key);
                    manager.pools.entry(key).or_default().push_back(id);
                }
            }
        }

        manager
    }

    fn next_platform_id(&mut self) -> PlatformId {
        let id = PlatformId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Create an inactive pooled platform; the caller queues or activates it
    fn allocate_pooled(&mut self, key: PoolKey) -> PlatformId {
        let id = self.next_platform_id();
        self.platforms.push(Platform {
            id,
            tier: key.tier,
            kind: key.kind,
            pos: Vec2::ZERO,
            active: false,
            origin: PlatformOrigin::Pooled,
        });
        *self.allocated.entry(key).or_insert(0) += 1;
        id
    }

    fn index_of(&self, id: PlatformId) -> Option<usize> {
        self.platforms.binary_search_by_key(&id, |p| p.id).ok()
    }

    pub fn get(&self, id: PlatformId) -> Option<&Platform> {
        self.index_of(id).map(|i| &self.platforms[i])
    }

    /// Current difficulty tier (mirrors player level)
    pub fn tier(&self) -> u32 {
        self.tier
    }

    pub fn last_spawn_height(&self) -> f32 {
        self.last_spawn_height
    }

    /// Retrieve cadence halted by game end
    pub fn is_stopped(&self) -> bool {
        self.retrieve.is_stopped()
    }

    pub fn layer_for_tier(&self, tier: u32) -> Option<ColorLayer> {
        self.layers.get(tier as usize).copied()
    }

    pub fn active(&self) -> impl Iterator<Item = &Platform> {
        self.platforms.iter().filter(|p| p.active)
    }

    /// Active pooled platforms in `tier`
    pub fn active_count(&self, tier: u32) -> usize {
        self.platforms
            .iter()
            .filter(|p| p.active && p.tier == tier && p.origin == PlatformOrigin::Pooled)
            .count()
    }

    /// Queued platforms in `tier`, all kinds
    pub fn queue_len(&self, tier: u32) -> usize {
        self.pools
            .iter()
            .filter(|(key, _)| key.tier == tier)
            .map(|(_, queue)| queue.len())
            .sum()
    }

    /// Pooled platforms ever allocated for `tier`
    pub fn allocated(&self, tier: u32) -> usize {
        self.allocated
            .iter()
            .filter(|(key, _)| key.tier == tier)
            .map(|(_, &count)| count as usize)
            .sum()
    }

    /// Pick a platform kind from a uniform roll in [0, 1)
    fn roll_kind(&self, roll: f32) -> PlatformKind {
        let one_time = self.params.one_time_chance;
        let trampoline = one_time + self.params.trampoline_chance;
        let swapper = trampoline + self.params.swapper_chance;
        if roll < one_time {
            PlatformKind::OneTime
        } else if roll < trampoline {
            PlatformKind::Trampoline
        } else if roll < swapper {
            PlatformKind::Swapper
        } else {
            PlatformKind::Default
        }
    }

    /// Spawn one chunk of platforms stacked upward from `start_height`
    pub fn spawn_chunk(&mut self, start_height: f32) {
        self.last_spawn_height = start_height;
        let eligible = self.tier.min(self.params.pool_tiers).max(1);
        let extent = self.params.lateral_extent;

        for i in 0..self.params.chunk_size {
            let tier = self.rng.random_range(0..eligible);
            let roll: f32 = self.rng.random();
            let kind = self.roll_kind(roll);
            let x = self.rng.random_range(-extent..extent);
            let pos = Vec2::new(x, start_height + i as f32 * self.params.spacing);

            if kind.is_consumable() {
                self.place(kind, tier, pos);
            } else {
                self.activate_pooled(PoolKey { tier, kind }, pos);
            }
        }

        log::debug!(
            "spawned chunk of {} at {:.2} (tier {})",
            self.params.chunk_size,
            start_height,
            self.tier
        );
    }

    /// Take the next queued platform for `key`, growing the pool if empty
    fn activate_pooled(&mut self, key: PoolKey, pos: Vec2) -> PlatformId {
        let id = match self.pools.get_mut(&key).and_then(|queue| queue.pop_front()) {
            Some(id) => id,
            None => {
                log::warn!("pool {:?} exhausted, growing by one", key);
                self.allocate_pooled(key)
            }
        };

        if let Some(index) = self.index_of(id) {
            let platform = &mut self.platforms[index];
            debug_assert!(!platform.active, "queued platform {:?} was already active", id);
            platform.pos = pos;
            platform.active = true;
        }
        id
    }

    /// Add a fresh platform to the world (consumables, hand-placed ledges)
    pub fn place(&mut self, kind: PlatformKind, tier: u32, pos: Vec2) -> PlatformId {
        debug_assert!((tier as usize) < self.layers.len(), "tier {} has no color", tier);
        let id = self.next_platform_id();
        self.platforms.push(Platform {
            id,
            tier,
            kind,
            pos,
            active: true,
            origin: PlatformOrigin::Fresh,
        });
        id
    }

    /// Permanently remove a platform (after a consumable landing)
    pub fn remove(&mut self, id: PlatformId) -> Option<Platform> {
        let index = self.index_of(id)?;
        let platform = self.platforms.remove(index);
        if platform.origin == PlatformOrigin::Pooled {
            let key = platform.pool_key();
            if let Some(queue) = self.pools.get_mut(&key) {
                queue.retain(|&queued| queued != id);
            }
            if let Some(count) = self.allocated.get_mut(&key) {
                *count = count.saturating_sub(1);
            }
        }
        Some(platform)
    }

    /// Recycle everything at least `retrieve_distance` below the player
    ///
    /// Returns how many pooled platforms went back to their queues.
    pub fn retrieve_sweep(&mut self, player_y: f32) -> usize {
        let cutoff = player_y - self.params.retrieve_distance;
        let mut recycled = 0;

        for platform in &mut self.platforms {
            if !platform.active || platform.origin != PlatformOrigin::Pooled {
                continue;
            }
            if platform.pos.y > cutoff {
                continue;
            }
            platform.active = false;
            self.pools
                .entry(platform.pool_key())
                .or_default()
                .push_back(platform.id);
            recycled += 1;
        }

        let before = self.platforms.len();
        self.platforms
            .retain(|p| p.origin == PlatformOrigin::Pooled || p.pos.y > cutoff);
        let dropped = before - self.platforms.len();

        log::debug!(
            "retrieve sweep below {:.2}: {} recycled, {} dropped",
            cutoff,
            recycled,
            dropped
        );
        recycled
    }

    /// Presentation-phase update: signals, spawn-ahead, retrieve cadence
    pub fn update(&mut self, dt: f32, player_y: f32) {
        for signal in self.mailbox.drain() {
            match signal {
                Signal::PlayerLeveledUp { .. } => {
                    self.tier += 1;
                    log::info!("platform tier raised to {}", self.tier);
                }
                Signal::GameEnded => {
                    self.game_ended = true;
                    self.retrieve.stop();
                }
                _ => {}
            }
        }
        if self.game_ended {
            return;
        }

        if player_y + self.params.spawn_ahead_distance > self.last_spawn_height {
            let next = self.last_spawn_height + self.params.spacing * self.params.chunk_size as f32;
            self.spawn_chunk(next);
        }

        for _ in 0..self.retrieve.advance(dt) {
            self.retrieve_sweep(player_y);
        }
    }

    /// Highest platform whose top the player's feet crossed this tick
    ///
    /// Only platforms on the player's color layer are solid.
    pub fn landing_contact(
        &self,
        prev_feet: Vec2,
        feet: Vec2,
        half_width: f32,
        layer: ColorLayer,
    ) -> Option<PlatformContact> {
        let reach = half_width + self.params.platform_half_width;
        self.active()
            .filter(|p| self.layer_for_tier(p.tier) == Some(layer))
            .filter(|p| feet_cross_platform(prev_feet, feet, reach, p.pos))
            .max_by(|a, b| a.top().total_cmp(&b.top()))
            .map(|p| PlatformContact {
                id: p.id,
                kind: p.kind,
                top: p.top(),
            })
    }

    /// Check the pooled/active bookkeeping (tests and debug builds)
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut seen = BTreeMap::new();
        for (key, queue) in &self.pools {
            for id in queue {
                if seen.insert(*id, *key).is_some() {
                    return Err(format!("{:?} queued twice", id));
                }
                match self.get(*id) {
                    Some(p) if p.active => return Err(format!("{:?} queued while active", id)),
                    Some(p) if p.pool_key() != *key => {
                        return Err(format!("{:?} queued in the wrong pool", id));
                    }
                    None => return Err(format!("{:?} queued but missing", id)),
                    _ => {}
                }
            }
        }
        for platform in &self.platforms {
            let queued = seen.contains_key(&platform.id);
            match platform.origin {
                PlatformOrigin::Pooled if platform.active == queued => {
                    return Err(format!(
                        "{:?} must be exactly one of active or queued",
                        platform.id
                    ));
                }
                PlatformOrigin::Fresh if queued => {
                    return Err(format!("fresh {:?} was queued", platform.id));
                }
                _ => {}
            }
        }
        Ok(())
    }
}
