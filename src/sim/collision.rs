//! Per-tick collision resolution
//!
//! Checks run in a fixed order and each one sees the results of the ones
//! before it: a player shot that kills an enemy is gone before the bonus
//! unit or the barriers are tested, and an enemy shot that hits the cannon
//! cannot also chip a barrier.

use super::rect::overlaps;
use super::rng::RandomSource;
use super::state::GameState;

/// What the player's shot hit this tick (at most one thing)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerShotHit {
    Enemy { index: usize, points: u32 },
    Bonus { points: u32 },
    Barrier,
}

/// Outcome of one resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub player_shot: Option<PlayerShotHit>,
    /// An enemy shot struck the cannon
    pub cannon_hit: bool,
    /// Enemy shots absorbed by barriers
    pub enemy_shots_blocked: usize,
    /// Enemy bodies cleared barrier cells
    pub barriers_crushed: bool,
}

/// Resolve every interaction for the current positions
pub fn resolve_collisions(state: &mut GameState, rng: &mut dyn RandomSource) -> CollisionReport {
    let mut report = CollisionReport {
        player_shot: resolve_player_shot(state, rng),
        ..Default::default()
    };

    // Enemy shots vs cannon: at most one kill per tick
    if state.cannon.is_alive() {
        let cannon = state.cannon.bounds();
        if let Some(shot) = state
            .projectiles
            .enemy_shots
            .iter_mut()
            .find(|s| s.active && s.bounds().overlaps(&cannon))
        {
            shot.destroy();
            report.cannon_hit = state.cannon.die();
        }
    }

    // Remaining enemy shots vs barriers, eroding from above
    for shot in state.projectiles.enemy_shots.iter_mut().filter(|s| s.active) {
        if state.barriers.hit_test(&shot.bounds(), false, rng) {
            shot.destroy();
            report.enemy_shots_blocked += 1;
        }
    }

    // Enemy bodies grind through whatever barrier they overlap
    for enemy in state.formation.enemies.iter().filter(|e| e.is_alive()) {
        report.barriers_crushed |= state.barriers.apply_body_overlap(&enemy.bounds());
    }

    state.projectiles.prune();
    report
}

fn resolve_player_shot(state: &mut GameState, rng: &mut dyn RandomSource) -> Option<PlayerShotHit> {
    let shot = state.projectiles.player_shot()?.bounds();

    let target = state
        .formation
        .enemies
        .iter()
        .position(|e| e.is_alive() && e.bounds().overlaps(&shot));
    if let Some(index) = target {
        let points = state.formation.kill(index);
        state.projectiles.destroy_player();
        return Some(PlayerShotHit::Enemy { index, points });
    }

    if overlaps(Some(shot), state.bonus.bounds()) {
        let points = state.bonus.hit(rng);
        state.projectiles.destroy_player();
        return Some(PlayerShotHit::Bonus { points });
    }

    if state.barriers.hit_test(&shot, true, rng) {
        state.projectiles.destroy_player();
        return Some(PlayerShotHit::Barrier);
    }

    None
}
