//! Fixed timestep simulation tick
//!
//! Advances the session by one step: phase machine first, then (while
//! playing) cannon, formation, bonus unit and shots, followed by collision
//! resolution and the win/loss checks.

use super::cannon::CannonStatus;
use super::collision::{PlayerShotHit, resolve_collisions};
use super::rng::RandomSource;
use super::state::{GameEvent, GamePhase, GameState};
use super::timer_expired;
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held: move the cannon left
    pub move_left: bool,
    /// Held: move the cannon right
    pub move_right: bool,
    /// Fire the cannon (one shot per press)
    pub fire: bool,
    /// Pause toggle
    pub toggle_pause: bool,
    /// Start from the menu, or restart after game over
    pub start_or_restart: bool,
    /// Demo mode - the cannon plays itself
    pub autopilot: bool,
}

/// Advance the game state by one timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, rng: &mut dyn RandomSource) {
    let dt = dt.min(MAX_FRAME_DT);

    let mut input = input.clone();
    if input.autopilot {
        autopilot(state, &mut input);
    }

    if input.toggle_pause {
        state.toggle_pause();
    }

    match state.phase {
        GamePhase::Menu => {
            if input.start_or_restart {
                state.start_game(rng);
            }
        }
        GamePhase::GameOver => {
            state.phase_elapsed += dt;
            if input.start_or_restart && state.can_start() {
                state.start_game(rng);
            }
        }
        GamePhase::LevelComplete => {
            state.phase_elapsed += dt;
            if timer_expired(state.phase_elapsed, LEVEL_COMPLETE_DWELL) {
                state.next_level(rng);
            }
        }
        GamePhase::Paused => {}
        GamePhase::Playing => tick_playing(state, &input, dt, rng),
    }
}

fn tick_playing(state: &mut GameState, input: &TickInput, dt: f32, rng: &mut dyn RandomSource) {
    state.time_ticks += 1;

    // Fire before anything moves so the shot leaves from this tick's muzzle
    if input.fire
        && state.cannon.can_fire()
        && state.projectiles.fire_player(state.cannon.muzzle())
    {
        state.bonus.record_shot();
        state.events.push(GameEvent::ShotFired);
    }

    if state.cannon.update(dt, input.move_left, input.move_right) == CannonStatus::Exploded {
        state.lives = state.lives.saturating_sub(1);
        state.events.push(GameEvent::LifeLost {
            lives_left: state.lives,
        });
        if state.lives > 0 {
            state.cannon.start_respawn();
        }
        log::debug!("Cannon destroyed, {} lives left", state.lives);
    }

    state.formation.advance(dt, &mut state.projectiles, rng);

    if state.bonus.advance(dt, rng).appeared {
        state.events.push(GameEvent::BonusAppeared);
    }

    state.projectiles.advance();

    let report = resolve_collisions(state, rng);
    match report.player_shot {
        Some(PlayerShotHit::Enemy { index, points }) => {
            let enemy = &state.formation.enemies[index];
            state.events.push(GameEvent::EnemyKilled {
                row: enemy.row,
                col: enemy.col,
                points,
            });
            state.add_score(points);
        }
        Some(PlayerShotHit::Bonus { points }) => {
            state.events.push(GameEvent::BonusHit { points });
            state.add_score(points);
        }
        Some(PlayerShotHit::Barrier) | None => {}
    }
    if report.cannon_hit {
        state.events.push(GameEvent::CannonHit);
    }

    if state.formation.is_defeated() {
        // A run with no lives left never enters another level
        if state.lives == 0 {
            state.game_over();
        } else {
            state.complete_level();
        }
    } else if state.formation.reached_barrier_line() {
        log::info!("Formation reached the barrier line");
        state.game_over();
    } else if state.lives == 0 {
        state.game_over();
    }

    if state.phase != GamePhase::GameOver {
        state.check_extra_life();
    }
}

/// Demo-mode controller: starts games, dodges incoming shots, and otherwise
/// lines up under the nearest shooter (or the bonus unit) and fires.
fn autopilot(state: &GameState, input: &mut TickInput) {
    match state.phase {
        GamePhase::Menu | GamePhase::GameOver => {
            input.start_or_restart = true;
            return;
        }
        GamePhase::Playing => {}
        _ => return,
    }
    if !state.cannon.is_alive() {
        return;
    }

    let cannon = state.cannon.bounds();
    let center = cannon.center().x;

    let threat = state
        .projectiles
        .enemy_shots
        .iter()
        .filter(|s| s.active && s.pos.y > cannon.y - 160.0)
        .map(|s| s.bounds())
        .find(|b| b.right() > cannon.x - 6.0 && b.x < cannon.right() + 6.0);

    let target_x = if let Some(shot) = threat {
        let away = if shot.center().x < center { 1.0 } else { -1.0 };
        let dodge = center + away * CANNON_WIDTH;
        // Pinned against a wall: dodge the other way
        if dodge < CANNON_MARGIN + CANNON_WIDTH / 2.0
            || dodge > FIELD_WIDTH - CANNON_MARGIN - CANNON_WIDTH / 2.0
        {
            center - away * CANNON_WIDTH
        } else {
            dodge
        }
    } else if let Some(bonus) = state.bonus.bounds() {
        bonus.center().x
    } else {
        let wobble = (state.time_ticks as f32 * 0.02).sin() * 6.0;
        state
            .formation
            .column_front()
            .into_iter()
            .map(|i| state.formation.enemies[i].bounds().center().x + wobble)
            .min_by(|a, b| {
                (a - center)
                    .abs()
                    .partial_cmp(&(b - center).abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(center)
    };

    let dx = target_x - center;
    input.move_left = dx < -CANNON_SPEED;
    input.move_right = dx > CANNON_SPEED;
    input.fire = threat.is_none() && dx.abs() < 12.0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::bonus::BonusPhase;
    use crate::sim::cannon::CannonPhase;
    use crate::sim::formation::EnemyState;
    use crate::sim::rng::{ScriptedRng, SimRng};

    fn start(state: &mut GameState, rng: &mut dyn RandomSource) {
        let input = TickInput {
            start_or_restart: true,
            ..Default::default()
        };
        tick(state, &input, SIM_DT, rng);
        state.events.clear();
    }

    fn clear_formation(state: &mut GameState) {
        for enemy in &mut state.formation.enemies {
            enemy.state = EnemyState::Gone;
        }
    }

    #[test]
    fn test_tick_menu_to_playing() {
        let mut rng = ScriptedRng::new();
        let mut state = GameState::new(0);

        tick(&mut state, &TickInput::default(), SIM_DT, &mut rng);
        assert_eq!(state.phase, GamePhase::Menu);

        start(&mut state, &mut rng);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_tick_pause_freezes_timers() {
        let mut rng = ScriptedRng::new();
        let mut state = GameState::new(0);
        start(&mut state, &mut rng);
        tick(&mut state, &TickInput::default(), SIM_DT, &mut rng);

        let pause = TickInput {
            toggle_pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT, &mut rng);
        assert_eq!(state.phase, GamePhase::Paused);

        let ticks = state.time_ticks;
        let move_timer = state.formation.move_timer;
        for _ in 0..120 {
            tick(&mut state, &TickInput::default(), SIM_DT, &mut rng);
        }
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.formation.move_timer, move_timer);

        tick(&mut state, &pause, SIM_DT, &mut rng);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, ticks + 1);
    }

    #[test]
    fn test_fire_counts_for_bonus() {
        let mut rng = ScriptedRng::new();
        let mut state = GameState::new(0);
        start(&mut state, &mut rng);

        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire, SIM_DT, &mut rng);
        tick(&mut state, &fire, SIM_DT, &mut rng);
        // Second press ignored while the first shot is in flight
        assert_eq!(state.bonus.shot_count, 1);
        assert_eq!(
            state.events.iter().filter(|e| **e == GameEvent::ShotFired).count(),
            1
        );
    }

    #[test]
    fn test_round_lifecycle() {
        let mut rng = ScriptedRng::new();
        let mut state = GameState::new(0);
        start(&mut state, &mut rng);
        let first = state.barriers.barriers[0].bounds();
        state.barriers.barriers[0].apply_body_overlap(&first);
        clear_formation(&mut state);

        tick(&mut state, &TickInput::default(), SIM_DT, &mut rng);
        assert_eq!(state.phase, GamePhase::LevelComplete);
        assert!(state.events.contains(&GameEvent::LevelComplete { level: 1 }));

        // Dwell
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), 0.1, &mut rng);
        }
        assert_eq!(state.phase, GamePhase::LevelComplete);
        for _ in 0..15 {
            tick(&mut state, &TickInput::default(), 0.1, &mut rng);
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level, 2);
        assert_eq!(state.formation.alive_count(), 55);
        assert_eq!(state.barriers.solid_count(), 290 * 4);
        assert!(state.projectiles.enemy_shots.is_empty());
    }

    #[test]
    fn test_lives_exhausted_ends_game() {
        let mut rng = ScriptedRng::new();
        let mut state = GameState::new(0);
        start(&mut state, &mut rng);
        state.lives = 1;
        assert!(state.cannon.die());

        for _ in 0..70 {
            tick(&mut state, &TickInput::default(), SIM_DT, &mut rng);
            if state.phase == GamePhase::GameOver {
                break;
            }
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives, 0);
        assert!(state.events.contains(&GameEvent::LifeLost { lives_left: 0 }));
    }

    #[test]
    fn test_life_lost_then_respawn() {
        let mut rng = ScriptedRng::new();
        let mut state = GameState::new(0);
        start(&mut state, &mut rng);
        state.cannon.die();

        tick(&mut state, &TickInput::default(), 0.1, &mut rng);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), 0.1, &mut rng);
        }
        assert_eq!(state.lives, 2);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(!state.cannon.is_alive());

        for _ in 0..21 {
            tick(&mut state, &TickInput::default(), 0.1, &mut rng);
        }
        assert!(state.cannon.is_alive());
    }

    #[test]
    fn test_barrier_line_ends_game() {
        let mut rng = ScriptedRng::new();
        let mut state = GameState::new(0);
        start(&mut state, &mut rng);
        let last = state.formation.enemies.len() - 1;
        state.formation.enemies[last].pos.y = BARRIER_LINE_Y - ENEMY_HEIGHT;

        tick(&mut state, &TickInput::default(), SIM_DT, &mut rng);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(matches!(state.events.last(), Some(GameEvent::GameOver { .. })));
    }

    #[test]
    fn test_zero_lives_on_clearing_tick_ends_game() {
        let mut rng = ScriptedRng::new();
        let mut state = GameState::new(0);
        start(&mut state, &mut rng);
        state.lives = 1;
        state.cannon.phase = CannonPhase::Exploding {
            elapsed: CANNON_EXPLOSION_TIME - SIM_DT / 2.0,
        };
        clear_formation(&mut state);

        tick(&mut state, &TickInput::default(), SIM_DT, &mut rng);
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.events.iter().any(|e| matches!(e, GameEvent::LevelComplete { .. })));

        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), 0.1, &mut rng);
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.level, 1);
    }

    /// Fire through `tick`, then drop a live bonus unit onto the shot's path
    fn shoot_bonus(state: &mut GameState, rng: &mut dyn RandomSource) -> Option<u32> {
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        state.projectiles.enemy_shots.clear();
        tick(state, &fire, SIM_DT, rng);
        let shot = state.projectiles.player_shot()?.bounds();
        state.bonus.phase = BonusPhase::Active;
        state.bonus.pos =
            glam::Vec2::new(shot.center().x - BONUS_WIDTH / 2.0, shot.y - BONUS_HEIGHT);
        state.events.clear();

        tick(state, &TickInput::default(), SIM_DT, rng);
        state.bonus.reset(rng);
        state.events.iter().find_map(|e| match e {
            GameEvent::BonusHit { points } => Some(*points),
            _ => None,
        })
    }

    /// Fire `count` shots through `tick`, clearing the slot after each
    fn fire_and_clear(state: &mut GameState, rng: &mut dyn RandomSource, count: u32) {
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        for _ in 0..count {
            state.projectiles.enemy_shots.clear();
            tick(state, &fire, SIM_DT, rng);
            state.projectiles.destroy_player();
        }
    }

    #[test]
    fn test_bonus_pays_max_on_scheduled_shots() {
        let mut rng = ScriptedRng::new();
        let mut state = GameState::new(0);
        start(&mut state, &mut rng);

        fire_and_clear(&mut state, &mut rng, 22);
        assert_eq!(state.bonus.shot_count, 22);
        assert_eq!(shoot_bonus(&mut state, &mut rng), Some(BONUS_MAX_SCORE));
        assert_eq!(state.bonus.shot_count, 23);

        // Shot 24 is an ordinary hit
        assert_eq!(shoot_bonus(&mut state, &mut rng), Some(BONUS_SCORES[0]));

        fire_and_clear(&mut state, &mut rng, 13);
        assert_eq!(state.bonus.shot_count, 37);
        assert_eq!(shoot_bonus(&mut state, &mut rng), Some(BONUS_MAX_SCORE));
        assert_eq!(state.bonus.shot_count, 38);
        assert_eq!(state.score, 2 * BONUS_MAX_SCORE + BONUS_SCORES[0]);
    }

    #[test]
    fn test_restart_needs_dwell() {
        let mut rng = ScriptedRng::new();
        let mut state = GameState::new(0);
        start(&mut state, &mut rng);
        state.add_score(40);
        state.game_over();

        let restart = TickInput {
            start_or_restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart, 0.1, &mut rng);
        assert_eq!(state.phase, GamePhase::GameOver);

        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), 0.1, &mut rng);
        }
        tick(&mut state, &restart, 0.1, &mut rng);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.high_score, 40);
    }

    #[test]
    fn test_extra_life_at_threshold() {
        let mut rng = ScriptedRng::new();
        let mut state = GameState::new(0);
        start(&mut state, &mut rng);
        state.score = 1490;

        // Park a shot on the top-left squid
        let target = state.formation.enemies[0].bounds();
        let muzzle = glam::Vec2::new(target.center().x, target.bottom() + 4.0);
        state.projectiles.fire_player(muzzle);
        tick(&mut state, &TickInput::default(), SIM_DT, &mut rng);

        assert_eq!(state.score, 1520);
        assert_eq!(state.lives, 4);
        assert!(state.extra_life_awarded);
        assert!(state.events.contains(&GameEvent::ExtraLife));
    }

    #[test]
    fn test_dt_is_clamped() {
        let mut rng = ScriptedRng::new();
        let mut state = GameState::new(0);
        start(&mut state, &mut rng);
        tick(&mut state, &TickInput::default(), 5.0, &mut rng);
        assert!(state.formation.move_timer <= MAX_FRAME_DT);
    }

    #[test]
    fn test_autopilot_plays() {
        let mut rng = SimRng::new(7);
        let mut state = GameState::new(0);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..(60 * 60) {
            tick(&mut state, &input, SIM_DT, &mut rng);
        }
        assert_ne!(state.phase, GamePhase::Menu);
        assert!(state.bonus.shot_count > 0 || state.level > 1);
    }

    #[test]
    fn test_determinism() {
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let mut a = GameState::new(0);
        let mut b = GameState::new(0);
        let mut rng_a = SimRng::new(99999);
        let mut rng_b = SimRng::new(99999);
        for _ in 0..1200 {
            tick(&mut a, &input, SIM_DT, &mut rng_a);
            tick(&mut b, &input, SIM_DT, &mut rng_b);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.cannon.pos, b.cannon.pos);
        assert_eq!(a.formation.alive_count(), b.formation.alive_count());
    }
}
