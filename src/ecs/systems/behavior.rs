use glam::Vec2;

use crate::ecs::components::{Action, FoodBowl, PetState, Purpose, Speech, Stats, Target};
use crate::ecs::systems::cursor_steal::CursorOverride;
use crate::ecs::Viewport;
use crate::input::PointerState;
use crate::pet::tuning::*;
use crate::pet::{bowl_approach, Scene};

/// Chance per roll that an idle pet starts stalking the cursor.
pub fn stalk_chance(hunger: f32) -> f32 {
    if hunger <= STALK_HUNGER {
        return 0.0;
    }
    ((hunger - STALK_HUNGER) / (STAT_MAX - STALK_HUNGER)).min(1.0) * STALK_MAX_CHANCE
}

/// Behavior roll. Only Idle and Sleeping pets choose; every other action
/// runs until its own timer or arrival ends it.
#[allow(clippy::too_many_arguments)]
pub fn select(
    world: &mut hecs::World,
    scene: &Scene,
    viewport: Viewport,
    cursor: &CursorOverride,
    pointer: &PointerState,
    rng: &mut fastrand::Rng,
    now: f32,
) {
    let bowl_full = world
        .get::<&FoodBowl>(scene.bowl)
        .map(|b| b.full)
        .unwrap_or(false);

    let Ok((state, stats, target, speech)) = world
        .query_one_mut::<(&mut PetState, &Stats, &mut Target, &mut Speech)>(scene.pet)
    else {
        return;
    };

    match state.action {
        Action::Sleeping => {
            if state.elapsed >= MIN_SLEEP && stats.energy >= WAKE_ENERGY {
                state.set(Action::Idle, 0.0);
                speech.say("*căscat*", now);
            }
        }
        Action::Idle => {
            if stats.hunger > BOWL_HUNGER && bowl_full {
                target.set(bowl_approach(viewport), Purpose::Bowl);
                state.set(Action::Running, 0.0);
                speech.say("mâncare!", now);
                return;
            }

            if stats.energy < SLEEP_ENERGY {
                fall_asleep(state, target, speech, now);
                return;
            }

            if stats.hunger > STALK_HUNGER
                && cursor.ready()
                && pointer.inside
                && rng.f32() < stalk_chance(stats.hunger)
            {
                target.set(pointer.pos, Purpose::Cursor);
                state.set(Action::Stalking, 0.0);
                log::info!("stalking the cursor (hunger {:.0})", stats.hunger);
                return;
            }

            if rng.f32() < WANDER_CHANCE {
                if rng.f32() < NAP_SHARE {
                    fall_asleep(state, target, speech, now);
                } else {
                    let max_x = (viewport.w - WANDER_RIGHT_MARGIN).max(WANDER_MIN_X);
                    let x = WANDER_MIN_X + rng.f32() * (max_x - WANDER_MIN_X);
                    target.set(Vec2::new(x, viewport.h - FLOOR_OFFSET), Purpose::Wander);
                    state.set(Action::Walking, 0.0);
                }
                return;
            }

            if rng.f32() < GROOM_CHANCE {
                state.set(Action::Grooming, GROOM_DURATION);
            }
        }
        _ => {}
    }
}

fn fall_asleep(state: &mut PetState, target: &mut Target, speech: &mut Speech, now: f32) {
    state.set(Action::Sleeping, 0.0);
    target.clear();
    speech.say("zzz...", now);
}

/// Advance action clocks and end timed actions.
pub fn update_timers(world: &mut hecs::World, scene: &Scene, dt: f32, now: f32) {
    let Ok((state, target, speech)) =
        world.query_one_mut::<(&mut PetState, &mut Target, &mut Speech)>(scene.pet)
    else {
        return;
    };

    state.elapsed += dt;

    match state.action {
        Action::Grooming => {
            state.timer -= dt;
            if state.timer <= 0.0 {
                state.set(Action::Idle, 0.0);
            }
        }
        // Hand-fed meals carry a timer; bowl meals end when the bowl is empty.
        Action::Eating if state.timer > 0.0 => {
            state.timer -= dt;
            if state.timer <= 0.0 {
                state.set(Action::Idle, 0.0);
                speech.say("mulțumesc! 💕", now);
            }
        }
        Action::Stalking => {
            if state.elapsed >= STALK_GIVE_UP {
                state.set(Action::Idle, 0.0);
                target.clear();
                log::info!("gave up stalking");
            }
        }
        _ => {}
    }
}
