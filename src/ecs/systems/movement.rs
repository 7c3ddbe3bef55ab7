use glam::Vec2;

use crate::ecs::components::{
    Action, Facing, FoodBowl, PetState, Position, PrevPosition, Purpose, Speech, Target,
};
use crate::ecs::Viewport;
use crate::input::PointerState;
use crate::pet::tuning::*;
use crate::pet::Scene;

/// Pixels per second for an action, or `None` if it doesn't travel.
pub fn speed_for(action: Action) -> Option<f32> {
    match action {
        Action::Walking => Some(WALK_SPEED),
        Action::Running => Some(RUN_SPEED),
        Action::Stalking => Some(STALK_SPEED),
        _ => None,
    }
}

/// Move the pet toward its target and run the arrival action.
/// Screen bounds clamping keeps the pet on-screen.
pub fn integrate(
    world: &mut hecs::World,
    scene: &Scene,
    viewport: Viewport,
    pointer: &PointerState,
    dt: f32,
    now: f32,
) {
    let bowl_full = world
        .get::<&FoodBowl>(scene.bowl)
        .map(|b| b.full)
        .unwrap_or(false);

    let mut start_eating = false;
    {
        let Ok((pos, prev, facing, state, target, speech)) = world.query_one_mut::<(
            &mut Position,
            &mut PrevPosition,
            &mut Facing,
            &mut PetState,
            &mut Target,
            &mut Speech,
        )>(scene.pet) else {
            return;
        };

        // Store previous position for render interpolation
        prev.0 = pos.0;

        if state.is(Action::Held) {
            return;
        }

        let (Some(mut dest), Some(speed)) = (target.0, speed_for(state.action)) else {
            return;
        };

        if dest.purpose == Purpose::Cursor {
            dest.point = pointer.pos;
            target.0 = Some(dest);
        }

        let arrive = match dest.purpose {
            Purpose::Cursor => POUNCE_DIST,
            _ => ARRIVE_DIST,
        };

        let delta = dest.point - pos.0;
        let dist = delta.length();
        if dist > arrive {
            let step = (speed * dt).min(dist);
            pos.0 += delta / dist * step;
            *facing = facing.toward(delta.x);
        }
        pos.0 = viewport.clamp(pos.0, VIEW_MARGIN);

        if pos.0.distance(dest.point) <= arrive {
            target.clear();
            match dest.purpose {
                Purpose::Bowl if bowl_full => {
                    state.set(Action::Eating, 0.0);
                    speech.say("nom nom~", now);
                    start_eating = true;
                }
                Purpose::Cursor => {
                    state.set(Action::Pouncing, POUNCE_DURATION);
                    log::info!("pounce!");
                }
                _ => state.set(Action::Idle, 0.0),
            }
        }
    }

    if start_eating {
        if let Ok(mut bowl) = world.get::<&mut FoodBowl>(scene.bowl) {
            bowl.draining = true;
            bowl.step_acc = 0.0;
        }
    }
}
