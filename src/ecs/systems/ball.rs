use glam::Vec2;

use crate::ecs::components::{
    Action, Ball, PetState, Position, PrevPosition, Purpose, Speech, Target, Velocity,
};
use crate::ecs::Viewport;
use crate::pet::tuning::*;
use crate::pet::Scene;

/// Launch velocity for a kick, in pixels per frame.
pub fn kick_velocity(rng: &mut fastrand::Rng) -> Vec2 {
    Vec2::new(
        (rng.f32() - 0.5) * BALL_KICK_X,
        -BALL_KICK_UP - rng.f32() * BALL_KICK_UP_JITTER,
    )
}

/// Kick the ball. An idle pet chases it.
pub fn kick(
    world: &mut hecs::World,
    scene: &Scene,
    viewport: Viewport,
    rng: &mut fastrand::Rng,
    now: f32,
) {
    let Ok((pos, vel, ball)) =
        world.query_one_mut::<(&Position, &mut Velocity, &mut Ball)>(scene.ball)
    else {
        return;
    };
    vel.0 = kick_velocity(rng);
    ball.moving = true;
    let ball_x = pos.0.x;

    if let Ok((state, target, speech)) =
        world.query_one_mut::<(&mut PetState, &mut Target, &mut Speech)>(scene.pet)
    {
        if state.is(Action::Idle) {
            target.set(Vec2::new(ball_x, viewport.h - FLOOR_OFFSET), Purpose::Ball);
            state.set(Action::Running, 0.0);
            speech.say("minge!", now);
        }
    }
}

/// One physics step, with per-frame constants scaled to `dt`.
pub fn step(pos: &mut Vec2, vel: &mut Vec2, viewport: Viewport, dt: f32) -> bool {
    let k = dt / TICK_RATE as f32;

    *pos += *vel * k;
    vel.x *= BALL_FRICTION.powf(k);
    vel.y += BALL_GRAVITY * k;

    // Bounce off walls
    let max_x = (viewport.w - BALL_WALL_INSET).max(BALL_WALL_MIN);
    if pos.x < BALL_WALL_MIN || pos.x > max_x {
        vel.x = -vel.x * BALL_WALL_BOUNCE;
        pos.x = pos.x.clamp(BALL_WALL_MIN, max_x);
    }

    // Bounce off the floor
    let floor = viewport.h - BALL_FLOOR_OFFSET;
    if pos.y > floor {
        pos.y = floor;
        vel.y = -vel.y * BALL_FLOOR_BOUNCE;
        vel.x *= BALL_FLOOR_DRAG;
    }

    // Stop if very slow and on the ground
    let resting = vel.x.abs() < BALL_REST_SPEED
        && vel.y.abs() < BALL_REST_SPEED
        && pos.y >= viewport.h - BALL_REST_OFFSET;
    if resting {
        *vel = Vec2::ZERO;
    }
    !resting
}

pub fn update(world: &mut hecs::World, scene: &Scene, viewport: Viewport, dt: f32) {
    let Ok((pos, prev, vel, ball)) = world
        .query_one_mut::<(&mut Position, &mut PrevPosition, &mut Velocity, &mut Ball)>(
            scene.ball,
        )
    else {
        return;
    };

    prev.0 = pos.0;
    if !ball.moving {
        return;
    }

    ball.moving = step(&mut pos.0, &mut vel.0, viewport, dt);
    ball.spin += (pos.0.x - prev.0.x) / BALL_RADIUS;
}
