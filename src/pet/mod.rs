pub mod pose;
pub mod tuning;

use glam::Vec2;

use crate::ecs::components::*;
use crate::ecs::Viewport;

use self::tuning::*;

/// Entity handles for everything the simulation owns.
#[derive(Debug, Clone, Copy)]
pub struct Scene {
    pub pet: hecs::Entity,
    pub ball: hecs::Entity,
    pub bowl: hecs::Entity,
}

/// Spawn the pet and its props at their default spots.
pub fn spawn_scene(world: &mut hecs::World, viewport: Viewport, name: &str) -> Scene {
    let pet_pos = Vec2::new(250.0, viewport.h - FLOOR_OFFSET);
    let pet = world.spawn((
        Position(pet_pos),
        PrevPosition(pet_pos),
        Facing::Right,
        PetState::new(Action::Idle),
        Stats {
            hunger: START_HUNGER,
            happiness: START_HAPPINESS,
            energy: START_ENERGY,
        },
        Target::default(),
        Grab::default(),
        Speech::default(),
        PetName(name.to_string()),
    ));

    let ball_pos = Vec2::new(BALL_START_X, viewport.h - BALL_REST_OFFSET);
    let ball = world.spawn((
        Position(ball_pos),
        PrevPosition(ball_pos),
        Velocity(Vec2::ZERO),
        Ball::default(),
    ));

    let bowl = world.spawn((Position(bowl_center(viewport)), FoodBowl::default()));

    log::info!("Spawned {name} with ball and food bowl");
    Scene { pet, ball, bowl }
}

/// Where the bowl is drawn.
pub fn bowl_center(viewport: Viewport) -> Vec2 {
    Vec2::new(viewport.w - BOWL_INSET.0, viewport.h - BOWL_INSET.1)
}

/// Where the pet stands to eat.
pub fn bowl_approach(viewport: Viewport) -> Vec2 {
    Vec2::new(viewport.w - BOWL_APPROACH_INSET, viewport.h - FLOOR_OFFSET)
}

/// Keep props glued to the bottom edge after a resize.
pub fn relayout(world: &mut hecs::World, scene: &Scene, viewport: Viewport) {
    if let Ok(mut pos) = world.get::<&mut Position>(scene.bowl) {
        pos.0 = bowl_center(viewport);
    }
    if let Ok((pos, ball)) = world.query_one_mut::<(&mut Position, &Ball)>(scene.ball) {
        if !ball.moving {
            pos.0.y = viewport.h - BALL_REST_OFFSET;
        }
        let max_x = (viewport.w - BALL_WALL_INSET).max(BALL_WALL_MIN);
        pos.0.x = pos.0.x.clamp(BALL_WALL_MIN, max_x);
    }
    if let Ok(pos) = world.query_one_mut::<&mut Position>(scene.pet) {
        pos.0 = viewport.clamp(pos.0, VIEW_MARGIN);
    }
}
