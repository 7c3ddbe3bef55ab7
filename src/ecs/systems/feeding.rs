use crate::ecs::components::{Action, FoodBowl, PetState, Purpose, Speech, Stats, Target};
use crate::ecs::systems::cursor_steal::CursorOverride;
use crate::ecs::Viewport;
use crate::pet::tuning::*;
use crate::pet::{bowl_approach, Scene};

/// Hand-feed the pet. A full pet refuses with a message only.
pub fn feed(world: &mut hecs::World, scene: &Scene, cursor: &mut CursorOverride, now: f32) {
    let Ok((state, stats, target, speech)) = world
        .query_one_mut::<(&mut PetState, &mut Stats, &mut Target, &mut Speech)>(scene.pet)
    else {
        return;
    };

    if stats.hunger < FEED_MIN_HUNGER {
        speech.say("sătulă!", now);
        return;
    }

    if state.is_stealing() {
        cursor.restore();
        log::info!("steal interrupted by food");
    }

    stats.hunger -= FEED_AMOUNT;
    stats.happiness += FEED_HAPPINESS;
    stats.clamp();
    speech.say("nom nom~", now);

    if !state.is(Action::Held) {
        state.set(Action::Eating, EAT_DURATION);
        target.clear();
    }
}

/// Start filling the bowl.
pub fn pour(world: &mut hecs::World, scene: &Scene, now: f32) {
    {
        let Ok(bowl) = world.query_one_mut::<&mut FoodBowl>(scene.bowl) else {
            return;
        };
        if bowl.full || bowl.pouring {
            return;
        }
        bowl.pouring = true;
        bowl.level = 0.0;
        bowl.step_acc = 0.0;
    }

    if let Ok(speech) = world.query_one_mut::<&mut Speech>(scene.pet) {
        speech.say("mâncare!", now);
    }
}

/// Outcome of one bowl update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BowlEvent {
    Filled,
    Emptied,
}

/// Advance pouring or draining by `dt`.
pub fn step_bowl(bowl: &mut FoodBowl, dt: f32) -> Option<BowlEvent> {
    if bowl.pouring {
        bowl.step_acc += dt;
        while bowl.step_acc >= POUR_STEP {
            bowl.step_acc -= POUR_STEP;
            bowl.level = (bowl.level + POUR_AMOUNT).min(BOWL_FULL);
            if bowl.level >= BOWL_FULL {
                bowl.pouring = false;
                bowl.full = true;
                bowl.step_acc = 0.0;
                return Some(BowlEvent::Filled);
            }
        }
    } else if bowl.draining {
        bowl.step_acc += dt;
        while bowl.step_acc >= DRAIN_STEP {
            bowl.step_acc -= DRAIN_STEP;
            if bowl.level <= 0.0 {
                bowl.level = 0.0;
                bowl.draining = false;
                bowl.full = false;
                bowl.step_acc = 0.0;
                return Some(BowlEvent::Emptied);
            }
            bowl.level = (bowl.level - DRAIN_AMOUNT).max(0.0);
        }
    }
    None
}

pub fn update_bowl(
    world: &mut hecs::World,
    scene: &Scene,
    viewport: Viewport,
    dt: f32,
    now: f32,
) {
    let pet_eating = world
        .get::<&PetState>(scene.pet)
        .map(|s| s.is(Action::Eating))
        .unwrap_or(false);

    let event = {
        let Ok(bowl) = world.query_one_mut::<&mut FoodBowl>(scene.bowl) else {
            return;
        };
        // Pet was pulled away mid-meal; the rest stays in the bowl.
        if bowl.draining && !pet_eating {
            bowl.draining = false;
            bowl.step_acc = 0.0;
        }
        step_bowl(bowl, dt)
    };

    let Some(event) = event else {
        return;
    };

    let Ok((state, stats, target, speech)) = world
        .query_one_mut::<(&mut PetState, &mut Stats, &mut Target, &mut Speech)>(scene.pet)
    else {
        return;
    };

    match event {
        BowlEvent::Filled => {
            log::debug!("bowl full");
            if stats.hunger > POUR_RUN_HUNGER && state.is(Action::Idle) {
                target.set(bowl_approach(viewport), Purpose::Bowl);
                state.set(Action::Running, 0.0);
            }
        }
        BowlEvent::Emptied => {
            stats.hunger -= BOWL_MEAL;
            stats.clamp();
            state.set(Action::Idle, 0.0);
            speech.say("mulțumesc! 💕", now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pet::spawn_scene;

    fn setup() -> (hecs::World, Scene, Viewport) {
        let viewport = Viewport::new(1280.0, 800.0);
        let mut world = hecs::World::new();
        let scene = spawn_scene(&mut world, viewport, "Fifi");
        (world, scene, viewport)
    }

    #[test]
    fn feeding_a_hungry_pet() {
        let (mut world, scene, _) = setup();
        world.get::<&mut Stats>(scene.pet).unwrap().hunger = 70.0;
        let before = *world.get::<&Stats>(scene.pet).unwrap();
        let mut cursor = CursorOverride::new();

        feed(&mut world, &scene, &mut cursor, 0.0);

        let after = *world.get::<&Stats>(scene.pet).unwrap();
        assert_eq!(after.hunger, before.hunger - FEED_AMOUNT);
        assert!(after.happiness > before.happiness);
        let state = *world.get::<&PetState>(scene.pet).unwrap();
        assert!(state.is(Action::Eating));
        assert_eq!(state.timer, EAT_DURATION);
    }

    #[test]
    fn full_pet_refuses_food() {
        let (mut world, scene, _) = setup();
        world.get::<&mut Stats>(scene.pet).unwrap().hunger = 5.0;
        let before = *world.get::<&Stats>(scene.pet).unwrap();
        let mut cursor = CursorOverride::new();

        feed(&mut world, &scene, &mut cursor, 0.0);

        assert_eq!(*world.get::<&Stats>(scene.pet).unwrap(), before);
        assert!(world.get::<&PetState>(scene.pet).unwrap().is(Action::Idle));
        assert_eq!(world.get::<&Speech>(scene.pet).unwrap().text(), Some("sătulă!"));
    }

    #[test]
    fn pour_fills_in_steps() {
        let mut bowl = FoodBowl {
            pouring: true,
            ..Default::default()
        };
        assert_eq!(step_bowl(&mut bowl, POUR_STEP * 1.5), None);
        assert_eq!(bowl.level, POUR_AMOUNT);
        let mut event = None;
        for _ in 0..20 {
            event = event.or(step_bowl(&mut bowl, POUR_STEP));
        }
        assert_eq!(event, Some(BowlEvent::Filled));
        assert!(bowl.full && !bowl.pouring);
        assert_eq!(bowl.level, BOWL_FULL);
    }

    #[test]
    fn pour_is_ignored_while_full() {
        let (mut world, scene, _) = setup();
        world.get::<&mut FoodBowl>(scene.bowl).unwrap().full = true;
        pour(&mut world, &scene, 0.0);
        assert!(!world.get::<&FoodBowl>(scene.bowl).unwrap().pouring);
    }

    #[test]
    fn hungry_idle_pet_runs_when_bowl_fills() {
        let (mut world, scene, viewport) = setup();
        world.get::<&mut Stats>(scene.pet).unwrap().hunger = 40.0;
        pour(&mut world, &scene, 0.0);
        for i in 0..60 {
            update_bowl(&mut world, &scene, viewport, 0.01, i as f32 * 0.01);
        }
        assert!(world.get::<&FoodBowl>(scene.bowl).unwrap().full);
        assert!(world.get::<&PetState>(scene.pet).unwrap().is(Action::Running));
    }

    #[test]
    fn emptying_the_bowl_ends_the_meal() {
        let (mut world, scene, viewport) = setup();
        world.get::<&mut Stats>(scene.pet).unwrap().hunger = 70.0;
        {
            let mut bowl = world.get::<&mut FoodBowl>(scene.bowl).unwrap();
            bowl.level = BOWL_FULL;
            bowl.full = true;
            bowl.draining = true;
        }
        world
            .get::<&mut PetState>(scene.pet)
            .unwrap()
            .set(Action::Eating, 0.0);

        for i in 0..200 {
            update_bowl(&mut world, &scene, viewport, 0.025, i as f32 * 0.025);
        }

        let bowl = *world.get::<&FoodBowl>(scene.bowl).unwrap();
        assert!(!bowl.full && !bowl.draining);
        assert_eq!(bowl.level, 0.0);
        assert_eq!(world.get::<&Stats>(scene.pet).unwrap().hunger, 70.0 - BOWL_MEAL);
        assert!(world.get::<&PetState>(scene.pet).unwrap().is(Action::Idle));
    }
}
