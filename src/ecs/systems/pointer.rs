use glam::Vec2;

use crate::ecs::components::{
    Action, Grab, Hold, PetState, Position, Speech, Stats, Target,
};
use crate::ecs::systems::cursor_steal::CursorOverride;
use crate::ecs::Viewport;
use crate::input::{PetCommand, PointerState};
use crate::pet::tuning::*;
use crate::pet::{bowl_center, Scene};

/// Click slop around the ball.
const BALL_HIT_PAD: f32 = 4.0;
/// Bowl hit box half extents.
const BOWL_HALF: Vec2 = Vec2::new(20.0, 11.0);
/// Food bag sits above the bowl.
const BAG_OFFSET_Y: f32 = 36.0;
const BAG_HALF: Vec2 = Vec2::new(14.0, 20.0);

/// Route the pointer: grab, drag and poke the pet, or click a prop.
/// Returns the command for a prop click, if any.
pub fn update(
    world: &mut hecs::World,
    scene: &Scene,
    pointer: &PointerState,
    viewport: Viewport,
    cursor: &mut CursorOverride,
    now: f32,
) -> Option<PetCommand> {
    let mut prop_cmd = None;
    if pointer.desktop_press() && !try_grab(world, scene, pointer.pos, cursor, now) {
        prop_cmd = hit_props(world, scene, pointer.pos, viewport);
    }
    drag(world, scene, pointer, viewport, now);
    prop_cmd
}

/// Whether `p` lands on the pet drawn at `anchor`.
pub fn hits_pet(anchor: Vec2, p: Vec2) -> bool {
    let d = p - anchor;
    d.x.abs() <= HIT_HALF_WIDTH && d.y >= -HIT_TOP && d.y <= HIT_BOTTOM
}

/// Clamp a dragged anchor to the drag bounds.
pub fn clamp_drag(p: Vec2, viewport: Viewport) -> Vec2 {
    Vec2::new(
        p.x.clamp(DRAG_MIN, (viewport.w - DRAG_MAX_INSET).max(DRAG_MIN)),
        p.y.clamp(DRAG_MIN, (viewport.h - DRAG_MAX_INSET).max(DRAG_MIN)),
    )
}

fn try_grab(
    world: &mut hecs::World,
    scene: &Scene,
    p: Vec2,
    cursor: &mut CursorOverride,
    now: f32,
) -> bool {
    let Ok((pos, state, target, grab, speech)) = world
        .query_one_mut::<(&Position, &mut PetState, &mut Target, &mut Grab, &mut Speech)>(
            scene.pet,
        )
    else {
        return false;
    };

    if !hits_pet(pos.0, p) {
        return false;
    }

    if state.is_stealing() {
        cursor.restore();
        log::info!("steal interrupted by grab");
    }

    grab.0 = Some(Hold {
        offset: p - pos.0,
        press: p,
        moved: false,
        before: state.action,
    });
    state.set(Action::Held, 0.0);
    target.clear();
    speech.say("miau~!", now);
    true
}

fn hit_props(
    world: &hecs::World,
    scene: &Scene,
    p: Vec2,
    viewport: Viewport,
) -> Option<PetCommand> {
    if let Ok(ball) = world.get::<&Position>(scene.ball) {
        if ball.0.distance(p) <= BALL_RADIUS + BALL_HIT_PAD {
            return Some(PetCommand::KickBall);
        }
    }

    let bowl = bowl_center(viewport);
    let bag = bowl - Vec2::new(0.0, BAG_OFFSET_Y);
    let inside = |center: Vec2, half: Vec2| {
        let d = (p - center).abs();
        d.x <= half.x && d.y <= half.y
    };
    if inside(bowl, BOWL_HALF) || inside(bag, BAG_HALF) {
        return Some(PetCommand::PourFood);
    }
    None
}

fn drag(
    world: &mut hecs::World,
    scene: &Scene,
    pointer: &PointerState,
    viewport: Viewport,
    now: f32,
) {
    let Ok((pos, state, stats, grab, speech)) = world
        .query_one_mut::<(&mut Position, &mut PetState, &mut Stats, &mut Grab, &mut Speech)>(
            scene.pet,
        )
    else {
        return;
    };

    let Some(hold) = grab.0.as_mut() else {
        return;
    };

    if pointer.down {
        pos.0 = clamp_drag(pointer.pos - hold.offset, viewport);
        if pointer.pos.distance(hold.press) >= POKE_SLOP {
            hold.moved = true;
        }
        return;
    }

    // Button is up: let go.
    let hold = *hold;
    grab.0 = None;
    state.set(Action::Idle, 0.0);

    if hold.moved {
        return;
    }

    // Press and release in place: a poke.
    if hold.before == Action::Sleeping {
        speech.say("*căscat*", now);
        return;
    }
    let line = if stats.hunger > COMPLAIN_HUNGER {
        "foame..."
    } else {
        "mrrr~ 💕"
    };
    speech.say(line, now);
    stats.happiness += POKE_HAPPINESS;
    stats.clamp();
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

    fn pet_pos(world: &hecs::World, scene: &Scene) -> Vec2 {
        world.get::<&Position>(scene.pet).map(|p| p.0).unwrap()
    }

    fn action(world: &hecs::World, scene: &Scene) -> Action {
        world.get::<&PetState>(scene.pet).map(|s| s.action).unwrap()
    }

    #[test]
    fn drag_follows_pointer_minus_offset() {
        let (mut world, scene, viewport) = setup();
        let mut cursor = CursorOverride::new();
        let start = pet_pos(&world, &scene);
        let mut p = PointerState::new();

        p.move_to(start + Vec2::new(10.0, -20.0));
        p.press(false);
        update(&mut world, &scene, &p, viewport, &mut cursor, 0.0);
        p.end_tick();
        assert_eq!(action(&world, &scene), Action::Held);

        p.move_to(Vec2::new(600.0, 300.0));
        update(&mut world, &scene, &p, viewport, &mut cursor, 0.1);
        assert_eq!(pet_pos(&world, &scene), Vec2::new(590.0, 320.0));

        p.release();
        update(&mut world, &scene, &p, viewport, &mut cursor, 0.2);
        assert_eq!(action(&world, &scene), Action::Idle);
        assert_eq!(pet_pos(&world, &scene), Vec2::new(590.0, 320.0));
    }

    #[test]
    fn drag_is_clamped_to_bounds() {
        let (mut world, scene, viewport) = setup();
        let mut cursor = CursorOverride::new();
        let start = pet_pos(&world, &scene);
        let mut p = PointerState::new();

        p.move_to(start);
        p.press(false);
        update(&mut world, &scene, &p, viewport, &mut cursor, 0.0);
        p.end_tick();

        p.move_to(Vec2::new(-500.0, 5000.0));
        update(&mut world, &scene, &p, viewport, &mut cursor, 0.1);
        assert_eq!(
            pet_pos(&world, &scene),
            Vec2::new(DRAG_MIN, viewport.h - DRAG_MAX_INSET)
        );

        p.move_to(Vec2::new(5000.0, -5000.0));
        update(&mut world, &scene, &p, viewport, &mut cursor, 0.2);
        assert_eq!(
            pet_pos(&world, &scene),
            Vec2::new(viewport.w - DRAG_MAX_INSET, DRAG_MIN)
        );
    }

    #[test]
    fn click_in_place_is_a_poke() {
        let (mut world, scene, viewport) = setup();
        let mut cursor = CursorOverride::new();
        let start = pet_pos(&world, &scene);
        let before = world.get::<&Stats>(scene.pet).map(|s| *s).unwrap();
        let mut p = PointerState::new();

        p.move_to(start);
        p.press(false);
        p.release();
        update(&mut world, &scene, &p, viewport, &mut cursor, 0.0);

        assert_eq!(action(&world, &scene), Action::Idle);
        assert_eq!(pet_pos(&world, &scene), start);
        let speech = world.get::<&Speech>(scene.pet).unwrap();
        assert_eq!(speech.text(), Some("mrrr~ 💕"));
        let after = world.get::<&Stats>(scene.pet).map(|s| *s).unwrap();
        assert_eq!(after.happiness, before.happiness + POKE_HAPPINESS);
    }

    #[test]
    fn poking_a_sleeper_wakes_it() {
        let (mut world, scene, viewport) = setup();
        let mut cursor = CursorOverride::new();
        world
            .get::<&mut PetState>(scene.pet)
            .unwrap()
            .set(Action::Sleeping, 0.0);
        let start = pet_pos(&world, &scene);
        let mut p = PointerState::new();

        p.move_to(start);
        p.press(false);
        p.release();
        update(&mut world, &scene, &p, viewport, &mut cursor, 0.0);

        assert_eq!(action(&world, &scene), Action::Idle);
        let speech = world.get::<&Speech>(scene.pet).unwrap();
        assert_eq!(speech.text(), Some("*căscat*"));
    }

    #[test]
    fn press_on_ui_never_grabs() {
        let (mut world, scene, viewport) = setup();
        let mut cursor = CursorOverride::new();
        let mut p = PointerState::new();
        p.move_to(pet_pos(&world, &scene));
        p.press(true);
        update(&mut world, &scene, &p, viewport, &mut cursor, 0.0);
        assert_eq!(action(&world, &scene), Action::Idle);
    }

    #[test]
    fn clicking_props_issues_commands() {
        let (mut world, scene, viewport) = setup();
        let mut cursor = CursorOverride::new();
        let ball = world.get::<&Position>(scene.ball).map(|p| p.0).unwrap();

        let mut p = PointerState::new();
        p.move_to(ball);
        p.press(false);
        let cmd = update(&mut world, &scene, &p, viewport, &mut cursor, 0.0);
        assert_eq!(cmd, Some(PetCommand::KickBall));

        let mut p = PointerState::new();
        p.move_to(bowl_center(viewport));
        p.press(false);
        let cmd = update(&mut world, &scene, &p, viewport, &mut cursor, 0.0);
        assert_eq!(cmd, Some(PetCommand::PourFood));
    }

    #[test]
    fn hungry_pet_complains_when_poked() {
        let (mut world, scene, viewport) = setup();
        let mut cursor = CursorOverride::new();
        world.get::<&mut Stats>(scene.pet).unwrap().hunger = COMPLAIN_HUNGER + 15.0;
        let start = pet_pos(&world, &scene);
        let mut p = PointerState::new();

        p.move_to(start);
        p.press(false);
        p.release();
        update(&mut world, &scene, &p, viewport, &mut cursor, 0.0);

        let speech = world.get::<&Speech>(scene.pet).unwrap();
        assert_eq!(speech.text(), Some("foame..."));
    }
}
