use glam::Vec2;

use crate::ecs::components::{Action, Facing, PetState, Position, Speech, Stats, Target};
use crate::ecs::Viewport;
use crate::input::PointerState;
use crate::pet::tuning::*;
use crate::pet::Scene;

/// The pet's hold on the system cursor.
///
/// While `hidden` is set the app hides the OS cursor and the renderer draws
/// the marker instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct CursorOverride {
    pub hidden: bool,
    pub marker: Option<Vec2>,
    /// Seconds until the cursor is given back.
    pub remaining: f32,
    /// Seconds until the pet may stalk again.
    pub cooldown: f32,
}

impl CursorOverride {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ready(&self) -> bool {
        !self.hidden && self.cooldown <= 0.0
    }

    pub fn begin(&mut self, at: Vec2) {
        self.hidden = true;
        self.marker = Some(at);
        self.remaining = STEAL_DURATION;
    }

    /// Show the real cursor again and start the cooldown.
    pub fn restore(&mut self) {
        self.hidden = false;
        self.marker = None;
        self.remaining = 0.0;
        self.cooldown = STEAL_COOLDOWN;
    }

    pub fn is_active(&self) -> bool {
        self.hidden
    }
}

/// Move the marker away from the pointer when it comes close.
pub fn flee(marker: Vec2, pointer: Vec2, viewport: Viewport, dt: f32) -> Vec2 {
    let away = marker - pointer;
    let dist = away.length();
    if dist >= MARKER_FLEE_RADIUS {
        return marker;
    }
    let dir = if dist > 0.5 { away / dist } else { Vec2::X };
    viewport.clamp(marker + dir * MARKER_FLEE_SPEED * dt, MARKER_MARGIN)
}

#[allow(clippy::too_many_arguments)]
pub fn update(
    world: &mut hecs::World,
    scene: &Scene,
    cursor: &mut CursorOverride,
    pointer: &PointerState,
    viewport: Viewport,
    dt: f32,
    now: f32,
) {
    if cursor.cooldown > 0.0 {
        cursor.cooldown = (cursor.cooldown - dt).max(0.0);
    }

    let Ok((pos, facing, state, stats, target, speech)) = world.query_one_mut::<(
        &Position,
        &Facing,
        &mut PetState,
        &mut Stats,
        &mut Target,
        &mut Speech,
    )>(scene.pet) else {
        return;
    };

    match state.action {
        Action::Pouncing => {
            state.timer -= dt;
            if state.timer <= 0.0 {
                let mouth = pos.0
                    + Vec2::new(MOUTH_OFFSET.0 * facing.sign(), MOUTH_OFFSET.1);
                cursor.begin(viewport.clamp(mouth, MARKER_MARGIN));
                state.set(Action::CaughtCursor, STEAL_DURATION);
                target.clear();
                stats.happiness += STEAL_HAPPINESS;
                stats.clamp();
                speech.say("prins! 🐾", now);
                log::info!("cursor stolen");
            }
        }
        Action::CaughtCursor => {
            if let Some(marker) = cursor.marker {
                cursor.marker = Some(flee(marker, pointer.pos, viewport, dt));
            }
            cursor.remaining -= dt;
            if cursor.remaining <= 0.0 {
                cursor.restore();
                state.set(Action::Idle, 0.0);
                log::info!("cursor returned");
            }
        }
        _ => {
            // Any other path out of a steal must hand the cursor back.
            if cursor.hidden {
                cursor.restore();
                log::info!("cursor returned early");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pet::spawn_scene;

    #[test]
    fn steal_restores_cursor_after_duration() {
        let viewport = Viewport::new(1280.0, 800.0);
        let mut world = hecs::World::new();
        let scene = spawn_scene(&mut world, viewport, "Fifi");
        let mut cursor = CursorOverride::new();
        let pointer = PointerState::new();

        world
            .get::<&mut PetState>(scene.pet)
            .unwrap()
            .set(Action::Pouncing, POUNCE_DURATION);

        let dt = TICK_RATE as f32;
        let mut t = 0.0;
        let mut saw_hidden = false;
        for _ in 0..((POUNCE_DURATION + STEAL_DURATION) / dt) as usize + 30 {
            t += dt;
            update(&mut world, &scene, &mut cursor, &pointer, viewport, dt, t);
            saw_hidden |= cursor.hidden;
        }

        assert!(saw_hidden);
        assert!(!cursor.hidden);
        assert!(cursor.marker.is_none());
        assert!(cursor.cooldown > 0.0);
        let state = world.get::<&PetState>(scene.pet).unwrap();
        assert_eq!(state.action, Action::Idle);
    }

    #[test]
    fn leaving_the_steal_early_restores() {
        let viewport = Viewport::new(1280.0, 800.0);
        let mut world = hecs::World::new();
        let scene = spawn_scene(&mut world, viewport, "Fifi");
        let mut cursor = CursorOverride::new();
        cursor.begin(Vec2::new(100.0, 100.0));

        update(
            &mut world,
            &scene,
            &mut cursor,
            &PointerState::new(),
            viewport,
            0.016,
            0.0,
        );
        assert!(!cursor.is_active());
        assert!(cursor.marker.is_none());
    }

    #[test]
    fn marker_flees_close_pointer() {
        let viewport = Viewport::new(800.0, 600.0);
        let m = Vec2::new(400.0, 300.0);
        let moved = flee(m, Vec2::new(350.0, 300.0), viewport, 0.1);
        assert!(moved.x > m.x);
        let still = flee(m, Vec2::new(100.0, 100.0), viewport, 0.1);
        assert_eq!(still, m);
    }

    #[test]
    fn marker_stays_on_screen() {
        let viewport = Viewport::new(800.0, 600.0);
        let mut m = Vec2::new(790.0, 300.0);
        for _ in 0..100 {
            m = flee(m, Vec2::new(700.0, 300.0), viewport, 0.1);
        }
        assert!(m.x <= 800.0 - MARKER_MARGIN);
    }
}
