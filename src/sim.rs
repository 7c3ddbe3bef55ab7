use glam::Vec2;

use crate::ecs::components::{
    Action, Ball, Facing, FoodBowl, PetName, PetState, Position, PrevPosition, Speech, Stats,
};
use crate::ecs::systems::{self, cursor_steal::CursorOverride, SimClock, TickInput};
use crate::ecs::Viewport;
use crate::input::{PetCommand, PointerState};
use crate::pet::{self, Scene};

/// Everything the UI and renderer need from the pet for one frame.
#[derive(Debug, Clone)]
pub struct PetView {
    pub name: String,
    /// Interpolated anchor (feet center).
    pub anchor: Vec2,
    pub facing: Facing,
    pub action: Action,
    pub stats: Stats,
    pub speech: Option<String>,
    pub frame: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct PropsView {
    pub ball: Vec2,
    pub ball_spin: f32,
    pub bowl: Vec2,
    pub bowl_level: f32,
    pub marker: Option<Vec2>,
}

/// The pet world plus its clocks, stepped at a fixed rate by the app.
pub struct Simulation {
    world: hecs::World,
    scene: Scene,
    clock: SimClock,
    cursor: CursorOverride,
    viewport: Viewport,
    rng: fastrand::Rng,
}

impl Simulation {
    pub fn new(viewport: Viewport, seed: Option<u64>, name: &str) -> Self {
        let mut world = hecs::World::new();
        let scene = pet::spawn_scene(&mut world, viewport, name);
        let rng = match seed {
            Some(s) => fastrand::Rng::with_seed(s),
            None => fastrand::Rng::new(),
        };
        Self {
            world,
            scene,
            clock: SimClock::new(),
            cursor: CursorOverride::new(),
            viewport,
            rng,
        }
    }

    /// One fixed tick. Consumes the pointer's press/release edges.
    pub fn step(&mut self, dt: f32, pointer: &mut PointerState, commands: &[PetCommand]) {
        let input = TickInput {
            pointer,
            commands,
        };
        systems::tick(
            &mut self.world,
            &self.scene,
            &mut self.clock,
            &mut self.cursor,
            self.viewport,
            &input,
            &mut self.rng,
            dt,
        );
        pointer.end_tick();
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        pet::relayout(&mut self.world, &self.scene, viewport);
    }

    /// Whether the OS cursor should be hidden.
    pub fn cursor_hidden(&self) -> bool {
        self.cursor.is_active()
    }

    pub fn pet_view(&self, alpha: f32) -> Option<PetView> {
        let mut query = self
            .world
            .query_one::<(
                &Position,
                &PrevPosition,
                &Facing,
                &PetState,
                &Stats,
                &Speech,
                &PetName,
            )>(self.scene.pet)
            .ok()?;
        let (pos, prev, facing, state, stats, speech, name) = query.get()?;
        Some(PetView {
            name: name.0.clone(),
            anchor: prev.0.lerp(pos.0, alpha),
            facing: *facing,
            action: state.action,
            stats: *stats,
            speech: speech.text().map(str::to_string),
            frame: self.clock.frame,
        })
    }

    pub fn props_view(&self, alpha: f32) -> PropsView {
        let mut ball = Vec2::ZERO;
        let mut ball_spin = 0.0;
        if let Ok(mut q) = self
            .world
            .query_one::<(&Position, &PrevPosition, &Ball)>(self.scene.ball)
        {
            if let Some((p, prev, b)) = q.get() {
                ball = prev.0.lerp(p.0, alpha);
                ball_spin = b.spin;
            }
        }

        let mut bowl = Vec2::ZERO;
        let mut bowl_level = 0.0;
        if let Ok(mut q) = self.world.query_one::<(&Position, &FoodBowl)>(self.scene.bowl) {
            if let Some((p, b)) = q.get() {
                bowl = p.0;
                bowl_level = b.level;
            }
        }

        PropsView {
            ball,
            ball_spin,
            bowl,
            bowl_level,
            marker: self.cursor.marker,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pet::tuning::*;

    const DT: f32 = TICK_RATE as f32;

    fn sim(seed: u64) -> Simulation {
        Simulation::new(Viewport::new(1280.0, 800.0), Some(seed), "Fifi")
    }

    fn in_range(v: f32) -> bool {
        (STAT_MIN..=STAT_MAX).contains(&v)
    }

    #[test]
    fn stats_and_position_stay_bounded() {
        for seed in 0..4 {
            let mut s = sim(seed);
            let mut pointer = PointerState::new();
            pointer.move_to(Vec2::new(640.0, 400.0));
            // Ten simulated minutes with occasional feeding and kicking.
            for i in 0..(60 * 600) {
                let cmds: &[PetCommand] = match i % 1800 {
                    0 => &[PetCommand::KickBall],
                    900 => &[PetCommand::Feed, PetCommand::PourFood],
                    _ => &[],
                };
                s.step(DT, &mut pointer, cmds);
                let v = s.pet_view(1.0).unwrap();
                assert!(in_range(v.stats.hunger), "hunger {}", v.stats.hunger);
                assert!(in_range(v.stats.happiness));
                assert!(in_range(v.stats.energy));
                assert!(v.anchor.x >= 0.0 && v.anchor.x <= 1280.0);
                assert!(v.anchor.y >= 0.0 && v.anchor.y <= 800.0);
            }
        }
    }

    #[test]
    fn feed_command_goes_through_the_bus() {
        let mut s = sim(1);
        let mut pointer = PointerState::new();
        // Hunger rises one point per decay step.
        for _ in 0..((STAT_DECAY_PERIOD * 30.0) / DT) as usize {
            s.step(DT, &mut pointer, &[]);
        }
        let before = s.pet_view(1.0).unwrap().stats;
        assert!(before.hunger >= FEED_MIN_HUNGER);

        s.step(DT, &mut pointer, &[PetCommand::Feed]);
        let after = s.pet_view(1.0).unwrap();
        assert!(after.stats.hunger < before.hunger);
        assert!(after.stats.happiness >= before.happiness);
    }

    #[test]
    fn drag_through_ticks() {
        let mut s = sim(2);
        let mut pointer = PointerState::new();
        let anchor = s.pet_view(1.0).unwrap().anchor;

        pointer.move_to(anchor + Vec2::new(5.0, -10.0));
        pointer.press(false);
        s.step(DT, &mut pointer, &[]);
        assert_eq!(s.pet_view(1.0).unwrap().action, Action::Held);

        pointer.move_to(Vec2::new(2000.0, 10.0));
        s.step(DT, &mut pointer, &[]);
        let v = s.pet_view(1.0).unwrap();
        assert_eq!(v.anchor, Vec2::new(1280.0 - DRAG_MAX_INSET, DRAG_MIN));

        pointer.release();
        s.step(DT, &mut pointer, &[]);
        assert_eq!(s.pet_view(1.0).unwrap().action, Action::Idle);
    }

    #[test]
    fn resize_keeps_pet_inside() {
        let mut s = sim(3);
        s.resize(Viewport::new(200.0, 150.0));
        let v = s.pet_view(1.0).unwrap();
        assert!(v.anchor.x <= 200.0 - VIEW_MARGIN);
        assert!(v.anchor.y <= 150.0 - VIEW_MARGIN);
    }

    #[test]
    fn tiny_window_resize_does_not_panic() {
        let mut s = sim(4);
        let mut pointer = PointerState::new();
        s.resize(Viewport::new(30.0, 20.0));
        for _ in 0..120 {
            s.step(DT, &mut pointer, &[PetCommand::KickBall]);
        }
        let props = s.props_view(1.0);
        assert!(props.ball.x >= BALL_WALL_MIN);
        assert!(s.pet_view(1.0).is_some());

        s.resize(Viewport::new(1.0, 1.0));
        s.step(DT, &mut pointer, &[]);
    }
}
