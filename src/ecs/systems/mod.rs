pub mod ball;
pub mod behavior;
pub mod cursor_steal;
pub mod feeding;
pub mod movement;
pub mod pointer;
pub mod stats;

use crate::ecs::Viewport;
use crate::input::{PetCommand, PointerState};
use crate::pet::tuning::{BEHAVIOR_PERIOD, STAT_DECAY_PERIOD};
use crate::pet::Scene;
use cursor_steal::CursorOverride;

/// Simulation time and the slow-period accumulators.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimClock {
    /// Seconds since spawn.
    pub elapsed: f32,
    /// Animation frame, one per tick.
    pub frame: u64,
    stat_acc: f32,
    behavior_acc: f32,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Everything from outside the simulation for one tick.
pub struct TickInput<'a> {
    pub pointer: &'a PointerState,
    pub commands: &'a [PetCommand],
}

/// Run all simulation systems for one fixed tick, in order.
#[allow(clippy::too_many_arguments)]
pub fn tick(
    world: &mut hecs::World,
    scene: &Scene,
    clock: &mut SimClock,
    cursor: &mut CursorOverride,
    viewport: Viewport,
    input: &TickInput,
    rng: &mut fastrand::Rng,
    dt: f32,
) {
    clock.elapsed += dt;
    let now = clock.elapsed;

    // 1. Pointer: grab/drag/poke the pet, click props
    let prop_cmd = pointer::update(world, scene, input.pointer, viewport, cursor, now);

    // 2. Commands from the desktop, then from prop clicks
    for &cmd in input.commands.iter().chain(prop_cmd.iter()) {
        apply_command(world, scene, cursor, viewport, rng, cmd, now);
    }

    // 3. Stat decay on its slow period
    clock.stat_acc += dt;
    while clock.stat_acc >= STAT_DECAY_PERIOD {
        clock.stat_acc -= STAT_DECAY_PERIOD;
        stats::update(world, scene);
    }

    // 4. Behavior selection on its own period
    clock.behavior_acc += dt;
    if clock.behavior_acc >= BEHAVIOR_PERIOD {
        clock.behavior_acc -= BEHAVIOR_PERIOD;
        behavior::select(world, scene, viewport, cursor, input.pointer, rng, now);
    }

    // 5. Timed actions (grooming, eating, stalk give-up)
    behavior::update_timers(world, scene, dt, now);

    // 6. Movement toward the target
    movement::integrate(world, scene, viewport, input.pointer, dt, now);

    // 7. Ball physics
    ball::update(world, scene, viewport, dt);

    // 8. Bowl pour/drain
    feeding::update_bowl(world, scene, viewport, dt, now);

    // 9. Pounce, hold and return the cursor
    cursor_steal::update(world, scene, cursor, input.pointer, viewport, dt, now);

    // 10. Speech bubble expiry
    if let Ok(speech) = world.query_one_mut::<&mut crate::ecs::components::Speech>(scene.pet) {
        speech.expire(now);
    }

    clock.frame += 1;
}

fn apply_command(
    world: &mut hecs::World,
    scene: &Scene,
    cursor: &mut CursorOverride,
    viewport: Viewport,
    rng: &mut fastrand::Rng,
    cmd: PetCommand,
    now: f32,
) {
    log::debug!("command {cmd:?}");
    match cmd {
        PetCommand::Feed => feeding::feed(world, scene, cursor, now),
        PetCommand::PourFood => feeding::pour(world, scene, now),
        PetCommand::KickBall => ball::kick(world, scene, viewport, rng, now),
    }
}
