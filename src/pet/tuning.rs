//! Fifi's behavior constants. Distances are in window pixels, times in seconds.

/// Simulation step (one animation frame per tick).
pub const TICK_RATE: f64 = 1.0 / 60.0;

// --- Stats ---

pub const STAT_MIN: f32 = 0.0;
pub const STAT_MAX: f32 = 100.0;
/// Seconds between stat decay steps.
pub const STAT_DECAY_PERIOD: f32 = 3.0;
pub const HUNGER_PER_DECAY: f32 = 1.0;
pub const ENERGY_DRAIN_PER_DECAY: f32 = 1.0;
pub const ENERGY_RECOVERY_PER_DECAY: f32 = 6.0;
/// Happiness lost per decay step, per point of hunger.
pub const HAPPINESS_LOSS_PER_HUNGER: f32 = 0.02;

pub const START_HUNGER: f32 = 25.0;
pub const START_HAPPINESS: f32 = 80.0;
pub const START_ENERGY: f32 = 80.0;

// --- Behavior selection ---

/// Seconds between behavior rolls.
pub const BEHAVIOR_PERIOD: f32 = 2.5;
pub const BOWL_HUNGER: f32 = 50.0;
pub const SLEEP_ENERGY: f32 = 20.0;
pub const WAKE_ENERGY: f32 = 80.0;
pub const MIN_SLEEP: f32 = 6.0;
pub const STALK_HUNGER: f32 = 40.0;
/// Stalk chance at 100 hunger; scales linearly down to 0 at `STALK_HUNGER`.
pub const STALK_MAX_CHANCE: f32 = 0.5;
pub const WANDER_CHANCE: f32 = 0.15;
/// Share of wander rolls that become a nap instead of a walk.
pub const NAP_SHARE: f32 = 0.2;
pub const GROOM_CHANCE: f32 = 0.05;
pub const GROOM_DURATION: f32 = 3.0;

// --- Movement ---

pub const WALK_SPEED: f32 = 120.0;
pub const RUN_SPEED: f32 = 240.0;
pub const STALK_SPEED: f32 = 45.0;
pub const ARRIVE_DIST: f32 = 5.0;
/// Walk targets and the resting line sit this far above the window bottom.
pub const FLOOR_OFFSET: f32 = 120.0;
pub const WANDER_MIN_X: f32 = 80.0;
pub const WANDER_RIGHT_MARGIN: f32 = 170.0;
/// Free movement keeps the anchor this far inside the window.
pub const VIEW_MARGIN: f32 = 40.0;

// --- Dragging ---

pub const DRAG_MIN: f32 = 40.0;
pub const DRAG_MAX_INSET: f32 = 80.0;
/// Pointer travel below which a press/release pair is a poke, not a drag.
pub const POKE_SLOP: f32 = 4.0;
/// Hit box around the anchor: x in [-40, 40], y in [-50, 10].
pub const HIT_HALF_WIDTH: f32 = 40.0;
pub const HIT_TOP: f32 = 50.0;
pub const HIT_BOTTOM: f32 = 10.0;
pub const POKE_HAPPINESS: f32 = 2.0;
pub const COMPLAIN_HUNGER: f32 = 60.0;

// --- Feeding ---

/// Below this hunger a feed is refused.
pub const FEED_MIN_HUNGER: f32 = 10.0;
pub const FEED_AMOUNT: f32 = 40.0;
pub const FEED_HAPPINESS: f32 = 15.0;
pub const EAT_DURATION: f32 = 1.5;
pub const BOWL_MEAL: f32 = 50.0;
pub const POUR_STEP: f32 = 0.03;
pub const POUR_AMOUNT: f32 = 10.0;
pub const DRAIN_STEP: f32 = 0.05;
pub const DRAIN_AMOUNT: f32 = 5.0;
pub const BOWL_FULL: f32 = 100.0;
/// Pouring only sends the pet running when it is at least this hungry.
pub const POUR_RUN_HUNGER: f32 = 25.0;
/// Bowl center sits this far from the bottom-right corner.
pub const BOWL_INSET: (f32, f32) = (35.0, 21.0);
/// The pet eats standing this far left of the right edge.
pub const BOWL_APPROACH_INSET: f32 = 80.0;

// --- Ball ---

pub const BALL_START_X: f32 = 120.0;
pub const BALL_REST_OFFSET: f32 = 60.0;
pub const BALL_FLOOR_OFFSET: f32 = 55.0;
pub const BALL_WALL_MIN: f32 = 15.0;
pub const BALL_WALL_INSET: f32 = 35.0;
/// Physics constants are per frame at the fixed tick rate.
pub const BALL_GRAVITY: f32 = 0.3;
pub const BALL_FRICTION: f32 = 0.99;
pub const BALL_WALL_BOUNCE: f32 = 0.7;
pub const BALL_FLOOR_BOUNCE: f32 = 0.6;
pub const BALL_FLOOR_DRAG: f32 = 0.95;
pub const BALL_REST_SPEED: f32 = 0.2;
pub const BALL_KICK_X: f32 = 12.0;
pub const BALL_KICK_UP: f32 = 8.0;
pub const BALL_KICK_UP_JITTER: f32 = 4.0;
pub const BALL_RADIUS: f32 = 12.0;

// --- Cursor steal ---

pub const STALK_GIVE_UP: f32 = 8.0;
pub const POUNCE_DIST: f32 = 20.0;
pub const POUNCE_DURATION: f32 = 0.5;
pub const STEAL_DURATION: f32 = 6.0;
pub const STEAL_COOLDOWN: f32 = 30.0;
pub const STEAL_HAPPINESS: f32 = 10.0;
pub const MARKER_FLEE_RADIUS: f32 = 140.0;
pub const MARKER_FLEE_SPEED: f32 = 260.0;
pub const MARKER_MARGIN: f32 = 8.0;
/// Marker spawn point relative to the pet anchor, facing right.
pub const MOUTH_OFFSET: (f32, f32) = (18.0, -16.0);

// --- Speech ---

pub const MESSAGE_LIFETIME: f32 = 2.0;
