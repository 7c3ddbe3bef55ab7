use glam::Vec2;

use crate::pet::tuning::{MESSAGE_LIFETIME, STAT_MAX, STAT_MIN};

/// Current world position in window pixels.
#[derive(Debug, Clone, Copy)]
pub struct Position(pub Vec2);

/// Previous tick's position, used for render interpolation.
#[derive(Debug, Clone, Copy)]
pub struct PrevPosition(pub Vec2);

/// Velocity in pixels per frame.
#[derive(Debug, Clone, Copy)]
pub struct Velocity(pub Vec2);

/// Which way the sprite faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// Horizontal scale applied to the sprite (1 = right).
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Face along `dx`; zero keeps the current facing.
    pub fn toward(self, dx: f32) -> Self {
        if dx > 0.0 {
            Facing::Right
        } else if dx < 0.0 {
            Facing::Left
        } else {
            self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Action {
    Idle,
    Sleeping,
    Walking,
    Running,
    Eating,
    Grooming,
    Stalking,
    Pouncing,
    Held,
    CaughtCursor,
}

/// Current action plus its clocks.
#[derive(Debug, Clone, Copy)]
pub struct PetState {
    pub action: Action,
    /// Seconds spent in the current action.
    pub elapsed: f32,
    /// Seconds left for timed actions (grooming, pouncing, eating).
    pub timer: f32,
}

impl PetState {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            elapsed: 0.0,
            timer: 0.0,
        }
    }

    /// Switch action and reset both clocks.
    pub fn set(&mut self, action: Action, timer: f32) {
        if self.action != action {
            log::debug!("pet action {:?} -> {:?}", self.action, action);
        }
        self.action = action;
        self.elapsed = 0.0;
        self.timer = timer;
    }

    pub fn is(&self, action: Action) -> bool {
        self.action == action
    }

    /// Whether a steal is in progress (stalk, pounce or holding the cursor).
    pub fn is_stealing(&self) -> bool {
        matches!(
            self.action,
            Action::Stalking | Action::Pouncing | Action::CaughtCursor
        )
    }
}

/// Hunger, happiness and energy, each held within [0, 100].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub hunger: f32,
    pub happiness: f32,
    pub energy: f32,
}

impl Stats {
    pub fn clamp(&mut self) {
        self.hunger = self.hunger.clamp(STAT_MIN, STAT_MAX);
        self.happiness = self.happiness.clamp(STAT_MIN, STAT_MAX);
        self.energy = self.energy.clamp(STAT_MIN, STAT_MAX);
    }
}

/// What the pet is heading for; decides what happens on arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    Wander,
    Bowl,
    Ball,
    Cursor,
}

#[derive(Debug, Clone, Copy)]
pub struct Destination {
    pub point: Vec2,
    pub purpose: Purpose,
}

/// Optional walk/run/stalk target. Cleared on arrival, drag or sleep.
#[derive(Debug, Clone, Copy, Default)]
pub struct Target(pub Option<Destination>);

impl Target {
    pub fn set(&mut self, point: Vec2, purpose: Purpose) {
        self.0 = Some(Destination { point, purpose });
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }
}

/// Press-time data while the pet is held by the pointer.
#[derive(Debug, Clone, Copy)]
pub struct Hold {
    /// Pointer minus anchor at press time.
    pub offset: Vec2,
    pub press: Vec2,
    /// Pointer travelled past the poke slop.
    pub moved: bool,
    /// Action before the press, for poke reactions.
    pub before: Action,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Grab(pub Option<Hold>);

/// A speech-bubble line with its creation time.
#[derive(Debug, Clone)]
pub struct Message {
    pub text: String,
    pub born: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Speech(pub Option<Message>);

impl Speech {
    /// Show `text`, replacing whatever bubble is up.
    pub fn say(&mut self, text: &str, now: f32) {
        self.0 = Some(Message {
            text: text.to_string(),
            born: now,
        });
    }

    /// Drop the bubble once it has been up for the full lifetime.
    pub fn expire(&mut self, now: f32) {
        if let Some(msg) = &self.0 {
            if now - msg.born >= MESSAGE_LIFETIME {
                self.0 = None;
            }
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.0.as_ref().map(|m| m.text.as_str())
    }
}

/// Pet name for the stats panel.
#[derive(Debug, Clone)]
pub struct PetName(pub String);

/// Toy ball. Position and velocity live in their own components.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ball {
    pub moving: bool,
    /// Rotation in radians, advanced while rolling.
    pub spin: f32,
}

/// Food bowl fill state.
#[derive(Debug, Clone, Copy, Default)]
pub struct FoodBowl {
    /// Fill level in [0, 100].
    pub level: f32,
    pub full: bool,
    pub pouring: bool,
    /// The pet is eating from it.
    pub draining: bool,
    /// Time toward the next pour/drain step.
    pub step_acc: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speech_expires_after_lifetime() {
        let mut speech = Speech::default();
        speech.say("miau~!", 1.0);
        speech.expire(1.0 + 1.9);
        assert_eq!(speech.text(), Some("miau~!"));
        speech.expire(1.0 + MESSAGE_LIFETIME);
        assert_eq!(speech.text(), None);
    }

    #[test]
    fn newer_line_replaces_and_restarts_the_clock() {
        let mut speech = Speech::default();
        speech.say("zzz...", 0.0);
        speech.say("*căscat*", 1.5);
        assert_eq!(speech.text(), Some("*căscat*"));
        speech.expire(2.5);
        assert_eq!(speech.text(), Some("*căscat*"));
        speech.expire(1.5 + MESSAGE_LIFETIME);
        assert_eq!(speech.text(), None);
    }
}
