use glam::Vec2;

/// Commands the desktop sends to the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetCommand {
    /// Hand-feed the pet directly.
    Feed,
    /// Fill the food bowl.
    PourFood,
    /// Kick the ball.
    KickBall,
}

/// Queue of commands from the UI, drained once per tick.
#[derive(Debug, Default)]
pub struct CommandBus {
    pending: Vec<PetCommand>,
}

impl CommandBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cmd: PetCommand) {
        self.pending.push(cmd);
    }

    pub fn take(&mut self) -> Vec<PetCommand> {
        std::mem::take(&mut self.pending)
    }
}

/// Left-button pointer state, latched between ticks.
///
/// Window events arrive at any time; press/release edges stay set until the
/// next simulation tick consumes them, so a click shorter than a tick is
/// still seen.
#[derive(Debug, Clone, Copy)]
pub struct PointerState {
    pub pos: Vec2,
    pub down: bool,
    /// Set until the next tick when the button went down.
    pub pressed: bool,
    /// Set until the next tick when the button went up.
    pub released: bool,
    /// The press landed on a UI window, not the desktop.
    pub press_on_ui: bool,
    /// The pointer is inside the window.
    pub inside: bool,
}

impl PointerState {
    pub fn new() -> Self {
        Self {
            pos: Vec2::ZERO,
            down: false,
            pressed: false,
            released: false,
            press_on_ui: false,
            inside: false,
        }
    }

    pub fn move_to(&mut self, pos: Vec2) {
        self.pos = pos;
        self.inside = true;
    }

    pub fn leave(&mut self) {
        self.inside = false;
    }

    pub fn press(&mut self, on_ui: bool) {
        if !self.down {
            self.pressed = true;
            self.press_on_ui = on_ui;
        }
        self.down = true;
    }

    pub fn release(&mut self) {
        if self.down {
            self.released = true;
        }
        self.down = false;
    }

    /// Clear edges once a tick has seen them.
    pub fn end_tick(&mut self) {
        self.pressed = false;
        self.released = false;
    }

    /// A fresh press on the desktop (not on a UI window).
    pub fn desktop_press(&self) -> bool {
        self.pressed && !self.press_on_ui
    }
}

impl Default for PointerState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_inside_one_tick_keeps_both_edges() {
        let mut p = PointerState::new();
        p.move_to(Vec2::new(10.0, 10.0));
        p.press(false);
        p.release();
        assert!(p.pressed && p.released && !p.down);
        assert!(p.desktop_press());
        p.end_tick();
        assert!(!p.pressed && !p.released);
    }

    #[test]
    fn held_button_does_not_repress() {
        let mut p = PointerState::new();
        p.press(false);
        p.end_tick();
        p.press(false);
        assert!(!p.pressed);
        assert!(p.down);
    }

    #[test]
    fn ui_press_is_not_a_desktop_press() {
        let mut p = PointerState::new();
        p.press(true);
        assert!(p.pressed);
        assert!(!p.desktop_press());
    }

    #[test]
    fn bus_drains_in_order() {
        let mut bus = CommandBus::new();
        bus.push(PetCommand::PourFood);
        bus.push(PetCommand::Feed);
        assert_eq!(bus.take(), vec![PetCommand::PourFood, PetCommand::Feed]);
        assert!(bus.take().is_empty());
    }
}
