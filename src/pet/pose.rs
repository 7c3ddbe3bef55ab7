//! Action → drawing parameters. The sprite shader draws every action from
//! one of two silhouettes; this table says which and how to animate it.

use crate::ecs::components::Action;

/// Which silhouette the shader draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Silhouette {
    Awake = 0,
    Curled = 1,
}

#[derive(Debug, Clone, Copy)]
pub struct Pose {
    pub silhouette: Silhouette,
    /// Walk-cycle phase speed per frame; 0 means standing still.
    pub gait: f32,
    /// Tail swing amplitude.
    pub tail: f32,
    /// Body lowered toward the floor, in sprite pixels.
    pub crouch: f32,
    /// Legs hanging loose (held by the pointer).
    pub dangle: bool,
    /// Front paw raised to the face.
    pub paw_lift: bool,
    /// Stats panel label.
    pub label: &'static str,
}

const fn pose(silhouette: Silhouette, gait: f32, tail: f32, label: &'static str) -> Pose {
    Pose {
        silhouette,
        gait,
        tail,
        crouch: 0.0,
        dangle: false,
        paw_lift: false,
        label,
    }
}

pub fn pose_for(action: Action) -> Pose {
    match action {
        Action::Idle => pose(Silhouette::Awake, 0.0, 12.0, "😺 Relaxată"),
        Action::Sleeping => pose(Silhouette::Curled, 0.0, 0.0, "😴 Doarme"),
        Action::Walking => pose(Silhouette::Awake, 0.25, 25.0, "🚶 Se plimbă"),
        Action::Running => pose(Silhouette::Awake, 0.4, 25.0, "🏃 Aleargă"),
        Action::Eating => Pose {
            crouch: 4.0,
            ..pose(Silhouette::Awake, 0.0, 8.0, "😋 Mănâncă")
        },
        Action::Grooming => Pose {
            paw_lift: true,
            ..pose(Silhouette::Awake, 0.0, 6.0, "🧼 Se spală")
        },
        Action::Stalking => Pose {
            crouch: 6.0,
            ..pose(Silhouette::Awake, 0.12, 4.0, "👀 Pândește")
        },
        Action::Pouncing => Pose {
            crouch: -4.0,
            ..pose(Silhouette::Awake, 0.0, 30.0, "💥 Sare!")
        },
        Action::Held => Pose {
            dangle: true,
            ..pose(Silhouette::Awake, 0.0, 25.0, "🤲 În brațe")
        },
        Action::CaughtCursor => pose(Silhouette::Awake, 0.0, 20.0, "🐾 Are cursorul!"),
    }
}

/// Per-frame animation values derived from a pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseFrame {
    pub walk_cycle: f32,
    /// Vertical hop while moving, in pixels.
    pub bounce: f32,
    pub tail_swing: f32,
    pub ear_twitch: f32,
    pub breathe: f32,
    /// Paw raise in [0, 1].
    pub paw: f32,
    pub blink: bool,
}

/// Frames between blinks, and how long a blink lasts.
const BLINK_PERIOD: u64 = 180;
const BLINK_FRAMES: u64 = 6;
/// Animation phase wraps here so long sessions keep f32 precision.
/// A multiple of `BLINK_PERIOD` so blinks stay evenly spaced.
const ANIM_WRAP: u64 = BLINK_PERIOD * 2000;

impl Pose {
    pub fn moving(&self) -> bool {
        self.gait > 0.0
    }

    pub fn sample(&self, frame: u64) -> PoseFrame {
        let frame = frame % ANIM_WRAP;
        let f = frame as f32;
        let t = f * 0.1;
        let moving = self.moving();
        PoseFrame {
            walk_cycle: if moving { (f * self.gait).sin() } else { 0.0 },
            bounce: if moving {
                (f * self.gait * 2.0).sin().abs() * 2.0
            } else {
                0.0
            },
            tail_swing: (t * 0.8).sin() * self.tail,
            ear_twitch: (t * 0.3).sin() * 2.0,
            breathe: (t * 0.15).sin() * 1.5,
            paw: if self.paw_lift {
                (t * 1.2).sin() * 0.5 + 0.5
            } else {
                0.0
            },
            blink: frame % BLINK_PERIOD < BLINK_FRAMES,
        }
    }
}

/// Badge shown over a hungry pet, if any.
pub fn mood_badge(action: Action, hunger: f32) -> Option<&'static str> {
    if matches!(action, Action::Sleeping | Action::Eating) || hunger <= 60.0 {
        return None;
    }
    Some(if hunger > 80.0 { "😾" } else { "💭" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_sleep_curls_up() {
        for action in [
            Action::Idle,
            Action::Walking,
            Action::Running,
            Action::Eating,
            Action::Grooming,
            Action::Stalking,
            Action::Pouncing,
            Action::Held,
            Action::CaughtCursor,
        ] {
            assert_eq!(pose_for(action).silhouette, Silhouette::Awake, "{action:?}");
        }
        assert_eq!(pose_for(Action::Sleeping).silhouette, Silhouette::Curled);
    }

    #[test]
    fn standing_poses_do_not_bounce() {
        let idle = pose_for(Action::Idle);
        for frame in 0..240 {
            let s = idle.sample(frame);
            assert_eq!(s.bounce, 0.0);
            assert_eq!(s.walk_cycle, 0.0);
        }
    }

    #[test]
    fn blink_window() {
        let p = pose_for(Action::Idle);
        assert!(p.sample(0).blink);
        assert!(p.sample(5).blink);
        assert!(!p.sample(6).blink);
        assert!(p.sample(180).blink);
    }

    #[test]
    fn badge_thresholds() {
        assert_eq!(mood_badge(Action::Idle, 60.0), None);
        assert_eq!(mood_badge(Action::Idle, 61.0), Some("💭"));
        assert_eq!(mood_badge(Action::Walking, 81.0), Some("😾"));
        assert_eq!(mood_badge(Action::Sleeping, 95.0), None);
        assert_eq!(mood_badge(Action::Eating, 95.0), None);
    }

    #[test]
    fn late_frames_animate_like_early_ones() {
        let walk = pose_for(Action::Walking);
        let late = u64::MAX - u64::MAX % ANIM_WRAP + 37;
        for (a, b) in [(37, ANIM_WRAP * 10 + 37), (37, late)] {
            let early = walk.sample(a);
            let later = walk.sample(b);
            assert_eq!(early.walk_cycle, later.walk_cycle);
            assert_eq!(early.tail_swing, later.tail_swing);
            assert_eq!(early.breathe, later.breathe);
            assert_eq!(early.blink, later.blink);
        }
        assert!(walk.sample(u64::MAX).walk_cycle.is_finite());
    }
}
