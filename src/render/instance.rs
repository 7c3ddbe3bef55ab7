use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::pet::pose::pose_for;
use crate::pet::tuning::BALL_RADIUS;
use crate::sim::{PetView, PropsView};

/// Shape the shader draws for an instance.
pub const KIND_BALL: u32 = 2;
pub const KIND_BOWL: u32 = 3;
pub const KIND_BAG: u32 = 4;
pub const KIND_MARKER: u32 = 5;

/// Pet quad, anchored at the feet.
pub const PET_SIZE: [f32; 2] = [96.0, 72.0];
const PET_CENTER_LIFT: f32 = 30.0;
const BOWL_SIZE: [f32; 2] = [60.0, 34.0];
const BAG_SIZE: [f32; 2] = [32.0, 44.0];
const BAG_LIFT: f32 = 36.0;
const MARKER_SIZE: [f32; 2] = [26.0, 30.0];

const FUR: u32 = pack_rgba(0xf4, 0xa2, 0x61, 0xff);
const BALL_RED: u32 = pack_rgba(0xe6, 0x39, 0x46, 0xff);
const BOWL_BLUE: u32 = pack_rgba(0x45, 0x7b, 0x9d, 0xff);
const BAG_PAPER: u32 = pack_rgba(0xc9, 0x8b, 0x5a, 0xff);
const WHITE: u32 = pack_rgba(0xff, 0xff, 0xff, 0xff);

/// Pack a color so `unpack4x8unorm` yields (r, g, b, a).
pub const fn pack_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    u32::from_le_bytes([r, g, b, a])
}

/// Per-instance data uploaded to GPU each frame.
/// Stride = 60 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct SpriteInstance {
    /// Quad center in window pixels.
    pub position: [f32; 2],
    /// Quad size in pixels.
    pub size: [f32; 2],
    /// Base color, see [`pack_rgba`].
    pub color: u32,
    /// Shape selector (silhouette for the pet, prop kind otherwise).
    pub kind: u32,
    /// -1 mirrors the shape horizontally.
    pub facing: f32,
    /// Pet: walk cycle, tail swing, ear twitch, breathing.
    /// Ball: spin. Bowl: fill in [0, 1].
    pub params0: [f32; 4],
    /// Pet: paw raise, blink, crouch, dangle.
    pub params1: [f32; 4],
}

impl SpriteInstance {
    fn prop(center: Vec2, size: [f32; 2], color: u32, kind: u32, p: f32) -> Self {
        Self {
            position: center.into(),
            size,
            color,
            kind,
            facing: 1.0,
            params0: [p, 0.0, 0.0, 0.0],
            params1: [0.0; 4],
        }
    }

    /// Build the pet instance from its pose table entry.
    pub fn pet(view: &PetView) -> Self {
        let pose = pose_for(view.action);
        let frame = pose.sample(view.frame);
        let center = view.anchor - Vec2::new(0.0, PET_CENTER_LIFT + frame.bounce);
        Self {
            position: center.into(),
            size: PET_SIZE,
            color: FUR,
            kind: pose.silhouette as u32,
            facing: view.facing.sign(),
            params0: [
                frame.walk_cycle,
                frame.tail_swing,
                frame.ear_twitch,
                frame.breathe,
            ],
            params1: [
                frame.paw,
                if frame.blink { 1.0 } else { 0.0 },
                pose.crouch,
                if pose.dangle { 1.0 } else { 0.0 },
            ],
        }
    }
}

/// Collect every sprite for this frame, back to front.
pub fn build(pet: Option<&PetView>, props: &PropsView, out: &mut Vec<SpriteInstance>) {
    out.clear();

    let bag = props.bowl - Vec2::new(0.0, BAG_LIFT);
    out.push(SpriteInstance::prop(bag, BAG_SIZE, BAG_PAPER, KIND_BAG, 0.0));
    out.push(SpriteInstance::prop(
        props.bowl,
        BOWL_SIZE,
        BOWL_BLUE,
        KIND_BOWL,
        props.bowl_level / 100.0,
    ));
    let ball_size = (BALL_RADIUS + 2.0) * 2.0;
    out.push(SpriteInstance::prop(
        props.ball,
        [ball_size, ball_size],
        BALL_RED,
        KIND_BALL,
        props.ball_spin,
    ));

    if let Some(pet) = pet {
        out.push(SpriteInstance::pet(pet));
    }

    // Tip of the arrow sits at the marker point.
    if let Some(m) = props.marker {
        let center = m + Vec2::new(MARKER_SIZE[0] * 0.5 - 3.0, MARKER_SIZE[1] * 0.5 - 2.0);
        out.push(SpriteInstance::prop(center, MARKER_SIZE, WHITE, KIND_MARKER, 0.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{Action, Facing, Stats};
    use crate::pet::pose::Silhouette;

    fn view(action: Action, facing: Facing) -> PetView {
        PetView {
            name: "Fifi".into(),
            anchor: Vec2::new(300.0, 500.0),
            facing,
            action,
            stats: Stats {
                hunger: 20.0,
                happiness: 80.0,
                energy: 80.0,
            },
            speech: None,
            frame: 10,
        }
    }

    #[test]
    fn instance_stride() {
        assert_eq!(std::mem::size_of::<SpriteInstance>(), 60);
    }

    #[test]
    fn sleeping_pet_uses_curled_shape() {
        let i = SpriteInstance::pet(&view(Action::Sleeping, Facing::Right));
        assert_eq!(i.kind, Silhouette::Curled as u32);
        let i = SpriteInstance::pet(&view(Action::Idle, Facing::Left));
        assert_eq!(i.kind, Silhouette::Awake as u32);
        assert_eq!(i.facing, -1.0);
    }

    #[test]
    fn marker_drawn_only_during_steal() {
        let mut props = PropsView {
            ball: Vec2::new(100.0, 700.0),
            ball_spin: 0.0,
            bowl: Vec2::new(1200.0, 780.0),
            bowl_level: 50.0,
            marker: None,
        };
        let mut out = Vec::new();
        build(None, &props, &mut out);
        assert!(out.iter().all(|i| i.kind != KIND_MARKER));

        props.marker = Some(Vec2::new(10.0, 10.0));
        build(None, &props, &mut out);
        assert_eq!(out.last().map(|i| i.kind), Some(KIND_MARKER));
        let bowl = out.iter().find(|i| i.kind == KIND_BOWL).unwrap();
        assert_eq!(bowl.params0[0], 0.5);
    }
}
