use crate::ecs::components::{Action, PetState, Stats};
use crate::pet::tuning::*;
use crate::pet::Scene;

/// One decay step. Sleep trades the energy drain for recovery.
pub fn decay(stats: &mut Stats, asleep: bool) {
    stats.hunger += HUNGER_PER_DECAY;
    if asleep {
        stats.energy += ENERGY_RECOVERY_PER_DECAY;
    } else {
        stats.energy -= ENERGY_DRAIN_PER_DECAY;
    }
    stats.happiness -= stats.hunger * HAPPINESS_LOSS_PER_HUNGER;
    stats.clamp();
}

pub fn update(world: &mut hecs::World, scene: &Scene) {
    if let Ok((state, stats)) = world.query_one_mut::<(&PetState, &mut Stats)>(scene.pet) {
        decay(stats, state.is(Action::Sleeping));
        log::trace!(
            "stats hunger={:.0} happiness={:.0} energy={:.0}",
            stats.hunger,
            stats.happiness,
            stats.energy
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn awake_decay_drains() {
        let mut s = Stats {
            hunger: 50.0,
            happiness: 50.0,
            energy: 50.0,
        };
        decay(&mut s, false);
        assert_eq!(s.hunger, 51.0);
        assert_eq!(s.energy, 49.0);
        assert!((s.happiness - (50.0 - 51.0 * 0.02)).abs() < 1e-4);
    }

    #[test]
    fn sleep_recovers_energy() {
        let mut s = Stats {
            hunger: 0.0,
            happiness: 50.0,
            energy: 10.0,
        };
        decay(&mut s, true);
        assert_eq!(s.energy, 16.0);
    }

    #[test]
    fn stays_within_bounds() {
        let mut s = Stats {
            hunger: 99.5,
            happiness: 0.5,
            energy: 0.5,
        };
        for _ in 0..500 {
            decay(&mut s, false);
        }
        assert_eq!(s.hunger, STAT_MAX);
        assert_eq!(s.happiness, STAT_MIN);
        assert_eq!(s.energy, STAT_MIN);

        for _ in 0..500 {
            decay(&mut s, true);
        }
        assert_eq!(s.energy, STAT_MAX);
    }
}
