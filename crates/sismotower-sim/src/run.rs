//! Simulation run: the three disaster waves drawn at start.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use sismotower_core::enums::DisasterKind;

/// One wave of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveEntry {
    pub disaster: DisasterKind,
    pub intensity: f64,
}

/// Three waves with distinct disasters, immutable once drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRun {
    waves: [WaveEntry; 3],
}

impl SimulationRun {
    /// Shuffle the disaster set and take the first three, then pair them
    /// with an independently shuffled copy of the intensity set.
    pub fn draw<R: Rng + ?Sized>(rng: &mut R, intensities: [f64; 3]) -> Self {
        let mut disasters = DisasterKind::ALL;
        disasters.shuffle(rng);
        let mut intensities = intensities;
        intensities.shuffle(rng);
        let waves = std::array::from_fn(|i| WaveEntry {
            disaster: disasters[i],
            intensity: intensities[i],
        });
        Self { waves }
    }

    pub fn waves(&self) -> &[WaveEntry] {
        &self.waves
    }

    /// Wave by 1-based number.
    pub fn wave(&self, number: u8) -> Option<&WaveEntry> {
        usize::from(number)
            .checked_sub(1)
            .and_then(|i| self.waves.get(i))
    }

    pub fn disasters(&self) -> Vec<DisasterKind> {
        self.waves.iter().map(|w| w.disaster).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_same_seed_same_run() {
        let a = SimulationRun::draw(&mut ChaCha8Rng::seed_from_u64(7), [0.6, 0.8, 1.0]);
        let b = SimulationRun::draw(&mut ChaCha8Rng::seed_from_u64(7), [0.6, 0.8, 1.0]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_wave_lookup_is_one_based() {
        let run = SimulationRun::draw(&mut ChaCha8Rng::seed_from_u64(1), [0.6, 0.8, 1.0]);
        assert_eq!(run.wave(0), None);
        assert_eq!(run.wave(1), run.waves().first());
        assert_eq!(run.wave(3), run.waves().last());
        assert_eq!(run.wave(4), None);
    }

    #[test]
    fn test_every_disaster_can_be_left_out() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut excluded = std::collections::HashSet::new();
        for _ in 0..200 {
            let run = SimulationRun::draw(&mut rng, [0.6, 0.8, 1.0]);
            let drawn = run.disasters();
            for kind in DisasterKind::ALL {
                if !drawn.contains(&kind) {
                    excluded.insert(kind);
                }
            }
        }
        assert_eq!(excluded.len(), 4);
    }
}
