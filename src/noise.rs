//! A minimal, explicitly-illustrative implementation of the external
//! noise-injection interface from §6. The codec never imports this outside
//! of tests and the CLI's `simulate` subcommand — it depends only on the
//! interface (a `StoragePattern` in, a `StoragePattern` of identical shape
//! out), never on any particular perturbation distribution. Grounded in the
//! source corpus's own bit-error-rate channel used for transmission
//! simulation.

use crate::pattern::StoragePattern;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

/// Flips each voxel's intensity/polarization *level* independently with
/// probability `bit_error_rate`, then re-derives the physical value for the
/// flipped level. Coordinates, geometry, and every metadata field are left
/// untouched — only `intensity`/`polarization` may change, per §6.
pub struct BitErrorChannel {
    pub bit_error_rate: f64,
}

impl BitErrorChannel {
    pub fn new(bit_error_rate: f64) -> Self {
        Self { bit_error_rate }
    }

    /// Applies the channel to `pattern`, returning a perturbed copy.
    /// `seed` makes the perturbation reproducible; omit it for a
    /// fresh-entropy run.
    pub fn apply(&self, pattern: &StoragePattern, seed: Option<u64>) -> StoragePattern {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        if self.bit_error_rate <= 0.0 {
            return pattern.clone();
        }

        let mut voxels = pattern.voxels.clone();
        for voxel in &mut voxels {
            if rng.gen_bool(self.bit_error_rate.min(1.0)) {
                voxel.intensity = flip_nearest_level(&pattern.intensity_axis, voxel.intensity);
            }
            if rng.gen_bool(self.bit_error_rate.min(1.0)) {
                voxel.polarization =
                    flip_nearest_level(&pattern.polarization_axis, voxel.polarization);
            }
        }

        let mut perturbed = pattern.clone();
        perturbed.voxels = voxels;
        perturbed
    }
}

/// Models a single-level detector error: re-quantises `value`, moves to an
/// adjacent level (wrapping at the axis boundary), and reports the physical
/// value for that level.
fn flip_nearest_level(axis: &crate::quantiser::QuantisationAxis, value: f64) -> f64 {
    if axis.levels <= 1 {
        return value;
    }
    let level = axis.physical_to_level(value);
    let flipped = if level == 0 { 1 } else { level - 1 };
    axis.level_to_physical(flipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantiser::QuantisationAxis;
    use crate::writer::write_named;

    #[test]
    fn zero_rate_is_a_no_op() {
        let intensity = QuantisationAxis::new(16, 0.0, 1.0).unwrap();
        let polarization = QuantisationAxis::new(8, 0.0, 1.0).unwrap();
        let pattern = write_named(b"steady channel", (64, 64, 8), (1.0, 1.0, 1.0), intensity, polarization, "hamming74")
            .unwrap();
        let channel = BitErrorChannel::new(0.0);
        let perturbed = channel.apply(&pattern, Some(1));
        assert_eq!(perturbed, pattern);
    }

    #[test]
    fn preserves_shape_and_coordinates() {
        let intensity = QuantisationAxis::new(16, 0.0, 1.0).unwrap();
        let polarization = QuantisationAxis::new(8, 0.0, 1.0).unwrap();
        let pattern = write_named(b"noisy channel", (64, 64, 8), (1.0, 1.0, 1.0), intensity, polarization, "hamming74")
            .unwrap();
        let channel = BitErrorChannel::new(1.0);
        let perturbed = channel.apply(&pattern, Some(42));
        assert_eq!(perturbed.voxels.len(), pattern.voxels.len());
        for (before, after) in pattern.voxels.iter().zip(perturbed.voxels.iter()) {
            assert_eq!((before.x, before.y, before.z), (after.x, after.y, after.z));
        }
        assert_eq!(perturbed.grid_size, pattern.grid_size);
        assert_eq!(perturbed.ecc_name, pattern.ecc_name);
    }

    #[test]
    fn is_deterministic_given_a_seed() {
        let intensity = QuantisationAxis::new(16, 0.0, 1.0).unwrap();
        let polarization = QuantisationAxis::new(8, 0.0, 1.0).unwrap();
        let pattern = write_named(b"seeded channel", (64, 64, 8), (1.0, 1.0, 1.0), intensity, polarization, "hamming74")
            .unwrap();
        let channel = BitErrorChannel::new(0.3);
        let a = channel.apply(&pattern, Some(7));
        let b = channel.apply(&pattern, Some(7));
        assert_eq!(a, b);
    }
}
