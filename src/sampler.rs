// src/sampler.rs
//
// Random unit-orientation draws for proposed Monte Carlo moves and the
// random-fill initializer.

use crate::lattice::Dipole;
use crate::rng::RandomSource;

// The rejection step accepts with probability pi/4, so this bound is
// unreachable for any uniform source.
const MAX_REJECTS: u32 = 1_000_000;

/// Uniform random point on the unit sphere (Marsaglia 1972), or on the unit
/// circle in the XY plane when `dim < 3` (Cook 1957 mapping of the same
/// rejection sample).
pub fn random_sphere_point<R: RandomSource>(rng: &mut R, dim: u32) -> Dipole {
    for _ in 0..MAX_REJECTS {
        let x1 = 2.0 * rng.uniform01() - 1.0;
        let x2 = 2.0 * rng.uniform01() - 1.0;
        let s = x1 * x1 + x2 * x2;
        if s > 1.0 {
            continue;
        }
        if dim < 3 {
            if s == 0.0 {
                // degenerate draw cannot be mapped to the circle
                continue;
            }
            return Dipole::new(
                ((x1 * x1 - x2 * x2) / s) as f32,
                (2.0 * x1 * x2 / s) as f32,
                0.0,
            );
        }
        let f = (1.0 - s).sqrt();
        return Dipole::new(
            (2.0 * x1 * f) as f32,
            (2.0 * x2 * f) as f32,
            (1.0 - 2.0 * s) as f32,
        );
    }
    panic!("orientation sampler exhausted {MAX_REJECTS} rejection retries");
}

/// One of the six signed unit-axis orientations, uniformly.
pub fn random_axis_point<R: RandomSource>(rng: &mut R) -> Dipole {
    match rng.rand_int(6) {
        0 => Dipole::new(1.0, 0.0, 0.0),
        1 => Dipole::new(-1.0, 0.0, 0.0),
        2 => Dipole::new(0.0, 1.0, 0.0),
        3 => Dipole::new(0.0, -1.0, 0.0),
        4 => Dipole::new(0.0, 0.0, 1.0),
        _ => Dipole::new(0.0, 0.0, -1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;
    use crate::rng::testing::ScriptedSource;
    use crate::vec3::norm;

    #[test]
    fn sphere_points_have_unit_norm() {
        let mut rng = seeded(7);
        for _ in 0..1000 {
            let d = random_sphere_point(&mut rng, 3);
            assert!((norm(d.components()) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn planar_points_have_unit_norm_and_zero_z() {
        let mut rng = seeded(8);
        for _ in 0..1000 {
            let d = random_sphere_point(&mut rng, 2);
            assert_eq!(d.z, 0.0);
            assert!((norm(d.components()) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn rejected_pairs_are_redrawn_together() {
        // First pair lands outside the unit disc (x1 = x2 = 0.9), the
        // second pair (0, 0.5 -> x1 = -1, x2 = 0) is accepted.
        let mut rng = ScriptedSource::new(vec![0.95, 0.95, 0.0, 0.5], vec![]);
        let d = random_sphere_point(&mut rng, 3);
        // x1 = -1, x2 = 0: s = 1, so the sphere mapping gives (0, 0, -1).
        assert!((d.z + 1.0).abs() < 1e-6);
        assert!(d.x.abs() < 1e-6 && d.y.abs() < 1e-6);
    }

    #[test]
    fn axis_sampler_covers_exactly_the_six_signed_axes() {
        let mut rng = ScriptedSource::new(vec![], (0..6).collect());
        let mut seen = Vec::new();
        for _ in 0..6 {
            let d = random_axis_point(&mut rng);
            assert!((norm(d.components()) - 1.0).abs() < 1e-12);
            seen.push((d.x as i32, d.y as i32, d.z as i32));
        }
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 6);
    }
}
