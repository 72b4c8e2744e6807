// src/observables.rs
//
// Aggregate read-only quantities over a lattice snapshot. Nothing here
// mutates the lattice or feeds back into the energy model; the potential is
// for visualisation and export only.

use rayon::prelude::*;

use crate::lattice::DipoleLattice;
use crate::vec3::{dot, normalize};

/// Bulk polarisation: sum of dipole projections onto `dir` over all sites.
/// The integral of the polarisation equals the total dipole moment of the
/// dielectric, so this is the scalar order parameter of the run.
pub fn polarisation(lattice: &DipoleLattice, dir: [f64; 3]) -> f64 {
    lattice
        .data
        .iter()
        .map(|d| dot(d.components(), dir))
        .sum()
}

/// Unit direction to measure polarisation along: the external field
/// direction, or x for a zero field.
pub fn field_direction(efield: [f64; 3]) -> [f64; 3] {
    normalize(efield)
}

/// Classical dipole potential sum(p.r / d^3) at one site, over the
/// neighbourhood [-cutoff, cutoff) per axis with periodic wraparound.
/// The self term is skipped structurally; the spherical cutoff applies on
/// top of the half-open cube.
pub fn dipole_potential(lattice: &DipoleLattice, x: usize, y: usize, z: usize, cutoff: i32) -> f64 {
    let c = cutoff as isize;
    let mut pot = 0.0f64;

    for dx in -c..c {
        for dy in -c..c {
            for dz in -c..c {
                if dx == 0 && dy == 0 && dz == 0 {
                    continue;
                }
                let r = [dx as f64, dy as f64, dz as f64];
                let d = dot(r, r).sqrt();
                if d > cutoff as f64 {
                    continue;
                }
                let nb = lattice
                    .at(x as isize + dx, y as isize + dy, z as isize + dz)
                    .components();
                pot += dot(nb, r) / (d * d * d);
            }
        }
    }
    pot
}

/// Potential sampled over one full XY slice, row-parallel. Returned in the
/// lattice's x-major order: element `x * ny + y`.
pub fn potential_xy_map(lattice: &DipoleLattice, z: usize, cutoff: i32) -> Vec<f64> {
    let ny = lattice.grid.ny;
    (0..lattice.grid.nx * ny)
        .into_par_iter()
        .map(|i| dipole_potential(lattice, i / ny, i % ny, z, cutoff))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid3D;
    use crate::lattice::Dipole;
    use crate::rng::seeded;
    use crate::rng::RandomSource;
    use crate::sampler::random_sphere_point;

    #[test]
    fn polarisation_is_bounded_by_the_occupied_count() {
        let mut rng = seeded(17);
        let mut lat = DipoleLattice::new(Grid3D::new(5, 5, 5));
        for d in lat.data.iter_mut() {
            if rng.uniform01() < 0.7 {
                *d = random_sphere_point(&mut rng, 3);
            }
        }
        let p = polarisation(&lat, [1.0, 0.0, 0.0]);
        assert!(p.abs() <= lat.occupied_sites() as f64 + 1e-9);
    }

    #[test]
    fn aligned_lattice_saturates_polarisation() {
        let mut lat = DipoleLattice::new(Grid3D::new(3, 3, 3));
        for d in lat.data.iter_mut() {
            *d = Dipole::new(1.0, 0.0, 0.0);
        }
        assert!((polarisation(&lat, [1.0, 0.0, 0.0]) - 27.0).abs() < 1e-9);
    }

    #[test]
    fn field_direction_falls_back_to_x_for_zero_field() {
        assert_eq!(field_direction([0.0; 3]), [1.0, 0.0, 0.0]);
        let d = field_direction([0.0, 2.0, 0.0]);
        assert!((d[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn potential_of_an_empty_lattice_is_zero() {
        let lat = DipoleLattice::new(Grid3D::new(6, 6, 6));
        assert_eq!(dipole_potential(&lat, 2, 3, 1, 3), 0.0);
    }

    #[test]
    fn potential_flips_sign_across_a_single_dipole() {
        // One +x dipole; the potential one step up-axis is positive and one
        // step down-axis equal and opposite (p.r kernel is odd).
        let mut lat = DipoleLattice::new(Grid3D::new(21, 21, 21));
        lat.set(10, 10, 10, Dipole::new(1.0, 0.0, 0.0));
        let up = dipole_potential(&lat, 9, 10, 10, 2);
        let down = dipole_potential(&lat, 11, 10, 10, 2);
        assert!(up > 0.0);
        assert!((up + down).abs() < 1e-12);
    }

    #[test]
    fn xy_map_matches_per_site_evaluation() {
        let mut rng = seeded(18);
        let mut lat = DipoleLattice::new(Grid3D::new(6, 5, 4));
        for d in lat.data.iter_mut() {
            *d = random_sphere_point(&mut rng, 3);
        }
        let map = potential_xy_map(&lat, 0, 3);
        assert_eq!(map.len(), 30);
        for x in 0..6 {
            for y in 0..5 {
                assert_eq!(map[x * 5 + y], dipole_potential(&lat, x, y, 0, 3));
            }
        }
    }
}
