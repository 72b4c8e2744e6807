// src/initial_states.rs
//
// Initial dipole configuration (seed) generators.
//
// Conventions:
// - every generator writes all nx*ny*nz sites exactly once;
// - vacancies are the zero vector, matching the energy model which treats
//   zero-component sites as absent;
// - the deterministic patterns (wall, slip, spectrum, buckled) exist to seed
//   domain-boundary studies and to validate the output routines, and only
//   `random` consumes the random stream.

use std::f64::consts::PI;

use crate::lattice::{Dipole, DipoleLattice};
use crate::params::{InitKind, ModelParams};
use crate::rng::RandomSource;
use crate::sampler::random_sphere_point;

/// Build the configured starting lattice.
pub fn initialise<R: RandomSource>(
    lattice: &mut DipoleLattice,
    params: &ModelParams,
    kind: InitKind,
    rng: &mut R,
) {
    match kind {
        InitKind::Random => init_random(lattice, params.dipole_fraction, params.dim, rng),
        InitKind::Wall => init_wall(lattice),
        InitKind::Slip => init_slip(lattice),
        InitKind::Spectrum => init_spectrum(lattice),
        InitKind::Buckled => init_buckled(lattice),
    }
}

/// Occupy each site independently with probability `fraction`; occupied
/// sites get a fresh random orientation, the rest are vacancies.
pub fn init_random<R: RandomSource>(
    lattice: &mut DipoleLattice,
    fraction: f64,
    dim: u32,
    rng: &mut R,
) {
    let (nx, ny, nz) = (lattice.grid.nx, lattice.grid.ny, lattice.grid.nz);
    for x in 0..nx {
        for y in 0..ny {
            for z in 0..nz {
                let d = if rng.uniform01() < fraction {
                    random_sphere_point(rng, dim)
                } else {
                    Dipole::vacant()
                };
                lattice.set(x, y, z, d);
            }
        }
    }
}

/// Two alternating +-1 domains separated by a planar wall, partitioned by
/// the checkerboard test (y < Y/2) XOR (x > X/2). In-plane only.
pub fn init_wall(lattice: &mut DipoleLattice) {
    let (nx, ny, nz) = (lattice.grid.nx, lattice.grid.ny, lattice.grid.nz);
    for x in 0..nx {
        for y in 0..ny {
            for z in 0..nz {
                let d = if (y < ny / 2) ^ (x > nx / 2) {
                    Dipole::new(2.0 * ((z + y) % 2) as f32 - 1.0, 0.0, 0.0)
                } else {
                    Dipole::new(0.0, 2.0 * ((x + z) % 2) as f32 - 1.0, 0.0)
                };
                lattice.set(x, y, z, d);
            }
        }
    }
}

/// Alternating pattern with a phase shift at the x midpoint: a single
/// planar defect.
pub fn init_slip(lattice: &mut DipoleLattice) {
    let (nx, ny, nz) = (lattice.grid.nx, lattice.grid.ny, lattice.grid.nz);
    for x in 0..nx {
        for y in 0..ny {
            for z in 0..nz {
                let phase = if x < nx / 2 { 0 } else { 1 };
                let d = Dipole::new(2.0 * ((z + y + phase) % 2) as f32 - 1.0, 0.0, 0.0);
                lattice.set(x, y, z, d);
            }
        }
    }
}

/// Orientation angle as a continuous function of position; renders as a
/// colour spectrum. Not physically meaningful.
pub fn init_spectrum(lattice: &mut DipoleLattice) {
    let (nx, ny, nz) = (lattice.grid.nx, lattice.grid.ny, lattice.grid.nz);
    for x in 0..nx {
        for y in 0..ny {
            for z in 0..nz {
                let angle = 2.0 * PI * (x * nx + y) as f64 / (nx * ny) as f64;
                lattice.set(
                    x,
                    y,
                    z,
                    Dipole::new(angle.sin() as f32, angle.cos() as f32, 0.0),
                );
            }
        }
    }
}

/// Each component set to its coordinate parity. Synthetic, non-physical;
/// note the origin (all parities zero) comes out vacant.
pub fn init_buckled(lattice: &mut DipoleLattice) {
    let (nx, ny, nz) = (lattice.grid.nx, lattice.grid.ny, lattice.grid.nz);
    for x in 0..nx {
        for y in 0..ny {
            for z in 0..nz {
                lattice.set(
                    x,
                    y,
                    z,
                    Dipole::new((x % 2) as f32, (y % 2) as f32, (z % 2) as f32),
                );
            }
        }
    }
}

/// Vacate every site in the slab x < width: carves a boundary layer after
/// any of the generators above.
pub fn slab_delete(lattice: &mut DipoleLattice, width: usize) {
    let (nx, ny, nz) = (lattice.grid.nx, lattice.grid.ny, lattice.grid.nz);
    for x in 0..width.min(nx) {
        for y in 0..ny {
            for z in 0..nz {
                lattice.set(x, y, z, Dipole::vacant());
            }
        }
    }
}
