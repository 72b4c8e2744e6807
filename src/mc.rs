// src/mc.rs

use crate::energy::site_energy;
use crate::lattice::DipoleLattice;
use crate::params::ModelParams;
use crate::rng::RandomSource;
use crate::sampler::{random_axis_point, random_sphere_point};

/// Monotone accept/reject counters over the whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub accept: u64,
    pub reject: u64,
}

impl Counters {
    pub fn total(&self) -> u64 {
        self.accept + self.reject
    }

    /// accept / (accept + reject); NaN before any move is counted.
    pub fn ratio(&self) -> f64 {
        self.accept as f64 / self.total() as f64
    }
}

/// One Metropolis move: pick a random site, propose a fresh orientation,
/// accept or reject on the energy delta.
///
/// A vacant site is a silent no-op: the move returns without consuming
/// further draws and without touching either counter. This exact bookkeeping
/// (vacancy moves are neither accepted nor rejected) is part of the model's
/// documented behaviour.
pub fn mc_move<R: RandomSource>(
    lattice: &mut DipoleLattice,
    params: &ModelParams,
    rng: &mut R,
    counters: &mut Counters,
) {
    let x = rng.rand_int(lattice.grid.nx);
    let y = rng.rand_int(lattice.grid.ny);
    let z = rng.rand_int(lattice.grid.nz);

    let old = lattice.get(x, y, z);
    if old.is_vacant() {
        return;
    }

    let new = if params.constrain_to_axes {
        random_axis_point(rng)
    } else {
        random_sphere_point(rng, params.dim)
    };

    let de = site_energy(lattice, params, x, y, z, &new, &old);

    // Downhill moves skip the acceptance draw entirely (short-circuit), so
    // the stream consumption order is reproducible.
    if de < 0.0 || (-de * params.beta).exp() > rng.uniform01() {
        // Orientation only; the length tag stays with the site.
        let i = lattice.idx(x, y, z);
        lattice.data[i].x = new.x;
        lattice.data[i].y = new.y;
        lattice.data[i].z = new.z;
        counters.accept += 1;
    } else {
        counters.reject += 1;
    }
}
