// src/simulation.rs
//
// The outer Monte Carlo loop. One mega-step is `minor_steps` individual
// Metropolis moves, where minor_steps = nx*ny*nz*multiplier: by convention
// roughly one full lattice sweep, scaled by the configured multiplier.

use indicatif::{ProgressBar, ProgressStyle};

use crate::grid::Grid3D;
use crate::lattice::DipoleLattice;
use crate::mc::{mc_move, Counters};
use crate::params::ModelParams;
use crate::rng::RandomSource;

/// Loop structure of a run.
#[derive(Debug, Clone, Copy)]
pub struct RunSettings {
    /// Equilibration mega-steps, run before measurement without observers.
    pub eqm_steps: usize,
    /// Measured mega-steps.
    pub mega_steps: usize,
    /// Minor (single-move) steps per mega-step.
    pub minor_steps: usize,
    /// Draw a progress bar on stderr.
    pub progress: bool,
}

/// Minor-step count for one mega-step: a whole-lattice sweep scaled by the
/// configured multiplier.
pub fn minor_steps(grid: &Grid3D, multiplier: f64) -> usize {
    (grid.n_sites() as f64 * multiplier) as usize
}

/// Drive the chain: equilibration mega-steps, then measured mega-steps.
///
/// `on_mega_step(i, lattice, counters)` runs after each measured mega-step
/// with a read-only snapshot; the physical state only changes inside
/// `mc_move`. Beta is fixed in `params` for the whole loop (no annealing).
pub fn run<R, F>(
    lattice: &mut DipoleLattice,
    params: &ModelParams,
    settings: &RunSettings,
    rng: &mut R,
    mut on_mega_step: F,
) -> Counters
where
    R: RandomSource,
    F: FnMut(usize, &DipoleLattice, &Counters),
{
    let mut counters = Counters::default();

    let total = (settings.eqm_steps + settings.mega_steps) as u64;
    let pb = if settings.progress {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len} [{elapsed_precise}]")
                .unwrap()
                .progress_chars("=> "),
        );
        pb.set_message("mega-steps");
        Some(pb)
    } else {
        None
    };

    for _ in 0..settings.eqm_steps {
        for _ in 0..settings.minor_steps {
            mc_move(lattice, params, rng, &mut counters);
        }
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }

    for i in 0..settings.mega_steps {
        for _ in 0..settings.minor_steps {
            mc_move(lattice, params, rng, &mut counters);
        }
        on_mega_step(i, lattice, &counters);
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }

    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }

    counters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::Dipole;
    use crate::rng::seeded;

    fn settings(eqm: usize, mega: usize, minor: usize) -> RunSettings {
        RunSettings {
            eqm_steps: eqm,
            mega_steps: mega,
            minor_steps: minor,
            progress: false,
        }
    }

    #[test]
    fn minor_steps_scale_with_the_lattice_volume() {
        let g = Grid3D::new(10, 10, 5);
        assert_eq!(minor_steps(&g, 1.0), 500);
        assert_eq!(minor_steps(&g, 2.5), 1250);
        assert_eq!(minor_steps(&g, 0.0), 0);
    }

    #[test]
    fn observer_fires_once_per_measured_mega_step() {
        let mut lat = DipoleLattice::new(Grid3D::new(3, 3, 3));
        for d in lat.data.iter_mut() {
            *d = Dipole::new(0.0, 0.0, 1.0);
        }
        let params = ModelParams::default();
        let mut rng = seeded(1);
        let mut seen = Vec::new();
        run(&mut lat, &params, &settings(2, 5, 10), &mut rng, |i, _, _| {
            seen.push(i)
        });
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn attempted_moves_match_the_loop_counts_on_a_full_lattice() {
        let mut lat = DipoleLattice::new(Grid3D::new(4, 4, 4));
        for d in lat.data.iter_mut() {
            *d = Dipole::new(1.0, 0.0, 0.0);
        }
        let params = ModelParams::default();
        let mut rng = seeded(2);
        let counters = run(&mut lat, &params, &settings(1, 3, 64), &mut rng, |_, _, _| {});
        // every site occupied, so every move lands on a counter
        assert_eq!(counters.total(), 4 * 64);
    }

    #[test]
    fn vacancy_only_lattice_never_counts_a_move() {
        let mut lat = DipoleLattice::new(Grid3D::new(4, 4, 4));
        let params = ModelParams::default();
        let mut rng = seeded(3);
        let counters = run(&mut lat, &params, &settings(2, 4, 100), &mut rng, |_, _, _| {});
        assert_eq!(counters, Counters::default());
    }

    #[test]
    fn zero_coupling_run_accepts_everything() {
        let mut lat = DipoleLattice::new(Grid3D::new(4, 4, 4));
        for d in lat.data.iter_mut() {
            *d = Dipole::new(0.0, 1.0, 0.0);
        }
        let params = ModelParams {
            k: 0.0,
            cage_strain: 0.0,
            dipole: 0.0,
            efield: [0.0; 3],
            ..ModelParams::default()
        };
        let mut rng = seeded(4);
        let counters = run(&mut lat, &params, &settings(0, 4, 64), &mut rng, |_, _, _| {});
        assert_eq!(counters.ratio(), 1.0);
    }
}
