// src/terminal.rs
//
// ANSI lattice dashboard: one arrow glyph per z=0 site, coloured by the
// in-plane angle, with an optional greyscale potential panel alongside.
// Purely a progress display; writes to stderr and never touches the lattice.

use crate::lattice::{Dipole, DipoleLattice};

const ARROWS: [char; 8] = ['-', '\\', '|', '/', '-', '\\', '|', '/'];
const DENSITY: [char; 9] = ['0', '1', '2', '3', '4', '5', '6', '8', '9'];

/// Octant of the in-plane angle in [0, 8), rotated half a sector so glyphs
/// and colours are centred around the cardinal directions.
fn angle_octant(d: &Dipole) -> usize {
    let mut a = (d.y as f64).atan2(d.x as f64) / std::f64::consts::PI; // [-1, 1]
    a += 1.0 + 0.125;
    if a > 2.0 {
        a -= 2.0;
    }
    ((a * 4.0) as usize).min(7)
}

/// Glyph for one site: an angle arrow, `o`/`x` for strongly up/down
/// (towards/away from the viewer), `*` for a vacancy.
fn arrow_glyph(d: &Dipole) -> char {
    if d.is_vacant() {
        return '*';
    }
    let half_sqrt2 = std::f64::consts::SQRT_2 / 2.0;
    if (d.z as f64) > half_sqrt2 {
        'o'
    } else if (d.z as f64) < -half_sqrt2 {
        'x'
    } else {
        ARROWS[angle_octant(d)]
    }
}

/// Dashboard with a self-calibrating potential grey scale: each frame is
/// drawn against the previous frame's maximum.
pub struct Dashboard {
    dmax: f64,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self { dmax: 55.0 }
    }

    /// Render the z=0 slice; `potential` is the slice map from
    /// `observables::potential_xy_map`, laid out `x * ny + y`.
    pub fn render(&mut self, lattice: &DipoleLattice, potential: Option<&[f64]>) {
        let (nx, ny) = (lattice.grid.nx, lattice.grid.ny);
        if potential.is_some() {
            eprintln!("{:>width$}{:>pwidth$}", "DIPOLES", "POTENTIAL", width = nx + 3, pwidth = (2 * nx) + 4);
        }

        let mut new_dmax = 0.0f64;
        let mut mean = 0.0f64;
        let mut variance = 0.0f64;

        for y in 0..ny {
            for x in 0..nx {
                let d = lattice.get(x, y, 0);
                let oct = angle_octant(&d);
                let bold = if oct < 4 { ";7" } else { "" };
                eprint!("\x1b[{}{}m{} \x1b[0m", 31 + oct % 8, bold, arrow_glyph(&d));
            }

            if let Some(pot) = potential {
                eprint!("    ");
                for x in 0..nx {
                    let p = pot[x * ny + y];
                    new_dmax = new_dmax.max(p.abs());
                    mean += p;
                    variance += p * p;

                    let shade = (232 + 12 + (12.0 * p / self.dmax) as i32).clamp(232, 255);
                    let dens = ((8.0 * p.abs() / self.dmax) as usize).min(8);
                    let d = lattice.get(x, y, 0);
                    eprint!("\x1b[48;5;{}m{}{}\x1b[0m", shade, DENSITY[dens], arrow_glyph(&d));
                }
            }
            eprintln!();
        }

        if let Some(pot) = potential {
            let n = pot.len().max(1) as f64;
            eprintln!(
                "potential scale: {:.3} (prev {:.3})  mean: {:.3} variance: {:.3}",
                new_dmax,
                self.dmax,
                mean / n,
                variance / n,
            );
            // follow the observed maximum for the next frame
            if new_dmax > 0.0 {
                self.dmax = new_dmax;
            }
        }
    }
}
