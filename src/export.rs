// src/export.rs
//
// Flat-text exporters over a lattice snapshot. All of these are best-effort
// side effects: callers report failures and carry on with the run.

use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::lattice::DipoleLattice;
use crate::observables::dipole_potential;
use crate::visualisation::orientation_rgb;

/// Z-axis scale factor in the XYZ / PyMOL outputs, to pull slabs apart.
const ZSCALE: f64 = 5.0;

fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    Ok(())
}

fn create(path: &Path) -> std::io::Result<BufWriter<File>> {
    ensure_parent_dir(path)?;
    Ok(BufWriter::new(File::create(path)?))
}

/// XYZ molecular coordinates: two pseudo-atoms (C, N) per site, offset
/// +-r along the dipole axis so viewers draw the orientation as a bond.
pub fn write_xyz(path: &Path, lattice: &DipoleLattice) -> std::io::Result<()> {
    let mut w = create(path)?;
    // half-length of the pseudo-molecule and lattice spacing; the spacing is
    // kept artificially small so the molecules read large in a viewer
    let r = 0.8;
    let d = 4.0;

    let grid = lattice.grid;
    writeln!(w, "{}\n", grid.n_sites() * 2)?;
    for x in 0..grid.nx {
        for y in 0..grid.ny {
            for z in 0..grid.nz {
                let dip = lattice.get(x, y, z).components();
                writeln!(
                    w,
                    "C {:.6} {:.6} {:.6}",
                    d * x as f64 + r * dip[0],
                    d * y as f64 + r * dip[1],
                    ZSCALE * (d * z as f64) + r * dip[2],
                )?;
                writeln!(
                    w,
                    "N {:.6} {:.6} {:.6}",
                    d * x as f64 - r * dip[0],
                    d * y as f64 - r * dip[1],
                    ZSCALE * (d * z as f64) - r * dip[2],
                )?;
            }
        }
    }
    w.flush()
}

/// Overprint variant: every site's dipole drawn from a common origin, to
/// show the orientation distribution as a star plot.
pub fn write_xyz_overprint(path: &Path, lattice: &DipoleLattice) -> std::io::Result<()> {
    let mut w = create(path)?;
    let r = 6.0;

    writeln!(w, "{}\n\nC 0.000000 0.000000 0.000000", 1 + lattice.grid.n_sites())?;
    for dip in &lattice.data {
        let c = dip.components();
        writeln!(w, "N {:.6} {:.6} {:.6}", r * c[0], r * c[1], r * c[2])?;
    }
    w.flush()
}

/// PyMOL CGO scene: one coloured sphere per site, orientation on the HSV
/// wheel (vacancies black), geometry matching `write_xyz`.
pub fn write_pymol_cgo(path: &Path, lattice: &DipoleLattice) -> std::io::Result<()> {
    let mut w = create(path)?;
    let d = 4.0;
    let a = 1.4; // sphere radius within the site spacing

    writeln!(w, "from pymol.cgo import *")?;
    writeln!(w, "from pymol import cmd")?;
    write!(w, "obj = [ ALPHA, 0.7")?;

    let grid = lattice.grid;
    for x in 0..grid.nx {
        for y in 0..grid.ny {
            for z in 0..grid.nz {
                let (r, g, b) = orientation_rgb(&lattice.get(x, y, z));
                writeln!(w, ",COLOR, {r:.6}, {g:.6}, {b:.6},")?;
                writeln!(
                    w,
                    "SPHERE, {:.6}, {:.6}, {:.6}, {:.6}",
                    x as f64 * d,
                    y as f64 * d,
                    ZSCALE * z as f64 * d,
                    a * d / 2.0,
                )?;
            }
        }
    }
    writeln!(w, "]")?;
    writeln!(w, "cmd.load_cgo(obj,'dipoles')")?;
    w.flush()
}

/// In-plane orientation angle of every z=0 site, one per line.
pub fn write_angle_log(path: &Path, lattice: &DipoleLattice) -> std::io::Result<()> {
    let mut w = create(path)?;
    for x in 0..lattice.grid.nx {
        for y in 0..lattice.grid.ny {
            let d = lattice.get(x, y, 0);
            writeln!(w, "{:.6}", (d.y as f64).atan2(d.x as f64))?;
        }
    }
    w.flush()
}

/// Dipole potential across the z=0 slice: `x y pot` per line.
pub fn write_potential_xy(
    path: &Path,
    lattice: &DipoleLattice,
    cutoff: i32,
) -> std::io::Result<()> {
    let mut w = create(path)?;
    for x in 0..lattice.grid.nx {
        for y in 0..lattice.grid.ny {
            writeln!(w, "{} {} {:.6}", x, y, dipole_potential(lattice, x, y, 0, cutoff))?;
        }
    }
    w.flush()
}

/// Dipole potential over the full volume: `x y z pot` per line.
pub fn write_potential_xyz(
    path: &Path,
    lattice: &DipoleLattice,
    cutoff: i32,
) -> std::io::Result<()> {
    let mut w = create(path)?;
    let grid = lattice.grid;
    for x in 0..grid.nx {
        for y in 0..grid.ny {
            for z in 0..grid.nz {
                writeln!(
                    w,
                    "{} {} {} {:.6}",
                    x,
                    y,
                    z,
                    dipole_potential(lattice, x, y, z, cutoff)
                )?;
            }
        }
    }
    w.flush()
}
