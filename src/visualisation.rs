// src/visualisation.rs

use plotters::prelude::*;
use std::f64::consts::PI;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::lattice::{Dipole, DipoleLattice};
use crate::observables::potential_xy_map;

/// Orientation colour on the HSV wheel, as (r, g, b) in [0, 1].
///
/// Hue follows the in-plane angle; the value lightens and the saturation
/// drops towards the +-z poles, so out-of-plane dipoles wash out to
/// light/dark grey. Vacancies are black.
pub fn orientation_rgb(d: &Dipole) -> (f64, f64, f64) {
    if d.is_vacant() {
        return (0.0, 0.0, 0.0);
    }

    let h = PI + (d.y as f64).atan2(d.x as f64); // [0, 2*pi]
    let v = 0.5 + 0.4 * d.z as f64;
    let s = 0.6 - 0.6 * (d.z as f64).abs();

    let sector = h / (PI / 3.0);
    let hp = sector.floor();
    let f = sector - hp;

    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    match hp as i32 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

fn to_color(rgb: (f64, f64, f64)) -> RGBColor {
    RGBColor(
        (255.0 * rgb.0) as u8,
        (255.0 * rgb.1) as u8,
        (255.0 * rgb.2) as u8,
    )
}

/// Save one z-slice of the lattice as a PNG: one coloured cell per site,
/// hue encoding the in-plane orientation, vacancies black.
pub fn save_orientation_png(
    lattice: &DipoleLattice,
    z: usize,
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let nx = lattice.grid.nx as i32;
    let ny = lattice.grid.ny as i32;

    let root = BitMapBackend::new(filename, (800, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(40)
        .caption("dipole orientation (hue = in-plane angle)", ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(0..nx, 0..ny)?;

    chart
        .configure_mesh()
        .x_desc("x (site)")
        .y_desc("y (site)")
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    chart.draw_series((0..nx).flat_map(|i| {
        (0..ny).map(move |j| {
            let d = lattice.get(i as usize, j as usize, z);
            let color = to_color(orientation_rgb(&d));
            Rectangle::new([(i, j), (i + 1, j + 1)], color.filled())
        })
    }))?;

    root.present()?;
    Ok(())
}

/// Save the z-slice dipole potential as a greyscale PNG, scaled to the
/// *local* min/max so small variations are still visible.
pub fn save_potential_png(
    lattice: &DipoleLattice,
    z: usize,
    cutoff: i32,
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let nx = lattice.grid.nx as i32;
    let ny = lattice.grid.ny as i32;
    let map = potential_xy_map(lattice, z, cutoff);

    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &p in &map {
        if p.is_finite() {
            lo = lo.min(p);
            hi = hi.max(p);
        }
    }
    // Protect against a flat map (e.g. a vacant lattice)
    if !lo.is_finite() || !hi.is_finite() || (hi - lo).abs() < 1e-12 {
        lo = -1.0;
        hi = 1.0;
    }

    let root = BitMapBackend::new(filename, (800, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(40)
        .caption("dipole potential (local scale)", ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(0..nx, 0..ny)?;

    chart
        .configure_mesh()
        .x_desc("x (site)")
        .y_desc("y (site)")
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    let ny_us = ny as usize;
    chart.draw_series((0..nx).flat_map(|i| {
        let map = &map;
        (0..ny).map(move |j| {
            let p = map[i as usize * ny_us + j as usize];
            let grey = (255.0 * ((p - lo) / (hi - lo)).clamp(0.0, 1.0)) as u8;
            Rectangle::new(
                [(i, j), (i + 1, j + 1)],
                RGBColor(grey, grey, grey).filled(),
            )
        })
    }))?;

    root.present()?;
    Ok(())
}

/// Write a z-slice vector-field diagram as SVG: one line segment per site
/// through the cell centre, greyscale stroke encoding the z component, with
/// an arrowhead marker. Geometry is transposed to overlay the PNG raster.
pub fn write_svg<W: Write>(w: &mut W, lattice: &DipoleLattice, z: usize) -> std::io::Result<()> {
    let (nx, ny) = (lattice.grid.nx, lattice.grid.ny);

    writeln!(
        w,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" height=\"{nx}\" width=\"{ny}\">"
    )?;
    writeln!(
        w,
        " <marker id=\"triangle\" viewBox=\"0 0 10 10\" refX=\"7\" refY=\"5\" \
         markerUnits=\"strokeWidth\" markerWidth=\"2\" markerHeight=\"2\" orient=\"auto\">\
         <path d=\"M 0 0 L 10 5 L 0 10 z\" /></marker>"
    )?;

    for x in 0..nx {
        for y in 0..ny {
            let d = lattice.get(x, y, z);
            // z in [-1, 1] inverted onto a grey stroke, so up/down alternate
            // against the background
            let grey = ((-d.z as f64 + 1.0) * 127.0) as i32;
            writeln!(
                w,
                " <line x1=\"{:.3}\" y1=\"{:.3}\" x2=\"{:.3}\" y2=\"{:.3}\" \
                 style=\"stroke:rgb({grey},{grey},{grey});stroke-width:0.17\" \
                 marker-end=\"url(#triangle)\" />",
                y as f64 + 0.5 + 0.4 * d.y as f64,
                x as f64 + 0.5 + 0.4 * d.x as f64,
                y as f64 + 0.5 - 0.4 * d.y as f64,
                x as f64 + 0.5 - 0.4 * d.x as f64,
            )?;
        }
    }

    writeln!(w, "</svg>")
}

/// `write_svg` to a file path.
pub fn save_svg(path: &Path, lattice: &DipoleLattice, z: usize) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    let mut w = BufWriter::new(File::create(path)?);
    write_svg(&mut w, lattice, z)?;
    w.flush()
}
