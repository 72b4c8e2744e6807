// src/main.rs
//
// CLI driver for dipole lattice Monte Carlo runs.
//
// Configuration comes from a JSON file (first positional argument); a few
// fields can be overridden on the command line for parameter sweeps without
// editing the file.
//
// Examples:
//
//   cargo run --release -- run.json
//       -> run as configured.
//
//   cargo run --release -- run.json t=150 dipole=0.5
//       -> override temperature and dipole-dipole strength, e.g. from a
//          sweep script that parallelises over parameter points externally.
//
//   cargo run --release -- run.json init=wall steps=100 out=walls
//       -> domain-wall starting lattice, 100 mega-steps, outputs under walls/.
//
// Outputs (per run directory):
//   <out>/<run_id>/
//     ├── config.json            effective configuration
//     ├── initial.png / .svg     starting lattice
//     ├── final.png / .svg       equilibrated lattice
//     ├── dipoles.xyz            two pseudo-atoms per site
//     ├── overprint.xyz          orientation star plot
//     ├── dipoles.py             PyMOL CGO scene
//     ├── angles.log             in-plane angle dump
//     ├── polarisation.csv       order parameter per mega-step
//     ├── potential*.{png,dat}   if calculate_potential is set
//     └── frames/step_*.png      if snapshot_every is set

use std::env;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

use dipole_sim::config::SimConfig;
use dipole_sim::export::{
    write_angle_log, write_potential_xy, write_potential_xyz, write_pymol_cgo, write_xyz,
    write_xyz_overprint,
};
use dipole_sim::initial_states::{initialise, slab_delete};
use dipole_sim::lattice::DipoleLattice;
use dipole_sim::observables::{field_direction, polarisation, potential_xy_map};
use dipole_sim::rng;
use dipole_sim::simulation::{minor_steps, run, RunSettings};
use dipole_sim::terminal::Dashboard;
use dipole_sim::visualisation::{save_orientation_png, save_potential_png, save_svg};

fn print_usage() {
    eprintln!(
        r#"Usage:
  dipole-sim [CONFIG.json]
             [t=TEMP] [dipole=STRENGTH] [seed=N] [steps=N]
             [init=random|wall|slip|spectrum|buckled]
             [out=DIR] [run=RUN_ID]

The config file is required (default path: dipole-sim.json); key=value
arguments override the corresponding config fields.
"#
    );
}

fn sanitize_run_id(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn default_run_id(cfg: &SimConfig) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| std::time::Duration::from_secs(0));
    let ts = format!("{}{:03}", now.as_secs(), now.subsec_millis());
    format!("{}_{}_T{}", ts, cfg.lattice.initial, cfg.run.t)
}

fn unique_run_dir(out_root: &str, run_id: &str) -> PathBuf {
    let base = PathBuf::from(out_root);
    let mut dir = base.join(run_id);
    if !dir.exists() {
        return dir;
    }
    for k in 1..1000 {
        let cand = base.join(format!("{}_{}", run_id, k));
        if !cand.exists() {
            dir = cand;
            break;
        }
    }
    dir
}

/// Exports are side effects: report failures, keep going.
fn best_effort<E: std::fmt::Display>(what: &str, result: Result<(), E>) {
    if let Err(e) = result {
        eprintln!("Warning: {what} failed: {e}");
    }
}

fn main() {
    let argv: Vec<String> = env::args().collect();

    let mut config_path = PathBuf::from("dipole-sim.json");
    let mut t_override: Option<f64> = None;
    let mut dipole_override: Option<f64> = None;
    let mut seed_override: Option<u64> = None;
    let mut steps_override: Option<usize> = None;
    let mut init_override: Option<String> = None;
    let mut out_override: Option<String> = None;
    let mut run_id_override: Option<String> = None;

    for arg in argv.iter().skip(1) {
        if arg == "-h" || arg == "--help" || arg == "help" {
            print_usage();
            return;
        }
        if let Some(v) = arg.strip_prefix("t=") {
            t_override = v.parse::<f64>().ok();
            continue;
        }
        if let Some(v) = arg.strip_prefix("dipole=") {
            dipole_override = v.parse::<f64>().ok();
            continue;
        }
        if let Some(v) = arg.strip_prefix("seed=") {
            seed_override = v.parse::<u64>().ok();
            continue;
        }
        if let Some(v) = arg.strip_prefix("steps=") {
            steps_override = v.parse::<usize>().ok();
            continue;
        }
        if let Some(v) = arg.strip_prefix("init=") {
            init_override = Some(v.to_string());
            continue;
        }
        if let Some(v) = arg.strip_prefix("out=") {
            out_override = Some(v.to_string());
            continue;
        }
        if let Some(v) = arg.strip_prefix("run=") {
            run_id_override = Some(sanitize_run_id(v));
            continue;
        }
        config_path = PathBuf::from(arg);
    }

    // Config problems are fatal before anything is allocated.
    let mut cfg = match SimConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    if let Some(t) = t_override {
        eprintln!("Command line temperature: t = {t}");
        cfg.run.t = t;
    }
    if let Some(d) = dipole_override {
        eprintln!("Command line dipole strength: dipole = {d}");
        cfg.energy.dipole = d;
    }
    if let Some(s) = seed_override {
        cfg.run.seed = s;
    }
    if let Some(n) = steps_override {
        cfg.run.mc_mega_steps = n;
    }
    if let Some(init) = init_override {
        cfg.lattice.initial = init;
    }
    if let Some(out) = out_override {
        cfg.run.out_dir = out;
    }
    if let Err(e) = cfg.validate() {
        eprintln!("Error: {e}");
        process::exit(1);
    }

    let run_id = run_id_override.unwrap_or_else(|| default_run_id(&cfg));
    let run_dir = unique_run_dir(&cfg.run.out_dir, &run_id);
    if let Err(e) = create_dir_all(&run_dir) {
        eprintln!("Error: cannot create run directory {}: {e}", run_dir.display());
        process::exit(1);
    }
    best_effort("config copy", cfg.write_to_dir(&run_dir));

    let grid = cfg.grid();
    let params = cfg.model_params();
    let mut rng = rng::seeded(cfg.run.seed);

    let mut lattice = DipoleLattice::new(grid);
    initialise(&mut lattice, &params, cfg.init_kind(), &mut rng);
    if let Some(width) = cfg.lattice.slab_delete {
        slab_delete(&mut lattice, width);
    }

    eprintln!(
        "Lattice {}x{}x{} initialised ({}): {} occupied sites",
        grid.nx,
        grid.ny,
        grid.nz,
        cfg.lattice.initial,
        lattice.occupied_sites()
    );
    eprintln!(
        "Efield: {:?} | dipole {} cage_strain {} K {} | T {} (beta {})",
        params.efield, params.dipole, params.cage_strain, params.k, cfg.run.t, params.beta
    );

    // Starting lattice, mainly to eyeball the initializer.
    if cfg.output.save_png {
        let p = run_dir.join("initial.png");
        best_effort("initial PNG", save_orientation_png(&lattice, 0, &p.to_string_lossy()));
    }
    if cfg.output.save_svg {
        best_effort("initial SVG", save_svg(&run_dir.join("initial.svg"), &lattice, 0));
    }
    if cfg.output.save_xyz {
        best_effort("initial XYZ", write_xyz(&run_dir.join("initial_dipoles.xyz"), &lattice));
    }

    let settings = RunSettings {
        eqm_steps: cfg.run.mc_eqm_steps,
        mega_steps: cfg.run.mc_mega_steps,
        minor_steps: minor_steps(&grid, cfg.run.mc_moves),
        // the bar would fight the dashboard for the terminal
        progress: !cfg.output.display_terminal,
    };
    eprintln!(
        "MC startup: {} + {} mega-steps of {} moves each",
        settings.eqm_steps, settings.mega_steps, settings.minor_steps
    );

    if cfg.output.snapshot_every > 0 {
        best_effort("frames directory", create_dir_all(run_dir.join("frames")));
    }

    let mut pol_log = File::create(run_dir.join("polarisation.csv"))
        .map(BufWriter::new)
        .map_err(|e| eprintln!("Warning: polarisation log failed: {e}"))
        .ok();
    if let Some(w) = pol_log.as_mut() {
        let _ = writeln!(w, "mega_step,attempted_moves,polarisation");
    }

    let pol_dir = field_direction(params.efield);
    let mut dashboard = Dashboard::new();

    let counters = run(&mut lattice, &params, &settings, &mut rng, |i, lat, c| {
        if cfg.output.display_terminal {
            let pot = cfg
                .output
                .calculate_potential
                .then(|| potential_xy_map(lat, 0, cfg.energy.potential_cutoff));
            dashboard.render(lat, pot.as_deref());
        }
        if let Some(w) = pol_log.as_mut() {
            let _ = writeln!(w, "{},{},{:.6}", i, c.total(), polarisation(lat, pol_dir));
        }
        if cfg.output.save_png
            && cfg.output.snapshot_every > 0
            && (i + 1) % cfg.output.snapshot_every == 0
        {
            let p = run_dir.join(format!("frames/step_{:04}.png", i + 1));
            best_effort("snapshot PNG", save_orientation_png(lat, 0, &p.to_string_lossy()));
        }
    });

    if let Some(w) = pol_log.as_mut() {
        let _ = w.flush();
    }

    // Final snapshots and summaries.
    if cfg.output.save_png {
        let p = run_dir.join("final.png");
        best_effort("final PNG", save_orientation_png(&lattice, 0, &p.to_string_lossy()));
    }
    if cfg.output.save_svg {
        best_effort("final SVG", save_svg(&run_dir.join("final.svg"), &lattice, 0));
    }
    if cfg.output.save_xyz {
        best_effort("final XYZ", write_xyz(&run_dir.join("dipoles.xyz"), &lattice));
        best_effort(
            "overprint XYZ",
            write_xyz_overprint(&run_dir.join("overprint.xyz"), &lattice),
        );
        best_effort("PyMOL scene", write_pymol_cgo(&run_dir.join("dipoles.py"), &lattice));
    }
    best_effort("angle log", write_angle_log(&run_dir.join("angles.log"), &lattice));
    if cfg.output.calculate_potential {
        let p = run_dir.join("potential.png");
        best_effort(
            "potential PNG",
            save_potential_png(&lattice, 0, cfg.energy.potential_cutoff, &p.to_string_lossy()),
        );
        best_effort(
            "potential XY dump",
            write_potential_xy(&run_dir.join("potential_xy.dat"), &lattice, cfg.energy.potential_cutoff),
        );
    }
    if cfg.output.save_potential_cube {
        best_effort(
            "potential cube dump",
            write_potential_xyz(&run_dir.join("potential_xyz.dat"), &lattice, cfg.energy.potential_cutoff),
        );
    }

    eprintln!(
        "Monte Carlo moves - ACCEPT: {} REJECT: {} ratio: {:.6}",
        counters.accept,
        counters.reject,
        counters.ratio()
    );
    eprintln!("Outputs in {}", run_dir.display());
}
