// src/config.rs
//
// Run configuration: a JSON record loaded at startup, validated before any
// lattice allocation, and copied into the run directory for provenance.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::grid::Grid3D;
use crate::params::{beta_from_temperature, InitKind, ModelParams};
use crate::rng::DEFAULT_SEED;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub lattice: LatticeConfig,
    pub energy: EnergyConfig,
    pub run: RunConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatticeConfig {
    pub x: usize,
    pub y: usize,
    pub z: usize,
    /// 2 confines dipoles to the XY plane, 3 allows the full sphere.
    #[serde(default = "default_dim")]
    pub dim: u32,
    #[serde(default = "default_fraction")]
    pub dipole_fraction: f64,
    /// Initial configuration: random | wall | slip | spectrum | buckled.
    #[serde(default = "default_initial")]
    pub initial: String,
    /// Vacate the slab x < width after initialisation.
    #[serde(default)]
    pub slab_delete: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyConfig {
    /// External field vector, k_B·T units per lattice unit.
    #[serde(default)]
    pub efield: [f64; 3],
    /// Axis-pinning constant.
    #[serde(default = "default_unity")]
    pub k: f64,
    #[serde(default = "default_unity")]
    pub cage_strain: f64,
    /// Dipole-dipole coupling strength.
    #[serde(default = "default_unity")]
    pub dipole: f64,
    /// Interaction cutoff radius, lattice units.
    #[serde(default = "default_cutoff")]
    pub dipole_cutoff: i32,
    /// Independent (larger) cutoff for the visualisation potential.
    #[serde(default = "default_potential_cutoff")]
    pub potential_cutoff: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Nominal temperature; beta = 300/T in reduced units.
    pub t: f64,
    #[serde(default = "default_eqm_steps")]
    pub mc_eqm_steps: usize,
    #[serde(default = "default_mega_steps")]
    pub mc_mega_steps: usize,
    /// Minor-step multiplier: one mega-step is x*y*z*mc_moves moves.
    #[serde(default = "default_unity")]
    pub mc_moves: f64,
    /// Propose only the six signed unit-axis orientations.
    #[serde(default)]
    pub constrain_to_axes: bool,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_out_dir")]
    pub out_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// ANSI dashboard after every measured mega-step.
    #[serde(default = "default_true")]
    pub display_terminal: bool,
    /// Compute the slice potential for the dashboard / potential exports.
    #[serde(default)]
    pub calculate_potential: bool,
    #[serde(default = "default_true")]
    pub save_png: bool,
    #[serde(default = "default_true")]
    pub save_svg: bool,
    #[serde(default = "default_true")]
    pub save_xyz: bool,
    /// Full-volume potential text dump at the end of the run.
    #[serde(default)]
    pub save_potential_cube: bool,
    /// Save an orientation PNG every N measured mega-steps (0 = never).
    #[serde(default)]
    pub snapshot_every: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            display_terminal: true,
            calculate_potential: false,
            save_png: true,
            save_svg: true,
            save_xyz: true,
            save_potential_cube: false,
            snapshot_every: 0,
        }
    }
}

fn default_dim() -> u32 {
    3
}
fn default_fraction() -> f64 {
    0.9
}
fn default_initial() -> String {
    "random".to_string()
}
fn default_unity() -> f64 {
    1.0
}
fn default_cutoff() -> i32 {
    3
}
fn default_potential_cutoff() -> i32 {
    10
}
fn default_eqm_steps() -> usize {
    10
}
fn default_mega_steps() -> usize {
    400
}
fn default_seed() -> u64 {
    DEFAULT_SEED
}
fn default_out_dir() -> String {
    "runs".to_string()
}
fn default_true() -> bool {
    true
}

impl SimConfig {
    /// Load and validate a config file. Any failure here is fatal to the
    /// caller: it names the offending field and happens before the lattice
    /// is allocated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SimConfig = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lattice.x == 0 || self.lattice.y == 0 || self.lattice.z == 0 {
            return Err(invalid("lattice.x/y/z", "extents must be nonzero"));
        }
        if self.lattice.dim != 2 && self.lattice.dim != 3 {
            return Err(invalid(
                "lattice.dim",
                format!("expected 2 or 3, got {}", self.lattice.dim),
            ));
        }
        if !(0.0..=1.0).contains(&self.lattice.dipole_fraction) {
            return Err(invalid(
                "lattice.dipole_fraction",
                format!("expected 0..=1, got {}", self.lattice.dipole_fraction),
            ));
        }
        if InitKind::from_arg(&self.lattice.initial).is_none() {
            return Err(invalid(
                "lattice.initial",
                format!(
                    "unknown initial lattice '{}', expected random|wall|slip|spectrum|buckled",
                    self.lattice.initial
                ),
            ));
        }
        if self.energy.dipole_cutoff < 0 {
            return Err(invalid("energy.dipole_cutoff", "must be >= 0"));
        }
        if self.energy.potential_cutoff < 1 {
            return Err(invalid("energy.potential_cutoff", "must be >= 1"));
        }
        if self.run.t < 0.0 || !self.run.t.is_finite() {
            return Err(invalid(
                "run.t",
                format!("temperature must be finite and >= 0, got {}", self.run.t),
            ));
        }
        if self.run.mc_mega_steps == 0 {
            return Err(invalid("run.mc_mega_steps", "must be >= 1"));
        }
        if self.run.mc_moves <= 0.0 || !self.run.mc_moves.is_finite() {
            return Err(invalid(
                "run.mc_moves",
                format!("multiplier must be finite and > 0, got {}", self.run.mc_moves),
            ));
        }
        Ok(())
    }

    pub fn grid(&self) -> Grid3D {
        Grid3D::new(self.lattice.x, self.lattice.y, self.lattice.z)
    }

    /// Initial-lattice selector; `validate` guarantees this parses.
    pub fn init_kind(&self) -> InitKind {
        InitKind::from_arg(&self.lattice.initial).expect("validated initial lattice")
    }

    pub fn model_params(&self) -> ModelParams {
        ModelParams {
            beta: beta_from_temperature(self.run.t),
            efield: self.energy.efield,
            k: self.energy.k,
            cage_strain: self.energy.cage_strain,
            dipole: self.energy.dipole,
            cutoff: self.energy.dipole_cutoff,
            dipole_fraction: self.lattice.dipole_fraction,
            dim: self.lattice.dim,
            constrain_to_axes: self.run.constrain_to_axes,
        }
    }

    /// Write the effective config into the run directory.
    pub fn write_to_dir(&self, out_dir: &Path) -> std::io::Result<()> {
        let path = out_dir.join("config.json");
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}
