// src/lattice.rs

use crate::grid::Grid3D;

/// Electric dipole at one lattice site.
///
/// Components are stored in single precision for a compact in-memory lattice;
/// all energy arithmetic promotes to f64 (see `components`). A dipole whose
/// three components are exactly zero is a vacancy: no dipole occupies the
/// site and it contributes no interaction energy. The `length` tag is
/// reserved for solid-solution mixtures of dipole species and is not used by
/// the energy model beyond presence/absence.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Dipole {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub length: f32,
}

impl Dipole {
    /// Occupied dipole with unit length tag.
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            x,
            y,
            z,
            length: 1.0,
        }
    }

    /// Empty site.
    pub fn vacant() -> Self {
        Self::default()
    }

    /// A site is vacant when the orientation vector is exactly zero.
    #[inline]
    pub fn is_vacant(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    /// Orientation components promoted to f64 for accumulation.
    #[inline]
    pub fn components(&self) -> [f64; 3] {
        [self.x as f64, self.y as f64, self.z as f64]
    }
}

/// The lattice of dipoles: one `Dipole` per site, allocated once and mutated
/// in place for the life of the run.
pub struct DipoleLattice {
    pub grid: Grid3D,
    pub data: Vec<Dipole>,
}

impl DipoleLattice {
    /// Create a fully vacant lattice on the given grid.
    pub fn new(grid: Grid3D) -> Self {
        Self {
            grid,
            data: vec![Dipole::vacant(); grid.n_sites()],
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        self.grid.idx(x, y, z)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> Dipole {
        self.data[self.grid.idx(x, y, z)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, d: Dipole) {
        let i = self.grid.idx(x, y, z);
        self.data[i] = d;
    }

    /// Periodic accessor: coordinates may be negative or past the extents.
    #[inline]
    pub fn at(&self, x: isize, y: isize, z: isize) -> Dipole {
        let (x, y, z) = self.grid.wrap(x, y, z);
        self.data[self.grid.idx(x, y, z)]
    }

    /// Number of non-vacant sites.
    pub fn occupied_sites(&self) -> usize {
        self.data.iter().filter(|d| !d.is_vacant()).count()
    }
}
