use nalgebra::Vector3;

use crate::{error::Result, properties::PerAtom, simbox::SimulationBox, symbols::SymbolTable};

/// Anything that can be read as a collection of typed, positioned atoms inside a box.
///
/// The reserved properties ([`ATYPE`](crate::properties::ATYPE) and
/// [`POS`](crate::properties::POS)) are listed by [`AtomSource::property_names`]
/// alongside any extra per-atom properties.
pub trait AtomSource {
    fn simulation_box(&self) -> &SimulationBox;

    /// Periodic boundary flags along a, b and c
    fn pbc(&self) -> [bool; 3];

    fn natoms(&self) -> usize;

    /// 1-based atom types, one per atom
    fn atypes(&self) -> &[usize];

    /// Cartesian positions, one per atom
    fn positions(&self) -> &[Vector3<f64>];

    /// Positions as fractions of the box vectors
    fn scaled_positions(&self) -> Result<Vec<Vector3<f64>>> {
        self.simulation_box().scale(self.positions())
    }

    fn property_names(&self) -> Vec<&str>;

    fn property(&self, name: &str) -> Option<PerAtom>;

    /// The symbol table used when a conversion isn't given one explicitly
    fn symbols(&self) -> &SymbolTable;
}
