use nalgebra::{Matrix3, Vector3};
use serde::Serialize;

use crate::{
    error::{ConvertError, Result},
    periodic_table,
    properties::{self, PropertyMap},
    simbox::SimulationBox,
    source::AtomSource,
    symbols::{self, SymbolTable},
};

use super::{serialize_rows, Backends, Format};

/// A collection of atoms in the phonopy layout: one symbol and one Cartesian
/// position per atom, plus the cell and its periodic boundaries.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PhonopyAtoms {
    symbols: Vec<String>,
    positions: Vec<Vector3<f64>>,
    #[serde(serialize_with = "serialize_rows")]
    cell: Matrix3<f64>,
    pbc: [bool; 3],
}

impl PhonopyAtoms {
    pub fn new(
        symbols: Vec<String>,
        positions: Vec<Vector3<f64>>,
        pbc: [bool; 3],
        cell: Matrix3<f64>,
    ) -> Result<Self> {
        if symbols.len() != positions.len() {
            return Err(ConvertError::LengthMismatch {
                what: "positions",
                expected: symbols.len(),
                found: positions.len(),
            });
        }
        if let Some(unknown) = symbols
            .iter()
            .find(|symbol| periodic_table::atomic_number(symbol).is_none())
        {
            return Err(ConvertError::UnknownElement(unknown.clone()));
        }

        Ok(Self {
            symbols,
            positions,
            cell,
            pbc,
        })
    }

    pub fn natoms(&self) -> usize {
        self.symbols.len()
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Atomic numbers, one per atom
    pub fn numbers(&self) -> Vec<u8> {
        self.symbols
            .iter()
            .filter_map(|symbol| periodic_table::atomic_number(symbol))
            .collect()
    }

    pub fn positions(&self) -> &[Vector3<f64>] {
        &self.positions
    }

    /// Positions as fractions of the cell vectors
    pub fn scaled_positions(&self) -> Result<Vec<Vector3<f64>>> {
        SimulationBox::new(self.cell, Vector3::zeros()).scale(&self.positions)
    }

    /// Cell vectors as rows
    pub fn cell(&self) -> &Matrix3<f64> {
        &self.cell
    }

    pub fn pbc(&self) -> [bool; 3] {
        self.pbc
    }
}

/// Builds [`PhonopyAtoms`] from atomic systems.
#[derive(Debug, Clone)]
pub struct PhonopyConverter {
    _private: (),
}

impl PhonopyConverter {
    pub fn new(backends: &Backends) -> Result<Self> {
        if !backends.is_available(Format::Phonopy) {
            return Err(ConvertError::LibraryUnavailable(Format::Phonopy));
        }
        Ok(Self { _private: () })
    }

    /// Converts `system`, using `symbols` or the system's own table for the element names.
    ///
    /// Extra per-atom properties are dropped; see [`PhonopyConverter::dump_with_properties`].
    pub fn dump(
        &self,
        system: &impl AtomSource,
        symbols: Option<&SymbolTable>,
    ) -> Result<PhonopyAtoms> {
        let table = symbols::resolve(symbols, system);
        let all_symbols = table.expand(system.atypes())?;

        log::debug!(
            "building phonopy atoms for {} atoms of {} types",
            system.natoms(),
            table.len()
        );

        PhonopyAtoms::new(
            all_symbols,
            system.positions().to_vec(),
            system.pbc(),
            *system.simulation_box().vects(),
        )
    }

    /// Like [`PhonopyConverter::dump`], also returning the extra per-atom properties.
    pub fn dump_with_properties(
        &self,
        system: &impl AtomSource,
        symbols: Option<&SymbolTable>,
    ) -> Result<(PhonopyAtoms, PropertyMap)> {
        let atoms = self.dump(system, symbols)?;
        let properties = properties::collect(system);
        log::trace!("collected properties: {:?}", properties.keys());

        Ok((atoms, properties))
    }
}
