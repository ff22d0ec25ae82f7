use nalgebra::{Matrix3, Vector3};
use serde::Serialize;

use crate::{
    error::{ConvertError, Result},
    periodic_table,
    properties::{self, PropertyMap, PropertyValue},
    simbox::SimulationBox,
    source::AtomSource,
    symbols::{self, SymbolTable},
};

use super::{serialize_rows, Backends, Format};

/// Periodic lattice. Rows of the matrix are the lattice vectors.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Lattice {
    #[serde(serialize_with = "serialize_rows")]
    matrix: Matrix3<f64>,
}

impl Lattice {
    pub fn new(matrix: Matrix3<f64>) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// Lengths of the three lattice vectors
    pub fn abc(&self) -> [f64; 3] {
        let cell = self.as_box();
        [cell.a(), cell.b(), cell.c()]
    }

    /// alpha, beta and gamma in degrees
    pub fn angles(&self) -> [f64; 3] {
        let cell = self.as_box();
        [cell.alpha(), cell.beta(), cell.gamma()]
    }

    pub fn volume(&self) -> f64 {
        self.matrix.determinant().abs()
    }

    pub fn cartesian_coords(&self, frac_coords: &Vector3<f64>) -> Vector3<f64> {
        self.matrix.transpose() * frac_coords
    }

    fn as_box(&self) -> SimulationBox {
        SimulationBox::new(self.matrix, Vector3::zeros())
    }
}

/// A periodic crystal structure: species on fractional coordinates of a lattice,
/// with optional named properties attached to every site.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Structure {
    lattice: Lattice,
    species: Vec<String>,
    frac_coords: Vec<Vector3<f64>>,
    site_properties: PropertyMap,
}

impl Structure {
    pub fn new(
        lattice: Lattice,
        species: Vec<String>,
        frac_coords: Vec<Vector3<f64>>,
        site_properties: PropertyMap,
    ) -> Result<Self> {
        if species.len() != frac_coords.len() {
            return Err(ConvertError::LengthMismatch {
                what: "coordinates",
                expected: species.len(),
                found: frac_coords.len(),
            });
        }
        if let Some(unknown) = species
            .iter()
            .find(|symbol| periodic_table::atomic_number(symbol).is_none())
        {
            return Err(ConvertError::UnknownElement(unknown.clone()));
        }
        if let Some((name, values)) = site_properties
            .iter()
            .find(|(_, values)| values.len() != species.len())
        {
            return Err(ConvertError::PropertyLength {
                name: name.clone(),
                expected: species.len(),
                found: values.len(),
            });
        }

        Ok(Self {
            lattice,
            species,
            frac_coords,
            site_properties,
        })
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn num_sites(&self) -> usize {
        self.species.len()
    }

    pub fn species(&self) -> &[String] {
        &self.species
    }

    pub fn frac_coords(&self) -> &[Vector3<f64>] {
        &self.frac_coords
    }

    pub fn cart_coords(&self) -> Vec<Vector3<f64>> {
        self.frac_coords
            .iter()
            .map(|frac| self.lattice.cartesian_coords(frac))
            .collect()
    }

    pub fn site_properties(&self) -> &PropertyMap {
        &self.site_properties
    }

    pub fn site(&self, index: usize) -> Option<Site<'_>> {
        (index < self.num_sites()).then_some(Site {
            structure: self,
            index,
        })
    }

    pub fn sites(&self) -> impl Iterator<Item = Site<'_>> + '_ {
        (0..self.num_sites()).map(|index| Site {
            structure: self,
            index,
        })
    }
}

/// A borrowed view of one site of a [`Structure`].
#[derive(Copy, Clone, Debug)]
pub struct Site<'a> {
    structure: &'a Structure,
    index: usize,
}

impl<'a> Site<'a> {
    pub fn species(&self) -> &'a str {
        &self.structure.species[self.index]
    }

    pub fn frac_coords(&self) -> &'a Vector3<f64> {
        &self.structure.frac_coords[self.index]
    }

    pub fn coords(&self) -> Vector3<f64> {
        self.structure.lattice.cartesian_coords(self.frac_coords())
    }

    pub fn property(&self, name: &str) -> Option<PropertyValue> {
        self.structure.site_properties.get(name)?.get(self.index)
    }
}

/// Builds [`Structure`]s from atomic systems.
#[derive(Debug, Clone)]
pub struct PymatgenConverter {
    _private: (),
}

impl PymatgenConverter {
    pub fn new(backends: &Backends) -> Result<Self> {
        if !backends.is_available(Format::Pymatgen) {
            return Err(ConvertError::LibraryUnavailable(Format::Pymatgen));
        }
        Ok(Self { _private: () })
    }

    /// Converts `system` into a structure on fractional coordinates. Every extra
    /// per-atom property is attached to the sites.
    pub fn dump(
        &self,
        system: &impl AtomSource,
        symbols: Option<&SymbolTable>,
    ) -> Result<Structure> {
        let lattice = Lattice::new(*system.simulation_box().vects());

        let table = symbols::resolve(symbols, system);
        let species = table.expand(system.atypes())?;

        let frac_coords = system.scaled_positions()?;
        let site_properties = properties::collect(system);

        log::debug!(
            "building structure with {} sites and {} site properties",
            species.len(),
            site_properties.len()
        );

        Structure::new(lattice, species, frac_coords, site_properties)
    }
}
