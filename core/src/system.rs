use nalgebra::Vector3;

use crate::{
    error::{ConvertError, Result},
    properties::{self, PerAtom, PropertyMap, ATYPE, POS},
    simbox::SimulationBox,
    source::AtomSource,
    symbols::SymbolTable,
    tools,
};

/// An atomic system: typed atoms with positions and extra properties inside a box.
#[derive(Clone, Debug, PartialEq)]
pub struct System {
    pub(crate) sim_box: SimulationBox,
    pub(crate) pbc: [bool; 3],
    pub(crate) atypes: Vec<usize>,
    pub(crate) positions: Vec<Vector3<f64>>,
    pub(crate) properties: PropertyMap,
    pub(crate) symbols: SymbolTable,
}

impl System {
    /// Creates a system whose symbol table has one unset entry per atom type.
    ///
    /// Atypes are 1-based and dense, so none can exceed the number of atoms.
    pub fn new(
        sim_box: SimulationBox,
        pbc: [bool; 3],
        atypes: Vec<usize>,
        positions: Vec<Vector3<f64>>,
    ) -> Result<Self> {
        if atypes.len() != positions.len() {
            return Err(ConvertError::LengthMismatch {
                what: "positions",
                expected: atypes.len(),
                found: positions.len(),
            });
        }
        if let Some(atom) = atypes.iter().position(|&atype| atype == 0) {
            return Err(ConvertError::InvalidAtype { atom });
        }
        if let Some((atom, &atype)) = atypes
            .iter()
            .enumerate()
            .find(|&(_, &atype)| atype > atypes.len())
        {
            return Err(ConvertError::AtypeOutOfRange {
                atom,
                atype,
                ntypes: atypes.len(),
            });
        }

        let natypes = atypes.iter().copied().max().unwrap_or(0);

        Ok(Self {
            sim_box,
            pbc,
            atypes,
            positions,
            properties: PropertyMap::new(),
            symbols: SymbolTable::unset(natypes),
        })
    }

    pub fn with_symbols(mut self, symbols: SymbolTable) -> Self {
        self.set_symbols(Some(symbols));
        self
    }

    /// Number of atom types: the largest atype in use or the length of the symbol table.
    pub fn natypes(&self) -> usize {
        self.atypes
            .iter()
            .copied()
            .max()
            .unwrap_or(0)
            .max(self.symbols.len())
    }

    /// Replaces the symbol table. Tables shorter than the number of types in use are
    /// padded with unset entries, `None` unsets every type.
    pub fn set_symbols(&mut self, symbols: Option<SymbolTable>) {
        let in_use = self.atypes.iter().copied().max().unwrap_or(0);

        self.symbols = match symbols {
            Some(table) if table.len() >= in_use => table,
            Some(table) => table
                .entries()
                .iter()
                .cloned()
                .chain(std::iter::repeat(None))
                .take(in_use)
                .collect(),
            None => SymbolTable::unset(in_use),
        };
    }

    /// Adds or replaces an extra per-atom property.
    pub fn add_property(
        &mut self,
        name: impl Into<String>,
        values: impl Into<PerAtom>,
    ) -> Result<()> {
        let name = name.into();
        let values = values.into();

        if properties::is_reserved(&name) {
            return Err(ConvertError::ReservedProperty(name));
        }
        if values.len() != self.natoms() {
            return Err(ConvertError::PropertyLength {
                name,
                expected: self.natoms(),
                found: values.len(),
            });
        }

        self.properties.insert(name, values);
        Ok(())
    }

    pub fn remove_property(&mut self, name: &str) -> Option<PerAtom> {
        self.properties.remove(name)
    }

    /// Replaces the box. With `scale`, atoms keep their fractional positions,
    /// otherwise their Cartesian positions.
    pub fn box_set(&mut self, sim_box: SimulationBox, scale: bool) -> Result<()> {
        if scale {
            let scaled = self.sim_box.scale(&self.positions)?;
            self.positions = sim_box.unscale(&scaled);
        }
        self.sim_box = sim_box;
        Ok(())
    }

    /// Reduced composition, e.g. `Fe2O3`. None while any symbol is unset.
    pub fn composition(&self) -> Option<String> {
        self.symbols.validate().ok()?;

        let mut counts = vec![0; self.symbols.len()];
        for &atype in &self.atypes {
            counts[atype - 1] += 1;
        }
        let symbols = (1..=self.symbols.len()).filter_map(|atype| self.symbols.get(atype));

        tools::composition_str(symbols, counts).ok()
    }
}

impl AtomSource for System {
    fn simulation_box(&self) -> &SimulationBox {
        &self.sim_box
    }

    fn pbc(&self) -> [bool; 3] {
        self.pbc
    }

    fn natoms(&self) -> usize {
        self.atypes.len()
    }

    fn atypes(&self) -> &[usize] {
        &self.atypes
    }

    fn positions(&self) -> &[Vector3<f64>] {
        &self.positions
    }

    fn property_names(&self) -> Vec<&str> {
        [ATYPE, POS]
            .into_iter()
            .chain(self.properties.keys().map(String::as_str))
            .collect()
    }

    fn property(&self, name: &str) -> Option<PerAtom> {
        match name {
            ATYPE => Some(PerAtom::Int(
                self.atypes.iter().map(|&atype| atype as i64).collect(),
            )),
            POS => Some(PerAtom::Vector(self.positions.clone())),
            _ => self.properties.get(name).cloned(),
        }
    }

    fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    use super::*;

    fn iron_oxide() -> System {
        System::new(
            SimulationBox::orthorhombic(2.0, 2.0, 2.0),
            [true, true, false],
            vec![1, 1, 2],
            vec![
                Vector3::zeros(),
                Vector3::new(1.0, 1.0, 1.0),
                Vector3::new(1.0, 0.0, 0.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn construction_checks() {
        let cell = SimulationBox::default();

        assert_eq!(
            System::new(cell, [true; 3], vec![1, 2], vec![Vector3::zeros()]),
            Err(ConvertError::LengthMismatch {
                what: "positions",
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            System::new(cell, [true; 3], vec![1, 0], vec![Vector3::zeros(); 2]),
            Err(ConvertError::InvalidAtype { atom: 1 })
        );
    }

    #[test]
    fn huge_atypes_are_rejected() {
        let cell = SimulationBox::default();

        assert_eq!(
            System::new(cell, [true; 3], vec![1, 3], vec![Vector3::zeros(); 2]),
            Err(ConvertError::AtypeOutOfRange {
                atom: 1,
                atype: 3,
                ntypes: 2
            })
        );
        assert_eq!(
            System::new(cell, [true; 3], vec![usize::MAX], vec![Vector3::zeros()]),
            Err(ConvertError::AtypeOutOfRange {
                atom: 0,
                atype: usize::MAX,
                ntypes: 1
            })
        );
        assert!(System::new(cell, [true; 3], vec![2, 2], vec![Vector3::zeros(); 2]).is_ok());
    }

    #[test]
    fn default_symbols_are_unset() {
        let system = iron_oxide();

        assert_eq!(system.natypes(), 2);
        assert_eq!(system.symbols(), &SymbolTable::unset(2));
        assert_eq!(system.composition(), None);
    }

    #[test]
    fn short_symbol_table_is_padded() {
        let mut system = iron_oxide();
        system.set_symbols(Some(SymbolTable::from_symbols(["Fe"])));

        assert_eq!(system.symbols().len(), 2);
        assert_eq!(system.symbols().get(1), Some("Fe"));
        assert_eq!(system.symbols().get(2), None);

        system.set_symbols(Some(SymbolTable::from_symbols(["Fe", "O", "H"])));
        assert_eq!(system.natypes(), 3);

        system.set_symbols(None);
        assert_eq!(system.symbols(), &SymbolTable::unset(2));
    }

    #[test]
    fn property_validation() {
        let mut system = iron_oxide();

        assert_eq!(
            system.add_property(POS, vec![0.0_f64; 3]),
            Err(ConvertError::ReservedProperty(POS.to_owned()))
        );
        assert_eq!(
            system.add_property("charge", vec![0.0_f64; 2]),
            Err(ConvertError::PropertyLength {
                name: "charge".to_owned(),
                expected: 3,
                found: 2
            })
        );

        system.add_property("charge", vec![2.0_f64, 2.0, -2.0]).unwrap();
        assert_eq!(system.property_names(), vec![ATYPE, POS, "charge"]);
        assert_eq!(system.property(ATYPE), Some(PerAtom::Int(vec![1, 1, 2])));
        assert_eq!(
            system.remove_property("charge"),
            Some(PerAtom::Scalar(vec![2.0, 2.0, -2.0]))
        );
        assert_eq!(system.property("charge"), None);
    }

    #[test]
    fn box_set_scaled() {
        let mut system = iron_oxide();
        system
            .box_set(SimulationBox::orthorhombic(4.0, 4.0, 4.0), true)
            .unwrap();

        assert_relative_eq!(system.positions()[1], Vector3::new(2.0, 2.0, 2.0));
        assert_relative_eq!(
            system.scaled_positions().unwrap()[2],
            Vector3::new(0.5, 0.0, 0.0)
        );

        system
            .box_set(SimulationBox::orthorhombic(8.0, 8.0, 8.0), false)
            .unwrap();
        assert_relative_eq!(system.positions()[1], Vector3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn composition() {
        let system = iron_oxide().with_symbols(SymbolTable::from_symbols(["Fe", "O"]));
        assert_eq!(system.composition().as_deref(), Some("Fe2O"));
    }
}
