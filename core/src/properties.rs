//! Named per-atom properties beyond type and position.

use std::collections::BTreeMap;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::source::AtomSource;

/// Name of the reserved 1-based atom type property.
pub const ATYPE: &str = "atype";
/// Name of the reserved Cartesian position property.
pub const POS: &str = "pos";

/// Extra per-atom properties keyed by name. Never contains [`ATYPE`] or [`POS`].
pub type PropertyMap = BTreeMap<String, PerAtom>;

/// One value for every atom in a system.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PerAtom {
    Int(Vec<i64>),
    Scalar(Vec<f64>),
    Vector(Vec<Vector3<f64>>),
}

/// The value a single atom holds for some [`PerAtom`] property.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Int(i64),
    Scalar(f64),
    Vector(Vector3<f64>),
}

impl PerAtom {
    pub fn len(&self) -> usize {
        match self {
            PerAtom::Int(values) => values.len(),
            PerAtom::Scalar(values) => values.len(),
            PerAtom::Vector(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the value of the atom at `index`
    pub fn get(&self, index: usize) -> Option<PropertyValue> {
        match self {
            PerAtom::Int(values) => values.get(index).copied().map(PropertyValue::Int),
            PerAtom::Scalar(values) => values.get(index).copied().map(PropertyValue::Scalar),
            PerAtom::Vector(values) => values.get(index).copied().map(PropertyValue::Vector),
        }
    }
}

impl From<Vec<i64>> for PerAtom {
    fn from(values: Vec<i64>) -> Self {
        PerAtom::Int(values)
    }
}

impl From<Vec<f64>> for PerAtom {
    fn from(values: Vec<f64>) -> Self {
        PerAtom::Scalar(values)
    }
}

impl From<Vec<Vector3<f64>>> for PerAtom {
    fn from(values: Vec<Vector3<f64>>) -> Self {
        PerAtom::Vector(values)
    }
}

/// Returns true for the names that can't be stored as extra properties.
pub fn is_reserved(name: &str) -> bool {
    name == ATYPE || name == POS
}

/// Gathers every property of `source` except the atom types and positions.
pub fn collect(source: &impl AtomSource) -> PropertyMap {
    source
        .property_names()
        .into_iter()
        .filter(|name| !is_reserved(name))
        .filter_map(|name| {
            let values = source.property(name)?;
            Some((name.to_owned(), values))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use nalgebra::Vector3;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;
    use crate::{simbox::SimulationBox, system::System};

    fn two_atoms() -> System {
        System::new(
            SimulationBox::orthorhombic(3.0, 3.0, 3.0),
            [true; 3],
            vec![1, 2],
            vec![Vector3::zeros(), Vector3::new(1.5, 1.5, 1.5)],
        )
        .unwrap()
    }

    #[test]
    fn reserved_only() {
        let system = two_atoms();

        assert_eq!(system.property_names(), vec![ATYPE, POS]);
        assert!(collect(&system).is_empty());
    }

    #[test]
    fn extra_properties() {
        let mut system = two_atoms();
        system.add_property("charge", vec![1.0_f64, -1.0]).unwrap();
        system.add_property("id", vec![10_i64, 20]).unwrap();
        system
            .add_property("velocity", vec![Vector3::<f64>::x(), Vector3::y()])
            .unwrap();

        let properties = collect(&system);

        assert_eq!(properties.len(), 3);
        assert_eq!(properties["charge"], PerAtom::Scalar(vec![1.0, -1.0]));
        assert_eq!(properties["id"], PerAtom::Int(vec![10, 20]));
        assert_eq!(properties["id"].get(1), Some(PropertyValue::Int(20)));
        assert_eq!(
            properties["velocity"].get(0),
            Some(PropertyValue::Vector(Vector3::x()))
        );
        assert!(!properties.contains_key(ATYPE));
        assert!(!properties.contains_key(POS));
    }

    #[test]
    fn never_contains_reserved_names() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let mut system = two_atoms();
            let n_props = rng.gen_range(0..6);
            for p in 0..n_props {
                let values = vec![rng.gen::<f64>(), rng.gen::<f64>()];
                system.add_property(format!("prop{p}"), values).unwrap();
            }

            let properties = collect(&system);
            assert_eq!(properties.len(), n_props);
            assert!(properties.keys().all(|name| !is_reserved(name)));
        }
    }

    #[test]
    fn untagged_json() {
        let ints: PerAtom = serde_json::from_str("[1, 2, 3]").unwrap();
        let floats: PerAtom = serde_json::from_str("[1.5, 2, 3]").unwrap();
        let vectors: PerAtom = serde_json::from_str("[[0, 0, 1], [1, 0, 0]]").unwrap();

        assert_eq!(ints, PerAtom::Int(vec![1, 2, 3]));
        assert_eq!(floats, PerAtom::Scalar(vec![1.5, 2.0, 3.0]));
        assert_eq!(vectors, PerAtom::Vector(vec![Vector3::z(), Vector3::x()]));
    }
}
