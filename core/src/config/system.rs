use std::{fs::File, io::BufReader, path::Path};

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, ConvertError},
    properties::PropertyMap,
    simbox::SimulationBox,
    symbols::SymbolTable,
    system::System,
};

/// Represents a full system in a config file.
///
/// ```json
/// {
///   "box": { "vects": [[2.8, 0, 0], [0, 2.8, 0], [0, 0, 2.8]] },
///   "symbols": ["Fe"],
///   "atoms": { "atype": [1, 1], "pos": [[0, 0, 0], [1.4, 1.4, 1.4]], "charge": [0.0, 0.0] }
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigSystem {
    #[serde(rename = "box")]
    sim_box: ConfigBox,
    #[serde(default = "all_periodic")]
    pbc: [bool; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    symbols: Option<SymbolTable>,
    atoms: ConfigAtoms,
}

/// Box vectors as rows, plus the origin.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigBox {
    pub vects: [[f64; 3]; 3],
    #[serde(default)]
    pub origin: [f64; 3],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct ConfigAtoms {
    atype: Vec<usize>,
    pos: Vec<Vector3<f64>>,
    /// every other key is an extra per-atom property
    #[serde(flatten)]
    properties: PropertyMap,
}

fn all_periodic() -> [bool; 3] {
    [true; 3]
}

impl ConfigSystem {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(serde_json::from_reader(BufReader::new(File::open(path)?))?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        Ok(serde_json::to_writer_pretty(
            File::options()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)?,
            self,
        )?)
    }
}

impl From<ConfigBox> for SimulationBox {
    fn from(value: ConfigBox) -> Self {
        SimulationBox::new(
            Matrix3::from_fn(|i, j| value.vects[i][j]),
            value.origin.into(),
        )
    }
}

impl From<&SimulationBox> for ConfigBox {
    fn from(value: &SimulationBox) -> Self {
        let (vects, origin) = (value.vects(), value.origin());
        Self {
            vects: std::array::from_fn(|i| std::array::from_fn(|j| vects[(i, j)])),
            origin: [origin.x, origin.y, origin.z],
        }
    }
}

impl TryFrom<ConfigSystem> for System {
    type Error = ConvertError;

    fn try_from(value: ConfigSystem) -> Result<Self, Self::Error> {
        let ConfigSystem {
            sim_box,
            pbc,
            symbols,
            atoms,
        } = value;

        let mut system = System::new(sim_box.into(), pbc, atoms.atype, atoms.pos)?;
        if symbols.is_some() {
            system.set_symbols(symbols);
        }
        for (name, values) in atoms.properties {
            system.add_property(name, values)?;
        }

        Ok(system)
    }
}

impl From<&System> for ConfigSystem {
    fn from(value: &System) -> Self {
        let symbols = value.symbols.entries().iter().any(Option::is_some);

        Self {
            sim_box: (&value.sim_box).into(),
            pbc: value.pbc,
            symbols: symbols.then(|| value.symbols.clone()),
            atoms: ConfigAtoms {
                atype: value.atypes.clone(),
                pos: value.positions.clone(),
                properties: value.properties.clone(),
            },
        }
    }
}

impl System {
    /// Reads a system from a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(ConfigSystem::load(path)?.try_into()?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        ConfigSystem::from(self).save(path)
    }
}
