//! Rescaling of crystal prototype unit cells.
//!
//! Which lattice parameters may be given depends on the crystal family of the
//! prototype: a cubic cell only takes `a`, a hexagonal one takes `a` and `c`, and
//! so on. Either every parameter of the family is given or none of them is.

use serde::{Deserialize, Serialize};

use crate::{
    error::{ConvertError, Result},
    simbox::SimulationBox,
    system::System,
    tools::{identify_family, CrystalFamily},
};

const RTOL: f64 = 1e-5;
const ATOL: f64 = 1e-8;

/// Optional lattice lengths and angles (degrees) to apply to a prototype.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LatticeParameters {
    pub a: Option<f64>,
    pub b: Option<f64>,
    pub c: Option<f64>,
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
}

impl LatticeParameters {
    fn named(&self) -> [(&'static str, Option<f64>); 6] {
        [
            ("a", self.a),
            ("b", self.b),
            ("c", self.c),
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("gamma", self.gamma),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.named().iter().all(|(_, value)| value.is_none())
    }

    /// Values of `names` if all of them are set, `None` if none of them are.
    /// Fails if only some are set, or if any parameter outside `names` is set.
    fn take(&self, names: &[&str], family: &str) -> Result<Option<Vec<f64>>> {
        let named = self.named();

        if named
            .iter()
            .any(|(name, value)| value.is_some() && !names.contains(name))
        {
            return Err(ConvertError::invalid(format!(
                "Only {} can be set for {family} prototypes",
                names.join(", ")
            )));
        }

        let values = names
            .iter()
            .filter_map(|name| named.iter().find(|(n, _)| n == name)?.1)
            .collect::<Vec<_>>();

        match values.len() {
            0 => Ok(None),
            n if n == names.len() => Ok(Some(values)),
            _ => Err(ConvertError::invalid(format!(
                "All or neither of {} must be set for {family} prototypes",
                names.join(", ")
            ))),
        }
    }
}

/// Rebuilds the box of `ucell` from `params`, keeping atoms at their fractional positions.
///
/// Unset parameters leave the cell untouched. Angles that the family fixes come
/// out as 90 degrees (120 for the hexagonal gamma).
pub fn apply_lattice_parameters(ucell: &mut System, params: &LatticeParameters) -> Result<()> {
    let family = identify_family(&ucell.sim_box, RTOL, ATOL);
    let name = family.map_or("triclinic".to_owned(), |family| family.to_string());

    let new_box = match family {
        Some(CrystalFamily::Cubic) => params
            .take(&["a"], &name)?
            .map(|v| SimulationBox::from_parameters(v[0], v[0], v[0], 90.0, 90.0, 90.0)),
        Some(CrystalFamily::Hexagonal) => params
            .take(&["a", "c"], &name)?
            .map(|v| SimulationBox::from_parameters(v[0], v[0], v[1], 90.0, 90.0, 120.0)),
        Some(CrystalFamily::Tetragonal) => params
            .take(&["a", "c"], &name)?
            .map(|v| SimulationBox::from_parameters(v[0], v[0], v[1], 90.0, 90.0, 90.0)),
        Some(CrystalFamily::Rhombohedral) => params
            .take(&["a", "alpha"], &name)?
            .map(|v| SimulationBox::from_parameters(v[0], v[0], v[0], v[1], v[1], v[1])),
        Some(CrystalFamily::Orthorhombic) => params
            .take(&["a", "b", "c"], &name)?
            .map(|v| SimulationBox::from_parameters(v[0], v[1], v[2], 90.0, 90.0, 90.0)),
        Some(CrystalFamily::Monoclinic) => params
            .take(&["a", "b", "c", "beta"], &name)?
            .map(|v| SimulationBox::from_parameters(v[0], v[1], v[2], 90.0, v[3], 90.0)),
        Some(CrystalFamily::Triclinic) | None => params
            .take(&["a", "b", "c", "alpha", "beta", "gamma"], &name)?
            .map(|v| SimulationBox::from_parameters(v[0], v[1], v[2], v[3], v[4], v[5])),
    };

    let Some(new_box) = new_box.transpose()? else {
        return Ok(());
    };

    log::debug!("rescaling {name} prototype to {params:?}");
    let new_box = SimulationBox::new(*new_box.vects(), *ucell.sim_box.origin());
    ucell.box_set(new_box, true)
}
