use std::fmt;

use crate::simbox::SimulationBox;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CrystalFamily {
    Cubic,
    Hexagonal,
    Tetragonal,
    Rhombohedral,
    Orthorhombic,
    Monoclinic,
    Triclinic,
}

impl fmt::Display for CrystalFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CrystalFamily::Cubic => "cubic",
            CrystalFamily::Hexagonal => "hexagonal",
            CrystalFamily::Tetragonal => "tetragonal",
            CrystalFamily::Rhombohedral => "rhombohedral",
            CrystalFamily::Orthorhombic => "orthorhombic",
            CrystalFamily::Monoclinic => "monoclinic",
            CrystalFamily::Triclinic => "triclinic",
        })
    }
}

/// Identifies the crystal family of a box from its lattice parameters.
///
/// Returns `None` when the box is not in standard orientation (a along x, b in
/// the xy plane), since its parameters can't be set independently there.
pub fn identify_family(sim_box: &SimulationBox, rtol: f64, atol: f64) -> Option<CrystalFamily> {
    let close = |x: f64, y: f64| (x - y).abs() <= atol + rtol * y.abs();

    let (a, b, c) = (sim_box.a(), sim_box.b(), sim_box.c());
    let (alpha, beta, gamma) = (sim_box.alpha(), sim_box.beta(), sim_box.gamma());

    let right = |angle: f64| close(angle, 90.0);
    let all_right = right(alpha) && right(beta) && right(gamma);

    let family = if close(a, b) && close(b, c) && all_right {
        CrystalFamily::Cubic
    } else if close(a, b) && right(alpha) && right(beta) && close(gamma, 120.0) {
        CrystalFamily::Hexagonal
    } else if close(a, b) && all_right {
        CrystalFamily::Tetragonal
    } else if close(a, b) && close(b, c) && close(alpha, beta) && close(beta, gamma) {
        CrystalFamily::Rhombohedral
    } else if all_right {
        CrystalFamily::Orthorhombic
    } else if right(alpha) && right(gamma) {
        CrystalFamily::Monoclinic
    } else if sim_box.is_standard(atol) {
        CrystalFamily::Triclinic
    } else {
        return None;
    };

    log::trace!("box {a:.4} {b:.4} {c:.4} {alpha:.2} {beta:.2} {gamma:.2} is {family}");
    Some(family)
}
