//! Conversions between three-index and four-index (Miller-Bravais) crystal
//! directions and planes, plus their Cartesian forms in a box.

use nalgebra::{Vector3, Vector4};

use crate::{
    error::{ConvertError, Result},
    simbox::SimulationBox,
};

const SUM_TOL: f64 = 1e-8;

fn check_hkil(indices: &Vector4<f64>) -> Result<()> {
    let sum = indices.x + indices.y + indices.z;
    if sum.abs() > SUM_TOL {
        return Err(ConvertError::invalid(format!(
            "four-index values need h + k + i = 0, found {sum}"
        )));
    }
    Ok(())
}

/// Direction `[u v w]` to `[U V T W]`.
pub fn vector3to4(indices: &Vector3<f64>) -> Vector4<f64> {
    let (u, v, w) = (indices.x, indices.y, indices.z);
    Vector4::new(
        (2.0 * u - v) / 3.0,
        (2.0 * v - u) / 3.0,
        -(u + v) / 3.0,
        w,
    )
}

/// Direction `[U V T W]` to `[u v w]`.
pub fn vector4to3(indices: &Vector4<f64>) -> Result<Vector3<f64>> {
    check_hkil(indices)?;
    Ok(Vector3::new(
        indices.x - indices.z,
        indices.y - indices.z,
        indices.w,
    ))
}

/// Plane `(h k l)` to `(h k i l)`.
pub fn plane3to4(indices: &Vector3<f64>) -> Vector4<f64> {
    Vector4::new(
        indices.x,
        indices.y,
        -(indices.x + indices.y),
        indices.z,
    )
}

/// Plane `(h k i l)` to `(h k l)`.
pub fn plane4to3(indices: &Vector4<f64>) -> Result<Vector3<f64>> {
    check_hkil(indices)?;
    Ok(Vector3::new(indices.x, indices.y, indices.w))
}

/// The Cartesian vector of crystal direction `[u v w]`: `u a + v b + w c`.
pub fn vector_to_cartesian(indices: &Vector3<f64>, sim_box: &SimulationBox) -> Vector3<f64> {
    sim_box.vects().transpose() * indices
}

/// Unit normal of crystal plane `(h k l)`: `h a* + k b* + l c*`, normalized.
pub fn plane_to_cartesian(
    indices: &Vector3<f64>,
    sim_box: &SimulationBox,
) -> Result<Vector3<f64>> {
    if indices.iter().all(|&index| index == 0.0) {
        return Err(ConvertError::invalid("plane indices can't all be zero"));
    }

    // columns of the inverse of the row-vector box are the reciprocal vectors
    let reciprocal = sim_box
        .vects()
        .try_inverse()
        .ok_or(ConvertError::SingularBox)?;

    Ok((reciprocal * indices).normalize())
}
