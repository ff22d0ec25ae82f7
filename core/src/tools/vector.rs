use nalgebra::{Matrix3, Vector3};

use crate::error::{ConvertError, Result};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum AngleUnit {
    #[default]
    Degree,
    Radian,
}

/// Angle between two vectors.
pub fn vect_angle(vect1: &Vector3<f64>, vect2: &Vector3<f64>, unit: AngleUnit) -> f64 {
    let cosine = vect1.normalize().dot(&vect2.normalize()).clamp(-1.0, 1.0);
    let radians = cosine.acos();

    match unit {
        AngleUnit::Degree => radians.to_degrees(),
        AngleUnit::Radian => radians,
    }
}

/// Checks that the rows of `axes` are orthogonal and right-handed within `tol`.
/// Returns the axes normalized to unit length.
pub fn axes_check(axes: &Matrix3<f64>, tol: f64) -> Result<Matrix3<f64>> {
    let mut unit_axes = *axes;
    for mut row in unit_axes.row_iter_mut() {
        let norm = row.norm();
        if norm == 0.0 {
            return Err(ConvertError::invalid("axes must be non-zero vectors"));
        }
        row /= norm;
    }

    let (x, y, z) = (
        unit_axes.row(0).transpose(),
        unit_axes.row(1).transpose(),
        unit_axes.row(2).transpose(),
    );

    if x.dot(&y).abs() > tol || x.dot(&z).abs() > tol || y.dot(&z).abs() > tol {
        return Err(ConvertError::NonOrthogonalAxes);
    }
    if (x.cross(&y) - z).norm() > tol {
        return Err(ConvertError::LeftHandedAxes);
    }

    Ok(unit_axes)
}
