use nalgebra::{Matrix3, Vector3};

use crate::error::{ConvertError, Result};

/// A parallelepiped simulation cell.
///
/// The rows of `vects` are the lattice vectors a, b and c.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SimulationBox {
    vects: Matrix3<f64>,
    origin: Vector3<f64>,
}

impl Default for SimulationBox {
    fn default() -> Self {
        Self::new(Matrix3::identity(), Vector3::zeros())
    }
}

impl SimulationBox {
    pub fn new(vects: Matrix3<f64>, origin: Vector3<f64>) -> Self {
        Self { vects, origin }
    }

    /// Orthogonal box with edge lengths a, b and c along x, y and z.
    pub fn orthorhombic(a: f64, b: f64, c: f64) -> Self {
        Self::new(Matrix3::from_diagonal(&Vector3::new(a, b, c)), Vector3::zeros())
    }

    /// Builds a box in standard orientation from lattice parameters. Angles are in degrees.
    ///
    /// a lies along x and b lies in the xy plane.
    pub fn from_parameters(
        a: f64,
        b: f64,
        c: f64,
        alpha: f64,
        beta: f64,
        gamma: f64,
    ) -> Result<Self> {
        if ![a, b, c].iter().all(|&length| length.is_finite() && length > 0.0) {
            return Err(ConvertError::invalid("lattice lengths must be positive and finite"));
        }

        let (cos_alpha, cos_beta) = (alpha.to_radians().cos(), beta.to_radians().cos());
        let (sin_gamma, cos_gamma) = gamma.to_radians().sin_cos();

        let cx = c * cos_beta;
        let cy = c * (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
        let cz_squared = c * c - cx * cx - cy * cy;
        if cz_squared.is_nan() || cz_squared <= 0.0 {
            return Err(ConvertError::invalid(format!(
                "angles alpha={alpha}, beta={beta}, gamma={gamma} do not form a valid box"
            )));
        }

        let vects = Matrix3::new(
            a,
            0.0,
            0.0,
            b * cos_gamma,
            b * sin_gamma,
            0.0,
            cx,
            cy,
            cz_squared.sqrt(),
        );

        Ok(Self::new(vects, Vector3::zeros()))
    }

    pub fn vects(&self) -> &Matrix3<f64> {
        &self.vects
    }

    pub fn origin(&self) -> &Vector3<f64> {
        &self.origin
    }

    pub fn avect(&self) -> Vector3<f64> {
        self.vects.row(0).transpose()
    }

    pub fn bvect(&self) -> Vector3<f64> {
        self.vects.row(1).transpose()
    }

    pub fn cvect(&self) -> Vector3<f64> {
        self.vects.row(2).transpose()
    }

    pub fn a(&self) -> f64 {
        self.avect().norm()
    }

    pub fn b(&self) -> f64 {
        self.bvect().norm()
    }

    pub fn c(&self) -> f64 {
        self.cvect().norm()
    }

    /// Angle between b and c in degrees
    pub fn alpha(&self) -> f64 {
        self.bvect().angle(&self.cvect()).to_degrees()
    }

    /// Angle between a and c in degrees
    pub fn beta(&self) -> f64 {
        self.avect().angle(&self.cvect()).to_degrees()
    }

    /// Angle between a and b in degrees
    pub fn gamma(&self) -> f64 {
        self.avect().angle(&self.bvect()).to_degrees()
    }

    pub fn volume(&self) -> f64 {
        self.vects.determinant().abs()
    }

    /// True when a is along x, b lies in the xy plane and the diagonal is positive.
    pub fn is_standard(&self, atol: f64) -> bool {
        let v = &self.vects;
        v[(0, 1)].abs() <= atol
            && v[(0, 2)].abs() <= atol
            && v[(1, 2)].abs() <= atol
            && v[(0, 0)] > 0.0
            && v[(1, 1)] > 0.0
            && v[(2, 2)] > 0.0
    }

    /// Converts Cartesian positions into fractions of the box vectors, relative to the origin.
    pub fn scale(&self, positions: &[Vector3<f64>]) -> Result<Vec<Vector3<f64>>> {
        let inverse = self
            .vects
            .transpose()
            .try_inverse()
            .ok_or(ConvertError::SingularBox)?;

        Ok(positions
            .iter()
            .map(|pos| inverse * (pos - self.origin))
            .collect())
    }

    /// Converts fractional positions back into Cartesian positions.
    pub fn unscale(&self, scaled: &[Vector3<f64>]) -> Vec<Vector3<f64>> {
        let transform = self.vects.transpose();
        scaled
            .iter()
            .map(|frac| transform * frac + self.origin)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::{Matrix3, Vector3};

    use super::SimulationBox;
    use crate::error::ConvertError;

    #[test]
    fn hexagonal_parameters() {
        let hex = SimulationBox::from_parameters(2.5, 2.5, 4.0, 90.0, 90.0, 120.0).unwrap();

        assert_relative_eq!(hex.a(), 2.5, epsilon = 1e-12);
        assert_relative_eq!(hex.b(), 2.5, epsilon = 1e-12);
        assert_relative_eq!(hex.c(), 4.0, epsilon = 1e-12);
        assert_relative_eq!(hex.alpha(), 90.0, epsilon = 1e-9);
        assert_relative_eq!(hex.beta(), 90.0, epsilon = 1e-9);
        assert_relative_eq!(hex.gamma(), 120.0, epsilon = 1e-9);
        assert!(hex.is_standard(1e-8));
    }

    #[test]
    fn triclinic_parameters() {
        let tri = SimulationBox::from_parameters(3.0, 4.0, 5.0, 80.0, 95.0, 105.0).unwrap();

        assert_relative_eq!(tri.alpha(), 80.0, epsilon = 1e-9);
        assert_relative_eq!(tri.beta(), 95.0, epsilon = 1e-9);
        assert_relative_eq!(tri.gamma(), 105.0, epsilon = 1e-9);
    }

    #[test]
    fn impossible_angles() {
        assert!(SimulationBox::from_parameters(1.0, 1.0, 1.0, 10.0, 10.0, 170.0).is_err());
        assert!(SimulationBox::from_parameters(-1.0, 1.0, 1.0, 90.0, 90.0, 90.0).is_err());
    }

    #[test]
    fn non_finite_lengths() {
        for bad in [f64::NAN, f64::INFINITY] {
            assert!(SimulationBox::from_parameters(bad, 1.0, 1.0, 90.0, 90.0, 90.0).is_err());
            assert!(SimulationBox::from_parameters(1.0, 1.0, bad, 90.0, 90.0, 90.0).is_err());
        }
    }

    #[test]
    fn scale_respects_origin() {
        let cell = SimulationBox::new(
            Matrix3::from_diagonal(&Vector3::new(2.0, 4.0, 8.0)),
            Vector3::new(1.0, 1.0, 1.0),
        );
        let positions = [Vector3::new(1.0, 1.0, 1.0), Vector3::new(2.0, 3.0, 5.0)];

        let scaled = cell.scale(&positions).unwrap();
        assert_relative_eq!(scaled[0], Vector3::zeros());
        assert_relative_eq!(scaled[1], Vector3::new(0.5, 0.5, 0.5));

        let unscaled = cell.unscale(&scaled);
        assert_relative_eq!(unscaled[1], positions[1]);
    }

    #[test]
    fn scale_skewed_box() {
        let hex = SimulationBox::from_parameters(2.0, 2.0, 3.0, 90.0, 90.0, 120.0).unwrap();
        let frac = Vector3::new(0.25, 0.5, 0.75);

        let cart = hex.unscale(&[frac]);
        assert_relative_eq!(
            cart[0],
            0.25 * hex.avect() + 0.5 * hex.bvect() + 0.75 * hex.cvect(),
            epsilon = 1e-12
        );
        assert_relative_eq!(hex.scale(&cart).unwrap()[0], frac, epsilon = 1e-12);
    }

    #[test]
    fn singular_box() {
        let flat = SimulationBox::new(
            Matrix3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0),
            Vector3::zeros(),
        );
        assert_eq!(
            flat.scale(&[Vector3::zeros()]),
            Err(ConvertError::SingularBox)
        );
    }
}
