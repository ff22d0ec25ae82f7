//! Conversions from an [`AtomSource`](crate::source::AtomSource) into external structure models.
//!
//! Converters are only handed out by a [`Backends`] context that has the matching
//! format enabled.

pub mod phonopy;
pub mod pymatgen;

use std::fmt;

use nalgebra::Matrix3;
use serde::{Serialize, Serializer};

pub use phonopy::{PhonopyAtoms, PhonopyConverter};
pub use pymatgen::{Lattice, PymatgenConverter, Site, Structure};

/// The supported target formats.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    Phonopy,
    Pymatgen,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Phonopy => "phonopy",
            Format::Pymatgen => "pymatgen",
        })
    }
}

/// Which target formats can be produced. Built once, then passed to each converter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Backends {
    phonopy: bool,
    pymatgen: bool,
}

impl Backends {
    /// Enables every format compiled into this build.
    pub fn detect() -> Self {
        let backends = Self {
            phonopy: cfg!(feature = "phonopy"),
            pymatgen: cfg!(feature = "pymatgen"),
        };
        log::debug!("available backends: {backends:?}");
        backends
    }

    /// A context with every format disabled
    pub fn none() -> Self {
        Self {
            phonopy: false,
            pymatgen: false,
        }
    }

    /// Turns a format on or off. A format missing from the build can't be turned on.
    pub fn with_enabled(mut self, format: Format, enabled: bool) -> Self {
        match format {
            Format::Phonopy => self.phonopy = enabled && cfg!(feature = "phonopy"),
            Format::Pymatgen => self.pymatgen = enabled && cfg!(feature = "pymatgen"),
        }
        self
    }

    pub fn is_available(&self, format: Format) -> bool {
        match format {
            Format::Phonopy => self.phonopy,
            Format::Pymatgen => self.pymatgen,
        }
    }

    pub fn phonopy(&self) -> crate::error::Result<PhonopyConverter> {
        PhonopyConverter::new(self)
    }

    pub fn pymatgen(&self) -> crate::error::Result<PymatgenConverter> {
        PymatgenConverter::new(self)
    }
}

impl Default for Backends {
    fn default() -> Self {
        Self::detect()
    }
}

/// Writes a matrix as a list of its rows
pub(crate) fn serialize_rows<S: Serializer>(
    matrix: &Matrix3<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let rows: [[f64; 3]; 3] = std::array::from_fn(|i| std::array::from_fn(|j| matrix[(i, j)]));
    rows.serialize(serializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;

    #[test]
    fn disabled_backend() {
        let backends = Backends::detect().with_enabled(Format::Phonopy, false);

        assert!(!backends.is_available(Format::Phonopy));
        assert_eq!(
            backends.phonopy().err(),
            Some(ConvertError::LibraryUnavailable(Format::Phonopy))
        );
        assert_eq!(
            Backends::none().pymatgen().err(),
            Some(ConvertError::LibraryUnavailable(Format::Pymatgen))
        );
    }

    #[test]
    fn enabling_follows_build() {
        let backends = Backends::none()
            .with_enabled(Format::Phonopy, true)
            .with_enabled(Format::Pymatgen, true);

        assert_eq!(backends, Backends::detect());
        assert_eq!(
            backends.with_enabled(Format::Pymatgen, false),
            Backends {
                phonopy: cfg!(feature = "phonopy"),
                pymatgen: false,
            }
        );
    }

    #[cfg(all(feature = "phonopy", feature = "pymatgen"))]
    #[test]
    fn default_backends() {
        let backends = Backends::default();

        assert!(backends.is_available(Format::Phonopy));
        assert!(backends.is_available(Format::Pymatgen));
        assert!(Backends::none()
            .with_enabled(Format::Pymatgen, true)
            .pymatgen()
            .is_ok());
    }

    #[test]
    fn rows_json() {
        #[derive(Serialize)]
        struct Cell {
            #[serde(serialize_with = "serialize_rows")]
            cell: Matrix3<f64>,
        }

        let cell = Cell {
            cell: Matrix3::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0),
        };
        assert_eq!(
            serde_json::to_string(&cell).unwrap(),
            r#"{"cell":[[1.0,2.0,3.0],[4.0,5.0,6.0],[7.0,8.0,9.0]]}"#
        );
    }
}
