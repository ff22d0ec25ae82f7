//! Small geometry and string helpers.

mod composition;
mod crystal_family;
mod index;
pub mod miller;
mod template;
mod vector;

pub use composition::composition_str;
pub use crystal_family::{identify_family, CrystalFamily};
pub use index::index_str;
pub use template::fill_template;
pub use vector::{axes_check, vect_angle, AngleUnit};
