mod system;

pub use system::{ConfigBox, ConfigSystem};
