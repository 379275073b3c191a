pub mod category;
pub mod error;
pub mod manifest;

pub mod prelude {
    pub use super::category::*;
    pub use super::error::*;
    pub use super::manifest::*;
}
