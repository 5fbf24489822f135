//! Core traits for the container.

mod constructor;
mod injectable;

pub use constructor::ConstructorFn;
pub use injectable::Injectable;
