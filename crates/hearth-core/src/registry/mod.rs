//! Type-keyed singleton registry and the lazy handles layered on top of it.

mod container;
mod lazy;
mod provision;

pub use container::{Generation, Registry};
pub use lazy::Lazy;
pub use provision::{Dependency, Provision};
