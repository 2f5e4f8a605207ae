//! Service registry, lazy dependency handles and observable state for a
//! single-threaded game update loop.

pub mod config;
pub mod error;
pub mod frame;
pub mod host;
pub mod observable;
pub mod registry;

pub use crate::config::{EngineConfig, SingletonConfig};
pub use crate::error::{EngineError, EngineResult, RegistryError, RegistryResult};
pub use crate::frame::Frame;
pub use crate::host::{Engine, Module, ModuleCtx, SingletonComponent};
pub use crate::observable::{Observable, ObservableList, Subscriber};
pub use crate::registry::{Dependency, Generation, Lazy, Provision, Registry};
