//! Host side of the registry: the update loop, its modules, and the
//! self-registering singleton components they own.

mod ctx;
mod engine;
mod module;
mod singleton;

pub use ctx::ModuleCtx;
pub use engine::Engine;
pub use module::Module;
pub use singleton::SingletonComponent;
