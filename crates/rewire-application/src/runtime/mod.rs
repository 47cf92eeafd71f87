//! Module runtime
//!
//! Loads RWM modules and executes their methods. This is the host that
//! creates call sites for rewritten instructions and links them on first use.

pub mod interpreter;
pub mod loader;

pub use interpreter::{DEFAULT_STEP_LIMIT, Interpreter};
pub use loader::{CallSiteId, LoadedModule, ModuleLoader};
