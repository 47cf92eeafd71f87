//! Domain layer constants
//!
//! Contains constants that define the RWM binary module format and the
//! declarative markers shared by the rewriter and the runtime.
//! Infrastructure-specific constants remain in `rewire_infrastructure::constants`.

// ============================================================================
// MODULE FORMAT CONSTANTS
// ============================================================================

/// Magic bytes opening every RWM module
pub const MODULE_MAGIC: [u8; 4] = *b"RWM\0";

/// Current RWM format version
pub const MODULE_VERSION: u16 = 1;

/// Conventional file extension of RWM modules
pub const MODULE_FILE_EXTENSION: &str = "rwm";

/// Constant pool tag for UTF-8 strings
pub const CONSTANT_TAG_STR: u8 = 1;

/// Constant pool tag for 64-bit integers
pub const CONSTANT_TAG_INT: u8 = 2;

// ============================================================================
// MARKER CONSTANTS
// ============================================================================

/// Marker kind declaring a field as an injection point
pub const INJECT_MARKER: &str = "inject";
