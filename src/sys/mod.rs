//! System Definitions (ABI).
//!
//! Tipos e códigos de erro compartilhados entre drivers e userspace.

pub mod error;
pub mod types;

pub use error::{SysError, SysResult};
pub use types::{Fd, Pid};
