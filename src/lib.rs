//! Table-driven syscall argument walker for shadow-memory auditors.
//!
//! An instrumentation engine traps a syscall, hands its number and arguments to a
//! [`SyscallAuditor`], and the auditor looks the call up in compiled-in descriptor
//! tables, works out which argument memory the kernel reads or writes, and asks a
//! [`ShadowMemory`] tracker to check or mark it.

mod args;
mod audit;
mod config;
mod descriptor;
mod error;
mod memory;
mod regions;
mod resolver;
mod shadow;
pub mod table;
mod target;
pub mod types;

pub use args::*;
pub use audit::*;
pub use config::*;
pub use descriptor::*;
pub use error::*;
pub use memory::*;
pub use regions::*;
pub use resolver::*;
pub use shadow::*;
pub use table::{
  bsd_table, validate_all, BsdSyscall, DescriptorTable, UsercallOp, UsercallPrimary, UsercallRow,
  UsercallTable,
};
pub use target::*;
pub use types::CType;
