//! The interface to the shadow-memory tracker that owns definedness state.

use std::sync::Arc;

use thiserror::Error;

/// Why a region failed its pre-call check. Offsets are relative to the region start.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShadowFault {
  #[error("unaddressable byte at offset {offset}")]
  Unaddressable { offset: u64 },
  #[error("uninitialized byte at offset {offset}")]
  Undefined { offset: u64 },
}

impl ShadowFault {
  pub fn offset(&self) -> u64 {
    match self {
      ShadowFault::Unaddressable { offset } | ShadowFault::Undefined { offset } => *offset,
    }
  }
}

/// Definedness tracking for the audited process.
///
/// Calls arrive concurrently from every thread that traps a syscall, each one a blocking
/// request; implementations provide their own locking.
pub trait ShadowMemory {
  /// Check that the kernel may read `len` bytes at `address`.
  fn check_readable(&self, address: u64, len: u64) -> Result<(), ShadowFault>;
  /// Record that the kernel wrote `len` bytes at `address`.
  fn mark_defined(&self, address: u64, len: u64);
}

impl<T: ShadowMemory + ?Sized> ShadowMemory for &T {
  fn check_readable(&self, address: u64, len: u64) -> Result<(), ShadowFault> {
    (**self).check_readable(address, len)
  }

  fn mark_defined(&self, address: u64, len: u64) {
    (**self).mark_defined(address, len)
  }
}

impl<T: ShadowMemory + ?Sized> ShadowMemory for Arc<T> {
  fn check_readable(&self, address: u64, len: u64) -> Result<(), ShadowFault> {
    (**self).check_readable(address, len)
  }

  fn mark_defined(&self, address: u64, len: u64) {
    (**self).mark_defined(address, len)
  }
}
