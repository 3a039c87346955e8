//! Live argument values handed over by the instrumentation engine.

/// Most arguments any syscall in the tables takes.
pub const MAX_ARGS: usize = 8;

/// Indexed access to the arguments of one trapped syscall.
pub trait SyscallArgs {
  /// The raw number the engine trapped, before any class decoding.
  fn number(&self) -> i64;
  /// How many arguments the engine captured for this call.
  fn arg_count(&self) -> usize;
  fn arg(&self, ordinal: usize) -> Option<u64>;
}

/// Argument values copied out of registers and stack slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawArgs {
  pub number: i64,
  args: [u64; MAX_ARGS],
  count: usize,
}

impl RawArgs {
  /// Values past [`MAX_ARGS`] are not stored, but still count towards
  /// [`SyscallArgs::arg_count`] so the arity check sees the real capture.
  pub fn new(number: i64, args: &[u64]) -> Self {
    let stored = args.len().min(MAX_ARGS);
    let mut raw = [0; MAX_ARGS];
    raw[..stored].copy_from_slice(&args[..stored]);
    Self {
      number,
      args: raw,
      count: args.len(),
    }
  }

  /// The stored values, at most [`MAX_ARGS`] of them.
  pub fn as_slice(&self) -> &[u64] {
    &self.args[..self.count.min(MAX_ARGS)]
  }
}

impl SyscallArgs for RawArgs {
  fn number(&self) -> i64 {
    self.number
  }

  fn arg_count(&self) -> usize {
    self.count
  }

  fn arg(&self, ordinal: usize) -> Option<u64> {
    self.as_slice().get(ordinal).copied()
  }
}

/// What the kernel returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyscallReturn {
  pub value: i64,
  /// The platform's failure signal, e.g. the carry flag on Darwin.
  pub error: bool,
}

impl SyscallReturn {
  pub const fn new(value: i64, error: bool) -> Self {
    Self { value, error }
  }

  pub const fn success(value: i64) -> Self {
    Self::new(value, false)
  }

  pub const fn failure(errno: i64) -> Self {
    Self::new(errno, true)
  }
}
