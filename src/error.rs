use thiserror::Error;

use crate::table::UsercallPrimary;

/// A descriptor that does not describe a callable syscall.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
  #[error("{name}: argument {ordinal} declared after argument {previous}")]
  OrdinalOrder {
    name: &'static str,
    ordinal: u8,
    previous: u8,
  },
  #[error("{name}: argument {ordinal} has more than one primary rule")]
  DuplicateOrdinal { name: &'static str, ordinal: u8 },
  #[error("{name}: argument {ordinal} is out of range for arity {arity}")]
  OrdinalGap {
    name: &'static str,
    ordinal: u8,
    arity: usize,
  },
  #[error("{name}: argument {ordinal} takes its size from missing argument {target}")]
  DanglingReference {
    name: &'static str,
    ordinal: u8,
    target: u8,
  },
  #[error("{name}: inline argument {ordinal} cannot be read or written")]
  InlineWithAccess { name: &'static str, ordinal: u8 },
  #[error("{name}: return-sized rule for argument {ordinal} must be write-only")]
  ReturnSizedNotWrite { name: &'static str, ordinal: u8 },
  #[error("{name}: argument {ordinal} counts elements of zero bytes")]
  ZeroElementSize { name: &'static str, ordinal: u8 },
}

/// Table and engine disagree about a call. The host must treat every variant as fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuditError {
  #[error("{name}: descriptor expects {expected} arguments but the engine captured {actual}")]
  ArityMismatch {
    name: &'static str,
    expected: usize,
    actual: usize,
  },
  #[error("{name}: argument {ordinal} was not captured by the engine")]
  MissingArgument { name: &'static str, ordinal: u8 },
  #[error("{primary:?} was trapped without its selector argument")]
  MissingSelector { primary: UsercallPrimary },
  #[error("invalid descriptor table")]
  Descriptor(#[from] DescriptorError),
}
