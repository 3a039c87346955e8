//! Static syscall descriptors and the argument rules they are made of.

use enumflags2::{bitflags, BitFlags};
use itertools::Itertools;

use crate::{
  args::SyscallReturn,
  error::DescriptorError,
  table::UsercallPrimary,
  target::{AbiSize, MacOsVersion, WordSize},
};

/// How the kernel touches the memory an argument describes.
#[bitflags]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ArgFlags {
  /// The kernel reads the region, so it must be defined before the call.
  Read = 0b00001,
  /// The kernel writes the region, so it becomes defined after the call.
  Write = 0b00010,
  /// `kind` is the real pointee type, not a placeholder.
  HasType = 0b00100,
  /// The computed count is in elements of `elem_size` bytes.
  SizeInElements = 0b01000,
  /// The region is written even when the call fails.
  WrittenOnFailure = 0b10000,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgType {
  Void,
  SignedInt,
  UnsignedInt,
  Pointer,
  /// NUL-terminated string; its extent is found by scanning.
  CString,
  /// NULL-terminated array of C string pointers.
  CStringArray,
  Struct,
}

/// Where the length of an argument's memory region comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeSpec {
  /// A compile-time size.
  Fixed(AbiSize),
  /// The live value of another argument.
  ArgValue(u8),
  /// The integer another argument points at.
  ArgPointee(u8),
  /// The syscall's return value; only known after the call.
  ReturnValue,
  /// The argument is passed by value in a register of this width.
  Inline(AbiSize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbiGate {
  Any,
  /// Only passed on ILP32 ABIs.
  Ilp32Only,
}

impl AbiGate {
  pub const fn admits(self, word_size: WordSize) -> bool {
    match self {
      AbiGate::Any => true,
      AbiGate::Ilp32Only => matches!(word_size, WordSize::Bits32),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArgRule {
  pub ordinal: u8,
  pub size: SizeSpec,
  pub flags: BitFlags<ArgFlags>,
  pub kind: ArgType,
  pub elem_size: AbiSize,
  pub abi: AbiGate,
}

impl ArgRule {
  pub const fn new(ordinal: u8, size: SizeSpec, flags: BitFlags<ArgFlags>, kind: ArgType) -> Self {
    Self {
      ordinal,
      size,
      flags,
      kind,
      elem_size: AbiSize::same(1),
      abi: AbiGate::Any,
    }
  }

  /// An argument passed by value with no memory behind it.
  pub const fn inline(ordinal: u8, width: AbiSize, kind: ArgType) -> Self {
    Self::new(ordinal, SizeSpec::Inline(width), BitFlags::EMPTY, kind)
  }

  pub const fn elements(mut self, elem_size: AbiSize) -> Self {
    self.elem_size = elem_size;
    self
  }

  pub const fn ilp32_only(mut self) -> Self {
    self.abi = AbiGate::Ilp32Only;
    self
  }

  pub fn is_inline(&self) -> bool {
    matches!(self.size, SizeSpec::Inline(_))
  }

  pub fn is_return_sized(&self) -> bool {
    matches!(self.size, SizeSpec::ReturnValue)
  }

  pub fn reads(&self) -> bool {
    self.flags.contains(ArgFlags::Read)
  }

  pub fn writes(&self) -> bool {
    self.flags.contains(ArgFlags::Write)
  }

  /// The ordinal whose value or pointee supplies this rule's length, if any.
  pub fn size_reference(&self) -> Option<u8> {
    match self.size {
      SizeSpec::ArgValue(n) | SizeSpec::ArgPointee(n) => Some(n),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportStatus {
  Supported,
  /// Argument behavior is not fully understood; the known rules are still applied.
  UnknownBehavior,
  /// Present in the table so the number resolves, but never walked.
  Unimplemented,
}

/// How a post-call return value is judged to be a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuccessCode {
  /// The platform's own error signal (the carry flag on Darwin).
  Platform,
  /// A zero return value means failure.
  ZeroFails,
  NeverFails,
}

impl SuccessCode {
  pub fn failed(self, ret: SyscallReturn) -> bool {
    match self {
      SuccessCode::Platform => ret.error,
      SuccessCode::ZeroFails => ret.value == 0,
      SuccessCode::NeverFails => false,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReturnType {
  pub kind: ArgType,
  /// A 64-bit result even on ILP32 ABIs (returned in a register pair).
  pub wide: bool,
}

impl ReturnType {
  pub const fn new(kind: ArgType) -> Self {
    Self { kind, wide: false }
  }

  pub const fn wide(kind: ArgType) -> Self {
    Self { kind, wide: true }
  }

  /// Truncate a raw return value to the width the ABI actually returns.
  pub fn normalize(&self, value: i64, word_size: WordSize) -> i64 {
    if self.wide || word_size == WordSize::Bits64 {
      return value;
    }
    match self.kind {
      ArgType::UnsignedInt | ArgType::Pointer => value as u32 as i64,
      _ => value as i32 as i64,
    }
  }
}

/// Range of OS releases in which a descriptor's number means this syscall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Availability {
  pub since: Option<MacOsVersion>,
  pub removed_in: Option<MacOsVersion>,
}

impl Availability {
  pub const ALWAYS: Availability = Availability {
    since: None,
    removed_in: None,
  };

  pub fn admits(&self, version: MacOsVersion) -> bool {
    self.since.map_or(true, |since| version >= since)
      && self.removed_in.map_or(true, |removed| version < removed)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyscallKey {
  /// A BSD syscall number (the Unix class of a Darwin trap).
  Bsd(u32),
  /// A multiplexed Windows primary whose raw number comes from configuration.
  Usercall(UsercallPrimary),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SyscallDescriptor {
  pub key: SyscallKey,
  pub name: &'static str,
  pub status: SupportStatus,
  pub success: SuccessCode,
  pub ret: ReturnType,
  pub availability: Availability,
  pub args: &'static [ArgRule],
}

impl SyscallDescriptor {
  pub fn number(&self) -> Option<u32> {
    match self.key {
      SyscallKey::Bsd(number) => Some(number),
      SyscallKey::Usercall(_) => None,
    }
  }

  /// Rules in declaration order that exist on the given ABI.
  pub fn rules_for(&self, word_size: WordSize) -> impl Iterator<Item = &'static ArgRule> + Clone {
    self.args.iter().filter(move |rule| rule.abi.admits(word_size))
  }

  /// Number of arguments the syscall takes on the given ABI.
  pub fn arity(&self, word_size: WordSize) -> usize {
    self.rules_for(word_size).map(|rule| rule.ordinal).dedup().count()
  }

  /// The first rule declared for `ordinal`, which carries its declared type.
  pub fn primary_rule(&self, ordinal: u8, word_size: WordSize) -> Option<&'static ArgRule> {
    self.rules_for(word_size).find(|rule| rule.ordinal == ordinal)
  }

  /// Whether a return-sized rule for the same argument takes over from `rule` after the call.
  pub(crate) fn superseded_after_call(&self, rule: &ArgRule, word_size: WordSize) -> bool {
    !rule.is_return_sized()
      && self
        .rules_for(word_size)
        .any(|other| other.ordinal == rule.ordinal && other.is_return_sized() && other.writes())
  }

  pub fn validate(&self) -> Result<(), DescriptorError> {
    let name = self.name;
    for word_size in [WordSize::Bits32, WordSize::Bits64] {
      let arity = self.arity(word_size);
      for (prev, rule) in self.rules_for(word_size).tuple_windows() {
        if rule.ordinal < prev.ordinal {
          return Err(DescriptorError::OrdinalOrder {
            name,
            ordinal: rule.ordinal,
            previous: prev.ordinal,
          });
        }
        if rule.ordinal == prev.ordinal && !rule.is_return_sized() {
          return Err(DescriptorError::DuplicateOrdinal {
            name,
            ordinal: rule.ordinal,
          });
        }
      }
      for rule in self.rules_for(word_size) {
        let ordinal = rule.ordinal;
        if ordinal as usize >= arity {
          return Err(DescriptorError::OrdinalGap {
            name,
            ordinal,
            arity,
          });
        }
        if let Some(target) = rule.size_reference() {
          if target as usize >= arity || target == ordinal {
            return Err(DescriptorError::DanglingReference {
              name,
              ordinal,
              target,
            });
          }
        }
        if rule.is_inline() && (rule.reads() || rule.writes()) {
          return Err(DescriptorError::InlineWithAccess { name, ordinal });
        }
        if rule.is_return_sized() && (rule.reads() || !rule.writes()) {
          return Err(DescriptorError::ReturnSizedNotWrite { name, ordinal });
        }
        if rule.flags.contains(ArgFlags::SizeInElements) && rule.elem_size.is_zero() {
          return Err(DescriptorError::ZeroElementSize { name, ordinal });
        }
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use enumflags2::make_bitflags;

  use super::*;

  static READ_RULES: [ArgRule; 4] = [
    ArgRule::inline(0, AbiSize::same(4), ArgType::SignedInt),
    ArgRule::new(1, SizeSpec::ArgValue(2), make_bitflags!(ArgFlags::{Write}), ArgType::Pointer),
    ArgRule::new(1, SizeSpec::ReturnValue, make_bitflags!(ArgFlags::{Write}), ArgType::Pointer),
    ArgRule::inline(2, AbiSize::WORD, ArgType::UnsignedInt),
  ];

  fn descriptor(args: &'static [ArgRule]) -> SyscallDescriptor {
    SyscallDescriptor {
      key: SyscallKey::Bsd(3),
      name: "read",
      status: SupportStatus::Supported,
      success: SuccessCode::Platform,
      ret: ReturnType::new(ArgType::SignedInt),
      availability: Availability::ALWAYS,
      args,
    }
  }

  #[test]
  fn return_sized_rules_do_not_count_towards_arity() {
    let read = descriptor(&READ_RULES);
    assert_eq!(read.arity(WordSize::Bits64), 3);
    assert!(read.validate().is_ok());
    assert!(read.superseded_after_call(&READ_RULES[1], WordSize::Bits64));
    assert!(!read.superseded_after_call(&READ_RULES[2], WordSize::Bits64));
  }

  #[test]
  fn abi_gated_rules_change_arity() {
    static RULES: [ArgRule; 3] = [
      ArgRule::inline(0, AbiSize::same(4), ArgType::SignedInt),
      ArgRule::inline(1, AbiSize::WORD, ArgType::Pointer),
      ArgRule::inline(2, AbiSize::WORD, ArgType::UnsignedInt).ilp32_only(),
    ];
    let desc = descriptor(&RULES);
    assert_eq!(desc.arity(WordSize::Bits32), 3);
    assert_eq!(desc.arity(WordSize::Bits64), 2);
    assert!(desc.validate().is_ok());
  }

  #[test]
  fn rejects_malformed_rules() {
    static GAP: [ArgRule; 2] = [
      ArgRule::inline(0, AbiSize::same(4), ArgType::SignedInt),
      ArgRule::inline(2, AbiSize::same(4), ArgType::SignedInt),
    ];
    assert!(matches!(
      descriptor(&GAP).validate(),
      Err(DescriptorError::OrdinalGap { ordinal: 2, .. })
    ));

    static DANGLING: [ArgRule; 1] =
      [ArgRule::new(0, SizeSpec::ArgValue(3), make_bitflags!(ArgFlags::{Read}), ArgType::Pointer)];
    assert!(matches!(
      descriptor(&DANGLING).validate(),
      Err(DescriptorError::DanglingReference { target: 3, .. })
    ));

    static READ_RET: [ArgRule; 1] =
      [ArgRule::new(0, SizeSpec::ReturnValue, make_bitflags!(ArgFlags::{Read}), ArgType::Pointer)];
    assert!(matches!(
      descriptor(&READ_RET).validate(),
      Err(DescriptorError::ReturnSizedNotWrite { .. })
    ));

    static DUP: [ArgRule; 2] = [
      ArgRule::inline(0, AbiSize::same(4), ArgType::SignedInt),
      ArgRule::inline(0, AbiSize::same(4), ArgType::SignedInt),
    ];
    assert!(matches!(
      descriptor(&DUP).validate(),
      Err(DescriptorError::DuplicateOrdinal { ordinal: 0, .. })
    ));
  }

  #[test]
  fn wide_returns_survive_normalization() {
    let narrow = ReturnType::new(ArgType::SignedInt);
    assert_eq!(narrow.normalize(0x1_0000_0005, WordSize::Bits32), 5);
    assert_eq!(narrow.normalize(-1, WordSize::Bits32), -1);
    assert_eq!(
      ReturnType::wide(ArgType::SignedInt).normalize(0x1_0000_0005, WordSize::Bits32),
      0x1_0000_0005
    );
  }

  #[test]
  fn availability_windows() {
    let reused = Availability {
      since: Some(MacOsVersion::Yosemite),
      removed_in: Some(MacOsVersion::Sierra),
    };
    assert!(!reused.admits(MacOsVersion::Mavericks));
    assert!(reused.admits(MacOsVersion::ElCapitan));
    assert!(!reused.admits(MacOsVersion::Sierra));
  }
}
