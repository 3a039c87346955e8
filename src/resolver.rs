//! Mapping a trapped syscall number to its descriptor.

use std::{
  borrow::Cow,
  collections::{HashMap, HashSet},
  fmt,
  sync::Mutex,
};

use log::warn;

use crate::{
  args::SyscallArgs,
  config::AuditConfig,
  descriptor::SyscallDescriptor,
  error::AuditError,
  table::{bsd_table, usercall, DescriptorTable, UsercallOp, UsercallPrimary, UsercallRow},
  target::{MacOsVersion, OsVersion, Target, WindowsVersion, WordSize},
};

/// A raw Darwin trap number split into its class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DarwinTrap {
  Unix(u32),
  Mach(u32),
  MachineDependent(u32),
  Diagnostic(u32),
  /// No known class.
  Other(i64),
}

impl DarwinTrap {
  const CLASS_SHIFT: u32 = 24;
  const NUMBER_MASK: u64 = (1 << Self::CLASS_SHIFT) - 1;

  /// 64-bit processes carry the class in bits 24..32 (`0x2000000 | n` for BSD calls);
  /// 32-bit processes pass Mach traps as negative numbers.
  pub fn decode(raw: i64, word_size: WordSize) -> Self {
    match word_size {
      WordSize::Bits64 => {
        let bits = raw as u64;
        if bits >> 32 != 0 {
          return DarwinTrap::Other(raw);
        }
        let number = (bits & Self::NUMBER_MASK) as u32;
        match bits >> Self::CLASS_SHIFT {
          1 => DarwinTrap::Mach(number),
          2 => DarwinTrap::Unix(number),
          3 => DarwinTrap::MachineDependent(number),
          4 => DarwinTrap::Diagnostic(number),
          _ => DarwinTrap::Other(raw),
        }
      }
      WordSize::Bits32 => match i32::try_from(raw) {
        Ok(n) if n < 0 => DarwinTrap::Mach(n.unsigned_abs()),
        Ok(n) => DarwinTrap::Unix(n as u32),
        Err(_) => DarwinTrap::Other(raw),
      },
    }
  }

  /// The raw number a process of `word_size` traps with.
  pub fn encode(self, word_size: WordSize) -> i64 {
    let class = |class: i64, n: u32| match word_size {
      WordSize::Bits64 => (class << Self::CLASS_SHIFT) | n as i64,
      WordSize::Bits32 => n as i64,
    };
    match self {
      DarwinTrap::Unix(n) => class(2, n),
      DarwinTrap::Mach(n) => match word_size {
        WordSize::Bits64 => class(1, n),
        WordSize::Bits32 => -(n as i64),
      },
      DarwinTrap::MachineDependent(n) => class(3, n),
      DarwinTrap::Diagnostic(n) => class(4, n),
      DarwinTrap::Other(raw) => raw,
    }
  }
}

/// A call no table describes; each distinct one is reported once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnknownSyscall {
  Darwin {
    trap: DarwinTrap,
    version: MacOsVersion,
  },
  /// A primary trapped with a selector the version column lacks. Selectors wider
  /// than 16 bits are never valid and share the `None` key.
  Usercall {
    primary: UsercallPrimary,
    version: WindowsVersion,
    selector: Option<u16>,
  },
  Windows(i64),
}

impl fmt::Display for UnknownSyscall {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      UnknownSyscall::Darwin { trap, version } => write!(f, "{trap:?} on macOS {version:?}"),
      UnknownSyscall::Usercall {
        primary,
        version,
        selector: Some(selector),
      } => write!(f, "{primary} selector {selector:#x} on Windows {version}"),
      UnknownSyscall::Usercall {
        primary,
        version,
        selector: None,
      } => write!(f, "{primary} with an out-of-range selector on Windows {version}"),
      UnknownSyscall::Windows(number) => write!(f, "syscall {number:#x} on Windows"),
    }
  }
}

/// A trapped call matched to its descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
  pub descriptor: &'static SyscallDescriptor,
  /// The secondary operation, for multiplexed primaries.
  pub usercall: Option<&'static UsercallRow>,
}

impl Resolved {
  /// `read`, or `NtUserCallOneParam.LOADFONTS` for a secondary operation.
  pub fn name(&self) -> Cow<'static, str> {
    match self.usercall {
      Some(row) => Cow::Owned(row.to_string()),
      None => Cow::Borrowed(self.descriptor.name),
    }
  }

  pub fn operation(&self) -> Option<UsercallOp> {
    self.usercall.map(|row| row.op)
  }
}

impl fmt::Display for Resolved {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.usercall {
      Some(row) => fmt::Display::fmt(row, f),
      None => f.write_str(self.descriptor.name),
    }
  }
}

pub struct SyscallResolver {
  target: Target,
  bsd: &'static DescriptorTable,
  usercall_primaries: HashMap<i64, UsercallPrimary>,
  reported: Mutex<HashSet<UnknownSyscall>>,
}

impl SyscallResolver {
  pub fn new(config: &AuditConfig) -> Self {
    Self {
      target: config.target,
      bsd: bsd_table(),
      usercall_primaries: config.usercall_primaries().clone(),
      reported: Mutex::new(HashSet::new()),
    }
  }

  /// Resolve Unix traps against `table` instead of the compiled-in BSD table.
  pub fn with_bsd_table(mut self, table: &'static DescriptorTable) -> Self {
    self.bsd = table;
    self
  }

  pub fn target(&self) -> &Target {
    &self.target
  }

  pub fn bsd_table(&self) -> &'static DescriptorTable {
    self.bsd
  }

  /// Find the descriptor for the call `args` was captured from.
  ///
  /// Calls no table knows resolve to `Ok(None)`. An error means the engine did not
  /// capture what the table needs to tell calls apart.
  pub fn resolve(&self, args: &impl SyscallArgs) -> Result<Option<Resolved>, AuditError> {
    let raw = args.number();
    let found = match self.target.os {
      OsVersion::MacOs(version) => self.resolve_darwin(raw, version),
      OsVersion::Windows(version) => self.resolve_windows(raw, version, args)?,
    };
    match found {
      Ok(resolved) => Ok(Some(resolved)),
      Err(unknown) => {
        self.report_unknown(unknown);
        Ok(None)
      }
    }
  }

  fn resolve_darwin(&self, raw: i64, version: MacOsVersion) -> Result<Resolved, UnknownSyscall> {
    let trap = DarwinTrap::decode(raw, self.target.word_size);
    let unknown = UnknownSyscall::Darwin { trap, version };
    let DarwinTrap::Unix(number) = trap else {
      return Err(unknown);
    };
    let descriptor = self.bsd.by_number(number, version).ok_or(unknown)?;
    Ok(Resolved {
      descriptor,
      usercall: None,
    })
  }

  fn resolve_windows(
    &self,
    raw: i64,
    version: WindowsVersion,
    args: &impl SyscallArgs,
  ) -> Result<Result<Resolved, UnknownSyscall>, AuditError> {
    let Some(&primary) = self.usercall_primaries.get(&raw) else {
      return Ok(Err(UnknownSyscall::Windows(raw)));
    };
    let selector = args
      .arg(primary.selector_ordinal() as usize)
      .ok_or(AuditError::MissingSelector { primary })?;
    Ok(
      match usercall::table().resolve(primary, version, selector) {
        Some(row) => Ok(Resolved {
          descriptor: primary.descriptor(),
          usercall: Some(row),
        }),
        None => Err(UnknownSyscall::Usercall {
          primary,
          version,
          selector: u16::try_from(selector).ok(),
        }),
      },
    )
  }

  fn report_unknown(&self, unknown: UnknownSyscall) {
    let first = match self.reported.lock() {
      Ok(mut reported) => reported.insert(unknown),
      Err(poisoned) => poisoned.into_inner().insert(unknown),
    };
    if first {
      warn!("unknown syscall: {unknown}");
    }
  }

  /// Distinct unknown calls seen so far.
  pub fn unknown_count(&self) -> usize {
    match self.reported.lock() {
      Ok(reported) => reported.len(),
      Err(poisoned) => poisoned.into_inner().len(),
    }
  }
}
