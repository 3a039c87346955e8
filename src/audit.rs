//! The pre-call and post-call hooks the instrumentation engine drives.

use std::fmt;

use log::{debug, warn};

use crate::{
  args::{SyscallArgs, SyscallReturn},
  config::AuditConfig,
  descriptor::SupportStatus,
  error::AuditError,
  memory::MemoryReader,
  regions::{MemoryRegion, RegionWalker},
  resolver::{Resolved, SyscallResolver},
  shadow::{ShadowFault, ShadowMemory},
  table::{self, DescriptorTable},
};

/// A region the kernel is about to read that the shadow tracker rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Finding {
  pub syscall: Resolved,
  pub ordinal: u8,
  pub address: u64,
  pub len: u64,
  pub fault: ShadowFault,
}

impl fmt::Display for Finding {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} argument {}: {} bytes at {:#x}: {}",
      self.syscall, self.ordinal, self.len, self.address, self.fault
    )
  }
}

/// What one hook did for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditReport {
  pub syscall: Resolved,
  /// Regions checked before the call or marked after it.
  pub regions: Vec<MemoryRegion>,
  /// Failed checks; always empty after the call.
  pub findings: Vec<Finding>,
}

impl AuditReport {
  pub fn is_clean(&self) -> bool {
    self.findings.is_empty()
  }
}

/// Checks and marks syscall argument memory against a shadow tracker.
///
/// The auditor keeps no state between the two hooks of a call, so threads trapping
/// calls concurrently can share one instance.
pub struct SyscallAuditor<S, M> {
  config: AuditConfig,
  resolver: SyscallResolver,
  shadow: S,
  memory: M,
}

impl<S: ShadowMemory, M: MemoryReader> SyscallAuditor<S, M> {
  /// Fails if a compiled-in descriptor is malformed.
  pub fn new(config: AuditConfig, shadow: S, memory: M) -> Result<Self, AuditError> {
    table::validate_all()?;
    let resolver = SyscallResolver::new(&config);
    debug!(
      "auditing {:?} with {} BSD descriptors",
      config.target,
      table::bsd_table().len()
    );
    Ok(Self {
      config,
      resolver,
      shadow,
      memory,
    })
  }

  /// Swap the BSD descriptor table, after validating it.
  pub fn with_bsd_table(mut self, table: &'static DescriptorTable) -> Result<Self, AuditError> {
    table.validate()?;
    debug!("auditing with {} custom BSD descriptors", table.len());
    self.resolver = self.resolver.with_bsd_table(table);
    Ok(self)
  }

  pub fn config(&self) -> &AuditConfig {
    &self.config
  }

  pub fn resolver(&self) -> &SyscallResolver {
    &self.resolver
  }

  pub fn shadow(&self) -> &S {
    &self.shadow
  }

  pub fn memory(&self) -> &M {
    &self.memory
  }

  fn walker(&self) -> RegionWalker<'_, M> {
    RegionWalker::new(&self.config.target, &self.config.limits, &self.memory)
  }

  fn resolve(&self, args: &impl SyscallArgs) -> Result<Option<Resolved>, AuditError> {
    let Some(resolved) = self.resolver.resolve(args)? else {
      return Ok(None);
    };
    if resolved.descriptor.status == SupportStatus::Unimplemented {
      debug!("{resolved}: argument rules not implemented, skipping");
      return Ok(None);
    }
    Ok(Some(resolved))
  }

  /// Check every region the kernel will read. Findings are reported, never fatal.
  pub fn on_sysenter(&self, args: &impl SyscallArgs) -> Result<Option<AuditReport>, AuditError> {
    let Some(syscall) = self.resolve(args)? else {
      return Ok(None);
    };
    let regions = self.walker().sysenter(syscall.descriptor, args)?;
    let findings = regions
      .iter()
      .filter_map(|region| {
        let fault = self
          .shadow
          .check_readable(region.address, region.len)
          .err()?;
        let finding = Finding {
          syscall,
          ordinal: region.ordinal,
          address: region.address,
          len: region.len,
          fault,
        };
        warn!("{finding}");
        Some(finding)
      })
      .collect();
    Ok(Some(AuditReport {
      syscall,
      regions,
      findings,
    }))
  }

  /// Mark every region the kernel wrote as defined.
  pub fn on_sysexit(
    &self,
    args: &impl SyscallArgs,
    ret: SyscallReturn,
  ) -> Result<Option<AuditReport>, AuditError> {
    let Some(syscall) = self.resolve(args)? else {
      return Ok(None);
    };
    let regions = self.walker().sysexit(syscall.descriptor, args, ret)?;
    for region in &regions {
      self.shadow.mark_defined(region.address, region.len);
    }
    Ok(Some(AuditReport {
      syscall,
      regions,
      findings: Vec::new(),
    }))
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use once_cell::sync::Lazy;

  use super::*;
  use crate::{
    args::RawArgs,
    descriptor::{SuccessCode, SupportStatus},
    memory::SnapshotMemory,
    resolver::DarwinTrap,
    target::{MacOsVersion, Target, WordSize},
  };

  mod fixture {
    #![allow(non_upper_case_globals, dead_code)]

    use sysaudit_macros::gen_syscall_table;

    use crate::types::*;

    gen_syscall_table! {
      pub static FIXTURE_SYSCALLS;
      pub enum FixtureSyscall;

      #[unimplemented]
      opaque = 1 -> int (buf: in [u8; len], len: size_t),
      report = 2 -> int (#[on_failure] status: out int, buf: out [u8; len], len: size_t),
      #[zero_fails]
      lookup = 3 -> int (buf: out [u8; len], len: size_t),
    }
  }

  static FIXTURE_TABLE: Lazy<DescriptorTable> =
    Lazy::new(|| DescriptorTable::new(&fixture::FIXTURE_SYSCALLS));

  #[derive(Default)]
  struct Marks {
    checked: Mutex<Vec<(u64, u64)>>,
    marked: Mutex<Vec<(u64, u64)>>,
  }

  impl ShadowMemory for Marks {
    fn check_readable(&self, address: u64, len: u64) -> Result<(), ShadowFault> {
      self.checked.lock().unwrap().push((address, len));
      Ok(())
    }

    fn mark_defined(&self, address: u64, len: u64) {
      self.marked.lock().unwrap().push((address, len));
    }
  }

  fn auditor() -> SyscallAuditor<Marks, SnapshotMemory> {
    let config = AuditConfig::new(Target::macos(MacOsVersion::Mojave, WordSize::Bits64));
    SyscallAuditor::new(config, Marks::default(), SnapshotMemory::new())
      .unwrap()
      .with_bsd_table(&FIXTURE_TABLE)
      .unwrap()
  }

  fn call(number: u32, args: &[u64]) -> RawArgs {
    RawArgs::new(DarwinTrap::Unix(number).encode(WordSize::Bits64), args)
  }

  #[test]
  fn unimplemented_calls_resolve_but_are_not_walked() {
    let auditor = auditor();
    let args = call(fixture::SYS_opaque, &[0x1000, 16]);
    let resolved = auditor.resolver().resolve(&args).unwrap().unwrap();
    assert_eq!(resolved.descriptor.status, SupportStatus::Unimplemented);

    assert_eq!(auditor.on_sysenter(&args), Ok(None));
    assert_eq!(auditor.on_sysexit(&args, SyscallReturn::success(0)), Ok(None));
    assert!(auditor.shadow().checked.lock().unwrap().is_empty());
    assert!(auditor.shadow().marked.lock().unwrap().is_empty());
    assert_eq!(auditor.resolver().unknown_count(), 0);
  }

  #[test]
  fn status_out_parameter_is_marked_on_failure() {
    let auditor = auditor();
    let args = call(fixture::SYS_report, &[0x1000, 0x2000, 16]);

    let failed = auditor
      .on_sysexit(&args, SyscallReturn::failure(5))
      .unwrap()
      .unwrap();
    let spans: Vec<_> = failed.regions.iter().map(|r| (r.ordinal, r.address, r.len)).collect();
    assert_eq!(spans, [(0, 0x1000, 4)]);
    assert_eq!(*auditor.shadow().marked.lock().unwrap(), [(0x1000, 4)]);

    let ok = auditor
      .on_sysexit(&args, SyscallReturn::success(0))
      .unwrap()
      .unwrap();
    let spans: Vec<_> = ok.regions.iter().map(|r| (r.ordinal, r.address, r.len)).collect();
    assert_eq!(spans, [(0, 0x1000, 4), (1, 0x2000, 16)]);
  }

  #[test]
  fn zero_return_fails_where_declared() {
    let auditor = auditor();
    let desc = FIXTURE_TABLE.by_name("lookup").unwrap();
    assert_eq!(desc.success, SuccessCode::ZeroFails);

    let args = call(fixture::SYS_lookup, &[0x3000, 8]);
    let zero = auditor
      .on_sysexit(&args, SyscallReturn::success(0))
      .unwrap()
      .unwrap();
    assert!(zero.regions.is_empty());

    let found = auditor
      .on_sysexit(&args, SyscallReturn::success(1))
      .unwrap()
      .unwrap();
    assert_eq!(found.regions.len(), 1);
    assert_eq!((found.regions[0].address, found.regions[0].len), (0x3000, 8));
    assert_eq!(*auditor.shadow().marked.lock().unwrap(), [(0x3000, 8)]);
  }

  #[test]
  fn findings_name_the_call_and_argument() {
    let finding = Finding {
      syscall: auditor()
        .resolver()
        .resolve(&call(fixture::SYS_report, &[0, 0, 0]))
        .unwrap()
        .unwrap(),
      ordinal: 1,
      address: 0x2000,
      len: 16,
      fault: ShadowFault::Undefined { offset: 3 },
    };
    assert!(finding.to_string().starts_with("report argument 1: 16 bytes at 0x2000: "));
  }
}
