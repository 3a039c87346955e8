//! Compiled-in descriptor tables and their lookup indexes.

use std::collections::HashMap;

use itertools::Itertools;
use once_cell::sync::Lazy;

use crate::{descriptor::SyscallDescriptor, error::DescriptorError, target::MacOsVersion};

pub mod bsd;
pub mod usercall;

pub use bsd::{BsdSyscall, BSD_SYSCALLS};
pub use usercall::{UsercallOp, UsercallPrimary, UsercallRow, UsercallTable};

/// BSD descriptors indexed by number and by name.
///
/// A number may carry more than one descriptor when a release reassigned it; the
/// candidates are kept in declaration order and told apart by their availability.
pub struct DescriptorTable {
  descriptors: &'static [SyscallDescriptor],
  by_number: HashMap<u32, Vec<&'static SyscallDescriptor>>,
  by_name: HashMap<&'static str, &'static SyscallDescriptor>,
}

static BSD_TABLE: Lazy<DescriptorTable> = Lazy::new(|| DescriptorTable::new(&BSD_SYSCALLS));

pub fn bsd_table() -> &'static DescriptorTable {
  &BSD_TABLE
}

impl DescriptorTable {
  /// Index `descriptors`. Keep the result in a static to hand it to a resolver.
  pub fn new(descriptors: &'static [SyscallDescriptor]) -> Self {
    let by_number = descriptors
      .iter()
      .filter_map(|desc| Some((desc.number()?, desc)))
      .into_group_map();
    let by_name = descriptors.iter().map(|desc| (desc.name, desc)).collect();
    Self {
      descriptors,
      by_number,
      by_name,
    }
  }

  /// The descriptor `number` denotes on `version`.
  pub fn by_number(&self, number: u32, version: MacOsVersion) -> Option<&'static SyscallDescriptor> {
    self
      .candidates(number)
      .iter()
      .find(|desc| desc.availability.admits(version))
      .copied()
  }

  /// Every descriptor ever assigned `number`, regardless of release.
  pub fn candidates(&self, number: u32) -> &[&'static SyscallDescriptor] {
    self
      .by_number
      .get(&number)
      .map(Vec::as_slice)
      .unwrap_or_default()
  }

  pub fn by_name(&self, name: &str) -> Option<&'static SyscallDescriptor> {
    self.by_name.get(name).copied()
  }

  pub fn iter(&self) -> impl Iterator<Item = &'static SyscallDescriptor> {
    self.descriptors.iter()
  }

  pub fn len(&self) -> usize {
    self.descriptors.len()
  }

  pub fn is_empty(&self) -> bool {
    self.descriptors.is_empty()
  }

  /// Check every descriptor in this table.
  pub fn validate(&self) -> Result<(), DescriptorError> {
    self.iter().try_for_each(SyscallDescriptor::validate)
  }
}

/// Check the BSD table and the usercall primaries.
pub fn validate_all() -> Result<(), DescriptorError> {
  bsd_table().validate()?;
  UsercallPrimary::ALL
    .into_iter()
    .try_for_each(|primary| primary.descriptor().validate())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    descriptor::{ArgFlags, SizeSpec, SupportStatus},
    target::{AbiSize, WordSize},
  };

  #[test]
  fn compiled_tables_are_well_formed() {
    if let Err(e) = validate_all() {
      panic!("{e}");
    }
  }

  #[test]
  fn numbers_and_names_agree() {
    let table = bsd_table();
    assert_eq!(table.len(), BsdSyscall::ALL.len());
    for syscall in BsdSyscall::ALL {
      let desc = syscall.descriptor();
      assert_eq!(desc.name, syscall.name());
      assert_eq!(desc.number(), Some(syscall.number()));
      assert_eq!(table.by_name(syscall.name()), Some(desc));
    }
    assert_eq!(bsd::SYS_read, 3);
    assert_eq!(bsd::SYS___sysctl, 202);
  }

  #[test]
  fn reused_number_depends_on_release() {
    let table = bsd_table();
    assert_eq!(table.candidates(274).len(), 2);
    assert_eq!(
      table.by_number(274, MacOsVersion::Mavericks).map(|d| d.name),
      Some("sem_getvalue")
    );
    for version in [MacOsVersion::Yosemite, MacOsVersion::Mojave] {
      assert_eq!(
        table.by_number(274, version).map(|d| d.name),
        Some("sysctlbyname")
      );
    }
  }

  #[test]
  fn removed_syscalls_stop_resolving() {
    let table = bsd_table();
    assert!(table.by_number(394, MacOsVersion::Yosemite).is_some());
    assert!(table.by_number(394, MacOsVersion::ElCapitan).is_none());
    assert!(table.by_number(185, MacOsVersion::ElCapitan).is_some());
    assert!(table.by_number(185, MacOsVersion::Sierra).is_none());
    assert!(table.by_number(9999, MacOsVersion::LATEST).is_none());
    assert!(table.candidates(9999).is_empty());
  }

  #[test]
  fn read_shape() {
    let read = BsdSyscall::Read.descriptor();
    assert_eq!(read.arity(WordSize::Bits64), 3);
    let buf: Vec<_> = read.args.iter().filter(|rule| rule.ordinal == 1).collect();
    assert_eq!(buf.len(), 2);
    assert_eq!(buf[0].size, SizeSpec::ArgValue(2));
    assert_eq!(buf[1].size, SizeSpec::ReturnValue);
    assert!(buf.iter().all(|rule| rule.writes() && !rule.reads()));
    assert_eq!(read.args[0].size, SizeSpec::Inline(AbiSize::same(4)));
  }

  #[test]
  fn element_counted_buffers() {
    let getgroups = BsdSyscall::Getgroups.descriptor();
    let gidset = getgroups.primary_rule(1, WordSize::Bits64).unwrap();
    assert!(gidset.flags.contains(ArgFlags::SizeInElements | ArgFlags::HasType));
    assert_eq!(gidset.elem_size, AbiSize::same(4));

    let socketpair = BsdSyscall::Socketpair.descriptor();
    let rsv = socketpair.primary_rule(3, WordSize::Bits32).unwrap();
    assert_eq!(rsv.size, SizeSpec::Fixed(AbiSize::same(2)));
  }

  #[test]
  fn abi_specific_arity() {
    let attr = BsdSyscall::Getdirentriesattr.descriptor();
    assert_eq!(attr.arity(WordSize::Bits32), 8);
    assert_eq!(attr.arity(WordSize::Bits64), 6);
    let kevent64 = BsdSyscall::Kevent64.descriptor();
    assert_eq!(kevent64.arity(WordSize::Bits32), 7);
    assert_eq!(kevent64.arity(WordSize::Bits64), 6);
  }

  #[test]
  fn statuses_and_wide_returns() {
    assert_eq!(
      BsdSyscall::PosixSpawn.descriptor().status,
      SupportStatus::UnknownBehavior
    );
    assert_eq!(BsdSyscall::Write.descriptor().status, SupportStatus::Supported);
    assert!(BsdSyscall::Lseek.descriptor().ret.wide);
    assert!(BsdSyscall::ThreadSelfid.descriptor().ret.wide);
    assert!(!BsdSyscall::Read.descriptor().ret.wide);
  }
}
