mod common;

use std::{sync::Arc, thread};

use common::{bsd32, bsd64, init_logging, RecordingShadow};
use sysaudit::{
  table::bsd, Access, ArgType, AuditConfig, AuditError, MacOsVersion, RawArgs, ShadowFault,
  SnapshotMemory, SyscallAuditor, SyscallReturn, Target, WordSize,
};

fn macos64() -> AuditConfig {
  AuditConfig::new(Target::macos(MacOsVersion::Mojave, WordSize::Bits64))
}

fn auditor(
  config: AuditConfig,
  shadow: RecordingShadow,
  memory: SnapshotMemory,
) -> SyscallAuditor<RecordingShadow, SnapshotMemory> {
  init_logging();
  SyscallAuditor::new(config, shadow, memory).unwrap()
}

#[test]
fn read_marks_only_what_was_returned() {
  let auditor = auditor(macos64(), RecordingShadow::new(), SnapshotMemory::new());
  let args = RawArgs::new(bsd64(bsd::SYS_read), &[3, 0x1000, 10]);

  let pre = auditor.on_sysenter(&args).unwrap().unwrap();
  assert_eq!(pre.syscall.name(), "read");
  assert!(pre.regions.is_empty());
  assert!(auditor.shadow().checked().is_empty());

  let post = auditor
    .on_sysexit(&args, SyscallReturn::success(7))
    .unwrap()
    .unwrap();
  assert_eq!(post.regions.len(), 1);
  let region = post.regions[0];
  assert_eq!((region.address, region.len), (0x1000, 7));
  assert_eq!(region.access, Access::Write);
  assert_eq!(auditor.shadow().marked(), [(0x1000, 7)]);
}

#[test]
fn failed_read_marks_nothing() {
  let auditor = auditor(macos64(), RecordingShadow::new(), SnapshotMemory::new());
  let args = RawArgs::new(bsd64(bsd::SYS_read), &[3, 0x1000, 10]);
  let post = auditor
    .on_sysexit(&args, SyscallReturn::failure(9))
    .unwrap()
    .unwrap();
  assert!(post.regions.is_empty());
  let eof = auditor
    .on_sysexit(&args, SyscallReturn::success(0))
    .unwrap()
    .unwrap();
  assert!(eof.regions.is_empty());
  assert!(auditor.shadow().marked().is_empty());
}

#[test]
fn write_checks_the_whole_buffer() {
  let auditor = auditor(macos64(), RecordingShadow::new(), SnapshotMemory::new());
  let args = RawArgs::new(bsd64(bsd::SYS_write), &[1, 0x2000, 5]);

  let pre = auditor.on_sysenter(&args).unwrap().unwrap();
  assert_eq!(pre.regions.len(), 1);
  assert_eq!((pre.regions[0].address, pre.regions[0].len), (0x2000, 5));
  assert_eq!(pre.regions[0].access, Access::Read);
  assert!(pre.is_clean());
  assert_eq!(auditor.shadow().checked(), [(0x2000, 5)]);

  let post = auditor
    .on_sysexit(&args, SyscallReturn::success(5))
    .unwrap()
    .unwrap();
  assert!(post.regions.is_empty());
}

#[test]
fn undefined_bytes_become_findings() {
  let shadow = RecordingShadow::new().with_undefined(0x2003, 1);
  let auditor = auditor(macos64(), shadow, SnapshotMemory::new());
  let args = RawArgs::new(bsd64(bsd::SYS_write), &[1, 0x2000, 5]);
  let pre = auditor.on_sysenter(&args).unwrap().unwrap();
  assert_eq!(pre.findings.len(), 1);
  let finding = pre.findings[0];
  assert_eq!(finding.ordinal, 1);
  assert_eq!((finding.address, finding.len), (0x2000, 5));
  assert_eq!(finding.fault, ShadowFault::Undefined { offset: 3 });
  assert!(finding.to_string().starts_with("write argument 1: 5 bytes at 0x2000"));
}

#[test]
fn unknown_syscall_is_ignored() {
  let auditor = auditor(macos64(), RecordingShadow::new(), SnapshotMemory::new());
  let args = RawArgs::new(bsd64(9999), &[1, 2, 3]);
  assert_eq!(auditor.on_sysenter(&args), Ok(None));
  assert_eq!(
    auditor.on_sysexit(&args, SyscallReturn::success(0)),
    Ok(None)
  );
  assert_eq!(auditor.resolver().unknown_count(), 1);
  assert!(auditor.shadow().checked().is_empty());
  assert!(auditor.shadow().marked().is_empty());
}

#[test]
fn arity_skew_is_fatal() {
  let auditor = auditor(macos64(), RecordingShadow::new(), SnapshotMemory::new());
  let args = RawArgs::new(bsd64(bsd::SYS_write), &[1, 0x2000]);
  assert_eq!(
    auditor.on_sysenter(&args),
    Err(AuditError::ArityMismatch {
      name: "write",
      expected: 3,
      actual: 2
    })
  );
}

#[test]
fn extra_captured_arguments_are_fatal() {
  let config = AuditConfig::new(Target::macos(MacOsVersion::Mojave, WordSize::Bits32));
  let auditor32 = auditor(config, RecordingShadow::new(), SnapshotMemory::new());
  let nine = [3, 0x1000, 0x2000, 64, 0x3000, 0x3008, 0x3010, 0, 0];
  let args = RawArgs::new(bsd32(bsd::SYS_getdirentriesattr), &nine);
  assert_eq!(
    auditor32.on_sysenter(&args),
    Err(AuditError::ArityMismatch {
      name: "getdirentriesattr",
      expected: 8,
      actual: 9
    })
  );
  assert!(auditor32
    .on_sysexit(&args, SyscallReturn::success(0))
    .is_err());

  let auditor64 = auditor(macos64(), RecordingShadow::new(), SnapshotMemory::new());
  let args = RawArgs::new(bsd64(bsd::SYS_write), &[1; 12]);
  assert_eq!(
    auditor64.on_sysenter(&args),
    Err(AuditError::ArityMismatch {
      name: "write",
      expected: 3,
      actual: 12
    })
  );
  assert!(auditor64.shadow().checked().is_empty());
}

#[test]
fn getdirentriesattr_arity_depends_on_abi() {
  let eight = [3, 0x1000, 0x2000, 64, 0x3000, 0x3008, 0x3010, 0];
  let auditor64 = auditor(macos64(), RecordingShadow::new(), SnapshotMemory::new());
  let args = RawArgs::new(bsd64(bsd::SYS_getdirentriesattr), &eight);
  assert!(matches!(
    auditor64.on_sysenter(&args),
    Err(AuditError::ArityMismatch {
      expected: 6,
      actual: 8,
      ..
    })
  ));
  let args = RawArgs::new(bsd64(bsd::SYS_getdirentriesattr), &eight[..6]);
  assert!(auditor64.on_sysenter(&args).is_ok());

  let config = AuditConfig::new(Target::macos(MacOsVersion::Mojave, WordSize::Bits32));
  let auditor32 = auditor(config, RecordingShadow::new(), SnapshotMemory::new());
  let args = RawArgs::new(bsd32(bsd::SYS_getdirentriesattr), &eight);
  let post = auditor32
    .on_sysexit(&args, SyscallReturn::success(0))
    .unwrap()
    .unwrap();
  let ordinals: Vec<_> = post.regions.iter().map(|r| r.ordinal).collect();
  assert_eq!(ordinals, [2, 4, 5, 6]);
}

#[test]
fn reused_number_follows_release() {
  let name = |version| {
    let config = AuditConfig::new(Target::macos(version, WordSize::Bits64));
    let auditor = auditor(config, RecordingShadow::new(), SnapshotMemory::new());
    let args = RawArgs::new(bsd64(274), &[0, 0]);
    auditor
      .resolver()
      .resolve(&args)
      .unwrap()
      .map(|resolved| resolved.descriptor.name)
  };
  assert_eq!(name(MacOsVersion::Mavericks), Some("sem_getvalue"));
  assert_eq!(name(MacOsVersion::Yosemite), Some("sysctlbyname"));
  assert_eq!(name(MacOsVersion::Mojave), Some("sysctlbyname"));
}

#[test]
fn sysctl_old_buffer_sized_by_length_word() {
  let memory = SnapshotMemory::new().with_segment(0x5000, 64u64.to_le_bytes().to_vec());
  let auditor = auditor(macos64(), RecordingShadow::new(), memory);
  let args = RawArgs::new(bsd64(bsd::SYS___sysctl), &[0x3000, 2, 0x4000, 0x5000, 0, 0]);

  let pre = auditor.on_sysenter(&args).unwrap().unwrap();
  let spans: Vec<_> = pre.regions.iter().map(|r| (r.ordinal, r.address, r.len)).collect();
  assert_eq!(spans, [(0, 0x3000, 8), (3, 0x5000, 8)]);

  let post = auditor
    .on_sysexit(&args, SyscallReturn::success(0))
    .unwrap()
    .unwrap();
  let spans: Vec<_> = post.regions.iter().map(|r| (r.ordinal, r.address, r.len)).collect();
  assert_eq!(spans, [(2, 0x4000, 64), (3, 0x5000, 8)]);
}

#[test]
fn sysctl_without_length_word_skips_old_buffer() {
  let auditor = auditor(macos64(), RecordingShadow::new(), SnapshotMemory::new());
  let args = RawArgs::new(bsd64(bsd::SYS___sysctl), &[0x3000, 2, 0x4000, 0, 0, 0]);
  let post = auditor
    .on_sysexit(&args, SyscallReturn::success(0))
    .unwrap()
    .unwrap();
  assert!(post.regions.is_empty());
}

#[test]
fn getgroups_counts_elements() {
  let auditor = auditor(macos64(), RecordingShadow::new(), SnapshotMemory::new());
  let args = RawArgs::new(bsd64(bsd::SYS_getgroups), &[16, 0x4000]);
  let post = auditor
    .on_sysexit(&args, SyscallReturn::success(3))
    .unwrap()
    .unwrap();
  assert_eq!(post.regions.len(), 1);
  assert_eq!((post.regions[0].address, post.regions[0].len), (0x4000, 12));
  assert_eq!(post.regions[0].kind, ArgType::UnsignedInt);

  let args = RawArgs::new(bsd64(bsd::SYS_setgroups), &[5, 0x4000]);
  let pre = auditor.on_sysenter(&args).unwrap().unwrap();
  assert_eq!(pre.regions[0].len, 20);
}

#[test]
fn paths_are_scanned_to_their_nul() {
  let memory = SnapshotMemory::new().with_segment(0x6000, b"/etc/hosts\0garbage".to_vec());
  let auditor = auditor(macos64(), RecordingShadow::new(), memory);
  let args = RawArgs::new(bsd64(bsd::SYS_open), &[0x6000, 0, 0]);
  let pre = auditor.on_sysenter(&args).unwrap().unwrap();
  assert_eq!(pre.regions.len(), 1);
  assert_eq!((pre.regions[0].address, pre.regions[0].len), (0x6000, 11));
  assert_eq!(pre.regions[0].kind, ArgType::CString);
}

#[test]
fn execve_walks_argv_and_envp() {
  let mut argv = Vec::new();
  for ptr in [0x7100u64, 0x7200, 0] {
    argv.extend(ptr.to_le_bytes());
  }
  let memory = SnapshotMemory::new()
    .with_segment(0x7000, b"/bin/ls\0".to_vec())
    .with_segment(0x7100, b"ls\0".to_vec())
    .with_segment(0x7200, b"-l\0".to_vec())
    .with_segment(0x8000, argv)
    .with_segment(0x9000, 0u64.to_le_bytes().to_vec());
  let auditor = auditor(macos64(), RecordingShadow::new(), memory);
  let args = RawArgs::new(bsd64(bsd::SYS_execve), &[0x7000, 0x8000, 0x9000]);
  let pre = auditor.on_sysenter(&args).unwrap().unwrap();
  let spans: Vec<_> = pre.regions.iter().map(|r| (r.ordinal, r.address, r.len)).collect();
  assert_eq!(
    spans,
    [
      (0, 0x7000, 8),
      (1, 0x8000, 24),
      (1, 0x7100, 3),
      (1, 0x7200, 3),
      (2, 0x9000, 8),
    ]
  );
}

#[test]
fn narrow_return_values_are_sign_extended() {
  let config = AuditConfig::new(Target::macos(MacOsVersion::Mojave, WordSize::Bits32));
  let auditor = auditor(config, RecordingShadow::new(), SnapshotMemory::new());
  let args = RawArgs::new(bsd32(bsd::SYS_read), &[3, 0x1000, 10]);
  let post = auditor
    .on_sysexit(&args, SyscallReturn::success(0xffff_ffff))
    .unwrap()
    .unwrap();
  assert!(post.regions.is_empty());
}

#[test]
fn concurrent_calls_are_independent() {
  let auditor = Arc::new(auditor(macos64(), RecordingShadow::new(), SnapshotMemory::new()));
  thread::scope(|scope| {
    for t in 0..8u64 {
      let auditor = Arc::clone(&auditor);
      scope.spawn(move || {
        for i in 0..50u64 {
          let buf = 0x10_0000 * (t + 1) + i * 0x100;
          let read = RawArgs::new(bsd64(bsd::SYS_read), &[3, buf, 0x80]);
          assert!(auditor.on_sysenter(&read).unwrap().unwrap().regions.is_empty());
          let post = auditor
            .on_sysexit(&read, SyscallReturn::success(0x40))
            .unwrap()
            .unwrap();
          assert_eq!((post.regions[0].address, post.regions[0].len), (buf, 0x40));
          let write = RawArgs::new(bsd64(bsd::SYS_write), &[1, buf, 0x40]);
          assert!(auditor.on_sysenter(&write).unwrap().unwrap().is_clean());
        }
      });
    }
  });
  assert_eq!(auditor.shadow().marked().len(), 8 * 50);
  assert_eq!(auditor.shadow().checked().len(), 8 * 50);
}
