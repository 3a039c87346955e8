//! C types named by the descriptor tables, with their sizes on each ABI.
//!
//! Types whose layout is identical on ILP32 and LP64 are spelled out as `repr(C)`
//! structs. The rest are uninhabited markers carrying both sizes.

#![allow(non_camel_case_types)]

use std::mem::size_of;

use crate::{descriptor::ArgType, target::AbiSize};

/// Size and classification of a C type as the audited process sees it.
pub trait CType {
  const SIZE: AbiSize;
  const KIND: ArgType;
}

macro_rules! abi_types {
  ($($(#[$meta:meta])* $ty:ident = ($ilp32:expr, $lp64:expr) as $kind:ident;)*) => {
    $(
      $(#[$meta])*
      #[derive(Debug, Clone, Copy, PartialEq, Eq)]
      pub enum $ty {}

      impl CType for $ty {
        const SIZE: AbiSize = AbiSize::new($ilp32, $lp64);
        const KIND: ArgType = ArgType::$kind;
      }
    )*
  };
}

macro_rules! impl_ctype {
  ($kind:ident => $($ty:ty),*) => {
    $(
      impl CType for $ty {
        const SIZE: AbiSize = AbiSize::same(size_of::<$ty>() as u32);
        const KIND: ArgType = ArgType::$kind;
      }
    )*
  };
}

abi_types! {
  void = (0, 0) as Void;
  short = (2, 2) as SignedInt;
  int = (4, 4) as SignedInt;
  uint = (4, 4) as UnsignedInt;
  long = (4, 8) as SignedInt;
  ulong = (4, 8) as UnsignedInt;
  size_t = (4, 8) as UnsignedInt;
  off_t = (8, 8) as SignedInt;
  pid_t = (4, 4) as SignedInt;
  id_t = (4, 4) as UnsignedInt;
  uid_t = (4, 4) as UnsignedInt;
  gid_t = (4, 4) as UnsignedInt;
  mode_t = (2, 2) as UnsignedInt;
  socklen_t = (4, 4) as UnsignedInt;
  sigset_t = (4, 4) as UnsignedInt;
  sem_t = (4, 4) as SignedInt;
  /// An untyped address.
  ptr = (4, 8) as Pointer;
  /// A NUL-terminated string; its length is found by scanning.
  cstr = (0, 0) as CString;
  /// A NULL-terminated array of string pointers.
  cstr_array = (4, 8) as CStringArray;
  handle = (4, 8) as Pointer;
  ulong_ptr = (4, 8) as UnsignedInt;

  timeval = (8, 16) as Struct;
  timespec = (8, 16) as Struct;
  itimerval = (16, 32) as Struct;
  rusage = (72, 144) as Struct;
  stat64 = (108, 144) as Struct;
  kevent = (20, 32) as Struct;
  msghdr = (28, 48) as Struct;
  iovec = (8, 16) as Struct;
  sockaddr = (16, 16) as Struct;
  siginfo_t = (64, 104) as Struct;
  /// The user-facing `struct sigaction`.
  sigaction = (12, 16) as Struct;
  /// The kernel-facing sigaction with the trampoline slot.
  __sigaction = (16, 24) as Struct;
  stack_t = (12, 24) as Struct;
  /// `struct mac` label buffer descriptor.
  mac = (8, 16) as Struct;
}

impl_ctype!(UnsignedInt => u8, u16, u32, u64);
impl_ctype!(SignedInt => i32, i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct timezone {
  pub tz_minuteswest: i32,
  pub tz_dsttime: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct rlimit {
  pub rlim_cur: u64,
  pub rlim_max: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct pollfd {
  pub fd: i32,
  pub events: i16,
  pub revents: i16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct attrlist {
  pub bitmapcount: u16,
  pub reserved: u16,
  pub commonattr: u32,
  pub volattr: u32,
  pub dirattr: u32,
  pub fileattr: u32,
  pub forkattr: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct kevent64_s {
  pub ident: u64,
  pub filter: i16,
  pub flags: u16,
  pub fflags: u32,
  pub data: i64,
  pub udata: u64,
  pub ext: [u64; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct shared_file_mapping_np {
  pub sfm_address: u64,
  pub sfm_size: u64,
  pub sfm_file_offset: u64,
  pub sfm_max_prot: u32,
  pub sfm_init_prot: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct statfs64 {
  pub f_bsize: u32,
  pub f_iosize: i32,
  pub f_blocks: u64,
  pub f_bfree: u64,
  pub f_bavail: u64,
  pub f_files: u64,
  pub f_ffree: u64,
  pub f_fsid: [i32; 2],
  pub f_owner: u32,
  pub f_type: u32,
  pub f_flags: u32,
  pub f_fssubtype: u32,
  pub f_fstypename: [u8; 16],
  pub f_mntonname: [u8; 1024],
  pub f_mntfromname: [u8; 1024],
  pub f_reserved: [u32; 8],
}

/// 128-bit host identifier written by `gethostuuid`.
pub type uuid_t = [u8; 16];

impl_ctype!(Struct => timezone, rlimit, pollfd, attrlist, kevent64_s, shared_file_mapping_np, statfs64, uuid_t);

#[cfg(test)]
mod tests {
  use super::*;
  use crate::target::WordSize;

  #[test]
  fn fixed_layouts_match_darwin() {
    assert_eq!(attrlist::SIZE, AbiSize::same(24));
    assert_eq!(statfs64::SIZE, AbiSize::same(2168));
    assert_eq!(shared_file_mapping_np::SIZE, AbiSize::same(32));
    assert_eq!(kevent64_s::SIZE, AbiSize::same(48));
    assert_eq!(<uuid_t as CType>::SIZE, AbiSize::same(16));
  }

  #[test]
  fn word_dependent_layouts() {
    assert_eq!(msghdr::SIZE.bytes(WordSize::Bits32), 28);
    assert_eq!(msghdr::SIZE.bytes(WordSize::Bits64), 48);
    assert_eq!(size_t::KIND, ArgType::UnsignedInt);
    assert_eq!(cstr::KIND, ArgType::CString);
  }
}
