//! Windows `NtUserCall*` secondary dispatch.
//!
//! Each primary is a single kernel entry whose last argument selects one of many
//! operations. Selector values are renumbered between releases, so a lookup is only
//! meaningful within one version column.

use std::{collections::HashMap, fmt, str::FromStr};

use itertools::Itertools;
use once_cell::sync::Lazy;
use paste::paste;

use crate::{
  descriptor::{
    ArgRule, ArgType, Availability, ReturnType, SuccessCode, SupportStatus, SyscallDescriptor,
    SyscallKey,
  },
  target::{ParseTargetError, WindowsVersion},
  types::{handle, uint, ulong_ptr, CType},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UsercallPrimary {
  NtUserCallNoParam,
  NtUserCallOneParam,
  NtUserCallHwnd,
  NtUserCallHwndOpt,
  NtUserCallHwndParam,
  NtUserCallHwndLock,
  NtUserCallHwndParamLock,
  NtUserCallTwoParam,
}

impl UsercallPrimary {
  pub const ALL: [UsercallPrimary; 8] = [
    UsercallPrimary::NtUserCallNoParam,
    UsercallPrimary::NtUserCallOneParam,
    UsercallPrimary::NtUserCallHwnd,
    UsercallPrimary::NtUserCallHwndOpt,
    UsercallPrimary::NtUserCallHwndParam,
    UsercallPrimary::NtUserCallHwndLock,
    UsercallPrimary::NtUserCallHwndParamLock,
    UsercallPrimary::NtUserCallTwoParam,
  ];

  pub fn descriptor(self) -> &'static SyscallDescriptor {
    &PRIMARY_DESCRIPTORS[self as usize]
  }

  pub fn name(self) -> &'static str {
    self.descriptor().name
  }

  /// The selector is always the last argument.
  pub fn selector_ordinal(self) -> u8 {
    self
      .descriptor()
      .args
      .last()
      .map_or(0, |rule| rule.ordinal)
  }
}

impl fmt::Display for UsercallPrimary {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for UsercallPrimary {
  type Err = ParseTargetError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|primary| primary.name().eq_ignore_ascii_case(s))
      .ok_or_else(|| ParseTargetError::new("usercall primary", s))
  }
}

macro_rules! primary {
  ($primary:ident($($ordinal:literal: $ty:ty),*)) => {
    SyscallDescriptor {
      key: SyscallKey::Usercall(UsercallPrimary::$primary),
      name: stringify!($primary),
      status: SupportStatus::Supported,
      success: SuccessCode::NeverFails,
      ret: ReturnType::new(ArgType::UnsignedInt),
      availability: Availability::ALWAYS,
      args: &[$(ArgRule::inline($ordinal, <$ty as CType>::SIZE, <$ty as CType>::KIND)),*],
    }
  };
}

static PRIMARY_DESCRIPTORS: [SyscallDescriptor; 8] = [
  primary!(NtUserCallNoParam(0: uint)),
  primary!(NtUserCallOneParam(0: ulong_ptr, 1: uint)),
  primary!(NtUserCallHwnd(0: handle, 1: uint)),
  primary!(NtUserCallHwndOpt(0: handle, 1: uint)),
  primary!(NtUserCallHwndParam(0: handle, 1: ulong_ptr, 2: uint)),
  primary!(NtUserCallHwndLock(0: handle, 1: uint)),
  primary!(NtUserCallHwndParamLock(0: handle, 1: ulong_ptr, 2: uint)),
  primary!(NtUserCallTwoParam(0: ulong_ptr, 1: ulong_ptr, 2: uint)),
];

/// One secondary operation and its selector value in every version column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UsercallRow {
  pub op: UsercallOp,
  pub primary: UsercallPrimary,
  pub name: &'static str,
  numbers: [Option<u16>; WindowsVersion::COLUMNS],
}

impl UsercallRow {
  /// The selector for this operation on `version`, or `None` where the release lacks it.
  pub fn selector(&self, version: WindowsVersion) -> Option<u16> {
    self.numbers[version.column()]
  }

  pub fn versions(&self) -> impl Iterator<Item = (WindowsVersion, u16)> + '_ {
    WindowsVersion::ALL
      .into_iter()
      .filter_map(|version| Some((version, self.selector(version)?)))
  }
}

impl fmt::Display for UsercallRow {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}", self.primary, self.name)
  }
}

macro_rules! usercall_table {
  (@col NONE) => { None };
  (@col $n:literal) => { Some($n) };
  ($($primary:ident, $name:ident, $($col:tt),+;)*) => {
    paste! {
      /// Stable identifier of a secondary operation, independent of its selector value.
      #[allow(non_camel_case_types)]
      #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
      #[repr(u16)]
      pub enum UsercallOp {
        $([<$primary _ $name>],)*
      }

      static USERCALL_ROWS: &[UsercallRow] = &[
        $(
          UsercallRow {
            op: UsercallOp::[<$primary _ $name>],
            primary: UsercallPrimary::$primary,
            name: stringify!($name),
            numbers: [$(usercall_table!(@col $col)),+],
          },
        )*
      ];
    }
  };
}

// primary, secondary, w2k, xp, 2003, vista-sp01, vista-sp2, w7, w8, w81, w10, w11, w12, w13, w14, w15
usercall_table! {
  NtUserCallNoParam,       CREATEMENU,                        NONE, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00;
  NtUserCallNoParam,       CREATEMENUPOPUP,                   NONE, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01;
  NtUserCallNoParam,       DISABLEPROCWNDGHSTING,             NONE, 0x02, 0x02, 0x06, 0x07, 0x07, 0x06, 0x06, 0x06, 0x06, 0x06, 0x07, 0x07, 0x07;
  NtUserCallNoParam,       MSQCLEARWAKEMASK,                  NONE, 0x03, 0x03, 0x03, 0x03, 0x03, 0x03, 0x03, 0x03, 0x03, 0x03, 0x03, 0x03, 0x03;
  NtUserCallNoParam,       ALLOWFOREGNDACTIVATION,            NONE, 0x04, 0x04, 0x02, 0x02, 0x02, 0x02, 0x02, 0x02, 0x02, 0x02, 0x02, 0x02, 0x02;
  NtUserCallNoParam,       CREATESYSTEMTHREADS,               NONE, NONE, NONE, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04, 0x05, 0x05, 0x05;
  NtUserCallNoParam,       DESKTOPHASWATERMARK,               NONE, NONE, NONE, NONE, 0x05, 0x05, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE;
  NtUserCallNoParam,       DESTROY_CARET,                     NONE, 0x05, 0x05, 0x05, 0x06, 0x06, 0x05, 0x05, 0x05, 0x05, 0x05, 0x06, 0x06, 0x06;
  NtUserCallNoParam,       GETDEVICECHANGEINFO,               NONE, 0x06, 0x06, 0x07, 0x08, 0x08, 0x07, 0x07, 0x07, 0x07, 0x07, 0x08, 0x08, 0x08;
  NtUserCallNoParam,       GETIMESHOWSTATUS,                  NONE, 0x07, 0x07, 0x08, 0x09, 0x09, 0x08, 0x08, 0x08, 0x08, 0x08, 0x0a, 0x0a, 0x0a;
  NtUserCallNoParam,       GETINPUTDESKTOP,                   NONE, 0x08, 0x08, 0x09, 0x0a, 0x0a, 0x09, 0x09, 0x09, 0x09, 0x09, 0x0b, 0x0b, 0x0b;
  NtUserCallNoParam,       GETMESSAGEPOS,                     NONE, 0x09, 0x09, 0x0a, 0x0b, 0x0b, 0x0a, 0x0a, 0x0a, 0x0a, 0x0a, 0x0c, 0x0c, 0x0c;
  NtUserCallNoParam,       GETREMOTEPROCID,                   NONE, 0x0a, 0x0a, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE;
  NtUserCallNoParam,       GETUNPREDICTEDMESSAGEPOS,          NONE, NONE, NONE, NONE, NONE, NONE, 0x0b, 0x0b, 0x0b, 0x0b, 0x0b, 0x0e, 0x0e, 0x0e;
  NtUserCallNoParam,       HIDECURSORNOCAPTURE,               NONE, 0x0b, 0x0b, 0x0c, 0x0d, 0x0d, 0x0c, 0x0c, 0x0c, 0x0c, 0x0c, 0x0f, 0x0f, 0x0f;
  NtUserCallNoParam,       LOADCURSANDICOS,                   NONE, 0x0c, 0x0c, 0x0d, 0x0e, 0x0e, 0x0d, 0x0d, 0x0d, 0x0d, 0x0d, 0x12, 0x12, 0x12;
  NtUserCallNoParam,       ISQUEUEATTACHED,                   NONE, NONE, NONE, NONE, NONE, NONE, 0x0e, 0x0e, 0x0e, 0x0e, 0x0e, 0x11, 0x11, 0x11;
  NtUserCallNoParam,       PREPAREFORLOGOFF,                  NONE, NONE, NONE, 0x0f, 0x10, 0x10, 0x11, 0x11, 0x11, 0x11, 0x11, 0x14, 0x14, 0x14;
  NtUserCallNoParam,       RELEASECAPTURE,                    NONE, 0x0d, 0x0d, 0x10, 0x11, 0x11, 0x12, 0x12, 0x12, 0x12, 0x12, 0x16, 0x16, 0x16;
  NtUserCallNoParam,       RESETDBLCLICK,                     NONE, 0x0e, 0x0e, 0x11, 0x12, 0x12, 0x13, 0x13, 0x13, 0x13, 0x13, 0x17, 0x17, 0x17;
  NtUserCallNoParam,       ZAPACTIVEANDFOUS,                  NONE, 0x0f, 0x0f, 0x12, 0x13, 0x13, 0x14, 0x14, 0x14, 0x14, 0x14, 0x18, 0x18, 0x18;
  NtUserCallNoParam,       REMOTECONSHDWSTOP,                 NONE, 0x10, 0x10, 0x13, 0x14, 0x14, 0x15, 0x15, 0x15, 0x15, 0x15, 0x19, 0x19, 0x19;
  NtUserCallNoParam,       REMOTEDISCONNECT,                  NONE, 0x11, 0x11, 0x14, 0x15, 0x15, 0x16, 0x16, 0x16, 0x16, 0x16, 0x1a, 0x1a, 0x1a;
  NtUserCallNoParam,       REMOTELOGOFF,                      NONE, 0x12, 0x12, 0x15, 0x16, 0x16, 0x17, 0x17, 0x17, 0x17, 0x17, 0x1b, 0x1b, 0x1b;
  NtUserCallNoParam,       REMOTENTSECURITY,                  NONE, 0x13, 0x13, 0x16, 0x17, 0x17, 0x18, 0x18, 0x18, 0x18, 0x18, 0x1c, 0x1c, 0x1c;
  NtUserCallNoParam,       REMOTESHDWSETUP,                   NONE, 0x14, 0x14, 0x17, 0x18, 0x18, 0x19, 0x19, 0x19, 0x19, 0x19, 0x1d, 0x1d, 0x1d;
  NtUserCallNoParam,       REMOTESHDWSTOP,                    NONE, 0x15, 0x15, 0x18, 0x19, 0x19, 0x1a, 0x1a, 0x1a, 0x1a, 0x1a, 0x1e, 0x1e, 0x1e;
  NtUserCallNoParam,       REMOTEPASSTHRUENABLE,              NONE, 0x16, 0x16, 0x19, 0x1a, 0x1a, 0x1b, 0x1b, 0x1b, 0x1b, 0x1b, 0x1f, 0x1f, 0x1f;
  NtUserCallNoParam,       REMOTEPASSTHRUDISABLE,             NONE, 0x17, 0x17, 0x1a, 0x1b, 0x1b, 0x1c, 0x1c, 0x1c, 0x1c, 0x1c, 0x20, 0x20, 0x20;
  NtUserCallNoParam,       REMOTECONNECTSTATE,                NONE, 0x18, 0x18, 0x1b, 0x1c, 0x1c, 0x1d, 0x1d, 0x1d, 0x1d, 0x1d, 0x21, 0x21, 0x21;
  NtUserCallNoParam,       UPDATEPERUSERIMMENABLING,          NONE, 0x19, 0x19, 0x1c, 0x1d, 0x1d, 0x1e, 0x1e, 0x1e, 0x1e, 0x1f, 0x24, 0x24, 0x24;
  NtUserCallNoParam,       USERPWRCALLOUTWORKER,              NONE, 0x1a, 0x1a, 0x1d, 0x1e, 0x1e, 0x1f, 0x1f, 0x1f, 0x1f, NONE, NONE, NONE, NONE;
  NtUserCallNoParam,       WAKERITFORSHTDWN,                  NONE, NONE, NONE, 0x1e, 0x1f, 0x1f, 0x20, 0x20, 0x20, 0x20, 0x20, 0x25, 0x25, 0x25;
  NtUserCallNoParam,       INIT_MESSAGE_PUMP,                 NONE, 0x1b, 0x1b, 0x1f, 0x20, 0x20, 0x21, 0x21, 0x21, 0x21, 0x23, 0x28, 0x28, 0x28;
  NtUserCallNoParam,       UNINIT_MESSAGE_PUMP,               NONE, 0x1c, 0x1c, 0x20, 0x21, 0x21, 0x22, 0x22, 0x22, 0x22, 0x24, 0x29, 0x29, 0x29;
  NtUserCallNoParam,       LOADUSERAPIHOOK,                   NONE, 0x1d, 0x1d, 0x0e, 0x0f, 0x0f, 0x10, 0x10, 0x10, 0x10, 0x10, 0x13, 0x13, 0x13;
  NtUserCallNoParam,       ENABLEMIPSHELLTHREAD,              NONE, NONE, NONE, NONE, NONE, NONE, NONE, 0x23, 0x23, 0x23, 0x25, 0x2a, 0x2a, 0x2a;
  NtUserCallNoParam,       ISMIPSHELLTHREADENABLED,           NONE, NONE, NONE, NONE, NONE, NONE, NONE, 0x24, 0x24, 0x24, 0x26, 0x2b, NONE, NONE;
  NtUserCallNoParam,       DEFERREDDESKTOPROTATION,           NONE, NONE, NONE, NONE, NONE, NONE, 0x23, 0x25, 0x25, 0x25, 0x27, 0x2c, 0x2b, 0x2b;
  NtUserCallNoParam,       ENABLEPERMONITORMENUSCALING,       NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, 0x26, 0x26, 0x28, 0x2d, 0x2c, 0x2c;

  NtUserCallOneParam,      BEGINDEFERWNDPOS,                  NONE, 0x1e, 0x1e, 0x21, 0x22, 0x22, 0x24, 0x26, 0x27, 0x27, 0x29, 0x2e, 0x2d, 0x2d;
  NtUserCallOneParam,      GETSENDMSGRECVR,                   NONE, NONE, NONE, 0x22, 0x23, 0x23, 0x25, 0x27, 0x28, 0x28, 0x2a, 0x2f, 0x2e, 0x2e;
  NtUserCallOneParam,      WINDOWFROMDC,                      NONE, 0x1f, 0x1f, 0x23, 0x24, 0x24, 0x26, 0x28, 0x29, 0x29, 0x2b, 0x30, NONE, NONE;
  NtUserCallOneParam,      ALLOWSETFOREGND,                   NONE, 0x20, 0x20, 0x24, 0x25, 0x25, 0x27, 0x29, 0x2a, 0x2a, 0x2c, 0x31, 0x2f, 0x2f;
  NtUserCallOneParam,      CREATEEMPTYCUROBJECT,              NONE, 0x21, 0x21, 0x25, 0x26, 0x26, 0x28, 0x2a, 0x2b, 0x2b, 0x2d, 0x32, NONE, NONE;
  NtUserCallOneParam,      CREATESYSTEMTHREADS,               NONE, 0x22, 0x22, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE;
  NtUserCallOneParam,      CSDDEUNINITIALIZE,                 NONE, 0x23, 0x23, 0x26, 0x27, 0x27, 0x29, 0x2b, 0x2c, 0x2c, 0x2e, 0x33, 0x30, 0x30;
  NtUserCallOneParam,      DIRECTEDYIELD,                     NONE, 0x24, 0x24, 0x27, 0x28, 0x28, 0x2a, 0x2c, 0x2d, 0x2d, 0x2f, 0x34, 0x31, 0x31;
  NtUserCallOneParam,      ENUMCLIPBOARDFORMATS,              NONE, 0x25, 0x25, 0x28, 0x29, 0x29, 0x2b, 0x2d, 0x2e, 0x2e, 0x30, 0x35, 0x32, 0x32;
  NtUserCallOneParam,      GETCURSORPOS,                      NONE, 0x26, 0x26, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE;
  NtUserCallOneParam,      FORCEFOCUSBASEDMOUSEWHEELROUTING,  NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, 0x2f, 0x2f, 0x31, 0x36, 0x33, 0x33;
  NtUserCallOneParam,      GETINPUTEVENT,                     NONE, 0x27, 0x27, 0x29, 0x2a, 0x2a, 0x2c, 0x2e, 0x30, 0x30, 0x32, 0x37, 0x34, 0x34;
  NtUserCallOneParam,      GETKEYBOARDLAYOUT,                 NONE, 0x28, 0x28, 0x2a, 0x2b, 0x2b, 0x2d, 0x2f, 0x31, 0x31, 0x33, 0x38, 0x35, 0x35;
  NtUserCallOneParam,      GETKEYBOARDTYPE,                   NONE, 0x29, 0x29, 0x2b, 0x2c, 0x2c, 0x2e, 0x30, 0x32, 0x32, 0x34, 0x39, 0x36, 0x36;
  NtUserCallOneParam,      GETPROCDEFLAYOUT,                  NONE, 0x2a, 0x2a, 0x2c, 0x2d, 0x2d, 0x2f, 0x31, 0x33, 0x33, 0x35, 0x3a, 0x37, 0x37;
  NtUserCallOneParam,      GETQUEUESTATUS,                    NONE, 0x2b, 0x2b, 0x2d, 0x2e, 0x2e, 0x30, 0x32, 0x34, 0x34, 0x36, 0x3b, 0x38, 0x38;
  NtUserCallOneParam,      GETWINSTAINFO,                     NONE, 0x2c, 0x2c, 0x2e, 0x2f, 0x2f, 0x31, 0x33, 0x35, 0x35, 0x37, 0x3c, 0x39, 0x39;
  NtUserCallOneParam,      HANDLESYSTHRDCREATFAIL,            NONE, 0x2d, 0x2d, 0x0b, 0x0c, 0x0c, 0x0c, 0x0c, 0x0c, 0x0c, 0x0c, 0x0d, 0x0d, 0x0d;
  NtUserCallOneParam,      LOCKFOREGNDWINDOW,                 NONE, 0x2e, 0x2e, 0x2f, 0x30, 0x30, 0x32, 0x34, 0x36, 0x36, 0x38, 0x3d, 0x3a, 0x3a;
  NtUserCallOneParam,      LOADFONTS,                         NONE, 0x2f, 0x2f, 0x30, 0x31, 0x31, 0x33, 0x35, 0x37, 0x37, 0x39, 0x3e, 0x3b, 0x3b;
  NtUserCallOneParam,      MAPDEKTOPOBJECT,                   NONE, 0x30, 0x30, 0x31, 0x32, 0x32, 0x34, 0x36, 0x38, 0x38, 0x3a, 0x3f, 0x3c, 0x3c;
  NtUserCallOneParam,      MESSAGEBEEP,                       NONE, 0x31, 0x31, 0x32, 0x33, 0x33, 0x35, 0x37, 0x39, 0x39, 0x3b, 0x40, 0x3d, 0x3d;
  NtUserCallOneParam,      PLAYEVENTSOUND,                    NONE, 0x32, 0x32, 0x33, 0x34, 0x34, 0x36, 0x38, 0x3a, 0x3a, 0x3c, 0x41, 0x3e, 0x3e;
  NtUserCallOneParam,      POSTQUITMESSAGE,                   NONE, 0x33, 0x33, 0x34, 0x35, 0x35, 0x37, 0x39, 0x3b, 0x3b, 0x3d, 0x42, 0x3f, 0x3f;
  NtUserCallOneParam,      PREPAREFORLOGOFF,                  NONE, 0x34, 0x34, 0x0f, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10;
  NtUserCallOneParam,      REALIZEPALETTE,                    NONE, 0x35, 0x35, 0x35, 0x36, 0x36, 0x38, 0x3a, 0x3c, 0x3c, 0x3e, 0x43, 0x40, 0x40;
  NtUserCallOneParam,      REGISTERLPK,                       NONE, 0x36, 0x36, 0x36, 0x37, 0x37, 0x39, 0x3b, 0x3d, 0x3d, 0x3f, 0x44, 0x41, 0x41;
  NtUserCallOneParam,      REGISTERSYSTEMTHREAD,              NONE, NONE, NONE, 0x37, 0x38, 0x38, 0x3a, 0x3c, 0x3e, 0x3e, 0x40, 0x45, 0x42, 0x42;
  NtUserCallOneParam,      REMOTERECONNECT,                   NONE, 0x37, 0x37, 0x38, 0x39, 0x39, 0x3b, 0x3d, 0x3f, 0x3f, 0x41, 0x46, 0x43, 0x43;
  NtUserCallOneParam,      REMOTETHINWIRESTATUS,              NONE, 0x38, 0x38, 0x39, 0x3a, 0x3a, 0x3c, 0x3e, 0x40, 0x40, 0x42, 0x47, 0x44, 0x44;
  NtUserCallOneParam,      RELEASEDC,                         NONE, 0x39, 0x39, 0x3a, 0x3b, 0x3b, 0x3d, 0x3f, 0x41, 0x41, 0x43, 0x48, NONE, NONE;
  NtUserCallOneParam,      REMOTENOTIFY,                      NONE, NONE, NONE, 0x3b, 0x3c, 0x3c, 0x3e, 0x40, 0x42, 0x42, 0x44, 0x49, 0x45, 0x45;
  NtUserCallOneParam,      REPLYMESSAGE,                      NONE, 0x3a, 0x3a, 0x3c, 0x3d, 0x3d, 0x3f, 0x41, 0x43, 0x43, 0x45, 0x4a, 0x46, 0x46;
  NtUserCallOneParam,      SETCARETBLINKTIME,                 NONE, 0x3b, 0x3b, 0x3d, 0x3e, 0x3e, 0x40, 0x42, 0x44, 0x44, 0x46, 0x4b, 0x47, 0x47;
  NtUserCallOneParam,      SETDBLCLICKTIME,                   NONE, 0x3c, 0x3c, 0x3e, 0x3f, 0x3f, 0x41, 0x43, 0x45, 0x45, 0x47, 0x4c, 0x48, 0x48;
  NtUserCallOneParam,      SETIMESHOWSTATUS,                  NONE, 0x3d, 0x3d, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE;
  NtUserCallOneParam,      SETMESSAGEEXTRAINFO,               NONE, 0x3e, 0x3e, 0x3f, 0x40, 0x40, 0x42, 0x44, 0x46, 0x46, 0x48, 0x4d, 0x49, 0x49;
  NtUserCallOneParam,      SETPROCDEFLAYOUT,                  NONE, 0x3f, 0x3f, 0x40, 0x41, 0x41, 0x43, 0x45, 0x47, 0x47, 0x49, 0x4e, 0x4a, 0x4a;
  NtUserCallOneParam,      SETWATERMARKSTRINGS,               NONE, NONE, NONE, 0x41, 0x42, 0x42, 0x44, 0x46, 0x48, 0x48, 0x4a, 0x4f, 0x4b, 0x4b;
  NtUserCallOneParam,      SHOWCURSOR,                        NONE, 0x40, 0x40, 0x42, 0x43, 0x43, 0x45, 0x47, 0x49, 0x49, 0x4b, 0x50, NONE, NONE;
  NtUserCallOneParam,      SHOWSTARTGLASS,                    NONE, 0x41, 0x41, 0x43, 0x44, 0x44, 0x46, 0x48, 0x4a, 0x4a, 0x4c, 0x51, 0x4c, 0x4c;
  NtUserCallOneParam,      SWAPMOUSEBUTTON,                   NONE, 0x42, 0x42, 0x44, 0x45, 0x45, 0x47, 0x49, 0x4b, 0x4b, 0x4d, 0x52, 0x4d, 0x4d;
  NtUserCallOneParam,      WOWMODULEUNLOAD,                   NONE, 0x43, 0x43, 0x45, 0x46, 0x46, 0x48, 0x4a, 0x4c, 0x4c, 0x4e, 0x53, 0x4e, 0x4e;
  NtUserCallOneParam,      UNKNOWNA,                          NONE, 0x44, 0x44, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE;
  NtUserCallOneParam,      DWMLOCKSCREENUPDATES,              NONE, NONE, NONE, NONE, NONE, NONE, 0x49, 0x4b, 0x4d, 0x4d, 0x4f, 0x54, 0x4f, 0x4f;
  NtUserCallOneParam,      ENABLESESSIONFORMMCSS,             NONE, NONE, NONE, NONE, NONE, NONE, 0x4a, 0x4c, 0x4e, 0x4e, 0x50, 0x55, 0x50, 0x50;
  NtUserCallOneParam,      UNKNOWNB,                          NONE, NONE, NONE, NONE, NONE, NONE, 0x4b, 0x4d, 0x4f, 0x4f, 0x51, 0x56, 0x51, 0x51;
  NtUserCallOneParam,      ISTHREADMESSAGEQUEUEATTACHED,      NONE, NONE, NONE, NONE, NONE, NONE, 0x4c, 0x4e, 0x50, 0x50, 0x52, 0x57, 0x52, 0x52;
  NtUserCallOneParam,      POSTUIACTIONS,                     NONE, NONE, NONE, NONE, NONE, NONE, NONE, 0x4f, 0x51, 0x51, 0x53, 0x58, 0x53, 0x53;
  NtUserCallOneParam,      SETINPUTSERVICESTATE,              NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, 0x54, 0x59, 0x54, 0x54;
  NtUserCallOneParam,      GETDPIDEPENDENTMETRIC,             NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, 0x55, 0x55;
  NtUserCallOneParam,      FORCEENABLENUMPADTRANSLATION,      NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, 0x5b, 0x56, 0x56;

  NtUserCallHwnd,          DEREGISTERSHELLHOOKWINDOW,         NONE, 0x45, 0x45, 0x46, 0x47, 0x47, 0x4d, 0x50, 0x52, 0x52, 0x56, 0x5c, 0x57, 0x57;
  NtUserCallHwnd,          DWP_GETENABLEDPOPUP,               NONE, 0x46, 0x46, 0x47, 0x48, 0x48, 0x4e, 0x51, 0x53, 0x53, 0x57, 0x5d, 0x58, 0x58;
  NtUserCallHwnd,          GETWNDCONTEXTHLPID,                NONE, 0x47, 0x47, 0x48, 0x49, 0x49, 0x4f, 0x52, 0x55, 0x55, 0x58, 0x5e, 0x59, 0x59;
  NtUserCallHwnd,          REGISTERSHELLHOOKWINDOW,           NONE, 0x48, 0x48, 0x49, 0x4a, 0x4a, 0x50, 0x53, 0x56, 0x56, 0x59, 0x5f, 0x5a, 0x5a;
  NtUserCallHwnd,          UNKNOWNA,                          NONE, 0x49, 0x49, 0x4a, 0x4b, 0x4b, 0x51, 0x54, 0x57, 0x57, 0x5a, 0x60, 0x5b, 0x5b;
  NtUserCallHwnd,          UNKNOWNB,                          NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, 0x58, 0x58, 0x5b, 0x61, 0x5c, 0x5c;
  NtUserCallHwnd,          UNKNOWNC,                          NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, 0x5c, 0x62, 0x5d, 0x5d;
  NtUserCallHwnd,          UNKNOWND,                          NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, 0x63, 0x5e, 0x5e;

  NtUserCallHwndOpt,       SETPROGMANWINDOW,                  NONE, 0x4a, 0x4a, 0x4b, 0x4c, 0x4c, 0x52, 0x55, 0x59, 0x59, 0x5d, 0x64, 0x5f, 0x5f;
  NtUserCallHwndOpt,       SETTASKMANWINDOW,                  NONE, 0x4b, 0x4b, 0x4c, 0x4d, 0x4d, 0x53, 0x56, 0x5a, 0x5a, 0x5e, 0x65, 0x60, 0x60;

  NtUserCallHwndParam,     GETCLASSICOCUR,                    NONE, 0x4c, 0x4c, 0x4d, 0x4e, 0x4e, 0x54, 0x57, 0x5b, 0x5b, 0x5f, 0x66, 0x61, 0x61;
  NtUserCallHwndParam,     CLEARWINDOWSTATE,                  NONE, 0x4d, 0x4d, 0x4e, 0x4f, 0x4f, 0x55, 0x58, 0x5c, 0x5c, 0x60, 0x67, 0x62, 0x63;
  NtUserCallHwndParam,     KILLSYSTEMTIMER,                   NONE, 0x4e, 0x4e, 0x4f, 0x50, 0x50, 0x56, 0x59, 0x5d, 0x5d, 0x61, 0x68, 0x63, 0x64;
  NtUserCallHwndParam,     NOTIFYOVERLAYWINDOW,               NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, 0x69, 0x64, 0x65;
  NtUserCallHwndParam,     REGISTERKBDCORRECTION,             NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, 0x6a, 0x65, 0x66;
  NtUserCallHwndParam,     SETDIALOGPOINTER,                  NONE, 0x4f, 0x4f, 0x50, 0x51, 0x51, 0x57, 0x5a, 0x5e, 0x5e, 0x62, 0x6b, 0x66, 0x67;
  NtUserCallHwndParam,     SETVISIBLE,                        NONE, 0x50, 0x50, 0x51, 0x52, 0x52, 0x58, 0x5b, 0x5f, 0x5f, 0x63, 0x6c, 0x67, 0x68;
  NtUserCallHwndParam,     SETWNDCONTEXTHLPID,                NONE, 0x51, 0x51, 0x52, 0x53, 0x53, 0x59, 0x5c, 0x60, 0x60, 0x64, 0x6d, 0x68, 0x69;
  NtUserCallHwndParam,     UNKNOWNA,                          NONE, NONE, NONE, NONE, NONE, NONE, NONE, 0x5d, 0x61, 0x61, 0x65, NONE, NONE, NONE;
  NtUserCallHwndParam,     SETWINDOWSTATE,                    NONE, 0x52, 0x52, 0x53, 0x54, 0x54, 0x5a, 0x5e, 0x62, 0x62, 0x66, 0x6e, 0x69, 0x6a;
  NtUserCallHwndParam,     UNKNOWNB,                          NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, 0x63, 0x63, 0x67, NONE, NONE, NONE;
  NtUserCallHwndParam,     REGISTERWINDOWARRANGEMENTCALLOUT,  NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, 0x64, 0x64, 0x68, 0x6f, 0x6a, 0x6b;
  NtUserCallHwndParam,     ENABLEMODERNAPPWINDOWKBDINTERCEPT, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, 0x65, 0x69, 0x70, 0x6b, 0x6c;

  NtUserCallHwndLock,      WINDOWHASSHADOW,                   NONE, 0x53, 0x53, 0x54, 0x55, 0x55, 0x5b, 0x5f, NONE, NONE, NONE, NONE, NONE, NONE;
  NtUserCallHwndLock,      ARRANGEICONICWINDOWS,              NONE, 0x54, 0x54, 0x55, 0x56, 0x56, 0x5c, 0x60, 0x65, 0x66, 0x6a, 0x71, 0x6c, 0x6d;
  NtUserCallHwndLock,      DRAWMENUBAR,                       NONE, 0x55, 0x55, 0x56, 0x57, 0x57, 0x5d, 0x61, 0x66, 0x67, 0x6b, 0x72, 0x6d, 0x6e;
  NtUserCallHwndLock,      CHECKIMESHOWSTATUSINTHRD,          NONE, 0x56, 0x56, 0x57, 0x58, 0x58, 0x5e, 0x62, 0x67, 0x68, 0x6c, 0x73, 0x6e, 0x6f;
  NtUserCallHwndLock,      GETSYSMENUHANDLE,                  NONE, 0x57, 0x57, 0x58, 0x59, 0x59, 0x5f, 0x63, 0x68, 0x69, 0x6d, 0x74, 0x6f, 0x70;
  NtUserCallHwndLock,      REDRAWFRAME,                       NONE, 0x58, 0x58, 0x59, 0x5a, 0x5a, 0x60, 0x64, 0x69, 0x6a, 0x6e, 0x75, 0x70, 0x71;
  NtUserCallHwndLock,      REDRAWFRAMEANDHOOK,                NONE, 0x59, 0x59, 0x5a, 0x5b, 0x5b, 0x61, 0x65, 0x6a, 0x6b, 0x6f, 0x76, 0x71, 0x72;
  NtUserCallHwndLock,      SETDLGSYSMENU,                     NONE, 0x5a, 0x5a, 0x5b, 0x5c, 0x5c, 0x62, 0x66, 0x6b, 0x6c, 0x70, 0x77, 0x72, 0x73;
  NtUserCallHwndLock,      SETFOREGROUNDWINDOW,               NONE, 0x5b, 0x5b, 0x5c, 0x5d, 0x5d, 0x63, 0x67, 0x6c, 0x6d, 0x71, 0x78, 0x73, 0x74;
  NtUserCallHwndLock,      SETSYSMENU,                        NONE, 0x5c, 0x5c, 0x5d, 0x5e, 0x5e, 0x64, 0x68, 0x6d, 0x6e, 0x72, 0x79, 0x74, 0x75;
  NtUserCallHwndLock,      UPDATECKIENTRECT,                  NONE, 0x5d, 0x5d, 0x5e, 0x5f, 0x5f, 0x65, 0x69, 0x6e, 0x6f, 0x73, 0x7a, 0x75, 0x76;
  NtUserCallHwndLock,      UPDATEWINDOW,                      NONE, 0x5e, 0x5e, 0x5f, 0x60, 0x60, 0x66, 0x6a, 0x6f, 0x70, 0x74, 0x7b, 0x76, 0x77;
  NtUserCallHwndLock,      SETACTIVEIMMERSIVEWINDOW,          NONE, 0x5f, 0x5f, 0x60, 0x61, 0x61, 0x67, 0x6b, 0x70, 0x71, 0x75, 0x7c, 0x77, 0x78;
  NtUserCallHwndLock,      GETWINDOWTRACKINFOASYNC,           NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, 0x71, 0x72, 0x76, 0x7d, 0x78, 0x79;

  NtUserCallHwndParamLock, UNKNOWNA,                          NONE, NONE, NONE, NONE, NONE, NONE, 0x68, 0x6c, 0x72, 0x73, 0x77, 0x7e, 0x79, 0x7a;
  NtUserCallHwndParamLock, ENABLEWINDOW,                      NONE, 0x60, 0x60, 0x61, 0x62, 0x62, 0x69, 0x6d, 0x73, 0x74, 0x78, 0x7f, 0x7a, 0x7b;
  NtUserCallHwndParamLock, SETMODERNAPPWINDOW,                NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, 0x74, 0x75, 0x79, 0x80, 0x7b, 0x7c;
  NtUserCallHwndParamLock, REDRAWTITLE,                       NONE, 0x61, 0x61, 0x62, 0x63, 0x63, 0x6a, 0x6e, 0x75, 0x76, 0x7a, 0x81, 0x7c, 0x7d;
  NtUserCallHwndParamLock, SHOWOWNEDPOPUPS,                   NONE, 0x62, 0x62, 0x63, 0x64, 0x64, 0x6b, 0x6f, 0x76, 0x77, 0x7b, 0x82, 0x7d, 0x7e;
  NtUserCallHwndParamLock, SWITCHTOTHISWINDOW,                NONE, 0x63, 0x63, 0x64, 0x65, 0x65, 0x6c, 0x70, 0x77, 0x78, 0x7c, 0x83, 0x7e, 0x7f;
  NtUserCallHwndParamLock, UPDATEWINDOWS,                     NONE, 0x64, 0x64, 0x65, 0x66, 0x66, 0x6d, 0x71, 0x78, 0x79, 0x7d, 0x84, 0x7f, 0x80;
  NtUserCallHwndParamLock, VALIDATERGN,                       NONE, 0x65, 0x65, 0x66, 0x67, 0x67, 0x6e, 0x72, 0x79, 0x7a, 0x7e, 0x85, 0x80, 0x81;

  NtUserCallTwoParam,      UNKNOWNA,                          NONE, NONE, NONE, NONE, NONE, NONE, NONE, 0x73, 0x7a, 0x7b, 0x7f, 0x86, NONE, NONE;
  NtUserCallTwoParam,      CHANGEWNDMSGFILTER,                NONE, NONE, NONE, 0x67, 0x68, 0x68, 0x6f, 0x74, 0x7b, 0x7c, 0x80, 0x87, 0x81, 0x82;
  NtUserCallTwoParam,      GETCURSORPOS,                      NONE, NONE, NONE, 0x68, 0x69, 0x69, 0x70, 0x75, 0x7c, 0x7d, 0x81, 0x88, 0x82, 0x83;
  NtUserCallTwoParam,      GETHDEVNAME,                       NONE, 0x66, 0x66, 0x69, 0x6a, 0x6a, 0x71, 0x76, 0x7d, 0x7e, 0x82, 0x89, NONE, NONE;
  NtUserCallTwoParam,      INITANSIOEM,                       NONE, 0x67, 0x67, 0x6a, 0x6b, 0x6b, 0x72, 0x77, 0x7e, 0x7f, 0x83, 0x8a, 0x83, 0x84;
  NtUserCallTwoParam,      NLSSENDIMENOTIFY,                  NONE, 0x68, 0x68, 0x6b, 0x6c, 0x6c, 0x73, 0x78, 0x7f, 0x80, 0x84, 0x8b, 0x84, 0x85;
  NtUserCallTwoParam,      REGISTERGHSTWND,                   NONE, NONE, NONE, 0x6c, 0x6d, 0x6d, 0x74, 0x79, 0x80, 0x81, 0x85, 0x8c, 0x85, 0x86;
  NtUserCallTwoParam,      REGISTERLOGONPROCESS,              NONE, 0x69, 0x69, 0x6d, 0x6e, 0x6e, 0x75, 0x7a, 0x81, 0x82, 0x86, 0x8d, 0x86, 0x87;
  NtUserCallTwoParam,      REGISTERSYSTEMTHREAD,              NONE, 0x6a, 0x6a, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE;
  NtUserCallTwoParam,      REGISTERSBLFROSTWND,               NONE, NONE, NONE, 0x6e, 0x6f, 0x6f, 0x76, 0x7b, 0x82, 0x83, 0x87, 0x8e, 0x87, 0x88;
  NtUserCallTwoParam,      REGISTERUSERHUNGAPPHANDLERS,       NONE, 0x6b, 0x6b, 0x6f, 0x70, 0x70, 0x77, 0x7c, 0x83, 0x84, 0x88, 0x8f, 0x88, 0x89;
  NtUserCallTwoParam,      SHADOWCLEANUP,                     NONE, 0x6c, 0x6c, 0x70, 0x71, 0x71, 0x78, 0x7d, 0x84, 0x85, 0x89, 0x90, 0x89, 0x8a;
  NtUserCallTwoParam,      REMOTESHADOWSTART,                 NONE, 0x6d, 0x6d, 0x71, 0x72, 0x72, 0x79, 0x7e, 0x85, 0x86, 0x8a, 0x91, 0x8a, 0x8b;
  NtUserCallTwoParam,      SETCARETPOS,                       NONE, 0x6e, 0x6e, 0x72, 0x73, 0x73, 0x7a, 0x7f, 0x86, 0x87, 0x8b, 0x92, 0x8b, 0x8c;
  NtUserCallTwoParam,      SETCURSORPOS,                      NONE, 0x6f, 0x6f, 0x73, 0x74, 0x74, 0x7b, 0x80, 0x87, 0x88, 0x8c, 0x93, NONE, NONE;
  NtUserCallTwoParam,      SETTHREADQUEUEMERGESETTING,        NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, 0x8c, 0x8d;
  NtUserCallTwoParam,      SETPHYSCURSORPOS,                  NONE, NONE, NONE, 0x74, 0x75, 0x75, 0x7c, 0x81, 0x88, 0x89, 0x8d, 0x94, NONE, NONE;
  NtUserCallTwoParam,      UNHOOKWINDOWSHOOK,                 NONE, 0x70, 0x70, 0x75, 0x76, 0x76, 0x7d, 0x82, 0x89, 0x8a, 0x8e, 0x95, 0x8d, 0x8e;
  NtUserCallTwoParam,      WOWCLEANUP,                        NONE, 0x71, 0x71, 0x76, 0x77, 0x77, 0x7e, 0x83, 0x8a, 0x8b, 0x8f, 0x96, NONE, NONE;
  NtUserCallTwoParam,      ENABLESHELLWINDOWMGT,              NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, 0x8b, 0x8c, 0x90, 0x97, 0x8e, 0x8f;
  NtUserCallTwoParam,      SETCITINFO,                        NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, 0x8b, 0x8c, 0x90, 0x97, 0x8f, 0x90;
  NtUserCallTwoParam,      SCALESYSTEMMETRICFORDPI,           NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, NONE, 0x8d, 0x91, 0x98, 0x90, 0x91;
}

impl UsercallOp {
  pub fn row(self) -> &'static UsercallRow {
    &USERCALL_ROWS[self as usize]
  }
}

type ColumnIndex = HashMap<(UsercallPrimary, u16), &'static UsercallRow>;

/// Per-version selector indexes over the compiled-in rows.
pub struct UsercallTable {
  rows: &'static [UsercallRow],
  columns: Vec<ColumnIndex>,
}

static TABLE: Lazy<UsercallTable> = Lazy::new(|| UsercallTable::build(USERCALL_ROWS));

pub fn table() -> &'static UsercallTable {
  &TABLE
}

impl UsercallTable {
  fn build(rows: &'static [UsercallRow]) -> Self {
    let columns = WindowsVersion::ALL
      .into_iter()
      .map(|version| {
        let mut index = ColumnIndex::new();
        for row in rows {
          if let Some(selector) = row.selector(version) {
            // Earlier rows win when two operations share a slot.
            index.entry((row.primary, selector)).or_insert(row);
          }
        }
        index
      })
      .collect();
    Self { rows, columns }
  }

  pub fn rows(&self) -> &'static [UsercallRow] {
    self.rows
  }

  /// Find the operation `selector` names for `primary` on `version`.
  pub fn resolve(
    &self,
    primary: UsercallPrimary,
    version: WindowsVersion,
    selector: u64,
  ) -> Option<&'static UsercallRow> {
    let selector = u16::try_from(selector).ok()?;
    self.columns[version.column()]
      .get(&(primary, selector))
      .copied()
  }

  /// Rows that share a selector under the same primary on `version`, paired with the
  /// row that wins the lookup.
  pub fn selector_collisions(
    &self,
    version: WindowsVersion,
  ) -> Vec<(&'static UsercallRow, &'static UsercallRow)> {
    self
      .rows
      .iter()
      .filter_map(|row| Some(((row.primary, row.selector(version)?), row)))
      .into_group_map()
      .into_values()
      .filter(|rows| rows.len() > 1)
      .flat_map(|rows| {
        let winner = rows[0];
        rows.into_iter().skip(1).map(move |shadowed| (winner, shadowed))
      })
      .sorted_by_key(|(winner, _)| winner.op)
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn every_row_is_indexed() {
    assert_eq!(USERCALL_ROWS.len(), 159);
    for (i, row) in USERCALL_ROWS.iter().enumerate() {
      assert_eq!(row.op as usize, i);
      assert_eq!(row.op.row(), row);
    }
  }

  #[test]
  fn selector_lives_in_last_argument() {
    assert_eq!(UsercallPrimary::NtUserCallNoParam.selector_ordinal(), 0);
    assert_eq!(UsercallPrimary::NtUserCallOneParam.selector_ordinal(), 1);
    assert_eq!(UsercallPrimary::NtUserCallTwoParam.selector_ordinal(), 2);
    for primary in UsercallPrimary::ALL {
      assert!(primary.descriptor().validate().is_ok());
      assert_eq!(primary.name().parse::<UsercallPrimary>().unwrap(), primary);
    }
  }

  #[test]
  fn version_column_is_fixed_before_matching() {
    let table = table();
    let w10 = table
      .resolve(UsercallPrimary::NtUserCallOneParam, WindowsVersion::Win10, 0x2f)
      .unwrap();
    assert_eq!(w10.op, UsercallOp::NtUserCallOneParam_FORCEFOCUSBASEDMOUSEWHEELROUTING);
    let xp = table
      .resolve(UsercallPrimary::NtUserCallOneParam, WindowsVersion::Xp, 0x2f)
      .unwrap();
    assert_eq!(xp.op, UsercallOp::NtUserCallOneParam_LOADFONTS);
    assert!(table
      .resolve(UsercallPrimary::NtUserCallOneParam, WindowsVersion::W2k, 0x2f)
      .is_none());
    assert!(table
      .resolve(UsercallPrimary::NtUserCallOneParam, WindowsVersion::Win10, 0x1_002f)
      .is_none());
  }

  #[test]
  fn shared_slots_resolve_to_first_row() {
    let collisions = table().selector_collisions(WindowsVersion::Win10);
    assert!(collisions.contains(&(
      UsercallOp::NtUserCallTwoParam_ENABLESHELLWINDOWMGT.row(),
      UsercallOp::NtUserCallTwoParam_SETCITINFO.row()
    )));
    let resolved = table()
      .resolve(UsercallPrimary::NtUserCallTwoParam, WindowsVersion::Win10, 0x8b)
      .unwrap();
    assert_eq!(resolved.op, UsercallOp::NtUserCallTwoParam_ENABLESHELLWINDOWMGT);
    // 1709 renumbered them apart.
    let w14 = table()
      .resolve(UsercallPrimary::NtUserCallTwoParam, WindowsVersion::Win10_1709, 0x8f)
      .unwrap();
    assert_eq!(w14.op, UsercallOp::NtUserCallTwoParam_SETCITINFO);
  }

  #[test]
  fn display_names() {
    let row = UsercallOp::NtUserCallOneParam_LOADFONTS.row();
    assert_eq!(row.to_string(), "NtUserCallOneParam.LOADFONTS");
    assert_eq!(row.versions().next(), Some((WindowsVersion::Xp, 0x2f)));
  }
}
