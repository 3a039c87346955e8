//! The platform an audited process runs on: OS family, OS release and ABI word width.

use std::{fmt, str::FromStr};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordSize {
  Bits32,
  Bits64,
}

impl WordSize {
  pub const fn bytes(self) -> usize {
    match self {
      WordSize::Bits32 => 4,
      WordSize::Bits64 => 8,
    }
  }

  /// Word width of the process this library is compiled into.
  pub const fn host() -> Self {
    if cfg!(target_pointer_width = "64") {
      WordSize::Bits64
    } else {
      WordSize::Bits32
    }
  }
}

/// A byte count whose value depends on whether the audited process uses the
/// ILP32 or the LP64 data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AbiSize {
  pub ilp32: u32,
  pub lp64: u32,
}

impl AbiSize {
  pub const WORD: AbiSize = AbiSize { ilp32: 4, lp64: 8 };
  pub const ZERO: AbiSize = AbiSize::same(0);

  pub const fn new(ilp32: u32, lp64: u32) -> Self {
    Self { ilp32, lp64 }
  }

  pub const fn same(size: u32) -> Self {
    Self {
      ilp32: size,
      lp64: size,
    }
  }

  pub const fn bytes(self, word_size: WordSize) -> u64 {
    match word_size {
      WordSize::Bits32 => self.ilp32 as u64,
      WordSize::Bits64 => self.lp64 as u64,
    }
  }

  pub const fn is_zero(self) -> bool {
    self.ilp32 == 0 && self.lp64 == 0
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized {what}: `{value}`")]
pub struct ParseTargetError {
  what: &'static str,
  value: String,
}

impl ParseTargetError {
  pub(crate) fn new(what: &'static str, value: &str) -> Self {
    Self {
      what,
      value: value.to_owned(),
    }
  }
}

/// macOS releases whose BSD syscall numbering the descriptor table knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MacOsVersion {
  /// 10.9
  Mavericks,
  /// 10.10, reassigned 274 from `sem_getvalue` to `sysctlbyname`.
  Yosemite,
  /// 10.11, dropped the login-context calls.
  ElCapitan,
  /// 10.12, dropped `chud` and `stack_snapshot`.
  Sierra,
  /// 10.13
  HighSierra,
  /// 10.14
  Mojave,
}

impl MacOsVersion {
  pub const ALL: [MacOsVersion; 6] = [
    MacOsVersion::Mavericks,
    MacOsVersion::Yosemite,
    MacOsVersion::ElCapitan,
    MacOsVersion::Sierra,
    MacOsVersion::HighSierra,
    MacOsVersion::Mojave,
  ];

  pub const LATEST: MacOsVersion = MacOsVersion::Mojave;

  /// Map a `10.x` marketing release to a known version.
  pub fn from_release(major: u32, minor: u32) -> Option<Self> {
    if major != 10 {
      return None;
    }
    Self::ALL.get(minor.checked_sub(9)? as usize).copied()
  }

  /// Map a Darwin kernel major version (`uname -r`) to a known version.
  pub fn from_darwin(major: u32) -> Option<Self> {
    Self::ALL.get(major.checked_sub(13)? as usize).copied()
  }
}

impl FromStr for MacOsVersion {
  type Err = ParseTargetError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let lowered = s.to_ascii_lowercase();
    let by_name = match lowered.as_str() {
      "mavericks" => Some(MacOsVersion::Mavericks),
      "yosemite" => Some(MacOsVersion::Yosemite),
      "elcapitan" | "el-capitan" => Some(MacOsVersion::ElCapitan),
      "sierra" => Some(MacOsVersion::Sierra),
      "highsierra" | "high-sierra" => Some(MacOsVersion::HighSierra),
      "mojave" => Some(MacOsVersion::Mojave),
      _ => None,
    };
    by_name
      .or_else(|| {
        let (major, minor) = lowered.split_once('.')?;
        Self::from_release(major.parse().ok()?, minor.parse().ok()?)
      })
      .ok_or_else(|| ParseTargetError::new("macOS version", s))
  }
}

/// Windows releases, one per version column of the secondary-call table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum WindowsVersion {
  W2k,
  Xp,
  Server2003,
  VistaSp01,
  VistaSp2,
  Win7,
  Win8,
  Win81,
  /// Windows 10 1507
  Win10,
  /// Windows 10 1511
  Win10_1511,
  /// Windows 10 1607
  Win10_1607,
  /// Windows 10 1703
  Win10_1703,
  /// Windows 10 1709
  Win10_1709,
  /// Windows 10 1803
  Win10_1803,
}

impl WindowsVersion {
  pub const COLUMNS: usize = 14;

  pub const ALL: [WindowsVersion; Self::COLUMNS] = [
    WindowsVersion::W2k,
    WindowsVersion::Xp,
    WindowsVersion::Server2003,
    WindowsVersion::VistaSp01,
    WindowsVersion::VistaSp2,
    WindowsVersion::Win7,
    WindowsVersion::Win8,
    WindowsVersion::Win81,
    WindowsVersion::Win10,
    WindowsVersion::Win10_1511,
    WindowsVersion::Win10_1607,
    WindowsVersion::Win10_1703,
    WindowsVersion::Win10_1709,
    WindowsVersion::Win10_1803,
  ];

  pub const fn column(self) -> usize {
    self as usize
  }

  /// Short column label, as used in configuration strings.
  pub const fn label(self) -> &'static str {
    match self {
      WindowsVersion::W2k => "w2k",
      WindowsVersion::Xp => "xp",
      WindowsVersion::Server2003 => "2003",
      WindowsVersion::VistaSp01 => "vista-sp01",
      WindowsVersion::VistaSp2 => "vista-sp2",
      WindowsVersion::Win7 => "w7",
      WindowsVersion::Win8 => "w8",
      WindowsVersion::Win81 => "w81",
      WindowsVersion::Win10 => "w10",
      WindowsVersion::Win10_1511 => "w11",
      WindowsVersion::Win10_1607 => "w12",
      WindowsVersion::Win10_1703 => "w13",
      WindowsVersion::Win10_1709 => "w14",
      WindowsVersion::Win10_1803 => "w15",
    }
  }

  /// Pick the column for a running OS from its `major.minor` version, service pack
  /// and build number. Returns `None` for releases the table has no column for.
  pub fn from_build(major: u32, minor: u32, service_pack: u32, build: u32) -> Option<Self> {
    let version = match (major, minor) {
      (5, 0) => WindowsVersion::W2k,
      (5, 1) => WindowsVersion::Xp,
      (5, 2) => WindowsVersion::Server2003,
      (6, 0) if service_pack >= 2 => WindowsVersion::VistaSp2,
      (6, 0) => WindowsVersion::VistaSp01,
      (6, 1) => WindowsVersion::Win7,
      (6, 2) => WindowsVersion::Win8,
      (6, 3) => WindowsVersion::Win81,
      (10, 0) => match build {
        10240 => WindowsVersion::Win10,
        10586 => WindowsVersion::Win10_1511,
        14393 => WindowsVersion::Win10_1607,
        15063 => WindowsVersion::Win10_1703,
        16299 => WindowsVersion::Win10_1709,
        17134 => WindowsVersion::Win10_1803,
        _ => return None,
      },
      _ => return None,
    };
    Some(version)
  }
}

impl fmt::Display for WindowsVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

impl FromStr for WindowsVersion {
  type Err = ParseTargetError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let lowered = s.to_ascii_lowercase();
    let alias = match lowered.as_str() {
      "1507" => "w10",
      "1511" => "w11",
      "1607" => "w12",
      "1703" => "w13",
      "1709" => "w14",
      "1803" => "w15",
      other => other,
    };
    Self::ALL
      .into_iter()
      .find(|v| v.label() == alias)
      .ok_or_else(|| ParseTargetError::new("Windows version", s))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsVersion {
  MacOs(MacOsVersion),
  Windows(WindowsVersion),
}

/// The audited process: which syscall tables apply and how wide its words are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
  pub os: OsVersion,
  pub word_size: WordSize,
}

impl Target {
  pub const fn macos(version: MacOsVersion, word_size: WordSize) -> Self {
    Self {
      os: OsVersion::MacOs(version),
      word_size,
    }
  }

  pub const fn windows(version: WindowsVersion, word_size: WordSize) -> Self {
    Self {
      os: OsVersion::Windows(version),
      word_size,
    }
  }
}

impl Default for Target {
  fn default() -> Self {
    Target::macos(MacOsVersion::LATEST, WordSize::host())
  }
}

impl FromStr for Target {
  type Err = ParseTargetError;

  /// Parses `<os>/<version>[/<bits>]`, e.g. `macos/10.12/64` or `windows/w10/32`.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let mut parts = s.trim().split('/');
    let family = parts.next().unwrap_or_default();
    let version = parts
      .next()
      .ok_or_else(|| ParseTargetError::new("target", s))?;
    let word_size = match parts.next() {
      None => WordSize::host(),
      Some("32") => WordSize::Bits32,
      Some("64") => WordSize::Bits64,
      Some(other) => return Err(ParseTargetError::new("word size", other)),
    };
    if parts.next().is_some() {
      return Err(ParseTargetError::new("target", s));
    }
    let os = match family.to_ascii_lowercase().as_str() {
      "macos" | "darwin" | "osx" => OsVersion::MacOs(version.parse()?),
      "windows" | "win" => OsVersion::Windows(version.parse()?),
      _ => return Err(ParseTargetError::new("OS family", family)),
    };
    Ok(Target { os, word_size })
  }
}
