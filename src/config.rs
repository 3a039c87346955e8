//! Runtime settings supplied by the embedding engine.

use std::collections::HashMap;

use crate::{
  table::UsercallPrimary,
  target::{ParseTargetError, Target},
};

/// Environment variable holding a [`Target`] such as `macos/10.12/64`.
pub const TARGET_ENV: &str = "SYSAUDIT_TARGET";
/// Environment variable holding `Primary=number` pairs, e.g.
/// `NtUserCallOneParam=0x1002,NtUserCallTwoParam=0x1003`.
pub const USERCALL_NUMBERS_ENV: &str = "SYSAUDIT_USERCALL_NUMBERS";

/// Bounds on how far the walker follows strings in the audited process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScanLimits {
  /// Bytes scanned for a string's NUL terminator.
  pub max_cstring: u64,
  /// Entries scanned for a string array's NULL terminator.
  pub max_cstring_array: u64,
}

impl Default for ScanLimits {
  fn default() -> Self {
    Self {
      max_cstring: 256 * 1024,
      max_cstring_array: 64 * 1024,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditConfig {
  pub target: Target,
  pub limits: ScanLimits,
  usercall_primaries: HashMap<i64, UsercallPrimary>,
}

impl AuditConfig {
  pub fn new(target: Target) -> Self {
    Self {
      target,
      ..Default::default()
    }
  }

  /// Read [`TARGET_ENV`] and [`USERCALL_NUMBERS_ENV`]. Unset variables keep their defaults.
  pub fn from_env() -> Result<Self, ParseTargetError> {
    Self::from_vars(
      std::env::var(TARGET_ENV).ok().as_deref(),
      std::env::var(USERCALL_NUMBERS_ENV).ok().as_deref(),
    )
  }

  fn from_vars(target: Option<&str>, usercalls: Option<&str>) -> Result<Self, ParseTargetError> {
    let mut config = match target {
      Some(target) => Self::new(target.parse()?),
      None => Self::default(),
    };
    for pair in usercalls.into_iter().flat_map(|s| s.split(',')) {
      let pair = pair.trim();
      if pair.is_empty() {
        continue;
      }
      let (primary, number) = pair
        .split_once('=')
        .ok_or_else(|| ParseTargetError::new("usercall number", pair))?;
      let number = parse_number(number.trim())
        .ok_or_else(|| ParseTargetError::new("usercall number", pair))?;
      config = config.with_usercall_primary(number, primary.trim().parse()?);
    }
    Ok(config)
  }

  pub fn with_target(mut self, target: Target) -> Self {
    self.target = target;
    self
  }

  pub fn with_limits(mut self, limits: ScanLimits) -> Self {
    self.limits = limits;
    self
  }

  /// Declare the raw syscall number `primary` is trapped as on the configured Windows build.
  pub fn with_usercall_primary(mut self, number: i64, primary: UsercallPrimary) -> Self {
    self.usercall_primaries.insert(number, primary);
    self
  }

  pub fn usercall_primary(&self, number: i64) -> Option<UsercallPrimary> {
    self.usercall_primaries.get(&number).copied()
  }

  pub fn usercall_primaries(&self) -> &HashMap<i64, UsercallPrimary> {
    &self.usercall_primaries
  }
}

fn parse_number(s: &str) -> Option<i64> {
  match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
    Some(hex) => i64::from_str_radix(hex, 16).ok(),
    None => s.parse().ok(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::target::{MacOsVersion, WindowsVersion, WordSize};

  #[test]
  fn defaults_follow_host() {
    let config = AuditConfig::from_vars(None, None).unwrap();
    assert_eq!(
      config.target,
      Target::macos(MacOsVersion::LATEST, WordSize::host())
    );
    assert_eq!(config.limits, ScanLimits::default());
    assert!(config.usercall_primaries().is_empty());
  }

  #[test]
  fn parses_usercall_numbers() {
    let config = AuditConfig::from_vars(
      Some("windows/w10/64"),
      Some("NtUserCallOneParam=0x1002, NtUserCallTwoParam=4099,"),
    )
    .unwrap();
    assert_eq!(
      config.target,
      Target::windows(WindowsVersion::Win10, WordSize::Bits64)
    );
    assert_eq!(
      config.usercall_primary(0x1002),
      Some(UsercallPrimary::NtUserCallOneParam)
    );
    assert_eq!(
      config.usercall_primary(4099),
      Some(UsercallPrimary::NtUserCallTwoParam)
    );
    assert_eq!(config.usercall_primary(1), None);
  }

  #[test]
  fn rejects_bad_pairs() {
    assert!(AuditConfig::from_vars(None, Some("NtUserCallOneParam")).is_err());
    assert!(AuditConfig::from_vars(None, Some("NtUserCallOneParam=zz")).is_err());
    assert!(AuditConfig::from_vars(None, Some("NtUserCallNothing=1")).is_err());
    assert!(AuditConfig::from_vars(Some("beos/5"), None).is_err());
  }
}
