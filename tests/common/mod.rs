#![allow(dead_code)]

use std::sync::Mutex;

use sysaudit::{DarwinTrap, ShadowFault, ShadowMemory, WordSize};

pub fn init_logging() {
  let _ = env_logger::builder().is_test(true).try_init();
}

/// The raw number a 64-bit macOS process traps BSD syscall `number` with.
pub fn bsd64(number: u32) -> i64 {
  DarwinTrap::Unix(number).encode(WordSize::Bits64)
}

pub fn bsd32(number: u32) -> i64 {
  DarwinTrap::Unix(number).encode(WordSize::Bits32)
}

/// A shadow tracker that records every request and reports configured ranges as undefined.
#[derive(Default)]
pub struct RecordingShadow {
  undefined: Vec<(u64, u64)>,
  checked: Mutex<Vec<(u64, u64)>>,
  marked: Mutex<Vec<(u64, u64)>>,
}

impl RecordingShadow {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_undefined(mut self, address: u64, len: u64) -> Self {
    self.undefined.push((address, len));
    self
  }

  pub fn checked(&self) -> Vec<(u64, u64)> {
    self.checked.lock().unwrap().clone()
  }

  pub fn marked(&self) -> Vec<(u64, u64)> {
    self.marked.lock().unwrap().clone()
  }
}

impl ShadowMemory for RecordingShadow {
  fn check_readable(&self, address: u64, len: u64) -> Result<(), ShadowFault> {
    self.checked.lock().unwrap().push((address, len));
    let end = address + len;
    for &(start, undefined_len) in &self.undefined {
      if start < end && address < start + undefined_len {
        return Err(ShadowFault::Undefined {
          offset: start.saturating_sub(address),
        });
      }
    }
    Ok(())
  }

  fn mark_defined(&self, address: u64, len: u64) {
    self.marked.lock().unwrap().push((address, len));
  }
}
