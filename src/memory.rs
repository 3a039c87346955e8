//! Reading the audited process's memory to follow length words and strings.

use std::collections::BTreeMap;

use nix::errno::Errno;

use crate::target::WordSize;

cfg_if::cfg_if! {
  if #[cfg(target_os = "linux")] {
    mod process;
    pub use process::ProcessMemory;
  }
}

/// Bytes read per step while scanning for a NUL.
const SCAN_CHUNK: usize = 256;

/// Read access to the audited process's address space.
pub trait MemoryReader {
  /// Copy bytes starting at `address` into `buf` and return how many were copied.
  ///
  /// A count shorter than `buf` means the byte after the copied prefix is unreadable.
  /// An error means not even the first byte could be read.
  fn read_bytes(&self, address: u64, buf: &mut [u8]) -> Result<usize, Errno>;

  /// Read a little-endian unsigned integer of `width` bytes.
  fn read_uint(&self, address: u64, width: usize) -> Result<u64, Errno> {
    if width == 0 || width > 8 {
      return Err(Errno::EINVAL);
    }
    let mut bytes = [0u8; 8];
    if self.read_bytes(address, &mut bytes[..width])? < width {
      return Err(Errno::EFAULT);
    }
    Ok(u64::from_le_bytes(bytes))
  }

  fn read_word(&self, address: u64, word_size: WordSize) -> Result<u64, Errno> {
    self.read_uint(address, word_size.bytes())
  }

  /// Measure the NUL-terminated string at `address`, looking at no more than `limit` bytes.
  fn scan_cstring(&self, address: u64, limit: u64) -> CStringExtent {
    let mut buf = [0u8; SCAN_CHUNK];
    let mut scanned = 0u64;
    while scanned < limit {
      let chunk = (limit - scanned).min(SCAN_CHUNK as u64) as usize;
      let read = match address.checked_add(scanned) {
        Some(cursor) => self.read_bytes(cursor, &mut buf[..chunk]).unwrap_or(0),
        None => 0,
      };
      if let Some(nul) = buf[..read].iter().position(|&b| b == 0) {
        return CStringExtent::Terminated(scanned + nul as u64 + 1);
      }
      if read < chunk {
        return CStringExtent::Unreadable(scanned + read as u64 + 1);
      }
      scanned += chunk as u64;
    }
    CStringExtent::Truncated(limit)
  }
}

impl<T: MemoryReader + ?Sized> MemoryReader for &T {
  fn read_bytes(&self, address: u64, buf: &mut [u8]) -> Result<usize, Errno> {
    (**self).read_bytes(address, buf)
  }
}

/// How far a C string reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CStringExtent {
  /// Found a NUL; the length includes it.
  Terminated(u64),
  /// Hit an unreadable byte before any NUL; the length includes that byte.
  Unreadable(u64),
  /// No NUL within the scan limit.
  Truncated(u64),
}

impl CStringExtent {
  pub fn len(self) -> u64 {
    match self {
      CStringExtent::Terminated(len)
      | CStringExtent::Unreadable(len)
      | CStringExtent::Truncated(len) => len,
    }
  }

  pub fn is_empty(self) -> bool {
    self.len() == 0
  }
}

/// Memory captured ahead of time as a set of segments.
///
/// Useful for replaying a trapped call offline and for tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotMemory {
  segments: BTreeMap<u64, Vec<u8>>,
}

impl SnapshotMemory {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a segment. A later segment overlapping an earlier one hides the bytes it covers.
  pub fn insert(&mut self, base: u64, bytes: impl Into<Vec<u8>>) {
    self.segments.insert(base, bytes.into());
  }

  pub fn with_segment(mut self, base: u64, bytes: impl Into<Vec<u8>>) -> Self {
    self.insert(base, bytes);
    self
  }

  /// The segment containing `address` and the offset of `address` within it.
  fn locate(&self, address: u64) -> Option<(&[u8], usize)> {
    let (base, bytes) = self.segments.range(..=address).next_back()?;
    let offset = usize::try_from(address - base).ok()?;
    (offset < bytes.len()).then_some((bytes.as_slice(), offset))
  }
}

impl MemoryReader for SnapshotMemory {
  fn read_bytes(&self, address: u64, buf: &mut [u8]) -> Result<usize, Errno> {
    let mut copied = 0;
    while copied < buf.len() {
      let Some(cursor) = address.checked_add(copied as u64) else {
        break;
      };
      let Some((bytes, offset)) = self.locate(cursor) else {
        break;
      };
      let n = (bytes.len() - offset).min(buf.len() - copied);
      buf[copied..copied + n].copy_from_slice(&bytes[offset..offset + n]);
      copied += n;
    }
    if copied == 0 && !buf.is_empty() {
      return Err(Errno::EFAULT);
    }
    Ok(copied)
  }
}
