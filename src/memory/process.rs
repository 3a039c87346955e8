use std::{
  io::IoSliceMut,
  mem::size_of,
  sync::atomic::{AtomicBool, Ordering},
};

use log::debug;
use nix::{
  errno::Errno,
  libc::c_long,
  sys::{
    ptrace::{self, AddressType},
    uio::{process_vm_readv, RemoteIoVec},
  },
  unistd::{getpid, sysconf, Pid, SysconfVar},
};
use once_cell::sync::OnceCell;

use super::MemoryReader;

static PAGE_SIZE: OnceCell<usize> = OnceCell::new();

const WORD_SIZE: usize = size_of::<c_long>();
/// Remote iovecs handed to one `process_vm_readv` call.
const IOV_BATCH: usize = 1024;

fn page_size() -> usize {
  *PAGE_SIZE.get_or_init(|| match sysconf(SysconfVar::PAGE_SIZE) {
    Ok(Some(size)) if size > 0 => size as usize,
    _ => 4096,
  })
}

/// A live process on the same host.
///
/// Reads go through `process_vm_readv`, split at page boundaries so that a read running
/// into an unmapped page returns the readable prefix. For a process stopped under
/// ptrace, short reads use `PTRACE_PEEKDATA` and so does everything once
/// `process_vm_readv` turns out to be unavailable.
#[derive(Debug)]
pub struct ProcessMemory {
  pid: Pid,
  traced: bool,
  use_process_vm_readv: AtomicBool,
}

impl ProcessMemory {
  /// A process the caller has attached to and stopped with ptrace.
  pub fn traced(pid: Pid) -> Self {
    Self {
      pid,
      traced: true,
      use_process_vm_readv: AtomicBool::new(true),
    }
  }

  /// A process readable without ptrace, e.g. a child or the current process.
  pub fn untraced(pid: Pid) -> Self {
    Self {
      pid,
      traced: false,
      use_process_vm_readv: AtomicBool::new(true),
    }
  }

  /// The process this library runs in, for in-process auditors.
  pub fn current() -> Self {
    Self::untraced(getpid())
  }

  pub fn pid(&self) -> Pid {
    self.pid
  }

  fn read_by_process_vm_readv(&self, address: u64, buf: &mut [u8]) -> Result<usize, Errno> {
    let page_size = page_size() as u64;
    let end = address
      .checked_add(buf.len() as u64)
      .ok_or(Errno::EFAULT)?;
    let mut remote = Vec::new();
    let mut cur = address;
    while cur < end {
      let misalignment = cur & (page_size - 1);
      let len = (page_size - misalignment).min(end - cur);
      remote.push(RemoteIoVec {
        base: usize::try_from(cur).map_err(|_| Errno::EFAULT)?,
        len: len as usize,
      });
      cur += len;
    }
    let mut total = 0;
    for batch in remote.chunks(IOV_BATCH) {
      let wanted: usize = batch.iter().map(|iov| iov.len).sum();
      let read = match process_vm_readv(
        self.pid,
        &mut [IoSliceMut::new(&mut buf[total..total + wanted])],
        batch,
      ) {
        Ok(read) => read,
        Err(e) if total == 0 => return Err(e),
        Err(_) => break,
      };
      total += read;
      if read < wanted {
        break;
      }
    }
    Ok(total)
  }

  fn read_by_ptrace_peek(&self, address: u64, buf: &mut [u8]) -> Result<usize, Errno> {
    let mut copied = 0;
    while copied < buf.len() {
      let cur = address
        .checked_add(copied as u64)
        .ok_or(Errno::EFAULT)?;
      let offset = (cur % WORD_SIZE as u64) as usize;
      let aligned = usize::try_from(cur - offset as u64).map_err(|_| Errno::EFAULT)?;
      let word = match ptrace::read(self.pid, aligned as AddressType) {
        Ok(word) => word,
        Err(e) if copied == 0 => return Err(e),
        Err(_) => break,
      };
      let bytes = word.to_ne_bytes();
      let n = (WORD_SIZE - offset).min(buf.len() - copied);
      buf[copied..copied + n].copy_from_slice(&bytes[offset..offset + n]);
      copied += n;
    }
    Ok(copied)
  }
}

impl MemoryReader for ProcessMemory {
  fn read_bytes(&self, address: u64, buf: &mut [u8]) -> Result<usize, Errno> {
    if buf.is_empty() {
      return Ok(0);
    }
    if self.traced && buf.len() < WORD_SIZE * 2 {
      return self.read_by_ptrace_peek(address, buf);
    }
    if self.use_process_vm_readv.load(Ordering::Relaxed) {
      match self.read_by_process_vm_readv(address, buf) {
        Ok(read) => return Ok(read),
        Err(e @ (Errno::ENOSYS | Errno::EPERM)) => {
          debug!("process_vm_readv unavailable for {}: {e}", self.pid);
          self.use_process_vm_readv.store(false, Ordering::SeqCst);
        }
        Err(e) if !self.traced => return Err(e),
        Err(_) => {}
      }
    }
    if self.traced {
      self.read_by_ptrace_peek(address, buf)
    } else {
      Err(Errno::ENOSYS)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reads_own_memory() {
    let memory = ProcessMemory::current();
    let data = *b"sysaudit\0";
    let mut buf = [0u8; 9];
    match memory.read_bytes(data.as_ptr() as u64, &mut buf) {
      Ok(read) => {
        assert_eq!(read, 9);
        assert_eq!(buf, data);
      }
      // Sandboxes may forbid process_vm_readv entirely.
      Err(Errno::ENOSYS | Errno::EPERM) => {}
      Err(e) => panic!("unexpected error {e}"),
    }
  }

  #[test]
  fn page_size_is_a_power_of_two() {
    assert!(page_size().is_power_of_two());
  }
}
