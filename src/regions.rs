//! Turning a descriptor and live argument values into concrete memory regions.
//!
//! Before the call only rules the kernel reads are walked. After the call only rules
//! the kernel writes are walked, sized by the return value where the descriptor says
//! so. Rules are visited in declaration order and regions come out in the same order.

use enumflags2::{bitflags, BitFlags};
use log::{debug, error, trace};

use crate::{
  args::{SyscallArgs, SyscallReturn},
  config::ScanLimits,
  descriptor::{ArgFlags, ArgRule, ArgType, SizeSpec, SyscallDescriptor},
  error::AuditError,
  memory::{CStringExtent, MemoryReader},
  target::{Target, WordSize},
};

/// What the kernel does with a region during the phase it was resolved for.
#[bitflags]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Access {
  Read = 0b01,
  Write = 0b10,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryRegion {
  pub address: u64,
  pub len: u64,
  pub access: BitFlags<Access>,
  pub kind: ArgType,
  /// The argument the region hangs off.
  pub ordinal: u8,
}

impl MemoryRegion {
  /// One past the last byte, saturating at the top of the address space.
  pub fn end(&self) -> u64 {
    self.address.saturating_add(self.len)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
  Sysenter,
  Sysexit(SyscallReturn),
}

impl Phase {
  fn access(self) -> BitFlags<Access> {
    match self {
      Phase::Sysenter => Access::Read.into(),
      Phase::Sysexit(_) => Access::Write.into(),
    }
  }
}

/// Walks argument rules for one audited process.
///
/// Holds no per-call state; any number of calls may be walked concurrently.
pub struct RegionWalker<'a, M: MemoryReader + ?Sized> {
  word_size: WordSize,
  limits: ScanLimits,
  memory: &'a M,
}

impl<'a, M: MemoryReader + ?Sized> RegionWalker<'a, M> {
  pub fn new(target: &Target, limits: &ScanLimits, memory: &'a M) -> Self {
    Self {
      word_size: target.word_size,
      limits: *limits,
      memory,
    }
  }

  /// Regions the kernel is about to read.
  pub fn sysenter(
    &self,
    desc: &SyscallDescriptor,
    args: &impl SyscallArgs,
  ) -> Result<Vec<MemoryRegion>, AuditError> {
    self.walk(desc, args, Phase::Sysenter)
  }

  /// Regions the kernel has written.
  pub fn sysexit(
    &self,
    desc: &SyscallDescriptor,
    args: &impl SyscallArgs,
    ret: SyscallReturn,
  ) -> Result<Vec<MemoryRegion>, AuditError> {
    self.walk(desc, args, Phase::Sysexit(ret))
  }

  fn check_arity(&self, desc: &SyscallDescriptor, args: &impl SyscallArgs) -> Result<(), AuditError> {
    let expected = desc.arity(self.word_size);
    let actual = args.arg_count();
    if expected != actual {
      error!(
        "{}: descriptor has {expected} arguments, engine captured {actual}",
        desc.name
      );
      return Err(AuditError::ArityMismatch {
        name: desc.name,
        expected,
        actual,
      });
    }
    Ok(())
  }

  fn walk(
    &self,
    desc: &SyscallDescriptor,
    args: &impl SyscallArgs,
    phase: Phase,
  ) -> Result<Vec<MemoryRegion>, AuditError> {
    self.check_arity(desc, args)?;
    let failed = match phase {
      Phase::Sysenter => false,
      Phase::Sysexit(ret) => desc.success.failed(ret),
    };
    let mut regions = Vec::new();
    for rule in desc.rules_for(self.word_size) {
      if !self.applies(desc, rule, phase, failed) {
        continue;
      }
      let address = self.pointer(self.arg(desc, args, rule.ordinal)?);
      if address == 0 {
        debug!("{}: argument {} is NULL", desc.name, rule.ordinal);
        continue;
      }
      match rule.kind {
        ArgType::CString => {
          self.push_cstring(&mut regions, desc, rule.ordinal, address, phase.access());
        }
        ArgType::CStringArray => {
          self.push_cstring_array(&mut regions, desc, rule.ordinal, address, phase.access());
        }
        _ => {
          if let Some(len) = self.length(desc, rule, args, phase)? {
            push(
              &mut regions,
              desc,
              MemoryRegion {
                address,
                len,
                access: phase.access(),
                kind: rule.kind,
                ordinal: rule.ordinal,
              },
            );
          }
        }
      }
    }
    Ok(regions)
  }

  fn applies(&self, desc: &SyscallDescriptor, rule: &ArgRule, phase: Phase, failed: bool) -> bool {
    if rule.is_inline() {
      return false;
    }
    match phase {
      Phase::Sysenter => rule.reads() && !rule.is_return_sized(),
      Phase::Sysexit(_) => {
        if !rule.writes() || desc.superseded_after_call(rule, self.word_size) {
          return false;
        }
        if failed && !rule.flags.contains(ArgFlags::WrittenOnFailure) {
          trace!("{}: call failed, argument {} not written", desc.name, rule.ordinal);
          return false;
        }
        true
      }
    }
  }

  fn arg(&self, desc: &SyscallDescriptor, args: &impl SyscallArgs, ordinal: u8) -> Result<u64, AuditError> {
    args
      .arg(ordinal as usize)
      .ok_or(AuditError::MissingArgument {
        name: desc.name,
        ordinal,
      })
  }

  /// Drop register bits an ILP32 process cannot address.
  fn pointer(&self, value: u64) -> u64 {
    match self.word_size {
      WordSize::Bits32 => value & u32::MAX as u64,
      WordSize::Bits64 => value,
    }
  }

  /// Byte length of the region `rule` describes, or `None` when there is nothing to report.
  fn length(
    &self,
    desc: &SyscallDescriptor,
    rule: &ArgRule,
    args: &impl SyscallArgs,
    phase: Phase,
  ) -> Result<Option<u64>, AuditError> {
    let word_size = self.word_size;
    let count = match rule.size {
      SizeSpec::Inline(_) => return Ok(None),
      SizeSpec::Fixed(size) => size.bytes(word_size),
      SizeSpec::ArgValue(target) => {
        let value = self.arg(desc, args, target)?;
        match desc.primary_rule(target, word_size) {
          Some(source) => match as_count(value, source, word_size) {
            Some(count) => count,
            None => {
              debug!(
                "{}: argument {} takes a negative length from argument {target}",
                desc.name, rule.ordinal
              );
              return Ok(None);
            }
          },
          None => value,
        }
      }
      SizeSpec::ArgPointee(target) => {
        let address = self.pointer(self.arg(desc, args, target)?);
        if address == 0 {
          debug!(
            "{}: length word for argument {} is NULL",
            desc.name, rule.ordinal
          );
          return Ok(None);
        }
        let width = desc
          .primary_rule(target, word_size)
          .map_or(word_size.bytes(), |source| pointee_width(source, word_size));
        match self.memory.read_uint(address, width) {
          Ok(count) => count,
          Err(errno) => {
            debug!(
              "{}: cannot read length word of argument {} at {address:#x}: {errno}",
              desc.name, rule.ordinal
            );
            return Ok(None);
          }
        }
      }
      SizeSpec::ReturnValue => match phase {
        Phase::Sysenter => return Ok(None),
        Phase::Sysexit(ret) => {
          let value = desc.ret.normalize(ret.value, word_size);
          if value <= 0 {
            return Ok(None);
          }
          value as u64
        }
      },
    };
    let len = if rule.flags.contains(ArgFlags::SizeInElements) {
      count.saturating_mul(rule.elem_size.bytes(word_size))
    } else {
      count
    };
    Ok((len > 0).then_some(len))
  }

  fn push_cstring(
    &self,
    regions: &mut Vec<MemoryRegion>,
    desc: &SyscallDescriptor,
    ordinal: u8,
    address: u64,
    access: BitFlags<Access>,
  ) {
    let extent = self.memory.scan_cstring(address, self.limits.max_cstring);
    match extent {
      CStringExtent::Terminated(_) => {}
      CStringExtent::Unreadable(len) => debug!(
        "{}: string in argument {ordinal} unreadable after {} bytes",
        desc.name,
        len - 1
      ),
      CStringExtent::Truncated(len) => debug!(
        "{}: string in argument {ordinal} longer than {len} bytes",
        desc.name
      ),
    }
    push(
      regions,
      desc,
      MemoryRegion {
        address,
        len: extent.len(),
        access,
        kind: ArgType::CString,
        ordinal,
      },
    );
  }

  fn push_cstring_array(
    &self,
    regions: &mut Vec<MemoryRegion>,
    desc: &SyscallDescriptor,
    ordinal: u8,
    address: u64,
    access: BitFlags<Access>,
  ) {
    let word = self.word_size.bytes() as u64;
    let mut strings = Vec::new();
    // Slots covered by the array region, terminator included.
    let mut slots = 0u64;
    let mut cursor = Some(address);
    while let Some(slot) = cursor {
      if slots >= self.limits.max_cstring_array {
        debug!(
          "{}: string array in argument {ordinal} has more than {slots} entries",
          desc.name
        );
        break;
      }
      slots += 1;
      match self.memory.read_word(slot, self.word_size) {
        Ok(0) => break,
        Ok(entry) => strings.push(self.pointer(entry)),
        Err(errno) => {
          debug!(
            "{}: string array in argument {ordinal} unreadable at {slot:#x}: {errno}",
            desc.name
          );
          break;
        }
      }
      cursor = slot.checked_add(word);
    }
    push(
      regions,
      desc,
      MemoryRegion {
        address,
        len: slots.saturating_mul(word),
        access,
        kind: ArgType::CStringArray,
        ordinal,
      },
    );
    for string in strings {
      self.push_cstring(regions, desc, ordinal, string, access);
    }
  }
}

fn push(regions: &mut Vec<MemoryRegion>, desc: &SyscallDescriptor, region: MemoryRegion) {
  if region.len == 0 {
    return;
  }
  trace!(
    "{}: argument {} {:?} {:#x}+{}",
    desc.name,
    region.ordinal,
    region.access,
    region.address,
    region.len
  );
  regions.push(region);
}

/// Interpret a live argument value as a length, honoring the width and signedness the
/// argument is declared with. Negative lengths yield `None`.
fn as_count(value: u64, source: &ArgRule, word_size: WordSize) -> Option<u64> {
  let width = match source.size {
    SizeSpec::Inline(width) => width.bytes(word_size),
    _ => word_size.bytes() as u64,
  }
  .clamp(1, 8);
  let bits = width * 8;
  let value = if bits == 64 {
    value
  } else {
    value & ((1u64 << bits) - 1)
  };
  let negative = (value >> (bits - 1)) & 1 == 1;
  if source.kind == ArgType::SignedInt && negative {
    return None;
  }
  Some(value)
}

/// Width of the integer a length-word argument points at.
fn pointee_width(source: &ArgRule, word_size: WordSize) -> usize {
  match source.size {
    SizeSpec::Fixed(size) if source.flags.contains(ArgFlags::HasType) => {
      size.bytes(word_size).clamp(1, 8) as usize
    }
    _ => word_size.bytes(),
  }
}
