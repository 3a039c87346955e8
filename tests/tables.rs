mod common;

use common::init_logging;
use sysaudit::{
  bsd_table, validate_all, ArgFlags, MacOsVersion, RawArgs, RegionWalker, ScanLimits, SizeSpec,
  SnapshotMemory, SyscallReturn, Target, WordSize,
};

const WORD_SIZES: [WordSize; 2] = [WordSize::Bits32, WordSize::Bits64];

fn target(word_size: WordSize) -> Target {
  Target::macos(MacOsVersion::LATEST, word_size)
}

#[test]
fn tables_validate() {
  assert_eq!(validate_all(), Ok(()));
}

#[test]
fn all_zero_arguments_touch_nothing() {
  init_logging();
  let memory = SnapshotMemory::new();
  let limits = ScanLimits::default();
  for word_size in WORD_SIZES {
    let walker = RegionWalker::new(&target(word_size), &limits, &memory);
    for desc in bsd_table().iter() {
      let args = RawArgs::new(0, &vec![0; desc.arity(word_size)]);
      assert_eq!(walker.sysenter(desc, &args), Ok(vec![]), "{}", desc.name);
      assert_eq!(
        walker.sysexit(desc, &args, SyscallReturn::success(0)),
        Ok(vec![]),
        "{}",
        desc.name
      );
    }
  }
}

#[test]
fn element_sized_lengths_multiply() {
  let memory = SnapshotMemory::new();
  let limits = ScanLimits::default();
  let mut seen = 0;
  for word_size in WORD_SIZES {
    let walker = RegionWalker::new(&target(word_size), &limits, &memory);
    for desc in bsd_table().iter() {
      for rule in desc.rules_for(word_size) {
        let SizeSpec::ArgValue(count_ordinal) = rule.size else {
          continue;
        };
        if !rule.flags.contains(ArgFlags::SizeInElements) {
          continue;
        }
        let mut values = vec![0; desc.arity(word_size)];
        values[rule.ordinal as usize] = 0x10000;
        values[count_ordinal as usize] = 3;
        let args = RawArgs::new(0, &values);
        let regions = if rule.reads() {
          walker.sysenter(desc, &args).unwrap()
        } else {
          let superseded = desc
            .rules_for(word_size)
            .any(|other| other.ordinal == rule.ordinal && other.size == SizeSpec::ReturnValue);
          if superseded {
            continue;
          }
          walker
            .sysexit(desc, &args, SyscallReturn::success(0))
            .unwrap()
        };
        let region = regions
          .iter()
          .find(|region| region.ordinal == rule.ordinal)
          .unwrap_or_else(|| panic!("{}: no region for argument {}", desc.name, rule.ordinal));
        assert_eq!(region.len, 3 * rule.elem_size.bytes(word_size), "{}", desc.name);
        seen += 1;
      }
    }
  }
  assert!(seen >= 10, "only {seen} element-sized rules exercised");
}

#[test]
fn return_sized_rules_wait_for_the_call() {
  let memory = SnapshotMemory::new();
  let limits = ScanLimits::default();
  let walker = RegionWalker::new(&target(WordSize::Bits64), &limits, &memory);
  for desc in bsd_table().iter() {
    let Some(rule) = desc.args.iter().find(|rule| rule.size == SizeSpec::ReturnValue) else {
      continue;
    };
    let mut values = vec![0; desc.arity(WordSize::Bits64)];
    values[rule.ordinal as usize] = 0x20000;
    let args = RawArgs::new(0, &values);
    let before = walker.sysenter(desc, &args).unwrap();
    assert!(before.iter().all(|r| r.ordinal != rule.ordinal), "{}", desc.name);

    let after = walker
      .sysexit(desc, &args, SyscallReturn::success(5))
      .unwrap();
    let written: Vec<_> = after.iter().filter(|r| r.ordinal == rule.ordinal).collect();
    assert_eq!(written.len(), 1, "{}", desc.name);
    let expected = if rule.flags.contains(ArgFlags::SizeInElements) {
      5 * rule.elem_size.bytes(WordSize::Bits64)
    } else {
      5
    };
    assert_eq!(written[0].len, expected, "{}", desc.name);

    let failed = walker
      .sysexit(desc, &args, SyscallReturn::failure(14))
      .unwrap();
    assert!(failed.iter().all(|r| r.ordinal != rule.ordinal), "{}", desc.name);
  }
}
