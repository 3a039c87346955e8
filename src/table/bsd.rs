//! Darwin BSD syscalls (the Unix trap class).
//!
//! Each entry reads `name = number -> return (argument: rule | rule, ...)`.
//! A bare type is passed by value. `in`, `out` and `inout` mark a pointer the
//! kernel reads, writes or both. `[T; n]` sizes a buffer by another argument's
//! value, `[T; *n]` by the integer argument `n` points at, and `[T; ret]` by the
//! return value.

#![allow(non_upper_case_globals)]

use sysaudit_macros::gen_syscall_table;

use crate::types::*;

gen_syscall_table! {
  pub static BSD_SYSCALLS;
  pub enum BsdSyscall;

  exit = 1 -> void (status: int),
  fork = 2 -> pid_t (),
  read = 3 -> long (fd: int, buf: out [u8; count] | out [u8; ret], count: size_t),
  write = 4 -> long (fd: int, buf: in [u8; count], count: size_t),
  open = 5 -> int (path: in cstr, flags: int, mode: int),
  close = 6 -> int (fd: int),
  wait4 = 7 -> pid_t (pid: pid_t, status: out int, options: int, rusage: out rusage),
  link = 9 -> int (path: in cstr, link: in cstr),
  unlink = 10 -> int (path: in cstr),
  chdir = 12 -> int (path: in cstr),
  fchdir = 13 -> int (fd: int),
  mknod = 14 -> int (path: in cstr, mode: int, dev: int),
  chmod = 15 -> int (path: in cstr, mode: int),
  chown = 16 -> int (path: in cstr, uid: uid_t, gid: gid_t),
  getfsstat = 18 -> int (buf: out [u8; bufsize], bufsize: int, flags: int),
  getpid = 20 -> pid_t (),
  setuid = 23 -> int (uid: uid_t),
  getuid = 24 -> uid_t (),
  geteuid = 25 -> uid_t (),
  ptrace = 26 -> int (req: int, pid: pid_t, addr: ptr, data: int),
  recvmsg = 27 -> long (s: int, msg: inout msghdr, flags: int),
  sendmsg = 28 -> long (s: int, msg: in msghdr, flags: int),
  recvfrom = 29 -> long (
    s: int,
    buf: out [u8; len] | out [u8; ret],
    len: size_t,
    flags: int,
    from: out [u8; *fromlenaddr],
    fromlenaddr: inout socklen_t,
  ),
  accept = 30 -> int (s: int, name: out [u8; *anamelen], anamelen: inout socklen_t),
  getpeername = 31 -> int (fdes: int, asa: out [u8; *alen], alen: inout socklen_t),
  getsockname = 32 -> int (fdes: int, asa: out [u8; *alen], alen: inout socklen_t),
  access = 33 -> int (path: in cstr, flags: int),
  chflags = 34 -> int (path: in cstr, flags: uint),
  fchflags = 35 -> int (fd: int, flags: uint),
  sync = 36 -> int (),
  kill = 37 -> int (pid: int, signum: int, posix: int),
  getppid = 39 -> pid_t (),
  dup = 41 -> int (fd: uint),
  pipe = 42 -> int (),
  getegid = 43 -> gid_t (),
  sigaction = 46 -> int (signum: int, nsa: in __sigaction, osa: out sigaction),
  getgid = 47 -> gid_t (),
  sigprocmask = 48 -> int (how: int, mask: in sigset_t, omask: out sigset_t),
  getlogin = 49 -> int (namebuf: out [u8; namelen], namelen: uint),
  setlogin = 50 -> int (namebuf: in cstr),
  acct = 51 -> int (path: in cstr),
  sigpending = 52 -> int (osv: out sigset_t),
  sigaltstack = 53 -> int (nss: in stack_t, oss: out stack_t),
  /// The third argument's shape depends on the request code.
  ioctl = 54 -> int (fd: int, com: ulong, data: ptr),
  reboot = 55 -> int (opt: int, command: in cstr),
  revoke = 56 -> int (path: in cstr),
  symlink = 57 -> int (path: in cstr, link: in cstr),
  readlink = 58 -> long (path: in cstr, buf: out [u8; count] | out [u8; ret], count: size_t),
  execve = 59 -> int (fname: in cstr, argp: in cstr_array, envp: in cstr_array),
  umask = 60 -> int (newmask: int),
  chroot = 61 -> int (path: in cstr),
  msync = 65 -> int (addr: ptr, len: size_t, flags: int),
  vfork = 66 -> pid_t (),
  munmap = 73 -> int (addr: ptr, len: size_t),
  mprotect = 74 -> int (addr: ptr, len: size_t, prot: int),
  madvise = 75 -> int (addr: ptr, len: size_t, behav: int),
  getgroups = 79 -> int (gidsetsize: uint, gidset: out [gid_t; gidsetsize] | out [gid_t; ret]),
  setgroups = 80 -> int (gidsetsize: uint, gidset: in [gid_t; gidsetsize]),
  getpgrp = 81 -> pid_t (),
  setpgid = 82 -> int (pid: int, pgid: int),
  setitimer = 83 -> int (which: uint, itv: in itimerval, oitv: out itimerval),
  getitimer = 86 -> int (which: uint, itv: out itimerval),
  getdtablesize = 89 -> int (),
  dup2 = 90 -> int (from: uint, to: uint),
  fcntl = 92 -> int (fd: int, cmd: int, arg: long),
  fsync = 95 -> int (fd: int),
  setpriority = 96 -> int (which: int, who: id_t, prio: int),
  socket = 97 -> int (domain: int, kind: int, protocol: int),
  connect = 98 -> int (s: int, name: in [u8; namelen], namelen: socklen_t),
  getpriority = 100 -> int (which: int, who: id_t),
  bind = 104 -> int (s: int, name: in [u8; namelen], namelen: socklen_t),
  setsockopt = 105 -> int (s: int, level: int, name: int, val: in [u8; valsize], valsize: socklen_t),
  listen = 106 -> int (s: int, backlog: int),
  sigsuspend = 111 -> int (mask: sigset_t),
  gettimeofday = 116 -> int (tp: out timeval, tzp: out timezone),
  getrusage = 117 -> int (who: int, rusage: out rusage),
  getsockopt = 118 -> int (
    s: int,
    level: int,
    name: int,
    val: out [u8; *avalsize],
    avalsize: inout socklen_t,
  ),
  readv = 120 -> long (fd: int, iovp: in [iovec; iovcnt], iovcnt: uint),
  writev = 121 -> long (fd: int, iovp: in [iovec; iovcnt], iovcnt: uint),
  settimeofday = 122 -> int (tv: in timeval, tzp: in timezone),
  fchown = 123 -> int (fd: int, uid: uid_t, gid: gid_t),
  fchmod = 124 -> int (fd: int, mode: int),
  setreuid = 126 -> int (ruid: uid_t, euid: uid_t),
  setregid = 127 -> int (rgid: gid_t, egid: gid_t),
  rename = 128 -> int (from: in cstr, to: in cstr),
  flock = 131 -> int (fd: int, how: int),
  mkfifo = 132 -> int (path: in cstr, mode: int),
  sendto = 133 -> long (
    s: int,
    buf: in [u8; len],
    len: size_t,
    flags: int,
    to: in [u8; tolen],
    tolen: socklen_t,
  ),
  shutdown = 134 -> int (s: int, how: int),
  socketpair = 135 -> int (domain: int, kind: int, protocol: int, rsv: out [int; 2]),
  mkdir = 136 -> int (path: in cstr, mode: int),
  rmdir = 137 -> int (path: in cstr),
  utimes = 138 -> int (path: in cstr, tptr: in [timeval; 2]),
  futimes = 139 -> int (fd: int, tptr: in [timeval; 2]),
  adjtime = 140 -> int (delta: in timeval, olddelta: out timeval),
  gethostuuid = 142 -> int (uuid_buf: out uuid_t, timeoutp: in timespec),
  setsid = 147 -> pid_t (),
  getpgid = 151 -> pid_t (pid: pid_t),
  setprivexec = 152 -> int (flag: int),
  pread = 153 -> long (fd: int, buf: out [u8; nbyte] | out [u8; ret], nbyte: size_t, offset: off_t),
  pwrite = 154 -> long (fd: int, buf: in [u8; nbyte], nbyte: size_t, offset: off_t),
  unmount = 159 -> int (path: in cstr, flags: int),
  quotactl = 165 -> int (path: in cstr, cmd: int, uid: int, arg: ptr),
  mount = 167 -> int (kind: in cstr, path: in cstr, flags: int, data: ptr),
  csops = 169 -> int (pid: pid_t, ops: u32, useraddr: out [u8; usersize], usersize: size_t),
  waitid = 173 -> int (idtype: int, id: id_t, infop: out siginfo_t, options: int),
  setgid = 181 -> int (gid: gid_t),
  setegid = 182 -> int (egid: gid_t),
  seteuid = 183 -> int (euid: uid_t),
  sigreturn = 184 -> int (uctx: ptr, infostyle: int),
  #[until(sierra)]
  chud = 185 -> int (code: u64, arg1: u64, arg2: u64, arg3: u64, arg4: u64, arg5: u64),
  fdatasync = 187 -> int (fd: int),
  pathconf = 191 -> long (path: in cstr, name: int),
  fpathconf = 192 -> long (fd: int, name: int),
  getrlimit = 194 -> int (which: uint, rlp: out rlimit),
  setrlimit = 195 -> int (which: uint, rlp: in rlimit),
  getdirentries = 196 -> int (
    fd: int,
    buf: out [u8; count] | out [u8; ret],
    count: uint,
    basep: out long,
  ),
  mmap = 197 -> ptr (addr: ptr, len: size_t, prot: int, flags: int, fd: int, pos: off_t),
  #[ret64]
  lseek = 199 -> off_t (fd: int, offset: off_t, whence: int),
  truncate = 200 -> int (path: in cstr, length: off_t),
  ftruncate = 201 -> int (fd: int, length: off_t),
  __sysctl = 202 -> int (
    name: in [int; namelen],
    namelen: uint,
    old: out [u8; *oldlenp],
    oldlenp: inout size_t,
    new: in [u8; newlen],
    newlen: size_t,
  ),
  mlock = 203 -> int (addr: ptr, len: size_t),
  munlock = 204 -> int (addr: ptr, len: size_t),
  undelete = 205 -> int (path: in cstr),
  /// Only the path is known to be touched.
  #[unknown]
  statv = 217 -> int (path: in cstr, sb: ptr),
  getattrlist = 220 -> int (
    path: in cstr,
    alist: in attrlist,
    attributebuf: out [u8; bufsize],
    bufsize: size_t,
    options: ulong,
  ),
  setattrlist = 221 -> int (
    path: in cstr,
    alist: in attrlist,
    attributebuf: in [u8; bufsize],
    bufsize: size_t,
    options: ulong,
  ),
  /// The last two arguments travel on the stack and are only described for 32-bit.
  getdirentriesattr = 222 -> int (
    fd: int,
    alist: in attrlist,
    buffer: out [u8; buffersize],
    buffersize: size_t,
    count: inout ulong,
    basep: out ulong,
    #[ilp32] newstate: out ulong,
    #[ilp32] options: ulong,
  ),
  exchangedata = 223 -> int (path1: in cstr, path2: in cstr, options: ulong),
  poll = 230 -> int (fds: inout [pollfd; nfds], nfds: uint, timeout: int),
  getxattr = 234 -> long (
    path: in cstr,
    attrname: in cstr,
    value: out [u8; size] | out [u8; ret],
    size: size_t,
    position: u32,
    options: int,
  ),
  setxattr = 236 -> int (
    path: in cstr,
    attrname: in cstr,
    value: in [u8; size],
    size: size_t,
    position: u32,
    options: int,
  ),
  listxattr = 240 -> long (
    path: in cstr,
    namebuf: out [u8; bufsize] | out [u8; ret],
    bufsize: size_t,
    options: int,
  ),
  fsctl = 242 -> int (path: in cstr, cmd: ulong, data: ptr, options: uint),
  /// The file actions argument is opaque.
  #[unknown]
  posix_spawn = 244 -> int (
    pid: out pid_t,
    path: in cstr,
    adesc: ptr,
    argv: in cstr_array,
    envp: in cstr_array,
  ),
  shm_open = 266 -> int (name: in cstr, oflag: int, mode: int),
  sem_open = 268 -> ptr (name: in cstr, oflag: int, mode: int, value: int),
  sem_close = 269 -> int (sem: in sem_t),
  sem_unlink = 270 -> int (name: in cstr),
  sem_wait = 271 -> int (sem: in sem_t),
  sem_post = 273 -> int (sem: in sem_t),
  #[until(yosemite)]
  sem_getvalue = 274 -> int (sem: in sem_t, sval: out int),
  #[since(yosemite)]
  sysctlbyname = 274 -> int (
    name: in [u8; namelen],
    namelen: size_t,
    old: out [u8; *oldlenp],
    oldlenp: inout size_t,
    new: in [u8; newlen],
    newlen: size_t,
  ),
  sem_init = 275 -> int (sem: out sem_t, pshared: int, value: uint),
  sem_destroy = 276 -> int (sem: in sem_t),
  chmod_extended = 282 -> int (path: in cstr, uid: uid_t, gid: gid_t, mode: int, xsecurity: ptr),
  settid = 285 -> int (uid: uid_t, gid: gid_t),
  gettid = 286 -> int (uidp: out uid_t, gidp: out gid_t),
  psynch_mutexwait = 301 -> uint (mutex: ptr, mgen: u32, ugen: u32, tid: u64, flags: u32),
  /// The timeout words are passed on the stack and are only described for 32-bit.
  psynch_cvwait = 305 -> uint (
    cv: ptr,
    cvlsgen: u64,
    cvugen: u32,
    mutex: ptr,
    mugen: u64,
    flags: u32,
    #[ilp32] sec: i64,
    #[ilp32] nsec: u32,
  ),
  psynch_rw_rdlock = 306 -> uint (rwlock: ptr, lgenval: u32, ugenval: u32, rw_wc: u32, flags: int),
  getsid = 310 -> pid_t (pid: pid_t),
  issetugid = 327 -> int (),
  __pthread_kill = 328 -> int (thread_port: int, sig: int),
  __pthread_sigmask = 329 -> int (how: int, set: in sigset_t, oset: out sigset_t),
  __disable_threadsignal = 331 -> int (value: int),
  __pthread_markcancel = 332 -> int (thread_port: int),
  __pthread_canceled = 333 -> int (action: int),
  __semwait_signal = 334 -> int (
    cond_sem: int,
    mutex_sem: int,
    timeout: int,
    relative: int,
    tv_sec: i64,
    tv_nsec: i32,
  ),
  proc_info = 336 -> int (
    callnum: i32,
    pid: i32,
    flavor: u32,
    arg: u64,
    buffer: out [u8; buffersize] | out [u8; ret],
    buffersize: i32,
  ),
  stat64 = 338 -> int (path: in cstr, ub: out stat64),
  fstat64 = 339 -> int (fd: int, ub: out stat64),
  lstat64 = 340 -> int (path: in cstr, ub: out stat64),
  getdirentries64 = 344 -> long (
    fd: int,
    buf: out [u8; bufsize] | out [u8; ret],
    bufsize: size_t,
    position: out off_t,
  ),
  statfs64 = 345 -> int (path: in cstr, buf: out statfs64),
  fstatfs64 = 346 -> int (fd: int, buf: out statfs64),
  getfsstat64 = 347 -> int (buf: out [u8; bufsize], bufsize: int, flags: int),
  bsdthread_create = 360 -> ptr (func: ptr, func_arg: ptr, stack: ptr, pthread: ptr, flags: u32),
  kqueue = 362 -> int (),
  kevent = 363 -> int (
    fd: int,
    changelist: in [kevent; nchanges],
    nchanges: int,
    eventlist: out [kevent; nevents] | out [kevent; ret],
    nevents: int,
    timeout: in timespec,
  ),
  #[until(sierra)]
  stack_snapshot = 365 -> int (
    pid: pid_t,
    tracebuf: out [u8; tracebuf_size],
    tracebuf_size: u32,
    flags: u32,
    dispatch_offset: u32,
  ),
  bsdthread_register = 366 -> int (
    threadstart: ptr,
    wqthread: ptr,
    pthsize: int,
    dummy_value: ptr,
    targetconc_ptr: ptr,
    dispatchqueue_offset: u64,
  ),
  workq_open = 367 -> int (),
  /// The timeout pointer is only described for 32-bit.
  kevent64 = 369 -> int (
    fd: int,
    changelist: in [kevent64_s; nchanges],
    nchanges: int,
    eventlist: out [kevent64_s; nevents] | out [kevent64_s; ret],
    nevents: int,
    flags: uint,
    #[ilp32] timeout: in timespec,
  ),
  #[ret64]
  thread_selfid = 372 -> u64 (),
  #[until(el_capitan)]
  __mac_get_lcid = 391 -> int (lcid: pid_t, mac_p: inout mac),
  #[until(el_capitan)]
  __mac_get_lctx = 392 -> int (mac_p: inout mac),
  #[until(el_capitan)]
  __mac_set_lctx = 393 -> int (mac_p: in mac),
  #[until(el_capitan)]
  setlcid = 394 -> int (pid: pid_t, lcid: pid_t),
  #[until(el_capitan)]
  getlcid = 395 -> pid_t (pid: pid_t),
  read_nocancel = 396 -> long (fd: int, buf: out [u8; count] | out [u8; ret], count: size_t),
  write_nocancel = 397 -> long (fd: int, buf: in [u8; count], count: size_t),
  open_nocancel = 398 -> int (path: in cstr, flags: int, mode: int),
  close_nocancel = 399 -> int (fd: int),
  sigsuspend_nocancel = 410 -> int (mask: sigset_t),
  pid_hibernate = 435 -> int (pid: int),
  shared_region_map_and_slide_np = 438 -> int (
    fd: int,
    count: u32,
    mappings: in [shared_file_mapping_np; count],
    slide: u32,
    slide_start: in [u8; slide_size],
    slide_size: u32,
  ),
}
