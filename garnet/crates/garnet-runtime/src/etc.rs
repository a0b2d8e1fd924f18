//! Etc Module - User and Group Database Bindings
//!
//! Thin adapters over the POSIX user/group database and `sysconf(3)`,
//! answering on the `Etc` module object returned by [`module`].
//!
//! Lookups use the reentrant `*_r` functions with a caller-owned buffer,
//! so they can run on any worker thread. `getlogin(3)` and the database
//! enumeration calls (`getpwent(3)` and friends) have no portable reentrant
//! form and are serialized instead. The enumeration cursor is still shared
//! by the whole process.
//!
//! # Errors
//!
//! - a missing user or group by name is a lookup failure
//!   (`can't find user for NAME`)
//! - a missing id, an unknown `sysconf` name, or a failing libc call is a
//!   system call error
//! - non-string names are a type mismatch

use libc::{c_char, c_int};
use std::ffi::{CStr, CString};
use std::io;
use std::ptr;

use crate::args::Args;
use crate::builtins::wrong_argument_type;
use crate::coerce;
use crate::error::{RunError, RunResult};
use crate::runtime::{Env, Runtime};
use crate::value::{RObject, Value};

pub const MODULE_NAME: &str = "Etc";
pub const PASSWD_CLASS: &str = "Etc::Passwd";
pub const GROUP_CLASS: &str = "Etc::Group";

const INITIAL_BUFFER: usize = 1024;
const MAX_BUFFER: usize = 1 << 20;

/// `sysconf` names exposed as constants on the module
pub const SYSCONF_NAMES: &[(&str, c_int)] = &[
    ("SC_ARG_MAX", libc::_SC_ARG_MAX),
    ("SC_CHILD_MAX", libc::_SC_CHILD_MAX),
    ("SC_HOST_NAME_MAX", libc::_SC_HOST_NAME_MAX),
    ("SC_LOGIN_NAME_MAX", libc::_SC_LOGIN_NAME_MAX),
    ("SC_NGROUPS_MAX", libc::_SC_NGROUPS_MAX),
    ("SC_CLK_TCK", libc::_SC_CLK_TCK),
    ("SC_OPEN_MAX", libc::_SC_OPEN_MAX),
    ("SC_PAGESIZE", libc::_SC_PAGESIZE),
    // POSIX alias of SC_PAGESIZE
    ("SC_PAGE_SIZE", libc::_SC_PAGESIZE),
    ("SC_RE_DUP_MAX", libc::_SC_RE_DUP_MAX),
    ("SC_STREAM_MAX", libc::_SC_STREAM_MAX),
    ("SC_SYMLOOP_MAX", libc::_SC_SYMLOOP_MAX),
    ("SC_TTY_NAME_MAX", libc::_SC_TTY_NAME_MAX),
    ("SC_TZNAME_MAX", libc::_SC_TZNAME_MAX),
    ("SC_VERSION", libc::_SC_VERSION),
];

/// Value of `Etc::VERSION`
pub const VERSION: &str = "1.3.0";

static GETLOGIN_LOCK: parking_lot::Mutex<()> = parking_lot::const_mutex(());

/// Guards the process-wide cursors of `getpwent(3)` and `getgrent(3)`
static ENTRY_LOCK: parking_lot::Mutex<()> = parking_lot::const_mutex(());

/// A user database entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passwd {
    pub name: String,
    pub passwd: String,
    pub uid: libc::uid_t,
    pub gid: libc::gid_t,
    pub gecos: String,
    pub dir: String,
    pub shell: String,
}

/// A group database entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub passwd: String,
    pub gid: libc::gid_t,
    pub mem: Vec<String>,
}

/// Copy a C string; null reads as empty.
///
/// # Safety
///
/// `ptr` is null or points to a NUL-terminated string.
unsafe fn owned_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    CStr::from_ptr(ptr).to_string_lossy().into_owned()
}

impl Passwd {
    /// # Safety
    ///
    /// The string fields of `raw` must be valid for reads.
    unsafe fn from_raw(raw: &libc::passwd) -> Self {
        Self {
            name: owned_string(raw.pw_name),
            passwd: owned_string(raw.pw_passwd),
            uid: raw.pw_uid,
            gid: raw.pw_gid,
            gecos: owned_string(raw.pw_gecos),
            dir: owned_string(raw.pw_dir),
            shell: owned_string(raw.pw_shell),
        }
    }

    pub fn to_value(&self, env: &Env) -> Value {
        let fields = [
            ("name", Value::string(&self.name)),
            ("passwd", Value::string(&self.passwd)),
            ("uid", Value::Integer(i64::from(self.uid))),
            ("gid", Value::Integer(i64::from(self.gid))),
            ("gecos", Value::string(&self.gecos)),
            ("dir", Value::string(&self.dir)),
            ("shell", Value::string(&self.shell)),
        ];
        Value::object(RObject::with_fields(
            env.intern(PASSWD_CLASS),
            fields.into_iter().map(|(k, v)| (env.intern(k), v)),
        ))
    }
}

impl Group {
    /// # Safety
    ///
    /// The string fields of `raw` and the `gr_mem` list must be valid for reads.
    unsafe fn from_raw(raw: &libc::group) -> Self {
        let mut mem = Vec::new();
        let mut cursor = raw.gr_mem;
        if !cursor.is_null() {
            while !(*cursor).is_null() {
                mem.push(owned_string(*cursor));
                cursor = cursor.add(1);
            }
        }
        Self {
            name: owned_string(raw.gr_name),
            passwd: owned_string(raw.gr_passwd),
            gid: raw.gr_gid,
            mem,
        }
    }

    pub fn to_value(&self, env: &Env) -> Value {
        let members = self.mem.iter().map(Value::string).collect();
        let fields = [
            ("name", Value::string(&self.name)),
            ("passwd", Value::string(&self.passwd)),
            ("gid", Value::Integer(i64::from(self.gid))),
            ("mem", Value::array(members)),
        ];
        Value::object(RObject::with_fields(
            env.intern(GROUP_CLASS),
            fields.into_iter().map(|(k, v)| (env.intern(k), v)),
        ))
    }
}

/// Drive a `get*_r` call, growing the buffer on `ERANGE`.
fn lookup<T, R, F, C>(mut call: F, convert: C) -> io::Result<Option<R>>
where
    T: Copy,
    F: FnMut(&mut T, &mut [c_char], &mut *mut T) -> c_int,
    C: FnOnce(&T) -> R,
{
    let mut buffer: Vec<c_char> = vec![0; INITIAL_BUFFER];
    loop {
        // SAFETY: passwd and group are plain C structs for which all-zero is valid
        let mut entry: T = unsafe { std::mem::zeroed() };
        let mut result: *mut T = ptr::null_mut();
        let rc = call(&mut entry, buffer.as_mut_slice(), &mut result);

        if rc == libc::ERANGE && buffer.len() < MAX_BUFFER {
            let grown = buffer.len() * 2;
            buffer.resize(grown, 0);
            continue;
        }
        // Some libcs report a missing entry through errno-style codes
        if matches!(rc, libc::ENOENT | libc::ESRCH | libc::EBADF | libc::EPERM) {
            return Ok(None);
        }
        if rc != 0 {
            return Err(io::Error::from_raw_os_error(rc));
        }
        if result.is_null() {
            return Ok(None);
        }
        return Ok(Some(convert(&entry)));
    }
}

fn c_name(name: &str) -> io::Result<CString> {
    CString::new(name).map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "string contains null byte"))
}

pub fn getpwnam(name: &str) -> io::Result<Option<Passwd>> {
    let name = c_name(name)?;
    lookup(
        |pwd: &mut libc::passwd, buf: &mut [c_char], result: &mut *mut libc::passwd| unsafe {
            libc::getpwnam_r(name.as_ptr(), pwd, buf.as_mut_ptr(), buf.len(), result)
        },
        |pwd| unsafe { Passwd::from_raw(pwd) },
    )
}

pub fn getpwuid(uid: libc::uid_t) -> io::Result<Option<Passwd>> {
    lookup(
        |pwd: &mut libc::passwd, buf: &mut [c_char], result: &mut *mut libc::passwd| unsafe {
            libc::getpwuid_r(uid, pwd, buf.as_mut_ptr(), buf.len(), result)
        },
        |pwd| unsafe { Passwd::from_raw(pwd) },
    )
}

pub fn getgrnam(name: &str) -> io::Result<Option<Group>> {
    let name = c_name(name)?;
    lookup(
        |grp: &mut libc::group, buf: &mut [c_char], result: &mut *mut libc::group| unsafe {
            libc::getgrnam_r(name.as_ptr(), grp, buf.as_mut_ptr(), buf.len(), result)
        },
        |grp| unsafe { Group::from_raw(grp) },
    )
}

pub fn getgrgid(gid: libc::gid_t) -> io::Result<Option<Group>> {
    lookup(
        |grp: &mut libc::group, buf: &mut [c_char], result: &mut *mut libc::group| unsafe {
            libc::getgrgid_r(gid, grp, buf.as_mut_ptr(), buf.len(), result)
        },
        |grp| unsafe { Group::from_raw(grp) },
    )
}

/// Login name of the controlling terminal, else `$USER`
pub fn getlogin() -> Option<String> {
    let from_terminal = {
        let _guard = GETLOGIN_LOCK.lock();
        // SAFETY: the returned buffer is copied before the lock is released
        unsafe {
            let login = libc::getlogin();
            (!login.is_null()).then(|| owned_string(login))
        }
    };
    from_terminal.or_else(|| std::env::var("USER").ok())
}

/// Next entry of the user database, `None` at the end
pub fn getpwent() -> Option<Passwd> {
    let _guard = ENTRY_LOCK.lock();
    // SAFETY: the static entry is copied before the lock is released
    unsafe {
        let pwd = libc::getpwent();
        (!pwd.is_null()).then(|| Passwd::from_raw(&*pwd))
    }
}

/// Rewind the user database cursor
pub fn setpwent() {
    let _guard = ENTRY_LOCK.lock();
    // SAFETY: no preconditions
    unsafe { libc::setpwent() }
}

/// Close the user database
pub fn endpwent() {
    let _guard = ENTRY_LOCK.lock();
    // SAFETY: no preconditions
    unsafe { libc::endpwent() }
}

/// Next entry of the group database, `None` at the end
pub fn getgrent() -> Option<Group> {
    let _guard = ENTRY_LOCK.lock();
    // SAFETY: the static entry and its member list are copied before the
    // lock is released
    unsafe {
        let grp = libc::getgrent();
        (!grp.is_null()).then(|| Group::from_raw(&*grp))
    }
}

pub fn setgrent() {
    let _guard = ENTRY_LOCK.lock();
    // SAFETY: no preconditions
    unsafe { libc::setgrent() }
}

pub fn endgrent() {
    let _guard = ENTRY_LOCK.lock();
    // SAFETY: no preconditions
    unsafe { libc::endgrent() }
}

/// Reset the calling thread's errno
fn clear_errno() {
    // SAFETY: the errno location is thread-local and always valid
    unsafe {
        #[cfg(any(target_os = "linux", target_os = "android", target_os = "emscripten"))]
        {
            *libc::__errno_location() = 0;
        }
        #[cfg(any(
            target_os = "macos",
            target_os = "ios",
            target_os = "freebsd",
            target_os = "dragonfly"
        ))]
        {
            *libc::__error() = 0;
        }
        #[cfg(any(target_os = "netbsd", target_os = "openbsd"))]
        {
            *libc::__errno() = 0;
        }
    }
}

/// `sysconf(3)`.
///
/// `Ok(None)` for a limit that is indeterminate; an unknown name sets errno
/// and is an error.
pub fn sysconf(name: c_int) -> io::Result<Option<i64>> {
    clear_errno();
    // SAFETY: sysconf has no memory-safety preconditions
    let value = unsafe { libc::sysconf(name) };
    if value < 0 {
        let err = io::Error::last_os_error();
        return match err.raw_os_error() {
            Some(0) | None => Ok(None),
            Some(_) => Err(err),
        };
    }
    Ok(Some(i64::from(value)))
}

/// The `Etc` module object, carrying `VERSION`, `CS_PATH` and the `SC_*`
/// constants as attributes
pub fn module(env: &Env) -> Value {
    let mut constants = vec![
        (env.intern("VERSION"), Value::string(VERSION)),
        (env.intern("CS_PATH"), Value::Integer(i64::from(libc::_CS_PATH))),
    ];
    constants.extend(
        SYSCONF_NAMES
            .iter()
            .map(|(name, value)| (env.intern(name), Value::Integer(i64::from(*value)))),
    );
    Value::object(RObject::with_fields(env.intern(MODULE_NAME), constants))
}

fn name_argument(args: Args<'_>) -> RunResult<&str> {
    args.ensure_argc_is(1)?;
    match args.at(0) {
        Value::String(s) => Ok(&**s),
        other => Err(wrong_argument_type(other, "String")),
    }
}

fn os_error(err: io::Error) -> RunError {
    if err.raw_os_error().is_none() && err.kind() == io::ErrorKind::InvalidInput {
        return RunError::Argument(err.to_string());
    }
    RunError::Os(err.to_string())
}

fn id_argument<T: TryFrom<i64>>(env: &mut Env, args: Args<'_>, current: T) -> RunResult<T> {
    args.ensure_argc_between(0, 1)?;
    match args.get(0) {
        None => Ok(current),
        Some(value) => {
            let id = coerce::to_int(env, value)?;
            T::try_from(id).map_err(|_| RunError::Argument(format!("id {} out of range", id)))
        }
    }
}

fn etc_getlogin(_env: &mut Env, _receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    Ok(Value::from(getlogin()))
}

fn etc_getpwnam(env: &mut Env, _receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    let name = name_argument(args)?;
    match getpwnam(name).map_err(os_error)? {
        Some(pwd) => Ok(pwd.to_value(env)),
        None => Err(RunError::Lookup(format!("can't find user for {}", name))),
    }
}

fn etc_getgrnam(env: &mut Env, _receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    let name = name_argument(args)?;
    match getgrnam(name).map_err(os_error)? {
        Some(grp) => Ok(grp.to_value(env)),
        None => Err(RunError::Lookup(format!("can't find group for {}", name))),
    }
}

fn etc_getpwuid(env: &mut Env, _receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    // SAFETY: getuid cannot fail
    let current = unsafe { libc::getuid() };
    let uid = id_argument(env, args, current)?;
    match getpwuid(uid).map_err(os_error)? {
        Some(pwd) => Ok(pwd.to_value(env)),
        None => Err(RunError::Os(format!("can't find user for {}", uid))),
    }
}

fn etc_getgrgid(env: &mut Env, _receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    // SAFETY: getgid cannot fail
    let current = unsafe { libc::getgid() };
    let gid = id_argument(env, args, current)?;
    match getgrgid(gid).map_err(os_error)? {
        Some(grp) => Ok(grp.to_value(env)),
        None => Err(RunError::Os(format!("can't find group for {}", gid))),
    }
}

fn etc_sysconf(env: &mut Env, _receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(1)?;
    let name = coerce::to_int(env, args.at(0))?;
    let name = c_int::try_from(name)
        .map_err(|_| RunError::Argument(format!("sysconf name {} out of range", name)))?;
    let value = sysconf(name).map_err(os_error)?;
    Ok(value.map_or(Value::Nil, Value::Integer))
}

fn etc_getpwent(env: &mut Env, _receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    Ok(getpwent().map_or(Value::Nil, |pwd| pwd.to_value(env)))
}

fn etc_getgrent(env: &mut Env, _receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    Ok(getgrent().map_or(Value::Nil, |grp| grp.to_value(env)))
}

fn etc_setpwent(_env: &mut Env, _receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    setpwent();
    Ok(Value::Nil)
}

fn etc_endpwent(_env: &mut Env, _receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    endpwent();
    Ok(Value::Nil)
}

fn etc_setgrent(_env: &mut Env, _receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    setgrent();
    Ok(Value::Nil)
}

fn etc_endgrent(_env: &mut Env, _receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    endgrent();
    Ok(Value::Nil)
}

pub(crate) fn register(runtime: &mut Runtime) {
    runtime.define_method(MODULE_NAME, "getlogin", etc_getlogin);
    runtime.define_method(MODULE_NAME, "getpwnam", etc_getpwnam);
    runtime.define_method(MODULE_NAME, "getgrnam", etc_getgrnam);
    runtime.define_method(MODULE_NAME, "getpwuid", etc_getpwuid);
    runtime.define_method(MODULE_NAME, "getgrgid", etc_getgrgid);
    runtime.define_method(MODULE_NAME, "sysconf", etc_sysconf);
    runtime.define_method(MODULE_NAME, "getpwent", etc_getpwent);
    runtime.define_method(MODULE_NAME, "setpwent", etc_setpwent);
    runtime.define_method(MODULE_NAME, "endpwent", etc_endpwent);
    runtime.define_method(MODULE_NAME, "getgrent", etc_getgrent);
    runtime.define_method(MODULE_NAME, "setgrent", etc_setgrent);
    runtime.define_method(MODULE_NAME, "endgrent", etc_endgrent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_user() {
        let root = getpwuid(0).unwrap().expect("uid 0 exists");
        assert_eq!(root.uid, 0);
        let by_name = getpwnam(&root.name).unwrap().expect("root by name");
        assert_eq!(by_name, root);
    }

    #[test]
    fn test_root_group() {
        let group = getgrgid(0).unwrap().expect("gid 0 exists");
        assert_eq!(group.gid, 0);
        let by_name = getgrnam(&group.name).unwrap().expect("group by name");
        assert_eq!(by_name.gid, 0);
    }

    #[test]
    fn test_missing_entries() {
        assert_eq!(getpwnam("garnet-no-such-user").unwrap(), None);
        assert_eq!(getgrnam("garnet-no-such-group").unwrap(), None);
    }

    #[test]
    fn test_nul_in_name() {
        let err = getpwnam("a\0b").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_sysconf() {
        assert!(sysconf(libc::_SC_PAGESIZE).unwrap().unwrap() > 0);
    }

    #[test]
    fn test_sysconf_unknown_name_is_an_error() {
        let err = sysconf(999_999).unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::EINVAL));
    }

    #[test]
    fn test_enumerate_users_finds_root() {
        setpwent();
        let mut found = false;
        while let Some(pwd) = getpwent() {
            if pwd.uid == 0 {
                found = true;
                break;
            }
        }
        endpwent();
        assert!(found);
    }

    #[test]
    fn test_enumerate_groups_terminates() {
        setgrent();
        let mut count = 0;
        while getgrent().is_some() {
            count += 1;
        }
        endgrent();
        assert!(count > 0);
    }
}
