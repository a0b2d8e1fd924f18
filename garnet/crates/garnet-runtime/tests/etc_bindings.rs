//! User, group, and sysconf lookups through the `Etc` module object.

#![cfg(unix)]

mod common;

use common::RuntimeFixture;
use garnet_runtime::{etc, Args, ErrorKind, Value};

fn call(fx: &mut RuntimeFixture, name: &str, args: &[Value]) -> garnet_runtime::RunResult<Value> {
    let module = etc::module(&fx.env);
    fx.env.send_str(&module, name, Args::positional(args))
}

fn attr(fx: &mut RuntimeFixture, object: &Value, name: &str) -> Value {
    fx.env.send_str(object, name, Args::empty()).unwrap()
}

#[test]
fn test_getpwuid_root() {
    let mut fx = RuntimeFixture::with_defaults();
    let root = call(&mut fx, "getpwuid", &[Value::Integer(0)]).unwrap();
    assert_eq!(root.class_name(), etc::PASSWD_CLASS);
    assert_eq!(attr(&mut fx, &root, "name"), Value::string("root"));
    assert_eq!(attr(&mut fx, &root, "uid"), Value::Integer(0));
}

#[test]
fn test_getpwnam_matches_getpwuid() {
    let mut fx = RuntimeFixture::with_defaults();
    let by_name = call(&mut fx, "getpwnam", &[Value::string("root")]).unwrap();
    assert_eq!(attr(&mut fx, &by_name, "uid"), Value::Integer(0));
}

#[test]
fn test_getpwnam_missing_user() {
    let mut fx = RuntimeFixture::with_defaults();
    let err = call(&mut fx, "getpwnam", &[Value::string("no-such-user-garnet")]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LookupFailure);
    assert_eq!(err.to_string(), "can't find user for no-such-user-garnet");
}

#[test]
fn test_getpwnam_requires_string() {
    let mut fx = RuntimeFixture::with_defaults();
    let err = call(&mut fx, "getpwnam", &[Value::Integer(0)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatchError);

    let err = call(&mut fx, "getpwnam", &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArityError);
}

#[test]
fn test_getgrgid_root() {
    let mut fx = RuntimeFixture::with_defaults();
    let group = call(&mut fx, "getgrgid", &[Value::Integer(0)]).unwrap();
    assert_eq!(group.class_name(), etc::GROUP_CLASS);
    assert_eq!(attr(&mut fx, &group, "gid"), Value::Integer(0));
    assert!(attr(&mut fx, &group, "mem").as_array().is_some());
}

#[test]
fn test_getgrnam_missing_group() {
    let mut fx = RuntimeFixture::with_defaults();
    let err = call(&mut fx, "getgrnam", &[Value::string("no-such-group-garnet")]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LookupFailure);
    assert_eq!(err.to_string(), "can't find group for no-such-group-garnet");
}

#[test]
fn test_sysconf_pagesize() {
    let mut fx = RuntimeFixture::with_defaults();
    let module = etc::module(&fx.env);
    let name = attr(&mut fx, &module, "SC_PAGESIZE");
    let pagesize = call(&mut fx, "sysconf", &[name]).unwrap();
    let pagesize = pagesize.as_integer().expect("page size is known");
    assert!(pagesize > 0);
    assert_eq!(pagesize & (pagesize - 1), 0);
}

#[test]
fn test_passwd_attributes_are_writable() {
    let mut fx = RuntimeFixture::with_defaults();
    let root = call(&mut fx, "getpwuid", &[Value::Integer(0)]).unwrap();
    fx.env
        .send_str(&root, "shell=", Args::positional(&[Value::string("/bin/false")]))
        .unwrap();
    assert_eq!(attr(&mut fx, &root, "shell"), Value::string("/bin/false"));
}

#[test]
fn test_sysconf_unknown_name_raises() {
    let mut fx = RuntimeFixture::with_defaults();
    let err = call(&mut fx, "sysconf", &[Value::Integer(999_999)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SystemCallError);
}

#[test]
fn test_module_constants() {
    let mut fx = RuntimeFixture::with_defaults();
    let module = etc::module(&fx.env);
    assert_eq!(attr(&mut fx, &module, "VERSION"), Value::string("1.3.0"));
    assert!(attr(&mut fx, &module, "CS_PATH").as_integer().is_some());
    assert_eq!(
        attr(&mut fx, &module, "SC_PAGE_SIZE"),
        attr(&mut fx, &module, "SC_PAGESIZE")
    );
    for name in ["SC_HOST_NAME_MAX", "SC_LOGIN_NAME_MAX", "SC_RE_DUP_MAX", "SC_SYMLOOP_MAX", "SC_TTY_NAME_MAX"] {
        assert!(attr(&mut fx, &module, name).as_integer().is_some(), "{}", name);
    }
}

#[test]
fn test_user_enumeration_through_dispatch() {
    let mut fx = RuntimeFixture::with_defaults();
    assert_eq!(call(&mut fx, "setpwent", &[]).unwrap(), Value::Nil);
    let mut names = Vec::new();
    loop {
        let entry = call(&mut fx, "getpwent", &[]).unwrap();
        if entry.is_nil() {
            break;
        }
        assert_eq!(entry.class_name(), etc::PASSWD_CLASS);
        names.push(attr(&mut fx, &entry, "name"));
    }
    assert_eq!(call(&mut fx, "endpwent", &[]).unwrap(), Value::Nil);
    assert!(names.contains(&Value::string("root")));

    let err = call(&mut fx, "getpwent", &[Value::Integer(1)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArityError);
}

#[test]
fn test_group_enumeration_through_dispatch() {
    let mut fx = RuntimeFixture::with_defaults();
    call(&mut fx, "setgrent", &[]).unwrap();
    let first = call(&mut fx, "getgrent", &[]).unwrap();
    call(&mut fx, "endgrent", &[]).unwrap();
    assert_eq!(first.class_name(), etc::GROUP_CLASS);
}
