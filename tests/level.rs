//! Tests for log level functionality.

use rotalog::Level;

#[test]
fn level_ordering() {
    assert!(Level::Trace < Level::Debug);
    assert!(Level::Debug < Level::Info);
    assert!(Level::Info < Level::Warn);
    assert!(Level::Warn < Level::Error);
    assert!(Level::Error < Level::Fatal);
}

#[test]
fn level_display() {
    assert_eq!(Level::Trace.to_string(), "trace");
    assert_eq!(Level::Debug.to_string(), "debug");
    assert_eq!(Level::Info.to_string(), "info");
    assert_eq!(Level::Warn.to_string(), "warn");
    assert_eq!(Level::Error.to_string(), "error");
    assert_eq!(Level::Fatal.label(), "FATAL");
}

#[test]
fn level_from_str() {
    assert_eq!("trace".parse::<Level>().unwrap(), Level::Trace);
    assert_eq!("DEBUG".parse::<Level>().unwrap(), Level::Debug);
    assert_eq!("Info".parse::<Level>().unwrap(), Level::Info);
    assert_eq!("warning".parse::<Level>().unwrap(), Level::Warn);
    assert_eq!("err".parse::<Level>().unwrap(), Level::Error);
}

#[test]
fn level_from_str_invalid() {
    let err = "invalid".parse::<Level>().unwrap_err();
    let err: rotalog::Error = err.into();
    assert!(matches!(err, rotalog::Error::InvalidLevel(s) if s == "invalid"));
}

#[test]
fn level_default() {
    assert_eq!(Level::default(), Level::Debug);
}

#[test]
fn level_try_from_string() {
    assert_eq!(Level::try_from(String::from("error")).unwrap(), Level::Error);
    assert!(Level::try_from(String::from("loud")).is_err());
}
