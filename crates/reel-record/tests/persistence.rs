//! Integration test: persisting demos to the filesystem.

use std::fs;
use std::path::Path;

use reel_core::{CompatLevel, TicCmd};
use reel_format::DEMO_MARKER;
use reel_record::{DemoSession, FsStorage, RecordError, RecorderConfig, SessionState};
use reel_test_utils::FixedFooter;

fn session(base: &str) -> DemoSession {
    DemoSession::new(RecorderConfig {
        base_name: Some(base.into()),
        compatibility_level: Some(CompatLevel(2)),
        ..RecorderConfig::default()
    })
}

fn record_one(session: &mut DemoSession, storage: &mut FsStorage) -> std::path::PathBuf {
    session.start().unwrap();
    session
        .record_tic(&TicCmd {
            forward_move: 10,
            ..TicCmd::default()
        })
        .unwrap();
    session
        .stop(&mut FixedFooter(b"ft".to_vec()), storage)
        .unwrap()
        .path
}

#[test]
fn demo_is_written_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = FsStorage::in_dir(dir.path());
    let mut session = session("speedrun.lmp");

    let path = record_one(&mut session, &mut storage);
    assert_eq!(path, Path::new("speedrun.lmp"));
    let bytes = fs::read(dir.path().join(&path)).unwrap();
    assert_eq!(bytes, [10, 0, 0, 0, DEMO_MARKER, b'f', b't']);
}

#[test]
fn existing_files_are_never_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("run.lmp"), b"keep me").unwrap();
    fs::write(dir.path().join("run-00002.lmp"), b"keep me too").unwrap();

    let mut storage = FsStorage::in_dir(dir.path());
    let mut session = session("run");
    let first = record_one(&mut session, &mut storage);
    let second = record_one(&mut session, &mut storage);

    assert_eq!(first, Path::new("run-00003.lmp"));
    assert_eq!(second, Path::new("run-00004.lmp"));
    assert_eq!(fs::read(dir.path().join("run.lmp")).unwrap(), b"keep me");
    assert_eq!(
        fs::read(dir.path().join("run-00002.lmp")).unwrap(),
        b"keep me too"
    );
}

#[test]
fn default_base_name_is_null() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = FsStorage::in_dir(dir.path());
    let mut session = DemoSession::new(RecorderConfig {
        compatibility_level: Some(CompatLevel(2)),
        ..RecorderConfig::default()
    });
    let path = record_one(&mut session, &mut storage);
    assert_eq!(path, Path::new("null.lmp"));
    assert!(dir.path().join("null.lmp").exists());
}

#[test]
fn base_name_can_change_between_recordings() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = FsStorage::in_dir(dir.path());
    let mut session = session("first");
    record_one(&mut session, &mut storage);
    session.set_base_name("second.lmp");
    let path = record_one(&mut session, &mut storage);
    assert_eq!(path, Path::new("second.lmp"));
}

#[test]
fn unwritable_destination_aborts_recording() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = FsStorage::in_dir(dir.path().join("missing"));
    let mut session = session("lost");
    session.start().unwrap();
    session.record_tic(&TicCmd::default()).unwrap();

    let result = session.stop(&mut FixedFooter::default(), &mut storage);
    match result {
        Err(RecordError::Persist { path, .. }) => assert_eq!(path, Path::new("lost.lmp")),
        other => panic!("expected persist error, got {other:?}"),
    }
    assert_eq!(session.state(), SessionState::Aborted);
}
