use super::*;
use crate::sink::RecordingSink;
use std::path::PathBuf;
use tempfile::tempdir;

/// Tree shape below `root` as rendered by recurse_fs, relative to `root`.
fn shape(root: &Path) -> Vec<String> {
    let prefix = root.to_string_lossy().into_owned();
    Gmsfs::new()
        .recurse_fs(root)
        .into_iter()
        .map(|line| line.replacen(&prefix, "", 1))
        .collect()
}

#[test]
fn copy_file_round_trips_bytes() {
    let tmp = tempdir().expect("create temp dir");
    let src = tmp.path().join("src.bin");
    let dst = tmp.path().join("dst.bin");
    let payload: Vec<u8> = (0..=255u8).cycle().take(70_000).collect();
    fs::write(&src, &payload).expect("write");

    Gmsfs::new().copy_file(&src, &dst).expect("copy");

    assert_eq!(fs::read(&dst).expect("read"), payload);
}

#[test]
fn copy_file_overwrites_existing_destination() {
    let tmp = tempdir().expect("create temp dir");
    let src = tmp.path().join("src");
    let dst = tmp.path().join("dst");
    fs::write(&src, b"short").expect("write src");
    fs::write(&dst, b"much longer old contents").expect("write dst");

    Gmsfs::new().copy_file(&src, &dst).expect("copy");
    assert_eq!(fs::read(&dst).expect("read"), b"short");
}

#[cfg(unix)]
#[test]
fn copy_file_copies_permission_mode() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = tempdir().expect("create temp dir");
    let src = tmp.path().join("script.sh");
    let dst = tmp.path().join("copy.sh");
    fs::write(&src, b"#!/bin/sh\n").expect("write");
    fs::set_permissions(&src, fs::Permissions::from_mode(0o750)).expect("chmod");

    Gmsfs::new().copy_file(&src, &dst).expect("copy");

    let mode = |p: &Path| fs::metadata(p).expect("metadata").permissions().mode();
    assert_eq!(mode(&dst), mode(&src));
    assert_eq!(mode(&dst) & 0o777, 0o750);
}

#[test]
fn copy_file_missing_source_creates_nothing() {
    let tmp = tempdir().expect("create temp dir");
    let dst = tmp.path().join("dst");
    let gfs = Gmsfs::with_sink(RecordingSink::new());

    let err = gfs
        .copy_file(tmp.path().join("absent"), &dst)
        .expect_err("missing source");

    assert!(err.is_not_found());
    assert!(!dst.exists());
    assert!(gfs.sink().lines()[0].starts_with("copy_file (open): "));
}

#[test]
fn copy_dir_refuses_existing_destination() {
    let tmp = tempdir().expect("create temp dir");
    let src = tmp.path().join("src");
    let dst = tmp.path().join("dst");
    fs::create_dir(&src).expect("mkdir src");
    fs::write(src.join("f"), b"x").expect("write");
    fs::create_dir(&dst).expect("mkdir dst");

    let gfs = Gmsfs::with_sink(RecordingSink::new());
    let err = gfs.copy_dir(&src, &dst).expect_err("destination exists");

    assert!(matches!(err, Error::DestinationExists(_)));
    assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
    assert_eq!(fs::read_dir(&dst).expect("read dst").count(), 0);
    assert!(gfs.sink().lines()[0].starts_with("copy_dir: destination already exists"));

    let file_dst = tmp.path().join("taken");
    fs::write(&file_dst, b"keep").expect("write");
    assert!(gfs.copy_dir(&src, &file_dst).is_err());
    assert_eq!(fs::read(&file_dst).expect("read"), b"keep");
}

#[test]
fn copy_dir_rejects_non_directory_source() {
    let tmp = tempdir().expect("create temp dir");
    let src = tmp.path().join("file");
    fs::write(&src, b"x").expect("write");
    let dst = tmp.path().join("dst");

    let err = Gmsfs::new().copy_dir(&src, &dst).expect_err("not a dir");
    assert!(matches!(err, Error::NotADirectory(_)));
    assert!(!dst.exists());

    let err = Gmsfs::new()
        .copy_dir(tmp.path().join("missing"), &dst)
        .expect_err("missing source");
    assert!(err.is_not_found());
}

#[test]
fn copy_dir_replicates_tree() {
    let tmp = tempdir().expect("create temp dir");
    let src = tmp.path().join("src");
    fs::create_dir_all(src.join("sub/deeper")).expect("mkdirs");
    fs::create_dir(src.join("empty")).expect("mkdir");
    fs::write(src.join("a.txt"), b"alpha").expect("write");
    fs::write(src.join("sub/b.txt"), b"beta").expect("write");
    fs::write(src.join("sub/deeper/c.txt"), b"gamma").expect("write");

    let dst = tmp.path().join("dst");
    Gmsfs::new().copy_dir(&src, &dst).expect("copy_dir");

    assert_eq!(shape(&dst), shape(&src));
    assert_eq!(
        fs::read(dst.join("sub/deeper/c.txt")).expect("read"),
        b"gamma"
    );
}

#[cfg(unix)]
#[test]
fn copy_dir_omits_symlinks() {
    let tmp = tempdir().expect("create temp dir");
    let src = tmp.path().join("src");
    fs::create_dir_all(src.join("sub")).expect("mkdirs");
    fs::write(src.join("a.txt"), b"a").expect("write");
    std::os::unix::fs::symlink(src.join("a.txt"), src.join("link.txt")).expect("file link");
    std::os::unix::fs::symlink(src.join("sub"), src.join("dirlink")).expect("dir link");

    let dst = tmp.path().join("dst");
    Gmsfs::new().copy_dir(&src, &dst).expect("copy_dir");

    let expected: Vec<String> = shape(&src)
        .into_iter()
        .filter(|l| !l.contains("link"))
        .collect();
    assert_eq!(shape(&dst), expected);
    assert!(fs::symlink_metadata(dst.join("link.txt")).is_err());
    assert!(fs::symlink_metadata(dst.join("dirlink")).is_err());
}

#[test]
fn copy_dir_files_glob_copies_matching_top_level_entries() {
    let tmp = tempdir().expect("create temp dir");
    let src = tmp.path().join("src");
    fs::create_dir_all(src.join("nested")).expect("mkdirs");
    for name in ["a.txt", "b.txt", "c.log"] {
        fs::write(src.join(name), name).expect("write");
    }
    fs::write(src.join("nested/d.txt"), b"d").expect("write");

    let dst = tmp.path().join("out/deep");
    Gmsfs::new()
        .copy_dir_files_glob(&src, &dst, "*.txt")
        .expect("glob copy");

    let mut names: Vec<String> = fs::read_dir(&dst)
        .expect("read dst")
        .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    assert_eq!(names, ["a.txt", "b.txt"]);
    assert_eq!(fs::read(dst.join("b.txt")).expect("read"), b"b.txt");
}

#[test]
fn copy_dir_files_glob_into_existing_destination() {
    let tmp = tempdir().expect("create temp dir");
    let src = tmp.path().join("src");
    let dst = tmp.path().join("dst");
    fs::create_dir(&src).expect("mkdir");
    fs::create_dir(&dst).expect("mkdir");
    fs::write(src.join("keep.cfg"), b"new").expect("write");
    fs::write(dst.join("old.cfg"), b"old").expect("write");

    Gmsfs::new()
        .copy_dir_files_glob(&src, &dst, "*.cfg")
        .expect("glob copy");

    assert_eq!(fs::read(dst.join("keep.cfg")).expect("read"), b"new");
    assert_eq!(fs::read(dst.join("old.cfg")).expect("read"), b"old");
}

#[test]
fn copy_dir_files_glob_requires_directory_source() {
    let tmp = tempdir().expect("create temp dir");
    let gfs = Gmsfs::with_sink(RecordingSink::new());
    let missing: PathBuf = tmp.path().join("missing");

    let err = gfs
        .copy_dir_files_glob(&missing, tmp.path().join("dst"), "*")
        .expect_err("missing source");
    assert!(matches!(err, Error::NotADirectory(_)));
    assert!(!tmp.path().join("dst").exists());
    assert_eq!(gfs.sink().lines().len(), 1);
}
