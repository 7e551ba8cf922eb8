#![allow(dead_code)]

use assert_cmd::Command;
use assert_fs::TempDir;
use flate2::read::ZlibDecoder;
use predicates::prelude::predicate;
use std::io::Read;
use std::path::Path;

pub fn orf() -> Command {
    Command::cargo_bin("orf").expect("orf binary builds")
}

/// Initialize a repository in `dir` and assert it succeeded
pub fn init_repo(dir: &TempDir) {
    orf()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Initialized empty orf repository in",
        ));
}

/// A commit command with a deterministic author identity
pub fn commit_cmd(dir: &TempDir, message: &str) -> Command {
    let mut cmd = orf();
    cmd.current_dir(dir.path())
        .env("GIT_AUTHOR_NAME", "Test Author")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .arg("commit")
        .arg("-m")
        .arg(message);
    cmd
}

/// Trimmed stdout of a command expected to succeed
pub fn stdout_of(mut cmd: Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output)
        .expect("command output is UTF-8")
        .trim_end()
        .to_string()
}

/// Read and inflate a stored object, returning its raw frame
pub fn read_object_frame(dir: &TempDir, digest: &str) -> Vec<u8> {
    let path = dir
        .path()
        .join(".orf/objects")
        .join(&digest[..2])
        .join(&digest[2..]);
    let compressed = std::fs::read(&path)
        .unwrap_or_else(|err| panic!("object file {} unreadable: {err}", path.display()));

    let mut decoder = ZlibDecoder::new(compressed.as_slice());
    let mut frame = Vec::new();
    decoder.read_to_end(&mut frame).expect("valid zlib stream");
    frame
}

pub fn object_file_exists(dir: &TempDir, digest: &str) -> bool {
    dir.path()
        .join(".orf/objects")
        .join(&digest[..2])
        .join(&digest[2..])
        .is_file()
}

/// Minimal decoded view of an index entry, for black-box assertions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntryView {
    pub name: String,
    pub mode_type: u8,
    pub perms: u16,
    pub digest_hex: String,
}

/// Parse the binary index file into entry views
///
/// Follows the DIRC v2 layout: 12-byte header, 62-byte fixed entry block,
/// NUL-terminated name, padding to 8-byte records.
pub fn parse_index(path: &Path) -> Vec<IndexEntryView> {
    let bytes = std::fs::read(path).expect("index file readable");

    assert_eq!(&bytes[..4], b"DIRC", "index magic");
    let version = u32::from_be_bytes(bytes[4..8].try_into().unwrap());
    assert_eq!(version, 2, "index version");
    let count = u32::from_be_bytes(bytes[8..12].try_into().unwrap());

    let mut entries = Vec::new();
    let mut offset = 12;
    for _ in 0..count {
        let mode = u32::from_be_bytes(bytes[offset + 24..offset + 28].try_into().unwrap());
        let digest_hex = hex::encode(&bytes[offset + 40..offset + 60]);
        let flags = u16::from_be_bytes(bytes[offset + 60..offset + 62].try_into().unwrap());
        let name_length = (flags & 0x0FFF) as usize;
        let name = std::str::from_utf8(&bytes[offset + 62..offset + 62 + name_length])
            .expect("entry name is UTF-8")
            .to_string();
        assert_eq!(bytes[offset + 62 + name_length], 0, "name NUL terminator");

        entries.push(IndexEntryView {
            name,
            mode_type: ((mode >> 12) & 0xF) as u8,
            perms: (mode & 0o777) as u16,
            digest_hex,
        });

        let record = 62 + name_length + 1;
        let padded = record + (8 - record % 8) % 8;
        assert_eq!(padded % 8, 0);
        offset += padded;
    }

    assert_eq!(offset, bytes.len(), "no trailing bytes after entries");
    entries
}
