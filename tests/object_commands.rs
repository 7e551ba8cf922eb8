use assert_fs::fixture::{FileWriteStr, PathChild};
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use sha2::Digest;

mod common;

#[test]
fn hash_write_persists_a_framed_blob() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repo(&dir);

    dir.child("hello.txt").write_str("Hello, world!")?;

    let digest = common::stdout_of({
        let mut cmd = common::orf();
        cmd.current_dir(dir.path()).arg("hash").arg("-w").arg("hello.txt");
        cmd
    });
    assert_eq!(digest.len(), 64);

    // The stored frame is `blob SP <u32 be size> NUL <payload>`
    let frame = common::read_object_frame(&dir, &digest);
    assert_eq!(frame, b"blob \x00\x00\x00\x0d\x00Hello, world!");

    // The digest is SHA-256 over the uncompressed frame
    let expected = hex::encode(sha2::Sha256::digest(&frame));
    assert_eq!(digest, expected);

    Ok(())
}

#[test]
fn cat_prints_the_payload_byte_identically() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repo(&dir);

    dir.child("hello.txt").write_str("Hello, world!")?;
    let digest = common::stdout_of({
        let mut cmd = common::orf();
        cmd.current_dir(dir.path()).arg("hash").arg("-w").arg("hello.txt");
        cmd
    });

    common::orf()
        .current_dir(dir.path())
        .arg("cat")
        .arg("blob")
        .arg(&digest)
        .assert()
        .success()
        .stdout("Hello, world!\n");

    Ok(())
}

#[test]
fn hash_without_write_is_dry() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repo(&dir);

    dir.child("hello.txt").write_str("Hello, world!")?;
    let digest = common::stdout_of({
        let mut cmd = common::orf();
        cmd.current_dir(dir.path()).arg("hash").arg("hello.txt");
        cmd
    });

    assert!(!common::object_file_exists(&dir, &digest));

    Ok(())
}

#[test]
fn rewriting_the_same_content_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repo(&dir);

    dir.child("a.txt").write_str("x\n")?;

    let first = common::stdout_of({
        let mut cmd = common::orf();
        cmd.current_dir(dir.path()).arg("hash").arg("-w").arg("a.txt");
        cmd
    });
    let second = common::stdout_of({
        let mut cmd = common::orf();
        cmd.current_dir(dir.path()).arg("hash").arg("-w").arg("a.txt");
        cmd
    });

    assert_eq!(first, second);

    // Exactly one file below the shard directory
    let shard = dir.path().join(".orf/objects").join(&first[..2]);
    let files: Vec<_> = std::fs::read_dir(shard)?.collect();
    assert_eq!(files.len(), 1);

    Ok(())
}

#[test]
fn cat_by_abbreviated_digest_resolves_the_object() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repo(&dir);

    dir.child("hello.txt").write_str("Hello, world!")?;
    let digest = common::stdout_of({
        let mut cmd = common::orf();
        cmd.current_dir(dir.path()).arg("hash").arg("-w").arg("hello.txt");
        cmd
    });

    common::orf()
        .current_dir(dir.path())
        .arg("cat")
        .arg("blob")
        .arg(&digest[..8])
        .assert()
        .success()
        .stdout("Hello, world!\n");

    Ok(())
}

#[test]
fn unknown_names_are_reported() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repo(&dir);

    common::orf()
        .current_dir(dir.path())
        .arg("cat")
        .arg("blob")
        .arg("deadbeef")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no candidates found"));

    Ok(())
}
