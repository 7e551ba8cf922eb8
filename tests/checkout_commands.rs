use assert_fs::fixture::{FileWriteStr, PathChild};
use assert_fs::prelude::PathCreateDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;

mod common;

fn committed_project(dir: &assert_fs::TempDir) -> Result<(), Box<dyn std::error::Error>> {
    common::init_repo(dir);

    dir.child("README").write_str("read me\n")?;
    dir.child("src").create_dir_all()?;
    dir.child("src/lib.rs").write_str("pub fn answer() -> u32 { 42 }\n")?;
    dir.child("src/deep").create_dir_all()?;
    dir.child("src/deep/nested.txt").write_str("very nested\n")?;

    common::orf()
        .current_dir(dir.path())
        .arg("add")
        .arg("README")
        .arg("src/lib.rs")
        .arg("src/deep/nested.txt")
        .assert()
        .success();
    common::commit_cmd(dir, "snapshot").assert().success();

    Ok(())
}

#[test]
fn checkout_materialises_the_commit_into_a_fresh_directory(
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    committed_project(&dir)?;

    let dest = dir.path().join("restored");
    common::orf()
        .current_dir(dir.path())
        .arg("checkout")
        .arg("HEAD")
        .arg(dest.to_str().unwrap())
        .assert()
        .success();

    // Byte-identical content, nested directories included
    assert_eq!(std::fs::read(dest.join("README"))?, b"read me\n");
    assert_eq!(
        std::fs::read(dest.join("src/lib.rs"))?,
        b"pub fn answer() -> u32 { 42 }\n"
    );
    assert_eq!(
        std::fs::read(dest.join("src/deep/nested.txt"))?,
        b"very nested\n"
    );

    // No extra files beyond the tree
    let top: Vec<_> = std::fs::read_dir(&dest)?
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    let mut top_sorted = top.clone();
    top_sorted.sort();
    assert_eq!(top_sorted, vec!["README", "src"]);

    Ok(())
}

#[test]
fn checkout_accepts_a_tree_digest() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    committed_project(&dir)?;

    let tree_digest = common::stdout_of({
        let mut cmd = common::orf();
        cmd.current_dir(dir.path())
            .arg("rev-parse")
            .arg("--type")
            .arg("tree")
            .arg("HEAD");
        cmd
    });

    let dest = dir.path().join("from-tree");
    common::orf()
        .current_dir(dir.path())
        .arg("checkout")
        .arg(&tree_digest)
        .arg(dest.to_str().unwrap())
        .assert()
        .success();

    assert!(dest.join("README").is_file());
    assert!(dest.join("src/deep/nested.txt").is_file());

    Ok(())
}

#[test]
fn checkout_refuses_a_non_empty_destination() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    committed_project(&dir)?;

    let dest = dir.child("occupied");
    dest.create_dir_all()?;
    dest.child("squatter.txt").write_str("here first\n")?;

    common::orf()
        .current_dir(dir.path())
        .arg("checkout")
        .arg("HEAD")
        .arg(dest.path().to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not empty"));

    Ok(())
}
