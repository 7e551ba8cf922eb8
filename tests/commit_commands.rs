use assert_fs::fixture::{FileWriteStr, PathChild};
use assert_fs::prelude::PathCreateDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;

mod common;

fn stage_nested_project(dir: &assert_fs::TempDir) -> Result<(), Box<dyn std::error::Error>> {
    dir.child("README").write_str("read me\n")?;
    dir.child("src").create_dir_all()?;
    dir.child("src/a").write_str("a\n")?;
    dir.child("src/b").write_str("b\n")?;

    common::orf()
        .current_dir(dir.path())
        .arg("add")
        .arg("README")
        .arg("src/a")
        .arg("src/b")
        .assert()
        .success();

    Ok(())
}

#[test]
fn commit_links_tree_parent_and_ref() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repo(&dir);
    stage_nested_project(&dir)?;

    common::commit_cmd(&dir, "initial commit")
        .assert()
        .success()
        .stdout(predicate::str::contains("[master"));

    // HEAD stays symbolic; the branch file carries the digest
    let head = std::fs::read_to_string(dir.path().join(".orf/HEAD"))?;
    assert_eq!(head, "ref: refs/heads/master\n");

    let branch = std::fs::read_to_string(dir.path().join(".orf/refs/heads/master"))?;
    let resolved = common::stdout_of({
        let mut cmd = common::orf();
        cmd.current_dir(dir.path()).arg("rev-parse").arg("HEAD");
        cmd
    });
    assert_eq!(branch.trim(), resolved);

    // The commit payload names its tree and carries the message
    let commit_text = common::stdout_of({
        let mut cmd = common::orf();
        cmd.current_dir(dir.path()).arg("cat").arg("commit").arg("HEAD");
        cmd
    });
    assert!(commit_text.starts_with("tree "));
    assert!(commit_text.contains("author Test Author <test@example.com>"));
    assert!(commit_text.contains("committer Test Author <test@example.com>"));
    assert!(commit_text.ends_with("initial commit"));
    assert!(!commit_text.contains("parent "));

    Ok(())
}

#[test]
fn root_tree_sorts_files_before_the_src_subtree() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repo(&dir);
    stage_nested_project(&dir)?;
    common::commit_cmd(&dir, "initial commit").assert().success();

    let tree_digest = common::stdout_of({
        let mut cmd = common::orf();
        cmd.current_dir(dir.path())
            .arg("rev-parse")
            .arg("--type")
            .arg("tree")
            .arg("HEAD");
        cmd
    });

    let listing = common::stdout_of({
        let mut cmd = common::orf();
        cmd.current_dir(dir.path()).arg("ls-tree").arg(&tree_digest);
        cmd
    });
    let lines: Vec<_> = listing.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("100644 blob"));
    assert!(lines[0].ends_with("README"));
    assert!(lines[1].starts_with("040000 tree"));
    assert!(lines[1].ends_with("src"));

    // Recursion descends into the src subtree
    let recursive = common::stdout_of({
        let mut cmd = common::orf();
        cmd.current_dir(dir.path())
            .arg("ls-tree")
            .arg("-r")
            .arg(&tree_digest);
        cmd
    });
    let recursive_lines: Vec<_> = recursive.lines().collect();
    assert_eq!(recursive_lines.len(), 3);
    assert!(recursive_lines[1].ends_with("src/a"));
    assert!(recursive_lines[2].ends_with("src/b"));

    Ok(())
}

#[test]
fn identical_content_hashes_to_identical_trees() -> Result<(), Box<dyn std::error::Error>> {
    let first = assert_fs::TempDir::new()?;
    let second = assert_fs::TempDir::new()?;

    for dir in [&first, &second] {
        common::init_repo(dir);
        stage_nested_project(dir)?;
    }

    // Stage the same content in a different order in the second repository
    common::orf()
        .current_dir(second.path())
        .arg("add")
        .arg("src/b")
        .arg("README")
        .assert()
        .success();

    common::commit_cmd(&first, "snapshot").assert().success();
    common::commit_cmd(&second, "snapshot").assert().success();

    let tree_of = |dir: &assert_fs::TempDir| {
        common::stdout_of({
            let mut cmd = common::orf();
            cmd.current_dir(dir.path())
                .arg("rev-parse")
                .arg("--type")
                .arg("tree")
                .arg("HEAD");
            cmd
        })
    };

    assert_eq!(tree_of(&first), tree_of(&second));

    Ok(())
}

#[test]
fn second_commit_records_its_parent() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repo(&dir);

    dir.child("a.txt").write_str("one\n")?;
    common::orf()
        .current_dir(dir.path())
        .arg("add")
        .arg("a.txt")
        .assert()
        .success();
    common::commit_cmd(&dir, "first").assert().success();

    let first_digest = common::stdout_of({
        let mut cmd = common::orf();
        cmd.current_dir(dir.path()).arg("rev-parse").arg("HEAD");
        cmd
    });

    dir.child("a.txt").write_str("two\n")?;
    common::orf()
        .current_dir(dir.path())
        .arg("add")
        .arg("a.txt")
        .assert()
        .success();
    common::commit_cmd(&dir, "second").assert().success();

    let commit_text = common::stdout_of({
        let mut cmd = common::orf();
        cmd.current_dir(dir.path()).arg("cat").arg("commit").arg("HEAD");
        cmd
    });
    assert!(commit_text.contains(&format!("parent {first_digest}")));

    Ok(())
}

#[test]
fn log_emits_a_dot_digraph_of_the_ancestry() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repo(&dir);

    dir.child("a.txt").write_str("one\n")?;
    common::orf()
        .current_dir(dir.path())
        .arg("add")
        .arg("a.txt")
        .assert()
        .success();
    common::commit_cmd(&dir, "first").assert().success();
    let first_digest = common::stdout_of({
        let mut cmd = common::orf();
        cmd.current_dir(dir.path()).arg("rev-parse").arg("HEAD");
        cmd
    });

    dir.child("a.txt").write_str("two\n")?;
    common::orf()
        .current_dir(dir.path())
        .arg("add")
        .arg("a.txt")
        .assert()
        .success();
    common::commit_cmd(&dir, "second").assert().success();
    let second_digest = common::stdout_of({
        let mut cmd = common::orf();
        cmd.current_dir(dir.path()).arg("rev-parse").arg("HEAD");
        cmd
    });

    common::orf()
        .current_dir(dir.path())
        .arg("log")
        .assert()
        .success()
        .stdout(predicate::str::contains("digraph orflog{"))
        .stdout(predicate::str::contains("node[shape=rect]"))
        .stdout(predicate::str::contains(": first"))
        .stdout(predicate::str::contains(": second"))
        .stdout(predicate::str::contains(format!(
            "c_{second_digest} -> c_{first_digest};"
        )));

    Ok(())
}
