use assert_cmd::Command;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;

mod common;

#[test]
fn init_seeds_the_repository_layout() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    let dir_absolute_path = dir.path().canonicalize()?.display().to_string();
    let mut sut = Command::cargo_bin("orf")?;

    sut.arg("init").arg(dir.path());

    sut.assert()
        .success()
        .stdout(predicate::str::contains(
            "Initialized empty orf repository in",
        ))
        .stdout(predicate::str::contains(dir_absolute_path));

    let head = std::fs::read_to_string(dir.path().join(".orf/HEAD"))?;
    assert_eq!(head, "ref: refs/heads/master\n");

    let config = std::fs::read_to_string(dir.path().join(".orf/config"))?;
    assert!(config.contains("[core]"));
    assert!(config.contains("repositoryformatversion = 0"));
    assert!(config.contains("filemode = false"));
    assert!(config.contains("bare = false"));

    for seeded in [
        ".orf/branches",
        ".orf/objects",
        ".orf/refs/tags",
        ".orf/refs/heads",
    ] {
        assert!(dir.path().join(seeded).is_dir(), "{seeded} missing");
    }

    // No branch exists before the first commit
    let heads: Vec<_> = std::fs::read_dir(dir.path().join(".orf/refs/heads"))?.collect();
    assert!(heads.is_empty());

    let description = std::fs::read_to_string(dir.path().join(".orf/description"))?;
    assert!(description.starts_with("Unnamed repository"));

    Ok(())
}

#[test]
fn init_refuses_a_populated_repository() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repo(&dir);

    common::orf()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    Ok(())
}

#[test]
fn commands_fail_outside_a_repository() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;

    common::orf()
        .current_dir(dir.path())
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an orf repository"));

    Ok(())
}

#[test]
fn unsupported_format_version_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repo(&dir);

    std::fs::write(
        dir.path().join(".orf/config"),
        "[core]\nrepositoryformatversion = 1\nfilemode = false\nbare = false\n",
    )?;

    common::orf()
        .current_dir(dir.path())
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported repositoryformatversion"));

    Ok(())
}
