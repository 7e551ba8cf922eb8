//! Repository discovery, creation and coordination
//!
//! `Repository` is the facade every command goes through. It owns the
//! worktree and `.orf/` paths, the output writer, and the database, index,
//! refs and workspace components.

use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::{Workspace, ORF_DIR};
use crate::error::OrfError;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::cell::{RefCell, RefMut};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Object database directory name
const DATABASE_DIR: &str = "objects";

/// Index file name
const INDEX_FILE: &str = "index";

/// Seed content of `.orf/HEAD`
const HEAD_SEED: &str = "ref: refs/heads/master\n";

/// Seed content of `.orf/description`
const DESCRIPTION_SEED: &str =
    "Unnamed repository; edit this file 'description' to name the repository.\n";

/// Seed content of `.orf/config`
const CONFIG_SEED: &str = "[core]\nrepositoryformatversion = 0\nfilemode = false\nbare = false\n";

/// Directories seeded below `.orf/`
const SEED_DIRS: [&str; 4] = ["branches", "objects", "refs/tags", "refs/heads"];

/// Repository configuration (`.orf/config`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub core: CoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    pub repositoryformatversion: u32,
    pub filemode: bool,
    pub bare: bool,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;

        if config.core.repositoryformatversion != 0 {
            return Err(
                OrfError::UnsupportedFormat(config.core.repositoryformatversion).into(),
            );
        }

        Ok(config)
    }
}

pub struct Repository {
    /// Worktree root
    worktree: Box<Path>,
    /// Repository directory (`<worktree>/.orf`)
    gitdir: Box<Path>,
    config: Config,
    /// Output sink (stdout in production, a buffer in tests)
    writer: RefCell<Box<dyn Write>>,
    database: Database,
    refs: Refs,
    workspace: Workspace,
    index: RefCell<Index>,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("worktree", &self.worktree)
            .field("gitdir", &self.gitdir)
            .field("config", &self.config)
            .field("database", &self.database)
            .field("refs", &self.refs)
            .field("workspace", &self.workspace)
            .field("index", &self.index)
            .finish()
    }
}

impl Repository {
    /// Materialise a fresh `.orf/` below `path`
    ///
    /// Fails when `.orf/` already exists and is non-empty.
    pub fn create(path: &Path, writer: Box<dyn Write>) -> anyhow::Result<Self> {
        if !path.exists() {
            std::fs::create_dir_all(path)
                .with_context(|| format!("failed to create worktree {}", path.display()))?;
        }
        let worktree = path
            .canonicalize()
            .with_context(|| format!("failed to resolve worktree {}", path.display()))?;
        let gitdir = worktree.join(ORF_DIR);

        if gitdir.exists() && gitdir.read_dir()?.next().is_some() {
            return Err(OrfError::RepoExists(gitdir).into());
        }

        for dir in SEED_DIRS {
            std::fs::create_dir_all(gitdir.join(dir))
                .with_context(|| format!("failed to seed directory {dir}"))?;
        }

        std::fs::write(gitdir.join("description"), DESCRIPTION_SEED)
            .context("failed to seed description")?;
        std::fs::write(gitdir.join("HEAD"), HEAD_SEED).context("failed to seed HEAD")?;
        std::fs::write(gitdir.join("config"), CONFIG_SEED).context("failed to seed config")?;

        Self::open(worktree, writer)
    }

    /// Walk ancestors of `start` looking for a directory holding `.orf/`
    pub fn discover(start: &Path) -> Option<PathBuf> {
        let mut current = start.canonicalize().ok()?;

        loop {
            if current.join(ORF_DIR).is_dir() {
                return Some(current);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Locate and open the repository containing `start`
    pub fn find(start: &Path, writer: Box<dyn Write>) -> anyhow::Result<Self> {
        let worktree = Self::discover(start)
            .ok_or_else(|| OrfError::NotARepository(start.to_path_buf()))?;

        Self::open(worktree, writer)
    }

    fn open(worktree: PathBuf, writer: Box<dyn Write>) -> anyhow::Result<Self> {
        let gitdir = worktree.join(ORF_DIR);
        let config = Config::load(&gitdir.join("config"))?;

        let database = Database::new(gitdir.join(DATABASE_DIR).into_boxed_path());
        let refs = Refs::new(gitdir.clone().into_boxed_path());
        let workspace = Workspace::new(worktree.clone().into_boxed_path());
        let index = Index::new(gitdir.join(INDEX_FILE).into_boxed_path());

        Ok(Repository {
            worktree: worktree.into_boxed_path(),
            gitdir: gitdir.into_boxed_path(),
            config,
            writer: RefCell::new(writer),
            database,
            refs,
            workspace,
            index: RefCell::new(index),
        })
    }

    /// Build a file path below `.orf/`
    ///
    /// With `create`, intermediate directories are made as needed; without
    /// it, a missing intermediate is an error. An existing non-directory
    /// where a directory is expected fails in both modes.
    pub fn gitdir_file(&self, segments: &[&str], create: bool) -> anyhow::Result<PathBuf> {
        let (file, dirs) = segments
            .split_last()
            .context("empty path below the repository directory")?;

        let dir = self.gitdir_dir(dirs, create)?;
        Ok(dir.join(file))
    }

    /// Build (and optionally create) a directory path below `.orf/`
    pub fn gitdir_dir(&self, segments: &[&str], create: bool) -> anyhow::Result<PathBuf> {
        let mut path = self.gitdir.to_path_buf();
        for segment in segments {
            path.push(segment);
        }

        if path.exists() {
            if !path.is_dir() {
                anyhow::bail!("not a directory: {}", path.display());
            }
        } else if create {
            std::fs::create_dir_all(&path)
                .with_context(|| format!("failed to create directory {}", path.display()))?;
        } else {
            anyhow::bail!("no such directory: {}", path.display());
        }

        Ok(path)
    }

    pub fn worktree(&self) -> &Path {
        &self.worktree
    }

    pub fn gitdir(&self) -> &Path {
        &self.gitdir
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn writer(&self) -> RefMut<'_, Box<dyn Write>> {
        self.writer.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// The staging area, freshly rehydrated from disk
    pub fn load_index(&self) -> anyhow::Result<RefMut<'_, Index>> {
        let mut index = self.index.borrow_mut();
        index.rehydrate()?;
        Ok(index)
    }
}
