#![allow(dead_code)]

use crate::areas::repository::Repository;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::Write;

mod areas;
mod artifacts;
mod commands;
mod error;

#[derive(Parser)]
#[command(
    name = "orf",
    version = "0.1.0",
    about = "A content-addressed version control engine",
    long_about = "orf tracks a working tree by hashing file contents into \
    immutable, compressed objects. Directory snapshots become trees, history \
    is a DAG of commits, and movable names resolve to commits through a \
    reference store.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(name = "init", about = "Initialize a new repository")]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(name = "cat", about = "Print the payload of an object")]
    Cat {
        #[arg(index = 1, value_parser = ["blob", "commit", "tag", "tree"], help = "The expected object type")]
        object_type: String,
        #[arg(index = 2, help = "The object name to resolve")]
        name: String,
    },
    #[command(
        name = "hash",
        about = "Hash a file and optionally write it to the object store"
    )]
    Hash {
        #[arg(short, long, help = "Write the object to the object store")]
        write: bool,
        #[arg(
            long,
            default_value = "blob",
            value_parser = ["blob", "commit", "tag", "tree"],
            help = "Interpret the content as this object type"
        )]
        format: String,
        #[arg(index = 1, help = "The file to hash")]
        path: String,
    },
    #[command(name = "log", about = "Emit a DOT graph of a commit's ancestors")]
    Log {
        #[arg(index = 1, default_value = "HEAD", help = "The starting commit")]
        commit: String,
    },
    #[command(name = "ls-tree", about = "Print the entries of a tree")]
    LsTree {
        #[arg(short, long, help = "Recurse into subtrees")]
        recursive: bool,
        #[arg(index = 1, help = "The tree to list")]
        tree: String,
    },
    #[command(name = "ls-files", about = "Print the staged paths")]
    LsFiles {
        #[arg(short, long, help = "Also print the cached stat fields")]
        verbose: bool,
    },
    #[command(name = "ls-refs", about = "Print all references")]
    LsRefs,
    #[command(name = "checkout", about = "Materialise a commit or tree into a directory")]
    Checkout {
        #[arg(index = 1, help = "The commit or tree to check out")]
        name: String,
        #[arg(index = 2, help = "An empty or nonexistent target directory")]
        dir: String,
    },
    #[command(name = "commit", about = "Snapshot the index and advance the current ref")]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(name = "add", about = "Stage files")]
    Add {
        #[arg(index = 1, required = true, help = "The files to stage")]
        paths: Vec<String>,
    },
    #[command(name = "rm", about = "Unstage files and remove them from the worktree")]
    Rm {
        #[arg(index = 1, required = true, help = "The files to remove")]
        paths: Vec<String>,
    },
    #[command(name = "status", about = "Show staged and unstaged changes")]
    Status,
    #[command(name = "rev-parse", about = "Print the canonical digest of a name")]
    RevParse {
        #[arg(long = "type", value_parser = ["blob", "commit", "tag", "tree"], help = "Dereference until this object type")]
        object_type: Option<String>,
        #[arg(index = 1, help = "The name to resolve")]
        name: String,
    },
    #[command(name = "tag", about = "Create a tag, or list tags")]
    Tag {
        #[arg(short, long, help = "Create an annotated tag object")]
        annotated: bool,
        #[arg(index = 1, help = "The tag name")]
        name: Option<String>,
        #[arg(index = 2, help = "The object the tag points at (defaults to HEAD)")]
        target: Option<String>,
    },
}

fn open_repository() -> Result<Repository> {
    let pwd = std::env::current_dir()?;
    Repository::find(&pwd, Box::new(std::io::stdout()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { path } => {
            let path = match path {
                Some(path) => std::path::PathBuf::from(path),
                None => std::env::current_dir()?,
            };
            let repository = Repository::create(&path, Box::new(std::io::stdout()))?;
            writeln!(
                repository.writer(),
                "Initialized empty orf repository in {}",
                repository.worktree().display()
            )?;
        }
        Commands::Cat { object_type, name } => open_repository()?.cat(object_type, name)?,
        Commands::Hash {
            write,
            format,
            path,
        } => {
            // Without -w no repository is needed at all: a dry hash
            if *write {
                open_repository()?.hash_object(path, format, true)?;
            } else {
                commands::plumbing::hash_object::hash_only(
                    path,
                    format,
                    &mut std::io::stdout(),
                )?;
            }
        }
        Commands::Log { commit } => open_repository()?.log(commit)?,
        Commands::LsTree { recursive, tree } => open_repository()?.ls_tree(tree, *recursive)?,
        Commands::LsFiles { verbose } => open_repository()?.ls_files(*verbose)?,
        Commands::LsRefs => open_repository()?.ls_refs()?,
        Commands::Checkout { name, dir } => open_repository()?.checkout(name, dir)?,
        Commands::Commit { message } => open_repository()?.commit(message)?,
        Commands::Add { paths } => open_repository()?.add(paths)?,
        Commands::Rm { paths } => open_repository()?.rm(paths, true, false)?,
        Commands::Status => open_repository()?.status()?,
        Commands::RevParse { object_type, name } => {
            open_repository()?.rev_parse(name, object_type.as_deref())?
        }
        Commands::Tag {
            annotated,
            name,
            target,
        } => open_repository()?.tag(name.as_deref(), target.as_deref(), *annotated)?,
    }

    Ok(())
}
