//! Ancestry graph rendering
//!
//! Emits the commit DAG reachable from a starting commit as a DOT digraph:
//! a labelled node per commit, an edge per parent link, each commit
//! visited once.

use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use std::collections::HashSet;
use std::io::Write;

pub fn render_graph(
    repository: &Repository,
    writer: &mut dyn Write,
    start: &ObjectId,
) -> anyhow::Result<()> {
    writeln!(writer, "digraph orflog{{")?;
    writeln!(writer, "  node[shape=rect]")?;

    let mut seen = HashSet::new();
    render_commit(repository, writer, start, &mut seen)?;

    writeln!(writer, "}}")?;
    Ok(())
}

fn render_commit(
    repository: &Repository,
    writer: &mut dyn Write,
    oid: &ObjectId,
    seen: &mut HashSet<ObjectId>,
) -> anyhow::Result<()> {
    if !seen.insert(oid.clone()) {
        return Ok(());
    }

    let commit = repository
        .database()
        .parse_object_as_commit(oid)?
        .with_context(|| format!("object {} is not a commit", oid.abbrev()))?;

    let label = escape_label(commit.short_message());
    writeln!(writer, "  c_{oid} [label=\"{}: {label}\"]", oid.abbrev())?;

    for parent in commit.parents()? {
        writeln!(writer, "  c_{oid} -> c_{parent};")?;
        render_commit(repository, writer, &parent, seen)?;
    }

    Ok(())
}

fn escape_label(message: &str) -> String {
    message.trim().replace('\\', "\\\\").replace('"', "\\\"")
}
