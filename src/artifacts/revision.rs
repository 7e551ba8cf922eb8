//! Name resolution
//!
//! Maps a user-supplied name onto object digests. The rules are applied in
//! order and their results unioned: the literal `HEAD`, a hex prefix scan
//! of the object store, then tag and branch short names. Exactly one
//! candidate must survive; none is `NotFound`, several are `Ambiguous`.
//!
//! With a wanted type, resolution optionally dereferences through the
//! persisted chain: tags follow their `object` field, commits yield their
//! tree. The chain is acyclic on disk, so the loop terminates.

use crate::areas::refs::{HEADS_PREFIX, HEAD_REF_NAME, TAGS_PREFIX};
use crate::areas::repository::Repository;
use crate::artifacts::objects::object::ObjectBox;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::error::OrfError;
use anyhow::Context;

/// Names that look like an abbreviated or full hex digest
const HEX_NAME_REGEX: &str = r"^[0-9A-Fa-f]{4,64}$";

/// All digests a name could refer to
pub fn candidates(repository: &Repository, name: &str) -> anyhow::Result<Vec<ObjectId>> {
    let mut found = Vec::new();

    if name == HEAD_REF_NAME {
        if let Some(oid) = repository.refs().resolve(HEAD_REF_NAME)? {
            found.push(oid);
        }
    }

    let hex_name = regex::Regex::new(HEX_NAME_REGEX).context("invalid hex name regex")?;
    if hex_name.is_match(name) {
        for oid in repository
            .database()
            .find_by_prefix(&name.to_ascii_lowercase())?
        {
            found.push(oid);
        }
    }

    for prefix in [TAGS_PREFIX, HEADS_PREFIX] {
        if let Some(oid) = repository.refs().resolve(&format!("{prefix}{name}"))? {
            found.push(oid);
        }
    }

    let mut seen = std::collections::HashSet::new();
    found.retain(|oid| seen.insert(oid.clone()));

    Ok(found)
}

/// Resolve a name to the single digest it denotes
///
/// `want` + `follow` turn on type-directed dereferencing: tags are
/// unwrapped towards their target, commits towards their tree.
pub fn resolve(
    repository: &Repository,
    name: &str,
    want: Option<ObjectType>,
    follow: bool,
) -> anyhow::Result<ObjectId> {
    let candidates = candidates(repository, name)?;

    let mut oid = match candidates.len() {
        0 => return Err(OrfError::NotFound(name.to_string()).into()),
        1 => candidates.into_iter().next().expect("one candidate"),
        _ => {
            return Err(OrfError::Ambiguous {
                name: name.to_string(),
                candidates: candidates.iter().map(ToString::to_string).collect(),
            }
            .into())
        }
    };

    let want = match (want, follow) {
        (Some(want), true) => want,
        _ => return Ok(oid),
    };

    loop {
        let object = repository.database().read(&oid)?;
        let object_type = object.object_type();

        if object_type == want {
            return Ok(oid);
        }

        oid = match object {
            ObjectBox::Tag(tag) => tag.target()?,
            ObjectBox::Commit(commit) if want == ObjectType::Tree => commit.tree_oid()?,
            _ => anyhow::bail!("object {} is a {object_type}, not a {want}", oid.abbrev()),
        };
    }
}
