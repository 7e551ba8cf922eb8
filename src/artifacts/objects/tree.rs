//! Tree object
//!
//! A tree is a directory snapshot: an ordered list of leaves, each naming a
//! blob or a subtree.
//!
//! Wire format per leaf: `<ascii-octal-mode> SP <name> NUL <20-byte-digest>`.
//! Leaves sort by name with a trailing `/` appended for subtrees, so the
//! same directory content always serialises (and hashes) identically.

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::{ShortId, SHORT_ID_BYTES};
use crate::artifacts::objects::object_type::ObjectType;
use bytes::{Buf, Bytes};
use derive_new::new;

/// ASCII octal mode of a tree leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafMode {
    Regular,
    Executable,
    Symlink,
    Subtree,
    Gitlink,
}

impl LeafMode {
    /// Canonical six-byte form written to disk
    pub fn as_str(&self) -> &'static str {
        match self {
            LeafMode::Regular => "100644",
            LeafMode::Executable => "100755",
            LeafMode::Symlink => "120000",
            LeafMode::Subtree => "040000",
            LeafMode::Gitlink => "160000",
        }
    }

    /// Parse a 5- or 6-byte mode field, left-padding short forms with `0`
    pub fn try_parse(raw: &[u8]) -> anyhow::Result<Self> {
        if raw.len() != 5 && raw.len() != 6 {
            anyhow::bail!("tree leaf mode must be 5 or 6 bytes, got {}", raw.len());
        }

        let mut padded = [b'0'; 6];
        padded[6 - raw.len()..].copy_from_slice(raw);

        match &padded {
            b"100644" => Ok(LeafMode::Regular),
            b"100755" => Ok(LeafMode::Executable),
            b"120000" => Ok(LeafMode::Symlink),
            b"040000" => Ok(LeafMode::Subtree),
            b"160000" => Ok(LeafMode::Gitlink),
            other => anyhow::bail!(
                "unrecognised tree leaf mode: {}",
                String::from_utf8_lossy(other)
            ),
        }
    }

    /// Build from an index entry's mode word
    pub fn from_mode_word(kind: u8, perms: u16) -> anyhow::Result<Self> {
        match (kind, perms) {
            (0b1000, perms) if perms & 0o111 != 0 => Ok(LeafMode::Executable),
            (0b1000, _) => Ok(LeafMode::Regular),
            (0b1010, _) => Ok(LeafMode::Symlink),
            (0b1110, _) => Ok(LeafMode::Gitlink),
            (kind, _) => anyhow::bail!("invalid mode type nibble: {kind:#b}"),
        }
    }

    pub fn is_subtree(&self) -> bool {
        matches!(self, LeafMode::Subtree)
    }

    /// Object kind the leaf's digest refers to
    pub fn object_kind(&self) -> ObjectType {
        match self {
            LeafMode::Subtree => ObjectType::Tree,
            LeafMode::Gitlink => ObjectType::Commit,
            _ => ObjectType::Blob,
        }
    }
}

/// Single entry inside a tree
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Leaf {
    pub mode: LeafMode,
    pub name: String,
    pub id: ShortId,
}

impl Leaf {
    /// Canonical sort key: subtrees order as though named with a trailing `/`
    fn sort_key(&self) -> String {
        if self.mode.is_subtree() {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    leaves: Vec<Leaf>,
}

impl Tree {
    pub fn new(mut leaves: Vec<Leaf>) -> Self {
        leaves.sort_by_key(Leaf::sort_key);
        Tree { leaves }
    }

    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut payload = Vec::new();

        for leaf in &self.leaves {
            payload.extend_from_slice(leaf.mode.as_str().as_bytes());
            payload.push(b' ');
            payload.extend_from_slice(leaf.name.as_bytes());
            payload.push(0);
            leaf.id.write_raw_to(&mut payload)?;
        }

        Ok(Bytes::from(payload))
    }
}

impl Unpackable for Tree {
    fn deserialize(payload: Bytes) -> anyhow::Result<Self> {
        let mut leaves = Vec::new();
        let mut reader = payload.clone();

        while reader.has_remaining() {
            let space = reader
                .iter()
                .position(|&byte| byte == b' ')
                .ok_or_else(|| anyhow::anyhow!("unexpected EOF in tree leaf mode"))?;
            let mode = LeafMode::try_parse(&reader[..space])?;
            reader.advance(space + 1);

            let nul = reader
                .iter()
                .position(|&byte| byte == 0)
                .ok_or_else(|| anyhow::anyhow!("unexpected EOF in tree leaf name"))?;
            let name = std::str::from_utf8(&reader[..nul])
                .map_err(|_| anyhow::anyhow!("tree leaf name is not valid UTF-8"))?
                .to_string();
            reader.advance(nul + 1);

            if reader.remaining() < SHORT_ID_BYTES {
                anyhow::bail!("unexpected EOF in tree leaf digest");
            }
            let id = ShortId::from_raw(&reader[..SHORT_ID_BYTES])?;
            reader.advance(SHORT_ID_BYTES);

            leaves.push(Leaf { mode, name, id });
        }

        // Stored order is canonical already; re-sorting keeps Tree
        // construction a single code path.
        Ok(Tree::new(leaves))
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.leaves
            .iter()
            .map(|leaf| {
                format!(
                    "{} {} {}\t{}",
                    leaf.mode.as_str(),
                    leaf.mode.object_kind(),
                    leaf.id,
                    leaf.name
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object_id::ObjectId;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn short(content: &[u8]) -> ShortId {
        ObjectId::digest(content).to_short()
    }

    #[rstest]
    fn leaves_sort_with_trailing_slash_for_subtrees() {
        // Plain lexicographic order would put "src" before "src-extra";
        // the canonical rule compares the subtree as "src/", which sorts
        // after it.
        let tree = Tree::new(vec![
            Leaf::new(LeafMode::Regular, "src-extra".to_string(), short(b"a")),
            Leaf::new(LeafMode::Subtree, "src".to_string(), short(b"b")),
            Leaf::new(LeafMode::Regular, "README".to_string(), short(b"c")),
        ]);

        let names: Vec<_> = tree.leaves().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["README", "src-extra", "src"]);
    }

    #[rstest]
    fn digest_is_independent_of_insertion_order() {
        let a = Leaf::new(LeafMode::Regular, "a.txt".to_string(), short(b"a"));
        let b = Leaf::new(LeafMode::Subtree, "lib".to_string(), short(b"b"));
        let c = Leaf::new(LeafMode::Executable, "run.sh".to_string(), short(b"c"));

        let forward = Tree::new(vec![a.clone(), b.clone(), c.clone()]);
        let backward = Tree::new(vec![c, b, a]);

        assert_eq!(
            forward.object_id().unwrap(),
            backward.object_id().unwrap()
        );
    }

    #[rstest]
    fn serialize_then_deserialize_preserves_leaves() {
        let tree = Tree::new(vec![
            Leaf::new(LeafMode::Regular, "README".to_string(), short(b"r")),
            Leaf::new(LeafMode::Subtree, "src".to_string(), short(b"s")),
        ]);

        let reread = Tree::deserialize(tree.serialize().unwrap()).unwrap();
        assert_eq!(reread, tree);
    }

    #[rstest]
    fn empty_tree_serialises_to_empty_payload_with_stable_digest() {
        let tree = Tree::default();

        assert!(tree.serialize().unwrap().is_empty());
        assert_eq!(tree.object_id().unwrap(), Tree::default().object_id().unwrap());
    }

    #[rstest]
    #[case(b"40000".as_slice(), LeafMode::Subtree)]
    #[case(b"040000".as_slice(), LeafMode::Subtree)]
    #[case(b"100644".as_slice(), LeafMode::Regular)]
    #[case(b"120000".as_slice(), LeafMode::Symlink)]
    fn mode_parsing_pads_short_forms(#[case] raw: &[u8], #[case] expected: LeafMode) {
        assert_eq!(LeafMode::try_parse(raw).unwrap(), expected);
    }

    #[rstest]
    fn mode_parsing_rejects_bad_lengths() {
        assert!(LeafMode::try_parse(b"1006").is_err());
        assert!(LeafMode::try_parse(b"1006444").is_err());
    }
}
