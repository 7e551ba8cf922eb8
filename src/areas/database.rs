//! Object database
//!
//! Content-addressed storage for blobs, trees, commits and tags. Objects
//! live at `objects/<first-2-hex>/<remaining-hex>` of their SHA-256 frame
//! digest, zlib-compressed. Writes are once-only: an existing file for a
//! digest is left untouched.
//!
//! Tree leaves and index entries carry truncated 20-byte digests, so the
//! database also resolves those back to full ids by prefix scan of the
//! shard directory.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{parse_frame, Object, ObjectBox, Unpackable};
use crate::artifacts::objects::object_id::{ObjectId, ShortId};
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tag::Tag;
use crate::artifacts::objects::tree::Tree;
use crate::error::OrfError;
use anyhow::Context;
use bytes::Bytes;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Database {
    /// Path to the objects directory (`.orf/objects`)
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Digest an object without touching the store
    pub fn hash(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        object.object_id()
    }

    /// Store an object, returning its digest
    ///
    /// A no-op when the digest is already present.
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let frame = object.frame()?;
        let oid = ObjectId::digest(&frame);
        let object_path = self.object_path(&oid);

        if !object_path.exists() {
            let shard_dir = object_path
                .parent()
                .with_context(|| format!("invalid object path {}", object_path.display()))?;
            std::fs::create_dir_all(shard_dir).with_context(|| {
                format!("unable to create object directory {}", shard_dir.display())
            })?;

            self.write_object(&object_path, frame)?;
        }

        Ok(oid)
    }

    /// Load and parse an object into its typed form
    pub fn read(&self, oid: &ObjectId) -> anyhow::Result<ObjectBox> {
        let frame = self.read_frame(oid)?;
        let (object_type, payload) = parse_frame(&frame)?;

        Ok(match object_type {
            ObjectType::Blob => ObjectBox::Blob(Box::new(Blob::deserialize(payload)?)),
            ObjectType::Tree => ObjectBox::Tree(Box::new(Tree::deserialize(payload)?)),
            ObjectType::Commit => ObjectBox::Commit(Box::new(Commit::deserialize(payload)?)),
            ObjectType::Tag => ObjectBox::Tag(Box::new(Tag::deserialize(payload)?)),
        })
    }

    pub fn parse_object_as_blob(&self, oid: &ObjectId) -> anyhow::Result<Option<Blob>> {
        match self.read(oid)? {
            ObjectBox::Blob(blob) => Ok(Some(*blob)),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_tree(&self, oid: &ObjectId) -> anyhow::Result<Option<Tree>> {
        match self.read(oid)? {
            ObjectBox::Tree(tree) => Ok(Some(*tree)),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_commit(&self, oid: &ObjectId) -> anyhow::Result<Option<Commit>> {
        match self.read(oid)? {
            ObjectBox::Commit(commit) => Ok(Some(*commit)),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_tag(&self, oid: &ObjectId) -> anyhow::Result<Option<Tag>> {
        match self.read(oid)? {
            ObjectBox::Tag(tag) => Ok(Some(*tag)),
            _ => Ok(None),
        }
    }

    pub fn object_type(&self, oid: &ObjectId) -> anyhow::Result<ObjectType> {
        let frame = self.read_frame(oid)?;
        let (object_type, _) = parse_frame(&frame)?;
        Ok(object_type)
    }

    /// All stored digests starting with a hex prefix
    ///
    /// Prefixes of two or more characters only scan their shard directory;
    /// shorter prefixes fall back to a walk of all 256 shards. A missing
    /// shard directory yields no matches rather than an error.
    pub fn find_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let prefix = prefix.to_ascii_lowercase();
        let mut matches = Vec::new();

        if prefix.len() >= 2 {
            let shard = &prefix[..2];
            let rest = &prefix[2..];
            self.scan_shard(shard, rest, &mut matches)?;
        } else {
            for byte in 0..=255u8 {
                let shard = format!("{byte:02x}");
                if shard.starts_with(&prefix) {
                    self.scan_shard(&shard, "", &mut matches)?;
                }
            }
        }

        Ok(matches)
    }

    /// Resolve a truncated leaf/index digest to the unique full digest
    pub fn resolve_short(&self, short: &ShortId) -> anyhow::Result<ObjectId> {
        let matches = self.find_by_prefix(short.as_ref())?;

        match matches.len() {
            0 => Err(OrfError::NotFound(short.to_string()).into()),
            1 => Ok(matches.into_iter().next().expect("one candidate")),
            _ => Err(OrfError::Ambiguous {
                name: short.to_string(),
                candidates: matches.iter().map(ToString::to_string).collect(),
            }
            .into()),
        }
    }

    /// Read an object referenced by a truncated digest
    pub fn read_short(&self, short: &ShortId) -> anyhow::Result<ObjectBox> {
        let oid = self.resolve_short(short)?;
        self.read(&oid)
    }

    fn scan_shard(
        &self,
        shard: &str,
        rest: &str,
        matches: &mut Vec<ObjectId>,
    ) -> anyhow::Result<()> {
        let shard_dir = self.path.join(shard);
        if !shard_dir.is_dir() {
            return Ok(());
        }

        for entry in std::fs::read_dir(&shard_dir)
            .with_context(|| format!("unable to read shard directory {}", shard_dir.display()))?
        {
            let file_name = entry?.file_name();
            let file_name = file_name.to_string_lossy();

            if file_name.starts_with(rest) {
                if let Ok(oid) = ObjectId::try_parse(format!("{shard}{file_name}")) {
                    matches.push(oid);
                }
            }
        }

        Ok(())
    }

    fn object_path(&self, oid: &ObjectId) -> PathBuf {
        let (shard, rest) = oid.to_path();
        self.path.join(shard).join(rest)
    }

    fn read_frame(&self, oid: &ObjectId) -> anyhow::Result<Bytes> {
        let object_path = self.object_path(oid);
        let compressed = std::fs::read(&object_path)
            .with_context(|| format!("unable to read object file {}", object_path.display()))?;

        Self::decompress(compressed.into())
    }

    fn write_object(&self, object_path: &Path, frame: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .with_context(|| format!("invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let compressed = Self::compress(frame)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .with_context(|| {
                format!("unable to open object file {}", temp_object_path.display())
            })?;
        file.write_all(&compressed).with_context(|| {
            format!("unable to write object file {}", temp_object_path.display())
        })?;
        drop(file);

        // rename makes the publish atomic
        std::fs::rename(&temp_object_path, object_path).with_context(|| {
            format!("unable to rename object file to {}", object_path.display())
        })?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("unable to compress object content")?;

        encoder
            .finish()
            .map(Into::into)
            .context("unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .context("unable to decompress object content")?;

        Ok(decompressed.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}
