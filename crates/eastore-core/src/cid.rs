//! Content identifier computation.
//!
//! Files are addressed the UnixFS way: split into 1 MiB chunks, each chunk
//! hashed as a raw leaf, leaves combined bottom-up into a balanced dag-pb
//! tree with a bounded number of links per parent. The root CID (v1,
//! SHA2-256) names the content independent of file name or location. The
//! builder works layer by layer over a flat arena of completed nodes, so
//! arbitrarily large files never recurse.

use std::fs;
use std::path::Path;

use ::cid::Cid;
use multihash::Multihash;
use sha2::{Digest, Sha256};

use crate::EastoreError;

/// Fixed chunk size (1 MiB), matching the stock size splitter.
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// Maximum children per dag-pb parent. 174 is the go-ipfs
/// `DefaultLinksPerBlock` value; any bound works, but this one keeps
/// intermediate tree shapes identical to the stock balanced importer.
pub const MAX_LINKS: usize = 174;

const SHA2_256: u64 = 0x12;
const RAW_CODEC: u64 = 0x55;
const DAG_PB_CODEC: u64 = 0x70;

/// UnixFS `Data.Type` value for a file node.
const UNIXFS_FILE: u64 = 2;

/// One completed node of the hash tree: its address plus the two sizes the
/// parent layer needs — serialized subtree size for the link `Tsize`,
/// logical file bytes for the UnixFS metadata.
struct TreeNode {
    cid: Cid,
    tsize: u64,
    filesize: u64,
}

/// Compute the content identifier of the file at `path`.
///
/// Identical file bytes always produce the identical identifier, regardless
/// of path or invocation time. No state survives the call.
pub fn compute_identifier(path: &Path) -> Result<Cid, EastoreError> {
    let data = fs::read(path).map_err(|source| EastoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(identifier_for_bytes(&data))
}

/// Compute the content identifier of in-memory bytes.
pub fn identifier_for_bytes(data: &[u8]) -> Cid {
    // An empty file is a single empty raw leaf.
    let leaves: Vec<TreeNode> = if data.is_empty() {
        vec![raw_leaf(data)]
    } else {
        data.chunks(CHUNK_SIZE).map(raw_leaf).collect()
    };
    collapse(leaves)
}

fn raw_leaf(chunk: &[u8]) -> TreeNode {
    TreeNode {
        cid: Cid::new_v1(RAW_CODEC, sha256_multihash(chunk)),
        tsize: chunk.len() as u64,
        filesize: chunk.len() as u64,
    }
}

/// Group the layer into parents of at most [`MAX_LINKS`] children until a
/// single root remains.
fn collapse(mut layer: Vec<TreeNode>) -> Cid {
    while layer.len() > 1 {
        layer = layer.chunks(MAX_LINKS).map(parent_node).collect();
    }
    // Every input yields at least one leaf, so exactly one node remains.
    layer.swap_remove(0).cid
}

fn parent_node(children: &[TreeNode]) -> TreeNode {
    let filesize: u64 = children.iter().map(|c| c.filesize).sum();
    let encoded = encode_dag_pb(children, filesize);
    let tsize = encoded.len() as u64 + children.iter().map(|c| c.tsize).sum::<u64>();
    TreeNode {
        cid: Cid::new_v1(DAG_PB_CODEC, sha256_multihash(&encoded)),
        tsize,
        filesize,
    }
}

fn sha256_multihash(data: &[u8]) -> Multihash<64> {
    let digest = Sha256::digest(data);
    Multihash::wrap(SHA2_256, &digest).expect("a 32-byte digest fits the 64-byte multihash")
}

/// Canonical dag-pb encoding of a parent: every link (field 2) first, then
/// the UnixFS file metadata as the node data (field 1). Links carry the
/// child hash, an empty name, and the cumulative serialized size.
fn encode_dag_pb(children: &[TreeNode], filesize: u64) -> Vec<u8> {
    let mut node = Vec::new();
    for child in children {
        let mut link = Vec::new();
        write_bytes_field(&mut link, 1, &child.cid.to_bytes());
        write_bytes_field(&mut link, 2, b"");
        write_varint_field(&mut link, 3, child.tsize);
        write_bytes_field(&mut node, 2, &link);
    }

    let mut unixfs = Vec::new();
    write_varint_field(&mut unixfs, 1, UNIXFS_FILE);
    write_varint_field(&mut unixfs, 3, filesize);
    for child in children {
        write_varint_field(&mut unixfs, 4, child.filesize);
    }
    write_bytes_field(&mut node, 1, &unixfs);
    node
}

fn write_varint(buf: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            break;
        }
        buf.push(byte | 0x80);
    }
}

fn write_varint_field(buf: &mut Vec<u8>, field: u64, value: u64) {
    write_varint(buf, field << 3);
    write_varint(buf, value);
}

fn write_bytes_field(buf: &mut Vec<u8>, field: u64, data: &[u8]) {
    write_varint(buf, (field << 3) | 2);
    write_varint(buf, data.len() as u64);
    buf.extend_from_slice(data);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_the_fixed_empty_raw_leaf() {
        let id = identifier_for_bytes(b"");
        assert_eq!(id.codec(), RAW_CODEC);
        assert_eq!(
            id.to_string(),
            "bafkreihdwdcefgh4dqkjv67uzcmw7ojee6xedzdetojuzjevtenxquvyku"
        );
    }

    #[test]
    fn single_chunk_is_a_raw_leaf() {
        let id = identifier_for_bytes(b"hello world");
        assert_eq!(id.codec(), RAW_CODEC);
        // The leaf address is the plain SHA-256 of the chunk.
        let digest: [u8; 32] = Sha256::digest(b"hello world").into();
        assert_eq!(id.hash().digest(), &digest[..]);
    }

    #[test]
    fn multi_chunk_file_gets_a_dag_pb_root() {
        let data = vec![0x42u8; 2 * CHUNK_SIZE + 1];
        let id = identifier_for_bytes(&data);
        assert_eq!(id.codec(), DAG_PB_CODEC);
        assert_ne!(id, identifier_for_bytes(&data[..CHUNK_SIZE]));
    }

    #[test]
    fn identifier_is_deterministic_and_content_sensitive() {
        let mut data = vec![0x07u8; CHUNK_SIZE + 17];
        let a = identifier_for_bytes(&data);
        let b = identifier_for_bytes(&data);
        assert_eq!(a, b);

        data[CHUNK_SIZE] ^= 0x01;
        assert_ne!(a, identifier_for_bytes(&data));
    }

    #[test]
    fn identifier_ignores_file_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let first = dir.path().join("one.bin");
        let second = dir.path().join("elsewhere.dat");
        std::fs::write(&first, b"same content").expect("write");
        std::fs::write(&second, b"same content").expect("write");

        let a = compute_identifier(&first).expect("first");
        let b = compute_identifier(&second).expect("second");
        assert_eq!(a, b);
        assert_eq!(a, identifier_for_bytes(b"same content"));
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = compute_identifier(Path::new("/no/such/file")).unwrap_err();
        match err {
            EastoreError::Io { path, .. } => assert_eq!(path, Path::new("/no/such/file")),
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn fan_out_bound_builds_extra_layers() {
        // Synthetic leaves exercise the layering without MAX_LINKS real
        // 1 MiB chunks.
        let chunks: Vec<Vec<u8>> = (0..(MAX_LINKS + 1))
            .map(|i| format!("chunk-{i}").into_bytes())
            .collect();
        let one_layer = collapse(chunks[..MAX_LINKS].iter().map(|c| raw_leaf(c)).collect());
        let two_layers = collapse(chunks.iter().map(|c| raw_leaf(c)).collect());
        assert_eq!(one_layer.codec(), DAG_PB_CODEC);
        assert_eq!(two_layers.codec(), DAG_PB_CODEC);
        assert_ne!(one_layer, two_layers);
    }

    #[test]
    fn varint_encoding() {
        let mut buf = Vec::new();
        write_varint(&mut buf, 0);
        write_varint(&mut buf, 0x7f);
        write_varint(&mut buf, 0x80);
        write_varint(&mut buf, 300);
        assert_eq!(buf, [0x00, 0x7f, 0x80, 0x01, 0xac, 0x02]);
    }
}
