use serde::{Deserialize, Serialize};

use crate::hashing::{self, leaf_hash, node_hash, serde_hex, Hash};

/// Root of the empty region set.
pub const EMPTY_ROOT: Hash = [0u8; 32];

/// Inclusion proof for one region under a region-set root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// Sibling hashes from the leaf level upward.
    #[serde(with = "serde_hex::vec")]
    pub sibling_hashes: Vec<Hash>,
    /// Index of the leaf in the canonical (sorted) region list.
    pub leaf_index: usize,
    #[serde(with = "serde_hex")]
    pub root: Hash,
    /// False when the region is not in the set.
    pub valid: bool,
}

impl MerkleProof {
    fn not_found(root: Hash) -> Self {
        Self {
            sibling_hashes: Vec::new(),
            leaf_index: 0,
            root,
            valid: false,
        }
    }
}

/// Merkle commitment over an allowed-region set.
///
/// Regions are sorted and de-duplicated first, so the root depends only on
/// the set. Leaves and internal nodes use distinct hash prefixes; an odd node
/// at the end of a level is paired with itself.
pub struct RegionMembershipTree;

impl RegionMembershipTree {
    /// Sort lexicographically and drop duplicates.
    pub fn canonicalize<S: AsRef<str>>(regions: &[S]) -> Vec<String> {
        let mut sorted: Vec<String> = regions.iter().map(|r| r.as_ref().to_string()).collect();
        sorted.sort();
        sorted.dedup();
        sorted
    }

    /// Compute the root of a region set.
    pub fn build<S: AsRef<str>>(regions: &[S]) -> Hash {
        let leaves = Self::leaves(&Self::canonicalize(regions));
        if leaves.is_empty() {
            return EMPTY_ROOT;
        }

        let mut level = leaves;
        while level.len() > 1 {
            level = next_level(&level);
        }
        level[0]
    }

    /// Hex-encoded root, as published in job requirements.
    pub fn root_hex<S: AsRef<str>>(regions: &[S]) -> String {
        hashing::to_hex(&Self::build(regions))
    }

    /// Build an inclusion proof for `region`.
    ///
    /// Returns a proof with `valid == false` if the region is not in the set.
    pub fn get_proof<S: AsRef<str>>(region: &str, regions: &[S]) -> MerkleProof {
        let canonical = Self::canonicalize(regions);
        let leaves = Self::leaves(&canonical);

        let index = match canonical.binary_search_by(|r| r.as_str().cmp(region)) {
            Ok(i) => i,
            Err(_) => {
                tracing::debug!(set_size = canonical.len(), "region not in allowed set");
                return MerkleProof::not_found(Self::build(&canonical));
            }
        };

        let mut siblings = Vec::new();
        let mut level = leaves;
        let mut current = index;

        while level.len() > 1 {
            let sibling = if current % 2 == 0 {
                // Odd element pairs with itself
                level.get(current + 1).unwrap_or(&level[current])
            } else {
                &level[current - 1]
            };
            siblings.push(*sibling);

            level = next_level(&level);
            current /= 2;
        }

        MerkleProof {
            sibling_hashes: siblings,
            leaf_index: index,
            root: level[0],
            valid: true,
        }
    }

    /// Fold `leaf` up through the proof's siblings and compare with `root`.
    pub fn verify(proof: &MerkleProof, leaf: &Hash, root: &Hash) -> bool {
        if !proof.valid || proof.root != *root {
            return false;
        }

        // The index must be addressable by a path of this length.
        let depth = proof.sibling_hashes.len() as u32;
        if proof.leaf_index.checked_shr(depth).unwrap_or(0) != 0 {
            return false;
        }

        let mut current = *leaf;
        let mut index = proof.leaf_index;
        for sibling in &proof.sibling_hashes {
            // Only a trailing left node pairs with itself. A right node equal to
            // its sibling means the index was shifted onto a self-paired slot.
            if index % 2 == 1 && *sibling == current {
                return false;
            }
            current = if index % 2 == 0 {
                node_hash(&current, sibling)
            } else {
                node_hash(sibling, &current)
            };
            index /= 2;
        }

        current == *root
    }

    /// Verify a proof for a region name.
    pub fn verify_region(proof: &MerkleProof, region: &str, root: &Hash) -> bool {
        Self::verify(proof, &leaf_hash(region.as_bytes()), root)
    }

    fn leaves(canonical: &[String]) -> Vec<Hash> {
        canonical.iter().map(|r| leaf_hash(r.as_bytes())).collect()
    }
}

fn next_level(level: &[Hash]) -> Vec<Hash> {
    level
        .chunks(2)
        .map(|pair| node_hash(&pair[0], pair.get(1).unwrap_or(&pair[0])))
        .collect()
}
