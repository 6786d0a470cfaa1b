//! # Inclusion Proof Verification Against Reference Trees
//!
//! Builds Merkle trees the way the audit service does (leaf = SHA-256 of the
//! canonical event, node = SHA-256(left || right), paired bottom-up) and
//! checks that proofs taken from them verify, and that any tampering makes
//! them fail.

use auditproof_core::{CanonicalBytes, CryptoError, Digest32, Leaf, ProofBundle};
use auditproof_crypto::{
    verify_inclusion, verify_proof_bundle, DigestBackend, MerkleVerifier, Sha2Backend,
};
use proptest::prelude::*;
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Reference tree (perfect binary trees only)
// ---------------------------------------------------------------------------

struct ReferenceTree {
    levels: Vec<Vec<Digest32>>,
}

impl ReferenceTree {
    fn build(leaves: &[Value]) -> Self {
        assert!(leaves.len().is_power_of_two());
        let mut level: Vec<Digest32> = leaves
            .iter()
            .map(|l| Sha2Backend.leaf_digest(&CanonicalBytes::new(l).unwrap()))
            .collect();
        let mut levels = vec![level.clone()];
        while level.len() > 1 {
            level = level
                .chunks(2)
                .map(|pair| Sha2Backend.sha256_concat(pair[0].as_bytes(), pair[1].as_bytes()))
                .collect();
            levels.push(level.clone());
        }
        Self { levels }
    }

    fn root(&self) -> String {
        self.levels.last().unwrap()[0].to_prefixed_hex()
    }

    fn path(&self, position: usize) -> Vec<String> {
        let mut idx = position;
        let mut path = Vec::new();
        for level in &self.levels[..self.levels.len() - 1] {
            path.push(level[idx ^ 1].to_prefixed_hex());
            idx /= 2;
        }
        path
    }
}

fn string_leaves(names: &[&str]) -> Vec<Value> {
    names.iter().map(|n| json!(n)).collect()
}

// ---------------------------------------------------------------------------
// Fixed scenarios
// ---------------------------------------------------------------------------

#[test]
fn four_leaf_tree_reconstructs_published_root() {
    // Root and level-1 nodes computed independently of this crate.
    const ROOT: &str = "0xf3deaf9693e5c185fa1b56f6db9733f49baf0617df92e074cf536baa9afc0520";
    const NODE_AB: &str = "0xe09614bbb9b54447d2a35b392abfac2983613186fcda65cdff52897548788c59";

    let leaves = string_leaves(&["a", "b", "c", "d"]);
    let tree = ReferenceTree::build(&leaves);
    assert_eq!(tree.root(), ROOT);

    let hash_d = Sha2Backend
        .leaf_digest(&CanonicalBytes::new(&"d").unwrap())
        .to_prefixed_hex();
    let path = vec![hash_d, NODE_AB.to_string()];
    assert_eq!(tree.path(2), path);

    assert!(verify_inclusion(&Leaf::new(json!("c")), &path, 2, ROOT).unwrap());
}

#[test]
fn every_leaf_of_eight_leaf_tree_verifies() {
    let leaves: Vec<Value> = (0..8)
        .map(|i| json!({"event": "transfer", "domain": format!("name{i}.eth"), "seq": i}))
        .collect();
    let tree = ReferenceTree::build(&leaves);
    let root = tree.root();
    let verifier = MerkleVerifier::new();
    for (position, leaf) in leaves.iter().enumerate() {
        let bundle = ProofBundle {
            event_id: None,
            merkle_root: root.clone(),
            path: tree.path(position),
            position: position as u64,
            leaf: Leaf::new(leaf.clone()),
        };
        assert!(
            verifier.verify_proof_bundle(&bundle).unwrap(),
            "leaf {position} failed to verify"
        );
    }
}

#[test]
fn bundle_parsed_from_api_json_verifies() {
    let leaves = vec![
        json!({"action": "listing.created", "domain": "alpha.eth", "price": "1500"}),
        json!({"action": "bid.placed", "domain": "alpha.eth", "bidder": "0x9a"}),
    ];
    let tree = ReferenceTree::build(&leaves);
    // Keys deliberately out of order relative to canonical form.
    let body = json!({
        "eventId": "evt-0001",
        "merkleRoot": tree.root(),
        "path": tree.path(1),
        "position": 1,
        "leaf": {"domain": "alpha.eth", "bidder": "0x9a", "action": "bid.placed"}
    });
    let bundle = ProofBundle::from_json(&body.to_string()).unwrap();
    assert!(verify_proof_bundle(&bundle).unwrap());
}

#[test]
fn typed_event_verifies_against_tree_built_from_json() {
    #[derive(serde::Serialize)]
    struct BidPlaced {
        bidder: String,
        domain: String,
        action: String,
    }

    let leaves = vec![
        json!({"action": "listing.created", "domain": "alpha.eth", "price": "1500"}),
        json!({"action": "bid.placed", "domain": "alpha.eth", "bidder": "0x9a"}),
    ];
    let tree = ReferenceTree::build(&leaves);
    let event = Leaf::from_serializable(&BidPlaced {
        bidder: "0x9a".to_string(),
        domain: "alpha.eth".to_string(),
        action: "bid.placed".to_string(),
    })
    .unwrap();
    assert!(verify_inclusion(&event, &tree.path(1), 1, &tree.root()).unwrap());
}

#[test]
fn key_order_of_leaf_does_not_affect_verification() {
    let a: Value = serde_json::from_str(r#"{"x":1,"y":"two","z":[3]}"#).unwrap();
    let b: Value = serde_json::from_str(r#"{"z":[3],"y":"two","x":1}"#).unwrap();
    let tree = ReferenceTree::build(&[a, json!("sibling")]);
    assert!(verify_inclusion(&Leaf::new(b), &tree.path(0), 0, &tree.root()).unwrap());
}

#[test]
fn malformed_path_is_an_error() {
    let tree = ReferenceTree::build(&string_leaves(&["a", "b"]));
    let err = verify_inclusion(
        &Leaf::new(json!("a")),
        &["0x123".to_string()],
        0,
        &tree.root(),
    )
    .unwrap_err();
    assert!(matches!(err, CryptoError::MalformedSibling { index: 0, .. }));
}

#[test]
fn concurrent_verifications_share_one_verifier() {
    let leaves: Vec<Value> = (0..16).map(|i| json!({"seq": i})).collect();
    let tree = ReferenceTree::build(&leaves);
    let root = tree.root();
    let verifier = MerkleVerifier::new();

    std::thread::scope(|scope| {
        for position in 0..leaves.len() {
            let (verifier, tree, root, leaves) = (&verifier, &tree, &root, &leaves);
            scope.spawn(move || {
                for _ in 0..50 {
                    let ok = verifier
                        .verify_inclusion(
                            &Leaf::new(leaves[position].clone()),
                            &tree.path(position),
                            position as u64,
                            root,
                        )
                        .unwrap();
                    assert!(ok);
                }
            });
        }
    });
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn tree_leaves() -> impl Strategy<Value = Vec<Value>> {
    (0u32..5).prop_flat_map(|depth| {
        prop::collection::vec(
            ("[a-z]{1,6}", any::<i64>()).prop_map(|(k, v)| json!({ k: v, "kind": "audit" })),
            1usize << depth,
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A proof taken from a real tree always verifies.
    #[test]
    fn proofs_from_reference_tree_verify(leaves in tree_leaves(), pick in any::<prop::sample::Index>()) {
        let tree = ReferenceTree::build(&leaves);
        let position = pick.index(leaves.len());
        let ok = verify_inclusion(
            &Leaf::new(leaves[position].clone()),
            &tree.path(position),
            position as u64,
            &tree.root(),
        ).unwrap();
        prop_assert!(ok);
    }

    /// Replacing any sibling with another value breaks the proof.
    #[test]
    fn tampered_sibling_fails(
        leaves in tree_leaves(),
        pick in any::<prop::sample::Index>(),
        which in any::<prop::sample::Index>(),
        replacement in any::<[u8; 32]>(),
    ) {
        prop_assume!(leaves.len() > 1);
        let tree = ReferenceTree::build(&leaves);
        let position = pick.index(leaves.len());
        let mut path = tree.path(position);
        let slot = which.index(path.len());
        let forged = Digest32::from_bytes(replacement).to_prefixed_hex();
        prop_assume!(forged != path[slot]);
        path[slot] = forged;
        let ok = verify_inclusion(
            &Leaf::new(leaves[position].clone()),
            &path,
            position as u64,
            &tree.root(),
        ).unwrap();
        prop_assert!(!ok);
    }

    /// Claiming a different in-range position breaks the proof.
    #[test]
    fn wrong_position_fails(
        leaves in tree_leaves(),
        pick in any::<prop::sample::Index>(),
        other in any::<prop::sample::Index>(),
    ) {
        prop_assume!(leaves.len() > 1);
        let tree = ReferenceTree::build(&leaves);
        let position = pick.index(leaves.len());
        let claimed = other.index(leaves.len());
        prop_assume!(claimed != position);
        let ok = verify_inclusion(
            &Leaf::new(leaves[position].clone()),
            &tree.path(position),
            claimed as u64,
            &tree.root(),
        ).unwrap();
        prop_assert!(!ok);
    }

    /// Changing the leaf's content breaks the proof.
    #[test]
    fn modified_leaf_fails(leaves in tree_leaves(), pick in any::<prop::sample::Index>(), extra in any::<i64>()) {
        let tree = ReferenceTree::build(&leaves);
        let position = pick.index(leaves.len());
        let mut forged = leaves[position].clone();
        forged["kind"] = json!(format!("audit{extra}"));
        let ok = verify_inclusion(
            &Leaf::new(forged),
            &tree.path(position),
            position as u64,
            &tree.root(),
        ).unwrap();
        prop_assert!(!ok);
    }
}
