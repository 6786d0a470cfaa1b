//! # Audit Service Digest Vectors
//!
//! Checks that `CanonicalBytes` + `sha256_canonical` reproduce the leaf
//! hashes the audit service computes: the event stringified with keys sorted
//! ascending, UTF-8 encoded, hashed with SHA-256 and written as `0x` hex.
//!
//! The fixed vectors below were computed independently of this crate. A
//! companion test re-derives them with Node.js when `node` is on `PATH`, and
//! is skipped (not failed) otherwise.

use auditproof_core::canonical::CanonicalBytes;
use auditproof_core::digest::sha256_canonical;

/// (JSON input, canonical text, leaf hash)
const VECTORS: &[(&str, &str, &str)] = &[
    (
        r#"{"b": 2, "a": 1, "c": "hello"}"#,
        r#"{"a":1,"b":2,"c":"hello"}"#,
        "0x264be526dd59f5bed5c756e96e5a6a08f285ca424658f70b981f2554b4709121",
    ),
    (
        r#"{"price": "1500", "domain": "alpha.eth", "action": "listing.created"}"#,
        r#"{"action":"listing.created","domain":"alpha.eth","price":"1500"}"#,
        "0xbbac4d7877adb9cef5c4513ffcae16b94fc801679213b573f5d545b564f9892d",
    ),
    (
        r#"{"outer": {"z": 1, "a": 2}, "inner": {"m": [3, 2, 1], "b": true}}"#,
        r#"{"inner":{"b":true,"m":[3,2,1]},"outer":{"a":2,"z":1}}"#,
        "0xeb40c888175f7c774dce8d6818a47426fe614d381f66e26a14dd44134fd202d4",
    ),
    (
        r#"[1, "two", true, null, {"k": "v"}]"#,
        r#"[1,"two",true,null,{"k":"v"}]"#,
        "0xecb97e20cb3047c7c6aa7f58a8ccc31c1efb6c565a5c2e4fc62524571f37ed6b",
    ),
    (
        r#""a""#,
        r#""a""#,
        "0xac8d8342bbb2362d13f0a559a3621bb407011368895164b628a54f7fc33fc43c",
    ),
    (
        r#"{}"#,
        r#"{}"#,
        "0x44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a",
    ),
];

fn leaf_hash(json: &str) -> (String, String) {
    let value: serde_json::Value = serde_json::from_str(json).unwrap();
    let cb = CanonicalBytes::new(&value).unwrap();
    (cb.as_str().to_string(), sha256_canonical(&cb).to_prefixed_hex())
}

#[test]
fn canonical_text_matches_vectors() {
    for (input, expected_canonical, _) in VECTORS {
        let (canonical, _) = leaf_hash(input);
        assert_eq!(
            canonical, *expected_canonical,
            "canonical mismatch for input: {input}"
        );
    }
}

#[test]
fn leaf_hashes_match_vectors() {
    for (input, _, expected_hash) in VECTORS {
        let (_, hash) = leaf_hash(input);
        assert_eq!(hash, *expected_hash, "leaf hash mismatch for input: {input}");
    }
}

/// Hash `json` the way the audit service does, using Node.js.
///
/// Returns `None` if Node.js is unavailable.
fn node_digest(json: &str) -> Option<String> {
    let script = r#"
const crypto = require('crypto');
const sortKeys = (v) => Array.isArray(v)
  ? v.map(sortKeys)
  : (v && typeof v === 'object')
    ? Object.keys(v).sort().reduce((o, k) => { o[k] = sortKeys(v[k]); return o; }, {})
    : v;
const text = JSON.stringify(sortKeys(JSON.parse(process.argv[1])));
process.stdout.write('0x' + crypto.createHash('sha256').update(text, 'utf8').digest('hex'));
"#;
    let output = std::process::Command::new("node")
        .arg("-e")
        .arg(script)
        .arg(json)
        .output()
        .ok()?;
    if output.status.success() {
        Some(String::from_utf8(output.stdout).ok()?.trim().to_string())
    } else {
        None
    }
}

#[test]
fn leaf_hashes_match_node_stringify() {
    for (input, _, _) in VECTORS {
        let Some(node_hex) = node_digest(input) else {
            eprintln!("node unavailable, skipping service comparison");
            return;
        };
        let (_, rust_hex) = leaf_hash(input);
        assert_eq!(rust_hex, node_hex, "Rust and Node digests differ for {input}");
    }
}
