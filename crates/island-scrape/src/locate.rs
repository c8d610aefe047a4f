//! Deep search for every value stored under a `"product"` key.

use crate::types::{ParsedDocument, ProductCandidate, PRODUCT_KEY};
use serde_json::Value;

/// Minimal view of a dynamically shaped tree.
///
/// Keeps the walk independent of any one JSON library's representation.
pub trait Node {
    /// Key/value entries if this node is a mapping.
    fn entries(&self) -> Option<Box<dyn Iterator<Item = (&str, &Self)> + '_>>;
    /// Children if this node is a sequence.
    fn items(&self) -> Option<Box<dyn Iterator<Item = &Self> + '_>>;
}

impl Node for Value {
    fn entries(&self) -> Option<Box<dyn Iterator<Item = (&str, &Self)> + '_>> {
        let map = self.as_object()?;
        let iter: Box<dyn Iterator<Item = (&str, &Value)> + '_> =
            Box::new(map.iter().map(|(k, v)| (k.as_str(), v)));
        Some(iter)
    }

    fn items(&self) -> Option<Box<dyn Iterator<Item = &Self> + '_>> {
        let arr = self.as_array()?;
        let iter: Box<dyn Iterator<Item = &Value> + '_> = Box::new(arr.iter());
        Some(iter)
    }
}

/// Collect every value stored under `key`, at any depth, in depth-first order.
///
/// A matched value is also searched, so nested occurrences are returned after
/// their enclosing one.
pub fn find_all<'a, N: Node>(node: &'a N, key: &str) -> Vec<&'a N> {
    let mut found = Vec::new();
    walk(node, key, &mut found);
    found
}

fn walk<'a, N: Node>(node: &'a N, key: &str, found: &mut Vec<&'a N>) {
    if let Some(entries) = node.entries() {
        for (k, v) in entries {
            if k == key {
                found.push(v);
            }
            walk(v, key, found);
        }
    } else if let Some(items) = node.items() {
        for child in items {
            walk(child, key, found);
        }
    }
}

/// All product candidates in the document. Empty when there are none.
pub fn locate(doc: &ParsedDocument) -> Vec<ProductCandidate> {
    let candidates: Vec<ProductCandidate> =
        find_all(doc, PRODUCT_KEY).into_iter().cloned().collect();
    tracing::debug!("found {} potential products", candidates.len());
    candidates
}
