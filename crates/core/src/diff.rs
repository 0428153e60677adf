// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Key-set helpers over name-keyed maps.

use std::collections::HashMap;

/// Keys of `map` in lexicographic order.
pub fn sorted_keys<V>(map: &HashMap<String, V>) -> Vec<String> {
    let mut keys: Vec<String> = map.keys().cloned().collect();
    keys.sort();
    keys
}

/// Keys of `left` absent from `right`, in lexicographic order.
pub fn difference<V, W>(left: &HashMap<String, V>, right: &HashMap<String, W>) -> Vec<String> {
    let mut keys: Vec<String> = left
        .keys()
        .filter(|k| !right.contains_key(*k))
        .cloned()
        .collect();
    keys.sort();
    keys
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod tests;
