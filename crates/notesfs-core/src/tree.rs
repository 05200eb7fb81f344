//! Tree ordering
//!
//! Puts entries in depth-first tree order: each directory is followed by its
//! own files and then its subdirectory blocks, siblings in case-insensitive
//! name order. Files with no owning directory come first.

use std::cmp::Reverse;
use std::collections::VecDeque;

use crate::entry::Entry;

/// Reorder entries into tree order
///
/// Entries are visited in descending name order, so each directory collects
/// its files before its parent can claim them, and every block is pushed onto
/// the front of the result.
pub fn tree_sort(entries: Vec<Entry>) -> Vec<Entry> {
    let mut sorted = entries;
    sorted.sort_by_cached_key(|entry| Reverse((entry.name.to_lowercase(), entry.name.clone())));

    let total = sorted.len();
    let (dirs, mut files): (Vec<Entry>, Vec<Entry>) =
        sorted.into_iter().partition(|entry| entry.is_dir);

    let mut result = VecDeque::with_capacity(total);
    for dir in dirs {
        let (owned, rest): (Vec<Entry>, Vec<Entry>) = files
            .into_iter()
            .partition(|file| file.name.starts_with(&dir.name));
        files = rest;

        for file in owned {
            result.push_front(file);
        }
        result.push_front(dir);
    }

    for file in files {
        result.push_front(file);
    }

    result.into()
}
