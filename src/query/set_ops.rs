//! Set algebra over sorted, duplicate-free doc id lists.
//!
//! Intersection walks both lists with skip pointers: a list of length `n`
//! has an implicit skip every `floor(sqrt(n))` positions, and a cursor
//! sitting on a skip position jumps ahead while the skip target does not
//! pass the other cursor.

use crate::index::DocId;

/// Skip distance for a list of `len` elements, never 0.
pub fn skip_interval(len: usize) -> usize {
    len.isqrt().max(1)
}

/// Whether position `curr` carries a skip pointer.
fn has_skip(curr: usize, interval: usize, len: usize) -> bool {
    curr % interval == 0 && curr + interval < len
}

/// Advance `curr` in `list` toward `target`, using skips where possible.
fn advance(list: &[DocId], mut curr: usize, interval: usize, target: DocId) -> usize {
    if has_skip(curr, interval, list.len()) && list[curr + interval] <= target {
        while has_skip(curr, interval, list.len()) && list[curr + interval] <= target {
            curr += interval;
        }
        curr
    } else {
        curr + 1
    }
}

/// Documents in both `a` and `b`.
pub fn intersect(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let mut result = Vec::with_capacity(a.len().min(b.len()));
    let skip_a = skip_interval(a.len());
    let skip_b = skip_interval(b.len());
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            result.push(a[i]);
            i += 1;
            j += 1;
        } else if a[i] < b[j] {
            i = advance(a, i, skip_a, b[j]);
        } else {
            j = advance(b, j, skip_b, a[i]);
        }
    }

    result
}

/// Documents in `a` or `b`.
pub fn union(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let mut result = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            result.push(a[i]);
            i += 1;
            j += 1;
        } else if a[i] < b[j] {
            result.push(a[i]);
            i += 1;
        } else {
            result.push(b[j]);
            j += 1;
        }
    }
    result.extend_from_slice(&a[i..]);
    result.extend_from_slice(&b[j..]);

    result
}

/// Documents in `a` but not in `b`.
pub fn intersect_not(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let mut result = Vec::with_capacity(a.len());
    let skip_b = skip_interval(b.len());
    let (mut i, mut j) = (0, 0);

    while i < a.len() {
        if j >= b.len() {
            result.extend_from_slice(&a[i..]);
            break;
        }
        if a[i] == b[j] {
            i += 1;
            j += 1;
        } else if a[i] < b[j] {
            result.push(a[i]);
            i += 1;
        } else {
            j = advance(b, j, skip_b, a[i]);
        }
    }

    result
}

/// Complement of `list` within `universe`.
pub fn negate(list: &[DocId], universe: &[DocId]) -> Vec<DocId> {
    intersect_not(universe, list)
}
