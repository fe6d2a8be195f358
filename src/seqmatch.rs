//! Character-sequence similarity primitive.
//!
//! Ratcliff/Obershelp match ratio: twice the total matched character count
//! over the combined length, where matches are found by recursively taking
//! the longest common substring and descending into the unmatched sides.
//! Order-sensitive by construction, which is what distinguishes chunk
//! alignment from token-set overlap.

/// Similarity ratio in `[0.0, 1.0]`. Two empty strings are identical.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    2.0 * matched_len(&a, &b) as f64 / (a.len() + b.len()) as f64
}

/// Total characters covered by the matching-block decomposition. Uses an
/// explicit work list; chunk-sized inputs would be fine recursively but
/// pathological ones would not.
fn matched_len(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        if alo >= ahi || blo >= bhi {
            continue;
        }
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        total += k;
        pending.push((alo, i, blo, j));
        pending.push((i + k, ahi, j + k, bhi));
    }
    total
}

/// Longest common substring within `a[alo..ahi]` x `b[blo..bhi]`, as
/// `(start_a, start_b, len)`. Ties resolve to the earliest occurrence in
/// `a`, then in `b`. Rolling single-row dynamic programming.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let width = bhi - blo;
    let mut best = (alo, blo, 0);
    let mut prev = vec![0usize; width + 1];
    for i in alo..ahi {
        let mut cur = vec![0usize; width + 1];
        for j in blo..bhi {
            if a[i] == b[j] {
                let len = prev[j - blo] + 1;
                cur[j - blo + 1] = len;
                if len > best.2 {
                    best = (i + 1 - len, j + 1 - len, len);
                }
            }
        }
        prev = cur;
    }
    best
}
