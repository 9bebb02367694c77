use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::CodeError;

/// Computes the codeword lengths of an optimal prefix code for `counts` whose codewords are at
/// most `max_depth` bits long.
///
/// Symbols with a zero count get depth 0, unless they are the only ones: a single live symbol
/// gets depth 1. The two lightest nodes are merged first; on equal weights leaves come before
/// internal nodes and lower symbols before higher ones, which makes the result reproducible.
/// When the unconstrained tree is too deep, the depths are recomputed with the package-merge
/// algorithm.
///
/// Returns an error if there are more live symbols than `2^max_depth`.
pub fn create_huffman_tree(counts: &[u32], max_depth: usize) -> Result<Vec<u8>, CodeError> {
    let mut depths = vec![0_u8; counts.len()];
    let live = counts
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .map(|(symbol, _)| symbol)
        .collect::<Vec<usize>>();

    match live.len() {
        0 => return Ok(depths),
        1 => {
            depths[live[0]] = 1;
            return Ok(depths);
        }
        _ => {}
    }

    if live.len() > 1 << max_depth {
        return Err(CodeError::AlphabetTooLarge {
            alphabet_size: live.len(),
            limit: 1 << max_depth,
        });
    }

    // Node ids: leaves are their own symbol, internal nodes are numbered from counts.len() on,
    // in creation order. The id doubles as tie-breaker.
    let first_internal = counts.len();
    let mut parents = vec![usize::MAX; first_internal + live.len() - 1];
    let mut heap = live
        .iter()
        .map(|symbol| Reverse((counts[*symbol] as u64, *symbol)))
        .collect::<BinaryHeap<_>>();
    let mut next_id = first_internal;

    while let Some(Reverse((first_weight, first))) = heap.pop() {
        let Some(Reverse((second_weight, second))) = heap.pop() else {
            break;
        };
        parents[first] = next_id;
        parents[second] = next_id;
        heap.push(Reverse((first_weight + second_weight, next_id)));
        next_id += 1;
    }

    // parents always have bigger ids than their children, so a single backward pass from the
    // root is enough.
    let root = next_id - 1;
    let mut node_depths = vec![0_usize; parents.len()];
    for id in (first_internal..root).rev() {
        node_depths[id] = node_depths[parents[id]] + 1;
    }

    let mut deepest = 0;
    for symbol in live.iter() {
        let depth = node_depths[parents[*symbol]] + 1;
        deepest = deepest.max(depth);
        depths[*symbol] = depth as u8;
    }

    if deepest > max_depth {
        for (symbol, depth) in live.iter().zip(package_merge(counts, &live, max_depth)) {
            depths[*symbol] = depth;
        }
    }

    Ok(depths)
}

/// Length-limited code lengths for the `live` symbols of `counts`, in the same order as `live`.
///
/// Every level holds the leaves merged with the pairs of the previous level, sorted by weight,
/// with leaves first on ties. The `2n - 2` cheapest items of the last level select the code:
/// every time a leaf is selected, its codeword gets one bit longer.
fn package_merge(counts: &[u32], live: &[usize], max_depth: usize) -> Vec<u8> {
    let mut leaves = live
        .iter()
        .enumerate()
        .map(|(position, symbol)| (counts[*symbol] as u64, position))
        .collect::<Vec<_>>();
    leaves.sort_unstable();

    // (weight, Some(position in live)) for a leaf, (weight, None) for a package.
    let as_items = |leaves: &[(u64, usize)]| {
        leaves
            .iter()
            .map(|(weight, position)| (*weight, Some(*position)))
            .collect::<Vec<(u64, Option<usize>)>>()
    };

    let mut levels = Vec::with_capacity(max_depth);
    levels.push(as_items(&leaves));

    for _ in 1..max_depth {
        let previous = &levels[levels.len() - 1];
        let packages = previous
            .chunks_exact(2)
            .map(|pair| pair[0].0 + pair[1].0)
            .collect::<Vec<u64>>();

        let mut level = Vec::with_capacity(leaves.len() + packages.len());
        let (mut leaf, mut package) = (0, 0);
        while leaf < leaves.len() || package < packages.len() {
            let take_leaf = package == packages.len()
                || (leaf < leaves.len() && leaves[leaf].0 <= packages[package]);
            if take_leaf {
                level.push((leaves[leaf].0, Some(leaves[leaf].1)));
                leaf += 1;
            } else {
                level.push((packages[package], None));
                package += 1;
            }
        }
        levels.push(level);
    }

    let mut depths = vec![0_u8; live.len()];
    let mut to_take = 2 * live.len() - 2;

    for level in levels.iter().rev() {
        let mut packages = 0;
        for (_, leaf) in &level[..to_take] {
            match leaf {
                Some(position) => depths[*position] += 1,
                None => packages += 1,
            }
        }
        to_take = 2 * packages;
    }

    depths
}
