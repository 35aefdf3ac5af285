//! Cycle detection and transitive closure over the dense adjacency form.
//!
//! Both traversals are iterative; BOM hierarchies from real PLM exports can
//! be deep enough that recursion depth becomes an input-controlled crash.

use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Find one cycle if any exists.
///
/// Depth-first traversal tracking the active path; revisiting a node that is
/// still on the path yields the full cycle as handles, first element repeated
/// at the end (`[A, B, C, A]`).
pub(super) fn find_cycle(adjacency: &[Vec<u32>]) -> Option<Vec<u32>> {
    let n = adjacency.len();
    let mut color = vec![Color::White; n];

    for start in 0..n {
        if color[start] != Color::White {
            continue;
        }
        let mut stack: Vec<(u32, usize)> = vec![(start as u32, 0)];
        color[start] = Color::Gray;

        while let Some((node, child_idx)) = stack.last_mut() {
            let node = *node;
            let children = &adjacency[node as usize];
            if *child_idx < children.len() {
                let child = children[*child_idx];
                *child_idx += 1;
                match color[child as usize] {
                    Color::White => {
                        color[child as usize] = Color::Gray;
                        stack.push((child, 0));
                    }
                    Color::Gray => {
                        // Child is on the active path: unwind it into a cycle
                        let pos = stack
                            .iter()
                            .position(|(n, _)| *n == child)
                            .expect("gray node is on the active path");
                        let mut cycle: Vec<u32> =
                            stack[pos..].iter().map(|(n, _)| *n).collect();
                        cycle.push(child);
                        return Some(cycle);
                    }
                    Color::Black => {}
                }
            } else {
                color[node as usize] = Color::Black;
                stack.pop();
            }
        }
    }
    None
}

/// Reachability sets for every node, memoized bottom-up.
///
/// Must only be called on an acyclic adjacency (checked by the caller); the
/// post-order guarantees every child's set is complete before its parents
/// union it in, so shared subtrees are computed once no matter how many
/// assemblies reuse them.
pub(super) fn reachability(adjacency: &[Vec<u32>]) -> Vec<BTreeSet<u32>> {
    let n = adjacency.len();
    let mut reach: Vec<Option<BTreeSet<u32>>> = vec![None; n];

    for start in 0..n {
        if reach[start].is_some() {
            continue;
        }
        let mut stack: Vec<(u32, usize)> = vec![(start as u32, 0)];

        while let Some((node, child_idx)) = stack.last_mut() {
            let node = *node;
            let children = &adjacency[node as usize];
            if *child_idx < children.len() {
                let child = children[*child_idx];
                *child_idx += 1;
                if reach[child as usize].is_none() {
                    stack.push((child, 0));
                }
            } else {
                let mut set = BTreeSet::new();
                for &child in children {
                    set.insert(child);
                    if let Some(child_reach) = &reach[child as usize] {
                        set.extend(child_reach.iter().copied());
                    }
                }
                reach[node as usize] = Some(set);
                stack.pop();
            }
        }
    }

    reach.into_iter().map(Option::unwrap_or_default).collect()
}
