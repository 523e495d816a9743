//! Myers' O((N+M)D) shortest edit script over unit ids.
//!
//! The common prefix and suffix are trimmed first. The middle is solved by a
//! reverse search whose frontier is recorded for every edit distance, then walked
//! forward from the origin: matches are taken greedily and, when inserting and
//! deleting are both optimal, the insertion wins. If recording the frontier would
//! exceed the cell budget, the middle is split at a linear-space middle snake and
//! both halves are solved the same way.

use tokio_util::sync::CancellationToken;
use tracing::trace;

/// One run of the edit script, in units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Edit {
    Equal(usize),
    Delete(usize),
    Insert(usize),
}

/// Edit script builder merging adjacent runs of the same kind.
#[derive(Debug, Default)]
struct Edits(Vec<Edit>);

impl Edits {
    fn equal(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        match self.0.last_mut() {
            Some(Edit::Equal(run)) => *run += len,
            _ => self.0.push(Edit::Equal(len)),
        }
    }

    fn delete(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        match self.0.last_mut() {
            Some(Edit::Delete(run)) => *run += len,
            _ => self.0.push(Edit::Delete(len)),
        }
    }

    fn insert(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        match self.0.last_mut() {
            Some(Edit::Insert(run)) => *run += len,
            _ => self.0.push(Edit::Insert(len)),
        }
    }
}

#[derive(Debug)]
struct Cancelled;

#[derive(Debug)]
enum SearchAbort {
    Cancelled,
    OverBudget,
}

/// Shortest edit script turning `old` into `new`; `None` when cancelled.
pub(crate) fn diff_units(
    old: &[u32],
    new: &[u32],
    trace_budget: usize,
    cancel: &CancellationToken,
) -> Option<Vec<Edit>> {
    let mut edits = Edits::default();
    conquer(old, new, trace_budget, cancel, &mut edits).ok()?;
    Some(edits.0)
}

fn conquer(
    old: &[u32],
    new: &[u32],
    budget: usize,
    cancel: &CancellationToken,
    edits: &mut Edits,
) -> Result<(), Cancelled> {
    let prefix = common_prefix_len(old, new);
    let (old, new) = (&old[prefix..], &new[prefix..]);
    let suffix = common_suffix_len(old, new);
    let (old, new) = (&old[..old.len() - suffix], &new[..new.len() - suffix]);

    edits.equal(prefix);
    if old.is_empty() || new.is_empty() {
        edits.delete(old.len());
        edits.insert(new.len());
    } else {
        match ReverseTrace::search(old, new, budget, cancel) {
            Ok(trace) => trace.walk(old, new, edits),
            Err(SearchAbort::Cancelled) => return Err(Cancelled),
            Err(SearchAbort::OverBudget) => {
                trace!(old = old.len(), new = new.len(), "trace budget exceeded, splitting");
                match middle_snake(old, new, cancel)? {
                    Some((x, y)) if (x, y) != (0, 0) && (x, y) != (old.len(), new.len()) => {
                        conquer(&old[..x], &new[..y], budget, cancel, edits)?;
                        conquer(&old[x..], &new[y..], budget, cancel, edits)?;
                    }
                    _ => {
                        edits.delete(old.len());
                        edits.insert(new.len());
                    }
                }
            }
        }
    }
    edits.equal(suffix);
    Ok(())
}

fn common_prefix_len(old: &[u32], new: &[u32]) -> usize {
    old.iter().zip(new).take_while(|(a, b)| a == b).count()
}

fn common_suffix_len(old: &[u32], new: &[u32]) -> usize {
    old.iter()
        .rev()
        .zip(new.iter().rev())
        .take_while(|(a, b)| a == b)
        .count()
}

// ============================================================================
// Reverse search with recorded frontier
// ============================================================================

const UNREACHABLE: isize = isize::MAX;

/// Reverse frontiers: `frontiers[d]` holds, for diagonals `k = x - y` from
/// `delta - d` to `delta + d` in steps of two, the smallest `x` whose suffix can be
/// edited into the other suffix with `d` edits.
struct ReverseTrace {
    frontiers: Vec<Vec<isize>>,
    delta: isize,
    distance: usize,
}

impl ReverseTrace {
    fn search(
        old: &[u32],
        new: &[u32],
        budget: usize,
        cancel: &CancellationToken,
    ) -> Result<Self, SearchAbort> {
        let (n, m) = (old.len() as isize, new.len() as isize);
        let delta = n - m;
        let (x, y) = slide_back(old, new, n, m);
        let mut frontiers = vec![vec![x]];
        if x == 0 && y == 0 {
            return Ok(Self {
                frontiers,
                delta,
                distance: 0,
            });
        }

        let mut cells = 1usize;
        let mut d = 0usize;
        loop {
            d += 1;
            if cancel.is_cancelled() {
                return Err(SearchAbort::Cancelled);
            }
            cells += d + 1;
            if cells > budget {
                return Err(SearchAbort::OverBudget);
            }

            let prev = &frontiers[d - 1];
            let mut row = Vec::with_capacity(d + 1);
            for i in 0..=d {
                let k = delta - d as isize + 2 * i as isize;
                // Step left from diagonal k + 1 (a deletion) or up from k - 1 (an insertion).
                let left = frontier_at(prev, delta, d - 1, k + 1)
                    .filter(|&px| px >= 1)
                    .map(|px| px - 1);
                let up = frontier_at(prev, delta, d - 1, k - 1).filter(|&px| px - (k - 1) >= 1);
                let start = match (left, up) {
                    (Some(left), Some(up)) => Some(left.min(up)),
                    (left, up) => left.or(up),
                };
                let Some(x) = start else {
                    row.push(UNREACHABLE);
                    continue;
                };
                if x - k < 0 || x - k > m {
                    row.push(UNREACHABLE);
                    continue;
                }

                let (x, y) = slide_back(old, new, x, x - k);
                if x == 0 && y == 0 {
                    return Ok(Self {
                        frontiers,
                        delta,
                        distance: d,
                    });
                }
                row.push(x);
            }
            frontiers.push(row);
        }
    }

    /// Whether `(x, x - k)` is within `d` edits of the end.
    fn reaches(&self, d: usize, k: isize, x: isize) -> bool {
        self.frontiers
            .get(d)
            .and_then(|row| frontier_at(row, self.delta, d, k))
            .is_some_and(|fx| fx <= x)
    }

    /// Replay an optimal path from the origin.
    fn walk(&self, old: &[u32], new: &[u32], edits: &mut Edits) {
        let (n, m) = (old.len(), new.len());
        let (mut x, mut y) = (0usize, 0usize);
        let mut cost = self.distance;
        while x < n || y < m {
            if x < n && y < m && old[x] == new[y] {
                edits.equal(1);
                x += 1;
                y += 1;
                continue;
            }
            let k = x as isize - y as isize;
            let insert = y < m
                && (x >= n || (cost >= 1 && self.reaches(cost - 1, k - 1, x as isize)));
            if insert {
                edits.insert(1);
                y += 1;
            } else {
                edits.delete(1);
                x += 1;
            }
            cost = cost.saturating_sub(1);
        }
    }
}

fn frontier_at(row: &[isize], delta: isize, d: usize, k: isize) -> Option<isize> {
    let offset = k - (delta - d as isize);
    if offset < 0 || offset % 2 != 0 {
        return None;
    }
    row.get((offset / 2) as usize)
        .copied()
        .filter(|&x| x != UNREACHABLE)
}

/// Follow matching units backward from `(x, y)`.
fn slide_back(old: &[u32], new: &[u32], mut x: isize, mut y: isize) -> (isize, isize) {
    while x > 0 && y > 0 && old[(x - 1) as usize] == new[(y - 1) as usize] {
        x -= 1;
        y -= 1;
    }
    (x, y)
}

// ============================================================================
// Linear-space middle snake
// ============================================================================

/// A point on an optimal path roughly halfway through, found by searching from
/// both ends at once. `None` only if the searches never meet.
fn middle_snake(
    old: &[u32],
    new: &[u32],
    cancel: &CancellationToken,
) -> Result<Option<(usize, usize)>, Cancelled> {
    let (n, m) = (old.len() as isize, new.len() as isize);
    let delta = n - m;
    let odd = delta & 1 == 1;
    let d_max = (n + m + 1) / 2 + 1;
    let offset = d_max + 1;
    let at = |k: isize| (k + offset) as usize;

    let mut vf = vec![0isize; (2 * offset + 1) as usize];
    let mut vb = vec![0isize; (2 * offset + 1) as usize];

    for d in 0..d_max {
        if cancel.is_cancelled() {
            return Err(Cancelled);
        }

        let mut k = d;
        while k >= -d {
            let mut x = if k == -d || (k != d && vf[at(k - 1)] < vf[at(k + 1)]) {
                vf[at(k + 1)]
            } else {
                vf[at(k - 1)] + 1
            };
            let mut y = x - k;
            let (x0, y0) = (x, y);
            while x >= 0 && y >= 0 && x < n && y < m && old[x as usize] == new[y as usize] {
                x += 1;
                y += 1;
            }
            vf[at(k)] = x;
            if odd && (k - delta).abs() <= d - 1 && vf[at(k)] + vb[at(-(k - delta))] >= n {
                return Ok(Some((x0 as usize, y0 as usize)));
            }
            k -= 2;
        }

        let mut k = d;
        while k >= -d {
            let mut x = if k == -d || (k != d && vb[at(k - 1)] < vb[at(k + 1)]) {
                vb[at(k + 1)]
            } else {
                vb[at(k - 1)] + 1
            };
            let mut y = x - k;
            while x >= 0
                && y >= 0
                && x < n
                && y < m
                && old[(n - x - 1) as usize] == new[(m - y - 1) as usize]
            {
                x += 1;
                y += 1;
            }
            vb[at(k)] = x;
            if !odd && (k - delta).abs() <= d && vb[at(k)] + vf[at(-(k - delta))] >= n {
                return Ok(Some(((n - x) as usize, (m - y) as usize)));
            }
            k -= 2;
        }
    }
    Ok(None)
}
