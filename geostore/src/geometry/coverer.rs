use std::collections::VecDeque;

use crate::cell::{CellId, MAX_LEVEL};
use crate::errors::{ErrorKind, GeoError, GeoResult};
use crate::geometry::region::{LatLngRect, Region};

/// Default cap on covering size.
pub const DEFAULT_MAX_CELLS: usize = 8;

/// Computes cell coverings of a [`Region`].
///
/// Refinement is breadth-first from the root cell, so coarse cells are
/// split before fine ones:
///
/// - cells coarser than `min_level` are always split;
/// - a cell is kept as-is once it reaches `max_level`, is fully inside the
///   region, or splitting it would push the covering past `max_cells`.
///
/// `max_cells` is a soft limit: `min_level` always wins, so a covering
/// restricted to one level contains every intersecting cell of that level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionCoverer {
    min_level: u8,
    max_level: u8,
    max_cells: usize,
}

impl RegionCoverer {
    /// # Errors
    /// Returns `InvalidLevel` if `min_level > max_level` or `max_level > MAX_LEVEL`.
    pub fn new(min_level: u8, max_level: u8, max_cells: usize) -> GeoResult<Self> {
        if min_level > max_level || max_level > MAX_LEVEL {
            log::error!(
                "Invalid covering level range [{}, {}], levels must satisfy min <= max <= {}",
                min_level,
                max_level,
                MAX_LEVEL
            );
            return Err(GeoError::new(
                &format!(
                    "Invalid covering level range [{}, {}], levels must satisfy min <= max <= {}",
                    min_level, max_level, MAX_LEVEL
                ),
                ErrorKind::InvalidLevel,
            ));
        }
        Ok(RegionCoverer {
            min_level,
            max_level,
            max_cells: max_cells.max(1),
        })
    }

    pub fn min_level(&self) -> u8 {
        self.min_level
    }

    pub fn max_level(&self) -> u8 {
        self.max_level
    }

    pub fn max_cells(&self) -> usize {
        self.max_cells
    }

    /// Covers `region`, using `bounds_of` to project cells onto the globe.
    pub fn covering<R, F>(&self, region: &R, bounds_of: F) -> Vec<CellId>
    where
        R: Region + ?Sized,
        F: Fn(CellId) -> LatLngRect,
    {
        let mut result = Vec::new();
        let mut frontier = VecDeque::new();

        let root = CellId::root();
        if region.intersects_cell(&bounds_of(root)) {
            frontier.push_back(root);
        }

        while let Some(cell) = frontier.pop_front() {
            let level = cell.level();
            let bounds = bounds_of(cell);

            if level >= self.min_level && (level >= self.max_level || region.contains_cell(&bounds)) {
                result.push(cell);
                continue;
            }

            let children: Vec<CellId> = cell
                .children()
                .into_iter()
                .filter(|child| region.intersects_cell(&bounds_of(*child)))
                .collect();

            if level < self.min_level {
                frontier.extend(children);
            } else if children.is_empty()
                || result.len() + frontier.len() + children.len() > self.max_cells
            {
                result.push(cell);
            } else {
                frontier.extend(children);
            }
        }

        normalize_cells(result, self.min_level)
    }
}

/// Sorts a cell set, drops duplicates and cells already covered by another
/// member, and replaces four complete siblings by their parent as long as the
/// parent is not coarser than `min_level`.
pub fn normalize_cells(mut cells: Vec<CellId>, min_level: u8) -> Vec<CellId> {
    cells.sort_unstable();

    let mut output: Vec<CellId> = Vec::with_capacity(cells.len());
    for mut cell in cells {
        if output.last().is_some_and(|last| last.contains(cell)) {
            continue;
        }
        while output.last().is_some_and(|last| cell.contains(*last)) {
            output.pop();
        }

        while output.len() >= 3 && cell.level() > min_level {
            let siblings = &output[output.len() - 3..];
            let Ok(parent) = cell.parent(cell.level() - 1) else {
                break;
            };
            let complete = siblings
                .iter()
                .all(|s| s.level() == cell.level() && s.parent(cell.level() - 1).ok() == Some(parent));
            if !complete {
                break;
            }
            output.truncate(output.len() - 3);
            cell = parent;
        }

        output.push(cell);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Region made of whole cells, bounds computed on a unit square.
    struct CellSet(Vec<CellId>);

    fn unit_bounds(cell: CellId) -> LatLngRect {
        let lo = cell.range_min().id() as f64;
        let hi = cell.range_max().id() as f64;
        LatLngRect::new(0.0, 1.0, lo, hi)
    }

    impl Region for CellSet {
        fn intersects_cell(&self, bounds: &LatLngRect) -> bool {
            self.0.iter().any(|c| {
                let own = unit_bounds(*c);
                // strict, so neighbours rounding onto the same f64 do not touch
                own.lng_lo < bounds.lng_hi && bounds.lng_lo < own.lng_hi
            })
        }

        fn contains_cell(&self, bounds: &LatLngRect) -> bool {
            self.0.iter().any(|c| unit_bounds(*c).contains(bounds))
        }
    }

    fn some_cell(level: u8) -> CellId {
        CellId::from_position(0x0123_4567_89ab_cdef & ((1u64 << 60) - 1))
            .parent(level)
            .unwrap()
    }

    #[test]
    fn test_new_rejects_bad_levels() {
        assert_eq!(
            RegionCoverer::new(5, 4, 8).unwrap_err().kind(),
            &ErrorKind::InvalidLevel
        );
        assert!(RegionCoverer::new(0, MAX_LEVEL + 1, 8).is_err());
        assert!(RegionCoverer::new(MAX_LEVEL, MAX_LEVEL, 8).is_ok());
    }

    #[test]
    fn test_covering_of_single_cell_is_that_cell() {
        let target = some_cell(6);
        let coverer = RegionCoverer::new(0, 10, 8).unwrap();
        let covering = coverer.covering(&CellSet(vec![target]), unit_bounds);
        assert_eq!(covering, vec![target]);
    }

    #[test]
    fn test_min_level_forces_refinement() {
        let target = some_cell(4);
        let coverer = RegionCoverer::new(6, 6, 1).unwrap();
        let covering = coverer.covering(&CellSet(vec![target]), unit_bounds);
        assert_eq!(covering.len(), 16);
        assert!(covering.iter().all(|c| c.level() == 6 && target.contains(*c)));
    }

    #[test]
    fn test_normalize_merges_complete_siblings() {
        let parent = some_cell(9);
        let children = parent.children().to_vec();
        assert_eq!(normalize_cells(children.clone(), 0), vec![parent]);
        // not allowed to go coarser than min_level
        let mut kept = normalize_cells(children.clone(), 10);
        kept.sort_unstable();
        assert_eq!(kept, children);
    }

    #[test]
    fn test_normalize_drops_duplicates_and_descendants() {
        let parent = some_cell(9);
        let child = parent.children()[1];
        let grandchild = child.children()[3];
        let other = parent.next();
        let cells = vec![grandchild, other, parent, child, parent];
        assert_eq!(normalize_cells(cells, 0), vec![parent, other]);
    }

    #[test]
    fn test_normalize_keeps_incomplete_siblings() {
        let parent = some_cell(12);
        let children = parent.children();
        let partial = vec![children[0], children[1], children[3]];
        assert_eq!(normalize_cells(partial.clone(), 0), partial);
    }
}
