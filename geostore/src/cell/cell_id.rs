use std::fmt::{self, Debug, Display};

use smallvec::SmallVec;

use crate::cell::hilbert::GRID_ORDER;
use crate::errors::{ErrorKind, GeoError, GeoResult};

/// Finest subdivision level.
pub const MAX_LEVEL: u8 = GRID_ORDER as u8;

/// Number of bits used by the position and sentinel of a cell id.
const POS_BITS: u32 = 2 * MAX_LEVEL as u32 + 1;

/// Identifier of a cell in the hierarchical subdivision of the globe.
///
/// A cell at level `k` is encoded as `[2k position bits][1][zeros]`: the
/// Hilbert position of the cell at its own level, followed by a sentinel bit.
/// The sentinel's position gives the level, and clearing everything below a
/// coarser sentinel gives the ancestor.
///
/// Under the natural `u64` order every descendant of a cell lies strictly
/// between [`CellId::range_min`] and [`CellId::range_max`], so "all
/// descendants of C at level L" is one contiguous interval of ids.
///
/// # Examples
///
/// ```rust
/// use geostore::CellId;
///
/// let root = CellId::root();
/// assert_eq!(root.level(), 0);
/// let child = root.children()[2];
/// assert_eq!(child.level(), 1);
/// assert_eq!(child.parent(0).unwrap(), root);
/// assert!(root.contains(child));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellId(u64);

impl CellId {
    /// The single level-0 cell covering the whole globe.
    pub const fn root() -> Self {
        CellId(lsb_for_level(0))
    }

    /// Wraps a raw id. Use [`CellId::is_valid`] to check ids from untrusted input.
    pub const fn from_raw(id: u64) -> Self {
        CellId(id)
    }

    /// Builds the leaf cell (level [`MAX_LEVEL`]) at a Hilbert position.
    pub fn from_position(position: u64) -> Self {
        debug_assert!(position < 1u64 << (POS_BITS - 1), "position out of range");
        CellId((position << 1) | 1)
    }

    /// Builds the cell at `level` whose level-local position is `prefix`.
    pub fn from_prefix(prefix: u64, level: u8) -> Self {
        debug_assert!(level <= MAX_LEVEL, "level out of range");
        let shift = 2 * u32::from(MAX_LEVEL - level) + 1;
        CellId((prefix << shift) | lsb_for_level(level))
    }

    pub fn id(&self) -> u64 {
        self.0
    }

    pub fn is_valid(&self) -> bool {
        self.0 != 0 && self.0 >> POS_BITS == 0 && self.0.trailing_zeros() % 2 == 0
    }

    pub fn level(&self) -> u8 {
        MAX_LEVEL.saturating_sub((self.0.trailing_zeros() / 2) as u8)
    }

    pub fn is_leaf(&self) -> bool {
        self.0 & 1 != 0
    }

    /// Lowest set bit; every level has its own.
    pub fn lsb(&self) -> u64 {
        self.0 & self.0.wrapping_neg()
    }

    /// Position of the cell along the curve at its own level.
    pub fn prefix(&self) -> u64 {
        self.0 >> (self.lsb().trailing_zeros() + 1)
    }

    /// Smallest leaf id contained in this cell.
    pub fn range_min(&self) -> CellId {
        CellId(self.0 - (self.lsb() - 1))
    }

    /// Largest leaf id contained in this cell.
    pub fn range_max(&self) -> CellId {
        CellId(self.0 + (self.lsb() - 1))
    }

    /// Whether `other` is this cell or one of its descendants.
    pub fn contains(&self, other: CellId) -> bool {
        other >= self.range_min() && other <= self.range_max()
    }

    /// Ancestor of this cell at `level`.
    ///
    /// # Errors
    /// Returns `InvalidLevel` if `level` is finer than this cell.
    pub fn parent(&self, level: u8) -> GeoResult<CellId> {
        if level > self.level() {
            log::error!("Cannot take ancestor at level {} of level {} cell {}", level, self.level(), self);
            return Err(GeoError::new(
                &format!("Ancestor level {} is finer than cell level {}", level, self.level()),
                ErrorKind::InvalidLevel,
            ));
        }
        let lsb = lsb_for_level(level);
        Ok(CellId((self.0 & lsb.wrapping_neg()) | lsb))
    }

    /// First descendant at `level` along the curve.
    ///
    /// # Errors
    /// Returns `InvalidLevel` if `level` is coarser than this cell or beyond [`MAX_LEVEL`].
    pub fn child_begin(&self, level: u8) -> GeoResult<CellId> {
        self.check_descendant_level(level)?;
        Ok(CellId(self.0 - self.lsb() + lsb_for_level(level)))
    }

    /// Last descendant at `level` along the curve (inclusive).
    ///
    /// # Errors
    /// Returns `InvalidLevel` if `level` is coarser than this cell or beyond [`MAX_LEVEL`].
    pub fn child_last(&self, level: u8) -> GeoResult<CellId> {
        self.check_descendant_level(level)?;
        Ok(CellId(self.0 + self.lsb() - lsb_for_level(level)))
    }

    /// Next cell of the same level along the curve.
    pub fn next(&self) -> CellId {
        CellId(self.0.wrapping_add(self.lsb() << 1))
    }

    /// The four children in curve order; empty for leaves.
    pub fn children(&self) -> SmallVec<[CellId; 4]> {
        if self.is_leaf() {
            return SmallVec::new();
        }
        let child_lsb = self.lsb() >> 2;
        let first = CellId(self.0 - self.lsb() + child_lsb);
        let mut children = SmallVec::new();
        let mut child = first;
        for _ in 0..4 {
            children.push(child);
            child = child.next();
        }
        children
    }

    fn check_descendant_level(&self, level: u8) -> GeoResult<()> {
        if level < self.level() || level > MAX_LEVEL {
            log::error!("Invalid descendant level {} for level {} cell {}", level, self.level(), self);
            return Err(GeoError::new(
                &format!(
                    "Descendant level {} must be within [{}, {}]",
                    level,
                    self.level(),
                    MAX_LEVEL
                ),
                ErrorKind::InvalidLevel,
            ));
        }
        Ok(())
    }
}

/// Sentinel bit of a level-`level` cell.
pub(crate) const fn lsb_for_level(level: u8) -> u64 {
    1u64 << (2 * (MAX_LEVEL - level) as u32)
}

impl Debug for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CellId({:#018x})", self.0)
    }
}

impl Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:x}", self.level(), self.0)
    }
}

impl From<CellId> for u64 {
    fn from(cell: CellId) -> Self {
        cell.0
    }
}
