//! Hilbert curve utilities for cell ordering.
//!
//! The Hilbert curve is a continuous fractal space-filling curve that maps
//! 2D grid coordinates to a 1D position while preserving spatial locality.
//! Cell ids are built from these positions, which is what makes every cell's
//! descendants occupy one contiguous id interval.
//!
//! ## Prefix property
//! At grid order `n`, the top `2k` bits of a position depend only on the top
//! `k` bits of `x` and `y`. A quadtree cell at depth `k` therefore owns exactly
//! the positions sharing one `2k`-bit prefix.

/// Grid order used by cell ids (one bit per level).
pub const GRID_ORDER: u32 = 30;

/// Number of grid steps along each axis.
pub const GRID_SIZE: u64 = 1 << GRID_ORDER;

/// Encodes grid coordinates to a Hilbert curve position.
///
/// # Arguments
/// * `x` - Column in `[0, GRID_SIZE)`
/// * `y` - Row in `[0, GRID_SIZE)`
///
/// # Returns
/// Position in `[0, GRID_SIZE²)`, i.e. at most 60 significant bits.
pub fn xy_to_position(x: u64, y: u64) -> u64 {
    debug_assert!(x < GRID_SIZE && y < GRID_SIZE, "grid coordinate out of range");

    let mut d = 0u64;
    let mut x = x;
    let mut y = y;
    let mut s = GRID_SIZE / 2;

    while s > 0 {
        let rx = u64::from(x & s != 0);
        let ry = u64::from(y & s != 0);
        d += s * s * ((3 * rx) ^ ry);
        rotate(GRID_SIZE, &mut x, &mut y, rx, ry);
        s /= 2;
    }

    d
}

/// Decodes a Hilbert curve position back to grid coordinates.
pub fn position_to_xy(d: u64) -> (u64, u64) {
    debug_assert!(d < GRID_SIZE * GRID_SIZE, "position out of range");

    let mut x = 0u64;
    let mut y = 0u64;
    let mut t = d;
    let mut s = 1u64;

    while s < GRID_SIZE {
        let rx = 1 & (t / 2);
        let ry = 1 & (t ^ rx);
        rotate(s, &mut x, &mut y, rx, ry);
        x += s * rx;
        y += s * ry;
        t /= 4;
        s *= 2;
    }

    (x, y)
}

/// Rotates and reflects the quadrant so the curve stays continuous.
fn rotate(n: u64, x: &mut u64, y: &mut u64, rx: u64, ry: u64) {
    if ry == 0 {
        if rx == 1 {
            *x = n - 1 - *x;
            *y = n - 1 - *y;
        }
        std::mem::swap(x, y);
    }
}
