//! 3x3 convolution kernels.

/// A 3x3 table of integer weights.
///
/// Stored row-major and flattened: the weight for offset `(dr, dc)`, each in
/// `-1..=1`, lives at index `(dr + 1) * 3 + (dc + 1)`.
///
/// ```text
///   (-1,-1) (-1,0) (-1,1)        0 1 2
///   ( 0,-1) ( 0,0) ( 0,1)   ->   3 4 5
///   ( 1,-1) ( 1,0) ( 1,1)        6 7 8
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernel3(pub [i32; 9]);

impl Kernel3 {
    pub const fn new(weights: [i32; 9]) -> Self {
        Self(weights)
    }

    /// Weight for offset `(dr, dc)`.
    #[inline]
    pub fn weight(&self, dr: isize, dc: isize) -> i32 {
        debug_assert!((-1..=1).contains(&dr) && (-1..=1).contains(&dc));
        self.0[((dr + 1) * 3 + (dc + 1)) as usize]
    }
}

/// All-ones box kernel used by blur.
pub const BOX: Kernel3 = Kernel3::new([1, 1, 1, 1, 1, 1, 1, 1, 1]);

/// Horizontal gradient kernel.
///
/// ```text
///    1   0  -1
///    2   0  -2
///    0   0  -1
/// ```
///
/// The bottom row is `0 0 -1`, not `1 0 -1`, so the weights sum to -1.
pub const SOBEL_X: Kernel3 = Kernel3::new([1, 0, -1, 2, 0, -2, 0, 0, -1]);

/// Vertical gradient kernel.
///
/// ```text
///    1   2   1
///    0   0   0
///   -1  -2  -1
/// ```
pub const SOBEL_Y: Kernel3 = Kernel3::new([1, 2, 1, 0, 0, 0, -1, -2, -1]);
