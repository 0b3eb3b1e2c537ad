//! Colour similarity used by every region-growing operation.

/// RGB triple; alpha is stripped before comparison.
pub type Rgb = [u8; 3];

/// Euclidean distance between two RGB colours.
#[inline]
pub fn distance(a: Rgb, b: Rgb) -> f64 {
    let dr = a[0] as f64 - b[0] as f64;
    let dg = a[1] as f64 - b[1] as f64;
    let db = a[2] as f64 - b[2] as f64;

    (dr * dr + dg * dg + db * db).sqrt()
}

/// Two colours are similar when their distance is within `tolerance`.
#[inline]
pub fn is_similar(a: Rgb, b: Rgb, tolerance: f64) -> bool {
    distance(a, b) <= tolerance
}
