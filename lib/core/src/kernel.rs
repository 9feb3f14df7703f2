// Fused accumulation kernel for cosine similarity.
// One pass over paired positions yields the dot product and both squared norms,
// using the two-accumulator layout of the scalar distance fallbacks.
// Sums are kept in f64: squares of finite f32 components cannot overflow or
// underflow to zero there.

/// Dot product and squared norms of two equal-length slices
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Accumulated {
    pub dot: f64,
    pub norm_sq_a: f64,
    pub norm_sq_b: f64,
}

/// Accumulate `a·b`, `|a|²` and `|b|²` in a single pass.
///
/// Callers must check `a.len() == b.len()`; extra positions of the longer
/// slice are ignored.
#[inline]
pub fn accumulate(a: &[f32], b: &[f32]) -> Accumulated {
    let mut dot0 = 0.0f64;
    let mut dot1 = 0.0f64;
    let mut na0 = 0.0f64;
    let mut na1 = 0.0f64;
    let mut nb0 = 0.0f64;
    let mut nb1 = 0.0f64;

    // Process 4 elements at a time with two accumulators per sum
    let chunks = a.chunks_exact(4);
    let remainder = chunks.remainder();
    let b_chunks = b.chunks_exact(4);

    for (a_chunk, b_chunk) in chunks.zip(b_chunks) {
        let [a0, a1, a2, a3] = widen(a_chunk);
        let [b0, b1, b2, b3] = widen(b_chunk);

        dot0 += a0 * b0 + a1 * b1;
        dot1 += a2 * b2 + a3 * b3;

        na0 += a0 * a0 + a1 * a1;
        na1 += a2 * a2 + a3 * a3;

        nb0 += b0 * b0 + b1 * b1;
        nb1 += b2 * b2 + b3 * b3;
    }

    let tail = a.len() - remainder.len();
    for (&x, &y) in remainder.iter().zip(b.iter().skip(tail)) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot0 += x * y;
        na0 += x * x;
        nb0 += y * y;
    }

    Accumulated {
        dot: dot0 + dot1,
        norm_sq_a: na0 + na1,
        norm_sq_b: nb0 + nb1,
    }
}

#[inline]
fn widen(chunk: &[f32]) -> [f64; 4] {
    [
        f64::from(chunk[0]),
        f64::from(chunk[1]),
        f64::from(chunk[2]),
        f64::from(chunk[3]),
    ]
}
