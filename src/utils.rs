/// Szudzik's "elegant" pairing of two numbers into one.
///
/// ```text
/// pair(a, b) = b² + a        if a < b
///            = a² + a + b    otherwise
/// ```
///
/// On small inputs this is a bijection onto the naturals. Arithmetic wraps,
/// so on large or nested inputs it degrades to a hash.
///
/// See <http://szudzik.com/ElegantPairing.pdf>.
pub fn pairing_szudzik(a: u64, b: u64) -> u64 {
    if a < b {
        b.wrapping_mul(b).wrapping_add(a)
    } else {
        a.wrapping_mul(a).wrapping_add(a).wrapping_add(b)
    }
}

pub fn pairing2(a: u64, b: u64) -> u64 {
    pairing_szudzik(a, b)
}

pub fn pairing3(a: u64, b: u64, c: u64) -> u64 {
    pairing2(pairing2(a, b), c)
}

/// Bucket hash for values stored in a [`Table`][crate::table::Table].
pub trait MyHash {
    fn hash(&self) -> u64;
}
