/// Integer square root
///
/// Returns floor(sqrt(n)) for every u64, using the digit-by-digit method on
/// base-4 digits. No floating point, no iteration-count guesswork.
pub fn integer_sqrt(n: u64) -> u64 {
    let mut remainder = n;
    let mut root = 0u64;

    // Highest power of four not above n
    let mut bit = 1u64 << 62;
    while bit > n {
        bit >>= 2;
    }

    while bit != 0 {
        if remainder >= root + bit {
            remainder -= root + bit;
            root = (root >> 1) + bit;
        } else {
            root >>= 1;
        }
        bit >>= 2;
    }

    root
}
