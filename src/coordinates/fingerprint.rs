//! Stable 64-bit fingerprints for output file names.
//!
//! File names derived from coordinates feed a content-addressed cache, so the
//! hash must be identical across processes, platforms and releases. The
//! algorithm is pinned to FNV-1a (64-bit) over the UTF-8 bytes of the input and
//! rendered as 16 lowercase hex digits. Changing it is a breaking change to
//! every persisted file name.

/// FNV-1a 64-bit offset basis.
const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

/// FNV-1a 64-bit prime.
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Computes the FNV-1a 64-bit hash of `input`.
///
/// # Example
///
/// ```rust
/// use depgraph::coordinates::fingerprint::fnv1a_64;
///
/// assert_eq!(fnv1a_64(""), 0xcbf2_9ce4_8422_2325);
/// assert_eq!(fnv1a_64("a"), 0xaf63_dc4c_8601_ec8c);
/// ```
pub fn fnv1a_64(input: &str) -> u64 {
    input.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Fingerprints a set of capability strings.
///
/// The capabilities are sorted, joined with `_`, hashed with [`fnv1a_64`] and
/// rendered as fixed-width hex, so the result does not depend on the order the
/// caller supplies them in.
pub fn capabilities_fingerprint<'a, I>(capabilities: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut sorted: Vec<&str> = capabilities.into_iter().collect();
    sorted.sort_unstable();
    format!("{:016x}", fnv1a_64(&sorted.join("_")))
}
