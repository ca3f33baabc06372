/// Multi-scalar multiplication over any group.
pub mod msm;

/// Serialization of points, scalars and length prefixes.
pub mod serialization;

pub use msm::msm;

use group::prime::PrimeGroup;

/// Groups with a hash onto the group, used to derive bases nobody knows a
/// discrete-log relation between.
pub trait HashToGroup: PrimeGroup {
    /// Maps arbitrary bytes to a uniformly distributed element.
    fn hash_to_group(input: &[u8]) -> Self;
}

#[cfg(feature = "ristretto")]
impl HashToGroup for curve25519_dalek::RistrettoPoint {
    fn hash_to_group(input: &[u8]) -> Self {
        curve25519_dalek::RistrettoPoint::hash_from_bytes::<sha2::Sha512>(input)
    }
}

/// Derives `count` independent bases from a domain label.
///
/// The `i`-th base is the hash of `label ‖ u32_be(i)`.
pub fn generators<G: HashToGroup>(label: &[u8], count: usize) -> Vec<G> {
    (0..count as u32)
        .map(|i| {
            let mut input = label.to_vec();
            input.extend_from_slice(&i.to_be_bytes());
            G::hash_to_group(&input)
        })
        .collect()
}
