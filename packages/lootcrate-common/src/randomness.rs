use sha2::{Digest, Sha256};

/// Domain-separation prefix for request digests, so a digest over one kind of
/// payload can never collide with another protocol's hashing.
const REQUEST_DOMAIN: &[u8] = b"lootcrate:vrf:v1";

/// Compute the digest binding a randomness delivery to its originating
/// request.
///
/// `digest = sha256( "lootcrate:vrf:v1" || correlation_id_be || count_be
///                   || origin_len_be || origin_bytes || seed )`
///
/// The origin is length-prefixed so bytes cannot slide between the origin
/// and seed fields. The oracle attaches this digest as the delivery proof;
/// the consumer recomputes it from its own pending record and rejects any
/// mismatch. The origin is the address string that triggered the original
/// request.
pub fn request_digest(correlation_id: u64, seed: &[u8], count: u16, origin: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(REQUEST_DOMAIN);
    hasher.update(correlation_id.to_be_bytes());
    hasher.update(count.to_be_bytes());
    hasher.update((origin.len() as u32).to_be_bytes());
    hasher.update(origin.as_bytes());
    hasher.update(seed);
    hasher.finalize().into()
}
