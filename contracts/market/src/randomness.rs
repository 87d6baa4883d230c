use crate::error::ContractError;

/// The oracle accepts at most this many words per request.
pub const MAX_WORDS_PER_REQUEST: u16 = 255;
/// Oversized requests are split into this many equal sub-requests.
const SPLIT_PARTS: u16 = 4;

/// Split a requested word count into per-request chunks.
///
/// Counts up to 255 go out as a single request. Larger counts are split into
/// exactly 4 equal sub-requests of `ceil(count/4)` words each; a count that
/// is not a multiple of 4 therefore over-requests by up to 3 words, which the
/// consumers tolerate as extra slack. Counts above 4 x 255 are rejected.
pub fn split_counts(count: u16) -> Result<Vec<u16>, ContractError> {
    if count == 0 {
        return Err(ContractError::InvalidArgument {
            reason: "randomness request for zero words".to_string(),
        });
    }
    if count <= MAX_WORDS_PER_REQUEST {
        return Ok(vec![count]);
    }
    let per_part = count.div_ceil(SPLIT_PARTS);
    if per_part > MAX_WORDS_PER_REQUEST {
        return Err(ContractError::InvalidArgument {
            reason: format!(
                "randomness request for {count} words exceeds the split limit of {}",
                SPLIT_PARTS * MAX_WORDS_PER_REQUEST
            ),
        });
    }
    Ok(vec![per_part; SPLIT_PARTS as usize])
}

/// Map a random word onto the 1-100 prize bucket scale.
pub fn bucket_from_word(word: u64) -> u8 {
    (word % 100) as u8 + 1
}
