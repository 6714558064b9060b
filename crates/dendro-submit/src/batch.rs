use std::num::NonZeroUsize;

use rand::Rng;

/// Characters a batch identifier is drawn from.
pub const BATCH_ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

pub const DEFAULT_BATCH_ID_LEN: NonZeroUsize = match NonZeroUsize::new(12) {
  Some(len) => len,
  None => unreachable!(),
};

/// Generate a batch identifier from the thread-local generator.
///
/// Batch ids group the jobs of one submission; they are not secrets. An empty
/// id would group nothing, hence the non-zero length.
pub fn generate_batch_id(len: NonZeroUsize) -> String {
  generate_batch_id_with(&mut rand::rng(), len)
}

/// Generate a batch identifier from the given generator.
pub fn generate_batch_id_with<R: Rng + ?Sized>(rng: &mut R, len: NonZeroUsize) -> String {
  (0..len.get())
    .map(|_| BATCH_ID_ALPHABET[rng.random_range(0..BATCH_ID_ALPHABET.len())] as char)
    .collect()
}
