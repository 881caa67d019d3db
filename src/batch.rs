// Each message gets its own `Md4`; nothing is shared between workers.
use crate::{Md4, MD4_LEN};

use rayon::prelude::*;

/// Digest independent messages in parallel, preserving input order.
pub fn digest_many<M: AsRef<[u8]> + Sync>(messages: &[M]) -> Vec<[u8; MD4_LEN]> {
    messages
        .par_iter()
        .map(|message| Md4::digest_message(message.as_ref()))
        .collect()
}
