mod batch;
mod encoding;
mod hash;
mod hmac;
mod md4;

pub use batch::digest_many;
pub use encoding::{digest_to_hex, hex_to_digest, Case};
pub use hash::Hasher;
pub use hmac::{Hmac, HmacMd4};
pub use md4::{md4, Md4, MD4_LEN};
