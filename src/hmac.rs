use crate::{Hasher, Md4, MD4_LEN};

use zeroize::Zeroize;

const BLOCK_SIZE: usize = 64;
const O_PAD: u8 = 0x5c;
const I_PAD: u8 = 0x36;

pub type HmacMd4 = Hmac<Md4, MD4_LEN>;

/// HMAC (RFC 2104) over any 64 byte block hash.
#[derive(Debug, Clone)]
pub struct Hmac<H: Hasher<N>, const N: usize> {
    inner_hasher: H,
    outer_hasher: H,
}

impl<H: Hasher<N>, const N: usize> Hmac<H, N> {
    pub fn new(key: &[u8]) -> Self {
        let mut key_block = Self::to_block_sized_key(key);

        let mut inner_hasher = H::default();
        inner_hasher.update(&key_block.map(|b| b ^ I_PAD));

        let mut outer_hasher = H::default();
        outer_hasher.update(&key_block.map(|b| b ^ O_PAD));

        key_block.zeroize();
        Self {
            inner_hasher,
            outer_hasher,
        }
    }

    pub fn digest_message(key: &[u8], message: &[u8]) -> [u8; N] {
        let mut hmac = Self::new(key);
        hmac.update(message);
        hmac.digest()
    }

    pub fn update(&mut self, message: &[u8]) {
        self.inner_hasher.update(message);
    }

    pub fn update_and_digest(mut self, message: &[u8]) -> [u8; N] {
        self.inner_hasher.update(message);
        self.digest()
    }

    pub fn digest(self) -> [u8; N] {
        self.outer_hasher
            .update_and_digest(&self.inner_hasher.digest())
    }

    fn to_block_sized_key(var_len_key: &[u8]) -> [u8; BLOCK_SIZE] {
        let mut key = [0; BLOCK_SIZE];
        if var_len_key.len() > BLOCK_SIZE {
            key[..N].copy_from_slice(&H::digest_message(var_len_key));
        } else {
            key[..var_len_key.len()].copy_from_slice(var_len_key);
        }
        key
    }
}
