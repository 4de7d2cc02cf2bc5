//! Key strategies: the hashing and equality capability a table is built with.
//!
//! A table caches the 32-bit hash of every key and only calls `eq` when the
//! cached hashes match. Set operations compare cached hashes across tables,
//! so every operand of one operation must use the same strategy.

use core::hash::{BuildHasher, Hash};
use std::rc::Rc;

/// Hashing and equality for keys viewed as `Q`.
///
/// Implementations must keep `eq(a, b) => hash(a) == hash(b)`. A strategy
/// implementing several `KeyStrategy<Q>` for borrowed forms of one key type
/// must hash all of them identically.
pub trait KeyStrategy<Q: ?Sized> {
    fn hash(&self, key: &Q) -> u32;

    fn eq(&self, a: &Q, b: &Q) -> bool;

    /// Whether `other` hashes and compares exactly like `self`.
    fn same_as(&self, other: &Self) -> bool
    where
        Self: Sized,
    {
        let _ = other;
        true
    }
}

/// Strategy used when none is given.
pub type DefaultStrategy = Hashed<foldhash::fast::FixedState>;

#[inline]
fn fold64(h: u64) -> u32 {
    (h ^ (h >> 32)) as u32
}

/// Any `Hash + Eq` key through a [`BuildHasher`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Hashed<B>(pub B);

const SAME_AS_PROBE: u64 = 0x9e37_79b9_7f4a_7c15;

impl<Q, B> KeyStrategy<Q> for Hashed<B>
where
    Q: ?Sized + Hash + Eq,
    B: BuildHasher,
{
    #[inline]
    fn hash(&self, key: &Q) -> u32 {
        fold64(self.0.hash_one(key))
    }

    #[inline]
    fn eq(&self, a: &Q, b: &Q) -> bool {
        a == b
    }

    fn same_as(&self, other: &Self) -> bool {
        self.0.hash_one(SAME_AS_PROBE) == other.0.hash_one(SAME_AS_PROBE)
    }
}

/// Bernstein's string hash: `h = h * 33 + c` from 5381, over signed bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct Djb2;

impl Djb2 {
    pub fn hash_bytes(bytes: &[u8]) -> u32 {
        bytes.iter().fold(5381u32, |h, &b| {
            (h << 5).wrapping_add(h).wrapping_add(b as i8 as u32)
        })
    }

    /// Hash of at most the first `n` bytes.
    pub fn hash_bytes_n(bytes: &[u8], n: usize) -> u32 {
        Djb2::hash_bytes(&bytes[..n.min(bytes.len())])
    }
}

impl KeyStrategy<str> for Djb2 {
    #[inline]
    fn hash(&self, key: &str) -> u32 {
        Djb2::hash_bytes(key.as_bytes())
    }

    #[inline]
    fn eq(&self, a: &str, b: &str) -> bool {
        a == b
    }
}

impl KeyStrategy<String> for Djb2 {
    #[inline]
    fn hash(&self, key: &String) -> u32 {
        Djb2::hash_bytes(key.as_bytes())
    }

    #[inline]
    fn eq(&self, a: &String, b: &String) -> bool {
        a == b
    }
}

impl KeyStrategy<&str> for Djb2 {
    #[inline]
    fn hash(&self, key: &&str) -> u32 {
        Djb2::hash_bytes(key.as_bytes())
    }

    #[inline]
    fn eq(&self, a: &&str, b: &&str) -> bool {
        a == b
    }
}

/// Djb2 over a bounded prefix of each string key.
///
/// Long keys sharing a prefix land in the same chain, so this only pays off
/// when keys usually differ early. Equality still compares whole keys.
#[derive(Clone, Copy, Debug)]
pub struct Djb2Prefix(pub usize);

macro_rules! djb2_prefix {
    ($($t:ty),*) => {
        $(
            impl KeyStrategy<$t> for Djb2Prefix {
                #[inline]
                fn hash(&self, key: &$t) -> u32 {
                    Djb2::hash_bytes_n(key.as_bytes(), self.0)
                }

                #[inline]
                fn eq(&self, a: &$t, b: &$t) -> bool {
                    a == b
                }

                fn same_as(&self, other: &Self) -> bool {
                    self.0 == other.0
                }
            }
        )*
    };
}

djb2_prefix!(str, String, &str);

/// MurmurHash2 with seed 0, for keys whose natural hash clusters badly.
///
/// Integers hash their little-endian bytes, pointers their address.
#[derive(Clone, Copy, Debug, Default)]
pub struct Murmur2;

const MM2_M: u32 = 0x5bd1_e995;

impl Murmur2 {
    pub fn hash_bytes(data: &[u8], seed: u32) -> u32 {
        let mut h = seed ^ data.len() as u32;
        let mut blocks = data.chunks_exact(4);
        for block in &mut blocks {
            let mut k = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
            k = k.wrapping_mul(MM2_M);
            k ^= k >> 24;
            k = k.wrapping_mul(MM2_M);
            h = h.wrapping_mul(MM2_M) ^ k;
        }
        let tail = blocks.remainder();
        if !tail.is_empty() {
            for (i, &b) in tail.iter().enumerate().rev() {
                h ^= (b as u32) << (8 * i);
            }
            h = h.wrapping_mul(MM2_M);
        }
        h ^= h >> 13;
        h = h.wrapping_mul(MM2_M);
        h ^ (h >> 15)
    }
}

macro_rules! murmur_bytes {
    ($($t:ty => |$k:ident| $bytes:expr),* $(,)?) => {
        $(
            impl KeyStrategy<$t> for Murmur2 {
                #[inline]
                fn hash(&self, $k: &$t) -> u32 {
                    Murmur2::hash_bytes($bytes, 0)
                }

                #[inline]
                fn eq(&self, a: &$t, b: &$t) -> bool {
                    a == b
                }
            }
        )*
    };
}

murmur_bytes! {
    str => |key| key.as_bytes(),
    String => |key| key.as_bytes(),
    &str => |key| key.as_bytes(),
    u32 => |key| &key.to_le_bytes(),
    i32 => |key| &key.to_le_bytes(),
    u64 => |key| &key.to_le_bytes(),
    i64 => |key| &key.to_le_bytes(),
    usize => |key| &(*key as u64).to_le_bytes(),
}

impl KeyStrategy<[u32; 4]> for Murmur2 {
    fn hash(&self, key: &[u32; 4]) -> u32 {
        let mut bytes = [0u8; 16];
        for (dst, word) in bytes.chunks_exact_mut(4).zip(key) {
            dst.copy_from_slice(&word.to_le_bytes());
        }
        Murmur2::hash_bytes(&bytes, 0)
    }

    #[inline]
    fn eq(&self, a: &[u32; 4], b: &[u32; 4]) -> bool {
        a == b
    }
}

impl<T: ?Sized> KeyStrategy<*const T> for Murmur2 {
    #[inline]
    fn hash(&self, key: &*const T) -> u32 {
        let addr = key.cast::<()>() as usize as u64;
        Murmur2::hash_bytes(&addr.to_le_bytes(), 0)
    }

    #[inline]
    fn eq(&self, a: &*const T, b: &*const T) -> bool {
        a.cast::<()>() == b.cast::<()>()
    }
}

/// Integer mixing for integer keys.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntMix;

impl IntMix {
    pub fn mix32(mut key: u32) -> u32 {
        key = key.wrapping_add(!(key << 16));
        key ^= key >> 5;
        key = key.wrapping_add(key << 3);
        key ^= key >> 13;
        key = key.wrapping_add(!(key << 9));
        key ^= key >> 17;
        key
    }

    pub fn mix64(mut key: u64) -> u32 {
        key = key.wrapping_add(!(key << 16));
        key ^= key >> 5;
        key = key.wrapping_add(key << 3);
        key ^= key >> 13;
        key = key.wrapping_add(!(key << 9));
        key ^= key >> 17;
        key as u32
    }
}

macro_rules! int_mix {
    ($($t:ty => $mix:ident as $wide:ty),* $(,)?) => {
        $(
            impl KeyStrategy<$t> for IntMix {
                #[inline]
                fn hash(&self, key: &$t) -> u32 {
                    IntMix::$mix(*key as $wide)
                }

                #[inline]
                fn eq(&self, a: &$t, b: &$t) -> bool {
                    a == b
                }
            }
        )*
    };
}

int_mix! {
    u32 => mix32 as u32,
    i32 => mix32 as u32,
    u64 => mix64 as u64,
    i64 => mix64 as u64,
    usize => mix64 as u64,
}

/// Identity hashing: keys are equal only when they are the same object.
#[derive(Clone, Copy, Debug, Default)]
pub struct PtrIdentity;

impl PtrIdentity {
    /// The low bits of an address are mostly zero from alignment; rotate them away.
    #[inline]
    pub fn hash_addr(addr: usize) -> u32 {
        addr.rotate_right(4) as u32
    }
}

impl<T: ?Sized> KeyStrategy<*const T> for PtrIdentity {
    #[inline]
    fn hash(&self, key: &*const T) -> u32 {
        PtrIdentity::hash_addr(key.cast::<()>() as usize)
    }

    #[inline]
    fn eq(&self, a: &*const T, b: &*const T) -> bool {
        a.cast::<()>() == b.cast::<()>()
    }
}

impl<T: ?Sized> KeyStrategy<&T> for PtrIdentity {
    #[inline]
    fn hash(&self, key: &&T) -> u32 {
        PtrIdentity::hash_addr((*key as *const T).cast::<()>() as usize)
    }

    #[inline]
    fn eq(&self, a: &&T, b: &&T) -> bool {
        core::ptr::addr_eq(*a as *const T, *b as *const T)
    }
}

impl<T: ?Sized> KeyStrategy<Rc<T>> for PtrIdentity {
    #[inline]
    fn hash(&self, key: &Rc<T>) -> u32 {
        PtrIdentity::hash_addr(Rc::as_ptr(key).cast::<()>() as usize)
    }

    #[inline]
    fn eq(&self, a: &Rc<T>, b: &Rc<T>) -> bool {
        Rc::ptr_eq(a, b)
    }
}

/// Four-word integer keys, e.g. packed vertex or cell indices.
#[derive(Clone, Copy, Debug, Default)]
pub struct Uint4;

impl KeyStrategy<[u32; 4]> for Uint4 {
    #[inline]
    fn hash(&self, key: &[u32; 4]) -> u32 {
        key[1..]
            .iter()
            .fold(key[0], |h, &k| h.wrapping_mul(37).wrapping_add(k))
    }

    #[inline]
    fn eq(&self, a: &[u32; 4], b: &[u32; 4]) -> bool {
        a == b
    }
}

/// Tuple keys, each half handled by its own strategy.
#[derive(Clone, Copy, Debug, Default)]
pub struct Pair<A, B>(pub A, pub B);

impl<X, Y, A, B> KeyStrategy<(X, Y)> for Pair<A, B>
where
    A: KeyStrategy<X>,
    B: KeyStrategy<Y>,
{
    #[inline]
    fn hash(&self, key: &(X, Y)) -> u32 {
        self.0.hash(&key.0) ^ self.1.hash(&key.1)
    }

    #[inline]
    fn eq(&self, a: &(X, Y), b: &(X, Y)) -> bool {
        self.0.eq(&a.0, &b.0) && self.1.eq(&a.1, &b.1)
    }

    fn same_as(&self, other: &Self) -> bool {
        self.0.same_as(&other.0) && self.1.same_as(&other.1)
    }
}

/// Borrowing adapter: lets a table of `&K` reuse the strategy of a table of `K`.
pub(crate) struct ByRef<'s, S>(pub(crate) &'s S);

impl<'a, K, S> KeyStrategy<&'a K> for ByRef<'_, S>
where
    K: ?Sized,
    S: KeyStrategy<K>,
{
    #[inline]
    fn hash(&self, key: &&'a K) -> u32 {
        self.0.hash(*key)
    }

    #[inline]
    fn eq(&self, a: &&'a K, b: &&'a K) -> bool {
        self.0.eq(*a, *b)
    }
}
