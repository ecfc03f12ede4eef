use ethnum::{I256, U256};

/* 64-bit limb views of wide integers, least significant limb first. */

pub(crate) fn u128_to_limbs(v: u128) -> [u64; 2] {
    [v as u64, (v >> 64) as u64]
}

pub(crate) fn u128_from_limbs([lo, hi]: [u64; 2]) -> u128 {
    ((hi as u128) << 64) | lo as u128
}

/// The low limb is the raw bit pattern; the high limb is sign-carrying.
pub(crate) fn i128_to_limbs(v: i128) -> (u64, i64) {
    (v as u64, (v >> 64) as i64)
}

pub(crate) fn i128_from_limbs(lo: u64, hi: i64) -> i128 {
    ((hi as i128) << 64) | lo as i128
}

pub(crate) fn u256_to_limbs(v: U256) -> [u64; 4] {
    let (hi, lo) = v.into_words();
    let [p0, p1] = u128_to_limbs(lo);
    let [p2, p3] = u128_to_limbs(hi);
    [p0, p1, p2, p3]
}

pub(crate) fn u256_from_limbs([p0, p1, p2, p3]: [u64; 4]) -> U256 {
    U256::from_words(u128_from_limbs([p2, p3]), u128_from_limbs([p0, p1]))
}

/// The lower three limbs are raw bit patterns; only the top limb is signed.
pub(crate) fn i256_to_limbs(v: I256) -> ([u64; 3], i64) {
    let (hi, lo) = v.into_words();
    let [p0, p1] = u128_to_limbs(lo as u128);
    let (p2, p3) = i128_to_limbs(hi);
    ([p0, p1, p2], p3)
}

pub(crate) fn i256_from_limbs([p0, p1, p2]: [u64; 3], p3: i64) -> I256 {
    let lo = u128_from_limbs([p0, p1]) as i128;
    let hi = i128_from_limbs(p2, p3);
    I256::from_words(hi, lo)
}
