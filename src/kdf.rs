use crate::hmac::Hmac;
use crate::md::{DigestKind, MessageDigest};

/// hkdf is the HKDF key derivation function from RFC 5869.
///
/// Derives `size` bytes of key material from the shared secret `ikm`, the
/// context `info` and the `salt` (both possibly empty).
///
/// # Panics
///
/// Panics unless `0 < size <= 255 * kind.digest_length()`.
pub fn hkdf(kind: DigestKind, ikm: &[u8], size: usize, info: &[u8], salt: &[u8]) -> Vec<u8> {
    check_hkdf_size(kind, size);
    let prk = hkdf_extract(kind, salt, ikm);
    hkdf_expand(kind, &prk, info, size)
}

/// hkdf_extract is the extract step of HKDF: `PRK = HMAC(salt, ikm)`.
pub fn hkdf_extract(kind: DigestKind, salt: &[u8], ikm: &[u8]) -> Vec<u8> {
    Hmac::new(kind, salt).compute(ikm)
}

/// hkdf_expand is the expand step of HKDF:
/// `T(i) = HMAC(PRK, T(i-1) || info || i)`, truncated to `size` bytes.
///
/// # Panics
///
/// Panics unless `0 < size <= 255 * kind.digest_length()`.
pub fn hkdf_expand(kind: DigestKind, prk: &[u8], info: &[u8], size: usize) -> Vec<u8> {
    check_hkdf_size(kind, size);
    let mut hmac = Hmac::new(kind, prk);
    let mut t: Vec<u8> = Vec::new();
    expand(size, 1, |i| {
        hmac.update(&t);
        hmac.update(info);
        // i <= 255 by the size bound
        t = hmac.compute(&[i as u8]);
        t.clone()
    })
}

fn check_hkdf_size(kind: DigestKind, size: usize) {
    assert!(
        size > 0 && size <= 255 * kind.digest_length(),
        "hkdf output size {} out of range 1..={} for {}",
        size,
        255 * kind.digest_length(),
        kind
    );
}

/// x963_kdf is the ANS X9.63 key derivation function (SEC 1 section 3.6.1).
///
/// Concatenates `H(ikm || counter || info)` for a 32-bit big-endian counter
/// starting at 1 and truncates to `size` bytes.
///
/// # Panics
///
/// Panics unless `size < kind.digest_length() * (2^32 - 1)`.
pub fn x963_kdf(kind: DigestKind, ikm: &[u8], size: usize, info: &[u8]) -> Vec<u8> {
    let limit = kind.digest_length() as u128 * 0xffff_ffff;
    assert!(
        (size as u128) < limit,
        "x9.63 kdf output size {} must be below {} for {}",
        size,
        limit,
        kind
    );
    counter_hash(kind, ikm, info, size, 1)
}

/// mgf1 is the mask generation function MGF1 from RFC 8017 appendix B.2.1.
///
/// Concatenates `H(seed || counter)` for a 32-bit big-endian counter starting
/// at 0 and truncates to `size` bytes.
///
/// # Panics
///
/// Panics unless `size <= kind.digest_length() * 2^32`.
pub fn mgf1(kind: DigestKind, seed: &[u8], size: usize) -> Vec<u8> {
    let limit = (kind.digest_length() as u128) << 32;
    assert!(
        (size as u128) <= limit,
        "mgf1 mask length {} exceeds {} for {}",
        size,
        limit,
        kind
    );
    counter_hash(kind, seed, &[], size, 0)
}

// H(secret || counter || info) per block, the shape shared by X9.63 and MGF1.
fn counter_hash(kind: DigestKind, secret: &[u8], info: &[u8], size: usize, first: u32) -> Vec<u8> {
    if size == 0 {
        return Vec::new();
    }
    let mut md = MessageDigest::new(kind);
    expand(size, first, |counter| {
        md.update(secret);
        md.update(&counter.to_be_bytes());
        md.digest(info)
    })
}

/// expand concatenates the blocks produced for successive counter values,
/// starting at `first`, until `size` bytes are available, then truncates.
///
/// The counter wraps like a 4-byte big-endian register, carrying across all
/// four bytes.
fn expand<F>(size: usize, first: u32, mut block: F) -> Vec<u8>
where
    F: FnMut(u32) -> Vec<u8>,
{
    let mut okm = Vec::with_capacity(size);
    let mut counter = first;
    while okm.len() < size {
        okm.extend_from_slice(&block(counter));
        counter = counter.wrapping_add(1);
    }
    okm.truncate(size);
    okm
}

#[cfg(test)]
pub mod test {
    use super::*;
    use anyhow::Result;

    struct HkdfElement {
        ikm: Vec<u8>,
        salt: Vec<u8>,
        info: Vec<u8>,
        size: usize,
        prk: &'static str,
        okm: &'static str,
    }

    // RFC 5869 appendix A, test cases 1-3 (SHA-256).
    fn hkdf_vector() -> Vec<HkdfElement> {
        vec![
            HkdfElement {
                ikm: vec![0x0b; 22],
                salt: (0x00..=0x0c).collect(),
                info: (0xf0..=0xf9).collect(),
                size: 42,
                prk: "077709362c2e32df0ddc3f0dc47bba6390b6c73bb50f9c3122ec844ad7c2b3e5",
                okm: "3cb25f25faacd57a90434f64d0362f2a2d2d0a90cf1a5a4c5db02d56ecc4c5bf34007208d5b887185865",
            },
            HkdfElement {
                ikm: (0x00..=0x4f).collect(),
                salt: (0x60..=0xaf).collect(),
                info: (0xb0..=0xff).collect(),
                size: 82,
                prk: "06a6b88c5853361a06104c9ceb35b45cef760014904671014a193f40c15fc244",
                okm: "b11e398dc80327a1c8e7f78c596a49344f012eda2d4efad8a050cc4c19afa97c59045a99cac7827271cb41c65e590e09da3275600c2f09b8367793a9aca3db71cc30c58179ec3e87c14c01d5c1f3434f1d87",
            },
            HkdfElement {
                ikm: vec![0x0b; 22],
                salt: vec![],
                info: vec![],
                size: 42,
                prk: "19ef24a32c717b167f33a91d6f648bdf96596776afdb6377ac434c1c293ccb04",
                okm: "8da4e775a563c18f715f802a063c5a31b8a11f5c5ee1879ec3454e5f3c738d2d9d201395faa4b61a96c8",
            },
        ]
    }

    #[test]
    fn hkdf_rfc5869() {
        hkdf_vector().iter().enumerate().for_each(|(i, e)| {
            let prk = hex::encode(hkdf_extract(DigestKind::Sha2_256, &e.salt, &e.ikm));
            assert_eq!(prk, e.prk, "prk mismatch on case {}", i + 1);

            let okm = hex::encode(hkdf(DigestKind::Sha2_256, &e.ikm, e.size, &e.info, &e.salt));
            assert_eq!(
                okm,
                e.okm,
                "hkdf case {} failed! got {}, want {}",
                i + 1,
                okm,
                e.okm
            );
        })
    }

    #[test]
    fn hkdf_max_size() {
        let size = 255 * DigestKind::Sha1.digest_length();
        let okm = hkdf(DigestKind::Sha1, b"secret", size, b"info", b"salt");
        assert_eq!(okm.len(), size);
    }

    #[test]
    #[should_panic(expected = "hkdf output size")]
    fn hkdf_zero_size() {
        hkdf(DigestKind::Sha2_256, b"secret", 0, &[], &[]);
    }

    #[test]
    #[should_panic(expected = "hkdf output size")]
    fn hkdf_too_long() {
        hkdf(DigestKind::Sha2_256, b"secret", 255 * 32 + 1, &[], &[]);
    }

    #[test]
    fn x963_vector() -> Result<()> {
        let z = hex::decode("96c05619d56c328ab95fe84b18264b08725b85e33fd34f08")?;
        let key = x963_kdf(DigestKind::Sha2_256, &z, 16, &[]);
        assert_eq!(hex::encode(key), "443024c3dae66b95e6f5670601558f71");
        Ok(())
    }

    #[test]
    fn x963_definition() {
        let kind = DigestKind::Sha2_224;
        let okm = x963_kdf(kind, b"shared secret", 100, b"context");

        let mut md = MessageDigest::new(kind);
        let mut expected = Vec::new();
        for counter in 1u32..=4 {
            md.update(b"shared secret");
            md.update(&counter.to_be_bytes());
            expected.extend(md.digest(b"context"));
        }
        expected.truncate(100);
        assert_eq!(okm, expected);
    }

    #[test]
    fn mgf1_vector() {
        assert_eq!(hex::encode(mgf1(DigestKind::Sha1, b"foo", 3)), "1ac907");
        assert_eq!(hex::encode(mgf1(DigestKind::Sha1, b"foo", 5)), "1ac9075cd4");
        assert_eq!(hex::encode(mgf1(DigestKind::Sha1, b"bar", 5)), "bc0c655e01");
        assert_eq!(
            hex::encode(mgf1(DigestKind::Sha1, b"bar", 50)),
            "bc0c655e016bc2931d85a2e675181adcef7f581f76df2739da74faac41627be2f7f415c89e983fd0ce80ced9878641cb4876"
        );
        assert_eq!(
            hex::encode(mgf1(DigestKind::Sha2_256, b"bar", 50)),
            "382576a7841021cc28fc4c0948753fb8312090cea942ea4c4e735d10dc724b155f9f6069f289d61daca0cb814502ef04eae1"
        );
    }

    #[test]
    fn mgf1_counter_starts_at_zero() {
        let mut md = MessageDigest::new(DigestKind::Sha3_256);
        md.update(b"seed");
        let first = md.digest(&[0, 0, 0, 0]);
        assert_eq!(mgf1(DigestKind::Sha3_256, b"seed", 32), first);
    }

    #[test]
    fn truncation() {
        for kind in DigestKind::ALL {
            for size in [1, kind.digest_length() - 1, kind.digest_length(), kind.digest_length() + 1, 200] {
                assert_eq!(hkdf(kind, b"ikm", size, b"info", b"salt").len(), size);
                assert_eq!(x963_kdf(kind, b"ikm", size, b"info").len(), size);
                assert_eq!(mgf1(kind, b"seed", size).len(), size);
            }
            // shorter outputs are prefixes of longer ones
            let long = x963_kdf(kind, b"ikm", 150, b"info");
            assert_eq!(x963_kdf(kind, b"ikm", 37, b"info")[..], long[..37]);
        }
    }

    #[test]
    fn zero_size() {
        assert!(x963_kdf(DigestKind::Sha2_512, b"ikm", 0, b"info").is_empty());
        assert!(mgf1(DigestKind::Sha2_512, b"seed", 0).is_empty());
    }

    #[test]
    fn counter_carries() {
        let mut seen = Vec::new();
        let out = expand(10, 0xffff_fffe, |c| {
            seen.push(c);
            vec![c as u8; 4]
        });
        assert_eq!(seen, vec![0xffff_fffe, 0xffff_ffff, 0]);
        assert_eq!(out, vec![0xfe, 0xfe, 0xfe, 0xfe, 0xff, 0xff, 0xff, 0xff, 0, 0]);
        assert_eq!(0x0000_00ffu32.wrapping_add(1).to_be_bytes(), [0, 0, 1, 0]);
    }
}
