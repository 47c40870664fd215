//! Voice payload decoding.
//!
//! iridium-parser has printed VOC payloads two ways over the years:
//!
//! * hex-bracket: `[df.ff.f3.fc.10]`, one byte per `.`-separated pair of hex digits;
//! * bitstring: raw `0`/`1` characters, packed eight per byte, least significant bit
//!   first. A trailing group shorter than eight still makes one byte.
//!
//! Both decode to the raw bytes fed to the AMBE decoder.

use crate::errors::AppError;

pub fn decode_payload(payload: &str) -> Result<Vec<u8>, AppError> {
    if payload.starts_with('[') {
        decode_hex_bracket(payload)
    } else {
        decode_bitstring(payload)
    }
}

/// Drops the first and last character, then reads hex byte pairs separated by
/// `.` or whitespace.
pub fn decode_hex_bracket(payload: &str) -> Result<Vec<u8>, AppError> {
    let inner = strip_brackets(payload);
    let mut out = Vec::with_capacity(inner.len() / 3 + 1);

    for tok in inner
        .split(|c: char| c == '.' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        let bytes = hex::decode(tok)
            .map_err(|e| decode_err(payload, format!("hex token {:?}: {}", tok, e)))?;
        out.extend_from_slice(&bytes);
    }
    Ok(out)
}

pub fn decode_bitstring(payload: &str) -> Result<Vec<u8>, AppError> {
    payload
        .as_bytes()
        .chunks(8)
        .map(|chunk| {
            chunk.iter().enumerate().try_fold(0u8, |byte, (i, c)| match c {
                b'0' => Ok(byte),
                b'1' => Ok(byte | (1 << i)),
                _ => Err(decode_err(payload, format!("unexpected character {:?}", *c as char))),
            })
        })
        .collect()
}

#[inline]
fn strip_brackets(payload: &str) -> &str {
    let mut chars = payload.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}

fn decode_err(payload: &str, reason: String) -> AppError {
    AppError::Decode { payload: payload.to_string(), reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_bracket_in_order() {
        let bytes = decode_payload("[df.ff.f3.fc.10.33.c3.1f.0c.83.c3.cc.cc.30.ff.f3.ef.00.bc.0c.b4.0f.dc.d0.1a.cc.9c.c5.0c.fc.28.01.cc.38.c2.33.e0.ff.4f]").unwrap();
        assert_eq!(bytes.len(), 39);
        assert_eq!(&bytes[..4], &[0xdf, 0xff, 0xf3, 0xfc]);
        assert_eq!(bytes[17], 0x00);
        assert_eq!(*bytes.last().unwrap(), 0x4f);
    }

    #[test]
    fn hex_bracket_uppercase_and_empty() {
        assert_eq!(decode_payload("[AB.0f]").unwrap(), vec![0xab, 0x0f]);
        assert_eq!(decode_payload("[]").unwrap(), Vec::<u8>::new());
        assert_eq!(decode_payload("[").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn hex_bracket_reason_names_the_token() {
        match decode_payload("[df.f]").unwrap_err() {
            AppError::Decode { reason, .. } => assert!(reason.contains("\"f\""), "{reason}"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(decode_payload("[DF.fF.0a]").unwrap(), vec![0xdf, 0xff, 0x0a]);
    }

    #[test]
    fn hex_bracket_rejects_bad_tokens() {
        for bad in ["[df.zz]", "[df.f]", "[d.ff]", "[df..g0]"] {
            let err = decode_payload(bad).unwrap_err();
            match err {
                AppError::Decode { payload, .. } => assert_eq!(payload, bad),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn bitstring_lsb_first() {
        assert_eq!(decode_payload("10000000").unwrap(), vec![0x01]);
        assert_eq!(decode_payload("00000001").unwrap(), vec![0x80]);
        assert_eq!(decode_payload("01111001").unwrap(), vec![0x9e]);
        assert_eq!(decode_payload("1111111100000000").unwrap(), vec![0xff, 0x00]);
    }

    #[test]
    fn bitstring_short_tail_still_makes_a_byte() {
        assert_eq!(decode_payload("1011").unwrap(), vec![0x0d]);
        assert_eq!(decode_payload("0000000011").unwrap(), vec![0x00, 0x03]);

        let payload = "01111001000100010010010011011011011001111";
        let bytes = decode_payload(payload).unwrap();
        assert_eq!(bytes.len(), payload.len().div_ceil(8));
        assert_eq!(bytes, vec![0x9e, 0x88, 0x24, 0xdb, 0xe6, 0x01]);
    }

    #[test]
    fn bitstring_rejects_other_characters() {
        for bad in ["0102", "0000000x", "descr_extra:", "0 1"] {
            let err = decode_payload(bad).unwrap_err();
            match err {
                AppError::Decode { payload, .. } => assert_eq!(payload, bad),
                other => panic!("unexpected {other:?}"),
            }
        }
    }
}
