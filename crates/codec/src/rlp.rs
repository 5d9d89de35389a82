//! Thin cursor layer over `alloy_rlp`.
//!
//! `Header::decode` already rejects non-minimal prefixes; readers here only
//! add item splitting and the leading-zero rule for integers, so a
//! successful decode always re-encodes to the same bytes.

use alloy_rlp::{Encodable, Header};
use klay_types::BigUint;

/// One decoded item. `List` carries the raw payload of the list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Item<'a> {
    Bytes(&'a [u8]),
    List(&'a [u8]),
}

pub fn read_item<'a>(input: &mut &'a [u8]) -> alloy_rlp::Result<Item<'a>> {
    let header = Header::decode(input)?;
    let (payload, rest) = input.split_at(header.payload_length);
    *input = rest;
    Ok(if header.list {
        Item::List(payload)
    } else {
        Item::Bytes(payload)
    })
}

pub fn read_bytes<'a>(input: &mut &'a [u8]) -> alloy_rlp::Result<&'a [u8]> {
    match read_item(input)? {
        Item::Bytes(b) => Ok(b),
        Item::List(_) => Err(alloy_rlp::Error::UnexpectedList),
    }
}

/// Returns the payload of the next item, which must be a list.
pub fn read_list<'a>(input: &mut &'a [u8]) -> alloy_rlp::Result<&'a [u8]> {
    match read_item(input)? {
        Item::List(payload) => Ok(payload),
        Item::Bytes(_) => Err(alloy_rlp::Error::UnexpectedString),
    }
}

/// Big-endian integer payload; a leading zero byte is rejected.
pub fn check_uint(b: &[u8]) -> alloy_rlp::Result<&[u8]> {
    if b.first() == Some(&0) {
        return Err(alloy_rlp::Error::LeadingZero);
    }
    Ok(b)
}

pub fn read_uint(input: &mut &[u8]) -> alloy_rlp::Result<BigUint> {
    Ok(BigUint::from_bytes_be(check_uint(read_bytes(input)?)?))
}

/// Splits a list payload into its top-level items.
pub fn read_items(mut payload: &[u8]) -> alloy_rlp::Result<Vec<Item<'_>>> {
    let mut items = Vec::new();
    while !payload.is_empty() {
        items.push(read_item(&mut payload)?);
    }
    Ok(items)
}

pub fn write_bytes(out: &mut Vec<u8>, b: &[u8]) {
    b.encode(out);
}

pub fn write_uint(out: &mut Vec<u8>, v: &BigUint) {
    write_bytes(out, &klay_types::hexutil::to_minimal_bytes(v));
}

/// Wraps an already-encoded sequence of items as a list.
pub fn write_list(out: &mut Vec<u8>, payload: &[u8]) {
    Header {
        list: true,
        payload_length: payload.len(),
    }
    .encode(out);
    out.extend_from_slice(payload);
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_rlp::Error;

    fn bytes(b: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        write_bytes(&mut out, b);
        out
    }

    fn item(b: &[u8]) -> alloy_rlp::Result<Item<'_>> {
        let mut input = b;
        read_item(&mut input)
    }

    #[test]
    fn short_strings() {
        assert_eq!(bytes(&[]), vec![0x80]);
        assert_eq!(bytes(&[0x00]), vec![0x00]);
        assert_eq!(bytes(&[0x7f]), vec![0x7f]);
        assert_eq!(bytes(&[0x80]), vec![0x81, 0x80]);
        assert_eq!(bytes(b"dog"), vec![0x83, b'd', b'o', b'g']);
    }

    #[test]
    fn single_byte_reads_back_as_itself() {
        let mut input: &[u8] = &[0x05, 0x80];
        assert_eq!(read_item(&mut input), Ok(Item::Bytes(&[0x05])));
        assert_eq!(read_item(&mut input), Ok(Item::Bytes(&[])));
        assert!(input.is_empty());
    }

    #[test]
    fn long_strings_and_lists() {
        let long = vec![0xaa; 56];
        let enc = bytes(&long);
        assert_eq!(&enc[..2], &[0xb8, 56]);
        assert_eq!(enc.len(), 58);

        let mut list = Vec::new();
        write_list(&mut list, &vec![0x01; 300]);
        assert_eq!(&list[..3], &[0xf9, 0x01, 0x2c]);

        let mut input = &list[..];
        assert_eq!(read_list(&mut input).unwrap().len(), 300);
        assert!(input.is_empty());
    }

    #[test]
    fn integers_are_minimal() {
        let mut out = Vec::new();
        write_uint(&mut out, &BigUint::from(0u32));
        write_uint(&mut out, &BigUint::from(0x19u32));
        write_uint(&mut out, &BigUint::from(1234u32));
        assert_eq!(out, vec![0x80, 0x19, 0x82, 0x04, 0xd2]);

        let mut input = &out[..];
        assert_eq!(read_uint(&mut input).unwrap(), BigUint::from(0u32));
        assert_eq!(read_uint(&mut input).unwrap(), BigUint::from(0x19u32));
        assert_eq!(read_uint(&mut input).unwrap(), BigUint::from(1234u32));
    }

    #[test]
    fn rejects_non_canonical_forms() {
        // single byte below 0x80 wrapped in a length prefix
        assert_eq!(item(&[0x81, 0x05]), Err(Error::NonCanonicalSingleByte));
        // long form used for a short payload
        assert_eq!(item(&[0xb8, 0x02, 1, 2]), Err(Error::NonCanonicalSize));

        let mut input: &[u8] = &[0x82, 0x00, 0x01];
        assert_eq!(read_uint(&mut input), Err(Error::LeadingZero));
    }

    #[test]
    fn truncated_input() {
        assert_eq!(item(&[]), Err(Error::InputTooShort));
        assert_eq!(item(&[0x83, 1, 2]), Err(Error::InputTooShort));
        assert_eq!(item(&[0xc2, 0x01]), Err(Error::InputTooShort));
    }

    #[test]
    fn type_mismatch() {
        let mut input: &[u8] = &[0x01];
        assert_eq!(read_list(&mut input), Err(Error::UnexpectedString));
        let mut input: &[u8] = &[0xc0];
        assert_eq!(read_bytes(&mut input), Err(Error::UnexpectedList));
    }

    #[test]
    fn splits_list_payload() {
        let items = read_items(&[0x01, 0x82, 0xaa, 0xbb, 0xc1, 0x02]).unwrap();
        assert_eq!(
            items,
            vec![
                Item::Bytes(&[0x01]),
                Item::Bytes(&[0xaa, 0xbb]),
                Item::List(&[0x02]),
            ]
        );
    }
}
