#![no_main]

use {
    bytes::{Bytes, BytesMut},
    libfuzzer_sys::fuzz_target,
    std::collections::{BTreeMap, BTreeSet, VecDeque},
    swapcodec::Codec,
};

include!("../types.rs");

fuzz_target!(|data: &[u8]| {
    // Read as many packed values as the input holds.
    let codec = Codec::new();
    let mut src = Bytes::copy_from_slice(data);
    let mut values = Vec::new();
    while !src.is_empty() {
        let len = src.len();
        match codec.decode::<AllTypes>(src) {
            Ok((value, rest)) => {
                assert!(rest.len() < len);
                values.push(value);
                src = rest;
            }
            Err(_) => break,
        }
    }

    // Pack them into one reused buffer and read them back in order.
    let fresh = Codec::new();
    let mut buf = BytesMut::new();
    for value in &values {
        fresh.encode_into(value, &mut buf).expect("encode");
    }
    let mut src = buf.freeze();
    for value in &values {
        let (decoded, rest) = fresh.decode::<AllTypes>(src).expect("decode packed");
        assert_eq!(&decoded, value);
        src = rest;
    }
    assert!(src.is_empty());
});
