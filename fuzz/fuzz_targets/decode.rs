#![no_main]

use {
    bytes::{Bytes, BytesMut},
    libfuzzer_sys::fuzz_target,
    std::collections::{BTreeMap, BTreeSet, VecDeque},
    swapcodec::Codec,
};

include!("../types.rs");

fuzz_target!(|data: &[u8]| {
    let codec = Codec::new();
    let Ok((before, rest)) = codec.decode::<AllTypes>(Bytes::copy_from_slice(data)) else {
        return;
    };
    assert!(rest.len() < data.len());

    // Whatever decodes must survive a trip through a fresh codec.
    let fresh = Codec::new();
    let encoded = fresh.encode(&before, BytesMut::new()).expect("encode");
    let (after, rest) = fresh.decode::<AllTypes>(encoded.freeze()).expect("decode round-trip");
    assert_eq!(before, after);
    assert!(rest.is_empty());
});
