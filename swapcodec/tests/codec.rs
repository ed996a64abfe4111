use {
    bytes::{Bytes, BytesMut},
    proptest::prelude::*,
    serde::{Deserialize, Serialize},
    std::collections::{BTreeMap, HashMap},
    swapcodec::{
        config::{Config, Configuration, DEFAULT_PREALLOCATION_SIZE_LIMIT},
        Codec, DecodeError, EncodeError, Error,
    },
};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
struct TestStruct {
    a: String,
    b: i64,
    #[serde(with = "byte_buf")]
    c: Vec<u8>,
    d: HashMap<String, i64>,
    e: Option<Box<TestStruct>>,
}

/// Serialize a `Vec<u8>` as a byte string rather than a sequence of integers.
mod byte_buf {
    use serde::{de, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(bytes)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        struct Visitor;
        impl de::Visitor<'_> for Visitor {
            type Value = Vec<u8>;
            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a byte string")
            }
            fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Vec<u8>, E> {
                Ok(v.to_vec())
            }
        }
        deserializer.deserialize_byte_buf(Visitor)
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Entry {
    a: String,
    b: i64,
}

fn roundtrip<C, T>(codec: &Codec<C>, value: &T) -> T
where
    C: Config,
    T: Serialize + serde::de::DeserializeOwned,
{
    let buf = codec.encode(value, BytesMut::new()).unwrap();
    let (decoded, rest) = codec.decode::<T>(buf.freeze()).unwrap();
    assert!(rest.is_empty(), "unexpected data left after decoding");
    decoded
}

#[test]
fn encode_int() {
    let codec = Codec::new();
    let buf = codec.encode(&1234i64, BytesMut::new()).unwrap();
    let (y, rest) = codec.decode::<i64>(buf.freeze()).unwrap();
    assert_eq!(y, 1234);
    assert!(rest.is_empty());
}

#[test]
fn encode_float() {
    let codec = Codec::new();
    assert_eq!(roundtrip(&codec, &1234.3423f64), 1234.3423);
    assert_eq!(roundtrip(&codec, &-0.5f32), -0.5);
}

#[test]
fn encode_string() {
    let codec = Codec::new();
    assert_eq!(roundtrip(&codec, &"foobarbaz".to_string()), "foobarbaz");
    assert_eq!(roundtrip(&codec, &String::new()), "");
    assert_eq!(roundtrip(&codec, &'ß'), 'ß');
}

#[test]
fn encode_struct() {
    let codec = Codec::new();
    codec.register(&TestStruct::default()).unwrap();

    let x = TestStruct {
        a: "aaa".into(),
        b: 123,
        c: b"aaabxxcx".to_vec(),
        d: HashMap::from([("foo".into(), 2), ("bar".into(), 5456)]),
        e: Some(Box::new(TestStruct {
            a: "nested".into(),
            ..Default::default()
        })),
    };
    assert_eq!(roundtrip(&codec, &x), x);
}

#[test]
fn encode_mixed() {
    let codec = Codec::new();
    codec.register(&TestStruct::default()).unwrap();

    let x_struct = TestStruct {
        a: "1234".into(),
        b: 1232,
        ..Default::default()
    };
    let buf_int = codec.encode(&123i32, BytesMut::new()).unwrap().freeze();
    let buf_float = codec.encode(&234.2343f64, BytesMut::new()).unwrap().freeze();
    let buf_string = codec.encode("asdfa", BytesMut::new()).unwrap().freeze();
    let buf_struct = codec.encode(&x_struct, BytesMut::new()).unwrap().freeze();

    assert_eq!(codec.decode::<i32>(buf_int).unwrap(), (123, Bytes::new()));
    assert_eq!(
        codec.decode::<f64>(buf_float).unwrap(),
        (234.2343, Bytes::new())
    );
    assert_eq!(
        codec.decode::<String>(buf_string).unwrap(),
        ("asdfa".to_string(), Bytes::new())
    );
    assert_eq!(
        codec.decode::<TestStruct>(buf_struct).unwrap(),
        (x_struct, Bytes::new())
    );
}

#[test]
fn packed_entries_decode_in_order() {
    let codec = Codec::new();
    let buf = codec
        .encode(
            &Entry {
                a: "aaa".into(),
                b: 123,
            },
            BytesMut::new(),
        )
        .unwrap();
    let buf = codec
        .encode(
            &Entry {
                a: "bbb".into(),
                b: 456,
            },
            buf,
        )
        .unwrap();

    let (first, rest) = codec.decode::<Entry>(buf.freeze()).unwrap();
    assert_eq!(
        first,
        Entry {
            a: "aaa".into(),
            b: 123
        }
    );
    assert!(!rest.is_empty());
    let (second, rest) = codec.decode::<Entry>(rest).unwrap();
    assert_eq!(
        second,
        Entry {
            a: "bbb".into(),
            b: 456
        }
    );
    assert!(rest.is_empty());
}

#[test]
fn remainder_shares_storage() {
    let codec = Codec::new();
    let mut buf = BytesMut::new();
    codec.encode_into(&1u8, &mut buf).unwrap();
    codec.encode_into(&2u8, &mut buf).unwrap();
    let src = buf.freeze();
    let (_, rest) = codec.decode::<u8>(src.clone()).unwrap();
    assert_eq!(rest.as_ptr(), src[2..].as_ptr());
}

#[test]
fn encode_multi() {
    let codec = Codec::new();
    codec.register(&TestStruct::default()).unwrap();

    let mut buf = BytesMut::with_capacity(128);
    let mut x = TestStruct::default();
    for i in 0..10 {
        x.b = i;
        buf = codec.encode(&x, buf).unwrap();
    }

    let buf = buf.freeze();
    for _ in 0..20 {
        let (y, rest) = codec.decode::<TestStruct>(buf.clone()).unwrap();
        assert_eq!(y.b, 0);
        assert!(!rest.is_empty());
    }

    let mut src = buf;
    for i in 0..10 {
        let (y, rest) = codec.decode::<TestStruct>(src).unwrap();
        assert_eq!(y.b, i);
        src = rest;
    }
    assert!(src.is_empty());
}

#[test]
fn cleared_buffer_is_reused() {
    let codec = Codec::new();
    let mut buf = BytesMut::with_capacity(256);
    let ptr = buf.as_ptr();
    for i in 0..50u32 {
        buf.clear();
        let entry = Entry {
            a: "x".repeat(8),
            b: i.into(),
        };
        let n = codec.encode_into(&entry, &mut buf).unwrap();
        assert_eq!(n, buf.len());
        assert_eq!(buf.as_ptr(), ptr);

        let (entry, rest) = codec.decode::<Entry>(Bytes::copy_from_slice(&buf)).unwrap();
        assert_eq!(entry.b, i64::from(i));
        assert!(rest.is_empty());
    }
}

#[test]
fn short_buffer_grows() {
    let codec = Codec::new();
    let long = "y".repeat(1000);
    let buf = codec.encode(&long, BytesMut::with_capacity(4)).unwrap();
    assert!(buf.capacity() >= buf.len());
    assert_eq!(codec.decode::<String>(buf.freeze()).unwrap().0, long);
}

#[test]
fn register_native_types() {
    let codec = Codec::new();
    codec.register(&1234i64).unwrap();
    codec.register(&123.45f64).unwrap();
    codec.register("foobar").unwrap();
    codec.register(&b"abc".to_vec()).unwrap();
    codec
        .register(&HashMap::from([("foo", "bar"), ("aaa", "bbb")]))
        .unwrap();
    codec.register(&()).unwrap();
}

#[test]
fn registration_lets_outputs_decode_out_of_order() {
    let unregistered = Codec::new();
    let first = unregistered
        .encode(&Entry { a: "aaa".into(), b: 1 }, BytesMut::new())
        .unwrap();
    let second = unregistered
        .encode(&Entry { a: "bbb".into(), b: 2 }, BytesMut::new())
        .unwrap();
    // `second` only refers to the descriptor `first` carried.
    let err = unregistered.decode::<Entry>(second.freeze()).unwrap_err();
    assert!(matches!(err, Error::Decode(DecodeError::UnknownType(0))));
    // The failed decode left nothing behind, so `first` still teaches the decoder.
    let (entry, _) = unregistered.decode::<Entry>(first.freeze()).unwrap();
    assert_eq!(entry.a, "aaa");

    let registered = Codec::new();
    registered.register(&Entry { a: String::new(), b: 0 }).unwrap();
    let first = registered
        .encode(&Entry { a: "aaa".into(), b: 1 }, BytesMut::new())
        .unwrap();
    let second = registered
        .encode(&Entry { a: "bbb".into(), b: 2 }, BytesMut::new())
        .unwrap();
    let (entry, _) = registered.decode::<Entry>(second.freeze()).unwrap();
    assert_eq!(entry.b, 2);
    let (entry, _) = registered.decode::<Entry>(first.freeze()).unwrap();
    assert_eq!(entry.b, 1);
}

#[test]
fn encode_error_resets_codec() {
    #[derive(Serialize)]
    struct Wide {
        id: u32,
        value: u128,
    }

    let codec = Codec::new();
    let err = codec
        .encode(&Wide { id: 1, value: 2 }, BytesMut::new())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Encode(EncodeError::UnsupportedType("u128"))
    ));

    let entry = Entry {
        a: "after".into(),
        b: -7,
    };
    assert_eq!(roundtrip(&codec, &entry), entry);
}

#[test]
fn decode_errors() {
    let codec = Codec::new();
    let buf = codec
        .encode(&Entry { a: "aaa".into(), b: 1 }, BytesMut::new())
        .unwrap()
        .freeze();

    // Truncated.
    let err = codec.decode::<Entry>(buf.slice(..buf.len() - 1)).unwrap_err();
    assert!(matches!(err, Error::Decode(DecodeError::UnexpectedEnd(_))));
    // Incompatible target.
    let err = codec.decode::<Vec<String>>(buf.clone()).unwrap_err();
    assert!(err.is_decode());
    // Neither failure kept anything the bytes defined.
    let (entry, rest) = codec.decode::<Entry>(buf).unwrap();
    assert_eq!(entry.a, "aaa");
    assert!(rest.is_empty());

    assert!(codec.decode::<u8>(Bytes::new()).is_err());
}

#[test]
fn decode_into_existing_target() {
    let codec = Codec::new();
    let mut buf = BytesMut::new();
    codec.encode_into(&vec![1u32, 2, 3], &mut buf).unwrap();
    codec.encode_into(&vec![4u32], &mut buf).unwrap();

    let mut target: Vec<u32> = Vec::with_capacity(16);
    let rest = codec.decode_into(&mut target, buf.freeze()).unwrap();
    assert_eq!(target, [1, 2, 3]);
    let rest = codec.decode_into(&mut target, rest).unwrap();
    assert_eq!(target, [4]);
    assert!(rest.is_empty());
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
enum Shape {
    Point,
    Circle(f64),
    Segment(i32, i32),
    Rect { w: u16, h: u16 },
    Group(Vec<Shape>),
}

#[test]
fn enums_and_nesting() {
    let codec = Codec::new();
    let shape = Shape::Group(vec![
        Shape::Point,
        Shape::Circle(1.5),
        Shape::Segment(-3, 3),
        Shape::Rect { w: 2, h: 4 },
        Shape::Group(vec![]),
    ]);
    assert_eq!(roundtrip(&codec, &shape), shape);

    let map: BTreeMap<u8, Option<Box<Shape>>> =
        BTreeMap::from([(1, None), (2, Some(Box::new(Shape::Point)))]);
    assert_eq!(roundtrip(&codec, &map), map);

    let tuple = (1u8, "two".to_string(), [3i16; 3], ((), true));
    assert_eq!(roundtrip(&codec, &tuple), tuple);
}

#[test]
fn depth_limit() {
    let codec = Codec::with_config(Configuration::default().with_max_depth::<7>());
    // A group is a variant holding a sequence, two levels. The point is one more.
    let mut shape = Shape::Point;
    for _ in 0..3 {
        shape = Shape::Group(vec![shape]);
    }
    assert_eq!(roundtrip(&codec, &shape), shape);
    let deeper = Shape::Group(vec![shape]);
    let err = codec.encode(&deeper, BytesMut::new()).unwrap_err();
    assert!(matches!(
        err,
        Error::Encode(EncodeError::DepthLimitExceeded(7))
    ));
}

#[test]
fn preallocation_limit() {
    let codec = Codec::with_config(Configuration::default().with_preallocation_size_limit::<16>());
    let fits = "x".repeat(16);
    assert_eq!(roundtrip(&codec, &fits), fits);

    // What the decoder would refuse, the encoder refuses first.
    let mut dst = BytesMut::from(&b"prefix"[..]);
    let err = codec.encode_into(&"x".repeat(17), &mut dst).unwrap_err();
    assert!(matches!(
        err,
        Error::Encode(EncodeError::PreallocationSizeLimit {
            needed: 17,
            limit: 16
        })
    ));
    assert_eq!(&dst[..], b"prefix");
    assert!(matches!(
        codec.encode(&vec![0u8; 17], BytesMut::new()),
        Err(Error::Encode(EncodeError::PreallocationSizeLimit { .. }))
    ));
    let map: BTreeMap<u8, u8> = (0..9).map(|i| (i, i)).collect();
    assert!(matches!(
        codec.encode(&map, BytesMut::new()),
        Err(Error::Encode(EncodeError::PreallocationSizeLimit {
            needed: 18,
            limit: 16
        }))
    ));

    // Bytes from a codec with a looser limit are still held to this one.
    let wide = Codec::new().encode(&"x".repeat(17), BytesMut::new()).unwrap();
    let err = codec.decode::<String>(wide.freeze()).unwrap_err();
    assert!(matches!(
        err,
        Error::Decode(DecodeError::PreallocationSizeLimit {
            needed: 17,
            limit: 16
        })
    ));
}

#[test]
fn oversized_values_fail_at_encode() {
    let codec = Codec::new();
    let limit = DEFAULT_PREALLOCATION_SIZE_LIMIT;
    let at_limit = "x".repeat(limit);
    assert_eq!(roundtrip(&codec, &at_limit).len(), limit);

    let err = codec.encode(&"x".repeat(limit + 1), BytesMut::new()).unwrap_err();
    assert!(matches!(
        err,
        Error::Encode(EncodeError::PreallocationSizeLimit { needed, .. }) if needed == limit + 1
    ));
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, proptest_derive::Arbitrary)]
enum Status {
    Active,
    Suspended { reason: String },
    Scored(i32),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, proptest_derive::Arbitrary)]
struct Record {
    id: u64,
    name: String,
    tags: Vec<String>,
    delta: i16,
    #[proptest(strategy = "-1e12f64..1e12f64")]
    weight: f64,
    status: Status,
    parent: Option<u32>,
    attrs: BTreeMap<u8, String>,
}

proptest! {
    #[test]
    fn record_roundtrip(record: Record) {
        let codec = Codec::new();
        prop_assert_eq!(roundtrip(&codec, &record), record);
    }

    #[test]
    fn records_pack_into_one_buffer(records in proptest::collection::vec(any::<Record>(), 0..8)) {
        let codec = Codec::new();
        let mut buf = BytesMut::new();
        for record in &records {
            codec.encode_into(record, &mut buf).unwrap();
        }
        let mut src = buf.freeze();
        for record in &records {
            let (decoded, rest) = codec.decode::<Record>(src).unwrap();
            prop_assert_eq!(&decoded, record);
            src = rest;
        }
        prop_assert!(src.is_empty());
    }
}
