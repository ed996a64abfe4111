#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
struct BasicTypes {
    b: bool,
    u8_val: u8,
    u16_val: u16,
    u32_val: u32,
    u64_val: u64,
    i8_val: i8,
    i16_val: i16,
    i32_val: i32,
    i64_val: i64,
    c: char,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
struct StringTypes {
    s: String,
    vec_strings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
struct OptionTypes {
    opt_u64: Option<u64>,
    opt_string: Option<String>,
    opt_vec: Option<Vec<u32>>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
struct NestedStruct {
    inner: BasicTypes,
    boxed: Option<Box<NestedStruct>>,
    flag: bool,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
struct TupleStruct(u64, String, bool);

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
enum SimpleEnum {
    Variant1,
    Variant2(u64),
    Variant3 { x: u32, y: bool },
    Variant4(i8, String),
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
enum AllTypes {
    Basic(BasicTypes),
    Strings(StringTypes),
    Options(OptionTypes),
    Nested(NestedStruct),
    Tuple(TupleStruct),
    Simple(SimpleEnum),
    Map(BTreeMap<String, SimpleEnum>),
    Set(BTreeSet<u8>),
    Deque(VecDeque<AllTypes>),
    Vec(Vec<AllTypes>),
    Boxed(Box<AllTypes>),
    Unit,
}
