use std::collections::HashMap;
use std::marker::PhantomData;

use structmap::{
    Complex, EmptyKeyPolicy, ErrorKind, MappedStruct, Options, Record, RecordExt, Value, convert,
    struct_to_map,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn s(v: &str) -> Value {
    Value::String(v.to_string())
}

#[derive(Record, Debug, Clone, Default, PartialEq)]
struct Inner {
    #[tag(json = "c")]
    pub c: String,
}

#[derive(Record, Debug, Clone, Default, PartialEq)]
struct Dive {
    #[tag(json = "aa")]
    pub aa: String,
    #[tag(json = "b,dive")]
    pub b: Inner,
}

#[derive(Record, Debug, Clone, Default, PartialEq)]
struct Dotted {
    #[tag(json = "aa")]
    pub aa: String,
    #[tag(json = "b,dotted")]
    pub b: Inner,
}

#[derive(Record, Debug, Clone, Default, PartialEq)]
struct Embedded {
    #[tag(json = "aa")]
    pub aa: String,
    #[tag(json = "b")]
    pub b: Inner,
}

fn inner(c: &str) -> Inner {
    Inner { c: c.to_string() }
}

#[test]
fn dive_merges_nested_keys() {
    init_tracing();
    let data = Dive {
        aa: "x".into(),
        b: inner("y"),
    };
    let map = struct_to_map(&data, "json", "").unwrap();
    let expected: MappedStruct = [("aa".to_string(), s("x")), ("c".to_string(), s("y"))].into();
    assert_eq!(map, expected);
}

#[test]
fn dotted_prefixes_nested_keys() {
    let data = Dotted {
        aa: "x".into(),
        b: inner("y"),
    };
    let map = struct_to_map(&data, "json", "").unwrap();
    let expected: MappedStruct = [("aa".to_string(), s("x")), ("b.c".to_string(), s("y"))].into();
    assert_eq!(map, expected);
}

#[test]
fn nested_record_becomes_submap() {
    let data = Embedded {
        aa: "x".into(),
        b: inner("y"),
    };
    let map = struct_to_map(&data, "json", "").unwrap();
    assert_eq!(map.len(), 2);
    let sub = map["b"].as_map().unwrap();
    assert_eq!(sub["c"], s("y"));
}

#[derive(Record, Default)]
struct Leaf {
    #[tag(json = "e")]
    pub e: i32,
}

#[derive(Record, Default)]
struct Middle {
    #[tag(json = "c")]
    pub c: bool,
    #[tag(json = "d,dotted")]
    pub d: Leaf,
    #[tag(json = "f,dive")]
    pub f: Leaf,
}

#[derive(Record, Default)]
struct Outer {
    #[tag(json = "b,dotted")]
    pub b: Middle,
}

#[test]
fn dotted_composes_through_levels() {
    let data = Outer {
        b: Middle {
            c: true,
            d: Leaf { e: 1 },
            f: Leaf { e: 2 },
        },
    };
    let map = struct_to_map(&data, "json", "").unwrap();
    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    assert_eq!(keys, ["b.c", "b.d.e", "b.e"]);
    assert_eq!(map["b.d.e"], Value::Int(1));
    assert_eq!(map["b.e"], Value::Int(2));
}

#[derive(Record)]
struct Collide {
    #[tag(json = "c")]
    pub before: String,
    #[tag(json = "inner,dive")]
    pub inner: Inner,
}

#[derive(Record)]
struct CollideAfter {
    #[tag(json = "inner,dive")]
    pub inner: Inner,
    #[tag(json = "c")]
    pub after: String,
}

#[test]
fn last_write_wins() {
    let data = Collide {
        before: "parent".into(),
        inner: inner("child"),
    };
    assert_eq!(struct_to_map(&data, "json", "").unwrap()["c"], s("child"));

    let data = CollideAfter {
        inner: inner("child"),
        after: "parent".into(),
    };
    assert_eq!(struct_to_map(&data, "json", "").unwrap()["c"], s("parent"));
}

#[derive(Record, Default, Clone, PartialEq, Debug)]
struct Tags {
    #[tag(json = "name,wildcard", map = "n")]
    pub name: String,
    #[tag(json = "-", map = "ignored_in_json")]
    pub hidden: String,
    pub untagged: String,
    #[tag(json = "secret")]
    secret: String,
    #[tag(json = "count,omitempty,unknown")]
    pub count: u32,
    #[tag(json = "ptr")]
    pub ptr: Option<i64>,
    #[tag(json = "ptr_omit,omitempty")]
    pub ptr_omit: Option<i64>,
}

impl Tags {
    fn sample() -> Self {
        Self {
            name: "abc".into(),
            hidden: "h".into(),
            untagged: "u".into(),
            secret: "s".into(),
            count: 0,
            ptr: None,
            ptr_omit: None,
        }
    }
}

#[test]
fn tag_directives() {
    let data = Tags::sample();
    let map = struct_to_map(&data, "json", "").unwrap();
    let expected: MappedStruct = [("name".to_string(), s("%abc%"))].into();
    assert_eq!(map, expected);
    assert!(!data.secret.is_empty());
}

#[test]
fn namespace_selects_tags() {
    let map = struct_to_map(&Tags::sample(), "map", "").unwrap();
    let expected: MappedStruct = [
        ("n".to_string(), s("abc")),
        ("ignored_in_json".to_string(), s("h")),
    ]
    .into();
    assert_eq!(map, expected);

    assert!(struct_to_map(&Tags::sample(), "db", "").unwrap().is_empty());
}

#[test]
fn omitempty_only_skips_zero() {
    let data = Tags {
        count: 3,
        ..Tags::sample()
    };
    let map = struct_to_map(&data, "json", "").unwrap();
    assert_eq!(map["count"], Value::Uint(3));
}

#[test]
fn pointers() {
    let data = Tags {
        ptr: Some(0),
        ptr_omit: Some(0),
        ..Tags::sample()
    };
    let map = struct_to_map(&data, "json", "").unwrap();
    assert_eq!(map["ptr"], Value::Int(0));
    // A non-null pointer to zero is not zero.
    assert_eq!(map["ptr_omit"], Value::Int(0));

    let map = struct_to_map(&Tags::sample(), "json", "").unwrap();
    assert!(!map.contains_key("ptr"));
    assert!(!map.contains_key("ptr_omit"));
}

#[derive(Record)]
struct Kinds {
    #[tag(json = "i8")]
    pub i8: i8,
    #[tag(json = "u")]
    pub u: usize,
    #[tag(json = "f")]
    pub f: f32,
    #[tag(json = "z")]
    pub z: Complex,
    #[tag(json = "b")]
    pub b: bool,
    #[tag(json = "list")]
    pub list: Vec<i32>,
    #[tag(json = "arr,wildcard")]
    pub arr: [&'static str; 2],
    #[tag(json = "dict")]
    pub dict: HashMap<String, Option<u8>>,
    #[tag(json = "any")]
    pub any: serde_json::Value,
    #[tag(json = "value")]
    pub value: Value,
    #[tag(json = "boxed")]
    pub boxed: Option<Box<Inner>>,
    #[tag(json = "func")]
    pub func: fn() -> i32,
    #[tag(json = "marker")]
    pub marker: PhantomData<u8>,
}

fn forty_two() -> i32 {
    42
}

#[test]
fn dispatch_by_kind() {
    let data = Kinds {
        i8: -8,
        u: 8,
        f: 0.25,
        z: Complex::new(1.0, -1.0),
        b: true,
        list: vec![1, 2],
        arr: ["a", "b"],
        dict: [("k".to_string(), None)].into(),
        any: serde_json::json!({"q": [1]}),
        value: Value::Null,
        boxed: Some(Box::new(inner("deep"))),
        func: forty_two,
        marker: PhantomData,
    };
    let map = struct_to_map(&data, "json", "").unwrap();

    assert_eq!(map["i8"], Value::Int(-8));
    assert_eq!(map["u"], Value::Uint(8));
    assert_eq!(map["f"], Value::Float(0.25));
    assert_eq!(map["z"], Value::Complex(Complex::new(1.0, -1.0)));
    assert_eq!(map["b"], Value::Bool(true));
    assert_eq!(map["list"], Value::List(vec![Value::Int(1), Value::Int(2)]));
    // Containers are not inspected: no wildcard on elements.
    assert_eq!(map["arr"], Value::List(vec![s("a"), s("b")]));
    assert_eq!(map["dict"].as_map().unwrap()["k"], Value::Null);
    assert_eq!(
        map["any"].as_map().unwrap()["q"],
        Value::List(vec![Value::Int(1)])
    );
    assert_eq!(map["value"], Value::Null);
    assert_eq!(map["boxed"].as_map().unwrap()["c"], s("deep"));
    assert!(!map.contains_key("func"));
    assert!(!map.contains_key("marker"));
    assert_eq!((data.func)(), 42);
}

#[test]
fn repeated_calls_are_identical() {
    let data = Dotted {
        aa: "x".into(),
        b: inner("y"),
    };
    let before = data.clone();
    let first = struct_to_map(&data, "json", "").unwrap();
    let second = struct_to_map(&data, "json", "").unwrap();
    assert_eq!(first, second);
    assert_eq!(data, before);
}

#[test]
fn input_by_reference_and_pointer() {
    let data = Dive {
        aa: "x".into(),
        b: inner("y"),
    };
    let direct = struct_to_map(&data, "json", "").unwrap();
    assert_eq!(struct_to_map(&&data, "json", "").unwrap(), direct);
    assert_eq!(struct_to_map(&Some(&data), "json", "").unwrap(), direct);
    assert_eq!(
        struct_to_map(&Box::new(data.clone()), "json", "").unwrap(),
        direct
    );
    assert_eq!(data.to_map("json", "").unwrap(), direct);
}

#[test]
fn nil_input() {
    let data: Option<Box<Dive>> = None;
    let err = struct_to_map(&data, "json", "").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NilInput);
}

#[test]
fn not_a_record() {
    let err = struct_to_map(&42i64, "json", "").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotARecord);
    assert_eq!(err.to_string(), "data is not a struct but int");

    let err = struct_to_map(&vec![1u8], "json", "").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotARecord);
}

#[derive(Record)]
struct EmptyKey {
    #[tag(json = ",omitempty")]
    pub a: String,
    #[tag(json = "b")]
    pub b: String,
}

#[test]
fn empty_key_is_kept_by_default() {
    let data = EmptyKey {
        a: "x".into(),
        b: "y".into(),
    };
    let map = struct_to_map(&data, "json", "").unwrap();
    assert_eq!(map[""], s("x"));
    assert_eq!(map["b"], s("y"));
}

#[test]
fn empty_key_can_be_rejected() {
    let opts = Options::new("json").with_empty_key(EmptyKeyPolicy::Reject);
    let data = EmptyKey {
        a: "x".into(),
        b: "y".into(),
    };
    let err = convert(&data, &opts).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyKey);

    // An omitted field never reaches the key check.
    let data = EmptyKey {
        a: String::new(),
        b: "y".into(),
    };
    let map = data.to_map_with(&opts).unwrap();
    assert_eq!(map.len(), 1);
}

#[test]
fn options_from_json() {
    let opts = Options::from_json(r#"{"tag": "map"}"#).unwrap();
    let map = convert(&Tags::sample(), &opts).unwrap();
    assert_eq!(map["n"], s("abc"));
}

#[derive(Record, Default)]
struct Excluded {
    #[tag(json = "-,dive")]
    pub dive_first: Inner,
    #[tag(json = "x,dive,-")]
    pub dive_last: Inner,
    #[tag(json = "-,dotted")]
    pub dotted_first: Inner,
    #[tag(json = "y,dotted,-")]
    pub dotted_last: Inner,
    #[tag(json = "-,omitempty")]
    pub omit_first: Inner,
    #[tag(json = "z,omitempty,-")]
    pub omit_last: Inner,
    pub untagged: Inner,
    #[tag(json = "kept")]
    pub kept: String,
}

#[test]
fn ignored_records_never_appear() {
    let data = Excluded {
        dive_first: inner("1"),
        dive_last: inner("2"),
        dotted_first: inner("3"),
        dotted_last: inner("4"),
        omit_first: inner("5"),
        omit_last: inner("6"),
        untagged: inner("7"),
        kept: "k".into(),
    };
    let map = struct_to_map(&data, "json", "").unwrap();
    let expected: MappedStruct = [("kept".to_string(), s("k"))].into();
    assert_eq!(map, expected);

    let map = struct_to_map(&Excluded::default(), "json", "").unwrap();
    assert_eq!(map.len(), 1);
}

#[derive(Record, Default)]
struct Sealed {
    #[tag(json = "a")]
    pub a: i32,
    secret: i32,
}

#[derive(Record)]
struct OmitAll {
    #[tag(json = "sealed,omitempty")]
    pub sealed: Sealed,
    #[tag(json = "neg,omitempty")]
    pub neg: f64,
    #[tag(json = "z,omitempty")]
    pub z: Complex,
    #[tag(json = "ptrs,omitempty")]
    pub ptrs: [Option<i32>; 1],
    #[tag(json = "anys,omitempty")]
    pub anys: [Value; 1],
    #[tag(json = "digits,omitempty")]
    pub digits: [u8; 2],
}

#[test]
fn omitempty_keeps_non_zero_records_and_arrays() {
    let data = OmitAll {
        sealed: Sealed { a: 0, secret: 5 },
        neg: -0.0,
        z: Complex::new(0.0, -0.0),
        ptrs: [Some(0)],
        anys: [Value::Int(0)],
        digits: [0, 1],
    };
    let map = struct_to_map(&data, "json", "").unwrap();
    assert_eq!(map.len(), 6);

    // The private field makes the record non-zero but is never mapped.
    let sealed = map["sealed"].as_map().unwrap();
    assert_eq!(sealed.len(), 1);
    assert_eq!(sealed["a"], Value::Int(0));

    assert!(matches!(map["neg"], Value::Float(v) if v.is_sign_negative()));
    assert!(matches!(map["z"], Value::Complex(c) if c.im.is_sign_negative()));
    assert_eq!(map["ptrs"], Value::List(vec![Value::Int(0)]));
    assert_eq!(map["anys"], Value::List(vec![Value::Int(0)]));
    assert_eq!(map["digits"], Value::List(vec![Value::Uint(0), Value::Uint(1)]));
}

#[test]
fn omitempty_skips_zero_records_and_arrays() {
    let data = OmitAll {
        sealed: Sealed::default(),
        neg: 0.0,
        z: Complex::default(),
        ptrs: [None],
        anys: [Value::Null],
        digits: [0, 0],
    };
    assert!(struct_to_map(&data, "json", "").unwrap().is_empty());
}
