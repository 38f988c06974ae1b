use crate::error::Error;
use crate::{snbt, Accessor, Compound, Path, Value};

fn biglist() -> Value {
    snbt::from_str(
        "[
            [{a: [{value: 0}, {value: 1, thing: 42}], flag: 1}],
            [{spam: {egg: [{foo: 0}, {foo: 2}], checked: 1b}}, {spam: {egg: [{foo: 7}]}}],
            [{a: [{value: 1}, {value: 2, thing: 42}]}, {a: [], flag: 1}],
            [{a: [{value: 3, thing: 42}], flag: 1}],
            [{spam: {egg: [{foo: 1}], checked: 1b}}],
            [{spam: {egg: [{foo: 2}]}}, {spam: {egg: [{foo: 9}, {foo: 5}], checked: 1b}}]
        ]",
    )
    .unwrap()
}

fn ints(values: &[i32]) -> Vec<Value> {
    values.iter().map(|&v| Value::Int(v)).collect()
}

fn get(root: &Value, path: &str) -> Vec<Value> {
    Path::parse(path).unwrap().get_all(root)
}

#[test]
fn paths_split_into_named_keys() {
    let cases: &[(&str, &[&str])] = &[
        ("", &[]),
        ("hello", &["hello"]),
        ("hello.world", &["hello", "world"]),
        ("with.trailing.dot.", &["with", "trailing", "dot"]),
        ("using.\"quoted.keys\"", &["using", "quoted.keys"]),
        (
            "\"escape \\\"quotes\\\"\".\"in.quoted\".key",
            &["escape \"quotes\"", "in.quoted", "key"],
        ),
        ("...with..redundant..dots", &["with", "redundant", "dots"]),
    ];

    for (input, keys) in cases {
        let path = Path::parse(input).unwrap();
        let expected: Vec<Accessor> = keys
            .iter()
            .map(|key| Accessor::Key((*key).to_owned()))
            .collect();
        assert_eq!(path.accessors(), expected, "for {input:?}");
    }
}

#[test]
fn whitespace_and_quoting_spell_the_same_path() {
    let canonical = Path::parse("a.b.c").unwrap();
    for spelling in ["a b c", "a. b. c", "\"a\"\"b\"\"c\"", " \"a\"  ..  \"b\" .c  ", "a\nb\nc"] {
        assert_eq!(Path::parse(spelling).unwrap(), canonical, "for {spelling:?}");
    }
}

#[test]
fn consecutive_matches_merge() {
    let canonical = Path::parse("[]{a: 1}").unwrap();
    for spelling in ["[{a: 1}]", "[{a: 1}]{}", "[{a: 42}]{a: 1}", "[{}]{a: 42}{}{a: 1}"] {
        assert_eq!(Path::parse(spelling).unwrap(), canonical, "for {spelling:?}");
    }

    assert_eq!(
        Path::parse("{a: {foo: \"bar\"}, value: 0}").unwrap(),
        Path::parse("{a: {foo: \"bar\"}, value: 0}{a: {foo: \"bar\"}}").unwrap(),
    );
    // Merging is recursive, later keys override.
    assert_eq!(
        Path::parse("{a: {b: {c: 1}, foo: 42}}").unwrap(),
        Path::parse("{a: {b: {c: 1}}}{a: {foo: 42}}").unwrap(),
    );
    assert_eq!(
        Path::parse("{a: {b: {c: 1}, foo: 42}}").unwrap(),
        Path::parse("{a: {b: {c: \"thing\"}, foo: 42}}{a: {b: {c: 1}}}").unwrap(),
    );
}

#[test]
fn invalid_paths_are_rejected() {
    // A compound filter cannot follow a concrete index.
    assert!(matches!(
        Path::parse("a[0]{b: 1}"),
        Err(Error::InvalidPath(_)),
    ));
    // But it can follow a wildcard, a key, or another filter.
    assert!(Path::parse("a[]{b: 1}").is_ok());
    assert!(Path::parse("a{b: 1}[0]").is_ok());

    assert!(matches!(Path::parse("true"), Err(Error::InvalidPath(_))));
    assert!(matches!(Path::parse("[1, 2]"), Err(Error::InvalidPath(_))));
    assert!(matches!(Path::parse("[1.5]"), Err(Error::InvalidPath(_))));
    assert!(matches!(Path::parse("[1b]"), Err(Error::InvalidPath(_))));
    assert!(matches!(Path::parse("{a: }"), Err(Error::InvalidPath(_))));
}

#[test]
fn builder_methods_normalize_like_parsing() {
    let built = Path::new()
        .key("foo")
        .all()
        .matching(snbt_compound("{a: 1}"))
        .unwrap();
    assert_eq!(built, Path::parse("foo[{a: 1}]").unwrap());

    let err = Path::new()
        .key("foo")
        .index(0)
        .matching(snbt_compound("{a: 1}"))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidPath(_)));
}

fn snbt_compound(literal: &str) -> Compound {
    match snbt::from_str(literal).unwrap() {
        Value::Compound(compound) => compound,
        other => panic!("expected compound literal, got {other}"),
    }
}

#[test]
fn canonical_strings_survive_reparsing() {
    let paths = [
        "foo",
        "foo.bar",
        "foo.bar[0]",
        "foo.bar[0].\"A [crazy name]!\"",
        "foo.bar[0].\"A [crazy name]!\".baz",
        "foo.bar[]",
        "foo.bar[].baz",
        "foo.bar[{baz: 5b}]",
        "{}",
        "{}.foo",
        "{foo: 4.0f}",
        "foo{bar: \"baz\"}",
        "foo{bar: \"baz\"}.bar",
        "a[-3].c{a: [1b, 2b]}.d[].e{a: {e: 5b}}[8]",
        "a[-3].c{a: [1b, 2b]}.d[].e{a: {e: 5b}}[8].d",
        "a[-3].c{a: [1b, 2b]}.d[].e{a: {e: 5b}}[8][5]",
        "a[-3].c{a: [1b, 2b]}.d[].e{a: {e: 5b}}[].d{a: {m: 4.0f}}",
        "Items[].a[]",
        "[{}]",
        "[][].a[].value",
        "[][{flag: 1}].a[].value",
        "[][].a[{thing: 42}].value",
        "[][].spam{checked: 1b}.egg[]",
    ];
    for path in paths {
        assert_eq!(Path::parse(path).unwrap().to_string(), path, "for {path:?}");
    }
}

#[test]
fn get_walks_keys_indices_and_filters() {
    let root = snbt::from_str(
        "{Level: {listTest: [11L, 12L, 13L], nested: {egg: {name: \"Eggbert\"}}}}",
    )
    .unwrap();

    assert_eq!(
        get(&root, "Level.nested.egg.name"),
        vec![Value::String("Eggbert".into())],
    );
    assert_eq!(get(&root, "Level.listTest[1]"), vec![Value::Long(12)]);
    assert_eq!(
        get(&root, "Level.listTest[]"),
        vec![Value::Long(11), Value::Long(12), Value::Long(13)],
    );
    assert_eq!(get(&root, "Level.listTest[-1]"), vec![Value::Long(13)]);
    assert_eq!(get(&root, "Level.listTest[-3]"), vec![Value::Long(11)]);
    assert_eq!(get(&root, "Level.listTest[3]"), vec![]);
    assert_eq!(get(&root, "Level.listTest[-4]"), vec![]);
    assert_eq!(get(&root, "Level.missing"), vec![]);

    // Root filters select or reject the whole tree.
    assert_eq!(
        get(&root, "{Level: {listTest: [12L]}}.Level.listTest[0]"),
        vec![Value::Long(11)],
    );
    assert_eq!(get(&root, "{random: \"value\"}.Level.listTest[0]"), vec![]);
    assert_eq!(get(&root, "{}.Level.listTest[0]"), vec![Value::Long(11)]);

    // Filters attached to a key apply to that key's value.
    assert_eq!(
        get(&root, "Level{nested: {egg: {name: \"Eggbert\"}}}.listTest[0]"),
        vec![Value::Long(11)],
    );
    assert_eq!(
        get(&root, "Level{nested: {egg: {name: \"nope\"}}}.listTest[0]"),
        vec![],
    );

    // The empty path selects the root itself.
    assert_eq!(Path::new().get_all(&root), vec![root.clone()]);
}

#[test]
fn get_over_biglist() {
    let root = biglist();
    assert_eq!(get(&root, "[][].a[].value"), ints(&[0, 1, 1, 2, 3]));
    assert_eq!(get(&root, "[][{flag: 1}].a[].value"), ints(&[0, 1, 3]));
    assert_eq!(get(&root, "[][].a[{thing: 42}].value"), ints(&[1, 2, 3]));
    assert_eq!(get(&root, "[][{a: []}].flag"), ints(&[1]));
    assert_eq!(get(&root, "[1][].a[].value"), ints(&[]));
    assert_eq!(get(&root, "[1][].spam.egg[].foo"), ints(&[0, 2, 7]));
    assert_eq!(get(&root, "[][].spam{checked: 1b}.egg[].foo"), ints(&[0, 2, 1, 9, 5]));
}

#[test]
fn set_overwrites_every_surviving_slot() {
    // Both elements of the wildcard get the new value.
    let mut root = snbt::from_str("{a: {b: [{v: 1}, {v: 2}]}}").unwrap();
    let path = Path::parse("a.b[].v").unwrap();
    path.set(&mut root, &Value::Int(9)).unwrap();
    assert_eq!(get(&root, "a.b[].v"), ints(&[9, 9]));

    let mut root = biglist();
    Path::parse("[][].a[].value")
        .unwrap()
        .set(&mut root, &snbt::from_str("42").unwrap())
        .unwrap();
    assert_eq!(get(&root, "[][].a[].value"), ints(&[42, 42, 42, 42, 42]));

    let mut root = biglist();
    Path::parse("[][{flag: 1}].a[].value")
        .unwrap()
        .set(&mut root, &snbt::from_str("42").unwrap())
        .unwrap();
    assert_eq!(get(&root, "[][].a[].value"), ints(&[42, 42, 1, 2, 42]));

    // A trailing filter selects on the old slot value.
    let mut root = biglist();
    Path::parse("[][].a[{thing: 42}]")
        .unwrap()
        .set(&mut root, &snbt::from_str("{value: 42}").unwrap())
        .unwrap();
    assert_eq!(get(&root, "[][].a[].value"), ints(&[0, 42, 1, 42, 42]));

    let mut root = biglist();
    Path::parse("[][].a[0]")
        .unwrap()
        .set(&mut root, &snbt::from_str("{value: 42}").unwrap())
        .unwrap();
    assert_eq!(get(&root, "[][].a[].value"), ints(&[42, 1, 42, 2, 42]));

    // Out-of-range concrete indices touch nothing.
    let mut root = biglist();
    Path::parse("[][].a[2]")
        .unwrap()
        .set(&mut root, &snbt::from_str("{value: 42}").unwrap())
        .unwrap();
    assert_eq!(get(&root, "[][].a[].value"), ints(&[0, 1, 1, 2, 3]));

    let mut root = biglist();
    Path::parse("[0][].a[]")
        .unwrap()
        .set(&mut root, &snbt::from_str("{value: 42}").unwrap())
        .unwrap();
    assert_eq!(get(&root, "[][].a[].value"), ints(&[42, 42, 1, 2, 3]));

    // Key slots with a filter replace the filtered value itself.
    let mut root = biglist();
    Path::parse("[][].spam{checked: 1b}")
        .unwrap()
        .set(&mut root, &snbt::from_str("{egg: []}").unwrap())
        .unwrap();
    assert_eq!(get(&root, "[][].spam.egg[].foo"), ints(&[7, 2]));
}

#[test]
fn set_only_touches_existing_keys() {
    let mut root = snbt::from_str("{a: {}}").unwrap();
    Path::parse("a.missing")
        .unwrap()
        .set(&mut root, &Value::Int(1))
        .unwrap();
    assert_eq!(root, snbt::from_str("{a: {}}").unwrap());
}

#[test]
fn set_into_typed_list_casts() {
    let mut root = snbt::from_str("{ints: [1, 2]}").unwrap();
    let path = Path::parse("ints[0]").unwrap();

    path.set(&mut root, &Value::Int(9)).unwrap();
    assert_eq!(get(&root, "ints[]"), ints(&[9, 2]));

    let err = path.set(&mut root, &Value::String("nope".into())).unwrap_err();
    assert!(matches!(err, Error::IncompatibleItemType { .. }));
}

#[test]
fn set_with_no_slot_accessor_is_a_noop() {
    let mut root = snbt::from_str("{a: 1}").unwrap();
    Path::new().set(&mut root, &Value::Int(9)).unwrap();
    Path::parse("{a: 1}")
        .unwrap()
        .set(&mut root, &Value::Int(9))
        .unwrap();
    assert_eq!(root, snbt::from_str("{a: 1}").unwrap());
}

#[test]
fn delete_removes_slots_in_reverse_order() {
    let mut root = snbt::from_str("{a: {b: [{v: 1}, {v: 2}]}}").unwrap();
    Path::parse("a.b[0]").unwrap().delete(&mut root);
    assert_eq!(get(&root, "a.b[].v"), ints(&[2]));

    // Deleting a wildcard clears the list without skipping elements.
    let mut root = snbt::from_str("{a: [1, 2, 3]}").unwrap();
    Path::parse("a[]").unwrap().delete(&mut root);
    assert_eq!(get(&root, "a[]"), ints(&[]));

    let mut root = biglist();
    Path::parse("[][1]").unwrap().delete(&mut root);
    assert_eq!(get(&root, "[][].spam.egg[].foo"), ints(&[0, 2, 1, 2]));

    let mut root = biglist();
    Path::parse("[1]").unwrap().delete(&mut root);
    assert_eq!(get(&root, "[][].spam.egg[].foo"), ints(&[1, 2, 9, 5]));

    let mut root = biglist();
    Path::parse("[][].spam.egg[0].foo").unwrap().delete(&mut root);
    assert_eq!(get(&root, "[][].spam.egg[].foo"), ints(&[2, 5]));

    let mut root = biglist();
    Path::parse("[][].spam{checked: 1b}").unwrap().delete(&mut root);
    assert_eq!(get(&root, "[][].spam.egg[].foo"), ints(&[7, 2]));
}

#[test]
fn array_elements_come_back_wrapped() {
    let root = snbt::from_str("{bytes: [B; 1B, 2B, 3B], longs: [L; 7L]}").unwrap();

    assert_eq!(get(&root, "bytes[1]"), vec![Value::Byte(2)]);
    assert_eq!(get(&root, "bytes[-1]"), vec![Value::Byte(3)]);
    assert_eq!(
        get(&root, "bytes[]"),
        vec![Value::Byte(1), Value::Byte(2), Value::Byte(3)],
    );
    assert_eq!(get(&root, "longs[0]"), vec![Value::Long(7)]);
}

#[test]
fn array_slots_support_set_and_delete() {
    let mut root = snbt::from_str("{bytes: [B; 1B, 2B, 3B]}").unwrap();

    Path::parse("bytes[0]")
        .unwrap()
        .set(&mut root, &Value::Byte(9))
        .unwrap();
    assert_eq!(root, snbt::from_str("{bytes: [B; 9B, 2B, 3B]}").unwrap());

    let err = Path::parse("bytes[0]")
        .unwrap()
        .set(&mut root, &Value::Int(300))
        .unwrap_err();
    assert!(matches!(err, Error::OutOfRange(300)));

    let err = Path::parse("bytes[0]")
        .unwrap()
        .set(&mut root, &Value::String("x".into()))
        .unwrap_err();
    assert!(matches!(err, Error::Cast { .. }));

    Path::parse("bytes[1]").unwrap().delete(&mut root);
    assert_eq!(root, snbt::from_str("{bytes: [B; 9B, 3B]}").unwrap());

    Path::parse("bytes[]").unwrap().delete(&mut root);
    assert_eq!(root, snbt::from_str("{bytes: [B;]}").unwrap());
}

#[test]
fn path_equality_against_strings() {
    let path = Path::parse("a.b[0]").unwrap();
    assert_eq!(path, "a.b[0]");
    assert_eq!(path, " a .b [0]");
    assert_ne!(path, "a.b[1]");
}
