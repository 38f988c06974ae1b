use crate::error::Error;
use crate::snbt::{self, Serializer};
use crate::{Kind, NbtString, Value};

fn parse(input: &str) -> Value {
    snbt::from_str(input).unwrap()
}

fn parse_err(input: &str) -> Error {
    snbt::from_str(input).unwrap_err()
}

#[test]
fn numbers_dispatch_on_suffix() {
    assert_eq!(parse("0"), Value::Int(0));
    assert_eq!(parse("-35"), Value::Int(-35));
    assert_eq!(parse("+5"), Value::Int(5));
    assert_eq!(parse("123b"), Value::Byte(123));
    assert_eq!(parse("-128b"), Value::Byte(-128));
    assert_eq!(parse("32767s"), Value::Short(32767));
    assert_eq!(parse("100L"), Value::Long(100));
    assert_eq!(parse("100l"), Value::Long(100));
    assert_eq!(parse("0.5f"), Value::Float(0.5));
    assert_eq!(parse("3d"), Value::Double(3.0));
    assert_eq!(parse("1.5"), Value::Double(1.5));
    assert_eq!(parse(".5"), Value::Double(0.5));
    assert_eq!(parse("5."), Value::Double(5.0));
    assert_eq!(parse("1.5e3"), Value::Double(1500.0));
}

#[test]
fn overflowing_numbers_fall_back_to_strings() {
    assert_eq!(parse("2147483647"), Value::Int(2147483647));
    assert_eq!(
        parse("2147483648"),
        Value::String(NbtString::Text("2147483648".into())),
    );
    assert_eq!(
        parse("128b"),
        Value::String(NbtString::Text("128b".into())),
    );
    assert_eq!(
        parse("32768s"),
        Value::String(NbtString::Text("32768s".into())),
    );
    // An exponent without a decimal point is tried as an Int and falls
    // back too.
    assert_eq!(parse("1e5"), Value::String(NbtString::Text("1e5".into())));
}

#[test]
fn words_that_are_not_numbers_are_strings() {
    assert_eq!(parse("hello"), Value::String(NbtString::Text("hello".into())));
    assert_eq!(parse("0x10"), Value::String(NbtString::Text("0x10".into())));
    assert_eq!(parse("007"), Value::String(NbtString::Text("007".into())));
    assert_eq!(
        parse("1.2.3"),
        Value::String(NbtString::Text("1.2.3".into())),
    );
    assert_eq!(
        parse("123abc"),
        Value::String(NbtString::Text("123abc".into())),
    );
}

#[test]
fn boolean_aliases_are_bytes() {
    assert_eq!(parse("true"), Value::Byte(1));
    assert_eq!(parse("false"), Value::Byte(0));
    assert_eq!(parse("TRUE"), Value::Byte(1));
    assert_eq!(parse("False"), Value::Byte(0));
}

#[test]
fn quoted_strings_and_escapes() {
    assert_eq!(parse("\"\""), Value::String(NbtString::Text("".into())));
    assert_eq!(
        parse("\"hello world\""),
        Value::String(NbtString::Text("hello world".into())),
    );
    assert_eq!(
        parse("'single'"),
        Value::String(NbtString::Text("single".into())),
    );
    assert_eq!(
        parse(r#""say \"hi\"""#),
        Value::String(NbtString::Text("say \"hi\"".into())),
    );
    assert_eq!(
        parse(r#""back\\slash""#),
        Value::String(NbtString::Text("back\\slash".into())),
    );
    // The other quote needs no escape inside.
    assert_eq!(
        parse(r#""it's""#),
        Value::String(NbtString::Text("it's".into())),
    );
}

#[test]
fn illegal_escapes_are_hard_errors() {
    let err = parse_err(r#""bad \n escape""#);
    assert!(matches!(err, Error::InvalidLiteral { .. }));
    assert!(err.to_string().contains("Invalid escape sequence"));

    // Escaping the other quote character is illegal too.
    let err = parse_err(r#""wrong \' quote""#);
    assert!(err.to_string().contains("Invalid escape sequence"));
    let err = parse_err(r#"'wrong \" quote'"#);
    assert!(err.to_string().contains("Invalid escape sequence"));
}

#[test]
fn compounds_and_keys() {
    let value = parse("{}");
    assert_eq!(value, Value::Compound(crate::Compound::new()));

    let value = parse("{a: 1, \"quoted key\": 2b, a.b: 3}");
    let compound = value.as_compound().unwrap();
    assert_eq!(compound.get("a"), Some(&Value::Int(1)));
    assert_eq!(compound.get("quoted key"), Some(&Value::Byte(2)));
    assert_eq!(compound.get("a.b"), Some(&Value::Int(3)));

    // A numeric key keeps its literal text, suffix included.
    let value = parse("{1b: one}");
    assert_eq!(
        value.as_compound().unwrap().get("1b"),
        Some(&Value::String(NbtString::Text("one".into()))),
    );
}

#[test]
fn compound_errors_carry_positions() {
    match parse_err("{a: 1 b: 2}") {
        Error::InvalidLiteral { span, message } => {
            assert!(message.contains("Expected comma"));
            assert!(span.0 > 0);
        }
        other => panic!("expected InvalidLiteral, got {:?}", other),
    }

    assert!(parse_err("{a 1}").to_string().contains("Expected colon"));
    assert!(parse_err("{[]: 1}").to_string().contains("Expected compound key"));
    assert!(parse_err("{a: 1").to_string().contains("Unexpected end of input"));
}

#[test]
fn lists_infer_and_enforce_their_subtype() {
    let value = parse("[1, 2, 3]");
    let list = value.as_list().unwrap();
    assert_eq!(list.subtype(), &Kind::Int);
    assert_eq!(list.len(), 3);

    let value = parse("[]");
    assert_eq!(value.as_list().unwrap().subtype(), &Kind::End);

    // Nested lists of differing element types generalize.
    let value = parse("[[1], [a]]");
    assert_eq!(
        value.as_list().unwrap().subtype(),
        &Kind::List(Box::new(Kind::End)),
    );

    let err = parse_err("[1, \"a\"]");
    assert!(err.to_string().contains("is not a Int tag"));
}

#[test]
fn arrays_validate_element_suffixes() {
    assert_eq!(parse("[B; 1b, 2B, -3b]"), Value::ByteArray(vec![1, 2, -3]));
    assert_eq!(parse("[I; 1, -2]"), Value::IntArray(vec![1, -2]));
    assert_eq!(parse("[L; 1l, 2L]"), Value::LongArray(vec![1, 2]));
    assert_eq!(parse("[B;]"), Value::ByteArray(vec![]));

    assert!(parse_err("[B; 1]").to_string().contains("Invalid byte array element"));
    assert!(parse_err("[I; 1b]").to_string().contains("Invalid int array element"));
    assert!(parse_err("[L; 1]").to_string().contains("Invalid long array element"));
    assert!(parse_err("[B; 300b]").to_string().contains("Invalid byte array element"));
    assert!(parse_err("[I; x]").to_string().contains("Invalid int array element"));
}

#[test]
fn trailing_input_is_rejected() {
    let err = parse_err("{} x");
    assert!(err.to_string().contains("Expected end of string"));

    // Trailing whitespace is fine.
    assert_eq!(parse("  {}  "), Value::Compound(crate::Compound::new()));
}

#[test]
fn empty_input_is_an_error() {
    assert!(matches!(parse_err(""), Error::InvalidLiteral { .. }));
    assert!(matches!(parse_err("   "), Error::InvalidLiteral { .. }));
}

#[test]
fn invalid_tokens_are_reported() {
    let err = parse_err("{a: @}");
    assert!(err.to_string().contains("Invalid token"));
}

#[test]
fn serializer_renders_suffixes_and_spacing() {
    assert_eq!(snbt::to_string(&Value::Byte(5)), "5b");
    assert_eq!(snbt::to_string(&Value::Short(-2)), "-2s");
    assert_eq!(snbt::to_string(&Value::Int(7)), "7");
    assert_eq!(snbt::to_string(&Value::Long(7)), "7L");
    assert_eq!(snbt::to_string(&Value::Float(0.5)), "0.5f");
    assert_eq!(snbt::to_string(&Value::Double(0.25)), "0.25d");
    assert_eq!(snbt::to_string(&Value::Double(3.0)), "3.0d");

    assert_eq!(
        snbt::to_string(&parse("{a: 1, b: [1, 2]}")),
        "{a: 1, b: [1, 2]}",
    );
    assert_eq!(
        snbt::to_string_compact(&parse("{a: 1, b: [1, 2]}")),
        "{a:1,b:[1,2]}",
    );
}

#[test]
fn serializer_renders_arrays_uppercased() {
    assert_eq!(
        snbt::to_string(&Value::ByteArray(vec![1, -2])),
        "[B; 1B, -2B]",
    );
    assert_eq!(snbt::to_string(&Value::IntArray(vec![1, 2])), "[I; 1, 2]");
    assert_eq!(
        snbt::to_string(&Value::LongArray(vec![1, -2])),
        "[L; 1L, -2L]",
    );
    assert_eq!(
        snbt::to_string_compact(&Value::ByteArray(vec![1, 2])),
        "[B;1B,2B]",
    );
}

#[test]
fn serializer_quotes_keys_only_when_needed() {
    assert_eq!(
        snbt::to_string(&parse("{plain_key.0+-: 1}")),
        "{plain_key.0+-: 1}",
    );
    assert_eq!(
        snbt::to_string(&parse("{\"with space\": 1}")),
        "{\"with space\": 1}",
    );
    assert_eq!(snbt::to_string(&parse("{\"\": 1}")), "{\"\": 1}");
}

#[test]
fn serializer_picks_the_quote_that_avoids_escaping() {
    assert_eq!(snbt::to_string(&parse("plain")), "\"plain\"");
    assert_eq!(
        snbt::to_string(&Value::String("it's".into())),
        "\"it's\"",
    );
    assert_eq!(
        snbt::to_string(&Value::String("say \"hi\"".into())),
        "'say \"hi\"'",
    );
    assert_eq!(
        Serializer::new().quote('\'').serialize(&Value::String("x".into())),
        "'x'",
    );
}

#[test]
fn escaping_round_trips_exactly() {
    let original = "both \" and ' quotes \\ and \\\\ backslashes";
    let value = Value::String(original.into());
    let text = snbt::to_string(&value);
    assert_eq!(snbt::from_str(&text).unwrap(), value);

    // And re-serialization is textually stable.
    assert_eq!(snbt::to_string(&snbt::from_str(&text).unwrap()), text);
}

#[test]
fn literal_round_trips_are_textually_stable() {
    let literals = [
        "{name: \"Eggbert\", value: 0.75f}",
        "{a: [1, 2, 3], b: {c: [B; 1B], d: []}}",
        "[{v: 1}, {v: 2, extra: \"x\"}]",
        "{listTest: [11L, 12L, 13L], 1b: \"keyed\"}",
        "[[1, 2], [3]]",
        "{nested: {more: {evenMore: 1b}}}",
    ];
    for literal in literals {
        let value = snbt::from_str(literal).unwrap();
        assert_eq!(snbt::to_string(&value), literal, "for {literal}");
        assert_eq!(snbt::from_str(&snbt::to_string(&value)).unwrap(), value);
    }
}

#[test]
fn indented_output_expands_containers_only() {
    let value = parse("{scalars: [1, 2], nested: {a: 1}, list: [{b: 2}]}");
    // The spaced separator keeps its trailing space before the newline.
    let expected = "{\n    scalars: [1, 2], \n    nested: {\n        a: 1\n    }, \
\n    list: [\n        {\n            b: 2\n        }\n    ]\n}";
    assert_eq!(Serializer::indented("    ").serialize(&value), expected);
}

#[test]
fn indented_empty_containers_stay_inline() {
    let value = parse("{a: {}, b: []}");
    let expected = "{\n    a: {}, \n    b: []\n}";
    assert_eq!(Serializer::indented("    ").serialize(&value), expected);
}

#[test]
fn whitespace_is_insignificant_between_tokens() {
    let value = parse("{\n  a : [ 1 , 2 ] ,\n  b : \"x\"\n}");
    assert_eq!(snbt::to_string(&value), "{a: [1, 2], b: \"x\"}");
}
