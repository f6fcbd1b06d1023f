//! `field_codec_contract` 集成测试：锁定定宽字段的二进制布局。
//!
//! # 测试目标（Why）
//! - 字段布局是与对端互通的契约，任何字节序或填充规则的回归都会导致报文无法解析；
//! - 每个用例同时断言写出的原始字节与读回的值，避免“写错又读错”互相抵消。

use proptest::prelude::*;
use spark_bytebuf::{
    BufError, CharRange, Charset, CursorBuffer, TextFieldSpec, Truncation, codes,
};

#[test]
fn integer_extremes_round_trip() {
    let mut buf = CursorBuffer::new();
    for value in [u8::MIN, u8::MAX] {
        buf.write_u8(value).expect("写入 u8");
    }
    for value in [i8::MIN, 0, i8::MAX] {
        buf.write_i8(value).expect("写入 i8");
    }
    for value in [u16::MIN, u16::MAX] {
        buf.write_u16(value).expect("写入 u16");
    }
    for value in [i16::MIN, 0, i16::MAX] {
        buf.write_i16(value).expect("写入 i16");
    }
    for value in [u32::MIN, u32::MAX] {
        buf.write_u32(value).expect("写入 u32");
    }
    for value in [i32::MIN, 0, i32::MAX] {
        buf.write_i32(value).expect("写入 i32");
    }
    for value in [u64::MIN, u64::MAX] {
        buf.write_u64(value).expect("写入 u64");
    }
    for value in [i64::MIN, 0, i64::MAX] {
        buf.write_i64(value).expect("写入 i64");
    }

    assert_eq!(&buf.as_readable()[..2], &[0x00, 0xFF]);
    assert_eq!(buf.read_u8().expect("读取"), u8::MIN);
    assert_eq!(buf.read_u8().expect("读取"), u8::MAX);
    assert_eq!(buf.read_i8().expect("读取"), i8::MIN);
    assert_eq!(buf.read_i8().expect("读取"), 0);
    assert_eq!(buf.read_i8().expect("读取"), i8::MAX);
    assert_eq!(buf.read_u16().expect("读取"), u16::MIN);
    assert_eq!(buf.read_u16().expect("读取"), u16::MAX);
    assert_eq!(buf.read_i16().expect("读取"), i16::MIN);
    assert_eq!(buf.read_i16().expect("读取"), 0);
    assert_eq!(buf.read_i16().expect("读取"), i16::MAX);
    assert_eq!(buf.read_u32().expect("读取"), u32::MIN);
    assert_eq!(buf.read_u32().expect("读取"), u32::MAX);
    assert_eq!(buf.read_i32().expect("读取"), i32::MIN);
    assert_eq!(buf.read_i32().expect("读取"), 0);
    assert_eq!(buf.read_i32().expect("读取"), i32::MAX);
    assert_eq!(buf.read_u64().expect("读取"), u64::MIN);
    assert_eq!(buf.read_u64().expect("读取"), u64::MAX);
    assert_eq!(buf.read_i64().expect("读取"), i64::MIN);
    assert_eq!(buf.read_i64().expect("读取"), 0);
    assert_eq!(buf.read_i64().expect("读取"), i64::MAX);
    assert!(buf.is_empty());
}

#[test]
fn little_endian_layout() {
    let mut buf = CursorBuffer::new();
    buf.write_i32(-2).expect("写入 i32");
    buf.write_u64(0x0102_0304_0506_0708).expect("写入 u64");
    assert_eq!(
        buf.as_readable(),
        &[0xFE, 0xFF, 0xFF, 0xFF, 8, 7, 6, 5, 4, 3, 2, 1]
    );
}

#[test]
fn ascii_field_is_zero_padded() {
    let spec = TextFieldSpec::new(5);
    let mut buf = CursorBuffer::new();
    buf.write_text_field("AB", &spec).expect("写入字段");
    assert_eq!(buf.as_readable(), &[0x41, 0x42, 0x00, 0x00, 0x00]);
    assert_eq!(buf.read_text_field(&spec).expect("读取字段"), "AB");
}

#[test]
fn full_width_field_has_no_padding() {
    let spec = TextFieldSpec::new(3).pad(' ');
    let mut buf = CursorBuffer::new();
    buf.write_text_field("XYZ", &spec).expect("写入字段");
    assert_eq!(buf.as_readable(), b"XYZ");
    assert_eq!(buf.read_text_field(&spec).expect("读取字段"), "XYZ");
}

#[test]
fn field_errors_are_ordered_and_side_effect_free() {
    let mut buf = CursorBuffer::new();

    let err = buf
        .write_text_field("ABCDE", &TextFieldSpec::new(3))
        .expect_err("字符数超限");
    assert_eq!(
        err.to_string(),
        "The ABCDE value with 5 length is longer than the 3 limit"
    );

    let err = buf
        .write_text_field("caf\u{e9}", &TextFieldSpec::new(8))
        .expect_err("ASCII 无法表示");
    assert_eq!(err.code(), codes::UNMAPPABLE);

    let spec = TextFieldSpec::new(4).charset(Charset::Utf16Le);
    let err = buf.write_text_field("abc", &spec).expect_err("编码膨胀");
    assert!(matches!(err, BufError::EncodingOverflow { encoded: 6, length: 4, .. }));

    let err = buf
        .write_text_field("a", &TextFieldSpec::new(3).charset(Charset::Utf16Le))
        .expect_err("填充不整除");
    assert!(matches!(err, BufError::PaddingMismatch { pad_width: 2, .. }));

    assert!(buf.is_empty());
    assert_eq!(buf.writer_index(), 0);
}

#[test]
fn utf16_field_pads_with_wide_char() {
    let spec = TextFieldSpec::new(6).charset(Charset::Utf16Be).pad(' ');
    let mut buf = CursorBuffer::new();
    buf.write_text_field("a", &spec).expect("写入字段");
    assert_eq!(buf.as_readable(), &[0, b'a', 0, b' ', 0, b' ']);
    assert_eq!(buf.read_text_field(&spec).expect("读取字段"), "a");
}

#[test]
fn legacy_utf16_field_matches_builtin_layout() {
    let legacy = TextFieldSpec::new(6)
        .charset(Charset::Legacy(encoding_rs::UTF_16BE))
        .pad(' ');
    let mut buf = CursorBuffer::new();
    buf.write_text_field("a", &legacy).expect("写入字段");
    assert_eq!(buf.as_readable(), &[0, b'a', 0, b' ', 0, b' ']);
    assert_eq!(buf.read_text_field(&legacy).expect("读取字段"), "a");

    let label = Charset::for_label("utf-16be").expect("标签可解析");
    assert_eq!(label, Charset::Utf16Be);
}

#[test]
fn trailing_truncation_keeps_inner_pad() {
    let mut buf = CursorBuffer::from(&b"A\0B\0\0"[..]);
    let spec = TextFieldSpec::new(5).truncation(Truncation::TrailingPad);
    assert_eq!(buf.read_text_field(&spec).expect("读取字段"), "A\0B");
}

#[test]
fn short_field_read_fails_without_consuming() {
    let mut buf = CursorBuffer::from("ABC");
    let err = buf
        .read_text_field(&TextFieldSpec::new(4))
        .expect_err("可读字节不足");
    assert!(err.is_contract_violation());
    assert_eq!(buf.reader_index(), 0);
}

#[test]
fn char_fields_are_single_bytes() {
    let mut buf = CursorBuffer::new();
    buf.write_char('A').expect("写入 ASCII");
    buf.write_char('\u{ff}').expect("写入 Latin-1 上界");
    let err = buf.write_char('\u{20ac}').expect_err("超出单字节");
    assert_eq!(
        err.to_string(),
        "The \u{20ac} char with 8364 code is out of ASCII table"
    );
    assert!(buf.write_char_in('\u{80}', CharRange::Ascii).is_err());
    assert_eq!(buf.as_readable(), &[0x41, 0xFF]);
    assert_eq!(buf.read_char().expect("读取"), 'A');
    assert_eq!(buf.read_char().expect("读取"), '\u{ff}');
}

proptest! {
    #[test]
    fn prop_ascii_fields_round_trip(value in "[ -~]{0,12}", extra in 0usize..6) {
        let spec = TextFieldSpec::new(value.len() + extra);
        let mut buf = CursorBuffer::new();
        buf.write_text_field(&value, &spec).expect("写入字段");
        prop_assert_eq!(buf.readable_bytes(), spec.length);
        prop_assert_eq!(buf.read_text_field(&spec).expect("读取字段"), value);
    }

    #[test]
    fn prop_utf8_fields_round_trip(value in "\\PC{0,6}", extra in 0usize..4) {
        let spec = TextFieldSpec::new(value.len() + extra).charset(Charset::Utf8);
        let mut buf = CursorBuffer::new();
        buf.write_text_field(&value, &spec).expect("写入字段");
        prop_assert_eq!(buf.read_text_field(&spec).expect("读取字段"), value);
    }
}
