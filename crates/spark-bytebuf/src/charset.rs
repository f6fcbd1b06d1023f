//! 字符集编解码。
//!
//! # 设计背景（Why）
//! - 报文中的文本字段可能采用 ASCII、Latin-1、UTF-8、UTF-16，或遗留的地区性编码
//!   （Windows-1252、Shift_JIS、GBK 等），缓冲工具需要一个可显式传递的字符集描述；
//! - 常见的五种字符集直接内建实现，遗留编码委托给 `encoding_rs`，
//!   避免自行维护码表。
//!
//! # 契约说明（What）
//! - **编码**：遇到目标字符集无法表示的字符时返回 [`BufError::Unmappable`]，不做静默替换，
//!   保证定长字段的字节宽度可预测；
//! - **解码**：宽松解码，非法字节序列替换为 `U+FFFD`，保持读取路径不因脏数据中断。

use alloc::{
    borrow::Cow,
    string::String,
    vec::Vec,
};
use core::fmt;

use encoding_rs::Encoding;

use crate::error::{BufError, Result};

/// 文本字段与文本检索所使用的字符集。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Charset {
    /// 7 位 ASCII；解码时高位字节映射为 `U+FFFD`。
    #[default]
    UsAscii,
    /// ISO-8859-1，每个字节即一个 `U+0000..=U+00FF` 码点。
    Iso8859_1,
    /// UTF-8。
    Utf8,
    /// UTF-16 小端，无 BOM。
    Utf16Le,
    /// UTF-16 大端，无 BOM。
    Utf16Be,
    /// 由 `encoding_rs` 提供的遗留编码。
    Legacy(&'static Encoding),
}

impl Charset {
    /// 按 WHATWG/IANA 标签解析字符集。
    ///
    /// 内建字符集优先匹配；`encoding_rs` 会把 `latin1`、`us-ascii` 归并为 Windows-1252，
    /// 这里保留它们的严格语义。
    pub fn for_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_ascii_lowercase();
        let builtin = match normalized.as_str() {
            "us-ascii" | "ascii" | "us_ascii" => Some(Charset::UsAscii),
            "iso-8859-1" | "iso8859-1" | "iso_8859_1" | "latin1" | "l1" => {
                Some(Charset::Iso8859_1)
            }
            "utf-8" | "utf8" => Some(Charset::Utf8),
            "utf-16le" | "utf-16" => Some(Charset::Utf16Le),
            "utf-16be" => Some(Charset::Utf16Be),
            _ => None,
        };
        builtin.or_else(|| Encoding::for_label(normalized.as_bytes()).map(Self::from_encoding))
    }

    /// 将 `encoding_rs` 的编码对象映射为字符集，UTF 家族折叠为内建变体。
    pub fn from_encoding(encoding: &'static Encoding) -> Self {
        if encoding == encoding_rs::UTF_8 {
            Charset::Utf8
        } else if encoding == encoding_rs::UTF_16LE {
            Charset::Utf16Le
        } else if encoding == encoding_rs::UTF_16BE {
            Charset::Utf16Be
        } else {
            Charset::Legacy(encoding)
        }
    }

    /// 字符集的规范名称。
    pub fn name(&self) -> &'static str {
        match self {
            Charset::UsAscii => "US-ASCII",
            Charset::Iso8859_1 => "ISO-8859-1",
            Charset::Utf8 => "UTF-8",
            Charset::Utf16Le => "UTF-16LE",
            Charset::Utf16Be => "UTF-16BE",
            Charset::Legacy(encoding) => encoding.name(),
        }
    }

    /// 将文本编码为字节；UTF-8 直接借用输入，不产生拷贝。
    ///
    /// `Legacy` 包装的 UTF 家族编码按对应的内建变体处理；只能解码、没有自身输出形式的编码
    /// （如 WHATWG `replacement`）对任何非空文本返回 [`BufError::Unmappable`]。
    pub fn encode<'a>(&self, value: &'a str) -> Result<Cow<'a, [u8]>> {
        match self {
            Charset::Utf8 => Ok(Cow::Borrowed(value.as_bytes())),
            Charset::UsAscii => self.encode_single_byte(value, 0x7F),
            Charset::Iso8859_1 => self.encode_single_byte(value, 0xFF),
            Charset::Utf16Le => Ok(Cow::Owned(
                value.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            )),
            Charset::Utf16Be => Ok(Cow::Owned(
                value.encode_utf16().flat_map(u16::to_be_bytes).collect(),
            )),
            Charset::Legacy(encoding) => {
                let canonical = Self::from_encoding(*encoding);
                if canonical != *self {
                    return canonical.encode(value);
                }
                // `encode` 对 replacement 这类只解码的编码会改用 UTF-8 输出，不能当作本编码的字节。
                if encoding.output_encoding() != *encoding {
                    return match value.chars().next() {
                        None => Ok(Cow::Borrowed(&[])),
                        Some(ch) => Err(BufError::Unmappable { ch, charset: *self }),
                    };
                }
                let (bytes, _, had_errors) = encoding.encode(value);
                if !had_errors {
                    return Ok(bytes);
                }
                // encoding_rs 以 HTML 数字实体替换不可映射字符，这里定位首个违规字符。
                let mut scratch = [0u8; 4];
                let offending = value
                    .chars()
                    .find(|ch| encoding.encode(ch.encode_utf8(&mut scratch)).2)
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                Err(BufError::Unmappable {
                    ch: offending,
                    charset: *self,
                })
            }
        }
    }

    /// 编码单个字符，常用于计算填充字符宽度。
    pub fn encode_char(&self, ch: char) -> Result<Vec<u8>> {
        let mut scratch = [0u8; 4];
        self.encode(ch.encode_utf8(&mut scratch)).map(Cow::into_owned)
    }

    /// 将字节解码为文本，非法序列替换为 `U+FFFD`。
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Charset::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Charset::UsAscii => bytes
                .iter()
                .map(|&b| {
                    if b.is_ascii() {
                        char::from(b)
                    } else {
                        char::REPLACEMENT_CHARACTER
                    }
                })
                .collect(),
            Charset::Iso8859_1 => bytes.iter().map(|&b| char::from(b)).collect(),
            Charset::Utf16Le => decode_utf16(bytes, u16::from_le_bytes),
            Charset::Utf16Be => decode_utf16(bytes, u16::from_be_bytes),
            Charset::Legacy(encoding) => match Self::from_encoding(*encoding) {
                Charset::Legacy(_) => encoding.decode_without_bom_handling(bytes).0.into_owned(),
                canonical => canonical.decode(bytes),
            },
        }
    }

    fn encode_single_byte<'a>(&self, value: &'a str, max: u32) -> Result<Cow<'a, [u8]>> {
        if value.is_ascii() {
            return Ok(Cow::Borrowed(value.as_bytes()));
        }
        value
            .chars()
            .map(|ch| match u8::try_from(ch as u32) {
                Ok(byte) if u32::from(byte) <= max => Ok(byte),
                _ => Err(BufError::Unmappable { ch, charset: *self }),
            })
            .collect::<Result<Vec<u8>>>()
            .map(Cow::Owned)
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let chunks = bytes.chunks_exact(2);
    let dangling = !chunks.remainder().is_empty();
    let mut text: String = char::decode_utf16(chunks.map(|pair| unit([pair[0], pair[1]])))
        .map(|ch| ch.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect();
    if dangling {
        text.push(char::REPLACEMENT_CHARACTER);
    }
    text
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&'static Encoding> for Charset {
    fn from(encoding: &'static Encoding) -> Self {
        Self::from_encoding(encoding)
    }
}

/// 文本按字符（Unicode 标量值）计数，与字段长度约束使用同一口径。
pub(crate) fn char_count(value: &str) -> usize {
    value.chars().count()
}
