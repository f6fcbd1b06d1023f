use alloc::{borrow::ToOwned, string::String};

use crate::{
    buffer::CursorBuffer,
    charset::{Charset, char_count},
    config::{CharRange, TextFieldSpec, Truncation},
    error::{BufError, Result},
};

impl CursorBuffer {
    /// 以 `spec` 描述的定长格式写入文本字段。
    ///
    /// # 契约说明（What）
    /// - 字符数超过 `spec.length` 返回 [`BufError::ValueTooLong`]；
    /// - 编码后不足 `spec.length` 字节时以填充字符补齐，剩余空间不是填充字符编码宽度的整数倍时
    ///   返回 [`BufError::PaddingMismatch`]；
    /// - 编码后超过 `spec.length` 字节返回 [`BufError::EncodingOverflow`]；
    /// - 成功时恰好写入 `spec.length` 字节；任何失败都不会写入字节。
    pub fn write_text_field(&mut self, value: &str, spec: &TextFieldSpec) -> Result<()> {
        let chars = char_count(value);
        if chars > spec.length {
            return Err(BufError::ValueTooLong {
                value: value.to_owned(),
                chars,
                length: spec.length,
            });
        }

        let encoded = spec.charset.encode(value)?;
        if encoded.len() > spec.length {
            return Err(BufError::EncodingOverflow {
                value: value.to_owned(),
                encoded: encoded.len(),
                length: spec.length,
                charset: spec.charset,
            });
        }

        let gap = spec.length - encoded.len();
        let pad = if gap > 0 {
            spec.charset.encode_char(spec.pad)?
        } else {
            alloc::vec::Vec::new()
        };
        if gap > 0 && (pad.is_empty() || gap % pad.len() != 0) {
            return Err(BufError::PaddingMismatch {
                value: value.to_owned(),
                encoded: encoded.len(),
                length: spec.length,
                pad: spec.pad,
                pad_width: pad.len(),
                charset: spec.charset,
            });
        }

        self.ensure_writable(spec.length)?;
        self.write_bytes(&encoded)?;
        if !pad.is_empty() {
            for _ in 0..gap / pad.len() {
                self.write_bytes(&pad)?;
            }
        }
        Ok(())
    }

    /// 读取 `spec.length` 字节并按 `spec.truncation` 去除填充。
    pub fn read_text_field(&mut self, spec: &TextFieldSpec) -> Result<String> {
        let bytes = self.read_slice(spec.length)?;
        let mut text = spec.charset.decode(bytes);
        let kept = match spec.truncation {
            Truncation::AtFirstPad => text.find(spec.pad).unwrap_or(text.len()),
            Truncation::TrailingPad => text.trim_end_matches(spec.pad).len(),
        };
        text.truncate(kept);
        Ok(text)
    }

    /// 按字符集编码并追加文本，不做定长填充，返回写入的字节数。
    pub fn write_text(&mut self, value: &str, charset: Charset) -> Result<usize> {
        let encoded = charset.encode(value)?;
        self.write_bytes(&encoded)?;
        Ok(encoded.len())
    }

    /// 读取 `len` 字节并按字符集解码。
    pub fn read_text(&mut self, len: usize, charset: Charset) -> Result<String> {
        let bytes = self.read_slice(len)?;
        Ok(charset.decode(bytes))
    }

    /// 以默认码点范围（Latin-1）写入单字节字符。
    pub fn write_char(&mut self, ch: char) -> Result<()> {
        self.write_char_in(ch, CharRange::default())
    }

    /// 写入单字节字符，码点超出 `range` 时返回 [`BufError::OutOfAsciiRange`]。
    pub fn write_char_in(&mut self, ch: char, range: CharRange) -> Result<()> {
        let code = u32::from(ch);
        match u8::try_from(code) {
            Ok(byte) if code <= range.max_code() => self.write_byte(byte),
            _ => Err(BufError::OutOfAsciiRange { ch, code }),
        }
    }

    /// 读取一个字节并按 Latin-1 解释为字符。
    pub fn read_char(&mut self) -> Result<char> {
        self.read_byte().map(char::from)
    }
}
