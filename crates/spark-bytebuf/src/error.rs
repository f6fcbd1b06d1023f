//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 为游标缓冲、检索、拼接与字段编解码提供集中定义的错误语义；
//! - 所有错误均为“本地校验失败”，在任何字节被改写之前即被检测，调用方可放心重试或降级。
//!
//! ## 设计要求（What）
//! - 使用 `thiserror::Error` 派生，兼容 `std::error::Error` 生态；
//! - 每个变体携带结构化上下文（索引、长度、字符集），`code()` 返回稳定的点分错误码，
//!   便于日志与指标聚合；
//! - “未找到”不是错误：检索接口以 `Option::None` 表达缺失。

use alloc::string::String;
use core::ops::Range;

use thiserror::Error;

use crate::charset::Charset;

/// 稳定错误码集合，命名遵循 `bytebuf.<类别>` 约定。
pub mod codes {
    /// 区间越界或 `from > to`。
    pub const INVALID_RANGE: &str = "bytebuf.invalid_range";
    /// 单个索引不在可读区间内。
    pub const OUT_OF_RANGE: &str = "bytebuf.out_of_range";
    /// 顺序读取的字节数超过可读字节。
    pub const NOT_ENOUGH_READABLE: &str = "bytebuf.not_enough_readable";
    /// 扩容超过 `max_capacity`。
    pub const CAPACITY_EXCEEDED: &str = "bytebuf.capacity_exceeded";
    /// 文本字段字符数超过字段长度。
    pub const VALUE_TOO_LONG: &str = "bytebuf.field.value_too_long";
    /// 编码后的字节数超过字段长度。
    pub const ENCODING_OVERFLOW: &str = "bytebuf.field.encoding_overflow";
    /// 剩余空间无法被填充字符整除。
    pub const PADDING_MISMATCH: &str = "bytebuf.field.padding_mismatch";
    /// 单字节字符超出允许的码点范围。
    pub const OUT_OF_ASCII_RANGE: &str = "bytebuf.field.out_of_ascii_range";
    /// 字符无法在目标字符集中表示。
    pub const UNMAPPABLE: &str = "bytebuf.charset.unmappable";
    /// 分段迭代使用了空分隔符。
    pub const EMPTY_DELIMITER: &str = "bytebuf.segment.empty_delimiter";
    /// 分段函数未消费任何字节。
    pub const NO_PROGRESS: &str = "bytebuf.segment.no_progress";
}

/// 缓冲工具集的统一错误类型。
///
/// # 教案式说明
/// - **意图 (Why)**：把“调用方违约”（越界、容量不足）与“字段无法满足定长约束”两类失败
///   区分开，使上层可以按类别决定是修正参数还是拒绝整条报文；
/// - **契约 (What)**：
///   - 所有变体在返回时，缓冲内容与游标均保持调用前状态；
///   - `Display` 文案包含足以排障的上下文，文本字段类错误沿用既有报文格式的措辞；
/// - **权衡 (Trade-offs)**：文本类变体以 `String` 保存原值，牺牲一次分配换取可读诊断。
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BufError {
    /// 区间参数非法：`from > to`，或超出当前可读区间。
    #[error("range {from}..{to} is outside of readable bytes {}..{}", .readable.start, .readable.end)]
    InvalidRange {
        from: usize,
        to: usize,
        readable: Range<usize>,
    },

    /// 单个索引不在 `[reader_index, writer_index)` 内。
    #[error("index {index} is outside of readable bytes {}..{}", .readable.start, .readable.end)]
    OutOfRange { index: usize, readable: Range<usize> },

    /// 顺序读取超出可读字节。
    #[error("cannot read {requested} bytes, only {readable} readable")]
    NotEnoughReadable { requested: usize, readable: usize },

    /// 扩容需求超过 `max_capacity`。
    #[error("not enough free space to write {requested} bytes: {available} writable up to max capacity {max_capacity}")]
    CapacityExceeded {
        requested: usize,
        available: usize,
        max_capacity: usize,
    },

    /// 文本字符数超过字段长度。
    #[error("The {value} value with {chars} length is longer than the {length} limit")]
    ValueTooLong {
        value: String,
        chars: usize,
        length: usize,
    },

    /// 编码结果超过字段字节长度（多字节字符集膨胀）。
    #[error("The '{value}' ({encoded} bytes in {charset}) string can't be encoded to {length} bytes")]
    EncodingOverflow {
        value: String,
        encoded: usize,
        length: usize,
        charset: Charset,
    },

    /// 剩余空间不是填充字符编码宽度的整数倍。
    #[error("The '{value}' ({encoded} bytes in {charset}) string can't be encoded to {length} bytes using the '{pad}' ({pad_width} bytes in {charset}) end char")]
    PaddingMismatch {
        value: String,
        encoded: usize,
        length: usize,
        pad: char,
        pad_width: usize,
        charset: Charset,
    },

    /// 单字节字符码点超出允许范围。
    #[error("The {ch} char with {code} code is out of ASCII table")]
    OutOfAsciiRange { ch: char, code: u32 },

    /// 字符无法在目标字符集中表示。
    #[error("The {ch:?} char can't be represented in {charset}")]
    Unmappable { ch: char, charset: Charset },

    /// 分隔符为空，分段无法推进。
    #[error("segment delimiter must not be empty")]
    EmptyDelimiter,

    /// 分段函数没有消费任何字节。
    #[error("slice function did not read anything at index {index}")]
    NoProgress { index: usize },
}

impl BufError {
    /// 返回稳定错误码，供日志与指标聚合。
    pub fn code(&self) -> &'static str {
        match self {
            BufError::InvalidRange { .. } => codes::INVALID_RANGE,
            BufError::OutOfRange { .. } => codes::OUT_OF_RANGE,
            BufError::NotEnoughReadable { .. } => codes::NOT_ENOUGH_READABLE,
            BufError::CapacityExceeded { .. } => codes::CAPACITY_EXCEEDED,
            BufError::ValueTooLong { .. } => codes::VALUE_TOO_LONG,
            BufError::EncodingOverflow { .. } => codes::ENCODING_OVERFLOW,
            BufError::PaddingMismatch { .. } => codes::PADDING_MISMATCH,
            BufError::OutOfAsciiRange { .. } => codes::OUT_OF_ASCII_RANGE,
            BufError::Unmappable { .. } => codes::UNMAPPABLE,
            BufError::EmptyDelimiter => codes::EMPTY_DELIMITER,
            BufError::NoProgress { .. } => codes::NO_PROGRESS,
        }
    }

    /// 是否属于调用方参数违约（区间、索引、读取长度）。
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            BufError::InvalidRange { .. }
                | BufError::OutOfRange { .. }
                | BufError::NotEnoughReadable { .. }
        )
    }
}

/// crate 级 `Result` 别名，默认错误类型为 [`BufError`]。
pub type Result<T, E = BufError> = core::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn text_field_messages_keep_wire_wording() {
        let err = BufError::ValueTooLong {
            value: "ABCDE".into(),
            chars: 5,
            length: 3,
        };
        assert_eq!(
            err.to_string(),
            "The ABCDE value with 5 length is longer than the 3 limit"
        );

        let err = BufError::PaddingMismatch {
            value: "\u{100}".into(),
            encoded: 2,
            length: 3,
            pad: '\u{101}',
            pad_width: 2,
            charset: Charset::Utf8,
        };
        assert_eq!(
            err.to_string(),
            "The '\u{100}' (2 bytes in UTF-8) string can't be encoded to 3 bytes using the '\u{101}' (2 bytes in UTF-8) end char"
        );
    }

    #[test]
    fn codes_are_stable() {
        let err = BufError::OutOfRange {
            index: 9,
            readable: 0..4,
        };
        assert_eq!(err.code(), codes::OUT_OF_RANGE);
        assert!(err.is_contract_violation());
        assert!(!BufError::EmptyDelimiter.is_contract_violation());
    }
}
