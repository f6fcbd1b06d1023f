#![cfg_attr(not(feature = "std"), no_std)]

//! `spark-bytebuf` 提供面向二进制报文组装与解析的游标缓冲工具集。
//!
//! # 模块定位（Why）
//! - 报文编解码既要顺序读写定宽字段，又要就地编辑已写内容（检索、插入、删除、替换、修剪、填充）；
//! - 本 crate 把这些能力收敛到单一类型 [`CursorBuffer`] 上，调用方无需在多个缓冲视图之间搬运字节。
//!
//! # 设计概要（How）
//! - `buffer`：存储与读写游标不变式，扩容策略见 [`GrowthPolicy`]；
//! - `search`：单字节线性扫描与 KMP 多字节检索，正反两个方向共用一份实现；
//! - `splice`：插入、删除、替换，以及检索驱动的 `*_first`/`*_last`/`*_all` 变体；
//! - `trim`：按谓词修剪与定长填充；
//! - `codec`：小端整数、定长文本与单字节字符字段；
//! - `segment`：按分隔符或自定义切分函数惰性切段。
//!
//! # 契约约定（What）
//! - 区间参数统一为 `RangeBounds<usize>`，`..` 表示整个可读区 `[reader_index, writer_index)`；
//! - “未找到”以 `Option::None` 表达，错误只表示调用方违约或字段约束无法满足，见 [`BufError`]；
//! - 所有错误都在改写任何字节前检测。

extern crate alloc;

mod buffer;
pub mod charset;
mod codec;
pub mod config;
pub mod error;
pub mod search;
mod segment;
mod splice;
pub mod trim;

pub use buffer::CursorBuffer;
pub use charset::Charset;
pub use config::{
    BufferConfig, CharRange, DEFAULT_INITIAL_CAPACITY, DEFAULT_MAX_CAPACITY, DEFAULT_PAD_CHAR,
    GrowthPolicy, TextFieldSpec, Truncation,
};
pub use error::{BufError, Result, codes};
pub use search::{Direction, SearchPattern, to_sentinel};
pub use segment::{Segments, Slices};
pub use trim::is_blank;
