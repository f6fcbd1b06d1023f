//! 定宽字段编解码。
//!
//! # 设计背景（Why）
//! - 二进制报文由定宽字段拼接而成：小端整数、定长填充文本、单字节字符；
//! - 字段编解码只依赖 `CursorBuffer` 的顺序读写原语，读写后分别推进 `reader_index`、`writer_index`。
//!
//! # 布局约定（What）
//! - 整数：8/16/32/64 位，有符号与无符号，均为小端；
//! - 文本：固定字节长度、左对齐，尾部以字符集编码后的填充字符补齐，见 [`TextFieldSpec`](crate::TextFieldSpec)；
//! - 字符：恰好一个字节，码点范围由 [`CharRange`](crate::CharRange) 限定。
//!
//! 写入前完成全部校验，失败时不写入任何字节。

mod int;
mod text;
