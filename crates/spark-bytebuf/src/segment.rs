//! 按分隔符惰性切分可读区。
//!
//! # 设计背景（Why）
//! - 文本类报文（行协议、`key=value;` 列表）需要逐段处理，但调用方通常不希望预先分配整张段表；
//! - 迭代器借用缓冲的只读视图逐段产出 `&[u8]`，迭代期间缓冲不可修改，由借用检查保证。
//!
//! # 切分规则（What）
//! - 每段为当前位置到下一个分隔符之间的字节，分隔符本身被跳过；
//! - 相邻分隔符产出空段；区间以分隔符结尾时**不会**产出末尾空段；空区间不产出任何段；
//! - 找不到分隔符时，剩余字节整体作为最后一段。

use core::{iter::FusedIterator, ops::RangeBounds};

use crate::{
    buffer::CursorBuffer,
    charset::Charset,
    error::{BufError, Result},
    search::{Direction, SearchPattern},
};

#[derive(Clone, Debug)]
enum Delimiter<'a> {
    Byte(u8),
    Bytes(SearchPattern<'a>),
}

impl Delimiter<'_> {
    fn len(&self) -> usize {
        match self {
            Delimiter::Byte(_) => 1,
            Delimiter::Bytes(pattern) => pattern.len(),
        }
    }

    fn find(&self, haystack: &[u8]) -> Option<usize> {
        match self {
            Delimiter::Byte(byte) => haystack.iter().position(|b| b == byte),
            Delimiter::Bytes(pattern) => pattern.find(haystack, Direction::Forward),
        }
    }
}

/// 按固定分隔符切分的段迭代器，由 [`CursorBuffer::segments`]、
/// [`CursorBuffer::segments_byte`] 与 [`CursorBuffer::segments_text`] 创建。
#[derive(Clone, Debug)]
pub struct Segments<'a> {
    remaining: &'a [u8],
    delimiter: Delimiter<'a>,
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining.is_empty() {
            return None;
        }
        let (segment, rest) = match self.delimiter.find(self.remaining) {
            Some(before) => (
                &self.remaining[..before],
                &self.remaining[before + self.delimiter.len()..],
            ),
            None => (self.remaining, &self.remaining[self.remaining.len()..]),
        };
        self.remaining = rest;
        Some(segment)
    }
}

impl FusedIterator for Segments<'_> {}

/// 由调用方切分函数驱动的通用切片迭代器，由 [`CursorBuffer::slices`] 创建。
///
/// 切分函数接收尚未消费的字节，返回 `Some((段长度, 分隔符长度))` 继续切分，返回 `None` 结束迭代。
/// 一次调用既未产出字节也未跳过分隔符时，迭代器产出 [`BufError::NoProgress`] 并终止，
/// 避免死循环。
pub struct Slices<'a, F> {
    remaining: &'a [u8],
    index: usize,
    splitter: F,
    done: bool,
}

impl<'a, F> Iterator for Slices<'a, F>
where
    F: FnMut(&[u8]) -> Option<(usize, usize)>,
{
    type Item = Result<&'a [u8]>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.remaining.is_empty() {
            return None;
        }
        let Some((before, delimiter)) = (self.splitter)(self.remaining) else {
            self.done = true;
            return None;
        };
        let before = before.min(self.remaining.len());
        let consumed = before.saturating_add(delimiter).min(self.remaining.len());
        if consumed == 0 {
            self.done = true;
            return Some(Err(BufError::NoProgress { index: self.index }));
        }
        let segment = &self.remaining[..before];
        self.remaining = &self.remaining[consumed..];
        self.index += consumed;
        Some(Ok(segment))
    }
}

impl<F> FusedIterator for Slices<'_, F> where F: FnMut(&[u8]) -> Option<(usize, usize)> {}

impl CursorBuffer {
    /// 以字节序列分隔符切分区间；分隔符为空时返回 [`BufError::EmptyDelimiter`]。
    pub fn segments<'a>(
        &'a self,
        delimiter: &'a [u8],
        range: impl RangeBounds<usize>,
    ) -> Result<Segments<'a>> {
        if delimiter.is_empty() {
            return Err(BufError::EmptyDelimiter);
        }
        let region = self.region(range)?;
        Ok(Segments {
            remaining: &self.storage[region],
            delimiter: Delimiter::Bytes(SearchPattern::new(delimiter)),
        })
    }

    /// 以指定字符集编码分隔符后切分区间；编码结果为空时返回 [`BufError::EmptyDelimiter`]。
    pub fn segments_text(
        &self,
        delimiter: &str,
        charset: Charset,
        range: impl RangeBounds<usize>,
    ) -> Result<Segments<'_>> {
        let encoded = charset.encode(delimiter)?;
        if encoded.is_empty() {
            return Err(BufError::EmptyDelimiter);
        }
        let region = self.region(range)?;
        Ok(Segments {
            remaining: &self.storage[region],
            delimiter: Delimiter::Bytes(SearchPattern::new(encoded.into_owned())),
        })
    }

    /// 以单字节分隔符切分区间。
    pub fn segments_byte(&self, delimiter: u8, range: impl RangeBounds<usize>) -> Result<Segments<'_>> {
        let region = self.region(range)?;
        Ok(Segments {
            remaining: &self.storage[region],
            delimiter: Delimiter::Byte(delimiter),
        })
    }

    /// 以自定义切分函数惰性切分区间。
    pub fn slices<F>(&self, range: impl RangeBounds<usize>, splitter: F) -> Result<Slices<'_, F>>
    where
        F: FnMut(&[u8]) -> Option<(usize, usize)>,
    {
        let region = self.region(range)?;
        Ok(Slices {
            remaining: &self.storage[region.clone()],
            index: region.start,
            splitter,
            done: false,
        })
    }
}
