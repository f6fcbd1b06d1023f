//! 精确子串检索。
//!
//! # 设计背景（Why）
//! - 报文编辑（替换占位符、按分隔符切段、判断前后缀）都建立在“在可读区内定位字节序列”之上；
//! - 多字节检索采用 Knuth–Morris–Pratt：预处理一次失配表，扫描区间一次，不回溯已匹配字节，
//!   对长报文与重复前缀的模式都保持线性时间。
//!
//! # 逻辑解析（How）
//! - [`SearchPattern`] 同时持有正向失配表与“反转模式”的失配表；
//! - [`SearchPattern::find`] 只有一份实现，以 [`Direction`] 决定扫描顺序与按正序还是逆序读取模式：
//!   反向检索从区间末尾向前扫描反转模式，命中后直接换算为匹配的**起始**下标；
//! - `CursorBuffer` 上的检索方法负责把 `RangeBounds` 解析为可读区内的绝对区间，
//!   并把相对偏移换算回绝对索引。
//!
//! # 契约说明（What）
//! - 返回 `Ok(None)` 表示未找到，“未找到”从不作为错误；
//! - 区间越界返回 [`BufError::InvalidRange`](crate::BufError::InvalidRange)；
//! - 空模式：正向命中区间起点，反向命中区间终点。

use alloc::{borrow::Cow, vec::Vec};
use core::ops::RangeBounds;

use crate::{buffer::CursorBuffer, charset::Charset, error::Result};

/// 检索扫描方向。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// 预处理后的检索模式，单次调用内构建，不跨调用缓存。
#[derive(Clone, Debug)]
pub struct SearchPattern<'a> {
    bytes: Cow<'a, [u8]>,
    forward: Vec<usize>,
    backward: Vec<usize>,
}

impl<'a> SearchPattern<'a> {
    /// 为 `bytes` 构建正向与反转两张失配表。
    ///
    /// 既接受借用的字节，也接受字符集编码后得到的 `Cow`。
    pub fn new(bytes: impl Into<Cow<'a, [u8]>>) -> Self {
        let bytes = bytes.into();
        let len = bytes.len();
        let forward = failure_table(len, |i| bytes[i]);
        let backward = failure_table(len, |i| bytes[len - 1 - i]);
        Self {
            bytes,
            forward,
            backward,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// 在 `haystack` 中检索模式，返回匹配起点相对 `haystack` 的偏移。
    ///
    /// 模式长于 `haystack` 时不做任何扫描直接返回 `None`。
    pub fn find(&self, haystack: &[u8], direction: Direction) -> Option<usize> {
        let m = self.bytes.len();
        let n = haystack.len();
        if m == 0 {
            return Some(match direction {
                Direction::Forward => 0,
                Direction::Backward => n,
            });
        }
        if n < m {
            return None;
        }

        let table = match direction {
            Direction::Forward => &self.forward,
            Direction::Backward => &self.backward,
        };
        let pattern_at = |k: usize| match direction {
            Direction::Forward => self.bytes[k],
            Direction::Backward => self.bytes[m - 1 - k],
        };

        let mut matched = 0;
        for step in 0..n {
            let pos = match direction {
                Direction::Forward => step,
                Direction::Backward => n - 1 - step,
            };
            let byte = haystack[pos];
            while matched > 0 && byte != pattern_at(matched) {
                matched = table[matched - 1];
            }
            if byte == pattern_at(matched) {
                matched += 1;
            }
            if matched == m {
                return Some(match direction {
                    Direction::Forward => pos + 1 - m,
                    Direction::Backward => pos,
                });
            }
        }
        None
    }
}

/// KMP 失配表：`table[i]` 为 `pattern[..=i]` 最长真前缀兼后缀的长度。
fn failure_table(len: usize, at: impl Fn(usize) -> u8) -> Vec<usize> {
    let mut table = alloc::vec![0; len];
    let mut k = 0;
    for i in 1..len {
        let byte = at(i);
        while k > 0 && byte != at(k) {
            k = table[k - 1];
        }
        if byte == at(k) {
            k += 1;
        }
        table[i] = k;
    }
    table
}

/// 把检索结果转换为以 `-1` 表示未找到的下标，供基于整数下标的外部格式使用。
pub fn to_sentinel(found: Option<usize>) -> isize {
    found
        .and_then(|index| isize::try_from(index).ok())
        .unwrap_or(-1)
}

impl CursorBuffer {
    /// 区间内首个等于 `value` 的字节的绝对索引。
    pub fn index_of_byte(&self, value: u8, range: impl RangeBounds<usize>) -> Result<Option<usize>> {
        let region = self.region(range)?;
        Ok(self.storage[region.clone()]
            .iter()
            .position(|&b| b == value)
            .map(|offset| region.start + offset))
    }

    /// 区间内最后一个等于 `value` 的字节的绝对索引。
    pub fn last_index_of_byte(
        &self,
        value: u8,
        range: impl RangeBounds<usize>,
    ) -> Result<Option<usize>> {
        let region = self.region(range)?;
        Ok(self.storage[region.clone()]
            .iter()
            .rposition(|&b| b == value)
            .map(|offset| region.start + offset))
    }

    /// 区间内首次出现 `pattern` 的起始绝对索引。
    pub fn index_of(
        &self,
        pattern: impl AsRef<[u8]>,
        range: impl RangeBounds<usize>,
    ) -> Result<Option<usize>> {
        self.find(pattern.as_ref(), range, Direction::Forward)
    }

    /// 区间内最后一次出现 `pattern` 的起始绝对索引。
    pub fn last_index_of(
        &self,
        pattern: impl AsRef<[u8]>,
        range: impl RangeBounds<usize>,
    ) -> Result<Option<usize>> {
        self.find(pattern.as_ref(), range, Direction::Backward)
    }

    /// 以指定字符集编码 `value` 后正向检索。
    pub fn index_of_text(
        &self,
        value: &str,
        charset: Charset,
        range: impl RangeBounds<usize>,
    ) -> Result<Option<usize>> {
        let encoded = charset.encode(value)?;
        self.index_of(encoded, range)
    }

    /// 以指定字符集编码 `value` 后反向检索。
    pub fn last_index_of_text(
        &self,
        value: &str,
        charset: Charset,
        range: impl RangeBounds<usize>,
    ) -> Result<Option<usize>> {
        let encoded = charset.encode(value)?;
        self.last_index_of(encoded, range)
    }

    pub fn contains_byte(&self, value: u8, range: impl RangeBounds<usize>) -> Result<bool> {
        Ok(self.index_of_byte(value, range)?.is_some())
    }

    pub fn contains(&self, pattern: impl AsRef<[u8]>, range: impl RangeBounds<usize>) -> Result<bool> {
        Ok(self.index_of(pattern, range)?.is_some())
    }

    pub fn contains_text(
        &self,
        value: &str,
        charset: Charset,
        range: impl RangeBounds<usize>,
    ) -> Result<bool> {
        Ok(self.index_of_text(value, charset, range)?.is_some())
    }

    /// 判断 `at` 处是否逐字节等于 `pattern`。
    ///
    /// `at` 必须位于可读区，否则返回 `OutOfRange`；模式放不下（越过 `writer_index`）时返回
    /// `false` 而不是错误。
    pub fn matches(&self, pattern: impl AsRef<[u8]>, at: usize) -> Result<bool> {
        self.require_readable_index(at)?;
        let pattern = pattern.as_ref();
        let Some(end) = at.checked_add(pattern.len()) else {
            return Ok(false);
        };
        if end > self.writer_index {
            return Ok(false);
        }
        Ok(&self.storage[at..end] == pattern)
    }

    pub fn starts_with_byte(&self, value: u8, range: impl RangeBounds<usize>) -> Result<bool> {
        let region = self.region(range)?;
        Ok(self.storage[region].first() == Some(&value))
    }

    /// 区间是否以 `pattern` 开头。
    ///
    /// 只比较区间内的字节，不要求区间起点可读：空模式对任何合法区间（包括空区间）都返回 `true`。
    pub fn starts_with(&self, pattern: impl AsRef<[u8]>, range: impl RangeBounds<usize>) -> Result<bool> {
        let region = self.region(range)?;
        Ok(self.storage[region].starts_with(pattern.as_ref()))
    }

    pub fn ends_with_byte(&self, value: u8, range: impl RangeBounds<usize>) -> Result<bool> {
        let region = self.region(range)?;
        Ok(self.storage[region].last() == Some(&value))
    }

    /// 区间是否以 `pattern` 结尾；空模式的处理与 [`starts_with`](Self::starts_with) 相同。
    pub fn ends_with(&self, pattern: impl AsRef<[u8]>, range: impl RangeBounds<usize>) -> Result<bool> {
        let region = self.region(range)?;
        Ok(self.storage[region].ends_with(pattern.as_ref()))
    }

    pub fn matches_text(&self, value: &str, charset: Charset, at: usize) -> Result<bool> {
        let encoded = charset.encode(value)?;
        self.matches(encoded, at)
    }

    pub fn starts_with_text(
        &self,
        value: &str,
        charset: Charset,
        range: impl RangeBounds<usize>,
    ) -> Result<bool> {
        let encoded = charset.encode(value)?;
        self.starts_with(encoded, range)
    }

    pub fn ends_with_text(
        &self,
        value: &str,
        charset: Charset,
        range: impl RangeBounds<usize>,
    ) -> Result<bool> {
        let encoded = charset.encode(value)?;
        self.ends_with(encoded, range)
    }

    /// 区间起点到首个 `value` 之间的字节数。
    pub fn bytes_before_byte(&self, value: u8, range: impl RangeBounds<usize>) -> Result<Option<usize>> {
        let region = self.region(range)?;
        let found = self.index_of_byte(value, region.clone())?;
        Ok(found.map(|index| index - region.start))
    }

    /// 区间起点到首个 `pattern` 之间的字节数。
    pub fn bytes_before(
        &self,
        pattern: impl AsRef<[u8]>,
        range: impl RangeBounds<usize>,
    ) -> Result<Option<usize>> {
        let region = self.region(range)?;
        let found = self.index_of(pattern, region.clone())?;
        Ok(found.map(|index| index - region.start))
    }

    /// 区间起点到最后一个 `pattern` 之间的字节数。
    pub fn bytes_before_last(
        &self,
        pattern: impl AsRef<[u8]>,
        range: impl RangeBounds<usize>,
    ) -> Result<Option<usize>> {
        let region = self.region(range)?;
        let found = self.last_index_of(pattern, region.clone())?;
        Ok(found.map(|index| index - region.start))
    }

    /// 区间起点到最后一个 `value` 之间的字节数。
    pub fn bytes_before_last_byte(
        &self,
        value: u8,
        range: impl RangeBounds<usize>,
    ) -> Result<Option<usize>> {
        let region = self.region(range)?;
        let found = self.last_index_of_byte(value, region.clone())?;
        Ok(found.map(|index| index - region.start))
    }

    /// 首个 `value` 之后到区间终点的字节数。
    pub fn bytes_after_byte(&self, value: u8, range: impl RangeBounds<usize>) -> Result<Option<usize>> {
        let region = self.region(range)?;
        let found = self.index_of_byte(value, region.clone())?;
        Ok(found.map(|index| region.end - index - 1))
    }

    /// 最后一个 `value` 之后到区间终点的字节数。
    pub fn bytes_after_last_byte(
        &self,
        value: u8,
        range: impl RangeBounds<usize>,
    ) -> Result<Option<usize>> {
        let region = self.region(range)?;
        let found = self.last_index_of_byte(value, region.clone())?;
        Ok(found.map(|index| region.end - index - 1))
    }

    /// 首个 `pattern` 之后到区间终点的字节数。
    pub fn bytes_after(
        &self,
        pattern: impl AsRef<[u8]>,
        range: impl RangeBounds<usize>,
    ) -> Result<Option<usize>> {
        let pattern = pattern.as_ref();
        let region = self.region(range)?;
        let found = self.index_of(pattern, region.clone())?;
        Ok(found.map(|index| region.end - index - pattern.len()))
    }

    /// 最后一个 `pattern` 之后到区间终点的字节数。
    pub fn bytes_after_last(
        &self,
        pattern: impl AsRef<[u8]>,
        range: impl RangeBounds<usize>,
    ) -> Result<Option<usize>> {
        let pattern = pattern.as_ref();
        let region = self.region(range)?;
        let found = self.last_index_of(pattern, region.clone())?;
        Ok(found.map(|index| region.end - index - pattern.len()))
    }

    pub fn bytes_before_text(
        &self,
        value: &str,
        charset: Charset,
        range: impl RangeBounds<usize>,
    ) -> Result<Option<usize>> {
        let encoded = charset.encode(value)?;
        self.bytes_before(encoded, range)
    }

    pub fn bytes_before_last_text(
        &self,
        value: &str,
        charset: Charset,
        range: impl RangeBounds<usize>,
    ) -> Result<Option<usize>> {
        let encoded = charset.encode(value)?;
        self.bytes_before_last(encoded, range)
    }

    pub fn bytes_after_text(
        &self,
        value: &str,
        charset: Charset,
        range: impl RangeBounds<usize>,
    ) -> Result<Option<usize>> {
        let encoded = charset.encode(value)?;
        self.bytes_after(encoded, range)
    }

    pub fn bytes_after_last_text(
        &self,
        value: &str,
        charset: Charset,
        range: impl RangeBounds<usize>,
    ) -> Result<Option<usize>> {
        let encoded = charset.encode(value)?;
        self.bytes_after_last(encoded, range)
    }

    fn find(
        &self,
        pattern: &[u8],
        range: impl RangeBounds<usize>,
        direction: Direction,
    ) -> Result<Option<usize>> {
        let region = self.region(range)?;
        if region.len() < pattern.len() {
            return Ok(None);
        }
        let haystack = &self.storage[region.clone()];
        Ok(SearchPattern::new(pattern)
            .find(haystack, direction)
            .map(|offset| region.start + offset))
    }
}
