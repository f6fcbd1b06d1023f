//! 就地插入、删除与替换。
//!
//! # 设计背景（Why）
//! - 报文组装常需“回头改写”：补写长度前缀、删除占位符、把模板变量替换为实际值；
//! - 所有改写都在同一块存储内完成：尾部字节通过一次 `copy_within` 整体搬移，
//!   `copy_within` 本身具备 `memmove` 语义，源与目标重叠时结果依然正确。
//!
//! # 契约说明（What）
//! - 区间非法返回 `InvalidRange`，插入点非法返回 `OutOfRange`，扩容不足返回 `CapacityExceeded`；
//!   以上检查全部发生在搬移任何字节之前；
//! - 检索驱动的变体（`remove_first`、`replace_all` 等）返回 `true` 表示至少发生了一次改写；
//!   空模式视为“无可匹配”，直接返回 `false`。

use alloc::vec::Vec;
use core::{
    cmp::Ordering,
    ops::{Range, RangeBounds},
};

use crate::{
    buffer::CursorBuffer,
    charset::Charset,
    error::Result,
    search::{Direction, SearchPattern},
};

impl CursorBuffer {
    /// 在绝对索引 `at` 处插入 `value`。
    ///
    /// `at == writer_index` 时等价于追加；否则 `at` 必须位于可读区，
    /// `[at, writer_index)` 整体右移 `value.len()` 字节后再填入新内容。
    pub fn insert(&mut self, at: usize, value: impl AsRef<[u8]>) -> Result<()> {
        let value = value.as_ref();
        if at == self.writer_index {
            return self.write_bytes(value);
        }
        self.require_readable_index(at)?;
        if value.is_empty() {
            return Ok(());
        }
        self.ensure_writable(value.len())?;
        let end = self.writer_index;
        self.storage.copy_within(at..end, at + value.len());
        self.storage[at..at + value.len()].copy_from_slice(value);
        self.writer_index += value.len();
        Ok(())
    }

    pub fn insert_byte(&mut self, at: usize, value: u8) -> Result<()> {
        self.insert(at, [value])
    }

    /// 以指定字符集编码后插入文本。
    pub fn insert_text(&mut self, at: usize, value: &str, charset: Charset) -> Result<()> {
        let encoded = charset.encode(value)?;
        self.insert(at, encoded)
    }

    /// 删除区间内的字节，之后的内容整体左移。
    pub fn remove(&mut self, range: impl RangeBounds<usize>) -> Result<()> {
        let region = self.region(range)?;
        if region.is_empty() {
            return Ok(());
        }
        if region.end != self.writer_index {
            let end = self.writer_index;
            self.storage.copy_within(region.end..end, region.start);
        }
        self.writer_index -= region.len();
        Ok(())
    }

    /// 把区间内的字节替换为 `value`，两者长度可以不同。
    ///
    /// 空区间退化为在区间起点插入。
    pub fn replace(&mut self, range: impl RangeBounds<usize>, value: impl AsRef<[u8]>) -> Result<()> {
        let value = value.as_ref();
        let region = self.region(range)?;
        if region.is_empty() {
            return self.insert(region.start, value);
        }
        match value.len().cmp(&region.len()) {
            Ordering::Greater => {
                let extra = value.len() - region.len();
                self.ensure_writable(extra)?;
                let end = self.writer_index;
                self.storage.copy_within(region.end..end, region.end + extra);
                self.writer_index += extra;
            }
            Ordering::Less => self.remove(region.start + value.len()..region.end)?,
            Ordering::Equal => {}
        }
        self.storage[region.start..region.start + value.len()].copy_from_slice(value);
        Ok(())
    }

    pub fn replace_text(
        &mut self,
        range: impl RangeBounds<usize>,
        value: &str,
        charset: Charset,
    ) -> Result<()> {
        let encoded = charset.encode(value)?;
        self.replace(range, encoded)
    }

    /// 删除区间内首次出现的 `pattern`。
    pub fn remove_first(
        &mut self,
        pattern: impl AsRef<[u8]>,
        range: impl RangeBounds<usize>,
    ) -> Result<bool> {
        self.remove_one(pattern.as_ref(), range, Direction::Forward)
    }

    /// 删除区间内最后一次出现的 `pattern`。
    pub fn remove_last(
        &mut self,
        pattern: impl AsRef<[u8]>,
        range: impl RangeBounds<usize>,
    ) -> Result<bool> {
        self.remove_one(pattern.as_ref(), range, Direction::Backward)
    }

    /// 删除区间内所有 `pattern`，包括删除后前后拼接出的新匹配。
    ///
    /// 等价于以空序列执行 [`replace_all`](Self::replace_all)。
    pub fn remove_all(
        &mut self,
        pattern: impl AsRef<[u8]>,
        range: impl RangeBounds<usize>,
    ) -> Result<bool> {
        self.replace_all(pattern, b"", range)
    }

    /// 把区间内首次出现的 `pattern` 替换为 `target`。
    pub fn replace_first(
        &mut self,
        pattern: impl AsRef<[u8]>,
        target: impl AsRef<[u8]>,
        range: impl RangeBounds<usize>,
    ) -> Result<bool> {
        self.replace_one(pattern.as_ref(), target.as_ref(), range, Direction::Forward)
    }

    /// 把区间内最后一次出现的 `pattern` 替换为 `target`。
    pub fn replace_last(
        &mut self,
        pattern: impl AsRef<[u8]>,
        target: impl AsRef<[u8]>,
        range: impl RangeBounds<usize>,
    ) -> Result<bool> {
        self.replace_one(pattern.as_ref(), target.as_ref(), range, Direction::Backward)
    }

    /// 把区间内所有 `pattern` 替换为 `target`。
    ///
    /// # 逻辑解析（How）
    /// - `target` 短于 `pattern`：每轮替换区间内最后一次出现，再把上界下调两者的长度差，
    ///   使左移后的尾部仍落在检索区间内，因而替换后前后拼接出的新匹配同样会被替换；
    ///   区间每轮至少缩短 1 字节，最多迭代 `区间长度 / 长度差` 轮，结束时区间内不再含有 `pattern`；
    /// - `target` 不短于 `pattern`：先在原始内容上自右向左收集全部匹配起点，每次命中后把上界
    ///   收紧到匹配起点，写入的 `target` 不会被再次检索；随后按净增长量一次性校验并扩容，
    ///   容量不足时不改写任何字节，最后自右向左逐个替换。
    pub fn replace_all(
        &mut self,
        pattern: impl AsRef<[u8]>,
        target: impl AsRef<[u8]>,
        range: impl RangeBounds<usize>,
    ) -> Result<bool> {
        let pattern = pattern.as_ref();
        let target = target.as_ref();
        let region = self.region(range)?;
        if pattern.is_empty() {
            return Ok(false);
        }
        let replaced = if target.len() < pattern.len() {
            self.replace_all_shrinking(pattern, target, region)?
        } else {
            self.replace_all_growing(pattern, target, region)?
        };
        if replaced > 0 {
            tracing::debug!(
                replaced,
                pattern_len = pattern.len(),
                target_len = target.len(),
                "bytebuf replace_all"
            );
        }
        Ok(replaced > 0)
    }

    fn replace_all_shrinking(
        &mut self,
        pattern: &[u8],
        target: &[u8],
        region: Range<usize>,
    ) -> Result<usize> {
        let shrink = pattern.len() - target.len();
        let from = region.start;
        let mut to = region.end;
        let mut replaced = 0;
        while let Some(index) = self.last_index_of(pattern, from..to)? {
            self.replace(index..index + pattern.len(), target)?;
            to -= shrink;
            replaced += 1;
        }
        Ok(replaced)
    }

    fn replace_all_growing(
        &mut self,
        pattern: &[u8],
        target: &[u8],
        region: Range<usize>,
    ) -> Result<usize> {
        let search = SearchPattern::new(pattern);
        let mut matches = Vec::new();
        let mut to = region.end;
        while let Some(offset) = search.find(&self.storage[region.start..to], Direction::Backward) {
            let index = region.start + offset;
            matches.push(index);
            to = index;
        }
        if matches.is_empty() {
            return Ok(0);
        }

        let growth = (target.len() - pattern.len()).saturating_mul(matches.len());
        self.ensure_writable(growth)?;
        for &index in &matches {
            self.replace(index..index + pattern.len(), target)?;
        }
        Ok(matches.len())
    }

    pub fn remove_first_text(
        &mut self,
        value: &str,
        charset: Charset,
        range: impl RangeBounds<usize>,
    ) -> Result<bool> {
        let encoded = charset.encode(value)?;
        self.remove_first(encoded, range)
    }

    pub fn remove_last_text(
        &mut self,
        value: &str,
        charset: Charset,
        range: impl RangeBounds<usize>,
    ) -> Result<bool> {
        let encoded = charset.encode(value)?;
        self.remove_last(encoded, range)
    }

    pub fn remove_all_text(
        &mut self,
        value: &str,
        charset: Charset,
        range: impl RangeBounds<usize>,
    ) -> Result<bool> {
        let encoded = charset.encode(value)?;
        self.remove_all(encoded, range)
    }

    /// 以同一字符集编码 `pattern` 与 `target` 后替换首次出现。
    pub fn replace_first_text(
        &mut self,
        pattern: &str,
        target: &str,
        charset: Charset,
        range: impl RangeBounds<usize>,
    ) -> Result<bool> {
        let pattern = charset.encode(pattern)?;
        let target = charset.encode(target)?;
        self.replace_first(pattern, target, range)
    }

    pub fn replace_last_text(
        &mut self,
        pattern: &str,
        target: &str,
        charset: Charset,
        range: impl RangeBounds<usize>,
    ) -> Result<bool> {
        let pattern = charset.encode(pattern)?;
        let target = charset.encode(target)?;
        self.replace_last(pattern, target, range)
    }

    pub fn replace_all_text(
        &mut self,
        pattern: &str,
        target: &str,
        charset: Charset,
        range: impl RangeBounds<usize>,
    ) -> Result<bool> {
        let pattern = charset.encode(pattern)?;
        let target = charset.encode(target)?;
        self.replace_all(pattern, target, range)
    }

    fn remove_one(
        &mut self,
        pattern: &[u8],
        range: impl RangeBounds<usize>,
        direction: Direction,
    ) -> Result<bool> {
        match self.locate(pattern, range, direction)? {
            Some(index) => {
                self.remove(index..index + pattern.len())?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn replace_one(
        &mut self,
        pattern: &[u8],
        target: &[u8],
        range: impl RangeBounds<usize>,
        direction: Direction,
    ) -> Result<bool> {
        match self.locate(pattern, range, direction)? {
            Some(index) => {
                self.replace(index..index + pattern.len(), target)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn locate(
        &self,
        pattern: &[u8],
        range: impl RangeBounds<usize>,
        direction: Direction,
    ) -> Result<Option<usize>> {
        let region = self.region(range)?;
        if pattern.is_empty() {
            return Ok(None);
        }
        match direction {
            Direction::Forward => self.index_of(pattern, region),
            Direction::Backward => self.last_index_of(pattern, region),
        }
    }
}
