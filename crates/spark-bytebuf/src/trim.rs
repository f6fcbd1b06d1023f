//! 修剪与定长填充。
//!
//! 修剪从区间两端向内扫描，直到谓词首次不成立，再通过一次 `remove` 删除被跳过的字节；
//! 整个区间都满足谓词时区间被完全删除。默认谓词为 [`is_blank`]，按无符号字节比较，
//! 因此 `0x80..=0xFF` 永远不会被当作空白。

use alloc::vec;
use core::ops::RangeBounds;

use crate::{buffer::CursorBuffer, error::Result};

/// 默认修剪谓词：控制字符与空格（`byte <= 0x20`）。
pub fn is_blank(byte: u8) -> bool {
    byte <= b' '
}

impl CursorBuffer {
    pub fn trim_start(&mut self, range: impl RangeBounds<usize>) -> Result<()> {
        self.trim_start_by(range, is_blank)
    }

    pub fn trim_end(&mut self, range: impl RangeBounds<usize>) -> Result<()> {
        self.trim_end_by(range, is_blank)
    }

    pub fn trim(&mut self, range: impl RangeBounds<usize>) -> Result<()> {
        self.trim_by(range, is_blank)
    }

    /// 删除区间开头连续满足 `predicate` 的字节。
    pub fn trim_start_by(
        &mut self,
        range: impl RangeBounds<usize>,
        mut predicate: impl FnMut(u8) -> bool,
    ) -> Result<()> {
        let region = self.region(range)?;
        let skipped = self.storage[region.clone()]
            .iter()
            .position(|&b| !predicate(b))
            .unwrap_or(region.len());
        self.remove(region.start..region.start + skipped)
    }

    /// 删除区间末尾连续满足 `predicate` 的字节。
    pub fn trim_end_by(
        &mut self,
        range: impl RangeBounds<usize>,
        mut predicate: impl FnMut(u8) -> bool,
    ) -> Result<()> {
        let region = self.region(range)?;
        let kept = self.storage[region.clone()]
            .iter()
            .rposition(|&b| !predicate(b))
            .map_or(0, |last| last + 1);
        self.remove(region.start + kept..region.end)
    }

    /// 同时修剪区间两端。
    pub fn trim_by(
        &mut self,
        range: impl RangeBounds<usize>,
        mut predicate: impl FnMut(u8) -> bool,
    ) -> Result<()> {
        let region = self.region(range)?;
        let bytes = &self.storage[region.clone()];
        let Some(first) = bytes.iter().position(|&b| !predicate(b)) else {
            return self.remove(region);
        };
        let kept_end = bytes
            .iter()
            .rposition(|&b| !predicate(b))
            .map_or(first + 1, |last| last + 1);
        // 先删尾部，头部的绝对偏移不受影响。
        self.remove(region.start + kept_end..region.end)?;
        self.remove(region.start..region.start + first)
    }

    /// 删除区间开头连续属于 `values` 的字节。
    pub fn trim_start_any(&mut self, values: &[u8], range: impl RangeBounds<usize>) -> Result<()> {
        self.trim_start_by(range, |b| values.contains(&b))
    }

    pub fn trim_end_any(&mut self, values: &[u8], range: impl RangeBounds<usize>) -> Result<()> {
        self.trim_end_by(range, |b| values.contains(&b))
    }

    pub fn trim_any(&mut self, values: &[u8], range: impl RangeBounds<usize>) -> Result<()> {
        self.trim_by(range, |b| values.contains(&b))
    }

    /// 在区间起点补 `pad`，直到区间长度达到 `length`；已达到时不做任何改动。
    pub fn pad_start(&mut self, length: usize, pad: u8, range: impl RangeBounds<usize>) -> Result<()> {
        let region = self.region(range)?;
        if region.len() >= length {
            return Ok(());
        }
        self.insert(region.start, vec![pad; length - region.len()])
    }

    /// 在区间终点补 `pad`，直到区间长度达到 `length`；已达到时不做任何改动。
    pub fn pad_end(&mut self, length: usize, pad: u8, range: impl RangeBounds<usize>) -> Result<()> {
        let region = self.region(range)?;
        if region.len() >= length {
            return Ok(());
        }
        self.insert(region.end, vec![pad; length - region.len()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_predicate_is_unsigned() {
        assert!(is_blank(0));
        assert!(is_blank(b' '));
        assert!(!is_blank(b'!'));
        assert!(!is_blank(0xA0));
    }

    #[test]
    fn trim_removes_fully_blank_region() {
        let mut buf = CursorBuffer::from(" \t\r\n");
        buf.trim_start(..).unwrap();
        assert!(buf.is_empty());

        let mut buf = CursorBuffer::from("  \n ");
        buf.trim(..).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn trim_respects_subrange() {
        let mut buf = CursorBuffer::from("[  a b  ]");
        buf.trim(1..8).unwrap();
        assert_eq!(buf.as_readable(), b"[a b]");
        buf.trim_end_any(b"]", ..).unwrap();
        assert_eq!(buf.as_readable(), b"[a b");
        buf.trim_start_any(b"[a", ..).unwrap();
        assert_eq!(buf.as_readable(), b" b");
    }

    #[test]
    fn padding_fills_to_length() {
        let mut buf = CursorBuffer::from("42");
        buf.pad_start(5, b'0', ..).unwrap();
        assert_eq!(buf.as_readable(), b"00042");
        buf.pad_end(7, b' ', ..).unwrap();
        assert_eq!(buf.as_readable(), b"00042  ");
        buf.pad_end(3, b' ', ..).unwrap();
        assert_eq!(buf.as_readable(), b"00042  ");
        buf.pad_end(4, b'-', 0..2).unwrap();
        assert_eq!(buf.as_readable(), b"00--042  ");
    }
}
