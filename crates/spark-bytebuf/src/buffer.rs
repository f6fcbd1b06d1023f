use alloc::{string::String, vec::Vec};
use core::{
    fmt,
    ops::{Bound, Range, RangeBounds},
};

use bytes::{Bytes, BytesMut};

use crate::{
    charset::Charset,
    config::{BufferConfig, DEFAULT_MAX_CAPACITY, GrowthPolicy},
    error::{BufError, Result},
};

/// `CursorBuffer` 是带读写游标的连续可扩容字节区，用于组装与解析二进制报文。
///
/// # 设计动机（Why）
/// - 报文组装既需要“顺序写入定宽字段”，也需要“回头修改已写内容”（插入长度前缀、
///   替换占位符、修剪尾部空白）；把两类能力收敛在同一类型上，调用方无需在多个视图之间搬运数据；
/// - 游标语义对标 Netty `ByteBuf`：`reader_index` 之前为已消费区，
///   `[reader_index, writer_index)` 为可读区，`writer_index` 之后为可写区。
///
/// # 结构设计（How）
/// - `storage` 使用 `BytesMut`，其长度即 `capacity`，未写区域以 0 填充；
/// - 扩容由 [`GrowthPolicy`] 决定新容量，通过 `BytesMut::resize` 保留全部既有字节；
/// - 检索、拼接、修剪、字段编解码分别在 `search`、`splice`、`trim`、`codec` 模块中
///   以固有方法的形式扩展本类型。
///
/// # 契约说明（What）
/// - **不变式**：`0 <= reader_index <= writer_index <= capacity <= max_capacity`；
/// - **扩容**：不会改变既有偏移的含义，扩容前返回给调用方的索引在扩容后依然有效；
/// - **错误**：所有失败在改写任何字节前检测，失败后内容与游标保持调用前状态。
///
/// # 风险与取舍（Trade-offs）
/// - 单线程独占使用：所有修改都要求 `&mut self`，不提供内部可变性；
///   跨任务传递请先 [`to_bytes`](Self::to_bytes) 生成不可变快照。
pub struct CursorBuffer {
    pub(crate) storage: BytesMut,
    pub(crate) reader_index: usize,
    pub(crate) writer_index: usize,
    max_capacity: usize,
    growth: GrowthPolicy,
}

impl CursorBuffer {
    /// 使用默认配置创建空缓冲。
    pub fn new() -> Self {
        Self::with_config(BufferConfig::default())
    }

    /// 创建指定初始容量的空缓冲。
    pub fn with_capacity(initial_capacity: usize) -> Self {
        Self::with_config(BufferConfig::with_capacity(initial_capacity))
    }

    /// 按配置创建空缓冲；初始容量超过上限时按上限截断。
    pub fn with_config(config: BufferConfig) -> Self {
        let capacity = config.initial_capacity.min(config.max_capacity);
        let mut storage = BytesMut::with_capacity(capacity);
        storage.resize(capacity, 0);
        Self {
            storage,
            reader_index: 0,
            writer_index: 0,
            max_capacity: config.max_capacity,
            growth: config.growth,
        }
    }

    /// 复制 `bytes` 构造缓冲，全部内容处于可读区。
    pub fn from_slice(bytes: &[u8]) -> Self {
        let mut buffer = Self::with_config(BufferConfig::with_capacity(0));
        buffer.storage.extend_from_slice(bytes);
        buffer.writer_index = bytes.len();
        buffer
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    pub fn reader_index(&self) -> usize {
        self.reader_index
    }

    pub fn writer_index(&self) -> usize {
        self.writer_index
    }

    /// 可读字节数：`writer_index - reader_index`。
    pub fn readable_bytes(&self) -> usize {
        self.writer_index - self.reader_index
    }

    /// 不扩容即可写入的字节数。
    pub fn writable_bytes(&self) -> usize {
        self.capacity() - self.writer_index
    }

    /// 允许扩容时最多还能写入的字节数。
    pub fn max_writable_bytes(&self) -> usize {
        self.max_capacity - self.writer_index
    }

    pub fn is_empty(&self) -> bool {
        self.readable_bytes() == 0
    }

    pub fn is_readable(&self) -> bool {
        !self.is_empty()
    }

    /// 当前可读区间 `reader_index..writer_index`。
    pub fn readable_range(&self) -> Range<usize> {
        self.reader_index..self.writer_index
    }

    /// 可读区的只读借用。
    pub fn as_readable(&self) -> &[u8] {
        &self.storage[self.readable_range()]
    }

    /// 将可读区复制为不可变的 `Bytes` 快照，可安全交给其它任务。
    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(self.as_readable())
    }

    /// 设置读游标，要求 `index <= writer_index`。
    pub fn set_reader_index(&mut self, index: usize) -> Result<()> {
        if index > self.writer_index {
            return Err(BufError::OutOfRange {
                index,
                readable: 0..self.writer_index,
            });
        }
        self.reader_index = index;
        Ok(())
    }

    /// 设置写游标，要求 `reader_index <= index <= capacity`。
    pub fn set_writer_index(&mut self, index: usize) -> Result<()> {
        if index < self.reader_index || index > self.capacity() {
            return Err(BufError::OutOfRange {
                index,
                readable: self.reader_index..self.capacity(),
            });
        }
        self.writer_index = index;
        Ok(())
    }

    /// 同时设置两个游标。
    pub fn set_index(&mut self, reader_index: usize, writer_index: usize) -> Result<()> {
        if reader_index > writer_index || writer_index > self.capacity() {
            return Err(BufError::InvalidRange {
                from: reader_index,
                to: writer_index,
                readable: 0..self.capacity(),
            });
        }
        self.reader_index = reader_index;
        self.writer_index = writer_index;
        Ok(())
    }

    /// 按相对偏移移动读游标。
    pub fn shift_reader_index(&mut self, shift: isize) -> Result<()> {
        let target = offset(self.reader_index, shift).ok_or(BufError::OutOfRange {
            index: self.reader_index,
            readable: 0..self.writer_index,
        })?;
        self.set_reader_index(target)
    }

    /// 按相对偏移移动写游标。
    pub fn shift_writer_index(&mut self, shift: isize) -> Result<()> {
        let target = offset(self.writer_index, shift).ok_or(BufError::OutOfRange {
            index: self.writer_index,
            readable: self.reader_index..self.capacity(),
        })?;
        self.set_writer_index(target)
    }

    /// 将两个游标归零，保留容量。
    pub fn clear(&mut self) {
        self.reader_index = 0;
        self.writer_index = 0;
    }

    /// 跳过 `len` 个可读字节。
    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.require_readable_bytes(len)?;
        self.reader_index += len;
        Ok(())
    }

    /// 丢弃已读字节，把可读区搬到存储起点。
    pub fn discard_read_bytes(&mut self) {
        if self.reader_index == 0 {
            return;
        }
        let readable = self.readable_bytes();
        let range = self.readable_range();
        self.storage.copy_within(range, 0);
        self.reader_index = 0;
        self.writer_index = readable;
    }

    /// 解除容量上限，使后续写入只受可用内存约束。
    pub fn into_expandable(mut self) -> Self {
        self.max_capacity = self.max_capacity.max(DEFAULT_MAX_CAPACITY);
        self
    }

    /// 确保至少还能写入 `additional` 字节，必要时扩容。
    ///
    /// # 契约说明
    /// - 超过 `max_capacity` 时返回 [`BufError::CapacityExceeded`]，存储与游标均不变；
    /// - 扩容通过 `BytesMut::resize` 完成，`[0, capacity)` 内的既有字节全部保留。
    pub fn ensure_writable(&mut self, additional: usize) -> Result<()> {
        let required = match self.writer_index.checked_add(additional) {
            Some(required) if required <= self.max_capacity => required,
            _ => {
                tracing::debug!(
                    requested = additional,
                    writer_index = self.writer_index,
                    max_capacity = self.max_capacity,
                    "bytebuf growth rejected"
                );
                return Err(BufError::CapacityExceeded {
                    requested: additional,
                    available: self.max_writable_bytes(),
                    max_capacity: self.max_capacity,
                });
            }
        };
        if required <= self.capacity() {
            return Ok(());
        }
        let old_capacity = self.capacity();
        let new_capacity = self.growth.next_capacity(required, self.max_capacity);
        self.storage.resize(new_capacity, 0);
        tracing::trace!(old_capacity, new_capacity, required, "bytebuf grown");
        Ok(())
    }

    /// 读取绝对索引处的字节，索引必须位于可读区。
    pub fn get(&self, index: usize) -> Result<u8> {
        self.require_readable_index(index)?;
        Ok(self.storage[index])
    }

    /// 改写绝对索引处的字节，索引必须位于可读区。
    pub fn set(&mut self, index: usize, value: u8) -> Result<()> {
        self.require_readable_index(index)?;
        self.storage[index] = value;
        Ok(())
    }

    /// 借用可读区内的子区间。
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Result<&[u8]> {
        let region = self.region(range)?;
        Ok(&self.storage[region])
    }

    /// 复制可读区内子区间的字节。
    pub fn subsequence(&self, range: impl RangeBounds<usize>) -> Result<Vec<u8>> {
        self.slice(range).map(<[u8]>::to_vec)
    }

    /// 按字符集解码可读区内子区间。
    pub fn substring(&self, range: impl RangeBounds<usize>, charset: Charset) -> Result<String> {
        let bytes = self.slice(range)?;
        if bytes.is_empty() {
            return Ok(String::new());
        }
        Ok(charset.decode(bytes))
    }

    /// 读取一个字节并推进读游标。
    pub fn read_byte(&mut self) -> Result<u8> {
        self.require_readable_bytes(1)?;
        let value = self.storage[self.reader_index];
        self.reader_index += 1;
        Ok(value)
    }

    /// 写入一个字节并推进写游标。
    pub fn write_byte(&mut self, value: u8) -> Result<()> {
        self.ensure_writable(1)?;
        self.storage[self.writer_index] = value;
        self.writer_index += 1;
        Ok(())
    }

    /// 借用接下来的 `len` 个可读字节并推进读游标。
    pub fn read_slice(&mut self, len: usize) -> Result<&[u8]> {
        self.require_readable_bytes(len)?;
        let start = self.reader_index;
        self.reader_index += len;
        Ok(&self.storage[start..start + len])
    }

    /// 复制接下来的 `len` 个可读字节为 `Bytes` 并推进读游标。
    pub fn read_bytes(&mut self, len: usize) -> Result<Bytes> {
        self.read_slice(len).map(Bytes::copy_from_slice)
    }

    /// 追加写入字节序列。
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure_writable(bytes.len())?;
        let start = self.writer_index;
        self.storage[start..start + bytes.len()].copy_from_slice(bytes);
        self.writer_index += bytes.len();
        Ok(())
    }

    /// 将 `RangeBounds` 解析为可读区内的绝对区间。
    ///
    /// 未指定的下界取 `reader_index`，未指定的上界取 `writer_index`；
    /// 解析结果满足 `reader_index <= from <= to <= writer_index`，否则返回
    /// [`BufError::InvalidRange`]。
    pub fn region(&self, range: impl RangeBounds<usize>) -> Result<Range<usize>> {
        let from = match range.start_bound() {
            Bound::Included(&from) => Some(from),
            Bound::Excluded(&from) => from.checked_add(1),
            Bound::Unbounded => Some(self.reader_index),
        };
        let to = match range.end_bound() {
            Bound::Included(&to) => to.checked_add(1),
            Bound::Excluded(&to) => Some(to),
            Bound::Unbounded => Some(self.writer_index),
        };
        match (from, to) {
            (Some(from), Some(to))
                if from <= to && from >= self.reader_index && to <= self.writer_index =>
            {
                Ok(from..to)
            }
            (from, to) => Err(BufError::InvalidRange {
                from: from.unwrap_or(usize::MAX),
                to: to.unwrap_or(usize::MAX),
                readable: self.readable_range(),
            }),
        }
    }

    pub(crate) fn require_readable_index(&self, index: usize) -> Result<()> {
        if self.readable_range().contains(&index) {
            Ok(())
        } else {
            Err(BufError::OutOfRange {
                index,
                readable: self.readable_range(),
            })
        }
    }

    pub(crate) fn require_readable_bytes(&self, len: usize) -> Result<()> {
        if len <= self.readable_bytes() {
            Ok(())
        } else {
            Err(BufError::NotEnoughReadable {
                requested: len,
                readable: self.readable_bytes(),
            })
        }
    }
}

fn offset(base: usize, shift: isize) -> Option<usize> {
    if shift >= 0 {
        base.checked_add(shift.unsigned_abs())
    } else {
        base.checked_sub(shift.unsigned_abs())
    }
}

impl Default for CursorBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for CursorBuffer {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            reader_index: self.reader_index,
            writer_index: self.writer_index,
            max_capacity: self.max_capacity,
            growth: self.growth,
        }
    }
}

impl fmt::Debug for CursorBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorBuffer")
            .field("reader_index", &self.reader_index)
            .field("writer_index", &self.writer_index)
            .field("capacity", &self.capacity())
            .field("max_capacity", &self.max_capacity)
            .field("readable", &self.as_readable())
            .finish()
    }
}

impl PartialEq for CursorBuffer {
    /// 只比较可读区内容，与游标绝对位置和容量无关。
    fn eq(&self, other: &Self) -> bool {
        self.as_readable() == other.as_readable()
    }
}

impl Eq for CursorBuffer {}

impl From<&[u8]> for CursorBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self::from_slice(bytes)
    }
}

impl From<&str> for CursorBuffer {
    fn from(text: &str) -> Self {
        Self::from_slice(text.as_bytes())
    }
}

impl From<Vec<u8>> for CursorBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        let writer_index = bytes.len();
        Self {
            storage: BytesMut::from(&bytes[..]),
            reader_index: 0,
            writer_index,
            max_capacity: DEFAULT_MAX_CAPACITY,
            growth: GrowthPolicy::default(),
        }
    }
}

impl AsRef<[u8]> for CursorBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_readable()
    }
}
