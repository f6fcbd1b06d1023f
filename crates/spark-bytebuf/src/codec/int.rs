use bytes::{Buf, BufMut};

use crate::{buffer::CursorBuffer, error::Result};

/// 为每种整数宽度生成一对小端读写方法。
///
/// 读取借助 `Buf for &[u8]`，写入借助 `BufMut for &mut [u8]`，
/// 宽度由 `size_of` 推导，避免手写字节移位。
macro_rules! int_fields {
    ($($ty:ty => $read:ident / $get:ident, $write:ident / $put:ident;)*) => {
        impl CursorBuffer {
            $(
                #[doc = concat!("读取一个小端 `", stringify!($ty), "` 并推进读游标。")]
                pub fn $read(&mut self) -> Result<$ty> {
                    let mut bytes = self.read_slice(core::mem::size_of::<$ty>())?;
                    Ok(bytes.$get())
                }

                #[doc = concat!("写入一个小端 `", stringify!($ty), "` 并推进写游标，必要时扩容。")]
                pub fn $write(&mut self, value: $ty) -> Result<()> {
                    const WIDTH: usize = core::mem::size_of::<$ty>();
                    self.ensure_writable(WIDTH)?;
                    let start = self.writer_index;
                    (&mut self.storage[start..start + WIDTH]).$put(value);
                    self.writer_index += WIDTH;
                    Ok(())
                }
            )*
        }
    };
}

int_fields! {
    u8 => read_u8 / get_u8, write_u8 / put_u8;
    i8 => read_i8 / get_i8, write_i8 / put_i8;
    u16 => read_u16 / get_u16_le, write_u16 / put_u16_le;
    i16 => read_i16 / get_i16_le, write_i16 / put_i16_le;
    u32 => read_u32 / get_u32_le, write_u32 / put_u32_le;
    i32 => read_i32 / get_i32_le, write_i32 / put_i32_le;
    u64 => read_u64 / get_u64_le, write_u64 / put_u64_le;
    i64 => read_i64 / get_i64_le, write_i64 / put_i64_le;
}
