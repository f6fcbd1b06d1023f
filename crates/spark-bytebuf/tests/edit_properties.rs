//! 检索与就地编辑的性质验证。
//!
//! # 测试目标（Why）
//! - KMP 检索的失配表与反向扫描容易在边界处出错，使用朴素逐位比较作为参照模型做差分测试；
//! - 插入、删除、替换的长度变化与内容拼接必须与 `Vec<u8>` 上的等价操作一致；
//! - `trim` 幂等，`remove_all`/`replace_all` 结束后不留下任何匹配且迭代有界。
//!
//! # 结构说明（How）
//! - 字母表限制为 `a`/`b`/`c`，使随机模式在随机报文中有足够高的命中率；
//! - 读游标随机前移，确保绝对索引换算在 `reader_index > 0` 时同样成立。

use proptest::prelude::*;
use spark_bytebuf::CursorBuffer;

fn naive_find(haystack: &[u8], pattern: &[u8]) -> Option<usize> {
    if pattern.len() > haystack.len() {
        return None;
    }
    (0..=haystack.len() - pattern.len()).find(|&i| &haystack[i..i + pattern.len()] == pattern)
}

fn naive_rfind(haystack: &[u8], pattern: &[u8]) -> Option<usize> {
    if pattern.len() > haystack.len() {
        return None;
    }
    (0..=haystack.len() - pattern.len())
        .rev()
        .find(|&i| &haystack[i..i + pattern.len()] == pattern)
}

fn text(max: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(vec![b'a', b'b', b'c']), 0..max)
}

/// 构造读游标已越过 `prefix` 的缓冲，可读区恰为 `body`。
fn shifted(prefix: &[u8], body: &[u8]) -> CursorBuffer {
    let mut buf = CursorBuffer::new();
    buf.write_bytes(prefix).expect("写入前缀");
    buf.write_bytes(body).expect("写入正文");
    buf.skip(prefix.len()).expect("跳过前缀");
    buf
}

proptest! {
    #[test]
    fn prop_search_agrees_with_naive_scan(
        prefix in text(4),
        body in text(48),
        pattern in prop::collection::vec(prop::sample::select(vec![b'a', b'b', b'c']), 1..5),
    ) {
        let buf = shifted(&prefix, &body);
        let base = prefix.len();
        prop_assert_eq!(
            buf.index_of(&pattern, ..).expect("正向检索"),
            naive_find(&body, &pattern).map(|i| i + base)
        );
        prop_assert_eq!(
            buf.last_index_of(&pattern, ..).expect("反向检索"),
            naive_rfind(&body, &pattern).map(|i| i + base)
        );
        prop_assert_eq!(
            buf.index_of_byte(pattern[0], ..).expect("单字节检索"),
            body.iter().position(|&b| b == pattern[0]).map(|i| i + base)
        );
    }

    #[test]
    fn prop_splice_matches_vec_model(
        body in text(32),
        value in text(8),
        a in any::<prop::sample::Index>(),
        b in any::<prop::sample::Index>(),
    ) {
        let len = body.len();
        let (x, y) = (a.index(len + 1), b.index(len + 1));
        let (from, to) = (x.min(y), x.max(y));

        let mut buf = CursorBuffer::from(body.clone());
        buf.insert(from, &value).expect("插入");
        let mut model = body.clone();
        model.splice(from..from, value.iter().copied());
        prop_assert_eq!(buf.as_readable(), &model[..]);

        let mut buf = CursorBuffer::from(body.clone());
        buf.remove(from..to).expect("删除");
        let mut model = body.clone();
        model.drain(from..to);
        prop_assert_eq!(buf.readable_bytes(), len - (to - from));
        prop_assert_eq!(buf.as_readable(), &model[..]);

        let mut buf = CursorBuffer::from(body.clone());
        buf.replace(from..to, &value).expect("替换");
        let mut model = body;
        model.splice(from..to, value.iter().copied());
        prop_assert_eq!(buf.readable_bytes(), len - (to - from) + value.len());
        prop_assert_eq!(buf.as_readable(), &model[..]);
    }

    #[test]
    fn prop_trim_is_idempotent(
        body in prop::collection::vec(prop::sample::select(vec![b' ', b'\t', 0u8, b'x', 0xA0]), 0..24),
    ) {
        let mut buf = CursorBuffer::from(body);
        buf.trim(..).expect("第一次修剪");
        let once = buf.as_readable().to_vec();
        buf.trim(..).expect("第二次修剪");
        prop_assert_eq!(buf.as_readable(), &once[..]);
        if let (Some(first), Some(last)) = (once.first(), once.last()) {
            prop_assert!(*first > b' ' && *last > b' ');
        }
    }

    #[test]
    fn prop_pad_end_reaches_target_once(body in text(16), length in 0usize..24) {
        let mut buf = CursorBuffer::from(body.clone());
        buf.pad_end(length, b'.', ..).expect("填充");
        prop_assert_eq!(buf.readable_bytes(), body.len().max(length));
        let padded = buf.as_readable().to_vec();
        buf.pad_end(length, b'.', ..).expect("重复填充");
        prop_assert_eq!(buf.as_readable(), &padded[..]);
    }

    #[test]
    fn prop_bulk_edits_leave_no_occurrence(
        body in text(40),
        pattern in prop::collection::vec(prop::sample::select(vec![b'a', b'b', b'c']), 1..4),
    ) {
        let mut buf = CursorBuffer::from(body.clone());
        let changed = buf.remove_all(&pattern, ..).expect("删除全部");
        prop_assert_eq!(changed, naive_find(&body, &pattern).is_some());
        prop_assert!(naive_find(buf.as_readable(), &pattern).is_none());
        prop_assert!(buf.readable_bytes() <= body.len());

        let mut buf = CursorBuffer::from(body.clone());
        buf.replace_all(&pattern, b"#", ..).expect("替换全部");
        prop_assert!(naive_find(buf.as_readable(), &pattern).is_none());

        // 目标取模式的真前缀：仍在字母表内，替换后可能与相邻字节拼出新匹配。
        let mut buf = CursorBuffer::from(body.clone());
        buf.replace_all(&pattern, &pattern[..pattern.len() - 1], ..).expect("缩短替换");
        prop_assert!(naive_find(buf.as_readable(), &pattern).is_none());
        prop_assert!(buf.readable_bytes() <= body.len());
    }
}
