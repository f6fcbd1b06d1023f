//! 显式配置结构与默认值表。
//!
//! # 设计背景（Why）
//! - 旧式工具函数大量依赖“隐式默认参数”（默认填充字符、默认字符集、默认检索区间），
//!   不同版本的默认值彼此不一致，调用点难以审计；
//! - 本模块把这些默认值集中到可构造、可比较的结构体中，调用方需要偏离默认值时必须显式声明。
//!
//! # 默认值一览（What）
//!
//! | 结构 | 字段 | 默认值 |
//! |---|---|---|
//! | [`BufferConfig`] | `initial_capacity` | [`DEFAULT_INITIAL_CAPACITY`]（256） |
//! | [`BufferConfig`] | `max_capacity` | [`DEFAULT_MAX_CAPACITY`]（`usize::MAX >> 1`） |
//! | [`BufferConfig`] | `growth` | [`GrowthPolicy::PowerOfTwo`] |
//! | [`TextFieldSpec`] | `pad` | [`DEFAULT_PAD_CHAR`]（`'\0'`） |
//! | [`TextFieldSpec`] | `charset` | [`Charset::UsAscii`] |
//! | [`TextFieldSpec`] | `truncation` | [`Truncation::AtFirstPad`] |
//! | 字符字段 | 码点范围 | [`CharRange::Latin1`]（0–255） |
//!
//! 检索、拼接与修剪接口的区间参数使用 `RangeBounds<usize>`：未指定的下界取 `reader_index`，
//! 未指定的上界取 `writer_index`，即 `..` 表示整个可读区间。

use crate::charset::Charset;

/// 新建缓冲的默认初始容量。
pub const DEFAULT_INITIAL_CAPACITY: usize = 256;

/// 默认容量上限，视为“不设上限”。
pub const DEFAULT_MAX_CAPACITY: usize = usize::MAX >> 1;

/// 文本字段的默认填充字符。
pub const DEFAULT_PAD_CHAR: char = '\0';

/// 2 的幂扩容策略的最小容量。
const MIN_GROWTH_CAPACITY: usize = 64;

/// 超过该阈值后按固定步长线性扩容，避免大缓冲翻倍浪费内存。
const GROWTH_STEP_THRESHOLD: usize = 4 * 1024 * 1024;

/// 存储扩容策略。
///
/// # 教案式说明
/// - **意图 (Why)**：扩容策略属于分配器的职责，核心只要求“扩到至少 N 字节并保留原内容”；
///   以枚举形式暴露，既能覆盖常见选择，又不把分配器细节渗入缓冲语义；
/// - **契约 (What)**：[`GrowthPolicy::next_capacity`] 的返回值总是满足
///   `required <= 返回值 <= max_capacity`（调用方已保证 `required <= max_capacity`）。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GrowthPolicy {
    /// 精确扩容到所需字节数。
    Exact,
    /// 4 MiB 以下按 2 的幂（不小于 64）扩容，超过后按 4 MiB 步长扩容。
    #[default]
    PowerOfTwo,
}

impl GrowthPolicy {
    /// 计算满足 `required` 的新容量。
    pub fn next_capacity(self, required: usize, max_capacity: usize) -> usize {
        match self {
            GrowthPolicy::Exact => required,
            GrowthPolicy::PowerOfTwo => {
                if required >= GROWTH_STEP_THRESHOLD {
                    let stepped = required / GROWTH_STEP_THRESHOLD * GROWTH_STEP_THRESHOLD;
                    if stepped == required {
                        return required;
                    }
                    return match stepped.checked_add(GROWTH_STEP_THRESHOLD) {
                        Some(next) if next <= max_capacity => next,
                        _ => max_capacity,
                    };
                }
                required
                    .max(MIN_GROWTH_CAPACITY)
                    .next_power_of_two()
                    .min(max_capacity)
            }
        }
    }
}

/// [`CursorBuffer`](crate::CursorBuffer) 的构造配置。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferConfig {
    /// 初始存储长度。
    pub initial_capacity: usize,
    /// 容量上限，写入或插入需要超出该值时返回 `CapacityExceeded`。
    pub max_capacity: usize,
    /// 扩容策略。
    pub growth: GrowthPolicy,
}

impl BufferConfig {
    /// 以指定初始容量构造，其余字段取默认值。
    pub const fn with_capacity(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            max_capacity: DEFAULT_MAX_CAPACITY,
            growth: GrowthPolicy::PowerOfTwo,
        }
    }

    /// 设置容量上限。
    pub const fn max_capacity(mut self, max_capacity: usize) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    /// 设置扩容策略。
    pub const fn growth(mut self, growth: GrowthPolicy) -> Self {
        self.growth = growth;
        self
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_INITIAL_CAPACITY)
    }
}

/// 文本字段读取时的截断方式。
///
/// 历史上存在两种报文约定，这里以显式选项并存，而不是靠默认参数区分：
/// - `AtFirstPad`：解码后在首个填充字符处截断，之后的内容全部丢弃；
/// - `TrailingPad`：只去掉末尾连续的填充字符，保留字段内部出现的填充字符。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Truncation {
    #[default]
    AtFirstPad,
    TrailingPad,
}

/// 单字节字符字段允许的码点范围。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CharRange {
    /// `U+0000..=U+00FF`。
    #[default]
    Latin1,
    /// `U+0000..=U+007F`。
    Ascii,
}

impl CharRange {
    /// 范围内最大的码点。
    pub const fn max_code(self) -> u32 {
        match self {
            CharRange::Latin1 => 0xFF,
            CharRange::Ascii => 0x7F,
        }
    }
}

/// 定长文本字段的编解码规格。
///
/// # 教案式说明
/// - **意图 (Why)**：一次字段读写所需的全部参数（字节长度、填充字符、字符集、截断方式）
///   集中在一个值对象里，避免调用点各自拼装默认值；
/// - **契约 (What)**：`length` 以**字节**计；写入时字符数同样不得超过 `length`；
/// - **用法 (How)**：`TextFieldSpec::new(8).charset(Charset::Utf8).pad(' ')`。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextFieldSpec {
    pub length: usize,
    pub pad: char,
    pub charset: Charset,
    pub truncation: Truncation,
}

impl TextFieldSpec {
    /// 以字段字节长度构造，其余字段取默认值。
    pub const fn new(length: usize) -> Self {
        Self {
            length,
            pad: DEFAULT_PAD_CHAR,
            charset: Charset::UsAscii,
            truncation: Truncation::AtFirstPad,
        }
    }

    pub const fn pad(mut self, pad: char) -> Self {
        self.pad = pad;
        self
    }

    pub const fn charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    pub const fn truncation(mut self, truncation: Truncation) -> Self {
        self.truncation = truncation;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_of_two_growth_respects_floor_and_cap() {
        let policy = GrowthPolicy::PowerOfTwo;
        assert_eq!(policy.next_capacity(1, DEFAULT_MAX_CAPACITY), 64);
        assert_eq!(policy.next_capacity(65, DEFAULT_MAX_CAPACITY), 128);
        assert_eq!(policy.next_capacity(65, 100), 100);
        assert_eq!(
            policy.next_capacity(GROWTH_STEP_THRESHOLD + 1, DEFAULT_MAX_CAPACITY),
            2 * GROWTH_STEP_THRESHOLD
        );
        assert_eq!(
            policy.next_capacity(GROWTH_STEP_THRESHOLD + 1, GROWTH_STEP_THRESHOLD + 10),
            GROWTH_STEP_THRESHOLD + 10
        );
        assert_eq!(GrowthPolicy::Exact.next_capacity(65, 100), 65);
    }

    #[test]
    fn text_field_defaults_match_table() {
        let spec = TextFieldSpec::new(5);
        assert_eq!(spec.pad, '\0');
        assert_eq!(spec.charset, Charset::UsAscii);
        assert_eq!(spec.truncation, Truncation::AtFirstPad);
        let custom = spec.pad(' ').charset(Charset::Utf8);
        assert_eq!((custom.pad, custom.charset), (' ', Charset::Utf8));
    }
}
