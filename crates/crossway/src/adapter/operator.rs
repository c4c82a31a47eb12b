//! Host operator syntax mapped onto foreign magic methods

use std::fmt;

/// A host operator that an [`ObjectAdapter`](super::ObjectAdapter)
/// forwards to the wrapped foreign object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostOperator {
    /// String conversion
    Str,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `//`
    FloorDiv,
    /// `%`
    Mod,
    /// `divmod()`
    DivMod,
    /// `**`
    Pow,
    /// `<<`
    LShift,
    /// `>>`
    RShift,
    /// `&`
    And,
    /// `^`
    Xor,
    /// `|`
    Or,
    /// `==`
    Eq,
    /// `!=`
    Ne,
}

struct OperatorEntry {
    operator: HostOperator,
    host_method: &'static str,
    foreign_method: Option<&'static str>,
}

/// Indexed by discriminant. Equality has no foreign method: it is decided
/// by foreign loose equality of the wrapped values.
const OPERATORS: [OperatorEntry; 15] = [
    entry(HostOperator::Str, "__str__", Some("__toString")),
    entry(HostOperator::Add, "__add__", Some("__add__")),
    entry(HostOperator::Sub, "__sub__", Some("__sub__")),
    entry(HostOperator::Mul, "__mul__", Some("__mul__")),
    entry(HostOperator::FloorDiv, "__floordiv__", Some("__floordiv__")),
    entry(HostOperator::Mod, "__mod__", Some("__mod__")),
    entry(HostOperator::DivMod, "__divmod__", Some("__divmod__")),
    entry(HostOperator::Pow, "__pow__", Some("__pow__")),
    entry(HostOperator::LShift, "__lshift__", Some("__lshift__")),
    entry(HostOperator::RShift, "__rshift__", Some("__rshift__")),
    entry(HostOperator::And, "__and__", Some("__and__")),
    entry(HostOperator::Xor, "__xor__", Some("__xor__")),
    entry(HostOperator::Or, "__or__", Some("__or__")),
    entry(HostOperator::Eq, "__eq__", None),
    entry(HostOperator::Ne, "__ne__", None),
];

const fn entry(
    operator: HostOperator,
    host_method: &'static str,
    foreign_method: Option<&'static str>,
) -> OperatorEntry {
    OperatorEntry {
        operator,
        host_method,
        foreign_method,
    }
}

impl HostOperator {
    /// Every operator, in table order.
    pub const ALL: [HostOperator; 15] = [
        HostOperator::Str,
        HostOperator::Add,
        HostOperator::Sub,
        HostOperator::Mul,
        HostOperator::FloorDiv,
        HostOperator::Mod,
        HostOperator::DivMod,
        HostOperator::Pow,
        HostOperator::LShift,
        HostOperator::RShift,
        HostOperator::And,
        HostOperator::Xor,
        HostOperator::Or,
        HostOperator::Eq,
        HostOperator::Ne,
    ];

    fn entry(self) -> &'static OperatorEntry {
        &OPERATORS[self as usize]
    }

    /// The host-side special method name, e.g. `__add__`.
    pub fn host_method(self) -> &'static str {
        self.entry().host_method
    }

    /// The foreign method the operator forwards to, or `None` for the
    /// equality operators.
    pub fn foreign_method(self) -> Option<&'static str> {
        self.entry().foreign_method
    }

    /// Look an operator up by its host special method name.
    pub fn from_host_method(name: &str) -> Option<HostOperator> {
        OPERATORS
            .iter()
            .find(|entry| entry.host_method == name)
            .map(|entry| entry.operator)
    }

    /// Number of operands, receiver included.
    pub fn arity(self) -> usize {
        match self {
            HostOperator::Str => 1,
            _ => 2,
        }
    }
}

impl fmt::Display for HostOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.host_method())
    }
}
