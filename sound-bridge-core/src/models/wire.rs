use std::collections::BTreeMap;
use std::fmt;

/// Flat key-value argument bag sent with every outbound call.
pub type ArgumentBag = BTreeMap<String, WireValue>;

/// A value that can cross the method channel.
///
/// Mirrors the standard message codec of the host framework: scalars,
/// strings, raw byte buffers and string-keyed maps.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WireValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Map(BTreeMap<String, WireValue>),
}

impl WireValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view; integers widen, numeric strings are parsed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            Self::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, WireValue>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Short type name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Map(_) => "map",
        }
    }
}

impl fmt::Display for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(v) => write!(f, "{}", v),
            Self::String(s) => write!(f, "{:?}", s),
            Self::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Self::Map(m) => {
                write!(f, "{{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for WireValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for WireValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for WireValue {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<u32> for WireValue {
    fn from(v: u32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<f64> for WireValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for WireValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for WireValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<u8>> for WireValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl<T: Into<WireValue>> From<Option<T>> for WireValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Self::Null)
    }
}

impl From<BTreeMap<String, WireValue>> for WireValue {
    fn from(v: BTreeMap<String, WireValue>) -> Self {
        Self::Map(v)
    }
}

/// Build an [`ArgumentBag`] from `key => value` pairs.
#[macro_export]
macro_rules! args {
    () => {
        $crate::models::wire::ArgumentBag::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut bag = $crate::models::wire::ArgumentBag::new();
        $(bag.insert($key.to_string(), $crate::models::wire::WireValue::from($value));)+
        bag
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_strings_parse_as_floats() {
        assert_eq!(WireValue::from("12.5").as_f64(), Some(12.5));
        assert_eq!(WireValue::from(" 3 ").as_f64(), Some(3.0));
        assert_eq!(WireValue::from("abc").as_f64(), None);
        assert_eq!(WireValue::Int(7).as_f64(), Some(7.0));
        assert_eq!(WireValue::Null.as_f64(), None);
    }

    #[test]
    fn option_maps_to_null() {
        let none: Option<String> = None;
        assert!(WireValue::from(none).is_null());
        assert_eq!(WireValue::from(Some("x")), WireValue::String("x".into()));
    }

    #[test]
    fn args_macro_builds_bag() {
        let bag = crate::args! { "codec" => 1i64, "enabled" => true };
        assert_eq!(bag.len(), 2);
        assert_eq!(bag["codec"], WireValue::Int(1));
        assert_eq!(bag["enabled"], WireValue::Bool(true));
        assert!(crate::args! {}.is_empty());
    }

    #[test]
    fn display_is_compact() {
        let bag = crate::args! { "a" => 1i64, "b" => vec![0u8; 4] };
        assert_eq!(WireValue::Map(bag).to_string(), "{a: 1, b: <4 bytes>}");
    }
}
