use std::fmt;
use std::rc::Rc;

use itertools::Itertools;

use crate::annotate::Scope;
use crate::ast::FunctionDisplay;

pub type NativeFn = fn(&[StaticValue]) -> StaticValue;

/// A value as known to static analysis. `Unknown` is the absorbing
/// sentinel: anything the analysis cannot determine collapses to it, and
/// most operations over an `Unknown` operand return `Unknown` rather than
/// an error.
///
/// Aggregates share their contents behind `Rc` so values stay cheap to
/// clone as they flow through scopes and the deferred work queue.
#[derive(Clone, Debug)]
pub enum StaticValue {
    Unknown,
    Null,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    List(Rc<Vec<StaticValue>>),
    /// Insertion-ordered key/value pairs. Keys are never `Unknown`; a map
    /// display with an unknown key collapses to `Unknown` as a whole.
    Map(Rc<Vec<(StaticValue, StaticValue)>>),
    Html(Rc<str>),
    Function(Rc<FunctionValue>),
}

#[derive(Clone, Debug)]
pub enum FunctionValue {
    Native { name: &'static str, f: NativeFn },
    Display { display: Rc<FunctionDisplay>, env: Scope },
}

impl FunctionValue {
    pub fn name(&self) -> Option<&str> {
        match self {
            FunctionValue::Native { name, .. } => Some(name),
            FunctionValue::Display { .. } => None,
        }
    }
}

impl StaticValue {
    pub fn str<S: Into<String>>(s: S) -> StaticValue {
        StaticValue::Str(Rc::from(s.into().as_str()))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, StaticValue::Unknown)
    }

    /// Truthiness of a known value: `null`, `false`, zero, NaN, and the
    /// empty string are falsy; every list, map, html fragment, and function
    /// is truthy. Callers rule out `Unknown` before asking.
    pub fn truthy(&self) -> bool {
        match self {
            StaticValue::Unknown | StaticValue::Null | StaticValue::Bool(false) => false,
            StaticValue::Number(n) => *n != 0.0 && !n.is_nan(),
            StaticValue::Str(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Quote-and-escape rendering: like `Display`, except a top level
    /// string is rendered as a quoted literal.
    pub fn repr(&self) -> String {
        match self {
            StaticValue::Str(s) => quote(s),
            _ => self.to_string(),
        }
    }

    /// The rendering used in diagnostics and hovers: strings stay quoted at
    /// every level, `Unknown` is parenthesized, and html fragments show
    /// their raw markup.
    pub fn format(&self) -> String {
        match self {
            StaticValue::Unknown => str!("(UnknownValue)"),
            StaticValue::Str(s) => quote(s),
            StaticValue::List(items) => {
                format!("[{}]", items.iter().map(|v| v.format()).join(","))
            }
            StaticValue::Map(pairs) => {
                let body = pairs
                    .iter()
                    .map(|(k, v)| format!("{}:{}", k.format(), v.format()))
                    .join(",");
                format!("{{{}}}", body)
            }
            StaticValue::Html(markup) => format!("html({})", markup),
            _ => self.to_string(),
        }
    }
}

fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("{:?}", s))
}

fn map_eq(a: &[(StaticValue, StaticValue)], b: &[(StaticValue, StaticValue)]) -> bool {
    a.len() == b.len()
        && a.iter().all(|(k, v)| {
            b.iter()
                .any(|(bk, bv)| k == bk && v == bv)
        })
}

/// Value equality, except functions, which compare by identity: every
/// evaluation of a function display produces a distinct function.
impl PartialEq for StaticValue {
    fn eq(&self, other: &StaticValue) -> bool {
        use StaticValue::*;
        match (self, other) {
            (Unknown, Unknown) | (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (Number(a), Number(b)) => a == b,
            (Str(a), Str(b)) => a == b,
            (Html(a), Html(b)) => a == b,
            (List(a), List(b)) => a == b,
            (Map(a), Map(b)) => map_eq(a, b),
            (Function(a), Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for StaticValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaticValue::Unknown => write!(f, "UnknownValue"),
            StaticValue::Null => write!(f, "null"),
            StaticValue::Bool(b) => write!(f, "{}", b),
            StaticValue::Number(n) => write!(f, "{}", n),
            StaticValue::Str(s) => write!(f, "{}", s),
            StaticValue::List(items) => {
                write!(f, "[{}]", items.iter().map(|v| v.repr()).join(","))
            }
            StaticValue::Map(pairs) => {
                let body = pairs
                    .iter()
                    .map(|(k, v)| format!("{}:{}", k.repr(), v.repr()))
                    .join(",");
                write!(f, "{{{}}}", body)
            }
            StaticValue::Html(markup) => write!(f, "HTML({})", quote(markup)),
            StaticValue::Function(fv) => match fv.name() {
                Some(name) => write!(f, "<function {}>", name),
                None => write!(f, "<function>"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: Vec<StaticValue>) -> StaticValue {
        StaticValue::List(Rc::new(items))
    }

    fn map(pairs: Vec<(StaticValue, StaticValue)>) -> StaticValue {
        StaticValue::Map(Rc::new(pairs))
    }

    #[test]
    fn truthiness() {
        assert!(!StaticValue::Null.truthy());
        assert!(!StaticValue::Bool(false).truthy());
        assert!(!StaticValue::Number(0.0).truthy());
        assert!(!StaticValue::Number(f64::NAN).truthy());
        assert!(!StaticValue::str("").truthy());

        assert!(StaticValue::Bool(true).truthy());
        assert!(StaticValue::Number(-1.5).truthy());
        assert!(StaticValue::str("x").truthy());
        // empty aggregates are still truthy
        assert!(list(vec![]).truthy());
        assert!(map(vec![]).truthy());
        assert!(StaticValue::Html(Rc::from("")).truthy());
    }

    #[test]
    fn equality_is_by_value_except_functions() {
        assert_eq!(StaticValue::str("a"), StaticValue::str("a"));
        assert_eq!(
            list(vec![StaticValue::Number(1.0)]),
            list(vec![StaticValue::Number(1.0)])
        );
        assert_ne!(StaticValue::Number(f64::NAN), StaticValue::Number(f64::NAN));

        // maps compare regardless of insertion order
        let a = map(vec![
            (StaticValue::str("x"), StaticValue::Number(1.0)),
            (StaticValue::str("y"), StaticValue::Number(2.0)),
        ]);
        let b = map(vec![
            (StaticValue::str("y"), StaticValue::Number(2.0)),
            (StaticValue::str("x"), StaticValue::Number(1.0)),
        ]);
        assert_eq!(a, b);

        let f: NativeFn = |_| StaticValue::Unknown;
        let fv = |f| StaticValue::Function(Rc::new(FunctionValue::Native { name: "f", f }));
        let one = fv(f);
        assert_eq!(one.clone(), one.clone());
        assert_ne!(one, fv(f));
    }

    #[test]
    fn display_forms() {
        assert_eq!(StaticValue::Unknown.to_string(), "UnknownValue");
        assert_eq!(StaticValue::Null.to_string(), "null");
        assert_eq!(StaticValue::Number(2.5).to_string(), "2.5");
        assert_eq!(StaticValue::Number(5.0).to_string(), "5");
        assert_eq!(StaticValue::str("hi").to_string(), "hi");
        // strings nested in aggregates are quoted
        assert_eq!(
            list(vec![StaticValue::str("a"), StaticValue::Number(1.0)]).to_string(),
            "[\"a\",1]"
        );
        assert_eq!(
            map(vec![(StaticValue::str("k"), StaticValue::str("v"))]).to_string(),
            "{\"k\":\"v\"}"
        );
        assert_eq!(
            StaticValue::Html(Rc::from("<b>x</b>")).to_string(),
            "HTML(\"<b>x</b>\")"
        );
    }

    #[test]
    fn repr_quotes_top_level_strings() {
        assert_eq!(StaticValue::str("a\nb").repr(), "\"a\\nb\"");
        assert_eq!(StaticValue::Number(3.0).repr(), "3");
    }

    #[test]
    fn format_form() {
        assert_eq!(StaticValue::Unknown.format(), "(UnknownValue)");
        assert_eq!(StaticValue::str("x").format(), "\"x\"");
        assert_eq!(StaticValue::Html(Rc::from("<i>y</i>")).format(), "html(<i>y</i>)");
    }
}
