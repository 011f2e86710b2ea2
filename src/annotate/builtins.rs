use std::rc::Rc;

use crate::value::{NativeFn, StaticValue};

lazy_static! {
    /// The functions available in every root scope.
    pub(super) static ref BUILTINS: Vec<(&'static str, NativeFn)> = vec![
        ("len", len as NativeFn),
        ("sum", sum as NativeFn),
        ("range", range as NativeFn),
        ("html", html as NativeFn),
        ("str", str_ as NativeFn),
        ("repr", repr as NativeFn),
        ("join", join as NativeFn),
    ];
}

fn len(args: &[StaticValue]) -> StaticValue {
    match args.first() {
        Some(StaticValue::Str(s)) => StaticValue::Number(s.chars().count() as f64),
        Some(StaticValue::List(items)) => StaticValue::Number(items.len() as f64),
        Some(StaticValue::Map(pairs)) => StaticValue::Number(pairs.len() as f64),
        _ => StaticValue::Unknown,
    }
}

fn sum_numbers<'a, I: IntoIterator<Item = &'a StaticValue>>(values: I) -> StaticValue {
    let mut total = 0.0;
    for value in values {
        match value {
            StaticValue::Number(n) => total += n,
            _ => return StaticValue::Unknown,
        }
    }
    StaticValue::Number(total)
}

/// `sum(list)` adds up the elements of a single list argument; any other
/// argument count sums the arguments themselves.
fn sum(args: &[StaticValue]) -> StaticValue {
    if args.len() == 1 {
        match &args[0] {
            StaticValue::List(items) => sum_numbers(items.iter()),
            _ => StaticValue::Unknown,
        }
    } else {
        sum_numbers(args)
    }
}

/// `range(end)`, `range(start, end)`, or `range(start, end, step)`. A zero
/// or non-finite step would never terminate, so it yields `Unknown`.
fn range(args: &[StaticValue]) -> StaticValue {
    let number = |v: &StaticValue| match v {
        StaticValue::Number(n) => Some(*n),
        _ => None,
    };
    let (start, end, step) = match args {
        [a] => match number(a) {
            Some(end) => (0.0, end, 1.0),
            None => return StaticValue::Unknown,
        },
        [a, b] => match (number(a), number(b)) {
            (Some(start), Some(end)) => (start, end, 1.0),
            _ => return StaticValue::Unknown,
        },
        [a, b, c] => match (number(a), number(b), number(c)) {
            (Some(start), Some(end), Some(step)) => (start, end, step),
            _ => return StaticValue::Unknown,
        },
        _ => return StaticValue::Unknown,
    };
    if step == 0.0 || !step.is_finite() {
        return StaticValue::Unknown;
    }
    let mut values = vec![];
    let mut i = start;
    while if step > 0.0 { i < end } else { i > end } {
        values.push(StaticValue::Number(i));
        i += step;
    }
    StaticValue::List(Rc::new(values))
}

fn html(args: &[StaticValue]) -> StaticValue {
    match args {
        [StaticValue::Str(s)] => StaticValue::Html(s.clone()),
        _ => StaticValue::Unknown,
    }
}

fn str_(args: &[StaticValue]) -> StaticValue {
    match args {
        [value] => StaticValue::str(value.to_string()),
        _ => StaticValue::Unknown,
    }
}

fn repr(args: &[StaticValue]) -> StaticValue {
    match args {
        [value] => StaticValue::str(value.repr()),
        _ => StaticValue::Unknown,
    }
}

fn join(args: &[StaticValue]) -> StaticValue {
    match args {
        [StaticValue::Str(sep), StaticValue::List(items)] => {
            let parts = items.iter().map(|v| v.to_string()).collect::<Vec<_>>();
            StaticValue::str(parts.join(&**sep))
        }
        _ => StaticValue::Unknown,
    }
}
