//! Constant evaluation of expression trees
//!
//! Folds expressions made of literals and bound parameters the way MySQL
//! evaluates them, including three-valued NULL logic. Anything that needs a
//! row, a session or a function implementation is [`Evaluation::Unevaluatable`].

use std::cmp::Ordering;

use super::{BinaryOp, CaseExpr, Expr, InSet, IsTest, Literal, PolyadicOp, TernaryOp, UnaryOp};
use crate::types::Value;

/// Result of constant evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Value(Value),
    Unevaluatable,
}

impl Evaluation {
    pub fn value(self) -> Option<Value> {
        match self {
            Evaluation::Value(v) => Some(v),
            Evaluation::Unevaluatable => None,
        }
    }
}

impl Expr {
    /// Evaluate against bound arguments; `?` number n reads `args[n - 1]`
    pub fn evaluate(&self, args: &[Value]) -> Evaluation {
        match eval(self, args) {
            Some(v) => Evaluation::Value(v),
            None => Evaluation::Unevaluatable,
        }
    }
}

fn eval(expr: &Expr, args: &[Value]) -> Option<Value> {
    match expr {
        Expr::Literal(lit) => eval_literal(lit),
        Expr::ParamMarker(p) => args.get((p.index as usize).checked_sub(1)?).cloned(),
        Expr::Unary { op, operand } => apply_unary_op(*op, eval(operand, args)?),
        Expr::Binary { op, left, right } => {
            let left = eval(left, args)?;
            let right = eval(right, args)?;
            apply_binary_op(&left, *op, &right)
        }
        Expr::Ternary { op, first, second, third } => {
            let a = eval(first, args)?;
            let b = eval(second, args)?;
            let c = eval(third, args)?;
            apply_ternary_op(*op, &a, &b, &c)
        }
        Expr::Polyadic { op, operands } => {
            let mut values = Vec::with_capacity(operands.len());
            for operand in operands {
                values.push(eval(operand, args)?);
            }
            Some(apply_polyadic_op(*op, &values))
        }
        Expr::Is { operand, not, test } => {
            let v = eval(operand, args)?;
            let result = match test {
                IsTest::Null | IsTest::Unknown => v.is_null(),
                IsTest::True => !v.is_null() && v.is_truthy(),
                IsTest::False => !v.is_null() && !v.is_truthy(),
            };
            Some(Value::Boolean(result != *not))
        }
        Expr::In { operand, not, set: InSet::List(list) } => {
            let v = eval(operand, args)?;
            let mut items = Vec::with_capacity(list.len());
            for item in list {
                items.push(eval(item, args)?);
            }
            Some(match in_list(&v, &items) {
                Value::Boolean(b) => Value::Boolean(b != *not),
                other => other,
            })
        }
        Expr::Case(case) => eval_case(case, args),
        Expr::Collate { operand, .. } => eval(operand, args),
        _ => None,
    }
}

fn eval_literal(lit: &Literal) -> Option<Value> {
    Some(match lit {
        Literal::Null => Value::Null,
        Literal::Boolean(b) => Value::Boolean(*b),
        Literal::Integer(i) => match i64::try_from(*i) {
            Ok(v) => Value::Integer(v),
            Err(_) => Value::Float(*i as f64),
        },
        Literal::Decimal(text) => Value::Float(text.parse().ok()?),
        Literal::String(s) => Value::String(s.value.clone()),
        Literal::Hex { digits, .. } => Value::Bytes(hex_bytes(digits)?),
        Literal::Bit { digits, .. } => Value::Bytes(bit_bytes(digits)),
    })
}

/// Hex digits to bytes; an odd count gets a leading zero nibble
fn hex_bytes(digits: &str) -> Option<Vec<u8>> {
    let padded;
    let digits = if digits.len() % 2 == 1 {
        padded = format!("0{}", digits);
        padded.as_str()
    } else {
        digits
    };
    (0..digits.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&digits[i..i + 2], 16).ok())
        .collect()
}

fn bit_bytes(digits: &str) -> Vec<u8> {
    let bits: Vec<u8> = digits.bytes().map(|b| b - b'0').collect();
    let lead = (8 - bits.len() % 8) % 8;
    let mut out = Vec::with_capacity((bits.len() + lead) / 8);
    let mut acc = 0u8;
    for (i, bit) in std::iter::repeat(0).take(lead).chain(bits).enumerate() {
        acc = (acc << 1) | bit;
        if i % 8 == 7 {
            out.push(acc);
            acc = 0;
        }
    }
    out
}

fn apply_unary_op(op: UnaryOp, v: Value) -> Option<Value> {
    if v.is_null() {
        return Some(Value::Null);
    }
    match op {
        UnaryOp::Minus => match v {
            Value::Integer(i) => Some(match i.checked_neg() {
                Some(n) => Value::Integer(n),
                None => Value::Float(-(i as f64)),
            }),
            other => Some(Value::Float(-other.as_f64()?)),
        },
        UnaryOp::BitNot => Some(Value::Integer(!to_bits(&v)? as i64)),
        UnaryOp::Not | UnaryOp::Bang => Some(Value::Boolean(!v.is_truthy())),
        UnaryOp::Binary => Some(v),
    }
}

/// Apply a binary operator, MySQL style: NULL in, NULL out (except `<=>`)
pub fn apply_binary_op(left: &Value, op: BinaryOp, right: &Value) -> Option<Value> {
    if op == BinaryOp::NullSafeEqual {
        return Some(Value::Boolean(match (left.is_null(), right.is_null()) {
            (true, true) => true,
            (false, false) => compare(left, right) == Some(Ordering::Equal),
            _ => false,
        }));
    }
    if left.is_null() || right.is_null() {
        return match op {
            BinaryOp::Assign => None,
            _ => Some(Value::Null),
        };
    }

    let ordering = || compare(left, right);
    match op {
        BinaryOp::Equal => Some(Value::Boolean(ordering()? == Ordering::Equal)),
        BinaryOp::NotEqual => Some(Value::Boolean(ordering()? != Ordering::Equal)),
        BinaryOp::Less => Some(Value::Boolean(ordering()? == Ordering::Less)),
        BinaryOp::LessEqual => Some(Value::Boolean(ordering()? != Ordering::Greater)),
        BinaryOp::Greater => Some(Value::Boolean(ordering()? == Ordering::Greater)),
        BinaryOp::GreaterEqual => Some(Value::Boolean(ordering()? != Ordering::Less)),
        BinaryOp::Xor => Some(Value::Boolean(left.is_truthy() != right.is_truthy())),
        BinaryOp::Plus => apply_arithmetic(left, right, i64::checked_add, |a, b| a + b),
        BinaryOp::Minus => apply_arithmetic(left, right, i64::checked_sub, |a, b| a - b),
        BinaryOp::Multiply => apply_arithmetic(left, right, i64::checked_mul, |a, b| a * b),
        BinaryOp::Divide => {
            let divisor = right.as_f64()?;
            if divisor == 0.0 {
                return Some(Value::Null);
            }
            Some(Value::Float(left.as_f64()? / divisor))
        }
        BinaryOp::IntDivide => {
            let divisor = right.as_f64()?;
            if divisor == 0.0 {
                return Some(Value::Null);
            }
            Some(Value::Integer((left.as_f64()? / divisor).trunc() as i64))
        }
        BinaryOp::Modulo => {
            if right.as_f64()? == 0.0 {
                return Some(Value::Null);
            }
            match (left, right) {
                (Value::Integer(a), Value::Integer(b)) => Some(Value::Integer(a.checked_rem(*b)?)),
                _ => Some(Value::Float(left.as_f64()? % right.as_f64()?)),
            }
        }
        BinaryOp::BitOr => Some(Value::Integer((to_bits(left)? | to_bits(right)?) as i64)),
        BinaryOp::BitAnd => Some(Value::Integer((to_bits(left)? & to_bits(right)?) as i64)),
        BinaryOp::BitXor => Some(Value::Integer((to_bits(left)? ^ to_bits(right)?) as i64)),
        BinaryOp::ShiftLeft => {
            let n = to_bits(right)?;
            Some(Value::Integer(if n >= 64 { 0 } else { (to_bits(left)? << n) as i64 }))
        }
        BinaryOp::ShiftRight => {
            let n = to_bits(right)?;
            Some(Value::Integer(if n >= 64 { 0 } else { (to_bits(left)? >> n) as i64 }))
        }
        BinaryOp::Like | BinaryOp::NotLike => {
            let matched = match_like(&text(left), &text(right), '\\');
            Some(Value::Boolean(matched == (op == BinaryOp::Like)))
        }
        BinaryOp::Regexp | BinaryOp::NotRegexp | BinaryOp::Assign | BinaryOp::NullSafeEqual => None,
    }
}

fn apply_ternary_op(op: TernaryOp, a: &Value, b: &Value, c: &Value) -> Option<Value> {
    if a.is_null() || b.is_null() || c.is_null() {
        return Some(Value::Null);
    }
    let result = match op {
        TernaryOp::Between | TernaryOp::NotBetween => {
            let inside = compare(a, b)? != Ordering::Less && compare(a, c)? != Ordering::Greater;
            inside == (op == TernaryOp::Between)
        }
        TernaryOp::LikeEscape | TernaryOp::NotLikeEscape => {
            let escape = text(c).chars().next().unwrap_or('\\');
            match_like(&text(a), &text(b), escape) == (op == TernaryOp::LikeEscape)
        }
    };
    Some(Value::Boolean(result))
}

fn apply_polyadic_op(op: PolyadicOp, values: &[Value]) -> Value {
    // a decisive operand wins over NULL
    let decisive = op == PolyadicOp::Or;
    let mut saw_null = false;
    for v in values {
        if v.is_null() {
            saw_null = true;
        } else if v.is_truthy() == decisive {
            return Value::Boolean(decisive);
        }
    }
    if saw_null {
        Value::Null
    } else {
        Value::Boolean(!decisive)
    }
}

fn in_list(v: &Value, items: &[Value]) -> Value {
    if v.is_null() {
        return Value::Null;
    }
    let mut saw_null = false;
    for item in items {
        if item.is_null() {
            saw_null = true;
        } else if compare(v, item) == Some(Ordering::Equal) {
            return Value::Boolean(true);
        }
    }
    if saw_null {
        Value::Null
    } else {
        Value::Boolean(false)
    }
}

fn eval_case(case: &CaseExpr, args: &[Value]) -> Option<Value> {
    let operand = match &case.operand {
        Some(e) => Some(eval(e, args)?),
        None => None,
    };
    for (when, then) in &case.whens {
        let w = eval(when, args)?;
        let hit = match &operand {
            Some(o) => !o.is_null() && !w.is_null() && compare(o, &w) == Some(Ordering::Equal),
            None => !w.is_null() && w.is_truthy(),
        };
        if hit {
            return eval(then, args);
        }
    }
    match &case.else_result {
        Some(e) => eval(e, args),
        None => Some(Value::Null),
    }
}

/// Compare two non-NULL values; strings against numbers compare numerically
fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
        _ => left.partial_cmp(right),
    }
}

fn apply_arithmetic(
    left: &Value,
    right: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Option<Value> {
    if let (Value::Integer(a), Value::Integer(b)) = (left, right) {
        if let Some(v) = int_op(*a, *b) {
            return Some(Value::Integer(v));
        }
    }
    Some(Value::Float(float_op(left.as_f64()?, right.as_f64()?)))
}

/// Unsigned 64-bit view used by bit operators
fn to_bits(v: &Value) -> Option<u64> {
    match v {
        Value::Integer(i) => Some(*i as u64),
        other => Some(other.as_f64()?.round() as i64 as u64),
    }
}

fn text(v: &Value) -> String {
    match v {
        Value::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
        other => other.to_string(),
    }
}

/// LIKE pattern matching (`%`, `_` and an escape character)
fn match_like(s: &str, pattern: &str, escape: char) -> bool {
    let s_chars: Vec<char> = s.chars().collect();
    let p_chars: Vec<char> = pattern.chars().collect();
    match_like_recursive(&s_chars, &p_chars, escape)
}

fn match_like_recursive(s: &[char], p: &[char], escape: char) -> bool {
    if p.is_empty() {
        return s.is_empty();
    }
    match p[0] {
        '%' => (0..=s.len()).any(|i| match_like_recursive(&s[i..], &p[1..], escape)),
        '_' => !s.is_empty() && match_like_recursive(&s[1..], &p[1..], escape),
        c if c == escape && p.len() > 1 => {
            !s.is_empty()
                && s[0].to_lowercase().eq(p[1].to_lowercase())
                && match_like_recursive(&s[1..], &p[2..], escape)
        }
        c => {
            !s.is_empty()
                && s[0].to_lowercase().eq(c.to_lowercase())
                && match_like_recursive(&s[1..], &p[1..], escape)
        }
    }
}
