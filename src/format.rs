//! `%`-style formatting of set-command templates such as `"SOUR:VOLT %g"`.
//!
//! Supported conversions are `%s %d %i %f %F %e %E %g %G` and `%%`, with the
//! `- + 0 space` flags, a width and a `.precision`. A [`Value::List`] spreads
//! across consecutive placeholders, a scalar fills exactly one.

use std::{iter::Peekable, str::Chars};

use crate::{
    error::{Error, Result, ValidationError},
    value::Value,
};

#[derive(Debug, Default)]
struct Spec {
    left: bool,
    plus: bool,
    space: bool,
    zero: bool,
    width: usize,
    precision: Option<usize>,
    conversion: char,
}

pub fn format_command(template: &str, value: &Value) -> Result<String> {
    let malformed = || Error::Template(template.to_string());
    let mut args = match value {
        Value::List(items) => items.iter().collect::<Vec<_>>(),
        other => vec![other],
    }
    .into_iter();

    let mut out = String::with_capacity(template.len() + 16);
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let spec = parse_spec(&mut chars).ok_or_else(malformed)?;
        if spec.conversion == '%' {
            out.push('%');
            continue;
        }
        let arg = args.next().ok_or_else(malformed)?;
        let (sign, body, numeric) = convert(&spec, arg)?;
        pad(&mut out, &spec, sign, &body, numeric);
    }
    if args.next().is_some() {
        return Err(malformed());
    }
    Ok(out)
}

fn parse_spec(chars: &mut Peekable<Chars<'_>>) -> Option<Spec> {
    let mut spec = Spec::default();
    while let Some(&c) = chars.peek() {
        match c {
            '-' => spec.left = true,
            '+' => spec.plus = true,
            ' ' => spec.space = true,
            '0' => spec.zero = true,
            '#' => {}
            _ => break,
        }
        chars.next();
    }
    spec.width = digits(chars).unwrap_or(0);
    if chars.peek() == Some(&'.') {
        chars.next();
        spec.precision = Some(digits(chars).unwrap_or(0));
    }
    spec.conversion = chars.next()?;
    match spec.conversion {
        's' | 'd' | 'i' | 'f' | 'F' | 'e' | 'E' | 'g' | 'G' | '%' => Some(spec),
        _ => None,
    }
}

fn digits(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut n: Option<usize> = None;
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        n = Some(n.unwrap_or(0) * 10 + d as usize);
        chars.next();
    }
    n
}

fn convert(spec: &Spec, arg: &Value) -> Result<(&'static str, String, bool)> {
    match spec.conversion {
        's' => {
            let mut s = arg.to_string();
            if let Some(p) = spec.precision {
                s = s.chars().take(p).collect();
            }
            Ok(("", s, false))
        }
        'd' | 'i' => {
            let i = match arg {
                Value::Int(i) => *i,
                Value::Bool(b) => *b as i64,
                Value::Float(x) if x.is_finite() => x.trunc() as i64,
                other => return Err(wrong_type("integer", other)),
            };
            Ok((sign(spec, i < 0), i.unsigned_abs().to_string(), true))
        }
        conversion => {
            let x = match arg {
                Value::Bool(b) => *b as i64 as f64,
                other => other.as_f64().ok_or_else(|| wrong_type("float", other))?,
            };
            let upper = conversion.is_ascii_uppercase();
            let negative = x.is_sign_negative() && !x.is_nan();
            let body = if !x.is_finite() {
                let word = if x.is_nan() { "nan" } else { "inf" };
                word.to_string()
            } else {
                let precision = spec.precision.unwrap_or(6);
                match conversion.to_ascii_lowercase() {
                    'f' => format!("{:.*}", precision, x.abs()),
                    'e' => exponential(x.abs(), precision),
                    _ => general(x.abs(), precision),
                }
            };
            let body = if upper { body.to_uppercase() } else { body };
            Ok((sign(spec, negative), body, x.is_finite()))
        }
    }
}

fn wrong_type(expected: &'static str, found: &Value) -> Error {
    ValidationError::WrongType {
        expected,
        found: format!("{} '{}'", found.type_name(), found),
    }
    .into()
}

fn sign(spec: &Spec, negative: bool) -> &'static str {
    if negative {
        "-"
    } else if spec.plus {
        "+"
    } else if spec.space {
        " "
    } else {
        ""
    }
}

fn pad(out: &mut String, spec: &Spec, sign: &str, body: &str, numeric: bool) {
    let len = sign.len() + body.len();
    let fill = spec.width.saturating_sub(len);
    if spec.left {
        out.push_str(sign);
        out.push_str(body);
        out.extend(std::iter::repeat(' ').take(fill));
    } else if spec.zero && numeric {
        out.push_str(sign);
        out.extend(std::iter::repeat('0').take(fill));
        out.push_str(body);
    } else {
        out.extend(std::iter::repeat(' ').take(fill));
        out.push_str(sign);
        out.push_str(body);
    }
}

fn split_exponent(sci: &str) -> (&str, i32) {
    match sci.find('e') {
        Some(idx) => (&sci[..idx], sci[idx + 1..].parse().unwrap_or(0)),
        None => (sci, 0),
    }
}

fn exponent_suffix(exp: i32) -> String {
    format!("e{}{:02}", if exp < 0 { '-' } else { '+' }, exp.abs())
}

fn exponential(x: f64, precision: usize) -> String {
    let sci = format!("{:.*e}", precision, x);
    let (mantissa, exp) = split_exponent(&sci);
    format!("{}{}", mantissa, exponent_suffix(exp))
}

fn strip_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

fn general(x: f64, precision: usize) -> String {
    let p = precision.max(1);
    if x == 0.0 {
        return "0".to_string();
    }
    let sci = format!("{:.*e}", p - 1, x);
    let (mantissa, exp) = split_exponent(&sci);
    if exp < -4 || exp >= p as i32 {
        format!("{}{}", strip_zeros(mantissa), exponent_suffix(exp))
    } else {
        let decimals = (p as i32 - 1 - exp) as usize;
        strip_zeros(&format!("{:.*}", decimals, x)).to_string()
    }
}
