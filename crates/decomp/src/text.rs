// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Key, string and number rendering.
//!
//! Floats use the shortest representation that round-trips, switching to
//! exponent form when the decimal exponent is below -4 or at least 6
//! (`1e+06`, `1.5e-07`, `123456`, `0.0001`). Non-finite floats have no
//! textual form in the output grammar and render as `null`.

use std::io::Write;

/// Append `s` quoted and escaped.
pub fn append_json_string(buf: &mut Vec<u8>, s: &str) {
    buf.reserve(s.len() + 2);
    buf.push(b'"');
    let bytes = s.as_bytes();
    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        let escape: &[u8] = match b {
            b'"' => b"\\\"",
            b'\\' => b"\\\\",
            b'\n' => b"\\n",
            b'\r' => b"\\r",
            b'\t' => b"\\t",
            0x08 => b"\\b",
            0x0c => b"\\f",
            0x00..=0x1f => {
                buf.extend_from_slice(&bytes[start..i]);
                let _ = write!(buf, "\\u{:04x}", b);
                start = i + 1;
                continue;
            }
            _ => continue,
        };
        buf.extend_from_slice(&bytes[start..i]);
        buf.extend_from_slice(escape);
        start = i + 1;
    }
    buf.extend_from_slice(&bytes[start..]);
    buf.push(b'"');
}

/// Key is a plain token (`[A-Za-z_][A-Za-z0-9_]*`) and needs no quotes.
pub fn is_token(key: &str) -> bool {
    let mut bytes = key.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_alphabetic() || b == b'_' => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Append an object key: bare when it is a plain token, quoted otherwise.
pub fn append_key(buf: &mut Vec<u8>, key: &str) {
    if is_token(key) {
        buf.extend_from_slice(key.as_bytes());
    } else {
        append_json_string(buf, key);
    }
}

/// Append an integer in decimal.
pub fn append_int<T: itoa::Integer>(buf: &mut Vec<u8>, v: T) {
    let mut digits = itoa::Buffer::new();
    buf.extend_from_slice(digits.format(v).as_bytes());
}

pub fn append_f64(buf: &mut Vec<u8>, v: f64) {
    if !v.is_finite() {
        buf.extend_from_slice(b"null");
        return;
    }
    let mut shortest = zmij::Buffer::new();
    append_general(buf, shortest.format(v));
}

/// Shortest form at single precision (`0.1f32` renders as `0.1`, not as
/// its widened `f64` digits).
pub fn append_f32(buf: &mut Vec<u8>, v: f32) {
    if !v.is_finite() {
        buf.extend_from_slice(b"null");
        return;
    }
    let mut shortest = zmij::Buffer::new();
    append_general(buf, shortest.format(v));
}

/// Re-lay a shortest rendering (`1000000.0`, `1.5e-7`, `0.0`) in %g style.
fn append_general(buf: &mut Vec<u8>, shortest: &str) {
    let (negative, body) = match shortest.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, shortest),
    };
    let (mantissa, exp) = match body.split_once(|c: char| c == 'e' || c == 'E') {
        Some((mantissa, exp)) => (mantissa, exp.parse::<i32>().unwrap_or(0)),
        None => (body, 0),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    let mut digits: Vec<u8> = int_part.bytes().chain(frac_part.bytes()).collect();
    // Decimal point position relative to the digit string.
    let mut dp = int_part.len() as i32 + exp;

    if negative {
        buf.push(b'-');
    }
    let leading = digits.iter().take_while(|&&d| d == b'0').count();
    if leading == digits.len() {
        buf.push(b'0');
        return;
    }
    digits.drain(..leading);
    dp -= leading as i32;
    while digits.last() == Some(&b'0') {
        digits.pop();
    }

    let exp = dp - 1;
    if exp < -4 || exp >= 6 {
        buf.push(digits[0]);
        if digits.len() > 1 {
            buf.push(b'.');
            buf.extend_from_slice(&digits[1..]);
        }
        buf.push(b'e');
        buf.push(if exp < 0 { b'-' } else { b'+' });
        let abs = exp.unsigned_abs();
        if abs < 10 {
            buf.push(b'0');
        }
        append_int(buf, abs);
        return;
    }

    if dp <= 0 {
        buf.extend_from_slice(b"0.");
        buf.resize(buf.len() + dp.unsigned_abs() as usize, b'0');
        buf.extend_from_slice(&digits);
    } else {
        let dp = dp as usize;
        if dp >= digits.len() {
            buf.extend_from_slice(&digits);
            buf.resize(buf.len() + dp - digits.len(), b'0');
        } else {
            buf.extend_from_slice(&digits[..dp]);
            buf.push(b'.');
            buf.extend_from_slice(&digits[dp..]);
        }
    }
}
