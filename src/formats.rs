//! String-format predicates.
//!
//! Non-string instances always pass format validation, and unknown format
//! names never cause failure; both rules live in the `format` keyword, so
//! the predicates here only ever see strings.
use std::{
    net::{Ipv4Addr, Ipv6Addr},
    str::FromStr,
};

use email_address::EmailAddress;
use fancy_regex::Regex;
use once_cell::sync::Lazy;

use crate::ecma;

/// A custom format validator.
pub trait Format: Send + Sync + 'static {
    fn is_valid(&self, value: &str) -> bool;
}

impl<F> Format for F
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    #[inline]
    fn is_valid(&self, value: &str) -> bool {
        self(value)
    }
}

pub(crate) type FormatCheck = fn(&str) -> bool;

/// Look up a built-in format predicate.
pub(crate) fn builtin(name: &str) -> Option<FormatCheck> {
    Some(match name {
        "date" => is_valid_date,
        "time" => is_valid_time,
        "date-time" => is_valid_date_time,
        "duration" => is_valid_duration,
        "email" => is_valid_email,
        "idn-email" => is_valid_idn_email,
        "hostname" => is_valid_hostname,
        "idn-hostname" => is_valid_idn_hostname,
        "ipv4" => is_valid_ipv4,
        "ipv6" => is_valid_ipv6,
        "uri" => is_valid_uri,
        "uri-reference" => is_valid_uri_reference,
        "iri" => is_valid_iri,
        "iri-reference" => is_valid_iri_reference,
        "uri-template" => is_valid_uri_template,
        "uuid" => is_valid_uuid,
        "json-pointer" => is_valid_json_pointer,
        "relative-json-pointer" => is_valid_relative_json_pointer,
        "regex" => is_valid_regex,
        _ => return None,
    })
}

static JSON_POINTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(/(([^/~])|(~[01]))*)*\z").expect("Is a valid regex"));
static RELATIVE_JSON_POINTER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:0|[1-9][0-9]*)(?:#|(?:/(?:[^~/]|~0|~1)*)*)\z").expect("Is a valid regex")
});
static URI_TEMPLATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(?:(?:[^\x00-\x20"'<>%\\^`{|}]|%[0-9a-f]{2})|\{[+#./;?&=,!@|]?(?:[a-z0-9_]|%[0-9a-f]{2})+(?::[1-9][0-9]{0,3}|\*)?(?:,(?:[a-z0-9_]|%[0-9a-f]{2})+(?::[1-9][0-9]{0,3}|\*)?)*})*\z"#,
    )
    .expect("Is a valid regex")
});

fn is_valid_date(date: &str) -> bool {
    if date.len() != 10 {
        return false;
    }
    let bytes = date.as_bytes();
    if bytes[4] != b'-'
        || bytes[7] != b'-'
        || !bytes[..4].iter().all(u8::is_ascii_digit)
        || !bytes[5..7].iter().all(u8::is_ascii_digit)
        || !bytes[8..].iter().all(u8::is_ascii_digit)
    {
        return false;
    }
    let year = (bytes[0] as u16 - b'0' as u16) * 1000
        + (bytes[1] as u16 - b'0' as u16) * 100
        + (bytes[2] as u16 - b'0' as u16) * 10
        + (bytes[3] as u16 - b'0' as u16);
    let month = (bytes[5] - b'0') * 10 + (bytes[6] - b'0');
    if !(1..=12).contains(&month) {
        return false;
    }
    let day = (bytes[8] - b'0') * 10 + (bytes[9] - b'0');
    if day == 0 {
        return false;
    }
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => day <= 31,
        4 | 6 | 9 | 11 => day <= 30,
        2 => {
            if is_leap_year(year) {
                day <= 29
            } else {
                day <= 28
            }
        }
        _ => false,
    }
}

#[inline]
fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// RFC 3339 `full-time`. A leap second is accepted only when the
/// offset-adjusted time reads 23:59.
fn is_valid_time(item: &str) -> bool {
    let bytes = item.as_bytes();
    let len = bytes.len();
    // Minimum valid time is "HH:MM:SSZ"
    if len < 9 {
        return false;
    }
    if !bytes[0].is_ascii_digit()
        || !bytes[1].is_ascii_digit()
        || bytes[2] != b':'
        || !bytes[3].is_ascii_digit()
        || !bytes[4].is_ascii_digit()
        || bytes[5] != b':'
        || !bytes[6].is_ascii_digit()
        || !bytes[7].is_ascii_digit()
    {
        return false;
    }
    let hh = (bytes[0] - b'0') * 10 + (bytes[1] - b'0');
    let mm = (bytes[3] - b'0') * 10 + (bytes[4] - b'0');
    let ss = (bytes[6] - b'0') * 10 + (bytes[7] - b'0');
    if hh > 23 || mm > 59 || ss > 60 {
        return false;
    }
    let mut i = 8;
    if i < len && bytes[i] == b'.' {
        i += 1;
        let mut has_digit = false;
        while i < len && bytes[i].is_ascii_digit() {
            has_digit = true;
            i += 1;
        }
        if !has_digit {
            return false;
        }
    }
    if i == len {
        return false;
    }
    match bytes[i] {
        b'Z' | b'z' => i == len - 1 && (ss != 60 || (hh == 23 && mm == 59)),
        b'+' | b'-' => {
            if len - i != 6 {
                return false;
            }
            let sign = bytes[i];
            i += 1;
            if !bytes[i].is_ascii_digit()
                || !bytes[i + 1].is_ascii_digit()
                || bytes[i + 2] != b':'
                || !bytes[i + 3].is_ascii_digit()
                || !bytes[i + 4].is_ascii_digit()
            {
                return false;
            }
            let offset_hh = (bytes[i] - b'0') * 10 + (bytes[i + 1] - b'0');
            let offset_mm = (bytes[i + 3] - b'0') * 10 + (bytes[i + 4] - b'0');
            if offset_hh > 23 || offset_mm > 59 {
                return false;
            }
            if ss == 60 {
                let mut utc_hh = i32::from(hh);
                let mut utc_mm = i32::from(mm);
                if sign == b'+' {
                    utc_hh -= i32::from(offset_hh);
                    utc_mm -= i32::from(offset_mm);
                } else {
                    utc_hh += i32::from(offset_hh);
                    utc_mm += i32::from(offset_mm);
                }
                utc_hh += utc_mm / 60;
                utc_mm %= 60;
                if utc_mm < 0 {
                    utc_mm += 60;
                    utc_hh -= 1;
                }
                utc_hh = (utc_hh + 24) % 24;
                utc_hh == 23 && utc_mm == 59
            } else {
                true
            }
        }
        _ => false,
    }
}

fn is_valid_date_time(item: &str) -> bool {
    item.len() > 11
        && matches!(item.as_bytes()[10], b'T' | b't')
        && is_valid_date(&item[..10])
        && is_valid_time(&item[11..])
}

/// ISO 8601 duration: `P[nY][nM][nW][nD][T[nH][nM][nS]]`, integers only,
/// with `W` exclusive of every other designator.
fn is_valid_duration(item: &str) -> bool {
    let Some(rest) = item.strip_prefix('P') else {
        return false;
    };
    if rest.is_empty() {
        return false;
    }
    fn number<'a>(input: &'a str) -> Option<(&'a str, &'a str)> {
        let digits = input.len() - input.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 {
            None
        } else {
            Some((&input[..digits], &input[digits..]))
        }
    }
    if let Some(weeks) = rest.strip_suffix('W') {
        return !weeks.is_empty() && weeks.bytes().all(|b| b.is_ascii_digit());
    }
    let (date_part, time_part) = match rest.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (rest, None),
    };
    let mut seen_any = false;
    let mut cursor = date_part;
    for designator in ['Y', 'M', 'D'] {
        if cursor.is_empty() {
            break;
        }
        if let Some((_, after)) = number(cursor) {
            if after.starts_with(designator) {
                cursor = &after[1..];
                seen_any = true;
            }
        } else {
            return false;
        }
    }
    if !cursor.is_empty() {
        return false;
    }
    if let Some(time) = time_part {
        if time.is_empty() {
            return false;
        }
        let mut seen_time = false;
        let mut cursor = time;
        for designator in ['H', 'M', 'S'] {
            if cursor.is_empty() {
                break;
            }
            if let Some((_, after)) = number(cursor) {
                if after.starts_with(designator) {
                    cursor = &after[1..];
                    seen_time = true;
                }
            } else {
                return false;
            }
        }
        if !cursor.is_empty() || !seen_time {
            return false;
        }
        seen_any = true;
    }
    seen_any
}

fn is_valid_ip_literal(domain: &str) -> bool {
    if let Some(address) = domain.strip_prefix("IPv6:") {
        address.parse::<Ipv6Addr>().is_ok()
    } else {
        domain.parse::<Ipv4Addr>().is_ok()
    }
}

fn is_valid_email(email: &str) -> bool {
    if !email.is_ascii() {
        return false;
    }
    let Ok(parsed) = EmailAddress::from_str(email) else {
        return false;
    };
    let domain = parsed.domain();
    if let Some(literal) = domain.strip_prefix('[').and_then(|d| d.strip_suffix(']')) {
        is_valid_ip_literal(literal)
    } else {
        is_valid_hostname(domain)
    }
}

fn is_valid_idn_email(email: &str) -> bool {
    let Ok(parsed) = EmailAddress::from_str(email) else {
        return false;
    };
    let domain = parsed.domain();
    if let Some(literal) = domain.strip_prefix('[').and_then(|d| d.strip_suffix(']')) {
        is_valid_ip_literal(literal)
    } else {
        is_valid_idn_hostname(domain)
    }
}

/// RFC 1123 hostname with the RFC 5891 check on decoded `xn--` labels.
fn is_valid_hostname(hostname: &str) -> bool {
    if hostname.is_empty()
        || hostname.len() > 253
        || hostname.starts_with('.')
        || hostname.ends_with('.')
    {
        return false;
    }
    hostname.split('.').all(is_valid_label)
}

fn is_valid_label(label: &str) -> bool {
    if label.is_empty()
        || label.len() > 63
        || label.starts_with('-')
        || label.ends_with('-')
        || !label
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-')
    {
        return false;
    }
    if let Some(encoded) = label
        .strip_prefix("xn--")
        .or_else(|| label.strip_prefix("XN--"))
    {
        let Some(decoded) = idna::punycode::decode_to_string(encoded) else {
            return false;
        };
        let chars = decoded.chars().collect::<Vec<_>>();
        if chars.len() >= 4 && chars[2] == '-' && chars[3] == '-' {
            return false;
        }
    }
    true
}

fn is_valid_idn_hostname(hostname: &str) -> bool {
    match idna::domain_to_ascii(hostname) {
        Ok(ascii) => is_valid_hostname(&ascii),
        Err(_) => false,
    }
}

fn is_valid_ipv4(item: &str) -> bool {
    Ipv4Addr::from_str(item).is_ok()
}

fn is_valid_ipv6(item: &str) -> bool {
    Ipv6Addr::from_str(item).is_ok()
}

fn is_valid_uri(item: &str) -> bool {
    fluent_uri::Uri::parse(item).is_ok()
}

fn is_valid_uri_reference(item: &str) -> bool {
    fluent_uri::UriRef::parse(item).is_ok()
}

fn is_valid_iri(item: &str) -> bool {
    fluent_uri::Iri::parse(item).is_ok()
}

fn is_valid_iri_reference(item: &str) -> bool {
    fluent_uri::IriRef::parse(item).is_ok()
}

fn is_valid_uri_template(item: &str) -> bool {
    URI_TEMPLATE_RE
        .is_match(item)
        .expect("Simple URI_TEMPLATE_RE pattern")
}

fn is_valid_uuid(item: &str) -> bool {
    let bytes = item.as_bytes();
    bytes.len() == 36
        && bytes.iter().enumerate().all(|(i, b)| match i {
            8 | 13 | 18 | 23 => *b == b'-',
            _ => b.is_ascii_hexdigit(),
        })
}

fn is_valid_json_pointer(item: &str) -> bool {
    JSON_POINTER_RE
        .is_match(item)
        .expect("Simple JSON_POINTER_RE pattern")
}

fn is_valid_relative_json_pointer(item: &str) -> bool {
    RELATIVE_JSON_POINTER_RE
        .is_match(item)
        .expect("Simple RELATIVE_JSON_POINTER_RE pattern")
}

/// ECMA 262 validity: translatable and compilable by a backtracking engine.
fn is_valid_regex(item: &str) -> bool {
    match ecma::translate(item) {
        Ok(translated) => fancy_regex::Regex::new(&translated).is_ok(),
        Err(_) => false,
    }
}
