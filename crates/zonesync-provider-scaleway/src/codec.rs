// # Simple-type codec
//
// Fixed-grammar conversion between the `data` string of a flat record and
// a typed canonical value. Every record type maps to one `Codec` entry;
// the table is a `match` so adding a type without a codec fails to compile.
//
// Decoding is lenient: a `data` string that does not split into the
// expected number of fields, or whose numeric fields do not parse, yields
// `None` and the caller skips it.

use tracing::warn;
use zonesync_core::record::{CaaValue, LocValue, MxValue, NaptrValue, SrvValue, SshfpValue};
use zonesync_core::{Error, RecordType, RecordValue, Result};

use crate::wire::WireRecord;

/// Decode/encode pair for one record type
#[derive(Clone, Copy)]
pub struct Codec {
    pub decode: fn(&str) -> Option<RecordValue>,
    pub encode: fn(&RecordValue) -> Option<String>,
}

/// Codec table entry for `record_type`
pub fn codec_for(record_type: RecordType) -> Codec {
    match record_type {
        RecordType::A
        | RecordType::Aaaa
        | RecordType::Alias
        | RecordType::Cname
        | RecordType::Ns
        | RecordType::Ptr
        | RecordType::Spf
        | RecordType::Txt => Codec {
            decode: decode_text,
            encode: encode_text,
        },
        RecordType::Caa => Codec {
            decode: decode_caa,
            encode: encode_caa,
        },
        RecordType::Loc => Codec {
            decode: decode_loc,
            encode: encode_loc,
        },
        RecordType::Mx => Codec {
            decode: decode_mx,
            encode: encode_mx,
        },
        RecordType::Naptr => Codec {
            decode: decode_naptr,
            encode: encode_naptr,
        },
        RecordType::Srv => Codec {
            decode: decode_srv,
            encode: encode_srv,
        },
        RecordType::Sshfp => Codec {
            decode: decode_sshfp,
            encode: encode_sshfp,
        },
    }
}

/// Decode the values of one record set, skipping malformed entries
///
/// Single-value types keep only the first decodable record.
pub fn decode(record_type: RecordType, records: &[WireRecord]) -> Vec<RecordValue> {
    let codec = codec_for(record_type);
    let mut values = Vec::new();

    for record in records {
        match (codec.decode)(&record.data) {
            Some(value) => values.push(value),
            None => warn!(
                "Skipping malformed {} record {}: {:?}",
                record_type, record.name, record.data
            ),
        }
        if record_type.is_single_value() && !values.is_empty() {
            break;
        }
    }

    values
}

/// Encode one canonical value into its `data` string
pub fn encode_value(record_type: RecordType, value: &RecordValue) -> Result<String> {
    (codec_for(record_type).encode)(value).ok_or_else(|| {
        Error::invalid_input(format!(
            "{} record cannot hold value {:?}",
            record_type, value
        ))
    })
}

/// Split into exactly `n` space-separated fields, the last one taking the rest
fn fields(data: &str, n: usize) -> Option<Vec<&str>> {
    let parts: Vec<&str> = data.splitn(n, ' ').collect();
    (parts.len() == n).then_some(parts)
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s)
}

fn direction(s: &str, allowed: [char; 2]) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if allowed.contains(&c) => Some(c),
        _ => None,
    }
}

fn decode_text(data: &str) -> Option<RecordValue> {
    Some(RecordValue::text(data))
}

fn encode_text(value: &RecordValue) -> Option<String> {
    value.as_text().map(str::to_string)
}

fn decode_caa(data: &str) -> Option<RecordValue> {
    let f = fields(data, 3)?;
    Some(RecordValue::Caa(CaaValue {
        flags: f[0].parse().ok()?,
        tag: f[1].to_string(),
        value: unquote(f[2]).to_string(),
    }))
}

fn encode_caa(value: &RecordValue) -> Option<String> {
    match value {
        RecordValue::Caa(v) => Some(format!("{} {} \"{}\"", v.flags, v.tag, v.value)),
        _ => None,
    }
}

fn decode_loc(data: &str) -> Option<RecordValue> {
    let stripped = data.replace('m', "");
    let f = fields(&stripped, 12)?;
    Some(RecordValue::Loc(LocValue {
        lat_degrees: f[0].parse().ok()?,
        lat_minutes: f[1].parse().ok()?,
        lat_seconds: f[2].parse().ok()?,
        lat_direction: direction(f[3], ['N', 'S'])?,
        long_degrees: f[4].parse().ok()?,
        long_minutes: f[5].parse().ok()?,
        long_seconds: f[6].parse().ok()?,
        long_direction: direction(f[7], ['E', 'W'])?,
        altitude: f[8].parse().ok()?,
        size: f[9].parse().ok()?,
        precision_horz: f[10].parse().ok()?,
        precision_vert: f[11].parse().ok()?,
    }))
}

fn encode_loc(value: &RecordValue) -> Option<String> {
    match value {
        RecordValue::Loc(v) => Some(format!(
            "{} {} {:.3} {} {} {} {:.3} {} {:.2}m {:.2}m {:.2}m {:.2}m",
            v.lat_degrees,
            v.lat_minutes,
            v.lat_seconds,
            v.lat_direction,
            v.long_degrees,
            v.long_minutes,
            v.long_seconds,
            v.long_direction,
            v.altitude,
            v.size,
            v.precision_horz,
            v.precision_vert
        )),
        _ => None,
    }
}

fn decode_mx(data: &str) -> Option<RecordValue> {
    let f = fields(data, 2)?;
    Some(RecordValue::Mx(MxValue {
        preference: f[0].parse().ok()?,
        exchange: f[1].to_string(),
    }))
}

fn encode_mx(value: &RecordValue) -> Option<String> {
    match value {
        RecordValue::Mx(v) => Some(format!("{} {}", v.preference, v.exchange)),
        _ => None,
    }
}

fn decode_naptr(data: &str) -> Option<RecordValue> {
    let f = fields(data, 6)?;
    Some(RecordValue::Naptr(NaptrValue {
        order: f[0].parse().ok()?,
        preference: f[1].parse().ok()?,
        flags: unquote(f[2]).to_string(),
        service: unquote(f[3]).to_string(),
        regexp: unquote(f[4]).to_string(),
        replacement: f[5].to_string(),
    }))
}

fn encode_naptr(value: &RecordValue) -> Option<String> {
    match value {
        RecordValue::Naptr(v) => Some(format!(
            "{} {} \"{}\" \"{}\" \"{}\" {}",
            v.order, v.preference, v.flags, v.service, v.regexp, v.replacement
        )),
        _ => None,
    }
}

fn decode_srv(data: &str) -> Option<RecordValue> {
    let f = fields(data, 4)?;
    Some(RecordValue::Srv(SrvValue {
        priority: f[0].parse().ok()?,
        weight: f[1].parse().ok()?,
        port: f[2].parse().ok()?,
        target: f[3].to_string(),
    }))
}

fn encode_srv(value: &RecordValue) -> Option<String> {
    match value {
        RecordValue::Srv(v) => Some(format!(
            "{} {} {} {}",
            v.priority, v.weight, v.port, v.target
        )),
        _ => None,
    }
}

fn decode_sshfp(data: &str) -> Option<RecordValue> {
    let f = fields(data, 3)?;
    Some(RecordValue::Sshfp(SshfpValue {
        algorithm: f[0].parse().ok()?,
        fingerprint_type: f[1].parse().ok()?,
        fingerprint: f[2].to_string(),
    }))
}

fn encode_sshfp(value: &RecordValue) -> Option<String> {
    match value {
        RecordValue::Sshfp(v) => Some(format!(
            "{} {} {}",
            v.algorithm, v.fingerprint_type, v.fingerprint
        )),
        _ => None,
    }
}
