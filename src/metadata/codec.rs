//! Conversion between the metadata tree and EXIF.
//!
//! [`read_metadata`] builds the tree from an encoded image's EXIF block;
//! [`write_exif_block`] serializes a tree back into a TIFF block suitable for
//! a JPEG APP1 segment. Both directions go through the tag table in
//! [`super::tags`], so keys outside it are neither read nor written.

use std::io::Cursor;
use exif::experimental::Writer;
use exif::{Field, In, Rational, SRational, Value};
use tracing::{debug, trace};

use super::tags::{self, Group, Kind, TagSpec};
use super::value::{MetaValue, Metadata, ORIENTATION_KEY};
use crate::utils::EmbedError;

/// Reads the EXIF block of an encoded image into a metadata tree.
///
/// Images without EXIF, or with a block we cannot parse, produce an empty
/// tree: a picked photo is still usable without its metadata.
pub fn read_metadata(encoded: &[u8]) -> Metadata {
    let parsed = match exif::Reader::new().read_from_container(&mut Cursor::new(encoded)) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!("No readable EXIF block: {e}");
            return Metadata::new();
        }
    };

    let mut groups: Vec<(Group, Metadata)> = Group::ALL.iter().map(|g| (*g, Metadata::new())).collect();
    for field in parsed.fields() {
        if field.ifd_num != In::PRIMARY {
            continue;
        }
        let Some(spec) = tags::by_tag(field.tag) else {
            trace!("Skipping EXIF tag {}", field.tag);
            continue;
        };
        let Some(value) = to_meta(spec.kind, &field.value) else {
            debug!("Unexpected value type for {}", spec.key);
            continue;
        };
        if let Some((_, group)) = groups.iter_mut().find(|(g, _)| *g == spec.group) {
            group.insert(spec.key, value);
        }
    }

    let mut metadata = Metadata::new();
    for (group, entries) in groups {
        if group == Group::Tiff {
            if let Some(orientation) = entries.get(ORIENTATION_KEY) {
                metadata.insert(ORIENTATION_KEY, orientation.clone());
            }
        }
        if !entries.is_empty() {
            metadata.insert(group.key(), entries);
        }
    }
    metadata
}

/// Serializes `metadata` into a TIFF-structured EXIF block.
///
/// The top-level `Orientation` wins over a `{TIFF}` copy of the tag. Keys with
/// no table entry, or values of the wrong shape, are skipped.
pub fn write_exif_block(metadata: &Metadata) -> Result<Vec<u8>, EmbedError> {
    let fields = collect_fields(metadata);
    if fields.is_empty() {
        return Err(EmbedError::Empty);
    }

    let mut writer = Writer::new();
    for field in &fields {
        writer.push_field(field);
    }
    let mut block = Cursor::new(Vec::new());
    writer.write(&mut block, false)?;
    Ok(block.into_inner())
}

fn collect_fields(metadata: &Metadata) -> Vec<Field> {
    let mut fields: Vec<Field> = Vec::new();
    let mut push = |spec: &TagSpec, value: &MetaValue| {
        if fields.iter().any(|f| f.tag == spec.tag) {
            return;
        }
        match to_exif(spec.kind, value) {
            Some(value) => fields.push(Field { tag: spec.tag, ifd_num: In::PRIMARY, value }),
            None => debug!("Cannot encode {} as {:?}", spec.key, spec.kind),
        }
    };

    if let (Some(value), Some(spec)) = (metadata.get(ORIENTATION_KEY), tags::by_key(Group::Tiff, ORIENTATION_KEY)) {
        push(spec, value);
    }
    for group in Group::ALL {
        let Some(entries) = metadata.get_map(group.key()) else {
            continue;
        };
        for (key, value) in entries.iter() {
            match tags::by_key(group, key) {
                Some(spec) => push(spec, value),
                None => trace!("No EXIF tag for {}.{}", group.key(), key),
            }
        }
    }
    fields
}

fn to_meta(kind: Kind, value: &Value) -> Option<MetaValue> {
    match (kind, value) {
        (Kind::Ascii, Value::Ascii(parts)) => {
            let text = parts.first()?;
            let text = String::from_utf8_lossy(text);
            Some(MetaValue::Text(text.trim_end_matches('\0').to_string()))
        }
        (Kind::Byte | Kind::Short | Kind::Long, v) => v.get_uint(0).map(|n| MetaValue::Int(n.into())),
        (Kind::Shorts, Value::Short(items)) => {
            Some(MetaValue::List(items.iter().map(|n| MetaValue::Int((*n).into())).collect()))
        }
        (Kind::Rational, Value::Rational(items)) => items.first().map(|r| MetaValue::Float(r.to_f64())),
        (Kind::SRational, Value::SRational(items)) => items.first().map(|r| MetaValue::Float(r.to_f64())),
        (Kind::Coordinate, Value::Rational(items)) if items.len() >= 3 => {
            let degrees = items[0].to_f64() + items[1].to_f64() / 60.0 + items[2].to_f64() / 3600.0;
            Some(MetaValue::Float(degrees))
        }
        (Kind::Clock, Value::Rational(items)) if items.len() >= 3 => Some(MetaValue::Text(format!(
            "{:02}:{:02}:{:05.2}",
            items[0].to_f64() as u32,
            items[1].to_f64() as u32,
            items[2].to_f64()
        ))),
        _ => None,
    }
}

fn to_exif(kind: Kind, value: &MetaValue) -> Option<Value> {
    match kind {
        Kind::Ascii => value.as_text().map(|s| Value::Ascii(vec![s.as_bytes().to_vec()])),
        Kind::Byte => {
            let n = u8::try_from(value.as_int()?).ok()?;
            Some(Value::Byte(vec![n]))
        }
        Kind::Short => {
            let n = u16::try_from(value.as_int()?).ok()?;
            Some(Value::Short(vec![n]))
        }
        Kind::Shorts => {
            let items = match value {
                MetaValue::List(items) => items
                    .iter()
                    .map(|v| v.as_int().and_then(|n| u16::try_from(n).ok()))
                    .collect::<Option<Vec<u16>>>()?,
                other => vec![u16::try_from(other.as_int()?).ok()?],
            };
            (!items.is_empty()).then_some(Value::Short(items))
        }
        Kind::Long => {
            let n = u32::try_from(value.as_int()?).ok()?;
            Some(Value::Long(vec![n]))
        }
        Kind::Rational => rational(value.as_float()?).map(|r| Value::Rational(vec![r])),
        Kind::SRational => srational(value.as_float()?).map(|r| Value::SRational(vec![r])),
        Kind::Coordinate => dms(value.as_float()?.abs()).map(Value::Rational),
        Kind::Clock => {
            let mut parts = value.as_text()?.split(':').map(|p| p.trim().parse::<f64>().ok());
            let (h, m, s) = (parts.next()??, parts.next()??, parts.next()??);
            if parts.next().is_some() {
                return None;
            }
            Some(Value::Rational(vec![rational(h)?, rational(m)?, rational(s)?]))
        }
    }
}

const MILLIS_PER_MINUTE: u64 = 60_000;
const MILLIS_PER_DEGREE: u64 = 60 * MILLIS_PER_MINUTE;

/// Degrees/minutes/seconds with seconds in 1/1000 units.
///
/// Rounding happens once on the total, so seconds never read 60.
fn dms(degrees: f64) -> Option<Vec<Rational>> {
    if !degrees.is_finite() || degrees < 0.0 {
        return None;
    }
    let total = (degrees * MILLIS_PER_DEGREE as f64).round() as u64;
    let whole = u32::try_from(total / MILLIS_PER_DEGREE).ok()?;
    let rest = total % MILLIS_PER_DEGREE;
    Some(vec![
        Rational { num: whole, denom: 1 },
        Rational { num: (rest / MILLIS_PER_MINUTE) as u32, denom: 1 },
        Rational { num: (rest % MILLIS_PER_MINUTE) as u32, denom: 1000 },
    ])
}

const RATIONAL_SCALE: f64 = 10_000.0;

fn rational(v: f64) -> Option<Rational> {
    if !v.is_finite() || v < 0.0 {
        return None;
    }
    if v.fract() == 0.0 && v <= u32::MAX as f64 {
        return Some(Rational { num: v as u32, denom: 1 });
    }
    let scaled = (v * RATIONAL_SCALE).round();
    if scaled > u32::MAX as f64 {
        return Some(Rational { num: v.round() as u32, denom: 1 });
    }
    let (num, denom) = reduce(scaled as u64, RATIONAL_SCALE as u64);
    Some(Rational { num: num as u32, denom: denom as u32 })
}

fn srational(v: f64) -> Option<SRational> {
    if !v.is_finite() {
        return None;
    }
    let magnitude = rational(v.abs())?;
    let num = i32::try_from(magnitude.num).ok()?;
    let denom = i32::try_from(magnitude.denom).ok()?;
    Some(SRational { num: if v < 0.0 { -num } else { num }, denom })
}

fn reduce(num: u64, denom: u64) -> (u64, u64) {
    let (mut a, mut b) = (num, denom);
    while b != 0 {
        (a, b) = (b, a % b);
    }
    if a == 0 { (num, denom) } else { (num / a, denom / a) }
}
