//! Shape-tolerant decoding of droplet payloads.
//!
//! The droplet representation has drifted across API versions: regions,
//! images and sizes arrive as nested objects, as bare strings, or flattened
//! into `region_slug`-style keys; numbers sometimes arrive as strings. All of
//! that is absorbed here, behind named lookups such as `region.slug`, so the
//! model never binds to a single wire shape.

use chrono::{DateTime, Utc};
use digitalocean_core::{DropletId, Error, ImageId, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::models::{Droplet, ImageRef, IpVersion, Network};

/// Response envelope: `{"droplet": {...}}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DropletEnvelope {
    /// The wrapped droplet
    pub droplet: Droplet,
}

/// Decode a `{"droplet": {...}}` response body.
///
/// # Errors
///
/// Returns [`Error::ParseError`] if the body is not JSON, has no `droplet`
/// object, or the droplet lacks a usable `id`.
pub fn decode_droplet(body: &str) -> Result<Droplet> {
    serde_json::from_str::<DropletEnvelope>(body)
        .map(|envelope| envelope.droplet)
        .map_err(Error::from)
}

/// Read-only view over a JSON object with path lookups that try each known
/// wire shape in turn.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WireObject<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> WireObject<'a> {
    pub(crate) const fn new(map: &'a Map<String, Value>) -> Self {
        Self { map }
    }

    /// Resolve a dotted path, ignoring nulls and empty strings.
    ///
    /// Order: nested objects (`{"region": {"slug": ..}}`, where a bare string
    /// stands in for `slug` and a bare number for `id`), then a literal dotted
    /// key (`"region.slug"`), then an underscored key (`"region_slug"`).
    pub(crate) fn lookup(&self, path: &str) -> Option<&'a Value> {
        let present = |value: &&Value| match value {
            Value::Null => false,
            Value::String(text) => !text.is_empty(),
            _ => true,
        };
        self.nested(path)
            .filter(present)
            .or_else(|| self.map.get(path).filter(present))
            .or_else(|| self.map.get(&path.replace('.', "_")).filter(present))
    }

    fn nested(&self, path: &str) -> Option<&'a Value> {
        let mut segments = path.split('.');
        let mut current = self.map.get(segments.next()?)?;
        for segment in segments {
            current = match current {
                Value::Object(inner) => inner.get(segment)?,
                Value::String(_) if segment == "slug" => current,
                Value::Number(_) if segment == "id" => current,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Non-empty string; numbers are rendered in decimal.
    pub(crate) fn string(&self, path: &str) -> Option<String> {
        match self.lookup(path)? {
            Value::String(text) if !text.is_empty() => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    }

    pub(crate) fn u64(&self, path: &str) -> Option<u64> {
        self.lookup(path).and_then(value_as_u64)
    }

    pub(crate) fn bool(&self, path: &str) -> Option<bool> {
        match self.lookup(path)? {
            Value::Bool(flag) => Some(*flag),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub(crate) fn array(&self, path: &str) -> Option<&'a [Value]> {
        self.lookup(path)?.as_array().map(Vec::as_slice)
    }

    pub(crate) fn timestamp(&self, path: &str) -> Option<DateTime<Utc>> {
        let text = self.lookup(path)?.as_str()?;
        DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|stamp| stamp.with_timezone(&Utc))
    }

    fn strings(&self, path: &str) -> Vec<String> {
        self.array(path)
            .unwrap_or_default()
            .iter()
            .filter_map(|value| value.as_str().map(str::to_string))
            .collect()
    }

    fn ids(&self, path: &str) -> Vec<u64> {
        self.array(path)
            .unwrap_or_default()
            .iter()
            .filter_map(value_as_u64)
            .collect()
    }
}

fn value_as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

impl TryFrom<Value> for Droplet {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(Error::ParseError("droplet is not a JSON object".to_string()));
        };
        droplet_from_wire(WireObject::new(&map))
    }
}

fn droplet_from_wire(wire: WireObject<'_>) -> Result<Droplet> {
    let id = match wire.lookup("id") {
        None => {
            return Err(Error::ParseError(
                "droplet is missing mandatory field `id`".to_string(),
            ))
        }
        Some(raw) => value_as_u64(raw).map(DropletId::new).ok_or_else(|| {
            Error::ParseError(format!("droplet field `id` is not an integer: {raw}"))
        })?,
    };

    let image = wire
        .string("image.slug")
        .map(ImageRef::Slug)
        .or_else(|| wire.u64("image.id").map(|id| ImageRef::Id(ImageId::new(id))));

    Ok(Droplet {
        id,
        name: wire.string("name").unwrap_or_default(),
        status: wire.string("status").unwrap_or_default(),
        locked: wire.bool("locked").unwrap_or(false),
        region: wire.string("region.slug"),
        image,
        size: wire.string("size.slug"),
        memory: wire.u64("memory").or_else(|| wire.u64("size.memory")),
        vcpus: wire.u64("vcpus").or_else(|| wire.u64("size.vcpus")),
        disk: wire.u64("disk").or_else(|| wire.u64("size.disk")),
        networks: networks_from_wire(wire),
        created_at: wire.timestamp("created_at"),
        features: wire.strings("features"),
        backup_ids: wire.ids("backup_ids"),
        snapshot_ids: wire.ids("snapshot_ids"),
        action_ids: wire.ids("action_ids"),
    })
}

fn networks_from_wire(wire: WireObject<'_>) -> Vec<Network> {
    let mut networks = Vec::new();
    let mut seen_list = false;

    for version in [IpVersion::V4, IpVersion::V6] {
        let Some(entries) = wire.array(&format!("networks.{}", version.as_str())) else {
            continue;
        };
        seen_list = true;
        networks.extend(
            entries
                .iter()
                .filter_map(Value::as_object)
                .map(|entry| network_from_wire(version, WireObject::new(entry))),
        );
    }

    if !seen_list {
        networks.extend(legacy_networks(wire));
    }
    networks
}

fn network_from_wire(version: IpVersion, wire: WireObject<'_>) -> Network {
    Network {
        version,
        network_type: wire.string("type").unwrap_or_default(),
        ip_address: wire.string("ip_address").unwrap_or_default(),
        netmask: wire.string("netmask"),
        gateway: wire.string("gateway"),
    }
}

/// The earliest API exposed single top-level addresses instead of lists.
fn legacy_networks(wire: WireObject<'_>) -> Vec<Network> {
    [
        (IpVersion::V4, "public", "ip_address"),
        (IpVersion::V4, "private", "private_ip_address"),
        (IpVersion::V6, "public", "ipv6_address"),
    ]
    .into_iter()
    .filter_map(|(version, network_type, key)| {
        wire.string(key).map(|ip_address| Network {
            version,
            network_type: network_type.to_string(),
            ip_address,
            netmask: None,
            gateway: None,
        })
    })
    .collect()
}
