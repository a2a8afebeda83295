//! Droplet models and request parameters.

use chrono::{DateTime, Utc};
use digitalocean_core::query::QueryParams;
use digitalocean_core::{DropletId, ImageId};
use serde::Deserialize;
use std::fmt;

/// A droplet as returned by the API.
///
/// Decoding is shape-tolerant (see [`crate::decode`]); only `id` is
/// mandatory. The string accessors are total: a missing, null or mistyped
/// field reads as an empty string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct Droplet {
    /// Droplet id, assigned by the API at creation.
    pub id: DropletId,
    /// Droplet name.
    pub name: String,
    /// Lifecycle status (`new`, `active`, `off`, ...).
    pub status: String,
    /// True while a structural action is in flight.
    pub locked: bool,
    /// Region slug.
    pub region: Option<String>,
    /// Image the droplet was built from.
    pub image: Option<ImageRef>,
    /// Size slug.
    pub size: Option<String>,
    /// Memory in MiB.
    pub memory: Option<u64>,
    /// Virtual CPU count.
    pub vcpus: Option<u64>,
    /// Disk size in GiB.
    pub disk: Option<u64>,
    /// Network interfaces, v4 entries first, each version in wire order.
    pub networks: Vec<Network>,
    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
    /// Enabled feature names.
    pub features: Vec<String>,
    /// Backup image ids.
    pub backup_ids: Vec<u64>,
    /// Snapshot image ids.
    pub snapshot_ids: Vec<u64>,
    /// Ids of actions taken against the droplet.
    pub action_ids: Vec<u64>,
}

impl Droplet {
    /// Decimal rendering of the id.
    #[must_use]
    pub fn string_id(&self) -> String {
        self.id.to_string()
    }

    /// Lifecycle status as sent by the API.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Whether a structural action is in flight.
    ///
    /// Advisory: callers may want to hold further mutating actions until it clears.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    /// `"true"` or `"false"`.
    #[must_use]
    pub const fn locked_str(&self) -> &'static str {
        if self.locked {
            "true"
        } else {
            "false"
        }
    }

    /// Region slug, or `""`.
    #[must_use]
    pub fn region_slug(&self) -> &str {
        self.region.as_deref().unwrap_or_default()
    }

    /// Size slug, or `""`.
    #[must_use]
    pub fn size_slug(&self) -> &str {
        self.size.as_deref().unwrap_or_default()
    }

    /// Image slug, or `""` for private images identified only by id.
    #[must_use]
    pub fn image_slug(&self) -> &str {
        match &self.image {
            Some(ImageRef::Slug(slug)) => slug,
            _ => "",
        }
    }

    /// Image id in decimal, or `""` when the image is identified by slug.
    ///
    /// Consult [`image_slug`](Self::image_slug) first.
    #[must_use]
    pub fn image_id(&self) -> String {
        match &self.image {
            Some(ImageRef::Id(id)) => id.to_string(),
            _ => String::new(),
        }
    }

    /// Address of the first IPv4 interface of the given type, or `""`.
    #[must_use]
    pub fn ipv4_address(&self, network_type: NetworkType) -> &str {
        self.address(IpVersion::V4, network_type)
    }

    /// Address of the first IPv6 interface of the given type, or `""`.
    #[must_use]
    pub fn ipv6_address(&self, network_type: NetworkType) -> &str {
        self.address(IpVersion::V6, network_type)
    }

    /// Type of the first IPv4 interface, or `""` when there is none.
    #[must_use]
    pub fn networking_type(&self) -> &str {
        self.networks
            .iter()
            .find(|network| network.version == IpVersion::V4)
            .map_or("", |network| network.network_type.as_str())
    }

    fn address(&self, version: IpVersion, network_type: NetworkType) -> &str {
        self.networks
            .iter()
            .find(|network| {
                network.version == version && network.network_type == network_type.as_str()
            })
            .map_or("", |network| network.ip_address.as_str())
    }
}

/// Image reference on a droplet: a slug for public images, an id otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// Human-readable image slug.
    Slug(String),
    /// Numeric id, used when the image has no slug.
    Id(ImageId),
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slug(slug) => f.write_str(slug),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

/// IP protocol version of a network interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpVersion {
    /// IPv4
    V4,
    /// IPv6
    V6,
}

impl IpVersion {
    /// Key used in the `networks` object.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::V4 => "v4",
            Self::V6 => "v6",
        }
    }
}

/// Reachability class of a network interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkType {
    /// Internet-facing
    Public,
    /// Datacenter-internal
    Private,
}

impl NetworkType {
    /// Wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single network interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    /// IP version.
    pub version: IpVersion,
    /// Interface type exactly as sent (`public`, `private`).
    pub network_type: String,
    /// Address.
    pub ip_address: String,
    /// Netmask (dotted for v4, prefix length for v6).
    pub netmask: Option<String>,
    /// Gateway address.
    pub gateway: Option<String>,
}

/// Parameters for creating a droplet.
///
/// Unset flags are sent as `"false"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateDropletParams {
    /// Droplet name.
    pub name: String,
    /// Region slug.
    pub region: String,
    /// Size slug.
    pub size: String,
    /// Image slug, for public images.
    pub image: Option<String>,
    /// Image id; takes precedence over `image` when set.
    pub image_id: Option<ImageId>,
    /// SSH key ids or fingerprints to install, in order.
    pub ssh_keys: Vec<String>,
    /// Enable backups.
    pub backups: Option<bool>,
    /// Enable IPv6.
    pub ipv6: Option<bool>,
    /// Enable private networking.
    pub private_networking: Option<bool>,
    /// Cloud-init user data.
    pub user_data: Option<String>,
}

impl CreateDropletParams {
    /// Parameters with the three required fields set.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        region: impl Into<String>,
        size: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
            size: size.into(),
            ..Self::default()
        }
    }

    /// Use a public image by slug.
    #[must_use]
    pub fn with_image(mut self, slug: impl Into<String>) -> Self {
        self.image = Some(slug.into());
        self
    }

    /// Use an image by id.
    #[must_use]
    pub const fn with_image_id(mut self, id: ImageId) -> Self {
        self.image_id = Some(id);
        self
    }

    /// Add an SSH key id or fingerprint.
    #[must_use]
    pub fn with_ssh_key(mut self, key: impl Into<String>) -> Self {
        self.ssh_keys.push(key.into());
        self
    }

    /// Convert the parameters into URL query pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut params = QueryParams::new();
        params.push("name", &self.name);
        params.push("region", &self.region);
        params.push("size", &self.size);
        match (self.image_id, self.image.as_deref()) {
            (Some(id), _) => params.push("image", id),
            (None, Some(slug)) if !slug.is_empty() => params.push("image", slug),
            _ => {}
        }
        params.push_joined("ssh_keys", &self.ssh_keys);
        params.push_flag("backups", self.backups);
        params.push_flag("ipv6", self.ipv6);
        params.push_flag("private_networking", self.private_networking);
        params.push_opt("user_data", self.user_data.as_deref());

        params.into_pairs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn droplet(networks: Vec<Network>) -> Droplet {
        Droplet {
            id: DropletId::new(25),
            name: "web-01".to_string(),
            status: "active".to_string(),
            locked: false,
            region: Some("nyc1".to_string()),
            image: Some(ImageRef::Slug("foobar".to_string())),
            size: None,
            memory: None,
            vcpus: None,
            disk: None,
            networks,
            created_at: None,
            features: Vec::new(),
            backup_ids: Vec::new(),
            snapshot_ids: Vec::new(),
            action_ids: Vec::new(),
        }
    }

    fn v4(network_type: &str, ip: &str) -> Network {
        Network {
            version: IpVersion::V4,
            network_type: network_type.to_string(),
            ip_address: ip.to_string(),
            netmask: None,
            gateway: None,
        }
    }

    fn as_map(pairs: Vec<(&'static str, String)>) -> BTreeMap<&'static str, String> {
        pairs.into_iter().collect()
    }

    #[test]
    fn accessors_default_to_empty() {
        let mut d = droplet(Vec::new());
        d.region = None;
        d.image = None;
        assert_eq!(d.region_slug(), "");
        assert_eq!(d.size_slug(), "");
        assert_eq!(d.image_slug(), "");
        assert_eq!(d.image_id(), "");
        assert_eq!(d.networking_type(), "");
        assert_eq!(d.ipv4_address(NetworkType::Public), "");
    }

    #[test]
    fn image_slug_and_id_are_exclusive() {
        let mut d = droplet(Vec::new());
        assert_eq!(d.image_slug(), "foobar");
        assert_eq!(d.image_id(), "");

        d.image = Some(ImageRef::Id(ImageId::new(449_676_389)));
        assert_eq!(d.image_slug(), "");
        assert_eq!(d.image_id(), "449676389");
    }

    #[test]
    fn address_lookup_by_version_and_type() {
        let d = droplet(vec![v4("private", "10.0.0.1"), v4("public", "127.0.0.20")]);
        assert_eq!(d.ipv4_address(NetworkType::Private), "10.0.0.1");
        assert_eq!(d.ipv4_address(NetworkType::Public), "127.0.0.20");
        assert_eq!(d.ipv6_address(NetworkType::Public), "");
        assert_eq!(d.networking_type(), "private");
    }

    #[test]
    fn first_matching_interface_wins() {
        let d = droplet(vec![v4("public", "192.0.2.1"), v4("public", "192.0.2.2")]);
        assert_eq!(d.ipv4_address(NetworkType::Public), "192.0.2.1");
    }

    #[test]
    fn locked_renders_as_string() {
        let mut d = droplet(Vec::new());
        assert_eq!(d.locked_str(), "false");
        d.locked = true;
        assert!(d.is_locked());
        assert_eq!(d.locked_str(), "true");
        assert_eq!(d.string_id(), "25");
    }

    #[test]
    fn create_params_default_flags() {
        let pairs = as_map(CreateDropletParams::new("foobar", "nyc1", "512mb").to_pairs());
        let keys: Vec<&str> = pairs.keys().copied().collect();
        assert_eq!(
            keys,
            vec!["backups", "ipv6", "name", "private_networking", "region", "size"]
        );
        assert_eq!(pairs["backups"], "false");
        assert_eq!(pairs["ipv6"], "false");
        assert_eq!(pairs["private_networking"], "false");
    }

    #[test]
    fn create_params_full() {
        let params = CreateDropletParams {
            backups: Some(true),
            ipv6: Some(true),
            private_networking: Some(false),
            user_data: Some("#cloud-config".to_string()),
            ..CreateDropletParams::new("web-01", "nyc3", "s-1vcpu-1gb")
                .with_image("ubuntu-24-04-x64")
                .with_ssh_key("123")
                .with_ssh_key("aa:bb:cc")
        };
        let pairs = as_map(params.to_pairs());
        let keys: Vec<&str> = pairs.keys().copied().collect();
        assert_eq!(
            keys,
            vec![
                "backups",
                "image",
                "ipv6",
                "name",
                "private_networking",
                "region",
                "size",
                "ssh_keys",
                "user_data",
            ]
        );
        assert_eq!(pairs["image"], "ubuntu-24-04-x64");
        assert_eq!(pairs["ssh_keys"], "123,aa:bb:cc");
        assert_eq!(pairs["backups"], "true");
        assert_eq!(pairs["ipv6"], "true");
        assert_eq!(pairs["private_networking"], "false");
        assert_eq!(pairs["user_data"], "#cloud-config");
    }

    #[test]
    fn image_id_overrides_slug() {
        let params = CreateDropletParams::new("web-01", "nyc3", "512mb")
            .with_image("ubuntu")
            .with_image_id(ImageId::new(449_676_389));
        let pairs = as_map(params.to_pairs());
        assert_eq!(pairs["image"], "449676389");
    }

    #[test]
    fn image_ref_display() {
        assert_eq!(ImageRef::Slug("foobar".to_string()).to_string(), "foobar");
        assert_eq!(ImageRef::Id(ImageId::new(7)).to_string(), "7");
    }
}
