//! Droplet actions.
//!
//! An action is a type tag plus a flat set of parameters, posted to
//! `droplets/{id}/actions`. The API queues it and answers immediately;
//! completion is not tracked here.

use digitalocean_core::Error;
use std::fmt;
use std::str::FromStr;

/// Supported droplet action types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    /// Change the droplet size
    Resize,
    /// Change the droplet name
    Rename,
    /// Boot a powered-off droplet
    PowerOn,
    /// Hard power-off
    PowerOff,
    /// Graceful shutdown
    Shutdown,
    /// Graceful reboot
    Reboot,
    /// Hard power cycle
    PowerCycle,
    /// Attach an IPv6 address
    EnableIpv6,
    /// Attach a private network interface
    EnablePrivateNetworking,
}

impl ActionType {
    /// Value sent as the `type` parameter.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Resize => "resize",
            Self::Rename => "rename",
            Self::PowerOn => "power_on",
            Self::PowerOff => "power_off",
            Self::Shutdown => "shutdown",
            Self::Reboot => "reboot",
            Self::PowerCycle => "power_cycle",
            Self::EnableIpv6 => "enable_ipv6",
            Self::EnablePrivateNetworking => "enable_private_networking",
        }
    }

    /// Returns all action types.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Resize,
            Self::Rename,
            Self::PowerOn,
            Self::PowerOff,
            Self::Shutdown,
            Self::Reboot,
            Self::PowerCycle,
            Self::EnableIpv6,
            Self::EnablePrivateNetworking,
        ]
    }
}

impl FromStr for ActionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| Error::InvalidRequest(format!("Unknown droplet action: {s}")))
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An action and its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    action_type: ActionType,
    params: Vec<(&'static str, String)>,
}

impl Action {
    /// An action with no parameters.
    #[must_use]
    pub const fn new(action_type: ActionType) -> Self {
        Self {
            action_type,
            params: Vec::new(),
        }
    }

    /// Add a parameter.
    #[must_use]
    pub fn with_param(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.params.push((key, value.into()));
        self
    }

    /// Resize to the given size slug.
    #[must_use]
    pub fn resize(size: impl Into<String>) -> Self {
        Self::new(ActionType::Resize).with_param("size", size)
    }

    /// Rename the droplet.
    #[must_use]
    pub fn rename(name: impl Into<String>) -> Self {
        Self::new(ActionType::Rename).with_param("name", name)
    }

    /// The action type.
    #[must_use]
    pub const fn action_type(&self) -> ActionType {
        self.action_type
    }

    /// Query pairs: `type` first, then the action parameters in order.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        std::iter::once(("type", self.action_type.as_str().to_string()))
            .chain(self.params.iter().cloned())
            .collect()
    }
}

impl From<ActionType> for Action {
    fn from(action_type: ActionType) -> Self {
        Self::new(action_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip() {
        for action in ActionType::all() {
            assert_eq!(action.as_str().parse::<ActionType>().unwrap(), *action);
        }
    }

    #[test]
    fn unknown_action_is_rejected() {
        let err = "explode".parse::<ActionType>().unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[test]
    fn resize_pairs() {
        assert_eq!(
            Action::resize("1gb").to_pairs(),
            vec![("type", "resize".to_string()), ("size", "1gb".to_string())]
        );
    }

    #[test]
    fn rename_pairs() {
        assert_eq!(
            Action::rename("web-02").to_pairs(),
            vec![("type", "rename".to_string()), ("name", "web-02".to_string())]
        );
    }

    #[test]
    fn parameterless_pairs() {
        let action: Action = ActionType::EnablePrivateNetworking.into();
        assert_eq!(
            action.to_pairs(),
            vec![("type", "enable_private_networking".to_string())]
        );
        assert_eq!(action.action_type(), ActionType::EnablePrivateNetworking);
    }
}
