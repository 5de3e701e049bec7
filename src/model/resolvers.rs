use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// A `nameserver` entry within a [`Resolvers`] section, keyed by name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(default, setter(into)))]
#[serde(rename_all = "camelCase")]
pub struct Nameserver {
    #[builder(!default)]
    pub name: String,
    pub address: String,
    pub port: Option<u16>,
}

/// A named `resolvers` section.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(default, setter(into)))]
#[serde(rename_all = "camelCase")]
pub struct Resolvers {
    #[builder(!default)]
    pub name: String,
    pub accepted_payload_size: Option<u32>,
    pub hold_valid: Option<String>,
    pub nameservers: BTreeMap<String, Nameserver>,
}

impl Resolvers {
    pub(crate) fn without_children(&self) -> Self {
        Self {
            name: self.name.clone(),
            accepted_payload_size: self.accepted_payload_size,
            hold_valid: self.hold_valid.clone(),
            ..Default::default()
        }
    }
}
