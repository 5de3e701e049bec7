use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// A `peer` entry within a [`PeerSection`], keyed by name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(default, setter(into)))]
#[serde(rename_all = "camelCase")]
pub struct PeerEntry {
    #[builder(!default)]
    pub name: String,
    pub address: String,
    pub port: Option<u16>,
}

/// A named `peers` section.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(default, setter(into)))]
#[serde(rename_all = "camelCase")]
pub struct PeerSection {
    #[builder(!default)]
    pub name: String,
    pub entries: BTreeMap<String, PeerEntry>,
}

impl PeerSection {
    pub(crate) fn without_children(&self) -> Self {
        Self {
            name: self.name.clone(),
            ..Default::default()
        }
    }
}
