use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// The singleton `global` section. Never created or deleted by the comparator, only updated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(default, setter(into)))]
#[serde(rename_all = "camelCase")]
pub struct Global {
    pub maxconn: Option<u32>,
    pub nbthread: Option<u32>,
    pub log_targets: Vec<super::common::LogTarget>,
    pub ssl_default_bind_ciphers: Option<String>,
    pub ssl_default_bind_options: Option<String>,
    pub extra_params: BTreeMap<String, String>,
}

/// A named `defaults` section.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(default, setter(into)))]
#[serde(rename_all = "camelCase")]
pub struct Defaults {
    #[builder(!default)]
    pub name: String,
    pub mode: Option<String>,
    pub balance: Option<String>,
    pub timeout_connect: Option<u32>,
    pub timeout_client: Option<u32>,
    pub timeout_server: Option<u32>,
    pub extra_params: BTreeMap<String, String>,
}
