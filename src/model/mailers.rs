use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// A `mailer` entry within a [`MailersSection`], keyed by name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(default, setter(into)))]
#[serde(rename_all = "camelCase")]
pub struct MailerEntry {
    #[builder(!default)]
    pub name: String,
    pub address: String,
    pub port: Option<u16>,
}

/// A named `mailers` section.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(default, setter(into)))]
#[serde(rename_all = "camelCase")]
pub struct MailersSection {
    #[builder(!default)]
    pub name: String,
    pub timeout_mail: Option<u32>,
    pub entries: BTreeMap<String, MailerEntry>,
}

impl MailersSection {
    pub(crate) fn without_children(&self) -> Self {
        Self {
            name: self.name.clone(),
            timeout_mail: self.timeout_mail,
            ..Default::default()
        }
    }
}
