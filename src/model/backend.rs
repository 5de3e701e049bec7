use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use super::common::{
    Acl,
    Capture,
    Filter,
    HttpAfterResponseRule,
    HttpCheck,
    HttpRequestRule,
    HttpResponseRule,
    LogTarget,
    Server,
    ServerSwitchingRule,
    ServerTemplate,
    StickRule,
    TcpCheck,
    TcpRequestRule,
};

/// A named `backend` section.
///
/// `servers` and `server_templates` are map-keyed (by server name / template prefix); every
/// other collection here is positional. See [`Frontend::without_children`](super::frontend::Frontend::without_children)
/// for why a sibling method exists on this type too.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(default, setter(into)))]
#[serde(rename_all = "camelCase")]
pub struct Backend {
    #[builder(!default)]
    pub name: String,
    pub mode: Option<String>,
    pub balance: Option<String>,
    pub timeout_connect: Option<u32>,
    pub timeout_server: Option<u32>,
    pub extra_params: BTreeMap<String, String>,

    pub servers: BTreeMap<String, Server>,
    pub server_templates: BTreeMap<String, ServerTemplate>,
    pub acls: Vec<Acl>,
    pub http_request_rules: Vec<HttpRequestRule>,
    pub http_response_rules: Vec<HttpResponseRule>,
    pub http_after_response_rules: Vec<HttpAfterResponseRule>,
    pub tcp_request_rules: Vec<TcpRequestRule>,
    pub http_checks: Vec<HttpCheck>,
    pub tcp_checks: Vec<TcpCheck>,
    pub server_switching_rules: Vec<ServerSwitchingRule>,
    pub stick_rules: Vec<StickRule>,
    pub filters: Vec<Filter>,
    pub captures: Vec<Capture>,
    pub log_targets: Vec<LogTarget>,
}

impl Backend {
    pub(crate) fn without_children(&self) -> Self {
        Self {
            name: self.name.clone(),
            mode: self.mode.clone(),
            balance: self.balance.clone(),
            timeout_connect: self.timeout_connect,
            timeout_server: self.timeout_server,
            extra_params: self.extra_params.clone(),
            ..Default::default()
        }
    }
}
