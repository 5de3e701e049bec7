use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use super::common::{
    Acl,
    BackendSwitchingRule,
    Bind,
    Capture,
    Filter,
    HttpAfterResponseRule,
    HttpRequestRule,
    HttpResponseRule,
    LogTarget,
    TcpRequestRule,
    TcpResponseRule,
};

/// A named `frontend` section.
///
/// `without_children` clears every nested collection so the comparator can detect whether a
/// parent-level `Update` is needed independently of the fine-grained operations already emitted
/// for its children (§4.2, dispatch step 5 in the spec this engine implements).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(default, setter(into)))]
#[serde(rename_all = "camelCase")]
pub struct Frontend {
    #[builder(!default)]
    pub name: String,
    pub mode: Option<String>,
    pub default_backend: Option<String>,
    pub maxconn: Option<u32>,
    pub extra_params: BTreeMap<String, String>,

    pub binds: BTreeMap<String, Bind>,
    pub acls: Vec<Acl>,
    pub http_request_rules: Vec<HttpRequestRule>,
    pub http_response_rules: Vec<HttpResponseRule>,
    pub http_after_response_rules: Vec<HttpAfterResponseRule>,
    pub tcp_request_rules: Vec<TcpRequestRule>,
    pub tcp_response_rules: Vec<TcpResponseRule>,
    pub filters: Vec<Filter>,
    pub captures: Vec<Capture>,
    pub log_targets: Vec<LogTarget>,
    pub backend_switching_rules: Vec<BackendSwitchingRule>,
}

impl Frontend {
    pub(crate) fn without_children(&self) -> Self {
        Self {
            name: self.name.clone(),
            mode: self.mode.clone(),
            default_backend: self.default_backend.clone(),
            maxconn: self.maxconn,
            extra_params: self.extra_params.clone(),
            ..Default::default()
        }
    }
}
