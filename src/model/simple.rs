//! Section kinds with no nested collections worth breaking out: direct equality-based
//! add/delete/update in the comparator (spec §4.2, dispatch step 3).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

macro_rules! simple_named_section {
    ($name:ident) => {
        #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, TypedBuilder)]
        #[builder(field_defaults(default, setter(into)))]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            #[builder(!default)]
            pub name: String,
            pub extra_params: BTreeMap<String, String>,
        }
    };
}

simple_named_section!(Cache);
simple_named_section!(Ring);
simple_named_section!(HttpErrorsSection);
simple_named_section!(Program);
simple_named_section!(LogForward);
simple_named_section!(FcgiApp);
simple_named_section!(CrtStore);
