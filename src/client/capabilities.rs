//! Capability discovery (spec §4.3): the Dataplane API's behavior varies by version, surfaced
//! through `GET /info`. Callers gate version-sensitive requests (CRT-list storage, runtime
//! servers) on the flags discovered here rather than hardcoding a version comparison everywhere.

use bitflags::bitflags;
use serde::Deserialize;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Capabilities: u32 {
        /// CRT-list storage endpoints, available from Dataplane API v3.2.
        const CRT_LIST_STORAGE = 0b0000_0001;
        /// Map and general-file storage endpoints, available from v3.0.
        const FILE_STORAGE = 0b0000_0010;
        const HTTP2 = 0b0000_0100;
        const QUIC = 0b0000_1000;
        const RUNTIME_MAPS = 0b0001_0000;
        /// Runtime (reload-free) server mutation endpoints, available from v3.0.
        const RUNTIME_SERVERS = 0b0010_0000;
    }
}

/// The subset of `GET /info`'s body this engine needs; unknown fields are ignored by `serde`.
#[derive(Debug, Deserialize)]
pub(crate) struct InfoResponse {
    pub(crate) api: InfoApi,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InfoApi {
    pub(crate) version: String,
}

impl Capabilities {
    /// Derives capability flags from the Dataplane API's reported `major.minor` version.
    pub(crate) fn from_version(version: &str) -> Self {
        let Some((major, minor)) = parse_major_minor(version) else {
            return Capabilities::empty();
        };
        let mut caps = Capabilities::empty();
        if (major, minor) >= (3, 0) {
            caps |= Capabilities::FILE_STORAGE | Capabilities::RUNTIME_SERVERS;
        }
        if (major, minor) >= (3, 2) {
            caps |= Capabilities::CRT_LIST_STORAGE;
        }
        caps
    }
}

fn parse_major_minor(version: &str) -> Option<(u32, u32)> {
    let mut parts = version.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    Some((major, minor))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn v3_2_has_crt_list_storage_and_everything_below_it() {
        let caps = Capabilities::from_version("3.2.0");
        assert!(caps.contains(Capabilities::CRT_LIST_STORAGE));
        assert!(caps.contains(Capabilities::FILE_STORAGE));
    }

    #[test]
    fn v2_x_has_no_v3_capabilities() {
        let caps = Capabilities::from_version("2.9.1");
        assert!(!caps.contains(Capabilities::FILE_STORAGE));
        assert!(!caps.contains(Capabilities::CRT_LIST_STORAGE));
    }
}
