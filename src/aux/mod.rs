//! Auxiliary file reconciliation (spec §4.4): general files, SSL certificates, CRT-lists, and map
//! files referenced by the main configuration. Path (post-sanitization) is identity; content is
//! opaque bytes. Reconciled before configuration operations so remote validation at commit time
//! finds the files it references already in place (§4.5 step 3).

mod fingerprint;

use std::collections::BTreeMap;

pub(crate) use fingerprint::sanitize_name;
use fingerprint::fingerprint;

/// Which of the four auxiliary stores an [`AuxOperation`] targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    GeneralFile,
    SslCertificate,
    CrtList,
    MapFile,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuxOpKind {
    Create,
    Update,
    Delete,
}

/// One atomic auxiliary-file effect, analogous to [`crate::operation::Operation`] but for the
/// byte-content stores rather than configuration sections.
#[derive(Clone, Debug, PartialEq)]
pub struct AuxOperation {
    pub kind: AuxOpKind,
    pub file_kind: FileKind,
    pub path: String,
    pub content: Option<Vec<u8>>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuxDiff {
    pub to_create: Vec<(String, Vec<u8>)>,
    pub to_update: Vec<(String, Vec<u8>)>,
    pub to_delete: Vec<String>,
}

impl AuxDiff {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }

    /// Orders this diff's entries into the effect list the synchronizer issues: deletes, then
    /// updates, then creates (order within a bucket doesn't matter — files are independent).
    pub fn into_operations(self, file_kind: FileKind) -> Vec<AuxOperation> {
        let mut ops = Vec::with_capacity(self.to_delete.len() + self.to_update.len() + self.to_create.len());
        ops.extend(self.to_delete.into_iter().map(|path| AuxOperation { kind: AuxOpKind::Delete, file_kind, path, content: None }));
        ops.extend(
            self.to_update
                .into_iter()
                .map(|(path, content)| AuxOperation { kind: AuxOpKind::Update, file_kind, path, content: Some(content) }),
        );
        ops.extend(
            self.to_create
                .into_iter()
                .map(|(path, content)| AuxOperation { kind: AuxOpKind::Create, file_kind, path, content: Some(content) }),
        );
        ops
    }
}

/// Direct byte-content comparison, used for general files, map files, and CRT-lists: the server
/// exposes full content (or this reconciler fetched it), so no fingerprint fallback is needed.
pub fn compare_by_content(current: &BTreeMap<String, Vec<u8>>, desired: &BTreeMap<String, Vec<u8>>) -> AuxDiff {
    let mut diff = AuxDiff::default();
    for (path, content) in desired {
        match current.get(path) {
            None => diff.to_create.push((path.clone(), content.clone())),
            Some(existing) if existing != content => diff.to_update.push((path.clone(), content.clone())),
            _ => {}
        }
    }
    for path in current.keys() {
        if !desired.contains_key(path) {
            diff.to_delete.push(path.clone());
        }
    }
    diff
}

/// SSL certificate comparison (spec §4.4): when the remote exposes a SHA-256 fingerprint for a
/// given sanitized name, diff accurately by content hash. When it doesn't (`None`), adopt a
/// CREATE-first approach — every desired certificate is marked `to_create` and the sync step
/// falls back to an UPDATE if the create is rejected as already existing. An absent certificate is
/// never marked for update.
pub fn compare_certificates(current: &BTreeMap<String, Option<String>>, desired: &BTreeMap<String, Vec<u8>>) -> AuxDiff {
    let mut diff = AuxDiff::default();
    for (name, content) in desired {
        let sanitized = sanitize_name(name);
        match current.get(&sanitized) {
            None => diff.to_create.push((sanitized, content.clone())),
            Some(None) => diff.to_create.push((sanitized, content.clone())),
            Some(Some(existing_fingerprint)) => {
                if *existing_fingerprint != fingerprint(content) {
                    diff.to_update.push((sanitized, content.clone()));
                }
            }
        }
    }
    let desired_sanitized: std::collections::BTreeSet<String> = desired.keys().map(|n| sanitize_name(n)).collect();
    for name in current.keys() {
        if !desired_sanitized.contains(name) {
            diff.to_delete.push(name.clone());
        }
    }
    diff
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn byte_content_diff_is_idempotent_on_second_run() {
        let mut current = BTreeMap::new();
        current.insert("maps/hosts.map".to_string(), b"a b\n".to_vec());
        let mut desired = BTreeMap::new();
        desired.insert("maps/hosts.map".to_string(), b"a b\n".to_vec());

        let diff = compare_by_content(&current, &desired);
        assert!(diff.is_empty());
    }

    #[test]
    fn certificate_without_fingerprint_is_create_first() {
        let mut current = BTreeMap::new();
        current.insert("wildcard_example_com_pem".to_string(), None);
        let mut desired = BTreeMap::new();
        desired.insert("wildcard.example.com.pem".to_string(), b"cert bytes".to_vec());

        let diff = compare_certificates(&current, &desired);
        assert_eq!(diff.to_create.len(), 1);
        assert!(diff.to_update.is_empty());
    }

    #[test]
    fn certificate_with_matching_fingerprint_is_a_no_op() {
        let content = b"cert bytes".to_vec();
        let mut current = BTreeMap::new();
        current.insert("api_pem".to_string(), Some(fingerprint(&content)));
        let mut desired = BTreeMap::new();
        desired.insert("api.pem".to_string(), content);

        let diff = compare_certificates(&current, &desired);
        assert!(diff.is_empty());
    }

    #[test]
    fn absent_certificate_is_never_marked_for_update() {
        let current = BTreeMap::new();
        let mut desired = BTreeMap::new();
        desired.insert("new.pem".to_string(), b"fresh".to_vec());

        let diff = compare_certificates(&current, &desired);
        assert!(diff.to_update.is_empty());
        assert_eq!(diff.to_create.len(), 1);
    }

    #[test]
    fn sync_order_is_deletes_then_updates_then_creates() {
        let diff = AuxDiff {
            to_create: vec![("c".to_string(), vec![])],
            to_update: vec![("u".to_string(), vec![])],
            to_delete: vec!["d".to_string()],
        };
        let ops = diff.into_operations(FileKind::GeneralFile);
        assert_eq!(ops[0].kind, AuxOpKind::Delete);
        assert_eq!(ops[1].kind, AuxOpKind::Update);
        assert_eq!(ops[2].kind, AuxOpKind::Create);
    }
}
