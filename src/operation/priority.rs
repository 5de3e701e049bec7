//! Priority constants for [`super::Operation`] ordering (spec §4.2/§9, "priority table").
//!
//! The contract `OrderOperations` depends on: any parent's priority is strictly lower than every
//! one of its children's. The exact numbers are not otherwise meaningful — they only need to
//! preserve that ordering across bands.

/// The singleton `global` section — always first on Create, always last to touch on Delete.
pub const GLOBAL: i32 = 0;

/// Named sections with no parent of their own: defaults, userlist, peers, resolvers, mailers,
/// cache, ring, http-errors, program, log-forward, fcgi-app, crt-store.
pub const FOUNDATIONAL: i32 = 10;

/// Direct keyed children of a foundational section (userlist user/group, peer entry, nameserver,
/// mailer entry) — must follow their parent on Create, precede it on Delete.
pub const FOUNDATIONAL_CHILD: i32 = 15;

/// `frontend` / `backend` sections, which may reference foundational sections by name (e.g. a
/// `userlist` via `http-request auth`) but are never referenced back.
pub const NAMED_SECTION: i32 = 20;

/// Any child of a frontend or backend: binds, ACLs, rules, filters, captures, log targets,
/// switching rules, servers, server templates, checks, stick rules.
pub const SECTION_CHILD: i32 = 30;
