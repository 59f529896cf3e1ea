//! Connectivity supervision — the two layered reconnect state machines.
//!
//! [`link`] supervises the lower layer (association + address
//! acquisition); [`session`] supervises the pub/sub client session on
//! top of it. Each owns its own status exclusively; the session observes
//! the link only through the link supervisor's accessor.

pub mod link;
pub mod session;
