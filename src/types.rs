//! Core types shared across parsing, tree building and sessions.

/// Digest: deterministic 256-bit hash of a file tree
pub type Digest = [u8; 32];

/// SessionId: generation counter identifying one session lifecycle
///
/// Bumped on every reset. Batches requested under an older id are stale.
pub type SessionId = u64;

/// Ticket: position of a batch in the order its request was issued
pub type Ticket = u64;
