// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::net::IpAddr;

use xxhash_rust::xxh32::xxh32;

/// Everything a guest identity is derived from. The caller supplies the
/// timestamp, peer address, and nonce explicitly, so the derivation itself
/// stays a pure function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityContext {
    pub now_unix: i64,
    pub peer: Option<IpAddr>,
    pub nonce: u64,
}

const IDENTITY_MODULUS: u32 = 100_000;

/// Pseudo-identity for a visitor who supplied no owner name, shaped
/// `user@<number>` with the number below 100000. Identities are labels,
/// not principals: collisions between visitors are accepted.
pub fn guest_identity(ctx: &IdentityContext) -> String {
    let peer = match ctx.peer {
        Some(addr) => addr.to_string(),
        None => "-".to_string(),
    };
    let material = format!("{}|{}|{}", ctx.now_unix, peer, ctx.nonce);
    format!("user@{}", xxh32(material.as_bytes(), 0) % IDENTITY_MODULUS)
}
