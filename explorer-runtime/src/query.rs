//! Search query classification.
//!
//! Order matters: a transaction hash is checked before an address, and both
//! before a block number, so the most specific shape wins.

use alloy::primitives::Address;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    TransactionHash,
    Address,
    BlockNumber,
    Unrecognized,
}

/// A classified query and its normalized value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub kind: QueryKind,
    pub value: String,
}

impl Classified {
    /// Resolver path for a recognized query, without the chain selector.
    pub fn resolver_path(&self) -> Option<String> {
        match self.kind {
            QueryKind::TransactionHash => Some(format!("/api/tx/{}", self.value)),
            QueryKind::Address => Some(format!("/api/address/{}", self.value)),
            QueryKind::BlockNumber => Some(format!("/api/block/{}", self.value)),
            QueryKind::Unrecognized => None,
        }
    }
}

pub fn classify(raw: &str) -> Classified {
    let query = raw.trim();

    let (kind, value) = if is_tx_hash(query) {
        (QueryKind::TransactionHash, query.to_string())
    } else if is_address(query) {
        (QueryKind::Address, query.to_string())
    } else if let Some(number) = parse_block_number(query) {
        (QueryKind::BlockNumber, number.to_string())
    } else {
        (QueryKind::Unrecognized, query.to_string())
    };

    Classified { kind, value }
}

/// `0x` followed by exactly 64 hex digits.
pub fn is_tx_hash(s: &str) -> bool {
    s.len() == 66 && is_prefixed_hex(s, 64)
}

/// `0x` followed by 40 hex digits. Mixed-case input must carry a valid
/// EIP-55 checksum; all-lowercase and all-uppercase are accepted as is.
pub fn is_address(s: &str) -> bool {
    if !is_prefixed_hex(s, 40) {
        return false;
    }
    let digits = &s[2..];
    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        Address::parse_checksummed(s, None).is_ok()
    } else {
        true
    }
}

/// Decimal digits only, fitting in a `u64`.
pub fn parse_block_number(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn is_prefixed_hex(s: &str, digits: usize) -> bool {
    s.len() == digits + 2
        && s.starts_with("0x")
        && s.bytes().skip(2).all(|b| b.is_ascii_hexdigit())
}
