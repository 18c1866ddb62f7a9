use super::scanner::FlowRecord;
use crate::tables::{ClassificationKey, LookupTable, ProtocolTable};

/// Protocol name used when a protocol number has no entry in the protocol table.
pub const UNKNOWN_PROTOCOL: &str = "unknown";

/// Tag used when a classification key has no entry in the lookup table.
pub const UNTAGGED: &str = "untagged";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification<'t> {
    pub key: ClassificationKey,
    pub tag: &'t str,
}

/// Resolves a record's protocol name and tag. Pure: same inputs, same output.
pub fn classify<'t>(
    record: &FlowRecord,
    protocols: &ProtocolTable,
    lookup: &'t LookupTable,
) -> Classification<'t> {
    let protocol = record
        .protocol_number
        .and_then(|number| protocols.name(number))
        .unwrap_or(UNKNOWN_PROTOCOL);
    let key = ClassificationKey::new(record.dstport, protocol);
    let tag = lookup.get(&key).unwrap_or(UNTAGGED);

    Classification { key, tag }
}
