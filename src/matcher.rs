//! Record equivalence used for reconciliation
//!
//! Two records match when a zone file entry and a provider record describe
//! the same thing. Provider bookkeeping such as the record id is ignored so
//! that freshly parsed records can be compared with fetched ones.

use crate::record::{Record, RecordType};

/// Returns true when `a` and `b` are equivalent for diffing purposes
pub fn matches(a: &Record, b: &Record) -> bool {
    if a.record_type != b.record_type
        || a.name() != b.name()
        || a.is_proxied() != b.is_proxied()
        || a.ttl() != b.ttl()
    {
        return false;
    }

    match a.record_type {
        RecordType::A | RecordType::Aaaa | RecordType::Cname | RecordType::Txt => {
            a.content() == b.content()
        }
        RecordType::Mx => a.content() == b.content() && a.priority == b.priority,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<Record> {
        vec![
            Record::new(RecordType::A, "a.com", "1.1.1.1", 300),
            Record::new(RecordType::A, "a.com", "1.1.1.1", 1),
            Record::new(RecordType::A, "a.com", "1.1.1.2", 300),
            Record::new(RecordType::A, "b.com", "1.1.1.1", 300),
            Record::new(RecordType::Aaaa, "a.com", "2606:4700::1", 0),
            Record::new(RecordType::Cname, "www.a.com", "a.com", 1),
            Record::new(RecordType::Txt, "a.com", "1.1.1.1", 300),
            Record::new(RecordType::Mx, "a.com", "mail.a.com", 300).with_priority(10),
            Record::new(RecordType::Mx, "a.com", "mail.a.com", 300).with_priority(20),
        ]
    }

    #[test]
    fn test_match_is_reflexive() {
        for r in samples() {
            assert!(matches(&r, &r), "{} should match itself", r);
        }
    }

    #[test]
    fn test_match_is_symmetric() {
        let records = samples();
        for a in &records {
            for b in &records {
                assert_eq!(matches(a, b), matches(b, a), "{} vs {}", a, b);
            }
        }
    }

    #[test]
    fn test_match_ignores_id() {
        let local = Record::new(RecordType::A, "a.com", "1.1.1.1", 300);
        let remote = local.clone().with_id("372e67954025e0ba6aaa6d586b9e0b59");
        assert!(matches(&local, &remote));
    }

    #[test]
    fn test_match_distinguishes_header_fields() {
        let records = samples();
        // Same content but different ttl / proxied
        assert!(!matches(&records[0], &records[1]));
        // Different content
        assert!(!matches(&records[0], &records[2]));
        // Different name
        assert!(!matches(&records[0], &records[3]));
        // Different type, same content
        assert!(!matches(&records[0], &records[6]));
    }

    #[test]
    fn test_match_mx_priority() {
        let records = samples();
        assert!(!matches(&records[7], &records[8]));
    }

    #[test]
    fn test_match_ignores_priority_outside_mx() {
        let a = Record::new(RecordType::A, "a.com", "1.1.1.1", 300);
        let b = a.clone().with_priority(5);
        assert!(matches(&a, &b));
    }
}
