//! Redaction reasons per entity kind

use redact_core::{EntityKind, RedactionSpan};

/// Human-readable reason for redacting a span of `kind`
pub fn reason_for(kind: &EntityKind) -> &'static str {
    match kind {
        EntityKind::Person => "Direct Identifier",
        EntityKind::Org => "Inferred Role",
        EntityKind::Gpe => "Location Identifier",
        EntityKind::Date => "Date Reference",
        EntityKind::Time => "Time Reference",
        EntityKind::Email => "Email Address",
        EntityKind::Phone => "Phone Number",
        EntityKind::Other(_) => "General Redaction",
    }
}

/// Set `reason` on every span from its kind.
///
/// Overwrites any existing reason, so applying it twice is the same as once.
pub fn annotate(mut metadata: Vec<RedactionSpan>) -> Vec<RedactionSpan> {
    for span in &mut metadata {
        span.reason = Some(reason_for(&span.kind).to_string());
    }
    metadata
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(label: &str) -> RedactionSpan {
        RedactionSpan::new(EntityKind::from(label), 0, 1, "x".to_string())
    }

    #[test]
    fn test_reason_table() {
        let expected = [
            ("PERSON", "Direct Identifier"),
            ("ORG", "Inferred Role"),
            ("GPE", "Location Identifier"),
            ("DATE", "Date Reference"),
            ("TIME", "Time Reference"),
            ("EMAIL", "Email Address"),
            ("PHONE", "Phone Number"),
            ("NORP", "General Redaction"),
            ("", "General Redaction"),
        ];

        let annotated = annotate(expected.iter().map(|(label, _)| span(label)).collect());
        for (span, (label, reason)) in annotated.iter().zip(expected) {
            assert_eq!(span.reason.as_deref(), Some(reason), "label {label}");
        }
    }

    #[test]
    fn test_annotate_is_idempotent() {
        let metadata = vec![span("PERSON"), span("EMAIL"), span("LAW")];
        let once = annotate(metadata);
        let twice = annotate(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_annotate_overwrites_stale_reason() {
        let mut stale = span("PHONE");
        stale.reason = Some("Direct Identifier".to_string());

        let annotated = annotate(vec![stale]);
        assert_eq!(annotated[0].reason.as_deref(), Some("Phone Number"));
    }

    #[test]
    fn test_annotate_preserves_order_and_spans() {
        let metadata = vec![span("DATE"), span("ORG")];
        let annotated = annotate(metadata.clone());
        assert_eq!(annotated.len(), 2);
        assert_eq!(annotated[0].kind, metadata[0].kind);
        assert_eq!(annotated[1].span, metadata[1].span);
    }
}
