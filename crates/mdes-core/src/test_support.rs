//! Fixture helpers for unit tests.

/// Wraps schema markup in an `xs:schema` root declaring the usual
/// namespaces. The first line of `body` lands on line 2.
pub(crate) fn fragment(body: &str) -> String {
    format!(
        "<xs:schema xmlns:xs=\"{}\" xmlns:ncs=\"{}\" xmlns:ncsdoc=\"{}\">\n{}\n</xs:schema>",
        crate::xsd::XS_NS,
        crate::xsd::NCS_NS,
        crate::xsd::NCSDOC_NS,
        body
    )
}
