use mdes_core::xsd::{NCSDOC_NS, NCS_NS, XS_NS};
use mdes_core::{CollectingSink, Specification};

/// Wrap schema markup in an `xs:schema` root. `body` starts on line 2.
#[allow(dead_code)]
pub fn schema(body: &str) -> String {
    format!(
        "<xs:schema xmlns:xs=\"{}\" xmlns:ncs=\"{}\" xmlns:ncsdoc=\"{}\">\n{}\n</xs:schema>",
        XS_NS, NCS_NS, NCSDOC_NS, body
    )
}

/// Wrap table markup in the transmission tables container.
#[allow(dead_code)]
pub fn transmission_tables(tables: &str, types: &str) -> String {
    schema(&format!(
        r#"<xs:element name="transmission_tables">
  <xs:complexType>
    <xs:sequence>
{}
    </xs:sequence>
  </xs:complexType>
</xs:element>
{}"#,
        tables, types
    ))
}

/// One table element with the given field elements.
#[allow(dead_code)]
pub fn table(name: &str, fields: &[&str]) -> String {
    format!(
        r#"<xs:element name="{}">
  <xs:complexType>
    <xs:sequence>
{}
    </xs:sequence>
  </xs:complexType>
</xs:element>"#,
        name,
        fields.join("\n")
    )
}

/// The key types every MDES version declares.
#[allow(dead_code)]
pub const KEY_TYPES: &str = r#"<xs:simpleType name="primaryKeyType">
  <xs:restriction base="xs:string">
    <xs:maxLength value="36"/>
  </xs:restriction>
</xs:simpleType>
<xs:simpleType name="foreignKeyTypeRequired">
  <xs:restriction base="xs:string">
    <xs:maxLength value="36"/>
  </xs:restriction>
</xs:simpleType>"#;

/// Build a specification, failing the test on a fatal error.
#[allow(dead_code)]
pub fn build(version: &str, xsd: &str) -> (Specification, CollectingSink) {
    let sink = CollectingSink::new();
    let spec = Specification::builder(version)
        .build_from_str(xsd, &sink)
        .expect("schema should build");
    (spec, sink)
}
