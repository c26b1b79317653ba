//! Read access to the transmission schema tree.
//!
//! The loader only needs a handful of queries against the parsed XSD, so
//! they are gathered in the [`SchemaElement`] trait. `roxmltree` nodes
//! implement it; anything else that can answer the same questions can be
//! loaded too.

use crate::errors::Result;

pub const XS_NS: &str = "http://www.w3.org/2001/XMLSchema";
pub const NCS_NS: &str = "http://www.nationalchildrensstudy.gov";
pub const NCSDOC_NS: &str = "http://www.nationalchildrensstudy.gov/doc";

/// Namespace bound to one of the prefixes the schema uses.
pub fn namespace_for_prefix(prefix: &str) -> Option<&'static str> {
    match prefix {
        "xs" => Some(XS_NS),
        "ncs" => Some(NCS_NS),
        "ncsdoc" => Some(NCSDOC_NS),
        _ => None,
    }
}

/// One element of a parsed schema document.
pub trait SchemaElement: Clone {
    fn local_name(&self) -> &str;

    fn namespace(&self) -> Option<&str>;

    /// Attribute lookup by namespace URI and local name. `None` namespace
    /// means an unqualified attribute.
    fn attribute_ns(&self, namespace: Option<&str>, local: &str) -> Option<&str>;

    /// Element children in document order.
    fn child_elements(&self) -> Vec<Self>;

    /// This element and every element below it, in document order.
    fn descendant_elements(&self) -> Vec<Self>;

    /// 1-based line of the element's start tag.
    fn line(&self) -> u32;

    /// Attribute lookup accepting `prefix:local` for the known prefixes.
    fn attr(&self, name: &str) -> Option<&str> {
        match name.split_once(':') {
            Some((prefix, local)) => {
                let ns = namespace_for_prefix(prefix)?;
                self.attribute_ns(Some(ns), local)
            }
            None => self.attribute_ns(None, name),
        }
    }

    fn is_xs(&self, local: &str) -> bool {
        self.namespace() == Some(XS_NS) && self.local_name() == local
    }

    /// Children that are `xs:<local>` elements.
    fn xs_children(&self, local: &str) -> Vec<Self> {
        self.child_elements()
            .into_iter()
            .filter(|c| c.is_xs(local))
            .collect()
    }

    /// Follows a chain of `xs:` child steps, collecting every match.
    fn xs_path(&self, steps: &[&str]) -> Vec<Self> {
        steps.iter().fold(vec![self.clone()], |current, step| {
            current
                .iter()
                .flat_map(|node| node.xs_children(step))
                .collect()
        })
    }

    /// The table elements inside every `transmission_tables` container.
    fn transmission_table_elements(&self) -> Vec<Self> {
        self.descendant_elements()
            .into_iter()
            .filter(|e| e.is_xs("element") && e.attr("name") == Some("transmission_tables"))
            .flat_map(|container| container.xs_path(&["complexType", "sequence", "element"]))
            .collect()
    }

    /// The field elements of a table element.
    fn variable_elements(&self) -> Vec<Self> {
        self.xs_path(&["complexType", "sequence", "element"])
    }

    /// Every `xs:simpleType` that carries a name.
    fn named_simple_types(&self) -> Vec<Self> {
        self.descendant_elements()
            .into_iter()
            .filter(|e| e.is_xs("simpleType") && e.attr("name").is_some())
            .collect()
    }

    /// The inline `xs:simpleType` when it is the element's only child.
    fn sole_simple_type_child(&self) -> Option<Self> {
        let mut children = self.child_elements();
        if children.len() == 1 && children[0].is_xs("simpleType") {
            children.pop()
        } else {
            None
        }
    }
}

impl<'a, 'input> SchemaElement for roxmltree::Node<'a, 'input> {
    fn local_name(&self) -> &str {
        self.tag_name().name()
    }

    fn namespace(&self) -> Option<&str> {
        self.tag_name().namespace()
    }

    fn attribute_ns(&self, namespace: Option<&str>, local: &str) -> Option<&str> {
        match namespace {
            Some(ns) => roxmltree::Node::attribute(self, (ns, local)),
            None => roxmltree::Node::attribute(self, local),
        }
    }

    fn child_elements(&self) -> Vec<Self> {
        self.children().filter(|n| n.is_element()).collect()
    }

    fn descendant_elements(&self) -> Vec<Self> {
        self.descendants().filter(|n| n.is_element()).collect()
    }

    fn line(&self) -> u32 {
        self.document().text_pos_at(self.range().start).row
    }
}

/// Parses schema text into a document tree.
///
/// # Errors
///
/// `InvalidSchema` when the text is not well-formed XML.
pub fn parse_document(text: &str) -> Result<roxmltree::Document<'_>> {
    Ok(roxmltree::Document::parse(text)?)
}
