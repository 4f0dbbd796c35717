use std::collections::HashMap;

use roxmltree::Error;

use crate::{Attribute, AttributeId, Document, ElementId, Node, NodeData, NodeId, NodeKind};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
const XML_NAMESPACE_NS: &str = "http://www.w3.org/XML/1998/namespace";

impl<'input> Document<'input> {
    /// Parses a [`Document`] from a string.
    pub fn parse_str(text: &'input str) -> Result<Document<'input>, Error> {
        let xml = roxmltree::Document::parse(text)?;
        parse(&xml)
    }

    /// Parses a [`Document`] from a [`roxmltree::Document`].
    pub fn parse_tree(xml: &roxmltree::Document<'input>) -> Result<Document<'input>, Error> {
        parse(xml)
    }

    fn append(&mut self, parent_id: NodeId, kind: NodeKind) -> NodeId {
        let new_child_id = NodeId::from(self.nodes.len());
        self.nodes.push(NodeData {
            parent: Some(parent_id),
            next_sibling: None,
            children: None,
            kind,
        });

        let last_child_id = self.nodes[parent_id.get_usize()].children.map(|(_, id)| id);

        if let Some(id) = last_child_id {
            self.nodes[id.get_usize()].next_sibling = Some(new_child_id);
        }

        self.nodes[parent_id.get_usize()].children = Some(
            if let Some((first_child_id, _)) = self.nodes[parent_id.get_usize()].children {
                (first_child_id, new_child_id)
            } else {
                (new_child_id, new_child_id)
            },
        );

        new_child_id
    }

    fn append_attribute(&mut self, name: AttributeId, value: roxmltree::StringStorage<'input>) {
        self.attrs.push(Attribute { name, value });
    }
}

fn parse<'input>(xml: &roxmltree::Document<'input>) -> Result<Document<'input>, Error> {
    let mut doc = Document {
        nodes: Vec::new(),
        attrs: Vec::new(),
        links: HashMap::new(),
    };

    // Add a root node.
    doc.nodes.push(NodeData {
        parent: None,
        next_sibling: None,
        children: None,
        kind: NodeKind::Root,
    });

    let style_sheet = resolve_css(xml);

    for node in xml.root().children() {
        parse_xml_node(node, doc.root().id, &style_sheet, 0, &mut doc)?;
    }

    // Check that the root element is `svg`.
    match doc.root().first_element_child() {
        Some(child) => {
            if child.tag_name() != Some(ElementId::Svg) {
                return Err(roxmltree::Error::NoRootNode);
            }
        }
        None => return Err(roxmltree::Error::NoRootNode),
    }

    // Collect all elements with an `id` attribute.
    let mut links = HashMap::new();
    for node in doc.descendants() {
        if let Some(id) = node.attribute::<&str>(AttributeId::Id) {
            links.entry(id.to_string()).or_insert(node.id);
        }
    }
    doc.links = links;

    fix_recursive_links(ElementId::Mask, AttributeId::Mask, &mut doc);
    fix_recursive_links(ElementId::Filter, AttributeId::Filter, &mut doc);

    Ok(doc)
}

fn parse_tag_name(node: roxmltree::Node) -> Option<ElementId> {
    if !node.is_element() {
        return None;
    }

    if node.tag_name().namespace() != Some(SVG_NS) {
        return None;
    }

    ElementId::from_str(node.tag_name().name())
}

fn parse_xml_node<'input>(
    node: roxmltree::Node<'_, 'input>,
    parent_id: NodeId,
    style_sheet: &simplecss::StyleSheet,
    depth: u32,
    doc: &mut Document<'input>,
) -> Result<(), Error> {
    if depth > 1024 {
        return Err(Error::NodesLimitReached);
    }

    let mut tag_name = match parse_tag_name(node) {
        Some(id) => id,
        None => return Ok(()),
    };

    // The CSS content was already collected.
    if tag_name == ElementId::Style {
        return Ok(());
    }

    // Treat links as groups.
    if tag_name == ElementId::A {
        tag_name = ElementId::G;
    }

    let node_id = parse_svg_element(node, parent_id, tag_name, style_sheet, doc)?;
    for child in node.children() {
        parse_xml_node(child, node_id, style_sheet, depth + 1, doc)?;
    }

    Ok(())
}

fn parse_svg_element<'input>(
    xml_node: roxmltree::Node<'_, 'input>,
    parent_id: NodeId,
    tag_name: ElementId,
    style_sheet: &simplecss::StyleSheet,
    doc: &mut Document<'input>,
) -> Result<NodeId, Error> {
    let attrs_start_idx = doc.attrs.len();

    // Copy the XML attributes first.
    for attr in xml_node.attributes() {
        match attr.namespace() {
            None | Some(SVG_NS) | Some(XLINK_NS) | Some(XML_NAMESPACE_NS) => {}
            _ => continue,
        }

        let aid = match AttributeId::from_str(attr.name()) {
            Some(v) => v,
            None => continue,
        };

        append_attribute(parent_id, aid, attr.value_storage().clone(), doc);
    }

    let mut insert_attribute = |doc: &mut Document<'input>, aid, value: &str| {
        // Check if the attribute was already added.
        let idx = doc.attrs[attrs_start_idx..]
            .iter()
            .position(|a| a.name == aid);

        let added = append_attribute(
            parent_id,
            aid,
            roxmltree::StringStorage::new_owned(value),
            doc,
        );

        // A declaration overrides a plain XML attribute.
        if added {
            if let Some(idx) = idx {
                let last_idx = doc.attrs.len() - 1;
                doc.attrs.swap(attrs_start_idx + idx, last_idx);
                doc.attrs.pop();
            }
        }
    };

    // Apply CSS.
    for rule in &style_sheet.rules {
        if rule.selector.matches(&XmlNode(xml_node)) {
            for declaration in &rule.declarations {
                if let Some(aid) = AttributeId::from_str(declaration.name) {
                    if aid.is_presentation() {
                        insert_attribute(doc, aid, declaration.value);
                    }
                }
            }
        }
    }

    // Split a `style` attribute.
    if let Some(value) = xml_node.attribute("style") {
        for declaration in simplecss::DeclarationTokenizer::from(value) {
            if let Some(aid) = AttributeId::from_str(declaration.name) {
                if aid.is_presentation() {
                    insert_attribute(doc, aid, declaration.value);
                }
            }
        }
    }

    if doc.nodes.len() > 1_000_000 {
        return Err(Error::NodesLimitReached);
    }

    let node_id = doc.append(
        parent_id,
        NodeKind::Element {
            tag_name,
            attributes: attrs_start_idx..doc.attrs.len(),
        },
    );

    Ok(node_id)
}

fn append_attribute<'input>(
    parent_id: NodeId,
    aid: AttributeId,
    value: roxmltree::StringStorage<'input>,
    doc: &mut Document<'input>,
) -> bool {
    match aid {
        // The `style` attribute is split into attributes, so we don't need it.
        AttributeId::Style |
        // No need to keep the `class` attribute since CSS is already resolved.
        AttributeId::Class => return false,
        _ => {}
    }

    if aid.allows_inherit_value() && &*value == "inherit" {
        return resolve_inherit(parent_id, aid, doc);
    }

    doc.append_attribute(aid, value);
    true
}

fn resolve_inherit(parent_id: NodeId, aid: AttributeId, doc: &mut Document) -> bool {
    if aid.is_inheritable() {
        // Inheritable attributes can inherit a value from any ancestor.
        let node_id = doc
            .get(parent_id)
            .ancestors()
            .find(|n| n.has_attribute(aid))
            .map(|n| n.id);
        if let Some(node_id) = node_id {
            if let Some(attr) = doc
                .get(node_id)
                .attributes()
                .iter()
                .find(|a| a.name == aid)
                .cloned()
            {
                doc.attrs.push(Attribute {
                    name: aid,
                    value: attr.value,
                });
                return true;
            }
        }
    } else {
        // Non-inheritable attributes can inherit a value only from a direct parent.
        if let Some(attr) = doc
            .get(parent_id)
            .attributes()
            .iter()
            .find(|a| a.name == aid)
            .cloned()
        {
            doc.attrs.push(Attribute {
                name: aid,
                value: attr.value,
            });
            return true;
        }
    }

    // Fall back to a default value if possible.
    let value = match aid {
        AttributeId::Filter | AttributeId::Mask | AttributeId::Stroke
        | AttributeId::StrokeDasharray => "none",
        AttributeId::Fill | AttributeId::StopColor => "black",
        AttributeId::FillOpacity
        | AttributeId::Opacity
        | AttributeId::StopOpacity
        | AttributeId::StrokeOpacity => "1",
        AttributeId::FillRule => "nonzero",
        AttributeId::Display => "inline",
        AttributeId::StrokeDashoffset => "0",
        AttributeId::StrokeLinecap => "butt",
        AttributeId::StrokeLinejoin => "miter",
        AttributeId::StrokeMiterlimit => "4",
        AttributeId::StrokeWidth => "1",
        AttributeId::Visibility => "visible",
        _ => return false,
    };

    doc.append_attribute(aid, roxmltree::StringStorage::Borrowed(value));
    true
}

fn resolve_css<'a>(xml: &'a roxmltree::Document<'a>) -> simplecss::StyleSheet<'a> {
    let mut sheet = simplecss::StyleSheet::new();

    for node in xml.descendants().filter(|n| n.has_tag_name("style")) {
        match node.attribute("type") {
            Some("text/css") | None => {}
            Some(_) => continue,
        }

        let text = match node.text() {
            Some(v) => v,
            None => continue,
        };

        sheet.parse_more(text);
    }

    sheet
}

struct XmlNode<'a, 'input: 'a>(roxmltree::Node<'a, 'input>);

impl simplecss::Element for XmlNode<'_, '_> {
    fn parent_element(&self) -> Option<Self> {
        self.0.parent_element().map(XmlNode)
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        self.0.prev_sibling_element().map(XmlNode)
    }

    fn has_local_name(&self, local_name: &str) -> bool {
        self.0.tag_name().name() == local_name
    }

    fn attribute_matches(&self, local_name: &str, operator: simplecss::AttributeOperator) -> bool {
        match self.0.attribute(local_name) {
            Some(value) => operator.matches(value),
            None => false,
        }
    }

    fn pseudo_class_matches(&self, class: simplecss::PseudoClass) -> bool {
        match class {
            simplecss::PseudoClass::FirstChild => self.prev_sibling_element().is_none(),
            // Since we are querying a static SVG we can ignore other pseudo-classes.
            _ => false,
        }
    }
}

fn fix_recursive_links(eid: ElementId, aid: AttributeId, doc: &mut Document) {
    while let Some(node_id) = find_recursive_link(eid, aid, doc) {
        let idx = doc.get(node_id).attribute_idx(aid).unwrap();
        doc.attrs[idx].value = roxmltree::StringStorage::Borrowed("none");
    }
}

fn find_recursive_link(eid: ElementId, aid: AttributeId, doc: &Document) -> Option<NodeId> {
    for node in doc
        .root()
        .descendants()
        .filter(|n| n.tag_name() == Some(eid))
    {
        for child in node.descendants() {
            match child.attribute_str(aid) {
                None | Some("none") => continue,
                Some(_) => {}
            }

            if let Some(link) = child.attribute::<Node>(aid) {
                if link == node {
                    // An element child referencing the element itself would
                    // recurse endlessly during rendering.
                    return Some(child.id);
                } else {
                    // Check that the linked node's children do not reference
                    // this element either.
                    for node2 in link.descendants() {
                        if let Some(link2) = node2.attribute::<Node>(aid) {
                            if link2 == node {
                                return Some(node2.id);
                            }
                        }
                    }
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use crate::{AttributeId, Document, ElementId};

    #[test]
    fn parses_a_minimal_document() {
        let doc = Document::parse_str("<svg xmlns='http://www.w3.org/2000/svg'/>").unwrap();
        assert_eq!(doc.root_element().tag_name(), Some(ElementId::Svg));
    }

    #[test]
    fn non_svg_root_is_an_error() {
        assert!(Document::parse_str("<html xmlns='http://www.w3.org/2000/svg'/>").is_err());
    }

    #[test]
    fn style_attribute_overrides_xml_attribute() {
        let doc = Document::parse_str(
            "<svg xmlns='http://www.w3.org/2000/svg'>\
                <rect fill='red' style='fill:green'/>\
            </svg>",
        )
        .unwrap();

        let rect = doc.root_element().first_element_child().unwrap();
        assert_eq!(rect.attribute_str(AttributeId::Fill), Some("green"));
    }

    #[test]
    fn css_rules_are_applied() {
        let doc = Document::parse_str(
            "<svg xmlns='http://www.w3.org/2000/svg'>\
                <style>.big { stroke-width: 5 }</style>\
                <rect class='big'/>\
            </svg>",
        )
        .unwrap();

        let rect = doc.root_element().first_element_child().unwrap();
        assert_eq!(rect.tag_name(), Some(ElementId::Rect));
        assert_eq!(rect.attribute_str(AttributeId::StrokeWidth), Some("5"));
    }

    #[test]
    fn explicit_inherit_is_resolved() {
        let doc = Document::parse_str(
            "<svg xmlns='http://www.w3.org/2000/svg' fill='blue'>\
                <rect fill='inherit'/>\
            </svg>",
        )
        .unwrap();

        let rect = doc.root_element().first_element_child().unwrap();
        assert_eq!(rect.attribute_str(AttributeId::Fill), Some("blue"));
    }

    #[test]
    fn element_by_id_lookup() {
        let doc = Document::parse_str(
            "<svg xmlns='http://www.w3.org/2000/svg'>\
                <defs><linearGradient id='lg'/></defs>\
            </svg>",
        )
        .unwrap();

        let lg = doc.element_by_id("lg").unwrap();
        assert_eq!(lg.tag_name(), Some(ElementId::LinearGradient));
        assert!(doc.element_by_id("missing").is_none());
    }

    #[test]
    fn unknown_elements_are_dropped() {
        let doc = Document::parse_str(
            "<svg xmlns='http://www.w3.org/2000/svg'>\
                <video/><rect/>\
            </svg>",
        )
        .unwrap();

        let mut children = doc.root_element().children();
        assert_eq!(children.next().unwrap().tag_name(), Some(ElementId::Rect));
        assert!(children.next().is_none());
    }
}
