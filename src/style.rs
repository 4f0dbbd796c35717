// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgdomtree::{AttributeId, FromValue, Node};

/// A stack of element frames used to resolve presentation attributes.
///
/// Lookup walks the stack from top to bottom for inheritable properties;
/// non-inheritable properties are read from the top frame only. Explicit
/// `inherit` values are already resolved by the DOM layer.
pub struct StyleStack<'a, 'input: 'a> {
    stack: Vec<Node<'a, 'input>>,
}

impl<'a, 'input: 'a> StyleStack<'a, 'input> {
    pub fn new() -> Self {
        StyleStack { stack: Vec::new() }
    }

    pub fn push(&mut self, node: Node<'a, 'input>) {
        self.stack.push(node);
    }

    pub fn pop(&mut self) {
        self.stack.pop();
    }

    fn find_frame(&self, aid: AttributeId) -> Option<Node<'a, 'input>> {
        if aid.is_inheritable() {
            self.stack
                .iter()
                .rev()
                .find(|n| n.has_attribute(aid))
                .copied()
        } else {
            let top = self.stack.last()?;
            if top.has_attribute(aid) {
                Some(*top)
            } else {
                None
            }
        }
    }

    /// Resolves and parses a property.
    pub fn get<T: FromValue<'a, 'input>>(&self, aid: AttributeId) -> Option<T> {
        self.find_frame(aid)?.attribute(aid)
    }

    /// Resolves a property without parsing it.
    pub fn get_str(&self, aid: AttributeId) -> Option<&'a str> {
        self.find_frame(aid)?.attribute_str(aid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use svgdomtree::Document;

    #[test]
    fn inheritable_property_walks_the_stack() {
        let doc = Document::parse_str(
            "<svg xmlns='http://www.w3.org/2000/svg'>\
                <g fill='red'><rect/></g>\
            </svg>",
        )
        .unwrap();

        let g = doc.root_element().first_element_child().unwrap();
        let rect = g.first_element_child().unwrap();

        let mut stack = StyleStack::new();
        stack.push(doc.root_element());
        stack.push(g);
        stack.push(rect);

        assert_eq!(stack.get_str(AttributeId::Fill), Some("red"));
    }

    #[test]
    fn non_inheritable_property_reads_the_top_frame_only() {
        let doc = Document::parse_str(
            "<svg xmlns='http://www.w3.org/2000/svg'>\
                <g opacity='0.5'><rect/></g>\
            </svg>",
        )
        .unwrap();

        let g = doc.root_element().first_element_child().unwrap();
        let rect = g.first_element_child().unwrap();

        let mut stack = StyleStack::new();
        stack.push(g);
        assert_eq!(stack.get::<f64>(AttributeId::Opacity), Some(0.5));

        stack.push(rect);
        assert_eq!(stack.get::<f64>(AttributeId::Opacity), None);
    }

    #[test]
    fn closer_frame_wins() {
        let doc = Document::parse_str(
            "<svg xmlns='http://www.w3.org/2000/svg' fill='red'>\
                <g fill='green'><rect/></g>\
            </svg>",
        )
        .unwrap();

        let g = doc.root_element().first_element_child().unwrap();

        let mut stack = StyleStack::new();
        stack.push(doc.root_element());
        stack.push(g);

        assert_eq!(stack.get_str(AttributeId::Fill), Some("green"));
    }
}
