//! DGML (directed graph markup) encoding of a graph document.

use classmap_protocol::{GraphDocument, Node, NodeCategory};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::io::Cursor;

use crate::error::Result;

const DGML_NAMESPACE: &str = "http://schemas.microsoft.com/vs/2009/dgml";

/// Encode `doc` as an indented DGML document
pub fn to_dgml(doc: &GraphDocument) -> Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut root = BytesStart::new("DirectedGraph");
    root.push_attribute(("xmlns", DGML_NAMESPACE));
    writer.write_event(Event::Start(root))?;

    writer.write_event(Event::Start(BytesStart::new("Nodes")))?;
    for node in &doc.nodes {
        writer.write_event(Event::Empty(node_element(node)))?;
    }
    writer.write_event(Event::End(BytesEnd::new("Nodes")))?;

    writer.write_event(Event::Start(BytesStart::new("Links")))?;
    for edge in &doc.edges {
        let mut link = BytesStart::new("Link");
        link.push_attribute(("Source", edge.source.as_str()));
        link.push_attribute(("Target", edge.target.as_str()));
        link.push_attribute(("Category", edge.category.as_str()));
        writer.write_event(Event::Empty(link))?;
    }
    writer.write_event(Event::End(BytesEnd::new("Links")))?;

    writer.write_event(Event::Start(BytesStart::new("Categories")))?;
    for category in &doc.legend.categories {
        let mut element = BytesStart::new("Category");
        element.push_attribute(("Id", category.id.as_str()));
        if let Some(background) = &category.background {
            element.push_attribute(("Background", background.as_str()));
        }
        writer.write_event(Event::Empty(element))?;
    }
    writer.write_event(Event::End(BytesEnd::new("Categories")))?;

    writer.write_event(Event::Start(BytesStart::new("Styles")))?;
    for style in &doc.legend.styles {
        let category = style.category.as_str();

        let mut element = BytesStart::new("Style");
        element.push_attribute(("TargetType", "Link"));
        element.push_attribute(("GroupLabel", category));
        element.push_attribute(("ValueLabel", "True"));
        writer.write_event(Event::Start(element))?;

        // Category names are plain identifiers; the quotes stay literal.
        let expression = format!("HasCategory('{category}')");
        let mut condition = BytesStart::new("Condition");
        condition.push_attribute((b"Expression".as_slice(), expression.as_bytes()));
        writer.write_event(Event::Empty(condition))?;

        writer.write_event(Event::Empty(setter("Stroke", &style.stroke)))?;
        writer.write_event(Event::Empty(setter(
            "StrokeThickness",
            &style.thickness.to_string(),
        )))?;
        if let Some(dash) = &style.dash_array {
            writer.write_event(Event::Empty(setter("StrokeDashArray", dash)))?;
        }

        writer.write_event(Event::End(BytesEnd::new("Style")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("Styles")))?;

    writer.write_event(Event::End(BytesEnd::new("DirectedGraph")))?;

    let bytes = writer.into_inner().into_inner();
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn node_element(node: &Node) -> BytesStart<'_> {
    let mut element = BytesStart::new("Node");
    element.push_attribute(("Id", node.id.as_str()));
    if node.category == NodeCategory::Namespace {
        element.push_attribute(("Group", "Expanded"));
    }
    element.push_attribute(("Label", node.label.as_str()));
    element.push_attribute(("Category", schema_category(node.category)));
    if let Some(group) = &node.group {
        element.push_attribute(("Group", group.as_str()));
    }
    element
}

fn setter<'a>(property: &'a str, value: &'a str) -> BytesStart<'a> {
    let mut element = BytesStart::new("Setter");
    element.push_attribute(("Property", property));
    element.push_attribute(("Value", value));
    element
}

fn schema_category(category: NodeCategory) -> &'static str {
    match category {
        NodeCategory::Namespace => "CodeSchema_Namespace",
        NodeCategory::Class => "CodeSchema_Class",
        NodeCategory::Interface => "CodeSchema_Interface",
    }
}
