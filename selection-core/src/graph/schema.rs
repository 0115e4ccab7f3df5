//! Property Schema
//!
//! Each object kind exposes a fixed, ordered set of lazy properties. The table
//! here is assembled from the same mixins the host uses to build its node
//! types, so every type lists exactly the accessors the host would offer.
//!
//! `type` and `id` are not part of the table: every resolved record carries
//! them unconditionally. `children` and `parent` are structural and are
//! never resolved as plain properties.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::node::{NodeType, ObjectKind};

const BASE: &[&str] = &["name", "removed"];

const SCENE: &[&str] = &["visible", "locked", "componentPropertyReferences"];

const LAYOUT: &[&str] = &[
    "x",
    "y",
    "width",
    "height",
    "rotation",
    "relativeTransform",
    "absoluteTransform",
    "absoluteBoundingBox",
    "absoluteRenderBounds",
    "constrainProportions",
    "layoutAlign",
    "layoutGrow",
    "layoutPositioning",
    "layoutSizingHorizontal",
    "layoutSizingVertical",
    "minWidth",
    "maxWidth",
    "minHeight",
    "maxHeight",
];

const BLEND: &[&str] = &["opacity", "blendMode", "isMask", "maskType", "effects", "effectStyleId"];

const GEOMETRY: &[&str] = &[
    "fills",
    "fillStyleId",
    "strokes",
    "strokeStyleId",
    "strokeWeight",
    "strokeAlign",
    "strokeJoin",
    "strokeCap",
    "strokeMiterLimit",
    "dashPattern",
];

const CORNER: &[&str] = &[
    "cornerRadius",
    "cornerSmoothing",
    "topLeftRadius",
    "topRightRadius",
    "bottomLeftRadius",
    "bottomRightRadius",
];

const CONSTRAINT: &[&str] = &["constraints"];

const EXPORT: &[&str] = &["exportSettings"];

const REACTION: &[&str] = &["reactions"];

const CONTAINER: &[&str] = &["expanded"];

const AUTO_LAYOUT: &[&str] = &[
    "layoutMode",
    "layoutWrap",
    "primaryAxisSizingMode",
    "counterAxisSizingMode",
    "primaryAxisAlignItems",
    "counterAxisAlignItems",
    "counterAxisAlignContent",
    "paddingLeft",
    "paddingRight",
    "paddingTop",
    "paddingBottom",
    "horizontalPadding",
    "verticalPadding",
    "itemSpacing",
    "counterAxisSpacing",
    "itemReverseZIndex",
    "strokesIncludedInLayout",
];

const FRAME: &[&str] = &["clipsContent", "layoutGrids", "gridStyleId", "guides", "overflowDirection"];

const COMPONENT: &[&str] = &[
    "componentPropertyDefinitions",
    "description",
    "documentationLinks",
    "key",
    "remote",
];

const INSTANCE: &[&str] = &[
    "componentProperties",
    "exposedInstances",
    "isExposedInstance",
    "overrides",
    "scaleFactor",
];

const TEXT: &[&str] = &[
    "characters",
    "hasMissingFont",
    "textAlignHorizontal",
    "textAlignVertical",
    "textAutoResize",
    "textTruncation",
    "maxLines",
    "paragraphIndent",
    "paragraphSpacing",
    "autoRename",
    "fontSize",
    "fontName",
    "fontWeight",
    "textCase",
    "textDecoration",
    "letterSpacing",
    "lineHeight",
    "hyperlink",
    "textStyleId",
];

const VECTOR: &[&str] = &["vectorNetwork", "vectorPaths", "handleMirroring"];

const STAR: &[&str] = &["pointCount", "innerRadius"];

const POLYGON: &[&str] = &["pointCount"];

const ELLIPSE: &[&str] = &["arcData"];

const BOOLEAN_OPERATION: &[&str] = &["booleanOperation"];

const SECTION: &[&str] = &["sectionContentsHidden", "devStatus"];

const STICKABLE: &[&str] = &["authorName", "authorVisible"];

const SUBLAYER_TEXT: &[&str] = &["text"];

const SHAPE_WITH_TEXT: &[&str] = &["shapeType", "cornerRadius"];

const CONNECTOR: &[&str] = &[
    "connectorStart",
    "connectorEnd",
    "connectorLineType",
    "connectorStartStrokeCap",
    "connectorEndStrokeCap",
];

const CODE_BLOCK: &[&str] = &["code", "codeLanguage"];

const TABLE: &[&str] = &["numRows", "numColumns"];

const EMBED: &[&str] = &["embedData"];

const LINK_UNFURL: &[&str] = &["linkUnfurlData"];

const MEDIA: &[&str] = &["mediaData"];

const WIDGET: &[&str] = &["widgetId", "widgetSyncedState"];

/// Properties of a variable, the target of a bound reference.
pub const VARIABLE: &[&str] = &[
    "name",
    "description",
    "hiddenFromPublishing",
    "remote",
    "key",
    "variableCollectionId",
    "resolvedType",
    "valuesByMode",
    "scopes",
    "codeSyntax",
];

fn mixins(node_type: NodeType) -> Vec<&'static [&'static str]> {
    let shape = [BASE, SCENE, REACTION, BLEND, GEOMETRY, LAYOUT, CONSTRAINT, EXPORT];
    match node_type {
        NodeType::Frame | NodeType::Component => {
            let mut table = vec![BASE, SCENE, CONTAINER, REACTION, BLEND, GEOMETRY, CORNER];
            table.extend([LAYOUT, CONSTRAINT, EXPORT, AUTO_LAYOUT, FRAME]);
            if node_type == NodeType::Component {
                table.push(COMPONENT);
            }
            table
        }
        NodeType::ComponentSet => {
            let mut table = vec![BASE, SCENE, CONTAINER, REACTION, BLEND, GEOMETRY, CORNER];
            table.extend([LAYOUT, CONSTRAINT, EXPORT, AUTO_LAYOUT, FRAME, COMPONENT]);
            table
        }
        NodeType::Instance => {
            let mut table = vec![BASE, SCENE, CONTAINER, REACTION, BLEND, GEOMETRY, CORNER];
            table.extend([LAYOUT, CONSTRAINT, EXPORT, AUTO_LAYOUT, FRAME, INSTANCE]);
            table
        }
        NodeType::Group => vec![BASE, SCENE, CONTAINER, REACTION, BLEND, LAYOUT, EXPORT],
        NodeType::BooleanOperation => {
            let mut table = vec![BASE, SCENE, CONTAINER, REACTION, BLEND, GEOMETRY, CORNER];
            table.extend([LAYOUT, CONSTRAINT, EXPORT, BOOLEAN_OPERATION]);
            table
        }
        NodeType::Section => vec![BASE, SCENE, CONTAINER, GEOMETRY, LAYOUT, EXPORT, SECTION],
        NodeType::Rectangle => {
            let mut table = shape.to_vec();
            table.push(CORNER);
            table
        }
        NodeType::Line => shape.to_vec(),
        NodeType::Slice => vec![BASE, SCENE, LAYOUT, CONSTRAINT, EXPORT],
        NodeType::Ellipse => {
            let mut table = shape.to_vec();
            table.push(ELLIPSE);
            table
        }
        NodeType::Polygon => {
            let mut table = shape.to_vec();
            table.extend([CORNER, POLYGON]);
            table
        }
        NodeType::Star => {
            let mut table = shape.to_vec();
            table.extend([CORNER, STAR]);
            table
        }
        NodeType::Vector => {
            let mut table = shape.to_vec();
            table.extend([CORNER, VECTOR]);
            table
        }
        NodeType::Text => {
            let mut table = shape.to_vec();
            table.push(TEXT);
            table
        }
        NodeType::Sticky => vec![BASE, SCENE, BLEND, GEOMETRY, LAYOUT, EXPORT, STICKABLE, SUBLAYER_TEXT],
        NodeType::ShapeWithText => {
            vec![BASE, SCENE, BLEND, GEOMETRY, LAYOUT, EXPORT, SUBLAYER_TEXT, SHAPE_WITH_TEXT]
        }
        NodeType::Stamp | NodeType::Highlight | NodeType::WashiTape => {
            let mut table = shape.to_vec();
            table.push(STICKABLE);
            table
        }
        NodeType::Connector => vec![BASE, SCENE, BLEND, GEOMETRY, LAYOUT, EXPORT, SUBLAYER_TEXT, CONNECTOR],
        NodeType::CodeBlock => vec![BASE, SCENE, LAYOUT, EXPORT, CODE_BLOCK],
        NodeType::Table => vec![BASE, SCENE, BLEND, GEOMETRY, LAYOUT, EXPORT, TABLE],
        NodeType::Embed => vec![BASE, SCENE, LAYOUT, EXPORT, EMBED],
        NodeType::LinkUnfurl => vec![BASE, SCENE, LAYOUT, EXPORT, LINK_UNFURL],
        NodeType::Media => vec![BASE, SCENE, LAYOUT, EXPORT, MEDIA],
        NodeType::Widget => vec![BASE, SCENE, BLEND, LAYOUT, EXPORT, WIDGET],
    }
}

fn build_node_table() -> HashMap<NodeType, Vec<&'static str>> {
    NodeType::ALL
        .into_iter()
        .map(|node_type| {
            let mut keys: Vec<&'static str> = Vec::new();
            for mixin in mixins(node_type) {
                for &key in mixin {
                    if !keys.contains(&key) {
                        keys.push(key);
                    }
                }
            }
            (node_type, keys)
        })
        .collect()
}

static NODE_TABLE: OnceLock<HashMap<NodeType, Vec<&'static str>>> = OnceLock::new();

/// The ordered property names exposed by objects of the given kind.
pub fn properties_for(kind: ObjectKind) -> &'static [&'static str] {
    match kind {
        ObjectKind::Variable => VARIABLE,
        ObjectKind::Node(node_type) => NODE_TABLE
            .get_or_init(build_node_table)
            .get(&node_type)
            .map(Vec::as_slice)
            .unwrap_or(&[]),
    }
}

/// The fixed exclusion policy.
///
/// Reading `componentPropertyDefinitions` throws on variants inside a
/// component set, and the two-sided padding accessors are superseded by the
/// four-sided ones. This policy is not configurable.
pub fn is_excluded(key: &str, parent_type: Option<NodeType>) -> bool {
    match key {
        "componentPropertyDefinitions" => parent_type == Some(NodeType::ComponentSet),
        "horizontalPadding" | "verticalPadding" => true,
        _ => false,
    }
}
