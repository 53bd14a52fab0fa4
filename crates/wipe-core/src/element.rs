//! Element types mirrored from the host document.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::workset::WorksetId;

/// Stable element identifier.
///
/// Distinct from the in-memory handle; used for set membership checks
/// such as "is this view currently open".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ElementId(pub i64);

impl From<i64> for ElementId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Built-in categories the cleanup actions query by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuiltInCategory {
    Constraints,
    Sheets,
    Rooms,
    Areas,
    RoomSeparationLines,
    AreaSchemeLines,
    VolumeOfInterest,
    CLines,
    Materials,
    Views,
    IoSModelGroups,
    IoSDetailGroups,
    IoSAttachedDetailGroups,
    /// Any category the engine does not query directly.
    #[serde(other)]
    Other,
}

/// Category attached to an element: the built-in tag plus its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub builtin: BuiltInCategory,
    pub name: String,
}

impl Category {
    pub fn new(builtin: BuiltInCategory, name: impl Into<String>) -> Self {
        Self {
            builtin,
            name: name.into(),
        }
    }
}

/// Host class of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementClass {
    View,
    Group,
    GroupType,
    ImportInstance,
    RevitLinkType,
    CadLinkType,
    ElevationMarker,
    FilterElement,
    Material,
    #[serde(other)]
    Other,
}

/// Kind of a view element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewKind {
    Undefined,
    ProjectBrowser,
    SystemBrowser,
    Internal,
    DrawingSheet,
    ThreeD,
    FloorPlan,
    CeilingPlan,
    Elevation,
    Section,
    Detail,
    DraftingView,
    Legend,
    Schedule,
    #[serde(other)]
    Other,
}

impl ViewKind {
    /// Browser, internal and undefined kinds that cleanup never touches.
    pub fn is_system(self) -> bool {
        matches!(
            self,
            ViewKind::ProjectBrowser
                | ViewKind::SystemBrowser
                | ViewKind::Undefined
                | ViewKind::DrawingSheet
                | ViewKind::Internal
        )
    }
}

/// View-specific facts carried by view elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewData {
    pub kind: ViewKind,
    #[serde(default)]
    pub is_template: bool,
}

/// Value of a named element parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Text(String),
    Number(f64),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// One addressable object in the document.
///
/// Handles are snapshots: they are read for one action and never cached
/// across actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,

    /// Display name (view name, material name, ...).
    #[serde(default)]
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,

    pub class: ElementClass,

    /// True for element types (family types, group types).
    #[serde(default)]
    pub is_type: bool,

    /// Type of this instance, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_id: Option<ElementId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub workset: Option<WorksetId>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, ParamValue>,

    /// Present on views.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<ViewData>,

    /// View that owns this element (constraints, annotations).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_view: Option<ElementId>,

    /// Number of views hosted by an elevation marker.
    #[serde(default)]
    pub hosted_view_count: u32,

    /// Members of a group instance.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<ElementId>,
}

impl Element {
    /// Create an element with the required fields.
    pub fn new(id: i64, class: ElementClass, name: impl Into<String>) -> Self {
        Self {
            id: ElementId(id),
            name: name.into(),
            category: None,
            class,
            is_type: false,
            type_id: None,
            workset: None,
            params: BTreeMap::new(),
            view: None,
            owner_view: None,
            hosted_view_count: 0,
            members: Vec::new(),
        }
    }

    pub fn with_category(mut self, builtin: BuiltInCategory, name: impl Into<String>) -> Self {
        self.category = Some(Category::new(builtin, name));
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: ParamValue) -> Self {
        self.params.insert(key.into(), value);
        self
    }

    pub fn with_view(mut self, kind: ViewKind, is_template: bool) -> Self {
        self.view = Some(ViewData { kind, is_template });
        self
    }

    pub fn with_workset(mut self, workset: WorksetId) -> Self {
        self.workset = Some(workset);
        self
    }

    pub fn as_type(mut self) -> Self {
        self.is_type = true;
        self
    }

    /// Category display name, if the element has a category.
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.name.as_str())
    }

    pub fn in_category(&self, builtin: BuiltInCategory) -> bool {
        self.category.as_ref().is_some_and(|c| c.builtin == builtin)
    }

    /// Text value of a parameter, empty when missing or numeric.
    pub fn param_str(&self, key: &str) -> &str {
        match self.params.get(key) {
            Some(ParamValue::Text(s)) => s.as_str(),
            _ => "",
        }
    }

    pub fn is_view_template(&self) -> bool {
        self.view.is_some_and(|v| v.is_template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_builder() {
        let el = Element::new(7, ElementClass::Other, "Room 1")
            .with_category(BuiltInCategory::Rooms, "Rooms")
            .with_param("Number", ParamValue::Text("101".to_string()));

        assert_eq!(el.id, ElementId(7));
        assert!(el.in_category(BuiltInCategory::Rooms));
        assert!(!el.in_category(BuiltInCategory::Areas));
        assert_eq!(el.category_name(), Some("Rooms"));
        assert_eq!(el.param_str("Number"), "101");
        assert_eq!(el.param_str("Missing"), "");
    }

    #[test]
    fn test_view_kind_is_system() {
        assert!(ViewKind::ProjectBrowser.is_system());
        assert!(ViewKind::DrawingSheet.is_system());
        assert!(!ViewKind::ThreeD.is_system());
        assert!(!ViewKind::FloorPlan.is_system());
    }

    #[test]
    fn test_unknown_class_deserializes_as_other() {
        let el: Element =
            serde_json::from_str(r#"{"id": 3, "class": "Wall", "name": "Basic Wall"}"#).unwrap();
        assert_eq!(el.class, ElementClass::Other);
        assert_eq!(el.id, ElementId(3));
    }
}
