// src/project/document.rs

//! The unevaluated project document
//!
//! This is the construction tree the converter rewrites: property groups,
//! item groups and imports in document order, each possibly conditioned.
//! It knows nothing about defaults or evaluation.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::element::{XmlDeclaration, XmlDocument, XmlElement, XmlNode, parse_xml, write_xml};
use crate::error::{Error, Result};
use crate::evaluation::GroupScope;
use crate::ignore_case::{IgnoreCase, same_include};

/// Item attributes that are neither the item operation nor metadata
const RESERVED_ITEM_ATTRIBUTES: &[&str] = &[
    "Condition",
    "Exclude",
    "Label",
    "KeepMetadata",
    "RemoveMetadata",
    "KeepDuplicates",
    "MatchOnMetadata",
    "MatchOnMetadataOptions",
];

/// An `<Import Project="..."/>` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub project: String,
    pub condition: Option<String>,
    pub other_attributes: Vec<(String, String)>,
}

impl Import {
    /// File name of the imported project, without any directory or property prefix
    pub fn file_name(&self) -> &str {
        self.project
            .rsplit(['\\', '/', ')'])
            .next()
            .unwrap_or(&self.project)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub value: String,
    pub condition: Option<String>,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            condition: None,
        }
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyGroup {
    pub condition: Option<String>,
    pub other_attributes: Vec<(String, String)>,
    pub properties: Vec<Property>,
}

impl PropertyGroup {
    pub fn scope(&self) -> GroupScope {
        GroupScope::from_condition(self.condition.as_deref())
    }

    pub fn is_unconditioned(&self) -> bool {
        self.scope() == GroupScope::Unconditioned
    }

    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.is_named(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Append a property unless one with the same name exists
    pub fn set_if_absent(&mut self, name: &str, value: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.properties.push(Property::new(name, value));
        true
    }

    pub fn prepend(&mut self, property: Property) {
        self.properties.insert(0, property);
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// How an item element addresses files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOperation {
    Include,
    Update,
    Remove,
}

impl ItemOperation {
    pub fn attribute_name(&self) -> &'static str {
        match self {
            Self::Include => "Include",
            Self::Update => "Update",
            Self::Remove => "Remove",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub name: String,
    pub value: String,
    /// Written as an attribute on the item rather than a child element
    pub as_attribute: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub item_type: String,
    pub operation: ItemOperation,
    /// The value of the Include/Update/Remove attribute
    pub spec: String,
    pub exclude: Option<String>,
    pub condition: Option<String>,
    pub other_attributes: Vec<(String, String)>,
    pub metadata: Vec<Metadata>,
}

impl Item {
    pub fn new(item_type: impl Into<String>, operation: ItemOperation, spec: impl Into<String>) -> Self {
        Self {
            item_type: item_type.into(),
            operation,
            spec: spec.into(),
            exclude: None,
            condition: None,
            other_attributes: Vec::new(),
            metadata: Vec::new(),
        }
    }

    pub fn include(item_type: impl Into<String>, spec: impl Into<String>) -> Self {
        Self::new(item_type, ItemOperation::Include, spec)
    }

    pub fn remove(item_type: impl Into<String>, spec: impl Into<String>) -> Self {
        Self::new(item_type, ItemOperation::Remove, spec)
    }

    pub fn with_metadata(mut self, name: &str, value: &str, as_attribute: bool) -> Self {
        self.metadata.push(Metadata {
            name: name.to_string(),
            value: value.to_string(),
            as_attribute,
        });
        self
    }

    pub fn is_type(&self, item_type: &str) -> bool {
        self.item_type.eq_ignore_ascii_case(item_type)
    }

    /// The include path when this item is an Include
    pub fn include_spec(&self) -> Option<&str> {
        (self.operation == ItemOperation::Include).then_some(self.spec.as_str())
    }

    pub fn metadata_value(&self, name: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
            .map(|m| m.value.as_str())
    }

    pub fn has_metadata(&self) -> bool {
        !self.metadata.is_empty()
    }

    /// Assembly simple name for `Reference` includes like
    /// `System.Net.Http, Version=4.2.0.0, Culture=neutral`
    pub fn simple_name(&self) -> &str {
        self.spec.split(',').next().unwrap_or(&self.spec).trim()
    }

    pub fn matches_include(&self, include: &str) -> bool {
        self.operation == ItemOperation::Include && same_include(&self.spec, include)
    }

    /// Turn `Include="x"` into `Update="x"`, keeping metadata
    pub fn convert_to_update(&mut self) {
        self.operation = ItemOperation::Update;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemGroup {
    pub condition: Option<String>,
    pub other_attributes: Vec<(String, String)>,
    pub items: Vec<Item>,
}

impl ItemGroup {
    pub fn scope(&self) -> GroupScope {
        GroupScope::from_condition(self.condition.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A direct child of the `<Project>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectChild {
    PropertyGroup(PropertyGroup),
    ItemGroup(ItemGroup),
    Import(Import),
    /// Anything else, preserved as-is
    Other(XmlNode),
}

/// A project file as an editable tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDocument {
    path: Option<PathBuf>,
    declaration: Option<XmlDeclaration>,
    attributes: Vec<(String, String)>,
    pub children: Vec<ProjectChild>,
}

impl ProjectDocument {
    /// An empty `<Project>` with no attributes
    pub fn new() -> Self {
        Self {
            path: None,
            declaration: None,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Parse project XML text
    pub fn parse(text: &str) -> Result<Self> {
        let xml = parse_xml(text)?;
        Self::from_xml(xml)
    }

    /// Read and parse a project file, remembering its path
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let mut document = Self::parse(&text)?;
        document.path = Some(path.to_path_buf());
        Ok(document)
    }

    /// Serialize back to project XML
    pub fn to_xml_string(&self) -> Result<String> {
        write_xml(&self.to_xml())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// The project file's base name, e.g. `MyApp` for `src/MyApp.csproj`
    pub fn project_name(&self) -> Option<&str> {
        self.path.as_deref()?.file_stem()?.to_str()
    }

    /// File extension of the project, e.g. `csproj`
    pub fn extension(&self) -> Option<&str> {
        self.path.as_deref()?.extension()?.to_str()
    }

    // Root attributes

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Set a root attribute; new attributes are placed first
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self
            .attributes
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            Some((_, v)) => *v = value.to_string(),
            None => self
                .attributes
                .insert(0, (name.to_string(), value.to_string())),
        }
    }

    pub fn remove_attribute(&mut self, name: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        before != self.attributes.len()
    }

    pub fn sdk(&self) -> Option<&str> {
        self.attribute("Sdk")
    }

    pub fn tools_version(&self) -> Option<&str> {
        self.attribute("ToolsVersion")
    }

    pub fn default_targets(&self) -> Option<&str> {
        self.attribute("DefaultTargets")
    }

    // Imports

    pub fn imports(&self) -> impl Iterator<Item = &Import> {
        self.children.iter().filter_map(|c| match c {
            ProjectChild::Import(i) => Some(i),
            _ => None,
        })
    }

    /// `ImportGroup` elements are kept opaque; their presence matters for style
    pub fn has_import_groups(&self) -> bool {
        self.children.iter().any(|c| {
            matches!(c, ProjectChild::Other(XmlNode::Element(e)) if e.name.eq_ignore_ascii_case("ImportGroup"))
        })
    }

    /// Remove every top-level import, returning how many were removed
    pub fn remove_imports(&mut self) -> usize {
        let before = self.children.len();
        self.children
            .retain(|c| !matches!(c, ProjectChild::Import(_)));
        before - self.children.len()
    }

    // Property groups

    pub fn property_groups(&self) -> impl Iterator<Item = &PropertyGroup> {
        self.children.iter().filter_map(|c| match c {
            ProjectChild::PropertyGroup(g) => Some(g),
            _ => None,
        })
    }

    pub fn property_groups_mut(&mut self) -> impl Iterator<Item = &mut PropertyGroup> {
        self.children.iter_mut().filter_map(|c| match c {
            ProjectChild::PropertyGroup(g) => Some(g),
            _ => None,
        })
    }

    /// First property with this name in an unconditioned group
    pub fn unconditioned_property(&self, name: &str) -> Option<&Property> {
        self.property_groups()
            .filter(|g| g.is_unconditioned())
            .find_map(|g| g.get(name))
    }

    /// Index (into `children`) of the first unconditioned property group
    /// holding `name`
    pub fn property_group_index_with(&self, name: &str) -> Option<usize> {
        self.children.iter().position(|c| {
            matches!(c, ProjectChild::PropertyGroup(g) if g.is_unconditioned() && g.contains(name))
        })
    }

    /// Index of the first unconditioned property group, creating one when the
    /// document has none. A created group goes after the last existing
    /// property group, or first in the document.
    pub fn ensure_top_level_property_group(&mut self) -> usize {
        if let Some(index) = self
            .children
            .iter()
            .position(|c| matches!(c, ProjectChild::PropertyGroup(g) if g.is_unconditioned()))
        {
            return index;
        }

        let at = self
            .children
            .iter()
            .rposition(|c| matches!(c, ProjectChild::PropertyGroup(_)))
            .map(|i| i + 1)
            .unwrap_or(0);
        self.children
            .insert(at, ProjectChild::PropertyGroup(PropertyGroup::default()));
        at
    }

    pub fn property_group_mut(&mut self, index: usize) -> Option<&mut PropertyGroup> {
        match self.children.get_mut(index) {
            Some(ProjectChild::PropertyGroup(g)) => Some(g),
            _ => None,
        }
    }

    // Item groups

    pub fn item_groups(&self) -> impl Iterator<Item = &ItemGroup> {
        self.children.iter().filter_map(|c| match c {
            ProjectChild::ItemGroup(g) => Some(g),
            _ => None,
        })
    }

    pub fn item_groups_mut(&mut self) -> impl Iterator<Item = &mut ItemGroup> {
        self.children.iter_mut().filter_map(|c| match c {
            ProjectChild::ItemGroup(g) => Some(g),
            _ => None,
        })
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.item_groups().flat_map(|g| g.items.iter())
    }

    /// Distinct item types declared anywhere in the document
    pub fn item_types(&self) -> BTreeSet<IgnoreCase> {
        self.items()
            .map(|i| IgnoreCase::from(i.item_type.as_str()))
            .collect()
    }

    pub fn has_item_type(&self, item_type: &str) -> bool {
        self.items().any(|i| i.is_type(item_type))
    }

    /// Whether a `Reference` to the given assembly simple name is declared
    pub fn has_reference(&self, assembly: &str) -> bool {
        self.items()
            .any(|i| i.is_type("Reference") && i.simple_name().eq_ignore_ascii_case(assembly))
    }

    /// Append a new item group after the last existing one (or at the end)
    pub fn push_item_group(&mut self, group: ItemGroup) -> usize {
        let at = self
            .children
            .iter()
            .rposition(|c| matches!(c, ProjectChild::ItemGroup(_)))
            .map(|i| i + 1)
            .unwrap_or(self.children.len());
        self.children.insert(at, ProjectChild::ItemGroup(group));
        at
    }

    pub fn item_group_mut(&mut self, index: usize) -> Option<&mut ItemGroup> {
        match self.children.get_mut(index) {
            Some(ProjectChild::ItemGroup(g)) => Some(g),
            _ => None,
        }
    }

    /// Drop property and item groups that no longer have children
    pub fn remove_empty_groups(&mut self) -> usize {
        let before = self.children.len();
        self.children.retain(|c| match c {
            ProjectChild::PropertyGroup(g) => !g.is_empty(),
            ProjectChild::ItemGroup(g) => !g.is_empty(),
            _ => true,
        });
        before - self.children.len()
    }

    // XML mapping

    fn from_xml(xml: XmlDocument) -> Result<Self> {
        let root = xml.root;
        if !root.name.eq_ignore_ascii_case("Project") {
            return Err(Error::InvalidProject(format!(
                "Root element is <{}>, expected <Project>",
                root.name
            )));
        }

        let mut children = Vec::with_capacity(root.children.len());
        for node in root.children {
            let child = match node {
                XmlNode::Element(e) if e.name == "PropertyGroup" => {
                    ProjectChild::PropertyGroup(property_group_from_xml(e))
                }
                XmlNode::Element(e) if e.name == "ItemGroup" => {
                    ProjectChild::ItemGroup(item_group_from_xml(e)?)
                }
                XmlNode::Element(e) if e.name == "Import" => ProjectChild::Import(import_from_xml(e)?),
                other => ProjectChild::Other(other),
            };
            children.push(child);
        }

        Ok(Self {
            path: None,
            declaration: xml.declaration,
            attributes: root.attributes,
            children,
        })
    }

    fn to_xml(&self) -> XmlDocument {
        let mut root = XmlElement::new("Project");
        root.attributes = self.attributes.clone();
        for child in &self.children {
            let node = match child {
                ProjectChild::PropertyGroup(g) => XmlNode::Element(property_group_to_xml(g)),
                ProjectChild::ItemGroup(g) => XmlNode::Element(item_group_to_xml(g)),
                ProjectChild::Import(i) => XmlNode::Element(import_to_xml(i)),
                ProjectChild::Other(node) => node.clone(),
            };
            root.children.push(node);
        }
        XmlDocument {
            declaration: self.declaration.clone(),
            root,
        }
    }
}

impl Default for ProjectDocument {
    fn default() -> Self {
        Self::new()
    }
}

fn split_condition(attributes: Vec<(String, String)>) -> (Option<String>, Vec<(String, String)>) {
    let mut condition = None;
    let mut rest = Vec::new();
    for (name, value) in attributes {
        if name.eq_ignore_ascii_case("Condition") {
            condition = Some(value);
        } else {
            rest.push((name, value));
        }
    }
    (condition, rest)
}

fn property_group_from_xml(element: XmlElement) -> PropertyGroup {
    let (condition, other_attributes) = split_condition(element.attributes);
    let properties = element
        .children
        .into_iter()
        .filter_map(|node| match node {
            XmlNode::Element(e) => Some(Property {
                value: e.text(),
                condition: e.attribute("Condition").map(str::to_string),
                name: e.name,
            }),
            _ => None,
        })
        .collect();
    PropertyGroup {
        condition,
        other_attributes,
        properties,
    }
}

fn item_from_xml(element: XmlElement) -> Result<Item> {
    let mut operation = None;
    let mut exclude = None;
    let mut condition = None;
    let mut other_attributes = Vec::new();
    let mut metadata = Vec::new();

    for (name, value) in element.attributes {
        let op = [ItemOperation::Include, ItemOperation::Update, ItemOperation::Remove]
            .into_iter()
            .find(|op| name.eq_ignore_ascii_case(op.attribute_name()));
        if let Some(op) = op {
            operation = Some((op, value));
        } else if name.eq_ignore_ascii_case("Exclude") {
            exclude = Some(value);
        } else if name.eq_ignore_ascii_case("Condition") {
            condition = Some(value);
        } else if RESERVED_ITEM_ATTRIBUTES
            .iter()
            .any(|r| name.eq_ignore_ascii_case(r))
        {
            other_attributes.push((name, value));
        } else {
            metadata.push(Metadata {
                name,
                value,
                as_attribute: true,
            });
        }
    }

    for node in element.children {
        if let XmlNode::Element(e) = node {
            metadata.push(Metadata {
                value: e.text(),
                name: e.name,
                as_attribute: false,
            });
        }
    }

    let (operation, spec) = operation.ok_or_else(|| {
        Error::InvalidProject(format!(
            "<{}> item has no Include, Update or Remove attribute",
            element.name
        ))
    })?;

    Ok(Item {
        item_type: element.name,
        operation,
        spec,
        exclude,
        condition,
        other_attributes,
        metadata,
    })
}

fn item_group_from_xml(element: XmlElement) -> Result<ItemGroup> {
    let (condition, other_attributes) = split_condition(element.attributes);
    let mut items = Vec::new();
    for node in element.children {
        if let XmlNode::Element(e) = node {
            items.push(item_from_xml(e)?);
        }
    }
    Ok(ItemGroup {
        condition,
        other_attributes,
        items,
    })
}

fn import_from_xml(element: XmlElement) -> Result<Import> {
    let mut project = None;
    let mut condition = None;
    let mut other_attributes = Vec::new();
    for (name, value) in element.attributes {
        if name.eq_ignore_ascii_case("Project") {
            project = Some(value);
        } else if name.eq_ignore_ascii_case("Condition") {
            condition = Some(value);
        } else {
            other_attributes.push((name, value));
        }
    }
    let project = project
        .ok_or_else(|| Error::InvalidProject("<Import> without Project attribute".to_string()))?;
    Ok(Import {
        project,
        condition,
        other_attributes,
    })
}

fn push_condition(element: &mut XmlElement, condition: &Option<String>) {
    if let Some(condition) = condition {
        element
            .attributes
            .push(("Condition".to_string(), condition.clone()));
    }
}

fn property_group_to_xml(group: &PropertyGroup) -> XmlElement {
    let mut element = XmlElement::new("PropertyGroup");
    push_condition(&mut element, &group.condition);
    element.attributes.extend(group.other_attributes.iter().cloned());
    for property in &group.properties {
        let mut child = XmlElement::new(property.name.as_str()).with_text(property.value.as_str());
        push_condition(&mut child, &property.condition);
        element.children.push(XmlNode::Element(child));
    }
    element
}

fn item_to_xml(item: &Item) -> XmlElement {
    let mut element = XmlElement::new(item.item_type.as_str())
        .with_attribute(item.operation.attribute_name(), item.spec.as_str());
    if let Some(exclude) = &item.exclude {
        element
            .attributes
            .push(("Exclude".to_string(), exclude.clone()));
    }
    push_condition(&mut element, &item.condition);
    element.attributes.extend(item.other_attributes.iter().cloned());
    for m in &item.metadata {
        if m.as_attribute {
            element.attributes.push((m.name.clone(), m.value.clone()));
        } else {
            element.children.push(XmlNode::Element(
                XmlElement::new(m.name.as_str()).with_text(m.value.as_str()),
            ));
        }
    }
    element
}

fn item_group_to_xml(group: &ItemGroup) -> XmlElement {
    let mut element = XmlElement::new("ItemGroup");
    push_condition(&mut element, &group.condition);
    element.attributes.extend(group.other_attributes.iter().cloned());
    for item in &group.items {
        element.children.push(XmlNode::Element(item_to_xml(item)));
    }
    element
}

fn import_to_xml(import: &Import) -> XmlElement {
    let mut element = XmlElement::new("Import").with_attribute("Project", import.project.as_str());
    push_condition(&mut element, &import.condition);
    element.attributes.extend(import.other_attributes.iter().cloned());
    element
}
