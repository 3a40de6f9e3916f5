//! Scene documents: the JSON host for renameable items.
//!
//! A scene is a list of kind-tagged items, each with a name and a selection
//! flag. Fields this crate does not know about are kept as-is so a document
//! survives a load/save round trip.
//!
//! ```json
//! { "items": [ { "kind": "collection", "name": "Props" },
//!              { "kind": "object", "name": "Cube", "selected": false } ] }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

use crate::config;
use crate::error::Result;
use crate::rename::{self, ItemKind, RenameRule, RenameSummary, Renameable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneItem {
    /// `object`, `collection`, or any other host kind (ignored by renames).
    pub kind: String,
    pub name: String,
    #[serde(default = "default_selected")]
    pub selected: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_selected() -> bool {
    true
}

impl SceneItem {
    pub fn new(kind: ItemKind, name: &str) -> Self {
        Self {
            kind: kind.as_str().to_string(),
            name: name.to_string(),
            selected: true,
            extra: Map::new(),
        }
    }

    pub fn item_kind(&self) -> Option<ItemKind> {
        ItemKind::from_str(&self.kind)
    }
}

impl Renameable for SceneItem {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub items: Vec<SceneItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Scene {
    pub fn from_json(content: &str) -> Result<Self> {
        config::from_str(content)
    }

    /// Load a scene from a file path, or stdin when `source` is `-`.
    pub fn load(source: &str) -> Result<Self> {
        let content = config::read_json_source(source)?;
        Self::from_json(&content)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        config::write_json_file(path, self)
    }

    /// Ad-hoc scene of selected items built from plain names.
    pub fn from_names(objects: &[String], collections: &[String]) -> Self {
        let items = collections
            .iter()
            .map(|name| SceneItem::new(ItemKind::Collection, name))
            .chain(
                objects
                    .iter()
                    .map(|name| SceneItem::new(ItemKind::Object, name)),
            )
            .collect();

        Self {
            items,
            extra: Map::new(),
        }
    }

    pub fn selected_count(&self, kind: ItemKind) -> usize {
        self.items
            .iter()
            .filter(|item| item.selected && item.item_kind() == Some(kind))
            .count()
    }

    /// Rename the selected objects and collections.
    ///
    /// Collections go first, then objects, each in document order. The pattern
    /// is compiled before either pass, so a bad rule renames nothing.
    pub fn rename_selection(&mut self, rule: &RenameRule) -> Result<RenameSummary> {
        let mut collections = Vec::new();
        let mut objects = Vec::new();

        for item in self.items.iter_mut().filter(|item| item.selected) {
            match item.item_kind() {
                Some(ItemKind::Collection) => collections.push(item),
                Some(ItemKind::Object) => objects.push(item),
                None => {}
            }
        }

        let mut summary = rename::apply_to_kind(collections, ItemKind::Collection, rule)?;
        summary.merge(rename::apply_to_kind(objects, ItemKind::Object, rule)?);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"{
        "file": "level.blend",
        "items": [
            { "kind": "object", "name": "Cube", "data": { "verts": 8 } },
            { "kind": "collection", "name": "Cube Props" },
            { "kind": "object", "name": "Cube.001", "selected": false },
            { "kind": "material", "name": "Cube Paint" },
            { "kind": "object", "name": "Sphere" }
        ]
    }"#;

    fn names(scene: &Scene) -> Vec<&str> {
        scene.items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn parses_and_defaults_selection() {
        let scene = Scene::from_json(SCENE).unwrap();
        assert_eq!(scene.items.len(), 5);
        assert!(scene.items[0].selected);
        assert!(!scene.items[2].selected);
        assert_eq!(scene.items[3].item_kind(), None);
        assert_eq!(scene.selected_count(ItemKind::Object), 2);
        assert_eq!(scene.selected_count(ItemKind::Collection), 1);
    }

    #[test]
    fn renames_selected_objects_and_collections_only() {
        let mut scene = Scene::from_json(SCENE).unwrap();
        let summary = scene
            .rename_selection(&RenameRule::literal("Cube", "Box"))
            .unwrap();

        assert_eq!(
            names(&scene),
            vec!["Box", "Box Props", "Cube.001", "Cube Paint", "Sphere"]
        );
        assert_eq!(summary.objects_changed, 1);
        assert_eq!(summary.collections_changed, 1);
    }

    #[test]
    fn collections_are_processed_first() {
        let mut scene = Scene::from_json(SCENE).unwrap();
        let summary = scene
            .rename_selection(&RenameRule::literal("Cube", "Box").dry_run(true))
            .unwrap();

        let kinds: Vec<ItemKind> = summary.outcomes.iter().map(|o| o.kind).collect();
        assert_eq!(
            kinds,
            vec![ItemKind::Collection, ItemKind::Object, ItemKind::Object]
        );
        assert_eq!(summary.outcomes[0].original_name, "Cube Props");
        assert_eq!(summary.outcomes[2].original_name, "Sphere");
    }

    #[test]
    fn per_kind_passes_merge_into_one_summary() {
        let mut scene = Scene::from_json(SCENE).unwrap();
        let summary = scene
            .rename_selection(&RenameRule::literal("Cube", "Box").dry_run(true))
            .unwrap();

        assert!(summary.dry_run);
        assert_eq!(summary.outcomes.len(), 3);
        assert_eq!(summary.message(), "Would rename 1 object(s) and 1 collection(s)");
    }

    #[test]
    fn scope_limits_kinds() {
        let mut scene = Scene::from_json(SCENE).unwrap();
        scene
            .rename_selection(&RenameRule::literal("Cube", "Box").scope(true, false))
            .unwrap();

        assert_eq!(
            names(&scene),
            vec!["Box", "Cube Props", "Cube.001", "Cube Paint", "Sphere"]
        );
    }

    #[test]
    fn unknown_fields_survive_round_trip() {
        let mut scene = Scene::from_json(SCENE).unwrap();
        scene
            .rename_selection(&RenameRule::literal("Cube", "Box"))
            .unwrap();

        let json = serde_json::to_value(&scene).unwrap();
        assert_eq!(json["file"], "level.blend");
        assert_eq!(json["items"][0]["data"]["verts"], 8);
        assert_eq!(json["items"][0]["name"], "Box");
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("scene.json");

        let scene = Scene::from_names(&["Cube".to_string()], &["Set".to_string()]);
        scene.save(&path).unwrap();

        let loaded = Scene::load(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded, scene);
        assert_eq!(loaded.items[0].kind, "collection");
        assert_eq!(loaded.items[1].kind, "object");
    }

    #[test]
    fn invalid_json_is_validation_error() {
        let err = Scene::from_json("{ items: ").unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::ValidationInvalidJson);
    }
}
