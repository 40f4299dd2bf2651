//! 文档的 JSON 快照
//!
//! 只用于在命令行程序与测试之间交换图形数据，内容就是元数据、块定义和实体的直接序列化。

use crate::document::{Document, DocumentMetadata};
use crate::error::FileError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use zdraft_core::block::BlockDefinition;
use zdraft_core::entity::Entity;

/// 当前快照版本
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    #[serde(default)]
    metadata: DocumentMetadata,
    #[serde(default)]
    blocks: Vec<BlockDefinition>,
    #[serde(default)]
    entities: Vec<Entity>,
}

pub fn to_json(document: &Document) -> Result<String, FileError> {
    Ok(serde_json::to_string_pretty(&snapshot_of(document))?)
}

pub fn from_json(json: &str) -> Result<Document, FileError> {
    restore(serde_json::from_str(json)?)
}

/// 保存文档
pub fn save(document: &Document, path: &Path) -> Result<(), FileError> {
    let snapshot = snapshot_of(document);
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &snapshot)?;
    writer.flush()?;

    tracing::info!(
        "Saved {} entities, {} blocks to {}",
        snapshot.entities.len(),
        snapshot.blocks.len(),
        path.display()
    );
    Ok(())
}

/// 加载文档
pub fn load(path: &Path) -> Result<Document, FileError> {
    let reader = BufReader::new(File::open(path)?);
    let document = restore(serde_json::from_reader(reader)?)?;

    tracing::info!(
        "Loaded {} entities, {} blocks from {}",
        document.entity_count(),
        document.blocks().count(),
        path.display()
    );
    Ok(document)
}

fn snapshot_of(document: &Document) -> Snapshot {
    Snapshot {
        version: SNAPSHOT_VERSION,
        metadata: document.metadata.clone(),
        blocks: document.blocks().cloned().collect(),
        entities: document.entities().cloned().collect(),
    }
}

fn restore(snapshot: Snapshot) -> Result<Document, FileError> {
    if snapshot.version > SNAPSHOT_VERSION {
        return Err(FileError::UnsupportedVersion(format!(
            "Snapshot version {} is newer than supported version {}",
            snapshot.version, SNAPSHOT_VERSION
        )));
    }

    let mut document = Document::new();
    document.metadata = snapshot.metadata;
    for block in snapshot.blocks {
        document.add_block(block);
    }
    for entity in snapshot.entities {
        document.insert_entity(entity);
    }
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zdraft_core::geometry::{Geometry, Line};
    use zdraft_core::math::Point3;

    #[test]
    fn test_save_load_keeps_ids_and_blocks() {
        let file_path = std::env::temp_dir().join("zdraft_snapshot_test.json");

        let mut doc = Document::new();
        doc.metadata.title = "Fence".to_string();
        doc.add_block(zdraft_core::block::BlockDefinition::new("POST"));
        let id = doc.add_entity(Geometry::Line(Line::new(Point3::origin(), Point3::new(10.0, 0.0, 0.0))));

        save(&doc, &file_path).expect("Failed to save");
        let loaded = load(&file_path).expect("Failed to load");

        assert_eq!(loaded.metadata.title, "Fence");
        assert!(loaded.block("post").is_some());
        assert!(matches!(loaded.entity(id).map(|e| &e.geometry), Some(Geometry::Line(_))));

        std::fs::remove_file(&file_path).ok();
    }

    #[test]
    fn test_newer_version_rejected() {
        let result = from_json(r#"{ "version": 99 }"#);
        assert!(matches!(result, Err(FileError::UnsupportedVersion(_))));
    }

    #[test]
    fn test_minimal_snapshot() {
        let json = r#"{
            "version": 1,
            "blocks": [{ "name": "TAG", "attribute_definitions": [{ "tag": "ID" }] }],
            "entities": [{ "id": 3, "geometry": { "Line": { "start": [0, 0, 0], "end": [5, 0, 0] } } }]
        }"#;
        let doc = from_json(json).unwrap();
        assert_eq!(doc.entity_count(), 1);
        assert_eq!(doc.block("tag").unwrap().attribute_definitions[0].tag, "ID");
        assert!(to_json(&doc).unwrap().contains("\"TAG\""));
    }
}
