use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::tables::BackendTables;

/// Fixed table-name list; each table is serialized to its own file derived
/// from these names.
pub const TABLE_NAMES: [&str; 15] = [
    "dictionary",
    "hash_pairs",
    "ctokens",
    "hash_context1",
    "hash_context2",
    "hash_context3",
    "hash_context4",
    "hash_context5",
    "hash_ID",
    "hash_agents",
    "full_content",
    "ID_to_content",
    "ID_to_agents",
    "ID_size",
    "KW_map",
];

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub entity_count: u32,
    pub created_at: String,
    pub version: u32,
}

pub struct TablePaths {
    pub root: PathBuf,
}

impl TablePaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn table(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.bin"))
    }

    fn meta(&self) -> PathBuf {
        self.root.join("meta.json")
    }
}

fn save_one<T: Serialize>(paths: &TablePaths, name: &str, table: &T) -> Result<()> {
    let path = paths.table(name);
    let mut f = File::create(&path).with_context(|| format!("create {}", path.display()))?;
    let bytes = bincode::serialize(table)?;
    f.write_all(&bytes)?;
    Ok(())
}

/// Load one table file; a missing file yields an empty table rather than
/// failing the whole load.
fn load_one<T: DeserializeOwned + Default>(paths: &TablePaths, name: &str) -> Result<T> {
    let path = paths.table(name);
    if !path.exists() {
        tracing::warn!(table = name, "table file missing, loading empty table");
        return Ok(T::default());
    }
    let mut f = File::open(&path).with_context(|| format!("open {}", path.display()))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let table = bincode::deserialize(&buf)
        .with_context(|| format!("deserialize table {name}"))?;
    Ok(table)
}

pub fn save_tables(paths: &TablePaths, tables: &BackendTables) -> Result<()> {
    create_dir_all(&paths.root)?;
    save_one(paths, "dictionary", &tables.dictionary)?;
    save_one(paths, "hash_pairs", &tables.hash_pairs)?;
    save_one(paths, "ctokens", &tables.ctokens)?;
    save_one(paths, "hash_context1", &tables.hash_context1)?;
    save_one(paths, "hash_context2", &tables.hash_context2)?;
    save_one(paths, "hash_context3", &tables.hash_context3)?;
    save_one(paths, "hash_context4", &tables.hash_context4)?;
    save_one(paths, "hash_context5", &tables.hash_context5)?;
    save_one(paths, "hash_ID", &tables.hash_id)?;
    save_one(paths, "hash_agents", &tables.hash_agents)?;
    save_one(paths, "full_content", &tables.full_content)?;
    save_one(paths, "ID_to_content", &tables.id_to_content)?;
    save_one(paths, "ID_to_agents", &tables.id_to_agents)?;
    save_one(paths, "ID_size", &tables.id_size)?;
    save_one(paths, "KW_map", &tables.kw_map)?;
    Ok(())
}

pub fn load_tables(paths: &TablePaths) -> Result<BackendTables> {
    Ok(BackendTables {
        dictionary: load_one(paths, "dictionary")?,
        hash_pairs: load_one(paths, "hash_pairs")?,
        ctokens: load_one(paths, "ctokens")?,
        hash_context1: load_one(paths, "hash_context1")?,
        hash_context2: load_one(paths, "hash_context2")?,
        hash_context3: load_one(paths, "hash_context3")?,
        hash_context4: load_one(paths, "hash_context4")?,
        hash_context5: load_one(paths, "hash_context5")?,
        hash_id: load_one(paths, "hash_ID")?,
        hash_agents: load_one(paths, "hash_agents")?,
        full_content: load_one(paths, "full_content")?,
        id_to_content: load_one(paths, "ID_to_content")?,
        id_to_agents: load_one(paths, "ID_to_agents")?,
        id_size: load_one(paths, "ID_size")?,
        kw_map: load_one(paths, "KW_map")?,
    })
}

pub fn save_meta(paths: &TablePaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &TablePaths) -> Result<MetaFile> {
    let mut f = File::open(paths.meta()).context("open meta.json")?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}
