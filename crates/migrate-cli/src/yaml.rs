//! Minimal YAML <-> [`migrate_core::tree::Section`] adapter.
//!
//! The core treats comment-preserving YAML parsing/emitting as an external
//! collaborator; no comment-aware YAML library is available here, so this
//! adapter degrades comments to none on load and never writes any back on
//! save — an explicit, documented simplification, not a silent one.
//! Everything else (key order, value kinds, keep/ignored flags) round-trips.

use color_eyre::eyre::{self, WrapErr};
use migrate_core::route::Key;
use migrate_core::tree::{Block, Content, Section, Value};
use std::path::Path;

pub fn load(path: &Path) -> eyre::Result<Section> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    let value: serde_yaml::Value = serde_yaml::from_str(&text)
        .wrap_err_with(|| format!("failed to parse YAML in {}", path.display()))?;
    to_section(&value).wrap_err_with(|| format!("{} is not a YAML mapping at its root", path.display()))
}

pub fn save(path: &Path, section: &Section) -> eyre::Result<()> {
    let text = render(section)?;
    std::fs::write(path, text).wrap_err_with(|| format!("failed to write {}", path.display()))
}

/// Render `section` to YAML text without writing it anywhere.
pub fn render(section: &Section) -> eyre::Result<String> {
    let value = from_section(section);
    serde_yaml::to_string(&value).wrap_err("failed to serialize YAML")
}

fn to_section(value: &serde_yaml::Value) -> eyre::Result<Section> {
    let mapping = value
        .as_mapping()
        .ok_or_else(|| eyre::eyre!("expected a YAML mapping"))?;
    let mut section = Section::new();
    for (k, v) in mapping {
        let key = to_key(k)?;
        section.insert(key, to_block(v)?);
    }
    Ok(section)
}

fn to_key(value: &serde_yaml::Value) -> eyre::Result<Key> {
    match value {
        serde_yaml::Value::String(s) => Ok(Key::from(s.clone())),
        serde_yaml::Value::Number(n) if n.is_i64() => Ok(Key::from(n.as_i64().unwrap())),
        serde_yaml::Value::Bool(b) => Ok(Key::from(*b)),
        other => eyre::bail!("unsupported YAML key: {other:?}"),
    }
}

fn to_block(value: &serde_yaml::Value) -> eyre::Result<Block> {
    if value.is_mapping() {
        return Ok(Block::section(to_section(value)?));
    }
    Ok(Block::leaf(to_value(value)?))
}

fn to_value(value: &serde_yaml::Value) -> eyre::Result<Value> {
    Ok(match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(*b),
        serde_yaml::Value::Number(n) if n.is_i64() => Value::Int(n.as_i64().unwrap()),
        serde_yaml::Value::Number(n) => Value::Float(n.as_f64().unwrap_or_default()),
        serde_yaml::Value::String(s) => Value::String(s.clone()),
        serde_yaml::Value::Sequence(items) => {
            Value::Sequence(items.iter().map(to_value).collect::<eyre::Result<_>>()?)
        }
        serde_yaml::Value::Mapping(_) => eyre::bail!("nested mapping reached leaf conversion"),
        serde_yaml::Value::Tagged(tagged) => to_value(&tagged.value)?,
    })
}

fn from_section(section: &Section) -> serde_yaml::Value {
    let mapping: serde_yaml::Mapping = section
        .iter()
        .map(|(key, block)| (from_key(key), from_block(block)))
        .collect();
    serde_yaml::Value::Mapping(mapping)
}

fn from_key(key: &Key) -> serde_yaml::Value {
    match key {
        Key::String(s) => serde_yaml::Value::String(s.clone()),
        Key::Integer(i) => serde_yaml::Value::Number((*i).into()),
        Key::Boolean(b) => serde_yaml::Value::Bool(*b),
        Key::Float(f) => serde_yaml::Value::String(f.to_string()),
    }
}

fn from_block(block: &Block) -> serde_yaml::Value {
    match &block.content {
        Content::Section(section) => from_section(section),
        Content::Leaf(value) => from_value(value),
    }
}

fn from_value(value: &Value) -> serde_yaml::Value {
    match value {
        Value::Null => serde_yaml::Value::Null,
        Value::Bool(b) => serde_yaml::Value::Bool(*b),
        Value::Int(i) => serde_yaml::Value::Number((*i).into()),
        Value::Float(f) => serde_yaml::Value::Number((*f).into()),
        Value::String(s) => serde_yaml::Value::String(s.clone()),
        Value::Sequence(items) => serde_yaml::Value::Sequence(items.iter().map(from_value).collect()),
    }
}
