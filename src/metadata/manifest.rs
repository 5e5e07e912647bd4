use std::{fmt::Display, path::Path};

use serde_json::{Map, Value};

use crate::error::{ErrorKind, Result};

/// Release fields every target inherits from the root manifest.
pub const RELEASE_FIELDS: [&str; 3] = ["version", "license", "author"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
    Dependencies,
    DevDependencies,
}

impl DependencyKind {
    /// Order in which root tables are searched when resolving a version.
    pub const PRECEDENCE: [DependencyKind; 2] = [DependencyKind::Dependencies, DependencyKind::DevDependencies];

    pub fn key(self) -> &'static str {
        match self {
            DependencyKind::Dependencies => "dependencies",
            DependencyKind::DevDependencies => "devDependencies",
        }
    }

    /// How a single entry of this table is referred to in log output.
    pub fn singular(self) -> &'static str {
        match self {
            DependencyKind::Dependencies => "dependency",
            DependencyKind::DevDependencies => "devDependency",
        }
    }

    pub fn from_dev(dev: bool) -> Self {
        if dev {
            DependencyKind::DevDependencies
        } else {
            DependencyKind::Dependencies
        }
    }
}

impl Display for DependencyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A `package.json` document. Keys keep the order they were read in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    fields: Map<String, Value>,
}

impl From<Map<String, Value>> for Manifest {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl Manifest {
    pub fn parse(path: &Path, data: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(data)? {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(ErrorKind::NotAnObject(path.to_path_buf())),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn set<V: Into<Value>>(&mut self, key: &str, value: V) {
        self.fields.insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.shift_remove(key)
    }

    pub fn table(&self, kind: DependencyKind) -> Option<&Map<String, Value>> {
        self.fields.get(kind.key()).and_then(Value::as_object)
    }

    /// Inserts `entries` into the table for `kind`. A missing or malformed table starts out empty.
    pub fn extend_table<I>(&mut self, kind: DependencyKind, entries: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut table = match self.fields.get_mut(kind.key()).map(Value::take) {
            Some(Value::Object(table)) => table,
            _ => Map::new(),
        };

        table.extend(entries);

        self.set(kind.key(), Value::Object(table));
    }

    /// The version `name` is pinned to in `kind`. Empty or non-string specifiers don't count.
    pub fn version_of(&self, kind: DependencyKind, name: &str) -> Option<&str> {
        self.table(kind)?
            .get(name)
            .and_then(Value::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Copies the shared release fields from `root`. Fields the root lacks are dropped here too.
    pub fn inherit_release_fields(&mut self, root: &Manifest) {
        for field in RELEASE_FIELDS {
            match root.get(field) {
                Some(Value::Null) | None => { self.remove(field); },
                Some(value) => self.set(field, value.clone()),
            }
        }
    }

    pub fn to_pretty_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.fields)?)
    }
}

pub async fn read_manifest(path: &Path) -> Result<Manifest> {
    let data = tokio::fs::read_to_string(path).await
        .map_err(ErrorKind::at(path))?;

    Manifest::parse(path, &data)
}

pub async fn write_manifest(path: &Path, manifest: &Manifest) -> Result<()> {
    let data = manifest.to_pretty_string()?;

    tokio::fs::write(path, data).await
        .map_err(ErrorKind::at(path))
}
