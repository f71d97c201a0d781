//! JSON problem documents.
//!
//! ```json
//! {
//!   "lines": [{ "lineKey": "1", "size": 3 }],
//!   "containers": [
//!     { "skuCode": "C1", "items": [{ "skuCode": "P", "part": "1" }] }
//!   ]
//! }
//! ```
//!
//! An item is identified by `"<skuCode>-<part>"`.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use crate::domain::{AssemblyLine, Container, Item, ItemUniverse};
use crate::error::AssignError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    lines: Vec<LineRecord>,
    containers: Vec<ContainerRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LineRecord {
    line_key: String,
    size: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContainerRecord {
    sku_code: String,
    items: Vec<ItemRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemRecord {
    sku_code: String,
    part: String,
}

impl ItemRecord {
    fn into_item(self) -> Item {
        Item::new(format!("{}-{}", self.sku_code, self.part))
    }
}

/// Containers and lines of one problem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProblemInput {
    pub containers: Vec<Container>,
    pub lines: Vec<AssemblyLine>,
}

impl ProblemInput {
    pub fn new(containers: Vec<Container>, lines: Vec<AssemblyLine>) -> Self {
        Self { containers, lines }
    }

    /// Parse a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self, AssignError> {
        let document: Document = serde_json::from_str(text).map_err(input_error)?;
        Ok(document.into_input())
    }

    /// Parse a JSON document from a reader.
    pub fn from_reader(reader: impl Read) -> Result<Self, AssignError> {
        let document: Document = serde_json::from_reader(reader).map_err(input_error)?;
        Ok(document.into_input())
    }

    /// Load a JSON document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssignError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| AssignError::io(path, &err))?;
        let input = Self::from_reader(BufReader::new(file))?;
        tracing::debug!(
            component = "input",
            operation = "load",
            status = "success",
            path = %path.display(),
            containers = input.containers.len(),
            lines = input.lines.len(),
            "Loaded problem input"
        );
        Ok(input)
    }

    /// Number of distinct items across all containers.
    pub fn num_items(&self) -> usize {
        ItemUniverse::from_containers(&self.containers).len()
    }

    /// Sum of line capacities.
    pub fn total_capacity(&self) -> i64 {
        self.lines.iter().map(AssemblyLine::capacity).sum()
    }
}

impl Document {
    fn into_input(self) -> ProblemInput {
        let lines = self
            .lines
            .into_iter()
            .map(|line| AssemblyLine::new(line.line_key, line.size))
            .collect();
        let containers = self
            .containers
            .into_iter()
            .map(|container| {
                Container::new(
                    container.sku_code,
                    container.items.into_iter().map(ItemRecord::into_item),
                )
            })
            .collect();
        ProblemInput { containers, lines }
    }
}

fn input_error(err: serde_json::Error) -> AssignError {
    AssignError::Input {
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "lines": [
            { "lineKey": "L1", "size": 3 },
            { "lineKey": "L2", "size": 4 }
        ],
        "containers": [
            {
                "skuCode": "C1",
                "items": [
                    { "skuCode": "P9", "part": "2" },
                    { "skuCode": "P1", "part": "7" },
                    { "skuCode": "P9", "part": "2" }
                ]
            },
            { "skuCode": "C2", "items": [{ "skuCode": "P1", "part": "7" }] }
        ]
    }"#;

    #[test]
    fn parses_lines_and_containers() {
        let input = ProblemInput::from_json_str(DOCUMENT).unwrap();
        assert_eq!(
            input.lines,
            vec![AssemblyLine::new("L1", 3), AssemblyLine::new("L2", 4)]
        );
        assert_eq!(input.containers.len(), 2);
        assert_eq!(input.containers[0].id(), "C1");
        let items: Vec<&str> = input.containers[0].items().iter().map(Item::as_str).collect();
        assert_eq!(items, vec!["P1-7", "P9-2"]);
        assert_eq!(input.num_items(), 2);
        assert_eq!(input.total_capacity(), 7);
    }

    #[test]
    fn reader_and_str_agree() {
        let from_str = ProblemInput::from_json_str(DOCUMENT).unwrap();
        let from_reader = ProblemInput::from_reader(DOCUMENT.as_bytes()).unwrap();
        assert_eq!(from_str, from_reader);
    }

    #[test]
    fn malformed_document_is_input_error() {
        let err = ProblemInput::from_json_str(r#"{ "lines": [{ "lineKey": "L1" }] }"#).unwrap_err();
        assert_eq!(err.code(), "ASSIGN_INVALID_INPUT");
        assert!(err.to_string().contains("size"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ProblemInput::load("/nonexistent/lineup/input.json").unwrap_err();
        assert_eq!(err.code(), "ASSIGN_IO");
        assert!(err.to_string().contains("/nonexistent/lineup/input.json"));
    }
}
