// Cypher Graph - Property-graph import and export for Cypher databases
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Configuration types for graph import and export.

use serde::{Deserialize, Serialize};

/// Default maximum string length for exported property values: 100 MB.
///
/// Large enough for long text properties pulled out of a database, small
/// enough to stop a runaway value from producing an unusable script.
/// Use [`ExportConfig::with_max_string_length`] for a stricter bound.
pub const DEFAULT_MAX_STRING_LENGTH: usize = 100 * 1024 * 1024; // 100 MB

/// Default attribute holding the database identity of a node or edge.
pub const DEFAULT_ID_KEY: &str = "@id";

/// Default attribute holding the label list of a node.
pub const DEFAULT_LABELS_KEY: &str = "@labels";

/// Default attribute holding the type of an edge.
pub const DEFAULT_TYPE_KEY: &str = "@type";

/// Property names used to store database metadata inside graph attributes.
///
/// Keys must not collide with real properties the caller cares about;
/// collisions are not detected and the last write wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeMapping {
    /// Attribute for the identity (default: `@id`).
    #[serde(rename = "id")]
    pub id_key: String,
    /// Attribute for a node's label list (default: `@labels`).
    #[serde(rename = "labels")]
    pub labels_key: String,
    /// Attribute for an edge's relationship type (default: `@type`).
    #[serde(rename = "type")]
    pub type_key: String,
}

impl Default for AttributeMapping {
    fn default() -> Self {
        Self {
            id_key: DEFAULT_ID_KEY.to_string(),
            labels_key: DEFAULT_LABELS_KEY.to_string(),
            type_key: DEFAULT_TYPE_KEY.to_string(),
        }
    }
}

impl AttributeMapping {
    /// Create a mapping with explicit key names.
    pub fn new(
        id_key: impl Into<String>,
        labels_key: impl Into<String>,
        type_key: impl Into<String>,
    ) -> Self {
        Self {
            id_key: id_key.into(),
            labels_key: labels_key.into(),
            type_key: type_key.into(),
        }
    }

    /// Whether `key` is one of the three metadata attributes.
    pub fn is_reserved(&self, key: &str) -> bool {
        key == self.id_key || key == self.labels_key || key == self.type_key
    }
}

/// Access mode requested when opening a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccessMode {
    /// Read-only session; importers always ask for this.
    #[default]
    Read,
    /// Read-write session.
    Write,
}

/// What the projection importer does with a row missing a required column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MissingFieldPolicy {
    /// Abort the whole import with [`crate::GraphError::MissingField`].
    #[default]
    FailFast,
    /// Log the row at `warn` level and continue with the next one.
    SkipRow,
}

/// How to write map-valued properties when exporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObjectHandling {
    /// Flatten nested maps into dot-notation properties (e.g., `address.city`).
    #[default]
    Flatten,
    /// Serialize nested maps as JSON strings.
    JsonString,
}

/// Configuration for importing query results into a graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Attribute names for identity, labels and type.
    pub mapping: AttributeMapping,

    /// Database to open the session against (default: the server default).
    pub database: Option<String>,

    /// Handling of projection rows without their required columns.
    pub missing_field_policy: MissingFieldPolicy,
}

/// Builder for ImportConfig.
///
/// # Examples
///
/// ```
/// # use cypher_graph::ImportConfig;
/// let config = ImportConfig::builder()
///     .id_key("_id")
///     .database("movies")
///     .build();
/// assert_eq!(config.mapping.id_key, "_id");
/// ```
#[derive(Default)]
pub struct ImportConfigBuilder {
    id_key: Option<String>,
    labels_key: Option<String>,
    type_key: Option<String>,
    database: Option<String>,
    missing_field_policy: Option<MissingFieldPolicy>,
}

impl ImportConfigBuilder {
    /// Create a new builder with no values set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identity attribute name.
    pub fn id_key(mut self, key: impl Into<String>) -> Self {
        self.id_key = Some(key.into());
        self
    }

    /// Set the labels attribute name.
    pub fn labels_key(mut self, key: impl Into<String>) -> Self {
        self.labels_key = Some(key.into());
        self
    }

    /// Set the relationship type attribute name.
    pub fn type_key(mut self, key: impl Into<String>) -> Self {
        self.type_key = Some(key.into());
        self
    }

    /// Set the database name.
    pub fn database(mut self, name: impl Into<String>) -> Self {
        self.database = Some(name.into());
        self
    }

    /// Set the missing-field policy for projection imports.
    pub fn missing_field_policy(mut self, policy: MissingFieldPolicy) -> Self {
        self.missing_field_policy = Some(policy);
        self
    }

    /// Build the ImportConfig instance.
    ///
    /// All unset fields will use their default values.
    pub fn build(self) -> ImportConfig {
        let defaults = ImportConfig::default();
        ImportConfig {
            mapping: AttributeMapping {
                id_key: self.id_key.unwrap_or(defaults.mapping.id_key),
                labels_key: self.labels_key.unwrap_or(defaults.mapping.labels_key),
                type_key: self.type_key.unwrap_or(defaults.mapping.type_key),
            },
            database: self.database.or(defaults.database),
            missing_field_policy: self
                .missing_field_policy
                .unwrap_or(defaults.missing_field_policy),
        }
    }
}

impl ImportConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for ImportConfig.
    pub fn builder() -> ImportConfigBuilder {
        ImportConfigBuilder::default()
    }

    /// Replace the attribute mapping.
    pub fn with_mapping(mut self, mapping: AttributeMapping) -> Self {
        self.mapping = mapping;
        self
    }

    /// Open sessions against a specific database.
    pub fn with_database(mut self, name: impl Into<String>) -> Self {
        self.database = Some(name.into());
        self
    }

    /// Skip malformed projection rows instead of failing.
    pub fn skipping_malformed_rows(mut self) -> Self {
        self.missing_field_policy = MissingFieldPolicy::SkipRow;
        self
    }
}

/// Configuration for exporting a graph to a Cypher script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Attribute names for identity, labels and type.
    pub mapping: AttributeMapping,

    /// How to handle map-valued properties.
    pub object_handling: ObjectHandling,

    /// Maximum string length for property values (default: 100MB, None = unlimited).
    pub max_string_length: Option<usize>,

    /// Prefix the script with node/edge count comments (default: false).
    pub include_comments: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            mapping: AttributeMapping::default(),
            object_handling: ObjectHandling::Flatten,
            max_string_length: Some(DEFAULT_MAX_STRING_LENGTH),
            include_comments: false,
        }
    }
}

/// Builder for ExportConfig.
///
/// # Examples
///
/// ```
/// # use cypher_graph::{ExportConfig, ObjectHandling};
/// let config = ExportConfig::builder()
///     .object_handling(ObjectHandling::JsonString)
///     .include_comments(true)
///     .build();
/// assert!(config.include_comments);
/// ```
#[derive(Default)]
pub struct ExportConfigBuilder {
    mapping: Option<AttributeMapping>,
    object_handling: Option<ObjectHandling>,
    max_string_length: Option<Option<usize>>,
    include_comments: Option<bool>,
}

impl ExportConfigBuilder {
    /// Create a new builder with no values set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the attribute mapping.
    pub fn mapping(mut self, mapping: AttributeMapping) -> Self {
        self.mapping = Some(mapping);
        self
    }

    /// Set how to handle map-valued properties.
    pub fn object_handling(mut self, handling: ObjectHandling) -> Self {
        self.object_handling = Some(handling);
        self
    }

    /// Set maximum string length for property values.
    pub fn max_string_length(mut self, max: usize) -> Self {
        self.max_string_length = Some(Some(max));
        self
    }

    /// Remove the string length limit.
    pub fn no_string_length_limit(mut self) -> Self {
        self.max_string_length = Some(None);
        self
    }

    /// Set whether to prefix the script with comments.
    pub fn include_comments(mut self, include: bool) -> Self {
        self.include_comments = Some(include);
        self
    }

    /// Build the ExportConfig instance.
    ///
    /// All unset fields will use their default values.
    pub fn build(self) -> ExportConfig {
        let defaults = ExportConfig::default();
        ExportConfig {
            mapping: self.mapping.unwrap_or(defaults.mapping),
            object_handling: self.object_handling.unwrap_or(defaults.object_handling),
            max_string_length: self.max_string_length.unwrap_or(defaults.max_string_length),
            include_comments: self.include_comments.unwrap_or(defaults.include_comments),
        }
    }
}

impl ExportConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for ExportConfig.
    pub fn builder() -> ExportConfigBuilder {
        ExportConfigBuilder::default()
    }

    /// Replace the attribute mapping.
    pub fn with_mapping(mut self, mapping: AttributeMapping) -> Self {
        self.mapping = mapping;
        self
    }

    /// Use JSON strings for map-valued properties.
    pub fn with_json_objects(mut self) -> Self {
        self.object_handling = ObjectHandling::JsonString;
        self
    }

    /// Prefix the script with count comments.
    pub fn with_comments(mut self) -> Self {
        self.include_comments = true;
        self
    }

    /// Set maximum string length for property values.
    pub fn with_max_string_length(mut self, max: usize) -> Self {
        self.max_string_length = Some(max);
        self
    }

    /// Remove the string length limit (use with caution).
    pub fn without_string_length_limit(mut self) -> Self {
        self.max_string_length = None;
        self
    }
}
