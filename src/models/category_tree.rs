//! Category hierarchy model
//!
//! The hierarchy comes straight from the `categories` section of the config
//! file: a nested mapping where every key is a category name and every value
//! is either empty (a leaf) or another mapping of subcategories.

use serde::de::{self, Deserialize, Deserializer};
use serde_yaml::Value;

use crate::error::{SankeyError, SankeyResult};

/// A node in the user-defined category hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryTree {
    /// A category with a directly observed amount
    Leaf,
    /// A grouping of subcategories, in declaration order
    Interior(Vec<(String, CategoryTree)>),
}

impl CategoryTree {
    /// Build an interior node from (name, subtree) pairs
    pub fn interior<I, S>(children: I) -> Self
    where
        I: IntoIterator<Item = (S, CategoryTree)>,
        S: Into<String>,
    {
        let children: Vec<_> = children
            .into_iter()
            .map(|(name, tree)| (name.into(), tree))
            .collect();

        if children.is_empty() {
            Self::Leaf
        } else {
            Self::Interior(children)
        }
    }

    /// Build an interior node whose children are all leaves
    pub fn leaves<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::interior(names.into_iter().map(|n| (n, CategoryTree::Leaf)))
    }

    /// Convert a parsed YAML value into a hierarchy
    ///
    /// `null` and `{}` are leaves, non-empty mappings are interior nodes.
    /// Anything else is rejected with the dotted path of the bad node.
    pub fn from_yaml(value: &Value) -> SankeyResult<Self> {
        Self::from_yaml_at(value, "categories")
    }

    fn from_yaml_at(value: &Value, path: &str) -> SankeyResult<Self> {
        match value {
            Value::Null => Ok(Self::Leaf),
            Value::Mapping(mapping) => {
                let mut children = Vec::with_capacity(mapping.len());
                for (key, child) in mapping {
                    let name = key.as_str().ok_or_else(|| {
                        SankeyError::Config(format!(
                            "category names must be strings, found {:?} under '{}'",
                            key, path
                        ))
                    })?;
                    let child_path = format!("{}.{}", path, name);
                    children.push((name.to_string(), Self::from_yaml_at(child, &child_path)?));
                }
                Ok(Self::interior(children))
            }
            other => Err(SankeyError::Config(format!(
                "'{}' must be a mapping of subcategories or empty, found {:?}",
                path, other
            ))),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf)
    }

    /// Child nodes in declaration order (empty for a leaf)
    pub fn children(&self) -> &[(String, CategoryTree)] {
        match self {
            Self::Leaf => &[],
            Self::Interior(children) => children,
        }
    }

    /// Names of every leaf below this node, depth-first in declaration order
    pub fn leaf_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        for (name, child) in self.children() {
            if child.is_leaf() {
                names.push(name.as_str());
            } else {
                names.extend(child.leaf_names());
            }
        }
        names
    }
}

impl<'de> Deserialize<'de> for CategoryTree {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        CategoryTree::from_yaml(&value).map_err(|e| match e {
            SankeyError::Config(message) => de::Error::custom(message),
            other => de::Error::custom(other),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> SankeyResult<CategoryTree> {
        let value: Value = serde_yaml::from_str(yaml).unwrap();
        CategoryTree::from_yaml(&value)
    }

    #[test]
    fn test_nested_mapping_preserves_order() {
        let tree = parse(
            r#"
Housing:
  Rent: {}
  Utilities:
Food:
  Groceries: {}
  Restaurants: {}
Fun: {}
"#,
        )
        .unwrap();

        let names: Vec<_> = tree.children().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Housing", "Food", "Fun"]);
        assert_eq!(
            tree.leaf_names(),
            vec!["Rent", "Utilities", "Groceries", "Restaurants", "Fun"]
        );
    }

    #[test]
    fn test_null_and_empty_are_leaves() {
        assert_eq!(parse("~").unwrap(), CategoryTree::Leaf);
        assert_eq!(parse("{}").unwrap(), CategoryTree::Leaf);
    }

    #[test]
    fn test_scalar_node_rejected_with_path() {
        let err = parse("Food:\n  Groceries: 12\n").unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("categories.Food.Groceries"));
    }

    #[test]
    fn test_sequence_node_rejected() {
        let err = parse("Food: [Groceries, Restaurants]\n").unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_non_string_key_rejected() {
        let err = parse("2023: {}\n").unwrap_err();
        assert!(err.to_string().contains("must be strings"));
    }

    #[test]
    fn test_builders() {
        let tree = CategoryTree::interior([
            ("Food", CategoryTree::leaves(["Groceries", "Restaurants"])),
            ("Fun", CategoryTree::Leaf),
        ]);
        assert_eq!(tree.leaf_names(), vec!["Groceries", "Restaurants", "Fun"]);
        assert!(CategoryTree::leaves(Vec::<String>::new()).is_leaf());
    }

    #[test]
    fn test_deserialize_impl() {
        let tree: CategoryTree = serde_yaml::from_str("Food: {}\nFun: {}\n").unwrap();
        assert_eq!(tree, CategoryTree::leaves(["Food", "Fun"]));
    }
}
