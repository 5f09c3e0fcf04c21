use crate::error::SchemaError;
use crate::field::{FieldDef, Record, Shape};
use crate::key::derive_key;
use crate::leaf::LeafKind;
use std::collections::HashSet;

/// One leaf of a record type, with the environment key it is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafSchema {
    pub key: String,
    pub kind: LeafKind,
}

/// List every leaf of `R` under `prefix`, in traversal order
///
/// Fails if a tag is empty or two leaves derive the same key, for example a
/// leaf tagged `DB_HOST` next to a nested record `DB` holding `HOST`.
/// Reads no environment variables and needs no instance of `R`.
pub fn schema<R: Record>(prefix: &str) -> Result<Vec<LeafSchema>, SchemaError> {
    let mut leaves = Vec::new();
    collect(R::layout(), prefix, &mut leaves)?;

    let mut seen = HashSet::new();
    for leaf in &leaves {
        if !seen.insert(leaf.key.as_str()) {
            return Err(SchemaError::DuplicateKey {
                key: leaf.key.clone(),
            });
        }
    }
    Ok(leaves)
}

fn collect(
    layout: &[FieldDef],
    prefix: &str,
    leaves: &mut Vec<LeafSchema>,
) -> Result<(), SchemaError> {
    for field in layout {
        if field.tag.is_empty() {
            return Err(SchemaError::EmptyTag {
                parent: prefix.to_string(),
            });
        }
        let key = derive_key(prefix, field.tag);
        match field.shape {
            Shape::Leaf(kind) => leaves.push(LeafSchema { key, kind }),
            Shape::Branch(nested) => collect(nested(), &key, leaves)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldMut, FieldRef};

    macro_rules! layout_only {
        ($name:ident, $fields:expr) => {
            struct $name;

            impl Record for $name {
                fn layout() -> &'static [FieldDef] {
                    const FIELDS: &[FieldDef] = $fields;
                    FIELDS
                }

                fn fields(&self) -> Vec<FieldRef<'_>> {
                    Vec::new()
                }

                fn fields_mut(&mut self) -> Vec<FieldMut<'_>> {
                    Vec::new()
                }
            }
        };
    }

    layout_only!(Db, &[FieldDef::leaf("HOST", LeafKind::String)]);
    layout_only!(
        Valid,
        &[
            FieldDef::leaf("PORT", LeafKind::Uint(16)),
            FieldDef::branch("DB", Db::layout),
            FieldDef::leaf("PEERS", LeafKind::StringList),
        ]
    );
    layout_only!(
        Colliding,
        &[
            FieldDef::leaf("DB_HOST", LeafKind::String),
            FieldDef::branch("DB", Db::layout),
        ]
    );
    layout_only!(Untagged, &[FieldDef::leaf("", LeafKind::Bool)]);

    #[test]
    fn test_schema_lists_leaves() {
        let leaves = schema::<Valid>("APP").unwrap();
        let keys: Vec<_> = leaves.iter().map(|leaf| leaf.key.as_str()).collect();
        assert_eq!(keys, vec!["APP_PORT", "APP_DB_HOST", "APP_PEERS"]);
        assert_eq!(leaves[0].kind, LeafKind::Uint(16));
    }

    #[test]
    fn test_schema_rejects_colliding_keys() {
        assert_eq!(
            schema::<Colliding>("APP"),
            Err(SchemaError::DuplicateKey {
                key: "APP_DB_HOST".to_string()
            })
        );
    }

    #[test]
    fn test_schema_rejects_empty_tag() {
        assert_eq!(
            schema::<Untagged>("APP"),
            Err(SchemaError::EmptyTag {
                parent: "APP".to_string()
            })
        );
    }
}
