use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::StoreUpgradesError;

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema, Debug)]
pub struct StoreRename {
    pub old_key: String,
    pub new_key: String,
}

/// Stores a release adds, renames or deletes before its migrations run.
///
/// Checked on construction and on deserialization: names are non-empty, no name
/// is listed twice and nothing is both added and deleted.
#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Eq, Debug)]
#[serde(try_from = "UncheckedStoreUpgrades")]
pub struct StoreUpgrades {
    added: Vec<String>,
    renamed: Vec<StoreRename>,
    deleted: Vec<String>,
}

#[derive(Deserialize)]
struct UncheckedStoreUpgrades {
    #[serde(default)]
    added: Vec<String>,
    #[serde(default)]
    renamed: Vec<StoreRename>,
    #[serde(default)]
    deleted: Vec<String>,
}

impl TryFrom<UncheckedStoreUpgrades> for StoreUpgrades {
    type Error = StoreUpgradesError;

    fn try_from(raw: UncheckedStoreUpgrades) -> Result<Self, Self::Error> {
        StoreUpgrades::new(raw.added, raw.renamed, raw.deleted)
    }
}

impl StoreUpgrades {
    pub fn new(
        added: Vec<String>,
        renamed: Vec<StoreRename>,
        deleted: Vec<String>,
    ) -> Result<Self, StoreUpgradesError> {
        fn unique<'a>(
            seen: &mut BTreeSet<&'a str>,
            name: &'a str,
        ) -> Result<(), StoreUpgradesError> {
            if name.is_empty() {
                return Err(StoreUpgradesError::EmptyName {});
            }
            if !seen.insert(name) {
                return Err(StoreUpgradesError::Duplicate(name.to_owned()));
            }
            Ok(())
        }

        let mut adds = BTreeSet::new();
        for name in &added {
            unique(&mut adds, name)?;
        }
        let mut deletes = BTreeSet::new();
        for name in &deleted {
            unique(&mut deletes, name)?;
            if adds.contains(name.as_str()) {
                return Err(StoreUpgradesError::Conflict(name.clone()));
            }
        }
        let mut sources = BTreeSet::new();
        let mut targets = BTreeSet::new();
        for rename in &renamed {
            unique(&mut sources, &rename.old_key)?;
            unique(&mut targets, &rename.new_key)?;
            if rename.old_key == rename.new_key {
                return Err(StoreUpgradesError::SelfRename(rename.old_key.clone()));
            }
        }

        Ok(StoreUpgrades {
            added,
            renamed,
            deleted,
        })
    }

    pub fn added(&self) -> &[String] {
        &self.added
    }

    pub fn renamed(&self) -> &[StoreRename] {
        &self.renamed
    }

    pub fn deleted(&self) -> &[String] {
        &self.deleted
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.renamed.is_empty() && self.deleted.is_empty()
    }
}
