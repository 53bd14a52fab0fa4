//! Workset action generator.
//!
//! Worksets only exist at runtime, so the actions that clear them cannot be
//! written down ahead of time. For every user workset in the document the
//! template below is instantiated with the workset's id bound into the body
//! and a name derived from the workset's display name.
//!
//! The result is a snapshot: worksets added later are only picked up when the
//! registry regenerates against the document.

use wipe_core::{Workset, WorksetKind, WipeConfig, WipeError, WipeResult};

use crate::action::Action;
use crate::catalog::print_header;
use crate::document::DocumentSession;
use crate::remover::BatchRemover;
use crate::transaction::with_transaction;

/// Name of the template; generated actions are `<template>_<workset name>`.
pub const WORKSET_TEMPLATE_NAME: &str = "remove_workset_elements";

/// Derive the registry name for a workset action.
pub fn workset_action_name(workset_name: &str) -> String {
    format!("{}_{}", WORKSET_TEMPLATE_NAME, workset_name)
}

/// Instantiate the workset template for one workset.
pub fn workset_action(workset: &Workset) -> Action {
    let workset_id = workset.id;
    let workset_name = workset.name.clone();
    let transaction_title = format!("Remove All on WS: {}", workset.name);

    Action::new(
        workset_action_name(&workset.name),
        format!("Remove All Elements on Workset \"{}\"", workset.name),
        format!(
            "Remove every element assigned to the \"{}\" workset.",
            workset.name
        ),
        move |doc| {
            with_transaction(doc, &transaction_title, |doc| {
                print_header(&format!(
                    "REMOVING ALL ELEMENTS ON WORKSET \"{}\"",
                    workset_name
                ));
                let elements = doc.elements_on_workset(workset_id)?;
                BatchRemover::new(doc, "Workset Element").remove_all(elements)
            })
        },
    )
    .generated()
}

/// Build one action per user workset in the document.
///
/// Documents that are not workshared yield no actions, unless the
/// configuration requires worksets.
pub fn workset_actions(
    document: &dyn DocumentSession,
    config: &WipeConfig,
) -> WipeResult<Vec<Action>> {
    if !document
        .is_workshared()
        .map_err(WipeError::from_document)?
    {
        if config.require_worksets {
            return Err(WipeError::NotWorkshared);
        }
        tracing::debug!("Document is not workshared, no workset actions generated");
        return Ok(Vec::new());
    }

    let worksets = document.worksets().map_err(WipeError::from_document)?;
    let actions: Vec<Action> = worksets
        .iter()
        .filter(|w| w.kind == WorksetKind::User)
        .map(workset_action)
        .collect();

    tracing::info!("Generated {} workset action(s)", actions.len());
    Ok(actions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{DocumentSnapshot, MemoryDocument};
    use wipe_core::{Element, ElementClass, ElementId, WorksetId};

    fn workshared() -> DocumentSnapshot {
        DocumentSnapshot {
            workshared: true,
            worksets: vec![
                Workset::user(1, "Level1"),
                Workset::user(2, "Level2"),
                Workset {
                    id: WorksetId(3),
                    name: "Views \"Level 1\"".to_string(),
                    kind: WorksetKind::View,
                },
            ],
            elements: vec![
                Element::new(10, ElementClass::Other, "Wall").with_workset(WorksetId(1)),
                Element::new(11, ElementClass::Other, "Door").with_workset(WorksetId(1)),
                Element::new(12, ElementClass::Other, "Slab").with_workset(WorksetId(2)),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_one_action_per_user_workset() {
        let doc = MemoryDocument::new(workshared());

        let actions = workset_actions(&doc, &WipeConfig::default()).unwrap();

        let names: Vec<&str> = actions.iter().map(|a| a.name()).collect();
        assert_eq!(
            names,
            vec!["remove_workset_elements_Level1", "remove_workset_elements_Level2"]
        );
        assert!(actions.iter().all(|a| !a.is_dependent()));
        assert!(actions.iter().all(|a| a.is_generated()));
        assert_eq!(actions[0].title(), "Remove All Elements on Workset \"Level1\"");
    }

    #[test]
    fn test_generated_action_is_bound_to_its_workset() {
        let doc = MemoryDocument::new(workshared());
        let actions = workset_actions(&doc, &WipeConfig::default()).unwrap();

        let report = actions[1].run(&doc).unwrap();

        assert_eq!(report.removed(), 1);
        assert!(!doc.contains(ElementId(12)));
        assert!(doc.contains(ElementId(10)));
        assert_eq!(doc.stats().transaction_titles, vec!["Remove All on WS: Level2"]);
    }

    #[test]
    fn test_not_workshared() {
        let doc = MemoryDocument::new(DocumentSnapshot::default());

        let actions = workset_actions(&doc, &WipeConfig::default()).unwrap();
        assert!(actions.is_empty());

        let strict = WipeConfig {
            require_worksets: true,
            ..WipeConfig::default()
        };
        assert!(matches!(
            workset_actions(&doc, &strict),
            Err(WipeError::NotWorkshared)
        ));
    }
}
