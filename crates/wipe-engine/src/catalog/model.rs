//! Groups, links, materials and the purge follow-up.

use wipe_core::{BatchReport, BuiltInCategory, Element, ElementClass, WipeConfig, WipeError};

use super::print_header;
use crate::action::Action;
use crate::remover::BatchRemover;
use crate::transaction::with_transaction;

/// Post the host's "purge unused" command.
///
/// The host runs posted commands once control returns to it, so this is
/// safe to run before or after the other actions.
pub(super) fn call_purge() -> Action {
    Action::new(
        "call_purge",
        "Purge Unused",
        "Call the host \"Purge Unused\" command after completion.",
        |doc| {
            doc.post_purge_unused().map_err(WipeError::from_document)?;
            tracing::info!("Posted Purge Unused");
            Ok(BatchReport::empty())
        },
    )
}

/// Explode every group instance, then delete the group types.
pub(super) fn remove_all_groups(config: &WipeConfig) -> Action {
    const TITLE: &str = "Remove All Groups";
    let preserved = config.preserved_group_category.clone();

    Action::new(
        "remove_all_groups",
        TITLE,
        "Remove (and explode) all groups. Attached detail group types are kept.",
        move |doc| {
            with_transaction(doc, TITLE, |doc| {
                let type_ids: Vec<_> = doc
                    .elements_by_class(ElementClass::GroupType)?
                    .into_iter()
                    .map(|t| t.id)
                    .collect();
                let groups = doc.elements_by_class(ElementClass::Group)?;

                print_header("EXPLODING GROUPS");
                for group in &groups {
                    match doc.ungroup(group.id) {
                        Ok(members) => {
                            tracing::debug!("Ungrouped {} ({} members)", group.id, members.len())
                        }
                        Err(e) if e.is_fatal() => return Err(WipeError::from_document(e)),
                        Err(e) => tracing::warn!("Could not ungroup {}: {}", group.id, e),
                    }
                }

                print_header("REMOVING GROUPS");
                // Re-read the types: ungrouping may have changed the document.
                let mut group_types = Vec::with_capacity(type_ids.len());
                for id in type_ids {
                    if let Some(group_type) = doc.element(id)? {
                        group_types.push(group_type);
                    }
                }

                BatchRemover::new(doc, "Group Type")
                    .only_if(|t| t.category_name() != Some(preserved.as_str()))
                    .remove_all(group_types)
            })
        },
    )
}

/// Delete every linked model and linked CAD type.
///
/// Link references are only resolvable from a saved document; an unsaved one
/// fails before any transaction is opened.
pub(super) fn remove_all_external_links() -> Action {
    const TITLE: &str = "Remove All External Links";

    Action::new(
        "remove_all_external_links",
        TITLE,
        "Remove all linked models and CAD links. The model must be saved first.",
        |doc| {
            print_header("REMOVE ALL EXTERNAL LINKS");
            let saved = doc
                .path_name()
                .map_err(WipeError::from_document)?
                .is_some_and(|p| !p.is_empty());
            if !saved {
                tracing::error!("Model must be saved for external links to be removed.");
                return Err(WipeError::PreconditionFailed(
                    "model must be saved for external links to be removed".to_string(),
                ));
            }

            with_transaction(doc, TITLE, |doc| {
                let mut links = Vec::new();
                for id in doc.external_file_references()? {
                    match doc.element(id)? {
                        Some(link) if is_link_type(&link) => links.push(link),
                        Some(_) => {}
                        None => tracing::debug!("External reference {} does not resolve", id),
                    }
                }
                BatchRemover::new(doc, "External Link").remove_all(links)
            })
        },
    )
}

pub(super) fn remove_all_materials(config: &WipeConfig) -> Action {
    const TITLE: &str = "Remove All Materials";
    let protected = config.protected_material_substring.to_lowercase();

    Action::new(
        "remove_all_materials",
        TITLE,
        "Remove all materials except poche materials.",
        move |doc| {
            with_transaction(doc, TITLE, |doc| {
                print_header("REMOVING MATERIALS");
                let materials = doc.elements_by_category(BuiltInCategory::Materials)?;
                BatchRemover::new(doc, "Material")
                    .only_if(|m| !is_protected_material(m, &protected))
                    .remove_all(materials)
            })
        },
    )
}

fn is_link_type(element: &Element) -> bool {
    matches!(
        element.class,
        ElementClass::RevitLinkType | ElementClass::CadLinkType
    )
}

/// `protected` must already be lowercase.
fn is_protected_material(material: &Element, protected: &str) -> bool {
    !protected.is_empty() && material.name.to_lowercase().contains(protected)
}
