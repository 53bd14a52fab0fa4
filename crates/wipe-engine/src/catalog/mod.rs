//! Action catalog.
//!
//! The static set of cleanup actions. Each one is the batch remover run over
//! a category or class query inside a single transaction, plus whatever
//! exclusion rule that kind of element needs.
//!
//! | Module | Actions |
//! |--------|---------|
//! | `spatial` | constraints, rooms, areas, separation lines, scope boxes, reference planes |
//! | `views` | sheets, views, view templates, elevation markers, filters |
//! | `model` | groups, external links, materials, purge |

use wipe_core::{BuiltInCategory, WipeConfig};

use crate::action::Action;
use crate::remover::{BatchRemover, Describe};
use crate::transaction::with_transaction;

mod model;
mod spatial;
mod views;

pub use views::is_removable_view;

/// Build every static action, in registration order.
pub fn catalog(config: &WipeConfig) -> Vec<Action> {
    vec![
        model::call_purge(),
        spatial::remove_all_constraints(),
        model::remove_all_groups(config),
        model::remove_all_external_links(),
        views::remove_all_sheets(),
        spatial::remove_all_rooms(),
        spatial::remove_all_areas(),
        spatial::remove_all_room_separation_lines(),
        spatial::remove_all_area_separation_lines(),
        spatial::remove_all_scope_boxes(),
        spatial::remove_all_reference_planes(),
        model::remove_all_materials(config),
        views::remove_all_views(config),
        views::remove_all_view_templates(),
        views::remove_all_elevation_markers(),
        views::remove_all_filters(),
    ]
}

/// Static description of a "delete every instance of a category" action.
struct CategorySweep {
    name: &'static str,
    title: &'static str,
    description: &'static str,
    header: &'static str,
    label: &'static str,
    category: BuiltInCategory,
    describe: Option<Describe>,
}

impl CategorySweep {
    fn into_action(self) -> Action {
        let CategorySweep {
            name,
            title,
            description,
            header,
            label,
            category,
            describe,
        } = self;

        Action::new(name, title, description, move |doc| {
            with_transaction(doc, title, |doc| {
                print_header(header);
                let candidates = doc.elements_by_category(category)?;
                let remover = BatchRemover::new(doc, label);
                match describe {
                    Some(describe) => remover.describe_with(describe).remove_all(candidates),
                    None => remover.remove_all(candidates),
                }
            })
        })
    }
}

/// Log the section header an action emits before it runs.
pub(crate) fn print_header(header: &str) {
    tracing::info!("### {}", header);
}
