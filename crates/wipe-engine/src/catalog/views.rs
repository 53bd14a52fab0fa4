//! Sheets, views and view-related elements.
//!
//! Views and sheets open in the UI are never deleted; their ids come from the
//! open-resource collaborator and go into the remover's exclusion set.

use wipe_core::{BuiltInCategory, Element, ElementClass, ViewKind, WipeConfig};

use super::print_header;
use crate::action::Action;
use crate::remover::BatchRemover;
use crate::transaction::with_transaction;

pub(super) fn remove_all_sheets() -> Action {
    const TITLE: &str = "Remove All Sheets";

    Action::new(
        "remove_all_sheets",
        TITLE,
        "Remove all sheets except the ones currently open.",
        |doc| {
            with_transaction(doc, TITLE, |doc| {
                print_header("REMOVING SHEETS");
                let sheets = doc.elements_by_category(BuiltInCategory::Sheets)?;
                let open = doc.open_view_ids()?;
                BatchRemover::new(doc, "Sheet")
                    .excluding(open)
                    .describe_with(describe_sheet)
                    .remove_all(sheets)
            })
        },
    )
}

pub(super) fn remove_all_views(config: &WipeConfig) -> Action {
    const TITLE: &str = "Remove All Views";
    let default_3d = config.default_3d_view_name.clone();
    let marker = config.reserved_view_marker.clone();

    Action::new(
        "remove_all_views",
        TITLE,
        "Remove all views, legends and schedules except open, template, reserved and default 3D views.",
        move |doc| {
            with_transaction(doc, TITLE, |doc| {
                print_header("REMOVING VIEWS / LEGENDS / SCHEDULES");
                let views = view_instances(doc.elements_by_class(ElementClass::View)?);
                let open = doc.open_view_ids()?;
                BatchRemover::new(doc, "View")
                    .excluding(open)
                    .only_if(|v| is_removable_view(v, &default_3d, &marker))
                    .describe_with(describe_view)
                    .remove_all(views)
            })
        },
    )
}

pub(super) fn remove_all_view_templates() -> Action {
    const TITLE: &str = "Remove All View Templates";

    Action::new(
        "remove_all_view_templates",
        TITLE,
        "Remove all view templates.",
        |doc| {
            with_transaction(doc, TITLE, |doc| {
                print_header("REMOVING VIEW TEMPLATES");
                let views = view_instances(doc.elements_by_class(ElementClass::View)?);
                BatchRemover::new(doc, "View Template")
                    .only_if(|v| v.view.is_some_and(|d| !d.kind.is_system() && d.is_template))
                    .describe_with(describe_view)
                    .remove_all(views)
            })
        },
    )
}

pub(super) fn remove_all_elevation_markers() -> Action {
    const TITLE: &str = "Remove All Elevation Markers";

    Action::new(
        "remove_all_elevation_markers",
        TITLE,
        "Remove elevation markers that no longer host any view.",
        |doc| {
            with_transaction(doc, TITLE, |doc| {
                print_header("REMOVING ELEVATION MARKERS");
                let markers = view_instances(doc.elements_by_class(ElementClass::ElevationMarker)?);
                BatchRemover::new(doc, "Elevation Marker")
                    .only_if(|m| m.hosted_view_count == 0)
                    .remove_all(markers)
            })
        },
    )
}

pub(super) fn remove_all_filters() -> Action {
    const TITLE: &str = "Remove All Filters";

    Action::new(
        "remove_all_filters",
        TITLE,
        "Remove all view filters.",
        |doc| {
            print_header("REMOVING ALL FILTERS");
            with_transaction(doc, TITLE, |doc| {
                let filters = view_instances(doc.elements_by_class(ElementClass::FilterElement)?);
                BatchRemover::new(doc, "View Filter").remove_all(filters)
            })
        },
    )
}

/// Whether a view element may be deleted by "Remove All Views".
///
/// Kept: system kinds (browsers, internal, undefined, sheets), the default 3D
/// view, names containing the reserved marker, and view templates. The marker
/// is a literal substring match.
pub fn is_removable_view(view: &Element, default_3d: &str, marker: &str) -> bool {
    let Some(data) = view.view else {
        return false;
    };

    if data.kind.is_system() {
        return false;
    }
    if data.kind == ViewKind::ThreeD && view.name == default_3d {
        return false;
    }
    if !marker.is_empty() && view.name.contains(marker) {
        return false;
    }
    !data.is_template
}

fn view_instances(elements: Vec<Element>) -> Vec<Element> {
    elements.into_iter().filter(|e| !e.is_type).collect()
}

fn describe_sheet(sheet: &Element) -> String {
    format!(
        "{}{:>10}  {:<50}",
        sheet.id,
        sheet.param_str("Sheet Number"),
        sheet.param_str("Sheet Name")
    )
}

fn describe_view(view: &Element) -> String {
    let kind = view
        .view
        .map(|d| format!("{:?}", d.kind))
        .unwrap_or_default();
    format!("{:<10}{:<15}{:<50}", view.id.to_string(), kind, view.name)
}
