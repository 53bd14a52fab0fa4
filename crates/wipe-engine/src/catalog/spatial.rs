//! Constraints, spaces and datum elements.

use wipe_core::{BuiltInCategory, Element};

use super::{print_header, CategorySweep};
use crate::action::Action;
use crate::remover::BatchRemover;
use crate::transaction::with_transaction;

/// Dimension constraints hosted in a view.
pub(super) fn remove_all_constraints() -> Action {
    const TITLE: &str = "Remove All Constraints";

    Action::new(
        "remove_all_constraints",
        TITLE,
        "Remove all view-hosted constraints (locks and equality constraints).",
        |doc| {
            with_transaction(doc, TITLE, |doc| {
                print_header("REMOVING ALL CONSTRAINTS");
                let constraints = doc.elements_by_category(BuiltInCategory::Constraints)?;
                BatchRemover::new(doc, "Constraint")
                    .only_if(|c| c.owner_view.is_some())
                    .remove_all(constraints)
            })
        },
    )
    .dependent()
}

pub(super) fn remove_all_rooms() -> Action {
    CategorySweep {
        name: "remove_all_rooms",
        title: "Remove All Rooms",
        description: "Remove all placed and unplaced rooms.",
        header: "REMOVING ROOMS",
        label: "Room",
        category: BuiltInCategory::Rooms,
        describe: Some(describe_space),
    }
    .into_action()
    .dependent()
}

pub(super) fn remove_all_areas() -> Action {
    CategorySweep {
        name: "remove_all_areas",
        title: "Remove All Areas",
        description: "Remove all areas from every area plan.",
        header: "REMOVING AREAS",
        label: "Area",
        category: BuiltInCategory::Areas,
        describe: Some(describe_space),
    }
    .into_action()
    .dependent()
}

pub(super) fn remove_all_room_separation_lines() -> Action {
    CategorySweep {
        name: "remove_all_room_separation_lines",
        title: "Remove All Room Separation Lines",
        description: "Remove all room separation lines.",
        header: "REMOVING ROOM SEPARATIONS LINES",
        label: "Room Separation Line",
        category: BuiltInCategory::RoomSeparationLines,
        describe: None,
    }
    .into_action()
}

pub(super) fn remove_all_area_separation_lines() -> Action {
    CategorySweep {
        name: "remove_all_area_separation_lines",
        title: "Remove All Area Separation Lines",
        description: "Remove all area boundary lines.",
        header: "REMOVING AREA SEPARATIONS LINES",
        label: "Area Separation Line",
        category: BuiltInCategory::AreaSchemeLines,
        describe: None,
    }
    .into_action()
}

pub(super) fn remove_all_scope_boxes() -> Action {
    CategorySweep {
        name: "remove_all_scope_boxes",
        title: "Remove All Scope Boxes",
        description: "Remove all scope boxes.",
        header: "REMOVING SCOPE BOXES",
        label: "Scope Box",
        category: BuiltInCategory::VolumeOfInterest,
        describe: None,
    }
    .into_action()
}

pub(super) fn remove_all_reference_planes() -> Action {
    CategorySweep {
        name: "remove_all_reference_planes",
        title: "Remove All Reference Planes",
        description: "Remove all reference planes.",
        header: "REMOVING REFERENCE PLANES",
        label: "Reference Plane",
        category: BuiltInCategory::CLines,
        describe: None,
    }
    .into_action()
}

/// `<id> <number> <name>` for rooms and areas.
fn describe_space(space: &Element) -> String {
    format!(
        "{}{:<20}{:<30}",
        space.id,
        space.param_str("Number"),
        space.param_str("Name")
    )
}
