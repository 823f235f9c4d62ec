//! Visibility policy evaluator.
//!
//! # Invariants
//! - Public resources are visible to everyone, including anonymous viewers.
//! - Private resources are visible only to the owner or viewers sharing the
//!   resource's snapshot affiliation.
//! - Anonymous viewers never see private resources.

use crate::model::resource::{Resource, Visibility};
use crate::model::viewer::Viewer;

/// Decides whether `viewer` may see `resource`.
///
/// Pure predicate: used both to gate single-item fetches (a failed check
/// maps to access-denied, distinct from not-found) and to filter list
/// results per item.
pub fn can_view(viewer: Option<&Viewer>, resource: &Resource) -> bool {
    match resource.visibility {
        Visibility::Public => true,
        Visibility::Private => match viewer {
            Some(viewer) => {
                viewer.id == resource.owner_id || viewer.affiliation == resource.affiliation
            }
            None => false,
        },
    }
}

/// Filters a display-ordered candidate set down to what `viewer` may see.
///
/// Input order is preserved; callers apply pagination AFTER this filter so
/// page numbering stays stable relative to the display order.
pub fn filter_visible(viewer: Option<&Viewer>, resources: Vec<Resource>) -> Vec<Resource> {
    resources
        .into_iter()
        .filter(|resource| can_view(viewer, resource))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{can_view, filter_visible};
    use crate::model::resource::{NewResource, Resource, ResourceKind, Visibility};
    use crate::model::viewer::Viewer;
    use uuid::Uuid;

    fn resource_with(owner: &Viewer, visibility: Visibility) -> Resource {
        Resource::create(
            owner,
            NewResource {
                title: "notes".to_string(),
                description: String::new(),
                course: "cs101".to_string(),
                branch: "cse".to_string(),
                semester: 1,
                kind: ResourceKind::Notes,
                year: 2026,
                visibility,
                content_pointer: String::new(),
            },
            0,
        )
    }

    #[test]
    fn public_resources_are_visible_to_everyone() {
        let owner = Viewer::new(Uuid::new_v4(), "x");
        let resource = resource_with(&owner, Visibility::Public);
        let stranger = Viewer::new(Uuid::new_v4(), "y");

        assert!(can_view(None, &resource));
        assert!(can_view(Some(&stranger), &resource));
        assert!(can_view(Some(&owner), &resource));
    }

    #[test]
    fn private_resources_are_hidden_from_anonymous_viewers() {
        let owner = Viewer::new(Uuid::new_v4(), "x");
        let resource = resource_with(&owner, Visibility::Private);

        assert!(!can_view(None, &resource));
    }

    #[test]
    fn private_resources_follow_owner_or_affiliation_rule() {
        let owner = Viewer::new(Uuid::new_v4(), "x");
        let resource = resource_with(&owner, Visibility::Private);

        let same_college = Viewer::new(Uuid::new_v4(), "x");
        let other_college = Viewer::new(Uuid::new_v4(), "y");

        assert!(can_view(Some(&owner), &resource));
        assert!(can_view(Some(&same_college), &resource));
        assert!(!can_view(Some(&other_college), &resource));
    }

    #[test]
    fn owner_sees_own_private_resource_despite_changed_affiliation() {
        // Affiliation is a snapshot; the owner keeps access through the
        // owner-id arm even after moving colleges.
        let owner = Viewer::new(Uuid::new_v4(), "x");
        let resource = resource_with(&owner, Visibility::Private);
        let moved_owner = Viewer::new(owner.id, "z");

        assert!(can_view(Some(&moved_owner), &resource));
    }

    #[test]
    fn filter_visible_preserves_input_order() {
        let owner = Viewer::new(Uuid::new_v4(), "x");
        let outsider = Viewer::new(Uuid::new_v4(), "y");

        let first_public = resource_with(&owner, Visibility::Public);
        let hidden = resource_with(&owner, Visibility::Private);
        let second_public = resource_with(&owner, Visibility::Public);

        let visible = filter_visible(
            Some(&outsider),
            vec![first_public.clone(), hidden, second_public.clone()],
        );

        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].id, first_public.id);
        assert_eq!(visible[1].id, second_public.id);
    }
}
