//! Property-based tests using proptest
//!
//! These tests verify the paging window rules, GUID checks and request
//! target construction using randomized inputs.

use dbplatform::model::IntegratorIdentity;
use dbplatform::resource::{build_path, compose, ResourceKind, ResourceOperation, Scope};
use dbplatform::validate::{validate_guid, validate_paging};
use proptest::prelude::*;

fn arb_kind() -> impl Strategy<Value = ResourceKind> {
    prop::sample::select(ResourceKind::ALL.to_vec())
}

fn arb_guid() -> impl Strategy<Value = String> {
    any::<u128>().prop_map(|bits| uuid::Uuid::from_u128(bits).to_string())
}

/// Printable text, including separators and characters that need escaping
fn arb_text() -> impl Strategy<Value = String> {
    "[ -~äöüé]{1,40}"
}

mod paging_tests {
    use super::*;

    proptest! {
        #[test]
        fn negative_start_is_rejected(start in i32::MIN..0, size in 0i32..10_000) {
            let err = validate_paging(start, size, 1000, "findDatabases").unwrap_err();
            prop_assert!(err.is_local());
            prop_assert!(err.to_string().contains("startFrom"));
        }

        #[test]
        fn negative_page_size_is_rejected(start in 0i32..10_000, size in i32::MIN..0) {
            let err = validate_paging(start, size, 1000, "findDatabases").unwrap_err();
            prop_assert!(err.to_string().contains("pageSize"));
        }

        #[test]
        fn page_size_never_exceeds_maximum(
            start in 0i32..i32::MAX,
            size in 0i32..i32::MAX,
            max in 1u32..5000
        ) {
            let window = validate_paging(start, size, max, "findDatabases").unwrap();
            prop_assert!(window.page_size <= max);
            prop_assert!(window.page_size > 0);
            prop_assert_eq!(window.start_from, start as u32);
        }

        #[test]
        fn sizes_within_maximum_are_kept(size in 1i32..1000) {
            let window = validate_paging(0, size, 1000, "findDatabases").unwrap();
            prop_assert_eq!(window.page_size, size as u32);
        }

        #[test]
        fn unbounded_maximum_keeps_request(size in 0i32..i32::MAX) {
            let window = validate_paging(0, size, 0, "findDatabases").unwrap();
            prop_assert_eq!(window.page_size, size as u32);
        }
    }
}

mod guid_tests {
    use super::*;

    proptest! {
        #[test]
        fn uuids_are_accepted(guid in arb_guid()) {
            prop_assert!(validate_guid(&guid, "databaseGUID", "getDatabaseByGUID").is_ok());
        }

        #[test]
        fn arbitrary_words_are_rejected(word in "[g-z_ ]{1,36}") {
            prop_assert!(validate_guid(&word, "databaseGUID", "getDatabaseByGUID").is_err());
        }
    }
}

mod path_tests {
    use super::*;

    proptest! {
        #[test]
        fn paths_never_contain_empty_segments(
            kind in arb_kind(),
            guid in arb_guid(),
            name in arb_text(),
            user in "[a-z]{1,12}"
        ) {
            let integrator = IntegratorIdentity::new(guid.clone(), name.clone());
            let edit = Scope::Edit { user_id: &user, integrator: &integrator };
            let read = Scope::Retrieve { user_id: &user };

            let targets = vec![
                build_path("cocoMDS1", &edit, kind, &ResourceOperation::Update { guid: &guid }, None),
                build_path(
                    "cocoMDS1",
                    &edit,
                    kind,
                    &ResourceOperation::Remove { guid: &guid, qualified_name: &name },
                    None,
                ),
                build_path("cocoMDS1", &read, kind, &ResourceOperation::Find { search_string: &name }, None),
                build_path("cocoMDS1", &read, kind, &ResourceOperation::GetByName { name: &name }, None),
                build_path("cocoMDS1", &read, kind, &ResourceOperation::GetByGuid { guid: &guid }, None),
            ];
            for target in targets {
                let rendered = target.to_string();
                prop_assert!(!rendered.contains("//"), "{}", rendered);
                prop_assert!(target.segments().iter().all(|s| !s.is_empty()));
            }
        }

        #[test]
        fn caller_values_stay_single_segments(name in arb_text()) {
            let scope = Scope::Retrieve { user_id: "erin" };
            let target = compose("cocoMDS1", &scope, "databases", &[], &["by-name", &name], None);
            let rendered = target.to_string();
            let last = rendered.rsplit('/').next().unwrap();
            prop_assert_eq!(urlencoding::decode(last).unwrap().into_owned(), name.clone());
            prop_assert_eq!(target.segments().last().unwrap(), &name);
        }

        #[test]
        fn rendered_paths_are_fully_encoded(name in arb_text()) {
            let scope = Scope::Retrieve { user_id: "erin" };
            let target = compose("cocoMDS1", &scope, "databases", &[], &["by-search-string", &name], None);
            let rendered = target.to_string();
            prop_assert!(rendered.chars().all(|c| c.is_ascii_alphanumeric() || "/-_.~%".contains(c)));
        }

        #[test]
        fn resolved_urls_keep_every_segment(
            kind in arb_kind(),
            guid in arb_guid(),
            name in arb_text()
        ) {
            prop_assume!(name != "." && name != "..");
            let root = url::Url::parse("https://localhost:9443").unwrap();
            let scope = Scope::Retrieve { user_id: "erin" };
            let operations = [
                ResourceOperation::Find { search_string: &name },
                ResourceOperation::GetByName { name: &name },
                ResourceOperation::Remove { guid: &guid, qualified_name: &name },
            ];
            for operation in &operations {
                let target = build_path("cocoMDS1", &scope, kind, operation, None);
                let url = target.to_url(&root).unwrap();
                let resolved: Vec<String> = url
                    .path_segments()
                    .unwrap()
                    .map(|s| urlencoding::decode(s).unwrap().into_owned())
                    .collect();
                prop_assert_eq!(&resolved, &target.segments().to_vec(), "{}", url);
            }
        }

        #[test]
        fn dot_segments_are_never_resolved(kind in arb_kind(), dots in "\\.{1,2}") {
            let root = url::Url::parse("https://localhost:9443").unwrap();
            let scope = Scope::Retrieve { user_id: "erin" };
            let target = build_path(
                "cocoMDS1",
                &scope,
                kind,
                &ResourceOperation::Find { search_string: &dots },
                None,
            );
            prop_assert!(target.to_url(&root).is_err());
        }

        #[test]
        fn children_are_addressed_under_their_parent(kind in arb_kind(), parent in arb_guid()) {
            prop_assume!(kind.parent().is_some());
            let scope = Scope::Retrieve { user_id: "erin" };
            let target = build_path(
                "cocoMDS1",
                &scope,
                kind,
                &ResourceOperation::ListForParent { parent: &parent },
                None,
            );
            let parent_path = &kind.parent().unwrap().def().path;
            let expected = format!("/{}/{}/", parent_path, parent);
            prop_assert!(target.to_string().contains(&expected));
        }
    }
}
