//! Property tests for the evaluator invariants

use proptest::prelude::*;
use querygate_rbac::{
    action::operations_for, all_nested_authorized, audit, is_granted, resolve_alias, Action,
    PermissionTable, RbacEngine, RbacOptions, RestrictedModels, SynonymTable,
};
use serde_json::{json, Value};

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::Create),
        Just(Action::Read),
        Just(Action::Update),
        Just(Action::Delete),
    ]
}

fn operation_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        action_strategy().prop_flat_map(|action| {
            prop::sample::select(operations_for(action).to_vec()).prop_map(str::to_string)
        }),
        "[a-zA-Z]{1,12}",
    ]
}

fn permissions_strategy() -> impl Strategy<Value = PermissionTable> {
    prop::collection::vec(("[a-z]{1,6}", action_strategy(), any::<bool>()), 0..12).prop_map(
        |entries| {
            entries
                .into_iter()
                .fold(PermissionTable::new(), |table, (resource, action, granted)| {
                    table.with(resource, action, granted)
                })
        },
    )
}

/// Arbitrary JSON, including shapes no configuration would ever have
fn json_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z:]{0,10}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::hash_map(
                prop_oneof![
                    Just("create".to_string()),
                    Just("findMany".to_string()),
                    Just("delete".to_string()),
                    "[a-zA-Z]{1,8}",
                ],
                inner,
                0..6
            )
            .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn prop_unrestricted_resources_always_forward(
        operation in operation_strategy(),
        resource in "[a-z]{1,8}",
        args in json_strategy(),
        permissions in prop::option::of(permissions_strategy()),
    ) {
        let mut options = RbacOptions::new().with_restricted_models(["restricted_model"]);
        options.permissions = permissions;
        let engine = RbacEngine::new(options);

        let forwarded = engine.evaluate_blocking(&operation, &resource, args.clone(), |a| a);
        prop_assert_eq!(forwarded.unwrap(), args);
    }

    #[test]
    fn prop_allow_listed_pairs_always_forward(
        action in action_strategy(),
        resource in "[a-z]{1,8}",
        args in json_strategy(),
    ) {
        let operation = operations_for(action)[0];
        let engine = RbacEngine::new(
            RbacOptions::new()
                .with_permissions(PermissionTable::new().with(resource.clone(), action, false))
                .with_restricted_models([resource.clone()])
                .with_allowed_actions([format!("{}:{}", resource, action)]),
        );

        prop_assert!(engine.decide(operation, &resource, Some(&args)).is_ok());
    }

    #[test]
    fn prop_grant_requires_explicit_true(
        permissions in permissions_strategy(),
        action in action_strategy(),
        resource in "[a-z]{1,6}",
    ) {
        let expected = permissions
            .get(&resource)
            .and_then(|grants| grants.get(&action))
            .copied()
            == Some(true);

        prop_assert_eq!(is_granted(Some(&permissions), Some(action), Some(&resource)), expected);
        prop_assert!(!is_granted(None, Some(action), Some(&resource)));
        prop_assert!(!is_granted(Some(&permissions), Some(action), None));
        prop_assert!(!is_granted(Some(&permissions), None, Some(&resource)));
    }

    #[test]
    fn prop_resolve_is_identity_for_unlisted_names(
        name in "[a-z]{1,8}",
        aliases in prop::collection::vec("[A-Z]{1,8}", 0..6),
    ) {
        let synonyms = SynonymTable::from_iter([("canonical", aliases)]);
        prop_assert_eq!(synonyms.resolve(Some(&name)), Some(name.as_str()));
        prop_assert_eq!(resolve_alias(Some(&name), None), Some(name.as_str()));
        prop_assert_eq!(synonyms.resolve(None), None);
    }

    #[test]
    fn prop_resolve_finds_owner(
        canonical in "[a-z]{1,8}",
        aliases in prop::collection::vec("[A-Z]{1,8}", 1..6),
        pick in any::<prop::sample::Index>(),
    ) {
        let alias = pick.get(&aliases).clone();
        let synonyms = SynonymTable::new().with(canonical.clone(), aliases);
        prop_assert_eq!(synonyms.resolve(Some(&alias)), Some(canonical.as_str()));
    }

    #[test]
    fn prop_evaluation_is_idempotent(
        operation in operation_strategy(),
        resource in "[a-z]{1,6}",
        args in json_strategy(),
        permissions in permissions_strategy(),
    ) {
        let engine = RbacEngine::new(
            RbacOptions::new()
                .with_permissions(permissions)
                .with_restricted_models([resource.clone()]),
        );

        let first = engine.decide(&operation, &resource, Some(&args)).ok();
        let second = engine.decide(&operation, &resource, Some(&args)).ok();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_nested_denial_implies_engine_denial(
        action in action_strategy(),
        args in json_strategy(),
        permissions in permissions_strategy(),
    ) {
        let permissions = permissions.grant("user", action);
        let nested_ok = all_nested_authorized(Some(&permissions), None, "user", Some(&args));
        let engine = RbacEngine::new(
            RbacOptions::new()
                .with_permissions(permissions)
                .with_restricted_models(["user"]),
        );

        let decided = engine.decide(operations_for(action)[0], "user", Some(&args));
        prop_assert_eq!(decided.is_ok(), nested_ok);
    }

    #[test]
    fn prop_audit_partitions_resources(
        restricted in prop::collection::vec("[a-z]{1,4}", 0..8),
        permissions in permissions_strategy(),
    ) {
        let models = RestrictedModels::models(restricted.clone());
        let mismatch = audit(&models, Some(&permissions)).unwrap();

        for missing in &mismatch.missing {
            prop_assert!(restricted.contains(missing));
            prop_assert!(!permissions.contains_resource(missing));
        }
        for redundant in &mismatch.redundant {
            prop_assert!(permissions.contains_resource(redundant));
            prop_assert!(!restricted.contains(redundant));
        }
    }

    #[test]
    fn prop_malformed_configuration_never_panics(
        config in json_strategy(),
        operation in operation_strategy(),
        resource in "[a-z]{1,6}",
        args in json_strategy(),
    ) {
        let options = RbacOptions::from_value(&config);
        let engine = RbacEngine::builder(options)
            .mismatch_handler(|_, _| {})
            .build();
        let _ = engine.decide(&operation, &resource, Some(&args));
    }
}

#[test]
fn test_fuzzed_top_level_shapes() {
    for config in [
        json!("stringValue"),
        json!(42),
        json!(true),
        json!(null),
        json!(["array", "with", "strings"]),
        json!({ "permissions": [1, 2, 3], "restrictedModels": { "key": "value" } }),
        json!({ "synonyms": { "nested": { "key": "nestedValue" } }, "allowedActions": 12345 }),
    ] {
        let engine = RbacEngine::new(RbacOptions::from_value(&config));
        assert!(engine.decide("findMany", "user", None).is_ok());
    }
}
