//! End-to-end model definition: a class-based `User`, a class-based
//! `UserGroup`, and a factory-defined `UserPost`, wired together with
//! associations, scopes, hooks, and indexes.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use arbor_orm::{
    AssociationDef, AttributeDef, AttributeType, DestroyOptions, Entity, Filter, HookContext,
    HookPhase, IndexDef, IndexMethod, ModelDef, Registry, ScalarValue, Scope, ScopeCall,
    ToScalarValue,
};

struct User;

impl Entity for User {
    fn definition() -> ModelDef {
        ModelDef::new("User")
            .table("users")
            .attribute(
                AttributeDef::new("id", AttributeType::BigInt)
                    .primary_key()
                    .auto_increment(),
            )
            .attribute(AttributeDef::new("first_name", AttributeType::Text).not_null())
            .attribute(AttributeDef::new("last_name", AttributeType::Text))
            .attribute(AttributeDef::new("username", AttributeType::Text))
            .attribute(AttributeDef::new("group_id", AttributeType::BigInt))
            .timestamps()
            .getter("a", |_instance| ScalarValue::Int(1))
            .setter("b", |instance, value| instance.set("username", value))
            .scope(
                "without_first_name",
                Scope::Static(Filter::is_null("first_name")),
            )
            .scope(
                "with_first_name",
                Scope::dynamic(|args| Filter::eq("first_name", args[0].clone())),
            )
            .index(
                IndexDef::new("first_name_idx", vec!["first_name".to_string()])
                    .method(IndexMethod::BTree)
                    .concurrently(),
            )
            .association(AssociationDef::belongs_to("group", "UserGroup").foreign_key("group_id"))
            .association(AssociationDef::has_many("posts", "UserPost").foreign_key("user_id"))
    }
}

struct UserGroup;

impl Entity for UserGroup {
    fn definition() -> ModelDef {
        ModelDef::new("UserGroup")
            .table("user_groups")
            .attribute(
                AttributeDef::new("id", AttributeType::BigInt)
                    .primary_key()
                    .auto_increment(),
            )
            .attribute(AttributeDef::new("name", AttributeType::Text).not_null())
    }
}

fn build_registry() -> Registry {
    let mut registry = Registry::new();
    registry.register_entity::<User>().unwrap();
    registry.register_entity::<UserGroup>().unwrap();
    // Factory-style definition, interchangeable with the class-based ones.
    registry
        .define("UserPost", |def| {
            def.table("user_posts")
                .attribute(
                    AttributeDef::new("id", AttributeType::BigInt)
                        .primary_key()
                        .auto_increment(),
                )
                .attribute(AttributeDef::new("body", AttributeType::Text).not_null())
                .attribute(AttributeDef::new("user_id", AttributeType::BigInt))
                .association(
                    AssociationDef::belongs_to("user", "User")
                        .foreign_key("user_id")
                        .target_key("id"),
                )
        })
        .unwrap();
    registry.resolve_associations().unwrap();
    registry
}

fn user_payload(first_name: &str) -> BTreeMap<String, ScalarValue> {
    let mut values = BTreeMap::new();
    values.insert("first_name".to_string(), first_name.to_scalar_value());
    values
}

#[test]
fn associations_resolve_across_definition_forms() {
    let registry = build_registry();

    let group = registry.association("User", "group").unwrap();
    assert_eq!(group.source().name(), "User");
    assert_eq!(group.target().name(), "UserGroup");

    // Class-based referrer, factory-defined target.
    let posts = registry.association("User", "posts").unwrap();
    assert_eq!(posts.target().table_name(), "user_posts");

    // Factory-defined referrer, class-based target.
    let author = registry.association("UserPost", "user").unwrap();
    assert_eq!(author.target().name(), "User");
}

#[test]
fn association_helpers_follow_the_keys() {
    let registry = build_registry();
    let user_model = registry.get("User").unwrap();

    let mut user = user_model.create(user_payload("Ada")).unwrap();

    // set: belongs-to writes the foreign key on the declaring instance.
    let group = registry.association("User", "group").unwrap();
    group.set_related(&mut user, ScalarValue::Int(7)).unwrap();
    assert_eq!(user.get("group_id"), Some(&ScalarValue::Int(7)));

    // get: the related filter points at the target key.
    assert_eq!(group.related_filter(&user), Filter::eq("id", 7i64));

    // create: has-many links the new row back to the declaring instance.
    user.set("id", ScalarValue::Int(3));
    let posts = registry.association("User", "posts").unwrap();
    let mut payload = BTreeMap::new();
    payload.insert("body".to_string(), "hello".to_scalar_value());
    let post = posts.create_related(&mut user, payload).unwrap();
    assert_eq!(post.model(), "UserPost");
    assert_eq!(post.get("user_id"), Some(&ScalarValue::Int(3)));
    assert_eq!(posts.related_filter(&user), Filter::eq("user_id", 3i64));

    // set is rejected on the has-many side.
    assert!(posts.set_related(&mut user, ScalarValue::Int(1)).is_err());
}

#[test]
fn creation_shape_distinguishes_required_from_optional() {
    let registry = build_registry();
    let user_model = registry.get("User").unwrap();

    // Only first_name is required: id auto-increments, the rest are
    // nullable or defaulted (timestamps).
    assert_eq!(user_model.required_at_creation(), vec!["first_name"]);

    let user = user_model.create(user_payload("Ada")).unwrap();
    // Every attribute is present after creation, even the omitted ones.
    for attr in user_model.attributes() {
        assert!(user.get(&attr.name).is_some(), "missing {}", attr.name);
    }

    assert!(user_model.create(BTreeMap::new()).is_err());
}

#[test]
fn scopes_combine_by_name() {
    let registry = build_registry();
    let user_model = registry.get("User").unwrap();

    let filter = user_model
        .scoped(&[
            ScopeCall::named("without_first_name"),
            ScopeCall::named("with_first_name").with_args(vec!["Ada".to_scalar_value()]),
        ])
        .unwrap()
        .unwrap();

    assert_eq!(
        filter,
        Filter::is_null("first_name").and(Filter::eq("first_name", "Ada"))
    );
}

#[test]
fn computed_accessors_are_distinct_from_attributes() {
    let registry = build_registry();
    let user_model = registry.get("User").unwrap();

    let mut user = user_model.create(user_payload("Ada")).unwrap();
    assert_eq!(
        user_model.get_computed("a", &user).unwrap(),
        ScalarValue::Int(1)
    );
    user_model
        .set_computed("b", &mut user, "grace".to_scalar_value())
        .unwrap();
    assert_eq!(
        user.get("username"),
        Some(&ScalarValue::Text("grace".to_string()))
    );
}

#[tokio::test]
async fn hooks_fire_with_phase_shaped_payloads() {
    let mut registry = build_registry();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let user_model = registry.get_mut("User").unwrap();

    let seen_find = Arc::clone(&seen);
    user_model
        .hooks_mut()
        .add_named(HookPhase::BeforeFind, "narrow", move |ctx| {
            let seen = Arc::clone(&seen_find);
            async move {
                if let HookContext::Find(options) = ctx {
                    seen.lock().unwrap().push(format!(
                        "beforeFind limit={:?}",
                        options.limit
                    ));
                }
                Ok(())
            }
        });

    let seen_found = Arc::clone(&seen);
    user_model.hooks_mut().add(HookPhase::AfterFind, move |ctx| {
        let seen = Arc::clone(&seen_found);
        async move {
            if let HookContext::Rows(rows) = ctx {
                seen.lock().unwrap().push(format!("afterFind rows={}", rows.len()));
            }
            Ok(())
        }
    });

    let seen_destroy = Arc::clone(&seen);
    user_model
        .hooks_mut()
        .add(HookPhase::AfterDestroy, move |ctx| {
            let seen = Arc::clone(&seen_destroy);
            async move {
                if let HookContext::Destroyed(instance, options) = ctx {
                    // The options of the destroy are passed through to the
                    // hook, which may await further driver work with them.
                    tokio::task::yield_now().await;
                    seen.lock().unwrap().push(format!(
                        "afterDestroy model={} force={}",
                        instance.model(),
                        options.force
                    ));
                }
                Ok(())
            }
        });

    let user_model = registry.get("User").unwrap();
    let user = user_model.create(user_payload("Ada")).unwrap();

    user_model
        .hooks()
        .run(
            "User",
            HookPhase::BeforeFind,
            HookContext::Find(arbor_orm::FindOptions {
                filter: Some(Filter::eq("first_name", "Ada")),
                limit: Some(10),
            }),
        )
        .await
        .unwrap();
    user_model
        .hooks()
        .run(
            "User",
            HookPhase::AfterFind,
            HookContext::Rows(vec![user.clone()]),
        )
        .await
        .unwrap();
    user_model
        .hooks()
        .run(
            "User",
            HookPhase::AfterDestroy,
            HookContext::Destroyed(user, DestroyOptions { force: true }),
        )
        .await
        .unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            "beforeFind limit=Some(10)".to_string(),
            "afterFind rows=1".to_string(),
            "afterDestroy model=User force=true".to_string(),
        ]
    );
}

#[tokio::test]
async fn sync_runs_after_sync_hooks_per_model() {
    let mut registry = build_registry();
    let synced = Arc::new(AtomicUsize::new(0));

    let synced_clone = Arc::clone(&synced);
    registry
        .get_mut("User")
        .unwrap()
        .hooks_mut()
        .add(HookPhase::AfterSync, move |_ctx| {
            // Stands in for issuing follow-up DDL through the driver layer.
            synced_clone.fetch_add(1, Ordering::SeqCst);
            async { Ok(()) }
        });

    registry.sync_all().await.unwrap();
    assert_eq!(synced.load(Ordering::SeqCst), 1);
}

#[test]
fn driver_failures_surface_through_the_taxonomy() {
    use arbor_orm::{ConstraintErrorOptions, DatabaseError, DefinitionError, DriverError, ErrorKind};

    fn save() -> arbor_orm::Result<()> {
        let err = DatabaseError::unique_constraint(ConstraintErrorOptions {
            parent: Some(DriverError::new("", "23505", "dup key")),
            constraint: Some("users_username_key".to_string()),
            table: Some("users".to_string()),
            ..Default::default()
        });
        Err(err)?
    }

    let db = match save().unwrap_err() {
        DefinitionError::Database(db) => db,
        other => panic!("expected database error, got {other:?}"),
    };
    assert_eq!(db.name(), "SequelizeUniqueConstraintError");
    assert!(matches!(db.kind(), ErrorKind::UniqueConstraint(d) if d.table == "users"));
}
