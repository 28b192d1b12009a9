//! End-to-end field building scenarios.

use acf_fields::{
    conditional_logic, settings_from_value, BuilderConfig, Field, FieldsError, Group, NestedKeys,
    Rule, SequentialTokens, Session, Settings,
};
use serde_json::{json, Value};

fn settings(value: Value) -> Settings {
    settings_from_value("test", value).expect("test settings must be a mapping")
}

fn employee() -> Group {
    Group::from_settings(settings(json!({
        "key": "employee",
        "title": "Employee",
        "fields": []
    })))
    .unwrap()
}

fn image_field() -> Settings {
    let mut field = settings(json!({
        "label": "Thumbnail",
        "name": "image",
        "sub_fields": [
            {"type": "text", "label": "Source", "name": "source"}
        ]
    }));
    field.insert(
        "conditional_logic".into(),
        conditional_logic([vec![Rule::new("source", "https://example.com/")]]),
    );
    field
}

#[test_log::test]
fn thumbnail_field_with_flat_nested_keys() {
    let group = employee();
    let mut session =
        Session::with_config(BuilderConfig::default().with_nested_keys(NestedKeys::Group));

    let field = session.field(&group, image_field()).unwrap();
    let mapping = field.to_mapping(&mut session).unwrap();

    let expected = json!({
        "label": "Thumbnail",
        "name": "image",
        "sub_fields": [
            {"type": "text", "label": "Source", "name": "source", "key": "field_employee_source"}
        ],
        "conditional_logic": [
            [{"field": "field_employee_source", "operator": "==", "value": "https://example.com/"}]
        ],
        "key": "field_employee_image"
    });
    assert_eq!(
        serde_json::to_string(&mapping).unwrap(),
        serde_json::to_string(&expected).unwrap()
    );
}

#[test_log::test]
fn thumbnail_field_with_parent_nested_keys() {
    let group = employee();
    let mut session = Session::new();

    let field = session.field(&group, image_field()).unwrap();
    let mapping = field.to_mapping(&mut session).unwrap();

    assert_eq!(mapping["key"], "field_employee_image");
    assert_eq!(mapping["sub_fields"][0]["key"], "field_employee_image_source");
    // Conditional logic still resolves against the group prefix, so it does
    // not match the nested sub-field key. Kept for compatibility.
    assert_eq!(
        mapping["conditional_logic"][0][0]["field"],
        "field_employee_source"
    );
}

#[test]
fn sub_fields_method_returns_serialized_children() {
    let group = employee();
    let mut session =
        Session::with_config(BuilderConfig::default().with_nested_keys(NestedKeys::Group));
    let field = session.field(&group, image_field()).unwrap();

    let sub_fields = field.sub_fields(&mut session).unwrap();
    assert_eq!(sub_fields.len(), 1);
    assert_eq!(sub_fields[0]["key"], "field_employee_source");
}

#[test]
fn duplicate_link_fields_collide() {
    let group = employee();
    let mut session = Session::new();
    let link = json!({"name": "link", "label": "Link", "type": "url"});

    session.field(&group, settings(link.clone())).unwrap();
    let err = session.field(&group, settings(link)).unwrap_err();

    match err {
        FieldsError::KeyCollision { ref key } => assert_eq!(key, "field_employee_link"),
        ref other => panic!("expected KeyCollision, got {other:?}"),
    }
    assert!(err.to_string().contains("field_employee_link"));
}

#[test]
fn repeated_tab_names_do_not_collide() {
    let group = employee();
    let mut session = Session::new();
    let tab = json!({"name": "details", "label": "Details", "type": "tab"});

    let first = session.field(&group, settings(tab.clone())).unwrap();
    let second = session.field(&group, settings(tab)).unwrap();

    assert_ne!(first.key(), second.key());
    assert!(first.key().starts_with("field_employee_"));
    assert!(second.key().starts_with("field_employee_"));
    assert_eq!(session.registry().len(), 2);
}

#[test]
fn sub_field_order_is_preserved() {
    let group = employee();
    let mut session = Session::new();
    let field = session
        .field(
            &group,
            settings(json!({
                "name": "contacts",
                "type": "repeater",
                "sub_fields": [
                    {"name": "a", "type": "text"},
                    {"name": "b", "type": "email"}
                ]
            })),
        )
        .unwrap();

    let mapping = field.to_mapping(&mut session).unwrap();
    assert_eq!(
        mapping["sub_fields"],
        json!([
            {"name": "a", "type": "text", "key": "field_employee_contacts_a"},
            {"name": "b", "type": "email", "key": "field_employee_contacts_b"}
        ])
    );
    let issued: Vec<_> = session.registry().keys().collect();
    assert_eq!(
        issued,
        vec![
            "field_employee_contacts",
            "field_employee_contacts_a",
            "field_employee_contacts_b"
        ]
    );
}

#[test]
fn serialization_is_reproducible_with_fresh_sessions() {
    let group = Group::from_yaml(
        r#"
key: group_employee
title: Employee
fields:
  - name: details
    label: Details
    type: tab
  - name: full name
    label: Full name
    type: text
    required: 1
  - name: website
    label: Website
    type: url
    conditional_logic:
      - - name: full name
          operator: "!="
          value: ""
"#,
    )
    .unwrap();

    let build = || {
        let mut session = Session::new().with_tokens(SequentialTokens::default());
        serde_json::to_string(&group.to_mapping(&mut session).unwrap()).unwrap()
    };
    let first = build();
    let second = build();
    assert_eq!(first, second);

    let mut session = Session::new().with_tokens(SequentialTokens::default());
    let mapping = group.to_mapping(&mut session).unwrap();
    assert_eq!(mapping["key"], "group_employee");
    assert_eq!(mapping["fields"][0]["key"], "field_employee_tab_1");
    assert_eq!(mapping["fields"][1]["key"], "field_employee_full_name");
    assert_eq!(mapping["fields"][1]["required"], 1);
    assert_eq!(
        mapping["fields"][2]["conditional_logic"],
        json!([[{"field": "field_employee_full_name", "operator": "!=", "value": ""}]])
    );
}

#[test]
fn reusing_a_session_without_reset_collides() {
    let group = employee().with_field(settings(json!({"name": "link"})));
    let mut session = Session::new();

    group.to_mapping(&mut session).unwrap();
    let err = group.to_mapping(&mut session).unwrap_err();
    assert!(matches!(err, FieldsError::KeyCollision { .. }));

    session.reset();
    group.to_mapping(&mut session).unwrap();
}

#[test]
fn fields_in_different_groups_do_not_collide() {
    let employee = employee();
    let company = Group::new("company");
    let mut session = Session::new();

    let a = session.field(&employee, settings(json!({"name": "link"}))).unwrap();
    let b = session.field(&company, settings(json!({"name": "link"}))).unwrap();
    assert_eq!(a.key(), "field_employee_link");
    assert_eq!(b.key(), "field_company_link");
}

#[test]
fn deeply_nested_conditional_logic_keeps_group_prefix() {
    let group = employee();
    let mut session = Session::new();
    let parent = session
        .field(&group, settings(json!({"name": "profile", "type": "group"})))
        .unwrap();
    let child = Field::nested(
        &mut session,
        &parent,
        settings(json!({
            "name": "twitter",
            "type": "url",
            "conditional_logic": [[{"name": "has social", "operator": "==", "value": 1}]]
        })),
    )
    .unwrap();

    assert_eq!(child.key(), "field_employee_profile_twitter");
    let logic = child.conditional_logic().unwrap();
    assert_eq!(logic[0][0].field, "field_employee_has_social");
}
