//! Integration tests for the reflector, driven through `#[ArriType]`.

use arri_reflect::{
    ArriType, Discriminant, KeyCasing, Nullable, Optional, PrimitiveKind, ReflectError, Timestamp,
    TypeDef, discriminate, facet::Facet, reflect, reflect_value,
};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A chat message.
#[ArriType]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Message {
    /// Unique id.
    id: String,
    text: String,
}

#[ArriType]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Rectangle {
    width: f64,
    height: f64,
}

#[ArriType]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Circle {
    radius: f64,
}

#[ArriType]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Shape {
    rectangle: Option<Rectangle>,
    circle: Option<Circle>,
}

#[ArriType]
#[derive(Debug, Default)]
struct Drawing {
    title: String,
    shape: Shape,
}

#[ArriType]
#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Profile {
    name: String,
    nickname: Optional<String>,
    avatar_url: Nullable<String>,
}

#[ArriType]
struct TreeNode {
    label: String,
    children: Vec<TreeNode>,
    parent: Option<Box<TreeNode>>,
}

#[ArriType]
struct Author {
    name: String,
    books: Vec<Book>,
}

#[ArriType]
struct Book {
    title: String,
    author: Box<Author>,
}

struct Cache;

#[ArriType]
struct User {
    #[arri(key = "user_id")]
    id: u64,
    first_name: String,
    #[arri(skip)]
    #[allow(dead_code)]
    cache: Cache,
}

#[ArriType]
struct Job {
    name: String,
    retry: Retry,
}

#[ArriType]
struct Retry {
    on_failure: fn(u32) -> bool,
}

#[ArriType]
#[arri(discriminator = "kind")]
#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Payment {
    #[arri(tag = "card")]
    card: Option<Card>,
    bank_transfer: Option<Box<BankTransfer>>,
}

#[ArriType]
#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Card {
    last4: String,
}

#[ArriType]
#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct BankTransfer {
    iban: String,
}

#[ArriType]
#[arri(discriminator = "kind")]
struct Malformed {
    card: Option<Card>,
    note: String,
}

#[ArriType]
#[arri(discriminator = "kind")]
struct Unpopulated {}

#[ArriType]
#[arri(object)]
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct PatchUser {
    address: Option<Address>,
}

#[ArriType]
#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Address {
    street: String,
}

#[ArriType]
#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
enum Event {
    #[serde(rename = "created")]
    Created(Created),
    Deleted(Deleted),
}

#[ArriType]
#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
enum Notice {
    Created(Created),
    Deleted(Deleted),
}

#[ArriType]
#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Created {
    id: u32,
}

#[ArriType]
#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Deleted {
    id: u32,
    soft: bool,
}

#[ArriType]
#[allow(dead_code)]
enum Status {
    Active,
    #[arri(key = "on-hold")]
    OnHold,
}

#[ArriType]
struct Page<T> {
    items: Vec<T>,
    total: u32,
}

fn camel<T: for<'a> Facet<'a>>() -> TypeDef {
    reflect::<T>(KeyCasing::CamelCase).unwrap()
}

fn rectangle(width: f64, height: f64) -> Option<Rectangle> {
    Some(Rectangle { width, height })
}

#[test]
fn primitives_are_leaves() {
    assert_eq!(camel::<String>(), TypeDef::Primitive(PrimitiveKind::String));
    assert_eq!(camel::<bool>(), TypeDef::Primitive(PrimitiveKind::Boolean));
    assert_eq!(camel::<i8>(), TypeDef::Primitive(PrimitiveKind::Int8));
    assert_eq!(camel::<u64>(), TypeDef::Primitive(PrimitiveKind::Uint64));
    assert_eq!(camel::<f32>(), TypeDef::Primitive(PrimitiveKind::Float32));
    assert_eq!(camel::<Timestamp>(), TypeDef::Primitive(PrimitiveKind::Timestamp));
    assert_eq!(camel::<Box<u16>>(), TypeDef::Primitive(PrimitiveKind::Uint16));
}

#[test]
fn reflection_is_deterministic() {
    assert_eq!(camel::<Message>(), camel::<Message>());
    assert_eq!(camel::<Shape>(), camel::<Shape>());
    assert_eq!(camel::<TreeNode>(), camel::<TreeNode>());
}

#[test]
fn struct_serializes_to_arri_schema() {
    assert_eq!(
        serde_json::to_value(camel::<Message>()).unwrap(),
        json!({
            "properties": {
                "id": { "type": "string", "metadata": { "description": "Unique id." } },
                "text": { "type": "string" }
            },
            "metadata": { "id": "Message", "description": "A chat message." }
        })
    );
}

#[test]
fn keys_follow_casing_and_overrides() {
    let keys = |casing| {
        let def = reflect::<User>(casing).unwrap();
        def.as_object().unwrap().fields.keys().cloned().collect::<Vec<_>>()
    };
    assert_eq!(keys(KeyCasing::CamelCase), ["user_id", "firstName"]);
    assert_eq!(keys(KeyCasing::PascalCase), ["user_id", "FirstName"]);
    assert_eq!(keys(KeyCasing::SnakeCase), ["user_id", "first_name"]);

    let def = camel::<User>();
    let field = def.as_object().unwrap().field("firstName").unwrap();
    assert_eq!(field.name, "first_name");
}

#[test]
fn optional_and_nullable_fields() {
    let def = camel::<Profile>();
    let object = def.as_object().unwrap();
    assert_eq!(object.fields.keys().collect::<Vec<_>>(), ["name", "nickname", "avatarUrl"]);

    let nickname = object.field("nickname").unwrap();
    assert!(nickname.is_optional && !nickname.is_nullable);
    assert_eq!(nickname.type_def, TypeDef::Primitive(PrimitiveKind::String));

    let avatar = object.field("avatarUrl").unwrap();
    assert!(avatar.is_nullable && !avatar.is_optional);

    assert_eq!(
        serde_json::to_value(&def).unwrap(),
        json!({
            "properties": {
                "name": { "type": "string" },
                "avatarUrl": { "type": "string", "isNullable": true }
            },
            "optionalProperties": {
                "nickname": { "type": "string" }
            },
            "metadata": { "id": "Profile" }
        })
    );
}

#[test]
fn absent_optional_drops_its_key() {
    let absent = Profile {
        name: "Ada".to_string(),
        nickname: Optional::absent(),
        avatar_url: Nullable::null(),
    };
    assert_eq!(
        serde_json::to_value(&absent).unwrap(),
        json!({ "name": "Ada", "avatarUrl": null })
    );
    let parsed: Profile = serde_json::from_str(r#"{ "name": "Ada", "avatarUrl": null }"#).unwrap();
    assert_eq!(parsed, absent);

    let present = Profile {
        name: "Ada".to_string(),
        nickname: Optional::present("countess".to_string()),
        avatar_url: Nullable::new("https://example.com/ada.png".to_string()),
    };
    let wire = serde_json::to_value(&present).unwrap();
    assert_eq!(wire["nickname"], "countess");
    assert_eq!(serde_json::from_value::<Profile>(wire).unwrap(), present);
}

#[test]
fn self_reference_becomes_ref() {
    let def = camel::<TreeNode>();
    let object = def.as_object().unwrap();
    assert_eq!(
        object.field("children").unwrap().type_def,
        TypeDef::Array(Box::new(TypeDef::Ref("TreeNode".to_string())))
    );
    let parent = object.field("parent").unwrap();
    assert_eq!(parent.type_def, TypeDef::Ref("TreeNode".to_string()));
    assert!(!parent.is_optional && !parent.is_nullable);
}

#[test]
fn mutual_recursion_terminates() {
    let def = camel::<Author>();
    let books = &def.as_object().unwrap().field("books").unwrap().type_def;
    let TypeDef::Array(book) = books else {
        panic!("expected array, got {books:?}");
    };
    let book = book.as_object().unwrap();
    assert_eq!(book.id, "Book");
    assert_eq!(book.field("author").unwrap().type_def, TypeDef::Ref("Author".to_string()));
}

#[test]
fn function_fields_fail_with_dotted_path() {
    let err = reflect::<Job>(KeyCasing::CamelCase).unwrap_err();
    let ReflectError::UnsupportedType { path, reason, .. } = &err else {
        panic!("expected UnsupportedType, got {err:?}");
    };
    assert_eq!(path, "retry.on_failure");
    assert_eq!(reason, "function pointers cannot be serialized");
}

#[test]
fn shape_of_slots_is_a_union() {
    let def = camel::<Shape>();
    assert_eq!(
        serde_json::to_value(&def).unwrap(),
        json!({
            "discriminator": "type",
            "mapping": {
                "RECTANGLE": {
                    "properties": {
                        "width": { "type": "float64" },
                        "height": { "type": "float64" }
                    },
                    "metadata": { "id": "Rectangle" }
                },
                "CIRCLE": {
                    "properties": { "radius": { "type": "float64" } },
                    "metadata": { "id": "Circle" }
                }
            },
            "metadata": { "id": "Shape" }
        })
    );
}

#[test]
fn union_wire_carries_the_discriminator() {
    let parsed: Shape =
        serde_json::from_str(r#"{"type":"RECTANGLE","width":10,"height":1501}"#).unwrap();
    assert_eq!(
        parsed,
        Shape {
            rectangle: rectangle(10.0, 1501.0),
            circle: None,
        }
    );
    assert_eq!(
        serde_json::to_value(&parsed).unwrap(),
        json!({ "type": "RECTANGLE", "width": 10.0, "height": 1501.0 })
    );

    let circle: Shape = serde_json::from_value(json!({ "type": "CIRCLE", "radius": 2.5 })).unwrap();
    assert_eq!(circle.circle, Some(Circle { radius: 2.5 }));
    assert!(circle.rectangle.is_none());

    assert!(serde_json::from_value::<Shape>(json!({ "type": "TRIANGLE" })).is_err());
    assert!(serde_json::to_string(&Shape::default()).is_err());
}

#[test]
fn populated_shape_round_trips_and_discriminates() {
    let shape = Shape {
        rectangle: rectangle(10.0, 1501.0),
        circle: None,
    };

    let wire = serde_json::to_value(&shape).unwrap();
    let discriminant = discriminate(&shape).unwrap().unwrap();
    assert_eq!(
        discriminant,
        Discriminant {
            key: "type".to_string(),
            tag: "RECTANGLE".to_string(),
            alternative: "rectangle",
        }
    );
    assert_eq!(wire[discriminant.key.as_str()], discriminant.tag.as_str());
    assert_eq!(serde_json::from_value::<Shape>(wire).unwrap(), shape);
    assert_eq!(reflect_value(&shape, KeyCasing::CamelCase).unwrap(), camel::<Shape>());
}

#[test]
fn union_values_need_exactly_one_alternative() {
    assert!(matches!(
        reflect_value(&Shape::default(), KeyCasing::CamelCase),
        Err(ReflectError::AmbiguousUnion { populated: 0, .. })
    ));

    let both = Shape {
        rectangle: rectangle(1.0, 2.0),
        circle: Some(Circle { radius: 3.0 }),
    };
    assert!(matches!(
        discriminate(&both),
        Err(ReflectError::AmbiguousUnion { populated: 2, .. })
    ));
    assert!(matches!(
        reflect_value(&both, KeyCasing::CamelCase),
        Err(ReflectError::AmbiguousUnion { populated: 2, .. })
    ));

    let message = Message {
        id: "1".to_string(),
        text: "hi".to_string(),
    };
    assert_eq!(discriminate(&message).unwrap(), None);
}

#[test]
fn value_check_reaches_nested_and_boxed_unions() {
    let drawing = Drawing {
        title: "sketch".to_string(),
        shape: Shape::default(),
    };
    let err = reflect_value(&drawing, KeyCasing::CamelCase).unwrap_err();
    assert!(matches!(err, ReflectError::AmbiguousUnion { populated: 0, .. }));
    assert_eq!(err.path(), "shape");

    let drawing = Drawing {
        title: "sketch".to_string(),
        shape: Shape {
            rectangle: None,
            circle: Some(Circle { radius: 1.0 }),
        },
    };
    assert_eq!(reflect_value(&drawing, KeyCasing::CamelCase).unwrap(), camel::<Drawing>());

    let boxed = Box::new(Shape::default());
    assert!(matches!(
        reflect_value(&boxed, KeyCasing::CamelCase),
        Err(ReflectError::AmbiguousUnion { populated: 0, .. })
    ));
    let boxed = Box::new(Shape {
        rectangle: rectangle(3.0, 4.0),
        circle: None,
    });
    assert_eq!(discriminate(&boxed).unwrap().unwrap().tag, "RECTANGLE");
}

#[test]
fn explicit_discriminator_and_tags() {
    let def = camel::<Payment>();
    let union = def.as_union().unwrap();
    assert_eq!(union.discriminator_key, "kind");
    assert_eq!(union.alternatives.keys().collect::<Vec<_>>(), ["card", "BANK_TRANSFER"]);
    assert_eq!(union.alternatives["BANK_TRANSFER"].id, "BankTransfer");

    let payment: Payment =
        serde_json::from_value(json!({ "kind": "BANK_TRANSFER", "iban": "DE89" })).unwrap();
    assert_eq!(
        payment,
        Payment {
            card: None,
            bank_transfer: Some(Box::new(BankTransfer {
                iban: "DE89".to_string(),
            })),
        }
    );
    assert_eq!(
        serde_json::to_value(&payment).unwrap(),
        json!({ "kind": "BANK_TRANSFER", "iban": "DE89" })
    );
}

#[test]
fn malformed_discriminated_structs_are_rejected() {
    assert!(matches!(
        reflect::<Malformed>(KeyCasing::CamelCase),
        Err(ReflectError::UnsupportedType { .. })
    ));
    assert!(matches!(
        reflect::<Unpopulated>(KeyCasing::CamelCase),
        Err(ReflectError::AmbiguousUnion { populated: 0, .. })
    ));
}

#[test]
fn object_marker_keeps_a_lone_slot_an_object() {
    let def = camel::<PatchUser>();
    let object = def.as_object().unwrap();
    assert_eq!(object.id, "PatchUser");
    assert_eq!(object.field("address").unwrap().type_def.id(), Some("Address"));

    let empty = PatchUser::default();
    assert_eq!(reflect_value(&empty, KeyCasing::CamelCase).unwrap(), def);
    assert_eq!(discriminate(&empty).unwrap(), None);
    assert_eq!(serde_json::to_value(&empty).unwrap(), json!({ "address": null }));
}

#[test]
fn data_enum_matches_serde_tagging() {
    let def = camel::<Event>();
    let union = def.as_union().unwrap();
    assert_eq!(union.discriminator_key, "kind");
    assert_eq!(union.alternatives.keys().collect::<Vec<_>>(), ["created", "DELETED"]);

    let event = Event::Deleted(Deleted { id: 7, soft: true });
    let wire = serde_json::to_value(&event).unwrap();
    let discriminant = discriminate(&event).unwrap().unwrap();
    assert_eq!(wire[discriminant.key.as_str()], discriminant.tag.as_str());
    assert_eq!(serde_json::from_value::<Event>(wire).unwrap(), event);
}

#[test]
fn serde_tag_without_renames_uses_variant_names() {
    let def = camel::<Notice>();
    let union = def.as_union().unwrap();
    assert_eq!(union.discriminator_key, "kind");
    assert_eq!(union.alternatives.keys().collect::<Vec<_>>(), ["Created", "Deleted"]);

    let notice = Notice::Created(Created { id: 1 });
    let wire = serde_json::to_value(&notice).unwrap();
    assert_eq!(wire, json!({ "kind": "Created", "id": 1 }));
    assert_eq!(discriminate(&notice).unwrap().unwrap().tag, "Created");
}

#[test]
fn fieldless_enum_is_string_enum() {
    assert_eq!(
        camel::<Status>(),
        TypeDef::Enum(vec!["ACTIVE".to_string(), "on-hold".to_string()])
    );
}

#[test]
fn generic_structs_name_their_arguments() {
    let def = camel::<Page<Message>>();
    let page = def.as_object().unwrap();
    assert_eq!(page.id, "Page[Message]");
    let TypeDef::Array(items) = &page.field("items").unwrap().type_def else {
        panic!("expected array");
    };
    assert_eq!(items.as_object().unwrap().id, "Message");

    assert_eq!(camel::<Page<Circle>>().id(), Some("Page[Circle]"));
}
