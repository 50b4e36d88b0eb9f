//! Integration tests for route building and the app definition document.

use arri_reflect::{
    AppDefinition, AppDefinitionError, AppInfo, ArriType, HttpMethod, KeyCasing, Nullable,
    RequestContext, RouteError, RouteOptions, RouteSide, build_route, reflect, rpc_path,
};
use pretty_assertions::assert_eq;
use serde_json::json;

#[ArriType]
struct Message {
    id: String,
    body: String,
}

#[ArriType]
struct Rectangle {
    width: f64,
    height: f64,
}

#[ArriType]
#[derive(Default)]
struct Shape {
    rectangle: Option<Rectangle>,
}

#[ArriType]
#[arri(name = "Message")]
struct OtherMessage {
    subject: String,
}

#[ArriType]
struct Hook {
    callback: fn() -> u8,
}

#[ArriType]
struct Account {
    handle: String,
}

#[ArriType]
struct Query {
    cursor: Nullable<String>,
}

#[ArriType]
struct Page<T> {
    items: Vec<T>,
    next: Nullable<String>,
}

#[derive(Debug)]
struct HandlerError;

fn my_test_func(_: Message, _: RequestContext) -> Result<Shape, HandlerError> {
    Ok(Shape::default())
}

fn send(_: Message) -> Result<Message, HandlerError> {
    Err(HandlerError)
}

fn post(path: &str) -> RouteOptions {
    RouteOptions::builder().path(path).method("POST").build()
}

#[test]
fn route_reflects_message_and_response() {
    let route = build_route(&my_test_func, &post("/my-test-func")).unwrap();
    assert_eq!(route.path(), "/my-test-func");
    assert_eq!(route.method(), HttpMethod::Post);
    assert_eq!(route.description(), None);
    assert_eq!(route.params(), &reflect::<Message>(KeyCasing::CamelCase).unwrap());
    assert_eq!(route.response(), &reflect::<Shape>(KeyCasing::CamelCase).unwrap());
}

#[test]
fn options_fail_before_reflection() {
    let hook = |_: Hook| -> Result<Message, HandlerError> { Err(HandlerError) };

    let err = build_route(&hook, &post("hook")).unwrap_err();
    assert!(matches!(err, RouteError::InvalidRouteOptions(_)));

    let options = RouteOptions::builder().path("/hook").method("TRACE").build();
    let err = build_route(&hook, &options).unwrap_err();
    assert!(matches!(err, RouteError::InvalidRouteOptions(_)));
}

#[test]
fn reflection_errors_name_the_side() {
    let bad_params = |_: Hook| -> Result<Message, HandlerError> { Err(HandlerError) };
    let err = build_route(&bad_params, &post("/hook")).unwrap_err();
    let RouteError::Reflect { side, source } = &err else {
        panic!("expected a reflection error, got {err:?}");
    };
    assert_eq!(*side, RouteSide::Params);
    assert_eq!(source.path(), "callback");

    let bad_response = |_: Message| -> Result<Hook, HandlerError> { Err(HandlerError) };
    let err = build_route(&bad_response, &post("/hook")).unwrap_err();
    assert!(matches!(
        err,
        RouteError::Reflect {
            side: RouteSide::Response,
            ..
        }
    ));
}

#[test]
fn options_load_from_config() {
    let options: RouteOptions = serde_json::from_value(json!({
        "path": "/messages/send",
        "method": "put",
        "description": "Send a message",
        "keyCasing": "snake_case"
    }))
    .unwrap();
    let route = build_route(&send, &options).unwrap();
    assert_eq!(route.method(), HttpMethod::Put);
    assert_eq!(route.description(), Some("Send a message"));
}

#[test]
fn app_document_lists_procedures_and_models() {
    let mut app = AppDefinition::new().with_info(
        AppInfo::builder()
            .title("Test app")
            .version("1")
            .build(),
    );
    app.register("shapes.myTestFunc", build_route(&my_test_func, &post("/my-test-func")).unwrap())
        .unwrap();
    app.register(
        "messages.send",
        build_route(&send, &post(&rpc_path("messages.send", None))).unwrap(),
    )
    .unwrap();

    assert_eq!(app.models().keys().collect::<Vec<_>>(), ["Message", "Shape"]);
    assert_eq!(app.procedure("messages.send").unwrap().path(), "/messages/send");

    let document = serde_json::to_value(&app).unwrap();
    assert_eq!(document["arriSchemaVersion"], "0.0.2");
    assert_eq!(document["info"], json!({ "title": "Test app", "version": "1" }));
    assert_eq!(
        document["procedures"]["shapes.myTestFunc"],
        json!({
            "path": "/my-test-func",
            "method": "post",
            "params": "Message",
            "response": "Shape"
        })
    );
    assert_eq!(document["models"]["Shape"]["discriminator"], "type");
}

#[test]
fn app_rejects_duplicates_and_conflicts() {
    let mut app = AppDefinition::new();
    app.register("messages.send", build_route(&send, &post("/send")).unwrap())
        .unwrap();

    let again = build_route(&send, &post("/send")).unwrap();
    assert_eq!(
        app.register("messages.send", again),
        Err(AppDefinitionError::DuplicateProcedure("messages.send".to_string()))
    );

    let other = |_: OtherMessage| -> Result<Shape, HandlerError> { Ok(Shape::default()) };
    let route = build_route(&other, &post("/other")).unwrap();
    assert_eq!(
        app.register("messages.other", route),
        Err(AppDefinitionError::ConflictingModel("Message".to_string()))
    );
    assert!(app.procedure("messages.other").is_none());
    assert!(!app.models().contains_key("Shape"));

    let echo = |text: String| -> Result<String, HandlerError> { Ok(text) };
    let route = build_route(&echo, &post("/echo")).unwrap();
    assert_eq!(
        app.register("echo", route),
        Err(AppDefinitionError::NonObjectModel {
            procedure: "echo".to_string(),
            side: RouteSide::Params,
        })
    );
}

#[test]
fn generic_instantiations_are_distinct_models() {
    let list_messages = |_: Query| -> Result<Page<Message>, HandlerError> { Err(HandlerError) };
    let list_accounts = |_: Query| -> Result<Page<Account>, HandlerError> { Err(HandlerError) };

    let mut app = AppDefinition::new();
    app.register("messages.list", build_route(&list_messages, &post("/messages/list")).unwrap())
        .unwrap();
    app.register("accounts.list", build_route(&list_accounts, &post("/accounts/list")).unwrap())
        .unwrap();

    assert_eq!(
        app.models().keys().collect::<Vec<_>>(),
        ["Query", "Page[Message]", "Page[Account]"]
    );
    let document = serde_json::to_value(&app).unwrap();
    assert_eq!(document["procedures"]["accounts.list"]["response"], "Page[Account]");
}
