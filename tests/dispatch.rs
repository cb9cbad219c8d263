//! Dispatch tests against the composed Petstore router.

use axum::http::{HeaderMap, Method};
use serde_json::json;

use petstore_router::controller::ControllerError;
use petstore_router::routing::{DispatchError, Incoming, Reply, Resolution};

mod common;

/// (method, concrete path, expected capability) for every Petstore operation.
const OPERATIONS: &[(Method, &str, &str)] = &[
    (Method::PUT, "/pet", "updatePet"),
    (Method::POST, "/pet", "addPet"),
    (Method::GET, "/pet/findByStatus", "findPetsByStatus"),
    (Method::GET, "/pet/findByTags", "findPetsByTags"),
    (Method::GET, "/pet/1", "getPetById"),
    (Method::POST, "/pet/1", "updatePetWithForm"),
    (Method::DELETE, "/pet/1", "deletePet"),
    (Method::POST, "/pet/1/uploadImage", "uploadFile"),
    (Method::GET, "/store/inventory", "getInventory"),
    (Method::POST, "/store/order", "placeOrder"),
    (Method::GET, "/store/order/1", "getOrderById"),
    (Method::DELETE, "/store/order/1", "deleteOrder"),
    (Method::POST, "/user", "createUser"),
    (Method::POST, "/user/createWithArray", "createUsersWithArrayInput"),
    (Method::POST, "/user/createWithList", "createUsersWithListInput"),
    (Method::GET, "/user/login", "loginUser"),
    (Method::GET, "/user/logout", "logoutUser"),
    (Method::GET, "/user/alice", "getUserByName"),
    (Method::PUT, "/user/alice", "updateUser"),
    (Method::DELETE, "/user/alice", "deleteUser"),
];

/// A request that satisfies the binding of `capability`.
fn request_for(method: &Method, path: &str, capability: &str) -> Incoming {
    let incoming = Incoming::new(method.clone(), path);
    match capability {
        "updatePet" | "addPet" => incoming.with_json(&json!({ "name": "rex" })).unwrap(),
        "findPetsByStatus" => incoming.with_query("status=available"),
        "findPetsByTags" => incoming.with_query("tags=dog"),
        "placeOrder" => incoming.with_json(&json!({ "petId": 1 })).unwrap(),
        "createUser" | "updateUser" => incoming.with_json(&json!({ "username": "alice" })).unwrap(),
        "createUsersWithArrayInput" | "createUsersWithListInput" => {
            incoming.with_json(&json!([{ "username": "alice" }])).unwrap()
        }
        "loginUser" => incoming.with_query("username=alice&password=secret"),
        _ => incoming,
    }
}

#[tokio::test]
async fn test_every_operation_reaches_exactly_its_capability() {
    let (router, recorder) = common::stub_router();

    for (method, path, capability) in OPERATIONS {
        recorder.clear();
        let result = router.dispatch(request_for(method, path, capability)).await;
        assert!(result.is_ok(), "{method} {path}: {:?}", result.err());
        assert_eq!(recorder.capabilities(), vec![*capability], "{method} {path}");
    }
}

#[test]
fn test_route_sequence_matches_scheme() {
    let (router, _) = common::stub_router();

    let ops: Vec<_> = router.routes().map(|r| r.operation()).collect();
    let expected: Vec<_> = OPERATIONS.iter().map(|(_, _, op)| *op).collect();
    assert_eq!(ops, expected);

    let tables: Vec<_> = router.tables().map(|t| t.prefix().as_str()).collect();
    assert_eq!(tables, vec!["/pet", "/store", "/user"]);
}

#[test]
fn test_literal_routes_are_not_captured_as_params() {
    let (router, _) = common::stub_router();

    for (path, expected) in [
        ("/pet/findByStatus", "findPetsByStatus"),
        ("/pet/findByTags", "findPetsByTags"),
        ("/user/login", "loginUser"),
        ("/user/logout", "logoutUser"),
    ] {
        assert_eq!(router.resolve(&Method::GET, path).operation(), Some(expected));
    }
}

#[tokio::test]
async fn test_unknown_path_is_route_not_found() {
    let (router, recorder) = common::stub_router();

    for path in ["/pet/1/nonexistent", "/pets", "/", "/pet/1/"] {
        let err = router
            .dispatch(Incoming::new(Method::GET, path))
            .await
            .unwrap_err();
        assert!(
            matches!(err, DispatchError::RouteNotFound { path: ref p, .. } if p == path),
            "{path}: {err}"
        );
    }
    assert!(recorder.calls().is_empty());
}

#[tokio::test]
async fn test_wrong_method_lists_allowed_methods() {
    let (router, recorder) = common::stub_router();

    let err = router
        .dispatch(Incoming::new(Method::PATCH, "/pet/1"))
        .await
        .unwrap_err();
    match err {
        DispatchError::MethodNotAllowed { allowed, .. } => {
            assert_eq!(allowed, vec![Method::GET, Method::POST, Method::DELETE]);
        }
        other => panic!("unexpected error: {other}"),
    }

    match router.resolve(&Method::DELETE, "/store/inventory") {
        Resolution::MethodNotAllowed { allowed } => assert_eq!(allowed, vec![Method::GET]),
        other => panic!("unexpected resolution: {other:?}"),
    }
    assert!(recorder.calls().is_empty());
}

#[tokio::test]
async fn test_resolution_is_idempotent() {
    let (router, recorder) = common::stub_router();

    for _ in 0..3 {
        router
            .dispatch(Incoming::new(Method::GET, "/pet/7"))
            .await
            .unwrap();
    }
    let calls = recorder.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls.iter().all(|c| c.capability == "getPetById" && c.args["petId"] == 7));
}

#[tokio::test]
async fn test_arguments_bound_from_request() {
    let (router, recorder) = common::stub_router();

    let reply = router
        .dispatch(Incoming::new(Method::GET, "/store/inventory"))
        .await
        .unwrap();
    assert_eq!(reply, Reply::Json(json!({ "available": 3 })));
    assert_eq!(recorder.calls()[0].args, json!({}));

    recorder.clear();
    router
        .dispatch(Incoming::new(Method::DELETE, "/user/alice"))
        .await
        .unwrap();
    assert_eq!(recorder.calls()[0].args, json!({ "username": "alice" }));

    recorder.clear();
    router
        .dispatch(Incoming::new(Method::GET, "/user/j%C3%B6rg"))
        .await
        .unwrap();
    assert_eq!(recorder.calls()[0].args, json!({ "username": "jörg" }));

    recorder.clear();
    router
        .dispatch(Incoming::new(Method::GET, "/pet/findByStatus").with_query("status=available,sold&status=pending"))
        .await
        .unwrap();
    assert_eq!(
        recorder.calls()[0].args,
        json!({ "status": ["available", "sold", "pending"] })
    );

    recorder.clear();
    let mut headers = HeaderMap::new();
    headers.insert("api_key", "k-1".parse().unwrap());
    router
        .dispatch(Incoming::new(Method::DELETE, "/pet/5").with_headers(headers))
        .await
        .unwrap();
    assert_eq!(recorder.calls()[0].args, json!({ "petId": 5, "api_key": "k-1" }));

    recorder.clear();
    router
        .dispatch(
            Incoming::new(Method::POST, "/pet/5")
                .with_body("name=max&status=sold"),
        )
        .await
        .unwrap();
    assert_eq!(
        recorder.calls()[0].args,
        json!({ "petId": 5, "name": "max", "status": "sold" })
    );

    recorder.clear();
    router
        .dispatch(
            Incoming::new(Method::POST, "/pet/5/uploadImage")
                .with_query("additionalMetadata=front")
                .with_body(vec![0u8; 16]),
        )
        .await
        .unwrap();
    assert_eq!(
        recorder.calls()[0].args,
        json!({ "petId": 5, "additionalMetadata": "front", "size": 16 })
    );
}

#[tokio::test]
async fn test_controller_error_propagates_unchanged() {
    let (router, recorder) = common::stub_router();

    let err = router
        .dispatch(Incoming::new(Method::GET, "/pet/404"))
        .await
        .unwrap_err();
    match err {
        DispatchError::Controller(e) => {
            assert_eq!(e, ControllerError::NotFound("id 404".into()));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(recorder.capabilities(), vec!["getPetById"]);
}

#[tokio::test]
async fn test_unbindable_input_is_rejected_before_controller() {
    let (router, recorder) = common::stub_router();

    let cases = [
        Incoming::new(Method::GET, "/pet/abc"),
        Incoming::new(Method::POST, "/pet").with_body("not json"),
        Incoming::new(Method::GET, "/pet/findByStatus"),
        Incoming::new(Method::GET, "/user/login").with_query("username=alice"),
    ];
    for incoming in cases {
        let label = format!("{} {}", incoming.method, incoming.path);
        let err = router.dispatch(incoming).await.unwrap_err();
        assert!(matches!(err, DispatchError::InvalidInput(_)), "{label}: {err}");
    }
    assert!(recorder.calls().is_empty());
}
