//! End-to-end tests over the wire: boot the real server, drive it with an
//! HTTP client, and check the fixed wire behaviors.

use reqwest::StatusCode;

mod common;

#[tokio::test]
async fn flat_actions_dispatch_and_unknown_routes_404() {
    let (addr, shutdown) = common::spawn_server(common::test_app()).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("http://{addr}/welcome"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "hi");

    let res = client
        .get(format!("http://{addr}/missing"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        res.headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("text/plain")
    );
    assert_eq!(res.text().await.unwrap(), "Not Found");

    // Registered name, wrong method.
    let res = client
        .post(format!("http://{addr}/welcome"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    shutdown.trigger();
}

#[tokio::test]
async fn resource_routes_cover_the_member_lifecycle() {
    let (addr, shutdown) = common::spawn_server(common::test_app()).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("http://{addr}/people"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.text().await.unwrap();
    assert!(body.contains("Person 7: Ada"));
    assert!(body.contains("Person 11: Grace"));

    let res = client
        .get(format!("http://{addr}/people/7"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "Person 7: Ada");

    let res = client
        .get(format!("http://{addr}/people/7/edit"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "Editing Person 7: Ada");

    let res = client
        .get(format!("http://{addr}/people/7/history"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "History of Person 7: Ada");

    let res = client
        .get(format!("http://{addr}/people/7/pets/3"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "Pet 3: Rex");

    // Unrecognized member tail is a structural no-match.
    let res = client
        .get(format!("http://{addr}/people/7/anything/else"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Destroy, then the record is gone upstream.
    let res = client
        .delete(format!("http://{addr}/people/11"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "Destroyed 11");

    let res = client
        .get(format!("http://{addr}/people/11"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    shutdown.trigger();
}

#[tokio::test]
async fn missing_required_parameters_are_rejected_with_422() {
    let (addr, shutdown) = common::spawn_server(common::test_app()).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("http://{addr}/create"))
        .form(&[("title", "Hi")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(res.text().await.unwrap().contains("description"));

    let res = client
        .post(format!("http://{addr}/create"))
        .form(&[("title", "Hi"), ("description", "There")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "Creating Hi There");

    shutdown.trigger();
}

#[tokio::test]
async fn list_parameters_bind_from_the_query_string() {
    let (addr, shutdown) = common::spawn_server(common::test_app()).await;
    let client = reqwest::Client::new();

    let res = client
        .patch(format!("http://{addr}/bulk"))
        .query(&[("ids[]", "1"), ("ids[]", "3"), ("ids[]", "7")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "Bulk update of 1, 3, 7");

    shutdown.trigger();
}

#[tokio::test]
async fn accept_header_drives_format_selection() {
    let (addr, shutdown) = common::spawn_server(common::test_app()).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("http://{addr}/greet?name=World"))
        .header("Accept", "application/json")
        .send()
        .await
        .unwrap();
    assert_eq!(
        res.headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("application/json")
    );
    assert_eq!(res.text().await.unwrap(), "{\"greeting\":\"Hello World\"}");

    // No Accept header: the first registered format answers.
    let res = client
        .get(format!("http://{addr}/greet?name=World"))
        .header("Accept", "")
        .send()
        .await
        .unwrap();
    assert_eq!(
        res.headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("text/plain")
    );
    assert_eq!(res.text().await.unwrap(), "Hello World");

    shutdown.trigger();
}

#[tokio::test]
async fn repeated_requests_get_identical_status_and_content_type() {
    let (addr, shutdown) = common::spawn_server(common::test_app()).await;
    let client = reqwest::Client::new();

    let first = client
        .get(format!("http://{addr}/welcome"))
        .send()
        .await
        .unwrap();
    let first_status = first.status();
    let first_type = first.headers().get("content-type").cloned();

    let second = client
        .get(format!("http://{addr}/welcome"))
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), first_status);
    assert_eq!(second.headers().get("content-type").cloned(), first_type);

    shutdown.trigger();
}

#[tokio::test]
async fn methods_outside_the_closed_set_get_405() {
    let (addr, shutdown) = common::spawn_server(common::test_app()).await;
    let client = reqwest::Client::new();

    let res = client
        .request(
            reqwest::Method::OPTIONS,
            format!("http://{addr}/welcome"),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);

    shutdown.trigger();
}
