use axum::{
    Json, Router,
    extract::{Path, Query},
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use cyclesync_client::client::{ApiClient, ApiError};
use cyclesync_common::{
    envelope::Envelope,
    model::{
        Id,
        post::{Post, PostContent},
        user::{Credentials, UpdateUser, User},
    },
};
use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};
use time::macros::datetime;
use tokio::net::TcpListener;

const SESSION_COOKIE: &str = "session=abc123";

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{address}")
}

fn alice() -> User {
    User {
        id: Id::new(1),
        username: "alice".to_owned(),
        email: "alice@example.com".to_owned(),
        created_at: datetime!(2026-01-15 09:30 UTC),
    }
}

async fn login(Json(credentials): Json<Credentials>) -> Response {
    if credentials.username == "alice" && credentials.password == "hunter2" {
        (
            [(header::SET_COOKIE, SESSION_COOKIE)],
            Json(Envelope::success(alice())),
        )
            .into_response()
    } else {
        Json(Envelope::<User>::failure("Invalid username or password")).into_response()
    }
}

async fn current_user(headers: HeaderMap, Path(id): Path<u64>) -> Json<Envelope<User>> {
    let has_session = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains(SESSION_COOKIE));

    if has_session && id == 0 {
        Json(Envelope::success(alice()))
    } else if has_session {
        Json(Envelope::failure("User not found"))
    } else {
        Json(Envelope::failure("Not logged in"))
    }
}

#[tokio::test]
async fn login_replays_the_session_cookie() {
    let app = Router::new()
        .route("/api/login", post(login))
        .route("/api/user/{id}", get(current_user));
    let base_url = serve(app).await;

    let api = ApiClient::new(&base_url).unwrap();
    let credentials = Credentials {
        username: "alice".to_owned(),
        password: "hunter2".to_owned(),
    };

    let user = api.login(&credentials).await.unwrap();
    assert_eq!(user.username, "alice");

    // The cookie from login authenticates the identity fetch.
    let identity = api.fetch_user(Id::CURRENT).await.unwrap();
    assert_eq!(identity.id, Id::new(1));

    // A client that never logged in holds no cookie and is rejected.
    let anonymous = ApiClient::new(&base_url).unwrap();
    let error = anonymous.fetch_user(Id::CURRENT).await.unwrap_err();
    match error {
        ApiError::Rejected(rejection) => {
            assert_eq!(rejection.message.as_deref(), Some("Not logged in"));
        }
        other => panic!("expected a rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn rejected_login_surfaces_the_server_message() {
    let app = Router::new().route("/api/login", post(login));
    let base_url = serve(app).await;

    let api = ApiClient::new(&base_url).unwrap();
    let credentials = Credentials {
        username: "alice".to_owned(),
        password: "wrong".to_owned(),
    };

    match api.login(&credentials).await.unwrap_err() {
        ApiError::Rejected(rejection) => {
            assert_eq!(
                rejection.message.as_deref(),
                Some("Invalid username or password")
            );
        }
        other => panic!("expected a rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn list_posts_is_keyed_by_owner_and_tolerates_missing_data() {
    let app = Router::new().route(
        "/api/posts",
        get(
            |Query(params): Query<HashMap<String, String>>| async move {
                match params.get("user_id").map(String::as_str) {
                    // An empty list is serialized explicitly for user 5 and
                    // omitted entirely (Go omitempty on a nil slice) for 7.
                    Some("5") => Json(Envelope::success(Vec::<Post>::new())),
                    Some("7") => Json(Envelope::<Vec<Post>>::success_empty()),
                    _ => Json(Envelope::failure("Invalid user ID")),
                }
            },
        ),
    );
    let base_url = serve(app).await;
    let api = ApiClient::new(&base_url).unwrap();

    assert_eq!(api.list_posts(Id::new(5)).await.unwrap(), vec![]);
    assert_eq!(api.list_posts(Id::new(7)).await.unwrap(), vec![]);
    assert!(matches!(
        api.list_posts(Id::new(9)).await.unwrap_err(),
        ApiError::Rejected(_)
    ));
}

#[tokio::test]
async fn create_post_returns_the_stored_post() {
    let app = Router::new().route(
        "/api/posts",
        post(|Json(draft): Json<PostContent>| async move {
            Json(Envelope::success(Post {
                id: Id::new(10),
                user_id: Id::new(1),
                title: draft.title,
                content: draft.content,
                created_at: datetime!(2026-08-07 08:00 UTC),
            }))
        }),
    );
    let base_url = serve(app).await;
    let api = ApiClient::new(&base_url).unwrap();

    let draft = PostContent {
        title: "Hello".to_owned(),
        content: "First post".to_owned(),
    };
    let created = api.create_post(&draft).await.unwrap();

    assert_eq!(created.id, Id::new(10));
    assert_eq!(created.user_id, Id::new(1));
    assert_eq!(created.title, "Hello");
}

#[tokio::test]
async fn update_user_sends_the_new_fields() {
    let app = Router::new().route(
        "/api/user/{id}",
        put(
            |Path(id): Path<u64>, Json(update): Json<UpdateUser>| async move {
                Json(Envelope::success(User {
                    id: Id::new(id),
                    username: update.username,
                    email: update.email.into_inner(),
                    created_at: datetime!(2026-01-15 09:30 UTC),
                }))
            },
        ),
    );
    let base_url = serve(app).await;
    let api = ApiClient::new(&base_url).unwrap();

    let update = UpdateUser {
        username: "alice2".to_owned(),
        email: cyclesync_common::model::user::Email::new("alice2@example.com".to_owned()).unwrap(),
    };
    let updated = api.update_user(Id::new(3), &update).await.unwrap();

    assert_eq!(updated.id, Id::new(3));
    assert_eq!(updated.username, "alice2");
    assert_eq!(updated.email, "alice2@example.com");
}

#[tokio::test]
async fn delete_post_hits_the_endpoint_once() {
    let hits = Arc::new(AtomicUsize::new(0));
    let recorded = Arc::clone(&hits);

    let app = Router::new().route(
        "/api/post/{id}",
        delete(move |Path(id): Path<u64>| {
            let hits = Arc::clone(&recorded);
            async move {
                assert_eq!(id, 4);
                hits.fetch_add(1, Ordering::SeqCst);
                Json(Envelope::<Post>::success_empty())
            }
        }),
    );
    let base_url = serve(app).await;
    let api = ApiClient::new(&base_url).unwrap();

    api.delete_post(Id::new(4)).await.unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Bind and drop to get a port nothing is listening on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let api = ApiClient::new(&format!("http://{address}")).unwrap();
    assert!(matches!(
        api.fetch_user(Id::CURRENT).await.unwrap_err(),
        ApiError::Http(_)
    ));
}
