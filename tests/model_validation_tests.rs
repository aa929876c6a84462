use axum::{http::StatusCode, response::IntoResponse};
use board_api::{
    ApiError,
    error::{Action, ResourceKind},
    models::{
        Comment, CommentPayload, Post, PostPayload, PostSummary, SignupRequest, UserProfile,
    },
    validation::{
        FieldProblem, PostInput, ValidationError, text_field, validate_comment, validate_post,
        validate_signup,
    },
};
use chrono::Utc;
use serde_json::{Value, json};
use uuid::Uuid;

fn sample_post() -> Post {
    let now = Utc::now();
    Post {
        id: Uuid::new_v4(),
        author_id: Uuid::new_v4(),
        author_nickname: "alice".to_string(),
        title: "T".to_string(),
        content: "C".to_string(),
        created_at: now,
        updated_at: now,
    }
}

fn signup(nickname: &str, password: &str, confirm: &str) -> SignupRequest {
    SignupRequest {
        nickname: nickname.to_string(),
        password: password.to_string(),
        confirm: confirm.to_string(),
    }
}

// --- Serialization ---

#[test]
fn test_post_json_field_names() {
    let post = sample_post();
    let json = serde_json::to_value(&post).unwrap();

    assert_eq!(json["postId"], post.id.to_string());
    assert_eq!(json["userId"], post.author_id.to_string());
    assert_eq!(json["nickname"], "alice");
    assert_eq!(json["title"], "T");
    assert_eq!(json["content"], "C");
    assert!(json["createdAt"].is_string());
    assert!(json["updatedAt"].is_string());
    assert!(json.get("author_id").is_none());
}

#[test]
fn test_post_summary_has_no_content() {
    let post = sample_post();
    let summary = PostSummary::from(post.clone());

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["postId"], post.id.to_string());
    assert!(json.get("content").is_none());
}

#[test]
fn test_comment_json_field_names() {
    let comment = Comment {
        id: Uuid::new_v4(),
        post_id: Uuid::new_v4(),
        author_id: Uuid::new_v4(),
        author_nickname: "bob".to_string(),
        content: "hello".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let json = serde_json::to_value(&comment).unwrap();
    assert_eq!(json["commentId"], comment.id.to_string());
    assert_eq!(json["postId"], comment.post_id.to_string());
    assert_eq!(json["userId"], comment.author_id.to_string());
    assert_eq!(json["nickname"], "bob");
    assert_eq!(json["comment"], "hello");
    assert!(json.get("content").is_none());
}

#[test]
fn test_user_profile_json_field_names() {
    let profile = UserProfile {
        user_id: Uuid::new_v4(),
        nickname: "alice".to_string(),
    };
    let json = serde_json::to_value(&profile).unwrap();
    assert_eq!(json["userId"], profile.user_id.to_string());
}

#[test]
fn test_signup_accepts_confirm_password_alias() {
    let request: SignupRequest = serde_json::from_value(json!({
        "nickname": "alice",
        "password": "pa55word",
        "confirmPassword": "pa55word"
    }))
    .unwrap();
    assert_eq!(request.confirm, "pa55word");
}

#[test]
fn test_payload_keeps_raw_field_types() {
    let payload: PostPayload = serde_json::from_value(json!({ "title": 7 })).unwrap();
    assert_eq!(payload.title, Some(json!(7)));
    assert_eq!(payload.content, None);
}

// --- Field Validation ---

#[test]
fn test_text_field_classification() {
    assert_eq!(text_field(Some(json!("hi"))), Ok("hi".to_string()));
    assert_eq!(text_field(None), Err(FieldProblem::Missing));
    assert_eq!(text_field(Some(Value::Null)), Err(FieldProblem::Missing));
    assert_eq!(text_field(Some(json!(" \t "))), Err(FieldProblem::Missing));
    assert_eq!(text_field(Some(json!(1))), Err(FieldProblem::WrongType));
    assert_eq!(text_field(Some(json!(["a"]))), Err(FieldProblem::WrongType));
}

#[test]
fn test_validate_post() {
    let ok = validate_post(PostPayload {
        title: Some(json!("T")),
        content: Some(json!("C")),
    });
    assert_eq!(
        ok,
        Ok(PostInput {
            title: "T".to_string(),
            content: "C".to_string()
        })
    );

    assert_eq!(
        validate_post(PostPayload::default()),
        Err(ValidationError::MalformedBody)
    );

    // Title problems are reported before content problems.
    let both_bad = PostPayload {
        title: Some(json!(1)),
        content: Some(json!(2)),
    };
    assert_eq!(
        validate_post(both_bad),
        Err(ValidationError::Title(FieldProblem::WrongType))
    );

    let no_content = PostPayload {
        title: Some(json!("T")),
        content: None,
    };
    let err = validate_post(no_content).unwrap_err();
    assert_eq!(err.to_string(), "post content is required");
}

#[test]
fn test_validate_comment() {
    let ok = validate_comment(CommentPayload {
        comment: Some(json!("hello")),
    });
    assert_eq!(ok, Ok("hello".to_string()));

    let err = validate_comment(CommentPayload {
        comment: Some(json!(false)),
    })
    .unwrap_err();
    assert_eq!(err.to_string(), "comment must be a string");
}

#[test]
fn test_validate_signup_order() {
    assert_eq!(validate_signup(&signup("alice", "pa55word", "pa55word")), Ok(()));
    assert_eq!(
        validate_signup(&signup("al!ce", "pa55word", "pa55word")),
        Err(ValidationError::Nickname)
    );
    // Short password wins over the mismatch.
    assert_eq!(
        validate_signup(&signup("alice", "abc", "xyz")),
        Err(ValidationError::PasswordTooShort)
    );
    assert_eq!(
        validate_signup(&signup("alice", "alice123", "alice123")),
        Err(ValidationError::PasswordContainsNickname)
    );
    assert_eq!(
        validate_signup(&signup("alice", "pa55word", "pa55wort")),
        Err(ValidationError::PasswordMismatch)
    );
}

// --- Error Envelope ---

#[tokio::test]
async fn test_api_error_renders_envelope() {
    let response = ApiError::NotFound(ResourceKind::Comment).into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "errorMessage": "comment does not exist" }));
}

#[test]
fn test_api_error_status_codes() {
    let cases = [
        (ApiError::LoginRequired, StatusCode::BAD_REQUEST),
        (ApiError::Unauthenticated, StatusCode::UNAUTHORIZED),
        (ApiError::InvalidId, StatusCode::BAD_REQUEST),
        (
            ApiError::MalformedInput(ValidationError::MalformedBody),
            StatusCode::PRECONDITION_FAILED,
        ),
        (ApiError::InvalidCredentials, StatusCode::PRECONDITION_FAILED),
        (ApiError::NotFound(ResourceKind::Post), StatusCode::NOT_FOUND),
        (
            ApiError::Forbidden {
                action: Action::Delete,
                resource: ResourceKind::Post,
            },
            StatusCode::FORBIDDEN,
        ),
    ];

    for (err, status) in cases {
        assert_eq!(err.status_code(), status, "{err}");
    }
}
