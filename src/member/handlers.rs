use axum::{extract::State, Json};
use tracing::{info, instrument};

use super::types::{MemberListQuery, MemberResponse};
use crate::extract::{require, ValidQuery};
use crate::shared::{AppError, AppState};

/// HTTP handler for listing a gym's members
///
/// GET /api/users?gym_id=<uuid>
#[instrument(name = "list_members", skip(state))]
pub async fn list_members(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<MemberListQuery>,
) -> Result<Json<Vec<MemberResponse>>, AppError> {
    let gym_id = require(params.gym_id, "gym_id")?;

    let members = state.member_repository.list_by_gym(gym_id).await?;
    info!(gym_id = %gym_id, member_count = members.len(), "Members listed successfully");

    Ok(Json(members.into_iter().map(MemberResponse::from).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::models::MemberModel;
    use crate::member::repository::InMemoryMemberRepository;
    use crate::shared::test_utils::{authenticated_state, body_json};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
        Router,
    };
    use std::sync::Arc;
    use tower::ServiceExt; // for `oneshot`
    use uuid::Uuid;

    fn app(members: Vec<MemberModel>) -> Router {
        let state = authenticated_state(Uuid::new_v4())
            .with_member_repository(Arc::new(InMemoryMemberRepository::with_members(members)))
            .build();

        Router::new()
            .route("/api/users", get(list_members))
            .with_state(state)
    }

    async fn send(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        (status, body_json(response).await)
    }

    #[tokio::test]
    async fn test_list_members_for_gym() {
        let gym_id = Uuid::new_v4();
        let member = MemberModel::new(gym_id, "Ann", "ann@a.test", "coach");
        let other = MemberModel::new(Uuid::new_v4(), "Bob", "bob@b.test", "member");

        let (status, body) = send(
            app(vec![member.clone(), other]),
            &format!("/api/users?gym_id={}", gym_id),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let members: Vec<MemberResponse> = serde_json::from_value(body).unwrap();
        assert_eq!(members, vec![MemberResponse::from(member)]);
    }

    #[tokio::test]
    async fn test_list_members_requires_gym_id() {
        let (status, body) = send(app(vec![]), "/api/users").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "gym_id is required");
    }

    #[tokio::test]
    async fn test_list_members_rejects_malformed_gym_id() {
        let (status, _) = send(app(vec![]), "/api/users?gym_id=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
