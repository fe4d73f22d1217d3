//! Wire shapes for `GET /v1/user-posts/{id}`.
//!
//! The combined response is a narrowed projection: the profile keeps only
//! `name`, `username` and `email`, and each post keeps `id`, `title` and
//! `body`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Post, UserProfile};

/// Profile summary embedded in [`CombinedUserResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserInfoSummary {
    #[schema(example = "Bob")]
    pub name: String,
    #[schema(example = "bob")]
    pub username: String,
    #[schema(example = "bob@x.com")]
    pub email: String,
}

/// Post summary embedded in [`CombinedUserResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PostSummary {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "T1")]
    pub title: String,
    #[schema(example = "B1")]
    pub body: String,
}

/// Successful response body for `GET /v1/user-posts/{id}`.
///
/// Example JSON:
/// `{"id":1,"userInfo":{"name":"Bob","username":"bob","email":"bob@x.com"},"posts":[]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CombinedUserResponse {
    #[schema(example = 1)]
    pub id: i64,
    pub user_info: UserInfoSummary,
    /// Never null; empty when the user has no posts.
    pub posts: Vec<PostSummary>,
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            body: post.body.clone(),
        }
    }
}

/// Combine a profile and its posts into the response shape.
///
/// Post order is preserved.
pub fn to_combined_response(profile: &UserProfile, posts: &[Post]) -> CombinedUserResponse {
    CombinedUserResponse {
        id: profile.id,
        user_info: UserInfoSummary {
            name: profile.name.clone(),
            username: profile.username.clone(),
            email: profile.email.clone(),
        },
        posts: posts.iter().map(PostSummary::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Address, Company};
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn profile() -> UserProfile {
        UserProfile {
            id: 1,
            name: "Bob".to_owned(),
            username: "bob".to_owned(),
            email: "bob@x.com".to_owned(),
            address: Some(Address {
                city: "Gwenborough".to_owned(),
                ..Address::default()
            }),
            phone: Some("1-770-736-8031".to_owned()),
            website: Some("hildegard.org".to_owned()),
            company: Some(Company {
                name: "Romaguera-Crona".to_owned(),
                ..Company::default()
            }),
        }
    }

    fn post(id: i64, title: &str) -> Post {
        Post {
            user_id: 1,
            id,
            title: title.to_owned(),
            body: format!("{title} body"),
        }
    }

    #[rstest]
    fn projects_profile_and_posts(profile: UserProfile) {
        let response = to_combined_response(&profile, &[post(1, "T1")]);

        let value = serde_json::to_value(&response).expect("serialises");
        assert_eq!(
            value,
            json!({
                "id": 1,
                "userInfo": {"name": "Bob", "username": "bob", "email": "bob@x.com"},
                "posts": [{"id": 1, "title": "T1", "body": "T1 body"}]
            })
        );
    }

    #[rstest]
    fn preserves_post_order(profile: UserProfile) {
        let posts = [post(3, "c"), post(1, "a"), post(2, "b")];
        let response = to_combined_response(&profile, &posts);

        let ids: Vec<i64> = response.posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[rstest]
    fn no_posts_serialise_as_an_empty_array(profile: UserProfile) {
        let response = to_combined_response(&profile, &[]);

        let value = serde_json::to_value(&response).expect("serialises");
        assert_eq!(value.get("posts"), Some(&json!([])));
    }

    #[rstest]
    fn outer_id_comes_from_the_profile() {
        let profile = UserProfile {
            id: 42,
            ..UserProfile::default()
        };
        let response = to_combined_response(&profile, &[Post { user_id: 7, ..post(1, "x") }]);
        assert_eq!(response.id, 42);
    }
}
