use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct PostDoc {
    pub uid: Option<Uuid>,
    pub text: String,
    pub username: String,
    pub avatar: String,
    pub favorite: bool,
}

#[derive(ToSchema)]
pub struct PostsDoc { pub posts: Vec<PostDoc> }

#[derive(ToSchema)]
pub struct AddRequestDoc { pub text: String, pub username: String, pub avatar: String }

#[derive(ToSchema)]
pub struct SetFavoriteRequestDoc { pub uid: Uuid, pub favorite: bool }

#[derive(OpenApi)]
#[openapi(
    info(title = "posts", version = "v1", description = "posts api"),
    paths(
        crate::routes::posts::list,
        crate::routes::posts::add,
        crate::routes::posts::set_favorite,
    ),
    components(
        schemas(
            HealthResponse,
            PostDoc,
            PostsDoc,
            AddRequestDoc,
            SetFavoriteRequestDoc,
        )
    ),
    tags(
        (name = "posts")
    )
)]
pub struct ApiDoc;
