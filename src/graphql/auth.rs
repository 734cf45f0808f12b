//! Authentication resolvers: createUser, login, status line

use crate::graphql::{identity, service};
use crate::models::PublicUser;
use crate::requests::{LoginRequest, SignupRequest, UpdateStatusRequest};
use async_graphql::{
    Context, ErrorExtensions, InputObject, Object, Result as GraphQLResult, SimpleObject,
};

#[derive(SimpleObject, Clone, Debug)]
pub struct AuthData {
    pub token: String,
    pub user_id: String,
}

#[derive(SimpleObject, Clone, Debug)]
pub struct UserData {
    pub id: String,
    pub email: String,
    pub name: String,
    pub status: String,
    pub posts: Vec<String>,
}

impl From<PublicUser> for UserData {
    fn from(user: PublicUser) -> Self {
        UserData {
            id: user.id.to_string(),
            email: user.email,
            name: user.name,
            status: user.status,
            posts: user.posts.iter().map(|id| id.to_string()).collect(),
        }
    }
}

#[derive(InputObject, Debug)]
pub struct UserInput {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Default)]
pub struct AuthQuery;

#[Object]
impl AuthQuery {
    /// Verify credentials and return a token. A query rather than a mutation,
    /// kept from the original schema.
    async fn login(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
    ) -> GraphQLResult<AuthData> {
        let payload = service(ctx)?
            .login(LoginRequest { email, password })
            .await
            .map_err(|e| e.extend())?;

        Ok(AuthData {
            token: payload.token,
            user_id: payload.user_id.to_string(),
        })
    }

    async fn get_status(&self, ctx: &Context<'_>) -> GraphQLResult<String> {
        service(ctx)?
            .get_status(&identity(ctx))
            .await
            .map_err(|e| e.extend())
    }
}

#[derive(Default)]
pub struct AuthMutation;

#[Object]
impl AuthMutation {
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        user_input: UserInput,
    ) -> GraphQLResult<UserData> {
        let user = service(ctx)?
            .signup(SignupRequest {
                email: user_input.email,
                password: user_input.password,
                name: user_input.name,
            })
            .await
            .map_err(|e| e.extend())?;

        Ok(user.into())
    }

    async fn update_status(&self, ctx: &Context<'_>, status: String) -> GraphQLResult<String> {
        service(ctx)?
            .update_status(&identity(ctx), UpdateStatusRequest { status })
            .await
            .map_err(|e| e.extend())
    }
}
