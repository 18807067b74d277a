//! Application wiring and route handlers.
//!
//! `build_app` assembles the full router: public routes, the protected
//! admin surface behind the authentication layer, and the realtime gateway
//! sharing the same token codec and connection registry.

pub mod dto;
pub mod errors;

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};

use congrego_auth::{Claims, Principal, TokenCodec};
use congrego_core::{MemberId, TenantId};
use congrego_realtime::{ConnectionRegistry, GatewayState, ServerMessage};
use congrego_store::{
    Argon2Hasher, CredentialStore, MemberDirectory, MemoryStore, NewMember, NewUser,
    PasswordHasher,
};

use crate::guard;
use crate::middleware::{auth_middleware, AuthState};

use self::dto::{
    CreateFamilyRequest, CreateMemberRequest, CreateUserRequest, LoginRequest,
};
use self::errors::{json_error, store_error, unauthorized};

#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<dyn CredentialStore>,
    pub directory: Arc<dyn MemberDirectory>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub codec: Arc<TokenCodec>,
    pub registry: ConnectionRegistry,
}

pub fn build_app(jwt_secret: &[u8], store: Arc<MemoryStore>) -> Router {
    let codec = Arc::new(TokenCodec::new(jwt_secret));
    let registry = ConnectionRegistry::new();

    let state = AppState {
        credentials: store.clone() as Arc<dyn CredentialStore>,
        directory: store as Arc<dyn MemberDirectory>,
        hasher: Arc::new(Argon2Hasher),
        codec: codec.clone(),
        registry: registry.clone(),
    };

    let auth_state = AuthState {
        codec: codec.clone(),
        store: state.credentials.clone(),
    };

    // Protected surface: the authentication stage runs as a layer before
    // every handler here; the role and tenant stages run inside each handler
    // against its static guard declaration.
    let protected = Router::new()
        .route("/auth/verify", get(verify))
        .route("/whoami", get(whoami))
        .route("/users", post(create_user))
        .route("/members", post(create_member))
        .route("/members/:tenant_id", get(list_members))
        .route("/members/:tenant_id/:member_id", delete(remove_member))
        .route("/families", post(create_family))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health))
        .route("/tenants", get(list_tenants))
        .route("/auth/login", post(login))
        .merge(protected)
        .with_state(state)
        .merge(congrego_realtime::router(GatewayState { registry, codec }))
}

async fn health() -> StatusCode {
    StatusCode::OK
}

/// Public tenant directory, used by clients to pick a congregation before
/// logging in. Display fields only.
async fn list_tenants(State(state): State<AppState>) -> Response {
    Json(state.credentials.list_tenants().await).into_response()
}

async fn login(State(state): State<AppState>, Json(body): Json<LoginRequest>) -> Response {
    // Unknown email and wrong password take the same exit.
    let user = match state.credentials.find_user_by_email(&body.email).await {
        Ok(user) => user,
        Err(_) => return unauthorized(),
    };

    match state.hasher.verify(&body.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => return unauthorized(),
        Err(e) => {
            tracing::error!(user_id = %user.id, error = %e, "stored password hash unusable");
            return unauthorized();
        }
    }

    // An existing user whose tenant row is gone is a store inconsistency,
    // not a caller mistake.
    let tenant = match state.credentials.find_tenant(user.tenant_id).await {
        Ok(tenant) => tenant,
        Err(e) => {
            tracing::error!(user_id = %user.id, error = %e, "user references missing tenant");
            return json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
                "inconsistent credential store",
            );
        }
    };

    let claims = Claims::issue(user.id, user.name.clone(), user.role, &tenant);
    let token = match state.codec.sign(&claims) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(error = %e, "token signing failed");
            return json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "token_error",
                "could not issue token",
            );
        }
    };

    tracing::info!(user_id = %user.id, tenant_id = %user.tenant_id, "login succeeded");

    Json(serde_json::json!({ "access_token": token })).into_response()
}

/// Reachable only behind the authentication layer, so arriving here at all
/// means the token verified and its subject still exists.
async fn verify(Extension(principal): Extension<Principal>) -> Response {
    if let Err(resp) = guard::require_role(&principal, guard::ANY_AUTHENTICATED) {
        return resp;
    }

    "verified".into_response()
}

async fn whoami(Extension(principal): Extension<Principal>) -> Response {
    if let Err(resp) = guard::require_role(&principal, guard::ANY_AUTHENTICATED) {
        return resp;
    }

    Json(serde_json::json!({
        "userId": principal.user_id(),
        "name": principal.name(),
        "role": principal.role(),
        "tenantId": principal.tenant_id(),
        "tenantName": principal.tenant_name(),
    }))
    .into_response()
}

async fn create_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<CreateUserRequest>,
) -> Response {
    if let Err(resp) = guard::require_role(&principal, guard::DIRECTORY_WRITE) {
        return resp;
    }
    let body = match guard::scope_body(&principal, body) {
        Ok(body) => body,
        Err(resp) => return resp,
    };
    let Some(tenant_id) = body.tenant_id else {
        return errors::forbidden();
    };

    let password_hash = match state.hasher.hash(&body.password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!(error = %e, "password hashing failed");
            return json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "hash_error",
                "could not hash password",
            );
        }
    };

    let created = state
        .credentials
        .create_user(NewUser {
            name: body.name,
            email: body.email,
            password_hash,
            role: body.role,
            tenant_id,
        })
        .await;

    match created {
        Ok(user) => (StatusCode::CREATED, Json(dto::user_json(&user))).into_response(),
        Err(e) => store_error(e),
    }
}

async fn create_member(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<CreateMemberRequest>,
) -> Response {
    if let Err(resp) = guard::require_role(&principal, guard::DIRECTORY_WRITE) {
        return resp;
    }
    let body = match guard::scope_body(&principal, body) {
        Ok(body) => body,
        Err(resp) => return resp,
    };
    let Some(tenant_id) = body.tenant_id else {
        return errors::forbidden();
    };

    let member = match state
        .directory
        .create_member(NewMember {
            tenant_id,
            first_name: body.first_name,
            last_name: body.last_name,
        })
        .await
    {
        Ok(member) => member,
        Err(e) => return store_error(e),
    };

    broadcast_members(&state, tenant_id).await;

    (StatusCode::CREATED, Json(member)).into_response()
}

async fn list_members(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(tenant_id): Path<TenantId>,
) -> Response {
    if let Err(resp) = guard::require_role(&principal, guard::ANY_AUTHENTICATED) {
        return resp;
    }
    if let Err(resp) = guard::require_tenant(&principal, tenant_id) {
        return resp;
    }

    Json(state.directory.list_members(tenant_id).await).into_response()
}

async fn remove_member(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((tenant_id, member_id)): Path<(TenantId, MemberId)>,
) -> Response {
    if let Err(resp) = guard::require_role(&principal, guard::DIRECTORY_WRITE) {
        return resp;
    }
    if let Err(resp) = guard::require_tenant(&principal, tenant_id) {
        return resp;
    }

    match state.directory.remove_member(tenant_id, member_id).await {
        Ok(()) => {}
        Err(e) => return store_error(e),
    }

    broadcast_members(&state, tenant_id).await;

    StatusCode::NO_CONTENT.into_response()
}

async fn create_family(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<CreateFamilyRequest>,
) -> Response {
    if let Err(resp) = guard::require_role(&principal, guard::DIRECTORY_WRITE) {
        return resp;
    }
    // Batch scoping: one foreign element rejects the whole family.
    let body = match guard::scope_body(&principal, body) {
        Ok(body) => body,
        Err(resp) => return resp,
    };
    let Some(tenant_id) = body.tenant_id else {
        return errors::forbidden();
    };

    let mut created = Vec::with_capacity(body.members.len());
    for input in body.members {
        let member = match state
            .directory
            .create_member(NewMember {
                tenant_id,
                first_name: input.first_name,
                last_name: input.last_name,
            })
            .await
        {
            Ok(member) => member,
            Err(e) => return store_error(e),
        };
        created.push(member);
    }

    broadcast_members(&state, tenant_id).await;

    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "surname": body.surname,
            "members": created,
        })),
    )
        .into_response()
}

/// Push the tenant's refreshed member list to its realtime group.
/// Best-effort by design: a directory change never fails because a
/// websocket peer went away.
async fn broadcast_members(state: &AppState, tenant_id: TenantId) {
    let members = state.directory.list_members(tenant_id).await;
    let delivered = state
        .registry
        .broadcast(tenant_id, ServerMessage::MembersUpdate { members })
        .await;
    tracing::debug!(tenant_id = %tenant_id, delivered, "member list broadcast");
}
