use std::sync::Arc;

use congrego_core::Tenant;
use congrego_store::{Argon2Hasher, CredentialStore, MemoryStore, NewUser, PasswordHasher};

#[tokio::main]
async fn main() {
    congrego_observability::init();

    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
        "dev-secret".to_string()
    });

    let store = Arc::new(MemoryStore::new());
    if std::env::var("SEED_DEMO").is_ok_and(|v| v == "true") {
        seed_demo(&store).await;
    }

    let app = congrego_api::app::build_app(jwt_secret.as_bytes(), store);

    let bind_addr =
        std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {bind_addr}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}

/// Dev-only fixture: two tenants and a root login so the API is usable
/// straight after boot.
async fn seed_demo(store: &MemoryStore) {
    let central = store.add_tenant(Tenant::new("Iglesia Central", "logos/central.png"));
    store.add_tenant(Tenant::new("Iglesia del Valle", "logos/valle.png"));

    let hasher = Argon2Hasher;
    let password_hash = match hasher.hash("root-password") {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!(error = %e, "demo seed skipped: hashing failed");
            return;
        }
    };

    match store
        .create_user(NewUser {
            name: "Root".into(),
            email: "root@example.com".into(),
            password_hash,
            role: congrego_auth::Role::Root,
            tenant_id: central.id,
        })
        .await
    {
        Ok(user) => {
            tracing::info!(user_id = %user.id, tenant_id = %central.id, "demo data seeded");
        }
        Err(e) => tracing::error!(error = %e, "demo seed skipped: user creation failed"),
    }
}
