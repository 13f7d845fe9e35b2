use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dto::auth::{Claims, LoginRequest, LoginResponse, RegisterRequest, Role},
    error::{AppError, AppResult, Validator},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Account, AccountView},
    response::{ApiResponse, Meta},
    state::AppState,
    storage::{Storage, keys},
};

const TOKEN_TTL_HOURS: i64 = 24;

async fn load_accounts(storage: &Storage) -> AppResult<Vec<Account>> {
    Ok(storage
        .load_json::<Vec<Account>>(keys::ACCOUNTS)
        .await?
        .unwrap_or_default())
}

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

/// Creates the configured admin account when no account has that e-mail yet.
pub async fn ensure_admin_account(state: &AppState) -> AppResult<()> {
    let mut accounts = load_accounts(&state.storage).await?;
    let email = state.config.admin_email.trim().to_lowercase();
    if accounts.iter().any(|a| a.email == email) {
        return Ok(());
    }

    accounts.push(Account {
        id: Uuid::new_v4().to_string(),
        email: email.clone(),
        password_hash: hash_password(&state.config.admin_password)?,
        role: Role::Admin.as_str().to_string(),
        created_at: Utc::now(),
    });
    state.storage.save_json(keys::ACCOUNTS, &accounts).await?;
    tracing::info!(email = %email, "bootstrap admin account created");
    Ok(())
}

/// Signs a token for the account and returns it with its expiry.
pub fn issue_token(
    config: &AppConfig,
    account: &AccountView,
) -> AppResult<(String, DateTime<Utc>)> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(TOKEN_TTL_HOURS))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: account.id.clone(),
        email: account.email.clone(),
        role: account.role.clone(),
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
    Ok((token, expiration))
}

pub async fn register_user(
    state: &AppState,
    user: &AuthUser,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<AccountView>> {
    ensure_admin(user)?;
    let RegisterRequest {
        email,
        password,
        role,
    } = payload;

    let mut v = Validator::new();
    v.email("email", &email);
    if password.len() < 8 {
        v.add("password", "Password must have at least 8 characters");
    }
    v.finish()?;

    let email = email.trim().to_lowercase();
    let mut accounts = load_accounts(&state.storage).await?;
    if accounts.iter().any(|a| a.email == email) {
        return Err(AppError::BadRequest("Email is already taken".to_string()));
    }

    let account = Account {
        id: Uuid::new_v4().to_string(),
        email,
        password_hash: hash_password(&password)?,
        role: role.as_str().to_string(),
        created_at: Utc::now(),
    };
    let view = AccountView::from(&account);
    accounts.push(account);
    state.storage.save_json(keys::ACCOUNTS, &accounts).await?;

    tracing::info!(by = %user.email, account = %view.email, "staff account registered");
    Ok(ApiResponse::success("User created", view, None))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;
    let email = email.trim().to_lowercase();
    let accounts = load_accounts(&state.storage).await?;

    let account = match accounts.iter().find(|a| a.email == email) {
        Some(a) => a,
        None => return Err(AppError::BadRequest("Invalid email or password".into())),
    };

    let parsed_hash = PasswordHash::new(&account.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        tracing::warn!(email = %email, "failed login");
        return Err(AppError::BadRequest("Invalid email or password".into()));
    }

    let view = AccountView::from(account);
    let (token, expires_at) = issue_token(&state.config, &view)?;
    tracing::info!(email = %email, role = %view.role, "user logged in");

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse {
            token: format!("Bearer {token}"),
            expires_at,
            account: view,
        },
        Some(Meta::empty()),
    ))
}

/// Account behind the bearer token, for the header's user menu.
pub async fn current_account(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<AccountView>> {
    let accounts = load_accounts(&state.storage).await?;
    let account = accounts
        .iter()
        .find(|a| a.id == user.user_id)
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".into()))?;
    Ok(ApiResponse::success("Ok", AccountView::from(account), None))
}
