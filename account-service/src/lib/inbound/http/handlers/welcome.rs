use crate::inbound::http::middleware::AuthenticatedUser;

/// Greeting for any authenticated caller.
pub async fn restricted(user: AuthenticatedUser) -> String {
    welcome(&user)
}

/// Greeting behind the ADMIN role check.
pub async fn admin_users(user: AuthenticatedUser) -> String {
    welcome(&user)
}

fn welcome(user: &AuthenticatedUser) -> String {
    format!("Welcome {} with role: {}!", user.user_id, user.role)
}
