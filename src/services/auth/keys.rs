/*
 * Responsibility
 * - Storage key derivation from a resolved authorization context
 * - This is the namespace isolation boundary: scanner / bot / owner never overlap
 */
use crate::services::auth::context::{AuthorizationContext, Scope};
use crate::services::auth::error::AuthError;

const OWNER_PREFIX: &str = "owner";

/// Separates the segments of a derived key. Never allowed inside a caller's key.
pub const KEY_SEPARATOR: char = '/';

/// Derive the object key for `ctx`. Pure, no I/O.
///
/// - scanner: `{bot}/{scanner}/{key}`
/// - bot:     `{bot}/{key}`
/// - owner:   `owner/{owner}/{key}` (owner is already lower-cased by the authorizer)
pub fn derive_key(ctx: &AuthorizationContext) -> Result<String, AuthError> {
    match &ctx.scope {
        Scope::Scanner => Ok(format!("{}/{}/{}", ctx.bot_id, ctx.scanner, ctx.path_key)),
        Scope::Bot => Ok(format!("{}/{}", ctx.bot_id, ctx.path_key)),
        Scope::Owner => {
            let owner = ctx
                .owner
                .as_deref()
                .filter(|o| !o.is_empty())
                .ok_or(AuthError::UnresolvedOwner)?;
            Ok(format!("{OWNER_PREFIX}/{owner}/{}", ctx.path_key))
        }
        Scope::Other(s) => Err(AuthError::InvalidScope(s.clone())),
    }
}
