/*
 * Responsibility
 * - Handler から見える「認可済みリクエスト」の型
 * - access middleware が組み立てて request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - token 検証、registry 照会、key 導出はすべてこの型ができる前に終わっている
 */

use crate::services::auth::AuthorizationContext;

/// Context attached to an authorized object request.
///
/// - `context` carries bot, scanner, owner and scope as authorized
/// - `object_key` is the storage key derived from them; handlers never build keys
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub context: AuthorizationContext,
    pub object_key: String,
}

impl AuthCtx {
    pub fn new(context: AuthorizationContext, object_key: String) -> Self {
        Self {
            context,
            object_key,
        }
    }
}
