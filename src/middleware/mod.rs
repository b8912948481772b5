/*
 * Responsibility
 * - middleware の公開インターフェース (re-export)
 * - access (scanner 認可), cors, http (request-id / trace / limit / timeout)
 */
pub mod auth;
pub mod cors;
pub mod http;
