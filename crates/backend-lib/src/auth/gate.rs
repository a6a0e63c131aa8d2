//! Profile authorization.
use super::session::SessionState;
use portal_common::UserId;

/// Whether `session` may view the resources of `requested`.
///
/// Identity comes from the session alone; the requested id is only ever
/// compared against it.
pub fn authorize_view(session: &SessionState, requested: UserId) -> bool {
    session.authenticated_user == Some(requested)
}
