//! Normalization of identity service responses.
//!
//! The identity service has answered with several envelope shapes over
//! time: the viewer at the top level, under `user`, or under `data`, and the
//! role as `userRole` (a string or `{ "role": ... }`), `user.role`, or a
//! top-level `role`. This module is the only place that knows about those
//! shapes. Everything downstream consumes the canonical [`Session`].

use serde_json::{Map, Value};

use crate::role::RoleClaim;
use crate::session::Session;
use crate::viewer::Viewer;

/// Envelope keys that do not describe the viewer.
const ENVELOPE_KEYS: [&str; 4] = ["success", "message", "userRole", "role"];

const ID_KEYS: [&str; 4] = ["id", "_id", "userId", "user_id"];
const NAME_KEYS: [&str; 5] = ["name", "fullName", "full_name", "username", "displayName"];

/// Converts an identity response body into a session.
///
/// Any body the storefront cannot make sense of yields
/// [`Session::Anonymous`]; this function never fails.
#[must_use]
pub fn normalize_identity(body: &Value) -> Session {
    let Some(envelope) = body.as_object() else {
        return Session::Anonymous;
    };

    if envelope.get("success").and_then(Value::as_bool) == Some(false) {
        return Session::Anonymous;
    }

    let Some(user) = user_object(envelope) else {
        return Session::Anonymous;
    };

    let role = RoleClaim::from_tag(role_tag(envelope, user));
    let viewer = Viewer::new(role)
        .with_id(first_scalar(user, &ID_KEYS))
        .with_display_name(first_scalar(user, &NAME_KEYS))
        .with_email(first_scalar(user, &["email"]));

    Session::Authenticated(viewer)
}

/// Picks the object describing the viewer.
///
/// Returns `None` when the viewer object is empty, which the identity
/// service uses to mean "nobody is signed in".
fn user_object(envelope: &Map<String, Value>) -> Option<&Map<String, Value>> {
    for key in ["user", "data"] {
        match envelope.get(key) {
            Some(Value::Object(user)) => return (!user.is_empty()).then_some(user),
            Some(Value::Null) | None => {}
            // A scalar where the viewer should be is not a viewer.
            Some(_) => return None,
        }
    }

    let describes_viewer = envelope
        .keys()
        .any(|key| !ENVELOPE_KEYS.contains(&key.as_str()));
    describes_viewer.then_some(envelope)
}

/// Finds the role tag, first match wins.
fn role_tag<'a>(envelope: &'a Map<String, Value>, user: &'a Map<String, Value>) -> Option<&'a str> {
    role_value(envelope.get("userRole"))
        .or_else(|| role_value(user.get("role")))
        .or_else(|| role_value(envelope.get("role")))
        .or_else(|| role_value(user.get("userRole")))
}

fn role_value(value: Option<&Value>) -> Option<&str> {
    let tag = match value? {
        Value::String(tag) => tag.as_str(),
        Value::Object(nested) => nested.get("role")?.as_str()?,
        _ => return None,
    };
    (!tag.trim().is_empty()).then_some(tag)
}

fn first_scalar(user: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match user.get(*key)? {
        Value::String(value) if !value.trim().is_empty() => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::Role;
    use serde_json::json;

    #[test]
    fn top_level_user_role_wins() {
        let session = normalize_identity(&json!({
            "user": { "id": 7, "name": "Minh", "role": "buyer" },
            "userRole": "seller",
        }));
        assert_eq!(session.role(), Some(Role::Seller));
    }

    #[test]
    fn nested_user_role_used_when_no_top_level_tag() {
        let session = normalize_identity(&json!({
            "success": true,
            "user": { "id": "u1", "email": "a@b.c", "role": "shipper" },
        }));
        let viewer = session.viewer().expect("authenticated");
        assert_eq!(viewer.role(), Some(Role::Shipper));
        assert_eq!(viewer.id(), Some("u1"));
        assert_eq!(viewer.email(), Some("a@b.c"));
    }

    #[test]
    fn top_level_role_after_user_role() {
        let session = normalize_identity(&json!({
            "user": { "id": 1 },
            "role": "admin",
        }));
        assert_eq!(session.role(), Some(Role::Admin));
    }

    #[test]
    fn user_role_object_shape() {
        let session = normalize_identity(&json!({
            "data": { "_id": "abc", "fullName": "Lan" },
            "userRole": { "role": "seller" },
        }));
        let viewer = session.viewer().expect("authenticated");
        assert_eq!(viewer.role(), Some(Role::Seller));
        assert_eq!(viewer.id(), Some("abc"));
        assert_eq!(viewer.display_name(), Some("Lan"));
    }

    #[test]
    fn bare_user_body() {
        let session = normalize_identity(&json!({
            "userId": 99,
            "username": "quang",
            "role": "buyer",
        }));
        let viewer = session.viewer().expect("authenticated");
        assert_eq!(viewer.id(), Some("99"));
        assert_eq!(viewer.display_name(), Some("quang"));
        assert_eq!(viewer.role(), Some(Role::Buyer));
    }

    #[test]
    fn blank_role_falls_through_to_next_candidate() {
        let session = normalize_identity(&json!({
            "userRole": "  ",
            "user": { "id": 1, "role": "shipper" },
        }));
        assert_eq!(session.role(), Some(Role::Shipper));
    }

    #[test]
    fn missing_role_is_absent_claim() {
        let session = normalize_identity(&json!({ "user": { "id": 1 } }));
        assert!(session.is_authenticated());
        assert_eq!(session.role_claim(), RoleClaim::Absent);
    }

    #[test]
    fn unknown_role_is_kept_verbatim() {
        let session = normalize_identity(&json!({ "user": { "id": 1 }, "userRole": "moderator" }));
        assert_eq!(
            session.role_claim(),
            RoleClaim::Unrecognized("moderator".to_string())
        );
    }

    #[test]
    fn explicit_failure_is_anonymous() {
        let session = normalize_identity(&json!({
            "success": false,
            "user": { "id": 1, "role": "buyer" },
        }));
        assert_eq!(session, Session::Anonymous);
    }

    #[test]
    fn envelope_without_viewer_is_anonymous() {
        assert_eq!(
            normalize_identity(&json!({ "success": true, "message": "ok" })),
            Session::Anonymous
        );
        assert_eq!(normalize_identity(&json!({ "user": {} })), Session::Anonymous);
        assert_eq!(normalize_identity(&json!({ "user": "nobody" })), Session::Anonymous);
    }

    #[test]
    fn non_object_bodies_are_anonymous() {
        assert_eq!(normalize_identity(&json!(null)), Session::Anonymous);
        assert_eq!(normalize_identity(&json!([1, 2])), Session::Anonymous);
        assert_eq!(normalize_identity(&json!("buyer")), Session::Anonymous);
    }
}
