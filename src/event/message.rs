// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Push-event message model.
//!
//! Frames arriving on the provider channel are parsed defensively: the
//! stream is not controlled by this crate, so parsing never fails. A
//! frame either carries a recognizable event (a JSON object with both an
//! `action` and a `params` field), some other JSON object, or a bare
//! liveness payload such as `"pong"`. All three are forwarded to every
//! handler; deciding relevance is a handler concern, not a parser one.

use serde_json::Value;

use crate::types::DeviceId;

/// Action value signaling a device connectivity transition.
pub const ACTION_SYSMSG: &str = "sysmsg";

/// Action value signaling a device parameter update.
pub const ACTION_UPDATE: &str = "update";

/// One inbound frame from the provider push channel.
#[derive(Debug, Clone, PartialEq)]
pub enum PushMessage {
    /// A structured event carrying `action` and `params`.
    Event(EventFrame),
    /// A JSON object lacking `action` or `params`.
    Object(Value),
    /// A non-object payload, e.g. a heartbeat acknowledgement.
    Liveness(String),
}

impl PushMessage {
    /// Parses a raw text frame. Never fails.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let Ok(value) = serde_json::from_str::<Value>(text) else {
            return Self::Liveness(text.to_string());
        };

        let Value::Object(ref map) = value else {
            return Self::Liveness(text.to_string());
        };

        if !map.contains_key("action") || !map.contains_key("params") {
            return Self::Object(value);
        }

        let action = map
            .get("action")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let device_id = map
            .get("deviceid")
            .and_then(Value::as_str)
            .map(DeviceId::from);
        let params = map.get("params").cloned().unwrap_or(Value::Null);

        Self::Event(EventFrame {
            action,
            device_id,
            params,
        })
    }

    /// Returns the device id carried by this frame, if any.
    ///
    /// Used by the dispatcher to resolve a name purely for logging.
    #[must_use]
    pub fn device_id(&self) -> Option<&DeviceId> {
        match self {
            Self::Event(frame) => frame.device_id.as_ref(),
            Self::Object(_) | Self::Liveness(_) => None,
        }
    }
}

/// A structured provider event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventFrame {
    /// Free-form action discriminator, e.g. `"sysmsg"` or `"update"`.
    pub action: String,
    /// Device the event refers to, when the frame carried one.
    pub device_id: Option<DeviceId>,
    /// Raw event parameters.
    pub params: Value,
}

impl EventFrame {
    /// Returns true if `params.online` is truthy.
    #[must_use]
    pub fn online(&self) -> bool {
        self.params.get("online").is_some_and(value_is_truthy)
    }

    /// Returns `params.switch` as a string, if present.
    #[must_use]
    pub fn switch(&self) -> Option<&str> {
        self.params.get("switch").and_then(Value::as_str)
    }
}

/// Loose truthiness for provider payload fields.
///
/// The provider sends `online` as a bool on some firmware and as 0/1 on
/// others.
fn value_is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Null => false,
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_update_event() {
        let msg = PushMessage::parse(
            &json!({"action": "update", "deviceid": "SRC", "params": {"switch": "on"}})
                .to_string(),
        );

        let PushMessage::Event(frame) = msg else {
            panic!("expected Event");
        };
        assert_eq!(frame.action, ACTION_UPDATE);
        assert_eq!(frame.device_id, Some(DeviceId::from("SRC")));
        assert_eq!(frame.switch(), Some("on"));
    }

    #[test]
    fn parse_sysmsg_event() {
        let msg = PushMessage::parse(
            &json!({"action": "sysmsg", "deviceid": "SAT", "params": {"online": true}})
                .to_string(),
        );

        let PushMessage::Event(frame) = msg else {
            panic!("expected Event");
        };
        assert_eq!(frame.action, ACTION_SYSMSG);
        assert!(frame.online());
    }

    #[test]
    fn object_without_action_or_params_is_not_an_event() {
        let msg = PushMessage::parse(&json!({"error": 0, "apikey": "k"}).to_string());
        assert!(matches!(msg, PushMessage::Object(_)));
        assert_eq!(msg.device_id(), None);
    }

    #[test]
    fn non_json_is_liveness() {
        assert_eq!(
            PushMessage::parse("pong"),
            PushMessage::Liveness("pong".to_string())
        );
    }

    #[test]
    fn json_scalar_is_liveness() {
        assert_eq!(
            PushMessage::parse("\"pong\""),
            PushMessage::Liveness("\"pong\"".to_string())
        );
    }

    #[test]
    fn online_truthiness_variants() {
        for (online, expected) in [
            (json!(true), true),
            (json!(false), false),
            (json!(1), true),
            (json!(0), false),
            (json!("yes"), true),
            (json!(""), false),
            (json!(null), false),
        ] {
            let frame = EventFrame {
                action: ACTION_SYSMSG.to_string(),
                device_id: None,
                params: json!({ "online": online }),
            };
            assert_eq!(frame.online(), expected, "online = {:?}", frame.params);
        }
    }

    #[test]
    fn missing_online_is_false() {
        let frame = EventFrame {
            action: ACTION_SYSMSG.to_string(),
            device_id: None,
            params: json!({}),
        };
        assert!(!frame.online());
    }

    #[test]
    fn switch_absent_for_non_string() {
        let frame = EventFrame {
            action: ACTION_UPDATE.to_string(),
            device_id: None,
            params: json!({"switch": 1}),
        };
        assert_eq!(frame.switch(), None);
    }
}
