// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Switch-status mirroring handler.
//!
//! Watches one source device and copies its on/off state onto one
//! satellite device. Two event shapes are acted on:
//!
//! - `update` frames from the source carry the new state directly.
//! - `sysmsg` frames signal a connectivity transition; when the source
//!   comes online its authoritative state is queried and re-applied.
//!
//! Everything else is discarded at debug level. Relevance of `sysmsg`
//! frames is decided on the source device id only: a satellite coming
//! online carries no state information this handler does not already
//! act on through the source.

use std::sync::Arc;

use async_trait::async_trait;

use crate::event::{ACTION_SYSMSG, ACTION_UPDATE, EventFrame, PushMessage};
use crate::handler::MessageHandler;
use crate::notify::Notifier;
use crate::provider::PowerControl;
use crate::types::{DeviceId, SwitchState};

/// Mirrors a source device's on/off state onto a satellite device.
pub struct MirrorSwitchStatus {
    name: String,
    source_id: DeviceId,
    satellite_id: DeviceId,
    control: Arc<dyn PowerControl>,
    notifier: Arc<dyn Notifier>,
}

impl MirrorSwitchStatus {
    /// Creates a mirror handler for an already-resolved device pair.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        source_id: DeviceId,
        satellite_id: DeviceId,
        control: Arc<dyn PowerControl>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let name = name.into();
        tracing::info!(
            handler = %name,
            source = %source_id,
            satellite = %satellite_id,
            "mirroring switch status"
        );
        Self {
            name,
            source_id,
            satellite_id,
            control,
            notifier,
        }
    }

    async fn process_sysmsg(&self, frame: &EventFrame) {
        if frame.device_id.as_ref() != Some(&self.source_id) {
            tracing::debug!(handler = %self.name, "sysmsg for unrelated device, discarding");
            return;
        }
        if !frame.online() {
            tracing::debug!(handler = %self.name, "sysmsg is not an online transition");
            return;
        }

        tracing::info!(
            handler = %self.name,
            device = %self.source_id,
            "source came online, querying its state"
        );

        let state = match self.control.query_power_state(&self.source_id).await {
            Ok(state) => state,
            Err(e) if e.is_device_offline() => {
                // The device that just reported online may already be
                // unreachable again. Expected race, not worth an alert.
                tracing::info!(handler = %self.name, device = %self.source_id, "source already offline again");
                return;
            }
            Err(e) => {
                self.report(&format!("error getting source device state: {e}"));
                return;
            }
        };

        match state {
            Some(state) => {
                tracing::info!(handler = %self.name, %state, "source power state retrieved");
                self.mirror(state).await;
            }
            None => {
                tracing::debug!(handler = %self.name, "source state is not on/off, discarding");
            }
        }
    }

    /// Applies `state` to the satellite device.
    async fn mirror(&self, state: SwitchState) {
        tracing::info!(
            handler = %self.name,
            satellite = %self.satellite_id,
            %state,
            "setting satellite switch state"
        );

        match self.control.set_power_state(&self.satellite_id, state).await {
            Ok(()) => {
                tracing::info!(
                    handler = %self.name,
                    satellite = %self.satellite_id,
                    %state,
                    "satellite switch state set"
                );
            }
            Err(e) => {
                self.report(&format!("error setting power state to {state}: {e}"));
            }
        }
    }

    fn report(&self, message: &str) {
        let full = format!("[{}]: {message}", self.name);
        tracing::error!("{full}");
        self.notifier.notify(&full);
    }
}

#[async_trait]
impl MessageHandler for MirrorSwitchStatus {
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, message: &PushMessage) {
        let PushMessage::Event(frame) = message else {
            tracing::debug!(handler = %self.name, "message carries no action/params, discarding");
            return;
        };

        match frame.action.as_str() {
            ACTION_SYSMSG => self.process_sysmsg(frame).await,
            ACTION_UPDATE if frame.device_id.as_ref() == Some(&self.source_id) => {
                match frame.switch().and_then(SwitchState::from_provider) {
                    Some(state) => self.mirror(state).await,
                    None => {
                        tracing::debug!(handler = %self.name, "update without an on/off switch value, discarding");
                    }
                }
            }
            _ => {
                tracing::debug!(handler = %self.name, action = %frame.action, "discarding message");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DEVICE_OFFLINE_CODE, ProviderError};
    use crate::notify::test_support::RecordingNotifier;
    use parking_lot::Mutex;
    use serde_json::json;

    /// Scripted outcome for the next power-state query.
    #[derive(Debug, Clone)]
    enum QueryScript {
        State(Option<SwitchState>),
        ApiError { code: i64, message: String },
    }

    #[derive(Default)]
    struct FakeControl {
        query_script: Mutex<Option<QueryScript>>,
        command_error: Mutex<Option<(i64, String)>>,
        queries: Mutex<Vec<DeviceId>>,
        commands: Mutex<Vec<(DeviceId, SwitchState)>>,
    }

    impl FakeControl {
        fn with_query(script: QueryScript) -> Self {
            let fake = Self::default();
            *fake.query_script.lock() = Some(script);
            fake
        }

        fn queries(&self) -> Vec<DeviceId> {
            self.queries.lock().clone()
        }

        fn commands(&self) -> Vec<(DeviceId, SwitchState)> {
            self.commands.lock().clone()
        }
    }

    #[async_trait]
    impl PowerControl for FakeControl {
        async fn query_power_state(
            &self,
            id: &DeviceId,
        ) -> Result<Option<SwitchState>, ProviderError> {
            self.queries.lock().push(id.clone());
            match self.query_script.lock().clone() {
                Some(QueryScript::State(state)) => Ok(state),
                Some(QueryScript::ApiError { code, message }) => {
                    Err(ProviderError::Api { code, message })
                }
                None => Ok(None),
            }
        }

        async fn set_power_state(
            &self,
            id: &DeviceId,
            state: SwitchState,
        ) -> Result<(), ProviderError> {
            self.commands.lock().push((id.clone(), state));
            match self.command_error.lock().clone() {
                Some((code, message)) => Err(ProviderError::Api { code, message }),
                None => Ok(()),
            }
        }
    }

    fn handler(
        control: Arc<FakeControl>,
        notifier: Arc<RecordingNotifier>,
    ) -> MirrorSwitchStatus {
        MirrorSwitchStatus::new(
            "test-mirror",
            DeviceId::from("SRC"),
            DeviceId::from("SAT"),
            control,
            notifier,
        )
    }

    fn update_frame(deviceid: &str, switch: &str) -> PushMessage {
        PushMessage::parse(
            &json!({"action": "update", "deviceid": deviceid, "params": {"switch": switch}})
                .to_string(),
        )
    }

    fn sysmsg_frame(deviceid: &str, online: bool) -> PushMessage {
        PushMessage::parse(
            &json!({"action": "sysmsg", "deviceid": deviceid, "params": {"online": online}})
                .to_string(),
        )
    }

    #[tokio::test]
    async fn discards_messages_without_action_and_params() {
        let control = Arc::new(FakeControl::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let h = handler(control.clone(), notifier.clone());

        h.handle(&PushMessage::Liveness("pong".to_string())).await;
        h.handle(&PushMessage::parse(&json!({"error": 0}).to_string()))
            .await;

        assert!(control.queries().is_empty());
        assert!(control.commands().is_empty());
        assert!(notifier.is_empty());
    }

    #[tokio::test]
    async fn update_from_source_mirrors_state() {
        let control = Arc::new(FakeControl::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let h = handler(control.clone(), notifier.clone());

        h.handle(&update_frame("SRC", "on")).await;

        assert_eq!(
            control.commands(),
            vec![(DeviceId::from("SAT"), SwitchState::On)]
        );
        assert!(notifier.is_empty());
    }

    #[tokio::test]
    async fn update_from_other_device_is_ignored() {
        let control = Arc::new(FakeControl::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let h = handler(control.clone(), notifier.clone());

        h.handle(&update_frame("OTHER", "on")).await;
        h.handle(&update_frame("SAT", "off")).await;

        assert!(control.commands().is_empty());
    }

    #[tokio::test]
    async fn update_with_non_switch_value_is_ignored() {
        let control = Arc::new(FakeControl::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let h = handler(control.clone(), notifier.clone());

        h.handle(&update_frame("SRC", "toggle")).await;

        assert!(control.commands().is_empty());
    }

    #[tokio::test]
    async fn sysmsg_online_for_source_queries_source_once() {
        let control = Arc::new(FakeControl::with_query(QueryScript::State(Some(
            SwitchState::Off,
        ))));
        let notifier = Arc::new(RecordingNotifier::default());
        let h = handler(control.clone(), notifier.clone());

        h.handle(&sysmsg_frame("SRC", true)).await;

        assert_eq!(control.queries(), vec![DeviceId::from("SRC")]);
        assert_eq!(
            control.commands(),
            vec![(DeviceId::from("SAT"), SwitchState::Off)]
        );
    }

    #[tokio::test]
    async fn sysmsg_for_unrelated_device_triggers_no_query() {
        let control = Arc::new(FakeControl::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let h = handler(control.clone(), notifier.clone());

        h.handle(&sysmsg_frame("OTHER", true)).await;

        assert!(control.queries().is_empty());
    }

    #[tokio::test]
    async fn sysmsg_for_satellite_triggers_no_query() {
        // Relevance is decided on the source id only.
        let control = Arc::new(FakeControl::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let h = handler(control.clone(), notifier.clone());

        h.handle(&sysmsg_frame("SAT", true)).await;

        assert!(control.queries().is_empty());
    }

    #[tokio::test]
    async fn sysmsg_offline_transition_triggers_no_query() {
        let control = Arc::new(FakeControl::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let h = handler(control.clone(), notifier.clone());

        h.handle(&sysmsg_frame("SRC", false)).await;

        assert!(control.queries().is_empty());
    }

    #[tokio::test]
    async fn offline_query_error_is_swallowed() {
        let control = Arc::new(FakeControl::with_query(QueryScript::ApiError {
            code: DEVICE_OFFLINE_CODE,
            message: "offline".to_string(),
        }));
        let notifier = Arc::new(RecordingNotifier::default());
        let h = handler(control.clone(), notifier.clone());

        h.handle(&sysmsg_frame("SRC", true)).await;

        assert!(notifier.is_empty());
        assert!(control.commands().is_empty());
    }

    #[tokio::test]
    async fn other_query_error_is_reported() {
        let control = Arc::new(FakeControl::with_query(QueryScript::ApiError {
            code: 400,
            message: "bad request".to_string(),
        }));
        let notifier = Arc::new(RecordingNotifier::default());
        let h = handler(control.clone(), notifier.clone());

        h.handle(&sysmsg_frame("SRC", true)).await;

        let messages = notifier.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("400"));
        assert!(messages[0].contains("bad request"));
        assert!(control.commands().is_empty());
    }

    #[tokio::test]
    async fn unrecognized_query_state_is_discarded() {
        let control = Arc::new(FakeControl::with_query(QueryScript::State(None)));
        let notifier = Arc::new(RecordingNotifier::default());
        let h = handler(control.clone(), notifier.clone());

        h.handle(&sysmsg_frame("SRC", true)).await;

        assert_eq!(control.queries().len(), 1);
        assert!(control.commands().is_empty());
        assert!(notifier.is_empty());
    }

    #[tokio::test]
    async fn command_error_is_reported_not_propagated() {
        let control = Arc::new(FakeControl::default());
        *control.command_error.lock() = Some((500, "upstream broke".to_string()));
        let notifier = Arc::new(RecordingNotifier::default());
        let h = handler(control.clone(), notifier.clone());

        h.handle(&update_frame("SRC", "off")).await;

        let messages = notifier.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("upstream broke"));
    }
}
