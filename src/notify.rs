// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Operator-facing error notifier.
//!
//! Delivery (email, chat webhook, pager) lives outside this crate; the
//! dispatcher and handlers only ever see this one-method capability and
//! never depend on delivery succeeding.

/// Fire-and-forget operator notification.
///
/// Implementations must not block and must not fail loudly: a lost
/// notification is preferable to a stalled dispatch path.
pub trait Notifier: Send + Sync {
    /// Reports an error message to the operator.
    fn notify(&self, message: &str);
}

/// Notifier that only writes to the log.
///
/// The default when no external delivery channel is wired up.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        tracing::error!(message, "operator notice");
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Notifier;
    use parking_lot::Mutex;

    /// Records every notification for assertions.
    #[derive(Debug, Default)]
    pub struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        pub fn messages(&self) -> Vec<String> {
            self.messages.lock().clone()
        }

        pub fn is_empty(&self) -> bool {
            self.messages.lock().is_empty()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, message: &str) {
            self.messages.lock().push(message.to_string());
        }
    }
}
