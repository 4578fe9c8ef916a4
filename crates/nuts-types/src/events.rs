use serde::{Deserialize, Serialize};

/// Lifecycle events emitted by the host client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum HostEvent {
    /// The user added the frame to their client
    FrameAdded {
        notification_details: Option<NotificationDetails>,
    },

    /// The user declined the add prompt
    FrameAddRejected { reason: String },

    /// The frame was removed from the client
    FrameRemoved,

    NotificationsEnabled {
        notification_details: NotificationDetails,
    },

    NotificationsDisabled,

    /// The host's primary action button was pressed
    PrimaryButtonClicked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDetails {
    pub url: String,
    pub token: String,
}

/// Context the host hands to the frame once it is loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameContext {
    pub user: Option<HostUser>,
    pub client: ClientContext,
}

impl FrameContext {
    /// The viewer's fid, if the host supplied one.
    pub fn viewer_fid(&self) -> Option<u64> {
        self.user.as_ref().map(|u| u.fid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostUser {
    pub fid: u64,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientContext {
    pub added: bool,
    pub safe_area_insets: Option<SafeAreaInsets>,
    pub notification_details: Option<NotificationDetails>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeAreaInsets {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_payloads_use_camel_case() {
        let event: HostEvent = serde_json::from_str(
            r#"{"event":"frameAdded","notificationDetails":{"url":"https://host.test/n","token":"t"}}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            HostEvent::FrameAdded {
                notification_details: Some(NotificationDetails {
                    url: "https://host.test/n".into(),
                    token: "t".into(),
                }),
            }
        );

        let rejected: HostEvent =
            serde_json::from_str(r#"{"event":"frameAddRejected","reason":"no"}"#).unwrap();
        assert_eq!(rejected, HostEvent::FrameAddRejected { reason: "no".into() });

        let context: FrameContext = serde_json::from_str(
            r#"{
                "user": { "fid": 42, "username": "viewer" },
                "client": {
                    "added": true,
                    "safeAreaInsets": { "top": 20, "bottom": 34, "left": 0, "right": 0 },
                    "notificationDetails": null
                }
            }"#,
        )
        .unwrap();
        assert_eq!(context.viewer_fid(), Some(42));
        assert!(context.client.added);
        assert_eq!(context.client.safe_area_insets.map(|i| i.bottom), Some(34));
    }

    #[test]
    fn removed_event_serializes_with_tag_only() {
        let json = serde_json::to_string(&HostEvent::FrameRemoved).unwrap();
        assert_eq!(json, r#"{"event":"frameRemoved"}"#);
    }
}
