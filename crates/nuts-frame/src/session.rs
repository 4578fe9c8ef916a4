use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use nuts_client::RecordSource;
use nuts_types::events::{FrameContext, HostEvent, SafeAreaInsets};

use crate::controller::{Completion, ViewController};
use crate::error::ViewError;
use crate::host::{HostRuntime, Subscription};

/// Host-facing state of the frame, separate from the tab content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// The host answered with a context.
    pub loaded: bool,
    pub context: Option<FrameContext>,
    pub added: bool,
    /// Outcome of the last add prompt, empty if it went through.
    pub add_frame_result: String,
    pub notifications_enabled: bool,
}

impl SessionState {
    /// Safe-area padding requested by the host, zero when absent.
    pub fn padding(&self) -> SafeAreaInsets {
        self.context
            .as_ref()
            .and_then(|c| c.client.safe_area_insets)
            .unwrap_or_default()
    }
}

/// Returned by `FrameSession::start` once the host is wired up.
pub struct Started {
    pub subscription: Subscription,
    /// Stats load for the viewer, if the context named one.
    pub initial_load: Option<JoinHandle<Result<Completion, ViewError>>>,
}

/// Wires a `ViewController` to the host it runs in.
pub struct FrameSession<H, S> {
    host: H,
    controller: ViewController<S>,
    state: SessionState,
}

impl<H, S> FrameSession<H, S>
where
    H: HostRuntime,
    S: RecordSource + 'static,
{
    pub fn new(host: H, controller: ViewController<S>) -> Self {
        Self {
            host,
            controller,
            state: SessionState::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn controller(&self) -> &ViewController<S> {
        &self.controller
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Load the host context, subscribe to lifecycle events, prompt to add the
    /// frame if needed and signal readiness.
    ///
    /// Returns `None` when the host has no context for us.
    pub async fn start(&mut self) -> Option<Started> {
        let Some(context) = self.host.context().await else {
            warn!("Host supplied no frame context");
            return None;
        };

        self.state.loaded = true;
        self.state.added = context.client.added;
        let viewer = context.viewer_fid();
        self.state.context = Some(context);

        // Listen before prompting so an add accepted during the prompt is seen.
        let subscription = self.host.subscribe();

        if !self.state.added {
            self.prompt_add().await;
        }

        info!("Calling ready");
        self.host.ready();

        let initial_load = viewer.map(|fid| {
            let controller = self.controller.clone();
            tokio::spawn(async move { controller.set_subject(Some(fid)).await })
        });

        Some(Started {
            subscription,
            initial_load,
        })
    }

    /// Ask the host to add the frame and record the outcome.
    pub async fn prompt_add(&mut self) {
        match self.host.add_frame().await {
            Ok(()) => {
                self.state.added = true;
                self.state.add_frame_result.clear();
            }
            Err(e) => {
                info!("Add frame request failed: {:?}", e);
                self.state.add_frame_result = e.display_result();
            }
        }
    }

    pub fn handle_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::FrameAdded {
                notification_details,
            } => {
                info!("frameAdded");
                self.state.added = true;
                self.state.add_frame_result.clear();
                if notification_details.is_some() {
                    self.state.notifications_enabled = true;
                }
            }
            HostEvent::FrameAddRejected { reason } => {
                info!("frameAddRejected: {}", reason);
            }
            HostEvent::FrameRemoved => {
                info!("frameRemoved");
                self.state.added = false;
                self.state.notifications_enabled = false;
            }
            HostEvent::NotificationsEnabled {
                notification_details,
            } => {
                info!("notificationsEnabled: {}", notification_details.url);
                self.state.notifications_enabled = true;
            }
            HostEvent::NotificationsDisabled => {
                info!("notificationsDisabled");
                self.state.notifications_enabled = false;
            }
            HostEvent::PrimaryButtonClicked => {
                info!("primaryButtonClicked");
            }
        }
    }

    /// Run headless until `shutdown` fires or the host goes away.
    ///
    /// The event subscription is released and any in-flight fetch cancelled
    /// before returning the final state.
    pub async fn run(mut self, shutdown: CancellationToken) -> SessionState {
        let Some(Started {
            mut subscription, ..
        }) = self.start().await
        else {
            return self.state;
        };

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                event = subscription.recv() => match event {
                    Some(event) => self.handle_event(event),
                    None => break,
                },
            }
        }

        subscription.unsubscribe();
        self.controller.cancel();
        info!("Frame session closed");
        self.state
    }
}
