/// Peanut Stats frame: view state and host integration.
///
/// - `controller`: tabs, loading and error state, sequenced fetches
/// - `host`: host runtime seam and lifecycle event subscriptions
/// - `session`: context, add-frame prompt, ready signal, event handling
/// - `render`: plain-text rendering of the display state

pub mod controller;
pub mod error;
pub mod host;
pub mod render;
pub mod session;

pub use controller::{Completion, Phase, ViewController, ViewState};
pub use error::ViewError;
pub use host::{AddFrameError, HostEvents, HostRuntime, Subscription};
pub use session::{FrameSession, SessionState, Started};
