// Backend module - Vulkan bootstrap layer
//
// Design: Thin wrapper around ash with explicit construction order and
// explicit reverse-order teardown.

use thiserror::Error;

pub mod capabilities;
pub mod cleanup;
pub mod context;
pub mod debug;
pub mod device;
pub mod instance;

pub use context::VulkanContext;

pub type BootstrapResult<T> = Result<T, BootstrapError>;

/// The ways bootstrap can fail. Every variant is terminal: the sequence
/// aborts, acquired handles are released, and the process exits nonzero.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("validation layers requested, but not available")]
    ValidationLayersUnavailable,
    #[error("failed to create instance")]
    InstanceCreationFailed(#[source] ash::vk::Result),
    #[error("failed to set up debug messenger")]
    DiagnosticsSetupFailed(#[source] debug::DebugMessengerError),
    #[error("failed to find GPUs with Vulkan support")]
    NoAdaptersFound,
    #[error("failed to find a suitable GPU")]
    NoSuitableAdapter,
}
