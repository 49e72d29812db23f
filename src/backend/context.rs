// Vulkan context - everything the bootstrap sequence acquires.
//
// Acquisition order: entry -> instance -> debug messenger -> adapter. Each
// handle's destroy action is pushed onto the cleanup stack right after the
// handle exists, so a failure in any later step still releases whatever came
// before, in reverse order.

use anyhow::{Context, Result};
use ash::Entry;
use raw_window_handle::RawDisplayHandle;

use super::cleanup::CleanupStack;
use super::debug::DebugMessenger;
use super::device::{self, QueueFamilyRequirements, SelectedAdapter};
use super::instance::{self, InstanceOptions};
use super::BootstrapError;
use crate::config::Config;

/// Live bootstrap state. Field order matters for Drop: the stack flushes
/// the Vulkan handles before the entry (the loaded library) goes away.
pub struct VulkanContext {
    cleanup: CleanupStack,
    pub adapter: SelectedAdapter,
    pub instance: ash::Instance,
    _entry: Entry,
}

impl VulkanContext {
    /// Runs the bootstrap sequence: load the library, create the instance,
    /// register the debug messenger when validation is on, select an
    /// adapter.
    pub fn new(display_handle: RawDisplayHandle, config: &Config) -> Result<Self> {
        let validation = config.debug.validation_enabled();

        let entry =
            unsafe { Entry::load() }.context("Failed to load Vulkan library. Is Vulkan installed?")?;

        let mut cleanup = CleanupStack::new();

        let options = InstanceOptions {
            app_name: &config.vulkan.app_name,
            engine_name: &config.vulkan.engine_name,
            validation,
        };
        let instance = instance::create_instance(&entry, display_handle, &options)?;
        {
            let instance = instance.clone();
            cleanup.push(move || unsafe { instance.destroy_instance(None) });
        }

        if validation {
            // The instance destroy is already on the stack; a messenger
            // failure here tears the instance down on the way out.
            let messenger = DebugMessenger::new(&entry, &instance)
                .map_err(BootstrapError::DiagnosticsSetupFailed)?;
            cleanup.push(move || messenger.destroy());
        }

        let adapter = device::select_adapter(&instance, QueueFamilyRequirements::graphics())?;
        log::debug!(
            "Adapter {:?}, graphics queue family: {:?}",
            adapter.handle,
            adapter.queue_families.graphics
        );

        // TODO: create the logical device from adapter.queue_families once
        // queue setup lands, and push its destroy onto the stack here.

        Ok(Self {
            cleanup,
            adapter,
            instance,
            _entry: entry,
        })
    }
}

impl Drop for VulkanContext {
    fn drop(&mut self) {
        log::info!("Destroying Vulkan resources...");
        self.cleanup.flush();
    }
}
