// Debug messenger plumbing.
//
// The messenger entry points live behind VK_EXT_debug_utils and are not part
// of the core dispatch table, so they are resolved by name at runtime.
// Absence is a checked outcome, not a crash: create reports it as an error,
// destroy treats it as nothing to unregister.

use ash::{vk, Entry};
use std::ffi::CStr;
use std::ptr;
use thiserror::Error;

/// Failure modes of messenger registration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DebugMessengerError {
    /// The create entry point could not be resolved from the instance.
    #[error("VK_EXT_debug_utils is unavailable on this instance")]
    ExtensionUnavailable,
    /// The driver rejected the messenger.
    #[error("vkCreateDebugUtilsMessengerEXT failed: {0}")]
    CreationFailed(vk::Result),
}

/// Lookup of instance-level entry points by name.
pub trait ProcLoader {
    /// Returns the entry point named `name`, or `None` if the instance does
    /// not export it.
    fn try_get(&self, name: &CStr) -> Option<unsafe extern "system" fn()>;
}

/// `ProcLoader` backed by `vkGetInstanceProcAddr`.
pub struct InstanceProcs<'a> {
    entry: &'a Entry,
    instance: vk::Instance,
}

impl<'a> InstanceProcs<'a> {
    pub fn new(entry: &'a Entry, instance: vk::Instance) -> Self {
        Self { entry, instance }
    }
}

impl ProcLoader for InstanceProcs<'_> {
    fn try_get(&self, name: &CStr) -> Option<unsafe extern "system" fn()> {
        unsafe { self.entry.get_instance_proc_addr(self.instance, name.as_ptr()) }
    }
}

/// The two optional messenger entry points, resolved once per instance.
#[derive(Clone, Copy)]
pub struct MessengerFns {
    create: Option<vk::PFN_vkCreateDebugUtilsMessengerEXT>,
    destroy: Option<vk::PFN_vkDestroyDebugUtilsMessengerEXT>,
}

impl MessengerFns {
    pub fn resolve(loader: &impl ProcLoader) -> Self {
        Self {
            create: loader
                .try_get(c"vkCreateDebugUtilsMessengerEXT")
                .map(|f| unsafe { std::mem::transmute(f) }),
            destroy: loader
                .try_get(c"vkDestroyDebugUtilsMessengerEXT")
                .map(|f| unsafe { std::mem::transmute(f) }),
        }
    }

    /// Registers `create_info`'s callback on `instance`.
    pub fn create_messenger(
        &self,
        instance: vk::Instance,
        create_info: &vk::DebugUtilsMessengerCreateInfoEXT,
    ) -> Result<vk::DebugUtilsMessengerEXT, DebugMessengerError> {
        let create = self.create.ok_or(DebugMessengerError::ExtensionUnavailable)?;

        let mut messenger = vk::DebugUtilsMessengerEXT::null();
        match unsafe { create(instance, create_info, ptr::null(), &mut messenger) } {
            vk::Result::SUCCESS => Ok(messenger),
            err => Err(DebugMessengerError::CreationFailed(err)),
        }
    }

    /// Unregisters `messenger`. An unresolved destroy entry point means
    /// there is nothing to unregister; teardown must not fail here.
    pub fn destroy_messenger(&self, instance: vk::Instance, messenger: vk::DebugUtilsMessengerEXT) {
        if let Some(destroy) = self.destroy {
            unsafe { destroy(instance, messenger, ptr::null()) };
        }
    }
}

/// Registered messenger plus the resolved functions needed to tear it down.
pub struct DebugMessenger {
    instance: vk::Instance,
    handle: vk::DebugUtilsMessengerEXT,
    fns: MessengerFns,
}

impl DebugMessenger {
    /// Resolves the entry points and registers the logging callback.
    pub fn new(entry: &Entry, instance: &ash::Instance) -> Result<Self, DebugMessengerError> {
        let procs = InstanceProcs::new(entry, instance.handle());
        let fns = MessengerFns::resolve(&procs);
        let create_info = messenger_create_info();
        let handle = fns.create_messenger(instance.handle(), &create_info)?;

        log::debug!("Debug messenger registered");
        Ok(Self {
            instance: instance.handle(),
            handle,
            fns,
        })
    }

    /// Unregisters the messenger. Must run before the instance it was
    /// created from is destroyed.
    pub fn destroy(self) {
        self.fns.destroy_messenger(self.instance, self.handle);
    }
}

/// Messenger configuration: which messages reach the callback.
///
/// Also chained onto `InstanceCreateInfo` so messages emitted while the
/// instance itself is being created or destroyed are captured.
pub fn messenger_create_info() -> vk::DebugUtilsMessengerCreateInfoEXT {
    vk::DebugUtilsMessengerCreateInfoEXT::builder()
        .message_severity(
            vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE
                | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
        )
        .message_type(
            vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
        )
        .pfn_user_callback(Some(debug_callback))
        .build()
}

// Forwards driver messages to the log, tagged by severity and category.
unsafe extern "system" fn debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _p_user_data: *mut std::ffi::c_void,
) -> vk::Bool32 {
    let message = CStr::from_ptr((*p_callback_data).p_message).to_string_lossy();

    match message_severity {
        vk::DebugUtilsMessageSeverityFlagsEXT::ERROR => {
            log::error!("[Vulkan] {:?}: {}", message_type, message);
        }
        vk::DebugUtilsMessageSeverityFlagsEXT::WARNING => {
            log::warn!("[Vulkan] {:?}: {}", message_type, message);
        }
        vk::DebugUtilsMessageSeverityFlagsEXT::INFO => {
            log::info!("[Vulkan] {:?}: {}", message_type, message);
        }
        _ => {
            log::debug!("[Vulkan] {:?}: {}", message_type, message);
        }
    }

    // Anything but FALSE would abort the call that triggered the message.
    vk::FALSE
}
