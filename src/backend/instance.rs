// Instance construction.

use ash::{vk, Entry};
use raw_window_handle::RawDisplayHandle;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use super::{capabilities, debug, BootstrapError, BootstrapResult};

/// Immutable inputs to instance creation, taken from config rather than
/// process-wide state.
#[derive(Debug, Clone, Copy)]
pub struct InstanceOptions<'a> {
    pub app_name: &'a str,
    pub engine_name: &'a str,
    pub validation: bool,
}

/// Builds the Vulkan instance.
///
/// When validation is on, layer support is verified before anything is
/// created, and a messenger create-info is chained onto the instance request
/// so messages from instance creation and destruction themselves reach the
/// callback.
pub fn create_instance(
    entry: &Entry,
    display_handle: RawDisplayHandle,
    options: &InstanceOptions<'_>,
) -> BootstrapResult<ash::Instance> {
    if options.validation {
        let available = entry.enumerate_instance_layer_properties().map_err(|err| {
            log::error!("Failed to enumerate instance layers: {}", err);
            BootstrapError::ValidationLayersUnavailable
        })?;

        if !validation_layers_supported(&available, capabilities::required_layers(true)) {
            return Err(BootstrapError::ValidationLayersUnavailable);
        }
    }

    let app_name = cstring_arg(options.app_name)?;
    let engine_name = cstring_arg(options.engine_name)?;

    let app_info = vk::ApplicationInfo::builder()
        .application_name(&app_name)
        .application_version(vk::make_api_version(0, 1, 0, 0))
        .engine_name(&engine_name)
        .engine_version(vk::make_api_version(0, 1, 0, 0))
        .api_version(vk::API_VERSION_1_0);

    let extensions =
        capabilities::required_instance_extensions(display_handle, options.validation)?;
    log::debug!("Instance extensions: {:?}", extensions);

    let extension_ptrs: Vec<*const c_char> =
        extensions.iter().map(|name| name.as_ptr()).collect();
    let layers: Vec<*const c_char> = capabilities::required_layers(options.validation)
        .iter()
        .map(|layer| layer.as_ptr())
        .collect();

    // Populated before the create call so it is live for the instance's own
    // creation and destruction, not just for later messages.
    let mut debug_info = debug::messenger_create_info();

    let mut create_info = vk::InstanceCreateInfo::builder()
        .application_info(&app_info)
        .enabled_extension_names(&extension_ptrs)
        .enabled_layer_names(&layers);
    if options.validation {
        create_info = create_info.push_next(&mut debug_info);
    }

    let instance = unsafe { entry.create_instance(&create_info, None) }
        .map_err(BootstrapError::InstanceCreationFailed)?;

    log::info!(
        "Created Vulkan instance for {} (validation: {})",
        options.app_name,
        options.validation
    );
    Ok(instance)
}

/// Every required layer must appear in the enumerated list, byte for byte.
pub fn validation_layers_supported(available: &[vk::LayerProperties], required: &[&CStr]) -> bool {
    required.iter().all(|required| {
        available.iter().any(|props| {
            let name = unsafe { CStr::from_ptr(props.layer_name.as_ptr()) };
            name == *required
        })
    })
}

fn cstring_arg(value: &str) -> BootstrapResult<CString> {
    // An interior NUL cannot be expressed to the driver; reject it before
    // the create call.
    CString::new(value).map_err(|_| {
        log::error!("Config string {:?} contains an interior NUL", value);
        BootstrapError::InstanceCreationFailed(vk::Result::ERROR_INITIALIZATION_FAILED)
    })
}
