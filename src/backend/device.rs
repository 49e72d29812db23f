// Adapter selection: the first enumerated adapter whose queue families
// satisfy the requirements wins, and families are scanned in index order.
// There is no scoring pass; enumeration order is whatever the platform
// returns.

use ash::vk;
use std::ffi::CStr;

use super::{BootstrapError, BootstrapResult};

/// Queue capabilities the selected adapter has to provide. Grows field by
/// field as new queue kinds are needed.
#[derive(Debug, Clone, Copy)]
pub struct QueueFamilyRequirements {
    pub graphics: bool,
}

impl QueueFamilyRequirements {
    /// The current baseline: one graphics-capable family.
    pub fn graphics() -> Self {
        Self { graphics: true }
    }
}

/// Family indices assigned to the requirements, `None` until found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueFamilyIndices {
    pub graphics: Option<u32>,
}

impl QueueFamilyIndices {
    /// Scans `families` in index order and assigns the first family that
    /// covers each required capability. Stops as soon as every requirement
    /// has an assignment.
    pub fn find(
        requirements: QueueFamilyRequirements,
        families: &[vk::QueueFamilyProperties],
    ) -> Self {
        let mut indices = Self::default();

        for (index, family) in families.iter().enumerate() {
            if requirements.graphics && family.queue_flags.contains(vk::QueueFlags::GRAPHICS) {
                indices.graphics = Some(index as u32);
            }

            if indices.is_complete(requirements) {
                break;
            }
        }

        indices
    }

    /// True when every required capability has an assigned family.
    pub fn is_complete(&self, requirements: QueueFamilyRequirements) -> bool {
        !requirements.graphics || self.graphics.is_some()
    }
}

/// The chosen adapter: its handle, cached properties, and the finalized
/// family assignments. Never mutated after selection.
pub struct SelectedAdapter {
    pub handle: vk::PhysicalDevice,
    pub properties: vk::PhysicalDeviceProperties,
    pub queue_families: QueueFamilyIndices,
}

impl SelectedAdapter {
    /// Device name as reported by the driver.
    pub fn name(&self) -> String {
        unsafe { CStr::from_ptr(self.properties.device_name.as_ptr()) }
            .to_string_lossy()
            .into_owned()
    }
}

/// Picks the first enumerated adapter whose queue families satisfy
/// `requirements`. A failed pick leaves the instance untouched.
pub fn select_adapter(
    instance: &ash::Instance,
    requirements: QueueFamilyRequirements,
) -> BootstrapResult<SelectedAdapter> {
    let adapters = unsafe { instance.enumerate_physical_devices() }.map_err(|err| {
        log::error!("Failed to enumerate physical devices: {}", err);
        BootstrapError::NoAdaptersFound
    })?;

    let (index, queue_families) = first_suitable(&adapters, requirements, |&adapter| unsafe {
        instance.get_physical_device_queue_family_properties(adapter)
    })?;

    let handle = adapters[index];
    let properties = unsafe { instance.get_physical_device_properties(handle) };
    let adapter = SelectedAdapter {
        handle,
        properties,
        queue_families,
    };

    log::info!("Selected GPU: {}", adapter.name());
    log::info!(
        "API Version: {}.{}.{}",
        vk::api_version_major(properties.api_version),
        vk::api_version_minor(properties.api_version),
        vk::api_version_patch(properties.api_version)
    );

    Ok(adapter)
}

/// Core of the selection: scan in enumeration order, stop at the first
/// adapter whose assignments are complete.
fn first_suitable<A, F>(
    adapters: &[A],
    requirements: QueueFamilyRequirements,
    mut queue_families: F,
) -> BootstrapResult<(usize, QueueFamilyIndices)>
where
    F: FnMut(&A) -> Vec<vk::QueueFamilyProperties>,
{
    if adapters.is_empty() {
        return Err(BootstrapError::NoAdaptersFound);
    }

    for (index, adapter) in adapters.iter().enumerate() {
        let indices = QueueFamilyIndices::find(requirements, &queue_families(adapter));
        if indices.is_complete(requirements) {
            return Ok((index, indices));
        }
    }

    Err(BootstrapError::NoSuitableAdapter)
}
